//! Feature-major matrices and per-feature normalization.

use serde::Deserialize;

use crate::record::FeatureRow;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatrixError {
    /// Rows of a record table had different lengths.
    #[error("record {record} has {found} fields, expected {expected}")]
    Ragged {
        record: usize,
        expected: usize,
        found: usize,
    },
    /// A feature row peaked at zero and [`ZeroPeakPolicy::Reject`] was requested.
    #[error("feature row {row} has a maximum of zero")]
    ZeroPeak { row: usize },
}

/// What to do with a feature row whose maximum is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZeroPeakPolicy {
    /// Normalize the row to all zeros and log a warning.
    #[default]
    Zero,
    /// Fail with [`MatrixError::ZeroPeak`].
    Reject,
}

/// Rows are features, columns are records.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<Vec<f64>>,
    columns: usize,
}

impl FeatureMatrix {
    /// Transpose a table of typed records.
    pub fn from_records<R: FeatureRow>(records: &[R]) -> Self {
        let mut rows = vec![Vec::with_capacity(records.len()); R::FIELD_COUNT];
        for record in records {
            for (row, value) in rows.iter_mut().zip(record.feature_values()) {
                row.push(value);
            }
        }
        Self {
            rows,
            columns: records.len(),
        }
    }

    /// Transpose a row-major table, checking that every record has `features` fields.
    pub fn from_table(features: usize, table: &[Vec<f64>]) -> Result<Self, MatrixError> {
        if let Some((record, found)) = table
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != features)
        {
            return Err(MatrixError::Ragged {
                record,
                expected: features,
                found,
            });
        }

        let rows = (0..features)
            .map(|feature| table.iter().map(|record| record[feature]).collect())
            .collect();
        Ok(Self {
            rows,
            columns: table.len(),
        })
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }
    pub fn value(&self, row: usize, column: usize) -> f64 {
        self.rows[row][column]
    }
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns)
    }

    /// Maximum of each feature row, `None` for an empty row.
    pub fn row_maxima(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| row_max(row)).collect()
    }

    /// Divide each row by its own maximum.
    pub fn normalize(&self, policy: ZeroPeakPolicy) -> Result<NormalizedMatrix, MatrixError> {
        let mut degenerate = Vec::new();
        let mut rows = Vec::with_capacity(self.rows.len());

        for (index, row) in self.rows.iter().enumerate() {
            match row_max(row) {
                Some(max) if max != 0.0 => rows.push(row.iter().map(|v| v / max).collect()),
                _ => {
                    if policy == ZeroPeakPolicy::Reject {
                        return Err(MatrixError::ZeroPeak { row: index });
                    }
                    tracing::warn!(row = index, "feature row peaks at zero, drawing it as zeros");
                    degenerate.push(index);
                    rows.push(vec![0.0; row.len()]);
                }
            }
        }

        Ok(NormalizedMatrix {
            rows,
            columns: self.columns,
            degenerate,
        })
    }
}

/// [`FeatureMatrix`] with each row scaled by its own maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMatrix {
    rows: Vec<Vec<f64>>,
    columns: usize,
    degenerate: Vec<usize>,
}

impl NormalizedMatrix {
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns)
    }
    /// Rows whose maximum was zero and were replaced by zeros.
    pub fn degenerate_rows(&self) -> &[usize] {
        &self.degenerate
    }
}

fn row_max(row: &[f64]) -> Option<f64> {
    row.iter().copied().reduce(f64::max)
}

/// Color of a value label drawn over a heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    Black,
    White,
}

/// Dark text on the upper half of a row's range, light text below it.
pub fn contrast_color(value: f64, row_max: f64) -> TextColor {
    if value >= row_max / 2.0 {
        TextColor::Black
    } else {
        TextColor::White
    }
}

#[cfg(test)]
mod tests {
    use crate::record::{PHONEME_FIELD_COUNT, PhonemeRecord};

    use super::*;

    #[test]
    fn transpose() {
        let records: Vec<PhonemeRecord> = (0..3)
            .map(|k| PhonemeRecord::from_fields(std::array::from_fn(|i| (i * 10 + k) as i32)))
            .collect();
        let matrix = FeatureMatrix::from_records(&records);

        assert_eq!(matrix.shape(), (PHONEME_FIELD_COUNT, 3));
        assert_eq!(matrix.row(6), Some(&[60.0, 61.0, 62.0][..]));
        assert_eq!(matrix.value(16, 2), 162.0);
    }

    #[test]
    fn ragged_table() {
        let table = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0]];
        assert_eq!(
            FeatureMatrix::from_table(2, &table),
            Err(MatrixError::Ragged {
                record: 2,
                expected: 2,
                found: 1
            })
        );

        let matrix = FeatureMatrix::from_table(2, &table[..2]).unwrap();
        assert_eq!(matrix.rows(), &[vec![1.0, 3.0], vec![2.0, 4.0]]);
    }

    #[test]
    fn normalized_rows_peak_at_one() {
        let table = vec![
            vec![2.0, 10.0, 0.0],
            vec![8.0, 5.0, 0.0],
            vec![4.0, 20.0, 3.0],
        ];
        let matrix = FeatureMatrix::from_table(3, &table).unwrap();
        let normalized = matrix.normalize(ZeroPeakPolicy::Zero).unwrap();

        assert_eq!(normalized.shape(), (3, 3));
        for row in normalized.rows() {
            let max = row.iter().copied().fold(f64::MIN, f64::max);
            approx::assert_abs_diff_eq!(max, 1.0);
            assert!(row.iter().all(|v| (0.0..=1.0).contains(v)));
        }
        approx::assert_abs_diff_eq!(normalized.rows()[0][0], 0.25);
        approx::assert_abs_diff_eq!(normalized.rows()[1][0], 0.5);
        assert_eq!(normalized.rows()[2], vec![0.0, 0.0, 1.0]);
        assert!(normalized.degenerate_rows().is_empty());
    }

    #[test]
    fn zero_peak() {
        let table = vec![vec![1.0, 0.0], vec![2.0, 0.0]];
        let matrix = FeatureMatrix::from_table(2, &table).unwrap();

        let normalized = matrix.normalize(ZeroPeakPolicy::Zero).unwrap();
        assert_eq!(normalized.rows()[1], vec![0.0, 0.0]);
        assert_eq!(normalized.degenerate_rows(), &[1]);
        assert!(normalized.rows().iter().flatten().all(|v| v.is_finite()));

        assert_eq!(
            matrix.normalize(ZeroPeakPolicy::Reject),
            Err(MatrixError::ZeroPeak { row: 1 })
        );
    }

    #[test]
    fn contrast() {
        let matrix = FeatureMatrix::from_table(1, &[vec![2.0], vec![8.0], vec![4.0]]).unwrap();
        let max = matrix.row_maxima()[0].unwrap();
        assert_eq!(max, 8.0);
        assert_eq!(contrast_color(4.0, max), TextColor::Black);
        assert_eq!(contrast_color(3.0, max), TextColor::White);
        assert_eq!(contrast_color(8.0, max), TextColor::Black);
        assert_eq!(contrast_color(2.0, max), TextColor::White);
    }
}
