//! Mapping between phoneme index space and duration-weighted physical space.
//!
//! Phoneme `i` occupies `[edges[i], edges[i + 1])` in physical space, where
//! `edges` is the cumulative sum of the per-phoneme widths with a leading zero.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MappingError {
    #[error("at least one width is required")]
    Empty,
    #[error("width {index} is {width}, widths must be finite and non-negative")]
    InvalidWidth { index: usize, width: f64 },
    #[error("widths sum to zero")]
    ZeroSpan,
    #[error("{value} is outside of [0, {limit}]")]
    OutOfDomain { value: f64, limit: f64 },
    #[error("coordinate is NaN")]
    NotANumber,
    #[error("segment {index} has zero width and cannot be inverted")]
    ZeroWidth { index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMap {
    widths: Vec<f64>,
    edges: Vec<f64>,
}

impl CoordinateMap {
    pub fn new(widths: &[f64]) -> Result<Self, MappingError> {
        if widths.is_empty() {
            return Err(MappingError::Empty);
        }
        if let Some((index, &width)) = widths
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(MappingError::InvalidWidth { index, width });
        }

        let mut edges = Vec::with_capacity(widths.len() + 1);
        edges.push(0.0);
        for width in widths {
            edges.push(edges[edges.len() - 1] + width);
        }
        if edges[widths.len()] == 0.0 {
            return Err(MappingError::ZeroSpan);
        }

        Ok(Self {
            widths: widths.to_vec(),
            edges,
        })
    }

    /// Number of phonemes.
    pub fn len(&self) -> usize {
        self.widths.len()
    }
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }
    pub fn widths(&self) -> &[f64] {
        &self.widths
    }
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }
    /// Total physical span, `edges[len]`.
    pub fn total(&self) -> f64 {
        self.edges[self.len()]
    }

    /// Left edge of each phoneme, normalized into `[0, 1)`.
    pub fn tick_positions(&self) -> Vec<f64> {
        let total = self.total();
        self.edges[..self.len()].iter().map(|e| e / total).collect()
    }

    /// Index space to physical space, for `x` in `[0, len]`.
    pub fn forward(&self, x: f64) -> Result<f64, MappingError> {
        check_domain(x, self.len() as f64)?;
        Ok(self.forward_unchecked(x))
    }

    /// Physical space to index space, for `x` in `[0, total]`.
    pub fn inverse(&self, x: f64) -> Result<f64, MappingError> {
        check_domain(x, self.total())?;
        self.inverse_unchecked(x)
    }

    /// Like [`CoordinateMap::forward`], but outside of the domain the first
    /// and last segments are extended linearly.
    pub fn forward_clamped(&self, x: f64) -> Result<f64, MappingError> {
        if x.is_nan() {
            return Err(MappingError::NotANumber);
        }
        Ok(self.forward_unchecked(x))
    }

    /// Like [`CoordinateMap::inverse`], but outside of the domain the first
    /// and last segments are extended linearly.
    pub fn inverse_clamped(&self, x: f64) -> Result<f64, MappingError> {
        if x.is_nan() {
            return Err(MappingError::NotANumber);
        }
        self.inverse_unchecked(x)
    }

    fn clamp_index(&self, i: f64) -> usize {
        i.max(0.0).min((self.len() - 1) as f64) as usize
    }

    fn forward_unchecked(&self, x: f64) -> f64 {
        let i = self.clamp_index(x.floor());
        self.edges[i] + (x - i as f64) * self.widths[i]
    }

    fn inverse_unchecked(&self, x: f64) -> Result<f64, MappingError> {
        // rightmost edge not greater than x
        let i = self.edges.partition_point(|&e| e <= x).saturating_sub(1);
        let i = i.min(self.len() - 1);
        let width = self.widths[i];
        if width == 0.0 {
            return Err(MappingError::ZeroWidth { index: i });
        }
        Ok(i as f64 + (x - self.edges[i]) / width)
    }
}

fn check_domain(x: f64, limit: f64) -> Result<(), MappingError> {
    if x.is_nan() {
        Err(MappingError::NotANumber)
    } else if !(0.0..=limit).contains(&x) {
        Err(MappingError::OutOfDomain { value: x, limit })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{CoordinateMap, MappingError};

    fn map() -> CoordinateMap {
        CoordinateMap::new(&[2.0, 3.0, 5.0]).unwrap()
    }

    #[test]
    fn edges() {
        let map = map();
        assert_eq!(map.edges(), &[0.0, 2.0, 5.0, 10.0]);
        assert_eq!(map.total(), 10.0);
        assert_eq!(map.tick_positions(), vec![0.0, 0.2, 0.5]);
    }

    #[test]
    fn boundary_exactness() {
        let map = map();
        for (i, edge) in map.edges().iter().enumerate() {
            assert_eq!(map.forward(i as f64), Ok(*edge));
        }
        assert_eq!(map.forward(1.5), Ok(3.5));
    }

    #[test]
    fn inverse_law() {
        let map = map();
        for x in [0.0, 1.5, 2.9, 2.999, 3.0] {
            let physical = map.forward(x).unwrap();
            assert_abs_diff_eq!(map.inverse(physical).unwrap(), x, epsilon = 1e-12);
        }
        for x in [0.0, 1.5, 2.9, 4.999] {
            let physical = map.forward_clamped(x).unwrap();
            assert_abs_diff_eq!(map.inverse_clamped(physical).unwrap(), x, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(map.forward_clamped(4.999).unwrap(), 19.995, epsilon = 1e-12);
        assert_abs_diff_eq!(map.forward_clamped(-1.0).unwrap(), -2.0);
    }

    #[test]
    fn monotone() {
        let map = CoordinateMap::new(&[1.0, 0.0, 4.0, 2.0]).unwrap();
        let mut previous = f64::MIN;
        for step in 0..=400 {
            let y = map.forward(step as f64 / 100.0).unwrap();
            assert!(y >= previous);
            previous = y;
        }
    }

    #[test]
    fn domain() {
        let map = map();
        assert_eq!(
            map.forward(3.5),
            Err(MappingError::OutOfDomain {
                value: 3.5,
                limit: 3.0
            })
        );
        assert!(matches!(
            map.forward(-0.1),
            Err(MappingError::OutOfDomain { .. })
        ));
        assert!(matches!(
            map.inverse(10.5),
            Err(MappingError::OutOfDomain { .. })
        ));
        assert_eq!(map.forward(f64::NAN), Err(MappingError::NotANumber));
        assert_eq!(map.inverse_clamped(f64::NAN), Err(MappingError::NotANumber));
        assert_eq!(map.inverse(10.0), Ok(3.0));
    }

    #[test]
    fn zero_width() {
        let map = CoordinateMap::new(&[2.0, 0.0, 3.0]).unwrap();
        assert_eq!(map.edges(), &[0.0, 2.0, 2.0, 5.0]);
        // the zero-width phoneme collapses onto its neighbour's left edge
        assert_eq!(map.forward(1.0), Ok(2.0));
        assert_eq!(map.forward(1.7), Ok(2.0));
        assert_eq!(map.inverse(2.0), Ok(2.0));

        let map = CoordinateMap::new(&[2.0, 0.0]).unwrap();
        assert_eq!(map.inverse(2.0), Err(MappingError::ZeroWidth { index: 1 }));
    }

    #[test]
    fn construction() {
        assert_eq!(CoordinateMap::new(&[]), Err(MappingError::Empty));
        assert_eq!(CoordinateMap::new(&[0.0, 0.0]), Err(MappingError::ZeroSpan));
        assert_eq!(
            CoordinateMap::new(&[1.0, -1.0]),
            Err(MappingError::InvalidWidth {
                index: 1,
                width: -1.0
            })
        );
        assert!(matches!(
            CoordinateMap::new(&[1.0, f64::INFINITY]),
            Err(MappingError::InvalidWidth { index: 1, .. })
        ));
    }
}
