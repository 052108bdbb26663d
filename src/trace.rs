//! Everything the panels need, derived from one debug printout.

use std::path::Path;

use crate::coordinate::{CoordinateMap, MappingError};
use crate::matrix::{FeatureMatrix, MatrixError, NormalizedMatrix, ZeroPeakPolicy};
use crate::parser::{DebugLog, LogParseError, parse_lines};
use crate::reader::{RawLine, lines_from_str, read_lines};
use crate::record::{LENGTH_FIELD, PhonemeRecord, WaveFrameRecord};

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("failed to read debug printout: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] LogParseError),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error("phoneme lengths: {0}")]
    Mapping(#[from] MappingError),
    #[error("no {0} records found")]
    EmptyTable(&'static str),
}

#[derive(Debug, Clone)]
pub struct Trace {
    log: DebugLog,
    phoneme_matrix: FeatureMatrix,
    phoneme_normalized: NormalizedMatrix,
    wave_matrix: FeatureMatrix,
    wave_normalized: NormalizedMatrix,
    map: CoordinateMap,
}

impl Trace {
    pub fn load<P: AsRef<Path>>(path: P, policy: ZeroPeakPolicy) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let lines = read_lines(path)?;
        tracing::info!(path = %path.display(), lines = lines.len(), "reading debug printout");
        Self::from_lines(&lines, policy)
    }

    pub fn from_text(content: &str, policy: ZeroPeakPolicy) -> Result<Self, TraceError> {
        Self::from_lines(&lines_from_str(content), policy)
    }

    pub fn from_lines(lines: &[RawLine], policy: ZeroPeakPolicy) -> Result<Self, TraceError> {
        let log = parse_lines(lines)?;
        if log.phonemes.is_empty() {
            return Err(TraceError::EmptyTable("phoneme"));
        }
        if log.frames.is_empty() {
            return Err(TraceError::EmptyTable("wave"));
        }

        let phoneme_matrix = FeatureMatrix::from_records(&log.phonemes);
        let wave_matrix = FeatureMatrix::from_records(&log.frames);
        let phoneme_normalized = phoneme_matrix.normalize(policy)?;
        let wave_normalized = wave_matrix.normalize(policy)?;

        let widths = phoneme_matrix.row(LENGTH_FIELD).unwrap_or_default();
        let map = CoordinateMap::new(widths)?;

        tracing::info!(
            phonemes = log.phonemes.len(),
            frames = log.frames.len(),
            total_length = map.total(),
            "trace ready"
        );
        Ok(Self {
            log,
            phoneme_matrix,
            phoneme_normalized,
            wave_matrix,
            wave_normalized,
            map,
        })
    }

    pub fn phonemes(&self) -> &[PhonemeRecord] {
        &self.log.phonemes
    }
    pub fn frames(&self) -> &[WaveFrameRecord] {
        &self.log.frames
    }
    pub fn phoneme_matrix(&self) -> &FeatureMatrix {
        &self.phoneme_matrix
    }
    pub fn phoneme_normalized(&self) -> &NormalizedMatrix {
        &self.phoneme_normalized
    }
    pub fn wave_matrix(&self) -> &FeatureMatrix {
        &self.wave_matrix
    }
    pub fn wave_normalized(&self) -> &NormalizedMatrix {
        &self.wave_normalized
    }
    /// Phoneme index space to duration space, built from the length field.
    pub fn map(&self) -> &CoordinateMap {
        &self.map
    }
}

#[cfg(test)]
mod tests {
    use crate::coordinate::MappingError;
    use crate::matrix::{MatrixError, ZeroPeakPolicy};
    use crate::record::{PHONEME_FIELD_COUNT, WAVE_FIELD_COUNT};
    use crate::tests::{SAMPLE_LOG, phoneme_line, wave_line};

    use super::{Trace, TraceError};

    #[test]
    fn sample() {
        let trace = Trace::from_text(SAMPLE_LOG, ZeroPeakPolicy::Reject).unwrap();
        assert_eq!(trace.phoneme_matrix().shape(), (PHONEME_FIELD_COUNT, 3));
        assert_eq!(trace.wave_matrix().shape(), (WAVE_FIELD_COUNT, 2));
        assert_eq!(trace.map().edges(), &[0.0, 2.0, 5.0, 10.0]);
        assert_eq!(trace.phoneme_normalized().row(6), Some(&[0.4, 0.6, 1.0][..]));
        assert_eq!(trace.wave_normalized().row(0), Some(&[1.0, 0.75][..]));
    }

    #[test]
    fn empty_tables() {
        assert!(matches!(
            Trace::from_text("nothing here\n", ZeroPeakPolicy::Zero),
            Err(TraceError::EmptyTable("phoneme"))
        ));
        let only_phonemes = phoneme_line(&[1; PHONEME_FIELD_COUNT]);
        assert!(matches!(
            Trace::from_text(&only_phonemes, ZeroPeakPolicy::Zero),
            Err(TraceError::EmptyTable("wave"))
        ));
    }

    #[test]
    fn zero_lengths() {
        let mut fields = [1; PHONEME_FIELD_COUNT];
        fields[6] = 0;
        let content = format!("{}\n{}\n", phoneme_line(&fields), wave_line(1));
        assert!(matches!(
            Trace::from_text(&content, ZeroPeakPolicy::Zero),
            Err(TraceError::Mapping(MappingError::ZeroSpan))
        ));
        // the length row is also degenerate
        assert!(matches!(
            Trace::from_text(&content, ZeroPeakPolicy::Reject),
            Err(TraceError::Matrix(MatrixError::ZeroPeak { row: 6 }))
        ));
    }

    #[test]
    fn readable_messages() {
        let broken = wave_line(1).replacen("wave: 1 ", "wave: 1x ", 1);
        let content = format!("{}\n{broken}\n", phoneme_line(&[1; PHONEME_FIELD_COUNT]));
        let err = Trace::from_text(&content, ZeroPeakPolicy::Zero).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("line 2: `1x` is not a valid integer\n  {broken}")
        );

        let err = Trace::load("does/not/exist.log", ZeroPeakPolicy::Zero).unwrap_err();
        assert!(err.to_string().starts_with("failed to read debug printout: "));
    }
}
