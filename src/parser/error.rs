use crate::reader::RawLine;
use crate::record::{HARMONIC_PEAK_COUNT, PEAK_COMPONENT_COUNT};

/// Error while parsing a debug printout.
///
/// Both variants carry the line number and the raw text of the offending line.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LogParseError {
    /// A tagged line had the wrong number of fields, or a field was not a number.
    #[error("line {line}: {kind}\n  {text}")]
    Parse {
        line: usize,
        text: String,
        kind: ParseErrorKind,
    },
    /// Harmonic peak data did not have the expected shape.
    #[error("line {line}: {kind}\n  {text}")]
    Shape {
        line: usize,
        text: String,
        kind: ShapeErrorKind,
    },
}

impl LogParseError {
    pub fn line(&self) -> usize {
        match self {
            Self::Parse { line, .. } | Self::Shape { line, .. } => *line,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Parse { text, .. } | Self::Shape { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("expected {expected} {record} fields, found {found}")]
    FieldCount {
        record: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("`{token}` is not a valid {expected}")]
    Number {
        token: String,
        expected: &'static str,
    },
    #[error("missing `|` between wave parameters and harmonic peaks")]
    MissingSeparator,
    #[error("unexpected `|` after harmonic peaks")]
    ExtraSeparator,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeErrorKind {
    #[error("expected {expected} harmonic peaks, found {0}", expected = HARMONIC_PEAK_COUNT)]
    PeakCount(usize),
    #[error(
        "harmonic peak {peak} has {found} components, expected {expected}",
        expected = PEAK_COMPONENT_COUNT
    )]
    ComponentCount { peak: usize, found: usize },
}

/// Failure of a single line, before the line number is attached.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum LineError {
    Parse(ParseErrorKind),
    Shape(ShapeErrorKind),
}

impl LineError {
    pub(super) fn at(self, line: &RawLine) -> LogParseError {
        let (line, text) = (line.number, line.text.clone());
        match self {
            Self::Parse(kind) => LogParseError::Parse { line, text, kind },
            Self::Shape(kind) => LogParseError::Shape { line, text, kind },
        }
    }
}

impl From<ParseErrorKind> for LineError {
    fn from(value: ParseErrorKind) -> Self {
        Self::Parse(value)
    }
}

impl From<ShapeErrorKind> for LineError {
    fn from(value: ShapeErrorKind) -> Self {
        Self::Shape(value)
    }
}
