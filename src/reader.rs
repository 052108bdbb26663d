//! Line reader for debug printouts.

use std::path::Path;

/// One line of the debug printout, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub number: usize,
    pub text: String,
}

impl RawLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Split an in-memory printout into numbered lines.
pub fn lines_from_str(content: &str) -> Vec<RawLine> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| RawLine::new(i + 1, line))
        .collect()
}

/// Read a printout from disk.
///
/// Invalid UTF-8 (eSpeak echoes raw bytes of the input text) is replaced
/// with U+FFFD.
pub fn read_lines<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<RawLine>> {
    let bytes = std::fs::read(path)?;
    Ok(lines_from_str(&String::from_utf8_lossy(&bytes)))
}
