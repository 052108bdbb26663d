//! Parser for eSpeak NG debug printouts.
//!
//! Two line shapes are recognized, everything else is ignored:
//!
//! ```text
//! p: <17 integers> | <phoneme table fields>
//! wave: <7 integers> | <4 reals>,<4 reals>,<4 reals>,<4 reals>,<4 reals>,<4 reals>,
//! ```

use crate::reader::RawLine;
use crate::record::{
    HARMONIC_PEAK_COUNT, HarmonicPeak, PEAK_COMPONENT_COUNT, PHONEME_FIELD_COUNT,
    PhonemeRecord, PhonemeTableEntry, WAVE_FIELD_COUNT, WaveFrameRecord,
};

use self::error::LineError;

mod base;
pub mod error;

pub use self::error::{LogParseError, ParseErrorKind, ShapeErrorKind};

pub const PHONEME_TAG: &str = "p:";
pub const WAVE_TAG: &str = "wave: ";

/// Records extracted from one debug printout, in synthesis order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugLog {
    pub phonemes: Vec<PhonemeRecord>,
    pub frames: Vec<WaveFrameRecord>,
}

pub fn parse_lines(lines: &[RawLine]) -> Result<DebugLog, LogParseError> {
    let mut log = DebugLog::default();
    let mut ignored = 0;

    for line in lines {
        let text = line.text.trim();
        if let Some(payload) = text.strip_prefix(PHONEME_TAG) {
            log.phonemes
                .push(parse_phoneme(payload).map_err(|e| e.at(line))?);
        } else if let Some(payload) = text.strip_prefix(WAVE_TAG) {
            log.frames.push(parse_wave(payload).map_err(|e| e.at(line))?);
        } else {
            ignored += 1;
        }
    }

    tracing::debug!(
        phonemes = log.phonemes.len(),
        frames = log.frames.len(),
        ignored,
        "parsed debug printout"
    );
    Ok(log)
}

fn parse_phoneme(payload: &str) -> Result<PhonemeRecord, LineError> {
    let (fields, tail) = match payload.split_once('|') {
        Some((fields, tail)) => (fields, Some(tail)),
        None => (payload, None),
    };

    let fields = base::all_tokens(fields, base::integers).map_err(integer_error)?;
    let fields: [i32; PHONEME_FIELD_COUNT] =
        fields
            .try_into()
            .map_err(|fields: Vec<i32>| ParseErrorKind::FieldCount {
                record: "phoneme",
                expected: PHONEME_FIELD_COUNT,
                found: fields.len(),
            })?;

    let table = tail.and_then(parse_table_entry);
    Ok(PhonemeRecord::from_fields(fields).with_table(table))
}

/// The text after `|` is informational; anything that is not nine unsigned
/// integers is skipped.
fn parse_table_entry(tail: &str) -> Option<PhonemeTableEntry> {
    let fields = base::all_tokens(tail, base::unsigned).ok()?;
    match <[u32; PhonemeTableEntry::FIELD_COUNT]>::try_from(fields) {
        Ok(fields) => Some(PhonemeTableEntry::from_fields(fields)),
        Err(fields) => {
            tracing::trace!(found = fields.len(), "phoneme table fields skipped");
            None
        }
    }
}

fn parse_wave(payload: &str) -> Result<WaveFrameRecord, LineError> {
    let mut sections = payload.split('|');
    let fields = sections.next().unwrap_or_default();
    let Some(peaks) = sections.next() else {
        return Err(ParseErrorKind::MissingSeparator.into());
    };
    if sections.next().is_some() {
        return Err(ParseErrorKind::ExtraSeparator.into());
    }

    let fields = base::all_tokens(fields, base::integers).map_err(integer_error)?;
    let fields: [i32; WAVE_FIELD_COUNT] =
        fields
            .try_into()
            .map_err(|fields: Vec<i32>| ParseErrorKind::FieldCount {
                record: "wave",
                expected: WAVE_FIELD_COUNT,
                found: fields.len(),
            })?;

    Ok(WaveFrameRecord::new(fields, parse_peaks(peaks)?))
}

fn parse_peaks(input: &str) -> Result<[HarmonicPeak; HARMONIC_PEAK_COUNT], LineError> {
    // every group is terminated by a comma, including the last one
    let mut groups: Vec<&str> = input.trim().split(',').collect();
    if groups.last().is_some_and(|g| g.trim().is_empty()) {
        groups.pop();
    }
    if groups.len() != HARMONIC_PEAK_COUNT {
        return Err(ShapeErrorKind::PeakCount(groups.len()).into());
    }

    let peaks = groups
        .into_iter()
        .enumerate()
        .map(|(peak, group)| -> Result<HarmonicPeak, LineError> {
            let components =
                base::all_tokens(group, base::reals).map_err(|token| ParseErrorKind::Number {
                    token,
                    expected: "real number",
                })?;
            let components: [f64; PEAK_COMPONENT_COUNT] =
                components
                    .try_into()
                    .map_err(|c: Vec<f64>| ShapeErrorKind::ComponentCount {
                        peak,
                        found: c.len(),
                    })?;
            Ok(HarmonicPeak::from_components(components))
        })
        .collect::<Result<Vec<_>, LineError>>()?;

    Ok(std::array::from_fn(|i| peaks[i]))
}

fn integer_error(token: String) -> ParseErrorKind {
    ParseErrorKind::Number {
        token,
        expected: "integer",
    }
}
