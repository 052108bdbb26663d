//! Visualize the per-phoneme and per-frame synthesis parameters that eSpeak NG
//! prints in its debug output.
//!
//! ```no_run
//! use phontrace::config::PlotConfig;
//! use phontrace::panel::{compose, headless::HeadlessSurface};
//! use phontrace::trace::Trace;
//!
//! let config = PlotConfig::default();
//! let trace = Trace::load("espeak-debug.log", config.zero_peak)?;
//! let mut surface = HeadlessSurface::default();
//! compose(&mut surface, &trace, &config)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod coordinate;
pub mod matrix;
pub mod panel;
pub mod parser;
pub mod reader;
pub mod record;
pub mod trace;

#[cfg(test)]
mod tests {
    use crate::record::{HARMONIC_PEAK_COUNT, PHONEME_FIELD_COUNT, WAVE_FIELD_COUNT};

    /// Three phonemes `_ e l` with lengths 2, 3 and 5, and two wave frames.
    pub const SAMPLE_LOG: &str = "\
Translate 'el'
  1  el        [El]

p: 1 12 4 0 4 0 2 0 2 5 20 1 100 140 60 3352 2 | 95 0 0 0 0 0 0 0 0
p: 0 34 4 1 4 2 3 1 2 0 24 0 120 150 80 3408 5 | 101 8 1 34 2 0 0 80 0
wave: 64 1200 0 30 110 20 5 | 500.0 10.0 2.0 3.0,1500.0 8.0 2.5 3.5,2500.0 6.0 3.0 4.0,3500.0 4.0 3.5 4.5,4500.0 2.0 4.0 5.0,5500.0 1.0 4.5 5.5,
p: 0 41 2 2 1 0 5 2 4 0 18 0 90 110 70 3520 4 | 108 0 2 41 4 0 0 70 0
wave: 48 1180 64 28 105 18 7 | 520.0 11.0 2.0 3.0,1480.0 7.5 2.5 3.5,2450.0 6.5 3.0 4.0,3550.0 4.5 3.5 4.5,4400.0 2.5 4.0 5.0,5600.0 1.5 4.5 65.5,
";

    /// `p:` line carrying `fields`, with the table entry of phoneme `a`.
    pub fn phoneme_line(fields: &[i32; PHONEME_FIELD_COUNT]) -> String {
        let fields: Vec<String> = fields.iter().map(i32::to_string).collect();
        format!("p: {} | 97 0 0 0 0 0 0 0 0", fields.join(" "))
    }

    /// `wave:` line whose field `i` is `k + 10 i` and whose peak `p` sits at
    /// `1000 k + 100 p` Hz with a left width of `(p + 2) / 2`.
    pub fn wave_line(k: usize) -> String {
        let fields: Vec<String> = (0..WAVE_FIELD_COUNT)
            .map(|i| (k + 10 * i).to_string())
            .collect();
        let peaks: String = (0..HARMONIC_PEAK_COUNT)
            .map(|p| {
                format!(
                    "{:.1} {:.1} {:.2} {:.2},",
                    (1000 * k + 100 * p) as f64,
                    (10 * p + k) as f64,
                    0.5 * (p + 2) as f64,
                    p as f64 + 0.25,
                )
            })
            .collect();
        format!("wave: {} | {}", fields.join(" "), peaks)
    }
}
