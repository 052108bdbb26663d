//! Plot settings, read from a TOML file.
//!
//! Every key is optional:
//!
//! ```toml
//! width = 1500
//! height = 2000
//! scale = "duration"        # or "index"
//! zero_peak = "zero"        # or "reject"
//! phoneme_labels = ["_", "h", "@", "l", "oU"]
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::matrix::ZeroPeakPolicy;
use crate::record::{
    PEAK_COMPONENT_COUNT, PEAK_COMPONENT_NAMES, PHONEME_FIELD_COUNT, PHONEME_FIELD_NAMES,
    WAVE_FIELD_COUNT, WAVE_FIELD_NAMES,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{key} needs {expected} names, got {found}")]
    NameCount {
        key: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("canvas size {width}x{height} has a zero side")]
    EmptyCanvas { width: u32, height: u32 },
}

/// Horizontal layout of the phoneme heatmap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "binary", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum AxisScale {
    /// Each phoneme is as wide as its length field.
    #[default]
    Duration,
    /// Each phoneme is one unit wide.
    Index,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlotConfig {
    #[serde(default = "PlotConfig::default_width")]
    pub width: u32,
    #[serde(default = "PlotConfig::default_height")]
    pub height: u32,
    #[serde(default)]
    pub scale: AxisScale,
    #[serde(default)]
    pub zero_peak: ZeroPeakPolicy,
    /// Tick labels of the phoneme columns. Decoded mnemonics are used when unset.
    #[serde(default)]
    pub phoneme_labels: Option<Vec<String>>,
    #[serde(default = "PlotConfig::default_phoneme_features")]
    pub phoneme_features: Vec<String>,
    #[serde(default = "PlotConfig::default_wave_features")]
    pub wave_features: Vec<String>,
    #[serde(default = "PlotConfig::default_peak_components")]
    pub peak_components: Vec<String>,
}

impl PlotConfig {
    fn default_width() -> u32 {
        1500
    }
    fn default_height() -> u32 {
        2000
    }
    fn default_phoneme_features() -> Vec<String> {
        to_strings(&PHONEME_FIELD_NAMES)
    }
    fn default_wave_features() -> Vec<String> {
        to_strings(&WAVE_FIELD_NAMES)
    }
    fn default_peak_components() -> Vec<String> {
        to_strings(&PEAK_COMPONENT_NAMES)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), scale = ?config.scale, "loaded plot config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyCanvas {
                width: self.width,
                height: self.height,
            });
        }
        check_count("phoneme_features", &self.phoneme_features, PHONEME_FIELD_COUNT)?;
        check_count("wave_features", &self.wave_features, WAVE_FIELD_COUNT)?;
        check_count("peak_components", &self.peak_components, PEAK_COMPONENT_COUNT)?;
        Ok(())
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            height: Self::default_height(),
            scale: AxisScale::default(),
            zero_peak: ZeroPeakPolicy::default(),
            phoneme_labels: None,
            phoneme_features: Self::default_phoneme_features(),
            wave_features: Self::default_wave_features(),
            peak_components: Self::default_peak_components(),
        }
    }
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn check_count(key: &'static str, names: &[String], expected: usize) -> Result<(), ConfigError> {
    if names.len() == expected {
        Ok(())
    } else {
        Err(ConfigError::NameCount {
            key,
            expected,
            found: names.len(),
        })
    }
}
