//! Typed rows of the debug printout.
//!
//! Field order follows the order in which eSpeak prints them, which is also
//! the row order of the feature matrices built from these records.

/// Number of integer fields on a `p:` line.
pub const PHONEME_FIELD_COUNT: usize = 17;
/// Number of integer fields on a `wave:` line.
pub const WAVE_FIELD_COUNT: usize = 7;
/// Number of harmonic peaks printed per wave frame.
pub const HARMONIC_PEAK_COUNT: usize = 6;
/// Number of components describing one harmonic peak.
pub const PEAK_COMPONENT_COUNT: usize = 4;

/// Row index of [`PhonemeRecord::length`], used as the column width of each phoneme.
pub const LENGTH_FIELD: usize = 6;

pub const PHONEME_FIELD_NAMES: [&str; PHONEME_FIELD_COUNT] = [
    "synthflags",
    "phcode",
    "stresslevel",
    "sourceix",
    "wordstress",
    "tone_ph",
    "length",
    "env",
    "type",
    "prepause",
    "amp",
    "newword",
    "pitch1",
    "pitch2",
    "std_length",
    "phontab_addr",
    "sound_param",
];

pub const WAVE_FIELD_NAMES: [&str; WAVE_FIELD_COUNT] = [
    "samplecount",
    "phaseinc",
    "samplecount_start",
    "wdata.amplitude",
    "wdata.pitch",
    "wdata.amplitude_fmt",
    "flutter_amp",
];

pub const PEAK_COMPONENT_NAMES: [&str; PEAK_COMPONENT_COUNT] =
    ["freq1", "height1", "left1", "right1"];

/// Something that can be laid out as one column of a feature matrix.
pub trait FeatureRow {
    const FIELD_COUNT: usize;

    fn feature_values(&self) -> Vec<f64>;
}

/// Synthesis control parameters of one phoneme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonemeRecord {
    pub synth_flags: i32,
    pub phoneme_code: i32,
    pub stress_level: i32,
    pub source_index: i32,
    pub word_stress: i32,
    pub tone_phoneme: i32,
    pub length: i32,
    pub envelope: i32,
    pub kind: i32,
    pub pre_pause: i32,
    pub amplitude: i32,
    pub is_new_word: i32,
    pub pitch1: i32,
    pub pitch2: i32,
    pub std_length: i32,
    pub phoneme_table_address: i32,
    pub sound_param: i32,
    /// Phoneme table data printed after the `|`, when it could be decoded.
    pub table: Option<PhonemeTableEntry>,
}

impl PhonemeRecord {
    pub fn from_fields(fields: [i32; PHONEME_FIELD_COUNT]) -> Self {
        let [
            synth_flags,
            phoneme_code,
            stress_level,
            source_index,
            word_stress,
            tone_phoneme,
            length,
            envelope,
            kind,
            pre_pause,
            amplitude,
            is_new_word,
            pitch1,
            pitch2,
            std_length,
            phoneme_table_address,
            sound_param,
        ] = fields;
        Self {
            synth_flags,
            phoneme_code,
            stress_level,
            source_index,
            word_stress,
            tone_phoneme,
            length,
            envelope,
            kind,
            pre_pause,
            amplitude,
            is_new_word,
            pitch1,
            pitch2,
            std_length,
            phoneme_table_address,
            sound_param,
            table: None,
        }
    }

    pub fn with_table(mut self, table: Option<PhonemeTableEntry>) -> Self {
        self.table = table;
        self
    }

    pub fn fields(&self) -> [i32; PHONEME_FIELD_COUNT] {
        [
            self.synth_flags,
            self.phoneme_code,
            self.stress_level,
            self.source_index,
            self.word_stress,
            self.tone_phoneme,
            self.length,
            self.envelope,
            self.kind,
            self.pre_pause,
            self.amplitude,
            self.is_new_word,
            self.pitch1,
            self.pitch2,
            self.std_length,
            self.phoneme_table_address,
            self.sound_param,
        ]
    }

    /// Phoneme symbol decoded from the phoneme table, if present.
    pub fn mnemonic(&self) -> Option<String> {
        self.table.as_ref().map(PhonemeTableEntry::mnemonic_str)
    }
}

impl FeatureRow for PhonemeRecord {
    const FIELD_COUNT: usize = PHONEME_FIELD_COUNT;

    fn feature_values(&self) -> Vec<f64> {
        self.fields().iter().map(|&v| v as f64).collect()
    }
}

/// Phoneme table fields printed after the `|` of a `p:` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonemeTableEntry {
    /// Up to four ASCII bytes, least significant first.
    pub mnemonic: u32,
    pub flags: u32,
    pub program: u32,
    pub code: u32,
    pub kind: u32,
    pub start_type: u32,
    pub end_type: u32,
    pub std_length: u32,
    pub length_mod: u32,
}

impl PhonemeTableEntry {
    pub const FIELD_COUNT: usize = 9;

    pub fn from_fields(fields: [u32; Self::FIELD_COUNT]) -> Self {
        let [
            mnemonic,
            flags,
            program,
            code,
            kind,
            start_type,
            end_type,
            std_length,
            length_mod,
        ] = fields;
        Self {
            mnemonic,
            flags,
            program,
            code,
            kind,
            start_type,
            end_type,
            std_length,
            length_mod,
        }
    }

    pub fn mnemonic_str(&self) -> String {
        self.mnemonic
            .to_le_bytes()
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .collect()
    }
}

/// Waveform generator state of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveFrameRecord {
    pub sample_count: i32,
    pub phase_increment: i32,
    pub sample_count_start: i32,
    pub wave_amplitude: i32,
    pub wave_pitch: i32,
    pub wave_amplitude_format: i32,
    pub flutter_amplitude: i32,
    pub peaks: [HarmonicPeak; HARMONIC_PEAK_COUNT],
}

impl WaveFrameRecord {
    pub fn new(
        fields: [i32; WAVE_FIELD_COUNT],
        peaks: [HarmonicPeak; HARMONIC_PEAK_COUNT],
    ) -> Self {
        let [
            sample_count,
            phase_increment,
            sample_count_start,
            wave_amplitude,
            wave_pitch,
            wave_amplitude_format,
            flutter_amplitude,
        ] = fields;
        Self {
            sample_count,
            phase_increment,
            sample_count_start,
            wave_amplitude,
            wave_pitch,
            wave_amplitude_format,
            flutter_amplitude,
            peaks,
        }
    }

    pub fn fields(&self) -> [i32; WAVE_FIELD_COUNT] {
        [
            self.sample_count,
            self.phase_increment,
            self.sample_count_start,
            self.wave_amplitude,
            self.wave_pitch,
            self.wave_amplitude_format,
            self.flutter_amplitude,
        ]
    }
}

impl FeatureRow for WaveFrameRecord {
    const FIELD_COUNT: usize = WAVE_FIELD_COUNT;

    fn feature_values(&self) -> Vec<f64> {
        self.fields().iter().map(|&v| v as f64).collect()
    }
}

/// One formant-like spectral peak of a wave frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HarmonicPeak {
    pub frequency: f64,
    pub height: f64,
    pub left_width: f64,
    pub right_width: f64,
}

impl HarmonicPeak {
    pub fn from_components([frequency, height, left_width, right_width]: [f64; 4]) -> Self {
        Self {
            frequency,
            height,
            left_width,
            right_width,
        }
    }

    pub fn component(&self, component: PeakComponent) -> f64 {
        match component {
            PeakComponent::Frequency => self.frequency,
            PeakComponent::Height => self.height,
            PeakComponent::LeftWidth => self.left_width,
            PeakComponent::RightWidth => self.right_width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeakComponent {
    Frequency,
    Height,
    LeftWidth,
    RightWidth,
}

impl PeakComponent {
    pub const ALL: [PeakComponent; PEAK_COMPONENT_COUNT] = [
        Self::Frequency,
        Self::Height,
        Self::LeftWidth,
        Self::RightWidth,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Trajectory of one peak component across frames, one vector per peak.
pub fn peak_trajectories(
    frames: &[WaveFrameRecord],
    component: PeakComponent,
) -> [Vec<f64>; HARMONIC_PEAK_COUNT] {
    std::array::from_fn(|peak| {
        frames
            .iter()
            .map(|frame| frame.peaks[peak].component(component))
            .collect()
    })
}
