//! Layout of the diagnostic panels.
//!
//! ```text
//! 4x1 row 0  A  phoneme parameters, normalized heatmap with raw values
//! 4x1 row 1  B  wave frame parameters, one offset line per field
//! 8x1 row 4  C  peak frequencies
//! 8x1 row 5  D  peak heights
//! 8x1 row 6  E  peak left widths
//! 8x1 row 7  F  peak right widths
//! ```

use crate::config::{AxisScale, PlotConfig};
use crate::coordinate::CoordinateMap;
use crate::matrix::contrast_color;
use crate::record::{
    PEAK_COMPONENT_COUNT, PHONEME_FIELD_COUNT, PeakComponent, WAVE_FIELD_COUNT,
    peak_trajectories,
};
use crate::trace::Trace;

use super::{PlotPanel, PlotSurface, Region};

pub const PHONEME_REGION: Region = Region::new(4, 1, 0);
pub const WAVE_REGION: Region = Region::new(4, 1, 1);

/// Strip of one peak component, in [`PeakComponent::ALL`] order.
pub const fn peak_region(component: PeakComponent) -> Region {
    Region::new(8, 1, 4 + component as usize)
}

type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("{key} needs {expected} names, got {found}")]
    NameCount {
        key: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("plot surface failed: {0}")]
    Surface(#[source] BoxedError),
}

fn surface_error<E: std::error::Error + Send + Sync + 'static>(err: E) -> ComposeError {
    ComposeError::Surface(Box::new(err))
}

/// Draw every panel of `trace` onto `surface` and show it.
pub fn compose<S: PlotSurface>(
    surface: &mut S,
    trace: &Trace,
    config: &PlotConfig,
) -> Result<(), ComposeError> {
    check_names("phoneme_features", &config.phoneme_features, PHONEME_FIELD_COUNT)?;
    check_names("wave_features", &config.wave_features, WAVE_FIELD_COUNT)?;
    check_names("peak_components", &config.peak_components, PEAK_COMPONENT_COUNT)?;

    surface.set_size(config.width, config.height);

    let panel = surface.subplot(PHONEME_REGION).map_err(surface_error)?;
    phoneme_panel(panel, trace, config);

    let panel = surface.subplot(WAVE_REGION).map_err(surface_error)?;
    wave_panel(panel, trace, config);

    for component in PeakComponent::ALL {
        let panel = surface
            .subplot(peak_region(component))
            .map_err(surface_error)?;
        peak_panel(panel, trace, component, &config.peak_components[component.index()]);
        if component == PeakComponent::RightWidth {
            panel.x_label("frame");
        }
    }

    tracing::debug!(
        phonemes = trace.phonemes().len(),
        frames = trace.frames().len(),
        "panels composed"
    );
    surface.show().map_err(surface_error)
}

fn check_names(key: &'static str, names: &[String], expected: usize) -> Result<(), ComposeError> {
    if names.len() == expected {
        Ok(())
    } else {
        Err(ComposeError::NameCount {
            key,
            expected,
            found: names.len(),
        })
    }
}

/// Column boundaries of the phoneme heatmap on the shared index axis.
///
/// Under [`AxisScale::Duration`] the edges are the map's normalized edges
/// stretched over `[0, len]`, so the first `len` of them sit on the tick
/// positions and the last one is exactly `len`.
pub fn column_edges(map: &CoordinateMap, scale: AxisScale) -> Vec<f64> {
    let n = map.len() as f64;
    match scale {
        AxisScale::Index => (0..=map.len()).map(|i| i as f64).collect(),
        AxisScale::Duration => {
            let total = map.total();
            map.edges().iter().map(|edge| edge / total * n).collect()
        }
    }
}

/// One label per phoneme: configured labels, else mnemonics, else the index.
pub fn phoneme_labels(trace: &Trace, config: &PlotConfig) -> Vec<String> {
    let n = trace.phonemes().len();
    match &config.phoneme_labels {
        Some(labels) => {
            if labels.len() > n {
                tracing::warn!(
                    labels = labels.len(),
                    phonemes = n,
                    "more phoneme labels than phonemes, extra labels ignored"
                );
            }
            (0..n)
                .map(|i| labels.get(i).cloned().unwrap_or_default())
                .collect()
        }
        None => trace
            .phonemes()
            .iter()
            .enumerate()
            .map(|(i, phoneme)| {
                phoneme
                    .mnemonic()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| i.to_string())
            })
            .collect(),
    }
}

fn phoneme_panel<P: PlotPanel>(panel: &mut P, trace: &Trace, config: &PlotConfig) {
    let x_edges = column_edges(trace.map(), config.scale);
    let raw = trace.phoneme_matrix();
    let maxima = raw.row_maxima();

    panel.image(trace.phoneme_normalized().rows(), &x_edges);
    for (row, values) in raw.rows().iter().enumerate() {
        let max = maxima[row].unwrap_or(0.0);
        for (column, &value) in values.iter().enumerate() {
            let x = (x_edges[column] + x_edges[column + 1]) / 2.0;
            panel.text(
                x,
                row as f64,
                &format!("{}", value as i64),
                contrast_color(value, max),
            );
        }
    }

    let y_ticks: Vec<(f64, String)> = config
        .phoneme_features
        .iter()
        .enumerate()
        .map(|(row, name)| (row as f64, name.clone()))
        .collect();
    panel.y_ticks(&y_ticks);

    let x_ticks: Vec<(f64, String)> = x_edges
        .iter()
        .copied()
        .zip(phoneme_labels(trace, config))
        .collect();
    panel.x_ticks(&x_ticks);
    panel.x_limits(0.0, trace.map().len() as f64);
    panel.invert_y();
}

fn wave_panel<P: PlotPanel>(panel: &mut P, trace: &Trace, config: &PlotConfig) {
    for (row, values) in trace.wave_normalized().rows().iter().enumerate() {
        let points: Vec<(f64, f64)> = values
            .iter()
            .enumerate()
            .map(|(frame, value)| (frame as f64, value + row as f64))
            .collect();
        panel.line(&points, row);
    }

    let y_ticks: Vec<(f64, String)> = config
        .wave_features
        .iter()
        .enumerate()
        .map(|(row, name)| (row as f64 + 0.5, name.clone()))
        .collect();
    panel.y_ticks(&y_ticks);
    panel.x_limits(0.0, trace.frames().len() as f64);
}

fn peak_panel<P: PlotPanel>(panel: &mut P, trace: &Trace, component: PeakComponent, name: &str) {
    for (peak, values) in peak_trajectories(trace.frames(), component)
        .iter()
        .enumerate()
    {
        let points: Vec<(f64, f64)> = values
            .iter()
            .enumerate()
            .map(|(frame, &value)| (frame as f64, value))
            .collect();
        panel.line(&points, peak);
    }
    panel.y_label(name);
    panel.x_limits(0.0, trace.frames().len() as f64);
}
