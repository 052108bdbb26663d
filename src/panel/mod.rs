//! Drawing surfaces and the panel layout drawn on them.
//!
//! The composer only talks to [`PlotSurface`] and [`PlotPanel`]. Both bundled
//! surfaces record the directives into [`RecordedPanel`]s; [`headless`] keeps
//! them for inspection, `bitmap` replays them through `plotters`.

#[cfg(feature = "render")]
pub mod bitmap;
mod compose;
pub mod headless;

pub use self::compose::{
    ComposeError, PHONEME_REGION, WAVE_REGION, column_edges, compose, peak_region,
    phoneme_labels,
};

use crate::matrix::TextColor;

/// Cell `index` of a `rows` × `cols` grid, counted row-major from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub rows: usize,
    pub cols: usize,
    pub index: usize,
}

impl Region {
    pub const fn new(rows: usize, cols: usize, index: usize) -> Self {
        Self { rows, cols, index }
    }

    pub fn is_valid(&self) -> bool {
        self.index < self.rows * self.cols
    }
}

/// One plotting region. Coordinates are data coordinates of the region.
pub trait PlotPanel {
    /// Draw `field[row][column]` (values in `[0, 1]`) as a color image.
    ///
    /// Column `c` spans `[x_edges[c], x_edges[c + 1])`, row `r` spans
    /// `[r - 0.5, r + 0.5]`.
    fn image(&mut self, field: &[Vec<f64>], x_edges: &[f64]);
    fn text(&mut self, x: f64, y: f64, text: &str, color: TextColor);
    /// Connected line; `series` selects the line color.
    fn line(&mut self, points: &[(f64, f64)], series: usize);
    fn x_ticks(&mut self, ticks: &[(f64, String)]);
    fn y_ticks(&mut self, ticks: &[(f64, String)]);
    fn x_label(&mut self, label: &str);
    fn y_label(&mut self, label: &str);
    fn x_limits(&mut self, min: f64, max: f64);
    /// Put the smallest y value at the top, as images are drawn.
    fn invert_y(&mut self);
}

/// A canvas holding several panels.
pub trait PlotSurface {
    type Panel: PlotPanel;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Canvas size in pixels.
    fn set_size(&mut self, width: u32, height: u32);
    /// Panel of `region`; asking twice for the same region returns the same panel.
    fn subplot(&mut self, region: Region) -> Result<&mut Self::Panel, Self::Error>;
    /// Hand the finished canvas over to the display or output.
    fn show(&mut self) -> Result<(), Self::Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("cell {} is outside of a {}x{} grid", .0.index, .0.rows, .0.cols)]
    RegionOutOfGrid(Region),
    #[error("canvas size was not set before showing")]
    SizeNotSet,
    #[error("surface was already shown")]
    AlreadyShown,
    #[error("plotting backend failed: {0}")]
    Backend(String),
}

/// Drawing request recorded by a [`RecordedPanel`].
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Image {
        field: Vec<Vec<f64>>,
        x_edges: Vec<f64>,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        color: TextColor,
    },
    Line {
        points: Vec<(f64, f64)>,
        series: usize,
    },
    XTicks(Vec<(f64, String)>),
    YTicks(Vec<(f64, String)>),
    XLabel(String),
    YLabel(String),
    XLimits(f64, f64),
    InvertY,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPanel {
    region: Region,
    directives: Vec<Directive>,
}

impl RecordedPanel {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            directives: Vec::new(),
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn lines(&self) -> impl Iterator<Item = (&[(f64, f64)], usize)> {
        self.directives.iter().filter_map(|d| match d {
            Directive::Line { points, series } => Some((points.as_slice(), *series)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = (f64, f64, &str, TextColor)> {
        self.directives.iter().filter_map(|d| match d {
            Directive::Text { x, y, text, color } => Some((*x, *y, text.as_str(), *color)),
            _ => None,
        })
    }

    pub fn recorded_image(&self) -> Option<(&[Vec<f64>], &[f64])> {
        self.directives.iter().find_map(|d| match d {
            Directive::Image { field, x_edges } => Some((field.as_slice(), x_edges.as_slice())),
            _ => None,
        })
    }

    /// The last tick set on the x axis.
    pub fn recorded_x_ticks(&self) -> Option<&[(f64, String)]> {
        self.directives.iter().rev().find_map(|d| match d {
            Directive::XTicks(ticks) => Some(ticks.as_slice()),
            _ => None,
        })
    }

    pub fn recorded_y_ticks(&self) -> Option<&[(f64, String)]> {
        self.directives.iter().rev().find_map(|d| match d {
            Directive::YTicks(ticks) => Some(ticks.as_slice()),
            _ => None,
        })
    }

    pub fn recorded_x_label(&self) -> Option<&str> {
        self.directives.iter().rev().find_map(|d| match d {
            Directive::XLabel(label) => Some(label.as_str()),
            _ => None,
        })
    }

    pub fn recorded_y_label(&self) -> Option<&str> {
        self.directives.iter().rev().find_map(|d| match d {
            Directive::YLabel(label) => Some(label.as_str()),
            _ => None,
        })
    }

    pub fn recorded_x_limits(&self) -> Option<(f64, f64)> {
        self.directives.iter().rev().find_map(|d| match d {
            Directive::XLimits(min, max) => Some((*min, *max)),
            _ => None,
        })
    }

    pub fn is_y_inverted(&self) -> bool {
        self.directives.contains(&Directive::InvertY)
    }
}

impl PlotPanel for RecordedPanel {
    fn image(&mut self, field: &[Vec<f64>], x_edges: &[f64]) {
        self.directives.push(Directive::Image {
            field: field.to_vec(),
            x_edges: x_edges.to_vec(),
        });
    }
    fn text(&mut self, x: f64, y: f64, text: &str, color: TextColor) {
        self.directives.push(Directive::Text {
            x,
            y,
            text: text.to_string(),
            color,
        });
    }
    fn line(&mut self, points: &[(f64, f64)], series: usize) {
        self.directives.push(Directive::Line {
            points: points.to_vec(),
            series,
        });
    }
    fn x_ticks(&mut self, ticks: &[(f64, String)]) {
        self.directives.push(Directive::XTicks(ticks.to_vec()));
    }
    fn y_ticks(&mut self, ticks: &[(f64, String)]) {
        self.directives.push(Directive::YTicks(ticks.to_vec()));
    }
    fn x_label(&mut self, label: &str) {
        self.directives.push(Directive::XLabel(label.to_string()));
    }
    fn y_label(&mut self, label: &str) {
        self.directives.push(Directive::YLabel(label.to_string()));
    }
    fn x_limits(&mut self, min: f64, max: f64) {
        self.directives.push(Directive::XLimits(min, max));
    }
    fn invert_y(&mut self) {
        if !self.is_y_inverted() {
            self.directives.push(Directive::InvertY);
        }
    }
}

/// Panel recorded for `region`, created on first use.
fn recorded_panel(
    panels: &mut Vec<RecordedPanel>,
    region: Region,
) -> Result<&mut RecordedPanel, SurfaceError> {
    if !region.is_valid() {
        return Err(SurfaceError::RegionOutOfGrid(region));
    }
    let index = match panels.iter().position(|p| p.region == region) {
        Some(index) => index,
        None => {
            panels.push(RecordedPanel::new(region));
            panels.len() - 1
        }
    };
    Ok(&mut panels[index])
}

#[cfg(test)]
mod tests {
    use super::{PlotPanel, RecordedPanel, Region, SurfaceError, recorded_panel};

    #[test]
    fn region_validity() {
        assert!(Region::new(4, 1, 0).is_valid());
        assert!(Region::new(8, 1, 7).is_valid());
        assert!(Region::new(2, 2, 3).is_valid());
        assert!(!Region::new(8, 1, 8).is_valid());
        assert!(!Region::new(0, 1, 0).is_valid());
    }

    #[test]
    fn draw_then_read_back() {
        let mut panel = RecordedPanel::new(Region::new(4, 1, 0));
        panel.image(&[vec![0.0, 1.0]], &[0.0, 0.5, 2.0]);
        panel.x_ticks(&[(0.0, "a".to_string())]);
        panel.y_ticks(&[(0.0, "length".to_string())]);
        panel.x_label("frame");
        panel.y_label("freq1");
        panel.x_limits(0.0, 2.0);
        panel.invert_y();
        panel.invert_y();

        assert_eq!(
            panel.recorded_image(),
            Some((&[vec![0.0, 1.0]][..], &[0.0, 0.5, 2.0][..]))
        );
        assert_eq!(panel.recorded_x_ticks(), Some(&[(0.0, "a".to_string())][..]));
        assert_eq!(
            panel.recorded_y_ticks(),
            Some(&[(0.0, "length".to_string())][..])
        );
        assert_eq!(panel.recorded_x_label(), Some("frame"));
        assert_eq!(panel.recorded_y_label(), Some("freq1"));
        assert_eq!(panel.recorded_x_limits(), Some((0.0, 2.0)));
        assert!(panel.is_y_inverted());
        assert_eq!(panel.directives().len(), 7);
    }

    #[test]
    fn same_region_same_panel() {
        let mut panels = Vec::new();
        recorded_panel(&mut panels, Region::new(4, 1, 0)).unwrap();
        recorded_panel(&mut panels, Region::new(8, 1, 4)).unwrap();
        recorded_panel(&mut panels, Region::new(4, 1, 0)).unwrap();
        assert_eq!(panels.len(), 2);

        assert!(matches!(
            recorded_panel(&mut panels, Region::new(4, 1, 4)),
            Err(SurfaceError::RegionOutOfGrid(_))
        ));
    }
}
