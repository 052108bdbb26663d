//! `plotters` rendering of recorded panels into a PNG or SVG file.

use std::ops::Range;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::matrix::TextColor;

use super::{Directive, PlotSurface, RecordedPanel, Region, SurfaceError, recorded_panel};

/// Writes the canvas to `path` on [`PlotSurface::show`]. A `.svg` extension
/// selects the vector backend, anything else is encoded as a bitmap.
#[derive(Debug, Clone)]
pub struct BitmapSurface {
    path: PathBuf,
    size: Option<(u32, u32)>,
    panels: Vec<RecordedPanel>,
}

impl BitmapSurface {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            size: None,
            panels: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_svg(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
    }
}

impl PlotSurface for BitmapSurface {
    type Panel = RecordedPanel;
    type Error = SurfaceError;

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
    }

    fn subplot(&mut self, region: Region) -> Result<&mut RecordedPanel, SurfaceError> {
        recorded_panel(&mut self.panels, region)
    }

    fn show(&mut self) -> Result<(), SurfaceError> {
        let size = self.size.ok_or(SurfaceError::SizeNotSet)?;
        if self.is_svg() {
            let root = SVGBackend::new(&self.path, size).into_drawing_area();
            draw_panels(&root, &self.panels)?;
            root.present().map_err(backend)?;
        } else {
            let root = BitMapBackend::new(&self.path, size).into_drawing_area();
            draw_panels(&root, &self.panels)?;
            root.present().map_err(backend)?;
        }
        tracing::info!(path = %self.path.display(), width = size.0, height = size.1, "plot written");
        Ok(())
    }
}

fn backend<E: std::fmt::Display>(err: E) -> SurfaceError {
    SurfaceError::Backend(err.to_string())
}

fn draw_panels<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    panels: &[RecordedPanel],
) -> Result<(), SurfaceError> {
    root.fill(&WHITE).map_err(backend)?;
    for panel in panels {
        let region = panel.region();
        let area = root
            .split_evenly((region.rows, region.cols))
            .into_iter()
            .nth(region.index)
            .ok_or(SurfaceError::RegionOutOfGrid(region))?;
        draw_panel(root, &area, panel)?;
    }
    Ok(())
}

/// Axis ranges and labels of one panel, gathered from its directives.
struct Frame {
    x: Range<f64>,
    y: Range<f64>,
    inverted: bool,
}

impl Frame {
    fn of(panel: &RecordedPanel) -> Self {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        let mut image_rows = None;
        for directive in panel.directives() {
            match directive {
                Directive::Image { field, x_edges } => {
                    xs.extend(x_edges.iter().copied());
                    image_rows = Some(field.len());
                }
                Directive::Line { points, .. } => {
                    for &(x, y) in points {
                        xs.push(x);
                        ys.push(y);
                    }
                }
                Directive::YTicks(ticks) => ys.extend(ticks.iter().map(|&(y, _)| y)),
                _ => {}
            }
        }

        let x = match panel.recorded_x_limits() {
            Some((min, max)) => widen(min..max),
            None => widen(span(&xs).unwrap_or(0.0..1.0)),
        };
        let y = match image_rows {
            Some(rows) => -0.5..rows as f64 - 0.5,
            None => match span(&ys) {
                Some(y) => {
                    let pad = (y.end - y.start) * 0.05;
                    widen(y.start - pad..y.end + pad)
                }
                None => 0.0..1.0,
            },
        };
        Self {
            x,
            y,
            inverted: panel.is_y_inverted(),
        }
    }

    /// Data y to the y drawn on the chart.
    fn y(&self, y: f64) -> f64 {
        if self.inverted {
            self.y.start + self.y.end - y
        } else {
            y
        }
    }
}

fn span(values: &[f64]) -> Option<Range<f64>> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let min = finite.clone().reduce(f64::min)?;
    let max = finite.reduce(f64::max)?;
    Some(min..max)
}

fn widen(range: Range<f64>) -> Range<f64> {
    if range.end > range.start {
        range
    } else {
        range.start - 0.5..range.start + 0.5
    }
}

fn draw_panel<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    area: &DrawingArea<DB, Shift>,
    panel: &RecordedPanel,
) -> Result<(), SurfaceError> {
    let frame = Frame::of(panel);
    let y_label_area = if panel.recorded_y_ticks().is_some() { 140 } else { 60 };
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(y_label_area)
        .build_cartesian_2d(frame.x.clone(), frame.y.clone())
        .map_err(backend)?;

    let blank = |_: &f64| String::new();
    {
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh();
        // custom tick labels are drawn after the series
        if panel.recorded_x_ticks().is_some() {
            mesh.x_label_formatter(&blank);
        }
        if panel.recorded_y_ticks().is_some() {
            mesh.y_label_formatter(&blank);
        }
        if let Some(label) = panel.recorded_x_label() {
            mesh.x_desc(label);
        }
        if let Some(label) = panel.recorded_y_label() {
            mesh.y_desc(label);
        }
        mesh.draw().map_err(backend)?;
    }

    for directive in panel.directives() {
        match directive {
            Directive::Image { field, x_edges } => {
                for (row, values) in field.iter().enumerate() {
                    let y = frame.y(row as f64);
                    let cells = values.iter().zip(x_edges.windows(2)).map(|(&v, edge)| {
                        Rectangle::new([(edge[0], y - 0.5), (edge[1], y + 0.5)], heat(v).filled())
                    });
                    chart.draw_series(cells).map_err(backend)?;
                }
            }
            Directive::Text { x, y, text, color } => {
                let color = match color {
                    TextColor::Black => &BLACK,
                    TextColor::White => &WHITE,
                };
                let style = TextStyle::from(("sans-serif", 11).into_font())
                    .color(color)
                    .pos(Pos::new(HPos::Center, VPos::Center));
                chart
                    .draw_series(std::iter::once(Text::new(
                        text.clone(),
                        (*x, frame.y(*y)),
                        style,
                    )))
                    .map_err(backend)?;
            }
            Directive::Line { points, series } => {
                let points = points.iter().map(|&(x, y)| (x, frame.y(y)));
                chart
                    .draw_series(LineSeries::new(points, &Palette99::pick(*series)))
                    .map_err(backend)?;
            }
            _ => {}
        }
    }

    let font = ("sans-serif", 12).into_font();
    if let Some(ticks) = panel.recorded_x_ticks() {
        let style = TextStyle::from(font.clone())
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Top));
        for (x, label) in ticks {
            let (px, py) = chart.backend_coord(&(*x, frame.y.start));
            root.draw_text(label, &style, (px, py + 4)).map_err(backend)?;
        }
    }
    if let Some(ticks) = panel.recorded_y_ticks() {
        let style = TextStyle::from(font)
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));
        for (y, label) in ticks {
            let (px, py) = chart.backend_coord(&(frame.x.start, frame.y(*y)));
            root.draw_text(label, &style, (px - 6, py)).map_err(backend)?;
        }
    }
    Ok(())
}

const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// Color of a normalized value, dark for 0 and bright for 1.
fn heat(value: f64) -> RGBColor {
    let value = if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let scaled = value * (VIRIDIS.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let t = scaled - i as f64;
    let (a, b) = (VIRIDIS[i], VIRIDIS[i + 1]);
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}
