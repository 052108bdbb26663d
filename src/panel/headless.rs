//! Surface that keeps the recorded panels in memory instead of drawing them.

use super::{PlotSurface, RecordedPanel, Region, SurfaceError, recorded_panel};

#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    size: Option<(u32, u32)>,
    panels: Vec<RecordedPanel>,
    shown: bool,
}

impl HeadlessSurface {
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }
    /// Panels in the order they were first requested.
    pub fn panels(&self) -> &[RecordedPanel] {
        &self.panels
    }
    pub fn panel(&self, region: Region) -> Option<&RecordedPanel> {
        self.panels.iter().find(|p| p.region() == region)
    }
    pub fn is_shown(&self) -> bool {
        self.shown
    }
}

impl PlotSurface for HeadlessSurface {
    type Panel = RecordedPanel;
    type Error = SurfaceError;

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
    }

    fn subplot(&mut self, region: Region) -> Result<&mut RecordedPanel, SurfaceError> {
        if self.shown {
            return Err(SurfaceError::AlreadyShown);
        }
        recorded_panel(&mut self.panels, region)
    }

    fn show(&mut self) -> Result<(), SurfaceError> {
        if self.shown {
            return Err(SurfaceError::AlreadyShown);
        }
        self.shown = true;
        tracing::debug!(panels = self.panels.len(), "headless surface shown");
        Ok(())
    }
}
