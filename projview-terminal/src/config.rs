/// Viewer configuration and screen layout
use std::time::Duration;

use projview_core::{Camera, OrthoView};

use crate::surface::PaneRect;

/// Runtime settings for the terminal viewer
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Target frames per second
    pub fps: u32,
    /// Fraction of the terminal width used by the perspective view
    pub main_fraction: f32,
    /// Size of each orthographic pane in cells, title row included
    pub ortho_pane: (u16, u16),
    /// Half width of the orthographic frustum in world units
    pub ortho_half_extent: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            main_fraction: 0.5,
            ortho_pane: (24, 12),
            ortho_half_extent: Camera::ORTHO_HALF_EXTENT,
        }
    }
}

impl ViewerConfig {
    pub fn frame_time(&self) -> Duration {
        Duration::from_millis(1000 / self.fps.max(1) as u64)
    }
}

/// Where each pane sits on the terminal
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub main: PaneRect,
    pub ortho: Vec<(OrthoView, PaneRect)>,
    /// Parameter and matrix readout
    pub panel: PaneRect,
}

impl Layout {
    /// Row 0 is the header and the last row the status line. The main view
    /// fills the left part; the orthographic panes flow left to right and
    /// wrap on the right, followed by the readout panel.
    pub fn compute(cols: u16, rows: u16, config: &ViewerConfig) -> Self {
        let body_rows = rows.saturating_sub(2);
        let main_width = ((cols as f32 * config.main_fraction.clamp(0.1, 0.9)) as u16).max(1);
        let main = PaneRect::new(0, 1, main_width, body_rows);

        let (pane_w, pane_h) = config.ortho_pane;
        let right_x = main_width.saturating_add(1);
        let right_width = cols.saturating_sub(right_x);
        let stride = pane_w.saturating_add(1);
        let per_row = (right_width.saturating_add(1) / stride).max(1);

        let ortho = OrthoView::ALL
            .iter()
            .enumerate()
            .map(|(i, view)| {
                let i = i as u16;
                let x = right_x.saturating_add((i % per_row).saturating_mul(stride));
                let y = (i / per_row).saturating_mul(pane_h).saturating_add(1);
                (*view, PaneRect::new(x, y, pane_w, pane_h))
            })
            .collect::<Vec<_>>();

        let pane_rows = (OrthoView::ALL.len() as u16).div_ceil(per_row);
        let panel_y = pane_rows.saturating_mul(pane_h).saturating_add(1);
        let panel = PaneRect::new(
            right_x,
            panel_y,
            right_width.max(1),
            rows.saturating_sub(1).saturating_sub(panel_y).max(1),
        );

        Self { main, ortho, panel }
    }
}
