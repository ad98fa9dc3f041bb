//! History graph overlay
//!
//! A translucent panel in the bottom-left corner with one polyline per series.
//! The x axis spans the full buffer capacity so the graph fills left to right
//! and then scrolls.

use glam::DVec2;

use super::Surface;
use super::vertex::colors;
use crate::Bounds;
use crate::consts::{OVERLAY_GAP, OVERLAY_HEIGHT, OVERLAY_WIDTH};
use crate::sim::{History, HistoryBuffer};

/// Placement of the graph panel on a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLayout {
    /// Top-left corner of the panel
    pub origin: DVec2,
    pub size: DVec2,
    /// Inner padding and distance from the surface edge
    pub gap: f64,
}

impl OverlayLayout {
    pub fn for_surface(bounds: Bounds) -> Self {
        Self {
            origin: DVec2::new(OVERLAY_GAP, bounds.height - OVERLAY_HEIGHT - OVERLAY_GAP),
            size: DVec2::new(OVERLAY_WIDTH, OVERLAY_HEIGHT),
            gap: OVERLAY_GAP,
        }
    }

    /// Bottom-left of the plot area (0% at time zero)
    pub fn plot_origin(&self) -> DVec2 {
        DVec2::new(self.origin.x + self.gap, self.origin.y + self.size.y - self.gap)
    }

    pub fn plot_size(&self) -> DVec2 {
        self.size - DVec2::splat(2.0 * self.gap)
    }

    /// Map samples to surface points, oldest at the left
    pub fn series_points(&self, buffer: &HistoryBuffer) -> Vec<DVec2> {
        let origin = self.plot_origin();
        let plot = self.plot_size();
        let step = plot.x / (buffer.capacity().saturating_sub(1).max(1)) as f64;

        buffer
            .iter()
            .enumerate()
            .map(|(i, percent)| {
                let y = percent.clamp(0.0, 100.0) / 100.0 * plot.y;
                DVec2::new(origin.x + step * i as f64, origin.y - y)
            })
            .collect()
    }
}

pub fn draw<S: Surface + ?Sized>(surface: &mut S, layout: &OverlayLayout, history: &History) {
    surface.fill_rect(layout.origin, layout.size, colors::OVERLAY_PANEL);

    for (buffer, color) in [
        (&history.infected, colors::GRAPH_INFECTED),
        (&history.recovered, colors::GRAPH_RECOVERED),
        (&history.deceased, colors::GRAPH_DECEASED),
    ] {
        if buffer.len() < 2 {
            continue;
        }
        let points = layout.series_points(buffer);
        surface.polyline(&points, color);
    }
}
