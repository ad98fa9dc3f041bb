//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list so one buffer and one draw call
//! cover a whole frame.

use glam::DVec2;
use std::f64::consts::TAU;

use super::Surface;
use super::vertex::{Color, Vertex};

/// Width of overlay graph lines
pub const LINE_WIDTH: f64 = 1.0;

#[inline]
fn vertex(p: DVec2, color: Color) -> Vertex {
    Vertex::new(p.x as f32, p.y as f32, color)
}

/// Filled circle as a fan of `segments` triangles
pub fn circle(out: &mut Vec<Vertex>, center: DVec2, radius: f64, color: Color, segments: u32) {
    let segments = segments.max(3);
    let step = TAU / segments as f64;
    for i in 0..segments {
        let a0 = step * i as f64;
        let a1 = step * (i + 1) as f64;
        out.push(vertex(center, color));
        out.push(vertex(center + DVec2::from_angle(a0) * radius, color));
        out.push(vertex(center + DVec2::from_angle(a1) * radius, color));
    }
}

/// Axis-aligned rectangle as two triangles
pub fn rect(out: &mut Vec<Vertex>, origin: DVec2, size: DVec2, color: Color) {
    let a = origin;
    let b = origin + DVec2::new(size.x, 0.0);
    let c = origin + size;
    let d = origin + DVec2::new(0.0, size.y);
    out.extend([a, b, c, c, d, a].map(|p| vertex(p, color)));
}

/// Polyline as one quad per segment
pub fn polyline(out: &mut Vec<Vertex>, points: &[DVec2], width: f64, color: Color) {
    let half = width * 0.5;
    for pair in points.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);
        let dir = (p2 - p1).normalize_or_zero();
        let perp = dir.perp() * half;

        let v1a = p1 + perp;
        let v1b = p1 - perp;
        let v2a = p2 + perp;
        let v2b = p2 - perp;
        out.extend([v1a, v1b, v2a, v2a, v1b, v2b].map(|p| vertex(p, color)));
    }
}

/// A `Surface` that records a frame as a triangle list for GPU upload
#[derive(Debug, Clone)]
pub struct VertexSurface {
    width: u32,
    height: u32,
    vertices: Vec<Vertex>,
}

impl VertexSurface {
    /// Triangles per agent circle
    pub const CIRCLE_SEGMENTS: u32 = 8;

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            vertices: Vec::new(),
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Packed vertex data ready for a vertex buffer
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

impl Surface for VertexSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.vertices.clear();
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color) {
        circle(&mut self.vertices, center, radius, color, Self::CIRCLE_SEGMENTS);
    }

    fn polyline(&mut self, points: &[DVec2], color: Color) {
        polyline(&mut self.vertices, points, LINE_WIDTH, color);
    }

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: Color) {
        rect(&mut self.vertices, origin, size, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::colors;

    #[test]
    fn test_circle_vertices_on_radius() {
        let mut out = Vec::new();
        circle(&mut out, DVec2::new(10.0, 10.0), 2.0, colors::INFECTED, 6);
        assert_eq!(out.len(), 18);
        for tri in out.chunks(3) {
            assert_eq!(tri[0].position, [10.0, 10.0]);
            for v in &tri[1..] {
                let d = DVec2::new(v.position[0] as f64 - 10.0, v.position[1] as f64 - 10.0);
                assert!((d.length() - 2.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_polyline_quads() {
        let mut out = Vec::new();
        let points = [DVec2::ZERO, DVec2::new(10.0, 0.0), DVec2::new(10.0, 10.0)];
        polyline(&mut out, &points, 2.0, colors::GRAPH_DECEASED);
        assert_eq!(out.len(), 12);
        // First segment runs along x, so its edges sit at y = +-1
        assert_eq!(out[0].position, [0.0, 1.0]);
        assert_eq!(out[1].position, [0.0, -1.0]);
    }

    #[test]
    fn test_polyline_single_point_is_empty() {
        let mut out = Vec::new();
        polyline(&mut out, &[DVec2::ONE], 1.0, colors::GRAPH_INFECTED);
        assert!(out.is_empty());
    }

    #[test]
    fn test_surface_clear_and_bytes() {
        let mut surface = VertexSurface::new(100, 100);
        surface.fill_rect(DVec2::ZERO, DVec2::splat(5.0), colors::OVERLAY_PANEL);
        assert_eq!(surface.vertices().len(), 6);
        assert_eq!(surface.as_bytes().len(), 6 * Vertex::STRIDE);
        surface.clear();
        assert!(surface.vertices().is_empty());
    }
}
