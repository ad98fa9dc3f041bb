//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Linear RGBA, 0-1
pub type Color = [f32; 4];

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: Color,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Stride of one vertex in a packed buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// CSS `rgba()` string for a color (Canvas 2D hosts)
pub fn css(color: Color) -> String {
    let [r, g, b, a] = color;
    format!(
        "rgba({}, {}, {}, {})",
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
        a
    )
}

/// Colors for simulation elements
pub mod colors {
    use super::Color;

    pub const UNINFECTED: Color = [1.0, 1.0, 1.0, 1.0];
    pub const INFECTED: Color = [1.0, 0.0, 0.0, 1.0];
    pub const RECOVERED: Color = [0.0, 0.5, 0.0, 1.0]; // CSS "green"
    pub const DECEASED: Color = [0.0, 0.0, 0.0, 1.0];

    pub const OVERLAY_PANEL: Color = [1.0, 1.0, 1.0, 0.65];
    pub const GRAPH_INFECTED: Color = [220.0 / 255.0, 16.0 / 255.0, 16.0 / 255.0, 1.0];
    pub const GRAPH_RECOVERED: Color = [16.0 / 255.0, 220.0 / 255.0, 16.0 / 255.0, 1.0];
    pub const GRAPH_DECEASED: Color = [16.0 / 255.0, 16.0 / 255.0, 16.0 / 255.0, 1.0];

    pub const BACKGROUND: Color = [0.45, 0.47, 0.5, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_packed() {
        assert_eq!(Vertex::STRIDE, 24);
        let vertices = [Vertex::new(1.0, 2.0, colors::INFECTED); 3];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 72);
    }

    #[test]
    fn test_css() {
        assert_eq!(css(colors::INFECTED), "rgba(255, 0, 0, 1)");
        assert_eq!(css(colors::OVERLAY_PANEL), "rgba(255, 255, 255, 0.65)");
        assert_eq!(css(colors::GRAPH_INFECTED), "rgba(220, 16, 16, 1)");
    }
}
