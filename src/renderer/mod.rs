//! Rendering
//!
//! The simulation draws through the `Surface` trait; hosts provide the
//! back-end (Canvas 2D on web, `VertexSurface` for GPU batching).

pub mod overlay;
pub mod shapes;
pub mod vertex;

pub use overlay::OverlayLayout;
pub use shapes::VertexSurface;
pub use vertex::{Color, Vertex, colors};

use glam::DVec2;

use crate::Bounds;
use crate::consts::AGENT_RADIUS;
use crate::sim::{Agent, HealthState, SimulationContext};

/// A 2D drawing target of known (resizable) size
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Wipe the whole surface to the background color
    fn clear(&mut self);
    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color);
    /// Open polyline through `points`
    fn polyline(&mut self, points: &[DVec2], color: Color);
    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: Color);

    fn bounds(&self) -> Bounds {
        Bounds::from_size(self.width(), self.height())
    }
}

/// Agent fill color by health state
pub fn health_color(state: HealthState) -> Color {
    match state {
        HealthState::Uninfected => colors::UNINFECTED,
        HealthState::Infected => colors::INFECTED,
        HealthState::Recovered => colors::RECOVERED,
        HealthState::Deceased => colors::DECEASED,
    }
}

pub fn draw_agents<S: Surface + ?Sized>(surface: &mut S, agents: &[Agent]) {
    for agent in agents {
        surface.fill_circle(agent.pos, AGENT_RADIUS, health_color(agent.health));
    }
}

/// Draw one frame: agents, then the history graph if enabled
pub fn draw_frame<S: Surface + ?Sized>(surface: &mut S, ctx: &SimulationContext) {
    surface.clear();
    draw_agents(surface, &ctx.agents);
    if ctx.controls.show_overlay {
        let layout = OverlayLayout::for_surface(surface.bounds());
        overlay::draw(surface, &layout, &ctx.history);
    }
}
