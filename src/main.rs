//! Contagion entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_host {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use glam::DVec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use contagion::renderer::vertex::css;
    use contagion::renderer::{Color, Surface, colors};
    use contagion::{Command, Engine, SimConfig};

    /// Canvas 2D back-end
    struct CanvasSurface {
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
    }

    impl CanvasSurface {
        /// Match the canvas to the window (the host may resize at any time)
        fn fit_window(&self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let w = window.inner_width().ok().and_then(|v| v.as_f64());
            let h = window.inner_height().ok().and_then(|v| v.as_f64());
            if let (Some(w), Some(h)) = (w, h) {
                let (w, h) = (w as u32, h as u32);
                if self.canvas.width() != w || self.canvas.height() != h {
                    self.canvas.set_width(w);
                    self.canvas.set_height(h);
                    log::debug!("Canvas resized to {}x{}", w, h);
                }
            }
        }
    }

    impl Surface for CanvasSurface {
        fn width(&self) -> u32 {
            self.canvas.width()
        }

        fn height(&self) -> u32 {
            self.canvas.height()
        }

        fn clear(&mut self) {
            self.ctx.set_fill_style_str(&css(colors::BACKGROUND));
            self.ctx
                .fill_rect(0.0, 0.0, self.width() as f64, self.height() as f64);
        }

        fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color) {
            self.ctx.set_fill_style_str(&css(color));
            self.ctx.begin_path();
            let _ = self.ctx.arc(center.x, center.y, radius, 0.0, TAU);
            self.ctx.fill();
        }

        fn polyline(&mut self, points: &[DVec2], color: Color) {
            let Some((first, rest)) = points.split_first() else {
                return;
            };
            self.ctx.set_stroke_style_str(&css(color));
            self.ctx.begin_path();
            self.ctx.move_to(first.x, first.y);
            for p in rest {
                self.ctx.line_to(p.x, p.y);
            }
            self.ctx.stroke();
        }

        fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: Color) {
            self.ctx.set_fill_style_str(&css(color));
            self.ctx.fill_rect(origin.x, origin.y, size.x, size.y);
        }
    }

    /// Host state shared with the event closures
    struct App {
        engine: Engine,
        surface: CanvasSurface,
        last_time: f64,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                0.0
            };
            self.last_time = time;

            self.surface.fit_window();
            self.engine.frame(dt, &mut self.surface);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Contagion starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let surface = CanvasSurface { canvas, ctx };
        surface.fit_window();

        let config = SimConfig::load();
        config.save();

        let seed = js_sys::Date::now() as u64;
        let engine = match Engine::new(config, surface.bounds(), seed) {
            Ok(engine) => engine,
            Err(e) => {
                log::warn!("Stored config rejected ({}), using defaults", e);
                Engine::new(SimConfig::default(), surface.bounds(), seed)
                    .expect("default config is valid")
            }
        };

        let app = Rc::new(RefCell::new(App {
            engine,
            surface,
            last_time: 0.0,
        }));

        setup_input_handlers(app.clone());
        request_animation_frame(app);

        log::info!("Contagion running! Click to infect, [d] distancing, [g] graph, [r] reset");
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        // Click - infect the first agent under the pointer
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                let pos = DVec2::new(event.client_x() as f64, event.client_y() as f64);
                let mut a = app.borrow_mut();
                match a.engine.infect_nearest(pos) {
                    Some(index) => log::debug!("Clicked agent {}", index),
                    None => log::debug!("No agent near ({}, {})", pos.x, pos.y),
                }
            });
            let _ = window.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard - control panel
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let command = match event.key().as_str() {
                    "d" | "D" => Command::ToggleSocialDistancing,
                    "g" | "G" => Command::ToggleOverlay,
                    "r" | "R" => Command::ResetSimulation,
                    _ => return,
                };
                let mut a = app.borrow_mut();
                a.engine.apply(command);
                let controls = a.engine.context().controls;
                log::info!(
                    "Social distancing: {}, overlay: {}",
                    controls.social_distancing,
                    controls.show_overlay
                );
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web_host::run();
}

/// Headless frames per native run (one simulated minute at 60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_FRAMES: u32 = 60 * 60;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use contagion::renderer::{Surface, VertexSurface};
    use contagion::{Engine, SimConfig};

    env_logger::init();
    log::info!("Contagion (native) starting...");
    log::info!("Interactive mode requires the web build - running headless");

    let config = SimConfig::load();
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    let mut surface = VertexSurface::new(1280, 720);
    let mut engine = match Engine::new(config, surface.bounds(), seed) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("Invalid config: {}", e);
            std::process::exit(1);
        }
    };

    // Patient zero
    let first = engine.context().agents[0].pos;
    engine.click(first);

    let frame_ms = 1000.0 / 60.0;
    for frame in 1..=HEADLESS_FRAMES {
        engine.frame(frame_ms, &mut surface);

        if frame % 600 == 0 {
            let stats = &engine.context().stats;
            log::info!(
                "t={}s uninfected {:.1}% infected {:.1}% recovered {:.1}% deceased {:.1}%",
                frame / 60,
                stats.percent.uninfected,
                stats.percent.infected,
                stats.percent.recovered,
                stats.percent.deceased
            );
        }
    }

    if let Err(e) = engine.check_invariants() {
        log::error!("Invariant violated: {}", e);
        std::process::exit(1);
    }

    let ctx = engine.context();
    log::info!(
        "Finished {} ticks, {} history samples, last frame {} vertices ({} bytes)",
        ctx.time_ticks,
        ctx.history.len(),
        surface.vertices().len(),
        surface.as_bytes().len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
