//! Werble entry point
//!
//! On the web: canvas front-end driven by requestAnimationFrame.
//! Native: headless run with synthetic frame timestamps.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use werble::renderer::CanvasRenderer;
    use werble::sim::SimState;
    use werble::{Scheduler, Tuning};

    /// App instance holding all state
    struct App {
        state: SimState,
        scheduler: Scheduler,
        renderer: CanvasRenderer,
        canvas: HtmlCanvasElement,
    }

    impl App {
        /// Run due ticks, then draw
        fn frame(&mut self, time: f64) {
            self.scheduler.run(&mut self.state, time);
            if let Err(e) = self.renderer.render(&self.state.snapshot()) {
                log::warn!("Render error: {:?}", e);
            }
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.renderer.resize(width, height);
            self.state.resize(width as f32, height as f32);
            self.scheduler.reset();
        }

        /// Convert client coordinates to arena coordinates
        fn pointer_moved(&mut self, event: &MouseEvent) {
            let rect = self.canvas.get_bounding_client_rect();
            let x = event.client_x() as f64 - rect.left();
            let y = event.client_y() as f64 - rect.top();
            self.state.move_pointer(x as f32, y as f32);
        }
    }

    fn window_size() -> (u32, u32) {
        let Some(window) = web_sys::window() else {
            return (0, 0);
        };
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (w as u32, h as u32)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Werble starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let renderer = match CanvasRenderer::new(canvas.clone()) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Canvas 2D unavailable: {:?}", e);
                return;
            }
        };

        let (width, height) = window_size();
        renderer.resize(width, height);

        let tuning = Tuning::default();
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            state: SimState::new(tuning.clone(), width as f32, height as f32, seed),
            scheduler: Scheduler::from_tuning(&tuning),
            renderer,
            canvas: canvas.clone(),
        }));

        log::info!("Simulation initialized with seed: {}", app.borrow().state.seed);

        setup_input_handlers(&canvas, app.clone());
        setup_resize_handler(app.clone());

        request_animation_frame(app);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            app.borrow_mut().pointer_moved(&event);
        });
        let _ = canvas
            .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize_handler(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        // The RefCell borrow keeps a resize from interleaving with a tick
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = window_size();
            app.borrow_mut().resize(width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
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
    wasm_app::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run options
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, PartialEq)]
struct Options {
    tuning_path: Option<String>,
    seed: u64,
    width: f32,
    height: f32,
    frames: u32,
    hz: f64,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for Options {
    fn default() -> Self {
        Self {
            tuning_path: std::env::var("WERBLE_TUNING").ok(),
            seed: 1,
            width: 800.0,
            height: 600.0,
            frames: 600,
            hz: 60.0,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
const USAGE: &str = "usage: werble [--tuning PATH] [--seed N] [--size WxH] [--frames N] [--hz N]";

#[cfg(not(target_arch = "wasm32"))]
impl Options {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        fn value<T: std::str::FromStr>(flag: &str, raw: Option<String>) -> Result<T, String> {
            let raw = raw.ok_or_else(|| format!("{} needs a value", flag))?;
            raw.parse()
                .map_err(|_| format!("invalid value for {}: {}", flag, raw))
        }

        let mut opts = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--tuning" => opts.tuning_path = Some(value("--tuning", args.next())?),
                "--seed" => opts.seed = value("--seed", args.next())?,
                "--frames" => opts.frames = value("--frames", args.next())?,
                "--hz" => opts.hz = value("--hz", args.next())?,
                "--size" => {
                    let raw: String = value("--size", args.next())?;
                    let (w, h) = raw
                        .split_once('x')
                        .ok_or_else(|| format!("--size expects WxH, got {}", raw))?;
                    opts.width = value("--size", Some(w.to_string()))?;
                    opts.height = value("--size", Some(h.to_string()))?;
                }
                other => return Err(format!("unknown argument: {}", other)),
            }
        }
        if !(opts.hz.is_finite() && opts.hz > 0.0) {
            return Err("--hz must be positive".to_string());
        }
        for (name, dim) in [("width", opts.width), ("height", opts.height)] {
            if !(dim.is_finite() && dim > 0.0) {
                return Err(format!("--size {} must be positive and finite, got {}", name, dim));
            }
        }
        Ok(opts)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use werble::sim::SimState;
    use werble::{Scheduler, Tuning};

    env_logger::init();

    let opts = match Options::parse(std::env::args().skip(1)) {
        Ok(opts) => opts,
        Err(msg) => {
            eprintln!("{}\n{}", msg, USAGE);
            std::process::exit(2);
        }
    };

    let tuning = match &opts.tuning_path {
        Some(path) => Tuning::load(path).unwrap_or_else(|e| {
            log::error!("{}; falling back to defaults", e);
            Tuning::default()
        }),
        None => Tuning::default(),
    };

    let mut state = SimState::new(tuning.clone(), opts.width, opts.height, opts.seed);

    log::info!("Werble (native) starting, seed {}", state.seed);
    log::info!("Native mode is headless - build for wasm32 to get the canvas front-end");
    let mut scheduler = Scheduler::from_tuning(&tuning);
    let center = state.arena.center();
    let frame_ms = 1000.0 / opts.hz;

    for frame in 0..=opts.frames {
        // Sweep the pointer around the arena centre
        let phase = frame as f32 * 0.05;
        state.move_pointer(
            center.x + phase.cos() * center.x * 0.5,
            center.y + phase.sin() * center.y * 0.5,
        );
        scheduler.run(&mut state, frame as f64 * frame_ms);

        if frame > 0 && frame % (opts.hz.round() as u32).max(1) == 0 {
            let moving = state.balls.iter().filter(|b| b.velocity > 0.0).count();
            let mean = state.balls.iter().map(|b| b.velocity).sum::<f32>()
                / state.balls.len().max(1) as f32;
            log::info!(
                "tick {}: {} of {} balls moving, mean speed {:.1}",
                state.time_ticks,
                moving,
                state.balls.len(),
                mean
            );
        }
    }

    log::info!(
        "Ran {} ticks over {} frames",
        scheduler.total_ticks(),
        opts.frames
    );

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}
