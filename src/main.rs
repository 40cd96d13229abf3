//! Ripple Pond entry point
//!
//! On the web: WebGPU canvas, pointer input and a `requestAnimationFrame` loop.
//! Natively: a headless run with random drops, logging surface energy.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::{Context, anyhow};
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use ripple_pond::camera::{Camera, screen_to_ndc};
    use ripple_pond::interaction::PointerKind;
    use ripple_pond::renderer::SurfaceRenderState;
    use ripple_pond::{Pond, SimConfig};

    /// Everything one page needs between frames
    struct App {
        pond: Pond,
        camera: Camera,
        render_state: SurfaceRenderState,
        canvas: HtmlCanvasElement,
    }

    impl App {
        fn pointer(&mut self, kind: PointerKind, event: &MouseEvent) {
            let w = self.canvas.client_width() as f32;
            let h = self.canvas.client_height() as f32;
            if w <= 0.0 || h <= 0.0 {
                return;
            }
            let ndc = screen_to_ndc(event.offset_x() as f32, event.offset_y() as f32, w, h);
            let impacts = self.pond.pointer_at(&self.camera, kind, ndc);
            if !impacts.is_empty() {
                log::debug!("{:?} queued {} impact(s)", kind, impacts.len());
            }
        }

        fn resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = canvas_pixel_size(&window, &self.canvas);
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.render_state.resize(width, height);
            self.camera.resize(width, height);
        }

        fn frame(&mut self) {
            self.pond.frame();
            match self.render_state.render(&self.camera, self.pond.mesh()) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }
    }

    fn canvas_pixel_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    /// Optional `<script id="pond-config" type="application/json">` block
    fn page_config(document: &web_sys::Document) -> anyhow::Result<SimConfig> {
        let Some(text) = document
            .get_element_by_id("pond-config")
            .and_then(|el| el.text_content())
        else {
            return Ok(SimConfig::default());
        };
        SimConfig::from_json(&text).context("invalid #pond-config block")
    }

    pub async fn run() -> anyhow::Result<()> {
        log::info!("Ripple Pond starting...");

        let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
        let document = window.document().ok_or_else(|| anyhow!("no document"))?;

        let config = page_config(&document)?;
        let pond = Pond::new(config)?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| anyhow!("no canvas"))?
            .dyn_into()
            .map_err(|_| anyhow!("#canvas is not a canvas"))?;

        let (width, height) = canvas_pixel_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .context("failed to create surface")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter")?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state =
            SurfaceRenderState::new(surface, &adapter, width, height, pond.mesh()).await?;

        let app = Rc::new(RefCell::new(App {
            pond,
            camera: Camera::new(width as f32 / height as f32),
            render_state,
            canvas: canvas.clone(),
        }));

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_input_handlers(&window, &canvas, app.clone());
        setup_auto_pause(&document, app.clone());
        request_animation_frame(app);

        log::info!("Ripple Pond running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        app: Rc<RefCell<App>>,
    ) {
        // Short impacts while the pointer sweeps over the water
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().pointer(PointerKind::Move, &event);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Long impact on click
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().pointer(PointerKind::Click, &event);
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().resize();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Stop ticking while the tab is hidden
    fn setup_auto_pause(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
            app.borrow_mut().pond.set_paused(hidden);
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            app.borrow_mut().frame();
            request_animation_frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    if let Err(e) = wasm_app::run().await {
        log::error!("Startup failed: {e:#}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use std::ops::ControlFlow;

    use anyhow::Context;
    use ripple_pond::host::Rain;
    use ripple_pond::{Pond, SimConfig, TickBudget};

    env_logger::init();
    log::info!("Ripple Pond (native) starting...");
    log::info!("Native mode runs headless - serve the wasm build for the interactive surface");

    // ripple-pond [config.json] [ticks]
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {path}"))?;
            SimConfig::from_json(&text).with_context(|| format!("invalid config file {path}"))?
        }
        None => SimConfig::default(),
    };
    let budget = match args.next() {
        Some(ticks) => TickBudget::Ticks(ticks.parse().context("tick count must be an integer")?),
        None => TickBudget::Ticks(2_000),
    };

    let mut pond = Pond::new(config)?;
    let mut rain = Rain::new(0x5eed, 0.05);
    let ticks = pond.run(budget, |pond| {
        rain.fall(pond);
        let sim = pond.sim();
        if sim.time() % 100 == 0 {
            let field = sim.field();
            log::info!(
                "t={} energy={:.6} max|h|={:.4} impacts={}",
                sim.time(),
                field.gradient_energy(),
                field.max_abs(),
                sim.active_impacts()
            );
        }
        if sim.field().max_abs().is_finite() {
            ControlFlow::Continue(())
        } else {
            log::error!("Surface diverged at t={}", sim.time());
            ControlFlow::Break(())
        }
    });

    log::info!("Finished after {ticks} ticks");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
