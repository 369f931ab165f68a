//! No Brake entry point
//!
//! Natively this runs a headless demo: the autopilot drives, frames are
//! recorded into a vertex batch and sound cues go to the audio worker, which
//! plays the sound files when an asset directory is configured. The
//! playable version is the wasm build (canvas + keyboard).

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use no_brake::audio::{AudioSink, WebAudio};
    use no_brake::consts::*;
    use no_brake::input::{KeyboardState, key_from_dom};
    use no_brake::renderer::{FrameBatch, RenderState, TextItem};
    use no_brake::sim::{SessionState, Spawner};
    use no_brake::{AssetCatalog, FrameDriver, Settings};

    /// Longest real-time gap simulated in one animation frame (ms)
    const MAX_FRAME_MS: f64 = 100.0;

    type Driver = FrameDriver<FrameBatch, KeyboardState, WebAudio>;

    /// Game instance holding all state
    struct Game {
        driver: Driver,
        render_state: Option<RenderState>,
        accumulator: f64,
        last_time: f64,
        /// Text shown last frame, to skip unchanged DOM rewrites
        shown_text: Vec<TextItem>,
    }

    impl Game {
        /// Run simulation ticks for `dt` milliseconds of real time
        fn update(&mut self, dt: f64) {
            self.accumulator += dt.min(MAX_FRAME_MS);
            while self.accumulator >= TICK_MS {
                self.accumulator -= TICK_MS;
                if !self.driver.run_frame() {
                    break;
                }
            }
        }

        /// Render the last presented frame
        fn render(&mut self) {
            let frame = self.driver.renderer().frame();
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(frame) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Mirror the frame's text items into the DOM overlay
        fn update_text(&mut self, document: &Document) {
            let texts = &self.driver.renderer().frame().texts;
            if *texts == self.shown_text {
                return;
            }
            let Some(layer) = document.get_element_by_id("text-layer") else {
                return;
            };
            layer.set_inner_html("");
            for item in texts {
                let Ok(el) = document.create_element("div") else {
                    continue;
                };
                let [r, g, b, a] = item.color.map(|c| (c * 255.0).round() as u8);
                let style = format!(
                    "position:absolute;left:{:.3}%;top:{:.3}%;transform:translate(-50%,-50%);\
                     font-size:{:.3}vmin;color:rgba({r},{g},{b},{:.2});white-space:nowrap;",
                    item.center.x as f64 / SCREEN_WIDTH as f64 * 100.0,
                    item.center.y as f64 / SCREEN_HEIGHT as f64 * 100.0,
                    item.size as f64 / SCREEN_HEIGHT as f64 * 100.0 * 0.75,
                    a as f64 / 255.0,
                );
                let _ = el.set_attribute("style", &style);
                el.set_text_content(Some(&item.text));
                let _ = layer.append_child(&el);
            }
            self.shown_text = texts.clone();
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {err}").into());
        }

        log::info!("No Brake starting...");

        let Some(window) = web_sys::window() else {
            log::error!("no window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("no document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("no canvas element");
            return;
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let catalog = AssetCatalog::builtin();
        let spawner = Spawner::new(catalog.footprints(), settings.arrow_count);
        let driver = FrameDriver::new(
            SessionState::new(seed, spawner),
            FrameBatch::new(catalog.clone()),
            KeyboardState::default(),
            WebAudio::new(settings.mixer()),
            catalog,
        );
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(err) => {
                log::error!("Failed to create surface: {err}");
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(err) => {
                log::error!("Failed to get adapter: {err}");
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = match RenderState::new(surface, &adapter, width, height).await {
            Ok(state) => Some(state),
            Err(err) => {
                log::error!("{err}");
                None
            }
        };

        let game = Rc::new(RefCell::new(Game {
            driver,
            render_state,
            accumulator: 0.0,
            last_time: 0.0,
            shown_text: Vec::new(),
        }));

        setup_input_handlers(&window, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("No Brake running!");
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = key_from_dom(&event.key()) else {
                    return;
                };
                // Arrow keys and space would scroll the page
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.driver.input_mut().key_down(key, event.repeat());
                // Browsers only allow audio after a user gesture
                g.driver.audio().resume();
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = key_from_dom(&event.key()) {
                    game.borrow_mut().driver.input_mut().key_up(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: held keys never see their keyup
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().driver.input_mut().release_all();
            });
            let _ = window
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let running = {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                TICK_MS
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_text(&document);
            }
            g.driver.state().running
        };

        if running {
            request_animation_frame(game);
        } else {
            log::info!("Quit requested, stopping the loop");
            game.borrow_mut().driver.audio_mut().play_looping(
                no_brake::audio::Track::Background,
                0.0,
            );
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use no_brake::audio::{AudioDispatcher, open_player};
    use no_brake::autopilot::Autopilot;
    use no_brake::consts::FPS;
    use no_brake::driver::{FixedPacer, Unpaced};
    use no_brake::renderer::FrameBatch;
    use no_brake::sim::{SessionState, Spawner};
    use no_brake::{AssetCatalog, FrameDriver, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("No Brake (native demo) starting...");

    let settings = Settings::load();

    let catalog = match &settings.assets_dir {
        Some(dir) => match AssetCatalog::load(dir) {
            Ok(catalog) => catalog,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(1);
            }
        },
        None => {
            log::info!("No asset directory configured, using builtin footprints");
            AssetCatalog::builtin()
        }
    };

    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    });

    let spawner = Spawner::new(catalog.footprints(), settings.arrow_count);
    let audio = {
        let catalog = catalog.clone();
        AudioDispatcher::spawn(move || open_player(catalog), settings.mixer())
    };
    let mut driver = FrameDriver::new(
        SessionState::new(seed, spawner),
        FrameBatch::new(catalog.clone()),
        Autopilot::new(settings.demo_restarts, settings.demo_car),
        audio,
        catalog,
    );

    let summary = if settings.paced {
        driver.run(&mut FixedPacer::new(FPS), settings.max_frames)
    } else {
        driver.run(&mut Unpaced, settings.max_frames)
    };

    log::info!(
        "Demo over: {} sessions, {} waves, {} crashes, {} skids, {} refuels, best score {}",
        summary.sessions,
        summary.waves,
        summary.crashes,
        summary.skids,
        summary.refuels,
        summary.best_score
    );
    if driver.audio().dropped() > 0 {
        log::warn!("{} audio cues dropped", driver.audio().dropped());
    }
}
