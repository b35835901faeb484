//! Flappy Bird entry point
//!
//! The browser build draws through WebGPU on a `#canvas` element. The native
//! build plays a scripted headless session against the sprites on disk.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{HtmlCanvasElement, Response};

    use flappy_bird::platform::{Backend, Color, Key, Rect};
    use flappy_bird::renderer::{GpuTexture, SpriteRenderer};
    use flappy_bird::{AssetError, Game, GameConfig, load_assets};

    /// Element receiving the prompt text
    const HUD_ID: &str = "hud-prompt";
    /// Longest step handed to the simulation (tab switches, stalls)
    const MAX_DT: f32 = 0.1;

    /// Browser backend: WebGPU drawing, DOM text, keyboard from `keydown`
    struct WebBackend {
        renderer: SpriteRenderer,
        /// Raw image bytes fetched before startup, keyed by path
        images: HashMap<String, Vec<u8>>,
        /// Keys pressed since the last frame, filled by the event listener
        pending: Rc<RefCell<Vec<Key>>>,
        /// Keys visible to the current frame
        pressed: Vec<Key>,
        last_time: f64,
        dt: f32,
        hud_text: String,
        closed: bool,
    }

    impl WebBackend {
        /// Latch queued key presses and time for the frame at `time` (ms)
        fn poll(&mut self, time: f64) {
            self.dt = if self.last_time > 0.0 {
                (((time - self.last_time) / 1000.0) as f32).min(MAX_DT)
            } else {
                1.0 / 60.0
            };
            self.last_time = time;
            self.pressed = std::mem::take(&mut *self.pending.borrow_mut());
        }
    }

    impl Backend for WebBackend {
        type Texture = GpuTexture;

        fn load_texture(&mut self, path: &str) -> Result<GpuTexture, AssetError> {
            let bytes = self.images.get(path).ok_or_else(|| AssetError::NotFound {
                path: path.to_string(),
            })?;
            let image = image::load_from_memory(bytes)
                .map_err(|e| AssetError::Decode {
                    path: path.to_string(),
                    reason: e.to_string(),
                })?
                .to_rgba8();
            if image.width() == 0 || image.height() == 0 {
                return Err(AssetError::Invalid {
                    path: path.to_string(),
                });
            }
            Ok(self.renderer.create_texture(path, &image))
        }

        fn begin_frame(&mut self, clear: Color) {
            self.renderer.begin(clear);
        }

        fn draw_texture(
            &mut self,
            texture: &GpuTexture,
            source: Rect,
            dest: Rect,
            origin: Vec2,
            rotation: f32,
            tint: Color,
        ) {
            self.renderer
                .draw_texture(texture, source, dest, origin, rotation, tint);
        }

        fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
            self.renderer.draw_circle(center, radius, color);
        }

        fn draw_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
            self.renderer.draw_rect(pos, size, color);
        }

        fn draw_text(&mut self, text: &str, _x: i32, _y: i32, _font_size: i32, _color: Color) {
            if self.hud_text == text {
                return;
            }
            self.hud_text = text.to_string();
            let el = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id(HUD_ID));
            if let Some(el) = el {
                el.set_text_content(Some(text));
            }
        }

        fn end_frame(&mut self) {
            match self.renderer.present() {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = self.renderer.size;
                    self.renderer.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                    self.closed = true;
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
            self.pressed.clear();
        }

        fn key_pressed(&self, key: Key) -> bool {
            self.pressed.contains(&key)
        }

        fn frame_time(&self) -> f32 {
            self.dt
        }

        fn should_close(&self) -> bool {
            self.closed
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    struct App {
        backend: WebBackend,
        game: Game<GpuTexture>,
    }

    async fn fetch_bytes(window: &web_sys::Window, path: &str) -> Result<Vec<u8>, JsValue> {
        let response: Response = JsFuture::from(window.fetch_with_str(path))
            .await?
            .dyn_into()?;
        if !response.ok() {
            return Err(JsValue::from_str(&format!(
                "{} returned HTTP {}",
                path,
                response.status()
            )));
        }
        let buffer = JsFuture::from(response.array_buffer()?).await?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let config = GameConfig::load();
        log::info!("{} starting ({})", config.title, config.variant.as_str());

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        document.set_title(&config.title);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        canvas.set_width(config.screen_width);
        canvas.set_height(config.screen_height);

        let mut images = HashMap::new();
        for path in config.assets.all(config.scrolling_layers) {
            match fetch_bytes(&window, path).await {
                Ok(bytes) => {
                    images.insert(path.to_string(), bytes);
                }
                Err(e) => log::error!("Failed to fetch {}: {:?}", path, e),
            }
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let logical = Vec2::new(config.screen_width as f32, config.screen_height as f32);
        let renderer = SpriteRenderer::new(
            surface,
            &adapter,
            config.screen_width,
            config.screen_height,
            logical,
        )
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let mut backend = WebBackend {
            renderer,
            images,
            pending: Rc::new(RefCell::new(Vec::new())),
            pressed: Vec::new(),
            last_time: 0.0,
            dt: 0.0,
            hud_text: String::new(),
            closed: false,
        };

        let assets = match load_assets(&mut backend, &config) {
            Ok(assets) => assets,
            Err(e) => {
                log::error!("Aborting startup: {}", e);
                backend.close();
                if let Some(el) = document.get_element_by_id(HUD_ID) {
                    el.set_text_content(Some(&e.to_string()));
                }
                return Err(JsValue::from_str(&e.to_string()));
            }
        };
        // Fetched bytes are no longer needed once uploaded
        backend.images.clear();

        setup_keyboard(&window, Rc::clone(&backend.pending));

        let app = Rc::new(RefCell::new(App {
            backend,
            game: Game::new(config, assets),
        }));
        request_animation_frame(app);

        log::info!("Flappy Bird running!");
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, pending: Rc<RefCell<Vec<Key>>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if event.repeat() {
                return;
            }
            if let Some(key) = Key::from_dom_key(&event.key()) {
                event.prevent_default();
                pending.borrow_mut().push(key);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut app = app.borrow_mut();
            let App { backend, game } = &mut *app;

            if backend.should_close() {
                log::info!("Render loop stopped");
                return;
            }

            backend.poll(time);
            game.frame(backend);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
mod session {
    use anyhow::Context;

    use flappy_bird::platform::{HeadlessBackend, Key};
    use flappy_bird::{GameConfig, run};

    /// Frames in the scripted session (ten seconds at 60 fps)
    const SESSION_FRAMES: u64 = 600;
    /// Frames between scripted jumps
    const JUMP_EVERY: usize = 45;

    pub fn play(config_path: Option<String>) -> anyhow::Result<()> {
        let config = match config_path {
            Some(path) => GameConfig::load_from(&path)
                .with_context(|| format!("failed to load config from {path}"))?,
            None => GameConfig::default(),
        };
        log::info!("{} starting ({})", config.title, config.variant.as_str());

        let mut backend =
            HeadlessBackend::open(config.screen_width, config.screen_height, &config.title)
                .with_asset_root(".")
                .with_max_frames(SESSION_FRAMES);
        backend.press_at(0, Key::S);
        for frame in (JUMP_EVERY as u64..SESSION_FRAMES).step_by(JUMP_EVERY) {
            backend.press_at(frame, Key::Space);
        }

        let state = run(&mut backend, config).context("game aborted")?;

        log::info!(
            "Session finished after {} frames, bird at ({:.1}, {:.1})",
            backend.frames_presented(),
            state.bird.pos.x,
            state.bird.pos.y
        );
        log::debug!("Final state: {}", serde_json::to_string(&state)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();

    match session::play(std::env::args().nth(1)) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
