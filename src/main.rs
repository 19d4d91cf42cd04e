//! Ball Roller entry point
//!
//! Handles platform-specific initialization and runs the game loop.
//! Native builds open a winit window; web builds draw into `#canvas`.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use ball_roller::Settings;
use ball_roller::consts::TICK_MS;
use ball_roller::platform::{FrameClock, KeyboardState};
use ball_roller::renderer::{DrawList, RenderError};
use ball_roller::sim::{Flow, GameEvent, GameState, LevelCatalog, LevelError, tick};

/// Anything that stops the game, at startup or mid-run
#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error("level data: {0}")]
    Level(#[from] LevelError),
    #[error("renderer: {0}")]
    Render(#[from] RenderError),
    #[cfg(not(target_arch = "wasm32"))]
    #[error("event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[cfg(not(target_arch = "wasm32"))]
    #[error("window: {0}")]
    Window(#[from] winit::error::OsError),
    #[cfg(target_arch = "wasm32")]
    #[error("page is missing {0}")]
    Dom(&'static str),
}

/// Game state plus the input and clock that drive it. Shared by both front
/// ends; only presentation differs.
struct Session {
    state: GameState,
    keys: KeyboardState,
    clock: FrameClock,
    settings: Settings,
}

impl Session {
    fn new(settings: Settings) -> Result<Self, RunError> {
        let catalog = LevelCatalog::builtin()?;
        log::info!("Loaded {} levels", catalog.level_count());
        Ok(Self {
            state: GameState::new(catalog),
            keys: KeyboardState::new(),
            clock: FrameClock::new(),
            settings,
        })
    }

    /// Run every tick that has come due since the last frame. Returns `None`
    /// when nothing ran, otherwise the loop decision and whatever happened.
    fn update(&mut self, now_ms: f64) -> Option<(Flow, Vec<GameEvent>)> {
        let due = self.clock.poll(now_ms);
        if due == 0 {
            return None;
        }

        let mut flow = Flow::Continue;
        for _ in 0..due {
            let input = self.keys.take_input();
            flow = tick(&mut self.state, &input, TICK_MS, &self.settings.rules);
            if flow == Flow::Quit {
                break;
            }
        }
        Some((flow, self.state.drain_events()))
    }

    fn draw_list(&self) -> DrawList {
        let fps = self.settings.show_fps.then(|| self.clock.fps());
        DrawList::build(&self.state, fps)
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native_game {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use winit::application::ApplicationHandler;
    use winit::dpi::LogicalSize;
    use winit::event::{ElementState, WindowEvent};
    use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
    use winit::keyboard::{KeyCode, PhysicalKey};
    use winit::window::{Window, WindowId};

    use ball_roller::Settings;
    use ball_roller::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
    use ball_roller::platform::Key;
    use ball_roller::renderer::{RenderState, SurfaceRecovery};
    use ball_roller::sim::Flow;

    use super::{RenderError, RunError, Session};

    const TITLE: &str = "Ball Roller";

    struct Running {
        window: Arc<Window>,
        render_state: RenderState,
        title: String,
    }

    struct App {
        session: Session,
        started: Instant,
        running: Option<Running>,
        error: Option<RunError>,
    }

    impl App {
        fn now_ms(&self) -> f64 {
            self.started.elapsed().as_secs_f64() * 1000.0
        }

        fn open_window(&self, event_loop: &ActiveEventLoop) -> Result<Running, RunError> {
            let attributes = Window::default_attributes()
                .with_title(TITLE)
                .with_inner_size(LogicalSize::new(SCREEN_WIDTH, SCREEN_HEIGHT));
            let window = Arc::new(event_loop.create_window(attributes)?);
            let size = window.inner_size();

            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
            let surface = instance
                .create_surface(window.clone())
                .map_err(RenderError::from)?;
            let render_state = pollster::block_on(RenderState::for_surface(
                &instance,
                surface,
                size.width,
                size.height,
            ))?;

            log::info!("Window created: {}x{}", size.width, size.height);
            Ok(Running {
                window,
                render_state,
                title: String::new(),
            })
        }

        fn redraw(&mut self, event_loop: &ActiveEventLoop) {
            let now = self.now_ms();
            let Some((flow, events)) = self.session.update(now) else {
                return;
            };
            for event in &events {
                log::debug!("{:?}", event);
            }
            if flow == Flow::Quit {
                log::info!("Exiting");
                event_loop.exit();
                return;
            }

            let list = self.session.draw_list();
            let Some(running) = self.running.as_mut() else {
                return;
            };

            let title = format!("{} - {}", TITLE, list.hud_line());
            if title != running.title {
                running.window.set_title(&title);
                running.title = title;
            }

            let Err(e) = running.render_state.render(&list) else {
                return;
            };
            match SurfaceRecovery::for_error(&e) {
                SurfaceRecovery::Reconfigure => running.render_state.reconfigure(),
                SurfaceRecovery::SkipFrame => log::warn!("Render error: {:?}", e),
                SurfaceRecovery::Fatal => {
                    self.error = Some(RenderError::OutOfMemory.into());
                    event_loop.exit();
                }
            }
        }
    }

    impl ApplicationHandler for App {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            if self.running.is_some() {
                return;
            }
            match self.open_window(event_loop) {
                Ok(running) => self.running = Some(running),
                Err(e) => {
                    self.error = Some(e);
                    event_loop.exit();
                }
            }
        }

        fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
            let Some(running) = &self.running else {
                return;
            };
            let now = self.now_ms();
            match self.session.clock.next_due() {
                Some(due) if due > now => {
                    let wait = Duration::from_secs_f64((due - now) / 1000.0);
                    event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + wait));
                }
                _ => running.window.request_redraw(),
            }
        }

        fn window_event(
            &mut self,
            event_loop: &ActiveEventLoop,
            _window_id: WindowId,
            event: WindowEvent,
        ) {
            match event {
                WindowEvent::CloseRequested => {
                    log::info!("Close requested");
                    self.session.keys.request_close();
                    if let Some(running) = &self.running {
                        running.window.request_redraw();
                    }
                }
                WindowEvent::Resized(size) => {
                    if let Some(running) = self.running.as_mut() {
                        running.render_state.resize(size.width, size.height);
                    }
                }
                WindowEvent::Focused(false) => self.session.keys.clear_held(),
                WindowEvent::KeyboardInput { event, .. } => {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        if let Some(key) = map_key(code) {
                            match event.state {
                                ElementState::Pressed if !event.repeat => {
                                    self.session.keys.press(key)
                                }
                                ElementState::Pressed => {}
                                ElementState::Released => self.session.keys.release(key),
                            }
                        }
                    }
                }
                WindowEvent::RedrawRequested => self.redraw(event_loop),
                _ => {}
            }
        }
    }

    fn map_key(code: KeyCode) -> Option<Key> {
        match code {
            KeyCode::ArrowUp | KeyCode::KeyW => Some(Key::Up),
            KeyCode::ArrowDown | KeyCode::KeyS => Some(Key::Down),
            KeyCode::ArrowLeft | KeyCode::KeyA => Some(Key::Left),
            KeyCode::ArrowRight | KeyCode::KeyD => Some(Key::Right),
            KeyCode::KeyR => Some(Key::Retry),
            KeyCode::KeyQ => Some(Key::Quit),
            _ => None,
        }
    }

    pub fn run() -> Result<(), RunError> {
        let mut app = App {
            session: Session::new(Settings::load())?,
            started: Instant::now(),
            running: None,
            error: None,
        };

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use ball_roller::Settings;
    use ball_roller::audio::AudioManager;
    use ball_roller::platform::Key;
    use ball_roller::renderer::{RenderState, SurfaceRecovery};
    use ball_roller::sim::Flow;

    use super::{RenderError, RunError, Session};

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
        audio: AudioManager,
        document: Document,
        running: bool,
    }

    impl Game {
        fn render(&mut self) {
            let list = self.session.draw_list();
            self.update_hud(&list.hud);

            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let Err(e) = render_state.render(&list) else {
                return;
            };
            match SurfaceRecovery::for_error(&e) {
                SurfaceRecovery::Reconfigure => render_state.reconfigure(),
                SurfaceRecovery::SkipFrame => log::warn!("Render error: {:?}", e),
                SurfaceRecovery::Fatal => {
                    log::error!("{}", RenderError::OutOfMemory);
                    self.stop("Out of GPU memory. Reload to try again.");
                }
            }
        }

        /// Update HUD overlay in DOM
        fn update_hud(&self, lines: &[String]) {
            if let Some(el) = self.document.get_element_by_id("hud") {
                let text = lines.join("\n");
                if el.text_content().as_deref() != Some(text.as_str()) {
                    el.set_text_content(Some(&text));
                }
                let class = if self.session.state.phase.is_modal() {
                    "modal"
                } else {
                    ""
                };
                let _ = el.set_attribute("class", class);
            }
        }

        /// Stop the loop and release the GPU
        fn stop(&mut self, message: &str) {
            self.running = false;
            self.render_state = None;
            if let Some(el) = self.document.get_element_by_id("hud") {
                el.set_text_content(Some(message));
                let _ = el.set_attribute("class", "modal");
            }
        }
    }

    pub async fn run() -> Result<(), RunError> {
        let window = web_sys::window().ok_or(RunError::Dom("window"))?;
        let document = window.document().ok_or(RunError::Dom("document"))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or(RunError::Dom("#canvas"))?;

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        // Write back so every field is present for the player to edit
        settings.save();
        let audio = AudioManager::new(&settings);
        let session = Session::new(settings)?;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(RenderError::from)?;
        let render_state = RenderState::for_surface(&instance, surface, width, height).await?;

        let game = Rc::new(RefCell::new(Game {
            session,
            render_state: Some(render_state),
            audio,
            document,
            running: true,
        }));

        setup_input_handlers(&window, game.clone());
        request_animation_frame(game);

        log::info!("Ball Roller running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_web_key(&event.key()) else {
                    return;
                };
                // Keep arrows from scrolling the page
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                if !event.repeat() {
                    g.session.keys.press(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_web_key(&event.key()) {
                    game.borrow_mut().session.keys.release(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: keyup never arrives for keys held while focus leaves
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().session.keys.clear_held();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
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
        {
            let mut g = game.borrow_mut();
            if !g.running {
                return;
            }

            if let Some((flow, events)) = g.session.update(time) {
                g.audio.play_events(&events);
                if flow == Flow::Quit {
                    log::info!("Player quit");
                    g.stop("Thanks for playing Ball Roller!");
                    return;
                }
                g.render();
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    log::info!("Ball Roller starting...");
    if let Err(e) = wasm_game::run().await {
        log::error!("Failed to start: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Ball Roller (native) starting...");
    match native_game::run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
