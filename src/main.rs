//! Chroma Wheel entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use chroma_wheel::audio::{AudioManager, synthesize};
    use chroma_wheel::renderer::{Frame, RenderState, build_frame};
    use chroma_wheel::sim::{
        GameEvent, GamePhase, SimulationState, TickInput, Viewport, rotation_for_key,
        rotation_for_tap, tick,
    };
    use chroma_wheel::{HighScore, Settings, Tuning};

    /// Nominal frame time used for the first frame after (re)starting the loop
    const FIRST_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Longest frame step fed to the simulation
    const MAX_FRAME_MS: f64 = 100.0;
    /// How long the LEVEL UP banner stays up
    const LEVEL_UP_BANNER_MS: f64 = 2000.0;

    /// Game instance holding all state
    struct Game {
        state: SimulationState,
        rng: Pcg32,
        input: TickInput,
        render_state: Option<RenderState>,
        audio: AudioManager,
        settings: Settings,
        high_score: HighScore,
        last_time: f64,
        /// An animation frame is scheduled
        running: bool,
        level_up_until: f64,
    }

    impl Game {
        fn new(seed: u64, viewport: Viewport) -> Self {
            let settings = Settings::load();
            let high_score = HighScore::load();
            let mut rng = Pcg32::seed_from_u64(seed);

            let mut tuning = Tuning::default();
            tuning.star_count = settings.star_count(tuning.star_count);
            let mut state = SimulationState::new(tuning, viewport, &mut rng);
            state.set_particle_cap(settings.max_particles());
            state.set_high_score(high_score.best);

            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_muted(settings.muted);

            Self {
                state,
                rng,
                input: TickInput::default(),
                render_state: None,
                audio,
                settings,
                high_score,
                last_time: 0.0,
                running: false,
                level_up_until: 0.0,
            }
        }

        /// Run one simulation tick and react to its events
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time).clamp(0.0, MAX_FRAME_MS)
            } else {
                FIRST_FRAME_MS
            };
            self.last_time = time;

            tick(&mut self.state, &self.input, dt as f32, &mut self.rng);
            self.input.clear();

            for event in self.state.drain_events() {
                self.handle_event(event, time);
            }
        }

        fn handle_event(&mut self, event: GameEvent, time: f64) {
            match event {
                GameEvent::Sound(trigger) => {
                    let tone = synthesize(trigger, self.state.tuning.audio_tiers, &mut self.rng);
                    self.audio.play(&tone);
                }
                GameEvent::LevelUp { level } => {
                    log::info!("Reached level {level}");
                    self.level_up_until = time + LEVEL_UP_BANNER_MS;
                }
                GameEvent::GameOver { score, level } => {
                    log::info!("Run over: score {score}, level {level}");
                    if self.high_score.record(score) {
                        self.high_score.save();
                    }
                    self.state.set_high_score(self.high_score.best);
                    self.level_up_until = 0.0;
                }
                GameEvent::NewRecord { score } => log::info!("Record beaten: {score}"),
                GameEvent::SlowMotionStarted => set_root_class("slow-motion", true),
                GameEvent::SlowMotionEnded => set_root_class("slow-motion", false),
                GameEvent::ScoreChanged { .. } => {}
            }
        }

        /// Render the current frame
        fn render(&mut self, frame: &Frame) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(frame) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => render_state.reconfigure(),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document, frame: &Frame, time: f64) {
            let session = self.state.session();
            let phase = session.phase();

            set_text(document, "hud-score", &session.score().to_string());
            set_text(document, "hud-level", &session.level().to_string());
            set_text(document, "hud-best", &session.high_score.max(session.score()).to_string());
            set_text(document, "progress-label", &format!("%{}", session.level_progress()));
            if let Some(el) = document.get_element_by_id("progress-fill") {
                el.set_attribute("style", &format!("height: {}%", session.level_progress()))
                    .ok();
            }

            set_visible(document, "hud", phase != GamePhase::Idle);
            set_visible(document, "start-screen", phase == GamePhase::Idle);
            set_visible(document, "game-over", phase == GamePhase::GameOver);
            set_visible(
                document,
                "level-up",
                phase == GamePhase::Playing && time < self.level_up_until,
            );

            if phase == GamePhase::GameOver {
                set_text(document, "final-score", &session.score().to_string());
                set_text(document, "continue-level", &session.level().to_string());
            }

            if let Some(el) = document.get_element_by_id("level-up-level") {
                el.set_text_content(Some(&session.level().to_string()));
            }

            let [r, g, b, _] = frame.clear_color;
            if let Some(root) = document.document_element() {
                root.set_attribute(
                    "style",
                    &format!("--theme: {}", css_rgba([r, g, b, 1.0])),
                )
                .ok();
            }

            if let Some(layer) = document.get_element_by_id("text-layer") {
                layer.set_inner_html(&text_layer_html(frame));
            }
        }
    }

    fn css_rgba(c: [f32; 4]) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            (c[0] * 255.0).round() as u8,
            (c[1] * 255.0).round() as u8,
            (c[2] * 255.0).round() as u8,
            c[3]
        )
    }

    fn escape_html(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    /// Floating labels mirrored as absolutely positioned DOM nodes
    fn text_layer_html(frame: &Frame) -> String {
        frame
            .texts()
            .map(|t| {
                format!(
                    r#"<div class="float-text" style="left: {:.1}px; top: {:.1}px; font-size: {}px; color: {}">{}</div>"#,
                    t.pos.x,
                    t.pos.y,
                    t.font_size,
                    css_rgba(t.color),
                    escape_html(&t.text)
                )
            })
            .collect()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            el.class_list().toggle_with_force("hidden", !visible).ok();
        }
    }

    fn set_root_class(class: &str, on: bool) {
        if let Some(root) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        {
            root.class_list().toggle_with_force(class, on).ok();
        }
    }

    fn canvas_viewport(canvas: &HtmlCanvasElement) -> Viewport {
        Viewport::new(canvas.client_width() as f32, canvas.client_height() as f32)
    }

    /// Size the canvas backing store to its CSS size times the pixel ratio
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr).max(1.0) as u32;
        let height = (canvas.client_height() as f64 * dpr).max(1.0) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        log::info!("Chroma Wheel starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            loading.class_list().add_1("hidden").ok();
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let (width, height) = fit_canvas(&window, &canvas);
        let viewport = canvas_viewport(&canvas);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, viewport)));
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(
            surface,
            &adapter,
            width,
            height,
            (viewport.width, viewport.height),
        )
        .await
        .map_err(|e| JsValue::from_str(&format!("device: {e}")))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone())?;
        setup_buttons(&document, game.clone())?;
        setup_resize(canvas, game.clone())?;
        update_mute_label(&document, game.borrow().settings.muted);

        ensure_running(&game);

        log::info!("Chroma Wheel running!");
        Ok(())
    }

    /// Schedule the frame loop if it has stopped
    fn ensure_running(game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        if !g.running {
            g.running = true;
            g.last_time = 0.0;
            drop(g);
            request_animation_frame(game.clone());
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();
            g.update(time);
            let frame = build_frame(&g.state);
            g.render(&frame);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document, &frame, time);
            }

            let keep_going = g.state.needs_frame();
            if !keep_going {
                log::debug!("Effects settled, pausing frame loop");
                g.running = false;
            }
            keep_going
        };

        if keep_going {
            request_animation_frame(game);
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Tap anywhere (except on buttons) turns the wheel
        {
            let game = game.clone();
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let on_button = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest("button").ok().flatten())
                    .is_some();
                if on_button {
                    return;
                }

                let mut g = game.borrow_mut();
                g.audio.resume();
                if g.state.phase() != GamePhase::Playing {
                    return;
                }
                let rect = canvas.get_bounding_client_rect();
                let tap = Vec2::new(
                    (event.client_x() as f64 - rect.left()) as f32,
                    (event.client_y() as f64 - rect.top()) as f32,
                );
                let offset = tap - g.state.viewport.wheel_center();
                if let Some(rotation) = rotation_for_tap(offset, g.state.tuning.wheel_radius) {
                    g.input.push(rotation);
                }
            });
            window.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " => {
                        event.prevent_default();
                        if g.state.phase() == GamePhase::Playing {
                            g.input.push(rotation_for_key());
                        }
                    }
                    "m" | "M" => {
                        drop(g);
                        toggle_mute(&game);
                    }
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn toggle_mute(game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        let muted = !g.audio.is_muted();
        g.settings.muted = muted;
        g.audio.set_muted(muted);
        g.settings.save();
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            update_mute_label(&document, muted);
        }
    }

    fn update_mute_label(document: &Document, muted: bool) {
        set_text(document, "mute-btn", if muted { "Sound: off" } else { "Sound: on" });
    }

    /// Wire a button click to a lifecycle action and restart the loop
    fn on_click(
        document: &Document,
        id: &str,
        game: Rc<RefCell<Game>>,
        action: fn(&mut SimulationState),
    ) -> Result<(), JsValue> {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing #{id}");
            return Ok(());
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            {
                let mut g = game.borrow_mut();
                g.audio.resume();
                action(&mut g.state);
            }
            ensure_running(&game);
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        on_click(document, "start-btn", game.clone(), SimulationState::start)?;
        on_click(document, "restart-btn", game.clone(), SimulationState::restart)?;
        on_click(document, "continue-btn", game.clone(), SimulationState::continue_level)?;

        if let Some(btn) = document.get_element_by_id("mute-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                toggle_mute(&game);
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = fit_canvas(&window, &canvas);
            let viewport = canvas_viewport(&canvas);
            {
                let mut g = game.borrow_mut();
                let Game { state, rng, .. } = &mut *g;
                state.set_viewport(viewport, rng);
                if let Some(rs) = g.render_state.as_mut() {
                    rs.resize(width, height, (viewport.width, viewport.height));
                }
            }
            ensure_running(&game);
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: an autopilot lines up every object, then misses on purpose
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use chroma_wheel::renderer::{build_frame, shapes::tessellate_frame};
    use chroma_wheel::sim::{
        GameEvent, GamePhase, Rotation, SEGMENT_ORDER, SimulationState, TickInput, Viewport, tick,
    };
    use chroma_wheel::{HighScore, Settings, Tuning};
    use rand::SeedableRng;

    env_logger::init();
    log::info!("Chroma Wheel (native) starting...");
    log::info!("Native mode runs a headless simulation - run with `trunk serve` for the web version");

    // Optional tuning override file as the first argument
    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Cannot read tuning file {path}: {e}");
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let settings = Settings::load();
    let mut high_score = HighScore::load();
    let mut rng = rand_pcg::Pcg32::seed_from_u64(7);
    let mut state = SimulationState::new(tuning, Viewport::new(400.0, 800.0), &mut rng);
    state.set_particle_cap(settings.max_particles());
    state.set_high_score(high_score.best);
    state.start();

    const DT: f32 = 1000.0 / 60.0;
    const AUTOPILOT_TICKS: u64 = 60 * 90;
    let mut input = TickInput::default();

    while state.needs_frame() && state.time_ticks < AUTOPILOT_TICKS * 2 {
        if state.phase() == GamePhase::Playing
            && let Some(obj) = &state.falling
            && !obj.is_wildcard()
        {
            let wanted = SEGMENT_ORDER.iter().position(|&c| c == obj.color).unwrap_or(0);
            let current = state.wheel.active_segment();
            // Turning clockwise brings the segment before the active one to the top
            let steps = (current + 4 - wanted) % 4;
            let sabotage = state.time_ticks > AUTOPILOT_TICKS;
            match (steps, sabotage) {
                (0, true) => input.push(Rotation::HalfTurn),
                (1, false) => input.push(Rotation::Clockwise),
                (2, false) => input.push(Rotation::HalfTurn),
                (3, false) => input.push(Rotation::CounterClockwise),
                _ => {}
            }
        }

        tick(&mut state, &input, DT, &mut rng);
        input.clear();

        for event in state.drain_events() {
            match event {
                GameEvent::LevelUp { level } => log::info!("Level {level}"),
                GameEvent::GameOver { score, .. } => {
                    if high_score.record(score) {
                        high_score.save();
                    }
                    state.set_high_score(high_score.best);
                }
                _ => {}
            }
        }
    }

    let session = state.session();
    let vertices = tessellate_frame(&build_frame(&state)).len();
    println!(
        "Finished after {} ticks: score {}, level {}, best {}, last frame {} vertices",
        state.time_ticks,
        session.score(),
        session.level(),
        high_score.best,
        vertices
    );
}
