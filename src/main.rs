//! Canvas Arcade entry point
//!
//! On the web this wires one of the two games to the page canvas: the
//! puzzle by default, or the free-roam world when the canvas carries
//! `data-game="roam"`. Natively it runs a short headless session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use rand::seq::IndexedRandom;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use canvas_arcade::Settings;
    use canvas_arcade::input::{Controller, InputKind};
    use canvas_arcade::persistence::{KeyValueStore, LocalStore, MemoryStore, Storage};
    use canvas_arcade::puzzle::game::STORAGE_NAMESPACE;
    use canvas_arcade::puzzle::{Layout, PuzzleEvent, PuzzleGame};
    use canvas_arcade::render::{Canvas, Canvas2d, Colour};
    use canvas_arcade::sim::{ShapeKind, TickInput, World};

    /// Entities scattered around the free-roam world
    const ROAM_ENTITIES: usize = 12;

    enum Mode {
        Puzzle(PuzzleGame),
        Roam(World),
    }

    /// Everything the page callbacks share
    struct App {
        mode: Mode,
        controller: Controller,
        canvas: Canvas2d,
        storage: Storage<Box<dyn KeyValueStore>>,
    }

    impl App {
        fn pointer(&mut self, kind: InputKind, pos: Vec2) {
            match kind {
                InputKind::Start => self.controller.input_start(pos),
                InputKind::Move => self.controller.input_move(pos),
                InputKind::End => self.controller.input_end(),
            }

            let events: Vec<_> = self.controller.drain_events().collect();
            if let Mode::Puzzle(game) = &mut self.mode {
                for event in &events {
                    game.handle_input(event);
                }
            }
            self.publish();
        }

        fn tick(&mut self) {
            match &mut self.mode {
                Mode::Puzzle(game) => game.tick(),
                Mode::Roam(world) => world.tick(&TickInput::from(&self.controller.joystick)),
            }
            self.publish();
        }

        fn draw(&mut self) {
            self.canvas.clear();
            match &self.mode {
                Mode::Puzzle(game) => game.draw(&mut self.canvas),
                Mode::Roam(world) => {
                    let joystick = &self.controller.joystick;
                    world.draw(&mut self.canvas, joystick.enabled.then_some(joystick));
                }
            }
        }

        fn restart(&mut self) {
            if let Mode::Puzzle(game) = &mut self.mode {
                game.restart();
            }
            self.publish();
        }

        fn resize(&mut self, width: f32, height: f32) {
            self.canvas.resize(width as u32, height as u32);
            if let Mode::Puzzle(game) = &mut self.mode {
                game.resize(Layout::new(width, height));
            }
        }

        /// Push puzzle notifications to the page and storage
        fn publish(&mut self) {
            let Mode::Puzzle(game) = &mut self.mode else {
                return;
            };

            let mut dirty = false;
            for event in game.take_events() {
                match event {
                    PuzzleEvent::ScoreChanged { score, high_score } => {
                        update_control("score", &score.to_string());
                        update_control("highscore", &high_score.to_string());
                    }
                    PuzzleEvent::SegmentsCleared(_) | PuzzleEvent::StateChanged => dirty = true,
                    PuzzleEvent::PiecePlaced { .. } => {}
                }
            }

            if dirty {
                game.save(&mut self.storage);
            }
        }
    }

    fn update_control(id: &str, value: &str) {
        let element = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id));
        if let Some(element) = element {
            element.set_text_content(Some(value));
        }
    }

    fn window_size() -> (f32, f32) {
        let Some(window) = web_sys::window() else {
            return (0.0, 0.0);
        };
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
        (dim(window.inner_width()), dim(window.inner_height()))
    }

    fn open_storage() -> Storage<Box<dyn KeyValueStore>> {
        let backend: Box<dyn KeyValueStore> = match LocalStore::open() {
            Some(store) => Box::new(store),
            None => {
                log::warn!("LocalStorage unavailable, progress will not persist");
                Box::new(MemoryStore::new())
            }
        };
        Storage::new(STORAGE_NAMESPACE, backend)
    }

    fn roam_world(settings: &Settings, seed: u64, width: f32, height: f32) -> World {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut world = World::new(settings.environment);
        world.follow_player = settings.follow_player;

        let center = Vec2::new(width / 2.0, height / 2.0);
        let player = world.spawn(ShapeKind::Circle, center);
        player.colour = Colour::DodgerBlue;
        let player_id = player.id;
        world.player = Some(player_id);

        for _ in 0..ROAM_ENTITIES {
            let kind = if rng.random::<bool>() {
                ShapeKind::Circle
            } else {
                ShapeKind::Square
            };
            let pos = Vec2::new(rng.random::<f32>() * width, rng.random::<f32>() * height);
            let colour = Colour::ENTITY.choose(&mut rng).copied().unwrap_or_default();
            let entity = world.spawn(kind, pos);
            entity.colour = colour;
            entity.active = false;
        }
        world
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Canvas Arcade starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };
        let Some(ctx) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            log::error!("No 2d context");
            return;
        };

        let (width, height) = window_size();
        let canvas2d = Canvas2d::new(canvas.clone(), ctx);
        canvas2d.resize(width as u32, height as u32);

        let storage = open_storage();
        let settings = Settings::load(&storage);
        let seed = js_sys::Date::now() as u64;

        let mode = match canvas.get_attribute("data-game").as_deref() {
            Some("roam") => Mode::Roam(roam_world(&settings, seed, width, height)),
            _ => Mode::Puzzle(PuzzleGame::load(Layout::new(width, height), seed, &storage)),
        };
        log::info!("Game initialized with seed: {}", seed);

        // Only the free-roam game is steered by the joystick
        let mut controller = Controller::new(settings.joystick);
        controller.joystick.enabled = matches!(mode, Mode::Roam(_));

        let app = Rc::new(RefCell::new(App {
            mode,
            controller,
            canvas: canvas2d,
            storage,
        }));
        app.borrow_mut().publish();

        setup_input_handlers(&canvas, app.clone());
        setup_restart_button(app.clone());
        setup_resize(app.clone());
        start_update_interval(app.clone(), settings.update_delay_ms);
        request_animation_frame(app);

        log::info!("Canvas Arcade running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Keyboard
        for (name, down) in [("keydown", true), ("keyup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let mut app = app.borrow_mut();
                if down {
                    if key == "r" && !app.controller.is_pressed("r") {
                        app.restart();
                    }
                    app.controller.key_down(&key);
                } else {
                    app.controller.key_up(&key);
                }
            });
            let _ = document.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse
        for (name, kind) in [
            ("mousedown", InputKind::Start),
            ("mousemove", InputKind::Move),
            ("mouseup", InputKind::End),
        ] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = Vec2::new(event.page_x() as f32, event.page_y() as f32);
                app.borrow_mut().pointer(kind, pos);
                event.prevent_default();
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        for (name, kind) in [
            ("touchstart", InputKind::Start),
            ("touchmove", InputKind::Move),
            ("touchend", InputKind::End),
        ] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let pos = event
                    .touches()
                    .get(0)
                    .map(|t| Vec2::new(t.page_x() as f32, t.page_y() as f32))
                    .unwrap_or(Vec2::ZERO);
                app.borrow_mut().pointer(kind, pos);
                event.prevent_default();
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id("restart") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = window_size();
            app.borrow_mut().resize(width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Logic ticks run on a timer, independent of animation frames
    fn start_update_interval(app: Rc<RefCell<App>>, delay_ms: u32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut()>::new(move || {
            app.borrow_mut().tick();
        });
        if let Err(e) = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms as i32,
        ) {
            log::error!("Failed to start update interval: {:?}", e);
        }
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            app.borrow_mut().draw();
            request_animation_frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Canvas Arcade (native) starting...");
    log::info!("Native mode is headless - build for wasm32 to play in a browser");

    roam_session();
    puzzle_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Hold "d" for a second of simulated time and watch the player push a box
#[cfg(not(target_arch = "wasm32"))]
fn roam_session() {
    use canvas_arcade::consts::UPDATE_DELAY_MS;
    use canvas_arcade::input::Controller;
    use canvas_arcade::sim::{ShapeKind, TickInput, World};
    use canvas_arcade::Settings;
    use glam::Vec2;

    let settings = Settings::default();
    let mut world = World::new(settings.environment);
    let player = world.spawn(ShapeKind::Circle, Vec2::new(100.0, 100.0)).id;
    world.player = Some(player);
    let crate_id = world.spawn(ShapeKind::Square, Vec2::new(160.0, 100.0)).id;

    let mut controller = Controller::new(settings.joystick);
    controller.joystick.enabled = true;
    controller.key_down("d");

    let ticks = 1000 / UPDATE_DELAY_MS;
    for _ in 0..ticks {
        world.tick(&TickInput::from(&controller.joystick));
    }
    controller.key_up("d");

    if let (Some(p), Some(c)) = (world.entity(player), world.entity(crate_id)) {
        log::info!(
            "After {} ticks: player at ({:.1}, {:.1}), crate at ({:.1}, {:.1})",
            world.time_ticks,
            p.pos.x,
            p.pos.y,
            c.pos.x,
            c.pos.y
        );
    }
}

/// Play one piece, save, and load the game back
#[cfg(not(target_arch = "wasm32"))]
fn puzzle_session() {
    use canvas_arcade::persistence::{MemoryStore, Storage};
    use canvas_arcade::puzzle::game::STORAGE_NAMESPACE;
    use canvas_arcade::puzzle::{CellState, Layout, PuzzleGame};

    let layout = Layout::new(800.0, 800.0);
    let mut storage = Storage::new(STORAGE_NAMESPACE, MemoryStore::new());
    let mut game = PuzzleGame::load(layout, 42, &storage);

    // Drop the first piece with its first square on the board's top-left cell
    let size = layout.square_size;
    if let Some((grab, first)) = game
        .pieces
        .first()
        .and_then(|p| p.tiles().next())
        .map(|t| (t.center(size), t.origin(size)))
    {
        let origin = game.board.cells()[0].tile.origin(size);
        game.start_drag(grab);
        game.continue_drag(grab + (origin - first));
        let placed = game.end_drag();
        log::info!("Piece placed: {}", placed);
    }

    game.tick();
    game.save(&mut storage);

    let reloaded = PuzzleGame::load(layout, 7, &storage);
    log::info!(
        "Reloaded: {} placed cells, {} pieces, score {}",
        reloaded.board.count(CellState::Placed),
        reloaded.pieces.len(),
        reloaded.score
    );
}
