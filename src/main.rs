//! Arcade Hub entry point
//!
//! On the web: picks a game from `?game=`, wires DOM input to the game loop and
//! drives it from `requestAnimationFrame`. Natively: plays every game headless
//! with a scripted autopilot and logs the results.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use arcade_hub::platform::{self, PerformanceClock};
    use arcade_hub::renderer::{CanvasPresenter, Presenter, Style};
    use arcade_hub::settings::Settings;
    use arcade_hub::sim::{Command, FrameScheduler, Game, GameLoop, InputEvent};

    /// Everything the browser callbacks share
    struct App {
        game: GameLoop<dyn Game>,
        presenter: CanvasPresenter,
        scheduler: FrameScheduler,
        clock: PerformanceClock,
        settings: Settings,
    }

    impl App {
        /// Run due ticks and redraw
        fn frame(&mut self) {
            if self.game.phase().is_running() {
                let ticks = self.scheduler.poll(&mut self.clock);
                for _ in 0..ticks {
                    self.game.tick();
                }
            } else {
                // Don't replay the time spent in a menu
                self.scheduler.reset();
            }
            let frame = self.game.frame();
            self.presenter.present(&frame);
        }
    }

    fn element_attr(document: &Document, id: &str, attr: &str) -> Option<String> {
        document.get_element_by_id(id)?.get_attribute(attr)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialized".into());
        }

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let search = window.location().search().unwrap_or_default();
        let kind = platform::game_from_query(&search);
        let settings = platform::load_settings(element_attr(&document, "canvas", "data-settings").as_deref());
        let tuning = platform::load_tuning(element_attr(&document, "canvas", "data-tuning").as_deref());
        log::info!("Arcade Hub starting {}", kind.title());

        if let Some(title) = document.get_element_by_id("title") {
            title.set_text_content(Some(kind.title()));
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let dpr = window.device_pixel_ratio();
        canvas.set_width((canvas.client_width() as f64 * dpr) as u32);
        canvas.set_height((canvas.client_height() as f64 * dpr) as u32);

        let mut presenter = CanvasPresenter::new(canvas.clone())?;
        presenter.show_hud = settings.show_hud;
        for (style, attr) in [(Style::Vehicle, "data-vehicle-skin"), (Style::Player, "data-player-skin")] {
            if let Some(url) = element_attr(&document, "canvas", attr)
                && let Err(e) = presenter.load_skin(style, &url)
            {
                log::warn!("could not load {attr}: {e:?}");
            }
        }

        let seed = settings.seed_or(js_sys::Date::now() as u64);
        let mut game = GameLoop::new(kind.build(&tuning), seed);
        if let Some(field) = settings.playfield {
            game = game.with_playfield(field);
        }
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            presenter,
            scheduler: FrameScheduler::new(),
            clock: PerformanceClock::new(),
            settings,
        }));

        setup_keyboard(app.clone())?;
        setup_canvas_touch(&canvas, app.clone())?;
        setup_control_buttons(&document, app.clone())?;
        setup_menu_buttons(&document, app.clone())?;
        setup_auto_pause(app.clone())?;

        request_animation_frame(app);
        log::info!("Arcade Hub running!");
        Ok(())
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if app.borrow_mut().game.handle_input(InputEvent::KeyDown(&code)) {
                    // Keep arrows and space from scrolling the page
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let code = event.code();
            app.borrow_mut().game.handle_input(InputEvent::KeyUp(&code));
        });
        window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_canvas_touch(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x_frac = platform::touch_fraction(touch.client_x() as f64, rect.left(), rect.width());
                    app.borrow_mut().game.handle_input(InputEvent::CanvasDown { x_frac });
                }
            });
            canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let x_frac = platform::touch_fraction(event.client_x() as f64, rect.left(), rect.width());
                app.borrow_mut().game.handle_input(InputEvent::CanvasDown { x_frac });
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        for name in ["touchend", "touchcancel", "mouseup", "mouseleave"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().game.handle_input(InputEvent::CanvasUp);
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    /// On-screen direction/action buttons named by the game's bindings
    fn setup_control_buttons(document: &Document, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let buttons = app.borrow().game.game().bindings().buttons;
        for &(id, _) in buttons {
            let Some(el) = document.get_element_by_id(id) else {
                log::debug!("no #{id} button on the page");
                continue;
            };
            for (name, down) in [
                ("touchstart", true),
                ("mousedown", true),
                ("touchend", false),
                ("touchcancel", false),
                ("mouseup", false),
                ("mouseleave", false),
            ] {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.prevent_default();
                    let input = if down {
                        InputEvent::ButtonDown(id)
                    } else {
                        InputEvent::ButtonUp(id)
                    };
                    app.borrow_mut().game.handle_input(input);
                });
                el.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
                closure.forget();
            }
        }
        Ok(())
    }

    fn setup_menu_buttons(document: &Document, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        for (id, command) in [
            ("startBtn", Command::Start),
            ("pauseBtn", Command::TogglePause),
            ("restartBtn", Command::Restart),
        ] {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("no #{id} on the page");
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.command(command);
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut a = app.borrow_mut();
                    if a.settings.auto_pause {
                        a.game.auto_pause();
                    }
                }
            });
            document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur (click outside)
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut a = app.borrow_mut();
            if a.settings.auto_pause {
                a.game.auto_pause();
            }
        });
        window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            log::warn!("no window, stopping the frame loop");
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            app.borrow_mut().frame();
            request_animation_frame(app);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::warn!("requestAnimationFrame failed: {e:?}");
        }
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Arcade Hub (native) starting...");

    let settings = arcade_hub::platform::load_settings(std::env::var("ARCADE_SETTINGS").ok().as_deref());
    let tuning = arcade_hub::platform::load_tuning(std::env::var("ARCADE_TUNING").ok().as_deref());
    let seed = settings.seed_or(42);

    for kind in arcade_hub::GameKind::ALL {
        autopilot(kind, &tuning, seed);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one game headless for up to a minute of simulated time, cycling keys
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(kind: arcade_hub::GameKind, tuning: &arcade_hub::Tuning, seed: u64) {
    use arcade_hub::renderer::{Presenter, TextPresenter};
    use arcade_hub::sim::{Command, GameLoop, InputEvent, Phase};

    const KEYS: [&str; 5] = ["ArrowLeft", "ArrowUp", "ArrowRight", "ArrowDown", "Space"];
    const HOLD_TICKS: u64 = 20;
    const MAX_TICKS: u64 = 3600;

    let mut game = GameLoop::new(kind.build(tuning), seed);
    game.command(Command::Start);

    let mut held: Option<&str> = None;
    while game.phase() == Phase::Playing && game.session().ticks < MAX_TICKS {
        if game.session().ticks % HOLD_TICKS == 0 {
            if let Some(key) = held {
                game.handle_input(InputEvent::KeyUp(key));
            }
            let key = KEYS[(game.session().ticks / HOLD_TICKS) as usize % KEYS.len()];
            game.handle_input(InputEvent::KeyDown(key));
            held = Some(key);
        }
        game.tick();
    }

    let mut text = TextPresenter::new(48, 16);
    text.present(&game.frame());
    for line in text.lines() {
        log::debug!("{line}");
    }
    log::info!(
        "{:<16} {} ticks, {}",
        kind.title(),
        game.session().ticks,
        text.status()
    );
}
