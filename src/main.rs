//! Cyber Arcade entry point
//!
//! On the web this exposes `mount_game`/`MountedGame`: the host page picks
//! a game id from the hub, hands over a canvas, and gets back a handle it
//! must `close()` before removing the canvas from the tree. Natively it
//! runs a short headless demo session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use cyber_arcade::engine::{
        Action, ArcadeEvent, Direction, GameId, GameRegistry, InputSampler, LoopHandle, Runner,
        WeakLoopHandle,
    };
    use cyber_arcade::render::canvas::CanvasRenderer;
    use cyber_arcade::{HighScores, Settings};

    /// Actions a key maps to. Space doubles as start/fire/flap so every
    /// game answers to the same thumb.
    fn key_actions(key: &str) -> &'static [Action] {
        match key {
            "ArrowLeft" | "a" | "A" => &[Action::MoveLeft],
            "ArrowRight" | "d" | "D" => &[Action::MoveRight],
            "ArrowUp" | "w" | "W" => &[Action::MoveUp, Action::Flap],
            "ArrowDown" | "s" | "S" => &[Action::MoveDown],
            " " => &[Action::Confirm, Action::Fire, Action::Flap],
            "Enter" => &[Action::Confirm, Action::Fire],
            "Escape" | "p" | "P" => &[Action::Pause],
            _ => &[],
        }
    }

    /// A mounted mini-game. Close it before unmounting the canvas; the
    /// handle cancels the tick timer and detaches every listener.
    #[wasm_bindgen]
    pub struct MountedGame {
        handle: Option<LoopHandle>,
        sampler: Rc<RefCell<InputSampler>>,
        canvas: HtmlCanvasElement,
        keydown: Option<Closure<dyn FnMut(KeyboardEvent)>>,
        keyup: Option<Closure<dyn FnMut(KeyboardEvent)>>,
        touchstart: Option<Closure<dyn FnMut(TouchEvent)>>,
        touchend: Option<Closure<dyn FnMut(TouchEvent)>>,
        visibility: Option<Closure<dyn FnMut(web_sys::Event)>>,
    }

    #[wasm_bindgen]
    impl MountedGame {
        /// Direction request from the host's on-screen D-pad buttons
        /// ("up", "down", "left", "right")
        pub fn press_dpad(&self, direction: &str) {
            let dir = match direction {
                "up" => Direction::Up,
                "down" => Direction::Down,
                "left" => Direction::Left,
                "right" => Direction::Right,
                _ => return,
            };
            self.sampler.borrow_mut().request_direction(dir);
        }

        /// Stop the loop and remove all listeners. Idempotent.
        pub fn close(&mut self) {
            if let Some(handle) = self.handle.take() {
                handle.cancel();
            }
            let window = web_sys::window();
            if let (Some(window), Some(cb)) = (window.as_ref(), self.keydown.take()) {
                let _ = window
                    .remove_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
            }
            if let (Some(window), Some(cb)) = (window.as_ref(), self.keyup.take()) {
                let _ = window
                    .remove_event_listener_with_callback("keyup", cb.as_ref().unchecked_ref());
            }
            if let Some(cb) = self.touchstart.take() {
                let _ = self
                    .canvas
                    .remove_event_listener_with_callback("touchstart", cb.as_ref().unchecked_ref());
            }
            if let Some(cb) = self.touchend.take() {
                let _ = self
                    .canvas
                    .remove_event_listener_with_callback("touchend", cb.as_ref().unchecked_ref());
            }
            if let Some(cb) = self.visibility.take() {
                if let Some(document) = window.and_then(|w| w.document()) {
                    let _ = document.remove_event_listener_with_callback(
                        "visibilitychange",
                        cb.as_ref().unchecked_ref(),
                    );
                }
            }
            log::info!("game unmounted");
        }
    }

    /// Mount a game by id on the given canvas. `on_event` receives each
    /// arcade event as a JSON string (scores, cues, achievements).
    #[wasm_bindgen]
    pub fn mount_game(
        game_id: &str,
        canvas_id: &str,
        on_event: Option<js_sys::Function>,
    ) -> Result<MountedGame, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("canvas not found"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("element is not a canvas"))?;

        let registry = GameRegistry::with_builtin_games();
        let game = registry
            .create(&GameId::from(game_id))
            .ok_or_else(|| JsValue::from_str("unknown game id"))?;

        let settings = Settings::load(&*cyber_arcade::platform::default_store());
        let renderer = CanvasRenderer::new(canvas.clone(), settings)
            .ok_or_else(|| JsValue::from_str("no 2d context"))?;

        let seed = js_sys::Date::now() as u64;
        let mut runner = Runner::new(game, seed, HighScores::open());
        log::info!("mounting {game_id} with seed {seed}");

        if let Some(callback) = on_event {
            let muted = settings.muted;
            runner.subscribe(move |event| {
                if muted && matches!(event, ArcadeEvent::SoundCue(_)) {
                    return;
                }
                if let Ok(json) = serde_json::to_string(event) {
                    let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(&json));
                }
            });
        }

        let sampler = Rc::new(RefCell::new(InputSampler::new()));
        let handle = LoopHandle::start(runner, sampler.clone(), renderer);
        let weak = handle.downgrade();

        let keydown = attach_keydown(&window, sampler.clone(), weak.clone())?;
        let keyup = attach_keyup(&window, sampler.clone())?;
        let touchstart = attach_touchstart(&canvas, sampler.clone(), weak.clone())?;
        let touchend = attach_touchend(&canvas, sampler.clone())?;
        let visibility = attach_visibility(&document, sampler.clone(), weak)?;

        Ok(MountedGame {
            handle: Some(handle),
            sampler,
            canvas,
            keydown: Some(keydown),
            keyup: Some(keyup),
            touchstart: Some(touchstart),
            touchend: Some(touchend),
            visibility: Some(visibility),
        })
    }

    fn attach_keydown(
        window: &web_sys::Window,
        sampler: Rc<RefCell<InputSampler>>,
        weak: WeakLoopHandle,
    ) -> Result<Closure<dyn FnMut(KeyboardEvent)>, JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = event.key();
            let actions = key_actions(&key);
            if actions.is_empty() {
                return;
            }
            event.prevent_default();
            {
                let mut s = sampler.borrow_mut();
                for &action in actions {
                    s.press(action);
                }
            }
            // Lifecycle keys must work while no timer is armed (idle,
            // paused, game over); a running loop ignores this pump.
            if actions
                .iter()
                .any(|a| matches!(a, Action::Confirm | Action::Pause))
            {
                weak.control();
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        Ok(closure)
    }

    fn attach_keyup(
        window: &web_sys::Window,
        sampler: Rc<RefCell<InputSampler>>,
    ) -> Result<Closure<dyn FnMut(KeyboardEvent)>, JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            for &action in key_actions(&event.key()) {
                sampler.borrow_mut().release(action);
            }
        });
        window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        Ok(closure)
    }

    /// A tap is start/fire/flap; holding the left or right third of the
    /// canvas steers the ship
    fn attach_touchstart(
        canvas: &HtmlCanvasElement,
        sampler: Rc<RefCell<InputSampler>>,
        weak: WeakLoopHandle,
    ) -> Result<Closure<dyn FnMut(TouchEvent)>, JsValue> {
        let target = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            event.prevent_default();
            {
                let mut s = sampler.borrow_mut();
                s.press(Action::Confirm);
                s.press(Action::Fire);
                s.press(Action::Flap);
                if let Some(touch) = event.touches().get(0) {
                    let rect = target.get_bounding_client_rect();
                    let x = touch.client_x() as f64 - rect.left();
                    if x < rect.width() / 3.0 {
                        s.press(Action::MoveLeft);
                    } else if x > rect.width() * 2.0 / 3.0 {
                        s.press(Action::MoveRight);
                    }
                }
            }
            weak.control();
        });
        canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
        Ok(closure)
    }

    fn attach_touchend(
        canvas: &HtmlCanvasElement,
        sampler: Rc<RefCell<InputSampler>>,
    ) -> Result<Closure<dyn FnMut(TouchEvent)>, JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            event.prevent_default();
            let mut s = sampler.borrow_mut();
            for action in [
                Action::Confirm,
                Action::Fire,
                Action::Flap,
                Action::MoveLeft,
                Action::MoveRight,
            ] {
                s.release(action);
            }
        });
        canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
        Ok(closure)
    }

    /// Auto-pause when the tab goes hidden; the next tick consumes it
    fn attach_visibility(
        document: &web_sys::Document,
        sampler: Rc<RefCell<InputSampler>>,
        weak: WeakLoopHandle,
    ) -> Result<Closure<dyn FnMut(web_sys::Event)>, JsValue> {
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if doc.visibility_state() == web_sys::VisibilityState::Hidden {
                sampler.borrow_mut().press(Action::Pause);
                sampler.borrow_mut().release(Action::Pause);
                weak.control();
                log::info!("auto-paused (tab hidden)");
            }
        });
        document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
        Ok(closure)
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Cyber Arcade ready");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::init();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use cyber_arcade::HighScores;
    use cyber_arcade::engine::{Action, Direction, GameId, GameRegistry, Runner, TickInput};

    env_logger::init();
    log::info!("Cyber Arcade (native) starting headless demo...");

    let registry = GameRegistry::with_builtin_games();
    let game = registry
        .create(&GameId::from("cyber-serpent"))
        .expect("built-in game");
    let mut runner = Runner::new(game, 0xC0FFEE, HighScores::open());
    runner.subscribe(|event| log::info!("event: {event:?}"));

    // Start, then steer a clockwise box so the run lasts a while
    runner.step(&TickInput::with_fired(&[Action::Confirm]));
    let laps = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];
    for lap in 0..12 {
        let turn = laps[lap % laps.len()];
        runner.step(&TickInput::with_direction(turn));
        runner.run_ticks(6, &TickInput::default());
    }

    println!(
        "demo over: score {} after {} ticks (status {:?})",
        runner.session().score(),
        runner.session().ticks(),
        runner.session().status(),
    );
}
