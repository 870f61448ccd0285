//! Session driving and tick scheduling
//!
//! `Runner` is the headless core: it routes lifecycle inputs (start,
//! pause, replay), advances the rule-set one tick at a time, persists the
//! high score on game over and publishes events. It runs identically under
//! tests, the native demo binary and the browser.
//!
//! The wasm `LoopHandle` wraps a `Runner` in a real interval timer. The
//! handle is a disposer: `cancel()` (or dropping it) synchronously clears
//! the timer and releases the closure, so no tick can ever fire against an
//! unmounted canvas. Pausing stops scheduling entirely instead of gating
//! inside the tick, so a resumed session picks up exactly where it froze.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::events::{ArcadeEvent, Cue, EventBus, EventQueue, achievements};
use super::game::ArcadeGame;
use super::input::{Action, TickInput};
use super::registry::GameId;
use super::session::{Session, SessionStatus};
use crate::highscores::HighScores;
use crate::render::{Frame, Hud, Overlay};

/// Headless session driver: one game, one session, one RNG stream
pub struct Runner {
    game: Box<dyn ArcadeGame>,
    session: Session,
    rng: Pcg32,
    highscores: HighScores,
    queue: EventQueue,
    bus: EventBus,
    /// Whether the most recent game over set a new record
    last_record: bool,
}

impl Runner {
    pub fn new(game: Box<dyn ArcadeGame>, seed: u64, highscores: HighScores) -> Self {
        let initial_lives = game.metadata().initial_lives;
        Self {
            game,
            session: Session::new(initial_lives),
            rng: Pcg32::seed_from_u64(seed),
            highscores,
            queue: EventQueue::new(),
            bus: EventBus::new(),
            last_record: false,
        }
    }

    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[inline]
    pub fn game(&self) -> &dyn ArcadeGame {
        &*self.game
    }

    /// Attach a host subscriber (audio trigger, toast service, HUD)
    pub fn subscribe(&mut self, subscriber: impl FnMut(&ArcadeEvent) + 'static) {
        self.bus.subscribe(subscriber);
    }

    pub fn high_score(&mut self) -> u32 {
        let key = self.game.metadata().storage_key;
        self.highscores.get(key)
    }

    /// Current tick interval as declared by the rule-set
    pub fn tick_interval_ms(&self) -> u32 {
        self.game.tick_interval_ms(&self.session)
    }

    /// Handle one sampled input snapshot: lifecycle control first, then at
    /// most one simulation tick. The tick that processes a pause does not
    /// advance the simulation.
    pub fn step(&mut self, input: &TickInput) {
        match self.session.status() {
            SessionStatus::Idle => {
                if input.fired(Action::Confirm) {
                    self.begin();
                }
                return;
            }
            SessionStatus::GameOver => {
                if input.fired(Action::Confirm) {
                    self.session.replay();
                    self.begin();
                }
                return;
            }
            SessionStatus::Paused => {
                if input.fired(Action::Pause) || input.fired(Action::Confirm) {
                    self.session.toggle_pause();
                }
                return;
            }
            SessionStatus::Running => {
                if input.fired(Action::Pause) {
                    self.session.toggle_pause();
                    return;
                }
            }
        }

        self.session.tick_elapsed();
        self.game
            .tick(&mut self.session, input, &mut self.rng, &mut self.queue);

        if self.session.status() == SessionStatus::GameOver {
            self.on_game_over();
        }
        self.bus.publish(&mut self.queue);
    }

    /// Drive n ticks with the same input snapshot (tests, native demo)
    pub fn run_ticks(&mut self, n: u32, input: &TickInput) {
        for _ in 0..n {
            self.step(input);
        }
    }

    /// Build the frame for the current state. Pure with respect to the
    /// simulation; only the high-score cache may warm up.
    pub fn render_frame(&mut self) -> Frame {
        let meta = self.game.metadata();
        let mut frame = Frame::new(meta.field_width, meta.field_height);
        frame.title = meta.title.to_string();
        self.game.render(&self.session, &mut frame);

        frame.hud = Hud {
            score: self.session.score(),
            high_score: self.highscores.get(meta.storage_key),
            lives: (meta.initial_lives > 0).then(|| self.session.lives()),
        };
        frame.overlay = match self.session.status() {
            SessionStatus::Idle => Overlay::Start,
            SessionStatus::Running => Overlay::None,
            SessionStatus::Paused => Overlay::Paused,
            SessionStatus::GameOver => Overlay::GameOver {
                score: self.session.score(),
                record: self.last_record,
            },
        };
        frame
    }

    fn begin(&mut self) {
        self.game.reset(&mut self.rng);
        self.session.start();
        self.last_record = false;
        log::info!("{} session started", self.game.metadata().id);
    }

    fn on_game_over(&mut self) {
        let meta = self.game.metadata();
        let score = self.session.score();
        let record = self.highscores.record(meta.storage_key, score);
        self.last_record = record;

        if record {
            self.queue
                .emit(ArcadeEvent::AchievementUnlocked(achievements::NEW_RECORD));
        }
        self.queue.emit(ArcadeEvent::SoundCue(Cue::GameOver));
        self.queue.emit(ArcadeEvent::SessionEnded {
            game: GameId::from(meta.id),
            score,
            record,
        });
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_loop::{LoopHandle, WeakLoopHandle};

#[cfg(target_arch = "wasm32")]
mod wasm_loop {
    use std::cell::{Cell, RefCell};
    use std::rc::{Rc, Weak};

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::Closure;

    use super::Runner;
    use crate::engine::input::InputSampler;
    use crate::render::canvas::CanvasRenderer;

    struct LoopState {
        runner: Runner,
        sampler: Rc<RefCell<InputSampler>>,
        renderer: CanvasRenderer,
        interval_id: Option<i32>,
        interval_ms: u32,
        closure: Option<Closure<dyn FnMut()>>,
    }

    impl LoopState {
        fn clear_interval(&mut self) {
            if let Some(id) = self.interval_id.take() {
                if let Some(window) = web_sys::window() {
                    window.clear_interval_with_handle(id);
                }
            }
        }
    }

    /// The cancelled flag lives outside the `RefCell` so `cancel()` can be
    /// called from anywhere, including an event subscriber firing mid-tick.
    struct LoopShared {
        cancelled: Cell<bool>,
        state: RefCell<LoopState>,
    }

    /// Owns the interval timer for one mounted game. Dropping the handle
    /// cancels the timer; nothing fires after `cancel()` returns.
    pub struct LoopHandle {
        shared: Rc<LoopShared>,
    }

    impl LoopHandle {
        /// Mount a runner on a renderer and draw the idle frame. No timer
        /// is armed until the session starts.
        pub fn start(
            runner: Runner,
            sampler: Rc<RefCell<InputSampler>>,
            renderer: CanvasRenderer,
        ) -> Self {
            let shared = Rc::new(LoopShared {
                cancelled: Cell::new(false),
                state: RefCell::new(LoopState {
                    runner,
                    sampler,
                    renderer,
                    interval_id: None,
                    interval_ms: 0,
                    closure: None,
                }),
            });
            {
                let mut s = shared.state.borrow_mut();
                let frame = s.runner.render_frame();
                s.renderer.draw(&frame);
            }
            Self { shared }
        }

        /// Pump one out-of-band step. Called by the key wiring for
        /// lifecycle keys while no timer is armed (idle, paused, game
        /// over); a running session consumes those keys on its own tick.
        pub fn control(&self) {
            control_pass(&self.shared);
        }

        /// Non-owning reference for event-handler closures. Holding one
        /// neither keeps the loop alive nor prevents cancellation.
        pub fn downgrade(&self) -> WeakLoopHandle {
            WeakLoopHandle {
                shared: Rc::downgrade(&self.shared),
            }
        }

        /// Stop the timer and release the closure. Idempotent, and safe to
        /// call at any moment, even from an event subscriber inside a tick
        /// (the tick then stops the timer itself on the way out).
        pub fn cancel(&self) {
            let first = !self.shared.cancelled.replace(true);
            if let Ok(mut s) = self.shared.state.try_borrow_mut() {
                s.clear_interval();
                s.closure = None;
            }
            if first {
                log::info!("game loop cancelled");
            }
        }
    }

    impl Drop for LoopHandle {
        fn drop(&mut self) {
            self.cancel();
        }
    }

    /// Weak counterpart of `LoopHandle` for key/visibility wiring
    #[derive(Clone)]
    pub struct WeakLoopHandle {
        shared: Weak<LoopShared>,
    }

    impl WeakLoopHandle {
        /// Pump one out-of-band step if the loop still exists and is not
        /// running on its own timer
        pub fn control(&self) {
            if let Some(shared) = self.shared.upgrade() {
                control_pass(&shared);
            }
        }
    }

    fn control_pass(shared: &Rc<LoopShared>) {
        if shared.cancelled.get() {
            return;
        }
        let running = shared.state.borrow().runner.session().is_running();
        if !running {
            tick_once(shared);
        }
    }

    /// One scheduler pass: sample, step, draw, re-arm or stop the timer.
    fn tick_once(shared: &Rc<LoopShared>) {
        if shared.cancelled.get() {
            return;
        }

        let rearm_ms = {
            let mut s = shared.state.borrow_mut();
            let input = s.sampler.borrow_mut().sample();
            s.runner.step(&input);
            let frame = s.runner.render_frame();
            s.renderer.draw(&frame);

            if shared.cancelled.get() {
                // Closed from inside an event subscriber mid-step
                s.clear_interval();
                None
            } else if s.runner.session().is_running() {
                let want = s.runner.tick_interval_ms();
                (s.interval_id.is_none() || want != s.interval_ms).then_some(want)
            } else {
                // Paused, idle or over: scheduling stops, resume re-arms
                s.clear_interval();
                None
            }
        };

        if let Some(ms) = rearm_ms {
            rearm(shared, ms);
        }
    }

    fn rearm(shared: &Rc<LoopShared>, interval_ms: u32) {
        let mut s = shared.state.borrow_mut();
        s.clear_interval();

        if s.closure.is_none() {
            let inner = shared.clone();
            s.closure = Some(Closure::new(move || tick_once(&inner)));
        }

        let Some(window) = web_sys::window() else {
            log::warn!("no window, cannot schedule ticks");
            return;
        };
        let callback = s.closure.as_ref().expect("closure just installed");
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            interval_ms as i32,
        ) {
            Ok(id) => {
                s.interval_id = Some(id);
                s.interval_ms = interval_ms;
            }
            Err(err) => log::warn!("set_interval failed: {err:?}"),
        }
    }
}
