//! Runner-level lifecycle behavior: start, pause, replay, persistence.

use std::cell::RefCell;
use std::rc::Rc;

use cyber_arcade::HighScores;
use cyber_arcade::engine::{
    Action, ArcadeEvent, Direction, GameId, GameRegistry, Runner, TickInput,
};
use cyber_arcade::platform::{KeyValueStore, MemoryStore, StorageError};
use cyber_arcade::render::Overlay;

/// A store several `HighScores` instances can share, like the browser's
/// localStorage across page loads
#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key)
    }
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0.borrow_mut().set(key, value)
    }
}

fn make_runner(game_id: &str, store: SharedStore) -> Runner {
    let registry = GameRegistry::with_builtin_games();
    let game = registry.create(&GameId::from(game_id)).expect("built-in");
    Runner::new(game, 42, HighScores::with_store(Box::new(store)))
}

fn start() -> TickInput {
    TickInput::with_fired(&[Action::Confirm])
}

fn pause() -> TickInput {
    TickInput::with_fired(&[Action::Pause])
}

#[test]
fn idle_session_renders_start_overlay() {
    let mut runner = make_runner("gravity-glitch", SharedStore::default());
    let frame = runner.render_frame();
    assert_eq!(frame.overlay, Overlay::Start);
    assert_eq!(frame.hud.score, 0);
    assert_eq!(frame.title, "GRAVITY GLITCH");
}

#[test]
fn nothing_advances_before_start() {
    let mut runner = make_runner("gravity-glitch", SharedStore::default());
    let before = runner.render_frame();
    runner.run_ticks(50, &TickInput::default());
    let after = runner.render_frame();
    assert_eq!(before, after);
    assert_eq!(runner.session().ticks(), 0);
}

#[test]
fn pause_freezes_the_simulation_exactly() {
    let mut runner = make_runner("gravity-glitch", SharedStore::default());
    runner.step(&start());
    runner.run_ticks(20, &TickInput::with_fired(&[Action::Flap]));
    assert!(runner.session().is_running());

    let frozen = runner.render_frame();
    runner.step(&pause());
    // The pause tick itself must not advance entities
    assert_eq!(runner.render_frame().cmds, frozen.cmds);
    assert_eq!(runner.render_frame().overlay, Overlay::Paused);

    // Ticks while paused change nothing
    runner.run_ticks(100, &TickInput::default());
    assert_eq!(runner.render_frame().cmds, frozen.cmds);

    // Resume and keep going: now the world moves again
    runner.step(&pause());
    runner.run_ticks(2, &TickInput::default());
    assert_ne!(runner.render_frame().cmds, frozen.cmds);
}

#[test]
fn replay_reproduces_the_initial_spawn_state() {
    let mut runner = make_runner("cyber-serpent", SharedStore::default());
    runner.step(&start());
    let fresh = runner.render_frame();

    // Run the snake into the right wall
    runner.run_ticks(30, &TickInput::default());
    assert!(!runner.session().is_running());

    runner.step(&start()); // replay
    let replayed = runner.render_frame();
    assert_eq!(replayed.cmds, fresh.cmds);
    assert_eq!(replayed.hud.score, 0);
    assert_eq!(runner.session().ticks(), 0);
}

/// Steer the snake onto the starting food at (15,15): 5 right, 5 down.
fn eat_one_food(runner: &mut Runner) {
    runner.run_ticks(5, &TickInput::default()); // heading right
    runner.step(&TickInput::with_direction(Direction::Down));
    runner.run_ticks(4, &TickInput::default());
}

#[test]
fn high_score_survives_sessions_and_never_lowers() {
    let store = SharedStore::default();
    let events = Rc::new(RefCell::new(Vec::new()));

    let best = {
        let mut runner = make_runner("cyber-serpent", store.clone());
        let sink = events.clone();
        runner.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        runner.step(&start());
        eat_one_food(&mut runner);
        assert!(runner.session().score() >= 10);
        // Ride down into the wall (respawned food on the way is a bonus)
        runner.run_ticks(30, &TickInput::default());
        assert!(!runner.session().is_running());
        runner.session().score()
    };

    let ended: Vec<_> = events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            ArcadeEvent::SessionEnded { score, record, .. } => Some((*score, *record)),
            _ => None,
        })
        .collect();
    assert_eq!(ended, vec![(best, true)]);
    assert_eq!(store.get("snakeHighScore"), Some(best.to_string()));

    // A later, worse session must not lower the stored value
    let mut runner = make_runner("cyber-serpent", store.clone());
    assert_eq!(runner.high_score(), best);
    runner.step(&start());
    runner.run_ticks(30, &TickInput::default()); // straight into the wall, score 0
    assert!(!runner.session().is_running());
    assert_eq!(store.get("snakeHighScore"), Some(best.to_string()));

    let frame = runner.render_frame();
    assert_eq!(
        frame.overlay,
        Overlay::GameOver {
            score: 0,
            record: false
        }
    );
}

#[test]
fn game_over_overlay_flags_a_record() {
    let mut runner = make_runner("cyber-serpent", SharedStore::default());
    runner.step(&start());
    eat_one_food(&mut runner);
    runner.run_ticks(30, &TickInput::default());
    let score = runner.session().score();
    assert!(score >= 10);
    assert_eq!(
        runner.render_frame().overlay,
        Overlay::GameOver {
            score,
            record: true
        }
    );
}

#[test]
fn unknown_game_id_is_a_miss_not_a_panic() {
    let registry = GameRegistry::with_builtin_games();
    assert!(registry.create(&GameId::from("does-not-exist")).is_none());
}
