//! The rule-set seam
//!
//! The runner owns scheduling, sessions, persistence and event dispatch;
//! a game only supplies rules and a frame description.

use rand_pcg::Pcg32;

use super::events::EventQueue;
use super::input::TickInput;
use super::session::Session;
use crate::render::Frame;

/// Game metadata for the hub and the high-score store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameMetadata {
    /// Registry id, e.g. `cyber-serpent`
    pub id: &'static str,
    /// Display title, e.g. `CYBER SERPENT`
    pub title: &'static str,
    /// Lives a fresh session starts with (0 = the game has no lives)
    pub initial_lives: u8,
    /// localStorage key holding the decimal high score
    pub storage_key: &'static str,
    /// Play-field size in pixels
    pub field_width: f32,
    pub field_height: f32,
}

/// One mini-game's rules, plugged into the shared engine
pub trait ArcadeGame {
    fn metadata(&self) -> GameMetadata;

    /// Current tick interval. Queried after every tick, so a rule-set may
    /// speed up mid-run (snake) while the others stay fixed.
    fn tick_interval_ms(&self, session: &Session) -> u32;

    /// Rebuild the initial spawn state. Called on start and on replay.
    fn reset(&mut self, rng: &mut Pcg32);

    /// Advance one tick. Only invoked while the session is `Running`;
    /// pausing stops the scheduler instead of gating in here.
    fn tick(
        &mut self,
        session: &mut Session,
        input: &TickInput,
        rng: &mut Pcg32,
        events: &mut EventQueue,
    );

    /// Pure read of the current state into a frame. Must tolerate a fresh
    /// (never-ticked) state and a game-over state.
    fn render(&self, session: &Session, frame: &mut Frame);
}
