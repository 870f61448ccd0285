//! Session lifecycle and scoring
//!
//! One `Session` per play-through. Status transitions follow a strict
//! machine; score only moves through `award`, so it cannot decrease
//! within a session.

use serde::{Deserialize, Serialize};

/// Lifecycle of one play-through
///
/// `Idle -> Running <-> Paused; Running -> GameOver; GameOver -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Meta-state for one play-through of a mini-game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    status: SessionStatus,
    score: u32,
    lives: u8,
    ticks: u64,
    initial_lives: u8,
}

impl Session {
    pub fn new(initial_lives: u8) -> Self {
        Self {
            status: SessionStatus::Idle,
            score: 0,
            lives: initial_lives,
            ticks: 0,
            initial_lives,
        }
    }

    #[inline]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn lives(&self) -> u8 {
        self.lives
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    /// `Idle -> Running`. Score, lives and tick counter restart here.
    pub fn start(&mut self) {
        if self.status != SessionStatus::Idle {
            return;
        }
        self.score = 0;
        self.lives = self.initial_lives;
        self.ticks = 0;
        self.status = SessionStatus::Running;
        log::info!("session started ({} lives)", self.lives);
    }

    /// `Running <-> Paused`. No-op in any other state.
    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            SessionStatus::Running => {
                log::info!("session paused at tick {}", self.ticks);
                SessionStatus::Paused
            }
            SessionStatus::Paused => SessionStatus::Running,
            other => other,
        };
    }

    /// `Running -> GameOver`. Terminal collision, boundary breach, or lives
    /// exhausted. High-score persistence is the runner's job on observing
    /// this transition.
    pub fn finish(&mut self) {
        if self.status == SessionStatus::Running {
            log::info!("game over: score {} after {} ticks", self.score, self.ticks);
            self.status = SessionStatus::GameOver;
        }
    }

    /// `GameOver -> Idle`. Full reset; the rule-set rebuilds its spawn
    /// state separately.
    pub fn replay(&mut self) {
        if self.status != SessionStatus::GameOver {
            return;
        }
        self.score = 0;
        self.lives = self.initial_lives;
        self.ticks = 0;
        self.status = SessionStatus::Idle;
    }

    /// Add points. Only effective while running; saturates rather than wraps.
    pub fn award(&mut self, points: u32) {
        if self.status == SessionStatus::Running {
            self.score = self.score.saturating_add(points);
        }
    }

    /// Remove one life; returns the remaining count. Does not end the
    /// session itself, the rule-set decides what zero means.
    pub fn lose_life(&mut self) -> u8 {
        if self.status == SessionStatus::Running {
            self.lives = self.lives.saturating_sub(1);
        }
        self.lives
    }

    /// Advance the tick counter. Called by the runner once per simulated tick.
    pub(crate) fn tick_elapsed(&mut self) {
        self.ticks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_happy_path() {
        let mut s = Session::new(3);
        assert_eq!(s.status(), SessionStatus::Idle);
        s.start();
        assert_eq!(s.status(), SessionStatus::Running);
        s.toggle_pause();
        assert_eq!(s.status(), SessionStatus::Paused);
        s.toggle_pause();
        assert_eq!(s.status(), SessionStatus::Running);
        s.finish();
        assert_eq!(s.status(), SessionStatus::GameOver);
        s.replay();
        assert_eq!(s.status(), SessionStatus::Idle);
    }

    #[test]
    fn score_only_counts_while_running() {
        let mut s = Session::new(3);
        s.award(10);
        assert_eq!(s.score(), 0);
        s.start();
        s.award(10);
        s.award(5);
        assert_eq!(s.score(), 15);
        s.finish();
        s.award(99);
        assert_eq!(s.score(), 15);
    }

    #[test]
    fn replay_resets_score_lives_ticks() {
        let mut s = Session::new(3);
        s.start();
        s.award(40);
        s.lose_life();
        s.tick_elapsed();
        s.finish();
        s.replay();
        assert_eq!(s.score(), 0);
        assert_eq!(s.lives(), 3);
        assert_eq!(s.ticks(), 0);
    }

    #[test]
    fn pause_is_invalid_from_idle_and_game_over() {
        let mut s = Session::new(1);
        s.toggle_pause();
        assert_eq!(s.status(), SessionStatus::Idle);
        s.start();
        s.finish();
        s.toggle_pause();
        assert_eq!(s.status(), SessionStatus::GameOver);
    }

    #[test]
    fn lives_saturate_at_zero() {
        let mut s = Session::new(1);
        s.start();
        assert_eq!(s.lose_life(), 0);
        assert_eq!(s.lose_life(), 0);
    }
}
