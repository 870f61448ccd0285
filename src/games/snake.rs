//! CYBER SERPENT - grid snake
//!
//! 20x20 cells, speeding up with every food eaten. The head moving into a
//! wall or any body cell ends the run; there is no wraparound.

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use rand::Rng;
use rand_pcg::Pcg32;

use crate::engine::collision::cell_in_grid;
use crate::engine::events::{ArcadeEvent, Cue, EventQueue, achievements};
use crate::engine::game::{ArcadeGame, GameMetadata};
use crate::engine::input::{Direction, TickInput};
use crate::engine::session::Session;
use crate::render::{Frame, Tone};

/// Play field edge, in cells
pub const GRID_SIZE: i32 = 20;
/// Cell edge, in pixels
pub const CELL_SIZE: f32 = 20.0;
/// Tick interval at the start of a run
pub const INITIAL_TICK_MS: u32 = 150;
/// Speed-up per food eaten
pub const TICK_STEP_MS: u32 = 5;
/// Fastest the snake gets
pub const MIN_TICK_MS: u32 = 50;
/// Points per food
pub const FOOD_POINTS: u32 = 10;

const GRID: IVec2 = IVec2::new(GRID_SIZE, GRID_SIZE);

pub struct SnakeGame {
    /// Head first
    pub body: VecDeque<IVec2>,
    pub heading: Direction,
    pub food: IVec2,
    pub interval_ms: u32,
    milestone_sent: bool,
}

impl SnakeGame {
    pub fn new() -> Self {
        Self {
            body: VecDeque::from([IVec2::new(10, 10)]),
            heading: Direction::Right,
            food: IVec2::new(15, 15),
            interval_ms: INITIAL_TICK_MS,
            milestone_sent: false,
        }
    }

    /// Place food on a cell no body segment occupies. The board has 400
    /// cells, so collecting the free ones is cheap and never loops forever.
    fn respawn_food(&mut self, rng: &mut Pcg32) -> bool {
        let mut free = Vec::with_capacity((GRID_SIZE * GRID_SIZE) as usize - self.body.len());
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                let cell = IVec2::new(x, y);
                if !self.body.contains(&cell) {
                    free.push(cell);
                }
            }
        }
        match free.is_empty() {
            true => false,
            false => {
                self.food = free[rng.random_range(0..free.len())];
                true
            }
        }
    }
}

impl Default for SnakeGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcadeGame for SnakeGame {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            id: "cyber-serpent",
            title: "CYBER SERPENT",
            initial_lives: 0,
            storage_key: "snakeHighScore",
            field_width: GRID_SIZE as f32 * CELL_SIZE,
            field_height: GRID_SIZE as f32 * CELL_SIZE,
        }
    }

    fn tick_interval_ms(&self, _session: &Session) -> u32 {
        self.interval_ms
    }

    fn reset(&mut self, _rng: &mut Pcg32) {
        *self = Self::new();
    }

    fn tick(
        &mut self,
        session: &mut Session,
        input: &TickInput,
        rng: &mut Pcg32,
        events: &mut EventQueue,
    ) {
        // A reversal would put the head straight into the neck
        if let Some(dir) = input.direction() {
            if dir != self.heading.opposite() {
                self.heading = dir;
            }
        }

        let head = *self.body.front().expect("snake always has a head");
        let new_head = head + self.heading.delta();

        // Walls, then every existing body cell - the tail has not moved yet
        if !cell_in_grid(new_head, GRID) || self.body.contains(&new_head) {
            session.finish();
            return;
        }

        self.body.push_front(new_head);

        if new_head == self.food {
            session.award(FOOD_POINTS);
            events.emit(ArcadeEvent::ScoreChanged {
                score: session.score(),
            });
            events.emit(ArcadeEvent::SoundCue(Cue::Eat));
            self.interval_ms = self.interval_ms.saturating_sub(TICK_STEP_MS).max(MIN_TICK_MS);

            if session.score() >= 50 && !self.milestone_sent {
                self.milestone_sent = true;
                events.emit(ArcadeEvent::AchievementUnlocked(achievements::SERPENT_50));
            }

            if !self.respawn_food(rng) {
                // Board is full: nothing left to eat
                session.finish();
            }
        } else {
            self.body.pop_back();
        }
    }

    fn render(&self, _session: &Session, frame: &mut Frame) {
        let inset = Vec2::splat(1.0);
        let cell = Vec2::splat(CELL_SIZE) - inset * 2.0;
        for segment in &self.body {
            let pos = segment.as_vec2() * CELL_SIZE + inset;
            frame.rect(pos, cell, Tone::Player);
        }

        let center = (self.food.as_vec2() + Vec2::splat(0.5)) * CELL_SIZE;
        frame.circle(center, CELL_SIZE / 2.0 - 4.0, Tone::Pickup);
    }
}
