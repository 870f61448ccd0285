//! GRAVITY GLITCH - flappy bird clone
//!
//! Gravity accumulates into the vertical velocity every tick; a flap SETS
//! the velocity to the fixed impulse instead of adding to it, so mashing
//! the key cannot launch the bird off the top of the field.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::FRAME_TICK_MS;
use crate::engine::collision::{Aabb, circle_aabb_overlap};
use crate::engine::events::{ArcadeEvent, Cue, EventQueue, achievements};
use crate::engine::game::{ArcadeGame, GameMetadata};
use crate::engine::input::{Action, TickInput};
use crate::engine::session::Session;
use crate::render::{Frame, Tone};
use crate::tick_dt;

pub const FIELD_WIDTH: f32 = 320.0;
pub const FIELD_HEIGHT: f32 = 480.0;
pub const BIRD_X: f32 = 80.0;
pub const BIRD_RADIUS: f32 = 10.0;
/// Downward acceleration, px/s^2
pub const GRAVITY: f32 = 900.0;
/// Velocity a flap sets, px/s (negative = up)
pub const FLAP_VELOCITY: f32 = -260.0;
pub const PIPE_WIDTH: f32 = 52.0;
pub const GAP_HEIGHT: f32 = 110.0;
/// Closest the gap center gets to either field edge
pub const GAP_MARGIN: f32 = 40.0;
pub const SCROLL_SPEED: f32 = 120.0;
pub const SPAWN_START_MS: f32 = 1800.0;
/// Cadence tightens per point scored
pub const SPAWN_STEP_MS: f32 = 15.0;
pub const SPAWN_MIN_MS: f32 = 1100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    /// Center of the gap
    pub gap_center: f32,
    /// Already counted when it passed the bird
    pub scored: bool,
}

impl Pipe {
    /// Solid part above the gap
    pub fn top_aabb(&self) -> Aabb {
        Aabb::new(
            Vec2::new(self.x, 0.0),
            Vec2::new(self.x + PIPE_WIDTH, self.gap_center - GAP_HEIGHT / 2.0),
        )
    }

    /// Solid part below the gap
    pub fn bottom_aabb(&self) -> Aabb {
        Aabb::new(
            Vec2::new(self.x, self.gap_center + GAP_HEIGHT / 2.0),
            Vec2::new(self.x + PIPE_WIDTH, FIELD_HEIGHT),
        )
    }
}

pub struct FlappyGame {
    pub bird_y: f32,
    pub bird_vy: f32,
    pub pipes: Vec<Pipe>,
    pub spawn_timer_ms: f32,
    milestone_sent: bool,
}

impl FlappyGame {
    pub fn new() -> Self {
        Self {
            bird_y: FIELD_HEIGHT / 2.0,
            bird_vy: 0.0,
            pipes: Vec::new(),
            // First pipe appears on the first tick
            spawn_timer_ms: SPAWN_START_MS,
            milestone_sent: false,
        }
    }

    /// Cadence as a function of score, floored
    fn spawn_interval_ms(score: u32) -> f32 {
        (SPAWN_START_MS - SPAWN_STEP_MS * score as f32).max(SPAWN_MIN_MS)
    }
}

impl Default for FlappyGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcadeGame for FlappyGame {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            id: "gravity-glitch",
            title: "GRAVITY GLITCH",
            initial_lives: 0,
            storage_key: "gravityGlitchHighScore",
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
        }
    }

    fn tick_interval_ms(&self, _session: &Session) -> u32 {
        FRAME_TICK_MS
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
        let dt = tick_dt(FRAME_TICK_MS);

        if input.fired(Action::Flap) {
            self.bird_vy = FLAP_VELOCITY;
            events.emit(ArcadeEvent::SoundCue(Cue::Flap));
        }

        self.bird_vy += GRAVITY * dt;
        self.bird_y += self.bird_vy * dt;

        // Ceiling clamps, floor kills
        if self.bird_y - BIRD_RADIUS < 0.0 {
            self.bird_y = BIRD_RADIUS;
            self.bird_vy = 0.0;
        }
        if self.bird_y + BIRD_RADIUS >= FIELD_HEIGHT {
            session.finish();
            return;
        }

        for pipe in &mut self.pipes {
            pipe.x -= SCROLL_SPEED * dt;
            if !pipe.scored && pipe.x + PIPE_WIDTH < BIRD_X {
                pipe.scored = true;
                session.award(1);
                events.emit(ArcadeEvent::ScoreChanged {
                    score: session.score(),
                });
                events.emit(ArcadeEvent::SoundCue(Cue::Score));
            }
        }
        self.pipes.retain(|p| p.x + PIPE_WIDTH > 0.0);

        if !self.milestone_sent && session.score() >= 10 {
            self.milestone_sent = true;
            events.emit(ArcadeEvent::AchievementUnlocked(achievements::GLITCH_10));
        }

        self.spawn_timer_ms += dt * 1000.0;
        let interval = Self::spawn_interval_ms(session.score());
        while self.spawn_timer_ms >= interval {
            self.spawn_timer_ms -= interval;
            let lo = GAP_HEIGHT / 2.0 + GAP_MARGIN;
            let hi = FIELD_HEIGHT - GAP_HEIGHT / 2.0 - GAP_MARGIN;
            self.pipes.push(Pipe {
                x: FIELD_WIDTH,
                gap_center: rng.random_range(lo..hi),
                scored: false,
            });
        }

        let bird = Vec2::new(BIRD_X, self.bird_y);
        for pipe in &self.pipes {
            if circle_aabb_overlap(bird, BIRD_RADIUS, &pipe.top_aabb())
                || circle_aabb_overlap(bird, BIRD_RADIUS, &pipe.bottom_aabb())
            {
                session.finish();
                return;
            }
        }
    }

    fn render(&self, _session: &Session, frame: &mut Frame) {
        for pipe in &self.pipes {
            let top = pipe.top_aabb();
            let bottom = pipe.bottom_aabb();
            frame.rect(top.min, top.max - top.min, Tone::Enemy);
            frame.rect(bottom.min, bottom.max - bottom.min, Tone::Enemy);
        }
        frame.circle(Vec2::new(BIRD_X, self.bird_y), BIRD_RADIUS, Tone::Player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn running_session() -> Session {
        let mut s = Session::new(0);
        s.start();
        s
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(11)
    }

    #[test]
    fn flap_overrides_downward_velocity() {
        let mut game = FlappyGame::new();
        game.bird_vy = 500.0; // falling hard
        let mut session = running_session();
        let flap = TickInput::with_fired(&[Action::Flap]);
        game.tick(&mut session, &flap, &mut rng(), &mut EventQueue::new());
        // Set to the impulse, then one tick of gravity
        let dt = tick_dt(FRAME_TICK_MS);
        assert_eq!(game.bird_vy, FLAP_VELOCITY + GRAVITY * dt);
    }

    #[test]
    fn gravity_accumulates_without_input() {
        let mut game = FlappyGame::new();
        let mut session = running_session();
        let mut r = rng();
        let dt = tick_dt(FRAME_TICK_MS);
        game.tick(&mut session, &TickInput::default(), &mut r, &mut EventQueue::new());
        let after_one = game.bird_vy;
        game.tick(&mut session, &TickInput::default(), &mut r, &mut EventQueue::new());
        assert_eq!(after_one, GRAVITY * dt);
        assert_eq!(game.bird_vy, 2.0 * GRAVITY * dt);
    }

    #[test]
    fn floor_ends_the_run() {
        let mut game = FlappyGame::new();
        game.bird_y = FIELD_HEIGHT - BIRD_RADIUS - 1.0;
        game.bird_vy = 400.0;
        let mut session = running_session();
        game.tick(&mut session, &TickInput::default(), &mut rng(), &mut EventQueue::new());
        assert!(!session.is_running());
    }

    #[test]
    fn ceiling_clamps_instead_of_killing() {
        let mut game = FlappyGame::new();
        game.bird_y = BIRD_RADIUS + 1.0;
        game.bird_vy = -400.0;
        let mut session = running_session();
        game.tick(&mut session, &TickInput::default(), &mut rng(), &mut EventQueue::new());
        assert!(session.is_running());
        assert_eq!(game.bird_y, BIRD_RADIUS);
        assert_eq!(game.bird_vy, 0.0);
    }

    #[test]
    fn passing_a_pipe_scores_once() {
        let mut game = FlappyGame::new();
        game.spawn_timer_ms = 0.0;
        game.bird_y = 200.0;
        game.bird_vy = 0.0;
        game.pipes.push(Pipe {
            x: BIRD_X - PIPE_WIDTH + 1.0, // about to clear the bird
            gap_center: 200.0,
            scored: false,
        });
        let mut session = running_session();
        let mut r = rng();
        let flap = TickInput::with_fired(&[Action::Flap]);
        game.tick(&mut session, &flap, &mut r, &mut EventQueue::new());
        assert_eq!(session.score(), 1);
        game.tick(&mut session, &flap, &mut r, &mut EventQueue::new());
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn offscreen_pipes_are_removed_within_a_tick() {
        let mut game = FlappyGame::new();
        game.spawn_timer_ms = 0.0;
        game.pipes.push(Pipe {
            x: -PIPE_WIDTH - 1.0,
            gap_center: 240.0,
            scored: true,
        });
        let mut session = running_session();
        let flap = TickInput::with_fired(&[Action::Flap]);
        game.tick(&mut session, &flap, &mut rng(), &mut EventQueue::new());
        assert!(game.pipes.is_empty());
    }

    #[test]
    fn cadence_floor() {
        assert_eq!(FlappyGame::spawn_interval_ms(0), SPAWN_START_MS);
        assert_eq!(FlappyGame::spawn_interval_ms(1000), SPAWN_MIN_MS);
    }
}
