//! CYBER DEFENSE - vertical shooter
//!
//! Bugs rain from the top of the field; the ship guards the line at the
//! bottom. Bolt-vs-bug pairs resolve before bug-vs-ship pairs, so firing
//! into a bug that reaches you on the same tick trades instead of
//! swallowing the kill.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::{DEFAULT_LIVES, FRAME_TICK_MS};
use crate::engine::collision::Aabb;
use crate::engine::events::{ArcadeEvent, Cue, EventQueue, achievements};
use crate::engine::game::{ArcadeGame, GameMetadata};
use crate::engine::input::{Action, TickInput};
use crate::engine::session::Session;
use crate::render::{Frame, Tone};
use crate::tick_dt;

pub const FIELD_WIDTH: f32 = 400.0;
pub const FIELD_HEIGHT: f32 = 300.0;
pub const SHIP_SIZE: Vec2 = Vec2::new(24.0, 12.0);
pub const SHIP_SPEED: f32 = 180.0;
pub const BOLT_SIZE: Vec2 = Vec2::new(3.0, 9.0);
pub const BOLT_SPEED: f32 = 240.0;
/// On-screen player bolts are capped
pub const MAX_BOLTS: usize = 3;
pub const BUG_SIZE: Vec2 = Vec2::new(14.0, 10.0);
pub const BUG_BASE_SPEED: f32 = 60.0;
/// Extra descent speed per 100 points
pub const BUG_SPEED_PER_100: f32 = 2.0;
pub const SPAWN_START_MS: f32 = 1500.0;
/// Spawn cadence tightens with every kill
pub const SPAWN_STEP_MS: f32 = 40.0;
pub const SPAWN_MIN_MS: f32 = 400.0;
pub const KILL_POINTS: u32 = 10;

/// The line bugs must not cross
pub const DEFENSE_LINE: f32 = FIELD_HEIGHT - SHIP_SIZE.y;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bolt {
    /// Top-left corner
    pub pos: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bug {
    /// Top-left corner
    pub pos: Vec2,
}

pub struct ShooterGame {
    /// Ship left edge; the ship rides the bottom of the field
    pub ship_x: f32,
    pub bolts: Vec<Bolt>,
    pub bugs: Vec<Bug>,
    pub spawn_timer_ms: f32,
    pub spawn_interval_ms: f32,
    first_kill_sent: bool,
}

impl ShooterGame {
    pub fn new() -> Self {
        Self {
            ship_x: (FIELD_WIDTH - SHIP_SIZE.x) / 2.0,
            bolts: Vec::new(),
            bugs: Vec::new(),
            spawn_timer_ms: 0.0,
            spawn_interval_ms: SPAWN_START_MS,
            first_kill_sent: false,
        }
    }

    fn ship_aabb(&self) -> Aabb {
        Aabb::from_pos_size(Vec2::new(self.ship_x, DEFENSE_LINE), SHIP_SIZE)
    }

    /// Spawn x rejection-sampled away from live bugs still near the top,
    /// so fresh bugs do not stack into one column
    fn spawn_bug(&mut self, rng: &mut Pcg32) {
        let max_x = FIELD_WIDTH - BUG_SIZE.x;
        let mut x = rng.random_range(0.0..max_x);
        for _ in 0..8 {
            let candidate = Aabb::from_pos_size(Vec2::new(x, -BUG_SIZE.y), BUG_SIZE);
            let clear = self
                .bugs
                .iter()
                .filter(|b| b.pos.y < BUG_SIZE.y)
                .all(|b| !candidate.overlaps(&Aabb::from_pos_size(b.pos, BUG_SIZE)));
            if clear {
                break;
            }
            x = rng.random_range(0.0..max_x);
        }
        self.bugs.push(Bug {
            pos: Vec2::new(x, -BUG_SIZE.y),
        });
    }
}

impl Default for ShooterGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcadeGame for ShooterGame {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            id: "cyber-defense",
            title: "CYBER DEFENSE",
            initial_lives: DEFAULT_LIVES,
            storage_key: "cyberDefenseHighScore",
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

        // Ship motion, clamped to the field
        if input.is_held(Action::MoveLeft) {
            self.ship_x -= SHIP_SPEED * dt;
        }
        if input.is_held(Action::MoveRight) {
            self.ship_x += SHIP_SPEED * dt;
        }
        self.ship_x = self.ship_x.clamp(0.0, FIELD_WIDTH - SHIP_SIZE.x);

        // Firing
        if input.fired(Action::Fire) && self.bolts.len() < MAX_BOLTS {
            self.bolts.push(Bolt {
                pos: Vec2::new(
                    self.ship_x + (SHIP_SIZE.x - BOLT_SIZE.x) / 2.0,
                    DEFENSE_LINE - BOLT_SIZE.y,
                ),
            });
            events.emit(ArcadeEvent::SoundCue(Cue::Fire));
        }

        // Advance projectiles and obstacles
        for bolt in &mut self.bolts {
            bolt.pos.y -= BOLT_SPEED * dt;
        }
        self.bolts.retain(|b| b.pos.y + BOLT_SIZE.y > 0.0);

        let descent = BUG_BASE_SPEED + BUG_SPEED_PER_100 * (session.score() / 100) as f32;
        for bug in &mut self.bugs {
            bug.pos.y += descent * dt;
        }

        // Spawner
        self.spawn_timer_ms += dt * 1000.0;
        while self.spawn_timer_ms >= self.spawn_interval_ms {
            self.spawn_timer_ms -= self.spawn_interval_ms;
            self.spawn_bug(rng);
        }

        // Bolt-vs-bug first: a simultaneous hit is a trade
        let mut dead_bolts = Vec::new();
        let mut dead_bugs = Vec::new();
        for (bi, bolt) in self.bolts.iter().enumerate() {
            let bolt_box = Aabb::from_pos_size(bolt.pos, BOLT_SIZE);
            let hit = self.bugs.iter().enumerate().find(|(gi, bug)| {
                !dead_bugs.contains(gi) && bolt_box.overlaps(&Aabb::from_pos_size(bug.pos, BUG_SIZE))
            });
            if let Some((gi, _)) = hit {
                dead_bolts.push(bi);
                dead_bugs.push(gi);
            }
        }
        if !dead_bugs.is_empty() {
            for _ in &dead_bugs {
                session.award(KILL_POINTS);
                self.spawn_interval_ms = (self.spawn_interval_ms - SPAWN_STEP_MS).max(SPAWN_MIN_MS);
            }
            events.emit(ArcadeEvent::SoundCue(Cue::Kill));
            events.emit(ArcadeEvent::ScoreChanged {
                score: session.score(),
            });
            if !self.first_kill_sent {
                self.first_kill_sent = true;
                events.emit(ArcadeEvent::AchievementUnlocked(achievements::FIRST_BLOOD));
            }
            let mut bi = 0;
            self.bolts.retain(|_| {
                let keep = !dead_bolts.contains(&bi);
                bi += 1;
                keep
            });
            let mut gi = 0;
            self.bugs.retain(|_| {
                let keep = !dead_bugs.contains(&gi);
                gi += 1;
                keep
            });
        }

        // Then bug-vs-ship and the defense line
        let ship = self.ship_aabb();
        let mut breaches = 0u32;
        self.bugs.retain(|bug| {
            let bug_box = Aabb::from_pos_size(bug.pos, BUG_SIZE);
            let breached = bug.pos.y + BUG_SIZE.y >= DEFENSE_LINE || bug_box.overlaps(&ship);
            if breached {
                breaches += 1;
            }
            !breached
        });
        for _ in 0..breaches {
            let remaining = session.lose_life();
            events.emit(ArcadeEvent::LifeLost { remaining });
            events.emit(ArcadeEvent::SoundCue(Cue::Hit));
            if remaining == 0 {
                session.finish();
                return;
            }
        }
    }

    fn render(&self, _session: &Session, frame: &mut Frame) {
        // Defense line
        frame.rect(
            Vec2::new(0.0, DEFENSE_LINE - 1.0),
            Vec2::new(FIELD_WIDTH, 1.0),
            Tone::Chrome,
        );
        frame.rect(Vec2::new(self.ship_x, DEFENSE_LINE), SHIP_SIZE, Tone::Player);
        for bolt in &self.bolts {
            frame.rect(bolt.pos, BOLT_SIZE, Tone::Projectile);
        }
        for bug in &self.bugs {
            frame.rect(bug.pos, BUG_SIZE, Tone::Enemy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn running_session() -> Session {
        let mut s = Session::new(3);
        s.start();
        s
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(3)
    }

    #[test]
    fn bolt_cap_is_enforced() {
        let mut game = ShooterGame::new();
        let mut session = running_session();
        let mut r = rng();
        let fire = TickInput::with_fired(&[Action::Fire]);
        for _ in 0..5 {
            game.tick(&mut session, &fire, &mut r, &mut EventQueue::new());
        }
        assert_eq!(game.bolts.len(), MAX_BOLTS);
    }

    #[test]
    fn ship_clamps_to_field() {
        let mut game = ShooterGame::new();
        let mut session = running_session();
        let mut r = rng();
        let left = TickInput::with_held(&[Action::MoveLeft]);
        for _ in 0..200 {
            game.tick(&mut session, &left, &mut r, &mut EventQueue::new());
        }
        assert_eq!(game.ship_x, 0.0);
    }

    #[test]
    fn simultaneous_shot_and_breach_is_a_trade() {
        let mut game = ShooterGame::new();
        let mut session = running_session();
        let mut r = rng();
        // A bug sitting right at the firing line when the bolt spawns
        game.bugs.push(Bug {
            pos: Vec2::new(
                game.ship_x + SHIP_SIZE.x / 2.0 - BUG_SIZE.x / 2.0,
                DEFENSE_LINE - BOLT_SIZE.y,
            ),
        });
        let fire = TickInput::with_fired(&[Action::Fire]);
        game.tick(&mut session, &fire, &mut r, &mut EventQueue::new());

        assert_eq!(session.score(), KILL_POINTS);
        assert!(game.bugs.is_empty());
        assert_eq!(session.lives(), 3);
    }

    #[test]
    fn breach_costs_a_life_and_removes_the_bug() {
        let mut game = ShooterGame::new();
        let mut session = running_session();
        let mut r = rng();
        // Far from the ship, already on the line
        game.bugs.push(Bug {
            pos: Vec2::new(0.0, DEFENSE_LINE),
        });
        game.tick(&mut session, &TickInput::default(), &mut r, &mut EventQueue::new());
        assert_eq!(session.lives(), 2);
        assert!(game.bugs.is_empty());
        assert!(session.is_running());
    }

    #[test]
    fn spawn_cadence_has_a_floor() {
        let mut game = ShooterGame::new();
        game.spawn_interval_ms = SPAWN_MIN_MS + SPAWN_STEP_MS / 2.0;
        let mut session = running_session();
        let mut r = rng();
        game.bugs.push(Bug {
            pos: Vec2::new(100.0, 50.0),
        });
        game.bolts.push(Bolt {
            pos: Vec2::new(103.0, 52.0),
        });
        game.tick(&mut session, &TickInput::default(), &mut r, &mut EventQueue::new());
        assert_eq!(session.score(), KILL_POINTS);
        assert_eq!(game.spawn_interval_ms, SPAWN_MIN_MS);
    }
}
