//! Input sampling
//!
//! Raw key/touch events land here whenever the browser delivers them; the
//! simulation reads exactly one immutable snapshot per tick. Edge-triggered
//! actions are latched until the next `sample()`, so a tap that falls
//! between two ticks is never dropped.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Named player intents, fixed across all games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Flap,
    Fire,
    Pause,
    Confirm,
}

impl Action {
    pub(crate) const COUNT: usize = 8;

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    /// Latched until consumed instead of read as level state
    fn is_edge_triggered(self) -> bool {
        matches!(
            self,
            Action::Flap | Action::Fire | Action::Pause | Action::Confirm
        )
    }

    /// Grid direction this action requests, if any
    fn direction(self) -> Option<Direction> {
        match self {
            Action::MoveUp => Some(Direction::Up),
            Action::MoveDown => Some(Direction::Down),
            Action::MoveLeft => Some(Direction::Left),
            Action::MoveRight => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Grid movement direction (snake heading, memory cursor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// One-cell displacement, +y pointing down (screen space)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }
}

/// Immutable input snapshot for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    held: [bool; Action::COUNT],
    fired: [bool; Action::COUNT],
    direction: Option<Direction>,
}

impl TickInput {
    /// Level state: is the action currently held down?
    #[inline]
    pub fn is_held(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    /// Edge state: did the action fire since the previous tick?
    #[inline]
    pub fn fired(&self, action: Action) -> bool {
        self.fired[action.index()]
    }

    /// Most recent direction request since the previous tick, if any.
    /// Reversal rules (snake cannot turn back on itself) are applied by the
    /// rule-set, which knows its current heading.
    #[inline]
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Test helper: a snapshot with the given actions fired once
    pub fn with_fired(actions: &[Action]) -> Self {
        let mut input = Self::default();
        for action in actions {
            input.fired[action.index()] = true;
        }
        input
    }

    /// Test helper: a snapshot with the given actions held
    pub fn with_held(actions: &[Action]) -> Self {
        let mut input = Self::default();
        for action in actions {
            input.held[action.index()] = true;
        }
        input
    }

    /// Test helper: a snapshot carrying a direction request
    pub fn with_direction(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            ..Self::default()
        }
    }
}

/// Accumulates raw events between ticks
#[derive(Debug, Default)]
pub struct InputSampler {
    held: [bool; Action::COUNT],
    latched: [bool; Action::COUNT],
    direction: Option<Direction>,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key-down / touch-start. Repeat events (press while already held)
    /// do not re-latch edge actions.
    pub fn press(&mut self, action: Action) {
        let i = action.index();
        if action.is_edge_triggered() && !self.held[i] {
            self.latched[i] = true;
        }
        self.held[i] = true;
        if let Some(dir) = action.direction() {
            self.direction = Some(dir);
        }
    }

    /// Key-up / touch-end
    pub fn release(&mut self, action: Action) {
        self.held[action.index()] = false;
    }

    /// Direction request from a source with no paired action (swipe, D-pad tap)
    pub fn request_direction(&mut self, direction: Direction) {
        self.direction = Some(direction);
    }

    /// Take the snapshot for this tick and clear all latches
    pub fn sample(&mut self) -> TickInput {
        let input = TickInput {
            held: self.held,
            fired: self.latched,
            direction: self.direction.take(),
        };
        self.latched = [false; Action::COUNT];
        input
    }

    /// Drop all state (session close, game switch)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
