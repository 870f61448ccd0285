//! String-keyed game catalog
//!
//! The host selects games by id at a single boundary; no conditional
//! rendering scattered through the UI. Unknown ids are a lookup miss,
//! never a panic.

use serde::{Deserialize, Serialize};

use super::game::ArcadeGame;

/// Unique identifier for a registered game
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub String);

impl GameId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GameId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

type GameCtor = fn() -> Box<dyn ArcadeGame>;

/// Maps discriminant -> constructor, in hub display order
#[derive(Default)]
pub struct GameRegistry {
    entries: Vec<(GameId, GameCtor)>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the four built-in games registered
    pub fn with_builtin_games() -> Self {
        use crate::games::{FlappyGame, MemoryGame, ShooterGame, SnakeGame};

        let mut registry = Self::new();
        registry.register("cyber-defense", || Box::new(ShooterGame::new()));
        registry.register("cyber-serpent", || Box::new(SnakeGame::new()));
        registry.register("gravity-glitch", || Box::new(FlappyGame::new()));
        registry.register("neural-nexus", || Box::new(MemoryGame::new()));
        registry
    }

    /// Register a constructor. A duplicate id replaces the earlier entry.
    pub fn register(&mut self, id: &str, ctor: GameCtor) {
        let id = GameId::from(id);
        if let Some(entry) = self.entries.iter_mut().find(|(e, _)| *e == id) {
            entry.1 = ctor;
        } else {
            self.entries.push((id, ctor));
        }
    }

    /// Instantiate a game by id
    pub fn create(&self, id: &GameId) -> Option<Box<dyn ArcadeGame>> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == id)
            .map(|(_, ctor)| ctor())
    }

    /// Registered ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = &GameId> {
        self.entries.iter().map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
