//! High score persistence
//!
//! One storage key per game (`<game>HighScore`) holding a decimal integer,
//! matching what the host page already has on disk. Reads are defensive:
//! absent or non-numeric values count as 0. Writes happen only when the
//! new score is strictly greater, so the stored value never decreases
//! across sessions. A failing write is swallowed; the in-memory value
//! stays authoritative for the rest of the page's lifetime.

use std::collections::HashMap;

use crate::platform::storage::{KeyValueStore, default_store};

/// Per-game best scores, backed by an injected key-value store
pub struct HighScores {
    store: Box<dyn KeyValueStore>,
    /// Values read or recorded this page lifetime; survives store failures
    cache: HashMap<String, u32>,
}

impl HighScores {
    /// Open against the platform default store (LocalStorage on the web)
    pub fn open() -> Self {
        Self::with_store(default_store())
    }

    pub fn with_store(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            cache: HashMap::new(),
        }
    }

    /// Best score recorded for the key. Absent or garbage -> 0.
    pub fn get(&mut self, key: &str) -> u32 {
        let stored = self
            .store
            .get(key)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(0);
        let cached = self.cache.get(key).copied().unwrap_or(0);
        let best = stored.max(cached);
        self.cache.insert(key.to_string(), best);
        best
    }

    /// Record a session result. Returns true when this is a new record.
    /// The stored value is only ever raised, never lowered.
    pub fn record(&mut self, key: &str, score: u32) -> bool {
        let best = self.get(key);
        if score <= best {
            return false;
        }
        self.cache.insert(key.to_string(), score);
        if let Err(err) = self.store.set(key, &score.to_string()) {
            log::warn!("high score write failed for {key}: {err}");
        } else {
            log::info!("new high score for {key}: {score}");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::{MemoryStore, StorageError};

    #[test]
    fn absent_and_garbage_read_as_zero() {
        let mut store = MemoryStore::new();
        store.set("flappyHighScore", "not a number").unwrap();
        let mut scores = HighScores::with_store(Box::new(store));
        assert_eq!(scores.get("snakeHighScore"), 0);
        assert_eq!(scores.get("flappyHighScore"), 0);
    }

    #[test]
    fn record_only_raises() {
        let mut scores = HighScores::with_store(Box::new(MemoryStore::new()));
        assert!(scores.record("snakeHighScore", 50));
        assert!(!scores.record("snakeHighScore", 30));
        assert!(!scores.record("snakeHighScore", 50));
        assert_eq!(scores.get("snakeHighScore"), 50);
        assert!(scores.record("snakeHighScore", 60));
        assert_eq!(scores.get("snakeHighScore"), 60);
    }

    #[test]
    fn keys_are_independent() {
        let mut scores = HighScores::with_store(Box::new(MemoryStore::new()));
        scores.record("snakeHighScore", 40);
        scores.record("cyberDefenseHighScore", 90);
        assert_eq!(scores.get("snakeHighScore"), 40);
        assert_eq!(scores.get("cyberDefenseHighScore"), 90);
    }

    /// Store that accepts nothing, as in a private-mode browser
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError)
        }
    }

    #[test]
    fn write_failure_keeps_in_memory_value() {
        let mut scores = HighScores::with_store(Box::new(BrokenStore));
        assert!(scores.record("snakeHighScore", 70));
        // Persistence failed, but the running page still sees the record
        assert_eq!(scores.get("snakeHighScore"), 70);
        assert!(!scores.record("snakeHighScore", 60));
    }
}
