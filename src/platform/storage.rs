//! Key-value storage seam
//!
//! Persistence consumers take a `KeyValueStore` by injection so tests and
//! the native binary run against an in-memory map while the browser build
//! talks to LocalStorage. A failing store degrades the feature, never the
//! game: callers are expected to swallow `StorageError` and log.

use std::collections::HashMap;

/// Opaque storage failure (quota, privacy mode, detached window)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageError;

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("storage unavailable")
    }
}

impl std::error::Error for StorageError {}

/// Minimal string key-value interface over whatever the platform offers
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory backend for native builds and tests
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage backend
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|s| s.get_item(key).ok()).flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = Self::storage().ok_or(StorageError)?;
        storage.set_item(key, value).map_err(|_| StorageError)
    }
}

/// Default store for the current platform
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Box<dyn KeyValueStore> {
    Box::new(LocalStorage::new())
}

/// Default store for the current platform
#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Box<dyn KeyValueStore> {
    Box::new(MemoryStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("snakeHighScore"), None);
        store.set("snakeHighScore", "120").unwrap();
        assert_eq!(store.get("snakeHighScore"), Some("120".to_string()));
        store.set("snakeHighScore", "150").unwrap();
        assert_eq!(store.get("snakeHighScore"), Some("150".to_string()));
    }
}
