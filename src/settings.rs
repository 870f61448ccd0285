//! Game settings and preferences
//!
//! Persisted separately from high scores, as one JSON value.

use serde::{Deserialize, Serialize};

use crate::platform::storage::KeyValueStore;

/// Arcade-wide preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Suppress SoundCue events at the host boundary
    pub muted: bool,
    /// Skip pulse/flash effects when drawing
    pub reduced_motion: bool,
    /// Show the tick counter in the HUD
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            reduced_motion: false,
            show_fps: false,
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "cyberArcadeSettings";

    /// Load from the store, falling back to defaults on absence or garbage
    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            if let Ok(settings) = serde_json::from_str(&json) {
                log::info!("loaded settings");
                return settings;
            }
            log::warn!("settings value unreadable, using defaults");
        }
        Self::default()
    }

    /// Persist; a failed write is logged and otherwise ignored
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if store.set(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("settings write failed");
                }
            }
            Err(err) => log::warn!("settings serialize failed: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStore;

    #[test]
    fn round_trip() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            muted: true,
            reduced_motion: false,
            show_fps: true,
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set("cyberArcadeSettings", "{broken").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
