//! Platform abstraction layer
//!
//! Handles browser/native differences for storage: LocalStorage on the
//! web, an in-memory map everywhere else (native demo, tests).

pub mod storage;

pub use storage::{KeyValueStore, MemoryStore, StorageError, default_store};
