//! The four arcade rule-sets
//!
//! Each game owns its entities and constants and plugs into the engine
//! through `ArcadeGame`. Nothing here schedules, persists or dispatches;
//! that is all runner territory.

pub mod flappy;
pub mod memory;
pub mod shooter;
pub mod snake;

pub use flappy::FlappyGame;
pub use memory::MemoryGame;
pub use shooter::ShooterGame;
pub use snake::SnakeGame;
