//! Shared game-loop engine
//!
//! Everything the four mini-games have in common lives here:
//! - Fixed-interval ticks, seeded RNG, stable entity iteration
//! - Input sampled once per tick, edge-triggered actions latched
//! - One `Session` per play-through with a strict lifecycle
//! - Scheduling owned by a disposer handle so a closed game can never
//!   leave a timer running against an unmounted canvas

pub mod collision;
pub mod events;
pub mod game;
pub mod input;
pub mod registry;
pub mod runner;
pub mod session;

pub use collision::{Aabb, cell_in_grid, circle_aabb_overlap, circles_overlap};
pub use events::{ArcadeEvent, Cue, EventBus, EventQueue, achievements};
pub use game::{ArcadeGame, GameMetadata};
pub use input::{Action, Direction, InputSampler, TickInput};
pub use registry::{GameId, GameRegistry};
pub use runner::Runner;
#[cfg(target_arch = "wasm32")]
pub use runner::{LoopHandle, WeakLoopHandle};
pub use session::{Session, SessionStatus};
