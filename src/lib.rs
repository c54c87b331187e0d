//! Timer Board - multiple persisted countdown timers behind a local HTTP API
//!
//! This library provides the timer state engine (the canonical timer store and
//! its mutations), durable snapshot storage, the per-timer countdown driver and
//! the completion alert coordinator.

pub mod alerts;
pub mod api;
pub mod config;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use alerts::{AlertCoordinator, AlertPlayer};
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use storage::{JsonFileStorage, MemoryStorage, SnapshotStorage};
pub use utils::signals::shutdown_signal;
