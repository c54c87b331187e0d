//! State management module
//!
//! This module contains the timer model, the canonical timer store and the
//! shared application state that persists and publishes it.

pub mod app_state;
pub mod timer;
pub mod timer_store;

// Re-export main types
pub use app_state::AppState;
pub use timer::{NewTimer, TickOutcome, Timer, TimerPhase, TimerUpdate};
pub use timer_store::{TimerFeed, TimerStore};
