//! Utility functions module
//!
//! This module contains utility functions used throughout the application.

pub mod signals;
pub mod time;

// Re-export main functions
pub use signals::shutdown_signal;
pub use time::format_time;
