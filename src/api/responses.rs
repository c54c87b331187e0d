//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{Timer, TimerPhase},
    utils::format_time,
};

/// A timer as returned to clients, with derived display fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    #[serde(flatten)]
    pub timer: Timer,
    pub phase: TimerPhase,
    pub remaining_display: String,
}

impl From<Timer> for TimerView {
    fn from(timer: Timer) -> Self {
        Self {
            phase: timer.phase(),
            remaining_display: format_time(timer.remaining_time),
            timer,
        }
    }
}

/// Ordered timer collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimersResponse {
    pub timers: Vec<TimerView>,
}

impl TimersResponse {
    pub fn new(timers: Vec<Timer>) -> Self {
        Self {
            timers: timers.into_iter().map(TimerView::from).collect(),
        }
    }
}

/// Error body for rejected requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Number of timers in each phase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCounts {
    pub idle: usize,
    pub running: usize,
    pub paused: usize,
    pub completed: usize,
}

impl PhaseCounts {
    pub fn tally(timers: &[Timer]) -> Self {
        let mut counts = Self::default();
        for timer in timers {
            match timer.phase() {
                TimerPhase::Idle => counts.idle += 1,
                TimerPhase::Running => counts.running += 1,
                TimerPhase::Paused => counts.paused += 1,
                TimerPhase::Completed => counts.completed += 1,
            }
        }
        counts
    }
}

/// Service status with timer summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub total_timers: usize,
    pub phases: PhaseCounts,
    pub active_alerts: Vec<String>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
