//! Timer entity and the value types used to create and edit it

use serde::{Deserialize, Serialize};

/// A single countdown timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    /// Opaque unique identifier, immutable after creation
    pub id: String,
    pub title: String,
    pub description: String,
    /// Total countdown length in whole seconds
    pub duration: u64,
    /// Seconds left, always within `0..=duration`
    pub remaining_time: u64,
    pub is_running: bool,
    /// Creation time in epoch milliseconds
    pub created_at: i64,
}

/// Lifecycle phase derived from a timer's fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Completed,
}

impl Timer {
    /// Current phase of this timer
    pub fn phase(&self) -> TimerPhase {
        if self.remaining_time == 0 {
            TimerPhase::Completed
        } else if self.is_running {
            TimerPhase::Running
        } else if self.remaining_time == self.duration {
            TimerPhase::Idle
        } else {
            TimerPhase::Paused
        }
    }

    /// Re-apply the invariants that must hold after every mutation
    pub(crate) fn normalize(&mut self) {
        self.remaining_time = self.remaining_time.min(self.duration);
        if self.remaining_time == 0 {
            self.is_running = false;
        }
    }
}

/// Fields supplied when adding a timer; id and creation time are generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTimer {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub duration: u64,
    pub remaining_time: u64,
    #[serde(default)]
    pub is_running: bool,
}

impl NewTimer {
    /// A fresh, not yet started timer with the full duration remaining
    pub fn idle(title: impl Into<String>, description: impl Into<String>, duration: u64) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            duration,
            remaining_time: duration,
            is_running: false,
        }
    }
}

/// Partial update merged into a timer by an edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<u64>,
    pub remaining_time: Option<u64>,
}

impl TimerUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn duration(mut self, duration: u64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn remaining_time(mut self, remaining_time: u64) -> Self {
        self.remaining_time = Some(remaining_time);
        self
    }
}

/// Result of applying a tick to a timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer absent, paused or already depleted; nothing changed
    Ignored,
    /// One second was taken off and the timer keeps running
    Ticked { remaining: u64 },
    /// The tick brought the timer to zero and stopped it
    Completed { title: String },
}
