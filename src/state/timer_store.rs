//! Canonical timer collection and its mutation operations
//!
//! Every operation is synchronous and absorbs unknown ids as no-ops. Methods
//! report whether they changed anything so the owner can persist exactly once
//! per applied mutation.
//!
//! Each time a timer enters the running state it is given a new run epoch. A
//! countdown tick carries the epoch it was started for, and a tick whose epoch
//! is no longer current is rejected, so a paused-then-resumed or restarted
//! timer never takes a second off from a stale schedule.

use std::collections::HashMap;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::timer::{NewTimer, TickOutcome, Timer, TimerPhase, TimerUpdate};
use crate::storage::Snapshot;

/// Ordered collection of timers in creation order
#[derive(Debug, Clone, Default)]
pub struct TimerStore {
    timers: Vec<Timer>,
    /// Epoch of each timer's latest running stint; never persisted
    run_epochs: HashMap<String, u64>,
    next_epoch: u64,
}

/// The collection as published to watchers, with the run epoch of every timer
/// that has been started at least once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerFeed {
    pub timers: Vec<Timer>,
    pub run_epochs: HashMap<String, u64>,
}

impl TimerFeed {
    /// Running timers paired with the epoch of their current stint
    pub fn running(&self) -> impl Iterator<Item = (&Timer, u64)> {
        self.timers
            .iter()
            .filter(|t| t.phase() == TimerPhase::Running)
            .filter_map(|t| self.run_epochs.get(&t.id).map(|epoch| (t, *epoch)))
    }
}

impl TimerStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a persisted snapshot
    ///
    /// Invariants are re-applied and entries with a duplicate id are dropped so
    /// a hand-edited slot cannot break identity uniqueness.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut timers: Vec<Timer> = Vec::with_capacity(snapshot.timers.len());
        for mut timer in snapshot.timers {
            if timers.iter().any(|t| t.id == timer.id) {
                debug!("Dropping duplicate timer id from snapshot: {}", timer.id);
                continue;
            }
            timer.normalize();
            timers.push(timer);
        }

        let mut store = Self {
            timers,
            ..Self::default()
        };
        let running: Vec<String> = store
            .timers
            .iter()
            .filter(|t| t.is_running)
            .map(|t| t.id.clone())
            .collect();
        for id in running {
            store.start_run(&id);
        }
        store
    }

    /// Published view of the collection
    pub fn feed(&self) -> TimerFeed {
        TimerFeed {
            timers: self.timers.clone(),
            run_epochs: self.run_epochs.clone(),
        }
    }

    /// Epoch of the timer's latest running stint
    pub fn run_epoch(&self, id: &str) -> Option<u64> {
        self.run_epochs.get(id).copied()
    }

    fn start_run(&mut self, id: &str) {
        self.next_epoch += 1;
        self.run_epochs.insert(id.to_string(), self.next_epoch);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            timers: self.timers.clone(),
        }
    }

    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    pub fn get(&self, id: &str) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Timer> {
        self.timers.iter_mut().find(|t| t.id == id)
    }

    /// Append a new timer with a fresh id and creation timestamp
    pub fn add(&mut self, input: NewTimer) -> Timer {
        let mut timer = Timer {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            duration: input.duration,
            remaining_time: input.remaining_time,
            is_running: input.is_running,
            created_at: Utc::now().timestamp_millis(),
        };
        timer.normalize();
        self.timers.push(timer.clone());
        if timer.is_running {
            self.start_run(&timer.id);
        }
        timer
    }

    /// Remove the timer with `id`, returning it if it existed
    pub fn delete(&mut self, id: &str) -> Option<Timer> {
        let index = self.timers.iter().position(|t| t.id == id)?;
        self.run_epochs.remove(id);
        Some(self.timers.remove(index))
    }

    /// Flip the running flag; a depleted timer is always forced to stopped
    pub fn toggle(&mut self, id: &str) -> bool {
        let Some(timer) = self.get_mut(id) else {
            return false;
        };
        let before = timer.is_running;
        if timer.remaining_time > 0 {
            timer.is_running = !timer.is_running;
        } else {
            timer.is_running = false;
        }
        let started = timer.is_running && !before;
        let changed = timer.is_running != before;
        if started {
            self.start_run(id);
        }
        changed
    }

    /// Take one second off a running timer
    pub fn tick(&mut self, id: &str) -> TickOutcome {
        let Some(timer) = self.get_mut(id) else {
            return TickOutcome::Ignored;
        };
        if !timer.is_running || timer.remaining_time == 0 {
            return TickOutcome::Ignored;
        }

        timer.remaining_time = timer.remaining_time.saturating_sub(1);
        if timer.remaining_time == 0 {
            timer.is_running = false;
            TickOutcome::Completed {
                title: timer.title.clone(),
            }
        } else {
            TickOutcome::Ticked {
                remaining: timer.remaining_time,
            }
        }
    }

    /// Tick on behalf of the running stint identified by `epoch`
    ///
    /// A tick from a superseded stint is ignored, whatever the timer's state.
    pub fn tick_run(&mut self, id: &str, epoch: u64) -> TickOutcome {
        if self.run_epoch(id) != Some(epoch) {
            return TickOutcome::Ignored;
        }
        self.tick(id)
    }

    /// Reset to the full duration and stop
    pub fn restart(&mut self, id: &str) -> bool {
        let Some(timer) = self.get_mut(id) else {
            return false;
        };
        let changed = timer.remaining_time != timer.duration || timer.is_running;
        timer.remaining_time = timer.duration;
        timer.is_running = false;
        changed
    }

    /// Merge `updates` into the timer and pause it
    ///
    /// A new duration also becomes the remaining time. Without one the merged
    /// remaining time is kept, clamped to the duration.
    pub fn edit(&mut self, id: &str, updates: TimerUpdate) -> bool {
        let Some(timer) = self.get_mut(id) else {
            return false;
        };
        let before = timer.clone();

        if let Some(title) = updates.title {
            timer.title = title;
        }
        if let Some(description) = updates.description {
            timer.description = description;
        }
        if let Some(remaining_time) = updates.remaining_time {
            timer.remaining_time = remaining_time;
        }
        if let Some(duration) = updates.duration {
            timer.duration = duration;
            timer.remaining_time = duration;
        }
        timer.is_running = false;
        timer.normalize();

        *timer != before
    }
}
