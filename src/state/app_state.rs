//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, error, info};

use super::{NewTimer, TickOutcome, Timer, TimerFeed, TimerStore, TimerUpdate};
use crate::{alerts::AlertCoordinator, storage::SnapshotStorage, utils::format_time};

/// Shared owner of the timer collection and its collaborators
pub struct AppState {
    /// Canonical timer collection
    store: Mutex<TimerStore>,
    /// Durable snapshot slot
    storage: Arc<dyn SnapshotStorage>,
    /// Completion alert service
    alerts: Arc<dyn AlertCoordinator>,
    /// Ordered collection published after every applied mutation
    timers_tx: watch::Sender<TimerFeed>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<(String, DateTime<Utc>)>>,
}

impl AppState {
    /// Create the state, seeding the collection from the storage slot
    pub fn new(
        storage: Arc<dyn SnapshotStorage>,
        alerts: Arc<dyn AlertCoordinator>,
        port: u16,
        host: String,
    ) -> Self {
        let store = TimerStore::from_snapshot(storage.load());
        info!("Loaded {} timers from storage", store.timers().len());
        let (timers_tx, _) = watch::channel(store.feed());

        Self {
            store: Mutex::new(store),
            storage,
            alerts,
            timers_tx,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
        }
    }

    fn lock_store(&self) -> Result<MutexGuard<'_, TimerStore>, String> {
        self.store
            .lock()
            .map_err(|e| format!("Failed to lock timer store: {}", e))
    }

    /// Apply a mutation, then persist and publish once if it changed anything
    fn mutate<R, F>(&self, action: &str, apply: F) -> Result<R, String>
    where
        F: FnOnce(&mut TimerStore) -> (R, bool),
    {
        let mut store = self.lock_store()?;
        let (result, changed) = apply(&mut *store);

        if changed {
            self.storage.save(&store.snapshot());
            let feed = store.feed();
            drop(store);

            // send_replace never fails, even with no subscribers
            self.timers_tx.send_replace(feed);
        } else {
            drop(store);
            debug!("{} was a no-op", action);
        }

        if action != "tick" {
            if let Ok(mut last_action) = self.last_action.lock() {
                *last_action = Some((action.to_string(), Utc::now()));
            }
        }

        Ok(result)
    }

    /// Add a timer and return it
    pub fn add(&self, input: NewTimer) -> Result<Timer, String> {
        let timer = self.mutate("add", |store| (store.add(input), true))?;
        info!("Added timer {} \"{}\" ({})", timer.id, timer.title, format_time(timer.duration));
        Ok(timer)
    }

    /// Delete a timer and cancel any alert it owns
    pub fn delete(&self, id: &str) -> Result<(), String> {
        let removed = self.mutate("delete", |store| {
            let removed = store.delete(id);
            let changed = removed.is_some();
            (removed, changed)
        })?;
        self.alerts.cancel(id);
        if let Some(timer) = removed {
            info!("Deleted timer {} \"{}\"", timer.id, timer.title);
        }
        Ok(())
    }

    /// Pause or resume a timer
    pub fn toggle(&self, id: &str) -> Result<Option<Timer>, String> {
        self.mutate("toggle", |store| {
            let changed = store.toggle(id);
            (store.get(id).cloned(), changed)
        })
        .inspect(|timer| {
            if let Some(t) = timer {
                info!("Timer {} is now {:?}", t.id, t.phase());
            }
        })
    }

    /// Take one second off a running timer
    pub fn tick(&self, id: &str) -> Result<TickOutcome, String> {
        self.mutate("tick", |store| {
            let outcome = store.tick(id);
            let changed = outcome != TickOutcome::Ignored;
            (outcome, changed)
        })
    }

    /// Tick on behalf of one running stint; stale stints are ignored
    pub fn tick_run(&self, id: &str, epoch: u64) -> Result<TickOutcome, String> {
        self.mutate("tick", |store| {
            let outcome = store.tick_run(id, epoch);
            let changed = outcome != TickOutcome::Ignored;
            (outcome, changed)
        })
    }

    /// Reset a timer to its full duration and silence its alert
    pub fn restart(&self, id: &str) -> Result<Option<Timer>, String> {
        let timer = self.mutate("restart", |store| {
            let changed = store.restart(id);
            (store.get(id).cloned(), changed)
        })?;
        self.alerts.cancel(id);
        if let Some(t) = &timer {
            info!("Restarted timer {} at {}", t.id, format_time(t.remaining_time));
        }
        Ok(timer)
    }

    /// Merge updates into a timer, pausing it
    pub fn edit(&self, id: &str, updates: TimerUpdate) -> Result<Option<Timer>, String> {
        let timer = self.mutate("edit", |store| {
            let changed = store.edit(id, updates);
            (store.get(id).cloned(), changed)
        })?;
        if let Some(t) = &timer {
            info!("Edited timer {} \"{}\"", t.id, t.title);
        }
        Ok(timer)
    }

    /// Acknowledge a completion, stopping its alert
    pub fn dismiss(&self, id: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(("dismiss".to_string(), Utc::now()));
        }
        self.alerts.cancel(id);
    }

    /// Hand a completion to the alert coordinator
    pub fn notify_completion(&self, id: &str, title: &str) {
        info!("Timer \"{}\" has ended", title);
        self.alerts.notify_completion(id, title);
    }

    /// Current ordered collection
    pub fn timers(&self) -> Result<Vec<Timer>, String> {
        Ok(self.lock_store()?.timers().to_vec())
    }

    /// Epoch of the timer's current or latest running stint
    pub fn run_epoch(&self, id: &str) -> Option<u64> {
        self.lock_store().ok().and_then(|store| store.run_epoch(id))
    }

    pub fn get_timer(&self, id: &str) -> Result<Option<Timer>, String> {
        Ok(self.lock_store()?.get(id).cloned())
    }

    /// Read-only view of the collection that updates on every mutation
    pub fn subscribe(&self) -> watch::Receiver<TimerFeed> {
        self.timers_tx.subscribe()
    }

    pub fn active_alerts(&self) -> Vec<String> {
        self.alerts.active_alerts()
    }

    /// Write the current collection to storage regardless of changes
    pub fn flush(&self) {
        match self.lock_store() {
            Ok(store) => self.storage.save(&store.snapshot()),
            Err(e) => error!("Failed to flush timers: {}", e),
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_action.lock().ok().and_then(|a| a.clone()) {
            Some((action, time)) => (Some(action), Some(time)),
            None => (None, None),
        }
    }
}
