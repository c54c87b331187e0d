//! Countdown driver background task
//!
//! Watches the timer collection and keeps exactly one one-second repeating run
//! per running stint of a timer. A stint is identified by the run epoch the
//! store assigns whenever a timer starts running; a registered run whose epoch
//! no longer matches is torn down and replaced. Every tick carries its epoch,
//! so a late tick from a torn-down run is rejected by the store.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::{
    state::{AppState, TickOutcome, TimerFeed},
    utils::format_time,
};

/// Cadence of a running countdown
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct ActiveRun {
    epoch: u64,
    /// Set once this run has handed its completion to the alert coordinator
    completion_signaled: bool,
    task: JoinHandle<()>,
}

/// Owns the per-timer countdown runs
#[derive(Clone)]
pub struct CountdownDriver {
    state: Arc<AppState>,
    runs: Arc<Mutex<HashMap<String, ActiveRun>>>,
}

impl CountdownDriver {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            runs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock_runs(&self) -> Option<MutexGuard<'_, HashMap<String, ActiveRun>>> {
        match self.runs.lock() {
            Ok(runs) => Some(runs),
            Err(e) => {
                error!("Failed to lock countdown runs: {}", e);
                None
            }
        }
    }

    /// Follow the collection until the state is gone, then stop every run
    pub async fn run(self) {
        info!("Starting countdown driver");
        let mut timers_rx = self.state.subscribe();

        let initial = timers_rx.borrow_and_update().clone();
        self.sync(&initial);

        while timers_rx.changed().await.is_ok() {
            let feed = timers_rx.borrow_and_update().clone();
            self.sync(&feed);
        }

        self.shutdown();
    }

    /// Start runs for newly started stints and tear down the rest
    pub fn sync(&self, feed: &TimerFeed) {
        let Some(mut runs) = self.lock_runs() else {
            return;
        };

        let running: HashMap<&str, u64> = feed
            .running()
            .map(|(timer, epoch)| (timer.id.as_str(), epoch))
            .collect();

        runs.retain(|id, active| {
            let keep = running.get(id.as_str()) == Some(&active.epoch) && !active.task.is_finished();
            if !keep {
                debug!("Tearing down countdown run {} for timer {}", active.epoch, id);
                active.task.abort();
            }
            keep
        });

        for (timer, epoch) in feed.running() {
            if runs.contains_key(&timer.id) {
                continue;
            }
            debug!(
                "Starting countdown run {} for timer {} at {}",
                epoch,
                timer.id,
                format_time(timer.remaining_time)
            );
            let task = tokio::spawn(self.clone().countdown(timer.id.clone(), epoch));
            runs.insert(
                timer.id.clone(),
                ActiveRun {
                    epoch,
                    completion_signaled: false,
                    task,
                },
            );
        }
    }

    /// Ids of timers with an active run
    pub fn active_runs(&self) -> Vec<String> {
        self.lock_runs()
            .map(|runs| runs.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Cancel every run
    pub fn shutdown(&self) {
        if let Some(mut runs) = self.lock_runs() {
            for (id, active) in runs.drain() {
                debug!("Stopping countdown run {} for timer {}", active.epoch, id);
                active.task.abort();
            }
        }
    }

    /// Unregister a run that ended on its own; true if it should signal completion
    fn finish(&self, id: &str, epoch: u64, completed: bool) -> bool {
        let Some(mut runs) = self.lock_runs() else {
            return false;
        };
        match runs.get_mut(id) {
            Some(active) if active.epoch == epoch => {
                let first = completed && !std::mem::replace(&mut active.completion_signaled, true);
                runs.remove(id);
                first
            }
            _ => false,
        }
    }

    async fn countdown(self, id: String, epoch: u64) {
        let mut ticker = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            // The store is read at firing time, never a value captured at start
            let outcome = match self.state.tick_run(&id, epoch) {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Failed to tick timer {}: {}", id, e);
                    self.finish(&id, epoch, false);
                    return;
                }
            };

            match outcome {
                TickOutcome::Ticked { remaining } => {
                    debug!("Timer {} at {}", id, format_time(remaining));
                }
                TickOutcome::Completed { title } => {
                    if self.finish(&id, epoch, true) {
                        self.state.notify_completion(&id, &title);
                    }
                    return;
                }
                TickOutcome::Ignored => {
                    debug!("Discarding late tick of run {} for timer {}", epoch, id);
                    self.finish(&id, epoch, false);
                    return;
                }
            }
        }
    }
}
