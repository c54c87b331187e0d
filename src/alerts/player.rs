//! Audible alert player with one independent handle per timer

use std::{
    collections::HashMap,
    io::Write,
    sync::Mutex,
    time::Duration,
};
use tokio::{task::JoinHandle, time::interval};
use tracing::{debug, error, info, warn};

use super::AlertCoordinator;

/// A ringing alert owned by one timer
#[derive(Debug)]
struct AlertHandle {
    title: String,
    task: JoinHandle<()>,
}

/// Rings a terminal bell and logs on a fixed cadence until cancelled
///
/// Must be used from within a tokio runtime since every alert is a spawned task.
#[derive(Debug)]
pub struct AlertPlayer {
    repeat: Duration,
    silent: bool,
    handles: Mutex<HashMap<String, AlertHandle>>,
}

impl AlertPlayer {
    pub fn new(repeat: Duration, silent: bool) -> Self {
        Self {
            repeat,
            silent,
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Cancel every active alert
    pub fn cancel_all(&self) {
        let drained: Vec<(String, AlertHandle)> = match self.handles.lock() {
            Ok(mut handles) => handles.drain().collect(),
            Err(e) => {
                error!("Failed to lock alert handles: {}", e);
                return;
            }
        };
        for (id, handle) in drained {
            debug!("Stopping alert for timer {} ({})", id, handle.title);
            handle.task.abort();
        }
    }

    fn ring(id: String, title: String, repeat: Duration, silent: bool) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(repeat);
            loop {
                ticker.tick().await;
                warn!("Timer \"{}\" has ended! ({})", title, id);
                if !silent {
                    let mut stderr = std::io::stderr();
                    if let Err(e) = stderr.write_all(b"\x07").and_then(|()| stderr.flush()) {
                        debug!("Failed to ring terminal bell: {}", e);
                    }
                }
            }
        })
    }
}

impl AlertCoordinator for AlertPlayer {
    fn notify_completion(&self, id: &str, title: &str) {
        let mut handles = match self.handles.lock() {
            Ok(handles) => handles,
            Err(e) => {
                error!("Failed to lock alert handles: {}", e);
                return;
            }
        };
        if handles.contains_key(id) {
            debug!("Alert already active for timer {}", id);
            return;
        }

        info!("Starting alert for timer {} ({})", id, title);
        let task = Self::ring(id.to_string(), title.to_string(), self.repeat, self.silent);
        handles.insert(
            id.to_string(),
            AlertHandle {
                title: title.to_string(),
                task,
            },
        );
    }

    fn cancel(&self, id: &str) {
        let removed = match self.handles.lock() {
            Ok(mut handles) => handles.remove(id),
            Err(e) => {
                error!("Failed to lock alert handles: {}", e);
                return;
            }
        };
        if let Some(handle) = removed {
            info!("Stopping alert for timer {} ({})", id, handle.title);
            handle.task.abort();
        }
    }

    fn active_alerts(&self) -> Vec<String> {
        self.handles
            .lock()
            .map(|handles| handles.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Drop for AlertPlayer {
    fn drop(&mut self) {
        if let Ok(handles) = self.handles.get_mut() {
            for (_, handle) in handles.drain() {
                handle.task.abort();
            }
        }
    }
}
