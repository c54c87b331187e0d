//! Completion alerts
//!
//! An alert coordinator is addressed by timer id. Each id owns an independent
//! alert that keeps ringing until it is cancelled by acknowledgement, restart
//! or deletion of the timer.

pub mod player;

pub use player::AlertPlayer;

/// Fire-and-forget alert service keyed by timer id
pub trait AlertCoordinator: Send + Sync {
    /// Begin a repeating alert for `id`; no-op if one is already active
    fn notify_completion(&self, id: &str, title: &str);

    /// Stop and release the alert for `id`, if any
    fn cancel(&self, id: &str);

    /// Ids with an alert currently active
    fn active_alerts(&self) -> Vec<String>;
}

#[cfg(test)]
pub(crate) mod recording {
    use std::sync::Mutex;

    use super::AlertCoordinator;

    /// Records every call instead of ringing
    #[derive(Debug, Default)]
    pub struct RecordingAlerts {
        pub notified: Mutex<Vec<(String, String)>>,
        pub cancelled: Mutex<Vec<String>>,
        active: Mutex<Vec<String>>,
    }

    impl RecordingAlerts {
        pub fn notified(&self) -> Vec<(String, String)> {
            self.notified.lock().unwrap().clone()
        }

        pub fn cancelled(&self) -> Vec<String> {
            self.cancelled.lock().unwrap().clone()
        }
    }

    impl AlertCoordinator for RecordingAlerts {
        fn notify_completion(&self, id: &str, title: &str) {
            self.notified
                .lock()
                .unwrap()
                .push((id.to_string(), title.to_string()));
            let mut active = self.active.lock().unwrap();
            if !active.iter().any(|a| a == id) {
                active.push(id.to_string());
            }
        }

        fn cancel(&self, id: &str) {
            self.cancelled.lock().unwrap().push(id.to_string());
            self.active.lock().unwrap().retain(|a| a != id);
        }

        fn active_alerts(&self) -> Vec<String> {
            self.active.lock().unwrap().clone()
        }
    }
}
