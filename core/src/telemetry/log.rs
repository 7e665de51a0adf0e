use log::{debug, error, info, trace};

/// Session-scoped wrapper over the `log` facade.
#[derive(Debug, Clone)]
pub struct PlaybackLog {
    label: String,
}

impl PlaybackLog {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.label, message);
    }

    pub fn transition(&self, message: &str) {
        debug!("[{}] {}", self.label, message);
    }

    pub fn stale(&self, message: &str) {
        trace!("[{}] {}", self.label, message);
    }

    pub fn failure(&self, message: &str) {
        error!("[{}] {}", self.label, message);
    }
}

impl Default for PlaybackLog {
    fn default() -> Self {
        Self::new("playback")
    }
}
