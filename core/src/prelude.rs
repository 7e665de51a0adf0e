use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default autoplay cadence in milliseconds.
pub const DEFAULT_CADENCE_MS: u64 = 100;

/// Shared configuration for a playback session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub cadence_ms: u64,
    pub readout_agent: Option<String>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            cadence_ms: DEFAULT_CADENCE_MS,
            readout_agent: None,
        }
    }
}

impl PlaybackConfig {
    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.cadence_ms.max(1))
    }
}

/// Errors raised while loading a snapshot stream.
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("reading dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type DatasetResult<T> = Result<T, DatasetError>;

/// Errors raised by the autoplay timer seam.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("timer {0:?} is still live")]
    TimerAlreadyLive(TickId),
    #[error("no async runtime available: {0}")]
    NoRuntime(String),
}

pub type PlaybackResult<T> = Result<T, PlaybackError>;

/// Identity of one armed timer. Every tick carries the id of the timer that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TickId(pub u64);

/// Source of repeating autoplay ticks.
pub trait TickSource: Send {
    /// Starts a repeating timer that fires every `cadence`, tagging each
    /// tick with `id`.
    fn arm(&mut self, cadence: Duration, id: TickId) -> Box<dyn TimerHandle>;
}

/// Owned handle to a live timer. Cancelling stops further ticks.
pub trait TimerHandle: Send {
    fn id(&self) -> TickId;
    fn cancel(&mut self);
}
