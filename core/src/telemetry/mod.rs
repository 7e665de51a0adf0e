pub mod log;
pub mod metrics;

pub use log::PlaybackLog;
pub use metrics::{MetricsSnapshot, PlaybackMetrics};
