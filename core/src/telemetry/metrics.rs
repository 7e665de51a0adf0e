use serde::Serialize;
use std::sync::Mutex;

/// Counters describing timer and tick activity of one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub ticks_applied: usize,
    pub stale_ticks: usize,
    pub timers_armed: usize,
    pub timers_cancelled: usize,
}

impl MetricsSnapshot {
    pub fn live_timers(&self) -> usize {
        self.timers_armed.saturating_sub(self.timers_cancelled)
    }
}

pub struct PlaybackMetrics {
    inner: Mutex<MetricsSnapshot>,
}

impl PlaybackMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_tick(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.ticks_applied += 1;
        }
    }

    pub fn record_stale_tick(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.stale_ticks += 1;
        }
    }

    pub fn record_armed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.timers_armed += 1;
        }
    }

    pub fn record_cancelled(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.timers_cancelled += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for PlaybackMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_timers_track_armed_minus_cancelled() {
        let metrics = PlaybackMetrics::new();
        metrics.record_armed();
        metrics.record_armed();
        metrics.record_cancelled();
        metrics.record_tick();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.live_timers(), 1);
        assert_eq!(snapshot.ticks_applied, 1);
        assert_eq!(snapshot.stale_ticks, 0);
    }
}
