use crate::playback::timer::TimerSlot;
use crate::prelude::{TickId, TickSource};
use crate::telemetry::{PlaybackLog, PlaybackMetrics};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Observable playback position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackState {
    pub current_index: usize,
    /// `None` while there is nothing to play.
    pub max_index: Option<usize>,
    pub is_playing: bool,
}

impl PlaybackState {
    pub fn phase(&self) -> PlaybackPhase {
        match (self.is_playing, self.current_index) {
            (true, _) => PlaybackPhase::Playing,
            (false, 0) => PlaybackPhase::StoppedAtStart,
            (false, index) => PlaybackPhase::StoppedAt(index),
        }
    }

    pub fn at_end(&self) -> bool {
        self.max_index.map_or(true, |max_index| self.current_index >= max_index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    StoppedAtStart,
    StoppedAt(usize),
    Playing,
}

/// Result of delivering one timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced(usize),
    /// Playback reached the last frame and the timer was released.
    Finished(usize),
    /// The tick came from a timer that is no longer live.
    Stale,
}

/// State machine owning the current frame and the autoplay timer.
pub struct PlaybackController {
    state: PlaybackState,
    cadence: Duration,
    ticks: Box<dyn TickSource>,
    timer: TimerSlot,
    next_tick_id: u64,
    log: PlaybackLog,
    metrics: Arc<PlaybackMetrics>,
}

impl PlaybackController {
    pub fn new(max_index: Option<usize>, cadence: Duration, ticks: Box<dyn TickSource>) -> Self {
        Self {
            state: PlaybackState {
                current_index: 0,
                max_index,
                is_playing: false,
            },
            cadence,
            ticks,
            timer: TimerSlot::new(),
            next_tick_id: 0,
            log: PlaybackLog::default(),
            metrics: Arc::new(PlaybackMetrics::new()),
        }
    }

    pub fn with_log(mut self, log: PlaybackLog) -> Self {
        self.log = log;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<PlaybackMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn max_index(&self) -> Option<usize> {
        self.state.max_index
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    /// Id of the armed timer, if any.
    pub fn live_timer(&self) -> Option<TickId> {
        self.timer.live_id()
    }

    pub fn play(&mut self) {
        if self.state.max_index.is_none() {
            return;
        }
        if self.state.at_end() {
            self.state.current_index = 0;
        }
        if self.state.is_playing {
            return;
        }

        self.release_timer();
        self.next_tick_id += 1;
        let id = TickId(self.next_tick_id);
        match self.timer.arm(self.ticks.as_mut(), self.cadence, id) {
            Ok(id) => {
                self.metrics.record_armed();
                self.state.is_playing = true;
                self.log.transition(&format!(
                    "play from frame {} ({:?}, timer {})",
                    self.state.current_index, self.cadence, id.0
                ));
            }
            Err(err) => self.log.failure(&format!("play refused: {err}")),
        }
    }

    /// Applies one tick from the timer identified by `id`.
    pub fn on_tick(&mut self, id: TickId) -> TickOutcome {
        if self.timer.live_id() != Some(id) {
            self.metrics.record_stale_tick();
            self.log.stale(&format!("dropping tick from timer {}", id.0));
            return TickOutcome::Stale;
        }
        let Some(max_index) = self.state.max_index else {
            self.stop();
            return TickOutcome::Finished(self.state.current_index);
        };

        if self.state.current_index < max_index {
            self.state.current_index += 1;
            self.metrics.record_tick();
        }
        if self.state.current_index >= max_index {
            self.stop();
            self.log.transition(&format!("finished at frame {}", self.state.current_index));
            TickOutcome::Finished(self.state.current_index)
        } else {
            TickOutcome::Advanced(self.state.current_index)
        }
    }

    /// Delivers a tick on behalf of the live timer; used by hosts that run
    /// their own clock.
    pub fn tick(&mut self) -> TickOutcome {
        match self.timer.live_id() {
            Some(id) => self.on_tick(id),
            None => TickOutcome::Stale,
        }
    }

    pub fn pause(&mut self) {
        self.stop();
        self.log.transition(&format!("paused at frame {}", self.state.current_index));
    }

    pub fn reset(&mut self) {
        self.stop();
        self.state.current_index = 0;
        self.log.transition("reset to frame 0");
    }

    pub fn skip_to_end(&mut self) {
        self.stop();
        if let Some(max_index) = self.state.max_index {
            self.state.current_index = max_index;
            self.log.transition(&format!("skipped to frame {}", max_index));
        }
    }

    /// Scrubs to `index`, clamped into the playable range. Autoplay, if
    /// running, continues from the new position.
    pub fn seek(&mut self, index: i64) -> usize {
        if let Some(max_index) = self.state.max_index {
            let clamped = index.clamp(0, max_index as i64);
            self.state.current_index = clamped as usize;
        }
        self.state.current_index
    }

    pub fn increment_index(&mut self) -> usize {
        if let Some(max_index) = self.state.max_index {
            self.state.current_index = (self.state.current_index + 1).min(max_index);
        }
        self.state.current_index
    }

    pub fn decrement_index(&mut self) -> usize {
        self.state.current_index = self.state.current_index.saturating_sub(1);
        self.state.current_index
    }

    /// Releases the timer for good; the controller stays usable but inert
    /// until `play` is called again.
    pub fn shutdown(&mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.release_timer();
        self.state.is_playing = false;
    }

    fn release_timer(&mut self) {
        if self.timer.cancel().is_some() {
            self.metrics.record_cancelled();
        }
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.release_timer();
    }
}
