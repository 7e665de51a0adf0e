use crate::dataset::RawSnapshot;
use crate::playback::{PlaybackController, PlaybackState, TickOutcome};
use crate::prelude::{DatasetResult, PlaybackConfig, TickId, TickSource};
use crate::projection::{
    Affordances, AxisExtents, PartialSeries, Readout, TransportAction, WindowProjector,
};
use crate::series::{SeriesBuilder, SeriesSet};
use crate::telemetry::{MetricsSnapshot, PlaybackLog, PlaybackMetrics};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Everything a rendering surface needs for the current frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameView<'a> {
    pub state: PlaybackState,
    pub series: Vec<PartialSeries<'a>>,
    pub extents: Option<AxisExtents>,
    pub affordances: Affordances,
    pub readout: Option<Readout>,
}

/// One loaded dataset together with its playback state and timer.
///
/// Created once the dataset is available and disposed when the consumer
/// goes away; disposing (or dropping) releases any live timer.
pub struct PlaybackSession {
    config: PlaybackConfig,
    projector: WindowProjector,
    controller: PlaybackController,
    metrics: Arc<PlaybackMetrics>,
    log: PlaybackLog,
}

impl PlaybackSession {
    pub fn create(
        snapshots: &[RawSnapshot],
        config: PlaybackConfig,
        ticks: Box<dyn TickSource>,
    ) -> Self {
        Self::from_series(Arc::new(SeriesBuilder::build(snapshots)), config, ticks)
    }

    pub fn from_series(
        series: Arc<SeriesSet>,
        config: PlaybackConfig,
        ticks: Box<dyn TickSource>,
    ) -> Self {
        Self::with_log(series, config, ticks, PlaybackLog::default())
    }

    pub fn with_log(
        series: Arc<SeriesSet>,
        config: PlaybackConfig,
        ticks: Box<dyn TickSource>,
        log: PlaybackLog,
    ) -> Self {
        let metrics = Arc::new(PlaybackMetrics::new());
        let controller = PlaybackController::new(series.max_index(), config.cadence(), ticks)
            .with_log(log.clone())
            .with_metrics(metrics.clone());
        log.record(&format!(
            "session ready: {} agents over {} frames",
            series.len(),
            series.frame_count()
        ));

        Self {
            config,
            projector: WindowProjector::new(series),
            controller,
            metrics,
            log,
        }
    }

    /// Session with nothing to play.
    pub fn empty(config: PlaybackConfig, ticks: Box<dyn TickSource>) -> Self {
        Self::from_series(Arc::new(SeriesSet::default()), config, ticks)
    }

    /// Builds a session from a load attempt. A failed load is logged and
    /// yields an empty, inert session.
    pub fn from_load(
        loaded: DatasetResult<Vec<RawSnapshot>>,
        config: PlaybackConfig,
        ticks: Box<dyn TickSource>,
    ) -> Self {
        match loaded {
            Ok(snapshots) => Self::create(&snapshots, config, ticks),
            Err(err) => {
                PlaybackLog::default().failure(&format!("dataset unavailable: {err}"));
                Self::empty(config, ticks)
            }
        }
    }

    /// Ends the session, cancelling any live timer.
    /// Releases the timer and returns the final counters.
    pub fn dispose(mut self) -> MetricsSnapshot {
        self.controller.shutdown();
        self.log.record("session disposed");
        self.metrics.snapshot()
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn series(&self) -> &SeriesSet {
        self.projector.series()
    }

    pub fn is_empty(&self) -> bool {
        self.series().is_empty()
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn current_index(&self) -> usize {
        self.controller.current_index()
    }

    pub fn max_index(&self) -> Option<usize> {
        self.controller.max_index()
    }

    pub fn is_playing(&self) -> bool {
        self.controller.is_playing()
    }

    pub fn live_timer(&self) -> Option<TickId> {
        self.controller.live_timer()
    }

    pub fn cadence(&self) -> Duration {
        self.controller.cadence()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn play(&mut self) {
        self.controller.play();
    }

    pub fn pause(&mut self) {
        self.controller.pause();
    }

    pub fn reset(&mut self) {
        self.controller.reset();
    }

    pub fn skip_to_end(&mut self) {
        self.controller.skip_to_end();
    }

    pub fn seek(&mut self, index: i64) -> usize {
        self.controller.seek(index)
    }

    pub fn increment_index(&mut self) -> usize {
        self.controller.increment_index()
    }

    pub fn decrement_index(&mut self) -> usize {
        self.controller.decrement_index()
    }

    pub fn on_tick(&mut self, id: TickId) -> TickOutcome {
        self.controller.on_tick(id)
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.controller.tick()
    }

    /// Dispatches a named transport control.
    pub fn apply(&mut self, action: TransportAction) {
        match action {
            TransportAction::Play => self.play(),
            TransportAction::Pause => self.pause(),
            TransportAction::Reset => self.reset(),
            TransportAction::SkipToEnd => self.skip_to_end(),
        }
    }

    /// Agent whose motion is reported by readouts: the configured one, or
    /// the last agent in series order.
    pub fn readout_agent(&self) -> Option<&str> {
        self.series().readout_agent(self.config.readout_agent.as_deref())
    }

    pub fn readout(&self) -> Option<Readout> {
        let agent = self.readout_agent()?;
        self.projector.readout(agent, self.current_index())
    }

    pub fn extents(&self) -> Option<AxisExtents> {
        self.projector.extents()
    }

    pub fn window(&self) -> Vec<PartialSeries<'_>> {
        if self.is_empty() {
            return Vec::new();
        }
        self.projector.project(self.current_index())
    }

    pub fn view(&self) -> FrameView<'_> {
        let state = self.state();
        FrameView {
            state,
            series: self.window(),
            extents: self.extents(),
            affordances: WindowProjector::affordances(state.is_playing),
            readout: self.readout(),
        }
    }
}
