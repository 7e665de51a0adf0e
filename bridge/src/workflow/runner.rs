use crate::workflow::config::ReplayConfig;
use anyhow::Context;
use log::{error, info, warn};
use std::fs;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use trajcore::dataset::{parse_snapshots, RawSnapshot};
use trajcore::playback::{TickOutcome, TokioTickSource};
use trajcore::projection::WindowProjector;
use trajcore::series::{SeriesBuilder, SeriesSet};
use trajcore::telemetry::{MetricsSnapshot, PlaybackLog};
use trajcore::PlaybackSession;

/// A snapshot stream loaded once and shared read-only by every consumer.
pub struct Dataset {
    raw: String,
    snapshots: Vec<RawSnapshot>,
    series: Arc<SeriesSet>,
    projector: WindowProjector,
}

impl Dataset {
    pub fn from_json(raw: String) -> anyhow::Result<Self> {
        let snapshots = parse_snapshots(&raw).context("parsing snapshot stream")?;
        let series = Arc::new(SeriesBuilder::build(&snapshots));
        Ok(Self {
            raw,
            snapshots,
            projector: WindowProjector::new(series.clone()),
            series,
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let raw = fs::read_to_string(path_ref)
            .with_context(|| format!("reading dataset {}", path_ref.display()))?;
        Self::from_json(raw).with_context(|| format!("loading dataset {}", path_ref.display()))
    }

    /// Loads `path`, degrading to an empty dataset when it is unavailable.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(dataset) => dataset,
            Err(err) => {
                error!("no data to play: {:#}", err);
                Self::empty()
            }
        }
    }

    pub fn empty() -> Self {
        let series = Arc::new(SeriesSet::default());
        Self {
            raw: "[]".into(),
            snapshots: Vec::new(),
            projector: WindowProjector::new(series.clone()),
            series,
        }
    }

    /// The document exactly as the producer wrote it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn snapshots(&self) -> &[RawSnapshot] {
        &self.snapshots
    }

    pub fn series(&self) -> &SeriesSet {
        &self.series
    }

    pub fn shared_series(&self) -> Arc<SeriesSet> {
        self.series.clone()
    }

    pub fn projector(&self) -> &WindowProjector {
        &self.projector
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    pub frames_shown: usize,
    pub final_index: usize,
    pub completed: bool,
    pub metrics: MetricsSnapshot,
}

#[derive(Clone)]
pub struct Runner {
    config: ReplayConfig,
    dataset: Arc<Dataset>,
}

impl Runner {
    pub fn new(config: ReplayConfig, dataset: Arc<Dataset>) -> Self {
        Self { config, dataset }
    }

    pub fn dataset(&self) -> Arc<Dataset> {
        self.dataset.clone()
    }

    /// Plays the dataset from frame 0 on a tokio timer, logging every frame,
    /// until it finishes or `shutdown` resolves.
    pub async fn replay<F>(&self, shutdown: F) -> anyhow::Result<ReplayReport>
    where
        F: Future<Output = ()>,
    {
        let series = self.dataset.shared_series();
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let ticks = TokioTickSource::current(sender).context("arming replay timer")?;
        let mut session = PlaybackSession::with_log(
            series,
            self.config.to_playback_config(),
            Box::new(ticks),
            PlaybackLog::new("replay"),
        );

        if session.is_empty() {
            warn!("replay skipped: dataset has no frames");
            return Ok(ReplayReport {
                frames_shown: 0,
                final_index: 0,
                completed: false,
                metrics: session.dispose(),
            });
        }

        session.play();
        log_frame(&session);
        let mut frames_shown = 1;
        let mut last_index = session.current_index();
        let mut completed = false;

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("replay interrupted at frame {}", session.current_index());
                    break;
                }
                tick = receiver.recv() => {
                    let Some(id) = tick else { break };
                    match session.on_tick(id) {
                        TickOutcome::Advanced(index) => {
                            frames_shown += 1;
                            last_index = index;
                            log_frame(&session);
                        }
                        TickOutcome::Finished(index) => {
                            if index != last_index {
                                frames_shown += 1;
                                log_frame(&session);
                            }
                            completed = true;
                            break;
                        }
                        TickOutcome::Stale => {}
                    }
                }
            }
        }

        let final_index = session.current_index();
        Ok(ReplayReport {
            frames_shown,
            final_index,
            completed,
            metrics: session.dispose(),
        })
    }
}

fn log_frame(session: &PlaybackSession) {
    let heads = session
        .window()
        .iter()
        .filter_map(|series| {
            series
                .head()
                .map(|(x, y)| format!("{}=({:.4}, {:.4})", series.agent, x, y))
        })
        .collect::<Vec<_>>()
        .join(" ");
    match session.readout() {
        Some(readout) => info!(
            "frame {} {} | {} vx={:?} vy={:?} time={:?}",
            session.current_index(),
            heads,
            readout.agent,
            readout.vx,
            readout.vy,
            readout.time
        ),
        None => info!("frame {} {}", session.current_index(), heads),
    }
}
