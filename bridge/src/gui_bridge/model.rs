use serde::Serialize;
use trajcore::dataset::RawSnapshot;
use trajcore::projection::{AxisExtents, PartialSeries, Readout};
use trajcore::series::SeriesSet;

/// Revealed prefix of one agent's trail.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct SeriesWindow {
    pub agent: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vx: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vy: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<Vec<f64>>,
}

impl From<&PartialSeries<'_>> for SeriesWindow {
    fn from(series: &PartialSeries<'_>) -> Self {
        Self {
            agent: series.agent.to_string(),
            x: series.x.to_vec(),
            y: series.y.to_vec(),
            vx: series.vx.map(<[f64]>::to_vec),
            vy: series.vy.map(<[f64]>::to_vec),
            time: series.time.map(<[f64]>::to_vec),
        }
    }
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct FrameModel {
    pub index: usize,
    pub max_index: Option<usize>,
    pub series: Vec<SeriesWindow>,
    pub extents: Option<AxisExtents>,
    pub readout: Option<Readout>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AgentSummary {
    pub agent: String,
    pub samples: usize,
    pub has_motion: bool,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct DatasetSummary {
    pub frames: usize,
    pub max_index: Option<usize>,
    pub agents: Vec<AgentSummary>,
    pub extents: Option<AxisExtents>,
    /// Producer interval covered by the stream, first start to last end.
    pub span: Option<(f64, f64)>,
}

impl DatasetSummary {
    pub fn describe(
        snapshots: &[RawSnapshot],
        series: &SeriesSet,
        extents: Option<AxisExtents>,
    ) -> Self {
        let agents = series
            .iter()
            .map(|(agent, values)| AgentSummary {
                agent: agent.clone(),
                samples: values.len(),
                has_motion: values.vx.is_some() && values.vy.is_some(),
            })
            .collect();
        Self {
            frames: series.frame_count(),
            max_index: series.max_index(),
            agents,
            extents,
            span: snapshots
                .first()
                .zip(snapshots.last())
                .map(|(first, last)| (first.interval_start, last.interval_end)),
        }
    }
}
