use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type AgentId = String;

/// Agent entries of one snapshot, in the order the producer wrote them.
pub type Frame = IndexMap<AgentId, Sample>;

type SnapshotTriple = (f64, f64, Frame);

/// Instantaneous state of one agent. Velocity and time are only emitted by
/// some producer versions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
}

impl Sample {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            vx: None,
            vy: None,
            time: None,
        }
    }

    pub fn with_motion(mut self, vx: f64, vy: f64, time: f64) -> Self {
        self.vx = Some(vx);
        self.vy = Some(vy);
        self.time = Some(time);
        self
    }
}

/// One entry of the producer's stream, serialized as a `[start, end, frame]`
/// triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SnapshotTriple", into = "SnapshotTriple")]
pub struct RawSnapshot {
    pub interval_start: f64,
    pub interval_end: f64,
    pub frame: Frame,
}

impl RawSnapshot {
    pub fn new(interval_start: f64, interval_end: f64, frame: Frame) -> Self {
        Self {
            interval_start,
            interval_end,
            frame,
        }
    }
}

impl From<SnapshotTriple> for RawSnapshot {
    fn from((interval_start, interval_end, frame): SnapshotTriple) -> Self {
        Self::new(interval_start, interval_end, frame)
    }
}

impl From<RawSnapshot> for SnapshotTriple {
    fn from(snapshot: RawSnapshot) -> Self {
        (snapshot.interval_start, snapshot.interval_end, snapshot.frame)
    }
}
