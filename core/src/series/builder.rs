use crate::dataset::{AgentId, RawSnapshot, Sample};
use indexmap::IndexMap;
use serde::Serialize;

/// Positionally aligned time series of one agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vx: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vy: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<Vec<f64>>,
}

impl AgentSeries {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    fn push(&mut self, sample: &Sample) {
        let first = self.is_empty();
        append_optional(&mut self.vx, sample.vx, first);
        append_optional(&mut self.vy, sample.vy, first);
        append_optional(&mut self.time, sample.time, first);
        self.x.push(sample.x);
        self.y.push(sample.y);
    }
}

/// A companion column exists only if every sample of the agent carries it.
fn append_optional(column: &mut Option<Vec<f64>>, value: Option<f64>, first: bool) {
    match (column.as_mut(), value) {
        (Some(values), Some(value)) => values.push(value),
        (None, Some(value)) if first => *column = Some(vec![value]),
        _ => *column = None,
    }
}

/// Per-agent series of a whole run plus the authoritative snapshot count.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesSet {
    agents: IndexMap<AgentId, AgentSeries>,
    frame_count: usize,
}

impl SeriesSet {
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Last playable frame, `None` when there is nothing to play.
    pub fn max_index(&self) -> Option<usize> {
        self.frame_count.checked_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn get(&self, agent: &str) -> Option<&AgentSeries> {
        self.agents.get(agent)
    }

    /// Agents in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&AgentId, &AgentSeries)> {
        self.agents.iter()
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = &AgentId> {
        self.agents.keys()
    }

    pub fn last_agent(&self) -> Option<&AgentId> {
        self.agents.keys().last()
    }

    /// Agent whose motion fields are read out: `preferred` when given,
    /// otherwise the last agent in series order.
    pub fn readout_agent<'a>(&'a self, preferred: Option<&'a str>) -> Option<&'a str> {
        preferred.or_else(|| self.last_agent().map(String::as_str))
    }
}

/// Reshapes a frame-indexed snapshot stream into per-agent series.
pub struct SeriesBuilder;

impl SeriesBuilder {
    pub fn build(snapshots: &[RawSnapshot]) -> SeriesSet {
        let mut agents: IndexMap<AgentId, AgentSeries> = IndexMap::new();
        for snapshot in snapshots {
            for (agent, sample) in &snapshot.frame {
                agents.entry(agent.clone()).or_default().push(sample);
            }
        }

        SeriesSet {
            agents,
            frame_count: snapshots.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Frame;

    fn snapshot(start: f64, entries: &[(&str, Sample)]) -> RawSnapshot {
        let frame: Frame = entries
            .iter()
            .map(|(agent, sample)| (agent.to_string(), *sample))
            .collect();
        RawSnapshot::new(start, start + 1.0, frame)
    }

    #[test]
    fn build_reshapes_single_agent_stream() {
        let snapshots = vec![
            snapshot(0.0, &[("A", Sample::position(0.0, 0.0))]),
            snapshot(1.0, &[("A", Sample::position(1.0, 1.0))]),
            snapshot(2.0, &[("A", Sample::position(2.0, 4.0))]),
        ];
        let series = SeriesBuilder::build(&snapshots);

        let a = series.get("A").unwrap();
        assert_eq!(a.x, vec![0.0, 1.0, 2.0]);
        assert_eq!(a.y, vec![0.0, 1.0, 4.0]);
        assert_eq!(a.vx, None);
        assert_eq!(series.max_index(), Some(2));
    }

    #[test]
    fn build_of_empty_stream_has_nothing_to_play() {
        let series = SeriesBuilder::build(&[]);
        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
        assert_eq!(series.max_index(), None);
    }

    #[test]
    fn build_keeps_snapshot_order_and_alignment() {
        let snapshots = vec![
            snapshot(
                5.0,
                &[
                    ("A", Sample::position(3.0, -3.0)),
                    ("B", Sample::position(9.0, 9.0)),
                ],
            ),
            snapshot(
                1.0,
                &[
                    ("B", Sample::position(8.0, 8.0)),
                    ("A", Sample::position(1.0, -1.0)),
                ],
            ),
            snapshot(1.0, &[("A", Sample::position(1.0, -1.0))]),
        ];
        let series = SeriesBuilder::build(&snapshots);

        let a = series.get("A").unwrap();
        assert_eq!(a.x, vec![3.0, 1.0, 1.0]);
        assert_eq!(a.y, vec![-3.0, -1.0, -1.0]);
        let b = series.get("B").unwrap();
        assert_eq!(b.x, vec![9.0, 8.0]);
        assert_eq!(b.y, vec![9.0, 8.0]);
    }

    #[test]
    fn build_derives_max_index_from_snapshot_count() {
        let snapshots = vec![
            snapshot(
                0.0,
                &[
                    ("Planet", Sample::position(0.0, 0.1)),
                    ("Satellite", Sample::position(0.0, 1.0)),
                ],
            ),
            snapshot(1.0, &[("Planet", Sample::position(0.1, 0.1))]),
            snapshot(2.0, &[("Satellite", Sample::position(0.1, 1.0))]),
            snapshot(3.0, &[("Planet", Sample::position(0.2, 0.1))]),
        ];
        let series = SeriesBuilder::build(&snapshots);

        assert_eq!(series.get("Planet").unwrap().len(), 3);
        assert_eq!(series.get("Satellite").unwrap().len(), 2);
        assert_eq!(series.max_index(), Some(3));
        let order: Vec<&str> = series.agent_ids().map(String::as_str).collect();
        assert_eq!(order, vec!["Planet", "Satellite"]);
        assert_eq!(series.last_agent().map(String::as_str), Some("Satellite"));
    }

    #[test]
    fn readout_agent_prefers_configured_then_last() {
        let snapshots = vec![snapshot(
            0.0,
            &[
                ("Planet", Sample::position(0.0, 0.1)),
                ("Satellite", Sample::position(0.0, 1.0)),
            ],
        )];
        let series = SeriesBuilder::build(&snapshots);

        assert_eq!(series.readout_agent(None), Some("Satellite"));
        assert_eq!(series.readout_agent(Some("Planet")), Some("Planet"));
        assert_eq!(SeriesBuilder::build(&[]).readout_agent(None), None);
    }

    #[test]
    fn build_carries_motion_columns_when_present() {
        let start = Sample::position(0.0, 0.0).with_motion(1.0, 0.0, 0.0);
        let next = Sample::position(1.0, 0.0).with_motion(1.0, 0.5, 0.01);
        let snapshots = vec![
            snapshot(0.0, &[("A", start)]),
            snapshot(1.0, &[("A", next)]),
        ];
        let series = SeriesBuilder::build(&snapshots);

        let a = series.get("A").unwrap();
        assert_eq!(a.vx, Some(vec![1.0, 1.0]));
        assert_eq!(a.vy, Some(vec![0.0, 0.5]));
        assert_eq!(a.time, Some(vec![0.0, 0.01]));
    }

    #[test]
    fn build_drops_motion_column_missing_from_any_sample() {
        let start = Sample::position(0.0, 0.0).with_motion(1.0, 0.0, 0.0);
        let next = Sample::position(2.0, 0.0).with_motion(1.0, 0.0, 0.2);
        let snapshots = vec![
            snapshot(0.0, &[("A", start)]),
            snapshot(1.0, &[("A", Sample::position(1.0, 0.0))]),
            snapshot(2.0, &[("A", next)]),
        ];
        let series = SeriesBuilder::build(&snapshots);

        let a = series.get("A").unwrap();
        assert_eq!(a.x.len(), 3);
        assert_eq!(a.vx, None);
        assert_eq!(a.vy, None);
        assert_eq!(a.time, None);
    }

    #[test]
    fn build_ignores_motion_that_starts_late() {
        let moving = Sample::position(1.0, 0.0).with_motion(1.0, 0.0, 0.1);
        let snapshots = vec![
            snapshot(0.0, &[("A", Sample::position(0.0, 0.0))]),
            snapshot(1.0, &[("A", moving)]),
        ];
        let series = SeriesBuilder::build(&snapshots);
        assert_eq!(series.get("A").unwrap().vx, None);
    }
}
