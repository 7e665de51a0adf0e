use crate::projection::affordances::Affordances;
use crate::projection::extents::AxisExtents;
use crate::series::{AgentSeries, SeriesSet};
use serde::Serialize;
use std::sync::Arc;

/// Prefix of one agent's series revealed up to the current frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialSeries<'a> {
    pub agent: &'a str,
    pub x: &'a [f64],
    pub y: &'a [f64],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vx: Option<&'a [f64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vy: Option<&'a [f64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<&'a [f64]>,
}

impl<'a> PartialSeries<'a> {
    fn truncate(agent: &'a str, series: &'a AgentSeries, current_index: usize) -> Self {
        let len = current_index.saturating_add(1);
        let prefix = |values: &'a [f64]| &values[..len.min(values.len())];
        Self {
            agent,
            x: prefix(&series.x),
            y: prefix(&series.y),
            vx: series.vx.as_deref().map(prefix),
            vy: series.vy.as_deref().map(prefix),
            time: series.time.as_deref().map(prefix),
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Most recent revealed position.
    pub fn head(&self) -> Option<(f64, f64)> {
        Some((*self.x.last()?, *self.y.last()?))
    }
}

/// Instantaneous values of one agent at a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Readout {
    pub agent: String,
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub vx: Option<f64>,
    pub vy: Option<f64>,
    pub time: Option<f64>,
}

/// Derives the renderable window of every series. Axis extents are fixed
/// at construction so the plot range does not move during playback.
#[derive(Debug, Clone)]
pub struct WindowProjector {
    series: Arc<SeriesSet>,
    extents: Option<AxisExtents>,
}

impl WindowProjector {
    pub fn new(series: Arc<SeriesSet>) -> Self {
        let extents = AxisExtents::compute(&series);
        Self { series, extents }
    }

    pub fn series(&self) -> &SeriesSet {
        &self.series
    }

    /// `None` until a non-empty dataset is loaded.
    pub fn extents(&self) -> Option<AxisExtents> {
        self.extents
    }

    pub fn project(&self, current_index: usize) -> Vec<PartialSeries<'_>> {
        Self::project_series(&self.series, current_index)
    }

    /// Truncates every series to the closed range `[0, current_index]`.
    pub fn project_series(series: &SeriesSet, current_index: usize) -> Vec<PartialSeries<'_>> {
        series
            .iter()
            .map(|(agent, values)| PartialSeries::truncate(agent, values, current_index))
            .collect()
    }

    pub fn affordances(is_playing: bool) -> Affordances {
        Affordances::for_state(is_playing)
    }

    /// Values of `agent` at `index`, or at its last sample when the agent's
    /// series is shorter than the run.
    pub fn readout(&self, agent: &str, index: usize) -> Option<Readout> {
        let values = self.series.get(agent)?;
        let at = index.min(values.len().checked_sub(1)?);
        let pick = |column: &Option<Vec<f64>>| column.as_ref().and_then(|c| c.get(at).copied());
        Some(Readout {
            agent: agent.to_string(),
            index: at,
            x: values.x[at],
            y: values.y[at],
            vx: pick(&values.vx),
            vy: pick(&values.vy),
            time: pick(&values.time),
        })
    }
}
