use crate::gui_bridge::model::{DatasetSummary, FrameModel, SeriesWindow};
use crate::workflow::runner::Dataset;
use anyhow::Context;
use log::info;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::{Filter, Rejection, Reply};

/// HTTP surface that hands the loaded dataset to rendering clients.
pub struct GuiBridge {
    dataset: Arc<Dataset>,
    readout_agent: Option<String>,
}

impl GuiBridge {
    pub fn new(dataset: Arc<Dataset>, readout_agent: Option<String>) -> Self {
        Self {
            dataset,
            readout_agent,
        }
    }

    pub fn routes(&self) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
        let dataset = self.dataset.clone();
        let dataset_filter = warp::any().map(move || dataset.clone());
        let readout_agent = self.readout_agent.clone();
        let readout_filter = warp::any().map(move || readout_agent.clone());

        let data_route = warp::path("data.json")
            .and(warp::path::end())
            .and(warp::get())
            .and(dataset_filter.clone())
            .map(|dataset: Arc<Dataset>| {
                warp::reply::with_header(
                    dataset.raw().to_string(),
                    "content-type",
                    "application/json",
                )
            });

        let summary_route = warp::path("summary")
            .and(warp::path::end())
            .and(warp::get())
            .and(dataset_filter.clone())
            .map(|dataset: Arc<Dataset>| {
                let summary = DatasetSummary::describe(
                    dataset.snapshots(),
                    dataset.series(),
                    dataset.projector().extents(),
                );
                warp::reply::json(&summary)
            });

        let frame_route = warp::path!("frame" / i64)
            .and(warp::get())
            .and(dataset_filter)
            .and(readout_filter)
            .map(
                |index: i64, dataset: Arc<Dataset>, readout_agent: Option<String>| {
                    warp::reply::json(&frame_model(&dataset, index, readout_agent.as_deref()))
                },
            );

        data_route.or(summary_route).or(frame_route)
    }

    /// Serves until `shutdown` resolves.
    pub async fn serve<F>(&self, addr: SocketAddr, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (bound, server) = warp::serve(self.routes())
            .try_bind_with_graceful_shutdown(addr, shutdown)
            .with_context(|| format!("binding data bridge on {addr}"))?;
        self.publish_status(&format!(
            "serving {} frames on http://{bound}",
            self.dataset.series().frame_count()
        ));
        server.await;
        self.publish_status("bridge stopped");
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        info!("[bridge] {}", message);
    }
}

/// Projects the dataset at `index`, clamped into the playable range.
fn frame_model(dataset: &Dataset, index: i64, readout_agent: Option<&str>) -> FrameModel {
    let series = dataset.series();
    let Some(max_index) = series.max_index() else {
        return FrameModel::default();
    };
    let index = index.clamp(0, max_index as i64) as usize;
    let projector = dataset.projector();
    let readout = series
        .readout_agent(readout_agent)
        .and_then(|agent| projector.readout(agent, index));

    FrameModel {
        index,
        max_index: Some(max_index),
        series: projector.project(index).iter().map(SeriesWindow::from).collect(),
        extents: projector.extents(),
        readout,
    }
}
