use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, slider, text, Column, Container, Row,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use trajcore::dataset::RawSnapshot;
use trajcore::playback::{ExternalTickSource, TickOutcome};
use trajcore::projection::{AxisExtents, TransportAction};
use trajcore::{PlaybackConfig, PlaybackSession};

const DEFAULT_DATA_URL: &str = "http://127.0.0.1:9000/data.json";

fn main() -> iced::Result {
    env_logger::init();
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Trajectory Playback".into()
}

/// The autoplay clock runs only while the session holds a live timer.
fn application_subscription(state: &Visualizer) -> Subscription<Message> {
    if state.session.live_timer().is_some() {
        time::every(state.session.cadence()).map(|_| Message::Tick)
    } else {
        Subscription::none()
    }
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

fn data_url() -> String {
    std::env::var("TRAJ_DATA_URL").unwrap_or_else(|_| DEFAULT_DATA_URL.into())
}

struct Visualizer {
    session: PlaybackSession,
    zoom: f32,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    DataFetched(Result<Vec<RawSnapshot>, String>),
    Reload,
    Transport(TransportAction),
    Seek(u32),
    StepBack,
    StepForward,
    Zoom(ZoomStep),
}

#[derive(Debug, Clone, Copy)]
enum ZoomStep {
    In,
    Out,
    Fit,
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                session: empty_session(),
                zoom: 1.0,
                status: "Loading trajectory data...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_snapshots(data_url()), Message::DataFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                if let TickOutcome::Finished(index) = state.session.tick() {
                    state.push_history(format!("Playback finished at frame {index}"));
                }
                Task::none()
            }
            Message::DataFetched(Ok(snapshots)) => {
                let session = PlaybackSession::create(
                    &snapshots,
                    PlaybackConfig::default(),
                    Box::new(ExternalTickSource),
                );
                std::mem::replace(&mut state.session, session).dispose();
                state.zoom = 1.0;
                state.status = format!(
                    "Loaded {} frames for {} agents",
                    state.session.series().frame_count(),
                    state.session.series().len()
                );
                state.push_history(state.status.clone());
                Task::none()
            }
            Message::DataFetched(Err(err)) => {
                log::error!("fetching trajectory data: {err}");
                std::mem::replace(&mut state.session, empty_session()).dispose();
                state.status = format!("No data: {err}");
                state.push_history("Data fetch failed".into());
                Task::none()
            }
            Message::Reload => {
                state.status = "Reloading trajectory data...".into();
                Task::perform(fetch_snapshots(data_url()), Message::DataFetched)
            }
            Message::Transport(action) => {
                state.session.apply(action);
                state.push_history(format!(
                    "{} -> frame {}",
                    action.name(),
                    state.session.current_index()
                ));
                Task::none()
            }
            Message::Seek(index) => {
                state.session.seek(i64::from(index));
                Task::none()
            }
            Message::StepBack => {
                state.session.decrement_index();
                Task::none()
            }
            Message::StepForward => {
                state.session.increment_index();
                Task::none()
            }
            Message::Zoom(step) => {
                state.zoom = match step {
                    ZoomStep::In => (state.zoom * 1.25).min(64.0),
                    ZoomStep::Out => (state.zoom / 1.25).max(0.25),
                    ZoomStep::Fit => 1.0,
                };
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let frame_view = state.session.view();
        let free_navigation = frame_view.affordances.free_navigation;
        let has_data = frame_view.state.max_index.is_some();

        let readout = frame_view.readout.as_ref();
        let readout_title = readout
            .map(|readout| format!("{} Data:", readout.agent))
            .unwrap_or_else(|| "Agent Data:".into());
        let readout_column = column![
            text(readout_title).size(22),
            text(format!("vx = {}", format_value(readout.and_then(|r| r.vx)))).size(14),
            text(format!("vy = {}", format_value(readout.and_then(|r| r.vy)))).size(14),
            text(format!("time = {}", format_value(readout.and_then(|r| r.time)))).size(14),
        ]
        .spacing(4);

        let scrubber: Element<'_, Message> = match frame_view.state.max_index {
            Some(max_index) => row![
                button("-").on_press(Message::StepBack).padding(6),
                slider(
                    0..=to_slider(max_index),
                    to_slider(frame_view.state.current_index),
                    Message::Seek
                )
                .width(Length::Fill),
                button("+").on_press(Message::StepForward).padding(6),
            ]
            .spacing(8)
            .align_y(Alignment::Center)
            .into(),
            None => text("No frames to play").size(14).into(),
        };

        let transport = frame_view.affordances.transport.iter().fold(
            Row::new().spacing(8),
            |controls, action| {
                controls.push(
                    button(text(transport_label(*action)))
                        .on_press_maybe(has_data.then_some(Message::Transport(*action)))
                        .padding(8),
                )
            },
        );

        let zoom_message = |step| (free_navigation && has_data).then_some(Message::Zoom(step));
        let zoom_controls = row![
            button("Zoom +").on_press_maybe(zoom_message(ZoomStep::In)).padding(6),
            button("Zoom -").on_press_maybe(zoom_message(ZoomStep::Out)).padding(6),
            button("Fit").on_press_maybe(zoom_message(ZoomStep::Fit)).padding(6),
        ]
        .spacing(6);

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let control_column = column![
            text("Playback").size(26),
            readout_column,
            text(format!("Frame {}", frame_view.state.current_index)).size(18),
            scrubber,
            transport,
            zoom_controls,
            button("Reload data").on_press(Message::Reload).padding(8),
            text(&state.status).size(14),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(160.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(360.0));

        let plot = Canvas::new(TrajectoryPlot {
            trails: frame_view
                .series
                .iter()
                .map(|series| Trail {
                    x: series.x.to_vec(),
                    y: series.y.to_vec(),
                })
                .collect(),
            extents: frame_view.extents,
            zoom: state.zoom,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let plot_column = column![text("Visualization").size(26), plot]
            .spacing(10)
            .padding(16)
            .width(Length::Fill)
            .height(Length::Fill);

        let layout = row![control_column, plot_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

fn empty_session() -> PlaybackSession {
    PlaybackSession::empty(PlaybackConfig::default(), Box::new(ExternalTickSource))
}

async fn fetch_snapshots(url: String) -> Result<Vec<RawSnapshot>, String> {
    let response = reqwest::get(&url).await.map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("{}: {}", url, response.status()));
    }
    response
        .json::<Vec<RawSnapshot>>()
        .await
        .map_err(|e| e.to_string())
}

fn transport_label(action: TransportAction) -> &'static str {
    match action {
        TransportAction::Play => "Play",
        TransportAction::Pause => "Pause",
        TransportAction::Reset => "Reset",
        TransportAction::SkipToEnd => "Skip",
    }
}

fn format_value(value: Option<f64>) -> String {
    value
        .map(|value| format!("{value:.4}"))
        .unwrap_or_else(|| "n/a".into())
}

fn to_slider(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

#[derive(Clone)]
struct Trail {
    x: Vec<f64>,
    y: Vec<f64>,
}

/// Maps world coordinates onto the canvas with equal x/y scale, centred on
/// the dataset extents.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PlotTransform {
    center: (f64, f64),
    scale: f64,
    origin: (f32, f32),
}

impl PlotTransform {
    const MARGIN: f32 = 16.0;

    fn fit(extents: &AxisExtents, width: f32, height: f32, zoom: f32) -> Self {
        let usable_w = f64::from((width - 2.0 * Self::MARGIN).max(1.0));
        let usable_h = f64::from((height - 2.0 * Self::MARGIN).max(1.0));
        let span_x = if extents.width() > 0.0 { extents.width() } else { 1.0 };
        let span_y = if extents.height() > 0.0 { extents.height() } else { 1.0 };
        let scale = (usable_w / span_x).min(usable_h / span_y) * f64::from(zoom);
        Self {
            center: extents.center(),
            scale,
            origin: (width / 2.0, height / 2.0),
        }
    }

    fn to_screen(&self, x: f64, y: f64) -> Point {
        Point::new(
            self.origin.0 + ((x - self.center.0) * self.scale) as f32,
            self.origin.1 - ((y - self.center.1) * self.scale) as f32,
        )
    }
}

fn trail_color(idx: usize) -> Color {
    match idx % 4 {
        0 => Color::from_rgb(0.18, 0.72, 0.89),
        1 => Color::from_rgb(0.95, 0.55, 0.2),
        2 => Color::from_rgb(0.55, 0.85, 0.35),
        _ => Color::from_rgb(0.85, 0.4, 0.75),
    }
}

struct TrajectoryPlot {
    trails: Vec<Trail>,
    extents: Option<AxisExtents>,
    zoom: f32,
}

impl canvas::Program<Message> for TrajectoryPlot {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.03, 0.03, 0.05),
        );

        // Axis assignment waits until there is data to bound.
        let Some(extents) = self.extents else {
            return vec![frame.into_geometry()];
        };
        let transform = PlotTransform::fit(&extents, bounds.width, bounds.height, self.zoom);

        let axes = Path::new(|builder| {
            let horizontal = transform.to_screen(extents.min_x, 0.0).y;
            let vertical = transform.to_screen(0.0, extents.min_y).x;
            builder.move_to(Point::new(0.0, horizontal));
            builder.line_to(Point::new(bounds.width, horizontal));
            builder.move_to(Point::new(vertical, 0.0));
            builder.line_to(Point::new(vertical, bounds.height));
        });
        frame.stroke(
            &axes,
            Stroke::default()
                .with_color(Color::from_rgb(0.25, 0.25, 0.3))
                .with_width(1.0),
        );

        for (idx, trail) in self.trails.iter().enumerate() {
            let color = trail_color(idx);
            let points: Vec<Point> = trail
                .x
                .iter()
                .zip(&trail.y)
                .map(|(&x, &y)| transform.to_screen(x, y))
                .collect();

            if points.len() > 1 {
                let path = Path::new(|builder| {
                    builder.move_to(points[0]);
                    for point in &points[1..] {
                        builder.line_to(*point);
                    }
                });
                frame.stroke(&path, Stroke::default().with_width(2.0).with_color(color));
            }
            if let Some(head) = points.last() {
                let marker = Path::new(|builder| builder.circle(*head, 4.5));
                frame.fill(&marker, color);
            }
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extents() -> AxisExtents {
        AxisExtents {
            min_x: 0.0,
            max_x: 2.0,
            min_y: 0.0,
            max_y: 4.0,
        }
    }

    #[test]
    fn transform_centres_extents_on_canvas() {
        let transform = PlotTransform::fit(&extents(), 232.0, 232.0, 1.0);
        assert_eq!(transform.to_screen(1.0, 2.0), Point::new(116.0, 116.0));
    }

    #[test]
    fn transform_keeps_equal_aspect() {
        let transform = PlotTransform::fit(&extents(), 432.0, 232.0, 1.0);
        let origin = transform.to_screen(0.0, 0.0);
        let unit_x = transform.to_screen(1.0, 0.0);
        let unit_y = transform.to_screen(0.0, 1.0);
        assert_eq!(unit_x.x - origin.x, origin.y - unit_y.y);
        assert_eq!(transform.scale, 50.0);
    }

    #[test]
    fn transform_handles_single_point_extents() {
        let point = AxisExtents {
            min_x: 3.0,
            max_x: 3.0,
            min_y: -1.0,
            max_y: -1.0,
        };
        let transform = PlotTransform::fit(&point, 100.0, 100.0, 2.0);
        assert_eq!(transform.to_screen(3.0, -1.0), Point::new(50.0, 50.0));
        assert!(transform.scale.is_finite());
    }

    #[test]
    fn labels_cover_every_transport_action() {
        assert_eq!(transport_label(TransportAction::SkipToEnd), "Skip");
        assert_eq!(format_value(None), "n/a");
        assert_eq!(format_value(Some(0.5)), "0.5000");
    }
}
