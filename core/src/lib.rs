//! Playback engine for recorded trajectory simulations.
//!
//! A producer's snapshot stream is reshaped into per-agent series once, then
//! a single session owns the current frame, the autoplay timer and the
//! projection of every series onto the frame being shown.

pub mod dataset;
pub mod playback;
pub mod prelude;
pub mod projection;
pub mod series;
pub mod session;
pub mod telemetry;

pub use prelude::{PlaybackConfig, TickId, TickSource, TimerHandle};
pub use session::{FrameView, PlaybackSession};
