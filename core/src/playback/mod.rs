pub mod controller;
pub mod timer;

pub use controller::{PlaybackController, PlaybackPhase, PlaybackState, TickOutcome};
pub use timer::{ExternalTickSource, TimerSlot, TokioTickSource};
