pub mod loader;
pub mod snapshot;

pub use loader::{load_snapshots, parse_snapshots};
pub use snapshot::{AgentId, Frame, RawSnapshot, Sample};
