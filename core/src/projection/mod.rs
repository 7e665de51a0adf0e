pub mod affordances;
pub mod extents;
pub mod window;

pub use affordances::{Affordances, TransportAction};
pub use extents::AxisExtents;
pub use window::{PartialSeries, Readout, WindowProjector};
