pub mod builder;

pub use builder::{AgentSeries, SeriesBuilder, SeriesSet};
