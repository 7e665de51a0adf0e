use crate::series::SeriesSet;
use serde::{Deserialize, Serialize};

/// Global plot bounds over every sample of every series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisExtents {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl AxisExtents {
    /// Folds over the full dataset. Returns `None` when there is no finite
    /// sample to bound.
    pub fn compute(series: &SeriesSet) -> Option<Self> {
        let mut extents = Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for (_, agent) in series.iter() {
            for &x in &agent.x {
                extents.min_x = extents.min_x.min(x);
                extents.max_x = extents.max_x.max(x);
            }
            for &y in &agent.y {
                extents.min_y = extents.min_y.min(y);
                extents.max_y = extents.max_y.max(y);
            }
        }

        extents.is_usable().then_some(extents)
    }

    pub fn is_usable(&self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}
