//! Total / trash / useful duration aggregation.

use serde::{Deserialize, Serialize};

use crate::interval::Range;
use crate::trash::total_trash;

/// Derived duration breakdown in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total: f64,
    pub trash: f64,
    pub useful: f64,
}

impl Metrics {
    /// Computes metrics from coalesced holes and the media duration.
    pub fn compute(holes: &[Range], duration: f64) -> Self {
        let total = if duration.is_finite() {
            duration.max(0.0)
        } else {
            0.0
        };
        let trash = total_trash(holes);
        Self {
            total,
            trash,
            useful: (total - trash).max(0.0),
        }
    }

    /// Share of the timeline that is trash, in `[0, 1]`. 0 with no duration.
    pub fn trash_ratio(&self) -> f64 {
        if self.total <= 0.0 {
            return 0.0;
        }
        (self.trash / self.total).clamp(0.0, 1.0)
    }

    /// Share of the timeline that is kept, in `[0, 1]`. 0 with no duration.
    pub fn useful_ratio(&self) -> f64 {
        if self.total <= 0.0 {
            return 0.0;
        }
        (self.useful / self.total).clamp(0.0, 1.0)
    }
}
