//! Boundary navigation for keyboard-driven seeking.

/// Sorted, deduplicated set of timestamps a cursor can jump between.
///
/// Always contains `0` and the duration of the active space, plus every
/// competency edge expressed in that same space.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundaries {
    points: Vec<f64>,
    duration: f64,
}

impl Boundaries {
    pub fn new(duration: f64, edges: impl IntoIterator<Item = f64>) -> Self {
        let duration = if duration.is_finite() {
            duration.max(0.0)
        } else {
            0.0
        };
        let mut points: Vec<f64> = [0.0, duration]
            .into_iter()
            .chain(edges.into_iter().filter(|p| p.is_finite()))
            .collect();
        points.sort_by(f64::total_cmp);
        points.dedup();
        Self { points, duration }
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Greatest boundary strictly before `cursor - epsilon`, or 0.
    pub fn previous(&self, cursor: f64, epsilon: f64) -> f64 {
        let limit = cursor - epsilon;
        self.points
            .iter()
            .rev()
            .copied()
            .find(|&p| p < limit)
            .unwrap_or(0.0)
    }

    /// Least boundary strictly after `cursor + epsilon`, or the duration.
    pub fn next(&self, cursor: f64, epsilon: f64) -> f64 {
        let limit = cursor + epsilon;
        self.points
            .iter()
            .copied()
            .find(|&p| p > limit)
            .unwrap_or(self.duration)
    }
}
