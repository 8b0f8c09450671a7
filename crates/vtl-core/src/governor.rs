//! Smart skip: steering playback around trash ranges.
//!
//! The decision is a pure function of the position and the current holes,
//! evaluated fresh on every position tick. Nothing remembers that a skip is
//! in progress, so rapid ticks cannot leave the governor stuck.

use crate::interval::Range;

/// Outcome of evaluating one position tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipDecision {
    /// The position is outside every hole.
    Stay,
    /// The position is inside `hole`; playback should seek to `to`.
    Jump { hole: Range, to: f64 },
}

/// Decides whether playback at `position` must jump forward.
///
/// `holes` must be sorted and coalesced. The target is `hole.end + epsilon`;
/// if that lands inside a later hole the jump chains through it, so the
/// target itself always evaluates to [`SkipDecision::Stay`]. When a duration
/// is known (`duration > 0`) the target is capped at it.
pub fn evaluate(position: f64, holes: &[Range], epsilon: f64, duration: f64) -> SkipDecision {
    let Some(index) = holes.iter().position(|h| h.contains(position)) else {
        return SkipDecision::Stay;
    };
    let hole = holes[index];

    let mut target = hole.end + epsilon.max(0.0);
    for later in &holes[index + 1..] {
        if later.contains(target) {
            target = later.end + epsilon.max(0.0);
        }
    }
    if duration > 0.0 {
        target = target.min(duration);
    }

    SkipDecision::Jump { hole, to: target }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holes() -> Vec<Range> {
        vec![Range::new(10.0, 20.0), Range::new(20.005, 30.0), Range::new(50.0, 60.0)]
    }

    #[test]
    fn outside_holes_stays() {
        assert_eq!(evaluate(5.0, &holes(), 0.01, 100.0), SkipDecision::Stay);
        assert_eq!(evaluate(40.0, &holes(), 0.01, 100.0), SkipDecision::Stay);
    }

    #[test]
    fn hole_end_is_not_inside() {
        assert_eq!(evaluate(60.0, &holes(), 0.0, 100.0), SkipDecision::Stay);
    }

    #[test]
    fn jumps_past_hole() {
        let SkipDecision::Jump { hole, to } = evaluate(55.0, &holes(), 0.01, 100.0) else {
            panic!("expected a jump");
        };
        assert_eq!(hole, Range::new(50.0, 60.0));
        assert!((to - 60.01).abs() < 1e-9);
    }

    #[test]
    fn chains_through_hole_within_epsilon() {
        let SkipDecision::Jump { to, .. } = evaluate(12.0, &holes(), 0.01, 100.0) else {
            panic!("expected a jump");
        };
        assert!((to - 30.01).abs() < 1e-9);
    }

    #[test]
    fn jump_target_is_stable() {
        let holes = holes();
        for position in [10.0, 15.0, 20.01, 29.99, 50.0, 59.999] {
            let SkipDecision::Jump { to, .. } = evaluate(position, &holes, 0.01, 100.0) else {
                panic!("expected a jump at {position}");
            };
            assert_eq!(evaluate(to, &holes, 0.01, 100.0), SkipDecision::Stay);
        }
    }

    #[test]
    fn target_capped_at_duration() {
        let holes = [Range::new(90.0, 100.0)];
        let SkipDecision::Jump { to, .. } = evaluate(95.0, &holes, 0.01, 100.0) else {
            panic!("expected a jump");
        };
        assert!((to - 100.0).abs() < f64::EPSILON);
        assert_eq!(evaluate(to, &holes, 0.01, 100.0), SkipDecision::Stay);
    }
}
