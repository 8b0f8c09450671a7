//! Primitive operations on half-open time ranges.

use serde::{Deserialize, Serialize};

use crate::segment::Segment;
use crate::types::SegmentId;

/// Shortest fragment that survives clipping or projection, in seconds.
pub const MIN_FRAGMENT_SECS: f64 = 0.05;

/// An anonymous `[start, end)` interval in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub start: f64,
    pub end: f64,
}

impl Range {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// True if `t` lies in `[start, end)`.
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }
}

/// Anything with a start and an end that can be coalesced.
pub trait Span {
    fn start(&self) -> f64;
    fn end(&self) -> f64;
    fn extend_to(&mut self, end: f64);
}

impl Span for Range {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }

    fn extend_to(&mut self, end: f64) {
        self.end = end;
    }
}

impl Span for Segment {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }

    fn extend_to(&mut self, end: f64) {
        self.end = end;
    }
}

/// Open overlap test: touching endpoints do not overlap.
pub fn overlaps(a: Range, b: Range) -> bool {
    a.start < b.end && b.start < a.end
}

/// Removes `hole` from `segment`.
///
/// Returns zero, one or two fragments, each with a fresh identity. Fragments
/// no longer than `min_len` are discarded.
pub fn clip(segment: &Segment, hole: Range, min_len: f64) -> Vec<Segment> {
    let before = Segment {
        id: SegmentId::generate(),
        end: segment.end.min(hole.start),
        ..segment.clone()
    };
    let after = Segment {
        id: SegmentId::generate(),
        start: segment.start.max(hole.end),
        ..segment.clone()
    };

    [before, after]
        .into_iter()
        .filter(|fragment| fragment.duration() > min_len)
        .collect()
}

/// Coalesces spans sorted by start into non-overlapping, non-touching spans.
///
/// A span joins the running one when it starts at or before the running end.
/// The first span of each group is kept and extended, so its identity (if
/// any) survives the merge.
pub fn merge_sorted<T: Span>(spans: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut merged: Vec<T> = Vec::new();
    for span in spans {
        if let Some(last) = merged.last_mut() {
            if span.start() <= last.end() {
                let end = last.end().max(span.end());
                last.extend_to(end);
                continue;
            }
        }
        merged.push(span);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::SegmentKind;

    fn competency(start: f64, end: f64) -> Segment {
        Segment {
            id: SegmentId::new("orig").unwrap(),
            label: "Comunicación".to_string(),
            start,
            end,
            kind: SegmentKind::Competency,
            color: "#a855f7".to_string(),
        }
    }

    fn bounds(segments: &[Segment]) -> Vec<(f64, f64)> {
        segments.iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn touching_ranges_do_not_overlap() {
        assert!(!overlaps(Range::new(0.0, 5.0), Range::new(5.0, 8.0)));
        assert!(overlaps(Range::new(0.0, 5.0), Range::new(4.9, 8.0)));
        assert!(overlaps(Range::new(2.0, 3.0), Range::new(0.0, 10.0)));
    }

    #[test]
    fn clip_middle_hole_yields_two_fragments() {
        let fragments = clip(&competency(5.0, 25.0), Range::new(10.0, 20.0), MIN_FRAGMENT_SECS);
        assert_eq!(bounds(&fragments), vec![(5.0, 10.0), (20.0, 25.0)]);
        assert!(fragments.iter().all(|f| f.id.as_str() != "orig"));
        assert_ne!(fragments[0].id, fragments[1].id);
        assert!(fragments.iter().all(|f| f.label == "Comunicación"));
    }

    #[test]
    fn clip_leading_hole_keeps_tail() {
        let fragments = clip(&competency(5.0, 25.0), Range::new(0.0, 12.0), MIN_FRAGMENT_SECS);
        assert_eq!(bounds(&fragments), vec![(12.0, 25.0)]);
    }

    #[test]
    fn clip_covering_hole_removes_everything() {
        let fragments = clip(&competency(5.0, 25.0), Range::new(0.0, 30.0), MIN_FRAGMENT_SECS);
        assert!(fragments.is_empty());
    }

    #[test]
    fn clip_discards_slivers() {
        let fragments = clip(&competency(5.0, 25.0), Range::new(5.04, 24.98), MIN_FRAGMENT_SECS);
        assert!(fragments.is_empty());
    }

    #[test]
    fn merge_sorted_joins_overlapping_and_touching() {
        let merged = merge_sorted(vec![
            Range::new(0.0, 2.0),
            Range::new(1.0, 3.0),
            Range::new(3.0, 4.0),
            Range::new(6.0, 7.0),
        ]);
        assert_eq!(merged, vec![Range::new(0.0, 4.0), Range::new(6.0, 7.0)]);
    }

    #[test]
    fn merge_sorted_keeps_contained_ranges_absorbed() {
        let merged = merge_sorted(vec![Range::new(0.0, 10.0), Range::new(2.0, 3.0)]);
        assert_eq!(merged, vec![Range::new(0.0, 10.0)]);
    }

    #[test]
    fn merge_sorted_keeps_first_identity() {
        let mut first = competency(0.0, 5.0);
        first.id = SegmentId::new("first").unwrap();
        let mut second = competency(4.0, 9.0);
        second.id = SegmentId::new("second").unwrap();

        let merged = merge_sorted(vec![first, second]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id.as_str(), "first");
        assert!((merged[0].end - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn range_contains_is_half_open() {
        let range = Range::new(10.0, 20.0);
        assert!(range.contains(10.0));
        assert!(range.contains(19.99));
        assert!(!range.contains(20.0));
    }
}
