//! Derives the coalesced trash ranges ("holes") of a segment set.

use crate::interval::{Range, merge_sorted};
use crate::segment::Segment;

/// Returns the trash ranges of `segments`, sorted, non-overlapping and
/// non-touching.
///
/// The store already keeps trash coalesced; merging again here means the
/// result holds even for segment sets built through `update`.
pub fn coalesce_trash(segments: &[Segment]) -> Vec<Range> {
    let mut ranges: Vec<Range> = segments
        .iter()
        .filter(|s| s.is_trash())
        .map(Segment::range)
        .collect();
    ranges.sort_by(|a, b| a.start.total_cmp(&b.start));
    merge_sorted(ranges)
}

/// Total trashed seconds.
pub fn total_trash(holes: &[Range]) -> f64 {
    holes.iter().map(Range::duration).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::SegmentKind;
    use crate::types::SegmentId;

    fn segment(kind: SegmentKind, start: f64, end: f64) -> Segment {
        Segment {
            id: SegmentId::generate(),
            label: String::new(),
            start,
            end,
            kind,
            color: String::new(),
        }
    }

    #[test]
    fn ignores_competencies() {
        let holes = coalesce_trash(&[
            segment(SegmentKind::Competency, 0.0, 50.0),
            segment(SegmentKind::Trash, 10.0, 20.0),
        ]);
        assert_eq!(holes, vec![Range::new(10.0, 20.0)]);
    }

    #[test]
    fn merges_unsorted_overlapping_trash() {
        let holes = coalesce_trash(&[
            segment(SegmentKind::Trash, 30.0, 40.0),
            segment(SegmentKind::Trash, 10.0, 20.0),
            segment(SegmentKind::Trash, 18.0, 31.0),
        ]);
        assert_eq!(holes, vec![Range::new(10.0, 40.0)]);
        assert!((total_trash(&holes) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn empty_set_has_no_holes() {
        assert!(coalesce_trash(&[]).is_empty());
        assert!(total_trash(&[]).abs() < f64::EPSILON);
    }
}
