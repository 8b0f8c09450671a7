//! Authoritative segment set for one media timeline.
//!
//! # Insertion policy
//!
//! 1. Drafts with `end - start <= 0` (or non-finite bounds, or a negative
//!    start) are dropped.
//! 2. Segments of the *other* kind that overlap the draft are clipped
//!    against it. Segments of the same kind are left alone.
//! 3. A trash draft is coalesced with every trash segment it overlaps or
//!    touches. Each merged group keeps the id of its earliest-starting
//!    member; on equal starts an existing segment wins over the draft.
//! 4. The set is kept sorted by `start`.

use tracing::debug;

use crate::interval::{MIN_FRAGMENT_SECS, Range, clip, merge_sorted, overlaps};
use crate::segment::{Segment, SegmentDraft, SegmentKind, SegmentPatch};
use crate::trash::coalesce_trash;
use crate::types::SegmentId;

/// Owns the segments of a session and applies the insertion policy.
#[derive(Debug, Clone)]
pub struct SegmentStore {
    segments: Vec<Segment>,
    min_fragment_secs: f64,
}

impl Default for SegmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentStore {
    pub const fn new() -> Self {
        Self::with_min_fragment(MIN_FRAGMENT_SECS)
    }

    /// Creates an empty store that discards clip fragments no longer than
    /// `min_fragment_secs`.
    pub const fn with_min_fragment(min_fragment_secs: f64) -> Self {
        Self {
            segments: Vec::new(),
            min_fragment_secs,
        }
    }

    /// All segments, sorted by start.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn get(&self, id: &SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| &s.id == id)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn competencies(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| !s.is_trash())
    }

    /// Coalesced trash ranges, recomputed on every call.
    pub fn trash_ranges(&self) -> Vec<Range> {
        coalesce_trash(&self.segments)
    }

    /// Inserts a draft and resolves overlaps.
    ///
    /// Returns the id the draft ended up under: its own fresh id, or the id of
    /// the trash group it was merged into. Returns `None` if the draft was
    /// dropped as degenerate.
    pub fn insert(&mut self, draft: SegmentDraft) -> Option<SegmentId> {
        if !is_valid_draft(&draft) {
            debug!(
                start = draft.start,
                end = draft.end,
                kind = %draft.kind,
                "dropping degenerate segment"
            );
            return None;
        }

        let hole = draft.range();
        let mut clipped = 0_usize;
        let mut kept = Vec::with_capacity(self.segments.len() + 2);
        for segment in std::mem::take(&mut self.segments) {
            if segment.kind == draft.kind || !overlaps(segment.range(), hole) {
                kept.push(segment);
            } else {
                clipped += 1;
                kept.extend(clip(&segment, hole, self.min_fragment_secs));
            }
        }

        let draft_id = SegmentId::generate();
        let inserted = match draft.kind {
            SegmentKind::Competency => {
                kept.push(draft.into_segment(draft_id.clone()));
                draft_id
            }
            SegmentKind::Trash => {
                let draft_start = draft.start;
                let (mut trash, mut others): (Vec<_>, Vec<_>) =
                    kept.into_iter().partition(Segment::is_trash);
                let before = trash.len() + 1;
                trash.push(draft.into_segment(draft_id.clone()));
                sort_by_start(&mut trash);

                let merged = merge_sorted(trash);
                debug!(absorbed = before - merged.len(), "coalesced trash");
                let owner = merged
                    .iter()
                    .find(|s| s.range().contains(draft_start))
                    .map_or(draft_id, |s| s.id.clone());

                others.extend(merged);
                kept = others;
                owner
            }
        };

        sort_by_start(&mut kept);
        self.segments = kept;
        debug!(id = %inserted, clipped, total = self.segments.len(), "inserted segment");
        Some(inserted)
    }

    /// Removes a segment by id. Returns `false` if no segment had that id.
    ///
    /// Remaining trash is not re-merged or re-split.
    pub fn remove(&mut self, id: &SegmentId) -> bool {
        let before = self.segments.len();
        self.segments.retain(|s| &s.id != id);
        let removed = self.segments.len() != before;
        if !removed {
            debug!(%id, "remove: no such segment");
        }
        removed
    }

    /// Applies a partial patch. Returns `false` if no segment had that id.
    ///
    /// Overlap resolution does not run; keeping trash coalesced after moving
    /// its bounds is the caller's job.
    pub fn update(&mut self, id: &SegmentId, patch: SegmentPatch) -> bool {
        let Some(segment) = self.segments.iter_mut().find(|s| &s.id == id) else {
            debug!(%id, "update: no such segment");
            return false;
        };
        patch.apply(segment);
        sort_by_start(&mut self.segments);
        true
    }
}

fn is_valid_draft(draft: &SegmentDraft) -> bool {
    is_valid_bounds(draft.start, draft.end)
}

/// True if `[start, end)` is finite, non-negative and non-empty.
pub(crate) fn is_valid_bounds(start: f64, end: f64) -> bool {
    start.is_finite() && end.is_finite() && start >= 0.0 && end - start > 0.0
}

fn sort_by_start(segments: &mut [Segment]) {
    segments.sort_by(|a, b| a.start.total_cmp(&b.start));
}
