//! Real ↔ virtual time mapping.
//!
//! The virtual timeline is the real one with every coalesced trash range
//! ("hole") cut out. A real position inside a hole maps to the hole's virtual
//! boundary, and that boundary maps back to the hole's real end, so a seek to
//! any virtual position never lands inside discarded footage.

use serde::{Deserialize, Serialize};

use crate::interval::{MIN_FRAGMENT_SECS, Range, merge_sorted};
use crate::segment::Segment;
use crate::trash::{coalesce_trash, total_trash};
use crate::types::SegmentId;

/// A competency segment projected into virtual time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualSegment {
    pub id: SegmentId,
    pub label: String,
    pub color: String,
    /// Projected start in virtual seconds.
    pub start: f64,
    /// Projected end in virtual seconds.
    pub end: f64,
    /// Original start in real seconds, for seeking back.
    pub real_start: f64,
    /// Original end in real seconds.
    pub real_end: f64,
}

/// Coordinate transform built from coalesced holes and a media duration.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualTimeline {
    holes: Vec<Range>,
    duration: f64,
}

impl VirtualTimeline {
    /// Builds a timeline from holes that are already sorted and coalesced.
    pub const fn new(holes: Vec<Range>, duration: f64) -> Self {
        Self { holes, duration }
    }

    pub fn from_segments(segments: &[Segment], duration: f64) -> Self {
        Self::new(coalesce_trash(segments), duration)
    }

    /// Builds a timeline from arbitrary ranges, clamped to `[0, duration]`,
    /// sorted and coalesced.
    pub fn from_ranges(ranges: impl IntoIterator<Item = Range>, duration: f64) -> Self {
        let mut holes: Vec<Range> = ranges
            .into_iter()
            .map(|r| Range::new(r.start.max(0.0), r.end.min(duration)))
            .filter(|r| r.end > r.start)
            .collect();
        holes.sort_by(|a, b| a.start.total_cmp(&b.start));
        Self::new(merge_sorted(holes), duration)
    }

    pub fn holes(&self) -> &[Range] {
        &self.holes
    }

    /// Real duration in seconds.
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// Returns the hole containing the real time `t`, if any.
    pub fn hole_at(&self, t: f64) -> Option<Range> {
        self.holes.iter().copied().find(|h| h.contains(t))
    }

    /// Maps a real time to virtual time.
    ///
    /// Holes entirely before `t` are subtracted in full; a hole containing
    /// `t` is subtracted up to `t`. Never negative; 0 when no duration is
    /// known yet.
    pub fn to_virtual(&self, t: f64) -> f64 {
        if self.duration <= 0.0 || !t.is_finite() {
            return 0.0;
        }
        let mut v = t;
        for hole in &self.holes {
            if t > hole.end {
                v -= hole.duration();
            } else if t > hole.start {
                v -= t - hole.start;
            }
        }
        v.max(0.0)
    }

    /// Maps a virtual time back to real time, capped at the duration.
    pub fn to_real(&self, v: f64) -> f64 {
        if self.duration <= 0.0 || !v.is_finite() {
            return 0.0;
        }
        let mut r = v.max(0.0);
        for hole in &self.holes {
            if r >= hole.start {
                r += hole.duration();
            }
        }
        r.min(self.duration)
    }

    /// Length of the virtual timeline.
    pub fn virtual_duration(&self) -> f64 {
        self.to_virtual(self.duration)
    }

    /// Seconds removed by holes.
    pub fn trashed(&self) -> f64 {
        total_trash(&self.holes)
    }

    /// Projects competency segments into virtual time.
    ///
    /// Projections no longer than [`MIN_FRAGMENT_SECS`] (a segment swallowed
    /// by a hole) are dropped.
    pub fn project<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a Segment>,
    ) -> Vec<VirtualSegment> {
        self.project_with_min(segments, MIN_FRAGMENT_SECS)
    }

    pub fn project_with_min<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a Segment>,
        min_len: f64,
    ) -> Vec<VirtualSegment> {
        segments
            .into_iter()
            .filter(|s| !s.is_trash())
            .map(|s| VirtualSegment {
                id: s.id.clone(),
                label: s.label.clone(),
                color: s.color.clone(),
                start: self.to_virtual(s.start),
                end: self.to_virtual(s.end),
                real_start: s.start,
                real_end: s.end,
            })
            .filter(|v| v.end - v.start > min_len)
            .collect()
    }
}
