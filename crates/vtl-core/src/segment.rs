//! Labeled time intervals over the real timeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::interval::Range;
use crate::types::{SegmentId, ValidationError};

/// What a segment marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Kept footage, categorized under a competency.
    Competency,
    /// Discardable filler, removed from the virtual timeline.
    Trash,
}

impl SegmentKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Competency => "competency",
            Self::Trash => "trash",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "competency" => Ok(Self::Competency),
            "trash" => Ok(Self::Trash),
            _ => Err(ValidationError::InvalidSegmentKind {
                value: s.to_string(),
            }),
        }
    }
}

/// A labeled half-open interval `[start, end)` in real seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub label: String,
    pub start: f64,
    pub end: f64,
    pub kind: SegmentKind,
    /// Color captured from the registry when the segment was created.
    pub color: String,
}

impl Segment {
    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub const fn is_trash(&self) -> bool {
        matches!(self.kind, SegmentKind::Trash)
    }

    pub const fn range(&self) -> Range {
        Range::new(self.start, self.end)
    }
}

/// A segment that has not been inserted yet and so has no identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentDraft {
    pub label: String,
    pub start: f64,
    pub end: f64,
    pub kind: SegmentKind,
    pub color: String,
}

impl SegmentDraft {
    pub const fn range(&self) -> Range {
        Range::new(self.start, self.end)
    }

    pub(crate) fn into_segment(self, id: SegmentId) -> Segment {
        Segment {
            id,
            label: self.label,
            start: self.start,
            end: self.end,
            kind: self.kind,
            color: self.color,
        }
    }
}

/// Partial update applied by [`crate::SegmentStore::update`].
///
/// Fields left as `None` are kept. No overlap resolution runs on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl SegmentPatch {
    pub(crate) fn apply(self, segment: &mut Segment) {
        if let Some(label) = self.label {
            segment.label = label;
        }
        if let Some(start) = self.start {
            segment.start = start;
        }
        if let Some(end) = self.end {
            segment.end = end;
        }
        if let Some(color) = self.color {
            segment.color = color;
        }
    }
}
