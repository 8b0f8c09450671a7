//! Mark-in / mark-out recording of new segments.

use serde::{Deserialize, Serialize};

use crate::registry::TRASH_LABEL;
use crate::segment::SegmentKind;

/// Label preselected for competency tagging.
pub const DEFAULT_TAG_LABEL: &str = "Comunicación";

/// A finished mark pair, ready to become a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRequest {
    pub label: String,
    pub start: f64,
    pub end: f64,
    pub kind: SegmentKind,
}

/// Result of pressing the tag toggle.
#[derive(Debug, Clone, PartialEq)]
pub enum TagOutcome {
    /// A mark-in was recorded at this time.
    Started { at: f64 },
    /// The mark pair spans enough time to become a segment.
    Completed(TagRequest),
    /// The mark pair was too short and was discarded.
    Discarded { start: f64, end: f64 },
}

/// Two-press tagging state: the first press marks in, the second marks out.
#[derive(Debug, Clone)]
pub struct TagRecorder {
    kind: SegmentKind,
    competency_label: String,
    mark: Option<f64>,
    min_len: f64,
}

impl TagRecorder {
    /// Creates a recorder that discards mark pairs no longer than `min_len`.
    pub fn new(min_len: f64) -> Self {
        Self {
            kind: SegmentKind::Competency,
            competency_label: DEFAULT_TAG_LABEL.to_string(),
            mark: None,
            min_len,
        }
    }

    pub const fn kind(&self) -> SegmentKind {
        self.kind
    }

    /// The label the next segment will carry. Trash always uses the reserved
    /// trash label.
    pub fn label(&self) -> &str {
        match self.kind {
            SegmentKind::Competency => &self.competency_label,
            SegmentKind::Trash => TRASH_LABEL,
        }
    }

    /// Switches the kind; the chosen competency label survives a round trip
    /// through trash.
    pub const fn set_kind(&mut self, kind: SegmentKind) {
        self.kind = kind;
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.competency_label = label.into();
    }

    /// Time of the pending mark-in, if any.
    pub const fn pending(&self) -> Option<f64> {
        self.mark
    }

    /// Abandons a pending mark-in.
    pub const fn cancel(&mut self) {
        self.mark = None;
    }

    /// Presses the toggle at time `now`.
    pub fn toggle(&mut self, now: f64) -> TagOutcome {
        let Some(mark) = self.mark.take() else {
            self.mark = Some(now);
            return TagOutcome::Started { at: now };
        };

        let start = mark.min(now);
        let end = mark.max(now);
        if end - start > self.min_len {
            TagOutcome::Completed(TagRequest {
                label: self.label().to_string(),
                start,
                end,
                kind: self.kind,
            })
        } else {
            TagOutcome::Discarded { start, end }
        }
    }
}
