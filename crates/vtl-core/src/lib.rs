//! Core domain logic for the virtual timeline editor.
//!
//! A recording is annotated with competency segments and trash segments.
//! Trash is cut out of a virtual timeline that playback, navigation and
//! metrics can follow instead of the real one:
//! - Store: segment collection with clip-on-insert overlap resolution
//! - Mapping: real ↔ virtual time conversion around coalesced trash
//! - Navigation: boundary stepping in either time space
//! - Governor: smart-skip decisions during playback
//! - Session: the editing state that drives a [`MediaPlayer`]

pub mod config;
pub mod format;
pub mod governor;
pub mod interval;
pub mod lanes;
pub mod mapping;
pub mod metrics;
pub mod navigation;
pub mod player;
pub mod registry;
pub mod segment;
pub mod session;
pub mod store;
pub mod tagging;
pub mod trash;
pub mod types;

pub use config::EditorConfig;
pub use governor::SkipDecision;
pub use interval::{MIN_FRAGMENT_SECS, Range};
pub use mapping::{VirtualSegment, VirtualTimeline};
pub use metrics::Metrics;
pub use navigation::Boundaries;
pub use player::{MediaPlayer, PlayerCommand, PlayerEvent, RecordingPlayer};
pub use registry::{CompetencyRegistry, TRASH_COLOR, TRASH_LABEL};
pub use segment::{Segment, SegmentDraft, SegmentKind, SegmentPatch};
pub use session::{EditorSession, NavKey, SessionView};
pub use store::SegmentStore;
pub use tagging::{TagOutcome, TagRecorder, TagRequest};
pub use types::{SegmentId, TimeSpace, ValidationError};
