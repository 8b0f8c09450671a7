//! Editor tunables.

use serde::{Deserialize, Serialize};

use crate::interval::MIN_FRAGMENT_SECS;

/// Configuration for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Fragments produced by clipping or projection must be longer than this.
    /// Default: 0.05 seconds.
    pub min_fragment_secs: f64,

    /// A mark-in/mark-out pair must span more than this to become a segment.
    /// Default: 0.5 seconds.
    pub min_tag_secs: f64,

    /// Dead zone around the cursor for boundary seeks in real time.
    /// Default: 0.15 seconds.
    pub real_seek_epsilon: f64,

    /// Dead zone around the cursor for boundary seeks in virtual time.
    /// Default: 0.05 seconds.
    pub virtual_seek_epsilon: f64,

    /// How far past a trash range smart skip lands.
    /// Default: 0.01 seconds.
    pub skip_epsilon: f64,

    /// Initial state of the skip-trash toggle.
    pub skip_trash: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_fragment_secs: MIN_FRAGMENT_SECS,
            min_tag_secs: 0.5,
            real_seek_epsilon: 0.15,
            virtual_seek_epsilon: 0.05,
            skip_epsilon: 0.01,
            skip_trash: true,
        }
    }
}
