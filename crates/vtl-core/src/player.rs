//! The seam between a session and the media player that actually plays.

use serde::{Deserialize, Serialize};

/// Commands a session issues to the player.
///
/// Commands are fire-and-forget: the session does not wait for them to take
/// effect and reconciles on the next [`PlayerEvent`].
pub trait MediaPlayer {
    fn seek(&mut self, seconds: f64);
    fn play(&mut self);
    fn pause(&mut self);
}

impl<P: MediaPlayer + ?Sized> MediaPlayer for &mut P {
    fn seek(&mut self, seconds: f64) {
        (**self).seek(seconds);
    }

    fn play(&mut self) {
        (**self).play();
    }

    fn pause(&mut self) {
        (**self).pause();
    }
}

/// Notifications the player delivers to a session, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlayerEvent {
    PositionChanged { seconds: f64 },
    DurationKnown { seconds: f64 },
    PlaybackStateChanged { playing: bool },
}

/// A command as recorded by [`RecordingPlayer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PlayerCommand {
    Seek { seconds: f64 },
    Play,
    Pause,
}

/// A player that only records what it was asked to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingPlayer {
    commands: Vec<PlayerCommand>,
}

impl RecordingPlayer {
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[PlayerCommand] {
        &self.commands
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&mut self) -> Vec<PlayerCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Target of the most recent seek, if any.
    pub fn last_seek(&self) -> Option<f64> {
        self.commands.iter().rev().find_map(|c| match c {
            PlayerCommand::Seek { seconds } => Some(*seconds),
            PlayerCommand::Play | PlayerCommand::Pause => None,
        })
    }
}

impl MediaPlayer for RecordingPlayer {
    fn seek(&mut self, seconds: f64) {
        self.commands.push(PlayerCommand::Seek { seconds });
    }

    fn play(&mut self) {
        self.commands.push(PlayerCommand::Play);
    }

    fn pause(&mut self) {
        self.commands.push(PlayerCommand::Pause);
    }
}
