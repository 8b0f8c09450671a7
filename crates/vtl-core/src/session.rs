//! The editing session for one loaded media file.
//!
//! A session owns every piece of mutable state: the segment store, the
//! competency registry, the tracked position, the duration and the playback
//! flags. Everything else (holes, virtual mapping, boundaries, metrics) is
//! recomputed from that state on each query. Loading a different file means
//! building a new session; [`EditorSession::into_player`] hands the player
//! back for reuse.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::EditorConfig;
use crate::governor::{self, SkipDecision};
use crate::interval::Range;
use crate::lanes::pack_lanes;
use crate::mapping::{VirtualSegment, VirtualTimeline};
use crate::metrics::Metrics;
use crate::navigation::Boundaries;
use crate::player::{MediaPlayer, PlayerEvent};
use crate::registry::{CompetencyRegistry, TRASH_LABEL};
use crate::segment::{Segment, SegmentDraft, SegmentKind, SegmentPatch};
use crate::store::{SegmentStore, is_valid_bounds};
use crate::tagging::{TagOutcome, TagRecorder};
use crate::types::{SegmentId, TimeSpace, ValidationError};

/// Keys bound to boundary navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Left,
    Right,
}

/// Serializable snapshot of everything a presentation layer shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub segments: Vec<Segment>,
    pub virtual_segments: Vec<VirtualSegment>,
    pub trash: Vec<Range>,
    pub current_time: f64,
    pub virtual_time: f64,
    pub duration: f64,
    pub virtual_duration: f64,
    pub metrics: Metrics,
    pub competencies: BTreeMap<String, String>,
    pub playing: bool,
    pub skip_trash: bool,
}

/// Editing state for one media file, driving a [`MediaPlayer`].
#[derive(Debug)]
pub struct EditorSession<P> {
    player: P,
    store: SegmentStore,
    registry: CompetencyRegistry,
    recorder: TagRecorder,
    config: EditorConfig,
    current_time: f64,
    duration: f64,
    playing: bool,
    skip_trash: bool,
}

impl<P: MediaPlayer> EditorSession<P> {
    pub fn new(player: P, config: EditorConfig) -> Self {
        Self::with_registry(player, config, CompetencyRegistry::new())
    }

    pub fn with_registry(player: P, config: EditorConfig, registry: CompetencyRegistry) -> Self {
        Self {
            player,
            store: SegmentStore::with_min_fragment(config.min_fragment_secs),
            registry,
            recorder: TagRecorder::new(config.min_tag_secs),
            current_time: 0.0,
            duration: 0.0,
            playing: false,
            skip_trash: config.skip_trash,
            config,
        }
    }

    pub const fn player(&self) -> &P {
        &self.player
    }

    pub const fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    /// Ends the session and returns its player.
    pub fn into_player(self) -> P {
        self.player
    }

    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ========== Player Events ==========

    pub fn handle_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::PositionChanged { seconds } => self.on_position_changed(seconds),
            PlayerEvent::DurationKnown { seconds } => self.on_duration_known(seconds),
            PlayerEvent::PlaybackStateChanged { playing } => {
                self.on_playback_state_changed(playing);
            }
        }
    }

    /// Records the player's position and applies smart skip.
    pub fn on_position_changed(&mut self, seconds: f64) {
        trace!(seconds, "position changed");
        self.current_time = sanitize(seconds);
        if !(self.playing && self.skip_trash) {
            return;
        }

        let holes = self.store.trash_ranges();
        if let SkipDecision::Jump { hole, to } = governor::evaluate(
            self.current_time,
            &holes,
            self.config.skip_epsilon,
            self.duration,
        ) {
            debug!(
                from = self.current_time,
                to,
                hole_start = hole.start,
                hole_end = hole.end,
                "skipping trash"
            );
            self.player.seek(to);
            self.current_time = to;
        }
    }

    pub fn on_duration_known(&mut self, seconds: f64) {
        debug!(seconds, "duration known");
        self.duration = sanitize(seconds);
    }

    pub fn on_playback_state_changed(&mut self, playing: bool) {
        debug!(playing, "playback state changed");
        self.playing = playing;
    }

    // ========== Queries ==========

    /// Segments in real time, sorted by start.
    pub fn segments(&self) -> &[Segment] {
        self.store.segments()
    }

    pub fn segment(&self, id: &SegmentId) -> Option<&Segment> {
        self.store.get(id)
    }

    /// Coalesced trash ranges in real time.
    pub fn trash_ranges(&self) -> Vec<Range> {
        self.store.trash_ranges()
    }

    /// Mapping built from the trash holes clipped to the current duration.
    pub fn timeline(&self) -> VirtualTimeline {
        VirtualTimeline::from_ranges(self.store.trash_ranges(), self.duration)
    }

    pub fn virtual_segments(&self) -> Vec<VirtualSegment> {
        self.timeline()
            .project_with_min(self.store.segments(), self.config.min_fragment_secs)
    }

    pub const fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn virtual_time(&self) -> f64 {
        self.timeline().to_virtual(self.current_time)
    }

    pub const fn duration(&self) -> f64 {
        self.duration
    }

    pub fn virtual_duration(&self) -> f64 {
        self.timeline().virtual_duration()
    }

    pub fn metrics(&self) -> Metrics {
        Metrics::compute(self.timeline().holes(), self.duration)
    }

    pub const fn competencies(&self) -> &BTreeMap<String, String> {
        self.registry.entries()
    }

    pub const fn registry(&self) -> &CompetencyRegistry {
        &self.registry
    }

    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    pub const fn skip_trash(&self) -> bool {
        self.skip_trash
    }

    /// Space used for boundary navigation: virtual while skipping trash.
    pub const fn active_space(&self) -> TimeSpace {
        if self.skip_trash {
            TimeSpace::Virtual
        } else {
            TimeSpace::Real
        }
    }

    /// Navigation boundaries in the active space.
    pub fn boundaries(&self) -> Boundaries {
        match self.active_space() {
            TimeSpace::Real => Boundaries::new(
                self.duration,
                self.store.competencies().flat_map(|s| [s.start, s.end]),
            ),
            TimeSpace::Virtual => Boundaries::new(
                self.virtual_duration(),
                self.virtual_segments()
                    .into_iter()
                    .flat_map(|s| [s.start, s.end]),
            ),
        }
    }

    /// Competency segments grouped into display lanes.
    pub fn lanes(&self) -> Vec<Vec<&Segment>> {
        pack_lanes(self.store.segments())
    }

    pub fn view(&self) -> SessionView {
        let timeline = self.timeline();
        SessionView {
            segments: self.store.segments().to_vec(),
            virtual_segments: timeline
                .project_with_min(self.store.segments(), self.config.min_fragment_secs),
            trash: timeline.holes().to_vec(),
            current_time: self.current_time,
            virtual_time: timeline.to_virtual(self.current_time),
            duration: self.duration,
            virtual_duration: timeline.virtual_duration(),
            metrics: Metrics::compute(timeline.holes(), self.duration),
            competencies: self.registry.entries().clone(),
            playing: self.playing,
            skip_trash: self.skip_trash,
        }
    }

    // ========== Commands ==========

    /// Adds a segment, resolving overlaps with the insertion policy.
    ///
    /// Trash always carries the reserved trash label. The color is looked up
    /// (and, for a new competency, registered) now and stored with the
    /// segment. Negative starts are clamped to 0, and once the duration is
    /// known the end is clamped to it. Returns `Ok(None)`, registering
    /// nothing, if the interval was dropped as degenerate.
    pub fn add_segment(
        &mut self,
        label: &str,
        start: f64,
        end: f64,
        kind: SegmentKind,
    ) -> Result<Option<SegmentId>, ValidationError> {
        let label = match kind {
            SegmentKind::Competency => label,
            SegmentKind::Trash => TRASH_LABEL,
        };
        let start = start.max(0.0);
        let end = if self.duration > 0.0 {
            end.min(self.duration)
        } else {
            end
        };
        if !is_valid_bounds(start, end) {
            debug!(start, end, %kind, "dropping degenerate segment");
            return Ok(None);
        }
        let color = self.registry.lookup(label)?.to_string();

        Ok(self.store.insert(SegmentDraft {
            label: label.to_string(),
            start,
            end,
            kind,
            color,
        }))
    }

    /// Returns `false` if no segment had that id.
    pub fn remove_segment(&mut self, id: &SegmentId) -> bool {
        self.store.remove(id)
    }

    /// Returns `false` if no segment had that id.
    pub fn update_segment(&mut self, id: &SegmentId, patch: SegmentPatch) -> bool {
        self.store.update(id, patch)
    }

    /// Seeks to `t` expressed in `space`.
    ///
    /// Virtual targets are mapped to real time first, so they never land
    /// inside trash. The tracked position is updated without waiting for
    /// the player to confirm.
    pub fn seek_to(&mut self, t: f64, space: TimeSpace) {
        let real = match space {
            TimeSpace::Real => sanitize(t),
            TimeSpace::Virtual => self.timeline().to_real(t),
        };
        let real = if self.duration > 0.0 {
            real.min(self.duration)
        } else {
            real
        };
        debug!(requested = t, %space, real, "seek");
        self.player.seek(real);
        self.current_time = real;
    }

    pub fn seek_to_previous_boundary(&mut self) {
        let (space, cursor, epsilon) = self.navigation_frame();
        let target = self.boundaries().previous(cursor, epsilon);
        self.seek_to(target, space);
    }

    pub fn seek_to_next_boundary(&mut self) {
        let (space, cursor, epsilon) = self.navigation_frame();
        let target = self.boundaries().next(cursor, epsilon);
        self.seek_to(target, space);
    }

    pub fn handle_key(&mut self, key: NavKey) {
        match key {
            NavKey::Left => self.seek_to_previous_boundary(),
            NavKey::Right => self.seek_to_next_boundary(),
        }
    }

    /// Asks the player to play or pause.
    ///
    /// The playing flag only changes when the player reports it through
    /// [`PlayerEvent::PlaybackStateChanged`].
    pub fn toggle_playback(&mut self) {
        if self.playing {
            self.player.pause();
        } else {
            self.player.play();
        }
    }

    /// Registers a competency, returning its color.
    pub fn add_competency(&mut self, name: &str) -> Result<String, ValidationError> {
        self.registry.lookup(name).map(str::to_string)
    }

    pub fn set_skip_trash(&mut self, enabled: bool) {
        debug!(enabled, "skip trash");
        self.skip_trash = enabled;
    }

    // ========== Tagging ==========

    pub fn set_tag_kind(&mut self, kind: SegmentKind) {
        self.recorder.set_kind(kind);
    }

    pub fn set_tag_label(&mut self, label: impl Into<String>) {
        self.recorder.set_label(label);
    }

    pub const fn pending_mark(&self) -> Option<f64> {
        self.recorder.pending()
    }

    /// Presses the tag toggle at the current position.
    ///
    /// The second press of a long enough pair inserts a segment and returns
    /// its id.
    pub fn toggle_tagging(&mut self) -> Result<Option<SegmentId>, ValidationError> {
        match self.recorder.toggle(self.current_time) {
            TagOutcome::Started { at } => {
                debug!(at, "mark in");
                Ok(None)
            }
            TagOutcome::Discarded { start, end } => {
                debug!(start, end, "tag too short, discarded");
                Ok(None)
            }
            TagOutcome::Completed(request) => {
                self.add_segment(&request.label, request.start, request.end, request.kind)
            }
        }
    }

    fn navigation_frame(&self) -> (TimeSpace, f64, f64) {
        match self.active_space() {
            TimeSpace::Real => (
                TimeSpace::Real,
                self.current_time,
                self.config.real_seek_epsilon,
            ),
            TimeSpace::Virtual => (
                TimeSpace::Virtual,
                self.virtual_time(),
                self.config.virtual_seek_epsilon,
            ),
        }
    }
}

fn sanitize(seconds: f64) -> f64 {
    if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerCommand, RecordingPlayer};

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    fn session(duration: f64, skip_trash: bool) -> EditorSession<RecordingPlayer> {
        let config = EditorConfig {
            skip_trash,
            ..EditorConfig::default()
        };
        let mut session = EditorSession::with_registry(
            RecordingPlayer::new(),
            config,
            CompetencyRegistry::with_seed(0),
        );
        session.on_duration_known(duration);
        session
    }

    fn bounds(segments: &[Segment], kind: SegmentKind) -> Vec<(f64, f64)> {
        segments
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| (s.start, s.end))
            .collect()
    }

    #[test]
    fn merged_trash_scenario() {
        let mut session = session(100.0, true);
        session.add_segment("", 10.0, 20.0, SegmentKind::Trash).unwrap();
        session.add_segment("", 15.0, 25.0, SegmentKind::Trash).unwrap();

        assert_eq!(bounds(session.segments(), SegmentKind::Trash), vec![(10.0, 25.0)]);
        assert_close(session.virtual_duration(), 85.0);
        assert_close(session.timeline().to_virtual(30.0), 15.0);
    }

    #[test]
    fn trash_splits_competency_scenario() {
        let mut session = session(100.0, true);
        session
            .add_segment("Comunicación", 0.0, 50.0, SegmentKind::Competency)
            .unwrap();
        session.add_segment("", 20.0, 30.0, SegmentKind::Trash).unwrap();

        assert_eq!(
            bounds(session.segments(), SegmentKind::Competency),
            vec![(0.0, 20.0), (30.0, 50.0)]
        );
        assert!(
            session
                .segments()
                .iter()
                .filter(|s| s.kind == SegmentKind::Competency)
                .all(|s| s.label == "Comunicación" && s.color == "#a855f7")
        );
    }

    #[test]
    fn trash_label_and_color_are_forced() {
        let mut session = session(60.0, true);
        let id = session
            .add_segment("Liderazgo", 1.0, 5.0, SegmentKind::Trash)
            .unwrap()
            .unwrap();
        let segment = session.segment(&id).unwrap();
        assert_eq!(segment.label, TRASH_LABEL);
        assert_eq!(segment.color, crate::registry::TRASH_COLOR);
    }

    #[test]
    fn blank_competency_label_is_rejected() {
        let mut session = session(60.0, true);
        assert!(session.add_segment(" ", 1.0, 5.0, SegmentKind::Competency).is_err());
        assert!(session.segments().is_empty());
    }

    #[test]
    fn segments_are_clamped_to_duration() {
        let mut session = session(30.0, true);
        session.add_segment("", 25.0, 45.0, SegmentKind::Trash).unwrap();
        assert_eq!(bounds(session.segments(), SegmentKind::Trash), vec![(25.0, 30.0)]);

        let metrics = session.metrics();
        assert_close(metrics.total, metrics.trash + metrics.useful);
    }

    #[test]
    fn trash_added_before_duration_is_clipped_in_derived_state() {
        let mut session = session(0.0, true);
        session.add_segment("", 40.0, 150.0, SegmentKind::Trash).unwrap();
        session.on_duration_known(100.0);

        let metrics = session.metrics();
        assert_close(metrics.trash, 60.0);
        assert_close(metrics.total, metrics.trash + metrics.useful);
        assert_close(session.virtual_duration(), 100.0 - metrics.trash);

        let view = session.view();
        assert_eq!(view.trash, vec![Range::new(40.0, 100.0)]);
        assert_eq!(view.metrics, metrics);
    }

    #[test]
    fn shorter_duration_reclips_derived_state() {
        let mut session = session(200.0, true);
        session.add_segment("", 10.0, 20.0, SegmentKind::Trash).unwrap();
        session.add_segment("", 150.0, 190.0, SegmentKind::Trash).unwrap();
        session.on_duration_known(120.0);

        let metrics = session.metrics();
        assert_close(metrics.trash, 10.0);
        assert_close(metrics.useful, 110.0);
        assert_close(session.virtual_duration(), 110.0);
    }

    #[test]
    fn negative_start_is_clamped_with_or_without_duration() {
        let mut before = session(0.0, true);
        before.add_segment("", -5.0, 10.0, SegmentKind::Trash).unwrap();
        let mut after = session(100.0, true);
        after.add_segment("", -5.0, 10.0, SegmentKind::Trash).unwrap();

        assert_eq!(bounds(before.segments(), SegmentKind::Trash), vec![(0.0, 10.0)]);
        assert_eq!(bounds(after.segments(), SegmentKind::Trash), vec![(0.0, 10.0)]);
    }

    #[test]
    fn degenerate_add_registers_nothing() {
        let mut session = session(100.0, true);
        let id = session
            .add_segment("Typo", 30.0, 10.0, SegmentKind::Competency)
            .unwrap();
        assert_eq!(id, None);
        assert!(session.segments().is_empty());
        assert_eq!(session.registry().get("Typo"), None);

        session.add_segment("Typo", 150.0, 160.0, SegmentKind::Competency).unwrap();
        assert_eq!(session.registry().get("Typo"), None, "clamped away");
    }

    #[test]
    fn colors_are_frozen_at_creation() {
        let mut session = session(60.0, true);
        let id = session
            .add_segment("Creatividad", 0.0, 10.0, SegmentKind::Competency)
            .unwrap()
            .unwrap();
        let color = session.segment(&id).unwrap().color.clone();
        assert_eq!(session.competencies().get("Creatividad"), Some(&color));

        session.update_segment(
            &id,
            SegmentPatch {
                color: Some("#000000".to_string()),
                ..SegmentPatch::default()
            },
        );
        assert_eq!(session.competencies().get("Creatividad"), Some(&color));
    }

    #[test]
    fn next_boundary_walk_in_real_space() {
        let mut session = session(40.0, false);
        session.add_segment("Liderazgo", 5.0, 10.0, SegmentKind::Competency).unwrap();
        session.add_segment("Liderazgo", 20.0, 30.0, SegmentKind::Competency).unwrap();

        let mut visited = Vec::new();
        for _ in 0..5 {
            session.seek_to_next_boundary();
            visited.push(session.current_time());
        }
        assert_eq!(visited, vec![5.0, 10.0, 20.0, 30.0, 40.0]);

        session.seek_to_next_boundary();
        assert_close(session.current_time(), 40.0);

        let mut back = Vec::new();
        for _ in 0..5 {
            session.handle_key(NavKey::Left);
            back.push(session.current_time());
        }
        assert_eq!(back, vec![30.0, 20.0, 10.0, 5.0, 0.0]);
    }

    #[test]
    fn next_boundary_walk_in_virtual_space_skips_trash() {
        let mut session = session(40.0, true);
        session.add_segment("Liderazgo", 5.0, 10.0, SegmentKind::Competency).unwrap();
        session.add_segment("", 12.0, 18.0, SegmentKind::Trash).unwrap();
        session.add_segment("Liderazgo", 20.0, 30.0, SegmentKind::Competency).unwrap();

        let mut visited = Vec::new();
        for _ in 0..5 {
            session.handle_key(NavKey::Right);
            visited.push(session.current_time());
        }
        // Real positions of the virtual boundaries 5, 10, 14, 24, 34.
        assert_eq!(visited, vec![5.0, 10.0, 20.0, 30.0, 40.0]);
        assert!(session.trash_ranges().iter().all(|h| !h.contains(session.current_time())));
    }

    #[test]
    fn seek_to_virtual_never_lands_in_trash() {
        let mut session = session(100.0, true);
        session.add_segment("", 10.0, 25.0, SegmentKind::Trash).unwrap();

        session.seek_to(10.0, TimeSpace::Virtual);
        assert_close(session.current_time(), 25.0);
        assert_close(session.virtual_time(), 10.0);
        assert_eq!(session.player().last_seek(), Some(25.0));
    }

    #[test]
    fn smart_skip_jumps_once() {
        let mut session = session(100.0, true);
        session.add_segment("", 10.0, 20.0, SegmentKind::Trash).unwrap();
        session.handle_event(PlayerEvent::PlaybackStateChanged { playing: true });

        session.handle_event(PlayerEvent::PositionChanged { seconds: 9.5 });
        assert!(session.player().commands().is_empty());

        session.handle_event(PlayerEvent::PositionChanged { seconds: 10.2 });
        let target = session.player().last_seek().unwrap();
        assert_close(target, 20.0 + session.config().skip_epsilon);
        assert_close(session.current_time(), target);

        session.player_mut().drain();
        session.handle_event(PlayerEvent::PositionChanged { seconds: target });
        assert!(session.player().commands().is_empty(), "no skip loop");
    }

    #[test]
    fn smart_skip_requires_playing_and_enabled() {
        let mut session = session(100.0, true);
        session.add_segment("", 10.0, 20.0, SegmentKind::Trash).unwrap();

        session.on_position_changed(15.0);
        assert!(session.player().commands().is_empty(), "paused");

        session.on_playback_state_changed(true);
        session.set_skip_trash(false);
        session.on_position_changed(15.0);
        assert!(session.player().commands().is_empty(), "skip disabled");
        assert_close(session.current_time(), 15.0);
    }

    #[test]
    fn toggle_playback_issues_commands_only() {
        let mut session = session(10.0, true);
        session.toggle_playback();
        assert!(!session.is_playing());
        session.on_playback_state_changed(true);
        session.toggle_playback();
        assert_eq!(
            session.player().commands(),
            &[PlayerCommand::Play, PlayerCommand::Pause]
        );
    }

    #[test]
    fn zero_duration_queries_are_zero() {
        let session = session(0.0, true);
        assert_close(session.virtual_time(), 0.0);
        assert_close(session.virtual_duration(), 0.0);
        assert_eq!(session.metrics(), Metrics::default());
    }

    #[test]
    fn tagging_inserts_segment_on_second_press() {
        let mut session = session(60.0, false);
        session.set_tag_label("Adaptabilidad");
        session.seek_to(4.0, TimeSpace::Real);
        assert_eq!(session.toggle_tagging().unwrap(), None);
        assert_eq!(session.pending_mark(), Some(4.0));

        session.seek_to(9.0, TimeSpace::Real);
        let id = session.toggle_tagging().unwrap().unwrap();
        let segment = session.segment(&id).unwrap();
        assert_eq!(segment.label, "Adaptabilidad");
        assert_eq!((segment.start, segment.end), (4.0, 9.0));

        session.set_tag_kind(SegmentKind::Trash);
        session.toggle_tagging().unwrap();
        session.seek_to(9.3, TimeSpace::Real);
        assert_eq!(session.toggle_tagging().unwrap(), None, "too short");
    }

    #[test]
    fn remove_and_update_unknown_ids_are_noops() {
        let mut session = session(60.0, true);
        let missing = SegmentId::new("missing").unwrap();
        assert!(!session.remove_segment(&missing));
        assert!(!session.update_segment(&missing, SegmentPatch::default()));
    }

    #[test]
    fn view_matches_queries() {
        let mut session = session(100.0, true);
        session.add_segment("Liderazgo", 0.0, 40.0, SegmentKind::Competency).unwrap();
        session.add_segment("", 10.0, 20.0, SegmentKind::Trash).unwrap();
        session.seek_to(30.0, TimeSpace::Real);

        let view = session.view();
        assert_eq!(view.segments, session.segments());
        assert_eq!(view.virtual_segments, session.virtual_segments());
        assert_close(view.virtual_time, 20.0);
        assert_close(view.virtual_duration, 90.0);
        assert_eq!(view.metrics, session.metrics());
        assert_eq!(session.lanes().len(), 1);
    }
}
