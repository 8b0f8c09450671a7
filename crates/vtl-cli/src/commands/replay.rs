//! Replay command for driving a session from a script.
//!
//! This module implements `vtl replay`, which feeds a JSONL script of player
//! events and editor commands to a session backed by a recording player, then
//! reports the resulting timeline and the commands the player received.
//!
//! Each non-blank line not starting with `#` is one step, tagged by `op`:
//!
//! ```text
//! {"op":"duration","seconds":100}
//! {"op":"add","label":"Liderazgo","start":0,"end":50,"as":"intro"}
//! {"op":"add","kind":"trash","start":10,"end":25}
//! {"op":"playing","playing":true}
//! {"op":"tick","seconds":12}
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use vtl_core::format::{format_time, format_time_precise};
use vtl_core::{
    EditorSession, PlayerCommand, PlayerEvent, RecordingPlayer, SegmentId, SegmentKind,
    SegmentPatch, SessionView, TimeSpace,
};

use crate::Config;

// ========== Script ==========

/// One step of a replay script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Player reports the media duration.
    Duration { seconds: f64 },
    /// Player reports a position tick.
    Tick { seconds: f64 },
    /// Player reports a playback state change.
    Playing { playing: bool },
    /// Add a segment. `as` names the resulting id for later steps.
    Add {
        #[serde(default)]
        label: String,
        start: f64,
        end: f64,
        #[serde(default = "default_kind")]
        kind: SegmentKind,
        #[serde(default, rename = "as")]
        alias: Option<String>,
    },
    /// Remove a segment added under an alias.
    Remove { id: String },
    /// Patch a segment added under an alias.
    Update {
        id: String,
        #[serde(flatten)]
        patch: SegmentPatch,
    },
    /// Seek to a time in either space (real by default).
    Seek {
        t: f64,
        #[serde(default)]
        space: TimeSpace,
    },
    /// Step to the next navigation boundary.
    Next,
    /// Step to the previous navigation boundary.
    Previous,
    /// Press play/pause.
    Toggle,
    /// Turn smart skip on or off.
    SkipTrash { enabled: bool },
    /// Register a competency.
    Competency { name: String },
    /// Press the tag toggle at the current position.
    Mark {
        #[serde(default, rename = "as")]
        alias: Option<String>,
    },
    /// Choose what the tag toggle records.
    TagKind { kind: SegmentKind },
    /// Choose the competency the tag toggle records.
    TagLabel { label: String },
}

const fn default_kind() -> SegmentKind {
    SegmentKind::Competency
}

/// Parses a script, skipping blank lines and `#` comments.
pub fn parse_script(script: &str) -> Result<Vec<ScriptStep>> {
    script
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("invalid step on line {}", index + 1))
        })
        .collect()
}

// ========== Replay ==========

/// Final state of a replayed session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    #[serde(flatten)]
    pub view: SessionView,
    /// Commands the player received, in order.
    pub commands: Vec<PlayerCommand>,
}

/// Drives a session through `steps`.
pub fn replay(steps: &[ScriptStep], config: &Config) -> Result<ReplayReport> {
    let registry = config
        .registry()
        .context("invalid [competencies] configuration")?;
    let mut session =
        EditorSession::with_registry(RecordingPlayer::new(), config.editor.clone(), registry);
    let mut aliases: HashMap<String, SegmentId> = HashMap::new();

    for (index, step) in steps.iter().enumerate() {
        apply(&mut session, &mut aliases, step)
            .with_context(|| format!("step {} failed", index + 1))?;
    }

    Ok(ReplayReport {
        view: session.view(),
        commands: session.into_player().drain(),
    })
}

fn apply(
    session: &mut EditorSession<RecordingPlayer>,
    aliases: &mut HashMap<String, SegmentId>,
    step: &ScriptStep,
) -> Result<()> {
    match step {
        ScriptStep::Duration { seconds } => {
            session.handle_event(PlayerEvent::DurationKnown { seconds: *seconds });
        }
        ScriptStep::Tick { seconds } => {
            session.handle_event(PlayerEvent::PositionChanged { seconds: *seconds });
        }
        ScriptStep::Playing { playing } => {
            session.handle_event(PlayerEvent::PlaybackStateChanged { playing: *playing });
        }
        ScriptStep::Add {
            label,
            start,
            end,
            kind,
            alias,
        } => {
            let id = session.add_segment(label, *start, *end, *kind)?;
            remember(aliases, alias.as_deref(), id);
        }
        ScriptStep::Remove { id } => {
            let resolved = resolve(aliases, id)?;
            if !session.remove_segment(&resolved) {
                tracing::warn!(alias = %id, "segment no longer exists");
            }
        }
        ScriptStep::Update { id, patch } => {
            let resolved = resolve(aliases, id)?;
            if !session.update_segment(&resolved, patch.clone()) {
                tracing::warn!(alias = %id, "segment no longer exists");
            }
        }
        ScriptStep::Seek { t, space } => session.seek_to(*t, *space),
        ScriptStep::Next => session.seek_to_next_boundary(),
        ScriptStep::Previous => session.seek_to_previous_boundary(),
        ScriptStep::Toggle => session.toggle_playback(),
        ScriptStep::SkipTrash { enabled } => session.set_skip_trash(*enabled),
        ScriptStep::Competency { name } => {
            session.add_competency(name)?;
        }
        ScriptStep::Mark { alias } => {
            let id = session.toggle_tagging()?;
            remember(aliases, alias.as_deref(), id);
        }
        ScriptStep::TagKind { kind } => session.set_tag_kind(*kind),
        ScriptStep::TagLabel { label } => session.set_tag_label(label.clone()),
    }
    Ok(())
}

fn remember(
    aliases: &mut HashMap<String, SegmentId>,
    alias: Option<&str>,
    id: Option<SegmentId>,
) {
    if let (Some(alias), Some(id)) = (alias, id) {
        aliases.insert(alias.to_string(), id);
    }
}

fn resolve(aliases: &HashMap<String, SegmentId>, alias: &str) -> Result<SegmentId> {
    aliases
        .get(alias)
        .cloned()
        .with_context(|| format!("unknown segment alias: {alias}"))
}

// ========== Output ==========

const fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

fn describe(command: &PlayerCommand) -> String {
    match command {
        PlayerCommand::Seek { seconds } => format!("seek {}", format_time_precise(*seconds)),
        PlayerCommand::Play => "play".to_string(),
        PlayerCommand::Pause => "pause".to_string(),
    }
}

/// Renders a replay report for the terminal.
pub fn format_report(report: &ReplayReport) -> String {
    let view = &report.view;
    let mut lines = vec![
        "POSITION".to_string(),
        "────────".to_string(),
        format!(
            "Real:     {} / {}",
            format_time_precise(view.current_time),
            format_time(view.duration)
        ),
        format!(
            "Virtual:  {} / {}",
            format_time_precise(view.virtual_time),
            format_time(view.virtual_duration)
        ),
        format!(
            "Playing:  {}   Skip trash: {}",
            yes_no(view.playing),
            yes_no(view.skip_trash)
        ),
        String::new(),
        "SEGMENTS".to_string(),
        "────────".to_string(),
    ];

    if view.segments.is_empty() {
        lines.push("(no segments)".to_string());
    }
    lines.extend(view.segments.iter().map(|s| {
        format!(
            "  {} - {}  {:<10}  {}  {}",
            format_time_precise(s.start),
            format_time_precise(s.end),
            s.kind.as_str(),
            s.label,
            s.color
        )
    }));

    lines.push(String::new());
    lines.push("VIRTUAL TIMELINE".to_string());
    lines.push("────────────────".to_string());
    if view.virtual_segments.is_empty() {
        lines.push("(no competencies)".to_string());
    }
    lines.extend(view.virtual_segments.iter().map(|s| {
        format!(
            "  {} - {}  {}",
            format_time_precise(s.start),
            format_time_precise(s.end),
            s.label
        )
    }));

    let metrics = &view.metrics;
    lines.push(String::new());
    lines.push("METRICS".to_string());
    lines.push("───────".to_string());
    lines.push(format!("Total:   {}", format_time(metrics.total)));
    lines.push(format!(
        "Trash:   {}  ({})",
        format_time(metrics.trash),
        percent(metrics.trash_ratio())
    ));
    lines.push(format!(
        "Useful:  {}  ({})",
        format_time(metrics.useful),
        percent(metrics.useful_ratio())
    ));

    lines.push(String::new());
    lines.push("PLAYER".to_string());
    lines.push("──────".to_string());
    if report.commands.is_empty() {
        lines.push("(no commands)".to_string());
    }
    lines.extend(report.commands.iter().map(|c| format!("  {}", describe(c))));

    lines.join("\n")
}

/// Runs the replay command.
pub fn run(script_path: &Path, config: &Config, json: bool) -> Result<()> {
    let script = std::fs::read_to_string(script_path)
        .with_context(|| format!("failed to read script {}", script_path.display()))?;
    let steps = parse_script(&script)?;
    tracing::debug!(steps = steps.len(), "parsed script");

    let report = replay(&steps, config)?;
    if json {
        let output =
            serde_json::to_string_pretty(&report).context("failed to serialize replay report")?;
        println!("{output}");
    } else {
        println!("{}", format_report(&report));
    }
    Ok(())
}
