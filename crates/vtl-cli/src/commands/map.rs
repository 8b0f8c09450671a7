//! Map command for converting times between real and virtual time.
//!
//! This module implements `vtl map`, which applies the trash-skipping
//! mapping to a list of times without building a full session.

use anyhow::Result;
use vtl_core::format::format_time_precise;
use vtl_core::{Range, VirtualTimeline};

/// Renders one `from to` row per input time plus a duration summary.
pub fn format_mappings(timeline: &VirtualTimeline, times: &[f64], to_real: bool) -> String {
    let (from, to) = if to_real {
        ("virtual", "real")
    } else {
        ("real", "virtual")
    };

    let mut lines = vec![format!("{from:<10} {to}")];
    lines.extend(times.iter().map(|&t| {
        let mapped = if to_real {
            timeline.to_real(t)
        } else {
            timeline.to_virtual(t)
        };
        format!("{:<10} {}", format_time_precise(t), format_time_precise(mapped))
    }));
    lines.push(String::new());
    lines.push(format!(
        "Virtual duration: {} of {} ({} trashed)",
        format_time_precise(timeline.virtual_duration()),
        format_time_precise(timeline.duration()),
        format_time_precise(timeline.trashed()),
    ));
    lines.join("\n")
}

/// Runs the map command.
pub fn run(duration: f64, trash: &[Range], to_real: bool, times: &[f64]) -> Result<()> {
    if duration <= 0.0 {
        anyhow::bail!("Duration must be positive");
    }
    let timeline = VirtualTimeline::from_ranges(trash.iter().copied(), duration);
    tracing::debug!(holes = timeline.holes().len(), duration, "built timeline");
    println!("{}", format_mappings(&timeline, times, to_real));
    Ok(())
}
