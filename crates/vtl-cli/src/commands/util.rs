//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use regex::Regex;
use vtl_core::Range;

/// Pre-compiled regex for `SS`, `SSs`, `M:SS` and `H:MM:SS` times.
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:(\d+):)?(\d+):)?(\d+(?:\.\d+)?)(s)?$").unwrap()
});

/// Parse a media time into seconds.
///
/// Supports:
/// - Seconds: "90", "90.5", "90s"
/// - Minutes: "1:30", "1:30.25"
/// - Hours: "1:02:03"
pub fn parse_time(s: &str) -> anyhow::Result<f64> {
    let s = s.trim();
    let Some(caps) = TIME_RE.captures(s) else {
        anyhow::bail!("Invalid time: {s}. Use seconds (90, 90.5s), M:SS (1:30) or H:MM:SS");
    };

    let minutes_given = caps.get(2).is_some();
    if minutes_given && caps.get(4).is_some() {
        anyhow::bail!("Invalid time: {s}. The 's' suffix only applies to plain seconds");
    }

    let seconds: f64 = caps[3].parse().context("failed to parse seconds")?;
    let minutes: f64 = caps
        .get(2)
        .map_or(Ok(0.0), |m| m.as_str().parse())
        .context("failed to parse minutes")?;
    let hours: f64 = caps
        .get(1)
        .map_or(Ok(0.0), |h| h.as_str().parse())
        .context("failed to parse hours")?;

    if minutes_given && seconds >= 60.0 {
        anyhow::bail!("Invalid time: {s}. Seconds must be below 60");
    }
    if caps.get(1).is_some() && minutes >= 60.0 {
        anyhow::bail!("Invalid time: {s}. Minutes must be below 60");
    }

    Ok(hours.mul_add(3600.0, minutes.mul_add(60.0, seconds)))
}

/// Parse a `START-END` range of media times.
pub fn parse_range(s: &str) -> anyhow::Result<Range> {
    let Some((start, end)) = s.split_once('-') else {
        anyhow::bail!("Invalid range: {s}. Use START-END (e.g. 10-25 or 1:05-1:30)");
    };
    let start = parse_time(start).with_context(|| format!("invalid range start in {s}"))?;
    let end = parse_time(end).with_context(|| format!("invalid range end in {s}"))?;
    if end <= start {
        anyhow::bail!("Invalid range: {s}. End must be after start");
    }
    Ok(Range::new(start, end))
}
