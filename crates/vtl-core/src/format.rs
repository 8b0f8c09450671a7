//! Presentation helpers for timestamps and the timeline ruler.

/// Formats seconds as `MM:SS`, or `H:MM:SS` once there is at least an hour.
///
/// Fractions are floored. Negative and non-finite inputs format as `00:00`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_time(seconds: f64) -> String {
    let total = whole(seconds) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Formats seconds as `M:SS.cc` (minutes unbounded, hundredths floored).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_time_precise(seconds: f64) -> String {
    let hundredths = whole(seconds * 100.0) as u64;
    let minutes = hundredths / 6000;
    let secs = (hundredths / 100) % 60;
    let cents = hundredths % 100;
    format!("{minutes}:{secs:02}.{cents:02}")
}

/// Spacing between ruler ticks for a timeline of `duration` seconds.
pub fn ruler_step(duration: f64) -> f64 {
    if duration > 600.0 {
        60.0
    } else if duration > 60.0 {
        10.0
    } else {
        5.0
    }
}

/// Tick positions from 0 up to and including `duration`. Empty when there is
/// no duration yet.
pub fn ruler_ticks(duration: f64) -> Vec<f64> {
    if !duration.is_finite() || duration <= 0.0 {
        return Vec::new();
    }
    let step = ruler_step(duration);
    std::iter::successors(Some(0.0), |t| Some(t + step))
        .take_while(|t| *t <= duration)
        .collect()
}

/// Position of `t` along `duration` as a percentage in `[0, 100]`.
pub fn progress_percent(t: f64, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 || !t.is_finite() {
        return 0.0;
    }
    (t / duration * 100.0).clamp(0.0, 100.0)
}

fn whole(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value.floor()
    } else {
        0.0
    }
}
