// worklog-report - core/duration.rs
//
// Human-readable elapsed time on an 8-hour workday convention.

use crate::util::constants::{HOURS_PER_WORKDAY, MINUTES_PER_HOUR, SECONDS_PER_MINUTE};

/// Format seconds as `"{d}d {h}h {m}m"`, or `"{h}h {m}m"` under one workday.
///
/// One day is eight hours. Minutes keep any fraction (90 seconds renders as
/// `"0h 1.5m"`). Zero renders as `"0h 0m"`, never as an empty string.
pub fn format_duration(seconds: f64) -> String {
    let minutes = seconds / SECONDS_PER_MINUTE;
    let hours = (minutes / MINUTES_PER_HOUR).floor() as u64;
    let days = hours / HOURS_PER_WORKDAY;
    let rem_minutes = minutes % MINUTES_PER_HOUR;

    if days > 0 {
        format!("{days}d {}h {rem_minutes}m", hours % HOURS_PER_WORKDAY)
    } else {
        format!("{hours}h {rem_minutes}m")
    }
}
