//! Countdown display formatting

/// Format seconds as `MM:SS`, or `HH:MM:SS` once an hour or more is left
pub fn format_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let remaining_seconds = seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, remaining_seconds)
    } else {
        format!("{:02}:{:02}", minutes, remaining_seconds)
    }
}
