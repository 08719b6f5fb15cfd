use chrono::{DateTime, TimeDelta, Utc};

/// Compact duration such as `1h 4m 9s`. Negative spans clamp to `0s`.
pub fn format_duration(delta: TimeDelta) -> String {
    let total_seconds = delta.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::with_capacity(3);

    if hours > 0 {
        parts.push(format!("{hours}h"));
    }

    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }

    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{seconds}s"));
    }

    parts.join(" ")
}

pub fn elapsed(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format_duration(end - start)
}
