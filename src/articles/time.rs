use chrono::{DateTime, Utc};

/// Compact "how long ago" label, e.g. `42s ago`, `5m ago`, `3h ago`, `2d ago`.
/// Future timestamps and zero ages clamp to `1s ago`.
pub fn relative_time(published_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - published_at).num_seconds().max(1);

    if seconds < 60 {
        return format!("{seconds}s ago");
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes}m ago");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }

    format!("{}d ago", hours / 24)
}
