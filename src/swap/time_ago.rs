//! Relative-age labels for swap listings.

use chrono::{DateTime, Utc};

/// Parse a stored RFC 3339 timestamp.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format the age of `created_at` relative to `now`.
///
/// Whole hours only: days and hours together when both are nonzero, otherwise
/// whichever is nonzero, otherwise "Just now".
pub fn format_time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let total_hours = (now - created_at).num_hours();
    let days = total_hours / 24;
    let hours = total_hours % 24;

    let plural = |n: i64| if n > 1 { "s" } else { "" };

    if days > 0 && hours > 0 {
        format!("{} day{} {} hr{} ago", days, plural(days), hours, plural(hours))
    } else if days > 0 {
        format!("{} day{} ago", days, plural(days))
    } else if hours > 0 {
        format!("{} hr{} ago", hours, plural(hours))
    } else {
        "Just now".to_string()
    }
}

/// Format a stored timestamp; unparsable values read as "Just now".
pub fn time_ago_label(created_at: &str, now: DateTime<Utc>) -> String {
    match parse_timestamp(created_at) {
        Some(created) => format_time_ago(created, now),
        None => {
            tracing::warn!(created_at, "Unparsable swap timestamp");
            format_time_ago(now, now)
        }
    }
}
