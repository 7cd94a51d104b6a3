//! Human-readable rendering for chances and countdowns.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::data::timestamp::parse_timestamp;

pub fn format_chance(chance: f64) -> String {
    format!("{:.1}%", chance * 100.0)
}

/// Countdown until `end_time` (any accepted timestamp encoding) as seen at
/// `now`. `None` when `end_time` does not parse.
pub fn time_remaining(end_time: &str, now: DateTime<Utc>) -> Option<String> {
    let end = parse_timestamp(&Value::String(end_time.to_string()))?;
    let remaining = end.signed_duration_since(now);
    if remaining.num_milliseconds() <= 0 {
        return Some("Expired".to_string());
    }
    let hours = remaining.num_hours();
    let minutes = remaining.num_minutes() % 60;
    Some(if hours > 0 {
        format!("{hours}h {minutes}m remaining")
    } else {
        format!("{minutes}m remaining")
    })
}
