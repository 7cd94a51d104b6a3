//! Timestamp decoding for both worldstate encodings.
//!
//! Accepts Mongo extended JSON (`{"$date": {"$numberLong": "<ms>"}}`, or a
//! `$date` holding a number or string), RFC 3339 strings, and bare
//! epoch-millisecond numbers. Output is always RFC 3339 UTC with millisecond
//! precision.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;

pub fn to_iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

pub fn from_unix_seconds(seconds: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0).single()
}

pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Object(map) => {
            if let Some(inner) = map.get("$date") {
                parse_timestamp(inner)
            } else {
                map.get("$numberLong").and_then(parse_millis)
            }
        }
        Value::String(text) => parse_text(text),
        Value::Number(_) => parse_millis(value),
        _ => None,
    }
}

/// Decode and re-encode in one step; `None` when unparseable.
pub fn normalize_timestamp(value: &Value) -> Option<String> {
    parse_timestamp(value).map(to_iso)
}

fn parse_millis(value: &Value) -> Option<DateTime<Utc>> {
    let millis = match value {
        Value::String(text) => text.trim().parse::<i64>().ok()?,
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
        _ => return None,
    };
    from_millis(millis)
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    // Zone-less ISO strings are read as UTC.
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
