//! Worldstate normalization.
//!
//! Two upstream encodings are in circulation: the game's own Mongo-export
//! dump (PascalCase keys, `$date.$numberLong` timestamps, `Time` in unix
//! seconds) and the community API's flattened form (camelCase keys, ISO
//! strings). [`WorldstateFormat::detect`] picks the reader; both produce the
//! same [`WorldstateSnapshot`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::data::timestamp::{from_unix_seconds, normalize_timestamp, parse_timestamp, to_iso};

/// One active in-game activity. The category lives in `event_type` and in
/// which snapshot list the event sits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldEvent {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldstateSnapshot {
    pub timestamp: String,
    pub alerts: Vec<WorldEvent>,
    pub invasions: Vec<WorldEvent>,
    pub sorties: Vec<WorldEvent>,
    pub fissures: Vec<WorldEvent>,
    pub events: Vec<WorldEvent>,
    pub nightwave: Vec<WorldEvent>,
}

impl WorldstateSnapshot {
    /// Structurally valid snapshot with every category empty.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            timestamp: to_iso(now),
            alerts: Vec::new(),
            invasions: Vec::new(),
            sorties: Vec::new(),
            fissures: Vec::new(),
            events: Vec::new(),
            nightwave: Vec::new(),
        }
    }

    pub fn category(&self, category: WorldCategory) -> &[WorldEvent] {
        match category {
            WorldCategory::Alerts => &self.alerts,
            WorldCategory::Invasions => &self.invasions,
            WorldCategory::Sorties => &self.sorties,
            WorldCategory::Fissures => &self.fissures,
            WorldCategory::Events => &self.events,
            WorldCategory::Nightwave => &self.nightwave,
        }
    }

    pub fn total_events(&self) -> usize {
        WorldCategory::ALL
            .iter()
            .map(|category| self.category(*category).len())
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorldCategory {
    Alerts,
    Invasions,
    Sorties,
    Fissures,
    Events,
    Nightwave,
}

impl WorldCategory {
    pub const ALL: [WorldCategory; 6] = [
        Self::Alerts,
        Self::Invasions,
        Self::Sorties,
        Self::Fissures,
        Self::Events,
        Self::Nightwave,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alerts => "alerts",
            Self::Invasions => "invasions",
            Self::Sorties => "sorties",
            Self::Fissures => "fissures",
            Self::Events => "events",
            Self::Nightwave => "nightwave",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Alerts => "Alerts",
            Self::Invasions => "Invasions",
            Self::Sorties => "Sorties",
            Self::Fissures => "Void Fissures",
            Self::Events => "Events",
            Self::Nightwave => "Nightwave",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        let slug = slug.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|category| category.as_str() == slug)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldstateFormat {
    MongoExport,
    Flat,
}

impl WorldstateFormat {
    const MONGO_KEYS: [&'static str; 8] = [
        "Time",
        "Alerts",
        "Invasions",
        "Sorties",
        "ActiveMissions",
        "VoidTraders",
        "Events",
        "Nightwave",
    ];

    pub fn detect(payload: &Value) -> Self {
        let is_mongo = payload
            .as_object()
            .is_some_and(|map| Self::MONGO_KEYS.iter().any(|key| map.contains_key(*key)));
        if is_mongo {
            Self::MongoExport
        } else {
            Self::Flat
        }
    }
}

/// Normalize a raw worldstate payload. Never fails: unknown shapes yield an
/// empty snapshot stamped `now`.
pub fn parse_worldstate(payload: &Value, now: DateTime<Utc>) -> WorldstateSnapshot {
    match WorldstateFormat::detect(payload) {
        WorldstateFormat::MongoExport => mongo::snapshot(payload, now),
        WorldstateFormat::Flat => flat::snapshot(payload, now),
    }
}

fn text<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn text_or(value: &Value, pointer: &str, fallback: &str) -> String {
    text(value, pointer).unwrap_or(fallback).to_string()
}

fn integer(value: &Value, pointer: &str) -> Option<i64> {
    let number = value.pointer(pointer)?;
    number
        .as_i64()
        .or_else(|| number.as_f64().map(|f| f as i64))
}

fn time(value: &Value, pointer: &str) -> Option<String> {
    value.pointer(pointer).and_then(normalize_timestamp)
}

fn list<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn event(
    id: String,
    name: String,
    event_type: &str,
    location: String,
    start_time: Option<String>,
    end_time: Option<String>,
    description: String,
) -> WorldEvent {
    WorldEvent {
        id,
        name,
        event_type: event_type.to_string(),
        location: Some(location),
        start_time,
        end_time,
        description: Some(description),
    }
}

fn sortie_description<'a>(variants: impl Iterator<Item = (Option<&'a str>, Option<&'a str>)>) -> String {
    variants
        .map(|(mission, modifier)| {
            format!(
                "{} - {}",
                mission.unwrap_or("Unknown"),
                modifier.unwrap_or("Unknown")
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn nightwave_event(
    id: String,
    season: Option<i64>,
    phase: Option<i64>,
    challenges: usize,
    start_time: Option<String>,
    end_time: Option<String>,
) -> WorldEvent {
    let season = season
        .filter(|s| *s != 0)
        .map_or_else(|| "Unknown".to_string(), |s| s.to_string());
    let phase = phase.filter(|p| *p != 0).unwrap_or(1);
    event(
        id,
        format!("Nightwave Season {season}"),
        "Nightwave",
        "Global".to_string(),
        start_time,
        end_time,
        format!("Phase {phase} - {challenges} active challenges"),
    )
}

/// Reader for the game's Mongo-export dump.
mod mongo {
    use super::*;

    pub(super) fn snapshot(payload: &Value, now: DateTime<Utc>) -> WorldstateSnapshot {
        let timestamp = integer(payload, "/Time")
            .filter(|secs| *secs != 0)
            .and_then(from_unix_seconds)
            .unwrap_or(now);

        let fissures = if payload.get("ActiveMissions").is_some() {
            list(payload, "ActiveMissions").iter().map(fissure).collect()
        } else {
            list(payload, "VoidTraders").iter().map(void_trader).collect()
        };

        WorldstateSnapshot {
            timestamp: to_iso(timestamp),
            alerts: list(payload, "Alerts").iter().map(alert).collect(),
            invasions: list(payload, "Invasions").iter().map(invasion).collect(),
            sorties: list(payload, "Sorties").iter().map(sortie).collect(),
            fissures,
            events: list(payload, "Events").iter().map(news_event).collect(),
            nightwave: payload
                .get("Nightwave")
                .filter(|nw| nw.is_object())
                .map(nightwave)
                .into_iter()
                .collect(),
        }
    }

    fn id(value: &Value) -> String {
        text(value, "/_id/$oid")
            .or_else(|| text(value, "/_id"))
            .unwrap_or("unknown")
            .to_string()
    }

    fn alert(value: &Value) -> WorldEvent {
        let description = text(value, "/MissionReward/asString")
            .or_else(|| text(value, "/MissionInfo/description"))
            .unwrap_or("");
        event(
            id(value),
            text_or(value, "/MissionInfo/missionType", "Alert"),
            "Alert",
            text_or(value, "/MissionInfo/locationTag", "Unknown"),
            time(value, "/Activation"),
            time(value, "/Expiry"),
            description.to_string(),
        )
    }

    fn invasion(value: &Value) -> WorldEvent {
        let location = text(value, "/AttackerMissionInfo/locationTag")
            .or_else(|| text(value, "/Node"))
            .unwrap_or("Unknown");
        event(
            id(value),
            format!(
                "{} vs {}",
                text(value, "/AttackerMissionInfo/faction").unwrap_or("Unknown"),
                text(value, "/DefenderMissionInfo/faction").unwrap_or("Unknown"),
            ),
            "Invasion",
            location.to_string(),
            time(value, "/Activation"),
            time(value, "/Expiry"),
            format!(
                "{} vs {} ({}/{})",
                text(value, "/AttackerReward/asString").unwrap_or("Unknown"),
                text(value, "/DefenderReward/asString").unwrap_or("Unknown"),
                integer(value, "/Count").unwrap_or(0),
                integer(value, "/Goal").unwrap_or(0),
            ),
        )
    }

    fn sortie(value: &Value) -> WorldEvent {
        let variants = list(value, "Variants");
        let location = variants
            .first()
            .and_then(|v| text(v, "/planet").or_else(|| text(v, "/node")))
            .unwrap_or("Unknown");
        event(
            id(value),
            format!("Sortie: {}", text(value, "/Boss").unwrap_or("Unknown Boss")),
            "Sortie",
            location.to_string(),
            time(value, "/Activation"),
            time(value, "/Expiry"),
            sortie_description(
                variants
                    .iter()
                    .map(|v| (text(v, "/missionType"), text(v, "/modifier"))),
            ),
        )
    }

    fn fissure(value: &Value) -> WorldEvent {
        let tier = match text(value, "/Modifier") {
            Some("VoidT1") => "Lith",
            Some("VoidT2") => "Meso",
            Some("VoidT3") => "Neo",
            Some("VoidT4") => "Axi",
            Some("VoidT5") => "Requiem",
            _ => "Unknown",
        };
        event(
            id(value),
            format!("{tier} Fissure"),
            "Fissure",
            text_or(value, "/Node", "Unknown"),
            time(value, "/Activation"),
            time(value, "/Expiry"),
            text_or(value, "/MissionType", ""),
        )
    }

    /// Dumps without `ActiveMissions` only expose the void trader here.
    fn void_trader(value: &Value) -> WorldEvent {
        let location = text_or(value, "/Location", "Unknown");
        event(
            id(value),
            format!(
                "Void Trader: {}",
                text(value, "/Character").unwrap_or("Baro Ki'Teer")
            ),
            "Fissure",
            location.clone(),
            time(value, "/Activation"),
            time(value, "/Expiry"),
            format!("Available at {location}"),
        )
    }

    fn news_event(value: &Value) -> WorldEvent {
        event(
            id(value),
            text_or(value, "/Messages/0/Message", "Event"),
            "Event",
            "Global".to_string(),
            time(value, "/Date"),
            time(value, "/EventEndDate"),
            text_or(value, "/Prop", ""),
        )
    }

    fn nightwave(value: &Value) -> WorldEvent {
        nightwave_event(
            id(value),
            integer(value, "/Season"),
            integer(value, "/Phase"),
            list(value, "ActiveChallenges").len(),
            time(value, "/Activation"),
            time(value, "/Expiry"),
        )
    }
}

/// Reader for the community API's flattened form.
mod flat {
    use super::*;

    pub(super) fn snapshot(payload: &Value, now: DateTime<Utc>) -> WorldstateSnapshot {
        let timestamp = payload
            .get("timestamp")
            .and_then(parse_timestamp)
            .unwrap_or(now);

        WorldstateSnapshot {
            timestamp: to_iso(timestamp),
            alerts: list(payload, "alerts").iter().map(alert).collect(),
            invasions: list(payload, "invasions").iter().map(invasion).collect(),
            sorties: single(payload, "sortie").map(sortie).into_iter().collect(),
            fissures: list(payload, "fissures").iter().map(fissure).collect(),
            events: list(payload, "events").iter().map(news_event).collect(),
            nightwave: single(payload, "nightwave").map(nightwave).into_iter().collect(),
        }
    }

    fn single<'a>(payload: &'a Value, key: &str) -> Option<&'a Value> {
        payload.get(key).filter(|value| value.is_object())
    }

    fn id(value: &Value) -> String {
        text_or(value, "/id", "unknown")
    }

    fn alert(value: &Value) -> WorldEvent {
        let description = text(value, "/mission/reward/asString")
            .or_else(|| text(value, "/mission/description"))
            .unwrap_or("");
        event(
            id(value),
            text_or(value, "/mission/type", "Alert"),
            "Alert",
            text_or(value, "/mission/node", "Unknown"),
            time(value, "/activation"),
            time(value, "/expiry"),
            description.to_string(),
        )
    }

    fn invasion(value: &Value) -> WorldEvent {
        let attacker = text(value, "/attacker/faction")
            .or_else(|| text(value, "/attackingFaction"))
            .unwrap_or("Unknown");
        let defender = text(value, "/defender/faction")
            .or_else(|| text(value, "/defendingFaction"))
            .unwrap_or("Unknown");
        event(
            id(value),
            format!("{attacker} vs {defender}"),
            "Invasion",
            text_or(value, "/node", "Unknown"),
            time(value, "/activation"),
            time(value, "/expiry"),
            format!(
                "{} vs {} ({}/{})",
                text(value, "/attacker/reward/asString").unwrap_or("Unknown"),
                text(value, "/defender/reward/asString").unwrap_or("Unknown"),
                integer(value, "/count").unwrap_or(0),
                integer(value, "/requiredRuns").unwrap_or(0),
            ),
        )
    }

    fn sortie(value: &Value) -> WorldEvent {
        let variants = list(value, "variants");
        let location = variants
            .first()
            .and_then(|v| text(v, "/node"))
            .unwrap_or("Unknown");
        event(
            id(value),
            format!("Sortie: {}", text(value, "/boss").unwrap_or("Unknown Boss")),
            "Sortie",
            location.to_string(),
            time(value, "/activation"),
            time(value, "/expiry"),
            sortie_description(
                variants
                    .iter()
                    .map(|v| (text(v, "/missionType"), text(v, "/modifier"))),
            ),
        )
    }

    fn fissure(value: &Value) -> WorldEvent {
        event(
            id(value),
            format!("{} Fissure", text(value, "/tier").unwrap_or("Unknown")),
            "Fissure",
            text_or(value, "/node", "Unknown"),
            time(value, "/activation"),
            time(value, "/expiry"),
            text_or(value, "/missionType", ""),
        )
    }

    fn news_event(value: &Value) -> WorldEvent {
        event(
            id(value),
            text_or(value, "/description", "Event"),
            "Event",
            text_or(value, "/node", "Global"),
            time(value, "/activation"),
            time(value, "/expiry"),
            text_or(value, "/tooltip", ""),
        )
    }

    fn nightwave(value: &Value) -> WorldEvent {
        nightwave_event(
            id(value),
            integer(value, "/season"),
            integer(value, "/phase"),
            list(value, "activeChallenges").len(),
            time(value, "/activation"),
            time(value, "/expiry"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        from_unix_seconds(1_700_000_000).expect("valid instant")
    }

    #[test]
    fn detects_mongo_by_pascal_case_keys() {
        assert_eq!(
            WorldstateFormat::detect(&json!({"Time": 1, "Alerts": []})),
            WorldstateFormat::MongoExport
        );
        assert_eq!(
            WorldstateFormat::detect(&json!({"timestamp": "2024-01-01T00:00:00Z"})),
            WorldstateFormat::Flat
        );
        assert_eq!(WorldstateFormat::detect(&json!([])), WorldstateFormat::Flat);
    }

    #[test]
    fn unknown_payload_is_empty_snapshot_at_now() {
        let snapshot = parse_worldstate(&json!("offline"), now());
        assert_eq!(snapshot, WorldstateSnapshot::empty(now()));
        assert_eq!(snapshot.timestamp, "2023-11-14T22:13:20.000Z");
    }

    #[test]
    fn mongo_alert_with_missing_fields_uses_placeholders() {
        let snapshot = parse_worldstate(
            &json!({"Alerts": [{"Activation": {"$date": {"$numberLong": "bogus"}}}]}),
            now(),
        );
        let alert = &snapshot.alerts[0];
        assert_eq!(alert.id, "unknown");
        assert_eq!(alert.name, "Alert");
        assert_eq!(alert.event_type, "Alert");
        assert_eq!(alert.location.as_deref(), Some("Unknown"));
        assert_eq!(alert.description.as_deref(), Some(""));
        assert_eq!(alert.start_time, None);
        assert_eq!(alert.end_time, None);
    }

    #[test]
    fn mongo_time_is_unix_seconds() {
        let snapshot = parse_worldstate(&json!({"Time": 1_700_000_060}), now());
        assert_eq!(snapshot.timestamp, "2023-11-14T22:14:20.000Z");
    }

    #[test]
    fn mongo_void_traders_fill_fissures_when_no_active_missions() {
        let snapshot = parse_worldstate(
            &json!({"VoidTraders": [{"_id": {"$oid": "vt1"}, "Location": "Larunda Relay"}]}),
            now(),
        );
        let trader = &snapshot.fissures[0];
        assert_eq!(trader.name, "Void Trader: Baro Ki'Teer");
        assert_eq!(trader.event_type, "Fissure");
        assert_eq!(trader.description.as_deref(), Some("Available at Larunda Relay"));
    }

    #[test]
    fn nightwave_defaults() {
        let snapshot = parse_worldstate(&json!({"Nightwave": {}}), now());
        let nightwave = &snapshot.nightwave[0];
        assert_eq!(nightwave.name, "Nightwave Season Unknown");
        assert_eq!(nightwave.location.as_deref(), Some("Global"));
        assert_eq!(
            nightwave.description.as_deref(),
            Some("Phase 1 - 0 active challenges")
        );
    }

    #[test]
    fn absent_nightwave_is_empty_list() {
        let snapshot = parse_worldstate(&json!({"Time": 1_700_000_000}), now());
        assert!(snapshot.nightwave.is_empty());
        let snapshot = parse_worldstate(&json!({"timestamp": "2024-01-01T00:00:00Z"}), now());
        assert!(snapshot.nightwave.is_empty());
        assert!(snapshot.sorties.is_empty());
    }

    #[test]
    fn absent_optionals_are_not_serialized() {
        let snapshot = parse_worldstate(&json!({"alerts": [{"id": "a1"}]}), now());
        let value = serde_json::to_value(&snapshot.alerts[0]).expect("event serializes");
        assert_eq!(value["id"], "a1");
        assert!(value.get("startTime").is_none());
        assert!(value.get("endTime").is_none());
        assert_eq!(value["location"], "Unknown");
    }

    #[test]
    fn category_slugs_round_trip() {
        for category in WorldCategory::ALL {
            assert_eq!(WorldCategory::from_slug(category.as_str()), Some(category));
        }
        assert_eq!(WorldCategory::from_slug(" Alerts "), Some(WorldCategory::Alerts));
        assert_eq!(WorldCategory::from_slug("baro"), None);
    }
}
