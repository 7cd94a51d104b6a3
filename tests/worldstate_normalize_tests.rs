use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tennohub::data::worldstate::{
    parse_worldstate, WorldCategory, WorldstateFormat, WorldstateSnapshot,
};

fn fixture(name: &str) -> Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let raw = fs::read_to_string(&path).expect("fixture should be readable");
    serde_json::from_str(&raw).expect("fixture should be valid json")
}

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2030-01-01T00:00:00Z")
        .expect("valid instant")
        .with_timezone(&Utc)
}

fn counts(snapshot: &WorldstateSnapshot) -> Vec<usize> {
    WorldCategory::ALL
        .iter()
        .map(|category| snapshot.category(*category).len())
        .collect()
}

#[test]
fn mongo_export_fixture_normalizes() {
    let payload = fixture("worldstate_mongo.json");
    assert_eq!(WorldstateFormat::detect(&payload), WorldstateFormat::MongoExport);

    let snapshot = parse_worldstate(&payload, now());
    assert_eq!(snapshot.timestamp, "2024-03-01T12:00:00.000Z");
    assert_eq!(counts(&snapshot), vec![1, 1, 1, 2, 1, 1]);

    let alert = &snapshot.alerts[0];
    assert_eq!(alert.id, "65e1a0");
    assert_eq!(alert.name, "MT_SURVIVAL");
    assert_eq!(alert.location.as_deref(), Some("SolNode85"));
    assert_eq!(alert.start_time.as_deref(), Some("2024-03-01T11:00:00.000Z"));
    assert_eq!(alert.description.as_deref(), Some("Orokin Cell x3"));

    let invasion = &snapshot.invasions[0];
    assert_eq!(invasion.name, "FC_GRINEER vs FC_CORPUS");
    assert_eq!(invasion.location.as_deref(), Some("SolNode23"));
    assert_eq!(
        invasion.description.as_deref(),
        Some("Detonite Injector vs Fieldron (1200/30000)")
    );
    assert_eq!(invasion.end_time, None);

    let sortie = &snapshot.sorties[0];
    assert_eq!(sortie.name, "Sortie: SORTIE_BOSS_VOR");
    assert_eq!(sortie.location.as_deref(), Some("SolNode64"));
    assert_eq!(
        sortie.description.as_deref(),
        Some("MT_EXTERMINATION - SORTIE_MODIFIER_LOW_ENERGY, MT_DEFENSE - SORTIE_MODIFIER_ARMOR")
    );

    let tiers: Vec<&str> = snapshot.fissures.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(tiers, ["Axi Fissure", "Requiem Fissure"]);
    assert_eq!(snapshot.fissures[0].description.as_deref(), Some("MT_CAPTURE"));

    let event = &snapshot.events[0];
    assert_eq!(event.name, "Operation: Belly of the Beast");
    assert_eq!(event.location.as_deref(), Some("Global"));
    assert_eq!(event.start_time.as_deref(), Some("2024-02-27T02:13:20.000Z"));

    let nightwave = &snapshot.nightwave[0];
    assert_eq!(nightwave.name, "Nightwave Season 11");
    assert_eq!(
        nightwave.description.as_deref(),
        Some("Phase 1 - 3 active challenges")
    );
}

#[test]
fn flat_fixture_normalizes() {
    let payload = fixture("worldstate_flat.json");
    assert_eq!(WorldstateFormat::detect(&payload), WorldstateFormat::Flat);

    let snapshot = parse_worldstate(&payload, now());
    assert_eq!(snapshot.timestamp, "2024-03-01T12:00:00.000Z");
    assert_eq!(counts(&snapshot), vec![1, 1, 1, 2, 2, 1]);

    let alert = &snapshot.alerts[0];
    assert_eq!(alert.name, "Survival");
    assert_eq!(alert.event_type, "Alert");
    assert_eq!(alert.location.as_deref(), Some("Mot (Void)"));
    assert_eq!(alert.end_time.as_deref(), Some("2024-03-01T13:00:00.000Z"));

    let invasion = &snapshot.invasions[0];
    assert_eq!(invasion.name, "Grineer vs Corpus");
    assert_eq!(invasion.location.as_deref(), Some("Kappa (Sedna)"));

    let sortie = &snapshot.sorties[0];
    assert_eq!(sortie.name, "Sortie: Vor");
    assert_eq!(sortie.location.as_deref(), Some("Io (Jupiter)"));
    assert_eq!(
        sortie.description.as_deref(),
        Some("Extermination - Energy Reduction, Defense - Augmented Enemy Armor")
    );

    let bare_fissure = &snapshot.fissures[1];
    assert_eq!(bare_fissure.name, "Unknown Fissure");
    assert_eq!(bare_fissure.location.as_deref(), Some("Hepit (Void)"));
    assert_eq!(bare_fissure.description.as_deref(), Some(""));

    let bare_event = &snapshot.events[1];
    assert_eq!(bare_event.name, "Event");
    assert_eq!(bare_event.location.as_deref(), Some("Global"));

    assert_eq!(
        snapshot.nightwave[0].description.as_deref(),
        Some("Phase 2 - 2 active challenges")
    );
}

#[test]
fn both_encodings_serialize_to_the_same_shape() {
    for name in ["worldstate_mongo.json", "worldstate_flat.json"] {
        let snapshot = parse_worldstate(&fixture(name), now());
        let value = serde_json::to_value(&snapshot).expect("snapshot serializes");
        let object = value.as_object().expect("snapshot is an object");
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["alerts", "events", "fissures", "invasions", "nightwave", "sorties", "timestamp"],
            "{name}"
        );
        assert_eq!(value["alerts"][0]["type"], "Alert", "{name}");
    }
}

#[test]
fn normalizing_is_deterministic() {
    let payload = fixture("worldstate_flat.json");
    assert_eq!(parse_worldstate(&payload, now()), parse_worldstate(&payload, now()));
}
