//! Drop-table snapshot: the whole normalized catalog held by the drop-table
//! service, and the entry point that builds it from upstream JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::item::{normalize_item, normalize_item_drop, Item, ItemDrop, RawItem, RawItemDrop};
use crate::data::lenient;
use crate::data::relic::{
    normalize_relic, normalize_relic_drop, RawRelic, RawRelicDrop, Relic, RelicDrop,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTableSnapshot {
    pub items: Vec<Item>,
    pub relics: Vec<Relic>,
    pub item_drops: Vec<ItemDrop>,
    pub relic_drops: Vec<RelicDrop>,
}

impl DropTableSnapshot {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
            && self.relics.is_empty()
            && self.item_drops.is_empty()
            && self.relic_drops.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDropTable {
    #[serde(default, deserialize_with = "lenient::records")]
    pub items: Vec<RawItem>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub relics: Vec<RawRelic>,
    #[serde(
        default,
        rename = "itemDrops",
        alias = "item_drops",
        deserialize_with = "lenient::records"
    )]
    pub item_drops: Vec<RawItemDrop>,
    #[serde(
        default,
        rename = "relicDrops",
        alias = "relic_drops",
        deserialize_with = "lenient::records"
    )]
    pub relic_drops: Vec<RawRelicDrop>,
}

pub fn normalize_drop_table(raw: RawDropTable) -> DropTableSnapshot {
    DropTableSnapshot {
        items: raw.items.into_iter().map(normalize_item).collect(),
        relics: raw.relics.into_iter().map(normalize_relic).collect(),
        item_drops: raw.item_drops.into_iter().map(normalize_item_drop).collect(),
        relic_drops: raw.relic_drops.into_iter().map(normalize_relic_drop).collect(),
    }
}

/// Normalize an arbitrary JSON value. A non-object payload yields an empty
/// snapshot rather than an error.
pub fn parse_drop_table(value: &Value) -> DropTableSnapshot {
    normalize_drop_table(RawDropTable::deserialize(value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_sections_are_empty() {
        let snapshot = parse_drop_table(&json!({"items": [{"name": "Forma"}]}));
        assert_eq!(snapshot.items.len(), 1);
        assert!(snapshot.relics.is_empty());
        assert!(snapshot.item_drops.is_empty());
        assert!(snapshot.relic_drops.is_empty());
    }

    #[test]
    fn non_object_payload_is_empty_snapshot() {
        assert!(parse_drop_table(&json!("nope")).is_empty());
        assert!(parse_drop_table(&json!(null)).is_empty());
    }

    #[test]
    fn snapshot_serializes_with_camel_case_sections() {
        let snapshot = parse_drop_table(&json!({
            "item_drops": [{"item": {"name": "Orokin Cell"}, "location": "Saturn - Helene"}],
            "relicDrops": [{"relic": {"name": "Lith A1"}, "chance": 0.15}]
        }));
        let value = serde_json::to_value(&snapshot).expect("snapshot serializes");
        assert_eq!(value["itemDrops"][0]["item"]["id"], "orokin_cell");
        assert_eq!(value["itemDrops"][0]["quantity"], 1);
        assert_eq!(value["relicDrops"][0]["relic"]["tier"], "Lith");
        assert!(value["relicDrops"][0].get("rotation").is_none());
    }
}
