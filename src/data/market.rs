//! Adapter for the warframe.market item listing.
//!
//! The listing only carries names, slugs and sometimes a category, so every
//! item comes through as `Common` with mastery 0.

use serde_json::Value;

use crate::data::item::{ItemType, RawItem};

/// Raw catalog items from a `{"payload": {"items": [...]}}` listing.
/// `None` when the payload does not have that shape.
pub fn market_items(payload: &Value) -> Option<Vec<RawItem>> {
    let entries = payload.pointer("/payload/items")?.as_array()?;
    Some(entries.iter().map(market_item).collect())
}

pub fn map_item_type(category: Option<&str>) -> ItemType {
    match category.map(str::to_lowercase).as_deref() {
        Some("warframes") => ItemType::Warframe,
        Some("primary" | "secondary" | "melee") => ItemType::Weapon,
        Some("mods") => ItemType::Mod,
        Some("resources") => ItemType::Resource,
        Some("arcanes") => ItemType::Arcane,
        _ => ItemType::Other,
    }
}

fn market_item(entry: &Value) -> RawItem {
    let text = |key: &str| {
        entry
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    RawItem {
        id: text("url_name"),
        name: text("item_name"),
        item_type: Some(String::from(map_item_type(text("category").as_deref()))),
        rarity: Some("Common".to_string()),
        mastery: Some(0.0),
        description: text("description"),
        image: text("thumb"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::item::normalize_item;
    use serde_json::json;

    #[test]
    fn listing_maps_to_items() {
        let payload = json!({
            "payload": {
                "items": [
                    {"url_name": "soma_prime_set", "item_name": "Soma Prime Set", "category": "Primary"},
                    {"url_name": "serration", "item_name": "Serration", "category": "mods", "thumb": "items/serration.png"},
                    {"item_name": "Mystery Box"}
                ]
            }
        });
        let items: Vec<_> = market_items(&payload)
            .expect("listing shape")
            .into_iter()
            .map(normalize_item)
            .collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].id, "soma_prime_set");
        assert_eq!(items[0].item_type, ItemType::Weapon);
        assert_eq!(items[1].item_type, ItemType::Mod);
        assert_eq!(items[1].image, "items/serration.png");
        assert_eq!(items[2].id, "mystery_box");
        assert_eq!(items[2].item_type, ItemType::Other);
    }

    #[test]
    fn wrong_shape_is_rejected() {
        assert!(market_items(&json!({"items": []})).is_none());
        assert!(market_items(&json!({"payload": {"items": "none"}})).is_none());
    }
}
