//! Catalog items and item drop locations.

use serde::{Deserialize, Serialize};

use crate::data::{chance_or_zero, lenient, slug_id};

tag_enum! {
    /// Item category.
    ItemType {
        Warframe => "Warframe",
        Weapon => "Weapon",
        Mod => "Mod",
        Resource => "Resource",
        Prime => "Prime",
        Arcane => "Arcane",
        Other => "Other",
    }
}

tag_enum! {
    Rarity {
        Common => "Common",
        Uncommon => "Uncommon",
        Rare => "Rare",
        Legendary => "Legendary",
    }
}

/// Normalized item. Every field is populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub rarity: Rarity,
    pub mastery: u32,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDrop {
    pub item: Item,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<String>,
    pub chance: f64,
    pub quantity: u32,
}

/// Item as it arrives from upstream: any field may be missing or mistyped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawItem {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient::text")]
    pub item_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub rarity: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub mastery: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawItemDrop {
    #[serde(default, deserialize_with = "lenient::record")]
    pub item: Option<RawItem>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub rotation: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub chance: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub quantity: Option<f64>,
}

pub fn normalize_item(raw: RawItem) -> Item {
    let id = raw
        .id
        .unwrap_or_else(|| slug_id(raw.name.as_deref()));
    Item {
        id,
        name: raw.name.unwrap_or_else(|| "Unknown Item".to_string()),
        item_type: raw.item_type.map_or(ItemType::Other, ItemType::from),
        rarity: raw.rarity.map_or(Rarity::Common, Rarity::from),
        mastery: whole_number(raw.mastery).unwrap_or(0),
        description: raw.description.unwrap_or_default(),
        image: raw.image.unwrap_or_default(),
    }
}

pub fn normalize_item_drop(raw: RawItemDrop) -> ItemDrop {
    ItemDrop {
        item: normalize_item(raw.item.unwrap_or_default()),
        location: raw.location.unwrap_or_else(|| "Unknown".to_string()),
        rotation: raw.rotation,
        chance: chance_or_zero(raw.chance),
        quantity: whole_number(raw.quantity).filter(|q| *q > 0).unwrap_or(1),
    }
}

/// Positive count from a JSON number, fractional part dropped.
fn whole_number(raw: Option<f64>) -> Option<u32> {
    raw.filter(|n| *n >= 1.0)
        .map(|n| n.floor().min(f64::from(u32::MAX)) as u32)
}
