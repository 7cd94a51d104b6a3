//! Void relics, their reward tables, and relic drop locations.

use serde::{Deserialize, Serialize};

use crate::data::{chance_or_zero, lenient, slug_id};

tag_enum! {
    RelicTier {
        Lith => "Lith",
        Meso => "Meso",
        Neo => "Neo",
        Axi => "Axi",
    }
}

tag_enum! {
    /// Reward slot rarity inside a relic.
    RewardRarity {
        Common => "Common",
        Uncommon => "Uncommon",
        Rare => "Rare",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelicReward {
    pub item: String,
    pub rarity: RewardRarity,
    pub chance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relic {
    pub id: String,
    pub name: String,
    pub tier: RelicTier,
    pub era: String,
    pub vaulted: bool,
    pub rewards: Vec<RelicReward>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelicDrop {
    pub relic: Relic,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<String>,
    pub chance: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRelicReward {
    #[serde(default, deserialize_with = "lenient::text")]
    pub item: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub rarity: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub chance: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRelic {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tier: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub era: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub vaulted: Option<bool>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub rewards: Vec<RawRelicReward>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRelicDrop {
    #[serde(default, deserialize_with = "lenient::record")]
    pub relic: Option<RawRelic>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub rotation: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub chance: Option<f64>,
}

pub fn normalize_relic(raw: RawRelic) -> Relic {
    let id = raw
        .id
        .unwrap_or_else(|| slug_id(raw.name.as_deref()));
    Relic {
        id,
        name: raw.name.unwrap_or_else(|| "Unknown Relic".to_string()),
        tier: raw.tier.map_or(RelicTier::Lith, RelicTier::from),
        era: raw.era.unwrap_or_else(|| "Unknown".to_string()),
        vaulted: raw.vaulted.unwrap_or(false),
        rewards: raw.rewards.into_iter().map(normalize_reward).collect(),
    }
}

pub fn normalize_reward(raw: RawRelicReward) -> RelicReward {
    RelicReward {
        item: raw.item.unwrap_or_else(|| "Unknown".to_string()),
        rarity: raw.rarity.map_or(RewardRarity::Common, RewardRarity::from),
        chance: chance_or_zero(raw.chance),
    }
}

pub fn normalize_relic_drop(raw: RawRelicDrop) -> RelicDrop {
    RelicDrop {
        relic: normalize_relic(raw.relic.unwrap_or_default()),
        location: raw.location.unwrap_or_else(|| "Unknown".to_string()),
        rotation: raw.rotation,
        chance: chance_or_zero(raw.chance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_relic_gets_every_default() {
        let relic = normalize_relic(RawRelic::default());
        assert_eq!(relic.id, "unknown");
        assert_eq!(relic.name, "Unknown Relic");
        assert_eq!(relic.tier, RelicTier::Lith);
        assert_eq!(relic.era, "Unknown");
        assert!(!relic.vaulted);
        assert!(relic.rewards.is_empty());
    }

    #[test]
    fn rewards_keep_order_and_default_fields() {
        let raw: RawRelic = serde_json::from_str(
            r#"{
                "name": "Neo C3",
                "tier": "Neo",
                "vaulted": true,
                "rewards": [
                    {"item": "Boltor Prime Blueprint", "rarity": "Rare", "chance": 0.02},
                    {"rarity": "Legendary"},
                    "garbage"
                ]
            }"#,
        )
        .expect("raw relic should decode");
        let relic = normalize_relic(raw);
        assert_eq!(relic.id, "neo_c3");
        assert!(relic.vaulted);
        assert_eq!(relic.rewards.len(), 3);
        assert_eq!(relic.rewards[0].item, "Boltor Prime Blueprint");
        assert_eq!(relic.rewards[1].item, "Unknown");
        assert_eq!(relic.rewards[1].rarity.as_str(), "Legendary");
        assert_eq!(relic.rewards[1].chance, 0.0);
        assert_eq!(relic.rewards[2].rarity, RewardRarity::Common);
    }

    #[test]
    fn relic_drop_without_relic_uses_default_relic() {
        let drop: RawRelicDrop =
            serde_json::from_str(r#"{"relic": 12, "location": "Mars Survival", "rotation": "B"}"#)
                .expect("raw drop should decode");
        let drop = normalize_relic_drop(drop);
        assert_eq!(drop.relic.name, "Unknown Relic");
        assert_eq!(drop.location, "Mars Survival");
        assert_eq!(drop.rotation.as_deref(), Some("B"));
    }
}
