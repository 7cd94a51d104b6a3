//! Case-insensitive substring search over the catalog.
//!
//! An empty query matches everything. Callers that treat a blank query as
//! "no search" must short-circuit before calling in.

use crate::data::item::Item;
use crate::data::relic::Relic;

pub fn filter_items(items: &[Item], query: &str) -> Vec<Item> {
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| item_matches(item, &needle))
        .cloned()
        .collect()
}

pub fn filter_relics(relics: &[Relic], query: &str) -> Vec<Relic> {
    let needle = query.to_lowercase();
    relics
        .iter()
        .filter(|relic| relic_matches(relic, &needle))
        .cloned()
        .collect()
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn item_matches(item: &Item, needle: &str) -> bool {
    contains(&item.name, needle)
        || contains(item.item_type.as_str(), needle)
        || contains(&item.description, needle)
}

fn relic_matches(relic: &Relic, needle: &str) -> bool {
    contains(&relic.name, needle)
        || contains(relic.tier.as_str(), needle)
        || contains(&relic.era, needle)
        || relic.rewards.iter().any(|reward| contains(&reward.item, needle))
}
