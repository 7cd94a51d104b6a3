//! Built-in catalog used whenever live catalog data is unavailable.

use crate::data::drop_table::{normalize_drop_table, DropTableSnapshot, RawDropTable};

const SEED_DROP_TABLE_JSON: &str = include_str!("../../data/seed/drop_table.json");

/// Normalize the bundled seed dataset. The only failure is the bundled file
/// itself not being valid JSON.
pub fn seed_drop_table() -> Result<DropTableSnapshot, serde_json::Error> {
    let raw: RawDropTable = serde_json::from_str(SEED_DROP_TABLE_JSON)?;
    Ok(normalize_drop_table(raw))
}
