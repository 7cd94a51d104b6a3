//! Normalize a raw drop-table export (`items`, `relics`, `itemDrops`,
//! `relicDrops`) and print the cleaned dataset. Use it to refresh
//! data/seed/drop_table.json.
//!
//! usage: normalize_drop_table <drop_table.json>

use std::fs;
use std::process::ExitCode;

use tennohub::data::drop_table::parse_drop_table;

fn main() -> ExitCode {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: normalize_drop_table <drop_table.json>");
        return ExitCode::from(2);
    };

    let payload: serde_json::Value = match fs::read_to_string(&path)
        .map_err(|err| err.to_string())
        .and_then(|raw| serde_json::from_str(&raw).map_err(|err| err.to_string()))
    {
        Ok(payload) => payload,
        Err(err) => {
            eprintln!("failed to load {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let snapshot = parse_drop_table(&payload);
    if snapshot.is_empty() {
        eprintln!("warning: {path} produced no records; is it a drop-table export?");
    }
    eprintln!(
        "{path}: items={}, relics={}, item_drops={}, relic_drops={}",
        snapshot.items.len(),
        snapshot.relics.len(),
        snapshot.item_drops.len(),
        snapshot.relic_drops.len()
    );

    match serde_json::to_string_pretty(&snapshot) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to serialize drop table: {err}");
            ExitCode::FAILURE
        }
    }
}
