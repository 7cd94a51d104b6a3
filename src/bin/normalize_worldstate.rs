//! Normalize a saved worldstate dump (either upstream encoding) and print the
//! resulting snapshot as JSON.
//!
//! usage: normalize_worldstate <worldstate.json>

use std::fs;
use std::process::ExitCode;

use chrono::Utc;
use tennohub::data::worldstate::{parse_worldstate, WorldstateFormat};

fn main() -> ExitCode {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: normalize_worldstate <worldstate.json>");
        return ExitCode::from(2);
    };

    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("failed to read {path}: {err}");
            return ExitCode::FAILURE;
        }
    };
    let payload: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(payload) => payload,
        Err(err) => {
            eprintln!("{path} is not valid JSON: {err}");
            return ExitCode::FAILURE;
        }
    };

    let format = WorldstateFormat::detect(&payload);
    let snapshot = parse_worldstate(&payload, Utc::now());
    eprintln!(
        "{path}: {format:?} format, {} event(s)",
        snapshot.total_events()
    );

    match serde_json::to_string_pretty(&snapshot) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to serialize snapshot: {err}");
            ExitCode::FAILURE
        }
    }
}
