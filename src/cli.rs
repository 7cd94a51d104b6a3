use std::fmt::Write as _;

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::data::format::{format_chance, time_remaining};
use crate::data::item::Item;
use crate::data::relic::Relic;
use crate::data::worldstate::{WorldCategory, WorldEvent, WorldstateSnapshot};
use crate::server::api::SearchResponse;
use crate::server::{self, AppState};

const USAGE: &str = "usage: tennohub <serve|search <query> [--json]|worldstate [category] [--json]>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Serve,
    Search { query: String, json: bool },
    Worldstate { category: Option<WorldCategory>, json: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError(pub String);

pub fn parse_command(args: &[String]) -> Result<Command, UsageError> {
    let json = args.iter().skip(2).any(|arg| arg == "--json");
    let positional: Vec<&str> = args
        .iter()
        .skip(2)
        .map(String::as_str)
        .filter(|arg| *arg != "--json")
        .collect();

    match args.get(1).map(String::as_str) {
        Some("serve") => Ok(Command::Serve),
        Some("search") => {
            if positional.is_empty() {
                return Err(UsageError(
                    "usage: tennohub search <query> [--json]".to_string(),
                ));
            }
            Ok(Command::Search {
                query: positional.join(" "),
                json,
            })
        }
        Some("worldstate") => {
            let category = match positional.first() {
                None => None,
                Some(slug) => Some(WorldCategory::from_slug(slug).ok_or_else(|| {
                    let known: Vec<&str> =
                        WorldCategory::ALL.iter().map(WorldCategory::as_str).collect();
                    UsageError(format!(
                        "unknown worldstate category '{slug}' (expected one of: {})",
                        known.join(", ")
                    ))
                })?),
            };
            Ok(Command::Worldstate { category, json })
        }
        _ => Err(UsageError(USAGE.to_string())),
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let command = match parse_command(args) {
        Ok(command) => command,
        Err(UsageError(message)) => {
            eprintln!("{message}");
            return 2;
        }
    };

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return 1;
        }
    };
    init_tracing(&config.log_level);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start async runtime: {err}");
            return 1;
        }
    };

    match command {
        Command::Serve => runtime.block_on(handle_serve(&config)),
        Command::Search { query, json } => runtime.block_on(handle_search(&config, &query, json)),
        Command::Worldstate { category, json } => {
            runtime.block_on(handle_worldstate(&config, category, json))
        }
    }
}

/// Install the stderr fmt subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn handle_serve(config: &AppConfig) -> i32 {
    match server::run_server(config).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

async fn handle_search(config: &AppConfig, query: &str, json: bool) -> i32 {
    let (items, relics) = if query.trim().is_empty() {
        (Vec::new(), Vec::new())
    } else {
        let state = match app_state(config) {
            Ok(state) => state,
            Err(code) => return code,
        };
        tokio::join!(
            state.drop_tables.search_items(query),
            state.drop_tables.search_relics(query),
        )
    };

    if json {
        return print_json(&SearchResponse {
            items,
            relics,
            query: query.to_string(),
        });
    }

    print!("{}", render_search(query, &items, &relics));
    0
}

async fn handle_worldstate(config: &AppConfig, category: Option<WorldCategory>, json: bool) -> i32 {
    let state = match app_state(config) {
        Ok(state) => state,
        Err(code) => return code,
    };
    let snapshot = state.worldstate.fetch_worldstate().await;

    if json {
        return match category {
            Some(category) => print_json(&snapshot.category(category)),
            None => print_json(snapshot.as_ref()),
        };
    }

    print!("{}", render_worldstate(&snapshot, category));
    0
}

fn app_state(config: &AppConfig) -> Result<AppState, i32> {
    AppState::from_config(config).map_err(|err| {
        eprintln!("failed to build http client: {err}");
        1
    })
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            1
        }
    }
}

pub fn render_search(query: &str, items: &[Item], relics: &[Relic]) -> String {
    let mut out = String::new();
    if items.is_empty() && relics.is_empty() {
        let _ = writeln!(out, "no results for '{query}'");
        return out;
    }

    if !items.is_empty() {
        let _ = writeln!(out, "items ({}):", items.len());
        for item in items {
            let _ = writeln!(
                out,
                "  {}\t{}\t{}\tMR {}",
                item.name, item.item_type, item.rarity, item.mastery
            );
        }
    }
    if !relics.is_empty() {
        let _ = writeln!(out, "relics ({}):", relics.len());
        for relic in relics {
            let vaulted = if relic.vaulted { " [vaulted]" } else { "" };
            let _ = writeln!(out, "  {}{vaulted}", relic.name);
            for reward in &relic.rewards {
                let _ = writeln!(
                    out,
                    "    {}\t{}\t{}",
                    reward.item,
                    reward.rarity,
                    format_chance(reward.chance)
                );
            }
        }
    }
    out
}

pub fn render_worldstate(snapshot: &WorldstateSnapshot, only: Option<WorldCategory>) -> String {
    let now = Utc::now();
    let categories: Vec<WorldCategory> = match only {
        Some(category) => vec![category],
        None => WorldCategory::ALL.to_vec(),
    };

    let mut out = String::new();
    let _ = writeln!(out, "worldstate as of {}", snapshot.timestamp);
    for category in categories {
        let events = snapshot.category(category);
        let _ = writeln!(out, "{} ({}):", category.title(), events.len());
        for event in events {
            let _ = writeln!(out, "  {}", render_event(event, now));
        }
    }
    out
}

fn render_event(event: &WorldEvent, now: chrono::DateTime<Utc>) -> String {
    let mut line = event.name.clone();
    if let Some(location) = &event.location {
        let _ = write!(line, " @ {location}");
    }
    if let Some(remaining) = event
        .end_time
        .as_deref()
        .and_then(|end| time_remaining(end, now))
    {
        let _ = write!(line, " ({remaining})");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn parses_search_with_multiword_query() {
        let command = parse_command(&args(&["tennohub", "search", "rhino", "prime", "--json"]));
        assert_eq!(
            command,
            Ok(Command::Search {
                query: "rhino prime".to_string(),
                json: true
            })
        );
    }

    #[test]
    fn worldstate_category_is_optional_but_checked() {
        assert_eq!(
            parse_command(&args(&["tennohub", "worldstate"])),
            Ok(Command::Worldstate {
                category: None,
                json: false
            })
        );
        assert_eq!(
            parse_command(&args(&["tennohub", "worldstate", "Fissures"])),
            Ok(Command::Worldstate {
                category: Some(WorldCategory::Fissures),
                json: false
            })
        );
        assert!(parse_command(&args(&["tennohub", "worldstate", "baro"])).is_err());
    }

    #[test]
    fn unknown_or_missing_command_is_usage_error() {
        assert!(parse_command(&args(&["tennohub"])).is_err());
        assert!(parse_command(&args(&["tennohub", "simulate"])).is_err());
        assert!(parse_command(&args(&["tennohub", "search"])).is_err());
    }

    #[test]
    fn empty_search_renders_no_results() {
        assert_eq!(render_search("kuva", &[], &[]), "no results for 'kuva'\n");
    }

    #[test]
    fn worldstate_render_lists_every_category() {
        let snapshot = WorldstateSnapshot::empty(Utc::now());
        let rendered = render_worldstate(&snapshot, None);
        for category in WorldCategory::ALL {
            assert!(rendered.contains(&format!("{} (0):", category.title())));
        }
    }
}
