//! `slots` CLI: find meeting slots that suit a group, from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Rank slots for a request (stdin → stdout), filtered by the stored suggested hours
//! slots schedule < request.json
//!
//! # Override the suggested hours for one run
//! slots schedule -i request.json --preset evening
//! slots schedule -i request.json --hours 22-6
//!
//! # Per-day digest of the whole range
//! slots overview -i request.json
//!
//! # Normalized busy windows per member
//! slots busy -i request.json
//!
//! # List presets, remember one
//! slots presets
//! slots prefer work-hours
//! ```

mod config;
mod request;
mod store;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use slot_engine::{
    build_busy_windows, compute_all_slots, load_preferred_preset_or, rank_slots_for_preference,
    resolve_preference_window, save_preferred_preset, summarize_days, viable_slots, PreferenceSpec,
    PreferenceWindow, PresetTable, ScheduleError, SlotResult,
};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::Config;
use crate::request::ScheduleRequest;
use crate::store::JsonFilePreferenceStore;

#[derive(Parser)]
#[command(name = "slots", version, about = "Group availability slot finder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ~/.config/slot-engine/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Preference file (defaults to ~/.local/share/slot-engine/preferences.json)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); overrides RUST_LOG
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank candidate slots, filtered by suggested hours
    Schedule {
        /// Input request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Suggested-hours preset to apply for this run
        #[arg(long, conflicts_with_all = ["hours", "no_preference"])]
        preset: Option<String>,
        /// Explicit hour window, e.g. "9-17" or "22-6"
        #[arg(long, conflicts_with = "no_preference")]
        hours: Option<String>,
        /// Skip suggested-hours filtering
        #[arg(long)]
        no_preference: bool,
        /// Maximum number of slots to return
        #[arg(long)]
        top: Option<usize>,
    },
    /// Summarize availability per day over the whole range
    Overview {
        /// Input request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print the normalized busy windows per member
    Busy {
        /// Input request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List the available suggested-hours presets
    Presets,
    /// Show or set the remembered suggested-hours preset
    Prefer {
        /// Preset to remember (prints the current one if omitted)
        preset: Option<String>,
    },
}

/// Outcome of a schedule run, so "nothing in preferred hours" is distinguishable
/// from "nobody is free".
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum ScheduleStatus {
    Ok,
    NoSlotsInPreferredHours,
    NoAvailability,
}

#[derive(Serialize)]
struct AppliedPreference {
    preset: Option<String>,
    #[serde(flatten)]
    window: PreferenceWindow,
}

#[derive(Serialize)]
struct ScheduleOutput {
    status: ScheduleStatus,
    preference: Option<AppliedPreference>,
    top_slots: Vec<SlotResult>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = config::load_config(cli.config.as_deref())?;
    let state_path = match cli.state {
        Some(path) => path,
        None => config::default_state_path()?,
    };
    let store = JsonFilePreferenceStore::new(state_path);

    match cli.command {
        Commands::Schedule {
            input,
            output,
            preset,
            hours,
            no_preference,
            top,
        } => {
            let request = ScheduleRequest::parse(&read_input(input.as_deref())?)?;
            let query = request.to_query(&config.defaults, top)?;
            let busy = build_busy_windows(&request.events);
            let all = compute_all_slots(&query, &busy).context("Failed to compute schedule")?;

            let table = config.preset_table();
            let applied = if no_preference {
                None
            } else {
                Some(choose_preference(
                    preset.as_deref(),
                    hours.as_deref(),
                    request.preference.as_ref(),
                    &table,
                    &config,
                    &store,
                )?)
            };

            let mut top_slots = match &applied {
                Some(pref) => rank_slots_for_preference(&all, pref.window),
                None => all.clone(),
            };
            top_slots.truncate(query.max_top_slots);

            let status = if viable_slots(&all).is_empty() {
                ScheduleStatus::NoAvailability
            } else if viable_slots(&top_slots).is_empty() {
                ScheduleStatus::NoSlotsInPreferredHours
            } else {
                ScheduleStatus::Ok
            };
            if status != ScheduleStatus::Ok {
                warn!(?status, "no recommendation");
            }

            let out = ScheduleOutput {
                status,
                preference: applied,
                top_slots,
            };
            write_output(output.as_deref(), &serde_json::to_string_pretty(&out)?)?;
        }
        Commands::Overview { input, output } => {
            let request = ScheduleRequest::parse(&read_input(input.as_deref())?)?;
            let query = request.to_query(&config.defaults, None)?;
            let busy = build_busy_windows(&request.events);
            let all = compute_all_slots(&query, &busy).context("Failed to compute schedule")?;
            let days = summarize_days(&all);
            write_output(output.as_deref(), &serde_json::to_string_pretty(&days)?)?;
        }
        Commands::Busy { input } => {
            let request = ScheduleRequest::parse(&read_input(input.as_deref())?)?;
            let busy = build_busy_windows(&request.events);
            println!("{}", serde_json::to_string_pretty(&busy)?);
        }
        Commands::Presets => {
            let table = config.preset_table();
            let current = load_preferred_preset_or(&store, &config.default_preset);
            for (name, window) in table.iter() {
                let marker = if name == current { "*" } else { " " };
                let wraps = if window.wraps() { "  (overnight)" } else { "" };
                println!(
                    "{} {:<12} {:02}:00-{:02}:00{}",
                    marker,
                    name,
                    window.start_hour(),
                    window.end_hour(),
                    wraps
                );
            }
        }
        Commands::Prefer { preset } => match preset {
            Some(name) => {
                let table = config.preset_table();
                resolve_preference_window(&PreferenceSpec::Preset(name.clone()), &table)
                    .with_context(|| format!("Available presets: {}", preset_names(&table)))?;
                save_preferred_preset(&store, &name)
                    .context("Failed to save suggested hours preference")?;
                info!(preset = %name, "saved suggested hours");
                println!("Suggested hours set to '{}'", name);
            }
            None => {
                println!("{}", load_preferred_preset_or(&store, &config.default_preset));
            }
        },
    }

    Ok(())
}

/// Pick the window for a schedule run.
///
/// Precedence: `--hours`, `--preset`, the request's own preference, the stored
/// preset, then the configured default. A stored preset that no longer resolves
/// falls back to the configured default; an explicit unknown preset is an error.
fn choose_preference(
    preset: Option<&str>,
    hours: Option<&str>,
    requested: Option<&PreferenceSpec>,
    table: &PresetTable,
    config: &Config,
    store: &JsonFilePreferenceStore,
) -> Result<AppliedPreference> {
    if let Some(raw) = hours {
        let window = parse_hours(raw)?;
        return Ok(applied(None, window));
    }

    let explicit = preset
        .map(|name| PreferenceSpec::Preset(name.to_string()))
        .or_else(|| requested.cloned());
    if let Some(spec) = explicit {
        let window = resolve_preference_window(&spec, table)
            .with_context(|| format!("Available presets: {}", preset_names(table)))?;
        let name = match spec {
            PreferenceSpec::Preset(name) => Some(name),
            PreferenceSpec::Window(_) => None,
        };
        return Ok(applied(name, window));
    }

    let stored = load_preferred_preset_or(store, &config.default_preset);
    match resolve_preference_window(&PreferenceSpec::Preset(stored.clone()), table) {
        Ok(window) => Ok(applied(Some(stored), window)),
        Err(ScheduleError::UnknownPreset(name)) => {
            warn!(preset = %name, "stored preset is unknown, using default");
            let fallback = PreferenceSpec::Preset(config.default_preset.clone());
            let window = resolve_preference_window(&fallback, table)?;
            Ok(applied(Some(config.default_preset.clone()), window))
        }
        Err(err) => Err(err.into()),
    }
}

fn applied(preset: Option<String>, window: PreferenceWindow) -> AppliedPreference {
    AppliedPreference { preset, window }
}

/// Parse "START-END" in whole hours, e.g. "9-17" or "22-6".
fn parse_hours(raw: &str) -> Result<PreferenceWindow> {
    let (start, end) = raw
        .split_once('-')
        .with_context(|| format!("Invalid hours '{}': expected START-END, e.g. 9-17", raw))?;
    let start: u32 = start
        .trim()
        .parse()
        .with_context(|| format!("Invalid start hour in '{}'", raw))?;
    let end: u32 = end
        .trim()
        .parse()
        .with_context(|| format!("Invalid end hour in '{}'", raw))?;
    Ok(PreferenceWindow::new(start, end)?)
}

fn preset_names(table: &PresetTable) -> String {
    table.names().collect::<Vec<_>>().join(", ")
}

/// `-v` flags win over `RUST_LOG`, which accepts full directives such as
/// `slot_engine=debug`. Without either, only warnings are shown.
fn log_filter(verbose: u8) -> EnvFilter {
    let level = match verbose {
        0 => {
            return EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        }
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::new(level)
}

fn init_logging(verbose: u8) {
    FmtSubscriber::builder()
        .with_env_filter(log_filter(verbose))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hour_ranges() {
        assert_eq!(parse_hours("9-17").unwrap(), PreferenceWindow::new(9, 17).unwrap());
        assert_eq!(parse_hours(" 22 - 6 ").unwrap(), PreferenceWindow::new(22, 6).unwrap());
        assert!(parse_hours("9").is_err());
        assert!(parse_hours("9-24").is_err());
        assert!(parse_hours("a-b").is_err());
    }
}
