use anyhow::{Context, Result};
use serde::Deserialize;
use slot_engine::store::DEFAULT_PRESET;
use slot_engine::{PreferenceWindow, PresetTable};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Grid parameters used when a request omits them
    #[serde(default)]
    pub defaults: GridDefaults,

    /// Preset applied when no preference has been stored yet
    #[serde(default = "default_preset")]
    pub default_preset: String,

    /// Extra or overriding suggested-hours presets
    #[serde(default)]
    pub presets: BTreeMap<String, PreferenceWindow>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridDefaults {
    #[serde(default = "default_interval")]
    pub interval_minutes: u32,
    #[serde(default = "default_duration")]
    pub slot_duration_minutes: u32,
    #[serde(default = "default_top")]
    pub max_top_slots: usize,
}

impl Default for GridDefaults {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval(),
            slot_duration_minutes: default_duration(),
            max_top_slots: default_top(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: GridDefaults::default(),
            default_preset: default_preset(),
            presets: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Built-in presets with the configured ones layered on top.
    pub fn preset_table(&self) -> PresetTable {
        let mut table = PresetTable::builtin();
        for (name, window) in &self.presets {
            table.insert(name.clone(), *window);
        }
        table
    }
}

fn default_interval() -> u32 {
    30
}

fn default_duration() -> u32 {
    60
}

fn default_top() -> usize {
    5
}

fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}

/// Get the config file path (~/.config/slot-engine/config.toml)
pub fn default_config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("slot-engine");
    Ok(dir.join("config.toml"))
}

/// Get the preference file path (~/.local/share/slot-engine/preferences.json)
pub fn default_state_path() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("Could not determine data directory")?
        .join("slot-engine");
    Ok(dir.join("preferences.json"))
}

/// Load config from `path`, or from the default location when `path` is `None`.
///
/// A missing file at the default location yields the built-in defaults; an
/// explicitly requested file must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (default_config_path()?, false),
    };

    if !path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", path.display());
        }
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    parse_config(&contents)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.preset_table().get(&config.default_preset).is_none() {
        anyhow::bail!(
            "default_preset '{}' is not a known preset",
            config.default_preset
        );
    }
    Ok(config)
}
