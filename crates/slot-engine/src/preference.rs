//! Suggested-hours filtering: keep the slots that start inside a time-of-day window
//! and re-rank them.
//!
//! A window `{start_hour, end_hour}` with `end_hour <= start_hour` wraps past
//! midnight, so `{22, 6}` covers 22:00-05:59 and `{0, 0}` covers the whole day.

use std::collections::BTreeMap;

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::types::{rank_slots, SlotResult};

/// Preset that keeps every slot.
pub const ALL_HOURS_PRESET: &str = "all";

/// A time-of-day range in whole hours, `start_hour` inclusive, `end_hour` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct PreferenceWindow {
    start_hour: u32,
    end_hour: u32,
}

#[derive(Deserialize)]
struct RawWindow {
    start_hour: u32,
    end_hour: u32,
}

impl TryFrom<RawWindow> for PreferenceWindow {
    type Error = ScheduleError;

    fn try_from(raw: RawWindow) -> Result<Self> {
        Self::new(raw.start_hour, raw.end_hour)
    }
}

impl PreferenceWindow {
    /// # Errors
    /// Returns `ScheduleError::InvalidPreferenceWindow` if either hour is above 23.
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self> {
        if start_hour > 23 || end_hour > 23 {
            return Err(ScheduleError::InvalidPreferenceWindow {
                start_hour,
                end_hour,
            });
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    /// Whether the window spans midnight.
    pub fn wraps(&self) -> bool {
        self.end_hour <= self.start_hour
    }

    /// Whether hour-of-day `hour` falls inside the window.
    pub fn contains_hour(&self, hour: u32) -> bool {
        if self.wraps() {
            hour >= self.start_hour || hour < self.end_hour
        } else {
            hour >= self.start_hour && hour < self.end_hour
        }
    }

    /// Whether `slot` starts inside the window, using the wall-clock hour of the
    /// slot's own offset.
    pub fn accepts(&self, slot: &SlotResult) -> bool {
        self.contains_hour(slot.start.hour())
    }
}

/// Named preference windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetTable {
    presets: BTreeMap<String, PreferenceWindow>,
}

impl PresetTable {
    /// An empty table; every lookup fails until presets are inserted.
    pub fn empty() -> Self {
        Self {
            presets: BTreeMap::new(),
        }
    }

    /// The presets shipped with the app.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (name, start, end) in [
            (ALL_HOURS_PRESET, 0, 0),
            ("morning", 6, 12),
            ("daytime", 9, 18),
            ("work-hours", 9, 17),
            ("evening", 17, 22),
            ("late-night", 22, 6),
        ] {
            table.presets.insert(
                name.to_string(),
                PreferenceWindow {
                    start_hour: start,
                    end_hour: end,
                },
            );
        }
        table
    }

    /// Add or replace a preset.
    pub fn insert(&mut self, name: impl Into<String>, window: PreferenceWindow) {
        self.presets.insert(name.into(), window);
    }

    pub fn get(&self, name: &str) -> Option<PreferenceWindow> {
        self.presets.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, PreferenceWindow)> {
        self.presets.iter().map(|(name, w)| (name.as_str(), *w))
    }
}

impl Default for PresetTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Either a preset name or an explicit window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceSpec {
    Preset(String),
    Window(PreferenceWindow),
}

impl From<PreferenceWindow> for PreferenceSpec {
    fn from(window: PreferenceWindow) -> Self {
        Self::Window(window)
    }
}

impl From<&str> for PreferenceSpec {
    fn from(name: &str) -> Self {
        Self::Preset(name.to_string())
    }
}

/// Resolve `spec` to a concrete window, looking presets up in `table`.
///
/// # Errors
/// Returns `ScheduleError::UnknownPreset` when the preset name is not in `table`.
pub fn resolve_preference_window(
    spec: &PreferenceSpec,
    table: &PresetTable,
) -> Result<PreferenceWindow> {
    match spec {
        PreferenceSpec::Window(window) => Ok(*window),
        PreferenceSpec::Preset(name) => table
            .get(name)
            .ok_or_else(|| ScheduleError::UnknownPreset(name.clone())),
    }
}

/// Keep the slots that start inside `window` and rank them with the engine's rule.
///
/// An empty result means nothing fits the preferred hours; it never falls back to
/// the unfiltered slots.
pub fn rank_slots_for_preference(
    slots: &[SlotResult],
    window: PreferenceWindow,
) -> Vec<SlotResult> {
    let mut kept: Vec<SlotResult> = slots
        .iter()
        .filter(|slot| window.accepts(slot))
        .cloned()
        .collect();
    rank_slots(&mut kept);

    debug!(
        start_hour = window.start_hour,
        end_hour = window.end_hour,
        before = slots.len(),
        after = kept.len(),
        "filtered slots by preference"
    );

    kept
}
