//! WASM bindings for slot-engine.
//!
//! Exposes busy-window normalization, schedule computation, the per-day overview,
//! and suggested-hours filtering to the JavaScript UI via `wasm-bindgen`. All
//! complex types cross the boundary as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use slot_engine::{
    BusyWindowMap, MemberId, PerMemberEvents, PreferenceSpec, PreferenceWindow, PresetTable,
    RawEvent, ScheduleQuery, SlotResult,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input format for events passed from JavaScript.
#[derive(Deserialize)]
struct EventInput {
    start: String,
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    all_day: bool,
    #[serde(default)]
    title: Option<String>,
}

/// Input format for a schedule query passed from JavaScript.
#[derive(Deserialize)]
struct QueryInput {
    members: Vec<MemberId>,
    range_start: String,
    range_end: String,
    interval_minutes: u32,
    slot_duration_minutes: u32,
    max_top_slots: usize,
}

#[derive(Serialize)]
struct BusyWindowDto {
    start: String,
    end: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string, keeping its offset.
///
/// Accepts RFC 3339 (with offset, e.g., "2026-02-17T14:00:00+01:00") and naive
/// time (e.g., "2026-02-17T14:00:00"), which is interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<FixedOffset>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc().fixed_offset())
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

fn parse_events_json(json: &str) -> Result<PerMemberEvents, String> {
    let inputs: BTreeMap<MemberId, Vec<EventInput>> =
        serde_json::from_str(json).map_err(|e| format!("Invalid events JSON: {}", e))?;

    inputs
        .into_iter()
        .map(|(member, events)| -> Result<(MemberId, Vec<RawEvent>), String> {
            let events = events
                .into_iter()
                .map(|input| -> Result<RawEvent, String> {
                    let start = parse_datetime(&input.start)?;
                    let end = input.end.as_deref().map(parse_datetime).transpose()?;
                    Ok(RawEvent {
                        start,
                        end,
                        all_day: input.all_day,
                        title: input.title,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((member, events))
        })
        .collect()
}

fn parse_query_json(json: &str) -> Result<ScheduleQuery, String> {
    let input: QueryInput =
        serde_json::from_str(json).map_err(|e| format!("Invalid query JSON: {}", e))?;
    Ok(ScheduleQuery::new(
        input.members,
        parse_datetime(&input.range_start)?,
        parse_datetime(&input.range_end)?,
        input.interval_minutes,
        input.slot_duration_minutes,
        input.max_top_slots,
    ))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn busy_for(events_json: &str) -> Result<BusyWindowMap, String> {
    Ok(slot_engine::build_busy_windows(&parse_events_json(events_json)?))
}

// ---------------------------------------------------------------------------
// JSON-in, JSON-out operations (target independent)
// ---------------------------------------------------------------------------

fn build_busy_windows_json(events_json: &str) -> Result<String, String> {
    let busy = busy_for(events_json)?;
    let dtos: BTreeMap<&MemberId, Vec<BusyWindowDto>> = busy
        .iter()
        .map(|(member, windows)| {
            let windows = windows
                .iter()
                .map(|w| BusyWindowDto {
                    start: w.start().to_rfc3339(),
                    end: w.end().to_rfc3339(),
                })
                .collect();
            (member, windows)
        })
        .collect();
    to_json(&dtos)
}

fn compute_schedule_json(query_json: &str, events_json: &str) -> Result<String, String> {
    let query = parse_query_json(query_json)?;
    let busy = busy_for(events_json)?;
    let result = slot_engine::compute_schedule(&query, &busy).map_err(|e| e.to_string())?;
    to_json(&result)
}

fn summarize_days_json(query_json: &str, events_json: &str) -> Result<String, String> {
    let query = parse_query_json(query_json)?;
    let busy = busy_for(events_json)?;
    let slots = slot_engine::compute_all_slots(&query, &busy).map_err(|e| e.to_string())?;
    to_json(&slot_engine::summarize_days(&slots))
}

fn resolve_preference_window_json(spec_json: &str) -> Result<String, String> {
    let spec: PreferenceSpec =
        serde_json::from_str(spec_json).map_err(|e| format!("Invalid preference JSON: {}", e))?;
    let window = slot_engine::resolve_preference_window(&spec, &PresetTable::builtin())
        .map_err(|e| e.to_string())?;
    to_json(&window)
}

fn rank_slots_for_preference_json(slots_json: &str, window_json: &str) -> Result<String, String> {
    let slots: Vec<SlotResult> =
        serde_json::from_str(slots_json).map_err(|e| format!("Invalid slots JSON: {}", e))?;
    let window: PreferenceWindow =
        serde_json::from_str(window_json).map_err(|e| format!("Invalid window JSON: {}", e))?;
    to_json(&slot_engine::rank_slots_for_preference(&slots, window))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

fn js_err(message: String) -> JsValue {
    JsValue::from_str(&message)
}

/// Normalize per-member events into busy windows.
///
/// `events_json` is an object mapping member ids to arrays of
/// `{start, end?, all_day?, title?}`. Events without an end last one hour;
/// malformed events are dropped. Returns a JSON object mapping member ids to
/// arrays of `{start, end}`.
#[wasm_bindgen(js_name = "buildBusyWindows")]
pub fn build_busy_windows(events_json: &str) -> Result<String, JsValue> {
    build_busy_windows_json(events_json).map_err(js_err)
}

/// Rank candidate slots for a group.
///
/// `query_json` is `{members, range_start, range_end, interval_minutes,
/// slot_duration_minutes, max_top_slots}`; `events_json` is the same shape as for
/// [`build_busy_windows`]. Returns `{top_slots: [...]}`.
#[wasm_bindgen(js_name = "computeSchedule")]
pub fn compute_schedule(query_json: &str, events_json: &str) -> Result<String, JsValue> {
    compute_schedule_json(query_json, events_json).map_err(js_err)
}

/// Per-day digest of every candidate slot in the query range.
#[wasm_bindgen(js_name = "summarizeDays")]
pub fn summarize_days(query_json: &str, events_json: &str) -> Result<String, JsValue> {
    summarize_days_json(query_json, events_json).map_err(js_err)
}

/// Resolve a preset name (JSON string) or an explicit `{start_hour, end_hour}`
/// window against the built-in preset table.
#[wasm_bindgen(js_name = "resolvePreferenceWindow")]
pub fn resolve_preference_window(spec_json: &str) -> Result<String, JsValue> {
    resolve_preference_window_json(spec_json).map_err(js_err)
}

/// Keep the slots (as returned by `computeSchedule`) that start inside the window,
/// re-ranked.
#[wasm_bindgen(js_name = "rankSlotsForPreference")]
pub fn rank_slots_for_preference(slots_json: &str, window_json: &str) -> Result<String, JsValue> {
    rank_slots_for_preference_json(slots_json, window_json).map_err(js_err)
}
