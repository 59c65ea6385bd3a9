//! Tests for suggested-hours resolution and filtering.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset};
use slot_engine::{
    compute_all_slots, rank_slots_for_preference, resolve_preference_window, BusyWindow,
    BusyWindowMap, MemberId, PreferenceSpec, PreferenceWindow, PresetTable, ScheduleError,
    ScheduleQuery, SlotResult,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn at(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

/// A slot with `available` of `total` members free.
fn slot(start: &str, minutes: i64, available: usize, total: usize) -> SlotResult {
    let start = at(start);
    let everyone: Vec<MemberId> = (0..total).map(|i| MemberId::new(format!("m{i}"))).collect();
    let available_user_ids: BTreeSet<MemberId> = everyone[..available].iter().cloned().collect();
    let unavailable_user_ids: BTreeSet<MemberId> = everyone[available..].iter().cloned().collect();
    SlotResult {
        start,
        end: start + chrono::Duration::minutes(minutes),
        available_user_ids,
        unavailable_user_ids,
        available_count: available,
        total_members: total,
    }
}

fn window(start: u32, end: u32) -> PreferenceWindow {
    PreferenceWindow::new(start, end).unwrap()
}

fn starts(slots: &[SlotResult]) -> Vec<DateTime<FixedOffset>> {
    slots.iter().map(|s| s.start).collect()
}

// ── Resolution ──────────────────────────────────────────────────────────────

#[test]
fn builtin_work_hours_preset_resolves() {
    let table = PresetTable::builtin();
    let resolved = resolve_preference_window(&PreferenceSpec::from("work-hours"), &table).unwrap();
    assert_eq!(resolved, window(9, 17));
}

#[test]
fn explicit_window_resolves_to_itself() {
    let table = PresetTable::empty();
    let resolved = resolve_preference_window(&PreferenceSpec::from(window(22, 6)), &table).unwrap();
    assert_eq!(resolved, window(22, 6));
}

#[test]
fn unknown_preset_is_an_error() {
    let table = PresetTable::builtin();
    let err = resolve_preference_window(&PreferenceSpec::from("brunch"), &table).unwrap_err();
    assert_eq!(err, ScheduleError::UnknownPreset("brunch".to_string()));
}

#[test]
fn custom_presets_extend_and_override() {
    let mut table = PresetTable::builtin();
    table.insert("brunch", window(10, 14));
    table.insert("evening", window(18, 23));

    assert_eq!(
        resolve_preference_window(&PreferenceSpec::from("brunch"), &table).unwrap(),
        window(10, 14)
    );
    assert_eq!(
        resolve_preference_window(&PreferenceSpec::from("evening"), &table).unwrap(),
        window(18, 23)
    );
}

#[test]
fn builtin_table_lists_all_presets() {
    let table = PresetTable::builtin();
    let names: Vec<&str> = table.names().collect();
    for expected in ["all", "daytime", "evening", "late-night", "morning", "work-hours"] {
        assert!(names.contains(&expected), "missing preset {expected}");
    }
}

// ── Filtering ───────────────────────────────────────────────────────────────

#[test]
fn work_hours_drop_a_slot_starting_before_nine() {
    let slots = vec![
        slot("2026-03-16T08:30:00Z", 60, 2, 2),
        slot("2026-03-16T10:00:00Z", 60, 2, 2),
    ];

    let kept = rank_slots_for_preference(&slots, window(9, 17));
    assert_eq!(starts(&kept), vec![at("2026-03-16T10:00:00Z")]);
}

#[test]
fn overnight_window_accepts_late_and_early_hours() {
    let slots = vec![
        slot("2026-03-16T23:00:00Z", 60, 1, 1),
        slot("2026-03-17T02:00:00Z", 60, 1, 1),
        slot("2026-03-17T10:00:00Z", 60, 1, 1),
    ];

    let kept = rank_slots_for_preference(&slots, window(22, 6));
    assert_eq!(
        starts(&kept),
        vec![at("2026-03-16T23:00:00Z"), at("2026-03-17T02:00:00Z")]
    );
}

#[test]
fn filtered_slots_are_re_ranked() {
    // Input deliberately out of rank order.
    let slots = vec![
        slot("2026-03-16T11:00:00Z", 60, 1, 3),
        slot("2026-03-16T07:00:00Z", 60, 3, 3),
        slot("2026-03-16T14:00:00Z", 60, 3, 3),
        slot("2026-03-16T10:00:00Z", 60, 3, 3),
        slot("2026-03-16T12:00:00Z", 60, 2, 3),
    ];

    let kept = rank_slots_for_preference(&slots, window(9, 17));
    assert_eq!(
        starts(&kept),
        vec![
            at("2026-03-16T10:00:00Z"),
            at("2026-03-16T14:00:00Z"),
            at("2026-03-16T12:00:00Z"),
            at("2026-03-16T11:00:00Z"),
        ]
    );
}

#[test]
fn nothing_in_preferred_hours_stays_empty() {
    let slots = vec![
        slot("2026-03-16T07:00:00Z", 60, 2, 2),
        slot("2026-03-16T20:00:00Z", 60, 2, 2),
    ];

    let kept = rank_slots_for_preference(&slots, window(9, 17));
    assert!(kept.is_empty());
}

#[test]
fn all_preset_keeps_everything() {
    let slots = vec![
        slot("2026-03-16T00:00:00Z", 60, 1, 1),
        slot("2026-03-16T12:00:00Z", 60, 1, 1),
        slot("2026-03-16T23:00:00Z", 60, 1, 1),
    ];
    let all = PresetTable::builtin().get("all").unwrap();

    assert_eq!(rank_slots_for_preference(&slots, all).len(), 3);
}

#[test]
fn hour_comes_from_the_slot_offset() {
    // 08:00Z is 10:00 at +02:00; the wall-clock hour in the carried offset counts.
    let slots = vec![slot("2026-03-16T10:00:00+02:00", 60, 1, 1)];

    let kept = rank_slots_for_preference(&slots, window(9, 17));
    assert_eq!(kept.len(), 1);
}

#[test]
fn filtering_engine_output_matches_manual_selection() {
    let mut busy = BusyWindowMap::new();
    busy.insert(
        MemberId::from("a"),
        vec![BusyWindow::new(
            MemberId::from("a"),
            at("2026-03-16T10:00:00Z"),
            at("2026-03-16T12:00:00Z"),
        )
        .unwrap()],
    );
    let query = ScheduleQuery::new(
        [MemberId::from("a"), MemberId::from("b")],
        at("2026-03-16T06:00:00Z"),
        at("2026-03-16T20:00:00Z"),
        60,
        60,
        100,
    );

    let all = compute_all_slots(&query, &busy).unwrap();
    let kept = rank_slots_for_preference(&all, window(9, 13));

    // 09 (2), 12 (2), 10 (1), 11 (1)
    assert_eq!(
        starts(&kept),
        vec![
            at("2026-03-16T09:00:00Z"),
            at("2026-03-16T12:00:00Z"),
            at("2026-03-16T10:00:00Z"),
            at("2026-03-16T11:00:00Z"),
        ]
    );
}
