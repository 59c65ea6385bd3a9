//! Tests for the per-day digest built from a multi-day schedule.

use chrono::{DateTime, FixedOffset, NaiveDate};
use slot_engine::{
    build_busy_windows, compute_all_slots, summarize_days, MemberId, PerMemberEvents, RawEvent,
    ScheduleQuery,
};

fn at(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn three_day_overview_marks_busy_days() {
    let mut events = PerMemberEvents::new();
    events.insert(
        MemberId::from("ana"),
        vec![RawEvent::new(at("2026-03-17T10:00:00Z"), None)],
    );
    events.insert(
        MemberId::from("ben"),
        vec![RawEvent::new(
            at("2026-03-18T00:00:00Z"),
            Some(at("2026-03-19T00:00:00Z")),
        )],
    );

    let busy = build_busy_windows(&events);
    let query = ScheduleQuery::spanning_days(
        events.keys().cloned(),
        at("2026-03-16T00:00:00Z"),
        3,
        60,
        60,
        10,
    )
    .unwrap();
    let slots = compute_all_slots(&query, &busy).unwrap();
    let days = summarize_days(&slots);

    assert_eq!(days.len(), 3);

    assert_eq!(days[0].date, date(2026, 3, 16));
    assert_eq!(days[0].slot_count, 24);
    assert_eq!(days[0].perfect_slot_count, 24);
    assert!(!days[0].has_busy_member);

    assert_eq!(days[1].date, date(2026, 3, 17));
    assert_eq!(days[1].perfect_slot_count, 23);
    assert_eq!(days[1].best_available_count, 2);
    assert!(days[1].has_busy_member);

    assert_eq!(days[2].date, date(2026, 3, 18));
    assert_eq!(days[2].perfect_slot_count, 0);
    assert_eq!(days[2].best_available_count, 1);
    assert!(days[2].has_busy_member);
}

#[test]
fn days_follow_the_slot_offset() {
    // Range starts at local midnight in +09:00, which is 15:00Z the previous day.
    let query = ScheduleQuery::spanning_days(
        [MemberId::from("ana")],
        at("2026-03-16T00:00:00+09:00"),
        1,
        60,
        60,
        10,
    )
    .unwrap();
    let slots = compute_all_slots(&query, &Default::default()).unwrap();
    let days = summarize_days(&slots);

    assert_eq!(days.len(), 1);
    assert_eq!(days[0].date, date(2026, 3, 16));
}

#[test]
fn no_slots_no_days() {
    assert!(summarize_days(&[]).is_empty());
}
