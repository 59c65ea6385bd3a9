use chrono::{DateTime, Duration};
use criterion::{criterion_group, criterion_main, Criterion};
use slot_engine::{
    build_busy_windows, compute_schedule, MemberId, PerMemberEvents, RawEvent, ScheduleQuery,
};
use std::hint::black_box;

/// Eight members, one meeting every three hours each, over two weeks.
fn two_week_group() -> (ScheduleQuery, PerMemberEvents) {
    let start = DateTime::parse_from_rfc3339("2026-03-16T00:00:00Z").unwrap();
    let mut events = PerMemberEvents::new();
    for m in 0..8 {
        let member = MemberId::new(format!("member-{m}"));
        let list = (0..112)
            .map(|i| {
                let s = start + Duration::minutes(i * 180 + m * 20);
                RawEvent::new(s, Some(s + Duration::minutes(45)))
            })
            .collect();
        events.insert(member, list);
    }
    let query = ScheduleQuery::spanning_days(events.keys().cloned(), start, 14, 30, 60, 10)
        .expect("two weeks from 2026 is in range");
    (query, events)
}

fn bench_grid(c: &mut Criterion) {
    let (query, events) = two_week_group();
    let busy = build_busy_windows(&events);

    c.bench_function("compute_schedule_14d_30m_8_members", |b| {
        b.iter(|| compute_schedule(black_box(&query), black_box(&busy)).unwrap())
    });
}

criterion_group!(benches, bench_grid);
criterion_main!(benches);
