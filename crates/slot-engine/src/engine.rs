//! Grid search over a time range for the slots that suit the most members.
//!
//! Candidate starts are laid out on a fixed grid from `range_start`, every
//! `interval_minutes`, as long as a full `slot_duration_minutes` slot still fits
//! before `range_end`. Each candidate is checked against every queried member's
//! busy windows with half-open overlap, then the whole candidate set is ranked.

use std::collections::BTreeSet;

use chrono::Duration;
use tracing::debug;

use crate::error::Result;
use crate::types::{
    rank_slots, BusyWindow, BusyWindowMap, Instant, MemberId, ScheduleQuery, ScheduleResult,
    SlotResult,
};

/// Compute the best `max_top_slots` slots for `query`.
///
/// # Errors
/// Returns `ScheduleError::InvalidQuery` if the range is empty or inverted, or if any
/// of the interval, duration, or slot limit is zero.
pub fn compute_schedule(query: &ScheduleQuery, busy: &BusyWindowMap) -> Result<ScheduleResult> {
    let mut top_slots = compute_all_slots(query, busy)?;
    top_slots.truncate(query.max_top_slots);
    Ok(ScheduleResult { top_slots })
}

/// Evaluate and rank every candidate slot of `query`, without truncation.
///
/// Zero-availability slots are kept so callers can derive per-day indicators from
/// the full candidate set. An empty member set yields no slots at all.
pub fn compute_all_slots(query: &ScheduleQuery, busy: &BusyWindowMap) -> Result<Vec<SlotResult>> {
    query.validate()?;

    if query.members.is_empty() {
        debug!("no members queried, returning no slots");
        return Ok(Vec::new());
    }

    let calendars = member_calendars(&query.members, busy);
    let duration = Duration::minutes(i64::from(query.slot_duration_minutes));

    let mut slots: Vec<SlotResult> = candidate_starts(query)
        .map(|start| evaluate_slot(&calendars, start, start + duration))
        .collect();

    rank_slots(&mut slots);

    debug!(
        members = query.members.len(),
        candidates = slots.len(),
        "computed schedule"
    );

    Ok(slots)
}

/// Grid starts `range_start + k * interval` whose slot ends at or before `range_end`.
fn candidate_starts(query: &ScheduleQuery) -> impl Iterator<Item = Instant> + '_ {
    let step = Duration::minutes(i64::from(query.interval_minutes));
    let duration = Duration::minutes(i64::from(query.slot_duration_minutes));

    std::iter::successors(Some(query.range_start), move |t| t.checked_add_signed(step))
        .take_while(move |t| {
            t.checked_add_signed(duration)
                .is_some_and(|end| end <= query.range_end)
        })
}

/// A queried member with their busy windows sorted by start.
struct MemberCalendar<'a> {
    member: &'a MemberId,
    windows: Vec<&'a BusyWindow>,
}

impl MemberCalendar<'_> {
    /// Whether any window overlaps `[start, end)`.
    ///
    /// Windows are sorted by start, so the scan stops at the first window that
    /// begins at or after `end`.
    fn is_busy(&self, start: Instant, end: Instant) -> bool {
        self.windows
            .iter()
            .take_while(|w| w.start() < end)
            .any(|w| w.overlaps(start, end))
    }
}

/// Pair every queried member with their windows. Members absent from `busy`
/// have no windows; windows of members outside the query are ignored.
fn member_calendars<'a>(
    members: &'a BTreeSet<MemberId>,
    busy: &'a BusyWindowMap,
) -> Vec<MemberCalendar<'a>> {
    members
        .iter()
        .map(|member| {
            let mut windows: Vec<&BusyWindow> = busy
                .get(member)
                .map(|ws| ws.iter().collect())
                .unwrap_or_default();
            windows.sort_by_key(|w| (w.start(), w.end()));
            MemberCalendar { member, windows }
        })
        .collect()
}

fn evaluate_slot(calendars: &[MemberCalendar<'_>], start: Instant, end: Instant) -> SlotResult {
    let mut available_user_ids = BTreeSet::new();
    let mut unavailable_user_ids = BTreeSet::new();

    for calendar in calendars {
        if calendar.is_busy(start, end) {
            unavailable_user_ids.insert(calendar.member.clone());
        } else {
            available_user_ids.insert(calendar.member.clone());
        }
    }

    SlotResult {
        start,
        end,
        available_count: available_user_ids.len(),
        total_members: calendars.len(),
        available_user_ids,
        unavailable_user_ids,
    }
}
