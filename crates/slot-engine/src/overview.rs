//! Per-day digest of a multi-day candidate set.
//!
//! Built from the untruncated output of
//! [`compute_all_slots`](crate::engine::compute_all_slots), so days with no viable
//! slot still show up.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::SlotResult;

/// Availability digest for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Date of the slot starts, in the offset the slots carry.
    pub date: NaiveDate,
    pub slot_count: usize,
    pub best_available_count: usize,
    pub perfect_slot_count: usize,
    /// At least one member is busy during at least one slot of the day.
    pub has_busy_member: bool,
}

/// Group `slots` by the local date of their start, ordered by date.
pub fn summarize_days(slots: &[SlotResult]) -> Vec<DaySummary> {
    let mut days: BTreeMap<NaiveDate, DaySummary> = BTreeMap::new();

    for slot in slots {
        let date = slot.start.date_naive();
        let day = days.entry(date).or_insert_with(|| DaySummary {
            date,
            slot_count: 0,
            best_available_count: 0,
            perfect_slot_count: 0,
            has_busy_member: false,
        });
        day.slot_count += 1;
        day.best_available_count = day.best_available_count.max(slot.available_count);
        if slot.is_perfect() {
            day.perfect_slot_count += 1;
        }
        if !slot.unavailable_user_ids.is_empty() {
            day.has_busy_member = true;
        }
    }

    days.into_values().collect()
}
