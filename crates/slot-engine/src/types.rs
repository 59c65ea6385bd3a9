//! Canonical data model shared by the adapter, the engine, and the preference filter.
//!
//! Everything here is validated once at construction. The engine and filter only
//! ever see these types, never raw collaborator payloads.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{MalformedBusyWindow, Result, ScheduleError};

/// An absolute point in time carrying the caller's UTC offset.
///
/// Comparisons use the absolute instant; the offset only matters when the
/// preference filter or the day overview asks for a wall-clock hour or date.
pub type Instant = DateTime<FixedOffset>;

/// Opaque member identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MemberId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A half-open interval `[start, end)` during which `owner_id` is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusyWindow {
    owner_id: MemberId,
    start: Instant,
    end: Instant,
}

impl BusyWindow {
    /// Build a window, rejecting empty or inverted intervals.
    pub fn new(
        owner_id: MemberId,
        start: Instant,
        end: Instant,
    ) -> std::result::Result<Self, MalformedBusyWindow> {
        if start >= end {
            return Err(MalformedBusyWindow {
                owner_id,
                start,
                end: Some(end),
            });
        }
        Ok(Self {
            owner_id,
            start,
            end,
        })
    }

    pub fn owner_id(&self) -> &MemberId {
        &self.owner_id
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn end(&self) -> Instant {
        self.end
    }

    /// Half-open overlap with `[start, end)`.
    ///
    /// Touching intervals (one ends exactly when the other starts) do not overlap.
    pub fn overlaps(&self, start: Instant, end: Instant) -> bool {
        self.start < end && self.end > start
    }
}

/// Busy windows per member, as produced by the adapter.
pub type BusyWindowMap = BTreeMap<MemberId, Vec<BusyWindow>>;

/// Parameters of one availability computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleQuery {
    pub members: BTreeSet<MemberId>,
    pub range_start: Instant,
    pub range_end: Instant,
    pub interval_minutes: u32,
    pub slot_duration_minutes: u32,
    pub max_top_slots: usize,
}

impl ScheduleQuery {
    pub fn new(
        members: impl IntoIterator<Item = MemberId>,
        range_start: Instant,
        range_end: Instant,
        interval_minutes: u32,
        slot_duration_minutes: u32,
        max_top_slots: usize,
    ) -> Self {
        Self {
            members: members.into_iter().collect(),
            range_start,
            range_end,
            interval_minutes,
            slot_duration_minutes,
            max_top_slots,
        }
    }

    /// A query covering `days` whole days from `start`.
    ///
    /// Used both for the multi-day overview and for a single selected day
    /// (`days = 1`); both go through the same engine entry point. Fails with
    /// [`ScheduleError::InvalidQuery`] when the range end is not representable.
    pub fn spanning_days(
        members: impl IntoIterator<Item = MemberId>,
        start: Instant,
        days: u32,
        interval_minutes: u32,
        slot_duration_minutes: u32,
        max_top_slots: usize,
    ) -> Result<Self> {
        let end = start
            .checked_add_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| {
                ScheduleError::InvalidQuery(format!(
                    "{} days from {} is out of range",
                    days,
                    start.to_rfc3339()
                ))
            })?;
        Ok(Self::new(
            members,
            start,
            end,
            interval_minutes,
            slot_duration_minutes,
            max_top_slots,
        ))
    }

    /// Check the range and the grid parameters.
    pub fn validate(&self) -> Result<()> {
        if self.range_start >= self.range_end {
            return Err(ScheduleError::InvalidQuery(format!(
                "range start {} must be before range end {}",
                self.range_start.to_rfc3339(),
                self.range_end.to_rfc3339()
            )));
        }
        if self.interval_minutes == 0 {
            return Err(ScheduleError::InvalidQuery(
                "interval_minutes must be positive".to_string(),
            ));
        }
        if self.slot_duration_minutes == 0 {
            return Err(ScheduleError::InvalidQuery(
                "slot_duration_minutes must be positive".to_string(),
            ));
        }
        if self.max_top_slots == 0 {
            return Err(ScheduleError::InvalidQuery(
                "max_top_slots must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// One evaluated candidate slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotResult {
    pub start: Instant,
    pub end: Instant,
    pub available_user_ids: BTreeSet<MemberId>,
    pub unavailable_user_ids: BTreeSet<MemberId>,
    pub available_count: usize,
    pub total_members: usize,
}

impl SlotResult {
    /// Everyone queried is free, and at least one person was queried.
    pub fn is_perfect(&self) -> bool {
        self.total_members > 0 && self.available_count == self.total_members
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Ranking rule shared by the engine and the preference filter:
/// more available members first, earlier start breaks ties.
pub fn rank_order(a: &SlotResult, b: &SlotResult) -> Ordering {
    b.available_count
        .cmp(&a.available_count)
        .then_with(|| a.start.cmp(&b.start))
}

/// Sort slots in place with [`rank_order`].
pub fn rank_slots(slots: &mut [SlotResult]) {
    slots.sort_by(rank_order);
}

/// Drop slots nobody can attend.
pub fn viable_slots(slots: &[SlotResult]) -> Vec<SlotResult> {
    slots
        .iter()
        .filter(|slot| slot.available_count > 0)
        .cloned()
        .collect()
}

/// Ranked output of [`compute_schedule`](crate::engine::compute_schedule).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub top_slots: Vec<SlotResult>,
}
