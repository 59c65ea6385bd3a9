//! Normalize per-member raw calendar events into busy windows.
//!
//! The adapter is the only place raw collaborator payloads are inspected. It does
//! not decide visibility: whatever events the caller hands in are treated as
//! blocking for the member whose list contains them.

use std::collections::BTreeMap;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::MalformedBusyWindow;
use crate::types::{BusyWindow, BusyWindowMap, Instant, MemberId};

/// Length given to events that have a start but no end.
pub const POINT_EVENT_MINUTES: i64 = 60;

/// A calendar event as handed over by the calendar collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub start: Instant,
    #[serde(default)]
    pub end: Option<Instant>,
    /// Reported by the collaborator, currently blocking like any other event.
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub title: Option<String>,
}

impl RawEvent {
    pub fn new(start: Instant, end: Option<Instant>) -> Self {
        Self {
            start,
            end,
            all_day: false,
            title: None,
        }
    }
}

/// Event lists keyed by the member whose calendar they came from.
pub type PerMemberEvents = BTreeMap<MemberId, Vec<RawEvent>>;

/// Turn one raw event into a busy window for `owner_id`.
///
/// A missing end becomes `start + POINT_EVENT_MINUTES`. A point event too close to
/// the end of time to get that hour is malformed.
pub fn normalize_event(
    owner_id: &MemberId,
    event: &RawEvent,
) -> Result<BusyWindow, MalformedBusyWindow> {
    let end = match event.end {
        Some(end) => end,
        None => event
            .start
            .checked_add_signed(Duration::minutes(POINT_EVENT_MINUTES))
            .ok_or_else(|| MalformedBusyWindow {
                owner_id: owner_id.clone(),
                start: event.start,
                end: None,
            })?,
    };
    BusyWindow::new(owner_id.clone(), event.start, end)
}

/// Build the busy-window map for every member in `events`.
///
/// Every member key yields an entry, even when all of its events were dropped, so
/// "no data" stays distinguishable from "not in the group". Malformed events are
/// logged and skipped.
pub fn build_busy_windows(events: &PerMemberEvents) -> BusyWindowMap {
    let mut map = BusyWindowMap::new();
    let mut dropped = 0usize;

    for (member, member_events) in events {
        let mut windows = Vec::with_capacity(member_events.len());
        for event in member_events {
            match normalize_event(member, event) {
                Ok(window) => windows.push(window),
                Err(err) => {
                    dropped += 1;
                    warn!(member = %member, error = %err, "dropping malformed event");
                }
            }
        }
        map.insert(member.clone(), windows);
    }

    debug!(
        members = map.len(),
        windows = map.values().map(Vec::len).sum::<usize>(),
        dropped,
        "built busy windows"
    );

    map
}
