//! Error types for slot-engine operations.

use thiserror::Error;

use crate::types::{Instant, MemberId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Unknown preset: '{0}'")]
    UnknownPreset(String),

    #[error("Invalid preference window: {start_hour}..{end_hour} (hours must be 0-23)")]
    InvalidPreferenceWindow { start_hour: u32, end_hour: u32 },
}

/// A single raw event that could not be normalized into a busy window.
///
/// Never fatal: the adapter drops the event and keeps the member's other windows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed busy window for '{owner_id}': {}", describe_bounds(.start, .end))]
pub struct MalformedBusyWindow {
    pub owner_id: MemberId,
    pub start: Instant,
    /// `None` when the implied end of a point event is past the last representable instant.
    pub end: Option<Instant>,
}

fn describe_bounds(start: &Instant, end: &Option<Instant>) -> String {
    match end {
        Some(end) => format!("start {} is not before end {}", start, end),
        None => format!("start {} has no representable end", start),
    }
}

/// Failure reported by a [`PreferenceStore`](crate::store::PreferenceStore) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Preference store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference store is corrupt: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
