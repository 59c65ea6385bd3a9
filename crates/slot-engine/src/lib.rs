//! # slot-engine
//!
//! Shared availability scheduling for group event planning.
//!
//! Given each member's calendar, the engine lays a grid of candidate meeting slots
//! over a time range, works out who is free for each one, and ranks them: most
//! available members first, earliest start on ties. A suggested-hours filter then
//! narrows the ranking to a time-of-day window, including windows that wrap past
//! midnight.
//!
//! ```rust
//! use slot_engine::{
//!     build_busy_windows, compute_schedule, MemberId, PerMemberEvents, RawEvent,
//!     ScheduleQuery,
//! };
//!
//! let at = |s: &str| chrono::DateTime::parse_from_rfc3339(s).unwrap();
//!
//! let mut events = PerMemberEvents::new();
//! events.insert(
//!     MemberId::from("ana"),
//!     vec![RawEvent::new(at("2026-03-16T14:00:00Z"), Some(at("2026-03-16T15:00:00Z")))],
//! );
//! events.insert(MemberId::from("ben"), vec![]);
//!
//! let busy = build_busy_windows(&events);
//! let query = ScheduleQuery::new(
//!     events.keys().cloned(),
//!     at("2026-03-16T13:00:00Z"),
//!     at("2026-03-16T16:00:00Z"),
//!     60,
//!     60,
//!     3,
//! );
//!
//! let result = compute_schedule(&query, &busy).unwrap();
//! let starts: Vec<_> = result.top_slots.iter().map(|s| s.start).collect();
//! assert_eq!(
//!     starts,
//!     [at("2026-03-16T13:00:00Z"), at("2026-03-16T15:00:00Z"), at("2026-03-16T14:00:00Z")]
//! );
//! ```
//!
//! ## Modules
//!
//! - [`adapter`]: raw per-member events → busy windows
//! - [`engine`]: candidate grid, availability per slot, ranking
//! - [`preference`]: suggested-hours windows, presets, preference filtering
//! - [`store`]: injected storage for the last-chosen preset
//! - [`overview`]: per-day digest of a multi-day candidate set
//! - [`types`]: canonical data model
//! - [`error`]: Error types

pub mod adapter;
pub mod engine;
pub mod error;
pub mod overview;
pub mod preference;
pub mod store;
pub mod types;

pub use adapter::{build_busy_windows, normalize_event, PerMemberEvents, RawEvent};
pub use engine::{compute_all_slots, compute_schedule};
pub use error::{MalformedBusyWindow, ScheduleError, StoreError};
pub use overview::{summarize_days, DaySummary};
pub use preference::{
    rank_slots_for_preference, resolve_preference_window, PreferenceSpec, PreferenceWindow,
    PresetTable,
};
pub use store::{
    load_preferred_preset, load_preferred_preset_or, save_preferred_preset, MemoryPreferenceStore,
    PreferenceStore,
};
pub use types::{
    rank_order, viable_slots, BusyWindow, BusyWindowMap, Instant, MemberId, ScheduleQuery,
    ScheduleResult, SlotResult,
};
