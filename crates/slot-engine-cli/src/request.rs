//! JSON request format accepted by the `schedule`, `overview`, and `busy` commands.

use anyhow::{Context, Result};
use serde::Deserialize;
use slot_engine::{Instant, MemberId, PerMemberEvents, PreferenceSpec, ScheduleQuery};

use crate::config::GridDefaults;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleRequest {
    /// Members to schedule for; defaults to every member with an event list
    #[serde(default)]
    pub members: Option<Vec<MemberId>>,
    #[serde(default)]
    pub range_start: Option<Instant>,
    #[serde(default)]
    pub range_end: Option<Instant>,
    #[serde(default)]
    pub interval_minutes: Option<u32>,
    #[serde(default)]
    pub slot_duration_minutes: Option<u32>,
    #[serde(default)]
    pub max_top_slots: Option<usize>,
    /// Preset name or explicit `{start_hour, end_hour}` window
    #[serde(default)]
    pub preference: Option<PreferenceSpec>,
    #[serde(default)]
    pub events: PerMemberEvents,
}

impl ScheduleRequest {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse schedule request JSON")
    }

    /// Build the engine query, filling gaps from `defaults`.
    pub fn to_query(
        &self,
        defaults: &GridDefaults,
        top_override: Option<usize>,
    ) -> Result<ScheduleQuery> {
        let range_start = self.range_start.context("request is missing range_start")?;
        let range_end = self.range_end.context("request is missing range_end")?;
        let members: Vec<MemberId> = match &self.members {
            Some(members) => members.clone(),
            None => self.events.keys().cloned().collect(),
        };

        Ok(ScheduleQuery::new(
            members,
            range_start,
            range_end,
            self.interval_minutes.unwrap_or(defaults.interval_minutes),
            self.slot_duration_minutes
                .unwrap_or(defaults.slot_duration_minutes),
            top_override
                .or(self.max_top_slots)
                .unwrap_or(defaults.max_top_slots),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_default_to_event_owners() {
        let request = ScheduleRequest::parse(
            r#"{
                "range_start": "2026-03-16T09:00:00Z",
                "range_end": "2026-03-16T17:00:00Z",
                "events": {"ana": [], "ben": []}
            }"#,
        )
        .unwrap();
        let query = request.to_query(&GridDefaults::default(), None).unwrap();

        assert_eq!(query.members.len(), 2);
        assert_eq!(query.interval_minutes, 30);
        assert_eq!(query.max_top_slots, 5);
    }

    #[test]
    fn explicit_fields_win_over_defaults() {
        let request = ScheduleRequest::parse(
            r#"{
                "members": ["ana"],
                "range_start": "2026-03-16T09:00:00Z",
                "range_end": "2026-03-16T17:00:00Z",
                "interval_minutes": 15,
                "max_top_slots": 2,
                "events": {"ana": [], "ben": []}
            }"#,
        )
        .unwrap();

        let query = request.to_query(&GridDefaults::default(), None).unwrap();
        assert_eq!(query.members.len(), 1);
        assert_eq!(query.interval_minutes, 15);
        assert_eq!(query.max_top_slots, 2);

        let query = request.to_query(&GridDefaults::default(), Some(7)).unwrap();
        assert_eq!(query.max_top_slots, 7);
    }

    #[test]
    fn missing_range_is_reported() {
        let request = ScheduleRequest::parse(r#"{"events": {}}"#).unwrap();
        assert!(request.to_query(&GridDefaults::default(), None).is_err());
    }
}
