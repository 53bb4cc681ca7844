use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::geo::{haversine_km, Coordinates};

use super::error::EventError;
use super::requests::{EventPatch, NewEvent};
use super::types::{DistanceBucket, EventId, PaceCategory, RunEvent, UserId};

/// Filters events hosted by the given business.
pub fn filter_by_host(events: &[RunEvent], host_id: UserId) -> Vec<RunEvent> {
    events
        .iter()
        .filter(|event| event.host_id == host_id)
        .cloned()
        .collect()
}

/// Finds an event by ID in a collection.
pub fn find_event(events: &[RunEvent], id: EventId) -> Option<&RunEvent> {
    events.iter().find(|event| event.id == id)
}

/// Returns events starting after `now`, soonest first.
pub fn upcoming_events(events: &[RunEvent], now: DateTime<Utc>) -> Vec<RunEvent> {
    let mut upcoming: Vec<RunEvent> = events
        .iter()
        .filter(|event| event.is_upcoming(now))
        .cloned()
        .collect();
    upcoming.sort_by_key(|event| event.starts_at);
    upcoming
}

/// Sets `current_participants` from a per-event registration count.
///
/// Events without registrations get zero.
pub fn apply_participant_counts(events: &mut [RunEvent], counts: &HashMap<EventId, u32>) {
    for event in events.iter_mut() {
        event.current_participants = counts.get(&event.id).copied().unwrap_or(0);
    }
}

/// Criteria for browsing runs. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunFilter {
    /// Accepted pace categories. Empty means any.
    pub pace: Vec<PaceCategory>,
    /// Accepted distance buckets. Empty means any.
    pub distance: Vec<DistanceBucket>,
    /// Only runs on this (UTC) calendar day.
    pub date: Option<NaiveDate>,
    /// Case-insensitive substring of the location or address.
    pub location: Option<String>,
    /// Sorts by distance from this point instead of by start time.
    pub near: Option<Coordinates>,
}

impl RunFilter {
    /// Returns true if the event satisfies every criterion.
    pub fn matches(&self, event: &RunEvent) -> bool {
        if !self.pace.is_empty() && !self.pace.contains(&event.pace_category) {
            return false;
        }
        if !self.distance.is_empty()
            && !self.distance.contains(&DistanceBucket::from_km(event.distance_km))
        {
            return false;
        }
        if self
            .date
            .is_some_and(|date| event.starts_at.date_naive() != date)
        {
            return false;
        }
        if let Some(term) = self.location.as_deref().map(str::trim) {
            if !term.is_empty() {
                let term = term.to_lowercase();
                return event.location.to_lowercase().contains(&term)
                    || event.address.to_lowercase().contains(&term);
            }
        }
        true
    }
}

/// Applies a [`RunFilter`] and orders the result.
///
/// With `near` set, runs with coordinates come first, closest first, and runs
/// without coordinates keep chronological order at the end. Otherwise the
/// result is chronological.
pub fn filter_runs(events: &[RunEvent], filter: &RunFilter) -> Vec<RunEvent> {
    let mut runs: Vec<RunEvent> = events
        .iter()
        .filter(|event| filter.matches(event))
        .cloned()
        .collect();

    match filter.near {
        Some(origin) => runs.sort_by(|a, b| {
            let da = a.coordinates.map(|c| haversine_km(origin, c));
            let db = b.coordinates.map(|c| haversine_km(origin, c));
            match (da, db) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a.starts_at.cmp(&b.starts_at),
            }
        }),
        None => runs.sort_by_key(|event| event.starts_at),
    }
    runs
}

/// Validates a new event before it is sent to the backend.
///
/// Optional fields are only checked when present; blank address and
/// description are allowed.
pub fn validate_new_event(event: &NewEvent) -> Result<(), EventError> {
    if event.title.trim().chars().count() < 3 {
        return Err(EventError::TitleTooShort);
    }
    validate_text_fields(Some(&event.address), Some(&event.description))?;
    validate_ranges(event.distance_km, event.pace_min_per_km, event.max_participants)
}

/// Validates an event patch. Empty patches are rejected.
pub fn validate_patch(patch: &EventPatch) -> Result<(), EventError> {
    if patch.is_empty() {
        return Err(EventError::EmptyPatch);
    }
    if patch
        .title
        .as_deref()
        .is_some_and(|t| t.trim().chars().count() < 3)
    {
        return Err(EventError::TitleTooShort);
    }
    validate_text_fields(patch.address.as_deref(), patch.description.as_deref())?;
    validate_ranges(patch.distance_km, patch.pace_min_per_km, patch.max_participants)
}

fn validate_text_fields(address: Option<&str>, description: Option<&str>) -> Result<(), EventError> {
    let too_short = |value: Option<&str>, min: usize| {
        value
            .map(str::trim)
            .is_some_and(|v| !v.is_empty() && v.chars().count() < min)
    };
    if too_short(address, 5) {
        return Err(EventError::AddressTooShort);
    }
    if too_short(description, 10) {
        return Err(EventError::DescriptionTooShort);
    }
    Ok(())
}

fn validate_ranges(
    distance_km: Option<f64>,
    pace_min_per_km: Option<f64>,
    max_participants: Option<u32>,
) -> Result<(), EventError> {
    if let Some(distance) = distance_km {
        if !(1.0..=50.0).contains(&distance) {
            return Err(EventError::DistanceOutOfRange(distance));
        }
    }
    if let Some(pace) = pace_min_per_km {
        if !(3.0..=12.0).contains(&pace) {
            return Err(EventError::PaceOutOfRange(pace));
        }
    }
    if let Some(max) = max_participants {
        if !(1..=1000).contains(&max) {
            return Err(EventError::MaxParticipantsOutOfRange(max));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::types::HostContact;
    use chrono::{Duration, TimeZone};

    fn event(id: EventId, host: UserId, hours_from_base: i64) -> RunEvent {
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        RunEvent {
            id,
            title: format!("Run {id}"),
            host_id: host,
            host_name: "Club".to_string(),
            starts_at: base + Duration::hours(hours_from_base),
            location: "Riverside".to_string(),
            address: "Riverside Path 1".to_string(),
            distance_km: 5.0,
            pace_min_per_km: 6.0,
            pace_category: PaceCategory::Intermediate,
            description: String::new(),
            max_participants: Some(10),
            current_participants: 0,
            coordinates: None,
            whatsapp_group_link: None,
            host_contact: HostContact::default(),
        }
    }

    #[test]
    fn test_filter_by_host() {
        let events = vec![event(1, 10, 0), event(2, 11, 1), event(3, 10, 2)];
        let ids: Vec<_> = filter_by_host(&events, 10).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(filter_by_host(&events, 99).is_empty());
    }

    #[test]
    fn test_find_event() {
        let events = vec![event(1, 10, 0), event(2, 11, 1)];
        assert_eq!(find_event(&events, 2).map(|e| e.id), Some(2));
        assert!(find_event(&events, 3).is_none());
    }

    #[test]
    fn test_upcoming_events_sorted() {
        let events = vec![event(1, 1, 48), event(2, 1, -5), event(3, 1, 2)];
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let ids: Vec<_> = upcoming_events(&events, now).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_apply_participant_counts() {
        let mut events = vec![event(1, 1, 0), event(2, 1, 1)];
        events[1].current_participants = 9;
        let counts = HashMap::from([(1, 4)]);
        apply_participant_counts(&mut events, &counts);
        assert_eq!(events[0].current_participants, 4);
        assert_eq!(events[1].current_participants, 0);
    }

    #[test]
    fn test_filter_runs_by_pace_and_distance() {
        let mut fast = event(1, 1, 0);
        fast.pace_category = PaceCategory::Advanced;
        fast.distance_km = 12.0;
        let slow = event(2, 1, 1);

        let filter = RunFilter {
            pace: vec![PaceCategory::Advanced],
            ..Default::default()
        };
        let ids: Vec<_> = filter_runs(&[fast.clone(), slow.clone()], &filter)
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![1]);

        let filter = RunFilter {
            distance: vec![DistanceBucket::Short, DistanceBucket::Medium],
            ..Default::default()
        };
        let ids: Vec<_> = filter_runs(&[fast, slow], &filter)
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_filter_runs_location_is_case_insensitive() {
        let mut park = event(1, 1, 0);
        park.location = "Retiro".to_string();
        park.address = "Plaza de la Independencia".to_string();
        let river = event(2, 1, 1);

        let filter = RunFilter {
            location: Some("INDEPENDENCIA".to_string()),
            ..Default::default()
        };
        let ids: Vec<_> = filter_runs(&[park, river], &filter)
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_filter_runs_by_date() {
        let events = vec![event(1, 1, 0), event(2, 1, 30)];
        let filter = RunFilter {
            date: NaiveDate::from_ymd_opt(2025, 6, 2),
            ..Default::default()
        };
        let ids: Vec<_> = filter_runs(&events, &filter).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_filter_runs_sorts_by_proximity() {
        let mut far = event(1, 1, 0);
        far.coordinates = Some(Coordinates::new(41.39, 2.17));
        let mut near = event(2, 1, 5);
        near.coordinates = Some(Coordinates::new(40.42, -3.70));
        let unknown = event(3, 1, -1);

        let filter = RunFilter {
            near: Some(Coordinates::new(40.41, -3.69)),
            ..Default::default()
        };
        let ids: Vec<_> = filter_runs(&[far, unknown, near], &filter)
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_filter_runs_default_is_chronological() {
        let events = vec![event(1, 1, 5), event(2, 1, 1), event(3, 1, 3)];
        let ids: Vec<_> = filter_runs(&events, &RunFilter::default())
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_validate_new_event() {
        let valid = NewEvent::new("Morning 10K", 1);
        assert!(validate_new_event(&valid).is_ok());

        let short = NewEvent::new("5K", 1);
        assert_eq!(validate_new_event(&short), Err(EventError::TitleTooShort));

        let mut far = NewEvent::new("Ultra", 1);
        far.distance_km = Some(80.0);
        assert_eq!(
            validate_new_event(&far),
            Err(EventError::DistanceOutOfRange(80.0))
        );

        let mut crawl = NewEvent::new("Walk", 1);
        crawl.pace_min_per_km = Some(15.0);
        assert_eq!(validate_new_event(&crawl), Err(EventError::PaceOutOfRange(15.0)));

        let desc = NewEvent {
            description: "Short".to_string(),
            ..NewEvent::new("Intervals", 1)
        };
        assert_eq!(validate_new_event(&desc), Err(EventError::DescriptionTooShort));
    }

    #[test]
    fn test_validate_patch() {
        assert_eq!(
            validate_patch(&EventPatch::default()),
            Err(EventError::EmptyPatch)
        );
        let patch = EventPatch {
            max_participants: Some(0),
            ..Default::default()
        };
        assert_eq!(
            validate_patch(&patch),
            Err(EventError::MaxParticipantsOutOfRange(0))
        );
        let patch = EventPatch {
            address: Some("Calle Mayor 1, Madrid".to_string()),
            ..Default::default()
        };
        assert!(validate_patch(&patch).is_ok());
    }
}
