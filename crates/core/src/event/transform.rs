//! Pure conversions between backend records and [`RunEvent`].

use chrono::{DateTime, Utc};

use super::backend::{BackendEvent, EventLocation};
use super::types::{HostContact, PaceCategory, RunEvent};

/// Converts a backend record into the internal representation.
///
/// Pace is stored in seconds per km and exposed in minutes per km. A point
/// location yields coordinates and a `"lat, lng"` location string; the
/// address falls back to that location when the backend has none.
pub fn transform_backend_event(raw: &BackendEvent) -> RunEvent {
    let pace_min_per_km = raw.pace_seconds_per_km / 60.0;

    let (location, coordinates) = match &raw.event_location {
        Some(EventLocation::Text(text)) => (text.clone(), None),
        Some(EventLocation::Point(point)) => match point.coordinates() {
            Some(coords) => (coords.display_pair(), Some(coords)),
            None => (String::new(), None),
        },
        None => (String::new(), None),
    };

    let address = if raw.event_address.is_empty() {
        location.clone()
    } else {
        raw.event_address.clone()
    };

    RunEvent {
        id: raw.id,
        title: raw.title.clone(),
        host_id: raw.business_id,
        host_name: raw.business_name.clone(),
        starts_at: millis_to_datetime(raw.event_start),
        location,
        address,
        distance_km: raw.distance,
        pace_min_per_km,
        pace_category: PaceCategory::from_pace(pace_min_per_km),
        description: raw.description.clone(),
        max_participants: raw.max_participants,
        current_participants: 0,
        coordinates,
        whatsapp_group_link: raw.whatsapp_group_link.clone(),
        host_contact: HostContact {
            business_name: raw.business_name.clone(),
            phone: raw.business_phone.clone(),
            email: None,
        },
    }
}

/// Converts a whole backend listing, preserving order.
pub fn transform_backend_events(raw: &[BackendEvent]) -> Vec<RunEvent> {
    raw.iter().map(transform_backend_event).collect()
}

/// Converts epoch milliseconds to a UTC timestamp, clamping invalid values to the epoch.
pub fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default()
}
