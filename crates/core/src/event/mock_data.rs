//! Seed events for the in-memory backend and for tests.
//!
//! Pure functions only: the caller supplies the reference time so the output
//! is deterministic.

use chrono::{DateTime, Duration, Utc};

use crate::geo::Coordinates;

use super::backend::{BackendEvent, EventLocation, GeoPoint};
use super::types::{EventId, UserId};

struct Template {
    title: &'static str,
    description: &'static str,
    address: &'static str,
    coordinates: Option<(f64, f64)>,
    distance: f64,
    pace_seconds_per_km: f64,
    max_participants: Option<u32>,
}

const TEMPLATES: &[Template] = &[
    Template {
        title: "Sunrise Social 5K",
        description: "Easy loop around the park followed by coffee.",
        address: "Retiro Park, Madrid",
        coordinates: Some((40.4153, -3.6845)),
        distance: 5.0,
        pace_seconds_per_km: 450.0,
        max_participants: Some(30),
    },
    Template {
        title: "Tempo Tuesday",
        description: "Structured tempo blocks on the river path.",
        address: "Madrid Rio, Madrid",
        coordinates: Some((40.3990, -3.7130)),
        distance: 8.0,
        pace_seconds_per_km: 270.0,
        max_participants: Some(15),
    },
    Template {
        title: "Long Run Sunday",
        description: "Steady long run, all paces welcome to start together.",
        address: "Casa de Campo, Madrid",
        coordinates: None,
        distance: 16.0,
        pace_seconds_per_km: 345.0,
        max_participants: None,
    },
    Template {
        title: "Track Intervals",
        description: "400m repeats with a coach on the track.",
        address: "Estadio Vallehermoso, Madrid",
        coordinates: Some((40.4465, -3.7100)),
        distance: 6.0,
        pace_seconds_per_km: 240.0,
        max_participants: Some(20),
    },
];

/// Generates `count` backend event records hosted by `business_id`.
///
/// Records cycle through a fixed set of templates and start one day apart,
/// beginning a day after `now`. IDs start at `first_id`.
///
/// ```
/// use runhub_core::event::generate_seed_events;
/// use chrono::Utc;
///
/// let events = generate_seed_events(1, 42, "Harbour Runners", Utc::now(), 6);
/// assert_eq!(events.len(), 6);
/// assert!(events.iter().all(|e| e.business_id == 42));
/// ```
pub fn generate_seed_events(
    first_id: EventId,
    business_id: UserId,
    business_name: &str,
    now: DateTime<Utc>,
    count: u32,
) -> Vec<BackendEvent> {
    (0..count)
        .map(|i| {
            let template = &TEMPLATES[i as usize % TEMPLATES.len()];
            let starts_at = now + Duration::days(i64::from(i) + 1);
            BackendEvent {
                id: first_id + u64::from(i),
                created_at: now.timestamp_millis(),
                title: template.title.to_string(),
                description: template.description.to_string(),
                event_start: starts_at.timestamp_millis(),
                pace_seconds_per_km: template.pace_seconds_per_km,
                distance: template.distance,
                max_participants: template.max_participants,
                business_id,
                business_name: business_name.to_string(),
                event_location: Some(match template.coordinates {
                    Some((lat, lng)) => {
                        EventLocation::Point(GeoPoint::point(Coordinates::new(lat, lng)))
                    }
                    None => EventLocation::Text(template.address.to_string()),
                }),
                event_address: template.address.to_string(),
                business_phone: None,
                whatsapp_group_link: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::transform_backend_events;

    #[test]
    fn test_seed_ids_and_order() {
        let now = Utc::now();
        let events = generate_seed_events(100, 7, "Club", now, 5);
        let ids: Vec<_> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![100, 101, 102, 103, 104]);
        assert!(events.windows(2).all(|w| w[0].event_start < w[1].event_start));
        assert!(events.iter().all(|e| e.event_start > now.timestamp_millis()));
    }

    #[test]
    fn test_seed_events_transform_cleanly() {
        let runs = transform_backend_events(&generate_seed_events(1, 7, "Club", Utc::now(), 4));
        assert_eq!(runs.len(), 4);
        assert!(runs[0].coordinates.is_some());
        assert_eq!(runs[2].coordinates, None);
        assert_eq!(runs[2].location, "Casa de Campo, Madrid");
    }

    #[test]
    fn test_zero_count() {
        assert!(generate_seed_events(1, 1, "Club", Utc::now(), 0).is_empty());
    }
}
