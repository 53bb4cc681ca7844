//! Write request types for event operations.
//!
//! These are pure data types; converting them into backend payloads is done
//! here so the service layer only deals with domain values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

use super::backend::{BackendEventPatch, BackendEventPayload, EventLocation, GeoPoint};
use super::types::UserId;

/// Pace used when the host leaves it blank (min/km).
pub const DEFAULT_PACE_MIN_PER_KM: f64 = 5.0;

/// Distance used when the host leaves it blank (km).
pub const DEFAULT_DISTANCE_KM: f64 = 5.0;

/// Placeholder host name the UI shows before the business profile loads.
const UNKNOWN_BUSINESS: &str = "Unknown Business";

/// Request payload for hosting a new run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace_min_per_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    pub host_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_group_link: Option<String>,
}

impl NewEvent {
    /// Create a new request with just a title and host.
    pub fn new(title: impl Into<String>, host_id: UserId) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            starts_at: None,
            pace_min_per_km: None,
            distance_km: None,
            max_participants: None,
            host_id,
            host_name: None,
            address: String::new(),
            coordinates: None,
            whatsapp_group_link: None,
        }
    }

    pub fn with_start(mut self, starts_at: DateTime<Utc>) -> Self {
        self.starts_at = Some(starts_at);
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    pub fn with_host_name(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = Some(host_name.into());
        self
    }

    /// Converts into the backend body, filling the defaults the backend expects.
    ///
    /// `now` is used as the start time when none was given.
    pub fn into_payload(self, now: DateTime<Utc>) -> BackendEventPayload {
        let event_location = match self.coordinates {
            Some(coords) => EventLocation::Point(GeoPoint::point(coords)),
            None => EventLocation::Text(String::new()),
        };
        let business_name = self
            .host_name
            .filter(|name| name != UNKNOWN_BUSINESS)
            .unwrap_or_default();

        BackendEventPayload {
            title: self.title,
            description: self.description,
            event_start: self.starts_at.unwrap_or(now).timestamp_millis(),
            pace_seconds_per_km: self.pace_min_per_km.unwrap_or(DEFAULT_PACE_MIN_PER_KM) * 60.0,
            distance: self.distance_km.unwrap_or(DEFAULT_DISTANCE_KM),
            max_participants: self.max_participants,
            business_id: self.host_id,
            business_name,
            event_location,
            event_address: self.address,
            whatsapp_group_link: self.whatsapp_group_link.unwrap_or_default(),
        }
    }
}

/// Request payload for updating a run. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace_min_per_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_group_link: Option<String>,
}

impl EventPatch {
    /// Returns true if the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self == &EventPatch::default()
    }

    pub fn into_backend(self) -> BackendEventPatch {
        BackendEventPatch {
            title: self.title,
            description: self.description,
            event_start: self.starts_at.map(|t| t.timestamp_millis()),
            pace_seconds_per_km: self.pace_min_per_km.map(|p| p * 60.0),
            distance: self.distance_km,
            max_participants: self.max_participants,
            event_location: self
                .coordinates
                .map(|c| EventLocation::Point(GeoPoint::point(c))),
            event_address: self.address,
            whatsapp_group_link: self.whatsapp_group_link,
        }
    }
}
