//! Wire types for the backend's event endpoints.
//!
//! Field names follow the backend schema, including its camelCase
//! `whatsappGroupLink` outlier.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;
use crate::serde::deserialize_optional_string;

use super::types::{EventId, UserId};

/// Latitude/longitude as the backend nests them inside a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// A geometry value as stored by the backend (`{"type": "point", "data": {...}}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: LatLng,
}

impl GeoPoint {
    pub fn point(coordinates: Coordinates) -> Self {
        Self {
            kind: "point".to_string(),
            data: LatLng {
                lat: coordinates.latitude,
                lng: coordinates.longitude,
            },
        }
    }

    /// Returns the coordinates if this is a point geometry.
    pub fn coordinates(&self) -> Option<Coordinates> {
        (self.kind == "point").then(|| Coordinates::new(self.data.lat, self.data.lng))
    }
}

/// The backend stores an event's location either as free text or as a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventLocation {
    Point(GeoPoint),
    Text(String),
}

/// An event record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendEvent {
    pub id: EventId,
    /// Creation time in epoch milliseconds.
    #[serde(default)]
    pub created_at: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Start time in epoch milliseconds.
    pub event_start: i64,
    pub pace_seconds_per_km: f64,
    pub distance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    pub business_id: UserId,
    #[serde(default)]
    pub business_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_location: Option<EventLocation>,
    #[serde(default)]
    pub event_address: String,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub business_phone: Option<String>,
    #[serde(
        default,
        rename = "whatsappGroupLink",
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub whatsapp_group_link: Option<String>,
}

/// Body of `POST /events`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendEventPayload {
    pub title: String,
    pub description: String,
    pub event_start: i64,
    pub pace_seconds_per_km: f64,
    pub distance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    pub business_id: UserId,
    pub business_name: String,
    /// A point when coordinates are known, otherwise an empty string.
    pub event_location: EventLocation,
    pub event_address: String,
    #[serde(rename = "whatsappGroupLink")]
    pub whatsapp_group_link: String,
}

/// Body of `PATCH /events/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BackendEventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace_seconds_per_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_location: Option<EventLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_address: Option<String>,
    #[serde(rename = "whatsappGroupLink", skip_serializing_if = "Option::is_none")]
    pub whatsapp_group_link: Option<String>,
}
