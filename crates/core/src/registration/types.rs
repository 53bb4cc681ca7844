use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{EventId, UserId};
use crate::serde::deserialize_optional_string;

/// Backend identifier of a registration.
pub type RegistrationId = u64;

/// User fields the backend embeds in a registration record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationUser {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
}

/// A registration record as returned by the backend.
///
/// The backend names the event column `events_id` on reads but expects
/// `event_id` on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendRegistration {
    pub id: RegistrationId,
    /// Creation time in epoch milliseconds.
    #[serde(default)]
    pub created_at: i64,
    pub runner_id: UserId,
    pub events_id: EventId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<RegistrationUser>,
}

/// Body of `POST /registrations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NewRegistration {
    pub event_id: EventId,
    pub runner_id: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Confirmed,
}

/// A runner's registration for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub runner_id: UserId,
    pub runner_name: String,
    pub runner_email: String,
    pub registered_at: DateTime<Utc>,
    pub status: RegistrationStatus,
}
