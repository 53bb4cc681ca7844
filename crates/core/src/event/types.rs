use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// Backend identifier of an event.
pub type EventId = u64;

/// Backend identifier of a user (runner or business).
pub type UserId = u64;

/// Pace at or above which (in min/km) a run is considered a beginner run.
pub const BEGINNER_PACE_MIN_PER_KM: f64 = 7.0;

/// Pace at or below which (in min/km) a run is considered an advanced run.
pub const ADVANCED_PACE_MIN_PER_KM: f64 = 4.5;

/// Difficulty bucket derived from the target pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceCategory {
    Beginner,
    Intermediate,
    Advanced,
}

impl PaceCategory {
    /// Buckets a pace given in minutes per kilometer.
    pub fn from_pace(pace_min_per_km: f64) -> Self {
        if pace_min_per_km >= BEGINNER_PACE_MIN_PER_KM {
            PaceCategory::Beginner
        } else if pace_min_per_km <= ADVANCED_PACE_MIN_PER_KM {
            PaceCategory::Advanced
        } else {
            PaceCategory::Intermediate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaceCategory::Beginner => "beginner",
            PaceCategory::Intermediate => "intermediate",
            PaceCategory::Advanced => "advanced",
        }
    }
}

/// Distance bucket used by the run filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceBucket {
    /// Up to 5 km.
    Short,
    /// Over 5 km, up to 10 km.
    Medium,
    /// Over 10 km.
    Long,
}

impl DistanceBucket {
    pub fn from_km(distance_km: f64) -> Self {
        if distance_km <= 5.0 {
            DistanceBucket::Short
        } else if distance_km <= 10.0 {
            DistanceBucket::Medium
        } else {
            DistanceBucket::Long
        }
    }
}

/// How to reach the business hosting a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostContact {
    pub business_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A community run hosted by a business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
    pub id: EventId,
    pub title: String,
    /// The hosting business.
    pub host_id: UserId,
    pub host_name: String,
    pub starts_at: DateTime<Utc>,
    /// Free-text location, or `"lat, lng"` when the backend stores a point.
    pub location: String,
    pub address: String,
    pub distance_km: f64,
    pub pace_min_per_km: f64,
    pub pace_category: PaceCategory,
    pub description: String,
    /// `None` means unlimited spots.
    pub max_participants: Option<u32>,
    pub current_participants: u32,
    pub coordinates: Option<Coordinates>,
    pub whatsapp_group_link: Option<String>,
    pub host_contact: HostContact,
}

impl RunEvent {
    /// Remaining spots, or `None` when the run has no participant limit.
    pub fn remaining_spots(&self) -> Option<i64> {
        self.max_participants
            .map(|max| i64::from(max) - i64::from(self.current_participants))
    }

    /// Returns true if the run starts strictly after `now`.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.starts_at > now
    }
}
