//! Event CLI commands.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use runhub_core::event::{DistanceBucket, EventPatch, NewEvent, PaceCategory};

/// Event management commands.
#[derive(Debug, Parser)]
pub struct EventsCommand {
    #[command(subcommand)]
    pub action: EventsAction,
}

/// CLI pace filter (with clap ValueEnum).
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Pace {
    Beginner,
    Intermediate,
    Advanced,
}

impl From<Pace> for PaceCategory {
    fn from(p: Pace) -> Self {
        match p {
            Pace::Beginner => PaceCategory::Beginner,
            Pace::Intermediate => PaceCategory::Intermediate,
            Pace::Advanced => PaceCategory::Advanced,
        }
    }
}

/// CLI distance filter.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Distance {
    /// Up to 5 km.
    Short,
    /// 5 to 10 km.
    Medium,
    /// Over 10 km.
    Long,
}

impl From<Distance> for DistanceBucket {
    fn from(d: Distance) -> Self {
        match d {
            Distance::Short => DistanceBucket::Short,
            Distance::Medium => DistanceBucket::Medium,
            Distance::Long => DistanceBucket::Long,
        }
    }
}

/// Available event actions.
#[derive(Debug, Subcommand)]
pub enum EventsAction {
    /// List runs, optionally filtered.
    List {
        /// Pace categories to include (repeatable).
        #[arg(long, value_enum)]
        pace: Vec<Pace>,
        /// Distance buckets to include (repeatable).
        #[arg(long, value_enum)]
        distance: Vec<Distance>,
        /// Only runs on this day (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Substring of the location or address.
        #[arg(long)]
        location: Option<String>,
        /// Sort by distance from this address.
        #[arg(long)]
        near: Option<String>,
        /// Include participant counts.
        #[arg(long)]
        with_counts: bool,
        /// Only runs that have not started yet, soonest first.
        #[arg(long)]
        upcoming: bool,
    },
    /// Show a single run.
    Get {
        /// Event ID.
        id: u64,
    },
    /// List the runs hosted by a business.
    Business {
        /// Business (host) ID.
        business_id: u64,
    },
    /// Host a new run.
    Create {
        #[command(flatten)]
        fields: EventFields,
        /// Hosting business ID.
        #[arg(long)]
        host_id: u64,
        /// Hosting business name.
        #[arg(long)]
        host_name: Option<String>,
        /// Geocode the address and store the coordinates.
        #[arg(long)]
        geocode: bool,
        /// Cover image to upload.
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Update a run. Only the given fields change.
    Update {
        /// Event ID.
        id: u64,
        #[command(flatten)]
        fields: EventFields,
    },
    /// Delete a run.
    Delete {
        /// Event ID.
        id: u64,
    },
}

/// Editable event fields shared by `create` and `update`.
#[derive(Debug, Clone, Default, Parser)]
pub struct EventFields {
    /// Run title.
    #[arg(long)]
    pub title: Option<String>,
    /// Run description.
    #[arg(long)]
    pub description: Option<String>,
    /// Start time (RFC 3339).
    #[arg(long)]
    pub start: Option<DateTime<Utc>>,
    /// Target pace in minutes per kilometer.
    #[arg(long)]
    pub pace: Option<f64>,
    /// Distance in kilometers.
    #[arg(long)]
    pub distance: Option<f64>,
    /// Participant limit.
    #[arg(long)]
    pub max_participants: Option<u32>,
    /// Meeting point address.
    #[arg(long)]
    pub address: Option<String>,
    /// WhatsApp group invite link.
    #[arg(long)]
    pub whatsapp: Option<String>,
}

impl EventFields {
    /// Builds a create request. A missing title becomes empty and fails validation.
    pub fn into_new_event(self, host_id: u64, host_name: Option<String>) -> NewEvent {
        NewEvent {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            starts_at: self.start,
            pace_min_per_km: self.pace,
            distance_km: self.distance,
            max_participants: self.max_participants,
            host_id,
            host_name,
            address: self.address.unwrap_or_default(),
            coordinates: None,
            whatsapp_group_link: self.whatsapp,
        }
    }

    pub fn into_patch(self) -> EventPatch {
        EventPatch {
            title: self.title,
            description: self.description,
            starts_at: self.start,
            pace_min_per_km: self.pace,
            distance_km: self.distance,
            max_participants: self.max_participants,
            address: self.address,
            coordinates: None,
            whatsapp_group_link: self.whatsapp,
        }
    }
}

/// Guesses an image content type from its file name.
pub fn image_content_type(file_name: &str) -> &'static str {
    match runhub_core::storage::file_extension(file_name).as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "image/jpeg",
    }
}
