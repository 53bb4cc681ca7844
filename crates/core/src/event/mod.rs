mod backend;
mod error;
mod mock_data;
mod operations;
mod requests;
mod transform;
mod types;

pub use backend::{BackendEvent, BackendEventPatch, BackendEventPayload, EventLocation, GeoPoint, LatLng};
pub use error::EventError;
pub use mock_data::generate_seed_events;
pub use operations::{
    apply_participant_counts, filter_by_host, filter_runs, find_event, upcoming_events,
    validate_new_event, validate_patch, RunFilter,
};
pub use requests::{EventPatch, NewEvent, DEFAULT_DISTANCE_KM, DEFAULT_PACE_MIN_PER_KM};
pub use transform::{millis_to_datetime, transform_backend_event, transform_backend_events};
pub use types::{
    DistanceBucket, EventId, HostContact, PaceCategory, RunEvent, UserId,
    ADVANCED_PACE_MIN_PER_KM, BEGINNER_PACE_MIN_PER_KM,
};
