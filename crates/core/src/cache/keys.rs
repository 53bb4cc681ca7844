use crate::event::EventId;

/// Logical key of the cached event collection.
pub const ALL_EVENTS_KEY: &str = "all-events";

/// Returns the key used for an individual event fetch.
///
/// Individual fetches are coalesced under this key but not stored.
pub fn event_key(event_id: EventId) -> String {
    format!("event:{}", event_id)
}

/// Returns the key used for a geocode lookup. The address must already be normalized.
pub fn geocode_key(normalized_address: &str) -> String {
    format!("geocode:{}", normalized_address)
}
