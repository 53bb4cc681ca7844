//! In-memory implementations of the backend ports.
//!
//! Used by `--demo` and by tests; the HTTP adapters live in `runhub_client`.

mod geocoder;
mod inmemory;
mod object_store;

pub use geocoder::InMemoryGeocoder;
pub use inmemory::InMemoryBackend;
pub use object_store::{InMemoryObjectStore, StoredObject};
