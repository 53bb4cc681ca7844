//! runhub_client - HTTP adapters implementing the runhub_core ports.

pub mod backend;
pub mod error;
pub mod geocoding;
pub mod storage;

pub use backend::BackendClient;
pub use error::{ClientError, Result};
pub use geocoding::NominatimClient;
pub use storage::StorageClient;
