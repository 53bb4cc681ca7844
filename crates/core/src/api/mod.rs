mod error;
mod traits;

pub use error::{ApiError, ApiResult};
pub use traits::{BusinessPostsApi, EventsApi, GeocodingApi, ObjectStore, RegistrationsApi};
