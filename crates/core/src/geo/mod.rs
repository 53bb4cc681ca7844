mod error;
mod types;

pub use error::GeocodeError;
pub use types::{haversine_km, normalize_address, Coordinates, GeocodeMatch};
