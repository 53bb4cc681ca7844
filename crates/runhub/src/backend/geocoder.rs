use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use runhub_core::api::{ApiError, ApiResult, GeocodingApi};
use runhub_core::geo::{Coordinates, GeocodeMatch};

/// Geocoder answering from a fixed address book.
///
/// Addresses match verbatim. Unknown addresses return no candidates.
#[derive(Debug, Default)]
pub struct InMemoryGeocoder {
    addresses: Mutex<HashMap<String, Coordinates>>,
    calls: AtomicUsize,
    failure: Mutex<Option<ApiError>>,
    latency: Mutex<Duration>,
}

impl InMemoryGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, address: &str, coordinates: Coordinates) {
        self.addresses
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(address.to_string(), coordinates);
    }

    /// Number of searches received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_with(&self, error: Option<ApiError>) {
        *self.failure.lock().unwrap_or_else(|p| p.into_inner()) = error;
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap_or_else(|p| p.into_inner()) = latency;
    }
}

#[async_trait]
impl GeocodingApi for InMemoryGeocoder {
    async fn search(&self, address: &str) -> ApiResult<Vec<GeocodeMatch>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let latency = *self.latency.lock().unwrap_or_else(|p| p.into_inner());
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let failure = self.failure.lock().unwrap_or_else(|p| p.into_inner()).clone();
        if let Some(err) = failure {
            return Err(err);
        }

        let found = self
            .addresses
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(address)
            .copied();
        Ok(found
            .map(|coordinates| GeocodeMatch {
                lat: coordinates.latitude,
                lon: coordinates.longitude,
                display_name: Some(address.to_string()),
            })
            .into_iter()
            .collect())
    }
}
