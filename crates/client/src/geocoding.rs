//! Nominatim-compatible geocoding client.

use std::time::Duration;

use async_trait::async_trait;
use runhub_core::api::{ApiError, ApiResult, GeocodingApi};
use runhub_core::geo::GeocodeMatch;
use url::Url;

use crate::error::{ClientError, Result};

/// Public Nominatim endpoint.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim's usage policy requires an identifying user agent.
pub const DEFAULT_USER_AGENT: &str = "RunningApp/1.0";

/// Hard timeout for a single lookup.
pub const GEOCODE_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for a Nominatim-compatible `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: Url,
    user_agent: String,
    timeout: Duration,
}

impl NominatimClient {
    /// Creates a client for `base_url`. A base path is kept when joining
    /// `search`, with or without a trailing slash.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: GEOCODE_TIMEOUT,
        })
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the search URL for an address.
    pub fn search_url(&self, address: &str) -> Result<Url> {
        let mut url = self.base_url.join("search")?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", address)
            .append_pair("limit", "1")
            .append_pair("addressdetails", "1");
        Ok(url)
    }
}

#[async_trait]
impl GeocodingApi for NominatimClient {
    async fn search(&self, address: &str) -> ApiResult<Vec<GeocodeMatch>> {
        let url = self.search_url(address).map_err(ApiError::from)?;
        tracing::debug!(address = %address, "Geocoding address");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::from(ClientError::from(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(
                status.as_u16(),
                format!("geocoder returned {}", status),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::from(ClientError::from(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        let client = NominatimClient::new(DEFAULT_GEOCODER_URL).unwrap();
        let url = client.search_url("221B Baker Street, London").unwrap();
        assert_eq!(url.path(), "/search");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("format".to_string(), "json".to_string()),
                ("q".to_string(), "221B Baker Street, London".to_string()),
                ("limit".to_string(), "1".to_string()),
                ("addressdetails".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_url_keeps_base_path() {
        for base in ["https://geo.example.com/nominatim", "https://geo.example.com/nominatim/"] {
            let client = NominatimClient::new(base).unwrap();
            let url = client.search_url("Madrid").unwrap();
            assert_eq!(url.path(), "/nominatim/search");
        }
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            NominatimClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_parse_search_response() {
        let body = r#"[{"lat": "51.5237", "lon": "-0.1585", "display_name": "221B, Baker Street"}]"#;
        let matches: Vec<GeocodeMatch> = serde_json::from_str(body).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].lat, 51.5237);
        assert_eq!(matches[0].lon, -0.1585);
    }
}
