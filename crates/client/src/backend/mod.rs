//! HTTP client for the runhub backend REST API.

mod events;
mod posts;
mod registrations;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use runhub_core::api::{ApiError, ApiResult};

use crate::error::ClientError;

/// HTTP client for the backend REST API.
///
/// Requests carry the session token when one is set and fall back to the
/// service token otherwise. A `401` clears the session token. Clones share
/// the session token.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    service_token: Option<String>,
    session_token: Arc<RwLock<Option<String>>>,
}

impl BackendClient {
    /// Create a new client with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_token: None,
            session_token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_service_token(mut self, token: impl Into<String>) -> Self {
        self.service_token = Some(token.into());
        self
    }

    pub fn with_session_token(self, token: impl Into<String>) -> Self {
        self.set_session_token(Some(token.into()));
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session_token(&self) -> Option<String> {
        self.read_session().clone()
    }

    pub fn set_session_token(&self, token: Option<String>) {
        *self.write_session() = token;
    }

    /// Token sent as `Authorization: Bearer`.
    pub fn bearer_token(&self) -> Option<String> {
        self.session_token().or_else(|| self.service_token.clone())
    }

    fn read_session(&self) -> RwLockReadGuard<'_, Option<String>> {
        self.session_token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_session(&self) -> RwLockWriteGuard<'_, Option<String>> {
        self.session_token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attaches auth, sends the request and maps transport and status failures.
    async fn send(&self, request: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        let request = match self.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::from(ClientError::from(e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 401 {
            tracing::warn!(url = %response.url(), "Backend rejected credentials, clearing session token");
            self.set_session_token(None);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ClientError::ServerError {
            status: status.as_u16(),
            message,
        }
        .into())
    }

    /// Sends a request and decodes its JSON body.
    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> ApiResult<T> {
        let response = self.send(request).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::from(ClientError::from(e)))
    }

    /// Sends a request whose response body is ignored.
    async fn request_empty(&self, request: reqwest::RequestBuilder) -> ApiResult<()> {
        self.send(request).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = BackendClient::new("https://api.example.com/v1/");
        assert_eq!(client.base_url(), "https://api.example.com/v1");
        assert_eq!(client.url("/events"), "https://api.example.com/v1/events");
    }

    #[test]
    fn test_bearer_prefers_session_token() {
        let client = BackendClient::new("http://localhost").with_service_token("service");
        assert_eq!(client.bearer_token().as_deref(), Some("service"));

        client.set_session_token(Some("session".to_string()));
        assert_eq!(client.bearer_token().as_deref(), Some("session"));

        client.set_session_token(None);
        assert_eq!(client.bearer_token().as_deref(), Some("service"));
    }

    #[test]
    fn test_clones_share_session() {
        let client = BackendClient::new("http://localhost").with_session_token("abc");
        let clone = client.clone();
        clone.set_session_token(None);
        assert_eq!(client.session_token(), None);
        assert_eq!(client.bearer_token(), None);
    }
}
