//! Event endpoints.

use async_trait::async_trait;
use runhub_core::api::{ApiResult, EventsApi};
use runhub_core::event::{BackendEvent, BackendEventPatch, BackendEventPayload, EventId};

use super::BackendClient;

#[async_trait]
impl EventsApi for BackendClient {
    async fn list_events(&self) -> ApiResult<Vec<BackendEvent>> {
        tracing::debug!("GET /events");
        self.request_json(self.client.get(self.url("/events"))).await
    }

    async fn get_event(&self, id: EventId) -> ApiResult<BackendEvent> {
        tracing::debug!(event_id = id, "GET /events/{{id}}");
        self.request_json(self.client.get(self.url(&format!("/events/{}", id))))
            .await
    }

    async fn create_event(&self, payload: &BackendEventPayload) -> ApiResult<BackendEvent> {
        tracing::debug!(title = %payload.title, "POST /events");
        self.request_json(self.client.post(self.url("/events")).json(payload))
            .await
    }

    async fn update_event(&self, id: EventId, patch: &BackendEventPatch) -> ApiResult<BackendEvent> {
        tracing::debug!(event_id = id, "PATCH /events/{{id}}");
        self.request_json(
            self.client
                .patch(self.url(&format!("/events/{}", id)))
                .json(patch),
        )
        .await
    }

    async fn delete_event(&self, id: EventId) -> ApiResult<()> {
        tracing::debug!(event_id = id, "DELETE /events/{{id}}");
        self.request_empty(self.client.delete(self.url(&format!("/events/{}", id))))
            .await
    }
}
