//! Registration endpoints.

use async_trait::async_trait;
use runhub_core::api::{ApiResult, RegistrationsApi};
use runhub_core::event::{EventId, UserId};
use runhub_core::registration::{BackendRegistration, NewRegistration, RegistrationId};

use super::BackendClient;

#[async_trait]
impl RegistrationsApi for BackendClient {
    async fn list_registrations(&self) -> ApiResult<Vec<BackendRegistration>> {
        tracing::debug!("GET /registrations");
        self.request_json(self.client.get(self.url("/registrations")))
            .await
    }

    async fn create_registration(
        &self,
        event_id: EventId,
        runner_id: UserId,
    ) -> ApiResult<BackendRegistration> {
        tracing::debug!(event_id, runner_id, "POST /registrations");
        let body = NewRegistration {
            event_id,
            runner_id,
        };
        self.request_json(self.client.post(self.url("/registrations")).json(&body))
            .await
    }

    async fn delete_registration(&self, id: RegistrationId) -> ApiResult<()> {
        tracing::debug!(registration_id = id, "DELETE /registrations/{{id}}");
        self.request_empty(
            self.client
                .delete(self.url(&format!("/registrations/{}", id))),
        )
        .await
    }
}
