//! Runner registrations.
//!
//! The backend only lists every registration, so per-event and per-runner
//! views are filtered client side.

use std::sync::Arc;

use runhub_core::api::{ApiError, ApiResult, RegistrationsApi};
use runhub_core::event::{apply_participant_counts, EventId, RunEvent, UserId};
use runhub_core::registration::{
    count_by_event, registrations_for_event, registrations_for_runner, transform_registration,
    BackendRegistration, Registration, RegistrationId,
};
use runhub_core::retry::RetryPolicy;

use crate::cache::InvalidationBus;
use crate::retry::with_retry;

/// Registers runners for events and reads registrations back.
#[derive(Clone)]
pub struct RegistrationService {
    api: Arc<dyn RegistrationsApi>,
    bus: Arc<InvalidationBus>,
    retry: RetryPolicy,
}

impl RegistrationService {
    pub fn new(api: Arc<dyn RegistrationsApi>, bus: Arc<InvalidationBus>) -> Self {
        Self {
            api,
            bus,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn register(&self, event_id: EventId, runner_id: UserId) -> ApiResult<Registration> {
        let created = self.api.create_registration(event_id, runner_id).await?;
        self.bus.invalidate_all().await;

        tracing::info!(event_id, runner_id, registration_id = created.id, "Runner registered");
        Ok(transform_registration(&created))
    }

    pub async fn cancel(&self, registration_id: RegistrationId) -> ApiResult<()> {
        self.api.delete_registration(registration_id).await?;
        self.bus.invalidate_all().await;

        tracing::info!(registration_id, "Registration cancelled");
        Ok(())
    }

    /// Cancels every registration the runner holds for the event.
    ///
    /// Returns the number cancelled, or `NotFound` if there were none.
    pub async fn cancel_for_event(&self, event_id: EventId, runner_id: UserId) -> ApiResult<usize> {
        let all = self.all_registrations().await?;
        let matching: Vec<RegistrationId> = all
            .iter()
            .filter(|r| r.events_id == event_id && r.runner_id == runner_id)
            .map(|r| r.id)
            .collect();

        if matching.is_empty() {
            return Err(ApiError::not_found(format!(
                "Registration of runner {} for event {}",
                runner_id, event_id
            )));
        }

        // Invalidate if any delete landed, even when a later one failed.
        let mut cancelled = 0;
        let mut failure = None;
        for id in &matching {
            match self.api.delete_registration(*id).await {
                Ok(()) => cancelled += 1,
                Err(err) => {
                    tracing::warn!(registration_id = *id, error = %err, "Failed to cancel registration");
                    failure = Some(err);
                    break;
                }
            }
        }
        if cancelled > 0 {
            self.bus.invalidate_all().await;
        }
        if let Some(err) = failure {
            return Err(err);
        }

        tracing::info!(event_id, runner_id, count = cancelled, "Registrations cancelled");
        Ok(cancelled)
    }

    /// Returns whether the runner is registered for the event.
    ///
    /// Lookup failures are logged and reported as not registered.
    pub async fn is_registered(&self, event_id: EventId, runner_id: UserId) -> bool {
        match self.api.list_registrations().await {
            Ok(all) => all
                .iter()
                .any(|r| r.events_id == event_id && r.runner_id == runner_id),
            Err(err) => {
                tracing::warn!(event_id, runner_id, error = %err, "Failed to check registration");
                false
            }
        }
    }

    pub async fn event_registrations(&self, event_id: EventId) -> ApiResult<Vec<Registration>> {
        let all = self.all_registrations().await?;
        Ok(registrations_for_event(&all, event_id)
            .iter()
            .map(transform_registration)
            .collect())
    }

    pub async fn runner_registrations(&self, runner_id: UserId) -> ApiResult<Vec<Registration>> {
        let all = self.all_registrations().await?;
        Ok(registrations_for_runner(&all, runner_id)
            .iter()
            .map(transform_registration)
            .collect())
    }

    /// Fills `current_participants` on each event.
    pub async fn participant_counts(&self, events: &mut [RunEvent]) -> ApiResult<()> {
        let all = self.all_registrations().await?;
        apply_participant_counts(events, &count_by_event(&all));
        Ok(())
    }

    /// Lists every registration, retrying transient failures.
    pub async fn all_registrations(&self) -> ApiResult<Vec<BackendRegistration>> {
        let api = &self.api;
        with_retry(self.retry, "list_registrations", move || api.list_registrations()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use chrono::Utc;
    use runhub_core::api::EventsApi;
    use runhub_core::event::{generate_seed_events, transform_backend_events};
    use crate::cache::ViewCache;
    use async_trait::async_trait;
    use runhub_core::registration::RegistrationStatus;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Registrations port whose second delete fails.
    struct FailsSecondDelete {
        inner: Arc<InMemoryBackend>,
        deletes: AtomicUsize,
    }

    #[async_trait]
    impl RegistrationsApi for FailsSecondDelete {
        async fn list_registrations(&self) -> ApiResult<Vec<BackendRegistration>> {
            self.inner.list_registrations().await
        }

        async fn create_registration(
            &self,
            event_id: EventId,
            runner_id: UserId,
        ) -> ApiResult<BackendRegistration> {
            self.inner.create_registration(event_id, runner_id).await
        }

        async fn delete_registration(&self, id: RegistrationId) -> ApiResult<()> {
            if self.deletes.fetch_add(1, Ordering::SeqCst) == 1 {
                return Err(ApiError::Network("reset".to_string()));
            }
            self.inner.delete_registration(id).await
        }
    }

    fn fixture() -> (Arc<InMemoryBackend>, RegistrationService) {
        let backend = Arc::new(InMemoryBackend::new());
        backend.seed_events(generate_seed_events(1, 7, "Harbour Runners", Utc::now(), 3));
        let service = RegistrationService::new(backend.clone(), Arc::new(InvalidationBus::new()))
            .with_retry_policy(RetryPolicy {
                max_retries: 2,
                delay: Duration::from_millis(1),
            });
        (backend, service)
    }

    #[tokio::test]
    async fn test_register_defaults_runner_name() {
        let (_backend, service) = fixture();
        let registration = service.register(2, 40).await.unwrap();

        assert_eq!(registration.event_id, 2);
        assert_eq!(registration.runner_name, "User 40");
        assert_eq!(registration.status, RegistrationStatus::Confirmed);
        assert!(service.is_registered(2, 40).await);
        assert!(!service.is_registered(3, 40).await);
    }

    #[tokio::test]
    async fn test_filters_by_event_and_runner() {
        let (backend, service) = fixture();
        backend.seed_registration(1, 40, Some("Ana"));
        backend.seed_registration(1, 41, None);
        backend.seed_registration(2, 40, Some("Ana"));

        let for_event = service.event_registrations(1).await.unwrap();
        assert_eq!(for_event.len(), 2);

        let for_runner = service.runner_registrations(40).await.unwrap();
        assert_eq!(for_runner.len(), 2);
        assert!(for_runner.iter().all(|r| r.runner_name == "Ana"));
    }

    #[tokio::test]
    async fn test_cancel_for_event_removes_duplicates() {
        let (backend, service) = fixture();
        backend.seed_registration(1, 40, None);
        backend.seed_registration(1, 40, None);
        backend.seed_registration(2, 40, None);

        assert_eq!(service.cancel_for_event(1, 40).await, Ok(2));
        assert!(!service.is_registered(1, 40).await);
        assert!(service.is_registered(2, 40).await);

        assert!(matches!(
            service.cancel_for_event(1, 40).await,
            Err(ApiError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_partial_cancel_still_invalidates() {
        let (backend, _) = fixture();
        backend.seed_registration(1, 40, None);
        backend.seed_registration(1, 40, None);

        let bus = Arc::new(InvalidationBus::new());
        let view: Arc<ViewCache<UserId, u32>> = ViewCache::new("participants");
        view.insert(1, 2);
        bus.register(view.clone());

        let flaky = Arc::new(FailsSecondDelete {
            inner: backend.clone(),
            deletes: AtomicUsize::new(0),
        });
        let service = RegistrationService::new(flaky, bus);

        assert_eq!(
            service.cancel_for_event(1, 40).await,
            Err(ApiError::Network("reset".to_string()))
        );
        assert_eq!(backend.list_registrations().await.unwrap().len(), 1);
        assert_eq!(view.get(&1), None);
    }

    #[tokio::test]
    async fn test_cancel_failing_first_delete_keeps_views() {
        let (backend, _) = fixture();
        backend.seed_registration(1, 40, None);

        let bus = Arc::new(InvalidationBus::new());
        let view: Arc<ViewCache<UserId, u32>> = ViewCache::new("participants");
        view.insert(1, 1);
        bus.register(view.clone());

        let service =
            RegistrationService::new(backend.clone(), bus).with_retry_policy(RetryPolicy::none());
        backend.fail_with(Some(ApiError::Timeout));

        assert_eq!(service.cancel_for_event(1, 40).await, Err(ApiError::Timeout));
        assert_eq!(view.get(&1), Some(1));
    }

    #[tokio::test]
    async fn test_participant_counts() {
        let (backend, service) = fixture();
        backend.seed_registration(1, 40, None);
        backend.seed_registration(1, 41, None);
        backend.seed_registration(3, 40, None);

        let raw = backend.list_events().await.unwrap();
        let mut events = transform_backend_events(&raw);
        service.participant_counts(&mut events).await.unwrap();

        let counts: Vec<(EventId, u32)> = events
            .iter()
            .map(|e| (e.id, e.current_participants))
            .collect();
        assert_eq!(counts, vec![(1, 2), (2, 0), (3, 1)]);
    }

    #[tokio::test]
    async fn test_reads_retry_but_not_on_rate_limit() {
        let (backend, service) = fixture();

        backend.fail_with(Some(ApiError::Timeout));
        assert_eq!(service.event_registrations(1).await, Err(ApiError::Timeout));
        assert_eq!(backend.registration_list_calls(), 3);

        backend.fail_with(Some(ApiError::RateLimited));
        assert_eq!(service.event_registrations(1).await, Err(ApiError::RateLimited));
        assert_eq!(backend.registration_list_calls(), 4);
    }

    #[tokio::test]
    async fn test_is_registered_degrades_to_false() {
        let (backend, service) = fixture();
        backend.seed_registration(1, 40, None);
        backend.fail_with(Some(ApiError::Network("offline".to_string())));
        assert!(!service.is_registered(1, 40).await);
    }
}
