//! Business dashboard metrics.

use std::sync::Arc;

use chrono::Utc;
use runhub_core::api::ApiResult;
use runhub_core::event::{EventId, UserId};
use runhub_core::metrics::{business_metrics, BusinessMetrics};
use runhub_core::registration::transform_registration;

use crate::cache::{EventCache, ViewCache};

use super::registrations::RegistrationService;

/// Metrics cache keyed by business.
pub type MetricsCache = ViewCache<UserId, BusinessMetrics>;

/// Computes per-business metrics from the cached events and live registrations.
///
/// Results are kept until the next event invalidation.
#[derive(Clone)]
pub struct BusinessDashboard {
    events: Arc<EventCache>,
    registrations: RegistrationService,
    views: Arc<MetricsCache>,
}

impl BusinessDashboard {
    pub fn new(
        events: Arc<EventCache>,
        registrations: RegistrationService,
        views: Arc<MetricsCache>,
    ) -> Self {
        Self {
            events,
            registrations,
            views,
        }
    }

    pub async fn metrics(&self, business_id: UserId) -> ApiResult<BusinessMetrics> {
        if let Some(metrics) = self.views.get(&business_id) {
            tracing::trace!(business_id, "Cache hit for business metrics");
            return Ok(metrics);
        }

        tracing::trace!(business_id, "Cache miss for business metrics");
        let events = self.events.get_business_events(business_id).await;
        let event_ids: Vec<EventId> = events.iter().map(|e| e.id).collect();
        let registrations: Vec<_> = self
            .registrations
            .all_registrations()
            .await?
            .iter()
            .filter(|r| event_ids.contains(&r.events_id))
            .map(transform_registration)
            .collect();

        let metrics = business_metrics(&events, &registrations, Utc::now());
        self.views.insert(business_id, metrics.clone());
        Ok(metrics)
    }
}
