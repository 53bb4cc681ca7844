use std::collections::HashMap;

use crate::event::{millis_to_datetime, EventId, UserId};

use super::types::{BackendRegistration, Registration, RegistrationStatus};

/// Converts a backend record into a [`Registration`].
///
/// Missing user details fall back to `User <runner_id>` and an empty email.
pub fn transform_registration(raw: &BackendRegistration) -> Registration {
    let user = raw.user.clone().unwrap_or_default();
    Registration {
        id: raw.id,
        event_id: raw.events_id,
        runner_id: raw.runner_id,
        runner_name: user
            .name
            .unwrap_or_else(|| format!("User {}", raw.runner_id)),
        runner_email: user.email.unwrap_or_default(),
        registered_at: millis_to_datetime(raw.created_at),
        status: RegistrationStatus::Confirmed,
    }
}

/// Registrations for one event.
pub fn registrations_for_event(
    registrations: &[BackendRegistration],
    event_id: EventId,
) -> Vec<BackendRegistration> {
    registrations
        .iter()
        .filter(|r| r.events_id == event_id)
        .cloned()
        .collect()
}

/// Registrations made by one runner.
pub fn registrations_for_runner(
    registrations: &[BackendRegistration],
    runner_id: UserId,
) -> Vec<BackendRegistration> {
    registrations
        .iter()
        .filter(|r| r.runner_id == runner_id)
        .cloned()
        .collect()
}

/// Number of registrations per event.
pub fn count_by_event(registrations: &[BackendRegistration]) -> HashMap<EventId, u32> {
    let mut counts = HashMap::new();
    for registration in registrations {
        *counts.entry(registration.events_id).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::RegistrationUser;

    fn reg(id: u64, runner: u64, event: u64) -> BackendRegistration {
        BackendRegistration {
            id,
            created_at: 1_717_000_000_000,
            runner_id: runner,
            events_id: event,
            user: None,
        }
    }

    #[test]
    fn test_transform_defaults_missing_user() {
        let r = transform_registration(&reg(1, 42, 7));
        assert_eq!(r.runner_name, "User 42");
        assert_eq!(r.runner_email, "");
        assert_eq!(r.event_id, 7);
        assert_eq!(r.status, RegistrationStatus::Confirmed);
        assert_eq!(r.registered_at.timestamp_millis(), 1_717_000_000_000);
    }

    #[test]
    fn test_transform_uses_nested_user() {
        let mut raw = reg(1, 42, 7);
        raw.user = Some(RegistrationUser {
            name: Some("Marta".to_string()),
            email: None,
        });
        let r = transform_registration(&raw);
        assert_eq!(r.runner_name, "Marta");
        assert_eq!(r.runner_email, "");
    }

    #[test]
    fn test_filters() {
        let all = vec![reg(1, 10, 1), reg(2, 11, 1), reg(3, 10, 2)];
        let ids: Vec<_> = registrations_for_event(&all, 1).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
        let ids: Vec<_> = registrations_for_runner(&all, 10).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_count_by_event() {
        let all = vec![reg(1, 10, 1), reg(2, 11, 1), reg(3, 10, 2)];
        let counts = count_by_event(&all);
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), Some(&1));
        assert_eq!(counts.get(&3), None);
    }
}
