use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{EventId, RunEvent, UserId};
use crate::registration::Registration;

/// Number of calendar months covered by the signups series, current month included.
pub const SIGNUP_MONTHS: u32 = 6;

/// New runners whose first registration fell in a given month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySignups {
    /// Abbreviated month name, e.g. `Jan`.
    pub name: String,
    pub value: u32,
}

/// Engagement figures for a business dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessMetrics {
    pub total_events: usize,
    pub total_participants: usize,
    pub total_unique_runners: usize,
    /// Share of runners registered for more than one run, in percent.
    pub repeat_runners_percentage: u32,
    pub average_runners_per_event: u32,
    /// Share of first-time runners who registered again, in percent.
    pub community_return_rate: u32,
    /// Oldest month first.
    pub new_signups_over_time: Vec<MonthlySignups>,
}

/// Aggregates a business's events and registrations into dashboard metrics.
///
/// Registrations for events outside `events` are ignored.
pub fn business_metrics(
    events: &[RunEvent],
    registrations: &[Registration],
    now: DateTime<Utc>,
) -> BusinessMetrics {
    let event_ids: HashSet<EventId> = events.iter().map(|e| e.id).collect();
    let mut relevant: Vec<&Registration> = registrations
        .iter()
        .filter(|r| event_ids.contains(&r.event_id))
        .collect();
    relevant.sort_by_key(|r| r.registered_at);

    let mut per_runner: HashMap<UserId, u32> = HashMap::new();
    let mut first_seen: HashMap<UserId, DateTime<Utc>> = HashMap::new();
    for registration in &relevant {
        *per_runner.entry(registration.runner_id).or_insert(0) += 1;
        first_seen
            .entry(registration.runner_id)
            .or_insert(registration.registered_at);
    }

    let unique = per_runner.len();
    let repeat = per_runner.values().filter(|&&count| count > 1).count();
    let repeat_pct = percentage(repeat, unique);

    BusinessMetrics {
        total_events: events.len(),
        total_participants: relevant.len(),
        total_unique_runners: unique,
        repeat_runners_percentage: repeat_pct,
        average_runners_per_event: if events.is_empty() {
            0
        } else {
            (relevant.len() as f64 / events.len() as f64).round() as u32
        },
        // Every runner has a first registration, so returners are the repeat runners.
        community_return_rate: repeat_pct,
        new_signups_over_time: monthly_signups(first_seen.values().copied(), now),
    }
}

fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

/// Months since year zero, used to bucket dates without label collisions.
fn month_index(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}

fn monthly_signups(
    first_registrations: impl Iterator<Item = DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Vec<MonthlySignups> {
    let current = month_index(now.year(), now.month());
    let oldest = current - i64::from(SIGNUP_MONTHS) + 1;

    let mut counts = vec![0u32; SIGNUP_MONTHS as usize];
    for first in first_registrations {
        let index = month_index(first.year(), first.month());
        if (oldest..=current).contains(&index) {
            counts[(index - oldest) as usize] += 1;
        }
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(offset, value)| {
            let index = oldest + offset as i64;
            let year = index.div_euclid(12) as i32;
            let month = index.rem_euclid(12) as u32 + 1;
            let name = NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%b").to_string())
                .unwrap_or_default();
            MonthlySignups { name, value }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{HostContact, PaceCategory};
    use crate::registration::RegistrationStatus;
    use chrono::TimeZone;

    fn run(id: EventId) -> RunEvent {
        RunEvent {
            id,
            title: format!("Run {id}"),
            host_id: 1,
            host_name: "Club".to_string(),
            starts_at: Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
            location: String::new(),
            address: String::new(),
            distance_km: 5.0,
            pace_min_per_km: 6.0,
            pace_category: PaceCategory::Intermediate,
            description: String::new(),
            max_participants: None,
            current_participants: 0,
            coordinates: None,
            whatsapp_group_link: None,
            host_contact: HostContact::default(),
        }
    }

    fn reg(id: u64, runner: UserId, event: EventId, at: DateTime<Utc>) -> Registration {
        Registration {
            id,
            event_id: event,
            runner_id: runner,
            runner_name: format!("User {runner}"),
            runner_email: String::new(),
            registered_at: at,
            status: RegistrationStatus::Confirmed,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_inputs() {
        let metrics = business_metrics(&[], &[], now());
        assert_eq!(metrics.total_unique_runners, 0);
        assert_eq!(metrics.repeat_runners_percentage, 0);
        assert_eq!(metrics.average_runners_per_event, 0);
        assert_eq!(metrics.new_signups_over_time.len(), 6);
        assert!(metrics.new_signups_over_time.iter().all(|m| m.value == 0));
    }

    #[test]
    fn test_counts_and_percentages() {
        let may = Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0).unwrap();
        let june = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let events = vec![run(1), run(2), run(3)];
        let registrations = vec![
            reg(1, 10, 1, may),
            reg(2, 10, 2, june),
            reg(3, 11, 1, may),
            reg(4, 12, 3, june),
            // Another business's run.
            reg(5, 13, 99, june),
        ];

        let metrics = business_metrics(&events, &registrations, now());
        assert_eq!(metrics.total_events, 3);
        assert_eq!(metrics.total_participants, 4);
        assert_eq!(metrics.total_unique_runners, 3);
        assert_eq!(metrics.repeat_runners_percentage, 33);
        assert_eq!(metrics.community_return_rate, 33);
        assert_eq!(metrics.average_runners_per_event, 1);
    }

    #[test]
    fn test_signups_keyed_by_first_registration() {
        let jan = Utc.with_ymd_and_hms(2025, 1, 20, 9, 0, 0).unwrap();
        let may = Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0).unwrap();
        let june = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let last_year = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap();
        let events = vec![run(1), run(2)];
        let registrations = vec![
            reg(1, 10, 1, may),
            reg(2, 10, 2, june),
            reg(3, 11, 1, jan),
            reg(4, 12, 2, june),
            reg(5, 13, 2, last_year),
        ];

        let series = business_metrics(&events, &registrations, now()).new_signups_over_time;
        let names: Vec<_> = series.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Jan", "Feb", "Mar", "Apr", "May", "Jun"]);
        let values: Vec<_> = series.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![1, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn test_signup_months_cross_year_boundary() {
        let feb = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let series = business_metrics(&[], &[], feb).new_signups_over_time;
        let names: Vec<_> = series.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Sep", "Oct", "Nov", "Dec", "Jan", "Feb"]);
    }
}
