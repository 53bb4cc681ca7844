//! Pretty output formatting.

use runhub_core::event::RunEvent;
use runhub_core::metrics::BusinessMetrics;
use runhub_core::post::BusinessPost;
use runhub_core::registration::Registration;

use crate::cache::{GeocodeHit, HitSource};

/// Format a run for display.
pub fn format_event(event: &RunEvent) -> String {
    let mut output = format!(
        "{} [{}]\n  ID: {}\n  Host: {} ({})\n  Starts: {}\n  Distance: {} km @ {:.2} min/km",
        event.title,
        event.pace_category.as_str(),
        event.id,
        event.host_name,
        event.host_id,
        event.starts_at.format("%Y-%m-%d %H:%M UTC"),
        event.distance_km,
        event.pace_min_per_km,
    );
    if !event.address.is_empty() {
        output.push_str(&format!("\n  Address: {}", event.address));
    }
    if let Some(coords) = &event.coordinates {
        output.push_str(&format!("\n  Coordinates: {}", coords.display_pair()));
    }
    match event.max_participants {
        Some(max) => output.push_str(&format!(
            "\n  Participants: {}/{}",
            event.current_participants, max
        )),
        None => output.push_str(&format!(
            "\n  Participants: {}",
            event.current_participants
        )),
    }
    if !event.description.is_empty() {
        output.push_str(&format!("\n  Description: {}", event.description));
    }
    output
}

/// Format runs for display.
pub fn format_events(events: &[RunEvent]) -> String {
    if events.is_empty() {
        return "No runs found.".to_string();
    }
    let mut output = format!("RUNS ({})\n", events.len());
    output.push_str(&"-".repeat(40));
    for event in events {
        output.push_str(&format!("\n{}", format_event(event)));
        output.push('\n');
    }
    output
}

/// Format a registration for display.
pub fn format_registration(registration: &Registration) -> String {
    let mut output = format!(
        "{} -> event {}\n  ID: {}\n  Runner: {}\n  Registered: {}",
        registration.runner_name,
        registration.event_id,
        registration.id,
        registration.runner_id,
        registration.registered_at.format("%Y-%m-%d %H:%M UTC"),
    );
    if !registration.runner_email.is_empty() {
        output.push_str(&format!("\n  Email: {}", registration.runner_email));
    }
    output
}

/// Format registrations for display.
pub fn format_registrations(registrations: &[Registration]) -> String {
    if registrations.is_empty() {
        return "No registrations found.".to_string();
    }
    let mut output = format!("REGISTRATIONS ({})\n", registrations.len());
    output.push_str(&"-".repeat(40));
    for registration in registrations {
        output.push_str(&format!("\n{}", format_registration(registration)));
        output.push('\n');
    }
    output
}

/// Format a business post for display.
pub fn format_post(post: &BusinessPost) -> String {
    let mut output = format!(
        "{}\n  ID: {}\n  Business: {}\n  Posted: {}\n  {}",
        post.title,
        post.id,
        post.business_name.as_deref().unwrap_or("-"),
        post.created_at.format("%Y-%m-%d %H:%M UTC"),
        post.content,
    );
    for image in &post.images {
        output.push_str(&format!("\n  Image {}: {}", image.id, image.url));
    }
    output
}

pub fn format_posts(posts: &[BusinessPost]) -> String {
    if posts.is_empty() {
        return "No posts found.".to_string();
    }
    let mut output = format!("POSTS ({})\n", posts.len());
    output.push_str(&"-".repeat(40));
    for post in posts {
        output.push_str(&format!("\n{}", format_post(post)));
        output.push('\n');
    }
    output
}

pub fn format_geocode_hit(address: &str, hit: &GeocodeHit) -> String {
    let source = match hit.source {
        HitSource::Network => "geocoder",
        HitSource::Cache => "cache",
        HitSource::Stale => "expired cache entry, geocoder unavailable",
    };
    format!(
        "{}\n  Coordinates: {}\n  Source: {}",
        address,
        hit.coordinates.display_pair(),
        source
    )
}

/// Format dashboard metrics for display.
pub fn format_metrics(business_id: u64, metrics: &BusinessMetrics) -> String {
    let mut output = format!(
        "BUSINESS {}\n{}\n  Events: {}\n  Participants: {}\n  Unique runners: {}\n  Repeat runners: {}%\n  Average runners per event: {}\n  Community return rate: {}%\n  New runners:",
        business_id,
        "-".repeat(40),
        metrics.total_events,
        metrics.total_participants,
        metrics.total_unique_runners,
        metrics.repeat_runners_percentage,
        metrics.average_runners_per_event,
        metrics.community_return_rate,
    );
    for month in &metrics.new_signups_over_time {
        output.push_str(&format!("\n    {}: {}", month.name, month.value));
    }
    output
}
