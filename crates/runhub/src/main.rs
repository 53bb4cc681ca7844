//! runhub CLI entry point.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use runhub::cli::events::{image_content_type, EventsAction};
use runhub::cli::posts::PostsAction;
use runhub::cli::registrations::RegistrationsAction;
use runhub::cli::{Cli, Commands, OutputFormat};
use runhub::output::{format_output, pretty};
use runhub::services::PostImageChanges;
use runhub::state::{AppState, Ports};
use runhub_core::event::{filter_runs, upcoming_events, RunFilter};
use runhub_core::post::{NewPost, PostPatch};
use runhub_core::storage::ImageUpload;

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        config,
        format,
        quiet,
        demo,
        command,
    } = Cli::parse();

    // Logs go to stderr so JSON output stays parseable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runhub=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let state = if demo {
        tracing::debug!("Using in-memory services");
        AppState::with_demo_data(&config)
    } else {
        let ports = Ports::http(&config).context("Invalid service configuration")?;
        AppState::new(ports, &config)
    };

    let sweeper = state.geocoder.spawn_sweeper();
    let result = run(&state, command, format, quiet).await;
    sweeper.abort();
    result
}

async fn run(state: &AppState, command: Commands, format: OutputFormat, quiet: bool) -> Result<()> {
    match command {
        Commands::Events(events_cmd) => events(state, events_cmd.action, format, quiet).await,
        Commands::Geocode { address } => match state.geocoder.geocode(&address).await? {
            Some(hit) => {
                let output = format_output(&hit, format, |hit| {
                    pretty::format_geocode_hit(address.trim(), hit)
                });
                println!("{}", output);
                Ok(())
            }
            None => bail!("Address is empty"),
        },
        Commands::Registrations(registrations_cmd) => {
            registrations(state, registrations_cmd.action, format, quiet).await
        }
        Commands::Posts(posts_cmd) => posts(state, posts_cmd.action, format, quiet).await,
        Commands::Metrics { business_id } => {
            let metrics = state.dashboard.metrics(business_id).await?;
            let output = format_output(&metrics, format, |metrics| {
                pretty::format_metrics(business_id, metrics)
            });
            println!("{}", output);
            Ok(())
        }
    }
}

async fn events(state: &AppState, action: EventsAction, format: OutputFormat, quiet: bool) -> Result<()> {
    match action {
        EventsAction::List {
            pace,
            distance,
            date,
            location,
            near,
            with_counts,
            upcoming,
        } => {
            let mut events = state.events.get_all_events().await;
            if upcoming {
                events = upcoming_events(&events, Utc::now());
            }
            if with_counts {
                state.registrations.participant_counts(&mut events).await?;
            }
            let near = match near {
                Some(address) => state.geocoder.geocode(&address).await?.map(|hit| hit.coordinates),
                None => None,
            };
            let filter = RunFilter {
                pace: pace.into_iter().map(Into::into).collect(),
                distance: distance.into_iter().map(Into::into).collect(),
                date,
                location,
                near,
            };
            let runs = filter_runs(&events, &filter);
            println!("{}", format_output(&runs, format, |runs| pretty::format_events(runs)));
        }
        EventsAction::Get { id } => {
            let Some(event) = state.events.get_event(id).await else {
                bail!("Event {} not found", id);
            };
            println!("{}", format_output(&event, format, pretty::format_event));
        }
        EventsAction::Business { business_id } => {
            let events = state.events.get_business_events(business_id).await;
            println!("{}", format_output(&events, format, |events| pretty::format_events(events)));
        }
        EventsAction::Create {
            fields,
            host_id,
            host_name,
            geocode,
            image,
        } => {
            let mut new_event = fields.into_new_event(host_id, host_name);
            if geocode {
                if let Some(hit) = state.geocoder.geocode(&new_event.address).await? {
                    new_event = new_event.with_coordinates(hit.coordinates);
                }
            }
            let image = match image {
                Some(path) => Some(read_image(&path).await?),
                None => None,
            };
            let event = state.event_service.create_event(new_event, image).await?;
            let output = format_output(&event, format, |event| {
                format!("Created:\n{}", pretty::format_event(event))
            });
            println!("{}", output);
        }
        EventsAction::Update { id, fields } => {
            let event = state.event_service.update_event(id, fields.into_patch()).await?;
            let output = format_output(&event, format, |event| {
                format!("Updated:\n{}", pretty::format_event(event))
            });
            println!("{}", output);
        }
        EventsAction::Delete { id } => {
            state.event_service.delete_event(id).await?;
            if !quiet {
                println!("Deleted event {}", id);
            }
        }
    }
    Ok(())
}

async fn registrations(
    state: &AppState,
    action: RegistrationsAction,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match action {
        RegistrationsAction::List { event_id, runner_id } => {
            let registrations = match (event_id, runner_id) {
                (Some(event_id), _) => state.registrations.event_registrations(event_id).await?,
                (None, Some(runner_id)) => state.registrations.runner_registrations(runner_id).await?,
                (None, None) => bail!("Either --event-id or --runner-id is required"),
            };
            let output = format_output(&registrations, format, |registrations| {
                pretty::format_registrations(registrations)
            });
            println!("{}", output);
        }
        RegistrationsAction::Create { event_id, runner_id } => {
            let registration = state.registrations.register(event_id, runner_id).await?;
            let output = format_output(&registration, format, |registration| {
                format!("Registered:\n{}", pretty::format_registration(registration))
            });
            println!("{}", output);
        }
        RegistrationsAction::Cancel {
            id,
            event_id,
            runner_id,
        } => match (id, event_id, runner_id) {
            (Some(id), _, _) => {
                state.registrations.cancel(id).await?;
                if !quiet {
                    println!("Cancelled registration {}", id);
                }
            }
            (None, Some(event_id), Some(runner_id)) => {
                let count = state.registrations.cancel_for_event(event_id, runner_id).await?;
                if !quiet {
                    println!(
                        "Cancelled {} registration(s) of runner {} for event {}",
                        count, runner_id, event_id
                    );
                }
            }
            _ => bail!("Either --id or both --event-id and --runner-id are required"),
        },
    }
    Ok(())
}

async fn posts(state: &AppState, action: PostsAction, format: OutputFormat, quiet: bool) -> Result<()> {
    match action {
        PostsAction::List { business_id } => {
            let posts = state.posts.business_posts(business_id).await?;
            println!("{}", format_output(&posts, format, |posts| pretty::format_posts(posts)));
        }
        PostsAction::Create {
            business_id,
            title,
            content,
            image,
        } => {
            let images = read_images(&image).await?;
            let post = state
                .posts
                .create_post(NewPost::new(business_id, title, content), images)
                .await?;
            let output = format_output(&post, format, |post| {
                format!("Published:\n{}", pretty::format_post(post))
            });
            println!("{}", output);
        }
        PostsAction::Update {
            id,
            title,
            content,
            image,
            delete_image,
        } => {
            let changes = PostImageChanges {
                added: read_images(&image).await?,
                removed: delete_image,
            };
            let post = state
                .posts
                .update_post(id, PostPatch { title, content }, changes)
                .await?;
            let output = format_output(&post, format, |post| {
                format!("Updated:\n{}", pretty::format_post(post))
            });
            println!("{}", output);
        }
        PostsAction::Delete { id } => {
            state.posts.delete_post(id).await?;
            if !quiet {
                println!("Deleted post {}", id);
            }
        }
    }
    Ok(())
}

async fn read_image(path: &Path) -> Result<ImageUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = image_content_type(&file_name);
    Ok(ImageUpload::new(file_name, bytes, content_type))
}

async fn read_images(paths: &[PathBuf]) -> Result<Vec<ImageUpload>> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        images.push(read_image(path).await?);
    }
    Ok(images)
}
