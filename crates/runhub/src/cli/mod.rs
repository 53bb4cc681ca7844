//! CLI command definitions.

pub mod events;
pub mod posts;
pub mod registrations;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;

/// Command-line client for the runhub marketplace.
#[derive(Debug, Parser)]
#[command(name = "runhub")]
#[command(version, about = "Command-line client for the runhub marketplace", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    /// Output format.
    #[arg(long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Run against seeded in-memory services instead of the network.
    #[arg(long, global = true, env = "RUNHUB_DEMO")]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Browse and manage runs.
    Events(events::EventsCommand),
    /// Resolve an address to coordinates.
    Geocode {
        /// Street address.
        address: String,
    },
    /// Runner registrations.
    Registrations(registrations::RegistrationsCommand),
    /// Business posts.
    Posts(posts::PostsCommand),
    /// Engagement metrics for a business.
    Metrics {
        /// Business (host) ID.
        business_id: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_geocode_with_global_flags() {
        let cli = Cli::try_parse_from([
            "runhub",
            "geocode",
            "221B Baker Street, London",
            "--format",
            "json",
            "--demo",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.demo);
        match cli.command {
            Commands::Geocode { address } => assert_eq!(address, "221B Baker Street, London"),
            other => panic!("Expected geocode, got {:?}", other),
        }
    }
}
