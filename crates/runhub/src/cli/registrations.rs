//! Registration CLI commands.

use clap::{Parser, Subcommand};

/// Registration management commands.
#[derive(Debug, Parser)]
pub struct RegistrationsCommand {
    #[command(subcommand)]
    pub action: RegistrationsAction,
}

/// Available registration actions.
#[derive(Debug, Subcommand)]
pub enum RegistrationsAction {
    /// List registrations for an event or a runner.
    List {
        /// Event ID.
        #[arg(long, required_unless_present = "runner_id", conflicts_with = "runner_id")]
        event_id: Option<u64>,
        /// Runner ID.
        #[arg(long)]
        runner_id: Option<u64>,
    },
    /// Register a runner for an event.
    Create {
        /// Event ID.
        #[arg(long)]
        event_id: u64,
        /// Runner ID.
        #[arg(long)]
        runner_id: u64,
    },
    /// Cancel a registration by ID, or every registration of a runner for an event.
    Cancel {
        /// Registration ID.
        #[arg(long, required_unless_present = "event_id", conflicts_with_all = ["event_id", "runner_id"])]
        id: Option<u64>,
        /// Event ID.
        #[arg(long, requires = "runner_id")]
        event_id: Option<u64>,
        /// Runner ID.
        #[arg(long, requires = "event_id")]
        runner_id: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};

    fn parse(args: &[&str]) -> Result<RegistrationsAction, clap::Error> {
        let cli = Cli::try_parse_from(args)?;
        match cli.command {
            Commands::Registrations(cmd) => Ok(cmd.action),
            other => panic!("Expected registrations command, got {:?}", other),
        }
    }

    #[test]
    fn test_cancel_by_event_and_runner() {
        let action = parse(&[
            "runhub",
            "registrations",
            "cancel",
            "--event-id",
            "3",
            "--runner-id",
            "9",
        ])
        .unwrap();
        match action {
            RegistrationsAction::Cancel {
                id,
                event_id,
                runner_id,
            } => {
                assert_eq!(id, None);
                assert_eq!(event_id, Some(3));
                assert_eq!(runner_id, Some(9));
            }
            other => panic!("Expected cancel, got {:?}", other),
        }
    }

    #[test]
    fn test_cancel_requires_a_target() {
        assert!(parse(&["runhub", "registrations", "cancel"]).is_err());
        assert!(parse(&["runhub", "registrations", "cancel", "--event-id", "3"]).is_err());
        assert!(parse(&["runhub", "registrations", "cancel", "--id", "1", "--event-id", "3"]).is_err());
    }

    #[test]
    fn test_list_requires_one_filter() {
        assert!(parse(&["runhub", "registrations", "list"]).is_err());
        assert!(parse(&["runhub", "registrations", "list", "--runner-id", "9"]).is_ok());
    }
}
