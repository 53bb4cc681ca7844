//! Business post CLI commands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Business post commands.
#[derive(Debug, Parser)]
pub struct PostsCommand {
    #[command(subcommand)]
    pub action: PostsAction,
}

/// Available post actions.
#[derive(Debug, Subcommand)]
pub enum PostsAction {
    /// List a business's posts, newest first.
    List {
        /// Business ID.
        business_id: u64,
    },
    /// Publish a post.
    Create {
        /// Business ID.
        #[arg(long)]
        business_id: u64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// Image to attach. Repeatable.
        #[arg(long)]
        image: Vec<PathBuf>,
    },
    /// Edit a post's text or images.
    Update {
        /// Post ID.
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// Image to attach. Repeatable.
        #[arg(long)]
        image: Vec<PathBuf>,
        /// Image ID to remove. Repeatable.
        #[arg(long)]
        delete_image: Vec<u64>,
    },
    /// Delete a post.
    Delete {
        /// Post ID.
        id: u64,
    },
}
