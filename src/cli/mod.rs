//! CLI module for Battlecry.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Battlecry - game-unit voice lines as Claude Code notification sounds
///
/// Curates named lists of short audio quotes mapped to Claude Code
/// lifecycle hooks and keeps a local sound library in exact sync with
/// the active list.
#[derive(Parser, Debug)]
#[command(name = "battlecry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Battlecry and verify system requirements
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Manage recommendation lists
    Lists {
        #[command(subcommand)]
        action: ListsAction,
    },

    /// Sync the sound library with the active list (delete orphans,
    /// skip present files, download the rest)
    Sync,

    /// Force-save a quote selection into one library folder
    Save {
        /// Target folder (start, userpromptsubmit, done, precompact,
        /// permission, question)
        #[arg(short, long)]
        folder: String,

        /// JSON file with the quote selection
        quotes: String,
    },

    /// Export a quote selection as a ZIP archive
    Export {
        /// JSON file with the quote selection
        quotes: String,

        /// Output archive path
        #[arg(short, long, default_value = "battlecry-quotes.zip")]
        output: String,
    },

    /// Download and transcode a single clip
    Download {
        /// Source URL of the clip
        url: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Start the HTTP API server for the browser frontend
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ListsAction {
    /// Show all lists and the active list's hooks
    Show,

    /// Create a new list and make it active
    Create {
        /// Display name for the new list
        name: String,
    },

    /// Delete a list (the default list cannot be deleted)
    Delete {
        /// List id
        id: String,
    },

    /// Rename a list
    Rename {
        /// List id
        id: String,
        /// New display name
        name: String,
    },

    /// Make a list active
    Use {
        /// List id
        id: String,
    },

    /// Import a legacy hooks export into the active list
    Import {
        /// JSON file with a {"hooks": [...]} shape
        file: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "fetch.timeout_seconds")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
