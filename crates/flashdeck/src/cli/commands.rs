//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Interface to bind (overrides `server.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Categories command arguments.
#[derive(Debug, Args)]
pub struct CategoriesCommand {
    /// Server base URL (overrides `client.base_url`)
    #[arg(short, long, value_name = "URL")]
    pub server: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Create command arguments.
#[derive(Debug, Args)]
pub struct CreateCommand {
    /// Question side of the card
    #[arg(short, long)]
    pub front: String,

    /// Answer side of the card
    #[arg(short, long)]
    pub back: String,

    /// Category label (defaults to "General")
    #[arg(short = 'C', long)]
    pub category: Option<String>,

    /// Server base URL (overrides `client.base_url`)
    #[arg(short, long, value_name = "URL")]
    pub server: Option<String>,
}

/// Review command arguments.
#[derive(Debug, Args)]
pub struct ReviewCommand {
    /// Start filtered to this category
    #[arg(short = 'C', long)]
    pub category: Option<String>,

    /// Server base URL (overrides `client.base_url`)
    #[arg(short, long, value_name = "URL")]
    pub server: Option<String>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
