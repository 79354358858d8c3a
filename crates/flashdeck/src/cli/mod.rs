//! Command-line interface for flashdeck.
//!
//! This module provides the CLI structure, terminal rendering and input
//! parsing for the `fdeck` binary.

mod commands;
pub mod interactive;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CategoriesCommand, ConfigCommand, CreateCommand, ReviewCommand, ServeCommand, StatusCommand,
};

/// fdeck - Study with flashcards
///
/// Runs the flashcard server and talks to it: browse categories, create cards
/// and review them one at a time.
#[derive(Debug, Parser)]
#[command(name = "fdeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve(ServeCommand),

    /// Show flashcard counts per category
    Categories(CategoriesCommand),

    /// Create a flashcard
    Create(CreateCommand),

    /// Review flashcards interactively
    Review(ReviewCommand),

    /// Show local database statistics
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
