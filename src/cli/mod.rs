//! CLI module - Command-line interface for Cyclery
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

pub use commands::cmd_seed;

/// Cyclery - Bicycle Resale Marketplace
/// Browse, search and sell used bicycles
#[derive(Parser)]
#[command(name = "cyclery")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the marketplace HTTP server
    #[command(alias = "-s", alias = "--serve")]
    Serve,

    /// Insert demo users, listings and FAQs into the database
    Seed,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}
