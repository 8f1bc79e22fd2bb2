//! CLI module - Command-line interface for Emporia
//!
//! This module provides a structured CLI using clap for argument parsing.

use clap::{Parser, Subcommand};

/// Emporia - Storefront admin & analytics API
#[derive(Parser)]
#[command(name = "emporia")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the API server
    #[command(alias = "daemon", alias = "-d")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Create an admin account
    CreateAdmin {
        /// Email for the new admin
        email: String,

        /// Password (prompted interactively when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Prune analytics events older than the retention window, then exit
    Prune,
}
