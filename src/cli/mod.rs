//! CLI module - Command-line interface for pocketkit
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// pocketkit - calculator, text tools and premium utilities behind simple token auth
#[derive(Parser)]
#[command(name = "pocketkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server (default)
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Manage stored users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List registered usernames
    #[command(alias = "ls")]
    List,

    /// Grant the premium flag to a user
    Upgrade {
        /// Username to upgrade
        username: String,
    },

    /// Delete every stored user
    Reset {
        /// Skip the confirmation guard
        #[arg(long)]
        yes: bool,
    },
}

pub use commands::*;
