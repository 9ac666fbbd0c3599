//! CLI argument definitions
//!
//! Uses clap derive macros for argument parsing.

use clap::{Parser, Subcommand};

/// CRLauncher - Lightweight Cosmic Reach Launcher
#[derive(Parser, Debug)]
#[command(name = "crlauncher")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// List all instances
    #[arg(short, long)]
    pub list: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new instance
    Create {
        /// Instance name
        name: String,
        /// Cosmic Reach version
        #[arg(short, long)]
        version: String,
        /// Group to place the instance in (empty = default group)
        #[arg(short, long, default_value = "")]
        group: String,
        /// Keep the instance on the latest version
        #[arg(long)]
        auto_update: bool,
    },

    /// List the screenshots of an instance
    Screenshots {
        /// Instance name
        instance: String,
    },
}
