//! CLI parse: clap types for Jargal. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Jargal CLI - render template generators into a workspace
#[derive(Debug, Parser)]
#[command(name = "jargal")]
#[command(about = "Run template generators declared in jargal.toml")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a generator (asks which one when several are configured)
    Run {
        /// Generator name
        name: Option<String>,

        /// Pre-answer a prompt (repeatable)
        #[arg(long = "answer", value_name = "KEY=VALUE")]
        answers: Vec<String>,

        /// Behavior for existing files (force, skip-if-exists)
        #[arg(long)]
        mode: Option<String>,

        /// Never prompt; unanswered prompts use their defaults
        #[arg(long)]
        no_input: bool,
    },
    /// List configured generators
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
