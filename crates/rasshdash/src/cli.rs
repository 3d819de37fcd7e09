//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// RASSH honeypot dashboard
#[derive(Parser, Debug)]
#[command(name = "rasshdash")]
#[command(about = "Live dashboard for the RASSH honeypot", long_about = None)]
#[command(version = env!("RASSH_DASH_VERSION"))]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Config file (overrides $RASSH_DASH_CONFIG and the XDG location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Honeypot base URL, e.g. http://10.0.0.5:8080
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Log changes instead of drawing the terminal UI
    #[arg(long, global = true)]
    pub headless: bool,

    /// Subcommand (if not provided, runs `watch`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the live dashboard
    Watch,

    /// Pull both endpoints once and print what the honeypot reports
    Status {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_watch() {
        let cli = Cli::parse_from(["rasshdash"]);
        assert!(cli.command.is_none());
        assert!(!cli.headless);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "rasshdash",
            "status",
            "--json",
            "--url",
            "http://10.0.0.5:8080",
        ]);
        assert_eq!(cli.command, Some(Commands::Status { json: true }));
        assert_eq!(cli.url.as_deref(), Some("http://10.0.0.5:8080"));
    }
}
