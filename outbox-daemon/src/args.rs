//! Command-line argument parsing

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use outbox_core::TransferStatus;

/// Get default database path help text for current platform
fn default_database_help() -> String {
    #[cfg(target_os = "linux")]
    return "Database file path (default: ~/.local/share/outboxd/outbox.db)".to_string();

    #[cfg(target_os = "macos")]
    return "Database file path (default: ~/Library/Application Support/outboxd/outbox.db)"
        .to_string();

    #[cfg(target_os = "windows")]
    return "Database file path (default: %APPDATA%\\outboxd\\outbox.db)".to_string();

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    return "Database file path (overrides platform default)".to_string();
}

/// Parse a history status filter (case-insensitive)
fn parse_status(s: &str) -> Result<TransferStatus, String> {
    match s.to_ascii_lowercase().as_str() {
        "success" => Ok(TransferStatus::Success),
        "failure" => Ok(TransferStatus::Failure),
        _ => Err(format!("invalid status '{}': use success or failure", s)),
    }
}

/// Outbox relay daemon
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Watch a directory and relay each new file to the FTP server
    Watch {
        /// Directory to watch recursively (must exist)
        #[arg(short, long)]
        directory: PathBuf,

        /// FTP host, with an optional port (defaults to 21)
        #[arg(short = 'H', long)]
        host: String,

        /// FTP user name
        #[arg(short, long)]
        user: String,

        /// FTP password (falls back to the OUTBOX_FTP_PASSWORD environment variable)
        #[arg(short, long)]
        password: Option<String>,

        /// Database file path (overrides platform default)
        #[arg(long, help = default_database_help())]
        database: Option<PathBuf>,

        /// Enable debug logging
        #[arg(long, default_value = "false")]
        debug: bool,
    },

    /// Print the transfer history, newest first
    History {
        /// Only show records with this status (success or failure)
        #[arg(short, long, value_parser = parse_status)]
        status: Option<TransferStatus>,

        /// Inclusive lower bound, formatted "YYYY-MM-DD HH:MM:SS"
        #[arg(long)]
        from: Option<String>,

        /// Inclusive upper bound, formatted "YYYY-MM-DD HH:MM:SS"
        #[arg(long)]
        to: Option<String>,

        /// Maximum number of records to print
        #[arg(short, long)]
        limit: Option<u32>,

        /// Database file path (overrides platform default)
        #[arg(long, help = default_database_help())]
        database: Option<PathBuf>,
    },
}
