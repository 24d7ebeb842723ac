//! Error types for otrack.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level result type for otrack operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Top-level error type for otrack.
///
/// Every variant renders a human-readable message; the operation boundary
/// (MCP tool or CLI command) turns it into a structured error result.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(
        "Obsidian Tracker not initialized. Please run initVault first with your Obsidian vault path."
    )]
    NotInitialized,

    #[error(
        "Vault path \"{}\" does not exist or is not a directory. Please run initVault with a valid path.",
        path.display()
    )]
    InvalidVaultPath { path: PathBuf },

    #[error("Cannot create vault path \"{}\": {source}", path.display())]
    CreateVault {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Project \"{name}\" not found in vault")]
    ProjectNotFound { name: String },

    #[error("Project \"{name}\" already exists in vault")]
    ProjectExists { name: String },

    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid {kind} \"{value}\": {reason}")]
    InvalidName {
        kind: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("invalid priority \"{0}\": expected one of critical, high, medium, low")]
    InvalidPriority(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
