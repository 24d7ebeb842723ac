//! # otrack-core
//!
//! Core types for tracking projects, bugs and work sessions in an Obsidian
//! vault.
//!
//! This crate defines the foundational pieces used by the other otrack crates:
//! - Error hierarchy ([`TrackerError`])
//! - Frontmatter parsing and writing ([`frontmatter`])
//! - Vault configuration and root resolution ([`config`])
//! - Request and result types ([`model`])

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod model;

pub use config::{ConfigStore, Settings, VaultConfig};
pub use error::{Result, TrackerError};
pub use frontmatter::Frontmatter;
pub use model::{
    ConfigReport, InitReport, MatchKind, NewBug, NewProject, NewSession, Priority, ProjectDetail,
    ProjectList, ProjectSummary, SearchHit, SearchReport, WriteReport,
};
