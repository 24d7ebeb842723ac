//! Request and result types shared by the vault, MCP and CLI layers.
//!
//! Results serialize with camelCase keys, matching the tool parameter names.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::TrackerError;
use crate::frontmatter::Frontmatter;

/// Bug priority. Parsing is case-insensitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Parse an optional caller-supplied priority; absent or blank means medium.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidPriority`] for anything outside the set.
    pub fn parse_or_default(raw: Option<&str>) -> Result<Self, TrackerError> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => s.parse(),
            None => Ok(Priority::default()),
        }
    }
}

impl FromStr for Priority {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(TrackerError::InvalidPriority(s.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// === Requests ===

#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub repository: Option<String>,
    pub local_path: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewBug {
    pub project: String,
    pub title: String,
    pub description: String,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewSession {
    pub project: String,
    pub goal: String,
    pub actions: Vec<String>,
    pub results: Option<String>,
    pub next_steps: Option<String>,
}

// === Results ===

/// One row of `listProjects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub name: String,
    pub status: String,
    pub description: String,
    /// Number of bug documents in the project directory.
    pub bugs: usize,
    pub path: PathBuf,
}

/// Full view of a project returned by `getProject`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub name: String,
    pub path: PathBuf,
    pub frontmatter: Frontmatter,
    /// Dashboard body, or a placeholder when there is no dashboard.
    pub dashboard: String,
    /// Bug titles.
    pub bugs: Vec<String>,
    /// Session document file names.
    pub sessions: Vec<String>,
}

/// Which search mode produced a hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchKind {
    Tag(String),
    Content,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Tag(tag) => write!(f, "tag:#{tag}"),
            MatchKind::Content => f.write_str("content"),
        }
    }
}

impl Serialize for MatchKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub project: String,
    pub file: String,
    #[serde(rename = "match")]
    pub kind: MatchKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitReport {
    pub success: bool,
    pub message: String,
    pub vault_path: PathBuf,
    pub config_file: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigReport {
    pub initialized: bool,
    /// Resolved vault root, if any.
    pub vault_path: Option<PathBuf>,
    pub config_file: PathBuf,
    /// Raw `OBSIDIAN_VAULT` value.
    pub env_var: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectList {
    pub projects: Vec<ProjectSummary>,
}

/// Result of an operation that wrote a document or directory.
#[derive(Debug, Clone, Serialize)]
pub struct WriteReport {
    pub success: bool,
    pub path: PathBuf,
    pub message: String,
}

impl WriteReport {
    pub fn new(path: PathBuf, message: impl Into<String>) -> Self {
        Self {
            success: true,
            path,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub count: usize,
}

impl SearchReport {
    #[must_use]
    pub fn new(query: impl Into<String>, results: Vec<SearchHit>) -> Self {
        Self {
            query: query.into(),
            count: results.len(),
            results,
        }
    }
}
