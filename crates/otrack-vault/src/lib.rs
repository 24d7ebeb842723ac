//! # otrack-vault
//!
//! File system operations for an Obsidian project-tracking vault.
//!
//! The vault is the only source of truth: every operation re-reads the
//! files it needs, nothing is cached between calls.
//!
//! - [`layout`]: naming conventions and safe writes
//! - [`project`]: list, read and create projects
//! - [`logbook`]: bug reports and session logs
//! - [`search`]: tag and content search
//! - [`Tracker`]: the named operations, each guarded by vault resolution

pub mod layout;
pub mod logbook;
pub mod project;
pub mod search;

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use tracing::{info, warn};

use otrack_core::config::{Settings, VaultConfig};
use otrack_core::error::{Result, TrackerError};
use otrack_core::model::{
    ConfigReport, InitReport, NewBug, NewProject, NewSession, ProjectDetail, ProjectList,
    SearchReport, WriteReport,
};

/// The tracker operations over a vault resolved from [`Settings`].
#[derive(Debug, Clone)]
pub struct Tracker {
    settings: Settings,
}

impl Tracker {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Point the tracker at a vault directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::CreateVault`] with the I/O cause if the
    /// directory cannot be created and [`TrackerError::Io`] if the record cannot be saved.
    pub fn init_vault(&self, vault_path: &str) -> Result<InitReport> {
        if vault_path.trim().is_empty() {
            return Err(TrackerError::MissingArgument("vaultPath"));
        }
        let path = PathBuf::from(vault_path);
        if !layout::exists(&path) {
            if let Err(e) = fs::create_dir_all(&path) {
                warn!(path = %path.display(), error = %e, "cannot create vault directory");
                return Err(TrackerError::CreateVault { path, source: e });
            }
        }

        let store = self.settings.store();
        store.save(&VaultConfig {
            vault_path: Some(path.clone()),
            initialized: true,
        })?;
        info!(vault = %path.display(), config = %store.path().display(), "initialized vault");

        Ok(InitReport {
            success: true,
            message: "Obsidian Tracker initialized successfully!".to_string(),
            vault_path: path,
            config_file: store.path().to_path_buf(),
        })
    }

    /// Current record, resolved vault root and raw environment value.
    #[must_use]
    pub fn config(&self) -> ConfigReport {
        let store = self.settings.store();
        ConfigReport {
            initialized: store.load().initialized,
            vault_path: self.settings.resolve_vault_path(),
            config_file: store.path().to_path_buf(),
            env_var: self.settings.env_vault().map(str::to_string),
        }
    }

    /// # Errors
    ///
    /// Fails if the vault is not configured or cannot be listed.
    pub fn list_projects(&self) -> Result<ProjectList> {
        let root = self.settings.require_vault()?;
        Ok(ProjectList {
            projects: project::list(&root)?,
        })
    }

    /// # Errors
    ///
    /// Fails if the vault is not configured or the project does not exist.
    pub fn get_project(&self, name: &str) -> Result<ProjectDetail> {
        let root = self.settings.require_vault()?;
        project::get(&root, name)
    }

    /// # Errors
    ///
    /// Fails if the vault is not configured, arguments are missing, or the
    /// project already exists.
    pub fn create_project(&self, request: &NewProject) -> Result<WriteReport> {
        let root = self.settings.require_vault()?;
        let path = project::create(&root, request, Utc::now().date_naive())?;
        Ok(WriteReport::new(
            path,
            format!("Project \"{}\" created successfully", request.name),
        ))
    }

    /// # Errors
    ///
    /// Fails if the vault is not configured, the project does not exist, or
    /// the request is invalid.
    pub fn add_bug(&self, request: &NewBug) -> Result<WriteReport> {
        let root = self.settings.require_vault()?;
        let path = logbook::add_bug(&root, request, Utc::now().date_naive())?;
        Ok(WriteReport::new(
            path,
            format!("Bug report created: \"{}\"", request.title),
        ))
    }

    /// # Errors
    ///
    /// Fails if the vault is not configured, the project does not exist, or
    /// the goal is missing.
    pub fn add_session(&self, request: &NewSession) -> Result<WriteReport> {
        let root = self.settings.require_vault()?;
        let path = logbook::add_session(&root, request, Utc::now())?;
        Ok(WriteReport::new(path, "Session logged"))
    }

    /// # Errors
    ///
    /// Fails if the vault is not configured or the query is blank.
    pub fn search(&self, query: &str) -> Result<SearchReport> {
        let root = self.settings.require_vault()?;
        let hits = search::search(&root, query)?;
        Ok(SearchReport::new(query, hits))
    }
}
