//! Vault configuration: the persisted record and vault root resolution.
//!
//! The record lives at `~/.config/obsidian-tracker/config.json`:
//! ```json
//! {
//!   "vaultPath": "/Users/me/Obsidian/Projects",
//!   "initialized": true
//! }
//! ```
//!
//! The process environment is read once, into [`Settings`], which is then
//! passed explicitly to every operation. Resolution precedence is fixed:
//! the persisted `vaultPath` wins over the `OBSIDIAN_VAULT` environment
//! variable.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, TrackerError};

/// Environment variable that supplies a fallback vault path.
pub const VAULT_ENV_VAR: &str = "OBSIDIAN_VAULT";

/// Directory under `~/.config` holding the persisted record.
pub const APP_DIR: &str = "obsidian-tracker";

/// File name of the persisted record.
pub const CONFIG_FILE: &str = "config.json";

/// The persisted configuration record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_path: Option<PathBuf>,
    #[serde(default)]
    pub initialized: bool,
}

/// Reads and writes the persisted [`VaultConfig`] record.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Well-known record location under a home directory.
    #[must_use]
    pub fn default_path(home: &Path) -> PathBuf {
        home.join(".config").join(APP_DIR).join(CONFIG_FILE)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record. A missing or malformed file yields the default
    /// (uninitialized) record.
    #[must_use]
    pub fn load(&self) -> VaultConfig {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no config record");
                return VaultConfig::default();
            }
        };
        serde_json::from_str(&data).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring malformed config record");
            VaultConfig::default()
        })
    }

    /// Overwrite the record, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Io`] if the directory or file cannot be written.
    pub fn save(&self, config: &VaultConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json =
            serde_json::to_string_pretty(config).map_err(|e| TrackerError::Config(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Everything an operation needs to find the vault, captured once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    store: ConfigStore,
    env_vault: Option<String>,
    home: Option<PathBuf>,
}

impl Settings {
    pub fn new(store: ConfigStore, env_vault: Option<String>, home: Option<PathBuf>) -> Self {
        Self {
            store,
            env_vault,
            home,
        }
    }

    /// Capture the process environment with the record at its default location.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Config`] if the home directory is unknown.
    pub fn from_env() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| TrackerError::Config("cannot determine home directory".to_string()))?;
        let store = ConfigStore::new(ConfigStore::default_path(&home));
        Ok(Self::with_store(store))
    }

    /// Capture the process environment with an explicit record location.
    #[must_use]
    pub fn with_store(store: ConfigStore) -> Self {
        Self::new(
            store,
            std::env::var(VAULT_ENV_VAR).ok(),
            dirs::home_dir(),
        )
    }

    #[must_use]
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Raw value of `OBSIDIAN_VAULT`, unexpanded.
    #[must_use]
    pub fn env_vault(&self) -> Option<&str> {
        self.env_vault.as_deref()
    }

    /// Resolve the vault root from a freshly loaded record.
    #[must_use]
    pub fn resolve_vault_path(&self) -> Option<PathBuf> {
        resolve_vault_path(
            &self.store.load(),
            self.env_vault.as_deref(),
            self.home.as_deref(),
        )
    }

    /// Resolve the vault root and check that it is a directory.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotInitialized`] if no path is configured and
    /// [`TrackerError::InvalidVaultPath`] if the path is not a directory.
    pub fn require_vault(&self) -> Result<PathBuf> {
        let path = self
            .resolve_vault_path()
            .ok_or(TrackerError::NotInitialized)?;
        if !path.is_dir() {
            return Err(TrackerError::InvalidVaultPath { path });
        }
        Ok(path)
    }
}

/// Pick the vault root: the record's path first, then the environment value.
#[must_use]
pub fn resolve_vault_path(
    config: &VaultConfig,
    env_value: Option<&str>,
    home: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(path) = config
        .vault_path
        .as_ref()
        .filter(|p| !p.as_os_str().is_empty())
    {
        return Some(path.clone());
    }
    env_value
        .filter(|v| !v.trim().is_empty())
        .map(|v| expand_home(v, home))
}

/// Expand `$HOME`, `${HOME}` and a leading `~` to the home directory.
#[must_use]
pub fn expand_home(raw: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home.and_then(Path::to_str) else {
        return PathBuf::from(raw);
    };
    let expanded = raw.replace("${HOME}", home).replace("$HOME", home);
    if expanded == "~" {
        return PathBuf::from(home);
    }
    if let Some(rest) = expanded.strip_prefix("~/") {
        return Path::new(home).join(rest);
    }
    PathBuf::from(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_in(dir: &Path, env: Option<&str>) -> Settings {
        Settings::new(
            ConfigStore::new(dir.join("cfg").join(CONFIG_FILE)),
            env.map(str::to_string),
            Some(PathBuf::from("/home/me")),
        )
    }

    #[test]
    fn load_missing_record_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load(), VaultConfig::default());
        assert!(!store.load().initialized);
    }

    #[test]
    fn load_malformed_record_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(ConfigStore::new(path).load(), VaultConfig::default());
    }

    #[test]
    fn load_fills_missing_fields_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"vaultPath": "/v"}"#).unwrap();
        let config = ConfigStore::new(path).load();
        assert_eq!(config.vault_path, Some(PathBuf::from("/v")));
        assert!(!config.initialized);
    }

    #[test]
    fn save_creates_directory_and_load_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("nested").join(CONFIG_FILE));
        let config = VaultConfig {
            vault_path: Some(PathBuf::from("/tmp/v")),
            initialized: true,
        };
        store.save(&config).unwrap();

        let first = store.load();
        let second = store.load();
        assert_eq!(first, config);
        assert_eq!(first, second);

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"vaultPath\""));
        assert!(raw.contains("\"initialized\": true"));
    }

    #[test]
    fn persisted_path_takes_precedence_over_env() {
        let config = VaultConfig {
            vault_path: Some(PathBuf::from("/from/config")),
            initialized: true,
        };
        let resolved = resolve_vault_path(&config, Some("/from/env"), None);
        assert_eq!(resolved, Some(PathBuf::from("/from/config")));
    }

    #[test]
    fn env_is_used_when_record_has_no_path() {
        let home = Path::new("/home/me");
        let config = VaultConfig::default();
        assert_eq!(
            resolve_vault_path(&config, Some("$HOME/Obsidian/Projects"), Some(home)),
            Some(PathBuf::from("/home/me/Obsidian/Projects"))
        );
        assert_eq!(resolve_vault_path(&config, Some(""), Some(home)), None);
        assert_eq!(resolve_vault_path(&config, None, Some(home)), None);
    }

    #[test]
    fn expand_home_handles_placeholders() {
        let home = Some(Path::new("/home/me"));
        assert_eq!(expand_home("${HOME}/v", home), PathBuf::from("/home/me/v"));
        assert_eq!(expand_home("~/v", home), PathBuf::from("/home/me/v"));
        assert_eq!(expand_home("~", home), PathBuf::from("/home/me"));
        assert_eq!(expand_home("/abs/v", home), PathBuf::from("/abs/v"));
        assert_eq!(expand_home("$HOME/v", None), PathBuf::from("$HOME/v"));
    }

    #[test]
    fn require_vault_reports_not_initialized() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path(), None);
        assert!(matches!(
            settings.require_vault(),
            Err(TrackerError::NotInitialized)
        ));
    }

    #[test]
    fn require_vault_rejects_missing_or_file_paths() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let settings = settings_in(dir.path(), missing.to_str());
        assert!(matches!(
            settings.require_vault(),
            Err(TrackerError::InvalidVaultPath { .. })
        ));

        let file = dir.path().join("file.md");
        fs::write(&file, "x").unwrap();
        let settings = settings_in(dir.path(), file.to_str());
        assert!(matches!(
            settings.require_vault(),
            Err(TrackerError::InvalidVaultPath { .. })
        ));
    }

    #[test]
    fn require_vault_rereads_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let vault = dir.path().join("vault");
        fs::create_dir(&vault).unwrap();
        let settings = settings_in(dir.path(), None);
        assert!(settings.require_vault().is_err());

        settings
            .store()
            .save(&VaultConfig {
                vault_path: Some(vault.clone()),
                initialized: true,
            })
            .unwrap();
        assert_eq!(settings.require_vault().unwrap(), vault);
    }
}
