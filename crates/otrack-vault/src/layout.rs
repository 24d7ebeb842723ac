//! On-disk naming conventions of the vault.
//!
//! ```text
//! <vault>/
//!   Alpha/
//!     !Project Dashboard.md
//!     README.md
//!     BUG - Crash on load.md
//!     Sessions/
//!       Session - 2025-02-10.md
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use otrack_core::error::{Result, TrackerError};

pub const DASHBOARD_FILE: &str = "!Project Dashboard.md";
pub const README_FILE: &str = "README.md";
pub const BUG_PREFIX: &str = "BUG - ";
pub const SESSIONS_DIR: &str = "Sessions";
pub const SESSION_PREFIX: &str = "Session - ";
pub const MARKDOWN_EXT: &str = ".md";

#[must_use]
pub fn project_path(vault_root: &Path, name: &str) -> PathBuf {
    vault_root.join(name)
}

#[must_use]
pub fn dashboard_path(project: &Path) -> PathBuf {
    project.join(DASHBOARD_FILE)
}

#[must_use]
pub fn readme_path(project: &Path) -> PathBuf {
    project.join(README_FILE)
}

#[must_use]
pub fn bug_path(project: &Path, title: &str) -> PathBuf {
    project.join(format!("{BUG_PREFIX}{title}{MARKDOWN_EXT}"))
}

/// Recover a bug title from a file name, or `None` if it is not a bug document.
#[must_use]
pub fn bug_title(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(BUG_PREFIX)?
        .strip_suffix(MARKDOWN_EXT)
}

#[must_use]
pub fn sessions_path(project: &Path) -> PathBuf {
    project.join(SESSIONS_DIR)
}

#[must_use]
pub fn session_file_path(sessions: &Path, date: NaiveDate) -> PathBuf {
    sessions.join(format!(
        "{SESSION_PREFIX}{}{MARKDOWN_EXT}",
        date.format("%Y-%m-%d")
    ))
}

#[must_use]
pub fn is_markdown(file_name: &str) -> bool {
    file_name.ends_with(MARKDOWN_EXT)
}

/// True only for an existing directory. Missing paths, files and
/// permission errors are all `false`.
#[must_use]
pub fn exists(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Check a project name or bug title before it becomes a path component.
///
/// # Errors
///
/// Returns [`TrackerError::MissingArgument`] for blank values and
/// [`TrackerError::InvalidName`] for values that would escape or hide
/// inside the vault.
pub fn validate_name<'a>(kind: &'static str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(TrackerError::MissingArgument(kind));
    }
    let reason = if value.starts_with('.') {
        Some("must not start with '.'")
    } else if value.contains(['/', '\\']) {
        Some("must not contain path separators")
    } else if value.chars().any(char::is_control) {
        Some("must not contain control characters")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(TrackerError::InvalidName {
            kind,
            value: value.to_string(),
            reason,
        }),
        None => Ok(value),
    }
}

/// Resolve an existing project directory.
///
/// # Errors
///
/// Returns [`TrackerError::ProjectNotFound`] if the directory is absent,
/// or a validation error for a malformed name.
pub fn require_project(vault_root: &Path, kind: &'static str, name: &str) -> Result<PathBuf> {
    let name = validate_name(kind, name)?;
    let path = project_path(vault_root, name);
    if !exists(&path) {
        return Err(TrackerError::ProjectNotFound {
            name: name.to_string(),
        });
    }
    Ok(path)
}

/// A visible directory entry.
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// List a directory sorted by name, skipping dot-prefixed and non-UTF-8 entries.
///
/// # Errors
///
/// Returns the underlying I/O error if the directory cannot be read.
pub fn read_dir_sorted(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            if name.starts_with('.') {
                return None;
            }
            let path = entry.path();
            Some(Entry {
                is_dir: path.is_dir(),
                name,
                path,
            })
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Replace a file's contents via a temporary sibling and a rename, so
/// readers see either the old or the new document.
///
/// An existing document keeps its permissions, and a symlinked document
/// keeps its link: the rename lands on the link's target. New documents
/// get `0o644` minus the process umask on unix.
///
/// # Errors
///
/// Returns the underlying I/O error; the target is untouched on failure.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let target = match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(path)?,
        _ => path.to_path_buf(),
    };
    let dir = target
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no parent"))?;
    let existing = fs::metadata(&target).ok().map(|meta| meta.permissions());

    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }
    let mut tmp = builder.tempfile_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    if let Some(permissions) = existing {
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}
