//! Project repository: list, read and create projects.
//!
//! A project is a vault subdirectory whose `!Project Dashboard.md` carries
//! the project metadata as frontmatter.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use otrack_core::error::{Result, TrackerError};
use otrack_core::frontmatter::{self, Frontmatter};
use otrack_core::model::{NewProject, ProjectDetail, ProjectSummary};

use crate::layout;

/// Status written to every new dashboard.
pub const STATUS_ACTIVE: &str = "Active";

/// Dashboard body reported for a project without a readable dashboard.
pub const NO_DASHBOARD: &str = "No dashboard found";

/// Summarize every project in the vault.
///
/// Directories without a readable dashboard are not projects and are left
/// out silently.
///
/// # Errors
///
/// Returns [`TrackerError::Io`] if the vault root cannot be listed.
pub fn list(vault_root: &Path) -> Result<Vec<ProjectSummary>> {
    let mut projects = Vec::new();
    for entry in layout::read_dir_sorted(vault_root)? {
        if !entry.is_dir {
            continue;
        }
        let content = match fs::read_to_string(layout::dashboard_path(&entry.path)) {
            Ok(content) => content,
            Err(e) => {
                debug!(project = %entry.name, error = %e, "skipping directory without dashboard");
                continue;
            }
        };
        let (fields, _) = frontmatter::parse(&content);
        projects.push(ProjectSummary {
            status: field_or(&fields, "status", "Unknown"),
            description: field_or(&fields, "description", ""),
            bugs: bug_titles(&entry.path).len(),
            name: entry.name,
            path: entry.path,
        });
    }
    Ok(projects)
}

/// Read one project: dashboard fields and body, bug titles, session files.
///
/// # Errors
///
/// Returns [`TrackerError::ProjectNotFound`] if the project directory is absent.
pub fn get(vault_root: &Path, name: &str) -> Result<ProjectDetail> {
    let path = layout::require_project(vault_root, "name", name)?;

    let (frontmatter, dashboard) = match fs::read_to_string(layout::dashboard_path(&path)) {
        Ok(content) => {
            let (fields, body) = frontmatter::parse(&content);
            (fields, body.to_string())
        }
        Err(e) => {
            debug!(project = name, error = %e, "no readable dashboard");
            (Frontmatter::new(), NO_DASHBOARD.to_string())
        }
    };

    Ok(ProjectDetail {
        name: name.to_string(),
        bugs: bug_titles(&path),
        sessions: session_files(&path),
        frontmatter,
        dashboard,
        path,
    })
}

/// Create a project directory with its dashboard and readme.
///
/// An existing directory without a dashboard is adopted; its readme is
/// kept if present.
///
/// # Errors
///
/// Returns [`TrackerError::MissingArgument`] for a blank name or description,
/// [`TrackerError::ProjectExists`] if the project already has a dashboard,
/// and [`TrackerError::Io`] if a write fails.
pub fn create(vault_root: &Path, request: &NewProject, today: NaiveDate) -> Result<PathBuf> {
    let name = layout::validate_name("name", &request.name)?;
    if request.description.trim().is_empty() {
        return Err(TrackerError::MissingArgument("description"));
    }

    let path = layout::project_path(vault_root, name);
    let dashboard = layout::dashboard_path(&path);
    if dashboard.exists() {
        return Err(TrackerError::ProjectExists {
            name: name.to_string(),
        });
    }
    fs::create_dir_all(&path)?;

    let tag = project_tag(name);
    let created = today.format("%Y-%m-%d").to_string();
    let fields = Frontmatter::new()
        .with("status", STATUS_ACTIVE)
        .with("description", request.description.as_str())
        .with("repository", request.repository.as_deref().unwrap_or_default())
        .with("localPath", request.local_path.as_deref().unwrap_or_default())
        .with("created", created.as_str())
        .with("tags", format!("[project, {tag}]"));
    let body = dashboard_body(name, request, &created, &tag);
    layout::write_atomic(&dashboard, &frontmatter::format(&fields, &body))?;

    let readme = layout::readme_path(&path);
    if !readme.exists() {
        layout::write_atomic(&readme, &format!("# {name}\n\n{}\n", request.description))?;
    }

    info!(project = name, path = %path.display(), "created project");
    Ok(path)
}

/// Tag derived from a project name: lower-cased, whitespace runs as `-`.
#[must_use]
pub fn project_tag(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Titles of the bug documents in a project directory.
#[must_use]
pub fn bug_titles(project: &Path) -> Vec<String> {
    layout::read_dir_sorted(project)
        .unwrap_or_default()
        .into_iter()
        .filter(|e| !e.is_dir)
        .filter_map(|e| layout::bug_title(&e.name).map(str::to_string))
        .collect()
}

/// File names of the session documents of a project.
#[must_use]
pub fn session_files(project: &Path) -> Vec<String> {
    layout::read_dir_sorted(&layout::sessions_path(project))
        .unwrap_or_default()
        .into_iter()
        .filter(|e| !e.is_dir && layout::is_markdown(&e.name))
        .map(|e| e.name)
        .collect()
}

fn field_or(fields: &Frontmatter, key: &str, default: &str) -> String {
    fields
        .get(key)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("N/A")
}

fn dashboard_body(name: &str, request: &NewProject, created: &str, tag: &str) -> String {
    format!(
        "
# {name} - Dashboard

## Status
- **Description:** {description}
- **Repository:** {repository}
- **Local path:** {local_path}
- **Status:** {STATUS_ACTIVE}
- **Created:** {created}

## Plugins/Subprojects

## Known Issues

## Quick Commands

---
#project #{tag}
",
        description = request.description,
        repository = or_na(request.repository.as_deref()),
        local_path = or_na(request.local_path.as_deref()),
    )
}
