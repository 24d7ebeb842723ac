//! Bug reports and per-day session logs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use otrack_core::error::{Result, TrackerError};
use otrack_core::model::{NewBug, NewSession, Priority};

use crate::layout;

/// Status of every new bug report.
pub const STATUS_OPEN: &str = "Open";

/// Write a bug report into a project.
///
/// A report with the same title is replaced.
///
/// # Errors
///
/// Returns [`TrackerError::ProjectNotFound`] if the project is absent,
/// [`TrackerError::InvalidPriority`] for an unknown priority, and
/// validation errors for a blank or unsafe title or a blank description.
pub fn add_bug(vault_root: &Path, request: &NewBug, today: NaiveDate) -> Result<PathBuf> {
    let project = layout::require_project(vault_root, "project", &request.project)?;
    let title = layout::validate_name("title", &request.title)?;
    if request.description.trim().is_empty() {
        return Err(TrackerError::MissingArgument("description"));
    }
    let priority = Priority::parse_or_default(request.priority.as_deref())?;

    let path = layout::bug_path(&project, title);
    let replaced = path.exists();
    layout::write_atomic(&path, &bug_document(title, &request.description, priority, today))?;

    info!(
        project = %request.project,
        title,
        %priority,
        replaced,
        "wrote bug report"
    );
    Ok(path)
}

/// Append a session entry to today's session document of a project.
///
/// Earlier entries of the day are kept byte for byte; the document is
/// replaced in one rename, so the new entry is either fully present or
/// absent.
///
/// # Errors
///
/// Returns [`TrackerError::ProjectNotFound`] if the project is absent,
/// [`TrackerError::MissingArgument`] for a blank goal, and
/// [`TrackerError::Io`] if the existing document cannot be read or the
/// new one cannot be written.
pub fn add_session(vault_root: &Path, request: &NewSession, now: DateTime<Utc>) -> Result<PathBuf> {
    let project = layout::require_project(vault_root, "project", &request.project)?;
    if request.goal.trim().is_empty() {
        return Err(TrackerError::MissingArgument("goal"));
    }

    let sessions = layout::sessions_path(&project);
    fs::create_dir_all(&sessions)?;

    let date = now.date_naive();
    let path = layout::session_file_path(&sessions, date);
    let mut content = match fs::read_to_string(&path) {
        Ok(existing) => existing,
        Err(e) if e.kind() == io::ErrorKind::NotFound => session_header(&request.project, date),
        Err(e) => return Err(e.into()),
    };
    content.push_str(&session_entry(request, now));
    layout::write_atomic(&path, &content)?;

    info!(project = %request.project, path = %path.display(), "logged session");
    Ok(path)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn bug_document(title: &str, description: &str, priority: Priority, today: NaiveDate) -> String {
    format!(
        "# {title}

## Status
- **Priority:** {priority}
- **Status:** {STATUS_OPEN}
- **Date:** {date}

## Description
{description}

## Attempted Fixes
| # | Action | Result |
|---|--------|--------|

## Next Steps

---
#bug #{priority}
",
        date = today.format("%Y-%m-%d"),
    )
}

fn session_header(project: &str, date: NaiveDate) -> String {
    format!("# {project} - Sessions {}\n", date.format("%Y-%m-%d"))
}

fn session_entry(request: &NewSession, now: DateTime<Utc>) -> String {
    let actions = if request.actions.is_empty() {
        "- No actions recorded".to_string()
    } else {
        request
            .actions
            .iter()
            .map(|a| format!("- {a}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "

## Session - {time} UTC

### Goal
{goal}

### Actions
{actions}

### Results
{results}

### Next Time
{next_steps}

---
",
        time = now.format("%H:%M"),
        goal = request.goal,
        results = non_blank(request.results.as_deref()).unwrap_or("In progress..."),
        next_steps = non_blank(request.next_steps.as_deref()).unwrap_or("TBD"),
    )
}
