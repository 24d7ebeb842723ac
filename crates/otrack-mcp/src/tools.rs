//! MCP tool definitions for the tracker operations.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use otrack_core::error::TrackerError;
use otrack_core::model::{NewBug, NewProject, NewSession};
use otrack_vault::Tracker;

/// MCP server exposing project, bug, session and search operations on an
/// Obsidian vault.
#[derive(Debug, Clone)]
pub struct TrackerMcpService {
    tracker: Tracker,
    tool_router: ToolRouter<Self>,
}

impl TrackerMcpService {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker,
            tool_router: Self::tool_router(),
        }
    }

    #[must_use]
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }
}

/// Turn an operation outcome into a tool result. Failures become an
/// `isError` result carrying `{"error": "<message>"}`.
fn respond<T: Serialize>(result: Result<T, TrackerError>) -> Result<CallToolResult, McpError> {
    Ok(match result {
        Ok(value) => CallToolResult::success(vec![Content::text(to_json(&value))]),
        Err(e) => {
            debug!(error = %e, "tool call failed");
            let body = serde_json::json!({ "error": e.to_string() });
            CallToolResult::error(vec![Content::text(to_json(&body))])
        }
    })
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}

/// Unwrap a required tool argument. Absent values become
/// [`TrackerError::MissingArgument`] so they reach the caller as a tool
/// error instead of a parameter-decoding failure.
fn required(value: Option<String>, name: &'static str) -> Result<String, TrackerError> {
    value.ok_or(TrackerError::MissingArgument(name))
}

// === Tool request types ===
//
// Required fields are still `Option` so that a missing argument is reported
// by the tool itself.

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitVaultRequest {
    /// Full path to the Obsidian vault Projects folder (e.g., /Users/me/Documents/Obsidian/Projects). Required.
    #[serde(default)]
    pub vault_path: Option<String>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct GetProjectRequest {
    /// Project name. Required.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    /// Project name. Required.
    #[serde(default)]
    pub name: Option<String>,
    /// Project description. Required.
    #[serde(default)]
    pub description: Option<String>,
    /// Repository URL
    #[serde(default)]
    pub repository: Option<String>,
    /// Local file path
    #[serde(default)]
    pub local_path: Option<String>,
}

impl CreateProjectRequest {
    fn into_new_project(self) -> Result<NewProject, TrackerError> {
        Ok(NewProject {
            name: required(self.name, "name")?,
            description: required(self.description, "description")?,
            repository: self.repository,
            local_path: self.local_path,
        })
    }
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct AddBugRequest {
    /// Project name. Required.
    #[serde(default)]
    pub project: Option<String>,
    /// Bug title. Required.
    #[serde(default)]
    pub title: Option<String>,
    /// Bug description. Required.
    #[serde(default)]
    pub description: Option<String>,
    /// Bug priority: critical, high, medium (default) or low
    #[serde(default)]
    pub priority: Option<String>,
}

impl AddBugRequest {
    fn into_new_bug(self) -> Result<NewBug, TrackerError> {
        Ok(NewBug {
            project: required(self.project, "project")?,
            title: required(self.title, "title")?,
            description: required(self.description, "description")?,
            priority: self.priority,
        })
    }
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddSessionRequest {
    /// Project name. Required.
    #[serde(default)]
    pub project: Option<String>,
    /// Session goal. Required.
    #[serde(default)]
    pub goal: Option<String>,
    /// Actions taken
    #[serde(default)]
    pub actions: Vec<String>,
    /// Results achieved
    #[serde(default)]
    pub results: Option<String>,
    /// Next steps
    #[serde(default)]
    pub next_steps: Option<String>,
}

impl AddSessionRequest {
    fn into_new_session(self) -> Result<NewSession, TrackerError> {
        Ok(NewSession {
            project: required(self.project, "project")?,
            goal: required(self.goal, "goal")?,
            actions: self.actions,
            results: self.results,
            next_steps: self.next_steps,
        })
    }
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Search query; `tag:<name>` searches for the tag #<name>. Required.
    #[serde(default)]
    pub query: Option<String>,
}

#[tool_router]
impl TrackerMcpService {
    #[tool(
        name = "initVault",
        description = "Initialize Obsidian Tracker with vault path. MUST be called first before using other tools."
    )]
    fn init_vault(
        &self,
        Parameters(req): Parameters<InitVaultRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            required(req.vault_path, "vaultPath").and_then(|path| self.tracker.init_vault(&path)),
        )
    }

    #[tool(name = "getConfig", description = "Get current Obsidian Tracker configuration")]
    fn get_config(&self) -> Result<CallToolResult, McpError> {
        respond(Ok(self.tracker.config()))
    }

    #[tool(name = "listProjects", description = "List all projects from Obsidian vault")]
    fn list_projects(&self) -> Result<CallToolResult, McpError> {
        respond(self.tracker.list_projects())
    }

    #[tool(name = "getProject", description = "Get details for a specific project")]
    fn get_project(
        &self,
        Parameters(req): Parameters<GetProjectRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(required(req.name, "name").and_then(|name| self.tracker.get_project(&name)))
    }

    #[tool(name = "createProject", description = "Create a new project in Obsidian")]
    fn create_project(
        &self,
        Parameters(req): Parameters<CreateProjectRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            req.into_new_project()
                .and_then(|request| self.tracker.create_project(&request)),
        )
    }

    #[tool(name = "addBug", description = "Add a bug report to a project")]
    fn add_bug(&self, Parameters(req): Parameters<AddBugRequest>) -> Result<CallToolResult, McpError> {
        respond(
            req.into_new_bug()
                .and_then(|request| self.tracker.add_bug(&request)),
        )
    }

    #[tool(name = "addSession", description = "Add a session log to a project")]
    fn add_session(
        &self,
        Parameters(req): Parameters<AddSessionRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            req.into_new_session()
                .and_then(|request| self.tracker.add_session(&request)),
        )
    }

    #[tool(name = "search", description = "Search projects by tags or content")]
    fn search(&self, Parameters(req): Parameters<SearchRequest>) -> Result<CallToolResult, McpError> {
        respond(required(req.query, "query").and_then(|query| self.tracker.search(&query)))
    }
}

#[tool_handler]
impl ServerHandler for TrackerMcpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Obsidian Tracker: track projects, bug reports and work sessions in an Obsidian \
                 vault. Call initVault first, then create projects, log bugs and sessions, and \
                 search by content or tag:<name>."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otrack_core::config::{ConfigStore, Settings, CONFIG_FILE};
    use serde_json::json;
    use std::path::Path;

    fn service_in(dir: &Path) -> TrackerMcpService {
        let settings = Settings::new(
            ConfigStore::new(dir.join("config").join(CONFIG_FILE)),
            None,
            None,
        );
        TrackerMcpService::new(Tracker::new(settings))
    }

    /// Split a tool result into its error flag and parsed JSON text.
    fn payload(result: Result<CallToolResult, McpError>) -> (bool, serde_json::Value) {
        let json = serde_json::to_value(result.unwrap()).unwrap();
        let is_error = json["isError"].as_bool().unwrap_or(false);
        let text = json["content"][0]["text"].as_str().unwrap().to_string();
        (is_error, serde_json::from_str(&text).unwrap())
    }

    /// Decode tool arguments the way they arrive over the wire.
    fn params<T: serde::de::DeserializeOwned>(args: serde_json::Value) -> Parameters<T> {
        Parameters(serde_json::from_value(args).unwrap())
    }

    fn init(service: &TrackerMcpService, dir: &Path) {
        let vault = dir.join("vault");
        let (is_error, body) =
            payload(service.init_vault(params(json!({ "vaultPath": vault.to_str().unwrap() }))));
        assert!(!is_error, "{body}");
        assert_eq!(body["success"], true);
    }

    #[test]
    fn exposes_the_tracker_tools() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());
        let mut names: Vec<String> = service
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            [
                "addBug",
                "addSession",
                "createProject",
                "getConfig",
                "getProject",
                "initVault",
                "listProjects",
                "search"
            ]
        );
    }

    #[test]
    fn uninitialized_vault_is_a_structured_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());
        let (is_error, body) = payload(service.list_projects());
        assert!(is_error);
        assert!(body["error"].as_str().unwrap().contains("not initialized"));

        let (is_error, body) = payload(service.get_config());
        assert!(!is_error);
        assert_eq!(body["initialized"], false);
        assert!(body["vaultPath"].is_null());
    }

    #[test]
    fn project_bug_and_session_flow() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());
        init(&service, dir.path());

        let (is_error, _) = payload(service.create_project(params(json!({
            "name": "Alpha",
            "description": "demo",
            "localPath": "/src/alpha",
        }))));
        assert!(!is_error);

        let (is_error, body) = payload(service.add_bug(params(json!({
            "project": "Alpha",
            "title": "Crash on load",
            "description": "NPE",
            "priority": "high",
        }))));
        assert!(!is_error);
        assert!(body["path"]
            .as_str()
            .unwrap()
            .ends_with("BUG - Crash on load.md"));

        let (is_error, body) = payload(service.add_session(params(json!({
            "project": "Alpha",
            "goal": "g1",
            "actions": ["one"],
        }))));
        assert!(!is_error);
        assert_eq!(body["message"], "Session logged");

        let (_, body) = payload(service.get_project(params(json!({ "name": "Alpha" }))));
        assert_eq!(body["bugs"], json!(["Crash on load"]));
        assert_eq!(body["frontmatter"]["status"], "Active");
        assert_eq!(body["frontmatter"]["localPath"], "/src/alpha");
        assert_eq!(body["sessions"].as_array().unwrap().len(), 1);

        let (_, body) = payload(service.list_projects());
        assert_eq!(body["projects"][0]["name"], "Alpha");
        assert_eq!(body["projects"][0]["bugs"], 1);

        let (_, body) = payload(service.search(params(json!({ "query": "tag:high" }))));
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["match"], "tag:#high");
    }

    #[test]
    fn operation_errors_do_not_escape_the_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());
        init(&service, dir.path());

        let (is_error, body) =
            payload(service.get_project(params(json!({ "name": "doesNotExist" }))));
        assert!(is_error);
        assert_eq!(body["error"], "Project \"doesNotExist\" not found in vault");

        let (is_error, body) = payload(service.add_bug(params(json!({
            "project": "doesNotExist",
            "title": "x",
            "description": "y",
            "priority": "urgent",
        }))));
        assert!(is_error);
        assert!(body["error"].as_str().unwrap().contains("doesNotExist"));
    }

    #[test]
    fn absent_required_arguments_are_tool_errors() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());

        let (is_error, body) = payload(service.init_vault(params(json!({}))));
        assert!(is_error);
        assert_eq!(body["error"], "Missing required argument: vaultPath");

        init(&service, dir.path());

        let (is_error, body) = payload(service.create_project(params(json!({ "name": "Alpha" }))));
        assert!(is_error);
        assert_eq!(body["error"], "Missing required argument: description");
        assert!(!dir.path().join("vault").join("Alpha").exists());

        let (is_error, body) = payload(service.add_bug(params(json!({
            "project": "Alpha",
            "description": "NPE",
        }))));
        assert!(is_error);
        assert_eq!(body["error"], "Missing required argument: title");

        let (is_error, body) = payload(service.add_session(params(json!({ "project": "Alpha" }))));
        assert!(is_error);
        assert_eq!(body["error"], "Missing required argument: goal");

        let (is_error, body) = payload(service.get_project(params(json!({}))));
        assert!(is_error);
        assert_eq!(body["error"], "Missing required argument: name");

        let (is_error, body) = payload(service.search(params(json!({}))));
        assert!(is_error);
        assert_eq!(body["error"], "Missing required argument: query");
    }
}
