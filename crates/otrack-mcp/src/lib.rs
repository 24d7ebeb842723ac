//! # otrack-mcp
//!
//! MCP (Model Context Protocol) server for an Obsidian project-tracking vault.
//!
//! Exposes the tracker operations as MCP tools:
//! - `initVault`: Point the tracker at a vault directory
//! - `getConfig`: Show the persisted record and resolved vault root
//! - `listProjects`: Summaries of every project
//! - `getProject`: Dashboard, bugs and sessions of one project
//! - `createProject`: Create a project dashboard and readme
//! - `addBug`: Write a bug report
//! - `addSession`: Append to today's session log
//! - `search`: Content or `tag:` search across project documents
//!
//! Failures are returned as tool results flagged `isError`, never as
//! protocol errors.

pub mod tools;

pub use tools::TrackerMcpService;
