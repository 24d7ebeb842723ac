//! otrack CLI: project, bug and session tracking in an Obsidian vault.
//!
//! Commands: init, config, list, show, create, bug, session, search,
//! serve, completions
//!
//! Every operation prints pretty JSON on stdout. Failures print
//! `{"error": "..."}` and exit with status 1. Logs go to stderr.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use rmcp::{transport::stdio, ServiceExt};
use serde::Serialize;
use tracing::{info, Level};

use otrack_core::config::{ConfigStore, Settings};
use otrack_core::error::TrackerError;
use otrack_core::model::{NewBug, NewProject, NewSession};
use otrack_mcp::TrackerMcpService;
use otrack_vault::Tracker;

#[derive(Parser)]
#[command(name = "otrack")]
#[command(version)]
#[command(about = "Track projects, bugs and work sessions in an Obsidian vault")]
struct Cli {
    /// Config record to use instead of ~/.config/obsidian-tracker/config.json
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Point the tracker at a vault directory (created if missing)
    Init {
        /// Path to the vault Projects folder
        vault_path: String,
    },
    /// Show the persisted config and resolved vault path
    Config,
    /// List all projects
    #[command(alias = "ls")]
    List,
    /// Show a project's dashboard, bugs and sessions
    Show {
        /// Project name
        name: String,
    },
    /// Create a new project
    Create {
        /// Project name
        name: String,
        /// Project description
        #[arg(short, long)]
        description: String,
        /// Repository URL
        #[arg(long)]
        repository: Option<String>,
        /// Local checkout path
        #[arg(long)]
        local_path: Option<String>,
    },
    /// Add a bug report to a project
    Bug {
        /// Project name
        project: String,
        /// Bug title
        title: String,
        /// Bug description
        #[arg(short, long)]
        description: String,
        /// critical, high, medium or low
        #[arg(short, long)]
        priority: Option<String>,
    },
    /// Append a session entry to today's log
    Session {
        /// Project name
        project: String,
        /// Session goal
        #[arg(short, long)]
        goal: String,
        /// Action taken (repeatable)
        #[arg(short = 'a', long = "action")]
        actions: Vec<String>,
        /// Results achieved
        #[arg(long)]
        results: Option<String>,
        /// Next steps
        #[arg(long)]
        next_steps: Option<String>,
    },
    /// Search documents by content, or by tag with `tag:<name>`
    #[command(alias = "s")]
    Search {
        /// Query string
        query: String,
    },
    /// Run the MCP server on stdio
    Serve,
    /// Print shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match cli.config {
        Some(path) => Settings::with_store(ConfigStore::new(path)),
        None => Settings::from_env()?,
    };
    let tracker = Tracker::new(settings);

    let code = match cli.command {
        Commands::Init { vault_path } => emit(tracker.init_vault(&vault_path)),
        Commands::Config => emit(Ok(tracker.config())),
        Commands::List => emit(tracker.list_projects()),
        Commands::Show { name } => emit(tracker.get_project(&name)),
        Commands::Create {
            name,
            description,
            repository,
            local_path,
        } => emit(tracker.create_project(&NewProject {
            name,
            description,
            repository,
            local_path,
        })),
        Commands::Bug {
            project,
            title,
            description,
            priority,
        } => emit(tracker.add_bug(&NewBug {
            project,
            title,
            description,
            priority,
        })),
        Commands::Session {
            project,
            goal,
            actions,
            results,
            next_steps,
        } => emit(tracker.add_session(&NewSession {
            project,
            goal,
            actions,
            results,
            next_steps,
        })),
        Commands::Search { query } => emit(tracker.search(&query)),
        Commands::Serve => {
            serve(tracker).await?;
            ExitCode::SUCCESS
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "otrack", &mut io::stdout());
            ExitCode::SUCCESS
        }
    };
    Ok(code)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

/// Print an operation outcome as JSON and pick the exit status.
fn emit<T: Serialize>(result: Result<T, TrackerError>) -> ExitCode {
    let (json, code) = match result {
        Ok(value) => (serde_json::to_string_pretty(&value), ExitCode::SUCCESS),
        Err(e) => (
            serde_json::to_string_pretty(&serde_json::json!({ "error": e.to_string() })),
            ExitCode::FAILURE,
        ),
    };
    match json {
        Ok(json) => {
            println!("{json}");
            code
        }
        Err(e) => {
            eprintln!("failed to serialize output: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(tracker: Tracker) -> anyhow::Result<()> {
    info!("Obsidian Tracker MCP server running on stdio");
    let service = TrackerMcpService::new(tracker).serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
