//! `memex`: the thin stdin/stdout adapter binary the host supervisor
//! invokes (§6.7). Subcommand shape grounded on `aigent`'s CLI
//! (`clap::{Parser, Subcommand}` with a `Memory`-style nested subcommand
//! group).

mod dayfile;
mod engine;
mod git;
mod hooks;
mod maintain;
mod paths;
mod save;
mod search;
mod sync_cmd;
mod transcript;

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use engine::MemexEngine;
use memex_core::{EntryType, Tier};

#[derive(Debug, Parser)]
#[command(name = "memex", version, about = "Per-user on-host memory store for a coding assistant")]
struct Cli {
    /// Base directory for the engine's state (defaults to `$MEMEX_HOME` or
    /// `~/.memex`).
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Save a new entry (§6.5).
    Save {
        #[arg(long, value_enum)]
        r#type: CliEntryType,
        #[arg(long)]
        content: String,
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        #[arg(long, value_enum)]
        tier: Option<CliTier>,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        agent_id: Option<String>,
    },
    /// Search entries (§6.6).
    Search {
        query: String,
        #[arg(long, value_enum)]
        r#type: Option<CliEntryType>,
        #[arg(long)]
        days: Option<i64>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, value_enum)]
        tier: Option<CliTier>,
        #[arg(long)]
        include_archived: bool,
        #[arg(long)]
        project: Option<String>,
    },
    /// Run the five-step maintenance pipeline (§4.4).
    Maintain,
    /// Run one replication push/pull cycle (§4.7).
    Sync,
    /// Supervisor lifecycle hooks (§6.7): each reads one JSON line from
    /// stdin and always exits 0.
    Hook {
        #[command(subcommand)]
        command: HookCommands,
    },
}

#[derive(Debug, Subcommand)]
enum HookCommands {
    SessionStart,
    Stop,
    PreCompact,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliEntryType {
    Decision,
    Progress,
    Issue,
    Handoff,
    Insight,
    Reference,
    GitCommit,
    Rule,
}

impl From<CliEntryType> for EntryType {
    fn from(v: CliEntryType) -> Self {
        match v {
            CliEntryType::Decision => EntryType::Decision,
            CliEntryType::Progress => EntryType::Progress,
            CliEntryType::Issue => EntryType::Issue,
            CliEntryType::Handoff => EntryType::Handoff,
            CliEntryType::Insight => EntryType::Insight,
            CliEntryType::Reference => EntryType::Reference,
            CliEntryType::GitCommit => EntryType::GitCommit,
            CliEntryType::Rule => EntryType::Rule,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliTier {
    Ephemeral,
    Working,
    Longterm,
}

impl From<CliTier> for Tier {
    fn from(v: CliTier) -> Self {
        match v {
            CliTier::Ephemeral => Tier::Ephemeral,
            CliTier::Working => Tier::Working,
            CliTier::Longterm => Tier::LongTerm,
        }
    }
}

fn default_base_dir() -> PathBuf {
    std::env::var("MEMEX_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".memex")
        })
}

fn read_stdin() -> String {
    let mut buf = String::new();
    let _ = std::io::stdin().read_to_string(&mut buf);
    buf
}

/// Hook subcommands always exit 0, per §6.7 "Exit code is 0 on all paths
/// (never block the supervisor)" — a failed scan or a failed save is
/// logged and swallowed, not surfaced to the supervisor.
fn run_hook(engine: &MemexEngine, command: &HookCommands) {
    let stdin = read_stdin();
    match command {
        HookCommands::SessionStart => {
            let input: hooks::SessionStartInput = serde_json::from_str(&stdin).unwrap_or(hooks::SessionStartInput { source: None });
            let packet = hooks::session_start(engine, input);
            print!("{packet}");
        }
        HookCommands::Stop => {
            let input: hooks::StopInput = serde_json::from_str(&stdin).unwrap_or_default();
            if let Err(e) = hooks::stop(engine, input) {
                tracing::warn!(error = %e, "stop hook failed");
            }
        }
        HookCommands::PreCompact => {
            let input: hooks::PreCompactInput = match serde_json::from_str(&stdin) {
                Ok(v) => v,
                Err(_) => hooks::PreCompactInput { trigger: "unknown".to_string(), custom_instructions: None },
            };
            if let Err(e) = hooks::pre_compact(engine, input) {
                tracing::warn!(error = %e, "pre-compact hook failed");
            }
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base_dir = cli.base_dir.unwrap_or_else(default_base_dir);

    // Hook subcommands must exit 0 even if the engine itself fails to
    // open, since a missing/corrupt store is exactly the kind of failure
    // the supervisor must not be blocked by.
    if let Commands::Hook { command } = &cli.command {
        match MemexEngine::open(base_dir) {
            Ok(engine) => run_hook(&engine, command),
            Err(e) => tracing::warn!(error = %e, "hook invoked but engine failed to open"),
        }
        std::process::exit(0);
    }

    let engine = match MemexEngine::open(base_dir) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("memex: failed to open engine: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Save { r#type, content, tags, tier, label, project, agent_id } => {
            save::save(&engine, r#type.into(), content, tags, tier.map(Into::into), None, agent_id, label, project)
                .map(|r| println!("{}", serde_json::to_string_pretty(&r).unwrap_or_default()))
        }
        Commands::Search { query, r#type, days, limit, tier, include_archived, project } => {
            let req = search::SearchRequest {
                query,
                entry_type: r#type.map(Into::into),
                days,
                limit,
                tier: tier.map(Into::into),
                include_archived,
                mode: None,
                project,
            };
            search::search(&engine, &req).map(|hits| {
                println!("{}", serde_json::to_string_pretty(&hits).unwrap_or_default());
            })
        }
        Commands::Maintain => maintain::run(&engine).map(|r| println!("{}", serde_json::to_string_pretty(&r).unwrap_or_default())),
        Commands::Sync => sync_cmd::run(&engine).map(|r| {
            println!(
                "{}",
                serde_json::json!({
                    "pushed": r.push.as_ref().map(|p| p.pushed),
                    "pulled": r.pull.as_ref().map(|p| p.pulled),
                    "push_error": r.push_error,
                    "pull_error": r.pull_error,
                })
            );
        }),
        Commands::Hook { .. } => unreachable!("handled above"),
    };

    if let Err(e) = result {
        eprintln!("memex: {e}");
        std::process::exit(1);
    }
}
