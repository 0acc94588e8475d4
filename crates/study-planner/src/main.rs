//! CLI entry point for study-planner.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use study_planner_app::{PlannerConfig, TaskSession, default_seed};
use study_planner_core::{Clock, SystemClock};
use study_planner_store::{FileSlot, TaskStore, validate_key};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;

/// Study tasks ranked by urgency, kept in a local JSON file.
#[derive(Parser, Debug)]
#[command(
    name = "study-planner",
    version,
    about = "study-planner: urgency-ranked study tasks stored under the platform data directory"
)]
struct Cli {
    /// Directory holding config.toml and the task file (defaults to the platform data dir).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Storage key to use instead of the configured one.
    #[arg(long)]
    key: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Create a new task.
    Add {
        #[arg(long)]
        title: String,
        /// quiz, exam, homework, project or other.
        #[arg(long = "type", value_name = "TYPE", default_value = "other")]
        kind: String,
        /// Due day as YYYY-MM-DD.
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks, most urgent first.
    #[command(alias = "ls")]
    List {
        /// all, active or completed.
        #[arg(long, default_value = "all")]
        status: String,
        /// all or a task type.
        #[arg(long = "type", value_name = "TYPE", default_value = "all")]
        kind: String,
        /// Case-insensitive title search.
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,
    },

    /// Flip a task between open and completed.
    Toggle {
        /// Task id or a unique prefix of it.
        id: String,
    },

    /// Change the title, type or due date of a task.
    Edit {
        /// Task id or a unique prefix of it.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date.
        #[arg(long)]
        clear_due: bool,
    },

    /// Delete a task.
    #[command(alias = "rm")]
    Delete {
        /// Task id or a unique prefix of it.
        id: String,
    },

    /// Mark every open task as completed.
    MarkAll,

    /// Remove every completed task.
    ClearCompleted,

    /// Show task counters.
    Stats,

    /// Interactive shell that keeps deletions undoable.
    Shell,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum ListFormat {
    #[default]
    Table,
    Json,
}

fn main() -> Result<()> {
    let Cli { data_dir, key, cmd } = Cli::parse();
    install_tracing();

    let data_dir = match data_dir {
        Some(dir) => dir,
        None => PlannerConfig::default_dir()
            .context("could not determine a data directory; pass --data-dir")?,
    };
    let config = PlannerConfig::load(&data_dir)?;
    let key = key.unwrap_or_else(|| config.storage_key().to_owned());
    validate_key(&key).with_context(|| format!("invalid storage key '{key}'"))?;

    let clock = SystemClock;
    let seed = if config.seed_enabled() {
        default_seed(clock.now())
    } else {
        Vec::new()
    };
    let mut session = TaskSession::open(
        TaskStore::new(FileSlot::new(&data_dir)),
        key,
        seed,
        clock,
        config.undo_window(),
    );

    let mut out = io::stdout().lock();
    match cmd {
        Command::Shell => commands::shell::run(&mut session, io::stdin().lock(), &mut out),
        other => commands::run(other, &mut session, &mut out),
    }
}

fn install_tracing() {
    // RUST_LOG overrides; defaults to warnings only so command output stays clean.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_add_command() {
        let cli = Cli::parse_from([
            "study-planner",
            "--data-dir",
            "/tmp/planner",
            "add",
            "--title",
            "Numerik Analiz II",
            "--type",
            "homework",
            "--due",
            "2026-02-24",
        ]);

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/planner")));
        match cli.cmd {
            Command::Add { title, kind, due } => {
                assert_eq!(title, "Numerik Analiz II");
                assert_eq!(kind, "homework");
                assert_eq!(due.as_deref(), Some("2026-02-24"));
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn parse_list_defaults() {
        let cli = Cli::parse_from(["study-planner", "ls"]);
        assert_eq!(
            cli.cmd,
            Command::List {
                status: "all".into(),
                kind: "all".into(),
                search: None,
                format: ListFormat::Table,
            }
        );
    }

    #[test]
    fn parse_edit_clear_due() {
        let cli = Cli::parse_from(["study-planner", "--key", "term2", "edit", "3f2a", "--clear-due"]);
        assert_eq!(cli.key.as_deref(), Some("term2"));
        match cli.cmd {
            Command::Edit {
                id, due, clear_due, ..
            } => {
                assert_eq!(id, "3f2a");
                assert!(due.is_none());
                assert!(clear_due);
            }
            _ => panic!("expected edit command"),
        }
    }

    #[test]
    fn edit_rejects_due_with_clear_due() {
        let result = Cli::try_parse_from([
            "study-planner",
            "edit",
            "3f2a",
            "--due",
            "2026-03-01",
            "--clear-due",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_bulk_commands() {
        assert_eq!(Cli::parse_from(["study-planner", "mark-all"]).cmd, Command::MarkAll);
        assert_eq!(
            Cli::parse_from(["study-planner", "clear-completed"]).cmd,
            Command::ClearCompleted
        );
        assert_eq!(Cli::parse_from(["study-planner", "shell"]).cmd, Command::Shell);
    }
}
