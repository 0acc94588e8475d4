//! Line-oriented interactive shell.
//!
//! Unlike one-shot commands, the shell keeps a single session alive, so the
//! undo buffer survives between lines.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use study_planner_app::TaskSession;
use study_planner_core::Clock;
use study_planner_store::Slot;
use tracing::debug;

use crate::Command;

#[derive(Parser, Debug)]
#[command(name = "study-planner", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    cmd: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    #[command(flatten)]
    Planner(Command),

    /// Restore the most recently deleted task.
    Undo,

    /// Leave the shell.
    #[command(alias = "quit")]
    Exit,
}

enum Flow {
    Continue,
    Exit,
}

/// Read commands from `input` until EOF or `exit`.
pub fn run<S, C>(session: &mut TaskSession<S, C>, input: impl BufRead, out: &mut impl Write) -> Result<()>
where
    S: Slot,
    C: Clock,
{
    writeln!(out, "study-planner shell. Type `help` for commands, `exit` to leave.")?;
    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line.context("failed to read shell input")?;
        if matches!(handle_line(session, &line, out)?, Flow::Exit) {
            break;
        }
    }
    Ok(())
}

fn handle_line<S, C>(session: &mut TaskSession<S, C>, line: &str, out: &mut impl Write) -> Result<Flow>
where
    S: Slot,
    C: Clock,
{
    let words = match shell_words::split(line) {
        Ok(words) => words,
        Err(err) => {
            writeln!(out, "error: cannot parse line: {err}")?;
            return Ok(Flow::Continue);
        }
    };
    if words.is_empty() {
        return Ok(Flow::Continue);
    }

    let parsed = match ShellLine::try_parse_from(&words) {
        Ok(parsed) => parsed,
        Err(err) => {
            writeln!(out, "{}", err.render().to_string().trim_end())?;
            return Ok(Flow::Continue);
        }
    };
    debug!(command = ?parsed.cmd, "Shell command");

    match parsed.cmd {
        ShellCommand::Exit => return Ok(Flow::Exit),
        ShellCommand::Undo => {
            let title = session.pending_undo().map(|pending| pending.task().title.clone());
            match title {
                Some(title) if session.undo_delete() => writeln!(out, "restored: {title}")?,
                _ => writeln!(out, "Nothing to undo")?,
            }
        }
        ShellCommand::Planner(Command::Shell) => writeln!(out, "already in the shell")?,
        ShellCommand::Planner(command) => {
            let deleting = matches!(command, Command::Delete { .. });
            match super::run(command, session, out) {
                Err(err) => writeln!(out, "error: {err:#}")?,
                Ok(()) if deleting && session.pending_undo().is_some() => {
                    let secs = session.undo_window().as_secs_f64();
                    writeln!(out, "type `undo` within {secs}s to restore")?;
                }
                Ok(()) => {}
            }
        }
    }
    Ok(Flow::Continue)
}
