//! `personas shell`: one long-lived session reading commands from stdin.
//!
//! Unlike the one-shot commands, the local store survives between lines, so
//! pending keys accumulate and `resync` can replay them later.

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use personas_sync::{ResyncAction, ResyncEntry, Severity};

use super::people::{CreateArgs, DeleteArgs, GetArgs, UpdateArgs};
use super::Session;
use crate::output::{self, severity_marker};

#[derive(Parser, Debug)]
#[command(name = "personas>", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    /// Print the local store.
    List {
        #[arg(long)]
        json: bool,
    },

    /// Reload everything from the backend.
    Reload,

    /// Show one person, falling back to the local copy when offline.
    Get(GetArgs),

    /// Register a new person.
    Create(CreateArgs),

    /// Change fields of an existing person.
    Update(UpdateArgs),

    /// Remove a person.
    Delete(DeleteArgs),

    /// List keys awaiting backend confirmation.
    Pending,

    /// Replay every pending key against the backend.
    Resync,

    /// Leave the shell.
    #[command(alias = "quit")]
    Exit,
}

pub async fn run(session: &Session) -> Result<ExitCode> {
    session.load_all().await;
    output::print_table(&session.snapshot().await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(words) = shlex::split(line) else {
            eprintln!("{} comillas sin cerrar", severity_marker(Severity::Error));
            continue;
        };
        let command = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(err) => {
                let _ = err.print();
                continue;
            }
        };
        if matches!(command, ShellCommand::Exit) {
            break;
        }
        if let Err(err) = dispatch(session, command).await {
            eprintln!("{} {err:#}", severity_marker(Severity::Error));
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn dispatch(session: &Session, command: ShellCommand) -> Result<()> {
    match command {
        ShellCommand::List { json } => {
            let store = session.snapshot().await;
            if json {
                output::print_json(&store)?;
            } else {
                output::print_table(&store);
            }
        }
        ShellCommand::Reload => {
            session.load_all().await;
            output::print_table(&session.snapshot().await);
        }
        ShellCommand::Get(args) => {
            args.run(session).await?;
        }
        ShellCommand::Create(args) => {
            args.run(session).await?;
        }
        ShellCommand::Update(args) => {
            args.run(session).await?;
        }
        ShellCommand::Delete(args) => {
            args.run(session).await?;
        }
        ShellCommand::Pending => output::print_pending(&session.snapshot().await),
        ShellCommand::Resync => {
            let entries = session.resync_pending().await;
            print_resync(&entries);
            let left = session.pending().await.len();
            println!("{left} operación(es) pendiente(s)");
        }
        ShellCommand::Exit => {}
    }
    Ok(())
}

fn print_resync(entries: &[ResyncEntry]) {
    if entries.is_empty() {
        println!("Nada que sincronizar.");
        return;
    }
    for entry in entries {
        let action = match entry.action {
            ResyncAction::Update => "update",
            ResyncAction::Delete => "delete",
        };
        match &entry.result {
            Ok(kind) => println!("  {} {action}: {kind:?}", entry.rut),
            Err(err) => println!("  {} {action}: {err}", entry.rut),
        }
    }
}

fn prompt() {
    print!("personas> ");
    let _ = std::io::stdout().flush();
}
