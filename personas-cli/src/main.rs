//! Personas: command-line client for the `/personas` backend.
//!
//! # Usage
//!
//! ```text
//! personas list [--json]
//! personas get <rut> [--json]
//! personas create --rut <rut> --nombre <n> --apellido <a> --fecha-nacimiento <dd-MM-yyyy>
//!                 --calle <c> --comuna <c> --region <r>
//! personas update <rut> [--nombre ...] [--apellido ...] ...
//! personas delete <rut>
//! personas rut <value>
//! personas age <dd-MM-yyyy> [--on <dd-MM-yyyy>]
//! personas shell
//! personas config init|show
//! ```
//!
//! `--api-url` (or `PERSONAS_API_URL`) overrides `~/.personas/config.yaml`.

mod commands;
mod output;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{
    age::AgeArgs,
    config::ConfigCommand,
    people::{CreateArgs, DeleteArgs, GetArgs, ListArgs, UpdateArgs},
    rut::RutArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "personas",
    version,
    about = "Manage Person records on a /personas backend",
    long_about = None,
)]
struct Cli {
    /// Backend origin, e.g. http://localhost:8080.
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Remote(RemoteCommand),

    /// Check a RUT and show its expected check digit.
    Rut(RutArgs),

    /// Compute an age from a dd-MM-yyyy birth date.
    Age(AgeArgs),

    /// Manage ~/.personas/config.yaml.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Commands that talk to the backend.
#[derive(Subcommand, Debug)]
enum RemoteCommand {
    /// Load every person from the backend and print them.
    List(ListArgs),

    /// Show one person.
    Get(GetArgs),

    /// Register a new person.
    Create(CreateArgs),

    /// Change fields of an existing person.
    Update(UpdateArgs),

    /// Remove a person.
    Delete(DeleteArgs),

    /// Interactive session keeping the local store between commands.
    Shell,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Rut(args) => args.run(),
        Commands::Age(args) => args.run(),
        Commands::Config { command } => commands::config::run(command, cli.api_url),
        Commands::Remote(command) => run_remote(command, cli.api_url),
    }
}

/// Commands that talk to the backend share one runtime and one session.
fn run_remote(command: RemoteCommand, api_url: Option<String>) -> Result<ExitCode> {
    init_tracing();
    let config = personas_core::config::resolve(api_url)
        .context("failed to load ~/.personas/config.yaml")?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    runtime.block_on(async move {
        let session = commands::connect(&config);
        match command {
            RemoteCommand::List(args) => args.run(&session).await,
            RemoteCommand::Get(args) => args.run(&session).await,
            RemoteCommand::Create(args) => args.run(&session).await,
            RemoteCommand::Update(args) => args.run(&session).await,
            RemoteCommand::Delete(args) => args.run(&session).await,
            RemoteCommand::Shell => commands::shell::run(&session).await,
        }
    })
}

/// Logs go to stderr so `--json` output stays machine-readable.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
