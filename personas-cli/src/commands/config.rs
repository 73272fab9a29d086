//! `personas config init|show`

use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use personas_core::{config, ClientConfig};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write ~/.personas/config.yaml with default settings.
    Init {
        /// Per-request timeout in seconds.
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,

        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration.
    Show,
}

pub fn run(command: ConfigCommand, api_url: Option<String>) -> Result<ExitCode> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    let path = config::config_path_at(&home);

    match command {
        ConfigCommand::Init {
            timeout_secs,
            force,
        } => {
            if path.exists() && !force {
                bail!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                );
            }
            let settings = ClientConfig {
                timeout_secs,
                ..ClientConfig::default()
            }
            .with_overrides(None, api_url);
            let saved = config::save_at(&home, &settings)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("✓ Wrote {}", saved.display());
        }
        ConfigCommand::Show => {
            let settings = config::resolve_at(&home, api_url)
                .with_context(|| format!("failed to load {}", path.display()))?;
            let source = if path.exists() {
                path.display().to_string()
            } else {
                format!("{} (not found, defaults)", path.display())
            };
            println!("config:   {source}");
            println!("api_url:  {}", settings.api_url);
            match settings.timeout_secs {
                Some(secs) => println!("timeout:  {secs}s"),
                None => println!("timeout:  none"),
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
