//! `personas age <dd-MM-yyyy> [--on <dd-MM-yyyy>]`

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use personas_core::{age, validation};

/// Arguments for `personas age`.
#[derive(Args, Debug)]
pub struct AgeArgs {
    /// Birth date, dd-MM-yyyy.
    pub fecha: String,

    /// Reference date instead of today.
    #[arg(long, value_name = "DD-MM-YYYY")]
    pub on: Option<String>,
}

impl AgeArgs {
    pub fn run(self) -> Result<ExitCode> {
        let today = match self.on.as_deref() {
            Some(text) => age::parse_birth_date(text)
                .with_context(|| format!("invalid reference date '{text}'"))?,
            None => chrono::Local::now().date_naive(),
        };
        validation::validate_birth_date(&self.fecha, today)?;
        let years = age::age_on(&self.fecha, today)
            .with_context(|| format!("cannot compute age for '{}'", self.fecha))?;

        println!("{years} años");
        Ok(ExitCode::SUCCESS)
    }
}
