//! `personas rut <value>`: offline RUT check.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use personas_core::rut;

/// Arguments for `personas rut`.
#[derive(Args, Debug)]
pub struct RutArgs {
    /// `12345678-5`, or just the numeric body to compute its check digit.
    pub value: String,
}

impl RutArgs {
    pub fn run(self) -> Result<ExitCode> {
        let value = self.value.trim();
        if rut::validate(value) {
            println!("{} {value} es un RUT válido", "✓".green().bold());
            return Ok(ExitCode::SUCCESS);
        }

        if is_body(value) {
            if let Some(digit) = rut::check_digit(value) {
                println!("Dígito verificador: {digit} ({value}-{digit})");
                return Ok(ExitCode::SUCCESS);
            }
        }

        let expected = value
            .split_once('-')
            .filter(|(body, check)| is_body(body) && check.chars().count() == 1)
            .and_then(|(body, _)| rut::check_digit(body));
        match expected {
            Some(digit) => println!(
                "{} {value} no es un RUT válido (dígito verificador esperado: {digit})",
                "✗".red().bold()
            ),
            None => println!(
                "{} {value} no es un RUT válido (formato esperado: 12345678-5)",
                "✗".red().bold()
            ),
        }
        Ok(ExitCode::FAILURE)
    }
}

fn is_body(text: &str) -> bool {
    (1..=8).contains(&text.len()) && text.bytes().all(|b| b.is_ascii_digit())
}
