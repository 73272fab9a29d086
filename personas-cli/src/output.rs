//! Terminal rendering: notifications, person tables, detail views and JSON.
//!
//! Notifications go to stderr; records go to stdout.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use personas_core::Person;
use personas_sync::{Notifier, PersonStore, Severity};

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Prints each notification as one coloured stderr line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        eprintln!("{} {message}", severity_marker(severity));
    }
}

pub fn severity_marker(severity: Severity) -> String {
    match severity {
        Severity::Success => "✓".green().bold().to_string(),
        Severity::Error => "✗".red().bold().to_string(),
        Severity::Warning => "!".yellow().bold().to_string(),
        Severity::Info => "i".cyan().bold().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Tabled)]
struct PersonRow {
    #[tabled(rename = "rut")]
    rut: String,
    #[tabled(rename = "nombre")]
    nombre: String,
    #[tabled(rename = "edad")]
    edad: String,
    #[tabled(rename = "nacimiento")]
    nacimiento: String,
    #[tabled(rename = "dirección")]
    direccion: String,
    #[tabled(rename = "estado")]
    estado: &'static str,
}

/// `--json` shape: the wire record plus derived fields.
#[derive(Serialize)]
struct PersonJson<'a> {
    #[serde(flatten)]
    person: &'a Person,
    edad: Option<u32>,
    pendiente: bool,
}

impl<'a> PersonJson<'a> {
    fn new(person: &'a Person, pending: bool) -> Self {
        Self {
            person,
            edad: person.age(),
            pendiente: pending,
        }
    }
}

fn state_label(pending: bool) -> &'static str {
    if pending {
        "pendiente"
    } else {
        "sincronizado"
    }
}

fn age_label(person: &Person) -> String {
    person
        .age()
        .map(|years| years.to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn print_table(store: &PersonStore) {
    if store.is_empty() {
        println!("No hay personas registradas.");
        return;
    }

    let rows: Vec<PersonRow> = store
        .records()
        .iter()
        .map(|person| PersonRow {
            rut: person.rut.to_string(),
            nombre: person.full_name(),
            edad: age_label(person),
            nacimiento: person.fecha_nacimiento.clone(),
            direccion: person.direccion.to_string(),
            estado: state_label(store.is_pending(&person.rut)),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    let pending = store.pending().len();
    if pending > 0 {
        println!(
            "{} {pending} operación(es) pendiente(s) de confirmación",
            "■".yellow().bold()
        );
    }
}

pub fn print_json(store: &PersonStore) -> Result<()> {
    let payload: Vec<PersonJson<'_>> = store
        .records()
        .iter()
        .map(|person| PersonJson::new(person, store.is_pending(&person.rut)))
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize persons JSON")?
    );
    Ok(())
}

pub fn print_person(person: &Person, pending: bool, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&PersonJson::new(person, pending))
                .context("failed to serialize person JSON")?
        );
        return Ok(());
    }

    let state = if pending {
        state_label(true).yellow().to_string()
    } else {
        state_label(false).green().to_string()
    };
    println!("{}  ({state})", person.rut.to_string().bold());
    println!("  Nombre      {}", person.full_name());
    println!(
        "  Nacimiento  {} ({} años)",
        person.fecha_nacimiento,
        age_label(person)
    );
    println!("  Dirección   {}", person.direccion);
    Ok(())
}

pub fn print_pending(store: &PersonStore) {
    if store.pending().is_empty() {
        println!("Sin operaciones pendientes.");
        return;
    }
    for rut in store.pending() {
        let held = if store.contains(rut) {
            "guardado localmente"
        } else {
            "eliminación local"
        };
        println!("  {} {rut}  {held}", "■".yellow().bold());
    }
}
