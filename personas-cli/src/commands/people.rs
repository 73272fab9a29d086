//! `personas list|get|create|update|delete`: reconciled CRUD commands.
//!
//! The same argument structs are parsed by the interactive shell, so every
//! `run` works against a shared [`Session`].

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use personas_core::{Direccion, Person, Rut};
use personas_sync::RecordState;

use super::{exit_code, Session};
use crate::output;

/// Arguments for `personas list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub async fn run(self, session: &Session) -> Result<ExitCode> {
        let report = session.load_all().await;
        let store = session.snapshot().await;
        if self.json {
            output::print_json(&store)?;
        } else {
            output::print_table(&store);
        }
        Ok(exit_code(report.outcome.is_failure()))
    }
}

/// Arguments for `personas get`.
#[derive(Args, Debug)]
pub struct GetArgs {
    pub rut: String,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl GetArgs {
    pub async fn run(self, session: &Session) -> Result<ExitCode> {
        let rut = Rut::from(self.rut);
        let report = session.fetch_one(&rut).await?;
        let Some(person) = report.person else {
            return Ok(ExitCode::FAILURE);
        };
        let pending = session.state_of(&rut).await == RecordState::Pending;
        output::print_person(&person, pending, self.json)?;
        Ok(ExitCode::SUCCESS)
    }
}

/// Arguments for `personas create`.
#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub rut: String,

    #[arg(long)]
    pub nombre: String,

    #[arg(long)]
    pub apellido: String,

    /// Birth date, dd-MM-yyyy.
    #[arg(long, value_name = "DD-MM-YYYY")]
    pub fecha_nacimiento: String,

    #[arg(long)]
    pub calle: String,

    #[arg(long)]
    pub comuna: String,

    #[arg(long)]
    pub region: String,
}

impl CreateArgs {
    fn into_person(self) -> Person {
        Person {
            rut: Rut::from(self.rut),
            nombre: self.nombre,
            apellido: self.apellido,
            fecha_nacimiento: self.fecha_nacimiento,
            direccion: Direccion {
                calle: self.calle,
                comuna: self.comuna,
                region: self.region,
            },
        }
    }

    pub async fn run(self, session: &Session) -> Result<ExitCode> {
        let person = self.into_person();
        let rut = person.rut.clone();
        let report = session.create(person).await?;
        if !report.outcome.is_failure() {
            print_saved(session, &rut).await?;
        }
        Ok(exit_code(report.outcome.is_failure()))
    }
}

/// Arguments for `personas update`. Omitted fields keep their current value.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub rut: String,

    #[arg(long)]
    pub nombre: Option<String>,

    #[arg(long)]
    pub apellido: Option<String>,

    /// Birth date, dd-MM-yyyy.
    #[arg(long, value_name = "DD-MM-YYYY")]
    pub fecha_nacimiento: Option<String>,

    #[arg(long)]
    pub calle: Option<String>,

    #[arg(long)]
    pub comuna: Option<String>,

    #[arg(long)]
    pub region: Option<String>,
}

impl UpdateArgs {
    fn apply(self, person: &mut Person) {
        let fields = [
            (&mut person.nombre, self.nombre),
            (&mut person.apellido, self.apellido),
            (&mut person.fecha_nacimiento, self.fecha_nacimiento),
            (&mut person.direccion.calle, self.calle),
            (&mut person.direccion.comuna, self.comuna),
            (&mut person.direccion.region, self.region),
        ];
        for (slot, value) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }

    pub async fn run(self, session: &Session) -> Result<ExitCode> {
        let rut = Rut::from(self.rut.clone());
        let current = session.fetch_one(&rut).await?;
        let Some(mut person) = current.person else {
            return Ok(ExitCode::FAILURE);
        };
        self.apply(&mut person);

        let report = session.update(&rut, person).await?;
        if !report.outcome.is_failure() {
            print_saved(session, &rut).await?;
        }
        Ok(exit_code(report.outcome.is_failure()))
    }
}

/// Arguments for `personas delete`.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub rut: String,
}

impl DeleteArgs {
    pub async fn run(self, session: &Session) -> Result<ExitCode> {
        let report = session.delete(&Rut::from(self.rut)).await?;
        Ok(exit_code(report.outcome.is_failure()))
    }
}

/// Print the record as the store now holds it.
async fn print_saved(session: &Session, rut: &Rut) -> Result<()> {
    if let Some(person) = session.get(rut).await {
        let pending = session.state_of(rut).await == RecordState::Pending;
        output::print_person(&person, pending, false)?;
    }
    Ok(())
}
