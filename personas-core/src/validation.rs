//! Field-level validation applied before any network call.
//!
//! Rules, in the order they are checked:
//! 1. `rut` present and passing the checksum
//! 2. `nombre`, `apellido` present, at most 50 characters
//! 3. `fechaNacimiento` present, `dd-MM-yyyy`, a real date, not in the future
//! 4. `direccion.calle` present, at most 100 characters
//! 5. `direccion.comuna`, `direccion.region` present, at most 50 characters

use chrono::{Local, NaiveDate};

use crate::age::parse_birth_date;
use crate::error::ValidationError;
use crate::rut;
use crate::types::{Person, Rut};

pub const MAX_NAME_CHARS: usize = 50;
pub const MAX_STREET_CHARS: usize = 100;
pub const MAX_AREA_CHARS: usize = 50;

/// Validate every field of `person` against today's local date.
pub fn validate_person(person: &Person) -> Result<(), ValidationError> {
    validate_person_on(person, Local::now().date_naive())
}

/// Validate every field of `person`, treating `today` as the current date.
pub fn validate_person_on(person: &Person, today: NaiveDate) -> Result<(), ValidationError> {
    validate_rut(&person.rut)?;
    bounded("nombre", &person.nombre, MAX_NAME_CHARS, "El nombre es obligatorio")?;
    bounded("apellido", &person.apellido, MAX_NAME_CHARS, "El apellido es obligatorio")?;
    validate_birth_date(&person.fecha_nacimiento, today)?;
    bounded(
        "direccion.calle",
        &person.direccion.calle,
        MAX_STREET_CHARS,
        "La calle es obligatoria",
    )?;
    bounded(
        "direccion.comuna",
        &person.direccion.comuna,
        MAX_AREA_CHARS,
        "La comuna es obligatoria",
    )?;
    bounded(
        "direccion.region",
        &person.direccion.region,
        MAX_AREA_CHARS,
        "La región es obligatoria",
    )?;
    Ok(())
}

/// Check that `rut` is present and passes the modulus-11 checksum.
pub fn validate_rut(value: &Rut) -> Result<(), ValidationError> {
    if value.as_str().trim().is_empty() {
        return Err(ValidationError::new("rut", "El RUT es obligatorio"));
    }
    if !rut::validate(value.as_str()) {
        return Err(ValidationError::new("rut", "RUT inválido"));
    }
    Ok(())
}

/// Check a `dd-MM-yyyy` birth date: shape, calendar existence, not future.
pub fn validate_birth_date(text: &str, today: NaiveDate) -> Result<(), ValidationError> {
    const FIELD: &str = "fechaNacimiento";
    if text.trim().is_empty() {
        return Err(ValidationError::new(
            FIELD,
            "La fecha de nacimiento es obligatoria",
        ));
    }
    if !looks_like_date(text) {
        return Err(ValidationError::new(
            FIELD,
            "La fecha debe tener el formato dd-MM-yyyy",
        ));
    }
    let Some(date) = parse_birth_date(text) else {
        return Err(ValidationError::new(FIELD, "Fecha inválida"));
    };
    if date > today {
        return Err(ValidationError::new(FIELD, "La fecha no puede ser futura"));
    }
    Ok(())
}

fn looks_like_date(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes[2] == b'-'
        && bytes[5] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit())
}

fn bounded(
    field: &'static str,
    value: &str,
    max: usize,
    required: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, required));
    }
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            format!("Máximo {max} caracteres"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direccion;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).expect("date")
    }

    fn person() -> Person {
        Person {
            rut: Rut::from("12345678-5"),
            nombre: "Ana".into(),
            apellido: "Rojas".into(),
            fecha_nacimiento: "15-03-1990".into(),
            direccion: Direccion {
                calle: "Av. Matta 123".into(),
                comuna: "Santiago".into(),
                region: "Metropolitana".into(),
            },
        }
    }

    #[test]
    fn valid_person_passes() {
        assert_eq!(validate_person_on(&person(), today()), Ok(()));
    }

    #[test]
    fn invalid_rut_is_reported_first() {
        let mut p = person();
        p.rut = Rut::from("12345678-4");
        p.nombre.clear();
        let err = validate_person_on(&p, today()).unwrap_err();
        assert_eq!(err.field, "rut");
        assert_eq!(err.message, "RUT inválido");
    }

    #[test]
    fn empty_rut_is_required() {
        let mut p = person();
        p.rut = Rut::from("");
        let err = validate_person_on(&p, today()).unwrap_err();
        assert_eq!(err.message, "El RUT es obligatorio");
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        let mut p = person();
        p.nombre = "ñ".repeat(50);
        assert!(validate_person_on(&p, today()).is_ok());
        p.nombre.push('ñ');
        let err = validate_person_on(&p, today()).unwrap_err();
        assert_eq!(err.field, "nombre");
        assert_eq!(err.message, "Máximo 50 caracteres");
    }

    #[test]
    fn street_allows_one_hundred_characters() {
        let mut p = person();
        p.direccion.calle = "a".repeat(100);
        assert!(validate_person_on(&p, today()).is_ok());
        p.direccion.calle.push('a');
        assert_eq!(
            validate_person_on(&p, today()).unwrap_err().field,
            "direccion.calle"
        );
    }

    #[test]
    fn birth_date_messages() {
        let cases = [
            ("", "La fecha de nacimiento es obligatoria"),
            ("1990-03-15", "La fecha debe tener el formato dd-MM-yyyy"),
            ("31-02-2020", "Fecha inválida"),
            ("16-06-2024", "La fecha no puede ser futura"),
        ];
        for (text, expected) in cases {
            let err = validate_birth_date(text, today()).unwrap_err();
            assert_eq!(err.message, expected, "{text:?}");
        }
        assert!(validate_birth_date("15-06-2024", today()).is_ok());
    }

    #[test]
    fn missing_region_is_required() {
        let mut p = person();
        p.direccion.region = "   ".into();
        let err = validate_person_on(&p, today()).unwrap_err();
        assert_eq!(err.to_string(), "direccion.region: La región es obligatoria");
    }
}
