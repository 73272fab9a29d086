//! Domain types for Person records.
//!
//! Field names follow the backend's JSON contract (`fechaNacimiento`,
//! `direccion.calle`, ...). All types are serializable via serde.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A Chilean national identifier in canonical `12345678-5` form.
///
/// Construction does not validate; use [`crate::rut::validate`] or
/// [`Rut::is_valid`] before trusting a user-supplied value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rut(pub String);

impl Rut {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier passes the modulus-11 checksum.
    pub fn is_valid(&self) -> bool {
        crate::rut::validate(&self.0)
    }
}

impl fmt::Display for Rut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Rut {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Rut {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// Postal address embedded in a [`Person`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Direccion {
    pub calle: String,
    pub comuna: String,
    pub region: String,
}

impl fmt::Display for Direccion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.calle, self.comuna, self.region)
    }
}

/// A person record as exchanged with the `/personas` resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub rut: Rut,
    pub nombre: String,
    pub apellido: String,
    /// Birth date in `dd-MM-yyyy`.
    pub fecha_nacimiento: String,
    pub direccion: Direccion,
}

impl Person {
    /// Age in whole years as of today, or `None` if the birth date is invalid.
    pub fn age(&self) -> Option<u32> {
        crate::age::age_in_years(&self.fecha_nacimiento)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.nombre, self.apellido)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Person {
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
    fn rut_display_and_equality() {
        assert_eq!(Rut::from("1-9").to_string(), "1-9");
        assert_eq!(Rut::from("1-9"), Rut::from(String::from("1-9")));
    }

    #[test]
    fn person_uses_backend_field_names() {
        let json = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(json["rut"], "12345678-5");
        assert_eq!(json["fechaNacimiento"], "15-03-1990");
        assert_eq!(json["direccion"]["comuna"], "Santiago");
        assert!(json.get("fecha_nacimiento").is_none());
    }

    #[test]
    fn direccion_display_joins_parts() {
        assert_eq!(
            sample().direccion.to_string(),
            "Av. Matta 123, Santiago, Metropolitana"
        );
    }
}
