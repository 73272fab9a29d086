//! Personas core library: domain types, RUT and date rules, configuration.
//!
//! - [`types`]: [`Person`], [`Direccion`], the [`Rut`] newtype
//! - [`rut`]: modulus-11 checksum validation
//! - [`age`]: calendar-aware age from `dd-MM-yyyy`
//! - [`validation`]: field rules applied before any network call
//! - [`config`]: backend URL and timeout, load / save
//! - [`error`]: [`ValidationError`], [`ConfigError`]

pub mod age;
pub mod config;
pub mod error;
pub mod rut;
pub mod types;
pub mod validation;

pub use config::ClientConfig;
pub use error::{ConfigError, ValidationError};
pub use types::{Direccion, Person, Rut};
