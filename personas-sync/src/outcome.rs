//! Classification of backend responses.
//!
//! Precedence, first match wins:
//! 1. `202` with payload (or delete) → `AcceptedPending`
//! 2. `2xx` with payload (or delete) → `Durable`
//! 3. `400`, `404`, `409` → `ClientError`
//! 4. `0` → `NetworkFailure`
//! 5. anything else, including a `2xx` missing a required payload → `ServerError`

use std::fmt;

use serde::Serialize;

use personas_client::{ApiResponse, NETWORK_FAILURE_MESSAGE};

/// The backend call an outcome belongs to. Drives fallback messages and
/// whether a payload is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Update,
    Delete,
    FetchOne,
    FetchAll,
}

impl Operation {
    /// Delete responses carry no body; every other call must return one.
    pub fn requires_payload(self) -> bool {
        !matches!(self, Operation::Delete)
    }

    /// Message used when the backend gave none.
    pub fn fallback_message(self, status: u16) -> &'static str {
        match status {
            400 => "Solicitud inválida, verifique los datos",
            404 => "Persona no encontrada",
            409 => "El RUT ya está registrado",
            _ => match self {
                Operation::Create => "Error al crear la persona",
                Operation::Update => "Error al actualizar la persona",
                Operation::Delete => "Error al eliminar la persona",
                Operation::FetchOne => "Error al cargar la persona",
                Operation::FetchAll => "Error al cargar las personas",
            },
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
            Operation::FetchOne => write!(f, "fetch_one"),
            Operation::FetchAll => write!(f, "fetch_all"),
        }
    }
}

/// What a backend response means for local state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome<T> {
    /// Confirmed persisted by the backend.
    Durable(Option<T>),
    /// Accepted; durability will follow.
    AcceptedPending(Option<T>),
    ClientError { code: u16, message: String },
    ServerError { code: u16, message: String },
    NetworkFailure { message: String },
}

/// Payload-free tag of an [`OperationOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Durable,
    AcceptedPending,
    ClientError,
    ServerError,
    NetworkFailure,
}

impl<T> OperationOutcome<T> {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            OperationOutcome::Durable(_) => OutcomeKind::Durable,
            OperationOutcome::AcceptedPending(_) => OutcomeKind::AcceptedPending,
            OperationOutcome::ClientError { .. } => OutcomeKind::ClientError,
            OperationOutcome::ServerError { .. } => OutcomeKind::ServerError,
            OperationOutcome::NetworkFailure { .. } => OutcomeKind::NetworkFailure,
        }
    }

    /// Error text for the three failure variants.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            OperationOutcome::ClientError { message, .. }
            | OperationOutcome::ServerError { message, .. }
            | OperationOutcome::NetworkFailure { message } => Some(message),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            OperationOutcome::Durable(p) | OperationOutcome::AcceptedPending(p) => p.as_ref(),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error_message().is_some()
    }
}

/// Map one backend response to exactly one outcome.
pub fn classify<T>(response: ApiResponse<T>, operation: Operation) -> OperationOutcome<T> {
    let status = response.status;
    let has_payload = response.data.is_some() || !operation.requires_payload();
    let backend = response.backend_message().map(str::to_owned);
    let backend_or = |fallback: &str| backend.clone().unwrap_or_else(|| fallback.to_owned());

    match status {
        202 if has_payload => OperationOutcome::AcceptedPending(response.data),
        200..=299 if has_payload => OperationOutcome::Durable(response.data),
        400 | 404 | 409 => OperationOutcome::ClientError {
            code: status,
            message: backend_or(operation.fallback_message(status)),
        },
        0 => OperationOutcome::NetworkFailure {
            message: backend_or(NETWORK_FAILURE_MESSAGE),
        },
        code => OperationOutcome::ServerError {
            code,
            message: backend_or(operation.fallback_message(code)),
        },
    }
}
