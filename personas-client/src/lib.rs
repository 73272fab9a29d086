//! # personas-client
//!
//! Typed wrapper around the `/personas` REST resource.
//!
//! Every call resolves to an [`ApiResponse`]: the HTTP status (or `0` when
//! the backend could not be reached), the payload on success, and any
//! `message` / `error` / `statusCode` the backend attached to an error.
//! Transport errors are never propagated as `Err`.

pub mod api;
pub mod remote;
pub mod response;

pub use api::PersonApi;
pub use remote::RemoteStore;
pub use response::{ApiResponse, GENERIC_ERROR_MESSAGE, NETWORK_FAILURE_MESSAGE};
