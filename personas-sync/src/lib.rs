//! # personas-sync
//!
//! Offline-tolerant reconciliation of a local Person record set with the
//! remote `/personas` store.
//!
//! Every backend response is classified once ([`classify`]) into an
//! [`OperationOutcome`]; [`SyncReconciler`] applies the matching transition
//! to its owned [`PersonStore`] and reports it to a [`Notifier`].

pub mod notify;
pub mod outcome;
pub mod reconciler;
pub mod store;

pub use notify::{Notification, Notifier, RecordingNotifier, Severity, TracingNotifier};
pub use outcome::{classify, Operation, OperationOutcome, OutcomeKind};
pub use reconciler::{
    FetchOneReport, OperationReport, ResyncAction, ResyncEntry, SyncReconciler,
};
pub use store::{PersonStore, RecordState};
