pub mod age;
pub mod config;
pub mod people;
pub mod rut;
pub mod shell;

use std::process::ExitCode;

use personas_client::RemoteStore;
use personas_core::ClientConfig;
use personas_sync::SyncReconciler;

use crate::output::TerminalNotifier;

/// Reconciler wired to the HTTP backend and the terminal.
pub type Session = SyncReconciler<RemoteStore, TerminalNotifier>;

pub fn connect(config: &ClientConfig) -> Session {
    let remote = RemoteStore::new(config);
    tracing::debug!(url = remote.resource_url(), "session opened");
    SyncReconciler::new(remote, TerminalNotifier)
}

/// Failed outcomes are already reported; they only change the exit status.
pub fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
