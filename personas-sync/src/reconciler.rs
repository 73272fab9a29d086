//! Applies classified backend outcomes to the local [`PersonStore`].
//!
//! | outcome            | records                  | pending        |
//! |--------------------|--------------------------|----------------|
//! | `AcceptedPending`  | apply (upsert / remove)  | add `rut`      |
//! | `Durable`          | apply (upsert / remove)  | remove `rut`   |
//! | client / server    | untouched                | untouched      |
//! | network, delete    | remove anyway            | add `rut`      |
//! | network, otherwise | untouched                | untouched      |
//!
//! Mutating calls for the same `rut` are serialized: each holds a per-key
//! lock from request to state change, so they land in issue order. Calls on
//! different keys run independently and land in response order.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use personas_client::PersonApi;
use personas_core::{validation, Person, Rut, ValidationError};

use crate::notify::{Notification, Notifier, Severity};
use crate::outcome::{classify, Operation, OperationOutcome, OutcomeKind};
use crate::store::{PersonStore, RecordState};

pub const MSG_SAVED_PENDING: &str = "Operación guardada temporalmente";
pub const MSG_CREATED: &str = "Persona creada exitosamente";
pub const MSG_UPDATED: &str = "Persona actualizada exitosamente";
pub const MSG_DELETED: &str = "Persona eliminada exitosamente";
pub const MSG_DELETE_PENDING: &str = "Eliminación guardada temporalmente";
pub const MSG_DELETE_OFFLINE: &str =
    "Eliminación guardada localmente, se sincronizará cuando la conexión esté disponible";
pub const MSG_LOAD_PENDING: &str = "Datos cargados temporalmente, se sincronizarán pronto.";
pub const MSG_FETCH_PENDING: &str = "Datos cargados temporalmente desde el backend";
pub const MSG_LOCAL_FALLBACK: &str = "Usando datos locales debido a conexión offline";
pub const MSG_RUT_IMMUTABLE: &str = "El RUT no puede modificarse";

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Result of one reconciled operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationReport<T> {
    pub operation: Operation,
    pub rut: Option<Rut>,
    pub outcome: OperationOutcome<T>,
    pub notification: Notification,
}

impl<T> OperationReport<T> {
    pub fn kind(&self) -> OutcomeKind {
        self.outcome.kind()
    }

    pub fn severity(&self) -> Severity {
        self.notification.severity
    }
}

/// Result of [`SyncReconciler::fetch_one`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOneReport {
    /// The remote record, else the local copy, else nothing.
    pub person: Option<Person>,
    pub from_local: bool,
    pub outcome: OperationOutcome<Person>,
    /// `None` for a plain durable hit.
    pub notification: Option<Notification>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResyncAction {
    Update,
    Delete,
}

/// One key replayed by [`SyncReconciler::resync_pending`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResyncEntry {
    pub rut: Rut,
    pub action: ResyncAction,
    pub result: Result<OutcomeKind, ValidationError>,
}

// ---------------------------------------------------------------------------
// Per-key serialization
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct KeyLocks {
    inner: StdMutex<HashMap<Rut, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    async fn acquire(&self, rut: &Rut) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            // Entries only the map references are idle.
            map.retain(|key, lock| key == rut || Arc::strong_count(lock) > 1);
            map.entry(rut.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Owns the record set and pending set; the only path that mutates them.
pub struct SyncReconciler<A, N> {
    api: A,
    notifier: N,
    store: RwLock<PersonStore>,
    locks: KeyLocks,
}

impl<A: PersonApi, N: Notifier> SyncReconciler<A, N> {
    pub fn new(api: A, notifier: N) -> Self {
        Self {
            api,
            notifier,
            store: RwLock::new(PersonStore::new()),
            locks: KeyLocks::default(),
        }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// A copy of the current store.
    pub async fn snapshot(&self) -> PersonStore {
        self.store.read().await.clone()
    }

    pub async fn records(&self) -> Vec<Person> {
        self.store.read().await.records().to_vec()
    }

    pub async fn pending(&self) -> BTreeSet<Rut> {
        self.store.read().await.pending().clone()
    }

    pub async fn get(&self, rut: &Rut) -> Option<Person> {
        self.store.read().await.get(rut).cloned()
    }

    pub async fn state_of(&self, rut: &Rut) -> RecordState {
        self.store.read().await.state_of(rut)
    }

    /// Initial full fetch. Replaces the record set.
    ///
    /// Accepted → every loaded key pending. Durable → pending cleared.
    /// Any failure → empty record set, pending left alone, offline warning.
    pub async fn load_all(&self) -> OperationReport<Vec<Person>> {
        let outcome = classify(self.api.get_all().await, Operation::FetchAll);
        let notification = {
            let mut store = self.store.write().await;
            match &outcome {
                OperationOutcome::AcceptedPending(persons) => {
                    store.replace_all(persons.clone().unwrap_or_default());
                    store.mark_all_pending();
                    Notification::info(MSG_LOAD_PENDING)
                }
                OperationOutcome::Durable(persons) => {
                    store.replace_all(persons.clone().unwrap_or_default());
                    store.clear_all_pending();
                    Notification::success(format!("{} personas cargadas", store.len()))
                }
                failure => {
                    store.clear_records();
                    Notification::warning(format!(
                        "Modo offline: {}",
                        failure.error_message().unwrap_or_default()
                    ))
                }
            }
        };
        self.finish(Operation::FetchAll, None, outcome, notification)
    }

    /// `POST` a new person after local validation.
    pub async fn create(
        &self,
        person: Person,
    ) -> Result<OperationReport<Person>, ValidationError> {
        validation::validate_person(&person)?;
        let rut = person.rut.clone();
        let _guard = self.locks.acquire(&rut).await;

        let outcome = classify(self.api.create(&person).await, Operation::Create);
        let notification = self.apply_save(&rut, &person, &outcome, MSG_CREATED).await;
        Ok(self.finish(Operation::Create, Some(rut), outcome, notification))
    }

    /// `PUT` an existing person. The body's `rut` must equal `rut`.
    pub async fn update(
        &self,
        rut: &Rut,
        person: Person,
    ) -> Result<OperationReport<Person>, ValidationError> {
        if &person.rut != rut {
            return Err(ValidationError::new("rut", MSG_RUT_IMMUTABLE));
        }
        validation::validate_person(&person)?;
        let _guard = self.locks.acquire(rut).await;

        let outcome = classify(self.api.update(rut, &person).await, Operation::Update);
        let notification = self.apply_save(rut, &person, &outcome, MSG_UPDATED).await;
        Ok(self.finish(Operation::Update, Some(rut.clone()), outcome, notification))
    }

    /// `DELETE` a person. Fails open: an unreachable backend still removes
    /// the record locally and marks it pending.
    pub async fn delete(&self, rut: &Rut) -> Result<OperationReport<()>, ValidationError> {
        validation::validate_rut(rut)?;
        let _guard = self.locks.acquire(rut).await;

        let outcome = classify(self.api.delete(rut).await, Operation::Delete);
        let notification = {
            let mut store = self.store.write().await;
            match &outcome {
                OperationOutcome::AcceptedPending(_) => {
                    store.remove(rut);
                    store.mark_pending(rut.clone());
                    Notification::info(MSG_DELETE_PENDING)
                }
                OperationOutcome::Durable(_) => {
                    store.remove(rut);
                    store.clear_pending(rut);
                    Notification::success(MSG_DELETED)
                }
                OperationOutcome::NetworkFailure { .. } => {
                    store.remove(rut);
                    store.mark_pending(rut.clone());
                    Notification::warning(MSG_DELETE_OFFLINE)
                }
                failure => Notification::error(failure.error_message().unwrap_or_default()),
            }
        };
        Ok(self.finish(Operation::Delete, Some(rut.clone()), outcome, notification))
    }

    /// `GET` one person, falling back to the local copy when the backend
    /// cannot answer.
    pub async fn fetch_one(&self, rut: &Rut) -> Result<FetchOneReport, ValidationError> {
        validation::validate_rut(rut)?;
        let _guard = self.locks.acquire(rut).await;

        let outcome = classify(self.api.get_one(rut).await, Operation::FetchOne);
        let (person, from_local, notification) = {
            let mut store = self.store.write().await;
            match &outcome {
                OperationOutcome::Durable(Some(remote)) => {
                    let remote = keyed(rut, remote.clone());
                    store.upsert(remote.clone());
                    store.clear_pending(rut);
                    (Some(remote), false, None)
                }
                OperationOutcome::AcceptedPending(Some(remote)) => {
                    let remote = keyed(rut, remote.clone());
                    store.upsert(remote.clone());
                    store.mark_pending(rut.clone());
                    (
                        Some(remote),
                        false,
                        Some(Notification::info(MSG_FETCH_PENDING)),
                    )
                }
                _ => match store.get(rut).cloned() {
                    Some(local) => (
                        Some(local),
                        true,
                        Some(Notification::warning(MSG_LOCAL_FALLBACK)),
                    ),
                    None => (
                        None,
                        false,
                        Some(Notification::warning(
                            Operation::FetchOne.fallback_message(404),
                        )),
                    ),
                },
            }
        };

        tracing::info!(
            operation = %Operation::FetchOne,
            rut = %rut,
            outcome = ?outcome.kind(),
            from_local,
            "reconciled"
        );
        if let Some(n) = &notification {
            self.notifier.notify(&n.message, n.severity);
        }
        Ok(FetchOneReport {
            person,
            from_local,
            outcome,
            notification,
        })
    }

    /// Replay every pending key against the backend: a locally held record
    /// is re-sent with `update`, an absent one with `delete`.
    pub async fn resync_pending(&self) -> Vec<ResyncEntry> {
        let pending = self.pending().await;
        let mut entries = Vec::with_capacity(pending.len());
        for rut in pending {
            let entry = match self.get(&rut).await {
                Some(local) => ResyncEntry {
                    action: ResyncAction::Update,
                    result: self.update(&rut, local).await.map(|r| r.kind()),
                    rut,
                },
                None => ResyncEntry {
                    action: ResyncAction::Delete,
                    result: self.delete(&rut).await.map(|r| r.kind()),
                    rut,
                },
            };
            entries.push(entry);
        }
        let still_pending = self.store.read().await.pending().len();
        tracing::info!(replayed = entries.len(), still_pending, "resync pass finished");
        entries
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Shared create / update transition, always applied under `rut`.
    async fn apply_save(
        &self,
        rut: &Rut,
        submitted: &Person,
        outcome: &OperationOutcome<Person>,
        success: &str,
    ) -> Notification {
        let mut store = self.store.write().await;
        match outcome {
            OperationOutcome::AcceptedPending(saved) => {
                let saved = saved.clone().unwrap_or_else(|| submitted.clone());
                store.mark_pending(rut.clone());
                store.upsert(keyed(rut, saved));
                Notification::info(MSG_SAVED_PENDING)
            }
            OperationOutcome::Durable(saved) => {
                let saved = saved.clone().unwrap_or_else(|| submitted.clone());
                store.clear_pending(rut);
                store.upsert(keyed(rut, saved));
                Notification::success(success)
            }
            failure => Notification::error(failure.error_message().unwrap_or_default()),
        }
    }

    fn finish<T>(
        &self,
        operation: Operation,
        rut: Option<Rut>,
        outcome: OperationOutcome<T>,
        notification: Notification,
    ) -> OperationReport<T> {
        let kind = outcome.kind();
        let key = rut.as_ref().map(Rut::as_str).unwrap_or("*");
        if outcome.is_failure() {
            tracing::warn!(operation = %operation, rut = key, outcome = ?kind, "{}", notification.message);
        } else {
            tracing::info!(operation = %operation, rut = key, outcome = ?kind, "reconciled");
        }
        self.notifier
            .notify(&notification.message, notification.severity);
        OperationReport {
            operation,
            rut,
            outcome,
            notification,
        }
    }
}

/// A record's key never changes: a body echoing another rut is stored under
/// the key the operation was issued for.
fn keyed(rut: &Rut, mut person: Person) -> Person {
    if &person.rut != rut {
        tracing::warn!(requested = %rut, returned = %person.rut, "backend echoed a different rut");
        person.rut = rut.clone();
    }
    person
}
