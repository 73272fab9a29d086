//! Owned in-memory record set plus the set of keys awaiting durability.
//!
//! Records keep insertion order and are unique by `rut`. Nothing here is
//! persisted; the store lives as long as the process.

use std::collections::BTreeSet;

use serde::Serialize;

use personas_core::{Person, Rut};

/// Per-`rut` synchronization state, derived from the two sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordState {
    /// Neither held locally nor awaiting confirmation.
    Untracked,
    /// Held locally and confirmed by the backend.
    Durable,
    /// Last local change not yet confirmed; the record may be absent if the
    /// pending change was a delete.
    Pending,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonStore {
    records: Vec<Person>,
    pending: BTreeSet<Rut>,
}

impl PersonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Person] {
        &self.records
    }

    pub fn get(&self, rut: &Rut) -> Option<&Person> {
        self.records.iter().find(|p| &p.rut == rut)
    }

    pub fn contains(&self, rut: &Rut) -> bool {
        self.get(rut).is_some()
    }

    pub fn pending(&self) -> &BTreeSet<Rut> {
        &self.pending
    }

    pub fn is_pending(&self, rut: &Rut) -> bool {
        self.pending.contains(rut)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn state_of(&self, rut: &Rut) -> RecordState {
        if self.is_pending(rut) {
            RecordState::Pending
        } else if self.contains(rut) {
            RecordState::Durable
        } else {
            RecordState::Untracked
        }
    }

    /// Replace every record. Duplicate keys collapse onto the first
    /// position, keeping the last value seen.
    pub fn replace_all(&mut self, persons: Vec<Person>) {
        self.records.clear();
        for person in persons {
            self.upsert(person);
        }
    }

    /// Replace the record with the same `rut`, or append. Returns `true` if
    /// the record was new.
    pub fn upsert(&mut self, person: Person) -> bool {
        match self.records.iter_mut().find(|p| p.rut == person.rut) {
            Some(existing) => {
                *existing = person;
                false
            }
            None => {
                self.records.push(person);
                true
            }
        }
    }

    pub fn remove(&mut self, rut: &Rut) -> Option<Person> {
        let index = self.records.iter().position(|p| &p.rut == rut)?;
        Some(self.records.remove(index))
    }

    pub fn clear_records(&mut self) {
        self.records.clear();
    }

    pub fn mark_pending(&mut self, rut: Rut) {
        self.pending.insert(rut);
    }

    /// Add every held record to the pending set. Existing entries stay.
    pub fn mark_all_pending(&mut self) {
        let keys: Vec<Rut> = self.records.iter().map(|p| p.rut.clone()).collect();
        self.pending.extend(keys);
    }

    pub fn clear_pending(&mut self, rut: &Rut) {
        self.pending.remove(rut);
    }

    pub fn clear_all_pending(&mut self) {
        self.pending.clear();
    }
}
