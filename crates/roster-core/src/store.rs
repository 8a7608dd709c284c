//! Record persistence contract and an in-memory implementation.
//!
//! Writes go through a transaction that reads from the snapshot taken at
//! [`RecordStore::begin`]. Commit fails with [`StoreError::Conflict`] when
//! another transaction committed in between, so a uniqueness check and the
//! insert that follows it always see the same data.

use std::sync::{Mutex, MutexGuard};

use roster_model::{HumanRecord, RecordId, StoredHuman};
use thiserror::Error;

use crate::uniqueness::{IdentityKey, UniquenessPolicy};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Another writer committed since this transaction began.
    #[error("concurrent modification detected")]
    Conflict,
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Storage of validated records.
pub trait RecordStore: Send + Sync {
    type Tx<'a>: RecordTransaction
    where
        Self: 'a;

    /// Opens a transaction over a consistent snapshot.
    fn begin(&self) -> Result<Self::Tx<'_>, StoreError>;

    /// Every committed record, by ascending id.
    fn find_all(&self) -> Result<Vec<StoredHuman>, StoreError>;
}

/// Unit of work over a [`RecordStore`]. Dropping it without
/// [`commit`](RecordTransaction::commit) discards every pending write.
pub trait RecordTransaction {
    fn exists_by_identity(
        &self,
        policy: &UniquenessPolicy,
        key: &IdentityKey,
    ) -> Result<bool, StoreError>;

    fn exists_by_identity_excluding(
        &self,
        policy: &UniquenessPolicy,
        key: &IdentityKey,
        exclude: RecordId,
    ) -> Result<bool, StoreError>;

    /// Stages `records` and returns them with their assigned ids.
    fn save_all(&mut self, records: Vec<HumanRecord>) -> Result<Vec<StoredHuman>, StoreError>;

    fn commit(self) -> Result<(), StoreError>;
}

/// Committed state shared by snapshot-based stores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub version: u64,
    pub records: Vec<StoredHuman>,
}

impl StoreState {
    pub fn next_id(&self) -> u64 {
        self.records.iter().map(|r| r.id.0).max().unwrap_or(0) + 1
    }
}

/// Snapshot plus staged writes, shared by snapshot-based stores.
#[derive(Debug, Clone)]
pub struct StagedWrites {
    pub base: StoreState,
    pub staged: Vec<StoredHuman>,
}

impl StagedWrites {
    pub fn new(base: StoreState) -> Self {
        Self {
            base,
            staged: Vec::new(),
        }
    }

    pub fn exists(
        &self,
        policy: &UniquenessPolicy,
        key: &IdentityKey,
        exclude: Option<RecordId>,
    ) -> bool {
        self.base
            .records
            .iter()
            .chain(&self.staged)
            .filter(|stored| Some(stored.id) != exclude)
            .any(|stored| policy.key(&stored.human) == *key)
    }

    pub fn stage(&mut self, records: Vec<HumanRecord>) -> Vec<StoredHuman> {
        let mut next = self.base.next_id() + self.staged.len() as u64;
        let added: Vec<StoredHuman> = records
            .into_iter()
            .map(|human| {
                let stored = StoredHuman {
                    id: RecordId(next),
                    human,
                };
                next += 1;
                stored
            })
            .collect();
        self.staged.extend(added.iter().cloned());
        added
    }

    /// Applies the staged records onto `current` if it is still the
    /// snapshot this transaction started from.
    pub fn apply_to(self, current: &mut StoreState) -> Result<(), StoreError> {
        if current.version != self.base.version {
            return Err(StoreError::Conflict);
        }
        if self.staged.is_empty() {
            return Ok(());
        }
        current.records.extend(self.staged);
        current.version += 1;
        Ok(())
    }
}

/// Store kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    state: Mutex<StoreState>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("record store lock poisoned".to_string()))
    }
}

pub struct MemoryTransaction<'a> {
    store: &'a MemoryRecordStore,
    writes: StagedWrites,
}

impl RecordStore for MemoryRecordStore {
    type Tx<'a> = MemoryTransaction<'a>;

    fn begin(&self) -> Result<MemoryTransaction<'_>, StoreError> {
        let snapshot = self.lock()?.clone();
        Ok(MemoryTransaction {
            store: self,
            writes: StagedWrites::new(snapshot),
        })
    }

    fn find_all(&self) -> Result<Vec<StoredHuman>, StoreError> {
        Ok(self.lock()?.records.clone())
    }
}

impl RecordTransaction for MemoryTransaction<'_> {
    fn exists_by_identity(
        &self,
        policy: &UniquenessPolicy,
        key: &IdentityKey,
    ) -> Result<bool, StoreError> {
        Ok(self.writes.exists(policy, key, None))
    }

    fn exists_by_identity_excluding(
        &self,
        policy: &UniquenessPolicy,
        key: &IdentityKey,
        exclude: RecordId,
    ) -> Result<bool, StoreError> {
        Ok(self.writes.exists(policy, key, Some(exclude)))
    }

    fn save_all(&mut self, records: Vec<HumanRecord>) -> Result<Vec<StoredHuman>, StoreError> {
        Ok(self.writes.stage(records))
    }

    fn commit(self) -> Result<(), StoreError> {
        let mut state = self.store.lock()?;
        self.writes.apply_to(&mut state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use roster_model::Coordinates;

    fn record(name: &str) -> HumanRecord {
        HumanRecord {
            name: name.into(),
            coordinates: Coordinates { x: 1.0, y: 2 },
            creation_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            real_hero: false,
            has_toothpick: false,
            car: None,
            mood: None,
            impact_speed: 3,
            soundtrack_name: "s".into(),
            minutes_of_waiting: 0.0,
            weapon_type: None,
        }
    }

    #[test]
    fn test_dropped_transaction_writes_nothing() {
        let store = MemoryRecordStore::new();
        {
            let mut tx = store.begin().unwrap();
            tx.save_all(vec![record("a")]).unwrap();
        }
        assert!(store.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_ids_are_sequential_across_commits() {
        let store = MemoryRecordStore::new();
        let mut tx = store.begin().unwrap();
        let first = tx.save_all(vec![record("a"), record("b")]).unwrap();
        tx.commit().unwrap();
        let mut tx = store.begin().unwrap();
        let second = tx.save_all(vec![record("c")]).unwrap();
        tx.commit().unwrap();
        assert_eq!(first[1].id, RecordId(2));
        assert_eq!(second[0].id, RecordId(3));
    }

    #[test]
    fn test_overlapping_commit_conflicts() {
        let store = MemoryRecordStore::new();
        let mut first = store.begin().unwrap();
        let mut second = store.begin().unwrap();
        first.save_all(vec![record("a")]).unwrap();
        second.save_all(vec![record("a")]).unwrap();
        first.commit().unwrap();
        assert_eq!(second.commit(), Err(StoreError::Conflict));
        assert_eq!(store.find_all().unwrap().len(), 1);
    }

    #[test]
    fn test_identity_excluding_skips_own_record() {
        let store = MemoryRecordStore::new();
        let mut tx = store.begin().unwrap();
        let saved = tx.save_all(vec![record("a")]).unwrap();
        tx.commit().unwrap();
        let policy = UniquenessPolicy::default();
        let key = policy.key(&record("A"));
        let tx = store.begin().unwrap();
        assert!(tx.exists_by_identity(&policy, &key).unwrap());
        assert!(!tx.exists_by_identity_excluding(&policy, &key, saved[0].id).unwrap());
    }
}
