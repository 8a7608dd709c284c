//! Record store persisted as one JSON document.
//!
//! The document carries a revision counter. A transaction snapshots it at
//! `begin`. Commit takes the exclusive file lock, re-reads the file and
//! fails with [`StoreError::Conflict`] when another handle or process
//! bumped the revision in between.

use std::path::{Path, PathBuf};

use roster_core::{
    IdentityKey, RecordStore, RecordTransaction, StagedWrites, StoreError, StoreState,
    UniquenessPolicy,
};
use roster_model::{HumanRecord, RecordId, StoredHuman};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::io::{SCHEMA_VERSION, check_version, lock_exclusive, read_json, write_json};

#[derive(Debug, Serialize, Deserialize)]
struct RecordsFile {
    version: u32,
    revision: u64,
    records: Vec<StoredHuman>,
}

#[derive(Debug)]
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoreState> {
        let Some(file) = read_json::<RecordsFile>(&self.path)? else {
            return Ok(StoreState::default());
        };
        check_version(file.version, &self.path)?;
        Ok(StoreState {
            version: file.revision,
            records: file.records,
        })
    }

    fn save(&self, state: StoreState) -> Result<()> {
        let file = RecordsFile {
            version: SCHEMA_VERSION,
            revision: state.version,
            records: state.records,
        };
        write_json(&self.path, &file)
    }
}

pub struct JsonTransaction<'a> {
    store: &'a JsonRecordStore,
    writes: StagedWrites,
}

impl RecordStore for JsonRecordStore {
    type Tx<'a> = JsonTransaction<'a>;

    fn begin(&self) -> std::result::Result<JsonTransaction<'_>, StoreError> {
        let snapshot = self.load()?;
        debug!(revision = snapshot.version, "record transaction opened");
        Ok(JsonTransaction {
            store: self,
            writes: StagedWrites::new(snapshot),
        })
    }

    fn find_all(&self) -> std::result::Result<Vec<StoredHuman>, StoreError> {
        Ok(self.load()?.records)
    }
}

impl RecordTransaction for JsonTransaction<'_> {
    fn exists_by_identity(
        &self,
        policy: &UniquenessPolicy,
        key: &IdentityKey,
    ) -> std::result::Result<bool, StoreError> {
        Ok(self.writes.exists(policy, key, None))
    }

    fn exists_by_identity_excluding(
        &self,
        policy: &UniquenessPolicy,
        key: &IdentityKey,
        exclude: RecordId,
    ) -> std::result::Result<bool, StoreError> {
        Ok(self.writes.exists(policy, key, Some(exclude)))
    }

    fn save_all(
        &mut self,
        records: Vec<HumanRecord>,
    ) -> std::result::Result<Vec<StoredHuman>, StoreError> {
        Ok(self.writes.stage(records))
    }

    fn commit(self) -> std::result::Result<(), StoreError> {
        let _lock = lock_exclusive(&self.store.path)?;
        let mut current = self.store.load()?;
        let before = current.version;
        self.writes.apply_to(&mut current)?;
        if current.version == before {
            return Ok(());
        }
        let revision = current.version;
        self.store.save(current)?;
        debug!(revision, "record transaction committed");
        Ok(())
    }
}
