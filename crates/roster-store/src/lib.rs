//! JSON file persistence for records, learned mappings and import jobs.
//!
//! Every file is rewritten whole through a temp file and rename, so a
//! crash mid-write leaves the previous version intact. Read-modify-write
//! cycles hold an exclusive lock on a sidecar `.lock` file, so several
//! handles or processes can share one data directory.

pub mod audit;
pub mod error;
pub mod io;
pub mod mappings;
pub mod records;

use std::path::{Path, PathBuf};

pub use audit::JsonAuditLog;
pub use error::{PersistenceError, Result};
pub use io::{SCHEMA_VERSION, StoreLock, atomic_write, lock_exclusive};
pub use mappings::JsonMappingRepository;
pub use records::{JsonRecordStore, JsonTransaction};

pub const RECORDS_FILE: &str = "records.json";
pub const LEARNED_MAPPINGS_FILE: &str = "learned_mappings.json";
pub const IMPORT_JOBS_FILE: &str = "import_jobs.json";

/// File layout of one data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn records(&self) -> JsonRecordStore {
        JsonRecordStore::new(self.root.join(RECORDS_FILE))
    }

    pub fn mappings(&self) -> JsonMappingRepository {
        JsonMappingRepository::new(self.root.join(LEARNED_MAPPINGS_FILE))
    }

    pub fn audit(&self) -> JsonAuditLog {
        JsonAuditLog::new(self.root.join(IMPORT_JOBS_FILE))
    }
}
