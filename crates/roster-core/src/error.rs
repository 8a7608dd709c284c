//! Import failure taxonomy.

use std::fmt;

use roster_ingest::IngestError;
use roster_map::MapError;
use roster_model::{RecordId, TargetField};
use roster_validate::Violations;
use thiserror::Error;

use crate::audit::AuditError;
use crate::store::StoreError;
use crate::uniqueness::IdentityKey;

/// Where a uniqueness conflict was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictScope {
    /// Two rows of the same file share an identity.
    Batch { row: usize, first_row: usize },
    /// A row matches a record already in the store.
    Store { row: usize },
    /// An edited record would collide with another stored record.
    Update { id: RecordId },
}

impl fmt::Display for ConflictScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Batch { row, first_row } => {
                write!(f, "at row {row} duplicates row {first_row} of the file")
            }
            Self::Store { row } => write!(f, "at row {row} already exists"),
            Self::Update { id } => write!(f, "is already used by a record other than {id}"),
        }
    }
}

/// Errors that abort an import. Every variant leaves the store untouched.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Import file has no data rows")]
    EmptyImport,

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(
        "Data conversion error at row {row}, column '{column}': invalid value '{value}' for field {field}"
    )]
    RowFormat {
        row: usize,
        column: String,
        value: String,
        field: TargetField,
    },

    #[error("Validation error at row {row}: {violations}")]
    SchemaValidation { row: usize, violations: Violations },

    #[error("Duplicate record {identity} {scope}")]
    UniquenessConflict {
        identity: IdentityKey,
        scope: ConflictScope,
    },

    #[error("Records changed concurrently; retry the import")]
    PersistenceConflict,

    #[error("Record store error: {0}")]
    Store(StoreError),

    #[error("Failed to learn confirmed mappings: {0}")]
    LearnedMapping(#[from] MapError),

    #[error("Audit log error: {0}")]
    Audit(#[from] AuditError),
}

impl ImportError {
    /// True when running the same import again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PersistenceConflict)
    }
}

impl From<StoreError> for ImportError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => Self::PersistenceConflict,
            other => Self::Store(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
