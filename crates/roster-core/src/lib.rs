//! Import pipeline core: row parsing, duplicate detection and the
//! transactional orchestrator, plus the collaborator contracts it drives.

pub mod audit;
pub mod error;
pub mod import;
pub mod notify;
pub mod parser;
pub mod store;
pub mod uniqueness;

pub use audit::{AuditError, AuditLog, MemoryAuditLog};
pub use error::{ConflictScope, ImportError, Result};
pub use import::{
    CHANGE_PAYLOAD, DEFAULT_ERROR_DETAIL_LIMIT, DEFAULT_TOPIC, ImportFailure, ImportOptions,
    ImportOutcome, ImportService, truncate_detail,
};
pub use notify::{LogNotifier, Notifier, NotifyError, RecordingNotifier};
pub use parser::parse_rows;
pub use store::{
    MemoryRecordStore, MemoryTransaction, RecordStore, RecordTransaction, StagedWrites, StoreError,
    StoreState,
};
pub use uniqueness::{IdentityKey, ParsedRow, UniquenessPolicy, ensure_unique_for_update};
