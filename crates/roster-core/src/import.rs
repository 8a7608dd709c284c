//! Transactional import orchestration.
//!
//! One import is one job: `IN_PROGRESS`, then `SUCCESS` or `FAILED`.
//! Steps run in order and any failure aborts the rest:
//!
//! 1. open the job in the audit log
//! 2. learn the confirmed header mappings (kept even if the import fails)
//! 3. parse and validate every row
//! 4. reject identities duplicated within the file or already stored
//! 5. save the batch and commit, then publish one change notification
//!
//! The job is closed last, outside the record store transaction.

use std::io::Read;
use std::sync::Arc;

use chrono::Local;
use roster_ingest::{CsvTable, read_csv_table};
use roster_map::LearnedMappingStore;
use roster_model::{ConfirmedMappings, JobId, StoredHuman};
use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, warn};

use crate::audit::AuditLog;
use crate::error::{ImportError, Result};
use crate::notify::Notifier;
use crate::parser::parse_rows;
use crate::store::{RecordStore, RecordTransaction};
use crate::uniqueness::{UniquenessPolicy, check_batch, check_store};

pub const DEFAULT_ERROR_DETAIL_LIMIT: usize = 1024;
pub const DEFAULT_TOPIC: &str = "/topic/humans";
pub const CHANGE_PAYLOAD: &str = "update";

/// Tunables for the import orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Maximum characters of error detail kept on a failed job.
    pub error_detail_limit: usize,
    pub uniqueness: UniquenessPolicy,
    /// Topic notified after a successful commit.
    pub topic: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            error_detail_limit: DEFAULT_ERROR_DETAIL_LIMIT,
            uniqueness: UniquenessPolicy::default(),
            topic: DEFAULT_TOPIC.to_string(),
        }
    }
}

impl ImportOptions {
    #[must_use]
    pub fn with_error_detail_limit(mut self, limit: usize) -> Self {
        self.error_detail_limit = limit;
        self
    }

    #[must_use]
    pub fn with_uniqueness(mut self, uniqueness: UniquenessPolicy) -> Self {
        self.uniqueness = uniqueness;
        self
    }

    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }
}

/// Result of a committed import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub job_id: JobId,
    pub added: Vec<StoredHuman>,
}

/// Why an import failed, along with the job that recorded it.
#[derive(Debug)]
pub struct ImportFailure {
    pub job_id: Option<JobId>,
    pub error: ImportError,
}

impl std::fmt::Display for ImportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.job_id {
            Some(id) => write!(f, "import job {id} failed: {}", self.error),
            None => write!(f, "import failed: {}", self.error),
        }
    }
}

impl std::error::Error for ImportFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Keeps at most `limit` characters of `detail`.
pub fn truncate_detail(detail: &str, limit: usize) -> String {
    match detail.char_indices().nth(limit) {
        Some((end, _)) => detail[..end].to_string(),
        None => detail.to_string(),
    }
}

pub struct ImportService<S: RecordStore> {
    store: Arc<S>,
    learned: Arc<LearnedMappingStore>,
    audit: Arc<dyn AuditLog>,
    notifier: Arc<dyn Notifier>,
    options: ImportOptions,
}

impl<S: RecordStore> ImportService<S> {
    pub fn new(
        store: Arc<S>,
        learned: Arc<LearnedMappingStore>,
        audit: Arc<dyn AuditLog>,
        notifier: Arc<dyn Notifier>,
        options: ImportOptions,
    ) -> Self {
        Self {
            store,
            learned,
            audit,
            notifier,
            options,
        }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audit(&self) -> &dyn AuditLog {
        self.audit.as_ref()
    }

    /// Reads a CSV stream and imports it as one job.
    pub fn import_reader<R: Read>(
        &self,
        reader: R,
        confirmed: &ConfirmedMappings,
    ) -> std::result::Result<ImportOutcome, ImportFailure> {
        self.run_job(|| {
            let table = read_csv_table(reader)?;
            self.import_rows(&table, confirmed)
        })
    }

    /// Imports an already loaded table as one job.
    pub fn import_table(
        &self,
        table: &CsvTable,
        confirmed: &ConfirmedMappings,
    ) -> std::result::Result<ImportOutcome, ImportFailure> {
        self.run_job(|| self.import_rows(table, confirmed))
    }

    fn run_job<F>(&self, body: F) -> std::result::Result<ImportOutcome, ImportFailure>
    where
        F: FnOnce() -> Result<Vec<StoredHuman>>,
    {
        let job_id = self.audit.create().map_err(|err| ImportFailure {
            job_id: None,
            error: err.into(),
        })?;
        let span = info_span!("import", job = %job_id);
        let _guard = span.enter();

        match body() {
            Ok(added) => {
                if let Err(err) = self.audit.mark_success(job_id, added.len()) {
                    error!(error = %err, "failed to mark import job successful");
                }
                info!(added = added.len(), "import committed");
                Ok(ImportOutcome { job_id, added })
            }
            Err(err) => {
                let detail = truncate_detail(&err.to_string(), self.options.error_detail_limit);
                if let Err(audit_err) = self.audit.mark_failed(job_id, &detail) {
                    error!(error = %audit_err, "failed to mark import job failed");
                }
                warn!(error = %err, retryable = err.is_retryable(), "import failed");
                Err(ImportFailure {
                    job_id: Some(job_id),
                    error: err,
                })
            }
        }
    }

    fn import_rows(
        &self,
        table: &CsvTable,
        confirmed: &ConfirmedMappings,
    ) -> Result<Vec<StoredHuman>> {
        let learned = self.learned.record_confirmed_mappings(confirmed)?;
        info!(learned, "confirmed mappings learned");

        if table.is_empty() {
            return Err(ImportError::EmptyImport);
        }

        let rows = parse_rows(table, confirmed, Local::now().date_naive())?;
        let policy = &self.options.uniqueness;
        check_batch(policy, &rows)?;

        let mut tx = self.store.begin()?;
        check_store(&tx, policy, &rows)?;
        let added = tx.save_all(rows.into_iter().map(|parsed| parsed.record).collect())?;
        tx.commit()?;

        if let Err(err) = self.notifier.publish(&self.options.topic, CHANGE_PAYLOAD) {
            warn!(error = %err, "change notification failed");
        }
        Ok(added)
    }
}
