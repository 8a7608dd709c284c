//! Import job audit log.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use roster_model::{ImportJob, JobId, ModelError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    #[error("import job {0} not found")]
    NotFound(JobId),
    #[error(transparent)]
    Job(#[from] ModelError),
    #[error("audit log unavailable: {0}")]
    Unavailable(String),
}

/// Durable record of import attempts.
///
/// Writes here are independent of the record store transaction, so a
/// failed import still leaves its `FAILED` job behind.
pub trait AuditLog: Send + Sync {
    /// Starts a new `IN_PROGRESS` job.
    fn create(&self) -> Result<JobId, AuditError>;

    fn mark_success(&self, id: JobId, added_count: usize) -> Result<(), AuditError>;

    fn mark_failed(&self, id: JobId, detail: &str) -> Result<(), AuditError>;

    fn find(&self, id: JobId) -> Result<Option<ImportJob>, AuditError>;

    /// All jobs, newest first.
    fn list(&self) -> Result<Vec<ImportJob>, AuditError>;
}

/// Applies a terminal transition to the job `id` within `jobs`.
pub fn finish_job<F>(jobs: &mut [ImportJob], id: JobId, finish: F) -> Result<(), AuditError>
where
    F: FnOnce(&mut ImportJob) -> roster_model::Result<()>,
{
    let job = jobs
        .iter_mut()
        .find(|job| job.id == id)
        .ok_or(AuditError::NotFound(id))?;
    finish(job)?;
    Ok(())
}

/// Jobs sorted newest first; ids break ties.
pub fn newest_first(mut jobs: Vec<ImportJob>) -> Vec<ImportJob> {
    jobs.sort_by(|a, b| b.started_at.cmp(&a.started_at).then(b.id.cmp(&a.id)));
    jobs
}

#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    jobs: Mutex<Vec<ImportJob>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<ImportJob>>, AuditError> {
        self.jobs
            .lock()
            .map_err(|_| AuditError::Unavailable("audit log lock poisoned".to_string()))
    }
}

impl AuditLog for MemoryAuditLog {
    fn create(&self) -> Result<JobId, AuditError> {
        let mut jobs = self.lock()?;
        let id = JobId(jobs.iter().map(|job| job.id.0).max().unwrap_or(0) + 1);
        jobs.push(ImportJob::start(id, Utc::now()));
        Ok(id)
    }

    fn mark_success(&self, id: JobId, added_count: usize) -> Result<(), AuditError> {
        finish_job(&mut self.lock()?, id, |job| job.mark_success(added_count))
    }

    fn mark_failed(&self, id: JobId, detail: &str) -> Result<(), AuditError> {
        finish_job(&mut self.lock()?, id, |job| job.mark_failed(detail))
    }

    fn find(&self, id: JobId) -> Result<Option<ImportJob>, AuditError> {
        Ok(self.lock()?.iter().find(|job| job.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<ImportJob>, AuditError> {
        Ok(newest_first(self.lock()?.clone()))
    }
}
