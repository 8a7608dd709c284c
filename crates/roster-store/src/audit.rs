//! Import job audit log persisted as one JSON document.

use std::path::{Path, PathBuf};

use chrono::Utc;
use roster_core::audit::{finish_job, newest_first};
use roster_core::{AuditError, AuditLog};
use roster_model::{ImportJob, JobId};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::io::{SCHEMA_VERSION, check_version, lock_exclusive, read_json, write_json};

#[derive(Debug, Serialize, Deserialize)]
struct JobsFile {
    version: u32,
    jobs: Vec<ImportJob>,
}

/// [`AuditLog`] backed by a JSON file. Each transition is its own write,
/// independent of any record store transaction.
#[derive(Debug)]
pub struct JsonAuditLog {
    path: PathBuf,
}

impl JsonAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<ImportJob>> {
        let Some(file) = read_json::<JobsFile>(&self.path)? else {
            return Ok(Vec::new());
        };
        check_version(file.version, &self.path)?;
        Ok(file.jobs)
    }

    fn save(&self, jobs: Vec<ImportJob>) -> Result<()> {
        write_json(
            &self.path,
            &JobsFile {
                version: SCHEMA_VERSION,
                jobs,
            },
        )
    }

    fn update<F>(&self, id: JobId, finish: F) -> std::result::Result<(), AuditError>
    where
        F: FnOnce(&mut ImportJob) -> roster_model::Result<()>,
    {
        let _lock = lock_exclusive(&self.path)?;
        let mut jobs = self.load()?;
        finish_job(&mut jobs, id, finish)?;
        self.save(jobs)?;
        Ok(())
    }
}

impl AuditLog for JsonAuditLog {
    fn create(&self) -> std::result::Result<JobId, AuditError> {
        let _lock = lock_exclusive(&self.path)?;
        let mut jobs = self.load()?;
        let id = JobId(jobs.iter().map(|job| job.id.0).max().unwrap_or(0) + 1);
        jobs.push(ImportJob::start(id, Utc::now()));
        self.save(jobs)?;
        Ok(id)
    }

    fn mark_success(&self, id: JobId, added_count: usize) -> std::result::Result<(), AuditError> {
        self.update(id, |job| job.mark_success(added_count))
    }

    fn mark_failed(&self, id: JobId, detail: &str) -> std::result::Result<(), AuditError> {
        self.update(id, |job| job.mark_failed(detail))
    }

    fn find(&self, id: JobId) -> std::result::Result<Option<ImportJob>, AuditError> {
        Ok(self.load()?.into_iter().find(|job| job.id == id))
    }

    fn list(&self) -> std::result::Result<Vec<ImportJob>, AuditError> {
        Ok(newest_first(self.load()?))
    }
}
