//! Import job bookkeeping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ModelError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStatus {
    InProgress,
    Success,
    Failed,
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::InProgress => "IN_PROGRESS",
            ImportStatus::Success => "SUCCESS",
            ImportStatus::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ImportStatus::InProgress)
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One import attempt.
///
/// A job is created `IN_PROGRESS` and moves exactly once to `SUCCESS` or
/// `FAILED`. Jobs are never reopened or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportJob {
    pub id: JobId,
    pub started_at: DateTime<Utc>,
    pub status: ImportStatus,
    pub added_count: Option<usize>,
    pub error_detail: Option<String>,
}

impl ImportJob {
    pub fn start(id: JobId, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            started_at,
            status: ImportStatus::InProgress,
            added_count: None,
            error_detail: None,
        }
    }

    pub fn mark_success(&mut self, added_count: usize) -> Result<()> {
        self.ensure_open()?;
        self.status = ImportStatus::Success;
        self.added_count = Some(added_count);
        Ok(())
    }

    pub fn mark_failed(&mut self, detail: impl Into<String>) -> Result<()> {
        self.ensure_open()?;
        self.status = ImportStatus::Failed;
        self.error_detail = Some(detail.into());
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.status.is_terminal() {
            return Err(ModelError::JobFinished {
                id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_transitions_once() {
        let mut job = ImportJob::start(JobId(7), Utc::now());
        job.mark_success(3).unwrap();
        assert_eq!(job.status, ImportStatus::Success);
        assert_eq!(job.added_count, Some(3));

        let err = job.mark_failed("late").unwrap_err();
        assert_eq!(err.to_string(), "import job #7 is already SUCCESS");
        assert_eq!(job.error_detail, None);
    }

    #[test]
    fn test_status_serializes_screaming() {
        let json = serde_json::to_string(&ImportStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }
}
