use thiserror::Error;

use crate::job::{ImportStatus, JobId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown target field: {0}")]
    UnknownField(String),
    #[error("'{value}' is not a valid {expected}")]
    InvalidValue {
        value: String,
        expected: &'static str,
    },
    #[error("import job {id} is already {status}")]
    JobFinished { id: JobId, status: ImportStatus },
}

pub type Result<T> = std::result::Result<T, ModelError>;
