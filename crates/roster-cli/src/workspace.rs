//! A data directory opened with its configuration: the learned store,
//! suggestion engine and import service wired to the JSON stores.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use roster_core::{ImportFailure, ImportOutcome, ImportService, LogNotifier};
use roster_ingest::read_csv_preview_path;
use roster_map::{FieldScore, LearnedMappingStore, SuggestionEngine};
use roster_model::{ConfirmedMappings, ImportJob, LearnedMapping, MappingSuggestion, MappingTarget};
use roster_store::{DataDir, JsonRecordStore};
use tracing::{debug, info};

use crate::config::RosterConfig;
use crate::logging::redact_value;

/// A suggestion plus the full ranking behind it.
#[derive(Debug, Clone)]
pub struct ColumnReport {
    pub suggestion: MappingSuggestion,
    pub ranking: Vec<FieldScore>,
}

pub struct Workspace {
    data: DataDir,
    learned: Arc<LearnedMappingStore>,
    engine: SuggestionEngine,
    service: ImportService<JsonRecordStore>,
}

impl Workspace {
    pub fn open(root: impl Into<PathBuf>, config: RosterConfig) -> Result<Self> {
        let data = DataDir::new(root);
        let learned = LearnedMappingStore::load(Arc::new(data.mappings()))
            .with_context(|| format!("load learned mappings from {}", data.root().display()))?;
        let learned = Arc::new(learned);
        let engine = SuggestionEngine::new(learned.clone(), config.engine);
        let service = ImportService::new(
            Arc::new(data.records()),
            learned.clone(),
            Arc::new(data.audit()),
            Arc::new(LogNotifier),
            config.import,
        );
        debug!(root = %data.root().display(), learned = learned.len(), "workspace opened");
        Ok(Self {
            data,
            learned,
            engine,
            service,
        })
    }

    pub fn root(&self) -> &Path {
        self.data.root()
    }

    pub fn engine(&self) -> &SuggestionEngine {
        &self.engine
    }

    /// Suggests a target for every header of `path`, reading only the
    /// configured sample of rows.
    pub fn suggest_file(&self, path: &Path) -> Result<Vec<ColumnReport>> {
        let sample_size = self.engine.options().sample_size;
        let table = read_csv_preview_path(path, sample_size)
            .with_context(|| format!("read preview of {}", path.display()))?;
        let samples = table.column_samples(sample_size);
        for sample in &samples {
            if let Some(first) = sample.non_blank().next() {
                debug!(header = %sample.header, first = redact_value(first), "column sampled");
            }
        }
        let suggestions = self.engine.suggest(&samples);
        Ok(suggestions
            .into_iter()
            .zip(&samples)
            .map(|(suggestion, sample)| ColumnReport {
                ranking: self.engine.rank(sample),
                suggestion,
            })
            .collect())
    }

    /// Merges explicit confirmations with, optionally, the engine's
    /// suggestions for every header left unconfirmed.
    pub fn confirm(
        &self,
        path: &Path,
        explicit: ConfirmedMappings,
        accept_suggestions: bool,
    ) -> Result<ConfirmedMappings> {
        let mut confirmed = explicit;
        if accept_suggestions {
            for report in self.suggest_file(path)? {
                confirmed
                    .entry(report.suggestion.header)
                    .or_insert(report.suggestion.target);
            }
        }
        if confirmed.values().all(MappingTarget::is_unmapped) {
            bail!("no header is mapped to a field; pass --map HEADER=FIELD or --accept-suggestions");
        }
        Ok(confirmed)
    }

    /// Imports `path` as one job.
    pub fn import_file(&self, path: &Path, confirmed: &ConfirmedMappings) -> Result<ImportOutcome> {
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let outcome = self
            .service
            .import_reader(file, confirmed)
            .map_err(|failure: ImportFailure| {
                let retryable = failure.error.is_retryable();
                let err = anyhow::Error::new(failure);
                if retryable {
                    err.context("the data changed during the import; run it again")
                } else {
                    err
                }
            })?;
        info!(job = %outcome.job_id, added = outcome.added.len(), "file imported");
        Ok(outcome)
    }

    pub fn history(&self) -> Result<Vec<ImportJob>> {
        Ok(self.service.audit().list()?)
    }

    pub fn learned(&self) -> Vec<LearnedMapping> {
        self.learned.snapshot()
    }
}

/// Parses `HEADER=FIELD` arguments; `FIELD` may be `none`.
pub fn parse_map_args(args: &[String]) -> Result<ConfirmedMappings> {
    let mut confirmed = ConfirmedMappings::new();
    for arg in args {
        let Some((header, field)) = arg.rsplit_once('=') else {
            bail!("invalid mapping '{arg}', expected HEADER=FIELD");
        };
        let header = header.trim();
        if header.is_empty() {
            bail!("invalid mapping '{arg}', header is empty");
        }
        let target: MappingTarget = field
            .trim()
            .parse()
            .with_context(|| format!("invalid mapping '{arg}'"))?;
        confirmed.insert(header.to_string(), target);
    }
    Ok(confirmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_model::TargetField;

    #[test]
    fn test_parse_map_args() {
        let confirmed = parse_map_args(&[
            "Имя=name".to_string(),
            " a=b = none".to_string(),
        ])
        .unwrap();
        assert_eq!(
            confirmed.get("Имя"),
            Some(&MappingTarget::Field(TargetField::Name))
        );
        assert_eq!(confirmed.get("a=b"), Some(&MappingTarget::Unmapped));
    }

    #[test]
    fn test_parse_map_args_rejects_garbage() {
        assert!(parse_map_args(&["no-equals".to_string()]).is_err());
        assert!(parse_map_args(&["=name".to_string()]).is_err());
        assert!(parse_map_args(&["x=height".to_string()]).is_err());
    }
}
