//! Durable backing store contract for learned mappings.

use std::collections::BTreeMap;
use std::sync::Mutex;

use roster_model::LearnedMapping;

use crate::error::{MapError, Result};

/// Durable storage of learned mappings, keyed by source header.
pub trait MappingRepository: Send + Sync {
    fn find_all(&self) -> Result<Vec<LearnedMapping>>;

    fn find_by_source_header(&self, header: &str) -> Result<Option<LearnedMapping>>;

    /// Inserts or replaces the mapping for its source header.
    fn upsert(&self, mapping: &LearnedMapping) -> Result<()>;
}

/// In-memory repository, for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryMappingRepository {
    rows: Mutex<BTreeMap<String, LearnedMapping>>,
}

impl MemoryMappingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mappings(mappings: impl IntoIterator<Item = LearnedMapping>) -> Self {
        let rows = mappings
            .into_iter()
            .map(|m| (m.source_header.clone(), m))
            .collect();
        Self {
            rows: Mutex::new(rows),
        }
    }
}

impl MappingRepository for MemoryMappingRepository {
    fn find_all(&self) -> Result<Vec<LearnedMapping>> {
        let rows = self.rows.lock().map_err(|_| MapError::LockPoisoned)?;
        Ok(rows.values().cloned().collect())
    }

    fn find_by_source_header(&self, header: &str) -> Result<Option<LearnedMapping>> {
        let rows = self.rows.lock().map_err(|_| MapError::LockPoisoned)?;
        Ok(rows.get(header).cloned())
    }

    fn upsert(&self, mapping: &LearnedMapping) -> Result<()> {
        let mut rows = self.rows.lock().map_err(|_| MapError::LockPoisoned)?;
        rows.insert(mapping.source_header.clone(), mapping.clone());
        Ok(())
    }
}
