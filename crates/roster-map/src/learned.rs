//! Process-wide cache of learned header associations.
//!
//! The cache is loaded once from a [`MappingRepository`] and every
//! mutation is written through to it. Updates for one header run under
//! that header's map entry lock, so concurrent confirmations of the same
//! header never lose a usage count.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use roster_model::{ConfirmedMappings, LearnedMapping, TargetField};
use tracing::debug;

use crate::error::Result;
use crate::repository::MappingRepository;

pub struct LearnedMappingStore {
    cache: DashMap<String, LearnedMapping>,
    repository: Arc<dyn MappingRepository>,
}

impl std::fmt::Debug for LearnedMappingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LearnedMappingStore")
            .field("entries", &self.cache.len())
            .finish_non_exhaustive()
    }
}

fn header_key(header: &str) -> String {
    header.trim().to_string()
}

impl LearnedMappingStore {
    /// Loads every learned mapping from `repository` into memory.
    pub fn load(repository: Arc<dyn MappingRepository>) -> Result<Self> {
        let cache = DashMap::new();
        for mapping in repository.find_all()? {
            cache.insert(header_key(&mapping.source_header), mapping);
        }
        debug!(entries = cache.len(), "loaded learned mappings");
        Ok(Self { cache, repository })
    }

    pub fn lookup(&self, header: &str) -> Option<LearnedMapping> {
        self.cache
            .get(&header_key(header))
            .map(|entry| entry.value().clone())
    }

    /// Records a confirmation dated today.
    pub fn record_confirmed_mapping(&self, header: &str, field: TargetField) -> Result<LearnedMapping> {
        self.record_confirmed_mapping_on(header, field, Local::now().date_naive())
    }

    /// Records that `header` was confirmed as `field` on `today`.
    ///
    /// Same field: usage count grows and the date refreshes. Different
    /// field: the association is replaced with a usage count of 1. The
    /// durable write happens first, so a failed write leaves the cache
    /// untouched.
    pub fn record_confirmed_mapping_on(
        &self,
        header: &str,
        field: TargetField,
        today: NaiveDate,
    ) -> Result<LearnedMapping> {
        let key = header_key(header);
        match self.cache.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                let current = occupied.get();
                let next = if current.target_field == field {
                    LearnedMapping {
                        usage_count: current.usage_count.saturating_add(1),
                        last_used: today,
                        ..current.clone()
                    }
                } else {
                    LearnedMapping::new(key, field, today)
                };
                self.repository.upsert(&next)?;
                occupied.insert(next.clone());
                Ok(next)
            }
            Entry::Vacant(vacant) => {
                let next = LearnedMapping::new(key, field, today);
                self.repository.upsert(&next)?;
                vacant.insert(next.clone());
                Ok(next)
            }
        }
    }

    /// Learns every confirmed pair except those mapped to "none".
    ///
    /// Returns the number of mappings written.
    pub fn record_confirmed_mappings(&self, confirmed: &ConfirmedMappings) -> Result<usize> {
        let today = Local::now().date_naive();
        let mut written = 0;
        for (header, target) in confirmed {
            if let Some(field) = target.field() {
                self.record_confirmed_mapping_on(header, field, today)?;
                written += 1;
            }
        }
        Ok(written)
    }

    /// All learned mappings, sorted by header.
    pub fn snapshot(&self) -> Vec<LearnedMapping> {
        let mut all: Vec<LearnedMapping> =
            self.cache.iter().map(|entry| entry.value().clone()).collect();
        all.sort_by(|a, b| a.source_header.cmp(&b.source_header));
        all
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
