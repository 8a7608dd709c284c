//! Learned mappings persisted as one JSON document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use roster_map::{MapError, MappingRepository};
use roster_model::LearnedMapping;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::io::{SCHEMA_VERSION, check_version, lock_exclusive, read_json, write_json};

#[derive(Debug, Serialize, Deserialize)]
struct MappingsFile {
    version: u32,
    mappings: Vec<LearnedMapping>,
}

/// [`MappingRepository`] backed by a JSON file, rewritten on every upsert.
#[derive(Debug)]
pub struct JsonMappingRepository {
    path: PathBuf,
}

impl JsonMappingRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, LearnedMapping>> {
        let Some(file) = read_json::<MappingsFile>(&self.path)? else {
            return Ok(BTreeMap::new());
        };
        check_version(file.version, &self.path)?;
        Ok(file
            .mappings
            .into_iter()
            .map(|m| (m.source_header.clone(), m))
            .collect())
    }

    fn save(&self, rows: BTreeMap<String, LearnedMapping>) -> Result<()> {
        let file = MappingsFile {
            version: SCHEMA_VERSION,
            mappings: rows.into_values().collect(),
        };
        write_json(&self.path, &file)
    }
}

impl MappingRepository for JsonMappingRepository {
    fn find_all(&self) -> roster_map::Result<Vec<LearnedMapping>> {
        Ok(self.load()?.into_values().collect())
    }

    fn find_by_source_header(&self, header: &str) -> roster_map::Result<Option<LearnedMapping>> {
        Ok(self.load()?.remove(header))
    }

    fn upsert(&self, mapping: &LearnedMapping) -> roster_map::Result<()> {
        let _lock = lock_exclusive(&self.path)?;
        let mut rows = self.load()?;
        rows.insert(mapping.source_header.clone(), mapping.clone());
        self.save(rows).map_err(MapError::from)
    }
}
