//! `roster.toml` configuration.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use roster_core::ImportOptions;
use roster_map::EngineOptions;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "roster.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RosterConfig {
    pub engine: EngineOptions,
    pub import: ImportOptions,
}

impl RosterConfig {
    /// Loads `explicit` if given, else `<data_dir>/roster.toml`.
    ///
    /// A missing default file yields the defaults; a missing explicit
    /// file is an error.
    pub fn load(explicit: Option<&Path>, data_dir: &Path) -> Result<Self> {
        let path: PathBuf = explicit.map_or_else(|| data_dir.join(CONFIG_FILE), Path::to_path_buf);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound && explicit.is_none() => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("read config {}", path.display()));
            }
        };
        Self::parse(&text).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        if !(0.0..=1.0).contains(&config.engine.min_confidence) {
            anyhow::bail!(
                "engine.min_confidence must be within 0..=1, got {}",
                config.engine.min_confidence
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::UniquenessPolicy;
    use roster_model::TargetField;
    use tempfile::tempdir;

    #[test]
    fn test_missing_default_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = RosterConfig::load(None, dir.path()).unwrap();
        assert_eq!(config, RosterConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("elsewhere.toml");
        let err = RosterConfig::load(Some(&missing), dir.path()).unwrap_err();
        assert!(err.to_string().starts_with("read config"));
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = RosterConfig::parse(
            "[engine]\nmin_confidence = 0.6\n\n[import]\nuniqueness = [\"name\"]\n",
        )
        .unwrap();
        assert!((config.engine.min_confidence - 0.6).abs() < f64::EPSILON);
        assert_eq!(config.engine.sample_size, 50);
        assert_eq!(
            config.import.uniqueness,
            UniquenessPolicy::new(vec![TargetField::Name])
        );
        assert_eq!(config.import.topic, "/topic/humans");
    }

    #[test]
    fn test_rejects_out_of_range_threshold_and_unknown_keys() {
        assert!(RosterConfig::parse("[engine]\nmin_confidence = 2.0\n").is_err());
        assert!(RosterConfig::parse("[mystery]\nx = 1\n").is_err());
        assert!(RosterConfig::parse("[import]\nuniqueness = [\"nope\"]\n").is_err());
    }

    #[test]
    fn test_default_file_in_data_dir_is_read() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[engine]\nsample_size = 5\n").unwrap();
        let config = RosterConfig::load(None, dir.path()).unwrap();
        assert_eq!(config.engine.sample_size, 5);
    }
}
