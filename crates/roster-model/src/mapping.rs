//! Mapping suggestions, confirmations and learned associations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{MappingTarget, TargetField};
use crate::error::{ModelError, Result};

/// Baseline confidence of a learned mapping confirmed once.
pub const LEARNED_BASE_CONFIDENCE: f64 = 0.7;
/// Usage count at which learned confidence saturates at 1.0.
pub const LEARNED_USAGE_CAP: u32 = 10;

/// Raw values sampled from one source column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnSample {
    pub header: String,
    pub values: Vec<String>,
}

impl ColumnSample {
    pub fn new(header: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            header: header.into(),
            values,
        }
    }

    /// Trimmed values that are not blank.
    pub fn non_blank(&self) -> impl Iterator<Item = &str> {
        self.values
            .iter()
            .map(String::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// Where a suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    Learned,
    Scored,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingSuggestion {
    pub header: String,
    pub target: MappingTarget,
    pub confidence: f64,
    pub source: SuggestionSource,
}

impl MappingSuggestion {
    pub fn is_unmapped(&self) -> bool {
        self.target.is_unmapped()
    }
}

/// Header to target assignments confirmed by a user.
pub type ConfirmedMappings = BTreeMap<String, MappingTarget>;

/// Builds confirmed mappings from `header -> field name` string pairs.
pub fn parse_confirmed<I, H, T>(pairs: I) -> Result<ConfirmedMappings>
where
    I: IntoIterator<Item = (H, T)>,
    H: Into<String>,
    T: AsRef<str>,
{
    pairs
        .into_iter()
        .map(|(header, target)| Ok((header.into(), target.as_ref().parse::<MappingTarget>()?)))
        .collect::<std::result::Result<_, ModelError>>()
}

/// A header association learned from earlier confirmations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedMapping {
    pub source_header: String,
    pub target_field: TargetField,
    pub usage_count: u32,
    pub last_used: NaiveDate,
}

impl LearnedMapping {
    pub fn new(source_header: impl Into<String>, target_field: TargetField, today: NaiveDate) -> Self {
        Self {
            source_header: source_header.into(),
            target_field,
            usage_count: 1,
            last_used: today,
        }
    }

    /// `0.7 + 0.3 * min(usage_count / 10, 1)`.
    pub fn confidence(&self) -> f64 {
        let ratio = (f64::from(self.usage_count) / f64::from(LEARNED_USAGE_CAP)).min(1.0);
        LEARNED_BASE_CONFIDENCE + (1.0 - LEARNED_BASE_CONFIDENCE) * ratio
    }
}
