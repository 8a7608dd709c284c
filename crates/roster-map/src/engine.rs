//! Mapping suggestion engine.
//!
//! Turns column samples into one [`MappingSuggestion`] per header. Learned
//! mappings are trusted first; everything else is scored field by field
//! with [`score_field`] and the blended confidences are compared.
//!
//! The engine holds no mutable state of its own. Learning happens through
//! the shared [`LearnedMappingStore`], so one engine can serve concurrent
//! imports.

use std::cmp::Ordering;
use std::sync::Arc;

use roster_model::{
    ColumnSample, FieldCatalog, MappingSuggestion, MappingTarget, SuggestionSource,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::learned::LearnedMappingStore;
use crate::score::{FieldScore, score_field};

/// Default minimum confidence for a suggestion to name a field.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.4;
/// Default number of data rows sampled per column.
pub const DEFAULT_SAMPLE_SIZE: usize = 50;

/// Tunables for the suggestion engine.
///
/// Deserialized from the `[engine]` table of the configuration file;
/// missing keys fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Lowest confidence at which a suggestion names a field instead of
    /// `none`. Also the floor a learned mapping must reach to be trusted.
    pub min_confidence: f64,
    /// Maximum number of data rows scored per column. Scoring cost is
    /// bounded by this, not by the file length.
    pub sample_size: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl EngineOptions {
    /// Set the suggestion threshold.
    #[must_use]
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Set the per-column sample bound.
    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }
}

/// Produces one suggestion per source header.
///
/// A learned mapping at or above the minimum confidence is returned as is.
/// Otherwise every catalog field is scored and the strictly best one wins,
/// with catalog order breaking ties.
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    catalog: FieldCatalog,
    learned: Arc<LearnedMappingStore>,
    options: EngineOptions,
}

impl SuggestionEngine {
    /// Create an engine over the current field catalog.
    pub fn new(learned: Arc<LearnedMappingStore>, options: EngineOptions) -> Self {
        Self {
            catalog: FieldCatalog::CURRENT,
            learned,
            options,
        }
    }

    /// Score against `catalog` instead of the current one.
    #[must_use]
    pub fn with_catalog(mut self, catalog: FieldCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Options in effect.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Catalog whose fields are scored.
    pub fn catalog(&self) -> FieldCatalog {
        self.catalog
    }

    /// Learned mappings consulted before scoring.
    pub fn learned(&self) -> &LearnedMappingStore {
        &self.learned
    }

    /// Suggestions for every column, in column order.
    ///
    /// Always returns exactly one suggestion per sample; an empty slice
    /// yields an empty result.
    pub fn suggest(&self, samples: &[ColumnSample]) -> Vec<MappingSuggestion> {
        let span = info_span!("suggest", columns = samples.len());
        let _guard = span.enter();
        samples.iter().map(|s| self.suggest_column(s)).collect()
    }

    /// Suggestion for a single column.
    ///
    /// # Resolution order
    ///
    /// 1. A learned mapping for the exact header whose confidence reaches
    ///    [`EngineOptions::min_confidence`] is returned with
    ///    [`SuggestionSource::Learned`]; no scoring happens.
    /// 2. Otherwise the first [`EngineOptions::sample_size`] values are
    ///    scored against every catalog field. Only a strictly higher
    ///    confidence replaces the running best, so on ties the field that
    ///    comes first in the catalog wins.
    /// 3. A best confidence under the threshold yields
    ///    [`MappingTarget::Unmapped`], still carrying that confidence.
    pub fn suggest_column(&self, sample: &ColumnSample) -> MappingSuggestion {
        if let Some(learned) = self.learned.lookup(&sample.header) {
            let confidence = learned.confidence();
            if confidence >= self.options.min_confidence {
                debug!(
                    header = %sample.header,
                    target = %learned.target_field,
                    confidence,
                    "learned mapping"
                );
                return MappingSuggestion {
                    header: sample.header.clone(),
                    target: MappingTarget::Field(learned.target_field),
                    confidence,
                    source: SuggestionSource::Learned,
                };
            }
        }

        let bounded = self.bounded(sample);
        let mut best: Option<FieldScore> = None;
        for field in self.catalog.fields() {
            let score = score_field(&bounded, *field);
            if best.as_ref().is_none_or(|b| score.confidence > b.confidence) {
                best = Some(score);
            }
        }

        let (target, confidence) = match best {
            Some(best) if best.confidence >= self.options.min_confidence => {
                (MappingTarget::Field(best.field), best.confidence)
            }
            Some(best) => (MappingTarget::Unmapped, best.confidence),
            None => (MappingTarget::Unmapped, 0.0),
        };
        debug!(header = %sample.header, %target, confidence, "scored mapping");
        MappingSuggestion {
            header: sample.header.clone(),
            target,
            confidence,
            source: SuggestionSource::Scored,
        }
    }

    /// Every catalog field scored against `sample`, best first.
    ///
    /// Learned mappings are not consulted. The sort is stable, so fields
    /// with equal confidence keep catalog order and the first entry agrees
    /// with what [`Self::suggest_column`] would score.
    pub fn rank(&self, sample: &ColumnSample) -> Vec<FieldScore> {
        let bounded = self.bounded(sample);
        let mut scores: Vec<FieldScore> = self
            .catalog
            .fields()
            .iter()
            .map(|field| score_field(&bounded, *field))
            .collect();
        scores.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
        scores
    }

    fn bounded(&self, sample: &ColumnSample) -> ColumnSample {
        ColumnSample {
            header: sample.header.clone(),
            values: sample
                .values
                .iter()
                .take(self.options.sample_size)
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryMappingRepository;

    fn engine() -> SuggestionEngine {
        let store = LearnedMappingStore::load(Arc::new(MemoryMappingRepository::new())).unwrap();
        SuggestionEngine::new(Arc::new(store), EngineOptions::default())
    }

    #[test]
    fn test_sample_is_bounded() {
        let engine = SuggestionEngine::new(
            engine().learned.clone(),
            EngineOptions::default().with_sample_size(2),
        );
        // Only the first two values are sampled; the rest would break integer parsing.
        let sample = ColumnSample::new(
            "impact speed",
            vec!["1".into(), "2".into(), "a".into(), "b".into(), "c".into()],
        );
        let ranked = engine.rank(&sample);
        let impact = ranked
            .iter()
            .find(|s| s.field == roster_model::TargetField::ImpactSpeed)
            .unwrap();
        assert!((impact.type_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rank_is_sorted() {
        let sample = ColumnSample::new("mood", vec!["гнев".into()]);
        let ranked = engine().rank(&sample);
        assert_eq!(ranked.len(), 12);
        assert!(ranked.windows(2).all(|w| w[0].confidence >= w[1].confidence));
        assert_eq!(ranked[0].field, roster_model::TargetField::Mood);
    }
}
