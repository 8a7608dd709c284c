//! Scoring of one column against one target field.
//!
//! Name similarity is Jaro-Winkler over normalized strings, taken as the
//! maximum across the cleaned field name and every synonym of the field.

use rapidfuzz::distance::jaro_winkler::similarity as jaro_similarity;
use roster_model::{ColumnSample, TargetField};
use serde::Serialize;

use crate::compat::{type_compatibility, value_compatibility};
use crate::patterns::synonyms_for;
use crate::utils::{clean_target_name, normalize_header};
use crate::weights::{Weights, blend};

/// Name similarity of `header` to `field` in `[0, 1]`.
///
/// An empty header, or one made only of generic words, scores 0.
pub fn name_similarity(header: &str, field: TargetField) -> f64 {
    let normalized = normalize_header(header);
    if normalized.is_empty() {
        return 0.0;
    }
    let target = clean_target_name(field);
    std::iter::once(target.as_str())
        .chain(synonyms_for(field).iter().map(String::as_str))
        .map(|candidate| jaro_similarity(normalized.chars(), candidate.chars()))
        .fold(0.0, f64::max)
}

/// Full score breakdown of a column against one field.
///
/// Serialized as-is by `roster suggest --explain`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldScore {
    /// Field the column was scored against.
    pub field: TargetField,
    /// Best Jaro-Winkler similarity of the header to the field name or a
    /// synonym, in `[0, 1]`.
    pub name_score: f64,
    /// Fraction of sampled values that parse as the field's type, with the
    /// near-total agreement bonus applied.
    pub type_score: f64,
    /// Fraction of sampled values naming an enum constant or keyword.
    /// Always 0 for non-enum fields.
    pub value_score: f64,
    /// Weights picked from the type and value scores.
    pub weights: Weights,
    /// Weighted sum of the three scores, clamped to `[0, 1]`.
    pub confidence: f64,
}

impl FieldScore {
    /// Human-readable explanation of the score.
    ///
    /// Each component is shown as a percentage next to its weight, e.g.
    /// `name 100% x 0.2; type 100% x 0.7; value 0% x 0.1`.
    pub fn explain(&self) -> String {
        format!(
            "name {:.0}% x {:.1}; type {:.0}% x {:.1}; value {:.0}% x {:.1}",
            self.name_score * 100.0,
            self.weights.name,
            self.type_score * 100.0,
            self.weights.type_,
            self.value_score * 100.0,
            self.weights.value,
        )
    }
}

/// Scores `sample` against `field`.
///
/// The sample is used as given; callers bound it first.
pub fn score_field(sample: &ColumnSample, field: TargetField) -> FieldScore {
    let name_score = name_similarity(&sample.header, field);
    let type_score = type_compatibility(sample, field);
    let value_score = value_compatibility(sample, field);
    let (weights, confidence) = blend(name_score, type_score, value_score);
    FieldScore {
        field,
        name_score,
        type_score,
        value_score,
        weights,
        confidence,
    }
}
