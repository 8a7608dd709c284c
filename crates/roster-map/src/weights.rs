//! Adaptive blending of name, type and value evidence.

use serde::{Deserialize, Serialize};

const TYPE_DOMINANT_THRESHOLD: f64 = 0.9;
const VALUE_DOMINANT_THRESHOLD: f64 = 0.8;

/// Weights for the three score components. They always sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    /// Weight of the header name similarity.
    pub name: f64,
    /// Weight of the type compatibility.
    pub type_: f64,
    /// Weight of the enum value compatibility.
    pub value: f64,
}

impl Weights {
    /// Used when neither rule fires.
    pub const BASE: Weights = Weights::new(0.3, 0.5, 0.2);
    /// Used when the type score exceeds 0.9.
    pub const TYPE_DOMINANT: Weights = Weights::new(0.2, 0.7, 0.1);
    /// Used when the value score exceeds 0.8, whatever the type score.
    pub const VALUE_DOMINANT: Weights = Weights::new(0.3, 0.3, 0.4);

    const fn new(name: f64, type_: f64, value: f64) -> Self {
        Self { name, type_, value }
    }

    /// Picks weights from the type and value scores.
    ///
    /// Rules run in order and the last one that fires wins, so a strong
    /// value signal overrides a strong type signal.
    pub fn select(type_score: f64, value_score: f64) -> Self {
        let mut weights = Self::BASE;
        if type_score > TYPE_DOMINANT_THRESHOLD {
            weights = Self::TYPE_DOMINANT;
        }
        if value_score > VALUE_DOMINANT_THRESHOLD {
            weights = Self::VALUE_DOMINANT;
        }
        weights
    }

    /// Weighted sum of the three scores.
    ///
    /// Not clamped; [`blend`] clamps the result to `[0, 1]`.
    pub fn apply(&self, name_score: f64, type_score: f64, value_score: f64) -> f64 {
        self.name * name_score + self.type_ * type_score + self.value * value_score
    }
}

/// Blends the three scores with adaptively selected weights.
pub fn blend(name_score: f64, type_score: f64, value_score: f64) -> (Weights, f64) {
    let weights = Weights::select(type_score, value_score);
    let confidence = weights.apply(name_score, type_score, value_score).clamp(0.0, 1.0);
    (weights, confidence)
}
