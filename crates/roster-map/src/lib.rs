//! Adaptive header-to-field mapping.
//!
//! Suggestions combine three signals per target field: name similarity,
//! type compatibility of sampled values, and enum vocabulary matches.
//! Confirmed choices are learned and short-circuit scoring next time.

pub mod compat;
pub mod engine;
pub mod error;
pub mod learned;
pub mod patterns;
pub mod repository;
pub mod score;
pub mod utils;
pub mod weights;

pub use compat::{type_compatibility, value_compatibility};
pub use engine::{DEFAULT_MIN_CONFIDENCE, DEFAULT_SAMPLE_SIZE, EngineOptions, SuggestionEngine};
pub use error::{MapError, Result};
pub use learned::LearnedMappingStore;
pub use repository::{MappingRepository, MemoryMappingRepository};
pub use score::{FieldScore, name_similarity, score_field};
pub use utils::normalize_header;
pub use weights::{Weights, blend};
