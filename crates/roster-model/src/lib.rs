pub mod catalog;
pub mod enums;
pub mod error;
pub mod human;
pub mod job;
pub mod mapping;
pub mod tokens;

pub use catalog::{EnumKind, FieldCatalog, FieldKind, FieldValue, MappingTarget, TargetField, UNMAPPED};
pub use enums::{Mood, Vocabulary, WeaponType};
pub use error::{ModelError, Result};
pub use human::{Car, Coordinates, HumanDraft, HumanRecord, RecordId, StoredHuman};
pub use job::{ImportJob, ImportStatus, JobId};
pub use mapping::{
    ColumnSample, ConfirmedMappings, LEARNED_BASE_CONFIDENCE, LEARNED_USAGE_CAP, LearnedMapping,
    MappingSuggestion, SuggestionSource, parse_confirmed,
};
