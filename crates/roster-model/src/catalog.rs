//! The fixed universe of target fields.
//!
//! The catalog is declared data rather than derived from the record type:
//! a new schema version means a new [`FieldCatalog`] constant, never a
//! runtime introspection step.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::enums::{Mood, Vocabulary, WeaponType};
use crate::error::ModelError;
use crate::tokens::{parse_bool_token, parse_float, parse_integer};

/// Identifier of a mappable field on the target record.
///
/// Nested sub-object fields use dotted paths (`coordinates.x`, `car.name`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TargetField {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "realHero")]
    RealHero,
    #[serde(rename = "hasToothpick")]
    HasToothpick,
    #[serde(rename = "mood")]
    Mood,
    #[serde(rename = "impactSpeed")]
    ImpactSpeed,
    #[serde(rename = "soundtrackName")]
    SoundtrackName,
    #[serde(rename = "minutesOfWaiting")]
    MinutesOfWaiting,
    #[serde(rename = "weaponType")]
    WeaponType,
    #[serde(rename = "coordinates.x")]
    CoordinatesX,
    #[serde(rename = "coordinates.y")]
    CoordinatesY,
    #[serde(rename = "car.name")]
    CarName,
    #[serde(rename = "car.cool")]
    CarCool,
}

/// Enum-valued field vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumKind {
    Mood,
    WeaponType,
}

impl EnumKind {
    /// True when `raw` is a constant name or a localized keyword.
    pub fn matches_token(&self, raw: &str) -> bool {
        match self {
            EnumKind::Mood => Mood::from_token(raw).is_some(),
            EnumKind::WeaponType => WeaponType::from_token(raw).is_some(),
        }
    }
}

/// Primitive kind of a target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Boolean,
    Enum(EnumKind),
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Boolean => "boolean",
            FieldKind::Enum(EnumKind::Mood) => "mood",
            FieldKind::Enum(EnumKind::WeaponType) => "weapon type",
        }
    }
}

impl TargetField {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TargetField::Name => "name",
            TargetField::RealHero => "realHero",
            TargetField::HasToothpick => "hasToothpick",
            TargetField::Mood => "mood",
            TargetField::ImpactSpeed => "impactSpeed",
            TargetField::SoundtrackName => "soundtrackName",
            TargetField::MinutesOfWaiting => "minutesOfWaiting",
            TargetField::WeaponType => "weaponType",
            TargetField::CoordinatesX => "coordinates.x",
            TargetField::CoordinatesY => "coordinates.y",
            TargetField::CarName => "car.name",
            TargetField::CarCool => "car.cool",
        }
    }

    /// Field name without its nested-object prefix (`coordinates.x` -> `x`).
    pub fn leaf_name(&self) -> &'static str {
        let path = self.as_str();
        path.rsplit_once('.').map_or(path, |(_, leaf)| leaf)
    }

    pub const fn kind(&self) -> FieldKind {
        match self {
            TargetField::Name | TargetField::SoundtrackName | TargetField::CarName => {
                FieldKind::Text
            }
            TargetField::RealHero | TargetField::HasToothpick | TargetField::CarCool => {
                FieldKind::Boolean
            }
            TargetField::ImpactSpeed | TargetField::CoordinatesY => FieldKind::Integer,
            TargetField::MinutesOfWaiting | TargetField::CoordinatesX => FieldKind::Float,
            TargetField::Mood => FieldKind::Enum(EnumKind::Mood),
            TargetField::WeaponType => FieldKind::Enum(EnumKind::WeaponType),
        }
    }

    /// Coerces a raw (non-blank) cell into this field's type.
    pub fn coerce(&self, raw: &str) -> Result<FieldValue, ModelError> {
        let invalid = || ModelError::InvalidValue {
            value: raw.to_string(),
            expected: self.kind().label(),
        };
        let value = match self.kind() {
            FieldKind::Text => FieldValue::Text(raw.trim().to_string()),
            FieldKind::Integer => FieldValue::Integer(parse_integer(raw).ok_or_else(invalid)?),
            FieldKind::Float => FieldValue::Float(parse_float(raw).ok_or_else(invalid)?),
            FieldKind::Boolean => FieldValue::Boolean(parse_bool_token(raw).ok_or_else(invalid)?),
            FieldKind::Enum(EnumKind::Mood) => FieldValue::Mood(raw.parse()?),
            FieldKind::Enum(EnumKind::WeaponType) => FieldValue::Weapon(raw.parse()?),
        };
        Ok(value)
    }
}

impl fmt::Display for TargetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        FieldCatalog::CURRENT
            .fields()
            .iter()
            .find(|f| f.as_str() == trimmed)
            .copied()
            .ok_or_else(|| ModelError::UnknownField(trimmed.to_string()))
    }
}

/// A typed cell value ready to be applied to a draft record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Mood(Mood),
    Weapon(WeaponType),
}

/// Ordered, versioned set of target fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCatalog {
    version: u32,
    fields: &'static [TargetField],
}

impl FieldCatalog {
    pub const V1: FieldCatalog = FieldCatalog {
        version: 1,
        fields: &[
            TargetField::Name,
            TargetField::RealHero,
            TargetField::HasToothpick,
            TargetField::Mood,
            TargetField::ImpactSpeed,
            TargetField::SoundtrackName,
            TargetField::MinutesOfWaiting,
            TargetField::WeaponType,
            TargetField::CoordinatesX,
            TargetField::CoordinatesY,
            TargetField::CarName,
            TargetField::CarCool,
        ],
    };

    /// Catalog used by this build.
    pub const CURRENT: FieldCatalog = FieldCatalog::V1;

    pub const fn version(&self) -> u32 {
        self.version
    }

    pub const fn fields(&self) -> &'static [TargetField] {
        self.fields
    }

    pub fn contains(&self, field: TargetField) -> bool {
        self.fields.contains(&field)
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::CURRENT
    }
}

/// Sentinel spelling for "no mapping chosen".
pub const UNMAPPED: &str = "none";

/// Destination of a source header: a catalog field or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MappingTarget {
    Field(TargetField),
    Unmapped,
}

impl MappingTarget {
    pub fn field(&self) -> Option<TargetField> {
        match self {
            MappingTarget::Field(field) => Some(*field),
            MappingTarget::Unmapped => None,
        }
    }

    pub fn is_unmapped(&self) -> bool {
        matches!(self, MappingTarget::Unmapped)
    }
}

impl From<TargetField> for MappingTarget {
    fn from(field: TargetField) -> Self {
        MappingTarget::Field(field)
    }
}

impl fmt::Display for MappingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingTarget::Field(field) => f.write_str(field.as_str()),
            MappingTarget::Unmapped => f.write_str(UNMAPPED),
        }
    }
}

impl FromStr for MappingTarget {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNMAPPED) {
            return Ok(MappingTarget::Unmapped);
        }
        trimmed.parse().map(MappingTarget::Field)
    }
}

impl TryFrom<String> for MappingTarget {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MappingTarget> for String {
    fn from(value: MappingTarget) -> Self {
        value.to_string()
    }
}
