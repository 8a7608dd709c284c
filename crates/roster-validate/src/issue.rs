//! Constraint violation types.
//!
//! Each variant carries only the data its message needs.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use roster_model::TargetField;

/// One violated field constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Issue {
    /// Required text field is absent or blank.
    Blank { field: TargetField },
    /// Required field is absent.
    Missing { field: TargetField },
    /// Numeric value above its inclusive maximum.
    AboveMax { field: TargetField, max: i64 },
    /// Numeric value below its inclusive minimum.
    BelowMin { field: TargetField, min: i64 },
    /// Value does not fit the record's numeric type.
    OutOfRange { field: TargetField },
}

fn label(field: TargetField) -> &'static str {
    match field {
        TargetField::Name => "Name",
        TargetField::RealHero => "Real hero field",
        TargetField::HasToothpick => "Toothpick field",
        TargetField::Mood => "Mood",
        TargetField::ImpactSpeed => "Impact speed",
        TargetField::SoundtrackName => "Soundtrack name",
        TargetField::MinutesOfWaiting => "Minutes of waiting",
        TargetField::WeaponType => "Weapon type",
        TargetField::CoordinatesX => "X coordinate",
        TargetField::CoordinatesY => "Y coordinate",
        TargetField::CarName => "Car name",
        TargetField::CarCool => "Cool field",
    }
}

impl Issue {
    pub fn field(&self) -> TargetField {
        match self {
            Self::Blank { field }
            | Self::Missing { field }
            | Self::AboveMax { field, .. }
            | Self::BelowMin { field, .. }
            | Self::OutOfRange { field } => *field,
        }
    }

    pub fn message(&self) -> String {
        let name = label(self.field());
        match self {
            Self::Blank { .. } => format!("{name} cannot be null or empty"),
            Self::Missing { .. } => format!("{name} cannot be null"),
            Self::AboveMax { max, .. } => format!("{name} cannot be greater than {max}"),
            Self::BelowMin { min, .. } => format!("{name} must be greater than {}", min - 1),
            Self::OutOfRange { .. } => format!("{name} is out of range"),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field(), self.message())
    }
}

/// All violations found on one candidate record.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", join_issues(.0))]
pub struct Violations(pub Vec<Issue>);

fn join_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Violations {
    pub fn issues(&self) -> &[Issue] {
        &self.0
    }
}
