//! The target entity and its in-progress draft.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::{FieldValue, TargetField};
use crate::enums::{Mood, WeaponType};
use crate::error::{ModelError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f32,
    pub y: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    pub name: String,
    pub cool: bool,
}

/// A fully validated record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanRecord {
    pub name: String,
    pub coordinates: Coordinates,
    pub creation_date: NaiveDate,
    pub real_hero: bool,
    pub has_toothpick: bool,
    pub car: Option<Car>,
    pub mood: Option<Mood>,
    pub impact_speed: i64,
    pub soundtrack_name: String,
    pub minutes_of_waiting: f32,
    pub weapon_type: Option<WeaponType>,
}

impl HumanRecord {
    /// Field value rendered as text, for identity keys.
    pub fn identity_value(&self, field: TargetField) -> Option<String> {
        match field {
            TargetField::Name => Some(self.name.clone()),
            TargetField::SoundtrackName => Some(self.soundtrack_name.clone()),
            TargetField::CarName => self.car.as_ref().map(|car| car.name.clone()),
            TargetField::RealHero => Some(self.real_hero.to_string()),
            TargetField::HasToothpick => Some(self.has_toothpick.to_string()),
            TargetField::CarCool => self.car.as_ref().map(|car| car.cool.to_string()),
            TargetField::Mood => self.mood.as_ref().map(ToString::to_string),
            TargetField::WeaponType => self.weapon_type.as_ref().map(ToString::to_string),
            TargetField::ImpactSpeed => Some(self.impact_speed.to_string()),
            TargetField::MinutesOfWaiting => Some(self.minutes_of_waiting.to_string()),
            TargetField::CoordinatesX => Some(self.coordinates.x.to_string()),
            TargetField::CoordinatesY => Some(self.coordinates.y.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A record as held by the persistence store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredHuman {
    pub id: RecordId,
    #[serde(flatten)]
    pub human: HumanRecord,
}

/// Record under construction from one data row.
///
/// Every field is optional until the draft is checked against the
/// record's constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HumanDraft {
    pub name: Option<String>,
    pub real_hero: Option<bool>,
    pub has_toothpick: Option<bool>,
    pub mood: Option<Mood>,
    pub impact_speed: Option<i64>,
    pub soundtrack_name: Option<String>,
    pub minutes_of_waiting: Option<f64>,
    pub weapon_type: Option<WeaponType>,
    pub coordinates_x: Option<f64>,
    pub coordinates_y: Option<i64>,
    pub car_name: Option<String>,
    pub car_cool: Option<bool>,
}

impl HumanDraft {
    /// True when any `car.*` cell was supplied.
    pub fn has_car_data(&self) -> bool {
        self.car_name.is_some() || self.car_cool.is_some()
    }

    /// Stores a coerced value. The value must match the field's kind.
    pub fn set(&mut self, field: TargetField, value: FieldValue) -> Result<()> {
        match (field, value) {
            (TargetField::Name, FieldValue::Text(v)) => self.name = Some(v),
            (TargetField::SoundtrackName, FieldValue::Text(v)) => self.soundtrack_name = Some(v),
            (TargetField::CarName, FieldValue::Text(v)) => self.car_name = Some(v),
            (TargetField::RealHero, FieldValue::Boolean(v)) => self.real_hero = Some(v),
            (TargetField::HasToothpick, FieldValue::Boolean(v)) => self.has_toothpick = Some(v),
            (TargetField::CarCool, FieldValue::Boolean(v)) => self.car_cool = Some(v),
            (TargetField::ImpactSpeed, FieldValue::Integer(v)) => self.impact_speed = Some(v),
            (TargetField::CoordinatesY, FieldValue::Integer(v)) => self.coordinates_y = Some(v),
            (TargetField::MinutesOfWaiting, FieldValue::Float(v)) => {
                self.minutes_of_waiting = Some(v);
            }
            (TargetField::CoordinatesX, FieldValue::Float(v)) => self.coordinates_x = Some(v),
            (TargetField::Mood, FieldValue::Mood(v)) => self.mood = Some(v),
            (TargetField::WeaponType, FieldValue::Weapon(v)) => self.weapon_type = Some(v),
            (field, value) => {
                return Err(ModelError::InvalidValue {
                    value: format!("{value:?}"),
                    expected: field.kind().label(),
                });
            }
        }
        Ok(())
    }

    /// Coerces `raw` for `field` and stores it.
    pub fn set_raw(&mut self, field: TargetField, raw: &str) -> Result<()> {
        let value = field.coerce(raw)?;
        self.set(field, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_tracks_car_cells() {
        let mut draft = HumanDraft::default();
        assert!(!draft.has_car_data());
        draft.set_raw(TargetField::CarCool, "нет").unwrap();
        assert!(draft.has_car_data());
        assert_eq!(draft.car_cool, Some(false));
    }

    #[test]
    fn test_draft_rejects_mismatched_value() {
        let mut draft = HumanDraft::default();
        let err = draft
            .set(TargetField::ImpactSpeed, FieldValue::Text("fast".into()))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidValue { expected: "integer", .. }));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = StoredHuman {
            id: RecordId(1),
            human: HumanRecord {
                name: "Ivan".into(),
                coordinates: Coordinates { x: 1.5, y: -3 },
                creation_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                real_hero: true,
                has_toothpick: false,
                car: None,
                mood: Some(Mood::Gloom),
                impact_speed: 10,
                soundtrack_name: "Nightcall".into(),
                minutes_of_waiting: 0.0,
                weapon_type: None,
            },
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["soundtrackName"], "Nightcall");
        assert_eq!(json["mood"], "GLOOM");
    }
}
