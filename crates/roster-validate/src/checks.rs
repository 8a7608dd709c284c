//! Assembly of a draft into a record, enforcing field constraints.

use chrono::NaiveDate;
use roster_model::{Car, Coordinates, HumanDraft, HumanRecord, TargetField};

use crate::issue::{Issue, Violations};

pub const MAX_IMPACT_SPEED: i64 = 115;
pub const MAX_COORDINATE_X: i64 = 147;
pub const MIN_COORDINATE_Y: i64 = -772;

fn required_text(value: Option<&String>, field: TargetField, issues: &mut Vec<Issue>) -> String {
    match value.map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(v) => v.to_string(),
        None => {
            issues.push(Issue::Blank { field });
            String::new()
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn narrow(value: f64) -> f32 {
    value as f32
}

fn to_f32(value: f64, field: TargetField, issues: &mut Vec<Issue>) -> f32 {
    let narrowed = narrow(value);
    if !narrowed.is_finite() {
        issues.push(Issue::OutOfRange { field });
    }
    narrowed
}

/// Checks every constraint and builds the record, or returns all
/// violations at once.
pub fn validate(draft: &HumanDraft, creation_date: NaiveDate) -> Result<HumanRecord, Violations> {
    let mut issues = Vec::new();

    let name = required_text(draft.name.as_ref(), TargetField::Name, &mut issues);

    // The stored coordinate is an f32, so the bound applies after narrowing.
    let x = match draft.coordinates_x {
        Some(x) if narrow(x) > MAX_COORDINATE_X as f32 => {
            issues.push(Issue::AboveMax {
                field: TargetField::CoordinatesX,
                max: MAX_COORDINATE_X,
            });
            0.0
        }
        Some(x) => to_f32(x, TargetField::CoordinatesX, &mut issues),
        None => {
            issues.push(Issue::Missing {
                field: TargetField::CoordinatesX,
            });
            0.0
        }
    };
    let y = draft.coordinates_y.unwrap_or(0);
    if y < MIN_COORDINATE_Y {
        issues.push(Issue::BelowMin {
            field: TargetField::CoordinatesY,
            min: MIN_COORDINATE_Y,
        });
    }

    if draft.real_hero.is_none() {
        issues.push(Issue::Missing {
            field: TargetField::RealHero,
        });
    }

    let impact_speed = match draft.impact_speed {
        Some(speed) if speed > MAX_IMPACT_SPEED => {
            issues.push(Issue::AboveMax {
                field: TargetField::ImpactSpeed,
                max: MAX_IMPACT_SPEED,
            });
            speed
        }
        Some(speed) => speed,
        None => {
            issues.push(Issue::Missing {
                field: TargetField::ImpactSpeed,
            });
            0
        }
    };

    let soundtrack_name = required_text(
        draft.soundtrack_name.as_ref(),
        TargetField::SoundtrackName,
        &mut issues,
    );

    let minutes_of_waiting = draft.minutes_of_waiting.map_or(0.0, |minutes| {
        to_f32(minutes, TargetField::MinutesOfWaiting, &mut issues)
    });

    let car = if draft.has_car_data() {
        if draft.car_name.is_none() {
            issues.push(Issue::Missing {
                field: TargetField::CarName,
            });
        }
        if draft.car_cool.is_none() {
            issues.push(Issue::Missing {
                field: TargetField::CarCool,
            });
        }
        Some(Car {
            name: draft.car_name.clone().unwrap_or_default(),
            cool: draft.car_cool.unwrap_or_default(),
        })
    } else {
        None
    };

    if !issues.is_empty() {
        return Err(Violations(issues));
    }

    Ok(HumanRecord {
        name,
        coordinates: Coordinates { x, y },
        creation_date,
        real_hero: draft.real_hero.unwrap_or_default(),
        has_toothpick: draft.has_toothpick.unwrap_or(false),
        car,
        mood: draft.mood,
        impact_speed,
        soundtrack_name,
        minutes_of_waiting,
        weapon_type: draft.weapon_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }

    fn complete() -> HumanDraft {
        HumanDraft {
            name: Some("Ivan".into()),
            real_hero: Some(true),
            impact_speed: Some(115),
            soundtrack_name: Some("Track".into()),
            coordinates_x: Some(147.0),
            coordinates_y: Some(MIN_COORDINATE_Y),
            ..HumanDraft::default()
        }
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let record = validate(&complete(), date()).unwrap();
        assert_eq!(record.impact_speed, 115);
        assert_eq!(record.coordinates.y, -772);
        assert!(record.car.is_none());
        assert!(!record.has_toothpick);
    }

    #[test]
    fn test_x_bound_applies_to_stored_precision() {
        let mut draft = complete();
        draft.coordinates_x = Some(147.000_000_1);
        let record = validate(&draft, date()).unwrap();
        assert_eq!(record.coordinates.x, 147.0);

        draft.coordinates_x = Some(147.001);
        let err = validate(&draft, date()).unwrap_err();
        assert_eq!(
            err.issues(),
            &[Issue::AboveMax {
                field: TargetField::CoordinatesX,
                max: MAX_COORDINATE_X
            }]
        );
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let mut draft = complete();
        draft.name = Some("   ".into());
        let err = validate(&draft, date()).unwrap_err();
        assert_eq!(err.issues(), &[Issue::Blank { field: TargetField::Name }]);
    }

    #[test]
    fn test_partial_car_requires_both_cells() {
        let mut draft = complete();
        draft.car_name = Some("Lada".into());
        let err = validate(&draft, date()).unwrap_err();
        assert_eq!(err.issues(), &[Issue::Missing { field: TargetField::CarCool }]);
    }

    #[test]
    fn test_huge_float_does_not_fit() {
        let mut draft = complete();
        draft.minutes_of_waiting = Some(1e300);
        let err = validate(&draft, date()).unwrap_err();
        assert_eq!(
            err.issues(),
            &[Issue::OutOfRange { field: TargetField::MinutesOfWaiting }]
        );
    }
}
