//! Type and value compatibility of sampled column values.
//!
//! Both scores fail soft: a value that does not parse only lowers the
//! fraction. A sample with no non-blank values carries no evidence and
//! scores 0.
//!
//! Type parsing matches what the row parser accepts: any value is text,
//! and an enum value is a constant name or one of its keywords. Text
//! fields therefore compete on name evidence alone.

use roster_model::tokens::{parse_bool_token, parse_float, parse_integer};
use roster_model::{ColumnSample, EnumKind, FieldKind, TargetField};

/// Base fraction above which near-total agreement is rewarded.
const TYPE_BONUS_THRESHOLD: f64 = 0.8;
const TYPE_BONUS: f64 = 0.2;

fn parses_as(kind: FieldKind, value: &str) -> bool {
    match kind {
        FieldKind::Text => true,
        FieldKind::Integer => parse_integer(value).is_some(),
        FieldKind::Float => parse_float(value).is_some(),
        FieldKind::Boolean => parse_bool_token(value).is_some(),
        FieldKind::Enum(kind) => kind.matches_token(value),
    }
}

fn fraction<F>(sample: &ColumnSample, mut accept: F) -> f64
where
    F: FnMut(&str) -> bool,
{
    let mut total = 0usize;
    let mut hits = 0usize;
    for value in sample.non_blank() {
        total += 1;
        if accept(value) {
            hits += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    hits as f64 / total as f64
}

/// Fraction of non-blank values parseable as the field's type, with a
/// +0.2 bonus (capped at 1.0) once the fraction exceeds 0.8.
pub fn type_compatibility(sample: &ColumnSample, field: TargetField) -> f64 {
    let kind = field.kind();
    let base = fraction(sample, |value| parses_as(kind, value));
    if base > TYPE_BONUS_THRESHOLD {
        (base + TYPE_BONUS).min(1.0)
    } else {
        base
    }
}

/// Fraction of non-blank values naming an enum constant or one of its
/// keywords. Non-enum fields always score 0.
pub fn value_compatibility(sample: &ColumnSample, field: TargetField) -> f64 {
    match field.kind() {
        FieldKind::Enum(kind) => enum_match_fraction(sample, kind),
        _ => 0.0,
    }
}

fn enum_match_fraction(sample: &ColumnSample, kind: EnumKind) -> f64 {
    fraction(sample, |value| kind.matches_token(value))
}
