//! Composite identity keys and duplicate detection.

use std::collections::HashMap;
use std::fmt;

use roster_model::{HumanRecord, RecordId, TargetField};
use serde::{Deserialize, Serialize};

use crate::error::{ConflictScope, ImportError, Result};
use crate::store::RecordTransaction;

/// Fields whose combined, case-insensitive values identify a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TargetField>", into = "Vec<TargetField>")]
pub struct UniquenessPolicy {
    fields: Vec<TargetField>,
}

impl Default for UniquenessPolicy {
    fn default() -> Self {
        Self {
            fields: vec![TargetField::Name, TargetField::SoundtrackName],
        }
    }
}

impl UniquenessPolicy {
    /// Policy over `fields`; falls back to the default when empty.
    pub fn new(fields: Vec<TargetField>) -> Self {
        if fields.is_empty() {
            return Self::default();
        }
        Self { fields }
    }

    pub fn fields(&self) -> &[TargetField] {
        &self.fields
    }

    pub fn key(&self, record: &HumanRecord) -> IdentityKey {
        let parts = self
            .fields
            .iter()
            .map(|field| {
                let value = record.identity_value(*field).unwrap_or_default();
                (*field, value.trim().to_lowercase())
            })
            .collect();
        IdentityKey(parts)
    }
}

impl From<Vec<TargetField>> for UniquenessPolicy {
    fn from(fields: Vec<TargetField>) -> Self {
        Self::new(fields)
    }
}

impl From<UniquenessPolicy> for Vec<TargetField> {
    fn from(policy: UniquenessPolicy) -> Self {
        policy.fields
    }
}

/// Lower-cased identity values paired with their fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey(Vec<(TargetField, String)>);

impl IdentityKey {
    pub fn value_of(&self, field: TargetField) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn parts(&self) -> &[(TargetField, String)] {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (idx, (field, value)) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}='{value}'")?;
        }
        f.write_str(")")
    }
}

/// A parsed record with its 1-based file row.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub row: usize,
    pub record: HumanRecord,
}

/// Fails on the first row whose identity repeats an earlier row.
pub fn check_batch(policy: &UniquenessPolicy, rows: &[ParsedRow]) -> Result<()> {
    let mut seen: HashMap<IdentityKey, usize> = HashMap::with_capacity(rows.len());
    for parsed in rows {
        let key = policy.key(&parsed.record);
        if let Some(first_row) = seen.get(&key) {
            return Err(ImportError::UniquenessConflict {
                identity: key,
                scope: ConflictScope::Batch {
                    row: parsed.row,
                    first_row: *first_row,
                },
            });
        }
        seen.insert(key, parsed.row);
    }
    Ok(())
}

/// Fails on the first row whose identity already exists in the store.
pub fn check_store<T: RecordTransaction>(
    tx: &T,
    policy: &UniquenessPolicy,
    rows: &[ParsedRow],
) -> Result<()> {
    for parsed in rows {
        let key = policy.key(&parsed.record);
        if tx.exists_by_identity(policy, &key)? {
            return Err(ImportError::UniquenessConflict {
                identity: key,
                scope: ConflictScope::Store { row: parsed.row },
            });
        }
    }
    Ok(())
}

/// Checks that editing record `id` into `record` keeps identities unique.
pub fn ensure_unique_for_update<T: RecordTransaction>(
    tx: &T,
    policy: &UniquenessPolicy,
    id: RecordId,
    record: &HumanRecord,
) -> Result<()> {
    let key = policy.key(record);
    if tx.exists_by_identity_excluding(policy, &key, id)? {
        return Err(ImportError::UniquenessConflict {
            identity: key,
            scope: ConflictScope::Update { id },
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use roster_model::Coordinates;

    fn record(name: &str, soundtrack: &str) -> HumanRecord {
        HumanRecord {
            name: name.into(),
            coordinates: Coordinates { x: 0.0, y: 0 },
            creation_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            real_hero: true,
            has_toothpick: false,
            car: None,
            mood: None,
            impact_speed: 1,
            soundtrack_name: soundtrack.into(),
            minutes_of_waiting: 0.0,
            weapon_type: None,
        }
    }

    #[test]
    fn test_key_is_case_insensitive() {
        let policy = UniquenessPolicy::default();
        assert_eq!(
            policy.key(&record("Ivan", "Song")),
            policy.key(&record(" IVAN", "song "))
        );
        assert_eq!(
            policy.key(&record("Ivan", "Song")).to_string(),
            "(name='ivan', soundtrackName='song')"
        );
    }

    #[test]
    fn test_batch_duplicate_names_both_rows() {
        let rows = vec![
            ParsedRow { row: 2, record: record("Ivan", "Song") },
            ParsedRow { row: 3, record: record("Olga", "Song") },
            ParsedRow { row: 4, record: record("ivan", "SONG") },
        ];
        let err = check_batch(&UniquenessPolicy::default(), &rows).unwrap_err();
        match err {
            ImportError::UniquenessConflict { scope, .. } => {
                assert_eq!(scope, ConflictScope::Batch { row: 4, first_row: 2 });
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_policy_can_narrow_to_name() {
        let policy = UniquenessPolicy::new(vec![TargetField::Name]);
        let rows = vec![
            ParsedRow { row: 2, record: record("Ivan", "A") },
            ParsedRow { row: 3, record: record("Ivan", "B") },
        ];
        assert!(check_batch(&policy, &rows).is_err());
        assert!(check_batch(&UniquenessPolicy::default(), &rows).is_ok());
    }
}
