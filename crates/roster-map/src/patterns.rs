//! Static synonym table for target fields.

use std::collections::HashMap;
use std::sync::LazyLock;

use roster_model::TargetField;

use crate::utils::normalize_header;

const RAW_SYNONYMS: &[(TargetField, &[&str])] = &[
    (
        TargetField::Name,
        &[
            "name", "full name", "fullname", "person", "human", "nickname", "имя", "фио",
            "человек", "водитель", "персонаж",
        ],
    ),
    (
        TargetField::RealHero,
        &["real hero", "hero", "is hero", "герой", "настоящий герой", "реальный герой"],
    ),
    (
        TargetField::HasToothpick,
        &["toothpick", "has toothpick", "зубочистка", "с зубочисткой", "есть зубочистка"],
    ),
    (
        TargetField::Mood,
        &["mood", "emotion", "feeling", "настроение", "эмоция", "состояние"],
    ),
    (
        TargetField::ImpactSpeed,
        &["impact speed", "speed", "velocity", "impact", "скорость", "скорость удара"],
    ),
    (
        TargetField::SoundtrackName,
        &["soundtrack", "music", "song", "track", "саундтрек", "музыка", "песня", "трек"],
    ),
    (
        TargetField::MinutesOfWaiting,
        &[
            "minutes of waiting", "waiting", "wait time", "minutes", "ожидание",
            "время ожидания", "минуты ожидания",
        ],
    ),
    (
        TargetField::WeaponType,
        &["weapon", "weapon type", "arms", "оружие", "тип оружия"],
    ),
    (
        TargetField::CoordinatesX,
        &["x", "coord x", "x coordinate", "pos x", "координата x", "долгота"],
    ),
    (
        TargetField::CoordinatesY,
        &["y", "coord y", "y coordinate", "pos y", "координата y", "широта"],
    ),
    (
        TargetField::CarName,
        &["car", "car name", "vehicle", "машина", "автомобиль", "авто", "марка машины"],
    ),
    (
        TargetField::CarCool,
        &["car cool", "cool car", "cool", "крутая машина", "крутость", "крутой"],
    ),
];

/// Normalized synonyms per field, built once.
static SYNONYMS: LazyLock<HashMap<TargetField, Vec<String>>> = LazyLock::new(|| {
    RAW_SYNONYMS
        .iter()
        .map(|(field, words)| {
            let mut normalized: Vec<String> = words
                .iter()
                .map(|w| normalize_header(w))
                .filter(|w| !w.is_empty())
                .collect();
            normalized.dedup();
            (*field, normalized)
        })
        .collect()
});

/// Normalized synonyms for `field`; empty when none are declared.
pub fn synonyms_for(field: TargetField) -> &'static [String] {
    SYNONYMS.get(&field).map_or(&[], Vec::as_slice)
}
