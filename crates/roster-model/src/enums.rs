//! Enumerated record attributes and their localized vocabularies.
//!
//! Source files rarely spell enum constants the way the record type does.
//! Each enum therefore carries a keyword association table (English and
//! Russian) so that a cell reading "ярость" or "anger" still resolves to
//! [`Mood::Rage`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Shared lookup behavior for enums with a keyword vocabulary.
pub trait Vocabulary: Sized + Copy + 'static {
    /// Every constant, in declaration order.
    const ALL: &'static [Self];

    /// Human-readable kind used in error messages.
    const KIND: &'static str;

    /// Canonical constant name (upper case).
    fn as_str(&self) -> &'static str;

    /// Lower-cased keywords that imply this constant.
    fn keywords(&self) -> &'static [&'static str];

    /// Exact constant-name match, case-insensitive.
    fn from_name(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(trimmed))
            .copied()
    }

    /// Match through the keyword association table only.
    fn from_keyword(value: &str) -> Option<Self> {
        let lowered = value.trim().to_lowercase();
        if lowered.is_empty() {
            return None;
        }
        Self::ALL
            .iter()
            .find(|v| v.keywords().contains(&lowered.as_str()))
            .copied()
    }

    /// Constant name first, then keyword association.
    fn from_token(value: &str) -> Option<Self> {
        Self::from_name(value).or_else(|| Self::from_keyword(value))
    }
}

/// Emotional state of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mood {
    Sadness,
    Longing,
    Gloom,
    Apathy,
    Rage,
}

impl Vocabulary for Mood {
    const ALL: &'static [Self] = &[
        Mood::Sadness,
        Mood::Longing,
        Mood::Gloom,
        Mood::Apathy,
        Mood::Rage,
    ];
    const KIND: &'static str = "mood";

    fn as_str(&self) -> &'static str {
        match self {
            Mood::Sadness => "SADNESS",
            Mood::Longing => "LONGING",
            Mood::Gloom => "GLOOM",
            Mood::Apathy => "APATHY",
            Mood::Rage => "RAGE",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Mood::Sadness => &["sad", "sorrow", "грусть", "печаль", "грустный"],
            Mood::Longing => &["longing", "yearning", "тоска", "скука"],
            Mood::Gloom => &["gloomy", "мрак", "уныние", "мрачный"],
            Mood::Apathy => &["apathetic", "indifference", "апатия", "безразличие"],
            Mood::Rage => &[
                "anger", "angry", "fury", "гнев", "ярость", "злость", "злой",
            ],
        }
    }
}

/// Weapon carried by a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeaponType {
    Hammer,
    Axe,
    Shotgun,
    Rifle,
    Knife,
}

impl Vocabulary for WeaponType {
    const ALL: &'static [Self] = &[
        WeaponType::Hammer,
        WeaponType::Axe,
        WeaponType::Shotgun,
        WeaponType::Rifle,
        WeaponType::Knife,
    ];
    const KIND: &'static str = "weapon type";

    fn as_str(&self) -> &'static str {
        match self {
            WeaponType::Hammer => "HAMMER",
            WeaponType::Axe => "AXE",
            WeaponType::Shotgun => "SHOTGUN",
            WeaponType::Rifle => "RIFLE",
            WeaponType::Knife => "KNIFE",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            WeaponType::Hammer => &["mallet", "молоток", "молот", "кувалда"],
            WeaponType::Axe => &["hatchet", "топор", "секира"],
            WeaponType::Shotgun => &["дробовик", "обрез"],
            WeaponType::Rifle => &["винтовка", "ружье", "ружьё", "карабин"],
            WeaponType::Knife => &["blade", "dagger", "нож", "кинжал"],
        }
    }
}

macro_rules! vocabulary_traits {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ModelError;

            /// Accepts the constant name or any localized keyword.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as Vocabulary>::from_token(s).ok_or_else(|| ModelError::InvalidValue {
                    value: s.to_string(),
                    expected: <$ty as Vocabulary>::KIND,
                })
            }
        }
    };
}

vocabulary_traits!(Mood);
vocabulary_traits!(WeaponType);
