//! Header normalization.

use roster_model::TargetField;

/// Words that describe a column rather than its content.
const GENERIC_TOKENS: &[&str] = &[
    "field", "column", "col", "pole", "polya", "stolbets", "stolbec", "kolonka", "kolonki",
];

/// Latin approximation of a lower-case Cyrillic letter.
fn transliterate_char(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' | 'э' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' | 'і' => "i",
        'й' | 'ы' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' | 'ь' => "",
        'ю' => "yu",
        'я' => "ya",
        'є' => "ye",
        'ї' => "yi",
        _ => return None,
    };
    Some(latin)
}

/// Lower-cases and transliterates Cyrillic letters to Latin.
pub fn transliterate(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars().flat_map(char::to_lowercase) {
        match transliterate_char(c) {
            Some(latin) => out.push_str(latin),
            None => out.push(c),
        }
    }
    out
}

/// Normalizes a header for similarity scoring.
///
/// `"Поле: Имя"` becomes `"imya"`, `"Impact_Speed"` becomes `"impactspeed"`.
pub fn normalize_header(raw: &str) -> String {
    transliterate(raw)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty() && !GENERIC_TOKENS.contains(token))
        .collect()
}

/// Target field name without its nested prefix, lower-cased.
pub fn clean_target_name(field: TargetField) -> String {
    field.leaf_name().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transliterates_cyrillic() {
        assert_eq!(transliterate("Водитель"), "voditel");
        assert_eq!(transliterate("Щука"), "shchuka");
        assert_eq!(transliterate("abc"), "abc");
    }

    #[test]
    fn test_normalize_strips_generic_words() {
        assert_eq!(normalize_header("Поле: Имя"), "imya");
        assert_eq!(normalize_header("Impact_Speed"), "impactspeed");
        assert_eq!(normalize_header("name column"), "name");
        assert_eq!(normalize_header("  --  "), "");
    }

    #[test]
    fn test_clean_target_name() {
        assert_eq!(clean_target_name(TargetField::CoordinatesX), "x");
        assert_eq!(clean_target_name(TargetField::ImpactSpeed), "impactspeed");
    }
}
