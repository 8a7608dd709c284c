//! Primitive cell parsers shared by scoring and row parsing.

/// Lower-cased tokens read as `true`.
pub const TRUE_TOKENS: &[&str] = &["true", "yes", "y", "1", "on", "да", "д", "истина", "правда"];

/// Lower-cased tokens read as `false`.
pub const FALSE_TOKENS: &[&str] = &["false", "no", "n", "0", "off", "нет", "н", "ложь"];

/// Parses a localized boolean token.
pub fn parse_bool_token(raw: &str) -> Option<bool> {
    let lowered = raw.trim().to_lowercase();
    if TRUE_TOKENS.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

pub fn parse_integer(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Parses a finite float. A comma is read as the decimal separator when
/// the value has no dot.
pub fn parse_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let parsed = if !trimmed.contains('.') && trimmed.matches(',').count() == 1 {
        trimmed.replace(',', ".").parse::<f64>().ok()
    } else {
        trimmed.parse::<f64>().ok()
    };
    parsed.filter(|v| v.is_finite())
}
