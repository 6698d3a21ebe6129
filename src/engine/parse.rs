//! Parsing of free-text component specs ("45g", "1500mAh", "14.8V")
//!
//! Every function here degrades to 0 / `None` on malformed input. Callers
//! treat a missing number exactly like a zero contribution.

/// Parse the leading integer of a spec string, ignoring any unit suffix.
///
/// Leading whitespace is skipped and an optional sign is honoured, so
/// `"45g"` is 45, `" 120 g"` is 120 and `"-3g"` is -3. Anything without
/// leading digits yields `None`.
pub fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };

    let digits: &str = {
        let end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        &rest[..end]
    };

    if digits.is_empty() {
        return None;
    }

    digits.parse::<i64>().ok().map(|n| sign * n)
}

/// Grams from a weight or thrust field; missing or malformed text is 0.
///
/// Negative values are clamped to 0 so a bad catalog row can never make a
/// build lighter.
pub fn grams(text: Option<&str>) -> u32 {
    text.and_then(leading_integer)
        .map(|n| n.clamp(0, u32::MAX as i64) as u32)
        .unwrap_or(0)
}

/// Find the first run of digits immediately followed by `unit` and parse it.
///
/// `integer_before_unit("LiPo 4S 1500mAh", "mAh")` is `Some(1500)`.
pub fn integer_before_unit(text: &str, unit: &str) -> Option<u32> {
    number_before_unit(text, unit, |c| c.is_ascii_digit()).and_then(|s| s.parse().ok())
}

/// Find the first decimal number immediately followed by `unit` and parse it.
///
/// `decimal_before_unit("14.8V", "V")` is `Some(14.8)`.
pub fn decimal_before_unit(text: &str, unit: &str) -> Option<f64> {
    number_before_unit(text, unit, |c| c.is_ascii_digit() || c == '.')
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn number_before_unit<'a>(text: &'a str, unit: &str, accept: impl Fn(char) -> bool) -> Option<&'a str> {
    if unit.is_empty() {
        return None;
    }

    let mut search_from = 0;
    while let Some(found) = text[search_from..].find(unit) {
        let unit_start = search_from + found;
        let start = text[..unit_start]
            .char_indices()
            .rev()
            .take_while(|(_, c)| accept(*c))
            .last()
            .map(|(i, _)| i);

        if let Some(start) = start {
            let candidate = &text[start..unit_start];
            if candidate.chars().any(|c| c.is_ascii_digit()) {
                return Some(candidate);
            }
        }

        search_from = unit_start + unit.len();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_integer_with_units() {
        assert_eq!(leading_integer("45g"), Some(45));
        assert_eq!(leading_integer("  120 g"), Some(120));
        assert_eq!(leading_integer("12.5g"), Some(12));
        assert_eq!(leading_integer("-3g"), Some(-3));
    }

    #[test]
    fn test_leading_integer_rejects_non_numeric() {
        assert_eq!(leading_integer("heavy"), None);
        assert_eq!(leading_integer(""), None);
        assert_eq!(leading_integer("g45"), None);
    }

    #[test]
    fn test_grams_defaults_to_zero() {
        assert_eq!(grams(Some("850g")), 850);
        assert_eq!(grams(Some("n/a")), 0);
        assert_eq!(grams(None), 0);
        assert_eq!(grams(Some("-20g")), 0);
    }

    #[test]
    fn test_capacity_from_name() {
        assert_eq!(integer_before_unit("LiPo 6S 2200mAh", "mAh"), Some(2200));
        assert_eq!(integer_before_unit("LiPo 4S 1500 mAh", "mAh"), None);
        assert_eq!(integer_before_unit("Power Distribution Board", "mAh"), None);
    }

    #[test]
    fn test_voltage_from_power_field() {
        assert_eq!(decimal_before_unit("22.2V", "V"), Some(22.2));
        assert_eq!(decimal_before_unit("5V", "V"), Some(5.0));
        assert_eq!(decimal_before_unit("nominal 14.8V", "V"), Some(14.8));
        assert_eq!(decimal_before_unit("Volts", "V"), None);
    }

    #[test]
    fn test_unit_search_skips_bare_occurrences() {
        // first "V" has no number in front, the second does
        assert_eq!(decimal_before_unit("VTX 9V", "V"), Some(9.0));
    }
}
