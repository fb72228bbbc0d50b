//! Tolerant integer parsing
//!
//! Accepts grouped digit forms such as `1_000_000` or `1 000 000` with an
//! optional leading sign. Malformed input yields `None`; nothing here panics.

/// Characters accepted as digit-group separators
const GROUP_SEPARATORS: [char; 2] = ['_', ' '];

/// Remove digit-group separators from `text`
fn strip_separators(text: &str) -> String {
    text.chars()
        .filter(|c| !GROUP_SEPARATORS.contains(c))
        .collect()
}

/// Parse free-form numeric text into a signed integer
///
/// Separators are removed first, then surrounding whitespace. A single
/// leading `+` or `-` is allowed; every remaining character must be an ASCII
/// digit. Values outside the `i64` range are rejected.
///
/// # Examples
///
/// ```
/// use country_registry::app::numeric::parse_integer;
///
/// assert_eq!(parse_integer("1_000_000"), Some(1_000_000));
/// assert_eq!(parse_integer(" -1 500 "), Some(-1500));
/// assert_eq!(parse_integer("12a"), None);
/// ```
pub fn parse_integer(text: &str) -> Option<i64> {
    let stripped = strip_separators(text);
    let trimmed = stripped.trim();

    let (negative, digits) = match trimmed.as_bytes().first()? {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    // Accumulate negatively so i64::MIN stays representable
    let mut value: i64 = 0;
    for b in digits.bytes() {
        let digit = i64::from(b - b'0');
        value = value.checked_mul(10)?.checked_sub(digit)?;
    }

    if negative {
        Some(value)
    } else {
        value.checked_neg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_signed() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("+42"), Some(42));
        assert_eq!(parse_integer("-42"), Some(-42));
        assert_eq!(parse_integer("0"), Some(0));
        assert_eq!(parse_integer("007"), Some(7));
    }

    #[test]
    fn test_grouped_forms_match_ungrouped() {
        let cases = [
            ("1_000_000", 1_000_000),
            ("1 000 000", 1_000_000),
            ("-2_5 00", -2500),
            ("+ 12", 12),
            ("  9_9  ", 99),
        ];
        for (text, expected) in cases {
            assert_eq!(parse_integer(text), Some(expected), "input {:?}", text);
        }
    }

    #[test]
    fn test_rejects_malformed() {
        for text in ["", "   ", "_ _", "+", "-", "1.5", "1,000", "abc", "--1", "+-1", "1-"] {
            assert_eq!(parse_integer(text), None, "input {:?}", text);
        }
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        assert_eq!(parse_integer("١٢٣"), None);
    }

    #[test]
    fn test_range_limits() {
        assert_eq!(parse_integer("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_integer("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_integer("9223372036854775808"), None);
        assert_eq!(parse_integer("99999999999999999999999"), None);
    }

    #[test]
    fn test_strip_separators() {
        assert_eq!(strip_separators("1_000 000"), "1000000");
        assert_eq!(strip_separators("abc"), "abc");
    }
}
