use rust_decimal::Decimal;
use std::str::FromStr;

/// Strip everything but ASCII digits and `.` from an OCR token and parse the
/// remainder. Tokens that do not leave a valid number (`""`, `"1.2.3"`) yield
/// `None` rather than a default.
pub fn normalize_number(token: &str) -> Option<Decimal> {
    let clean: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if clean.is_empty() {
        return None;
    }
    Decimal::from_str(&clean).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn thousands_separators_removed() {
        assert_eq!(normalize_number("75,000"), Some(dec("75000")));
        assert_eq!(normalize_number("1,234,567.89"), Some(dec("1234567.89")));
    }

    #[test]
    fn currency_and_noise_stripped() {
        assert_eq!(normalize_number("$51.60"), Some(dec("51.60")));
        assert_eq!(normalize_number(" $45/hr "), Some(dec("45")));
    }

    #[test]
    fn comma_removal_roundtrips_to_same_value() {
        for token in ["0.5", "12", "999.99", "1,000", "12,345.6", "100,000,000"] {
            let expected = dec(&token.replace(',', ""));
            assert_eq!(normalize_number(token), Some(expected), "token {token}");
        }
    }

    #[test]
    fn unparsable_tokens_fail() {
        assert_eq!(normalize_number(""), None);
        assert_eq!(normalize_number("$"), None);
        assert_eq!(normalize_number("n/a"), None);
        assert_eq!(normalize_number("1.2.3"), None);
        assert_eq!(normalize_number("."), None);
    }
}
