// Numeric extraction for raw form input
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

lazy_static! {
    /// First number-like token, with optional sign and separators
    static ref NUMBER_PATTERN: Regex = Regex::new(r"-?\d[\d.,]*").unwrap();

    /// Dots used only as thousands separators, e.g. "1.234" or "12.500.000"
    static ref DOT_THOUSANDS_PATTERN: Regex = Regex::new(r"^-?\d{1,3}(?:\.\d{3})+$").unwrap();

    /// Commas used only as thousands separators, e.g. "1,234,567"
    static ref COMMA_THOUSANDS_PATTERN: Regex = Regex::new(r"^-?\d{1,3}(?:,\d{3}){2,}$").unwrap();
}

/// Parse a euro amount typed into a form field.
///
/// Accepts German ("1.234,56 €") and plain ("1234.56") notation. Anything
/// that is not a number, and any negative number, yields zero.
pub fn parse_amount(text: &str) -> Decimal {
    let Some(token) = NUMBER_PATTERN.find(text) else {
        return Decimal::ZERO;
    };
    let token = token.as_str().trim_end_matches(['.', ',']);

    let normalized = if token.contains(',') && !COMMA_THOUSANDS_PATTERN.is_match(token) {
        // German notation: dots group thousands, the comma is the decimal mark
        token.replace('.', "").replace(',', ".")
    } else if token.contains(',') || DOT_THOUSANDS_PATTERN.is_match(token) {
        token.replace([',', '.'], "")
    } else {
        token.to_string()
    };

    Decimal::from_str(&normalized)
        .map(|amount| amount.max(Decimal::ZERO))
        .unwrap_or(Decimal::ZERO)
}

/// Parse a whole number such as an age or household size; invalid input is zero
pub fn parse_count(text: &str) -> u32 {
    NUMBER_PATTERN
        .find(text)
        .and_then(|m| {
            let digits: String = m.as_str().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u32>().ok()
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_german_notation() {
        assert_eq!(parse_amount("1.234,56 €"), dec!(1234.56));
        assert_eq!(parse_amount("563,00"), dec!(563.00));
        assert_eq!(parse_amount("15.000"), dec!(15000));
        assert_eq!(parse_amount("12.500.000"), dec!(12500000));
    }

    #[test]
    fn test_parse_plain_notation() {
        assert_eq!(parse_amount("1234.56"), dec!(1234.56));
        assert_eq!(parse_amount("600"), dec!(600));
        assert_eq!(parse_amount("€ 450"), dec!(450));
        assert_eq!(parse_amount("1,234,567"), dec!(1234567));
    }

    #[test]
    fn test_non_numeric_and_negative_are_zero() {
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount("-250"), Decimal::ZERO);
    }

    #[test]
    fn test_trailing_separator_ignored() {
        assert_eq!(parse_amount("100."), dec!(100));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("3 Personen"), 3);
        assert_eq!(parse_count("42"), 42);
        assert_eq!(parse_count("-"), 0);
        assert_eq!(parse_count("-4"), 0);
    }
}
