//! Parsing of user-entered salaries.
//!
//! Input like `"2 500"` or `"2500,50"` is accepted: whitespace is stripped and
//! a decimal comma becomes a point. Anything that isn't a finite positive
//! number is rejected before it reaches the analyzer.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("please enter a salary")]
    Empty,

    #[error("'{0}' is not a valid amount")]
    NotANumber(String),

    #[error("salary must be a positive amount, got {0}")]
    NotPositive(f64),
}

/// Parse a monthly net salary typed by the user.
pub fn parse_salary(raw: &str) -> Result<f64, InputError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(InputError::Empty);
    }

    let normalized = compact.replacen(',', ".", 1);
    let value: f64 = normalized
        .parse()
        .map_err(|_| InputError::NotANumber(raw.trim().to_string()))?;

    if !value.is_finite() {
        return Err(InputError::NotANumber(raw.trim().to_string()));
    }
    if value <= 0.0 {
        return Err(InputError::NotPositive(value));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_integer() {
        assert_eq!(parse_salary("2500"), Ok(2500.0));
    }

    #[test]
    fn grouped_digits_and_decimal_comma() {
        assert_eq!(parse_salary(" 2 500,50 "), Ok(2500.5));
        assert_eq!(parse_salary("1\u{a0}800"), Ok(1800.0));
    }

    #[test]
    fn decimal_point_still_works() {
        assert_eq!(parse_salary("1999.99"), Ok(1999.99));
    }

    #[test]
    fn empty_is_rejected() {
        assert_eq!(parse_salary("   "), Err(InputError::Empty));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(parse_salary("abc"), Err(InputError::NotANumber(_))));
        assert!(matches!(parse_salary("1,2,3"), Err(InputError::NotANumber(_))));
    }

    #[test]
    fn non_finite_is_rejected() {
        assert!(matches!(parse_salary("inf"), Err(InputError::NotANumber(_))));
        assert!(matches!(parse_salary("NaN"), Err(InputError::NotANumber(_))));
    }

    #[test]
    fn zero_and_negative_are_rejected() {
        assert_eq!(parse_salary("0"), Err(InputError::NotPositive(0.0)));
        assert_eq!(parse_salary("-1200"), Err(InputError::NotPositive(-1200.0)));
    }
}
