use thiserror::Error;

use crate::domain::format_bound;

/// Field-local validation failure shown under the offending input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("A value is required.")]
    Required,
    #[error("Invalid date.")]
    InvalidDate,
    #[error("Invalid number string: {0}")]
    InvalidNumber(String),
    #[error("Value is too low (min {})", bound(.0))]
    TooLow(f64),
    #[error("Value is too high (max {})", bound(.0))]
    TooHigh(f64),
    #[error("Value must be one of the listed choices.")]
    NoMatchingChoice,
}

fn bound(value: &f64) -> String {
    format_bound(*value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_form_wording() {
        assert_eq!(FieldError::Required.to_string(), "A value is required.");
        assert_eq!(FieldError::InvalidDate.to_string(), "Invalid date.");
        assert_eq!(
            FieldError::InvalidNumber("abc".into()).to_string(),
            "Invalid number string: abc"
        );
        assert_eq!(
            FieldError::TooLow(0.5).to_string(),
            "Value is too low (min 0.5)"
        );
        assert_eq!(
            FieldError::TooHigh(52.0).to_string(),
            "Value is too high (max 52)"
        );
    }
}
