use std::fmt;

use indexmap::IndexMap;

/// Field name to value for one saved row, in column order.
pub type Record = IndexMap<String, FieldValue>;

/// Current content of one field, typed by its backing value kind.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    Integer(i64),
    Decimal(f64),
    Bool(bool),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    /// Truthiness used when a value is written into a boolean field.
    pub fn truthy(&self) -> bool {
        match self {
            FieldValue::Empty => false,
            FieldValue::Text(text) => {
                let trimmed = text.trim();
                !(trimmed.is_empty()
                    || trimmed.eq_ignore_ascii_case("false")
                    || trimmed == "0")
            }
            FieldValue::Integer(value) => *value != 0,
            FieldValue::Decimal(value) => *value != 0.0,
            FieldValue::Bool(value) => *value,
        }
    }

    /// String form written to the record file and shown in inputs.
    pub fn display_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Empty => Ok(()),
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Decimal(value) => f.write_str(&format_decimal(*value)),
            FieldValue::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Decimal(value)
    }
}

/// Shortest round-trip form, keeping a trailing `.0` on whole numbers.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Bound rendering for error messages: `4`, `0.5`, `-inf`.
pub fn format_bound(value: f64) -> String {
    if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals_keep_one_fractional_digit_when_whole() {
        assert_eq!(FieldValue::Decimal(3.0).to_string(), "3.0");
        assert_eq!(FieldValue::Decimal(12.5).to_string(), "12.5");
        assert_eq!(FieldValue::Decimal(0.01).to_string(), "0.01");
    }

    #[test]
    fn empty_displays_as_empty_cell() {
        assert_eq!(FieldValue::Empty.to_string(), "");
        assert!(FieldValue::Empty.is_empty());
        assert!(FieldValue::text("").is_empty());
    }

    #[test]
    fn truthiness_follows_content() {
        assert!(!FieldValue::Empty.truthy());
        assert!(!FieldValue::text("").truthy());
        assert!(!FieldValue::text("false").truthy());
        assert!(FieldValue::text("yes").truthy());
        assert!(FieldValue::Integer(2).truthy());
        assert!(!FieldValue::Decimal(0.0).truthy());
    }

    #[test]
    fn bounds_render_without_trailing_zeroes() {
        assert_eq!(format_bound(4.0), "4");
        assert_eq!(format_bound(0.5), "0.5");
        assert_eq!(format_bound(f64::NEG_INFINITY), "-inf");
    }
}
