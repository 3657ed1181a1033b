use crate::form::bound::BoundRole;
use crate::form::error::FieldError;

use super::{EditAction, InputState, KeyEdit, ValidatedControl};

/// Spinbox-style numeric entry with live, externally driven bounds.
///
/// Key-level checks only look at the maximum: a proposal below the minimum
/// is accepted while typing and reported at focus loss.
#[derive(Debug, Clone)]
pub struct NumericInput {
    input: InputState,
    spec_min: f64,
    spec_max: f64,
    min: f64,
    max: f64,
    increment: f64,
    precision: usize,
    publishes: bool,
    tracks_min: bool,
    tracks_max: bool,
}

impl NumericInput {
    pub fn new(min: Option<f64>, max: Option<f64>, increment: Option<f64>) -> Self {
        let min = min.unwrap_or(f64::NEG_INFINITY);
        let max = max.unwrap_or(f64::INFINITY);
        let increment = increment.unwrap_or(1.0);
        Self {
            input: InputState::default(),
            spec_min: min,
            spec_max: max,
            min,
            max,
            increment,
            precision: decimal_places(increment),
            publishes: false,
            tracks_min: false,
            tracks_max: false,
        }
    }

    /// Publish the value to a linked variable after a clean focus loss.
    pub fn publishing(mut self) -> Self {
        self.publishes = true;
        self
    }

    /// Follow a linked variable for the given limit.
    pub fn tracking(mut self, role: BoundRole) -> Self {
        match role {
            BoundRole::Min => self.tracks_min = true,
            BoundRole::Max => self.tracks_max = true,
        }
        self
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Allowed number of fractional digits.
    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn value(&self) -> Option<f64> {
        parse_number(self.input.text())
    }

    fn format(&self, value: f64) -> String {
        format!("{value:.prec$}", prec = self.precision)
    }
}

impl ValidatedControl for NumericInput {
    fn input(&self) -> &InputState {
        &self.input
    }

    fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    fn key_validate(&mut self, edit: &KeyEdit<'_>) -> bool {
        if edit.action == EditAction::Delete {
            return true;
        }
        let Some(ch) = edit.char() else {
            return false;
        };
        let no_negative = self.min >= 0.0;
        let no_decimal = self.precision == 0;
        if !(ch.is_ascii_digit() || ch == '-' || ch == '.')
            || (ch == '-' && (no_negative || edit.index != 0))
            || (ch == '.' && (no_decimal || edit.current.contains('.')))
        {
            return false;
        }

        if matches!(edit.proposed, "" | "-" | "." | "-.") {
            return true;
        }
        let Some(proposed) = parse_number(edit.proposed) else {
            return false;
        };
        !(proposed > self.max || fractional_digits(edit.proposed) > self.precision)
    }

    fn focusout_validate(&self) -> Result<(), FieldError> {
        let text = self.input.text();
        if text.is_empty() {
            return Err(FieldError::Required);
        }
        let Some(value) = parse_number(text) else {
            return Err(FieldError::InvalidNumber(text.to_string()));
        };
        if value < self.min {
            return Err(FieldError::TooLow(self.min));
        }
        if value > self.max {
            return Err(FieldError::TooHigh(self.max));
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.input.clear();
        self.input.pass();
        self.min = self.spec_min;
        self.max = self.spec_max;
    }

    fn step(&mut self, delta: i32) -> bool {
        let base = self.value().unwrap_or(if self.min.is_finite() {
            self.min - delta as f64 * self.increment
        } else {
            0.0
        });
        let mut next = base + delta as f64 * self.increment;
        if next > self.max {
            next = self.max;
        }
        if next < self.min {
            next = self.min;
        }
        let text = self.format(next);
        self.input.set_text(text);
        self.input.pass();
        true
    }

    fn published_value(&self) -> Option<f64> {
        if !self.publishes {
            return None;
        }
        self.value()
    }

    fn apply_bound(&mut self, role: BoundRole, value: f64) -> bool {
        match role {
            BoundRole::Min if self.tracks_min => self.min = value,
            BoundRole::Max if self.tracks_max => self.max = value,
            _ => return false,
        }
        if !self.input.text().is_empty() {
            self.trigger_focusout_validation();
        }
        true
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn fractional_digits(text: &str) -> usize {
    text.split_once('.')
        .map(|(_, fraction)| fraction.len())
        .unwrap_or(0)
}

/// Fractional digits implied by an increment: `0.01` gives 2, `1.0` gives 0.
pub fn decimal_places(increment: f64) -> usize {
    fractional_digits(&increment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn humidity() -> NumericInput {
        NumericInput::new(Some(0.5), Some(52.0), Some(0.01))
    }

    fn with_text(mut control: NumericInput, text: &str) -> NumericInput {
        control.input_mut().set_text(text);
        control
    }

    #[test]
    fn precision_derives_from_increment() {
        assert_eq!(decimal_places(0.01), 2);
        assert_eq!(decimal_places(0.1), 1);
        assert_eq!(decimal_places(1.0), 0);
        assert_eq!(decimal_places(5.0), 0);
        assert_eq!(NumericInput::new(None, None, None).precision(), 0);
    }

    #[test]
    fn above_maximum_fails_on_focusout() {
        let mut control = with_text(humidity(), "52.01");
        assert!(!control.trigger_focusout_validation());
        assert_eq!(
            control.error_message().as_deref(),
            Some("Value is too high (max 52)")
        );
    }

    #[test]
    fn below_minimum_passes_key_check_but_fails_on_focusout() {
        let mut control = with_text(humidity(), "-");
        assert!(control.validate_key(&KeyEdit::insert("-1", "-", "1", 1)));

        let mut control = with_text(humidity(), "-1");
        assert!(!control.trigger_focusout_validation());
        assert_eq!(
            control.error_message().as_deref(),
            Some("Value is too low (min 0.5)")
        );
    }

    #[test]
    fn key_filter_rejects_stray_characters() {
        let mut control = humidity();
        assert!(!control.validate_key(&KeyEdit::insert("a", "", "a", 0)));
        // minimum is non-negative, so a leading minus is refused
        assert!(!control.validate_key(&KeyEdit::insert("-", "", "-", 0)));
        assert!(!control.validate_key(&KeyEdit::insert("1.2.", "1.2", ".", 3)));
        assert!(!control.validate_key(&KeyEdit::insert("1.234", "1.23", "4", 4)));
        assert!(!control.validate_key(&KeyEdit::insert("60", "6", "0", 1)));
        assert!(control.validate_key(&KeyEdit::insert("5.25", "5.2", "5", 3)));
    }

    #[test]
    fn partial_numbers_are_provisionally_accepted() {
        let mut control = NumericInput::new(Some(-10.0), Some(10.0), Some(0.1));
        assert!(control.validate_key(&KeyEdit::insert("-", "", "-", 0)));
        assert!(control.validate_key(&KeyEdit::insert(".", "", ".", 0)));
        assert!(control.validate_key(&KeyEdit::insert("-.", "-", ".", 1)));
        assert!(!control.validate_key(&KeyEdit::insert("1-", "1", "-", 1)));
    }

    #[test]
    fn integers_refuse_a_decimal_point() {
        let mut control = NumericInput::new(Some(0.0), Some(20.0), None);
        assert!(!control.validate_key(&KeyEdit::insert("1.", "1", ".", 1)));
        assert!(control.validate_key(&KeyEdit::insert("12", "1", "2", 1)));
    }

    #[test]
    fn deletions_are_always_accepted() {
        let mut control = with_text(humidity(), "5");
        assert!(control.validate_key(&KeyEdit::delete("", "5", "5", 0)));
    }

    #[test]
    fn focusout_reports_required_and_malformed_values() {
        let mut control = humidity();
        assert!(!control.trigger_focusout_validation());
        assert_eq!(control.error_message().as_deref(), Some("A value is required."));

        let mut control = with_text(humidity(), "-.");
        assert!(!control.trigger_focusout_validation());
        assert_eq!(
            control.error_message().as_deref(),
            Some("Invalid number string: -.")
        );
    }

    #[test]
    fn tracked_bound_updates_and_revalidates() {
        let mut control = with_text(
            NumericInput::new(Some(0.0), Some(1000.0), Some(0.01)).tracking(BoundRole::Min),
            "10",
        );
        assert!(control.apply_bound(BoundRole::Min, 12.0));
        assert_eq!(control.min(), 12.0);
        assert_eq!(
            control.error_message().as_deref(),
            Some("Value is too low (min 12)")
        );
        assert!(!control.apply_bound(BoundRole::Max, 5.0));
        assert_eq!(control.max(), 1000.0);
    }

    #[test]
    fn reset_restores_spec_bounds() {
        let mut control =
            NumericInput::new(Some(0.0), Some(1000.0), Some(0.01)).tracking(BoundRole::Max);
        control.apply_bound(BoundRole::Max, 40.0);
        control.reset();
        assert_eq!(control.max(), 1000.0);
        assert_eq!(control.input().text(), "");
    }

    #[test]
    fn stepping_moves_by_increment_within_bounds() {
        let mut control = NumericInput::new(Some(0.0), Some(20.0), None);
        assert!(control.step(1));
        assert_eq!(control.input().text(), "0");
        control.step(1);
        assert_eq!(control.input().text(), "1");

        let mut control = with_text(humidity(), "51.99");
        control.step(1);
        assert_eq!(control.input().text(), "52.00");
        control.step(1);
        assert_eq!(control.input().text(), "52.00");
    }

    #[test]
    fn only_publishing_controls_expose_their_value() {
        let plain = with_text(humidity(), "12");
        assert_eq!(plain.published_value(), None);
        let publisher = with_text(humidity().publishing(), "12");
        assert_eq!(publisher.published_value(), Some(12.0));
    }
}
