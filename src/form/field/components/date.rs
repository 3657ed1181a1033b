use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::form::error::FieldError;

use super::{EditAction, InputState, KeyEdit, ValidatedControl};

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

static ISO_DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid ISO date pattern"));

/// `YYYY-MM-DD` entry: digits and hyphens at fixed positions.
#[derive(Debug, Clone, Default)]
pub struct DateInput {
    input: InputState,
}

impl DateInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsed value, when the content is a valid calendar date.
    pub fn date(&self) -> Option<NaiveDate> {
        parse_iso_date(self.input.text())
    }
}

pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    if !ISO_DATE_SHAPE.is_match(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, ISO_DATE_FORMAT).ok()
}

impl ValidatedControl for DateInput {
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
        match edit.index {
            0..=3 | 5 | 6 | 8 | 9 => ch.is_ascii_digit(),
            4 | 7 => ch == '-',
            _ => false,
        }
    }

    fn focusout_validate(&self) -> Result<(), FieldError> {
        let text = self.input.text();
        if text.is_empty() {
            return Err(FieldError::Required);
        }
        if parse_iso_date(text).is_none() {
            return Err(FieldError::InvalidDate);
        }
        Ok(())
    }
}
