use crate::form::error::FieldError;

use super::{InputState, ValidatedControl};

/// Single-line text that must not be left empty.
#[derive(Debug, Clone, Default)]
pub struct RequiredText {
    input: InputState,
}

impl RequiredText {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValidatedControl for RequiredText {
    fn input(&self) -> &InputState {
        &self.input
    }

    fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    fn focusout_validate(&self) -> Result<(), FieldError> {
        if self.input.text().is_empty() {
            return Err(FieldError::Required);
        }
        Ok(())
    }
}

/// Free-form multi-line notes; never fails validation.
#[derive(Debug, Clone, Default)]
pub struct LongText {
    input: InputState,
}

impl LongText {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValidatedControl for LongText {
    fn input(&self) -> &InputState {
        &self.input
    }

    fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    fn accepts_newlines(&self) -> bool {
        true
    }
}
