use crate::form::error::FieldError;

use super::{EditAction, InputState, KeyEdit, ValidatedControl};

/// Combo-box restricted to a fixed list of values, completing typed prefixes.
#[derive(Debug, Clone)]
pub struct ChoiceInput {
    input: InputState,
    values: Vec<String>,
}

impl ChoiceInput {
    pub fn new(values: Vec<String>) -> Self {
        Self {
            input: InputState::default(),
            values,
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    fn matching(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        self.values
            .iter()
            .filter(|value| value.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect()
    }
}

impl ValidatedControl for ChoiceInput {
    fn input(&self) -> &InputState {
        &self.input
    }

    fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    fn key_validate(&mut self, edit: &KeyEdit<'_>) -> bool {
        if edit.action == EditAction::Delete {
            self.input.clear();
            return true;
        }
        let mut matching = self.matching(edit.proposed);
        match matching.len() {
            0 => false,
            1 => {
                // The field now holds the full value, so the partial edit itself is refused.
                self.input.set_text(matching.remove(0));
                false
            }
            _ => true,
        }
    }

    fn focusout_validate(&self) -> Result<(), FieldError> {
        let text = self.input.text();
        if text.is_empty() {
            return Err(FieldError::Required);
        }
        if !self.values.iter().any(|value| value == text) {
            return Err(FieldError::NoMatchingChoice);
        }
        Ok(())
    }

    fn choices(&self) -> Option<&[String]> {
        Some(&self.values)
    }

    /// Values are listed top to bottom: a positive step (Up) selects the entry
    /// above, a negative step (Down) the entry below.
    fn step(&mut self, delta: i32) -> bool {
        if self.values.is_empty() {
            return false;
        }
        let len = self.values.len() as i64;
        let offset = -(delta as i64);
        let next = match self
            .values
            .iter()
            .position(|value| value == self.input.text())
        {
            Some(current) => (current as i64 + offset).rem_euclid(len),
            None if offset < 0 => len - 1,
            None => 0,
        };
        let value = self.values[next as usize].clone();
        self.input.set_text(value);
        self.input.pass();
        true
    }
}
