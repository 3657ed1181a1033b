use super::{InputState, ValidatedControl};

/// Two-state checkbox; always valid.
#[derive(Debug, Clone, Default)]
pub struct ToggleInput {
    input: InputState,
    checked: bool,
}

impl ToggleInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checked(&self) -> bool {
        self.checked
    }
}

impl ValidatedControl for ToggleInput {
    fn input(&self) -> &InputState {
        &self.input
    }

    fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    fn reset(&mut self) {
        self.checked = false;
        self.input.pass();
    }

    fn bool_value(&self) -> Option<bool> {
        Some(self.checked)
    }

    fn set_bool(&mut self, value: bool) -> bool {
        let changed = self.checked != value;
        self.checked = value;
        changed
    }

    fn step(&mut self, _delta: i32) -> bool {
        self.checked = !self.checked;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_and_never_fails() {
        let mut control = ToggleInput::new();
        assert_eq!(control.bool_value(), Some(false));
        assert!(control.step(1));
        assert!(control.checked());
        assert!(control.trigger_focusout_validation());
        assert!(control.error_message().is_none());
    }

    #[test]
    fn set_bool_reports_changes() {
        let mut control = ToggleInput::new();
        assert!(control.set_bool(true));
        assert!(!control.set_bool(true));
        control.reset();
        assert_eq!(control.bool_value(), Some(false));
    }
}
