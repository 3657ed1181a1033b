use crate::form::bound::BoundRole;
use crate::form::error::FieldError;

/// Kind of edit a keystroke proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Insert,
    Delete,
}

/// A proposed edit, evaluated before it is committed to the control.
#[derive(Debug, Clone, Copy)]
pub struct KeyEdit<'a> {
    /// Full content the control would hold if the edit were applied.
    pub proposed: &'a str,
    /// Content before the edit.
    pub current: &'a str,
    /// Inserted or deleted text.
    pub text: &'a str,
    /// Character index at which the edit happens.
    pub index: usize,
    pub action: EditAction,
}

impl<'a> KeyEdit<'a> {
    pub fn insert(proposed: &'a str, current: &'a str, text: &'a str, index: usize) -> Self {
        Self {
            proposed,
            current,
            text,
            index,
            action: EditAction::Insert,
        }
    }

    pub fn delete(proposed: &'a str, current: &'a str, text: &'a str, index: usize) -> Self {
        Self {
            proposed,
            current,
            text,
            index,
            action: EditAction::Delete,
        }
    }

    /// The single inserted character, if exactly one was inserted.
    pub fn char(&self) -> Option<char> {
        let mut chars = self.text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }
}

/// Visual state of a control; the two states are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indicator {
    #[default]
    Normal,
    Error,
}

/// Displayed content, cursor and error slot shared by every control.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub(crate) text: String,
    pub(crate) cursor: usize,
    error: Option<FieldError>,
    indicator: Indicator,
}

impl InputState {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the content and park the cursor at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn error(&self) -> Option<&FieldError> {
        self.error.as_ref()
    }

    pub fn indicator(&self) -> Indicator {
        self.indicator
    }

    pub fn pass(&mut self) {
        self.error = None;
        self.indicator = Indicator::Normal;
    }

    pub fn fail(&mut self, error: FieldError) {
        self.error = Some(error);
        self.indicator = Indicator::Error;
    }
}

/// An input control with two validation entry points: per keystroke and on
/// focus loss.
///
/// Variants implement [`key_validate`](Self::key_validate) and
/// [`focusout_validate`](Self::focusout_validate); the provided driver methods
/// apply the shared error-slot and indicator contract around them.
pub trait ValidatedControl: std::fmt::Debug {
    fn input(&self) -> &InputState;
    fn input_mut(&mut self) -> &mut InputState;

    /// Accept or reject a proposed edit. Implementations may rewrite their own
    /// buffer; a rewritten buffer takes precedence over the edit.
    fn key_validate(&mut self, edit: &KeyEdit<'_>) -> bool {
        let _ = edit;
        true
    }

    /// Check the fully entered value.
    fn focusout_validate(&self) -> Result<(), FieldError> {
        Ok(())
    }

    fn validate_key(&mut self, edit: &KeyEdit<'_>) -> bool {
        self.input_mut().pass();
        self.key_validate(edit)
    }

    fn validate_focusout(&mut self) -> bool {
        match self.focusout_validate() {
            Ok(()) => {
                self.input_mut().pass();
                true
            }
            Err(error) => {
                self.input_mut().fail(error);
                false
            }
        }
    }

    /// Run focus-out checks without moving keyboard focus.
    fn trigger_focusout_validation(&mut self) -> bool {
        self.validate_focusout()
    }

    fn error_message(&self) -> Option<String> {
        self.input().error().map(ToString::to_string)
    }

    /// Restore the control to its pristine state.
    fn reset(&mut self) {
        let input = self.input_mut();
        input.clear();
        input.pass();
    }

    fn bool_value(&self) -> Option<bool> {
        None
    }

    fn set_bool(&mut self, _value: bool) -> bool {
        false
    }

    fn choices(&self) -> Option<&[String]> {
        None
    }

    /// Arrow-key stepping; numeric controls move by their increment,
    /// choice controls walk their allowed values.
    fn step(&mut self, _delta: i32) -> bool {
        false
    }

    /// Current value to write into a linked bound variable after a clean
    /// focus loss.
    fn published_value(&self) -> Option<f64> {
        None
    }

    /// A linked bound variable changed; returns whether the control tracks it.
    fn apply_bound(&mut self, _role: BoundRole, _value: f64) -> bool {
        false
    }

    fn accepts_newlines(&self) -> bool {
        false
    }
}
