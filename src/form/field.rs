pub mod components;
mod edit;

use tracing::debug;

use crate::domain::{ControlKind, FieldBinding, FieldSpec, FieldValue, ValueKind, resolve};

use self::components::{Indicator, KeyEdit, ValidatedControl, build_control};
use super::bound::BoundRole;

/// A label, one validated control and its error slot, built from a field spec.
#[derive(Debug)]
pub struct LabeledField {
    spec: FieldSpec,
    binding: FieldBinding,
    control: Box<dyn ValidatedControl>,
    dirty: bool,
}

impl LabeledField {
    pub fn from_spec(spec: FieldSpec) -> Self {
        let binding = resolve(spec.field_type);
        let control = build_control(&spec, binding.control);
        Self {
            spec,
            binding,
            control,
            dirty: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn label(&self) -> &str {
        self.spec.display_label()
    }

    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    pub fn binding(&self) -> FieldBinding {
        self.binding
    }

    pub fn control(&self) -> &dyn ValidatedControl {
        self.control.as_ref()
    }

    pub fn is_boolean(&self) -> bool {
        self.binding.value == ValueKind::Boolean
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Current value; numeric content that does not parse reads as empty.
    pub fn get(&self) -> FieldValue {
        let text = self.control.input().text();
        match self.binding.value {
            ValueKind::Boolean => FieldValue::Bool(self.control.bool_value().unwrap_or(false)),
            _ if text.is_empty() => FieldValue::Empty,
            ValueKind::Text | ValueKind::Unbacked => FieldValue::Text(text.to_string()),
            ValueKind::Decimal => text
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(FieldValue::Decimal)
                .unwrap_or(FieldValue::Empty),
            ValueKind::Integer => text
                .parse::<i64>()
                .map(FieldValue::Integer)
                .unwrap_or(FieldValue::Empty),
        }
    }

    /// Write a value without running validation; boolean fields coerce it first.
    pub fn set(&mut self, value: impl Into<FieldValue>) {
        let value = value.into();
        if self.is_boolean() {
            self.control.set_bool(value.truthy());
        } else {
            self.control.input_mut().set_text(value.display_string());
        }
        self.dirty = true;
    }

    /// Back to an empty, error-free control with its declared bounds.
    pub fn clear(&mut self) {
        self.control.reset();
        self.dirty = false;
    }

    pub fn error(&self) -> Option<String> {
        self.control.error_message()
    }

    pub fn has_error_indicator(&self) -> bool {
        self.control.input().indicator() == Indicator::Error
    }

    pub fn text(&self) -> &str {
        self.control.input().text()
    }

    pub fn cursor(&self) -> usize {
        self.control.input().cursor()
    }

    pub fn choices(&self) -> Option<&[String]> {
        self.control.choices()
    }

    /// Whether Up/Down change the value instead of moving focus.
    pub fn steps_value(&self) -> bool {
        matches!(
            self.binding.control,
            ControlKind::Numeric | ControlKind::Choice
        )
    }

    pub fn accepts_newlines(&self) -> bool {
        self.control.accepts_newlines()
    }

    fn edits_text(&self) -> bool {
        self.binding.control != ControlKind::Toggle
    }

    /// Propose inserting `ch` at the cursor. Returns whether the content changed.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if !self.edits_text() || (ch == '\n' && !self.control.accepts_newlines()) {
            return false;
        }
        let current = self.text().to_string();
        let index = self.cursor();
        let proposed = edit::insert_at(&current, index, ch);
        let mut buf = [0u8; 4];
        let inserted = ch.encode_utf8(&mut buf);
        let accepted = self
            .control
            .validate_key(&KeyEdit::insert(&proposed, &current, inserted, index));
        self.commit(accepted, &current, proposed, index + 1)
    }

    /// Propose deleting the char before the cursor.
    pub fn backspace(&mut self) -> bool {
        let index = self.cursor();
        if !self.edits_text() || index == 0 {
            return false;
        }
        self.propose_removal(index - 1)
    }

    /// Propose deleting the char under the cursor.
    pub fn delete(&mut self) -> bool {
        if !self.edits_text() {
            return false;
        }
        self.propose_removal(self.cursor())
    }

    fn propose_removal(&mut self, index: usize) -> bool {
        let current = self.text().to_string();
        let Some((proposed, removed)) = edit::remove_at(&current, index) else {
            return false;
        };
        let mut buf = [0u8; 4];
        let removed = removed.encode_utf8(&mut buf);
        let accepted = self
            .control
            .validate_key(&KeyEdit::delete(&proposed, &current, removed, index));
        self.commit(accepted, &current, proposed, index)
    }

    fn commit(&mut self, accepted: bool, current: &str, proposed: String, cursor: usize) -> bool {
        let input = self.control.input_mut();
        if input.text() != current {
            // The control rewrote its own content while validating.
            self.dirty = true;
            return true;
        }
        if !accepted {
            return false;
        }
        input.text = proposed;
        input.cursor = cursor;
        self.dirty = true;
        true
    }

    pub fn move_cursor(&mut self, delta: i32) {
        let len = self.text().chars().count() as i64;
        let input = self.control.input_mut();
        input.cursor = (input.cursor as i64 + delta as i64).clamp(0, len) as usize;
    }

    pub fn cursor_home(&mut self) {
        self.control.input_mut().cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        let len = self.text().chars().count();
        self.control.input_mut().cursor = len;
    }

    /// Arrow-key stepping (spinbox increment, choice cycling, toggle flip).
    pub fn step(&mut self, delta: i32) -> bool {
        let changed = self.control.step(delta);
        if changed {
            self.dirty = true;
        }
        changed
    }

    /// Flip a boolean field; other fields ignore it.
    pub fn toggle(&mut self) -> bool {
        self.is_boolean() && self.step(1)
    }

    /// Run focus-out validation in place.
    pub fn validate(&mut self) -> bool {
        if !self.spec.required && self.text().is_empty() {
            self.control.input_mut().pass();
            return true;
        }
        let valid = self.control.trigger_focusout_validation();
        if !valid {
            debug!(field = %self.spec.name, error = ?self.error(), "field failed validation");
        }
        valid
    }

    /// Validation plus publishing: returns the bound variable and the value
    /// to write into it when the field passes and is configured to publish.
    pub fn focus_out(&mut self) -> Option<(String, f64)> {
        if !self.validate() {
            return None;
        }
        let var = self.spec.links.publish.as_ref()?;
        let value = self.control.published_value()?;
        Some((var.clone(), value))
    }

    pub fn apply_bound(&mut self, role: BoundRole, value: f64) -> bool {
        self.control.apply_bound(role, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldType;

    fn field(spec: FieldSpec) -> LabeledField {
        LabeledField::from_spec(spec)
    }

    fn type_str(field: &mut LabeledField, text: &str) {
        for ch in text.chars() {
            field.insert_char(ch);
        }
    }

    #[test]
    fn control_follows_registry() {
        let date = field(FieldSpec::new("Date", FieldType::IsoDateString));
        assert_eq!(date.binding().control, ControlKind::Date);
        let fault = field(FieldSpec::new("Fault", FieldType::Boolean));
        assert!(fault.is_boolean());
    }

    #[test]
    fn rejected_keystrokes_leave_content_unchanged() {
        let mut date = field(FieldSpec::new("Date", FieldType::IsoDateString));
        type_str(&mut date, "2023/07");
        assert_eq!(date.text(), "2023");
        type_str(&mut date, "-07-04");
        assert_eq!(date.text(), "2023-07-04");
        assert!(!date.insert_char('1'));
        assert_eq!(date.text(), "2023-07-04");
    }

    #[test]
    fn choice_autocompletes_through_typing() {
        let mut lab = field(
            FieldSpec::new("Lab", FieldType::StringList).with_values(["A", "B", "C"]),
        );
        assert!(lab.insert_char('b'));
        assert_eq!(lab.text(), "B");
        assert_eq!(lab.cursor(), 1);
        assert!(!lab.insert_char('x'));
        assert_eq!(lab.text(), "B");
        assert!(lab.backspace());
        assert_eq!(lab.text(), "");
    }

    #[test]
    fn numeric_get_degrades_to_empty() {
        let mut plants = field(FieldSpec::new("Plants", FieldType::Integer).with_range(0.0, 20.0));
        assert_eq!(plants.get(), FieldValue::Empty);
        plants.set("abc");
        assert_eq!(plants.get(), FieldValue::Empty);
        plants.set(12_i64);
        assert_eq!(plants.get(), FieldValue::Integer(12));

        let mut light = field(FieldSpec::new("Light", FieldType::Decimal).with_increment(0.01));
        light.set("12.50");
        assert_eq!(light.get(), FieldValue::Decimal(12.5));
    }

    #[test]
    fn boolean_set_coerces_value() {
        let mut fault = field(FieldSpec::new("Fault", FieldType::Boolean));
        fault.set("");
        assert_eq!(fault.get(), FieldValue::Bool(false));
        fault.set("yes");
        assert_eq!(fault.get(), FieldValue::Bool(true));
        assert!(!fault.insert_char('x'));
        assert!(fault.toggle());
        assert_eq!(fault.get(), FieldValue::Bool(false));

        let mut tech = field(FieldSpec::new("Technician", FieldType::String));
        assert!(!tech.toggle());
    }

    #[test]
    fn notes_accept_newlines() {
        let mut notes = field(FieldSpec::new("Notes", FieldType::LongString));
        type_str(&mut notes, "a\nb");
        assert_eq!(notes.get(), FieldValue::text("a\nb"));

        let mut tech = field(FieldSpec::new("Technician", FieldType::String));
        type_str(&mut tech, "a\nb");
        assert_eq!(tech.text(), "ab");
    }

    #[test]
    fn editing_in_the_middle_uses_the_cursor() {
        let mut tech = field(FieldSpec::new("Technician", FieldType::String));
        type_str(&mut tech, "Jn");
        tech.move_cursor(-1);
        tech.insert_char('o');
        assert_eq!(tech.text(), "Jon");
        tech.cursor_home();
        assert!(tech.delete());
        assert_eq!(tech.text(), "on");
        tech.cursor_end();
        assert!(!tech.delete());
    }

    #[test]
    fn focus_out_publishes_only_clean_values() {
        let spec = FieldSpec::new("Minimum Height", FieldType::Decimal)
            .with_range(0.0, 1000.0)
            .with_increment(0.01)
            .with_links(crate::domain::FieldLinks {
                min_var: None,
                max_var: Some("max_height".into()),
                publish: Some("min_height".into()),
            });
        let mut min_height = field(spec);
        assert_eq!(min_height.focus_out(), None);
        assert!(min_height.has_error_indicator());

        min_height.set("12.5");
        assert_eq!(min_height.focus_out(), Some(("min_height".to_string(), 12.5)));
        assert!(!min_height.has_error_indicator());
    }

    #[test]
    fn optional_fields_may_stay_empty() {
        let mut sample = field(FieldSpec::new("Seed sample", FieldType::String).optional());
        assert!(sample.validate());
        let mut light = field(
            FieldSpec::new("Light", FieldType::Decimal)
                .optional()
                .with_range(0.0, 100.0),
        );
        assert!(light.validate());
        light.set("200");
        assert!(!light.validate());
    }

    #[test]
    fn keystroke_clears_previous_error() {
        let mut tech = field(FieldSpec::new("Technician", FieldType::String));
        assert!(!tech.validate());
        assert_eq!(tech.error().as_deref(), Some("A value is required."));
        tech.insert_char('J');
        assert_eq!(tech.error(), None);
    }
}
