mod base;
mod choice;
mod date;
mod numeric;
mod text;
mod toggle;

pub use base::{EditAction, Indicator, InputState, KeyEdit, ValidatedControl};
pub use choice::ChoiceInput;
pub use date::{DateInput, ISO_DATE_FORMAT, parse_iso_date};
pub use numeric::{NumericInput, decimal_places};
pub use text::{LongText, RequiredText};
pub use toggle::ToggleInput;

use crate::domain::{ControlKind, FieldSpec};
use crate::form::bound::BoundRole;

/// Instantiate the control a field's registry entry calls for, with its
/// construction arguments taken from the field spec.
pub(crate) fn build_control(spec: &FieldSpec, kind: ControlKind) -> Box<dyn ValidatedControl> {
    match kind {
        ControlKind::RequiredText => Box::new(RequiredText::new()),
        ControlKind::LongText => Box::new(LongText::new()),
        ControlKind::Date => Box::new(DateInput::new()),
        ControlKind::Toggle => Box::new(ToggleInput::new()),
        ControlKind::Choice => Box::new(ChoiceInput::new(
            spec.values.clone().unwrap_or_default(),
        )),
        ControlKind::Numeric => {
            let mut control = NumericInput::new(spec.min, spec.max, spec.inc);
            if spec.links.min_var.is_some() {
                control = control.tracking(BoundRole::Min);
            }
            if spec.links.max_var.is_some() {
                control = control.tracking(BoundRole::Max);
            }
            if spec.links.publish.is_some() {
                control = control.publishing();
            }
            Box::new(control)
        }
    }
}
