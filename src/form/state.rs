use chrono::NaiveDate;
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::domain::{FieldValue, FormSchema, Record, SchemaError};

use super::{
    bound::{BoundRegistry, BoundRole},
    field::{LabeledField, components::ISO_DATE_FORMAT},
    section::SectionState,
};

/// The whole record entry form: every field, grouped into sections, plus the
/// bound variables linking numeric ranges.
#[derive(Debug)]
pub struct RecordForm {
    schema: FormSchema,
    fields: Vec<LabeledField>,
    sections: Vec<SectionState>,
    focus_order: Vec<usize>,
    focus: usize,
    bounds: BoundRegistry,
}

impl RecordForm {
    pub fn from_schema(schema: FormSchema) -> Result<Self, SchemaError> {
        schema.validate()?;
        let fields: Vec<LabeledField> = schema
            .fields
            .iter()
            .cloned()
            .map(LabeledField::from_spec)
            .collect();
        let index_of =
            |name: &str| schema.fields.iter().position(|field| field.name == name);
        let sections: Vec<SectionState> = schema
            .sections
            .iter()
            .map(|spec| SectionState::collect(spec, index_of))
            .collect();
        let focus_order = sections
            .iter()
            .flat_map(|section| section.fields.iter().copied())
            .collect();

        let mut bounds = BoundRegistry::new();
        for (index, field) in fields.iter().enumerate() {
            let links = &field.spec().links;
            if let Some(var) = &links.min_var {
                bounds.subscribe(var, index, BoundRole::Min);
            }
            if let Some(var) = &links.max_var {
                bounds.subscribe(var, index, BoundRole::Max);
            }
            if let Some(var) = &links.publish {
                bounds.declare(var);
            }
        }

        Ok(Self {
            schema,
            fields,
            sections,
            focus_order,
            focus: 0,
            bounds,
        })
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn title(&self) -> Option<&str> {
        self.schema.title.as_deref()
    }

    pub fn fields(&self) -> &[LabeledField] {
        &self.fields
    }

    pub fn sections(&self) -> &[SectionState] {
        &self.sections
    }

    pub fn bounds(&self) -> &BoundRegistry {
        &self.bounds
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name() == name)
    }

    pub fn field(&self, name: &str) -> Option<&LabeledField> {
        self.index_of(name).map(|index| &self.fields[index])
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut LabeledField> {
        self.index_of(name).map(|index| &mut self.fields[index])
    }

    pub fn field_at(&self, index: usize) -> Option<&LabeledField> {
        self.fields.get(index)
    }

    /// Index into [`fields`](Self::fields) of the field holding focus.
    pub fn focused_index(&self) -> Option<usize> {
        self.focus_order.get(self.focus).copied()
    }

    pub fn focused_field(&self) -> Option<&LabeledField> {
        self.focused_index().map(|index| &self.fields[index])
    }

    pub fn focused_field_mut(&mut self) -> Option<&mut LabeledField> {
        let index = self.focused_index()?;
        self.fields.get_mut(index)
    }

    pub fn focused_name(&self) -> Option<&str> {
        self.focused_field().map(LabeledField::name)
    }

    pub fn focus_next(&mut self) {
        self.step_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.step_focus(-1);
    }

    fn step_focus(&mut self, delta: i64) {
        if self.focus_order.is_empty() {
            return;
        }
        self.leave_focused();
        let len = self.focus_order.len() as i64;
        self.focus = (self.focus as i64 + delta).rem_euclid(len) as usize;
    }

    /// Move focus to a named field, running focus-out handling on the field
    /// that loses it.
    pub fn focus(&mut self, name: &str) -> bool {
        let Some(target) = self.focus_position(name) else {
            return false;
        };
        if target != self.focus {
            self.leave_focused();
            self.focus = target;
        }
        true
    }

    fn focus_position(&self, name: &str) -> Option<usize> {
        let index = self.index_of(name)?;
        self.focus_order.iter().position(|entry| *entry == index)
    }

    /// Programmatic focus that does not count as the user leaving a field.
    fn place_focus(&mut self, name: Option<&str>) {
        if let Some(position) = name.and_then(|name| self.focus_position(name)) {
            self.focus = position;
        }
    }

    fn leave_focused(&mut self) {
        let Some(index) = self.focused_index() else {
            return;
        };
        if let Some((var, value)) = self.fields[index].focus_out() {
            self.publish(&var, value);
        }
    }

    /// Write into a bound variable and deliver the change to its subscribers.
    pub fn publish(&mut self, var: &str, value: f64) {
        for notice in self.bounds.publish(var, value) {
            if let Some(field) = self.fields.get_mut(notice.field) {
                debug!(
                    var,
                    value,
                    field = field.name(),
                    role = ?notice.role,
                    "bound variable changed"
                );
                field.apply_bound(notice.role, notice.value);
            }
        }
    }

    /// Force focus-out validation on every field and collect the failures,
    /// keyed by field name in schema order.
    pub fn get_errors(&mut self) -> IndexMap<String, String> {
        let mut errors = IndexMap::new();
        for field in &mut self.fields {
            field.validate();
            if let Some(message) = field.error() {
                errors.insert(field.name().to_string(), message);
            }
        }
        errors
    }

    pub fn get(&self) -> Record {
        self.fields
            .iter()
            .map(|field| (field.name().to_string(), field.get()))
            .collect()
    }

    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> bool {
        match self.field_mut(name) {
            Some(field) => {
                field.set(value);
                true
            }
            None => false,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.fields.iter().any(LabeledField::is_dirty)
    }

    pub fn error_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|field| field.error().is_some())
            .count()
    }

    /// Clear the form for the next record.
    ///
    /// While the sequence field has a next allowed value, the retained fields
    /// are restored and the sequence advances; otherwise everything stays
    /// cleared and focus returns to the first field of a session.
    pub fn reset(&mut self, today: NaiveDate) {
        let rules = self.schema.session.clone();
        let retained: Vec<(String, FieldValue)> = rules
            .retained
            .iter()
            .filter_map(|name| self.field(name).map(|field| (name.clone(), field.get())))
            .collect();
        let sequence = rules.sequence_field.as_deref().and_then(|name| {
            let field = self.field(name)?;
            let values = field.choices().map(<[String]>::to_vec).unwrap_or_default();
            Some((name.to_string(), field.text().to_string(), values))
        });

        for field in &mut self.fields {
            field.clear();
        }
        self.bounds.clear();

        if let Some(date_field) = rules.date_field.as_deref() {
            self.set(date_field, today.format(ISO_DATE_FORMAT).to_string());
        }
        self.place_focus(rules.first_focus.as_deref());

        let next = sequence.and_then(|(name, current, values)| {
            let position = values.iter().position(|value| *value == current)?;
            values.get(position + 1).map(|next| (name, next.clone()))
        });
        match next {
            Some((name, next)) => {
                for (field, value) in retained {
                    self.set(&field, value);
                }
                info!(field = %name, next = %next, "continuing sequential entry");
                self.set(&name, next);
                self.place_focus(rules.continue_focus.as_deref());
            }
            None => info!("form cleared for a new session"),
        }

        for field in &mut self.fields {
            field.mark_clean();
        }
    }
}
