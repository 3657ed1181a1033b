use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::FieldType;

/// Declarative description of one form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default = "default_required", alias = "req")]
    pub required: bool,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, alias = "increment", skip_serializing_if = "Option::is_none")]
    pub inc: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    /// Display label; the field name is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "FieldLinks::is_empty")]
    pub links: FieldLinks,
}

fn default_required() -> bool {
    true
}

/// Bound-variable wiring between numeric fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldLinks {
    /// Variable whose value becomes this field's live minimum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_var: Option<String>,
    /// Variable whose value becomes this field's live maximum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_var: Option<String>,
    /// Variable that receives this field's value after a clean focus loss.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<String>,
}

impl FieldLinks {
    pub fn is_empty(&self) -> bool {
        self.min_var.is_none() && self.max_var.is_none() && self.publish.is_none()
    }
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            required: true,
            field_type,
            min: None,
            max: None,
            inc: None,
            values: None,
            label: None,
            links: FieldLinks::default(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_increment(mut self, inc: f64) -> Self {
        self.inc = Some(inc);
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_links(mut self, links: FieldLinks) -> Self {
        self.links = links;
        self
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SectionSpec {
    pub title: String,
    pub fields: Vec<String>,
}

impl SectionSpec {
    pub fn new<I, S>(title: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// Rules for carrying values across a reset during sequential entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SessionRules {
    /// Field set to today's date on reset.
    pub date_field: Option<String>,
    /// Choice field whose value advances to the next allowed entry.
    pub sequence_field: Option<String>,
    /// Fields restored after a reset while the sequence continues.
    pub retained: Vec<String>,
    /// Focus target after a reset that starts a new session.
    pub first_focus: Option<String>,
    /// Focus target after a reset that continues the sequence.
    pub continue_focus: Option<String>,
}

impl SessionRules {
    /// Sequential plot entry within one lab session.
    pub fn abq() -> Self {
        Self {
            date_field: Some("Date".to_string()),
            sequence_field: Some("Plot".to_string()),
            retained: vec![
                "Lab".to_string(),
                "Time".to_string(),
                "Technician".to_string(),
            ],
            first_focus: Some("Time".to_string()),
            continue_focus: Some("Seed sample".to_string()),
        }
    }

    fn referenced_fields(&self) -> impl Iterator<Item = &String> {
        self.date_field
            .iter()
            .chain(self.sequence_field.iter())
            .chain(self.retained.iter())
            .chain(self.first_focus.iter())
            .chain(self.continue_focus.iter())
    }
}

/// The form's schema: ordered fields, their grouping and reset rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormSchema {
    #[serde(default)]
    pub title: Option<String>,
    pub fields: Vec<FieldSpec>,
    pub sections: Vec<SectionSpec>,
    #[serde(default)]
    pub session: SessionRules,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),
    #[error("section '{section}' references unknown field '{field}'")]
    UnknownSectionField { section: String, field: String },
    #[error("field '{0}' is placed in more than one section")]
    FieldInSeveralSections(String),
    #[error("field '{0}' is not placed in any section")]
    UnplacedField(String),
    #[error("field '{0}' has a minimum above its maximum")]
    InvertedRange(String),
    #[error("field '{0}' has a non-positive increment")]
    BadIncrement(String),
    #[error("field '{0}' is a choice field without allowed values")]
    MissingValues(String),
    #[error("session rules reference unknown field '{0}'")]
    UnknownSessionField(String),
    #[error("schema has no fields")]
    Empty,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldSpec>, sections: Vec<SectionSpec>) -> Self {
        Self {
            title: None,
            fields,
            sections,
            session: SessionRules::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_session(mut self, session: SessionRules) -> Self {
        self.session = session;
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Column order of saved records.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|field| field.name.clone()).collect()
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut names = HashSet::new();
        for field in &self.fields {
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
            if let (Some(min), Some(max)) = (field.min, field.max)
                && min > max
            {
                return Err(SchemaError::InvertedRange(field.name.clone()));
            }
            if field.inc.is_some_and(|inc| inc <= 0.0 || !inc.is_finite()) {
                return Err(SchemaError::BadIncrement(field.name.clone()));
            }
            if field.field_type == FieldType::StringList
                && field.values.as_ref().is_none_or(|values| values.is_empty())
            {
                return Err(SchemaError::MissingValues(field.name.clone()));
            }
        }

        let mut placed = HashSet::new();
        for section in &self.sections {
            for name in &section.fields {
                if !names.contains(name.as_str()) {
                    return Err(SchemaError::UnknownSectionField {
                        section: section.title.clone(),
                        field: name.clone(),
                    });
                }
                if !placed.insert(name.as_str()) {
                    return Err(SchemaError::FieldInSeveralSections(name.clone()));
                }
            }
        }
        if let Some(field) = self
            .fields
            .iter()
            .find(|field| !placed.contains(field.name.as_str()))
        {
            return Err(SchemaError::UnplacedField(field.name.clone()));
        }

        if let Some(name) = self
            .session
            .referenced_fields()
            .find(|name| !names.contains(name.as_str()))
        {
            return Err(SchemaError::UnknownSessionField(name.clone()));
        }
        Ok(())
    }

    /// The ABQ laboratory observation form.
    pub fn abq() -> Self {
        let height = |name: &str, label: &str, links: FieldLinks| {
            FieldSpec::new(name, FieldType::Decimal)
                .with_label(label)
                .with_range(0.0, 1000.0)
                .with_increment(0.01)
                .with_links(links)
        };

        let fields = vec![
            FieldSpec::new("Date", FieldType::IsoDateString),
            FieldSpec::new("Time", FieldType::StringList)
                .with_values(["08:00", "12:00", "16:00", "20:00"]),
            FieldSpec::new("Technician", FieldType::String),
            FieldSpec::new("Lab", FieldType::StringList).with_values(["A", "B", "C", "D", "E"]),
            FieldSpec::new("Plot", FieldType::StringList)
                .with_values((1..=20).map(|plot| plot.to_string())),
            FieldSpec::new("Seed sample", FieldType::String),
            FieldSpec::new("Humidity", FieldType::Decimal)
                .with_label("Humidity (g/m³)")
                .with_range(0.5, 52.0)
                .with_increment(0.01),
            FieldSpec::new("Light", FieldType::Decimal)
                .with_label("Light (klx)")
                .with_range(0.0, 100.0)
                .with_increment(0.01),
            FieldSpec::new("Temperature", FieldType::Decimal)
                .with_label("Temperature (°C)")
                .with_range(4.0, 40.0)
                .with_increment(0.01),
            FieldSpec::new("Equipment Fault", FieldType::Boolean).optional(),
            FieldSpec::new("Plants", FieldType::Integer).with_range(0.0, 20.0),
            FieldSpec::new("Blossoms", FieldType::Integer).with_range(0.0, 1000.0),
            FieldSpec::new("Fruit", FieldType::Integer).with_range(0.0, 1000.0),
            height(
                "Minimum Height",
                "Minimum Height (cm)",
                FieldLinks {
                    min_var: None,
                    max_var: Some("max_height".to_string()),
                    publish: Some("min_height".to_string()),
                },
            ),
            height(
                "Maximum Height",
                "Maximum Height (cm)",
                FieldLinks {
                    min_var: Some("min_height".to_string()),
                    max_var: None,
                    publish: Some("max_height".to_string()),
                },
            ),
            height(
                "Median Height",
                "Median Height (cm)",
                FieldLinks {
                    min_var: Some("min_height".to_string()),
                    max_var: Some("max_height".to_string()),
                    publish: None,
                },
            ),
            FieldSpec::new("Notes", FieldType::LongString).optional(),
        ];

        let sections = vec![
            SectionSpec::new(
                "Record Information",
                ["Date", "Time", "Technician", "Lab", "Plot", "Seed sample"],
            ),
            SectionSpec::new(
                "Environment Data",
                ["Humidity", "Light", "Temperature", "Equipment Fault"],
            ),
            SectionSpec::new(
                "Plant Data",
                [
                    "Plants",
                    "Blossoms",
                    "Fruit",
                    "Minimum Height",
                    "Maximum Height",
                    "Median Height",
                ],
            ),
            SectionSpec::new("Notes", ["Notes"]),
        ];

        Self {
            title: Some("ABQ Data Entry Application".to_string()),
            fields,
            sections,
            session: SessionRules::abq(),
        }
    }
}
