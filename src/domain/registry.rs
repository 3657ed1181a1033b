use std::fmt;

use schemars::{JsonSchema, r#gen::SchemaGenerator, schema::Schema};
use serde::{Deserialize, Serialize};

/// Declared kind of a form field.
///
/// Tags are parsed leniently: anything unrecognised falls back to
/// [`FieldType::String`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    #[default]
    String,
    StringList,
    IsoDateString,
    LongString,
    Decimal,
    Integer,
    Boolean,
}

impl FieldType {
    pub const ALL: [FieldType; 7] = [
        FieldType::String,
        FieldType::StringList,
        FieldType::IsoDateString,
        FieldType::LongString,
        FieldType::Decimal,
        FieldType::Integer,
        FieldType::Boolean,
    ];

    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "string_list" => FieldType::StringList,
            "iso_date_string" => FieldType::IsoDateString,
            "long_string" => FieldType::LongString,
            "decimal" => FieldType::Decimal,
            "integer" => FieldType::Integer,
            "boolean" => FieldType::Boolean,
            _ => FieldType::String,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::StringList => "string_list",
            FieldType::IsoDateString => "iso_date_string",
            FieldType::LongString => "long_string",
            FieldType::Decimal => "decimal",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
        }
    }
}

/// Documents may carry any tag; unknown ones fall back to `string`.
impl JsonSchema for FieldType {
    fn schema_name() -> String {
        "FieldType".to_string()
    }

    fn is_referenceable() -> bool {
        false
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        String::json_schema(generator)
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        FieldType::from_tag(&tag)
    }
}

impl From<FieldType> for String {
    fn from(kind: FieldType) -> Self {
        kind.tag().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Input control built for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    RequiredText,
    Choice,
    Date,
    LongText,
    Numeric,
    Toggle,
}

/// Type of the value backing a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Decimal,
    Integer,
    Boolean,
    /// No backing variable; content is read straight from the control.
    Unbacked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBinding {
    pub control: ControlKind,
    pub value: ValueKind,
}

const FIELD_TYPES: [(FieldType, FieldBinding); 7] = [
    (
        FieldType::String,
        FieldBinding {
            control: ControlKind::RequiredText,
            value: ValueKind::Text,
        },
    ),
    (
        FieldType::StringList,
        FieldBinding {
            control: ControlKind::Choice,
            value: ValueKind::Text,
        },
    ),
    (
        FieldType::IsoDateString,
        FieldBinding {
            control: ControlKind::Date,
            value: ValueKind::Text,
        },
    ),
    (
        FieldType::LongString,
        FieldBinding {
            control: ControlKind::LongText,
            value: ValueKind::Unbacked,
        },
    ),
    (
        FieldType::Decimal,
        FieldBinding {
            control: ControlKind::Numeric,
            value: ValueKind::Decimal,
        },
    ),
    (
        FieldType::Integer,
        FieldBinding {
            control: ControlKind::Numeric,
            value: ValueKind::Integer,
        },
    ),
    (
        FieldType::Boolean,
        FieldBinding {
            control: ControlKind::Toggle,
            value: ValueKind::Boolean,
        },
    ),
];

const DEFAULT_BINDING: FieldBinding = FIELD_TYPES[0].1;

/// Look up the control and backing value type for a field type.
pub fn resolve(field_type: FieldType) -> FieldBinding {
    FIELD_TYPES
        .iter()
        .find(|(kind, _)| *kind == field_type)
        .map(|(_, binding)| *binding)
        .unwrap_or(DEFAULT_BINDING)
}

/// Same as [`resolve`] but starting from a raw tag.
pub fn resolve_tag(tag: &str) -> FieldBinding {
    resolve(FieldType::from_tag(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_type_has_exactly_one_binding() {
        for kind in FieldType::ALL {
            let hits = FIELD_TYPES.iter().filter(|(entry, _)| *entry == kind).count();
            assert_eq!(hits, 1, "{kind} should be registered once");
        }
        assert_eq!(FIELD_TYPES.len(), FieldType::ALL.len());
    }

    #[test]
    fn unknown_tag_falls_back_to_plain_string() {
        assert_eq!(FieldType::from_tag("colour"), FieldType::String);
        assert_eq!(resolve_tag("colour"), resolve(FieldType::String));
        assert_eq!(resolve_tag("colour").control, ControlKind::RequiredText);
    }

    #[test]
    fn numeric_tags_share_a_control_but_not_a_value_type() {
        let decimal = resolve(FieldType::Decimal);
        let integer = resolve(FieldType::Integer);
        assert_eq!(decimal.control, ControlKind::Numeric);
        assert_eq!(integer.control, ControlKind::Numeric);
        assert_eq!(decimal.value, ValueKind::Decimal);
        assert_eq!(integer.value, ValueKind::Integer);
    }

    #[test]
    fn long_text_has_no_backing_variable() {
        assert_eq!(resolve(FieldType::LongString).value, ValueKind::Unbacked);
    }

    #[test]
    fn tags_round_trip_through_strings() {
        for kind in FieldType::ALL {
            assert_eq!(FieldType::from(String::from(kind)), kind);
        }
    }
}
