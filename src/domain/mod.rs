mod registry;
mod schema;
mod value;

pub use registry::{ControlKind, FieldBinding, FieldType, ValueKind, resolve, resolve_tag};
pub use schema::{FieldLinks, FieldSpec, FormSchema, SchemaError, SectionSpec, SessionRules};
pub use value::{FieldValue, Record, format_bound, format_decimal};
