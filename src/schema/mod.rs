mod format;
mod loader;

pub use format::DocumentFormat;
pub use loader::{
    default_schema_path, document_schema, load_schema, parse_document_str, parse_schema_str,
    resolve_schema, schema_from_value,
};
