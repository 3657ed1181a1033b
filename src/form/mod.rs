pub mod bound;
mod error;
pub mod field;
mod section;
mod state;

pub use bound::{BoundNotice, BoundRegistry, BoundRole};
pub use error::FieldError;
pub use field::LabeledField;
pub use section::SectionState;
pub use state::RecordForm;
