#![deny(rust_2018_idioms)]

mod app;
pub mod domain;
pub mod form;
mod presentation;
pub mod schema;
pub mod store;

pub use app::{DataEntryApp, READY_STATUS, SessionState, UiOptions};
pub use domain::{FieldSpec, FieldType, FieldValue, FormSchema, Record};
pub use form::{FieldError, LabeledField, RecordForm};
pub use store::{DEFAULT_PREFIX, RecordStore, StoreError};

pub mod prelude {
    pub use super::{DataEntryApp, FormSchema, RecordForm, RecordStore, UiOptions};
}
