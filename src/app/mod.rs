mod data_entry;
mod dialog;
mod input;
mod keymap;
mod options;
mod runtime;
mod session;
mod status;
mod terminal;

pub use data_entry::DataEntryApp;
pub use options::UiOptions;
pub use session::SessionState;
pub use status::READY_STATUS;
