use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

use crate::{domain::FormSchema, form::RecordForm};

use super::{options::UiOptions, runtime::App, session::SessionState};

/// Entry point for the interactive form: build it from a schema, then `run`.
#[derive(Debug)]
pub struct DataEntryApp {
    schema: FormSchema,
    title: Option<String>,
    options: UiOptions,
}

impl Default for DataEntryApp {
    fn default() -> Self {
        Self::new(FormSchema::abq())
    }
}

impl DataEntryApp {
    pub fn new(schema: FormSchema) -> Self {
        Self {
            schema,
            title: None,
            options: UiOptions::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &UiOptions {
        &self.options
    }

    /// Run the form until the user quits; returns what the session saved.
    pub fn run(self) -> Result<SessionState> {
        let DataEntryApp {
            schema,
            title,
            options,
        } = self;

        let title = title
            .or_else(|| schema.title.clone())
            .unwrap_or_else(|| "Data Entry".to_string());
        let mut form = RecordForm::from_schema(schema).context("invalid form schema")?;
        form.reset(Local::now().date_naive());
        info!(
            %title,
            output_dir = %options.output_dir.display(),
            prefix = %options.file_prefix,
            "starting data entry session"
        );

        let mut app = App::new(form, title, options);
        app.run()
    }
}
