#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready. Press Ctrl+S to save the record.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready(&mut self) {
        self.message = READY_STATUS.to_string();
    }

    pub fn editing(&mut self, label: &str) {
        self.message = format!("Editing {label}");
    }

    pub fn save_blocked<'a>(&mut self, fields: impl IntoIterator<Item = &'a str>) {
        let fields = fields.into_iter().collect::<Vec<_>>().join(", ");
        self.message = format!("Cannot save, error in fields: {fields}");
    }

    pub fn records_saved(&mut self, count: usize) {
        self.message = format!("{count} records saved this session");
    }

    pub fn save_failed(&mut self, error: &str) {
        self.message = format!("Failed to save record: {error}");
    }

    pub fn form_reset(&mut self) {
        self.message = "Form reset".to_string();
    }

    pub fn pending_exit(&mut self) {
        self.message = "Unsaved changes. Press Ctrl+Q again to quit without saving.".to_string();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
