use crate::presentation::DialogRender;

/// Modal error notice shown over the form until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ErrorDialog {
    title: String,
    message: String,
    detail: Vec<String>,
}

impl ErrorDialog {
    pub(crate) fn cannot_save<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            title: "Form Error".to_string(),
            message: "Cannot save record".to_string(),
            detail: fields
                .into_iter()
                .map(|field| format!(" * {field}"))
                .collect(),
        }
    }

    pub(crate) fn store_failure(error: &str) -> Self {
        Self {
            title: "Save Error".to_string(),
            message: "Cannot save record".to_string(),
            detail: vec![error.to_string()],
        }
    }

    pub(crate) fn detail(&self) -> &[String] {
        &self.detail
    }

    pub(crate) fn as_render(&self) -> DialogRender<'_> {
        DialogRender {
            title: &self.title,
            message: &self.message,
            detail: &self.detail,
        }
    }
}
