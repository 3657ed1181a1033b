use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::form::RecordForm;

use super::components::{render_body, render_dialog, render_footer, render_header};

pub struct UiContext<'a> {
    pub title: &'a str,
    pub form: &'a RecordForm,
    pub status_message: &'a str,
    pub dirty: bool,
    pub error_count: usize,
    pub records_saved: usize,
    pub help: Option<&'a str>,
    pub dialog: Option<DialogRender<'a>>,
}

pub struct DialogRender<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub detail: &'a [String],
}

pub fn draw(frame: &mut Frame<'_>, ctx: UiContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(7),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let cursor_enabled = ctx.dialog.is_none();
    render_header(frame, chunks[0], ctx.title);
    render_body(frame, chunks[1], ctx.form, cursor_enabled);
    render_footer(frame, chunks[2], &ctx);

    if let Some(dialog) = ctx.dialog {
        render_dialog(frame, dialog);
    }
}
