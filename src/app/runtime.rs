use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::layout::Rect;
use tracing::{error, info, warn};

use crate::{
    form::RecordForm,
    presentation::{self, UiContext},
    store::RecordStore,
};

use super::{
    dialog::ErrorDialog,
    input::{self, EditKey, KeyAction, KeyCommand},
    keymap::{self, KeymapContext},
    options::UiOptions,
    session::SessionState,
    status::StatusLine,
    terminal::TerminalGuard,
};

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) struct App {
    form: RecordForm,
    title: String,
    options: UiOptions,
    status: StatusLine,
    session: SessionState,
    dialog: Option<ErrorDialog>,
    exit_armed: bool,
    should_quit: bool,
    clock: fn() -> NaiveDate,
}

impl App {
    pub fn new(form: RecordForm, title: impl Into<String>, options: UiOptions) -> Self {
        Self {
            form,
            title: title.into(),
            options,
            status: StatusLine::new(),
            session: SessionState::new(),
            dialog: None,
            exit_armed: false,
            should_quit: false,
            clock: local_today,
        }
    }

    pub fn run(&mut self) -> Result<SessionState> {
        let mut terminal = TerminalGuard::new()?;
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.handle_key(key)?,
                Event::Resize(width, height) => {
                    terminal.resize(Rect::new(0, 0, width, height))?;
                }
                Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }
        info!(records = self.session.records_saved, "session finished");
        Ok(self.session)
    }

    fn context(&self) -> KeymapContext {
        if self.dialog.is_some() {
            KeymapContext::Dialog
        } else {
            KeymapContext::Form
        }
    }

    fn current_help_text(&self) -> Option<String> {
        if !self.options.show_help {
            return None;
        }
        keymap::help_text(self.context())
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let help = self.current_help_text();
        presentation::draw(
            frame,
            UiContext {
                title: &self.title,
                form: &self.form,
                status_message: self.status.message(),
                dirty: self.form.is_dirty(),
                error_count: self.form.error_count(),
                records_saved: self.session.records_saved,
                help: help.as_deref(),
                dialog: self.dialog.as_ref().map(ErrorDialog::as_render),
            },
        );
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        match input::classify(self.context(), &key) {
            KeyCommand::Action(action) => self.handle_action(action),
            KeyCommand::Edit(edit) => self.handle_edit(edit),
            KeyCommand::None => {}
        }
        Ok(())
    }

    fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Save => self.on_save(),
            KeyAction::Quit => self.on_exit(),
            KeyAction::ResetForm => {
                self.exit_armed = false;
                self.form.reset((self.clock)());
                self.status.form_reset();
            }
            KeyAction::ResetStatus => {
                self.exit_armed = false;
                self.status.ready();
            }
            KeyAction::DismissDialog => self.dialog = None,
            KeyAction::FocusStep(delta) => self.move_focus(delta),
            KeyAction::ValueStep(delta) => {
                let steps = self
                    .form
                    .focused_field()
                    .is_some_and(|field| field.steps_value());
                if steps {
                    let changed = self
                        .form
                        .focused_field_mut()
                        .is_some_and(|field| field.step(delta));
                    self.after_edit(changed);
                } else {
                    // Up moves to the previous field.
                    self.move_focus(-delta);
                }
            }
            KeyAction::Toggle => {
                let is_boolean = self
                    .form
                    .focused_field()
                    .is_some_and(|field| field.is_boolean());
                if is_boolean {
                    let changed = self
                        .form
                        .focused_field_mut()
                        .is_some_and(|field| field.toggle());
                    self.after_edit(changed);
                } else {
                    self.handle_edit(EditKey::Char(' '));
                }
            }
            KeyAction::Confirm => {
                let multiline = self
                    .form
                    .focused_field()
                    .is_some_and(|field| field.accepts_newlines());
                if multiline {
                    self.handle_edit(EditKey::Char('\n'));
                } else {
                    self.move_focus(1);
                }
            }
        }
    }

    fn handle_edit(&mut self, edit: EditKey) {
        let Some(field) = self.form.focused_field_mut() else {
            return;
        };
        let changed = match edit {
            EditKey::Char(ch) => field.insert_char(ch),
            EditKey::Backspace => field.backspace(),
            EditKey::Delete => field.delete(),
            EditKey::Left => {
                field.move_cursor(-1);
                false
            }
            EditKey::Right => {
                field.move_cursor(1);
                false
            }
            EditKey::Home => {
                field.cursor_home();
                false
            }
            EditKey::End => {
                field.cursor_end();
                false
            }
        };
        self.after_edit(changed);
    }

    fn after_edit(&mut self, changed: bool) {
        if !changed {
            return;
        }
        self.exit_armed = false;
        if let Some(field) = self.form.focused_field() {
            self.status.editing(field.label());
        }
    }

    fn move_focus(&mut self, delta: i32) {
        if delta < 0 {
            self.form.focus_prev();
        } else {
            self.form.focus_next();
        }
    }

    fn on_save(&mut self) {
        self.exit_armed = false;
        let errors = self.form.get_errors();
        if !errors.is_empty() {
            let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
            warn!(?fields, "save blocked by field errors");
            self.status.save_blocked(fields.iter().copied());
            self.dialog = Some(ErrorDialog::cannot_save(fields));
            return;
        }

        let today = (self.clock)();
        let record = self.form.get();
        let store = RecordStore::daily(
            &self.options.output_dir,
            &self.options.file_prefix,
            today,
            self.form.schema().field_names(),
        );
        match store.save_record(&record) {
            Ok(()) => {
                let count = self.session.record_saved();
                info!(path = %store.path().display(), count, "record saved");
                self.status.records_saved(count);
                self.form.reset(today);
            }
            Err(err) => {
                error!(error = %err, "failed to save record");
                let message = err.to_string();
                self.status.save_failed(&message);
                self.dialog = Some(ErrorDialog::store_failure(&message));
            }
        }
    }

    fn on_exit(&mut self) {
        if self.options.confirm_exit && self.form.is_dirty() && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        self.should_quit = true;
    }
}


#[cfg(test)]
impl App {
    pub(crate) fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub(crate) fn form_mut_for_test(&mut self) -> &mut RecordForm {
        &mut self.form
    }

    pub(crate) fn handle_key_for_test(&mut self, key: KeyEvent) -> Result<()> {
        self.handle_key(key)
    }
}
