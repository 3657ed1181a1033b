use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};
use textwrap::wrap;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    domain::{ControlKind, format_bound},
    form::{LabeledField, RecordForm},
};

use super::{DialogRender, UiContext};

pub fn render_header(frame: &mut Frame<'_>, area: Rect, title: &str) {
    let header = Paragraph::new(Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

pub fn render_body(frame: &mut Frame<'_>, area: Rect, form: &RecordForm, enable_cursor: bool) {
    if form.sections().is_empty() {
        let placeholder = Paragraph::new("No fields in schema")
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(placeholder, area);
        return;
    }

    let section_index = focused_section(form);
    if form.sections().len() > 1 {
        let body_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);
        render_tabs(frame, body_chunks[0], form, section_index);
        render_fields(frame, body_chunks[1], form, section_index, enable_cursor);
    } else {
        render_fields(frame, area, form, section_index, enable_cursor);
    }
}

pub fn render_footer(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let mut status = ctx.status_message.to_string();
    if ctx.dirty {
        status.push_str(" • unsaved changes");
    }
    if ctx.error_count > 0 {
        status.push_str(&format!(" • {} error(s)", ctx.error_count));
    }
    if ctx.records_saved > 0 {
        status.push_str(&format!(" • saved: {}", ctx.records_saved));
    }
    if let Some(focused) = ctx.form.focused_field() {
        status.push_str(" • focus: ");
        status.push_str(focused.label());
    }

    let status_widget = Paragraph::new(status)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status_widget, chunks[0]);

    let help_text = ctx.help.unwrap_or(" ");
    let help_widget = Paragraph::new(help_text.to_string())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Actions"));
    frame.render_widget(help_widget, chunks[1]);
}

pub fn render_dialog(frame: &mut Frame<'_>, dialog: DialogRender<'_>) {
    let area = frame.area();
    let width = area.width.saturating_sub(4).clamp(1, 60);
    let text_width = width.saturating_sub(4).max(1) as usize;

    let mut lines = vec![Line::from(Span::styled(
        dialog.message.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for entry in dialog.detail {
        for segment in wrap(entry, text_width) {
            lines.push(Line::from(segment.into_owned()));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter/Esc to close",
        Style::default().fg(Color::Gray),
    )));

    let height = (lines.len() as u16)
        .saturating_add(2)
        .min(area.height.max(3));
    let popup = popup_rect(area, width, height);
    frame.render_widget(Clear, popup);
    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(dialog.title.to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(widget, popup);
}

fn focused_section(form: &RecordForm) -> usize {
    form.focused_index()
        .and_then(|index| {
            form.sections()
                .iter()
                .position(|section| section.fields.contains(&index))
        })
        .unwrap_or(0)
}

fn render_tabs(frame: &mut Frame<'_>, area: Rect, form: &RecordForm, selected: usize) {
    let titles: Vec<Line<'static>> = form
        .sections()
        .iter()
        .map(|section| {
            let failing = section
                .fields
                .iter()
                .filter_map(|index| form.field_at(*index))
                .any(LabeledField::has_error_indicator);
            if failing {
                Line::from(Span::styled(
                    format!("{} !", section.title),
                    Style::default().fg(Color::Red),
                ))
            } else {
                Line::from(section.title.clone())
            }
        })
        .collect();
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::ALL).title("Sections"))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_fields(
    frame: &mut Frame<'_>,
    area: Rect,
    form: &RecordForm,
    section_index: usize,
    enable_cursor: bool,
) {
    let Some(section) = form.sections().get(section_index) else {
        return;
    };
    let focused = form.focused_index();
    let content_width = area.width.saturating_sub(6);

    let mut items = Vec::with_capacity(section.fields.len());
    let mut heights = Vec::with_capacity(section.fields.len());
    let mut selected = None;
    let mut cursor_hint = None;
    for index in &section.fields {
        let Some(field) = form.field_at(*index) else {
            continue;
        };
        let is_focused = focused == Some(*index);
        let render = build_field_render(field, is_focused, content_width);
        if is_focused {
            selected = Some(items.len());
            cursor_hint = render.cursor_hint;
        }
        heights.push(render.lines.len());
        items.push(ListItem::new(render.lines));
    }

    let mut list_state = ListState::default();
    list_state.select(selected);
    let list = List::new(items)
        .block(
            Block::default()
                .title(section.title.clone())
                .borders(Borders::ALL),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);

    if !enable_cursor {
        return;
    }
    if let (Some(position), Some(hint)) = (selected, cursor_hint) {
        let offset = list_state.offset().min(position);
        let above: usize = heights[offset..position].iter().sum();
        let line = (above + hint.line_offset).min(area.height.saturating_sub(2) as usize) as u16;
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(2)
            .saturating_add(2)
            .saturating_add(hint.column);
        let cursor_y = area.y.saturating_add(1).saturating_add(line);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    let inner = vertical[1];
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(inner.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(inner);
    horizontal[1]
}

struct FieldRender {
    lines: Vec<Line<'static>>,
    cursor_hint: Option<CursorHint>,
}

#[derive(Clone, Copy)]
struct CursorHint {
    line_offset: usize,
    column: u16,
}

fn field_hint(field: &LabeledField) -> Option<String> {
    let spec = field.spec();
    match field.binding().control {
        ControlKind::Date => Some("YYYY-MM-DD".to_string()),
        ControlKind::Choice => field.choices().map(|values| values.join(" / ")),
        ControlKind::Numeric => {
            let min = spec.min.map(format_bound).unwrap_or_else(|| "-inf".into());
            let max = spec.max.map(format_bound).unwrap_or_else(|| "inf".into());
            let step = spec.inc.map(format_bound).unwrap_or_else(|| "1".into());
            Some(format!("{min} .. {max}, step {step}"))
        }
        ControlKind::Toggle => Some("Space to toggle".to_string()),
        ControlKind::RequiredText | ControlKind::LongText => None,
    }
}

fn value_lines(field: &LabeledField, max_width: usize) -> Vec<String> {
    if field.is_boolean() {
        let checked = field.get().truthy();
        return vec![format!("[{}]", if checked { "x" } else { " " })];
    }
    field
        .text()
        .split('\n')
        .map(|line| clamp_value(line, max_width))
        .collect()
}

fn clamp_value(value: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(value) <= max_width {
        return value.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in value.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push('…');
    result
}

fn cursor_position(field: &LabeledField) -> (usize, u16) {
    let before: String = field.text().chars().take(field.cursor()).collect();
    let line = before.matches('\n').count();
    let current = before.rsplit('\n').next().unwrap_or("");
    (line, UnicodeWidthStr::width(current) as u16)
}

fn build_field_render(field: &LabeledField, is_focused: bool, max_width: u16) -> FieldRender {
    let mut lines = Vec::new();
    let mut label = field.label().to_string();
    if field.spec().required && !field.is_boolean() {
        label.push_str(" *");
    }
    let label_style = if is_focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    };
    lines.push(Line::from(Span::styled(label, label_style)));

    let value_color = if field.has_error_indicator() {
        Color::Red
    } else {
        Color::White
    };
    let value_style = if is_focused {
        Style::default()
            .fg(value_color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(value_color)
    };
    let value_line_index = lines.len();
    for segment in value_lines(field, max_width.max(4) as usize) {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(segment, value_style),
        ]));
    }

    if let Some(hint) = field_hint(field) {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                hint,
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    if let Some(error) = field.error() {
        lines.push(Line::from(Span::styled(
            format!("  ⚠ {error}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    let cursor_hint = (is_focused && !field.is_boolean()).then(|| {
        let (line, column) = cursor_position(field);
        CursorHint {
            line_offset: value_line_index + line,
            column,
        }
    });
    FieldRender { lines, cursor_hint }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldSpec, FieldType, FormSchema};
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn long_values_are_clamped_with_an_ellipsis() {
        assert_eq!(clamp_value("abcdef", 10), "abcdef");
        assert_eq!(clamp_value("abcdef", 4), "abc…");
    }

    #[test]
    fn cursor_tracks_lines_in_notes() {
        let mut notes = LabeledField::from_spec(FieldSpec::new("Notes", FieldType::LongString));
        notes.set("one\ntwo");
        assert_eq!(cursor_position(&notes), (1, 3));
        notes.cursor_home();
        assert_eq!(cursor_position(&notes), (0, 0));
    }

    #[test]
    fn toggles_render_as_checkboxes() {
        let mut fault = LabeledField::from_spec(FieldSpec::new("Fault", FieldType::Boolean));
        assert_eq!(value_lines(&fault, 10), ["[ ]"]);
        fault.set(true);
        assert_eq!(value_lines(&fault, 10), ["[x]"]);
    }

    #[test]
    fn numeric_hint_shows_range_and_step() {
        let humidity = LabeledField::from_spec(
            FieldSpec::new("Humidity", FieldType::Decimal)
                .with_range(0.5, 52.0)
                .with_increment(0.01),
        );
        assert_eq!(field_hint(&humidity).as_deref(), Some("0.5 .. 52, step 0.01"));
    }

    #[test]
    fn draws_form_with_dialog() {
        let mut form = RecordForm::from_schema(FormSchema::abq()).expect("form");
        form.get_errors();
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).expect("terminal");
        let detail = vec![" * Date".to_string()];
        terminal
            .draw(|frame| {
                super::super::draw(
                    frame,
                    UiContext {
                        title: "ABQ Data Entry Application",
                        form: &form,
                        status_message: "Cannot save, error in fields: Date",
                        dirty: false,
                        error_count: form.error_count(),
                        records_saved: 0,
                        help: Some("Ctrl+S -> Save record"),
                        dialog: Some(DialogRender {
                            title: "Form Error",
                            message: "Cannot save record",
                            detail: &detail,
                        }),
                    },
                )
            })
            .expect("draw");
        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(content.contains("ABQ Data Entry Application"));
        assert!(content.contains("Cannot save record"));
        assert!(content.contains("Record Information"));
    }
}
