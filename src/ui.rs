use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use crate::form::{Errors, FieldKind, FieldSpec, Values};

pub struct UiContext<'a> {
    pub title: Option<&'a str>,
    pub fields: &'a [FieldSpec],
    pub values: &'a Values,
    pub errors: &'a Errors,
    pub focused: usize,
    pub status_message: &'a str,
    pub dirty: bool,
    pub help: Option<&'a str>,
}

pub fn draw(frame: &mut Frame<'_>, ctx: UiContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(frame.area());

    draw_fields(frame, chunks[0], &ctx);
    draw_status(frame, chunks[1], &ctx);
}

fn draw_fields(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let lines = field_lines(ctx, inner_width);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(ctx.title.unwrap_or("Form"));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let mut spans = vec![Span::raw(ctx.status_message.to_string())];
    if let Some(help) = ctx.help {
        spans.push(Span::styled(
            format!("  {help}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let title = if ctx.dirty { "Status*" } else { "Status" };
    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

/// Builds one line per field (plus wrapped error lines underneath), with the
/// focused field marked and bold. Labels align on a shared column.
pub(crate) fn field_lines(ctx: &UiContext<'_>, width: usize) -> Vec<Line<'static>> {
    let label_width = ctx
        .fields
        .iter()
        .map(|field| field.display_label().width())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::new();
    for (index, field) in ctx.fields.iter().enumerate() {
        let focused = index == ctx.focused;
        let marker = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let label = field.display_label();
        let padding = " ".repeat(label_width.saturating_sub(label.width()));
        lines.push(Line::from(vec![
            Span::styled(marker.to_string(), style),
            Span::styled(format!("{label}{padding}"), style),
            Span::raw(" "),
            Span::styled(display_value(field, ctx.values), style),
        ]));
        if let Some(error) = ctx.errors.get(&field.name) {
            for wrapped in textwrap::wrap(error, width.saturating_sub(4).max(16)) {
                lines.push(Line::from(Span::styled(
                    format!("    {wrapped}"),
                    Style::default().fg(Color::Red),
                )));
            }
        }
    }
    lines
}

fn display_value(field: &FieldSpec, values: &Values) -> String {
    let value = values.get(&field.name);
    match field.kind {
        FieldKind::Bool => {
            let on = value.and_then(Value::as_bool).unwrap_or(false);
            if on { "[x]" } else { "[ ]" }.to_string()
        }
        FieldKind::Secret => {
            let len = value
                .and_then(Value::as_str)
                .map(|text| text.chars().count())
                .unwrap_or(0);
            "•".repeat(len)
        }
        FieldKind::Text => match value {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::form::FormState;

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("email", "Email").with_initial("a@b.com"),
            FieldSpec::secret("password", "Password").with_initial("hunter2"),
            FieldSpec::bool("subscribed", "Subscribed"),
        ]
    }

    fn ctx<'a>(
        fields: &'a [FieldSpec],
        values: &'a Values,
        errors: &'a Errors,
        focused: usize,
    ) -> UiContext<'a> {
        UiContext {
            title: None,
            fields,
            values,
            errors,
            focused,
            status_message: "ready",
            dirty: false,
            help: None,
        }
    }

    #[test]
    fn focused_field_is_marked_and_bold() {
        let fields = fields();
        let state = FormState::seeded(&fields);
        let errors = Errors::new();
        let lines = field_lines(&ctx(&fields, state.values(), &errors, 1), 60);
        let marker = lines[1].spans.first().expect("marker span");
        assert_eq!(marker.content.as_ref(), "> ");
        assert!(marker.style.add_modifier.contains(Modifier::BOLD));
        let unfocused = lines[0].spans.first().expect("marker span");
        assert_eq!(unfocused.content.as_ref(), "  ");
    }

    #[test]
    fn secret_values_render_masked() {
        let fields = fields();
        let state = FormState::seeded(&fields);
        let errors = Errors::new();
        let lines = field_lines(&ctx(&fields, state.values(), &errors, 0), 60);
        let value_span = lines[1].spans.last().expect("value span");
        assert_eq!(value_span.content.as_ref(), "•••••••");
    }

    #[test]
    fn bool_values_render_as_checkboxes() {
        let fields = fields();
        let mut state = FormState::seeded(&fields);
        let errors = Errors::new();
        {
            let lines = field_lines(&ctx(&fields, state.values(), &errors, 0), 60);
            assert_eq!(lines[2].spans.last().expect("value").content.as_ref(), "[ ]");
        }
        state.set_value("subscribed", json!(true));
        let lines = field_lines(&ctx(&fields, state.values(), &errors, 0), 60);
        assert_eq!(lines[2].spans.last().expect("value").content.as_ref(), "[x]");
    }

    #[test]
    fn error_lines_follow_their_field_in_red() {
        let fields = fields();
        let state = FormState::seeded(&fields);
        let mut errors = Errors::new();
        errors.insert("email".to_string(), "must look like an email".to_string());
        let lines = field_lines(&ctx(&fields, state.values(), &errors, 0), 60);
        let error_span = lines[1].spans.first().expect("error span");
        assert_eq!(error_span.style.fg, Some(Color::Red));
        assert!(error_span.content.contains("must look like an email"));
    }

    #[test]
    fn long_errors_wrap_to_the_given_width() {
        let fields = fields();
        let state = FormState::seeded(&fields);
        let mut errors = Errors::new();
        errors.insert(
            "email".to_string(),
            "this error message is far too long to fit on a single narrow line".to_string(),
        );
        let narrow = field_lines(&ctx(&fields, state.values(), &errors, 0), 30);
        let wide = field_lines(&ctx(&fields, state.values(), &errors, 0), 120);
        assert!(narrow.len() > wide.len());
    }
}
