//! TUI renderer
//!
//! Draws the current draft, errors, preview status and entry list. Pure over
//! [`FormApp`] so it can be exercised with a `TestBackend`.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use super::app::{Focus, FormApp, StatusKind};
use crate::core::{EntryPersistence, FieldName, Gender, Preview, SKILL_OPTIONS};

const HELP: &str = "Tab/Shift-Tab move · Space toggle · Enter confirm · Ctrl-S register · d delete · Esc quit";

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn error_line(message: Option<&str>) -> Option<Line<'static>> {
    message.map(|msg| {
        Line::from(Span::styled(
            format!("    {}", msg),
            Style::default().fg(Color::Red),
        ))
    })
}

fn describe_preview(preview: &Preview) -> String {
    let kb = preview.decoded_len() as f64 / 1024.0;
    format!(
        "{} ({:.1} KB)",
        preview.mime_type().unwrap_or("unknown"),
        kb
    )
}

/// Draw the whole screen
pub fn draw<P: EntryPersistence>(frame: &mut Frame, app: &FormApp<P>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let title = Paragraph::new(Line::from(Span::styled(
        "Candidate Registration",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    draw_form(frame, app, columns[0]);
    draw_entries(frame, app, columns[1]);

    if let Some(status) = app.status() {
        let color = match status.kind {
            StatusKind::Info => Color::Blue,
            StatusKind::Success => Color::Green,
            StatusKind::Error => Color::Red,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(status.text.clone(), Style::default().fg(color))),
            rows[2],
        );
    }

    frame.render_widget(
        Paragraph::new(Span::styled(HELP, Style::default().fg(Color::DarkGray))),
        rows[3],
    );
}

fn draw_form<P: EntryPersistence>(frame: &mut Frame, app: &FormApp<P>, area: Rect) {
    let form = app.registry().form();
    let draft = form.draft();
    let errors = form.errors();
    let focus = app.focus();
    let mut lines: Vec<Line> = Vec::new();

    let text_fields = [
        (Focus::FullName, FieldName::FullName, draft.full_name.as_str()),
        (Focus::Email, FieldName::Email, draft.email.as_str()),
        (Focus::Phone, FieldName::Phone, draft.phone.as_str()),
    ];
    for (field_focus, field, value) in text_fields {
        let focused = focus == field_focus;
        let cursor = if focused { "▏" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", field.label()), focus_style(focused)),
            Span::raw(format!("{}{}", value, cursor)),
        ]));
        lines.extend(error_line(errors.get(field)));
    }

    let mut gender_spans = vec![Span::styled(
        "Gender: ",
        focus_style(focus == Focus::Gender),
    )];
    for gender in Gender::ALL {
        let mark = if draft.gender == Some(gender) { "(•)" } else { "( )" };
        gender_spans.push(Span::raw(format!("{} {}  ", mark, gender)));
    }
    lines.push(Line::from(gender_spans));
    lines.extend(error_line(errors.get(FieldName::Gender)));

    let mut skill_spans = vec![Span::styled(
        "Skills: ",
        focus_style(focus == Focus::Skills),
    )];
    for (i, skill) in SKILL_OPTIONS.into_iter().enumerate() {
        let mark = if draft.skills.contains(skill) { "[x]" } else { "[ ]" };
        let style = if focus == Focus::Skills && i == app.skill_cursor() {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        skill_spans.push(Span::styled(format!("{} {}", mark, skill), style));
        skill_spans.push(Span::raw("  "));
    }
    lines.push(Line::from(skill_spans));
    lines.extend(error_line(errors.get(FieldName::Skills)));

    let picture_focused = focus == Focus::ProfilePic;
    let picture_text = if picture_focused || draft.profile_pic.is_none() {
        format!(
            "{}{}",
            app.picture_input(),
            if picture_focused { "▏" } else { "" }
        )
    } else {
        draft
            .profile_pic
            .as_ref()
            .map(|pic| pic.file_name())
            .unwrap_or_default()
    };
    lines.push(Line::from(vec![
        Span::styled("Profile Picture: ", focus_style(picture_focused)),
        Span::raw(picture_text),
    ]));
    lines.extend(error_line(errors.get(FieldName::ProfilePic)));

    let preview_text = match (form.preview(), draft.profile_pic.is_some()) {
        (Some(preview), _) => describe_preview(preview),
        (None, true) if app.preview_loading() => "loading…".to_string(),
        (None, true) => "unavailable".to_string(),
        (None, false) => "none".to_string(),
    };
    lines.push(Line::from(vec![
        Span::styled("Image Preview: ", Style::default().fg(Color::DarkGray)),
        Span::raw(preview_text),
    ]));

    lines.push(Line::raw(""));
    let register_style = if focus == Focus::Register {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    lines.push(Line::from(Span::styled("[ Register ]", register_style)));

    let block = Block::default().borders(Borders::ALL).title(" Form ");
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_entries<P: EntryPersistence>(frame: &mut Frame, app: &FormApp<P>, area: Rect) {
    let entries = app.registry().entries();
    let focused = app.focus() == Focus::Entries;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(focused))
        .title(format!(" Registered Candidates ({}) ", entries.len()));

    if entries.is_empty() {
        frame.render_widget(Paragraph::new("No entries yet.").block(block), area);
        return;
    }

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let picture = match (&entry.profile_pic, &entry.preview) {
                (Some(name), Some(preview)) => format!("{} · {}", name, describe_preview(preview)),
                (Some(name), None) => format!("{} · no preview", name),
                (None, _) => "no picture".to_string(),
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        entry.full_name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  #{}", entry.id),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::raw(format!("  {} · {}", entry.email, entry.phone)),
                Line::raw(format!("  {} · {}", entry.gender, entry.skills.joined())),
                Line::raw(format!("  {}", picture)),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if focused {
        state.select(Some(app.selected_entry()));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
