use crate::app::{App, CreateView, DraftField, EditBody, FreeDraft, PromptDraft, PromptField};
use crate::models::EntryContent;
use crate::ui::components::{centered_rect, wrap_body};
use crate::ui::theme::ThemeTokens;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render_create_modal(f: &mut Frame, app: &App, tokens: &ThemeTokens) {
    let Some(modal) = app.create_modal.as_ref() else {
        return;
    };
    // Fade phases render the whole modal dimmed; the view swap itself
    // happens in the runtime tick.
    let dim = modal.is_fading();
    let border = if dim {
        tokens.muted
    } else {
        tokens.border_active
    };

    let area = centered_rect(70, 70, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" New Entry for {} ", modal.date.format("%B %e, %Y")))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    match &modal.view {
        CreateView::Chooser { selected } => render_chooser(f, inner, *selected, tokens, dim),
        CreateView::FreeWrite(draft) => render_free_write(f, inner, draft, tokens, dim),
        CreateView::UsePrompts(draft) => render_prompt_form(f, inner, draft, tokens, dim),
    }
}

fn render_chooser(f: &mut Frame, area: Rect, selected: usize, tokens: &ThemeTokens, dim: bool) {
    let base = if dim {
        Style::default().fg(tokens.muted)
    } else {
        Style::default()
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "How would you like to journal today?",
            base.add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (i, label) in ["Write Freely", "Use Prompts"].iter().enumerate() {
        let marker = if i == selected { "> " } else { "  " };
        let style = if i == selected && !dim {
            Style::default()
                .fg(tokens.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            base
        };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}. {label}", i + 1),
            style,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter: choose  1/2: jump  Esc: close",
        Style::default().fg(tokens.muted),
    )));

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(100)])
        .margin(1)
        .split(area)[0];
    f.render_widget(Paragraph::new(lines), body);
}

fn field_border(active: bool, tokens: &ThemeTokens, dim: bool) -> Style {
    if dim {
        Style::default().fg(tokens.muted)
    } else if active {
        Style::default().fg(tokens.border_active)
    } else {
        Style::default().fg(tokens.border_default)
    }
}

fn render_title_field(f: &mut Frame, area: Rect, title: &str, active: bool, tokens: &ThemeTokens, dim: bool) {
    let block = Block::default()
        .title(" Title ")
        .borders(Borders::ALL)
        .border_style(field_border(active, tokens, dim));
    let text = if title.is_empty() && !active {
        Span::styled("Untitled Entry", Style::default().fg(tokens.muted))
    } else {
        Span::raw(title.to_string())
    };
    f.render_widget(Paragraph::new(Line::from(text)).block(block), area);
}

fn render_free_write(f: &mut Frame, area: Rect, draft: &FreeDraft, tokens: &ThemeTokens, dim: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_title_field(
        f,
        chunks[0],
        &draft.title,
        draft.focus == DraftField::Title,
        tokens,
        dim,
    );

    let body_block = Block::default()
        .title(" Body ")
        .borders(Borders::ALL)
        .border_style(field_border(draft.focus == DraftField::Body, tokens, dim));
    let body_inner = body_block.inner(chunks[1]);
    f.render_widget(body_block, chunks[1]);
    f.render_widget(&draft.body, body_inner);

    f.render_widget(
        Paragraph::new("Tab: switch field  Shift+Enter/Ctrl+S: save  Esc: cancel")
            .style(Style::default().fg(tokens.muted)),
        chunks[2],
    );
}

fn render_prompt_form(f: &mut Frame, area: Rect, draft: &PromptDraft, tokens: &ThemeTokens, dim: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_title_field(
        f,
        chunks[0],
        &draft.title,
        draft.focus == PromptField::Title,
        tokens,
        dim,
    );

    let mut lines: Vec<Line> = Vec::new();
    for (i, prompt) in draft.prompts.iter().enumerate() {
        let focused = draft.focus == PromptField::Response(i) && !dim;
        let prompt_style = if dim {
            Style::default().fg(tokens.muted)
        } else {
            Style::default()
                .fg(tokens.accent)
                .add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(Span::styled((*prompt).to_string(), prompt_style)));

        let response = &draft.responses[i];
        let marker = if focused { "> " } else { "  " };
        let response_span = if response.is_empty() {
            Span::styled(
                format!("{marker}{}", crate::app::PLACEHOLDER_RESPONSE),
                Style::default().fg(tokens.muted),
            )
        } else {
            let style = if focused {
                Style::default().bg(tokens.highlight)
            } else {
                Style::default()
            };
            Span::styled(format!("{marker}{response}"), style)
        };
        lines.push(Line::from(response_span));
        lines.push(Line::from(""));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[1]);

    f.render_widget(
        Paragraph::new("Tab/Enter: next field  Shift+Enter/Ctrl+S: save  Esc: cancel")
            .style(Style::default().fg(tokens.muted)),
        chunks[2],
    );
}

pub fn render_view_popup(f: &mut Frame, app: &App, tokens: &ThemeTokens) {
    let Some(entry) = app.view_entry.as_ref() else {
        return;
    };

    let area = centered_rect(80, 80, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" {} ", entry.display_title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tokens.border_active));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(Span::styled(
            entry.display_date(),
            Style::default().fg(tokens.date),
        )),
        chunks[0],
    );

    let width = chunks[1].width.max(1) as usize;
    let mut lines: Vec<Line> = Vec::new();
    match &entry.content {
        EntryContent::Free(text) if !text.trim().is_empty() => {
            for segment in wrap_body(text, width) {
                lines.push(Line::from(segment));
            }
        }
        EntryContent::Prompts(pairs) if !pairs.is_empty() => {
            for pair in pairs {
                lines.push(Line::from(Span::styled(
                    pair.prompt.clone(),
                    Style::default()
                        .fg(tokens.accent)
                        .add_modifier(Modifier::BOLD),
                )));
                if pair.response.trim().is_empty() {
                    lines.push(Line::from(Span::styled(
                        "No response provided",
                        Style::default().fg(tokens.muted),
                    )));
                } else {
                    for segment in wrap_body(&pair.response, width) {
                        lines.push(Line::from(segment));
                    }
                }
                lines.push(Line::from(""));
            }
        }
        _ => {
            lines.push(Line::from(Span::styled(
                "No content available.",
                Style::default().fg(tokens.muted),
            )));
        }
    }
    f.render_widget(Paragraph::new(lines), chunks[1]);

    f.render_widget(
        Paragraph::new("e: edit  d: delete  Esc: close")
            .style(Style::default().fg(tokens.muted)),
        chunks[2],
    );
}

pub fn render_edit_popup(f: &mut Frame, app: &App, tokens: &ThemeTokens) {
    let Some(modal) = app.edit_modal.as_ref() else {
        return;
    };

    let area = centered_rect(70, 70, f.area());
    f.render_widget(Clear, area);
    let date_label = modal
        .date
        .map(|d| d.format("%B %e, %Y").to_string())
        .unwrap_or_else(|| "No Date".to_string());
    let block = Block::default()
        .title(format!(" Edit Entry for {date_label} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tokens.border_active));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    match &modal.body {
        EditBody::Free { text, focus } => {
            render_title_field(
                f,
                chunks[0],
                &modal.title,
                *focus == DraftField::Title,
                tokens,
                false,
            );
            let body_block = Block::default()
                .title(" Body ")
                .borders(Borders::ALL)
                .border_style(field_border(*focus == DraftField::Body, tokens, false));
            let body_inner = body_block.inner(chunks[1]);
            f.render_widget(body_block, chunks[1]);
            f.render_widget(text, body_inner);
        }
        EditBody::Prompts {
            prompts,
            responses,
            focus,
        } => {
            render_title_field(
                f,
                chunks[0],
                &modal.title,
                *focus == PromptField::Title,
                tokens,
                false,
            );
            let mut lines: Vec<Line> = Vec::new();
            for (i, prompt) in prompts.iter().enumerate() {
                let focused = *focus == PromptField::Response(i);
                lines.push(Line::from(Span::styled(
                    prompt.clone(),
                    Style::default()
                        .fg(tokens.accent)
                        .add_modifier(Modifier::BOLD),
                )));
                let marker = if focused { "> " } else { "  " };
                let style = if focused {
                    Style::default().bg(tokens.highlight)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(
                    format!("{marker}{}", responses[i]),
                    style,
                )));
                lines.push(Line::from(""));
            }
            f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[1]);
        }
    }

    f.render_widget(
        Paragraph::new("Tab: next field  Shift+Enter/Ctrl+S: save  Esc: discard")
            .style(Style::default().fg(tokens.muted)),
        chunks[2],
    );
}

pub fn render_delete_confirm_popup(f: &mut Frame, tokens: &ThemeTokens) {
    let block = Block::default()
        .title(" Confirm Deletion ")
        .borders(Borders::ALL)
        .style(Style::default().fg(tokens.error));
    let area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let text_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .margin(2)
        .split(area);

    let body = Paragraph::new("Are you sure you want to delete this journal entry?")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .wrap(Wrap { trim: true });
    let help_text = Paragraph::new("Enter/y: delete  Esc/n: cancel")
        .style(Style::default().fg(tokens.muted));

    f.render_widget(body, text_area[0]);
    f.render_widget(help_text, text_area[1]);
}

pub fn render_help_popup(f: &mut Frame, app: &App, tokens: &ThemeTokens) {
    let bindings = &app.config.keybindings;
    let area = centered_rect(70, 70, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tokens.border_active));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let row = |label: &str, keys: &[String]| {
        Line::from(vec![
            Span::styled(format!("{label:<18}"), Style::default().fg(tokens.accent)),
            Span::raw(keys.join(", ")),
        ])
    };

    let lines = vec![
        Line::from(Span::styled(
            "Home",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        row("new entry", &bindings.global.new_entry),
        row("search", &bindings.global.search),
        row("refresh", &bindings.global.refresh),
        row("quit", &bindings.global.quit),
        Line::from(""),
        Line::from(Span::styled(
            "Entry list",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        row("move up", &bindings.list.up),
        row("move down", &bindings.list.down),
        row("open entry", &bindings.list.open),
        Line::from(""),
        Line::from(Span::styled(
            "Composer",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        row("save", &bindings.composer.save),
        row("next field", &bindings.composer.next_field),
        row("cancel", &bindings.composer.cancel),
        Line::from(""),
        Line::from(Span::styled(
            "Esc closes this window",
            Style::default().fg(tokens.muted),
        )),
    ];

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(100)])
        .margin(1)
        .split(inner)[0];
    f.render_widget(Paragraph::new(lines), body);
}
