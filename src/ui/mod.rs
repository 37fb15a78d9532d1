use chrono::{Local, Timelike};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, Paragraph},
};

use crate::app::App;
use crate::models::InputMode;

pub mod components;
pub mod popups;
pub mod theme;

use components::{entry_list_item, greeting_for_hour};
use popups::{
    render_create_modal, render_delete_confirm_popup, render_edit_popup, render_help_popup,
    render_view_popup,
};

pub fn ui(f: &mut Frame, app: &mut App) {
    let tokens = theme::ThemeTokens::from_theme(&app.config.theme);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    // Greeting banner with the active date.
    let greeting = format!(
        "{}, {}",
        greeting_for_hour(Local::now().hour()),
        app.greeting_name()
    );
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            greeting,
            Style::default()
                .fg(tokens.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            app.active_date.format("%A, %B %e, %Y").to_string(),
            Style::default().fg(tokens.date),
        )),
    ]);
    f.render_widget(header, chunks[0]);

    let quote = Paragraph::new(Span::styled(
        format!("\u{201c}{}\u{201d}", app.quote),
        Style::default()
            .fg(tokens.quote)
            .add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .wrap(ratatui::widgets::Wrap { trim: true });
    f.render_widget(quote, chunks[1]);

    let search_border = if app.input_mode == InputMode::Search {
        tokens.border_active
    } else {
        tokens.border_default
    };
    let search_block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(search_border));
    let search_inner = search_block.inner(chunks[2]);
    f.render_widget(search_block, chunks[2]);
    f.render_widget(&app.textarea, search_inner);

    render_entries(f, app, &tokens, chunks[3]);

    let status = if let Some(message) = &app.toast_message {
        Paragraph::new(Span::styled(
            message.clone(),
            Style::default().fg(tokens.accent),
        ))
    } else {
        Paragraph::new(Span::styled(
            "n: new  /: search  Enter: open  r: refresh  ?: help  q: quit",
            Style::default().fg(tokens.muted),
        ))
    };
    f.render_widget(status, chunks[4]);

    // Topmost popup renders last.
    render_create_modal(f, app, &tokens);
    render_view_popup(f, app, &tokens);
    render_edit_popup(f, app, &tokens);
    if app.show_delete_confirm {
        render_delete_confirm_popup(f, &tokens);
    }
    if app.show_help_popup {
        render_help_popup(f, app, &tokens);
    }
}

fn render_entries(
    f: &mut Frame,
    app: &mut App,
    tokens: &theme::ThemeTokens,
    area: ratatui::layout::Rect,
) {
    let query = app.active_query();
    let title = match &query {
        Some(q) => format!(" Results for \"{q}\" "),
        None => " Past Entries ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tokens.border_default));
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Loading wins over cache contents.
    if app.loading {
        f.render_widget(
            Paragraph::new(Span::styled(
                "Loading entries...",
                Style::default().fg(tokens.muted),
            )),
            inner,
        );
        return;
    }

    let visible = app.visible_entries();
    if visible.is_empty() {
        let message = if query.is_some() {
            "No entries match your search."
        } else {
            "No journal entries yet."
        };
        f.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(tokens.muted))),
            inner,
        );
        return;
    }

    let width = inner.width as usize;
    let items: Vec<_> = visible
        .iter()
        .map(|entry| entry_list_item(entry, width, tokens))
        .collect();
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(tokens.highlight)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, inner, &mut app.list_state);
}
