use crate::{
    actions,
    app::{App, CreateView, DraftField, EditBody, PromptField},
    config::key_match,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Routes a key press to the topmost open popup. Returns true when a popup
/// consumed the key.
pub fn handle_popup_events(app: &mut App, key: KeyEvent) -> bool {
    if app.show_help_popup {
        if key.code == KeyCode::Esc || key_match(&key, &app.config.keybindings.global.help) {
            app.show_help_popup = false;
        }
        return true;
    }
    if app.show_delete_confirm {
        handle_delete_confirm(app, key);
        return true;
    }
    if app.edit_modal.is_some() {
        handle_edit_modal(app, key);
        return true;
    }
    if app.view_entry.is_some() {
        handle_view_modal(app, key);
        return true;
    }
    if app.create_modal.is_some() {
        handle_create_modal(app, key);
        return true;
    }
    false
}

fn handle_delete_confirm(app: &mut App, key: KeyEvent) {
    if key_match(&key, &app.config.keybindings.popup.confirm) {
        actions::confirm_delete(app);
    } else if key.code == KeyCode::Esc || key_match(&key, &app.config.keybindings.popup.cancel) {
        app.show_delete_confirm = false;
    }
}

fn handle_view_modal(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc || key_match(&key, &app.config.keybindings.popup.cancel) {
        app.close_view_modal();
        return;
    }
    match key.code {
        KeyCode::Char('e') | KeyCode::Char('E') => actions::open_edit_from_view(app),
        KeyCode::Char('d') | KeyCode::Char('D') => actions::request_delete(app),
        _ => {}
    }
}

fn handle_create_modal(app: &mut App, key: KeyEvent) {
    // A swap in progress cannot be interrupted or double-triggered.
    if app.create_modal.as_ref().is_some_and(|m| m.is_fading()) {
        return;
    }

    if key_match(&key, &app.config.keybindings.composer.cancel) {
        app.close_create_modal();
        return;
    }

    enum ViewKind {
        Chooser,
        Free,
        Prompts,
    }
    let kind = match app.create_modal.as_ref().map(|m| &m.view) {
        Some(CreateView::Chooser { .. }) => ViewKind::Chooser,
        Some(CreateView::FreeWrite(_)) => ViewKind::Free,
        Some(CreateView::UsePrompts(_)) => ViewKind::Prompts,
        None => return,
    };
    match kind {
        ViewKind::Chooser => handle_chooser(app, key),
        ViewKind::Free => handle_free_write(app, key),
        ViewKind::Prompts => handle_prompts(app, key),
    }
}

fn handle_chooser(app: &mut App, key: KeyEvent) {
    let bindings = &app.config.keybindings.popup;
    let mut choice = None;

    if let Some(modal) = app.create_modal.as_mut()
        && let CreateView::Chooser { selected } = &mut modal.view
    {
        if key_match(&key, &bindings.up) {
            *selected = 0;
        } else if key_match(&key, &bindings.down) {
            *selected = 1;
        } else if key.code == KeyCode::Char('1') {
            choice = Some(0);
        } else if key.code == KeyCode::Char('2') {
            choice = Some(1);
        } else if key_match(&key, &bindings.confirm) {
            choice = Some(*selected);
        }
    }

    match choice {
        Some(0) => actions::choose_free_write(app),
        Some(_) => actions::choose_prompts(app),
        None => {}
    }
}

fn plain_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(ch)
        }
        _ => None,
    }
}

fn handle_free_write(app: &mut App, key: KeyEvent) {
    if key_match(&key, &app.config.keybindings.composer.save) {
        actions::save_free_entry(app);
        return;
    }
    let cycle = key_match(&key, &app.config.keybindings.composer.next_field)
        || key_match(&key, &app.config.keybindings.composer.prev_field);

    if let Some(modal) = app.create_modal.as_mut()
        && let CreateView::FreeWrite(draft) = &mut modal.view
    {
        if cycle {
            draft.focus = match draft.focus {
                DraftField::Title => DraftField::Body,
                DraftField::Body => DraftField::Title,
            };
            return;
        }
        match draft.focus {
            DraftField::Title => match key.code {
                KeyCode::Enter => draft.focus = DraftField::Body,
                KeyCode::Backspace => {
                    draft.title.pop();
                }
                _ => {
                    if let Some(ch) = plain_char(&key) {
                        draft.title.push(ch);
                    }
                }
            },
            DraftField::Body => {
                draft.body.input(key);
            }
        }
    }
}

fn handle_prompts(app: &mut App, key: KeyEvent) {
    if key_match(&key, &app.config.keybindings.composer.save) {
        actions::save_prompt_entry(app);
        return;
    }
    let next = key_match(&key, &app.config.keybindings.composer.next_field)
        || key.code == KeyCode::Enter;
    let prev = key_match(&key, &app.config.keybindings.composer.prev_field);

    if let Some(modal) = app.create_modal.as_mut()
        && let CreateView::UsePrompts(draft) = &mut modal.view
    {
        let last = draft.prompts.len().saturating_sub(1);
        if next {
            draft.focus = match draft.focus {
                PromptField::Title => PromptField::Response(0),
                PromptField::Response(i) if i < last => PromptField::Response(i + 1),
                PromptField::Response(_) => PromptField::Title,
            };
            return;
        }
        if prev {
            draft.focus = match draft.focus {
                PromptField::Title => PromptField::Response(last),
                PromptField::Response(0) => PromptField::Title,
                PromptField::Response(i) => PromptField::Response(i - 1),
            };
            return;
        }
        let target = match draft.focus {
            PromptField::Title => &mut draft.title,
            PromptField::Response(i) => &mut draft.responses[i],
        };
        match key.code {
            KeyCode::Backspace => {
                target.pop();
            }
            _ => {
                if let Some(ch) = plain_char(&key) {
                    target.push(ch);
                }
            }
        }
    }
}

fn handle_edit_modal(app: &mut App, key: KeyEvent) {
    if key_match(&key, &app.config.keybindings.composer.cancel) {
        app.edit_modal = None;
        return;
    }
    if key_match(&key, &app.config.keybindings.composer.save) {
        actions::save_edited_entry(app);
        return;
    }
    let next = key_match(&key, &app.config.keybindings.composer.next_field);
    let prev = key_match(&key, &app.config.keybindings.composer.prev_field);

    let Some(modal) = app.edit_modal.as_mut() else {
        return;
    };
    match &mut modal.body {
        EditBody::Free { text, focus } => {
            if next || prev {
                *focus = match focus {
                    DraftField::Title => DraftField::Body,
                    DraftField::Body => DraftField::Title,
                };
                return;
            }
            match focus {
                DraftField::Title => match key.code {
                    KeyCode::Enter => *focus = DraftField::Body,
                    KeyCode::Backspace => {
                        modal.title.pop();
                    }
                    _ => {
                        if let Some(ch) = plain_char(&key) {
                            modal.title.push(ch);
                        }
                    }
                },
                DraftField::Body => {
                    text.input(key);
                }
            }
        }
        EditBody::Prompts {
            prompts,
            responses,
            focus,
        } => {
            let last = prompts.len().saturating_sub(1);
            if next || key.code == KeyCode::Enter {
                *focus = match *focus {
                    PromptField::Title => PromptField::Response(0),
                    PromptField::Response(i) if i < last => PromptField::Response(i + 1),
                    PromptField::Response(_) => PromptField::Title,
                };
                return;
            }
            if prev {
                *focus = match *focus {
                    PromptField::Title => PromptField::Response(last),
                    PromptField::Response(0) => PromptField::Title,
                    PromptField::Response(i) => PromptField::Response(i - 1),
                };
                return;
            }
            let target = match *focus {
                PromptField::Title => &mut modal.title,
                PromptField::Response(i) => &mut responses[i],
            };
            match key.code {
                KeyCode::Backspace => {
                    target.pop();
                }
                _ => {
                    if let Some(ch) = plain_char(&key) {
                        target.push(ch);
                    }
                }
            }
        }
    }
}
