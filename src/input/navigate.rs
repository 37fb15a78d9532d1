use crate::{actions, app::App, config::key_match, models::InputMode};
use crossterm::event::KeyEvent;

pub fn handle_navigate_mode(app: &mut App, key: KeyEvent) {
    if key_match(&key, &app.config.keybindings.global.quit) {
        app.quit();
        return;
    }
    if key_match(&key, &app.config.keybindings.global.help) {
        app.show_help_popup = true;
        return;
    }
    if key_match(&key, &app.config.keybindings.global.search) {
        app.input_mode = InputMode::Search;
        return;
    }
    if key_match(&key, &app.config.keybindings.global.new_entry) {
        actions::open_create_modal_for_today(app);
        return;
    }
    if key_match(&key, &app.config.keybindings.global.refresh) {
        actions::fetch_entries(app);
        return;
    }

    if key_match(&key, &app.config.keybindings.list.up) {
        app.select_prev();
    } else if key_match(&key, &app.config.keybindings.list.down) {
        app.select_next();
    } else if key_match(&key, &app.config.keybindings.list.top) {
        app.select_first();
    } else if key_match(&key, &app.config.keybindings.list.bottom) {
        app.select_last();
    } else if key_match(&key, &app.config.keybindings.list.open) {
        actions::open_view_for_selected(app);
    }
}
