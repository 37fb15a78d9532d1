use crate::{actions, app::App, config::key_match, models::InputMode};
use crossterm::event::KeyEvent;

pub fn handle_search_mode(app: &mut App, key: KeyEvent) {
    if key_match(&key, &app.config.keybindings.search.cancel) {
        app.textarea.select_all();
        app.textarea.cut();
        app.search_query = None;
        app.input_mode = InputMode::Navigate;
        app.select_first();
        return;
    }
    if key_match(&key, &app.config.keybindings.search.submit) {
        actions::submit_search(app);
        app.input_mode = InputMode::Navigate;
        return;
    }
    if key_match(&key, &app.config.keybindings.search.clear) {
        app.textarea.select_all();
        app.textarea.cut();
        return;
    }

    app.textarea.input(key);
}
