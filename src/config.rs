use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// True when `key` matches any of the configured bindings ("n", "ctrl+s",
/// "shift+enter", ...). Char comparisons ignore case; Enter compares
/// modifiers exactly so `enter` and `shift+enter` can coexist.
pub fn key_match(key: &KeyEvent, bindings: &[String]) -> bool {
    bindings.iter().any(|binding| binding_matches(key, binding))
}

fn binding_matches(key: &KeyEvent, binding: &str) -> bool {
    let mut want_mods = KeyModifiers::NONE;
    let mut want_code = KeyCode::Null;

    for part in binding.to_lowercase().split('+') {
        match part {
            "ctrl" => want_mods.insert(KeyModifiers::CONTROL),
            "alt" | "opt" => want_mods.insert(KeyModifiers::ALT),
            "shift" => want_mods.insert(KeyModifiers::SHIFT),
            "enter" => want_code = KeyCode::Enter,
            "esc" => want_code = KeyCode::Esc,
            "tab" => want_code = KeyCode::Tab,
            "backtab" => want_code = KeyCode::BackTab,
            "backspace" => want_code = KeyCode::Backspace,
            "space" => want_code = KeyCode::Char(' '),
            "up" => want_code = KeyCode::Up,
            "down" => want_code = KeyCode::Down,
            "left" => want_code = KeyCode::Left,
            "right" => want_code = KeyCode::Right,
            "home" => want_code = KeyCode::Home,
            "end" => want_code = KeyCode::End,
            "delete" => want_code = KeyCode::Delete,
            part if part.chars().count() == 1 => {
                if let Some(ch) = part.chars().next() {
                    want_code = KeyCode::Char(ch);
                }
            }
            _ => {}
        }
    }

    let code_matches = match (key.code, want_code) {
        (code, want) if code == want => true,
        (KeyCode::Char(a), KeyCode::Char(b)) => a.to_lowercase().next() == Some(b),
        _ => false,
    };
    if !code_matches {
        return false;
    }

    if want_code == KeyCode::Enter {
        return key.modifiers == want_mods;
    }

    // Shift is implicit for plain chars unless the binding asks for it.
    let mut have = key.modifiers;
    if !want_mods.contains(KeyModifiers::SHIFT) {
        have.remove(KeyModifiers::SHIFT);
    }
    have == want_mods
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "inkleaf", "inkleaf")
}

fn default_data_dir() -> PathBuf {
    if let Some(path) = std::env::var_os("INKLEAF_DATA_DIR") {
        return PathBuf::from(path);
    }
    if let Some(dirs) = project_dirs() {
        return dirs.data_dir().to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".inkleaf")
}

pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("INKLEAF_CONFIG") {
        return PathBuf::from(path);
    }
    if let Some(dirs) = project_dirs() {
        return dirs.config_dir().join("config.toml");
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".inkleaf-config.toml")
}

/// Destination of the tracing output. Stderr would corrupt the alternate
/// screen, so logs go to a file under the data directory.
pub fn log_path() -> PathBuf {
    default_data_dir().join("inkleaf.log")
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub keybindings: KeyBindings,
    pub theme: Theme,
}

/// Remote document store. An empty `base_url` switches the app to the
/// session-local in-memory store.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct StoreConfig {
    pub base_url: String,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub base_url: String,
    pub token: String,
    pub poll_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: String::new(),
            poll_secs: 30,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct KeyBindings {
    pub global: GlobalBindings,
    pub list: ListBindings,
    pub composer: ComposerBindings,
    pub popup: PopupBindings,
    pub search: SearchBindings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GlobalBindings {
    pub quit: Vec<String>,
    pub help: Vec<String>,
    pub search: Vec<String>,
    pub new_entry: Vec<String>,
    pub refresh: Vec<String>,
}

impl Default for GlobalBindings {
    fn default() -> Self {
        Self {
            quit: vec!["q".to_string(), "ctrl+q".to_string()],
            help: vec!["?".to_string()],
            search: vec!["/".to_string()],
            new_entry: vec!["n".to_string(), "a".to_string()],
            refresh: vec!["r".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ListBindings {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub open: Vec<String>,
    pub top: Vec<String>,
    pub bottom: Vec<String>,
}

impl Default for ListBindings {
    fn default() -> Self {
        Self {
            up: vec!["k".to_string(), "up".to_string()],
            down: vec!["j".to_string(), "down".to_string()],
            open: vec!["enter".to_string()],
            top: vec!["home".to_string(), "g".to_string()],
            bottom: vec!["end".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ComposerBindings {
    pub save: Vec<String>,
    pub cancel: Vec<String>,
    pub next_field: Vec<String>,
    pub prev_field: Vec<String>,
}

impl Default for ComposerBindings {
    fn default() -> Self {
        Self {
            save: vec!["shift+enter".to_string(), "ctrl+s".to_string()],
            cancel: vec!["esc".to_string()],
            next_field: vec!["tab".to_string()],
            prev_field: vec!["backtab".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PopupBindings {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub up: Vec<String>,
    pub down: Vec<String>,
}

impl Default for PopupBindings {
    fn default() -> Self {
        Self {
            confirm: vec!["enter".to_string(), "y".to_string()],
            cancel: vec!["esc".to_string(), "n".to_string()],
            up: vec!["k".to_string(), "up".to_string()],
            down: vec!["j".to_string(), "down".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SearchBindings {
    pub submit: Vec<String>,
    pub cancel: Vec<String>,
    pub clear: Vec<String>,
}

impl Default for SearchBindings {
    fn default() -> Self {
        Self {
            submit: vec!["enter".to_string()],
            cancel: vec!["esc".to_string()],
            clear: vec!["ctrl+l".to_string()],
        }
    }
}

/// Colors accept ratatui color names ("Cyan", "DarkGray") or "r,g,b".
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Theme {
    pub border_default: String,
    pub border_active: String,
    pub accent: String,
    pub muted: String,
    pub highlight: String,
    pub quote: String,
    pub date: String,
    pub error: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border_default: "Reset".to_string(),
            border_active: "Cyan".to_string(),
            accent: "Green".to_string(),
            muted: "DarkGray".to_string(),
            highlight: "50,50,50".to_string(),
            quote: "Magenta".to_string(),
            date: "Blue".to_string(),
            error: "Red".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let config_path = config_path();

        let config = if let Ok(content) = fs::read_to_string(&config_path) {
            match toml::from_str::<Config>(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Failed to parse config.toml ({config_path:?}), using defaults: {e}");
                    Config::default()
                }
            }
        } else {
            Config::default()
        };

        if !config_path.exists() {
            let _ = config.save_to_path(&config_path);
        }

        config
    }

    pub fn save_to_path(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).unwrap_or_default();
        fs::write(path, content)
    }
}
