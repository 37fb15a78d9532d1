use crate::config::Theme;
use ratatui::style::Color;

/// Resolved theme colors. Config values accept ratatui color names or
/// "r,g,b"; anything unparseable falls back to `Reset`.
#[derive(Debug, Clone)]
pub struct ThemeTokens {
    pub border_default: Color,
    pub border_active: Color,
    pub accent: Color,
    pub muted: Color,
    pub highlight: Color,
    pub quote: Color,
    pub date: Color,
    pub error: Color,
}

impl ThemeTokens {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            border_default: parse_color(&theme.border_default),
            border_active: parse_color(&theme.border_active),
            accent: parse_color(&theme.accent),
            muted: parse_color(&theme.muted),
            highlight: parse_color(&theme.highlight),
            quote: parse_color(&theme.quote),
            date: parse_color(&theme.date),
            error: parse_color(&theme.error),
        }
    }
}

pub fn parse_color(s: &str) -> Color {
    let s = s.trim().to_lowercase();
    match s.as_str() {
        "reset" => Color::Reset,
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" => Color::Gray,
        "darkgray" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        _ => {
            if s.contains(',') {
                let parts: Vec<&str> = s.split(',').collect();
                if parts.len() == 3 {
                    if let (Ok(r), Ok(g), Ok(b)) = (
                        parts[0].trim().parse(),
                        parts[1].trim().parse(),
                        parts[2].trim().parse(),
                    ) {
                        return Color::Rgb(r, g, b);
                    }
                }
            }
            Color::Reset
        }
    }
}
