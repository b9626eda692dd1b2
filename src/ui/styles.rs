use crate::domain::Theme;
use ratatui::style::{Color, Modifier, Style};

/// Default text style
pub fn default_style(theme: Theme) -> Style {
    match theme {
        Theme::Light => Style::default().fg(Color::Black).bg(Color::White),
        Theme::Dark => Style::default().fg(Color::White).bg(Color::Black),
    }
}

/// Cursor row highlight style
pub fn cursor_style(theme: Theme) -> Style {
    let bg = match theme {
        Theme::Light => Color::LightBlue,
        Theme::Dark => Color::LightCyan,
    };
    Style::default()
        .fg(Color::Black)
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}

/// Row being dragged
pub fn dragging_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Completed task style
pub fn done_style(theme: Theme) -> Style {
    let fg = match theme {
        Theme::Light => Color::Green,
        Theme::Dark => Color::LightGreen,
    };
    Style::default().fg(fg).add_modifier(Modifier::CROSSED_OUT)
}

/// Selection checkbox style
pub fn checkbox_style() -> Style {
    Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
}

/// Title style for panes
pub fn title_style(theme: Theme) -> Style {
    let fg = match theme {
        Theme::Light => Color::Blue,
        Theme::Dark => Color::Cyan,
    };
    Style::default().fg(fg).add_modifier(Modifier::BOLD)
}

pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Modal background style
pub fn modal_bg_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

/// Modal title style
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Status line error style
pub fn error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}
