use crate::domain::Relevance;
use ratatui::style::{Color, Modifier, Style};

/// Default text style
pub fn default_style() -> Style {
    Style::default().fg(Color::White)
}

/// Selected row highlight style
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Border style
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

/// Error/status message style
pub fn error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Date badge style
pub fn date_style() -> Style {
    Style::default().fg(Color::Blue)
}

/// Bucket header style, colored by relevance
pub fn header_style(relevance: Relevance) -> Style {
    let color = match relevance {
        Relevance::Due => Color::Red,
        Relevance::Normal => Color::Cyan,
        Relevance::Snoozed => Color::Yellow,
        Relevance::Completed => Color::Green,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}
