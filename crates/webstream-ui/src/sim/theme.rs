//! Color palette for the simulated device screen.

use ratatui::style::{Color, Modifier, Style};

pub const C_BG: Color = Color::Rgb(18, 18, 18);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SEPARATOR: Color = Color::Rgb(40, 40, 52);
pub const C_SELECTION_BG: Color = Color::Rgb(28, 28, 40);
pub const C_ACCENT: Color = Color::Rgb(120, 100, 200);
pub const C_INPUT_FG: Color = Color::Rgb(255, 200, 80);

pub fn style_default() -> Style {
    Style::default().fg(C_PRIMARY)
}

pub fn style_title() -> Style {
    Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
}

pub fn style_selected() -> Style {
    Style::default()
        .bg(C_SELECTION_BG)
        .fg(C_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn style_footer() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}
