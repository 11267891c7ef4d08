//! TerminalDisplay — draws engine frames into the terminal.

use std::io::Stdout;

use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame, Terminal,
};
use tracing::warn;

use webstream_ui::render::{Display, MenuView};
use webstream_ui::text_entry::TextEntryView;

use super::theme::{
    style_default, style_footer, style_muted, style_selected, style_title, C_BG, C_INPUT_FG,
    C_SEPARATOR,
};

pub type Term = Terminal<CrosstermBackend<Stdout>>;

const ENTRY_HINT: &str = "Enter:search Esc:cancel";

pub struct TerminalDisplay {
    terminal: Term,
}

impl TerminalDisplay {
    pub fn new(terminal: Term) -> Self {
        Self { terminal }
    }

    pub fn terminal_mut(&mut self) -> &mut Term {
        &mut self.terminal
    }
}

impl Display for TerminalDisplay {
    fn present_menu(&mut self, view: &MenuView) {
        if let Err(e) = self.terminal.draw(|f| draw_menu(f, view)) {
            warn!("menu draw failed: {}", e);
        }
    }

    fn present_text_entry(&mut self, view: &TextEntryView) {
        if let Err(e) = self.terminal.draw(|f| draw_text_entry(f, view)) {
            warn!("text entry draw failed: {}", e);
        }
    }
}

/// Title, separator, body, footer.
fn split(frame: &mut Frame) -> [Rect; 4] {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    [rows[0], rows[1], rows[2], rows[3]]
}

fn draw_separator(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_SEPARATOR),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_menu(frame: &mut Frame, view: &MenuView) {
    let [title_area, sep_area, body, footer_area] = split(frame);

    frame.render_widget(
        Paragraph::new(Span::styled(view.title.as_str(), style_title())),
        title_area,
    );
    draw_separator(frame, sep_area);

    let height = body.height as usize;
    let first = first_visible(view.selected, height);
    let lines: Vec<Line> = view
        .labels
        .iter()
        .enumerate()
        .skip(first)
        .take(height)
        .map(|(i, label)| {
            if i == view.selected {
                Line::from(Span::styled(format!("> {}", label), style_selected()))
            } else {
                Line::from(Span::styled(format!("  {}", label), style_default()))
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), body);

    frame.render_widget(
        Paragraph::new(Span::styled(view.footer.as_str(), style_footer())),
        footer_area,
    );
}

fn draw_text_entry(frame: &mut Frame, view: &TextEntryView) {
    let [title_area, sep_area, body, footer_area] = split(frame);

    frame.render_widget(
        Paragraph::new(Span::styled(view.title.as_str(), style_title())),
        title_area,
    );
    draw_separator(frame, sep_area);

    // Keep the cursor on screen for long queries.
    let width = body.width.saturating_sub(3) as usize;
    let scroll = view.cursor.saturating_sub(width);
    let visible: String = view.text.chars().skip(scroll).take(width).collect();
    let input_area = Rect {
        height: body.height.min(1),
        ..body
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("> ", style_muted()),
            Span::styled(visible, Style::default().fg(C_INPUT_FG)),
        ])),
        input_area,
    );
    if input_area.width > 0 && input_area.height > 0 {
        let cursor_x = input_area.x + 2 + (view.cursor - scroll) as u16;
        frame.set_cursor_position((
            cursor_x.min(input_area.x + input_area.width - 1),
            input_area.y,
        ));
    }

    frame.render_widget(
        Paragraph::new(Span::styled(ENTRY_HINT, style_footer())),
        footer_area,
    );
}

/// First row to draw so that `selected` stays inside a `height`-row window.
fn first_visible(selected: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    selected.saturating_sub(height - 1)
}
