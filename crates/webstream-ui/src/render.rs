//! Render scheduling — dirty flag, activity spinner, footer text.

use crate::menu::Screen;
use crate::text_entry::TextEntryView;

const SPINNER_FRAMES: [char; 4] = ['-', '/', '|', '\\'];

/// Footer when there is nothing else to say.
pub const HINT: &str = "Click:select Back:exit";

/// Everything the display needs to draw one menu frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MenuView {
    pub title: String,
    pub labels: Vec<String>,
    pub selected: usize,
    pub footer: String,
}

impl MenuView {
    pub fn new(screen: &Screen, footer: String) -> Self {
        Self {
            title: screen.title.clone(),
            labels: screen.items().iter().map(|i| i.label().to_string()).collect(),
            selected: screen.selected(),
            footer,
        }
    }
}

/// The screen the engine draws on.
pub trait Display {
    fn present_menu(&mut self, view: &MenuView);
    fn present_text_entry(&mut self, view: &TextEntryView);
}

/// Display that keeps every frame it was asked to draw.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub menus: Vec<MenuView>,
    pub text_entries: Vec<TextEntryView>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_menu(&self) -> Option<&MenuView> {
        self.menus.last()
    }
}

impl Display for RecordingDisplay {
    fn present_menu(&mut self, view: &MenuView) {
        self.menus.push(view.clone());
    }

    fn present_text_entry(&mut self, view: &TextEntryView) {
        self.text_entries.push(view.clone());
    }
}

pub struct RenderScheduler {
    dirty: bool,
    spinner_every: u32,
    spinner_tick: u32,
    spinner_frame: usize,
}

impl RenderScheduler {
    pub fn new(spinner_every: u32) -> Self {
        Self {
            dirty: true,
            spinner_every: spinner_every.max(1),
            spinner_tick: 0,
            spinner_frame: 0,
        }
    }

    /// Back to the first spinner frame with a redraw pending.
    pub fn reset(&mut self) {
        self.spinner_tick = 0;
        self.spinner_frame = 0;
        self.dirty = true;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clear the flag, returning whether a redraw was due.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Count a tick.  While `active` the glyph advances every
    /// `spinner_every` ticks and each advance requests a redraw; otherwise
    /// the sub-counter restarts.
    pub fn advance_spinner(&mut self, active: bool) {
        if !active {
            self.spinner_tick = 0;
            return;
        }
        self.spinner_tick = (self.spinner_tick + 1) % self.spinner_every;
        if self.spinner_tick == 0 {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
            self.dirty = true;
        }
    }

    pub fn glyph(&self) -> char {
        SPINNER_FRAMES[self.spinner_frame]
    }

    /// Footer line, highest priority first: nothing under the text entry,
    /// the activity spinner, the last status message, the static hint.
    pub fn footer(&self, text_entry_active: bool, activity: Option<&str>, status: &str) -> String {
        if text_entry_active {
            return String::new();
        }
        if let Some(label) = activity {
            return format!("{} {}", label, self.glyph());
        }
        if !status.is_empty() {
            return status.to_string();
        }
        HINT.to_string()
    }
}
