//! Text-entry overlay seam.
//!
//! The overlay is modal: while it is active the session forwards controller
//! input to it and draws it instead of the menu.  Results are collected with
//! `take_outcome` after each forwarded message or tick.

use crate::midi::{MidiMessage, CC_BACK, CC_JOG_CLICK};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Confirmed(String),
    Cancelled,
}

/// What the display needs to draw the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextEntryView {
    pub title: String,
    pub text: String,
    /// Cursor position in characters.
    pub cursor: usize,
}

pub trait TextEntry {
    /// Open with an empty buffer and `title` as the prompt.
    fn open(&mut self, title: &str);
    fn is_active(&self) -> bool;
    fn handle_midi(&mut self, data: &[u8]);
    fn tick(&mut self) {}
    /// The result of the last session, once.  Closing happens before the
    /// outcome becomes available.
    fn take_outcome(&mut self) -> Option<Outcome>;
    fn view(&self) -> TextEntryView;
}

/// Text entry driven by code instead of a keyboard.
///
/// Text is typed with [`ScriptedTextEntry::type_text`]; a jog click confirms
/// and Back cancels, like the on-device overlay.
#[derive(Debug, Default)]
pub struct ScriptedTextEntry {
    title: String,
    buffer: String,
    active: bool,
    outcome: Option<Outcome>,
    opened: Vec<String>,
    received: Vec<Vec<u8>>,
}

impl ScriptedTextEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_text(&mut self, text: &str) {
        if self.active {
            self.buffer.push_str(text);
        }
    }

    /// Prompt titles in the order the overlay was opened.
    pub fn opened(&self) -> &[String] {
        &self.opened
    }

    /// Every MIDI message forwarded while active.
    pub fn received(&self) -> &[Vec<u8>] {
        &self.received
    }

    fn close(&mut self, outcome: Outcome) {
        self.active = false;
        self.outcome = Some(outcome);
    }
}

impl TextEntry for ScriptedTextEntry {
    fn open(&mut self, title: &str) {
        self.title = title.to_string();
        self.buffer.clear();
        self.outcome = None;
        self.active = true;
        self.opened.push(title.to_string());
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn handle_midi(&mut self, data: &[u8]) {
        if !self.active {
            return;
        }
        self.received.push(data.to_vec());
        if let Some(MidiMessage::ControlChange { cc, value }) = MidiMessage::parse(data) {
            if value == 0 {
                return;
            }
            match cc {
                CC_JOG_CLICK => {
                    let text = self.buffer.clone();
                    self.close(Outcome::Confirmed(text));
                }
                CC_BACK => self.close(Outcome::Cancelled),
                _ => {}
            }
        }
    }

    fn take_outcome(&mut self) -> Option<Outcome> {
        self.outcome.take()
    }

    fn view(&self) -> TextEntryView {
        TextEntryView {
            title: self.title.clone(),
            text: self.buffer.clone(),
            cursor: self.buffer.chars().count(),
        }
    }
}
