//! PromptEntry — keyboard text entry for the simulator, on tui-input.
//!
//! Typing arrives as key events; confirm and cancel arrive as controller
//! MIDI (jog click / Back), the same way they reach the on-device overlay.
//! Turning the jog wheel moves the cursor.

use ratatui::crossterm::event::{Event, KeyEvent};
use tui_input::backend::crossterm::EventHandler;
use tui_input::{Input, InputRequest};

use webstream_ui::midi::{decode_delta, MidiMessage, CC_BACK, CC_JOG_CLICK, CC_JOG_WHEEL};
use webstream_ui::text_entry::{Outcome, TextEntry, TextEntryView};

#[derive(Default)]
pub struct PromptEntry {
    input: Input,
    title: String,
    active: bool,
    outcome: Option<Outcome>,
}

impl PromptEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.active {
            self.input.handle_event(&Event::Key(key));
        }
    }

    fn close(&mut self, outcome: Outcome) {
        self.active = false;
        self.outcome = Some(outcome);
    }

    fn step_cursor(&mut self, delta: i32) {
        let request = if delta < 0 {
            InputRequest::GoToPrevChar
        } else {
            InputRequest::GoToNextChar
        };
        for _ in 0..delta.unsigned_abs() {
            self.input.handle(request.clone());
        }
    }
}

impl TextEntry for PromptEntry {
    fn open(&mut self, title: &str) {
        self.input = Input::default();
        self.title = title.to_string();
        self.outcome = None;
        self.active = true;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn handle_midi(&mut self, data: &[u8]) {
        if !self.active {
            return;
        }
        let Some(MidiMessage::ControlChange { cc, value }) = MidiMessage::parse(data) else {
            return;
        };
        match cc {
            CC_JOG_CLICK if value > 0 => {
                let text = self.input.value().to_string();
                self.close(Outcome::Confirmed(text));
            }
            CC_BACK if value > 0 => self.close(Outcome::Cancelled),
            CC_JOG_WHEEL => self.step_cursor(decode_delta(value)),
            _ => {}
        }
    }

    fn take_outcome(&mut self) -> Option<Outcome> {
        self.outcome.take()
    }

    fn view(&self) -> TextEntryView {
        TextEntryView {
            title: self.title.clone(),
            text: self.input.value().to_string(),
            cursor: self.input.visual_cursor(),
        }
    }
}
