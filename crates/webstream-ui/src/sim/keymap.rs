//! Keyboard → controller MIDI.
//!
//! | key            | controller                        |
//! |----------------|-----------------------------------|
//! | Up / Down      | jog wheel −1 / +1                 |
//! | PgUp / PgDn    | Up / Down buttons                 |
//! | Enter          | jog click                         |
//! | Esc, Backspace | Back                              |
//! | s              | Shift (toggle)                    |
//! | 1 2 3 7 8      | touch Knob1/2/3/7/8               |
//! | ] / [          | turn the last touched knob + / −  |
//! | q              | quit                              |
//!
//! While the text prompt is open only Enter, Esc and Up/Down become MIDI;
//! every other key is typed into the prompt.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use webstream_ui::midi::{
    control_change, encode_delta, knob_for_touch, note_off, note_on, CC_BACK, CC_DOWN,
    CC_JOG_CLICK, CC_JOG_WHEEL, CC_SHIFT, CC_UP,
};

const PRESS: u8 = 127;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRoute {
    /// Send these messages to the internal MIDI handler, in order.
    Midi(Vec<[u8; 3]>),
    /// Type into the open prompt.
    Type(KeyEvent),
    Quit,
    None,
}

#[derive(Debug, Default)]
pub struct KeyMapper {
    shift: bool,
    /// Touch note of the last knob touched.
    last_touch: Option<u8>,
}

impl KeyMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(&mut self, key: KeyEvent, typing: bool) -> KeyRoute {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return KeyRoute::Quit;
        }

        match key.code {
            KeyCode::Up => return KeyRoute::Midi(vec![jog(-1)]),
            KeyCode::Down => return KeyRoute::Midi(vec![jog(1)]),
            KeyCode::Enter => return KeyRoute::Midi(button(CC_JOG_CLICK)),
            KeyCode::Esc => return KeyRoute::Midi(button(CC_BACK)),
            _ => {}
        }

        if typing {
            return KeyRoute::Type(key);
        }

        match key.code {
            KeyCode::Backspace => KeyRoute::Midi(button(CC_BACK)),
            KeyCode::PageUp => KeyRoute::Midi(button(CC_UP)),
            KeyCode::PageDown => KeyRoute::Midi(button(CC_DOWN)),
            KeyCode::Char('q') => KeyRoute::Quit,
            KeyCode::Char('s') => {
                self.shift = !self.shift;
                let value = if self.shift { PRESS } else { 0 };
                KeyRoute::Midi(vec![control_change(CC_SHIFT, value)])
            }
            KeyCode::Char(c @ ('1' | '2' | '3' | '7' | '8')) => {
                let touch = c as u8 - b'1';
                let mut msgs = Vec::new();
                // Lift the previous finger first, as a real hand would.
                if let Some(prev) = self.last_touch.replace(touch) {
                    msgs.push(note_off(prev));
                }
                msgs.push(note_on(touch, PRESS));
                KeyRoute::Midi(msgs)
            }
            KeyCode::Char(']') => self.turn_last(1),
            KeyCode::Char('[') => self.turn_last(-1),
            _ => KeyRoute::None,
        }
    }

    fn turn_last(&self, delta: i32) -> KeyRoute {
        match self.last_touch.and_then(knob_for_touch) {
            Some(cc) => KeyRoute::Midi(vec![control_change(cc, encode_delta(delta))]),
            None => KeyRoute::None,
        }
    }
}

fn jog(delta: i32) -> [u8; 3] {
    control_change(CC_JOG_WHEEL, encode_delta(delta))
}

fn button(cc: u8) -> Vec<[u8; 3]> {
    vec![control_change(cc, PRESS), control_change(cc, 0)]
}
