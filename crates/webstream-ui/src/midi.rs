//! Controller MIDI map and raw message decoding.

// ── Status bytes ──────────────────────────────────────────────────────────────

pub const STATUS_NOTE_OFF: u8 = 0x80;
pub const STATUS_NOTE_ON: u8 = 0x90;
pub const STATUS_CONTROL_CHANGE: u8 = 0xB0;

// ── Controls ──────────────────────────────────────────────────────────────────

pub const CC_JOG_CLICK: u8 = 3;
pub const CC_JOG_WHEEL: u8 = 14;
pub const CC_SHIFT: u8 = 49;
pub const CC_BACK: u8 = 51;
pub const CC_DOWN: u8 = 54;
pub const CC_UP: u8 = 55;

pub const CC_KNOB1: u8 = 71;
pub const CC_KNOB2: u8 = 72;
pub const CC_KNOB3: u8 = 73;
pub const CC_KNOB4: u8 = 74;
pub const CC_KNOB7: u8 = 77;
pub const CC_KNOB8: u8 = 78;

/// Knob touch sensors report as notes 0..=7, Knob1 first.
pub const NOTE_KNOB1_TOUCH: u8 = 0;
pub const NOTE_KNOB8_TOUCH: u8 = 7;

/// Notes below this are capacitive touch sensors (knobs, jog wheel), not pads.
const TOUCH_NOTE_LIMIT: u8 = 10;

/// Decode a relative encoder value: 1..=63 clockwise, 65..=127 counter-clockwise
/// (two's complement in 7 bits).
pub fn decode_delta(value: u8) -> i32 {
    match value {
        0 => 0,
        1..=63 => value as i32,
        _ => value as i32 - 128,
    }
}

/// Encode a signed delta the way the jog wheel and knobs send it.
pub fn encode_delta(delta: i32) -> u8 {
    (delta.clamp(-63, 63) & 0x7F) as u8
}

/// True for note on/off from one of the touch sensors.
pub fn is_capacitive_touch(data: &[u8]) -> bool {
    if data.len() < 2 {
        return false;
    }
    let status = data[0] & 0xF0;
    (status == STATUS_NOTE_ON || status == STATUS_NOTE_OFF) && data[1] < TOUCH_NOTE_LIMIT
}

/// Knob CC for a touch-sensor note, if that note belongs to a knob.
pub fn knob_for_touch(note: u8) -> Option<u8> {
    (NOTE_KNOB1_TOUCH..=NOTE_KNOB8_TOUCH)
        .contains(&note)
        .then(|| CC_KNOB1 + note)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8, velocity: u8 },
    ControlChange { cc: u8, value: u8 },
    Other,
}

impl MidiMessage {
    /// Channel is ignored.  `None` for truncated messages.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let status = *data.first()? & 0xF0;
        let msg = match status {
            STATUS_NOTE_ON | STATUS_NOTE_OFF | STATUS_CONTROL_CHANGE => {
                if data.len() < 3 {
                    return None;
                }
                let (a, b) = (data[1], data[2]);
                match status {
                    STATUS_NOTE_ON => Self::NoteOn { note: a, velocity: b },
                    STATUS_NOTE_OFF => Self::NoteOff { note: a, velocity: b },
                    _ => Self::ControlChange { cc: a, value: b },
                }
            }
            _ => Self::Other,
        };
        Some(msg)
    }

    /// Note-on with non-zero velocity.
    pub fn is_press(&self) -> bool {
        matches!(self, Self::NoteOn { velocity, .. } if *velocity > 0)
    }
}

pub fn control_change(cc: u8, value: u8) -> [u8; 3] {
    [STATUS_CONTROL_CHANGE, cc, value]
}

pub fn note_on(note: u8, velocity: u8) -> [u8; 3] {
    [STATUS_NOTE_ON, note, velocity]
}

pub fn note_off(note: u8) -> [u8; 3] {
    [STATUS_NOTE_OFF, note, 0]
}
