//! Input disambiguation for controller MIDI.
//!
//! Transport commands on the touch knobs use a two-step gesture: touching
//! knob K arms its command, then turning K clockwise confirms and turning it
//! counter-clockwise cancels.  There is no timeout; an armed command waits
//! until it is resolved.
//!
//! ```text
//!  Idle ──touch K──▶ Armed(K) ──turn K +──▶ Idle  (execute)
//!                      │  ▲    ──turn K −──▶ Idle  (cancel)
//!                      └──┘ touch K again (re-arm)
//! ```
//!
//! While armed, touches and turns on other knobs are ignored.

use tracing::debug;
use webstream_proto::protocol::Transport;

use crate::midi::{
    decode_delta, is_capacitive_touch, knob_for_touch, MidiMessage, CC_KNOB1, CC_KNOB2, CC_KNOB3,
    CC_KNOB7, CC_KNOB8, CC_SHIFT,
};

/// Knobs that carry a transport command.
const TRANSPORT_KNOBS: [(u8, Transport); 5] = [
    (CC_KNOB1, Transport::PlayPause),
    (CC_KNOB2, Transport::Rewind15),
    (CC_KNOB3, Transport::Forward15),
    (CC_KNOB7, Transport::Stop),
    (CC_KNOB8, Transport::Restart),
];

pub fn transport_for_knob(cc: u8) -> Option<Transport> {
    TRANSPORT_KNOBS
        .iter()
        .find(|(knob, _)| *knob == cc)
        .map(|(_, action)| *action)
}

/// Confirmation prompt shown while `action` is armed.
pub fn prompt(action: Transport, paused: bool) -> &'static str {
    match action {
        Transport::PlayPause if paused => "Resume?",
        Transport::PlayPause => "Pause?",
        Transport::Rewind15 => "Rewind 15s?",
        Transport::Forward15 => "Forward 15s?",
        Transport::Stop => "Stop stream?",
        Transport::Restart => "Start over?",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingKnobAction {
    /// Knob CC that must be turned to resolve the action.
    pub knob: u8,
    pub action: Transport,
}

/// Where a controller message should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// Noise, or a control with nothing to do right now.
    Ignored,
    Armed(PendingKnobAction),
    Confirmed(Transport),
    Cancelled,
    Shift(bool),
    /// Forward the raw bytes to the text-entry overlay.
    TextEntry,
    /// Hand to the menu navigation handler.
    Navigate { cc: u8, value: u8, shift: bool },
}

#[derive(Debug, Default)]
pub struct InputRouter {
    pending: Option<PendingKnobAction>,
    shift_held: bool,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<PendingKnobAction> {
        self.pending
    }

    pub fn shift_held(&self) -> bool {
        self.shift_held
    }

    pub fn reset(&mut self) {
        self.pending = None;
        self.shift_held = false;
    }

    /// Classify a message from the controller's own surface.
    pub fn route(&mut self, data: &[u8], text_entry_active: bool) -> Routed {
        if is_capacitive_touch(data) {
            if text_entry_active {
                return Routed::Ignored;
            }
            return self.on_touch(data);
        }

        // The Shift latch follows the physical control even while the
        // overlay owns the input; the overlay still receives the message.
        if let Some(MidiMessage::ControlChange { cc: CC_SHIFT, value }) = MidiMessage::parse(data) {
            self.shift_held = value > 0;
        }

        if text_entry_active {
            return Routed::TextEntry;
        }

        match MidiMessage::parse(data) {
            Some(MidiMessage::ControlChange { cc, value }) => self.on_control(cc, value),
            _ => Routed::Ignored,
        }
    }

    /// Classify a message from the external (thru) port.  Only the text
    /// entry ever sees these.
    pub fn route_external(&self, text_entry_active: bool) -> Routed {
        if text_entry_active {
            Routed::TextEntry
        } else {
            Routed::Ignored
        }
    }

    fn on_touch(&mut self, data: &[u8]) -> Routed {
        let Some(msg) = MidiMessage::parse(data) else {
            return Routed::Ignored;
        };
        let MidiMessage::NoteOn { note, .. } = msg else {
            return Routed::Ignored;
        };
        if !msg.is_press() {
            return Routed::Ignored;
        }
        let Some(knob) = knob_for_touch(note) else {
            return Routed::Ignored;
        };
        let Some(action) = transport_for_knob(knob) else {
            return Routed::Ignored;
        };

        if let Some(pending) = self.pending {
            if pending.knob != knob {
                debug!("knob {} touched while knob {} armed; ignored", knob, pending.knob);
                return Routed::Ignored;
            }
        }

        let armed = PendingKnobAction { knob, action };
        self.pending = Some(armed);
        debug!("armed {:?} on knob {}", action, knob);
        Routed::Armed(armed)
    }

    fn on_control(&mut self, cc: u8, value: u8) -> Routed {
        if transport_for_knob(cc).is_some() {
            return self.on_transport_turn(cc, value);
        }
        if cc == CC_SHIFT {
            return Routed::Shift(self.shift_held);
        }
        Routed::Navigate {
            cc,
            value,
            shift: self.shift_held,
        }
    }

    fn on_transport_turn(&mut self, cc: u8, value: u8) -> Routed {
        let Some(pending) = self.pending.filter(|p| p.knob == cc) else {
            return Routed::Ignored;
        };
        let delta = decode_delta(value);
        if delta > 0 {
            self.pending = None;
            Routed::Confirmed(pending.action)
        } else if delta < 0 {
            self.pending = None;
            Routed::Cancelled
        } else {
            Routed::Ignored
        }
    }
}
