//! Menu engine for the webstream controller UI.
//!
//! Everything here is single-threaded and tick-driven.  The embedding loop
//! owns a [`session::Session`] and feeds it controller MIDI and render ticks;
//! the host module, display and text-entry overlay are passed in as traits.

pub mod action;
pub mod input;
pub mod menu;
pub mod midi;
pub mod nav;
pub mod reconcile;
pub mod render;
pub mod session;
pub mod text_entry;
