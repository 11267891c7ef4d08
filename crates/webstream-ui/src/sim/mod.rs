//! Terminal simulator: the engine driven by a keyboard, drawn with ratatui,
//! talking to a loopback host.

pub mod app;
pub mod keymap;
pub mod loopback;
pub mod prompt;
pub mod theme;
pub mod view;
