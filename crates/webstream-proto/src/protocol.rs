//! Host parameter contract.
//!
//! The host module exposes a flat string key/value store.  The UI reads
//! search/stream status from it and writes requests (new search, playback,
//! transport triggers) back into it.  There are no push notifications; the
//! UI discovers host-side progress only by polling.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::provider::Provider;

// ── Parameter keys ────────────────────────────────────────────────────────────

pub const KEY_STREAM_STATUS: &str = "stream_status";
pub const KEY_STREAM_PROVIDER: &str = "stream_provider";
pub const KEY_STREAM_URL: &str = "stream_url";
pub const KEY_SEARCH_PROVIDER: &str = "search_provider";
pub const KEY_SEARCH_QUERY: &str = "search_query";
pub const KEY_SEARCH_STATUS: &str = "search_status";
pub const KEY_SEARCH_COUNT: &str = "search_count";

/// Upper bound on result rows the host exposes (and the menu shows).
pub const MAX_RESULTS: usize = 20;

pub fn result_provider_key(index: usize) -> String {
    format!("search_result_provider_{}", index)
}

pub fn result_title_key(index: usize) -> String {
    format!("search_result_title_{}", index)
}

pub fn result_url_key(index: usize) -> String {
    format!("search_result_url_{}", index)
}

// ── Host seam ─────────────────────────────────────────────────────────────────

/// The host module as seen from the UI.  All calls are non-blocking.
pub trait Host {
    /// Read a named parameter.  `None` (or an empty string) means unset.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a named parameter.
    fn set(&mut self, key: &str, value: &str);

    /// Leave this module and return to the host's own menu.
    fn return_to_menu(&mut self) {}
}

/// In-memory host: a plain parameter map that records every write.
#[derive(Debug, Default, Clone)]
pub struct MemoryHost {
    params: HashMap<String, String>,
    writes: Vec<(String, String)>,
    exit_requests: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a parameter without recording it as a UI write.
    pub fn put(&mut self, key: &str, value: impl Into<String>) {
        self.params.insert(key.to_string(), value.into());
    }

    /// Every `set` call in order.
    pub fn writes(&self) -> &[(String, String)] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// Most recent value written to `key` through `set`.
    pub fn last_write(&self, key: &str) -> Option<&str> {
        self.writes
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn exit_requests(&self) -> usize {
        self.exit_requests
    }
}

impl Host for MemoryHost {
    fn get(&self, key: &str) -> Option<String> {
        self.params.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.params.insert(key.to_string(), value.to_string());
        self.writes.push((key.to_string(), value.to_string()));
    }

    fn return_to_menu(&mut self) {
        self.exit_requests += 1;
    }
}

// ── Status enums ──────────────────────────────────────────────────────────────

/// Host-side search state (`search_status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Searching,
    Queued,
    Done,
    NoResults,
    Error,
    Busy,
}

impl SearchStatus {
    /// Parse the wire value.  Unknown values are `None`; callers fall back
    /// to `Idle`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "idle" => Some(Self::Idle),
            "searching" => Some(Self::Searching),
            "queued" => Some(Self::Queued),
            "done" => Some(Self::Done),
            "no_results" => Some(Self::NoResults),
            "error" => Some(Self::Error),
            "busy" => Some(Self::Busy),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Searching => "searching",
            Self::Queued => "queued",
            Self::Done => "done",
            Self::NoResults => "no_results",
            Self::Error => "error",
            Self::Busy => "busy",
        }
    }

    /// Status line shown when the search state changes.  `Idle` has none.
    pub fn message(self, provider: Provider, count: usize) -> Option<String> {
        match self {
            Self::Idle => None,
            Self::Searching => Some(format!("Searching {}...", provider.tag())),
            Self::Queued => Some("Search queued...".to_string()),
            Self::Done => Some(format!("{} results", count)),
            Self::NoResults => Some("No results".to_string()),
            Self::Error => Some("Search failed".to_string()),
            Self::Busy => Some("Search busy".to_string()),
        }
    }

    /// Short label for the footer spinner while the host is working.
    pub fn activity(self) -> Option<&'static str> {
        match self {
            Self::Searching => Some("Searching"),
            Self::Queued => Some("Queued"),
            _ => None,
        }
    }
}

/// Host-side playback state (`stream_status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamStatus {
    #[default]
    Stopped,
    Loading,
    Buffering,
    Seeking,
    Paused,
    Streaming,
    Eof,
}

impl StreamStatus {
    /// Parse the wire value.  Unknown values are `None`; callers fall back
    /// to `Stopped`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "stopped" => Some(Self::Stopped),
            "loading" => Some(Self::Loading),
            "buffering" => Some(Self::Buffering),
            "seeking" => Some(Self::Seeking),
            "paused" => Some(Self::Paused),
            "streaming" => Some(Self::Streaming),
            "eof" => Some(Self::Eof),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Loading => "loading",
            Self::Buffering => "buffering",
            Self::Seeking => "seeking",
            Self::Paused => "paused",
            Self::Streaming => "streaming",
            Self::Eof => "eof",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Loading => "Loading stream...",
            Self::Buffering => "Buffering...",
            Self::Seeking => "Seeking...",
            Self::Paused => "Paused",
            Self::Streaming => "Playing",
            Self::Eof => "Ended",
        }
    }

    pub fn activity(self) -> Option<&'static str> {
        match self {
            Self::Loading => Some("Loading"),
            Self::Buffering => Some("Buffering"),
            Self::Seeking => Some("Seeking"),
            _ => None,
        }
    }
}

// ── Transport commands ────────────────────────────────────────────────────────

/// Destructive playback commands bound to the touch-sensitive knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    PlayPause,
    Rewind15,
    Forward15,
    Stop,
    Restart,
}

impl Transport {
    /// Status line shown once the command has been written to the host.
    pub fn progress_message(self) -> &'static str {
        match self {
            Self::PlayPause => "Toggling pause...",
            Self::Rewind15 => "Rewind 15s...",
            Self::Forward15 => "Forward 15s...",
            Self::Stop => "Stopping...",
            Self::Restart => "Restarting...",
        }
    }
}

/// Which write protocol the host module speaks for transport commands.
///
/// Both dialects exist in deployed host builds and are mutually exclusive,
/// so this is chosen by configuration rather than detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `<name>_step = "trigger"` edge triggers.
    #[default]
    Step,
    /// `play_pause_toggle`, `seek_delta_seconds`, `stop`, `restart`.
    Toggle,
}

impl Dialect {
    /// The single parameter write that performs `cmd`.
    pub fn write_for(self, cmd: Transport) -> (&'static str, &'static str) {
        match self {
            Self::Step => match cmd {
                Transport::PlayPause => ("play_pause_step", "trigger"),
                Transport::Rewind15 => ("rewind_15_step", "trigger"),
                Transport::Forward15 => ("forward_15_step", "trigger"),
                Transport::Stop => ("stop_step", "trigger"),
                Transport::Restart => ("restart_step", "trigger"),
            },
            Self::Toggle => match cmd {
                Transport::PlayPause => ("play_pause_toggle", "1"),
                Transport::Rewind15 => ("seek_delta_seconds", "-15"),
                Transport::Forward15 => ("seek_delta_seconds", "15"),
                Transport::Stop => ("stop", "1"),
                Transport::Restart => ("restart", "1"),
            },
        }
    }

    /// Send `cmd` to the host.
    pub fn send(self, host: &mut dyn Host, cmd: Transport) {
        let (key, value) = self.write_for(cmd);
        host.set(key, value);
    }
}
