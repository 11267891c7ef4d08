//! LoopbackHost — a stand-in host module for the simulator.
//!
//! Answers searches after a random delay with made-up rows and walks a
//! started stream through loading → buffering → streaming.  Understands
//! both transport write dialects.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use webstream_proto::protocol::{
    result_provider_key, result_title_key, result_url_key, Host, SearchStatus, StreamStatus,
    KEY_SEARCH_COUNT, KEY_SEARCH_PROVIDER, KEY_SEARCH_QUERY, KEY_SEARCH_STATUS,
    KEY_STREAM_PROVIDER, KEY_STREAM_STATUS, KEY_STREAM_URL, MAX_RESULTS,
};
use webstream_proto::provider::Provider;

const SEARCH_DELAY_MS: std::ops::RangeInclusive<u64> = 300..=1500;
const MAX_FAKE_RESULTS: usize = 8;
const LOADING: Duration = Duration::from_millis(400);
const BUFFERING: Duration = Duration::from_millis(700);
const SEEKING: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
struct Search {
    provider: Provider,
    query: String,
    ready_at: Instant,
}

pub struct LoopbackHost {
    params: HashMap<String, String>,
    rng: StdRng,
    now: Instant,
    running: Option<Search>,
    /// Query submitted while another one was still running.
    queued: Option<(Provider, String)>,
    /// Pending automatic stream transition.
    stream_next: Option<(StreamStatus, Instant)>,
    exit_requested: bool,
}

impl LoopbackHost {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic delays and result counts.
    #[cfg(test)]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut params = HashMap::new();
        params.insert(KEY_SEARCH_STATUS.to_string(), "idle".to_string());
        params.insert(KEY_STREAM_STATUS.to_string(), "stopped".to_string());
        Self {
            params,
            rng,
            now: Instant::now(),
            running: None,
            queued: None,
            stream_next: None,
            exit_requested: false,
        }
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Advance simulated host work up to `now`.
    pub fn step(&mut self, now: Instant) {
        self.now = now;

        if self.running.as_ref().is_some_and(|s| s.ready_at <= now) {
            if let Some(search) = self.running.take() {
                self.finish_search(&search);
            }
            if let Some((provider, query)) = self.queued.take() {
                self.start_search(provider, query);
            }
        }

        while let Some((status, at)) = self.stream_next {
            if at > now {
                break;
            }
            self.stream_next = None;
            self.set_stream_status(status);
            if status == StreamStatus::Buffering {
                self.stream_next = Some((StreamStatus::Streaming, at + BUFFERING));
            }
        }
    }

    fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    fn put(&mut self, key: &str, value: impl Into<String>) {
        self.params.insert(key.to_string(), value.into());
    }

    fn stream_status(&self) -> StreamStatus {
        self.param(KEY_STREAM_STATUS)
            .and_then(StreamStatus::parse)
            .unwrap_or_default()
    }

    fn set_stream_status(&mut self, status: StreamStatus) {
        debug!("loopback stream → {}", status.as_str());
        self.put(KEY_STREAM_STATUS, status.as_str());
    }

    fn set_search_status(&mut self, status: SearchStatus) {
        debug!("loopback search → {}", status.as_str());
        self.put(KEY_SEARCH_STATUS, status.as_str());
    }

    // ── Search ────────────────────────────────────────────────────────────────

    fn submit(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.running = None;
            self.queued = None;
            self.put(KEY_SEARCH_COUNT, "0");
            self.set_search_status(SearchStatus::Idle);
            return;
        }
        let provider = Provider::normalize_or(self.param(KEY_SEARCH_PROVIDER), Provider::YouTube);
        if self.running.is_some() {
            self.queued = Some((provider, query.to_string()));
            self.set_search_status(SearchStatus::Queued);
        } else {
            self.start_search(provider, query.to_string());
        }
    }

    fn start_search(&mut self, provider: Provider, query: String) {
        let delay = Duration::from_millis(self.rng.gen_range(SEARCH_DELAY_MS));
        self.running = Some(Search {
            provider,
            query,
            ready_at: self.now + delay,
        });
        self.set_search_status(SearchStatus::Searching);
    }

    fn finish_search(&mut self, search: &Search) {
        let count = self.rng.gen_range(0..=MAX_FAKE_RESULTS).min(MAX_RESULTS);
        for i in 0..MAX_RESULTS {
            self.params.remove(&result_provider_key(i));
            self.params.remove(&result_title_key(i));
            self.params.remove(&result_url_key(i));
        }
        for i in 0..count {
            self.put(&result_provider_key(i), search.provider.id());
            self.put(&result_title_key(i), format!("{} #{}", search.query, i + 1));
            self.put(
                &result_url_key(i),
                format!("loopback://{}/{}", search.provider.id(), i + 1),
            );
        }
        self.put(KEY_SEARCH_COUNT, count.to_string());
        self.set_search_status(if count == 0 {
            SearchStatus::NoResults
        } else {
            SearchStatus::Done
        });
    }

    // ── Playback ──────────────────────────────────────────────────────────────

    fn start_stream(&mut self) {
        if self.param(KEY_STREAM_URL).is_none() {
            self.set_stream_status(StreamStatus::Stopped);
            self.stream_next = None;
            return;
        }
        self.set_stream_status(StreamStatus::Loading);
        self.stream_next = Some((StreamStatus::Buffering, self.now + LOADING));
    }

    fn toggle_pause(&mut self) {
        match self.stream_status() {
            StreamStatus::Streaming => self.set_stream_status(StreamStatus::Paused),
            StreamStatus::Paused => self.set_stream_status(StreamStatus::Streaming),
            _ => {}
        }
    }

    fn seek(&mut self) {
        if matches!(
            self.stream_status(),
            StreamStatus::Streaming | StreamStatus::Paused
        ) {
            self.set_stream_status(StreamStatus::Seeking);
            self.stream_next = Some((StreamStatus::Streaming, self.now + SEEKING));
        }
    }

    fn stop(&mut self) {
        self.stream_next = None;
        self.set_stream_status(StreamStatus::Stopped);
    }
}

impl Default for LoopbackHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for LoopbackHost {
    fn get(&self, key: &str) -> Option<String> {
        self.params.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.put(key, value);
        match key {
            KEY_SEARCH_QUERY => self.submit(value),
            KEY_STREAM_URL => self.start_stream(),
            KEY_STREAM_PROVIDER => {}
            "play_pause_step" | "play_pause_toggle" => self.toggle_pause(),
            "rewind_15_step" | "forward_15_step" | "seek_delta_seconds" => self.seek(),
            "stop_step" | "stop" => self.stop(),
            "restart_step" | "restart" => self.start_stream(),
            _ => {}
        }
    }

    fn return_to_menu(&mut self) {
        self.exit_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(host: &LoopbackHost) -> usize {
        host.get(KEY_SEARCH_COUNT)
            .and_then(|c| c.parse().ok())
            .unwrap_or(0)
    }

    #[test]
    fn test_search_finishes_after_delay() {
        let mut host = LoopbackHost::seeded(7);
        let start = host.now;
        host.set(KEY_SEARCH_PROVIDER, "freesound");
        host.set(KEY_SEARCH_QUERY, "rain");
        assert_eq!(host.get(KEY_SEARCH_STATUS).as_deref(), Some("searching"));

        host.step(start + Duration::from_millis(100));
        assert_eq!(host.get(KEY_SEARCH_STATUS).as_deref(), Some("searching"));

        host.step(start + Duration::from_secs(2));
        let status = host.get(KEY_SEARCH_STATUS);
        let n = count(&host);
        if n == 0 {
            assert_eq!(status.as_deref(), Some("no_results"));
        } else {
            assert_eq!(status.as_deref(), Some("done"));
            assert_eq!(host.get(&result_title_key(0)).as_deref(), Some("rain #1"));
            assert_eq!(
                host.get(&result_provider_key(0)).as_deref(),
                Some("freesound")
            );
            assert_eq!(
                host.get(&result_url_key(n - 1)),
                Some(format!("loopback://freesound/{}", n))
            );
        }
    }

    #[test]
    fn test_second_query_is_queued() {
        let mut host = LoopbackHost::seeded(1);
        let start = host.now;
        host.set(KEY_SEARCH_QUERY, "one");
        host.set(KEY_SEARCH_QUERY, "two");
        assert_eq!(host.get(KEY_SEARCH_STATUS).as_deref(), Some("queued"));

        host.step(start + Duration::from_secs(2));
        assert_eq!(host.get(KEY_SEARCH_STATUS).as_deref(), Some("searching"));
        host.step(start + Duration::from_secs(4));
        assert_ne!(host.get(KEY_SEARCH_STATUS).as_deref(), Some("searching"));
    }

    #[test]
    fn test_empty_query_resets() {
        let mut host = LoopbackHost::seeded(3);
        host.set(KEY_SEARCH_QUERY, "x");
        host.set(KEY_SEARCH_QUERY, "");
        assert_eq!(host.get(KEY_SEARCH_STATUS).as_deref(), Some("idle"));
        assert_eq!(count(&host), 0);
    }

    #[test]
    fn test_stream_lifecycle_and_transport() {
        let mut host = LoopbackHost::seeded(0);
        let start = host.now;
        host.set(KEY_STREAM_PROVIDER, "youtube");
        host.set(KEY_STREAM_URL, "loopback://youtube/1");
        assert_eq!(host.get(KEY_STREAM_STATUS).as_deref(), Some("loading"));

        host.step(start + LOADING);
        assert_eq!(host.get(KEY_STREAM_STATUS).as_deref(), Some("buffering"));
        host.step(start + LOADING + BUFFERING);
        assert_eq!(host.get(KEY_STREAM_STATUS).as_deref(), Some("streaming"));

        host.set("play_pause_step", "trigger");
        assert_eq!(host.get(KEY_STREAM_STATUS).as_deref(), Some("paused"));
        host.set("play_pause_toggle", "1");
        assert_eq!(host.get(KEY_STREAM_STATUS).as_deref(), Some("streaming"));

        host.set("seek_delta_seconds", "-15");
        assert_eq!(host.get(KEY_STREAM_STATUS).as_deref(), Some("seeking"));

        host.set("stop_step", "trigger");
        host.step(start + Duration::from_secs(10));
        assert_eq!(host.get(KEY_STREAM_STATUS).as_deref(), Some("stopped"));

        host.set("restart", "1");
        assert_eq!(host.get(KEY_STREAM_STATUS).as_deref(), Some("loading"));
    }

    #[test]
    fn test_return_to_menu_flags_exit() {
        let mut host = LoopbackHost::seeded(0);
        assert!(!host.exit_requested());
        host.return_to_menu();
        assert!(host.exit_requested());
    }
}
