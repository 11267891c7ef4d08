//! State reconciler — polls host parameters and reports what changed.
//!
//! The host never pushes; every `poll_every` render ticks the reconciler
//! reads the status parameters, diffs them against the last snapshot and
//! only then reloads result rows.  Missing or malformed values fall back to
//! safe defaults instead of erroring.

use tracing::debug;
use webstream_proto::protocol::{
    result_provider_key, result_title_key, result_url_key, Host, SearchStatus, StreamStatus,
    KEY_SEARCH_COUNT, KEY_SEARCH_PROVIDER, KEY_SEARCH_QUERY, KEY_SEARCH_STATUS,
    KEY_STREAM_STATUS, MAX_RESULTS,
};
use webstream_proto::provider::Provider;
use webstream_proto::state::{ReconciledState, SearchResult};

/// Which parts of the snapshot changed in the last poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delta {
    /// Provider, search status or result count changed; rows were reloaded.
    pub search: bool,
    pub stream: bool,
}

pub struct Reconciler {
    state: ReconciledState,
    poll_every: u32,
    counter: u32,
}

impl Reconciler {
    pub fn new(provider: Provider, poll_every: u32) -> Self {
        Self {
            state: ReconciledState::new(provider),
            poll_every: poll_every.max(1),
            counter: 0,
        }
    }

    pub fn state(&self) -> &ReconciledState {
        &self.state
    }

    /// Start over from an idle snapshot for `provider`.
    pub fn reset(&mut self, provider: Provider) {
        self.state = ReconciledState::new(provider);
        self.counter = 0;
    }

    /// Count a render tick.  True when a poll is due.
    pub fn tick(&mut self) -> bool {
        self.counter = (self.counter + 1) % self.poll_every;
        self.counter == 0
    }

    /// Read the host and update the snapshot.  `None` if nothing changed.
    pub fn poll(&mut self, host: &dyn Host) -> Option<Delta> {
        let prev_provider = self.state.search_provider;
        let prev_status = self.state.search_status;
        let prev_count = self.state.search_count;
        let prev_stream = self.state.stream_status;

        self.state.stream_status = read(host, KEY_STREAM_STATUS)
            .and_then(|s| StreamStatus::parse(&s))
            .unwrap_or(StreamStatus::Stopped);
        self.state.search_provider =
            Provider::normalize_or(read(host, KEY_SEARCH_PROVIDER).as_deref(), prev_provider);
        self.state.search_query = read(host, KEY_SEARCH_QUERY).unwrap_or_default();
        self.state.search_status = read(host, KEY_SEARCH_STATUS)
            .and_then(|s| SearchStatus::parse(&s))
            .unwrap_or(SearchStatus::Idle);
        self.state.search_count = read(host, KEY_SEARCH_COUNT)
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let delta = Delta {
            search: self.state.search_provider != prev_provider
                || self.state.search_status != prev_status
                || self.state.search_count != prev_count,
            stream: self.state.stream_status != prev_stream,
        };

        if delta.search {
            self.load_results(host);
            debug!(
                "search {} {} count={} rows={}",
                self.state.search_provider.id(),
                self.state.search_status.as_str(),
                self.state.search_count,
                self.state.results.len()
            );
        }
        if delta.stream {
            debug!(
                "stream {} -> {}",
                prev_stream.as_str(),
                self.state.stream_status.as_str()
            );
        }

        (delta.search || delta.stream).then_some(delta)
    }

    /// The session just asked the host for a new search.
    pub fn begin_search(&mut self, provider: Provider) {
        self.state.search_provider = provider;
        self.state.search_count = 0;
        self.state.results.clear();
    }

    /// The session just cleared the host's query.
    pub fn clear_search(&mut self) {
        self.state.search_query.clear();
        self.state.search_status = SearchStatus::Idle;
        self.state.search_count = 0;
        self.state.results.clear();
    }

    fn load_results(&mut self, host: &dyn Host) {
        let fallback = self.state.search_provider;
        self.state.results = (0..self.state.search_count.min(MAX_RESULTS))
            .map(|i| SearchResult {
                provider: Provider::normalize_or(
                    read(host, &result_provider_key(i)).as_deref(),
                    fallback,
                ),
                title: read(host, &result_title_key(i)).unwrap_or_default(),
                url: read(host, &result_url_key(i)).unwrap_or_default(),
            })
            .collect();
    }
}

/// Empty strings count as unset.
fn read(host: &dyn Host, key: &str) -> Option<String> {
    host.get(key).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use webstream_proto::protocol::MemoryHost;

    fn host_with_results(status: &str, rows: &[(&str, &str, &str)]) -> MemoryHost {
        let mut host = MemoryHost::new();
        host.put(KEY_SEARCH_STATUS, status);
        host.put(KEY_SEARCH_COUNT, rows.len().to_string());
        for (i, (provider, title, url)) in rows.iter().enumerate() {
            host.put(&result_provider_key(i), *provider);
            host.put(&result_title_key(i), *title);
            host.put(&result_url_key(i), *url);
        }
        host
    }

    #[test]
    fn test_tick_cadence() {
        let mut rec = Reconciler::new(Provider::YouTube, 6);
        let due: Vec<bool> = (0..12).map(|_| rec.tick()).collect();
        assert_eq!(due.iter().filter(|d| **d).count(), 2);
        assert!(due[5] && due[11]);
    }

    #[test]
    fn test_empty_host_is_unchanged() {
        let mut rec = Reconciler::new(Provider::Archive, 6);
        let host = MemoryHost::new();
        assert_eq!(rec.poll(&host), None);
        assert_eq!(rec.state().search_provider, Provider::Archive);
        assert_eq!(rec.state().stream_status, StreamStatus::Stopped);
    }

    #[test]
    fn test_done_loads_rows() {
        let mut rec = Reconciler::new(Provider::YouTube, 6);
        let host = host_with_results(
            "done",
            &[
                ("fs", "rain on tin", "https://a"),
                ("", "no provider", "https://b"),
                ("youtube", "no url", ""),
            ],
        );
        let delta = rec.poll(&host).unwrap();
        assert!(delta.search);
        assert!(!delta.stream);

        let state = rec.state();
        assert_eq!(state.search_status, SearchStatus::Done);
        assert_eq!(state.results.len(), 3);
        assert_eq!(state.results[0].provider, Provider::FreeSound);
        assert_eq!(state.results[1].provider, Provider::YouTube);
        assert!(!state.results[2].is_playable());

        // Same values again: no change, rows not reread.
        assert_eq!(rec.poll(&host), None);
    }

    #[test]
    fn test_count_is_capped() {
        let mut rec = Reconciler::new(Provider::YouTube, 6);
        let mut host = MemoryHost::new();
        host.put(KEY_SEARCH_STATUS, "done");
        host.put(KEY_SEARCH_COUNT, "50");
        rec.poll(&host);
        assert_eq!(rec.state().search_count, 50);
        assert_eq!(rec.state().results.len(), MAX_RESULTS);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let mut rec = Reconciler::new(Provider::SoundCloud, 6);
        let mut host = MemoryHost::new();
        host.put(KEY_SEARCH_STATUS, "exploded");
        host.put(KEY_SEARCH_COUNT, "lots");
        host.put(KEY_SEARCH_PROVIDER, "myspace");
        host.put(KEY_STREAM_STATUS, "warbling");
        assert_eq!(rec.poll(&host), None);
        let state = rec.state();
        assert_eq!(state.search_status, SearchStatus::Idle);
        assert_eq!(state.search_count, 0);
        assert_eq!(state.search_provider, Provider::SoundCloud);
        assert_eq!(state.stream_status, StreamStatus::Stopped);
    }

    #[test]
    fn test_stream_change_only() {
        let mut rec = Reconciler::new(Provider::YouTube, 6);
        let mut host = MemoryHost::new();
        host.put(KEY_STREAM_STATUS, "buffering");
        assert_eq!(
            rec.poll(&host),
            Some(Delta {
                search: false,
                stream: true
            })
        );
    }

    #[test]
    fn test_provider_change_triggers_search_delta() {
        let mut rec = Reconciler::new(Provider::YouTube, 6);
        let mut host = MemoryHost::new();
        host.put(KEY_SEARCH_PROVIDER, "ia");
        let delta = rec.poll(&host).unwrap();
        assert!(delta.search);
        assert_eq!(rec.state().search_provider, Provider::Archive);
    }

    #[test]
    fn test_begin_search_forces_reload_on_next_poll() {
        let mut rec = Reconciler::new(Provider::YouTube, 6);
        let host = host_with_results("done", &[("yt", "a", "u")]);
        rec.poll(&host);
        rec.begin_search(Provider::FreeSound);
        assert!(rec.state().results.is_empty());
        assert_eq!(rec.state().search_provider, Provider::FreeSound);

        // The host still reports the old search; the count differs.
        let delta = rec.poll(&host).unwrap();
        assert!(delta.search);
        assert_eq!(rec.state().results.len(), 1);
    }

    #[test]
    fn test_clear_search() {
        let mut rec = Reconciler::new(Provider::YouTube, 6);
        let mut host = host_with_results("done", &[("yt", "a", "u")]);
        host.put(KEY_SEARCH_QUERY, "boards");
        rec.poll(&host);
        rec.clear_search();
        let state = rec.state();
        assert_eq!(state.search_status, SearchStatus::Idle);
        assert_eq!(state.search_count, 0);
        assert!(state.search_query.is_empty());
        assert!(state.results.is_empty());
    }
}
