use crate::protocol::{SearchStatus, StreamStatus};
use crate::provider::Provider;

/// One search result row as exposed by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResult {
    pub provider: Provider,
    pub title: String,
    pub url: String,
}

impl SearchResult {
    /// Rows without a URL are shown but cannot be played.
    pub fn is_playable(&self) -> bool {
        !self.url.is_empty()
    }
}

/// The UI's last-known view of the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconciledState {
    pub search_provider: Provider,
    pub search_query: String,
    pub search_status: SearchStatus,
    pub search_count: usize,
    pub stream_status: StreamStatus,
    /// Result rows, at most `protocol::MAX_RESULTS`.
    pub results: Vec<SearchResult>,
}

impl ReconciledState {
    pub fn new(provider: Provider) -> Self {
        Self {
            search_provider: provider,
            ..Self::default()
        }
    }

    /// Footer activity label while the host is busy, search first.
    pub fn activity(&self) -> Option<&'static str> {
        self.search_status
            .activity()
            .or_else(|| self.stream_status.activity())
    }

    pub fn is_paused(&self) -> bool {
        self.stream_status == StreamStatus::Paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_prefers_search() {
        let mut state = ReconciledState::new(Provider::YouTube);
        assert_eq!(state.activity(), None);

        state.stream_status = StreamStatus::Buffering;
        assert_eq!(state.activity(), Some("Buffering"));

        state.search_status = SearchStatus::Queued;
        assert_eq!(state.activity(), Some("Queued"));

        state.search_status = SearchStatus::Done;
        state.stream_status = StreamStatus::Streaming;
        assert_eq!(state.activity(), None);
    }

    #[test]
    fn test_playable_rows_need_url() {
        let row = SearchResult {
            title: "x".into(),
            ..SearchResult::default()
        };
        assert!(!row.is_playable());
    }
}
