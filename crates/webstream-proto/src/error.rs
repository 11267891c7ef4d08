use std::path::PathBuf;

/// Failures persisting the search history.
///
/// Loading never produces one of these; a missing or malformed file is an
/// empty history.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),
}

impl HistoryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
