//! Search history — bounded, deduplicated, most-recent-first, persisted as a
//! JSON array.
//!
//! Loading is tolerant: the canonical file is tried first, then the legacy
//! locations in order, and both bare-string and `{provider, query}` entries
//! are accepted.  Anything unreadable is an empty history.  A history found
//! at a legacy location is immediately re-saved to the canonical path.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::HistoryError;
use crate::provider::{clean_label, Provider};

pub const MAX_HISTORY: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub provider: Provider,
    pub query: String,
}

impl HistoryEntry {
    /// Build an entry from raw input.  `None` if the trimmed query is empty.
    pub fn new(provider: Provider, query: &str) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        Some(Self {
            provider,
            query: query.to_string(),
        })
    }

    /// Menu label, e.g. `[YT] boards of canada`.
    pub fn label(&self, max_len: usize) -> String {
        clean_label(&format!("{} {}", self.provider.tag(), self.query), max_len)
    }

    fn same_key(&self, other: &HistoryEntry) -> bool {
        self.provider == other.provider && self.query == other.query
    }
}

/// On-disk entry shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryFormat {
    /// `[{"provider": "youtube", "query": "..."}]`
    Objects,
    /// `["..."]` — single-provider variants.
    Strings,
}

pub struct HistoryStore {
    path: PathBuf,
    legacy_paths: Vec<PathBuf>,
    format: HistoryFormat,
    default_provider: Provider,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn new(
        path: PathBuf,
        legacy_paths: Vec<PathBuf>,
        format: HistoryFormat,
        default_provider: Provider,
    ) -> Self {
        Self {
            path,
            legacy_paths,
            format,
            default_provider,
            entries: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a search.  Moves an existing identical entry to the front.
    /// Returns false (and changes nothing) for an empty query.
    pub fn add(&mut self, provider: Provider, query: &str) -> bool {
        let Some(entry) = HistoryEntry::new(provider, query) else {
            return false;
        };
        self.entries.retain(|e| !e.same_key(&entry));
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_HISTORY);
        true
    }

    /// Replace the in-memory history with what is on disk.  Never fails.
    pub fn load(&mut self) {
        let Some((content, from_legacy)) = self.read_first() else {
            self.entries.clear();
            return;
        };

        match parse_entries(&content, self.default_provider) {
            Some(entries) => {
                self.entries = entries;
                if from_legacy {
                    info!(
                        "migrating {} history entries to {}",
                        self.entries.len(),
                        self.path.display()
                    );
                    if let Err(e) = self.save() {
                        warn!("history migration failed: {}", e);
                    }
                }
            }
            None => {
                debug!("history file is not a JSON array; starting empty");
                self.entries.clear();
            }
        }
    }

    /// Persist the first `MAX_HISTORY` entries.
    ///
    /// Writes `<path>.tmp` and renames it over the destination.  If the
    /// rename fails the destination is overwritten in place and the temp
    /// file removed on a best-effort basis; if the temp write fails the
    /// destination is written directly.
    pub fn save(&self) -> Result<(), HistoryError> {
        let payload = self.encode()?;
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let tmp = temp_path(&self.path);
        if let Err(e) = fs::write(&tmp, &payload) {
            debug!("temp write {} failed: {}", tmp.display(), e);
            return fs::write(&self.path, &payload)
                .map_err(|e| HistoryError::io(&self.path, e));
        }

        match fs::rename(&tmp, &self.path) {
            Ok(()) => Ok(()),
            Err(e) => {
                debug!("rename onto {} failed: {}", self.path.display(), e);
                let direct = fs::write(&self.path, &payload);
                let _ = fs::remove_file(&tmp);
                direct.map_err(|e| HistoryError::io(&self.path, e))
            }
        }
    }

    /// Serialized file content, including the trailing newline.
    pub fn encode(&self) -> Result<String, HistoryError> {
        let head = &self.entries[..self.entries.len().min(MAX_HISTORY)];
        let json = match self.format {
            HistoryFormat::Objects => serde_json::to_string(head)?,
            HistoryFormat::Strings => {
                let queries: Vec<&str> = head.iter().map(|e| e.query.as_str()).collect();
                serde_json::to_string(&queries)?
            }
        };
        Ok(format!("{}\n", json))
    }

    /// First non-empty file among canonical then legacy paths.
    fn read_first(&self) -> Option<(String, bool)> {
        if let Some(content) = read_non_empty(&self.path) {
            return Some((content, false));
        }
        self.legacy_paths
            .iter()
            .find_map(|p| read_non_empty(p))
            .map(|content| (content, true))
    }
}

fn read_non_empty(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    if content.is_empty() {
        return None;
    }
    Some(content)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_owned();
    os.push(".tmp");
    PathBuf::from(os)
}

/// Decode a history file.  `None` if it is not a JSON array; individual
/// entries that are empty or of the wrong shape are skipped.
pub fn parse_entries(content: &str, default_provider: Provider) -> Option<Vec<HistoryEntry>> {
    let value: Value = serde_json::from_str(content).ok()?;
    let items = value.as_array()?;

    let mut out: Vec<HistoryEntry> = Vec::new();
    for item in items {
        let entry = match item {
            Value::String(query) => HistoryEntry::new(default_provider, query),
            Value::Object(obj) => {
                let provider = Provider::normalize_or(
                    obj.get("provider").and_then(Value::as_str),
                    default_provider,
                );
                let query = obj.get("query").and_then(Value::as_str).unwrap_or("");
                HistoryEntry::new(provider, query)
            }
            _ => None,
        };
        let Some(entry) = entry else { continue };
        if out.iter().any(|e| e.same_key(&entry)) {
            continue;
        }
        out.push(entry);
        if out.len() >= MAX_HISTORY {
            break;
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir, format: HistoryFormat) -> HistoryStore {
        HistoryStore::new(
            dir.path().join("config").join("history.json"),
            vec![dir.path().join("legacy1.json"), dir.path().join("legacy2.json")],
            format,
            Provider::YouTube,
        )
    }

    #[test]
    fn test_add_dedupes_and_moves_to_front() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir, HistoryFormat::Objects);
        assert!(store.add(Provider::YouTube, "aphex"));
        assert!(store.add(Provider::FreeSound, "rain"));
        assert!(store.add(Provider::YouTube, "  aphex  "));

        assert_eq!(store.len(), 2);
        assert_eq!(store.entries()[0].query, "aphex");
        assert_eq!(store.entries()[1].provider, Provider::FreeSound);
    }

    #[test]
    fn test_same_query_different_provider_is_distinct() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir, HistoryFormat::Objects);
        store.add(Provider::YouTube, "rain");
        store.add(Provider::FreeSound, "rain");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_rejects_blank_query() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir, HistoryFormat::Objects);
        assert!(!store.add(Provider::YouTube, "   "));
        assert!(store.is_empty());
    }

    #[test]
    fn test_twenty_first_entry_evicts_oldest() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir, HistoryFormat::Objects);
        for i in 0..=MAX_HISTORY {
            store.add(Provider::YouTube, &format!("q{}", i));
        }
        assert_eq!(store.len(), MAX_HISTORY);
        assert_eq!(store.entries()[0].query, "q20");
        assert!(store.entries().iter().all(|e| e.query != "q0"));
    }

    #[test]
    fn test_save_load_roundtrip_objects() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir, HistoryFormat::Objects);
        store.add(Provider::Archive, "field recordings");
        store.add(Provider::SoundCloud, "ambient");
        store.add(Provider::YouTube, "drone");
        store.save().unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.ends_with('\n'));
        assert!(content.contains("\"provider\":\"soundcloud\""));

        let mut reloaded = store_in(&dir, HistoryFormat::Objects);
        reloaded.load();
        assert_eq!(reloaded.entries(), store.entries());
    }

    #[test]
    fn test_save_load_roundtrip_bare_strings() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir, HistoryFormat::Strings);
        store.add(Provider::YouTube, "one");
        store.add(Provider::YouTube, "two");
        store.save().unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "[\"two\",\"one\"]\n");

        let mut reloaded = store_in(&dir, HistoryFormat::Strings);
        reloaded.load();
        assert_eq!(reloaded.entries(), store.entries());
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir, HistoryFormat::Objects);
        store.add(Provider::YouTube, "x");
        store.save().unwrap();
        assert!(store.path().exists());
        assert!(!temp_path(store.path()).exists());
    }

    #[test]
    fn test_save_failure_is_reported_and_temp_cleaned() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir, HistoryFormat::Objects);
        // A directory at the destination defeats both rename and overwrite.
        fs::create_dir_all(store.path()).unwrap();
        store.add(Provider::YouTube, "x");

        let err = store.save().unwrap_err();
        assert!(matches!(err, HistoryError::Io { .. }));
        assert!(!temp_path(store.path()).exists());
    }

    #[test]
    fn test_blocked_temp_falls_back_to_direct_write() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir, HistoryFormat::Objects);
        // A directory where the temp file would go makes the temp write fail.
        fs::create_dir_all(temp_path(store.path())).unwrap();
        store.add(Provider::FreeSound, "rain");

        store.save().unwrap();
        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, store.encode().unwrap());
        assert!(content.contains("\"rain\""));
        assert!(temp_path(store.path()).is_dir());
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir, HistoryFormat::Objects);
        store.add(Provider::YouTube, "stale");
        store.load();
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir, HistoryFormat::Objects);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();

        fs::write(store.path(), "not json").unwrap();
        store.load();
        assert!(store.is_empty());

        fs::write(store.path(), "{\"query\": \"x\"}").unwrap();
        store.load();
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_accepts_mixed_shapes_and_skips_junk() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir, HistoryFormat::Objects);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            r#"["bare", {"provider": "fs", "query": " rain "}, {"query": ""}, 42,
               {"provider": "sc"}, {"provider": "bogus", "query": "odd"}, "bare"]"#,
        )
        .unwrap();

        store.load();
        let got: Vec<(Provider, &str)> = store
            .entries()
            .iter()
            .map(|e| (e.provider, e.query.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                (Provider::YouTube, "bare"),
                (Provider::FreeSound, "rain"),
                (Provider::YouTube, "odd"),
            ]
        );
    }

    #[test]
    fn test_load_caps_at_max() {
        let queries: Vec<String> = (0..30).map(|i| format!("q{}", i)).collect();
        let content = serde_json::to_string(&queries).unwrap();
        let entries = parse_entries(&content, Provider::YouTube).unwrap();
        assert_eq!(entries.len(), MAX_HISTORY);
        assert_eq!(entries[0].query, "q0");
    }

    #[test]
    fn test_legacy_file_is_migrated() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("legacy2.json"), r#"["old one", "old two"]"#).unwrap();

        let mut store = store_in(&dir, HistoryFormat::Objects);
        store.load();
        assert_eq!(store.len(), 2);

        let migrated = fs::read_to_string(store.path()).unwrap();
        assert!(migrated.contains("\"query\":\"old one\""));
    }

    #[test]
    fn test_first_legacy_path_wins() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("legacy1.json"), r#"["newer"]"#).unwrap();
        fs::write(dir.path().join("legacy2.json"), r#"["older"]"#).unwrap();

        let mut store = store_in(&dir, HistoryFormat::Objects);
        store.load();
        assert_eq!(store.entries()[0].query, "newer");
    }

    #[test]
    fn test_empty_canonical_falls_through_to_legacy() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir, HistoryFormat::Objects);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "").unwrap();
        fs::write(dir.path().join("legacy1.json"), r#"["from legacy"]"#).unwrap();

        store.load();
        assert_eq!(store.entries()[0].query, "from legacy");
    }

    #[test]
    fn test_entry_label_is_tagged_and_capped() {
        let entry = HistoryEntry::new(Provider::Archive, "a very long query about tape loops")
            .unwrap();
        let label = entry.label(24);
        assert!(label.starts_with("[AR] a very"));
        assert_eq!(label.chars().count(), 24);
    }
}
