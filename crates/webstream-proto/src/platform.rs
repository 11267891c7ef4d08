use std::path::{Path, PathBuf};

/// Module root on the controller's user partition.
pub const DEVICE_ROOT: &str = "/data/UserData/move-anything";

const HISTORY_FILE: &str = "webstream_search_history.json";
const LEGACY_YT_HISTORY_FILE: &str = "yt_search_history.json";

/// Root for everything this module persists.
///
/// On the controller this is the shared module directory; anywhere else it
/// falls back to `~/.local/share/webstream/` so the simulator never touches
/// system paths.
pub fn data_dir() -> PathBuf {
    let device = Path::new(DEVICE_ROOT);
    if device.is_dir() {
        return device.to_path_buf();
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".local")
        .join("share")
        .join("webstream")
}

pub fn config_dir() -> PathBuf {
    data_dir().join("config")
}

/// Canonical search-history location.
pub fn history_path() -> PathBuf {
    config_dir().join(HISTORY_FILE)
}

/// Older history locations, newest first.  Read only for migration.
pub fn legacy_history_paths() -> Vec<PathBuf> {
    let root = data_dir();
    vec![root.join(HISTORY_FILE), root.join(LEGACY_YT_HISTORY_FILE)]
}

pub fn log_path() -> PathBuf {
    data_dir().join("webstream.log")
}
