//! Provider identifiers and display-label formatting.

use serde::{Deserialize, Serialize};

/// Default cap for menu labels on the device screen.
pub const LABEL_MAX: usize = 24;

const UNTITLED: &str = "(untitled)";

/// A streaming-media search provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    YouTube,
    FreeSound,
    Archive,
    SoundCloud,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::YouTube,
        Provider::FreeSound,
        Provider::Archive,
        Provider::SoundCloud,
    ];

    /// Canonicalize a provider identifier, accepting the short aliases the
    /// host and older history files use.  Returns `None` for empty or
    /// unknown input.
    pub fn normalize(raw: &str) -> Option<Provider> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "youtube" | "yt" => Some(Self::YouTube),
            "freesound" | "fs" => Some(Self::FreeSound),
            "archive" | "ia" | "archiveorg" | "internetarchive" => Some(Self::Archive),
            "soundcloud" | "sc" => Some(Self::SoundCloud),
            _ => None,
        }
    }

    /// Like `normalize`, falling back to `default` for empty/unknown input.
    pub fn normalize_or(raw: Option<&str>, default: Provider) -> Provider {
        raw.and_then(Self::normalize).unwrap_or(default)
    }

    /// Wire identifier written to the host.
    pub fn id(self) -> &'static str {
        match self {
            Self::YouTube => "youtube",
            Self::FreeSound => "freesound",
            Self::Archive => "archive",
            Self::SoundCloud => "soundcloud",
        }
    }

    /// Human-readable name for the provider picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::YouTube => "YouTube",
            Self::FreeSound => "FreeSound",
            Self::Archive => "Archive.org",
            Self::SoundCloud => "SoundCloud",
        }
    }

    /// Four-character tag used in titles and history rows.
    pub fn tag(self) -> &'static str {
        match self {
            Self::YouTube => "[YT]",
            Self::FreeSound => "[FS]",
            Self::Archive => "[AR]",
            Self::SoundCloud => "[SC]",
        }
    }
}

/// Sanitize text for the device font and cap it at `max_len` characters.
///
/// Runs of non-printable-ASCII characters become a single space, whitespace
/// is collapsed and trimmed.  Over-long labels keep `max_len - 1` characters
/// followed by an ellipsis.
pub fn clean_label(text: &str, max_len: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_ascii_graphic() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }

    if out.is_empty() {
        return UNTITLED.to_string();
    }

    if out.chars().count() > max_len {
        let mut cut: String = out.chars().take(max_len.saturating_sub(1)).collect();
        cut.push('…');
        return cut;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_aliases() {
        assert_eq!(Provider::normalize("YT"), Some(Provider::YouTube));
        assert_eq!(Provider::normalize(" fs "), Some(Provider::FreeSound));
        assert_eq!(Provider::normalize("ia"), Some(Provider::Archive));
        assert_eq!(
            Provider::normalize("InternetArchive"),
            Some(Provider::Archive)
        );
        assert_eq!(Provider::normalize("sc"), Some(Provider::SoundCloud));
        assert_eq!(Provider::normalize(""), None);
        assert_eq!(Provider::normalize("bandcamp"), None);
    }

    #[test]
    fn test_normalize_or_falls_back() {
        assert_eq!(
            Provider::normalize_or(None, Provider::Archive),
            Provider::Archive
        );
        assert_eq!(
            Provider::normalize_or(Some("   "), Provider::SoundCloud),
            Provider::SoundCloud
        );
        assert_eq!(
            Provider::normalize_or(Some("freesound"), Provider::YouTube),
            Provider::FreeSound
        );
    }

    #[test]
    fn test_tags() {
        assert_eq!(Provider::Archive.tag(), "[AR]");
        assert_eq!(Provider::SoundCloud.tag(), "[SC]");
    }

    #[test]
    fn test_serde_uses_wire_ids() {
        let json = serde_json::to_string(&Provider::SoundCloud).unwrap();
        assert_eq!(json, "\"soundcloud\"");
        let back: Provider = serde_json::from_str("\"freesound\"").unwrap();
        assert_eq!(back, Provider::FreeSound);
    }

    #[test]
    fn test_clean_label_collapses_and_strips() {
        assert_eq!(clean_label("  Hello\t\n  World  ", 24), "Hello World");
        assert_eq!(clean_label("Björk – Jóga", 24), "Bj rk J ga");
        assert_eq!(clean_label("\u{1F600}\u{1F600}", 24), "(untitled)");
        assert_eq!(clean_label("", 24), "(untitled)");
    }

    #[test]
    fn test_clean_label_truncates_with_ellipsis() {
        let label = clean_label("abcdefghijklmnopqrstuvwxyz", 10);
        assert_eq!(label, "abcdefghi…");
        assert_eq!(label.chars().count(), 10);
        assert_eq!(clean_label("exactly ten", 11), "exactly ten");
    }
}
