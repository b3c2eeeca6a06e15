//! Reader configuration and persisted key layout.

use serde::{Deserialize, Serialize};

use crate::model::{ChapterId, Language};

/// Default prefix for every persisted key.
pub const DEFAULT_STORAGE_PREFIX: &str = "gita";

/// Limits applied when decoding a chapter's content unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentLimits {
    /// Maximum bytes read for one content unit or chapter list.
    pub max_unit_bytes: usize,
    /// Maximum verses accepted for a single chapter.
    pub max_verses: usize,
}

impl Default for ContentLimits {
    fn default() -> Self {
        Self {
            max_unit_bytes: 4 * 1024 * 1024,
            max_verses: 1024,
        }
    }
}

/// Top-level options for [`ReaderApp`](crate::ReaderApp).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Namespace prepended to every persisted key.
    pub storage_prefix: String,
    /// Language used when no preference has been persisted yet.
    pub default_language: Language,
    /// Content decoding limits.
    pub content: ContentLimits,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            default_language: Language::default(),
            content: ContentLimits::default(),
        }
    }
}

impl ReaderConfig {
    /// Parse a JSON config. Missing fields fall back to their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Persisted key layout derived from `storage_prefix`.
    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::new(&self.storage_prefix)
    }
}

/// Persisted key layout.
///
/// Reading positions get one key per chapter; bookmarks and the language
/// preference each live under a single fixed key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageKeys {
    prefix: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_PREFIX)
    }
}

impl StorageKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Key holding the last-read verse index for `chapter_id`.
    pub fn reading_position(&self, chapter_id: ChapterId) -> String {
        format!("{}-chapter-{}-verse", self.prefix, chapter_id)
    }

    /// Key holding the serialized bookmark set.
    pub fn bookmarks(&self) -> String {
        format!("{}-bookmarks", self.prefix)
    }

    /// Key holding the language preference.
    pub fn language(&self) -> String {
        format!("{}-language", self.prefix)
    }
}
