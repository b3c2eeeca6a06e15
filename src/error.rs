//! Error types for content and storage backends.
//!
//! The state-manager surface never returns these: content failures degrade
//! into an empty session and storage failures into "no data". They exist so
//! backends can report what went wrong and the core can log it.

use core::fmt;

use crate::model::ChapterId;

/// Failure while fetching or decoding a chapter's content unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentError {
    /// Chapter id is unknown to the repository.
    NotFound(ChapterId),
    /// Underlying read failed.
    Io {
        path: String,
        message: String,
    },
    /// Payload could not be decoded into chapter records or verse records.
    Malformed(String),
    /// Payload exceeded a configured content limit.
    LimitExceeded {
        kind: &'static str,
        actual: usize,
        limit: usize,
    },
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "chapter {} not found", id),
            Self::Io { path, message } => write!(f, "content read failed: {}: {}", path, message),
            Self::Malformed(message) => write!(f, "malformed content: {}", message),
            Self::LimitExceeded {
                kind,
                actual,
                limit,
            } => write!(
                f,
                "content limit exceeded: {} (actual={} limit={})",
                kind, actual, limit
            ),
        }
    }
}

impl std::error::Error for ContentError {}

impl From<serde_json::Error> for ContentError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value.to_string())
    }
}

/// Failure reported by a [`KeyValueStore`](crate::storage::KeyValueStore) backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// Backend is switched off (private browsing, read-only media, ...).
    Disabled,
    /// Write would exceed the backend's capacity.
    QuotaExceeded { requested: usize, available: usize },
    /// Underlying I/O failed.
    Io(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "storage disabled"),
            Self::QuotaExceeded {
                requested,
                available,
            } => write!(
                f,
                "storage quota exceeded (requested={} available={})",
                requested, available
            ),
            Self::Io(message) => write!(f, "storage I/O failed: {}", message),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}
