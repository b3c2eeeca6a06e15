//! Reading position and bookmark state for a bilingual (English/Hindi)
//! chapter/verse text.
//!
//! The crate owns no UI. It keeps track of which chapter and verse a reader
//! is on, loads chapter content lazily from a [`ContentRepository`], persists
//! the last-read verse per chapter, and maintains a toggle-only bookmark set.
//! All state survives restarts through a [`KeyValueStore`] backend.
//!
//! Failures never escape the state manager: unknown chapters end in
//! [`SessionState::NotFound`], failed loads in [`SessionState::Empty`], and
//! storage errors read as "no data".
//!
//! ```rust,no_run
//! use gita_reader::{
//!     DirContentRepository, FileStore, PersistenceAdapter, ReaderApp, ReaderConfig,
//! };
//!
//! # async fn example() -> Result<(), gita_reader::ContentError> {
//! let config = ReaderConfig::default();
//! let repo = DirContentRepository::open("content", config.content).await?;
//! let storage = PersistenceAdapter::new(FileStore::new("state"));
//! let mut app = ReaderApp::new(repo, storage, &config);
//!
//! app.select_chapter(2).await;
//! app.next();
//! app.toggle_current_bookmark();
//! # Ok(())
//! # }
//! ```

#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented
    )
)]

pub mod app;
pub mod bookmarks;
pub mod config;
pub mod content;
pub mod error;
pub mod model;
pub mod router;
pub mod session;
pub mod storage;

pub use app::ReaderApp;
pub use bookmarks::{Bookmark, BookmarkStore, BookmarkToggle};
pub use config::{ContentLimits, ReaderConfig, StorageKeys};
pub use content::{
    parse_chapter_list, parse_chapter_unit, validate_verses, ContentRepository,
    DirContentRepository, StaticContentRepository,
};
pub use error::{ContentError, StorageError};
pub use model::{BilingualText, Chapter, ChapterId, Language, Verse, VerseId};
pub use router::{View, ViewRouter};
pub use session::{LoadRequest, ReadingProgress, ReadingSession, SessionState};
pub use storage::{FileStore, KeyValueStore, MemoryStore, PersistenceAdapter};
