//! Bookmarked verses.
//!
//! The set is toggle-only: [`BookmarkStore::toggle`] is the one mutator and
//! flips membership of a `(chapter, verse)` pair. Every flip writes the full
//! set back to storage under a single key.

use std::collections::HashSet;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::model::{ChapterId, VerseId};
use crate::storage::PersistenceAdapter;

/// A user-marked verse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub chapter_id: ChapterId,
    pub verse_id: VerseId,
    /// Verse number for display, not part of the identity.
    pub verse_number: u32,
}

impl Bookmark {
    pub fn new(chapter_id: ChapterId, verse_id: VerseId, verse_number: u32) -> Self {
        Self {
            chapter_id,
            verse_id,
            verse_number,
        }
    }

    fn key(&self) -> (ChapterId, VerseId) {
        (self.chapter_id, self.verse_id)
    }
}

/// Direction a toggle went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookmarkToggle {
    Added,
    Removed,
}

/// Insertion-ordered bookmark set with O(1) membership checks.
#[derive(Debug)]
pub struct BookmarkStore {
    entries: Vec<Bookmark>,
    index: HashSet<(ChapterId, VerseId)>,
    storage: PersistenceAdapter,
    key: String,
}

impl BookmarkStore {
    /// Hydrate from `key` in `storage`.
    ///
    /// A missing or unreadable value starts an empty set. Repeated
    /// `(chapter, verse)` pairs keep their first occurrence.
    pub fn hydrate(storage: PersistenceAdapter, key: impl Into<String>) -> Self {
        let key = key.into();
        let mut store = Self {
            entries: Vec::new(),
            index: HashSet::new(),
            storage,
            key,
        };
        let Some(payload) = store.storage.get(&store.key) else {
            return store;
        };
        match serde_json::from_str::<Vec<Bookmark>>(&payload) {
            Ok(bookmarks) => {
                for bookmark in bookmarks {
                    if store.index.insert(bookmark.key()) {
                        store.entries.push(bookmark);
                    }
                }
                debug!("hydrated {} bookmarks", store.entries.len());
            }
            Err(err) => warn!("ignoring corrupt bookmark payload: {}", err),
        }
        store
    }

    /// Flip the bookmark for `(chapter_id, verse_id)`.
    ///
    /// An existing bookmark is removed; otherwise `(chapter_id, verse_id,
    /// verse_number)` is appended to the end of the enumeration order.
    pub fn toggle(
        &mut self,
        chapter_id: ChapterId,
        verse_id: VerseId,
        verse_number: u32,
    ) -> BookmarkToggle {
        let outcome = if self.index.remove(&(chapter_id, verse_id)) {
            self.entries
                .retain(|bookmark| bookmark.key() != (chapter_id, verse_id));
            BookmarkToggle::Removed
        } else {
            self.index.insert((chapter_id, verse_id));
            self.entries
                .push(Bookmark::new(chapter_id, verse_id, verse_number));
            BookmarkToggle::Added
        };
        debug!(
            "bookmark {:?}: chapter {} verse {}",
            outcome, chapter_id, verse_id
        );
        self.persist();
        outcome
    }

    /// Whether the verse is bookmarked. The verse number plays no part.
    pub fn is_bookmarked(&self, chapter_id: ChapterId, verse_id: VerseId) -> bool {
        self.index.contains(&(chapter_id, verse_id))
    }

    /// All bookmarks, oldest first.
    pub fn list(&self) -> &[Bookmark] {
        &self.entries
    }

    /// Bookmarks belonging to `chapter_id`, oldest first.
    pub fn in_chapter(&self, chapter_id: ChapterId) -> impl Iterator<Item = &Bookmark> {
        self.entries
            .iter()
            .filter(move |bookmark| bookmark.chapter_id == chapter_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        match serde_json::to_string(&self.entries) {
            Ok(payload) => self.storage.set(&self.key, &payload),
            Err(err) => warn!("bookmark serialization failed: {}", err),
        }
    }
}
