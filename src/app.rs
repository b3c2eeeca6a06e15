//! Application state: wires the session, bookmarks, router and language
//! preference over one content repository and one storage backend.

use log::debug;

use crate::bookmarks::{Bookmark, BookmarkStore, BookmarkToggle};
use crate::config::{ReaderConfig, StorageKeys};
use crate::content::ContentRepository;
use crate::model::{Chapter, ChapterId, Language, Verse, VerseId};
use crate::router::{View, ViewRouter};
use crate::session::{ReadingSession, SessionState};
use crate::storage::PersistenceAdapter;

/// Owned reader state, created once at application start.
#[derive(Debug)]
pub struct ReaderApp<R> {
    repo: R,
    storage: PersistenceAdapter,
    keys: StorageKeys,
    session: ReadingSession,
    bookmarks: BookmarkStore,
    router: ViewRouter,
    language: Language,
}

impl<R: ContentRepository> ReaderApp<R> {
    /// Build the app, hydrating bookmarks and the language preference from
    /// `storage`.
    pub fn new(repo: R, storage: PersistenceAdapter, config: &ReaderConfig) -> Self {
        let keys = config.storage_keys();
        let bookmarks = BookmarkStore::hydrate(storage.clone(), keys.bookmarks());
        let language = storage
            .get(&keys.language())
            .and_then(|value| value.parse::<Language>().ok())
            .unwrap_or(config.default_language);
        let session = ReadingSession::new(storage.clone(), keys.clone());
        Self {
            repo,
            storage,
            keys,
            session,
            bookmarks,
            router: ViewRouter::new(),
            language,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn chapters(&self) -> &[Chapter] {
        self.repo.chapters()
    }

    pub fn session(&self) -> &ReadingSession {
        &self.session
    }

    pub fn bookmarks(&self) -> &BookmarkStore {
        &self.bookmarks
    }

    pub fn router(&self) -> &ViewRouter {
        &self.router
    }

    pub fn view(&self) -> View {
        self.router.view()
    }

    /// Switch to the chapter view and load `chapter_id`.
    pub async fn select_chapter(&mut self, chapter_id: ChapterId) -> SessionState {
        self.router.select_chapter(chapter_id);
        self.session.open_chapter(&self.repo, chapter_id).await
    }

    /// Open a bookmark from the panel: load its chapter and land on its
    /// verse. If the verse no longer exists the restored position stands.
    pub async fn open_bookmark(&mut self, bookmark: Bookmark) -> SessionState {
        self.router.navigate_to_bookmark(&bookmark);
        let state = self
            .session
            .open_chapter(&self.repo, bookmark.chapter_id)
            .await;
        if state == SessionState::Ready && !self.session.seek_to_verse(bookmark.verse_id) {
            debug!(
                "bookmarked verse {} missing from chapter {}",
                bookmark.verse_id, bookmark.chapter_id
            );
        }
        state
    }

    /// Back to the home view.
    pub fn go_home(&mut self) {
        self.router.go_home();
        self.session.close();
    }

    pub fn next(&mut self) -> bool {
        self.session.next()
    }

    pub fn previous(&mut self) -> bool {
        self.session.previous()
    }

    pub fn current_verse(&self) -> Option<&Verse> {
        self.session.current_verse()
    }

    /// Current verse text in the selected language.
    pub fn current_verse_text(&self) -> Option<&str> {
        self.current_verse()
            .map(|verse| verse.text.get(self.language))
    }

    pub fn toggle_bookmark(
        &mut self,
        chapter_id: ChapterId,
        verse_id: VerseId,
        verse_number: u32,
    ) -> BookmarkToggle {
        self.bookmarks.toggle(chapter_id, verse_id, verse_number)
    }

    /// Flip the bookmark on the verse being read. `None` when no verse is
    /// showing.
    pub fn toggle_current_bookmark(&mut self) -> Option<BookmarkToggle> {
        let chapter_id = self.session.chapter_id()?;
        let verse = self.session.current_verse()?;
        let (verse_id, verse_number) = (verse.id, verse.number);
        Some(self.bookmarks.toggle(chapter_id, verse_id, verse_number))
    }

    pub fn is_current_bookmarked(&self) -> bool {
        match (self.session.chapter_id(), self.session.current_verse()) {
            (Some(chapter_id), Some(verse)) => self.bookmarks.is_bookmarked(chapter_id, verse.id),
            _ => false,
        }
    }

    pub fn open_bookmark_panel(&mut self) {
        self.router.open_bookmark_panel();
    }

    pub fn close_bookmark_panel(&mut self) {
        self.router.close_bookmark_panel();
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Change and persist the display language.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.storage.set(&self.keys.language(), language.as_str());
    }

    pub fn toggle_language(&mut self) -> Language {
        self.set_language(self.language.toggled());
        self.language
    }
}
