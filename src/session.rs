//! Reading session: current chapter, current verse, and position persistence.
//!
//! ```text
//! Idle ──open──▶ Loading ──ok──▶ Ready
//!   ▲               │  └─fail/empty─▶ Empty
//!   │               └─unknown id───▶ NotFound
//!   └──────close── (any)
//! ```
//!
//! Loading is split into [`ReadingSession::begin_open`] and
//! [`ReadingSession::complete_open`] so callers that interleave loads can feed
//! completions back in any order. Each open takes a new request token and only
//! the completion carrying the latest token is applied.

use log::{debug, warn};

use crate::config::StorageKeys;
use crate::content::ContentRepository;
use crate::error::ContentError;
use crate::model::{Chapter, ChapterId, Verse, VerseId};
use crate::storage::PersistenceAdapter;

/// Coarse session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No chapter opened yet, or the session was closed.
    Idle,
    /// Verse load in flight; navigation is ignored.
    Loading,
    /// Verses loaded and a current verse selected.
    Ready,
    /// Load failed or produced no verses.
    Empty,
    /// Chapter id unknown to the repository.
    NotFound,
}

/// Ticket for an in-flight verse load, handed back to
/// [`ReadingSession::complete_open`].
#[must_use = "a load request does nothing until completed"]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    chapter_id: ChapterId,
    token: u64,
}

impl LoadRequest {
    pub fn chapter_id(&self) -> ChapterId {
        self.chapter_id
    }

    pub fn token(&self) -> u64 {
        self.token
    }
}

/// 1-based position within the loaded chapter, for "n / total" displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadingProgress {
    pub position: usize,
    pub total: usize,
}

/// Owns the reading position for one reader.
#[derive(Debug)]
pub struct ReadingSession {
    storage: PersistenceAdapter,
    keys: StorageKeys,
    state: SessionState,
    chapter_id: Option<ChapterId>,
    chapter: Option<Chapter>,
    verses: Vec<Verse>,
    index: usize,
    latest_token: u64,
}

impl ReadingSession {
    pub fn new(storage: PersistenceAdapter, keys: StorageKeys) -> Self {
        Self {
            storage,
            keys,
            state: SessionState::Idle,
            chapter_id: None,
            chapter: None,
            verses: Vec::new(),
            index: 0,
            latest_token: 0,
        }
    }

    /// Open `chapter_id` and wait for its verses.
    pub async fn open_chapter<R>(&mut self, repo: &R, chapter_id: ChapterId) -> SessionState
    where
        R: ContentRepository,
    {
        if let Some(request) = self.begin_open(repo, chapter_id) {
            let result = repo.load_verses(chapter_id).await;
            self.complete_open(request, result);
        }
        self.state
    }

    /// Start opening `chapter_id`.
    ///
    /// Returns `None` when the chapter is unknown; the session is then
    /// `NotFound` and there is nothing to load.
    pub fn begin_open<R>(&mut self, repo: &R, chapter_id: ChapterId) -> Option<LoadRequest>
    where
        R: ContentRepository,
    {
        self.latest_token += 1;
        self.chapter_id = Some(chapter_id);
        self.verses.clear();
        self.index = 0;

        let Some(chapter) = repo.chapter(chapter_id) else {
            debug!("chapter {} not found", chapter_id);
            self.chapter = None;
            self.state = SessionState::NotFound;
            return None;
        };
        self.chapter = Some(chapter.clone());
        self.state = SessionState::Loading;
        debug!(
            "loading chapter {} (request {})",
            chapter_id, self.latest_token
        );
        Some(LoadRequest {
            chapter_id,
            token: self.latest_token,
        })
    }

    /// Apply the outcome of a verse load.
    ///
    /// Returns `false` and changes nothing when `request` has been superseded
    /// by a later open or close.
    pub fn complete_open(
        &mut self,
        request: LoadRequest,
        result: Result<Vec<Verse>, ContentError>,
    ) -> bool {
        if request.token != self.latest_token {
            debug!(
                "discarding stale load of chapter {} (request {}, latest {})",
                request.chapter_id, request.token, self.latest_token
            );
            return false;
        }

        match result {
            Ok(verses) if !verses.is_empty() => {
                self.verses = verses;
                self.index = self.restore_position(request.chapter_id);
                self.state = SessionState::Ready;
                self.persist_position();
                debug!(
                    "chapter {} ready at verse index {} of {}",
                    request.chapter_id,
                    self.index,
                    self.verses.len()
                );
            }
            Ok(_) => {
                debug!("chapter {} has no verses", request.chapter_id);
                self.state = SessionState::Empty;
            }
            Err(err) => {
                warn!("loading chapter {} failed: {}", request.chapter_id, err);
                self.state = SessionState::Empty;
            }
        }
        true
    }

    /// Drop the current chapter and return to `Idle`. Pending loads become
    /// stale.
    pub fn close(&mut self) {
        self.latest_token += 1;
        self.state = SessionState::Idle;
        self.chapter_id = None;
        self.chapter = None;
        self.verses.clear();
        self.index = 0;
    }

    /// Advance one verse. No-op at the last verse or when not `Ready`.
    pub fn next(&mut self) -> bool {
        if self.state != SessionState::Ready || self.index + 1 >= self.verses.len() {
            return false;
        }
        self.move_to(self.index + 1);
        true
    }

    /// Go back one verse. No-op at the first verse or when not `Ready`.
    pub fn previous(&mut self) -> bool {
        if self.state != SessionState::Ready || self.index == 0 {
            return false;
        }
        self.move_to(self.index - 1);
        true
    }

    /// Jump to the verse with id `verse_id`, if loaded.
    pub fn seek_to_verse(&mut self, verse_id: VerseId) -> bool {
        if self.state != SessionState::Ready {
            return false;
        }
        match self.verses.iter().position(|verse| verse.id == verse_id) {
            Some(index) => {
                if index != self.index {
                    self.move_to(index);
                }
                true
            }
            None => false,
        }
    }

    /// Current coarse state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Id of the chapter most recently opened, even if it was not found.
    pub fn chapter_id(&self) -> Option<ChapterId> {
        self.chapter_id
    }

    /// Metadata of the open chapter.
    pub fn chapter(&self) -> Option<&Chapter> {
        self.chapter.as_ref()
    }

    /// Loaded verses; empty unless `Ready`.
    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    /// Zero-based index of the current verse while `Ready`.
    pub fn current_index(&self) -> Option<usize> {
        (self.state == SessionState::Ready).then_some(self.index)
    }

    /// Verse at the current index while `Ready`.
    pub fn current_verse(&self) -> Option<&Verse> {
        if self.state != SessionState::Ready {
            return None;
        }
        self.verses.get(self.index)
    }

    /// 1-based position and verse count while `Ready`.
    pub fn progress(&self) -> Option<ReadingProgress> {
        self.current_index().map(|index| ReadingProgress {
            position: index + 1,
            total: self.verses.len(),
        })
    }

    /// Whether [`ReadingSession::next`] would move.
    pub fn can_go_next(&self) -> bool {
        self.state == SessionState::Ready && self.index + 1 < self.verses.len()
    }

    /// Whether [`ReadingSession::previous`] would move.
    pub fn can_go_previous(&self) -> bool {
        self.state == SessionState::Ready && self.index > 0
    }

    fn move_to(&mut self, index: usize) {
        self.index = index;
        self.persist_position();
    }

    fn restore_position(&self, chapter_id: ChapterId) -> usize {
        self.storage
            .get(&self.keys.reading_position(chapter_id))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|&index| index < self.verses.len())
            .unwrap_or(0)
    }

    fn persist_position(&self) {
        if let Some(chapter_id) = self.chapter_id {
            self.storage.set(
                &self.keys.reading_position(chapter_id),
                &self.index.to_string(),
            );
        }
    }
}
