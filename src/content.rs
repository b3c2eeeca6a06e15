//! Read-only chapter/verse content.
//!
//! Chapter metadata is small and available up front; verses are loaded one
//! chapter at a time through [`ContentRepository::load_verses`].
//!
//! A chapter's content unit is JSON in one of two shapes, both accepted:
//!
//! ```json
//! [{"id": 1, "number": 1, "textEnglish": "...", "textHindi": "..."}]
//! ```
//!
//! ```json
//! {"id": 2, "number": 2, "verses": [{"id": 1, "number": 1, "textEnglish": "...", "textHindi": "..."}]}
//! ```

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;

use crate::config::ContentLimits;
use crate::error::ContentError;
use crate::model::{Chapter, ChapterId, Verse};

/// File holding the chapter list inside a content directory.
pub const CHAPTERS_FILE: &str = "chapters.json";
/// Directory holding per-chapter content units inside a content directory.
pub const VERSES_DIR: &str = "verses";

/// Source of chapter metadata and lazily loaded verses.
#[allow(async_fn_in_trait)]
pub trait ContentRepository {
    /// All chapters, in reading order.
    fn chapters(&self) -> &[Chapter];

    /// Metadata for `chapter_id`, if the repository knows it.
    fn chapter(&self, chapter_id: ChapterId) -> Option<&Chapter> {
        self.chapters()
            .iter()
            .find(|chapter| chapter.id == chapter_id)
    }

    /// Load the ordered verses of `chapter_id`.
    async fn load_verses(&self, chapter_id: ChapterId) -> Result<Vec<Verse>, ContentError>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChapterUnit {
    Bare(Vec<Verse>),
    Wrapped { verses: Vec<Verse> },
}

impl ChapterUnit {
    fn into_verses(self) -> Vec<Verse> {
        match self {
            Self::Bare(verses) | Self::Wrapped { verses } => verses,
        }
    }
}

/// Decode one chapter's content unit, accepting both the bare and the
/// `verses`-wrapped shape.
///
/// Rejects units over `limits`, and units that repeat a verse id since
/// bookmarks are keyed by it.
pub fn parse_chapter_unit(
    bytes: &[u8],
    limits: ContentLimits,
) -> Result<Vec<Verse>, ContentError> {
    check_unit_size(bytes.len(), limits)?;
    let verses = serde_json::from_slice::<ChapterUnit>(bytes)?.into_verses();
    validate_verses(&verses, limits)?;
    Ok(verses)
}

/// Check a decoded verse sequence against `limits` and reject repeated verse
/// ids. Non-sequential verse numbers are only logged.
pub fn validate_verses(verses: &[Verse], limits: ContentLimits) -> Result<(), ContentError> {
    if verses.len() > limits.max_verses {
        return Err(ContentError::LimitExceeded {
            kind: "max_verses",
            actual: verses.len(),
            limit: limits.max_verses,
        });
    }

    let mut seen = BTreeSet::new();
    for verse in verses {
        if !seen.insert(verse.id) {
            return Err(ContentError::Malformed(format!(
                "duplicate verse id {}",
                verse.id
            )));
        }
    }
    if let Some((index, verse)) = verses
        .iter()
        .enumerate()
        .find(|(index, verse)| verse.number as usize != index + 1)
    {
        warn!(
            "verse numbering not sequential: index {} has number {}",
            index, verse.number
        );
    }
    Ok(())
}

/// Decode a chapter list (`chapters.json`).
pub fn parse_chapter_list(
    bytes: &[u8],
    limits: ContentLimits,
) -> Result<Vec<Chapter>, ContentError> {
    check_unit_size(bytes.len(), limits)?;
    let chapters: Vec<Chapter> = serde_json::from_slice(bytes)?;
    let mut seen = BTreeSet::new();
    for chapter in &chapters {
        if !seen.insert(chapter.id) {
            return Err(ContentError::Malformed(format!(
                "duplicate chapter id {}",
                chapter.id
            )));
        }
    }
    Ok(chapters)
}

fn check_unit_size(len: usize, limits: ContentLimits) -> Result<(), ContentError> {
    if len > limits.max_unit_bytes {
        return Err(ContentError::LimitExceeded {
            kind: "max_unit_bytes",
            actual: len,
            limit: limits.max_unit_bytes,
        });
    }
    Ok(())
}

#[derive(Clone, Debug)]
enum UnitSource {
    Json(String),
    Verses(Vec<Verse>),
}

/// In-memory repository, for content compiled into the application.
///
/// A chapter registered without a unit behaves like a unit that fails to
/// fetch.
#[derive(Clone, Debug, Default)]
pub struct StaticContentRepository {
    chapters: Vec<Chapter>,
    units: HashMap<ChapterId, UnitSource>,
    limits: ContentLimits,
}

impl StaticContentRepository {
    pub fn new(chapters: Vec<Chapter>) -> Self {
        Self {
            chapters,
            units: HashMap::new(),
            limits: ContentLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ContentLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Register already decoded verses for `chapter_id`. They are checked
    /// with [`validate_verses`] on each load, like a JSON unit.
    pub fn with_verses(mut self, chapter_id: ChapterId, verses: Vec<Verse>) -> Self {
        self.units.insert(chapter_id, UnitSource::Verses(verses));
        self
    }

    /// Register a raw JSON content unit, decoded on each load.
    pub fn with_unit_json(mut self, chapter_id: ChapterId, json: impl Into<String>) -> Self {
        self.units.insert(chapter_id, UnitSource::Json(json.into()));
        self
    }
}

impl ContentRepository for StaticContentRepository {
    fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    async fn load_verses(&self, chapter_id: ChapterId) -> Result<Vec<Verse>, ContentError> {
        match self.units.get(&chapter_id) {
            Some(UnitSource::Verses(verses)) => {
                validate_verses(verses, self.limits)?;
                Ok(verses.clone())
            }
            Some(UnitSource::Json(json)) => parse_chapter_unit(json.as_bytes(), self.limits),
            None => Err(ContentError::NotFound(chapter_id)),
        }
    }
}

/// Repository backed by a content directory:
///
/// ```text
/// <root>/chapters.json
/// <root>/verses/chapter<id>.json
/// ```
#[derive(Clone, Debug)]
pub struct DirContentRepository {
    root: PathBuf,
    chapters: Vec<Chapter>,
    limits: ContentLimits,
}

impl DirContentRepository {
    /// Read the chapter list under `root`. Verse units are read on demand.
    pub async fn open(
        root: impl Into<PathBuf>,
        limits: ContentLimits,
    ) -> Result<Self, ContentError> {
        let root = root.into();
        let bytes = read_capped(&root.join(CHAPTERS_FILE), limits.max_unit_bytes).await?;
        let chapters = parse_chapter_list(&bytes, limits)?;
        debug!(
            "opened content directory {} with {} chapters",
            root.display(),
            chapters.len()
        );
        Ok(Self {
            root,
            chapters,
            limits,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the content unit for `chapter_id`.
    pub fn unit_path(&self, chapter_id: ChapterId) -> PathBuf {
        self.root
            .join(VERSES_DIR)
            .join(format!("chapter{}.json", chapter_id))
    }
}

impl ContentRepository for DirContentRepository {
    fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    async fn load_verses(&self, chapter_id: ChapterId) -> Result<Vec<Verse>, ContentError> {
        if self.chapter(chapter_id).is_none() {
            return Err(ContentError::NotFound(chapter_id));
        }
        let bytes = read_capped(&self.unit_path(chapter_id), self.limits.max_unit_bytes).await?;
        parse_chapter_unit(&bytes, self.limits)
    }
}

fn io_error(path: &Path, err: std::io::Error) -> ContentError {
    ContentError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

fn oversized(len: u64, max_bytes: usize) -> Option<ContentError> {
    let actual = usize::try_from(len).unwrap_or(usize::MAX);
    (actual > max_bytes).then_some(ContentError::LimitExceeded {
        kind: "max_unit_bytes",
        actual,
        limit: max_bytes,
    })
}

#[cfg(feature = "async")]
async fn read_capped(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ContentError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|err| io_error(path, err))?;
    if let Some(err) = oversized(metadata.len(), max_bytes) {
        return Err(err);
    }
    tokio::fs::read(path).await.map_err(|err| io_error(path, err))
}

#[cfg(not(feature = "async"))]
async fn read_capped(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ContentError> {
    let metadata = std::fs::metadata(path).map_err(|err| io_error(path, err))?;
    if let Some(err) = oversized(metadata.len(), max_bytes) {
        return Err(err);
    }
    std::fs::read(path).map_err(|err| io_error(path, err))
}
