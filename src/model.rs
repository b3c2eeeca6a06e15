//! Chapters, verses and the bilingual text they carry.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Chapter identifier as used by content units and persisted keys.
pub type ChapterId = u32;

/// Verse identifier, unique within a chapter.
pub type VerseId = u32;

/// Display language for bilingual fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl Language {
    /// Stable persisted form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Hindi => "hindi",
        }
    }

    /// The other language.
    pub fn toggled(self) -> Self {
        match self {
            Self::English => Self::Hindi,
            Self::Hindi => Self::English,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "english" => Ok(Self::English),
            "hindi" => Ok(Self::Hindi),
            _ => Err(()),
        }
    }
}

/// A string available in both display languages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BilingualText {
    pub english: String,
    pub hindi: String,
}

impl BilingualText {
    pub fn new(english: impl Into<String>, hindi: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            hindi: hindi.into(),
        }
    }

    /// Text for `language`.
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english,
            Language::Hindi => &self.hindi,
        }
    }
}

/// Chapter metadata. Immutable once loaded from the content repository.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "ChapterRecord")]
pub struct Chapter {
    pub id: ChapterId,
    /// Ordinal number shown to readers.
    pub number: u32,
    pub name: BilingualText,
    /// One-line description of the chapter's theme.
    pub translation: BilingualText,
}

impl Chapter {
    pub fn new(id: ChapterId, number: u32, name: BilingualText, translation: BilingualText) -> Self {
        Self {
            id,
            number,
            name,
            translation,
        }
    }
}

/// On-disk chapter record (`chapters.json` element).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChapterRecord {
    id: ChapterId,
    number: u32,
    #[serde(default)]
    name_english: String,
    #[serde(default)]
    name_hindi: String,
    #[serde(default)]
    translation_english: String,
    #[serde(default)]
    translation_hindi: String,
}

impl From<ChapterRecord> for Chapter {
    fn from(record: ChapterRecord) -> Self {
        Self {
            id: record.id,
            number: record.number,
            name: BilingualText::new(record.name_english, record.name_hindi),
            translation: BilingualText::new(record.translation_english, record.translation_hindi),
        }
    }
}

/// A single verse. Immutable; loaded lazily per chapter.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "VerseRecord")]
pub struct Verse {
    pub id: VerseId,
    /// 1-based position within the chapter.
    pub number: u32,
    pub text: BilingualText,
}

impl Verse {
    pub fn new(id: VerseId, number: u32, text: BilingualText) -> Self {
        Self { id, number, text }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerseRecord {
    id: VerseId,
    number: u32,
    text_english: String,
    text_hindi: String,
}

impl From<VerseRecord> for Verse {
    fn from(record: VerseRecord) -> Self {
        Self {
            id: record.id,
            number: record.number,
            text: BilingualText::new(record.text_english, record.text_hindi),
        }
    }
}
