use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use gita_reader::{
    BilingualText, Chapter, MemoryStore, PersistenceAdapter, ReaderApp, ReaderConfig,
    StaticContentRepository, Verse,
};

static TEMP_NONCE: AtomicUsize = AtomicUsize::new(0);

pub const CHAPTERS_JSON: &str = r#"[
    {"id": 1, "number": 1, "nameEnglish": "Arjuna Vishada Yoga", "nameHindi": "अर्जुन विषाद योग",
     "translationEnglish": "The Yoga of Arjuna's Dejection", "translationHindi": "अर्जुन के विषाद का योग"},
    {"id": 2, "number": 2, "nameEnglish": "Sankhya Yoga", "nameHindi": "सांख्य योग",
     "translationEnglish": "The Yoga of Knowledge", "translationHindi": "ज्ञान योग"},
    {"id": 3, "number": 3, "nameEnglish": "Karma Yoga", "nameHindi": "कर्म योग",
     "translationEnglish": "The Yoga of Action", "translationHindi": "कर्म का योग"}
]"#;

/// Chapter 1 in the `verses`-wrapped shape, three verses with ids 1..=3.
pub const CHAPTER_1_WRAPPED: &str = r#"{
    "id": 1,
    "number": 1,
    "verses": [
        {"id": 1, "number": 1, "textEnglish": "Dhritarashtra said", "textHindi": "धृतराष्ट्र ने कहा"},
        {"id": 2, "number": 2, "textEnglish": "Sanjaya said", "textHindi": "संजय ने कहा"},
        {"id": 3, "number": 3, "textEnglish": "Behold the army", "textHindi": "सेना को देखो"}
    ]
}"#;

/// Chapter 2 in the bare shape, five verses with ids 5..=9.
pub const CHAPTER_2_BARE: &str = r#"[
    {"id": 5, "number": 1, "textEnglish": "verse one", "textHindi": "श्लोक एक"},
    {"id": 6, "number": 2, "textEnglish": "verse two", "textHindi": "श्लोक दो"},
    {"id": 7, "number": 3, "textEnglish": "verse three", "textHindi": "श्लोक तीन"},
    {"id": 8, "number": 4, "textEnglish": "verse four", "textHindi": "श्लोक चार"},
    {"id": 9, "number": 5, "textEnglish": "verse five", "textHindi": "श्लोक पांच"}
]"#;

pub fn chapters() -> Vec<Chapter> {
    gita_reader::parse_chapter_list(CHAPTERS_JSON.as_bytes(), Default::default())
        .expect("fixture chapters should parse")
}

/// Chapters 1 and 2 have content; chapter 3 is listed but its unit is missing.
pub fn repository() -> StaticContentRepository {
    StaticContentRepository::new(chapters())
        .with_unit_json(1, CHAPTER_1_WRAPPED)
        .with_unit_json(2, CHAPTER_2_BARE)
}

/// Same chapters, but chapter 2 truncated to its first `count` verses.
pub fn repository_with_chapter_2_len(count: u32) -> StaticContentRepository {
    let verses = (1..=count)
        .map(|n| {
            Verse::new(
                4 + n,
                n,
                BilingualText::new(format!("verse {n}"), format!("श्लोक {n}")),
            )
        })
        .collect();
    StaticContentRepository::new(chapters())
        .with_unit_json(1, CHAPTER_1_WRAPPED)
        .with_verses(2, verses)
}

/// Memory backend shared across "restarts".
pub fn shared_backend() -> Rc<MemoryStore> {
    Rc::new(MemoryStore::new())
}

pub fn app_on(
    repo: StaticContentRepository,
    backend: &Rc<MemoryStore>,
) -> ReaderApp<StaticContentRepository> {
    ReaderApp::new(
        repo,
        PersistenceAdapter::new(Rc::clone(backend)),
        &ReaderConfig::default(),
    )
}

pub fn temp_dir(label: &str) -> PathBuf {
    let nonce = TEMP_NONCE.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "gita-reader-{label}-{}-{nonce}",
        std::process::id()
    ))
}

/// Lay out a content directory with chapters 1 and 2; chapter 3 has no unit.
pub fn write_content_dir(root: &Path) {
    let verses_dir = root.join("verses");
    fs::create_dir_all(&verses_dir).expect("create content dir");
    fs::write(root.join("chapters.json"), CHAPTERS_JSON).expect("write chapters");
    fs::write(verses_dir.join("chapter1.json"), CHAPTER_1_WRAPPED).expect("write chapter 1");
    fs::write(verses_dir.join("chapter2.json"), CHAPTER_2_BARE).expect("write chapter 2");
}
