mod common;

use common::fixtures::{
    app_on, chapters, repository, repository_with_chapter_2_len, shared_backend,
};
use gita_reader::{
    BilingualText, Bookmark, BookmarkToggle, SessionState, StaticContentRepository, Verse, View,
};

#[tokio::test]
async fn bookmark_shows_in_panel_and_toggles_off() {
    let backend = shared_backend();
    let mut app = app_on(repository(), &backend);

    assert_eq!(app.toggle_bookmark(2, 7, 3), BookmarkToggle::Added);
    app.open_bookmark_panel();
    assert!(app.router().is_bookmark_panel_open());
    assert_eq!(app.bookmarks().list(), &[Bookmark::new(2, 7, 3)]);

    assert_eq!(app.toggle_bookmark(2, 7, 3), BookmarkToggle::Removed);
    assert!(app.bookmarks().list().is_empty());
}

#[tokio::test]
async fn double_toggle_restores_prior_set() {
    let backend = shared_backend();
    let mut app = app_on(repository(), &backend);
    app.toggle_bookmark(1, 1, 1);
    app.toggle_bookmark(2, 8, 4);
    let before = app.bookmarks().list().to_vec();
    let persisted_before = backend.peek("gita-bookmarks");

    app.toggle_bookmark(1, 3, 3);
    app.toggle_bookmark(1, 3, 3);

    assert_eq!(app.bookmarks().list(), before.as_slice());
    assert_eq!(backend.peek("gita-bookmarks"), persisted_before);
}

#[tokio::test]
async fn current_verse_bookmark_tracks_navigation() {
    let backend = shared_backend();
    let mut app = app_on(repository(), &backend);
    app.select_chapter(2).await;
    app.next();
    app.next();

    assert_eq!(app.toggle_current_bookmark(), Some(BookmarkToggle::Added));
    assert!(app.is_current_bookmarked());
    assert_eq!(app.bookmarks().list(), &[Bookmark::new(2, 7, 3)]);

    app.next();
    assert!(!app.is_current_bookmarked());
    app.previous();
    assert!(app.is_current_bookmarked());
}

#[tokio::test]
async fn bookmarks_and_order_survive_restart() {
    let backend = shared_backend();
    {
        let mut app = app_on(repository(), &backend);
        app.toggle_bookmark(2, 9, 5);
        app.toggle_bookmark(1, 2, 2);
        app.toggle_bookmark(2, 5, 1);
        app.toggle_bookmark(1, 2, 2);
        app.toggle_bookmark(1, 2, 2);
    }

    let app = app_on(repository(), &backend);
    assert_eq!(
        app.bookmarks().list(),
        &[
            Bookmark::new(2, 9, 5),
            Bookmark::new(2, 5, 1),
            Bookmark::new(1, 2, 2),
        ]
    );
    assert!(app.bookmarks().is_bookmarked(2, 5));
}

#[tokio::test]
async fn opening_bookmark_lands_on_its_verse() {
    let backend = shared_backend();
    let mut app = app_on(repository(), &backend);
    app.toggle_bookmark(2, 8, 4);
    app.open_bookmark_panel();

    let bookmark = app.bookmarks().list()[0];
    assert_eq!(app.open_bookmark(bookmark).await, SessionState::Ready);

    assert_eq!(app.view(), View::Chapter(2));
    assert!(!app.router().is_bookmark_panel_open());
    assert_eq!(app.session().current_index(), Some(3));
    assert!(app.is_current_bookmarked());
    assert_eq!(backend.peek("gita-chapter-2-verse").as_deref(), Some("3"));
}

#[tokio::test]
async fn bookmark_for_vanished_verse_keeps_restored_position() {
    let backend = shared_backend();
    {
        let mut app = app_on(repository(), &backend);
        app.select_chapter(2).await;
        app.next();
        app.toggle_bookmark(2, 9, 5);
    }

    let mut app = app_on(repository_with_chapter_2_len(3), &backend);
    let bookmark = app.bookmarks().list()[0];
    app.open_bookmark(bookmark).await;

    assert_eq!(app.session().current_index(), Some(1));
    assert!(app.bookmarks().is_bookmarked(2, 9));
}

#[tokio::test]
async fn bookmark_into_unavailable_chapter_is_harmless() {
    let backend = shared_backend();
    let mut app = app_on(repository(), &backend);
    app.toggle_bookmark(3, 1, 1);

    let bookmark = app.bookmarks().list()[0];
    assert_eq!(app.open_bookmark(bookmark).await, SessionState::Empty);
    assert!(app.current_verse().is_none());
    assert_eq!(app.bookmarks().len(), 1);
}

#[tokio::test]
async fn opened_bookmark_does_not_steer_later_chapter_selection() {
    let backend = shared_backend();
    let mut app = app_on(repository(), &backend);
    app.toggle_bookmark(2, 8, 4);

    let bookmark = app.bookmarks().list()[0];
    app.open_bookmark(bookmark).await;
    assert_eq!(app.session().current_index(), Some(3));
    app.previous();
    app.previous();

    app.select_chapter(1).await;
    app.select_chapter(2).await;
    assert_eq!(app.session().current_index(), Some(1));
    assert!(!app.is_current_bookmarked());
}

#[tokio::test]
async fn chapter_repeating_a_verse_id_cannot_share_bookmarks() {
    let backend = shared_backend();
    let verses = vec![
        Verse::new(5, 1, BilingualText::new("first", "पहला")),
        Verse::new(5, 2, BilingualText::new("second", "दूसरा")),
    ];
    let repo = StaticContentRepository::new(chapters()).with_verses(2, verses);
    let mut app = app_on(repo, &backend);

    assert_eq!(app.select_chapter(2).await, SessionState::Empty);
    assert_eq!(app.toggle_current_bookmark(), None);
    assert!(!app.next());
    assert!(app.bookmarks().is_empty());
}
