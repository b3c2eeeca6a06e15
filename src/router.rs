//! Home/chapter view switching and the bookmark panel overlay.

use crate::bookmarks::Bookmark;
use crate::model::ChapterId;

/// Top-level view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Home,
    Chapter(ChapterId),
}

/// Tracks which view is showing and whether the bookmark panel is open.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewRouter {
    view: View,
    bookmark_panel_open: bool,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Chapter being read, if any.
    pub fn selected_chapter(&self) -> Option<ChapterId> {
        match self.view {
            View::Chapter(chapter_id) => Some(chapter_id),
            View::Home => None,
        }
    }

    pub fn select_chapter(&mut self, chapter_id: ChapterId) {
        self.view = View::Chapter(chapter_id);
    }

    /// Back to the chapter list; clears the selected chapter.
    pub fn go_home(&mut self) {
        self.view = View::Home;
    }

    pub fn is_bookmark_panel_open(&self) -> bool {
        self.bookmark_panel_open
    }

    pub fn open_bookmark_panel(&mut self) {
        self.bookmark_panel_open = true;
    }

    pub fn close_bookmark_panel(&mut self) {
        self.bookmark_panel_open = false;
    }

    /// Switch to the bookmark's chapter and close the panel.
    pub fn navigate_to_bookmark(&mut self, bookmark: &Bookmark) {
        self.view = View::Chapter(bookmark.chapter_id);
        self.bookmark_panel_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bookmark_navigation_closes_panel_and_selects_chapter() {
        let mut router = ViewRouter::new();
        router.open_bookmark_panel();
        router.navigate_to_bookmark(&Bookmark::new(4, 12, 6));

        assert_eq!(router.view(), View::Chapter(4));
        assert_eq!(router.selected_chapter(), Some(4));
        assert!(!router.is_bookmark_panel_open());
    }

    #[test]
    fn going_home_clears_selection() {
        let mut router = ViewRouter::new();
        router.navigate_to_bookmark(&Bookmark::new(1, 1, 1));
        router.go_home();
        assert_eq!(router.selected_chapter(), None);
        assert_eq!(router.view(), View::Home);
    }

    #[test]
    fn panel_state_is_independent_of_view() {
        let mut router = ViewRouter::new();
        router.select_chapter(3);
        router.open_bookmark_panel();
        router.go_home();
        assert!(router.is_bookmark_panel_open());
        router.close_bookmark_panel();
        assert!(!router.is_bookmark_panel_open());
    }
}
