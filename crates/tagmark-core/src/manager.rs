//! In-memory bookmark collection
//!
//! Insertion order is preserved everywhere. URLs are not unique, so
//! removal takes out every match while lookups for update take the first.

use crate::models::Bookmark;

/// Owner of the bookmark collection
#[derive(Debug, Clone, Default)]
pub struct BookmarkManager {
    bookmarks: Vec<Bookmark>,
}

impl BookmarkManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already loaded collection
    pub fn from_bookmarks(bookmarks: Vec<Bookmark>) -> Self {
        Self { bookmarks }
    }

    /// Append a bookmark
    pub fn add(&mut self, bookmark: Bookmark) {
        self.bookmarks.push(bookmark);
    }

    /// Remove every bookmark whose url matches exactly
    ///
    /// Returns how many were removed; zero leaves the collection untouched.
    pub fn remove(&mut self, url: &str) -> usize {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|b| b.url != url);
        before - self.bookmarks.len()
    }

    /// All bookmarks in insertion order
    pub fn get_all(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn get_by_category(&self, category: &str) -> Vec<&Bookmark> {
        self.bookmarks
            .iter()
            .filter(|b| b.in_category(category))
            .collect()
    }

    pub fn get_by_tag(&self, tag: &str) -> Vec<&Bookmark> {
        self.bookmarks.iter().filter(|b| b.has_tag(tag)).collect()
    }

    /// First bookmark with the given url, for in-place updates
    pub fn find_mut(&mut self, url: &str) -> Option<&mut Bookmark> {
        self.bookmarks.iter_mut().find(|b| b.url == url)
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }
}
