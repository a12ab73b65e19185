//! Data models for tagmark
//!
//! Defines the bookmark record plus the explicit structs used to create
//! (`BookmarkDraft`) and update (`BookmarkPatch`) bookmarks.

use serde::{Deserialize, Deserializer, Serialize};

/// A saved bookmark
///
/// The `url` is the lookup key for removal and update, but nothing enforces
/// uniqueness: several bookmarks may share a url.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bookmark {
    /// The URL
    pub url: String,
    /// Display title (may be empty)
    pub title: String,
    /// Tags in assignment order
    pub tags: Vec<String>,
    /// Category, `None` while unclassified
    ///
    /// The key must be present in stored documents, even when `null`.
    #[serde(deserialize_with = "Option::deserialize")]
    pub category: Option<String>,
}

impl Bookmark {
    /// Create an untagged, unclassified bookmark
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            tags: Vec::new(),
            category: None,
        }
    }

    /// Update the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Set all tags (replacing existing)
    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = tags;
    }

    /// Set or clear the category
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
    }

    /// Check whether the bookmark carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Check whether the bookmark is in the given category
    pub fn in_category(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }
}

impl std::fmt::Display for Bookmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) [{}] {}",
            self.title,
            self.url,
            self.tags.join(", "),
            self.category.as_deref().unwrap_or("-")
        )
    }
}

/// Everything needed to create a bookmark
///
/// Only `url` is required; the rest default to an empty title, no tags
/// and no category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkDraft {
    pub url: String,
    pub title: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
}

impl BookmarkDraft {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            tags: Vec::new(),
            category: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }
}

impl From<BookmarkDraft> for Bookmark {
    fn from(draft: BookmarkDraft) -> Self {
        Self {
            url: draft.url,
            title: draft.title,
            tags: draft.tags,
            category: draft.category,
        }
    }
}

/// Partial update for an existing bookmark
///
/// `category` distinguishes a missing key (leave as is) from an explicit
/// `null` (clear it).
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct BookmarkPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<String>>,
    /// Re-run tagging and classification after applying the fields
    #[serde(default)]
    pub reprocess: bool,
}

impl BookmarkPatch {
    /// Apply the explicit fields to a bookmark
    ///
    /// `reprocess` is not handled here; the caller owns the classifier.
    pub fn apply(&self, bookmark: &mut Bookmark) {
        if let Some(ref title) = self.title {
            bookmark.set_title(title.clone());
        }
        if let Some(ref tags) = self.tags {
            bookmark.set_tags(tags.clone());
        }
        if let Some(ref category) = self.category {
            bookmark.set_category(category.clone());
        }
    }
}

/// Wrap any value that is present (including `null`) in `Some`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
