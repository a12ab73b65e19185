//! Unified storage interface
//!
//! The `Store` owns the classifier, the in-memory collection and the JSON
//! file, and keeps them consistent: every mutating call tags and classifies
//! as needed, updates the collection, then rewrites the file.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open_with_config(config)?;
//!
//! let bookmark = store.add(BookmarkDraft::new("https://github.com/a/b"))?;
//! assert_eq!(bookmark.category.as_deref(), Some("technical"));
//!
//! let technical = store.by_category("technical");
//! ```
//!
//! The store does no locking of its own. Callers that share it across
//! threads wrap it in a mutex and hold the lock for the whole call.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::classifier::Classifier;
use crate::config::Config;
use crate::import::{decode_html, parse_bookmark_html, ImportError, ImportReport};
use crate::manager::BookmarkManager;
use crate::models::{Bookmark, BookmarkDraft, BookmarkPatch};
use crate::rules::ClassifierRules;
use crate::storage::{JsonStorage, StorageResult};

/// The bookmark catalog
pub struct Store {
    classifier: Classifier,
    manager: BookmarkManager,
    storage: JsonStorage,
    config: Config,
}

impl Store {
    /// Open the store with configuration from the default location
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the store with a specific configuration
    ///
    /// Loads the keyword tables (built-in unless `rules_path` is set) and
    /// the existing collection. A missing bookmark file starts an empty
    /// collection; an unreadable or malformed one is an error.
    pub fn open_with_config(config: Config) -> Result<Self> {
        let rules = match config.rules_path {
            Some(ref path) => ClassifierRules::load_from_path(path)
                .context("Failed to load classifier rules")?,
            None => ClassifierRules::default(),
        };

        let storage = JsonStorage::new(config.bookmarks_path());
        let bookmarks = storage.load().context("Failed to load bookmarks")?;
        info!(
            path = %storage.path().display(),
            count = bookmarks.len(),
            "Loaded bookmarks"
        );

        Ok(Self {
            classifier: Classifier::new(rules),
            manager: BookmarkManager::from_bookmarks(bookmarks),
            storage,
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the classifier
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    // ==================== Mutations ====================

    /// Tag, classify and add a single bookmark
    pub fn add(&mut self, draft: BookmarkDraft) -> Result<Bookmark> {
        let bookmark = self.insert(draft.into());
        self.persist().context("Failed to save new bookmark")?;
        debug!(url = %bookmark.url, category = ?bookmark.category, "Added bookmark");
        Ok(bookmark)
    }

    /// Tag, classify and add several bookmarks with a single save
    ///
    /// An empty batch still rewrites the file.
    pub fn add_batch(&mut self, drafts: Vec<BookmarkDraft>) -> Result<Vec<Bookmark>> {
        let added: Vec<Bookmark> = drafts
            .into_iter()
            .map(|draft| self.insert(draft.into()))
            .collect();
        self.persist().context("Failed to save bookmark batch")?;
        info!(count = added.len(), "Added bookmark batch");
        Ok(added)
    }

    /// Remove every bookmark with the given url
    ///
    /// Returns `false` when nothing matched, in which case nothing is saved.
    pub fn remove(&mut self, url: &str) -> Result<bool> {
        let removed = self.manager.remove(url);
        if removed == 0 {
            return Ok(false);
        }
        self.persist().context("Failed to save after removal")?;
        info!(url, removed, "Removed bookmarks");
        Ok(true)
    }

    /// Update the first bookmark with the given url
    ///
    /// Explicit fields are applied first; with `reprocess` set the tags and
    /// category are then recomputed, overriding any tags from the patch.
    /// Returns `None` when no bookmark has that url.
    pub fn update(&mut self, url: &str, patch: &BookmarkPatch) -> Result<Option<Bookmark>> {
        let Some(bookmark) = self.manager.find_mut(url) else {
            return Ok(None);
        };

        patch.apply(bookmark);
        if patch.reprocess {
            self.classifier.annotate(bookmark);
        }
        let updated = bookmark.clone();

        self.persist().context("Failed to save updated bookmark")?;
        debug!(url, reprocess = patch.reprocess, "Updated bookmark");
        Ok(Some(updated))
    }

    /// Import every link of an HTML bookmark export
    pub fn import_html(&mut self, html: &str) -> Result<ImportReport, ImportError> {
        let bookmarks: Vec<Bookmark> = parse_bookmark_html(html)
            .into_iter()
            .map(|link| self.insert(link.into()))
            .collect();
        self.persist()?;
        info!(count = bookmarks.len(), "Imported bookmarks");
        Ok(ImportReport { bookmarks })
    }

    /// Import an HTML bookmark export from disk
    pub fn import_file(&mut self, path: &Path) -> Result<ImportReport, ImportError> {
        let bytes = std::fs::read(path).map_err(|source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let html = decode_html(&bytes)?;
        self.import_html(html)
    }

    // ==================== Queries ====================

    /// All bookmarks in insertion order
    pub fn all(&self) -> &[Bookmark] {
        self.manager.get_all()
    }

    pub fn by_category(&self, category: &str) -> Vec<&Bookmark> {
        self.manager.get_by_category(category)
    }

    pub fn by_tag(&self, tag: &str) -> Vec<&Bookmark> {
        self.manager.get_by_tag(tag)
    }

    pub fn len(&self) -> usize {
        self.manager.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manager.is_empty()
    }

    // ==================== Internals ====================

    /// Annotate and append, returning a copy of what was stored
    fn insert(&mut self, mut bookmark: Bookmark) -> Bookmark {
        self.classifier.annotate(&mut bookmark);
        self.manager.add(bookmark.clone());
        bookmark
    }

    /// Rewrite the bookmark file from the in-memory collection
    fn persist(&self) -> StorageResult<()> {
        self.storage.save(self.manager.get_all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    fn open(temp_dir: &TempDir) -> Store {
        Store::open_with_config(test_config(temp_dir)).unwrap()
    }

    #[test]
    fn test_open_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = open(&temp_dir);

        assert!(store.is_empty());
        // Nothing is written until the first mutation
        assert!(!test_config(&temp_dir).bookmarks_path().exists());
    }

    #[test]
    fn test_add_classifies_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(&temp_dir);

        let bookmark = store
            .add(BookmarkDraft::new("https://github.com/a/b").with_title("My Repo"))
            .unwrap();

        assert_eq!(bookmark.category.as_deref(), Some("technical"));
        assert!(bookmark.tags.contains(&"open-source".to_string()));
        assert!(bookmark.tags.contains(&"github".to_string()));
        assert_eq!(store.all(), &[bookmark]);

        let reopened = open(&temp_dir);
        assert_eq!(reopened.all(), store.all());
    }

    #[test]
    fn test_add_overwrites_caller_tags() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(&temp_dir);

        let bookmark = store
            .add(
                BookmarkDraft::new("https://example.com")
                    .with_tags(vec!["mine".to_string()])
                    .with_category(Some("custom".to_string())),
            )
            .unwrap();

        assert_eq!(bookmark.tags, vec!["example"]);
        // No keyword matched, so the given category survives
        assert_eq!(bookmark.category.as_deref(), Some("custom"));
    }

    #[test]
    fn test_add_batch_single_save() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(&temp_dir);

        let added = store
            .add_batch(vec![
                BookmarkDraft::new("https://www.python.org/doc/").with_title("Python官方文档"),
                BookmarkDraft::new("https://news.ycombinator.com").with_title("Hacker News技术新闻"),
            ])
            .unwrap();

        assert_eq!(added.len(), 2);
        assert_eq!(added[0].category.as_deref(), Some("technical"));
        assert!(added[0].tags.contains(&"documentation".to_string()));
        assert_eq!(added[1].category.as_deref(), Some("news"));
        assert!(added[1].tags.contains(&"news.ycombinator".to_string()));

        assert_eq!(open(&temp_dir).len(), 2);
    }

    #[test]
    fn test_empty_batch_still_saves() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(&temp_dir);
        store.add(BookmarkDraft::new("https://example.com")).unwrap();
        let before = store.all().to_vec();

        let added = store.add_batch(Vec::new()).unwrap();

        assert!(added.is_empty());
        assert_eq!(open(&temp_dir).all(), before.as_slice());
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(&temp_dir);
        store.add(BookmarkDraft::new("https://one.com")).unwrap();
        store.add(BookmarkDraft::new("https://two.com")).unwrap();
        store.add(BookmarkDraft::new("https://one.com")).unwrap();

        assert!(store.remove("https://one.com").unwrap());
        assert_eq!(store.len(), 1);
        assert!(!store.remove("https://one.com").unwrap());

        let reopened = open(&temp_dir);
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.all()[0].url, "https://two.com");
    }

    #[test]
    fn test_update_fields() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(&temp_dir);
        store.add(BookmarkDraft::new("https://example.com")).unwrap();

        let patch = BookmarkPatch {
            title: Some("Renamed".to_string()),
            tags: Some(vec!["manual".to_string()]),
            category: Some(Some("life".to_string())),
            reprocess: false,
        };
        let updated = store.update("https://example.com", &patch).unwrap().unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.tags, vec!["manual"]);
        assert_eq!(updated.category.as_deref(), Some("life"));
        assert_eq!(open(&temp_dir).all()[0], updated);
    }

    #[test]
    fn test_update_reprocess_recomputes_tags() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(&temp_dir);
        store.add(BookmarkDraft::new("https://example.com")).unwrap();

        let patch = BookmarkPatch {
            title: Some("Linux tutorial".to_string()),
            tags: Some(vec!["ignored".to_string()]),
            category: None,
            reprocess: true,
        };
        let updated = store.update("https://example.com", &patch).unwrap().unwrap();

        assert_eq!(updated.tags, vec!["tutorial", "example"]);
        assert_eq!(updated.category.as_deref(), Some("technical"));
    }

    #[test]
    fn test_update_missing() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(&temp_dir);

        let result = store
            .update("https://missing.com", &BookmarkPatch::default())
            .unwrap();
        assert!(result.is_none());
        assert!(!test_config(&temp_dir).bookmarks_path().exists());
    }

    #[test]
    fn test_update_first_match_only() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(&temp_dir);
        store.add(BookmarkDraft::new("https://dup.com")).unwrap();
        store.add(BookmarkDraft::new("https://dup.com")).unwrap();

        let patch = BookmarkPatch {
            title: Some("First".to_string()),
            ..BookmarkPatch::default()
        };
        store.update("https://dup.com", &patch).unwrap();

        assert_eq!(store.all()[0].title, "First");
        assert_eq!(store.all()[1].title, "");
    }

    #[test]
    fn test_queries() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(&temp_dir);
        store.add(BookmarkDraft::new("https://github.com/a")).unwrap();
        store.add(BookmarkDraft::new("https://example.com")).unwrap();
        store.add(BookmarkDraft::new("https://github.com/b")).unwrap();

        let technical = store.by_category("technical");
        assert_eq!(technical.len(), 2);
        assert_eq!(technical[0].url, "https://github.com/a");
        assert_eq!(technical[1].url, "https://github.com/b");

        assert_eq!(store.by_tag("example").len(), 1);
        assert!(store.by_tag("missing").is_empty());
    }

    #[test]
    fn test_import_html() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(&temp_dir);

        let html = r#"
            <DL><p>
                <DT><A HREF="https://github.com/python/cpython">Python官方源码仓库</A>
                <DT><A HREF="https://www.youtube.com/watch?v=dQw4w9WgXcQ">搞笑视频合集</A>
            </DL>
        "#;
        let report = store.import_html(html).unwrap();

        assert_eq!(report.processed_count(), 2);
        assert_eq!(report.bookmarks[0].category.as_deref(), Some("technical"));
        assert_eq!(report.bookmarks[1].category.as_deref(), Some("entertainment"));
        assert_eq!(open(&temp_dir).len(), 2);
    }

    #[test]
    fn test_import_file_errors() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(&temp_dir);

        let missing = store.import_file(&temp_dir.path().join("missing.html"));
        assert!(matches!(missing, Err(ImportError::Read { .. })));

        let binary = temp_dir.path().join("binary.html");
        std::fs::write(&binary, [0xff, 0xfe, 0xfd]).unwrap();
        assert!(matches!(
            store.import_file(&binary),
            Err(ImportError::Encoding(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_open_rejects_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        std::fs::write(config.bookmarks_path(), r#"[{"url": "https://a.com"}]"#).unwrap();

        let err = Store::open_with_config(config).err().unwrap();
        assert!(err
            .chain()
            .any(|cause| cause.downcast_ref::<StorageError>().is_some()));
    }

    #[test]
    fn test_open_with_custom_rules() {
        let temp_dir = TempDir::new().unwrap();
        let rules_path = temp_dir.path().join("rules.toml");
        std::fs::write(
            &rules_path,
            "[[categories]]\nname = \"reading\"\nkeywords = [\"blog\"]\n",
        )
        .unwrap();

        let config = Config {
            rules_path: Some(rules_path),
            ..test_config(&temp_dir)
        };
        let mut store = Store::open_with_config(config).unwrap();

        let bookmark = store.add(BookmarkDraft::new("https://blog.example.com")).unwrap();
        assert_eq!(bookmark.category.as_deref(), Some("reading"));
        assert_eq!(bookmark.tags, vec!["blog.example"]);
    }

    #[test]
    fn test_open_with_missing_rules_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            rules_path: Some(temp_dir.path().join("missing.toml")),
            ..test_config(&temp_dir)
        };

        assert!(Store::open_with_config(config).is_err());
    }
}
