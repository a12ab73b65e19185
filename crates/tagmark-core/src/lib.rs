//! tagmark Core Library
//!
//! This crate provides the core functionality for tagmark, a bookmark
//! catalog that tags and categorizes bookmarks by keyword matching.
//!
//! # Architecture
//!
//! - **Classifier**: keyword tables mapped onto title + URL text
//! - **Manager**: the in-memory, insertion-ordered collection
//! - **Storage**: the whole collection as one JSON array on disk
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open()?;
//!
//! // Add a bookmark (tagged and classified on the way in)
//! let bookmark = store.add(BookmarkDraft::new("https://github.com/a/b"))?;
//!
//! // Query bookmarks
//! let technical = store.by_category("technical");
//! ```
//!
//! # Modules
//!
//! - `store`: Unified catalog interface (main entry point)
//! - `models`: Bookmark, draft and patch structures
//! - `classifier`: Category and tag assignment
//! - `rules`: Keyword tables
//! - `manager`: In-memory collection operations
//! - `storage`: JSON persistence
//! - `import`: Browser bookmark export parsing
//! - `config`: Application configuration

pub mod classifier;
pub mod config;
pub mod import;
pub mod manager;
pub mod models;
pub mod rules;
pub mod storage;
pub mod store;

pub use classifier::{domain_tag, Classifier};
pub use config::Config;
pub use import::{parse_bookmark_html, sanitize_filename, ImportError, ImportReport, ImportedLink};
pub use manager::BookmarkManager;
pub use models::{Bookmark, BookmarkDraft, BookmarkPatch};
pub use rules::{ClassifierRules, KeywordRule, RulesError};
pub use storage::{JsonStorage, StorageError};
pub use store::Store;
