//! JSON bookmark persistence
//!
//! The whole collection lives in a single JSON array and is rewritten on
//! every save. Uses atomic writes (write to temp file, then rename) to
//! prevent corruption.
//!
//! Each entry carries all four keys:
//!
//! ```json
//! [{ "url": "https://github.com", "title": "GitHub", "tags": ["open-source", "github"], "category": "technical" }]
//! ```

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{StorageError, StorageResult};
use crate::models::Bookmark;

/// Persistence layer for the bookmark collection
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    /// Create a storage handler for the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the bookmark file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save the full collection, replacing the file
    ///
    /// Output is pretty-printed UTF-8; non-ASCII text is written as is.
    pub fn save(&self, bookmarks: &[Bookmark]) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(bookmarks).map_err(StorageError::Encode)?;
        atomic_write(&self.path, &bytes)?;
        debug!(path = %self.path.display(), count = bookmarks.len(), "Saved bookmarks");
        Ok(())
    }

    /// Load the full collection
    ///
    /// A missing file is an empty collection. Anything else that keeps the
    /// file from parsing, including an entry without one of its keys, is an
    /// error.
    pub fn load(&self) -> StorageResult<Vec<Bookmark>> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No bookmark file yet");
                return Ok(Vec::new());
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(StorageError::PermissionDenied {
                    path: self.path.clone(),
                    source: e,
                })
            }
            Err(e) => {
                return Err(StorageError::ReadError {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        serde_json::from_slice(&content).map_err(|source| StorageError::InvalidFormat {
            path: self.path.clone(),
            source,
        })
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_storage(temp_dir: &TempDir) -> JsonStorage {
        JsonStorage::new(temp_dir.path().join("bookmarks.json"))
    }

    fn sample() -> Vec<Bookmark> {
        let mut first = Bookmark::new("https://github.com/python/cpython", "Python官方源码仓库");
        first.set_tags(vec!["open-source".to_string(), "github".to_string()]);
        first.set_category(Some("technical".to_string()));

        let second = Bookmark::new("https://example.com", "");

        vec![first, second]
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let storage = test_storage(&temp_dir);

        assert!(!storage.path().exists());
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = test_storage(&temp_dir);
        let bookmarks = sample();

        storage.save(&bookmarks).unwrap();
        assert!(storage.path().exists());

        assert_eq!(storage.load().unwrap(), bookmarks);
    }

    #[test]
    fn test_save_format() {
        let temp_dir = TempDir::new().unwrap();
        let storage = test_storage(&temp_dir);
        storage.save(&sample()).unwrap();

        let content = fs::read_to_string(storage.path()).unwrap();
        // Non-ASCII preserved literally, two-space indentation, explicit null
        assert!(content.contains("Python官方源码仓库"));
        assert!(content.starts_with("[\n  {\n    \"url\""));
        assert!(content.contains("\"category\": null"));
        assert!(!storage.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_save_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let storage = test_storage(&temp_dir);

        storage.save(&sample()).unwrap();
        storage.save(&[]).unwrap();

        assert!(storage.load().unwrap().is_empty());
        assert_eq!(fs::read_to_string(storage.path()).unwrap(), "[]");
    }

    #[test]
    fn test_load_missing_key_fails() {
        let temp_dir = TempDir::new().unwrap();
        let storage = test_storage(&temp_dir);
        fs::write(
            storage.path(),
            r#"[{"url": "https://example.com", "title": "x", "tags": []}]"#,
        )
        .unwrap();

        let err = storage.load().unwrap_err();
        assert!(matches!(err, StorageError::InvalidFormat { .. }));
        assert!(err.to_string().contains("category"));
    }

    #[test]
    fn test_load_malformed_json_fails() {
        let temp_dir = TempDir::new().unwrap();
        let storage = test_storage(&temp_dir);
        fs::write(storage.path(), "not json").unwrap();

        assert!(matches!(
            storage.load(),
            Err(StorageError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_load_requires_array() {
        let temp_dir = TempDir::new().unwrap();
        let storage = test_storage(&temp_dir);
        fs::write(storage.path(), r#"{"bookmarks": []}"#).unwrap();

        assert!(storage.load().is_err());
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir
            .path()
            .join("a")
            .join("b")
            .join("c")
            .join("file.txt");

        atomic_write(&nested_path, b"test data").unwrap();

        assert!(nested_path.exists());
        let content = fs::read_to_string(&nested_path).unwrap();
        assert_eq!(content, "test data");
    }
}
