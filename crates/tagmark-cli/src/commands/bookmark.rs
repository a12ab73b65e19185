//! Bookmark command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use tagmark_core::{BookmarkDraft, Store};

use crate::output::Output;

/// Add a bookmark, letting the classifier fill in tags and category
pub fn add(
    store: &mut Store,
    url: String,
    title: Option<String>,
    tags: Vec<String>,
    output: &Output,
) -> Result<()> {
    let draft = BookmarkDraft::new(url)
        .with_title(title.unwrap_or_default())
        .with_tags(tags);

    let bookmark = store.add(draft).context("Failed to add bookmark")?;

    output.success(&format!("Added bookmark: {}", bookmark.url));
    output.print_bookmark(&bookmark)
}

/// Import every link from an HTML bookmark export
pub fn import(store: &mut Store, file: PathBuf, output: &Output) -> Result<()> {
    let report = store
        .import_file(&file)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    output.success(&format!(
        "Imported {} bookmark(s) from {}",
        report.processed_count(),
        file.display()
    ));
    Ok(())
}

/// List bookmarks, optionally filtered by category or tag
pub fn list(
    store: &Store,
    category: Option<String>,
    tag: Option<String>,
    output: &Output,
) -> Result<()> {
    let bookmarks = match (category, tag) {
        (Some(ref c), _) => store.by_category(c),
        (None, Some(ref t)) => store.by_tag(t),
        (None, None) => store.all().iter().collect(),
    };

    output.print_bookmarks(&bookmarks)
}

/// Remove every bookmark with the given url
pub fn remove(store: &mut Store, url: String, output: &Output) -> Result<()> {
    if !store.remove(&url).context("Failed to remove bookmark")? {
        bail!("Bookmark not found: {}", url);
    }

    output.success(&format!("Removed bookmark: {}", url));
    Ok(())
}
