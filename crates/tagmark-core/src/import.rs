//! Browser bookmark export parsing
//!
//! Exported bookmark files are loose HTML (`<DT><A HREF=...>Title</A>`), so
//! every anchor with an `href` is taken as one bookmark, wherever it sits in
//! the folder structure.

use std::path::PathBuf;

use scraper::{Html, Selector};
use thiserror::Error;

use crate::models::Bookmark;
use crate::storage::StorageError;

/// A link found in an export file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedLink {
    pub url: String,
    pub title: String,
}

impl From<ImportedLink> for Bookmark {
    fn from(link: ImportedLink) -> Self {
        Bookmark::new(link.url, link.title)
    }
}

/// Outcome of a successful import
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// The bookmarks that were added, after tagging and classification
    pub bookmarks: Vec<Bookmark>,
}

impl ImportReport {
    pub fn processed_count(&self) -> usize {
        self.bookmarks.len()
    }
}

/// Reasons an import produced nothing
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to read import file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Import file is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Failed to save imported bookmarks: {0}")]
    Storage(#[from] StorageError),
}

/// Extract every `<a href>` from an HTML document
///
/// The title is the anchor's text with each text node trimmed and the
/// pieces joined together.
pub fn parse_bookmark_html(html: &str) -> Vec<ImportedLink> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|el| {
            let url = el.value().attr("href")?;
            let title = el
                .text()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<String>();
            Some(ImportedLink {
                url: url.to_string(),
                title,
            })
        })
        .collect()
}

/// Decode raw upload bytes
pub fn decode_html(bytes: &[u8]) -> Result<&str, ImportError> {
    Ok(std::str::from_utf8(bytes)?)
}

/// Reduce an uploaded file name to a safe, flat ASCII name
///
/// Path separators become spaces, whitespace runs become `_`, anything
/// outside `[A-Za-z0-9._-]` is dropped and leading/trailing `.`/`_` are
/// trimmed. Falls back to `upload.html` when nothing is left.
pub fn sanitize_filename(name: &str) -> String {
    let flattened = name.replace(['/', '\\'], " ");
    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        "upload.html".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETSCAPE_EXPORT: &str = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<META HTTP-EQUIV="Content-Type" CONTENT="text/html; charset=UTF-8">
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>
    <DT><H3>Dev</H3>
    <DL><p>
        <DT><A HREF="https://github.com/python/cpython" ADD_DATE="1700000000">Python官方源码仓库</A>
        <DT><A HREF="https://www.python.org/doc/">  Python
            <b>Docs</b> </A>
    </DL><p>
    <DT><A HREF="https://news.ycombinator.com">Hacker News</A>
    <DT><A NAME="anchor-only">No link</A>
    <DT><A HREF="">Empty</A>
</DL><p>"#;

    #[test]
    fn test_parse_netscape_export() {
        let links = parse_bookmark_html(NETSCAPE_EXPORT);

        assert_eq!(links.len(), 4);
        assert_eq!(
            links[0],
            ImportedLink {
                url: "https://github.com/python/cpython".to_string(),
                title: "Python官方源码仓库".to_string(),
            }
        );
        assert_eq!(links[1].title, "PythonDocs");
        assert_eq!(links[2].url, "https://news.ycombinator.com");
        assert_eq!(links[3].url, "");
    }

    #[test]
    fn test_parse_decodes_entities() {
        let links = parse_bookmark_html(r#"<a href="https://a.com/?x=1&amp;y=2">A &amp; B</a>"#);
        assert_eq!(links[0].url, "https://a.com/?x=1&y=2");
        assert_eq!(links[0].title, "A & B");
    }

    #[test]
    fn test_parse_without_links() {
        assert!(parse_bookmark_html("<html><body><p>nothing</p></body></html>").is_empty());
        assert!(parse_bookmark_html("").is_empty());
        assert!(parse_bookmark_html("<<<not html").is_empty());
    }

    #[test]
    fn test_imported_link_into_bookmark() {
        let bookmark: Bookmark = ImportedLink {
            url: "https://example.com".to_string(),
            title: "Example".to_string(),
        }
        .into();
        assert_eq!(bookmark, Bookmark::new("https://example.com", "Example"));
    }

    #[test]
    fn test_decode_html() {
        assert_eq!(decode_html(b"<a></a>").unwrap(), "<a></a>");
        assert!(matches!(
            decode_html(&[0xff, 0xfe, 0x00]),
            Err(ImportError::Encoding(_))
        ));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("bookmarks.html"), "bookmarks.html");
        assert_eq!(sanitize_filename("../../etc/passwd.html"), "etc_passwd.html");
        assert_eq!(sanitize_filename("my bookmarks 2024.html"), "my_bookmarks_2024.html");
        assert_eq!(sanitize_filename(".hidden.html"), "hidden.html");
        assert_eq!(sanitize_filename("书签.html"), "html");
        assert_eq!(sanitize_filename("..."), "upload.html");
    }
}
