//! Keyword classifier
//!
//! Derives a bookmark's category and tags from its title and URL. Matching
//! is plain substring search over the lowercased concatenation of title and
//! URL, so keywords work the same for any script.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Bookmark;
use crate::rules::ClassifierRules;

/// Scheme, optional `www.`, then everything up to the first `/`
///
/// A query or fragment right after the host is not a delimiter, so
/// `https://example.com?q=1` captures `example.com?q=1`.
static DOMAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://(?:www\.)?([^/]+)").expect("valid domain pattern"));

/// Top-level domains dropped from domain tags
const STRIPPED_TLDS: &[&str] = &["com", "org", "net", "edu", "gov", "cn", "io"];

/// Assigns categories and tags from fixed keyword tables
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    rules: ClassifierRules,
}

impl Classifier {
    /// Create a classifier over the given tables
    pub fn new(rules: ClassifierRules) -> Self {
        Self { rules }
    }

    /// The tables this classifier was built with
    pub fn rules(&self) -> &ClassifierRules {
        &self.rules
    }

    /// Score every category against the bookmark, in declaration order
    ///
    /// A keyword counts once no matter how often it occurs.
    pub fn category_scores(&self, bookmark: &Bookmark) -> Vec<(&str, usize)> {
        let text = match_text(bookmark);
        self.rules
            .categories
            .iter()
            .map(|rule| {
                let score = rule
                    .keywords
                    .iter()
                    .filter(|keyword| text.contains(keyword.as_str()))
                    .count();
                (rule.name.as_str(), score)
            })
            .collect()
    }

    /// Set the best-scoring category
    ///
    /// Ties go to the category declared first. When nothing matches the
    /// existing category is left alone.
    pub fn classify(&self, bookmark: &mut Bookmark) {
        let mut best: Option<(&str, usize)> = None;
        for (name, score) in self.category_scores(bookmark) {
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((name, score));
            }
        }

        if let Some((name, _)) = best {
            bookmark.set_category(Some(name.to_string()));
        }
    }

    /// Replace the bookmark's tags with keyword tags plus a domain tag
    pub fn tag(&self, bookmark: &mut Bookmark) {
        let text = match_text(bookmark);
        let mut tags: Vec<String> = self
            .rules
            .tags
            .iter()
            .filter(|rule| rule.keywords.iter().any(|k| text.contains(k.as_str())))
            .map(|rule| rule.name.clone())
            .collect();

        if let Some(domain) = domain_tag(&bookmark.url) {
            if !tags.contains(&domain) {
                tags.push(domain);
            }
        }

        bookmark.set_tags(tags);
    }

    /// Tag, then classify
    pub fn annotate(&self, bookmark: &mut Bookmark) {
        self.tag(bookmark);
        self.classify(bookmark);
    }
}

/// Lowercased title followed directly by the URL
fn match_text(bookmark: &Bookmark) -> String {
    let mut text = String::with_capacity(bookmark.title.len() + bookmark.url.len());
    text.push_str(&bookmark.title);
    text.push_str(&bookmark.url);
    text.to_lowercase()
}

/// Derive a tag from the URL's host
///
/// `https://www.github.com/x` gives `github`. Only one trailing TLD from
/// [`STRIPPED_TLDS`] is removed, so `example.com.cn` gives `example.com`.
pub fn domain_tag(url: &str) -> Option<String> {
    let host = DOMAIN_RE.captures(url)?.get(1)?.as_str();
    let host = host.strip_prefix("www.").unwrap_or(host);

    let domain = STRIPPED_TLDS
        .iter()
        .find_map(|tld| {
            host.strip_suffix(tld)
                .and_then(|rest| rest.strip_suffix('.'))
        })
        .unwrap_or(host);

    if domain.is_empty() {
        None
    } else {
        Some(domain.to_string())
    }
}
