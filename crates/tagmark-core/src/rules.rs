//! Keyword tables for classification and tagging
//!
//! Rules are plain data. The built-in tables cover a handful of broad
//! categories and tags; a TOML file can replace them entirely:
//!
//! ```toml
//! [[categories]]
//! name = "technical"
//! keywords = ["python", "github"]
//!
//! [[tags]]
//! name = "open-source"
//! keywords = ["github", "source"]
//! ```
//!
//! Declaration order matters: it is the tag output order and the
//! tie-break order for categories.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a rules file
#[derive(Error, Debug)]
pub enum RulesError {
    #[error("Failed to read rules file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid rules file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid rules: {0}")]
    Invalid(String),
}

/// A named rule matched by any of its keywords
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl KeywordRule {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Category and tag keyword tables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassifierRules {
    #[serde(default)]
    pub categories: Vec<KeywordRule>,
    #[serde(default)]
    pub tags: Vec<KeywordRule>,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            categories: vec![
                KeywordRule::new(
                    "technical",
                    &[
                        "python", "javascript", "java", "编程", "开发", "github", "git", "linux",
                        "docker",
                    ],
                ),
                KeywordRule::new("news", &["新闻", "时事", "政治", "社会", "财经"]),
                KeywordRule::new("entertainment", &["电影", "音乐", "游戏", "娱乐", "视频"]),
                KeywordRule::new("learning", &["教程", "学习", "课程", "教育", "学术"]),
                KeywordRule::new("life", &["生活", "健康", "美食", "旅行", "家居"]),
            ],
            tags: vec![
                KeywordRule::new("programming", &["python", "javascript", "java", "code", "编程"]),
                KeywordRule::new("open-source", &["github", "开源", "source", "code"]),
                KeywordRule::new("tutorial", &["教程", "guide", "tutorial", "howto"]),
                KeywordRule::new("documentation", &["文档", "doc", "document", "手册"]),
            ],
        }
    }
}

impl ClassifierRules {
    /// Load rules from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, RulesError> {
        let content = std::fs::read_to_string(path).map_err(|source| RulesError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let rules: ClassifierRules =
            toml::from_str(&content).map_err(|source| RulesError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        rules.normalized()
    }

    /// Load rules from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self, RulesError> {
        let rules: ClassifierRules =
            toml::from_str(content).map_err(|e| RulesError::Invalid(e.to_string()))?;
        rules.normalized()
    }

    /// Lowercase and trim keywords, drop empty ones, reject unnamed rules
    ///
    /// An empty keyword would match every bookmark.
    fn normalized(mut self) -> Result<Self, RulesError> {
        for rule in self.categories.iter_mut().chain(self.tags.iter_mut()) {
            if rule.name.trim().is_empty() {
                return Err(RulesError::Invalid("rule with empty name".to_string()));
            }
            rule.keywords = rule
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
        }
        Ok(self)
    }

    /// Names of all categories in declaration order
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|r| r.name.as_str()).collect()
    }

    /// Names of all tags in declaration order
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|r| r.name.as_str()).collect()
    }
}
