//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use anyhow::Result;
use serde::Serialize;
use tagmark_core::{Bookmark, ClassifierRules, KeywordRule};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single bookmark
    pub fn print_bookmark(&self, bookmark: &Bookmark) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("URL:       {}", bookmark.url);
                if !bookmark.title.is_empty() {
                    println!("Title:     {}", bookmark.title);
                }
                println!(
                    "Category:  {}",
                    bookmark.category.as_deref().unwrap_or("(none)")
                );
                if !bookmark.tags.is_empty() {
                    println!("Tags:      {}", bookmark.tags.join(", "));
                }
            }
            OutputFormat::Json => print_json(bookmark)?,
            OutputFormat::Quiet => println!("{}", bookmark.url),
        }
        Ok(())
    }

    /// Print a list of bookmarks
    pub fn print_bookmarks(&self, bookmarks: &[&Bookmark]) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                if bookmarks.is_empty() {
                    println!("No bookmarks found.");
                    return Ok(());
                }
                for bookmark in bookmarks {
                    println!(
                        "{:<13} | {} | {}",
                        bookmark.category.as_deref().unwrap_or("-"),
                        truncate(&bookmark.title, 35),
                        truncate(&bookmark.url, 50)
                    );
                }
                println!("\n{} bookmark(s)", bookmarks.len());
            }
            OutputFormat::Json => print_json(&bookmarks)?,
            OutputFormat::Quiet => {
                for bookmark in bookmarks {
                    println!("{}", bookmark.url);
                }
            }
        }
        Ok(())
    }

    /// Print the active keyword tables
    pub fn print_rules(&self, rules: &ClassifierRules) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("Categories:");
                print_rule_table(&rules.categories);
                println!();
                println!("Tags:");
                print_rule_table(&rules.tags);
            }
            OutputFormat::Json => print_json(rules)?,
            OutputFormat::Quiet => {
                for name in rules.category_names() {
                    println!("{}", name);
                }
            }
        }
        Ok(())
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_rule_table(rules: &[KeywordRule]) {
    for rule in rules {
        println!("  {:<14} {}", rule.name, rule.keywords.join(", "));
    }
}

/// Truncate a string to max characters, adding "..." if truncated
///
/// Counts chars rather than bytes, titles are often CJK.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
