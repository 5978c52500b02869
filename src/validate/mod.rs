//! House-style validation.
//!
//! The validator reads a document without changing it and returns one
//! [`Issue`] per rule violation, in check order: cover page, tables, then
//! fonts. Rule violations are data, never errors; even a document that cannot
//! be loaded yields a single issue.
//!
//! # Example
//!
//! ```no_run
//! use finstyle::validate::validate_output;
//! use std::path::Path;
//!
//! let issues = validate_output(Path::new("report_processed.docx"));
//! for issue in &issues {
//!     println!("- {}", issue);
//! }
//! ```

mod cover;
mod font;
mod table;

use crate::config::StyleConfig;
use crate::model::Document;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// One rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Issue(String);

impl Issue {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// The message text.
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Issue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Issue {
    fn from(message: String) -> Self {
        Self(message)
    }
}

/// What to validate.
#[derive(Debug, Clone, Copy)]
pub enum ValidationInput<'a> {
    /// A `.docx` file on disk
    Path(&'a Path),
    /// The complete content of a `.docx` file
    Bytes(&'a [u8]),
    /// An already loaded document
    Document(&'a Document),
}

impl<'a> From<&'a Path> for ValidationInput<'a> {
    fn from(path: &'a Path) -> Self {
        ValidationInput::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for ValidationInput<'a> {
    fn from(path: &'a PathBuf) -> Self {
        ValidationInput::Path(path.as_path())
    }
}

impl<'a> From<&'a [u8]> for ValidationInput<'a> {
    fn from(data: &'a [u8]) -> Self {
        ValidationInput::Bytes(data)
    }
}

impl<'a> From<&'a Document> for ValidationInput<'a> {
    fn from(doc: &'a Document) -> Self {
        ValidationInput::Document(doc)
    }
}

/// Validate against the house style.
pub fn validate_output<'a>(input: impl Into<ValidationInput<'a>>) -> Vec<Issue> {
    validate_with(input, &StyleConfig::house())
}

/// Validate against the given style.
pub fn validate_with<'a>(
    input: impl Into<ValidationInput<'a>>,
    config: &StyleConfig,
) -> Vec<Issue> {
    let validator = Validator::new(config);
    let loaded = match input.into() {
        ValidationInput::Document(doc) => return validator.validate(doc),
        ValidationInput::Path(path) if path.as_os_str().is_empty() => {
            let issue = Issue::new(
                "The input must be either a path to a .docx file or a loaded document. Got an empty path.",
            );
            log::error!("{}", issue);
            return vec![issue];
        }
        ValidationInput::Path(path) => Document::open(path),
        ValidationInput::Bytes(data) => Document::from_bytes(data),
    };

    match loaded {
        Ok(doc) => validator.validate(&doc),
        Err(e) => {
            let issue = Issue::new(format!("Could not load document. {}", e));
            log::error!("{}", issue);
            vec![issue]
        }
    }
}

/// Runs the house-style checks over a loaded document.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    config: &'a StyleConfig,
}

impl<'a> Validator<'a> {
    pub fn new(config: &'a StyleConfig) -> Self {
        Self { config }
    }

    /// Check a document and return the issues found.
    pub fn validate(&self, doc: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();
        log::debug!("Starting validation");

        let Some(title_index) = cover::check(doc, self.config, &mut issues) else {
            return issues;
        };
        table::check(doc, self.config, &mut issues);
        font::check(doc, self.config, title_index, &mut issues);

        log::debug!("Validation complete: {} issues", issues.len());
        issues
    }
}

/// `text`, cut to `limit` characters with a trailing ellipsis.
fn preview(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let cut: String = text.chars().take(limit).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
