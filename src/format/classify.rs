//! Classification of cover-page lines.
//!
//! The formatter and the validator both identify cover lines through
//! [`LineRole`], so the two cannot disagree about which paragraph is which.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static TITLE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(formerly\b").expect("valid title regex"));

static TITLE_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.*?)(\(formerly)(.*?)(\))$").expect("valid title parts regex")
});

static PERIOD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(January|February|March|April|May|June|July|August|September|October|November|December)\b.*\d{4}",
    )
    .expect("valid period regex")
});

/// Role of a cover-page line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineRole {
    /// Company name with its former name, e.g. "ACME CORP (formerly Old Acme Inc)"
    Title,
    /// The "Financial Statements" heading
    Statements,
    /// Reporting period, e.g. "March 31, 2024"
    Period,
    /// "(Unaudited)" or "(Expressed in ...)" note
    Unaudited,
}

impl LineRole {
    /// Roles in the order they are checked.
    pub const ALL: [LineRole; 4] = [
        LineRole::Title,
        LineRole::Statements,
        LineRole::Period,
        LineRole::Unaudited,
    ];

    /// Classify a line for formatting. The first matching role wins.
    pub fn classify(text: &str) -> Option<LineRole> {
        LineRole::ALL.into_iter().find(|role| role.matches(text))
    }

    /// Whether the formatter treats `text` as this role.
    pub fn matches(self, text: &str) -> bool {
        match self {
            LineRole::Title => TITLE_MARKER.is_match(text),
            LineRole::Statements => text.to_lowercase().contains("financial statements"),
            LineRole::Period => PERIOD_LINE.is_match(text),
            LineRole::Unaudited => {
                let lower = text.to_lowercase();
                lower.contains("unaudited") || lower.contains("expressed in")
            }
        }
    }

    /// Whether the validator accepts `text` as this role. Identical to
    /// [`LineRole::matches`] except that the unaudited line may mention
    /// "expressed" in any form.
    pub fn accepts(self, text: &str) -> bool {
        match self {
            LineRole::Unaudited => {
                let lower = text.to_lowercase();
                lower.contains("unaudited") || lower.contains("expressed")
            }
            other => other.matches(text),
        }
    }

    /// Name used in reports.
    pub fn label(self) -> &'static str {
        match self {
            LineRole::Title => "Title",
            LineRole::Statements => "Financial Statements",
            LineRole::Period => "Date",
            LineRole::Unaudited => "Unaudited",
        }
    }
}

impl fmt::Display for LineRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A title split around its "(formerly" marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleParts<'a> {
    pub name: &'a str,
    pub marker: &'a str,
    pub former_name: &'a str,
    pub close: &'a str,
}

/// Split a trimmed title line into name, marker, former name and closing
/// parenthesis. Returns `None` when the line does not end with `)`.
pub fn split_title(text: &str) -> Option<TitleParts<'_>> {
    let caps = TITLE_PARTS.captures(text)?;
    Some(TitleParts {
        name: caps.get(1)?.as_str(),
        marker: caps.get(2)?.as_str(),
        former_name: caps.get(3)?.as_str(),
        close: caps.get(4)?.as_str(),
    })
}
