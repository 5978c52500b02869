//! House-style normalization passes.
//!
//! A [`Formatter`] runs an ordered list of [`FormatPass`]es over a loaded
//! [`Document`]. Passes never fail: anything they cannot bring into shape is
//! recorded as an [`Anomaly`] in the [`FormatReport`] and left for the caller
//! to log.
//!
//! # Example
//!
//! ```no_run
//! use finstyle::format::normalize;
//! use finstyle::{Document, StyleConfig};
//!
//! fn main() -> finstyle::Result<()> {
//!     let mut doc = Document::open("report.docx")?;
//!     let report = normalize(&mut doc, &StyleConfig::house());
//!     for anomaly in &report.anomalies {
//!         println!("{}", anomaly);
//!     }
//!     doc.save("report_processed.docx")
//! }
//! ```

pub mod classify;
mod cover;
mod font;
mod table;
pub mod text;

pub use classify::{split_title, LineRole, TitleParts};
pub use cover::CoverPageNormalizer;
pub use font::GlobalFontNormalizer;
pub use table::{current_period_column, TableNormalizer};

use crate::config::StyleConfig;
use crate::model::Document;
use serde::Serialize;
use std::fmt;

/// A rule that could not be applied cleanly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    /// The package has no styles part.
    StylesPartMissing,

    /// The style registry has no `Normal` style.
    NormalStyleMissing,

    /// Removing leading blank rows stopped at a paragraph that is not
    /// removable.
    PlacementHalted {
        /// 1-indexed row of the paragraph that stopped removal
        row: usize,
        removed: usize,
        requested: usize,
    },

    /// The title line does not follow the "Name (formerly Old name)" form.
    TitleNotMatched { text: String },

    /// A cover line was not found in the scanned rows.
    MissingRole { role: LineRole },

    /// A cover line sits where another line is expected.
    UnexpectedCoverLine { expected: LineRole, text: String },

    /// The period line is written in capitals.
    PeriodAllCaps { text: String },

    /// The unaudited line is still not a sentence-case parenthetical.
    UnauditedNotSentenceCase { text: String },

    /// The document has no tables.
    NoTables,

    /// No period year was found in a table header.
    NoCurrentPeriod {
        /// 1-indexed table number
        table: usize,
    },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::StylesPartMissing => {
                write!(f, "Document has no styles part. Skipping font normalization.")
            }
            Anomaly::NormalStyleMissing => {
                write!(f, "Style 'Normal' missing. Skipping font normalization.")
            }
            Anomaly::PlacementHalted {
                row,
                removed,
                requested,
            } => write!(
                f,
                "Stopped deleting rows at row {} after removing {} of {}.",
                row, removed, requested
            ),
            Anomaly::TitleNotMatched { text } => {
                write!(f, "Title '{}' does not match 'Name (formerly Old name)'.", text)
            }
            Anomaly::MissingRole { role } => {
                write!(f, "Cover line '{}' not found.", role)
            }
            Anomaly::UnexpectedCoverLine { expected, text } => {
                write!(f, "Expected the '{}' line, found '{}'.", expected, text)
            }
            Anomaly::PeriodAllCaps { text } => {
                write!(f, "Period line '{}' is in capitals.", text)
            }
            Anomaly::UnauditedNotSentenceCase { text } => {
                write!(f, "Line '{}' is not in sentence case.", text)
            }
            Anomaly::NoTables => write!(f, "No tables found in document."),
            Anomaly::NoCurrentPeriod { table } => write!(
                f,
                "Couldn't identify the current period column in table {}; bolding not applied.",
                table
            ),
        }
    }
}

/// What the passes changed and what they could not fix.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormatReport {
    /// Rules that could not be applied cleanly, in the order found
    pub anomalies: Vec<Anomaly>,

    /// Blank rows inserted above the cover text
    pub rows_inserted: usize,

    /// Blank rows removed above the cover text
    pub rows_removed: usize,

    /// Cover lines restyled
    pub cover_lines_formatted: usize,

    /// Tables restyled
    pub tables_formatted: usize,

    /// Detected current-period column per table
    pub current_period_columns: Vec<Option<usize>>,
}

impl FormatReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an anomaly.
    pub fn record(&mut self, anomaly: Anomaly) {
        self.anomalies.push(anomaly);
    }

    /// True when every rule applied cleanly.
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }
}

/// One normalization step.
///
/// Implement this trait to add a rule to the [`Formatter`].
pub trait FormatPass: Send + Sync {
    /// Name used in log records.
    fn name(&self) -> &str;

    /// Mutate the document in place.
    fn apply(&self, doc: &mut Document, config: &StyleConfig, report: &mut FormatReport);
}

/// Ordered list of passes.
pub struct Formatter {
    passes: Vec<Box<dyn FormatPass>>,
}

impl Formatter {
    /// Create a formatter without passes.
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    /// Global fonts, then the cover page, then tables.
    pub fn with_defaults() -> Self {
        Self::new()
            .with_pass(GlobalFontNormalizer)
            .with_pass(CoverPageNormalizer)
            .with_pass(TableNormalizer)
    }

    /// Append a pass.
    pub fn with_pass<P: FormatPass + 'static>(mut self, pass: P) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Names of the registered passes in run order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run every pass in order.
    pub fn run(&self, doc: &mut Document, config: &StyleConfig) -> FormatReport {
        let mut report = FormatReport::new();
        for pass in &self.passes {
            log::debug!("Running {} pass", pass.name());
            pass.apply(doc, config, &mut report);
        }
        report
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Run the default passes.
pub fn normalize(doc: &mut Document, config: &StyleConfig) -> FormatReport {
    Formatter::with_defaults().run(doc, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pass_order() {
        let formatter = Formatter::default();
        assert_eq!(formatter.pass_names(), ["global-font", "cover-page", "table"]);
    }

    #[test]
    fn test_empty_formatter_changes_nothing() {
        let mut doc = Document::new().unwrap();
        doc.add_paragraph("Hello");
        let report = Formatter::new().run(&mut doc, &StyleConfig::house());
        assert!(report.is_clean());
        assert_eq!(doc.paragraphs().len(), 1);
    }

    #[test]
    fn test_anomaly_serializes_with_kind() {
        let json = serde_json::to_value(Anomaly::NoCurrentPeriod { table: 2 }).unwrap();
        assert_eq!(json["kind"], "no_current_period");
        assert_eq!(json["table"], 2);

        let json = serde_json::to_value(Anomaly::MissingRole {
            role: LineRole::Period,
        })
        .unwrap();
        assert_eq!(json["role"], "period");
    }

    #[test]
    fn test_anomaly_display() {
        assert_eq!(Anomaly::NoTables.to_string(), "No tables found in document.");
        assert_eq!(
            Anomaly::MissingRole {
                role: LineRole::Statements
            }
            .to_string(),
            "Cover line 'Financial Statements' not found."
        );
    }
}
