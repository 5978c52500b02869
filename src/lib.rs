//! # finstyle
//!
//! House-style formatter and validator for DOCX financial reports.
//!
//! This library rewrites the fonts, cover page layout and table styling of a
//! word-processing document to match a fixed house style, then checks the
//! result against the same rules.
//!
//! ## Quick Start
//!
//! ```no_run
//! use finstyle::process_file;
//!
//! fn main() -> finstyle::Result<()> {
//!     let outcome = process_file("report.docx", "out/report.docx")?;
//!     for issue in &outcome.issues {
//!         println!("- {}", issue);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Cover page**: start row, title casing, centered and bolded cover lines
//! - **Tables**: column grid, cell margins, row heights, hanging indents
//! - **Current period**: bolds the latest-year value column
//! - **Validation**: one issue per violated rule, written as a text report
//! - **Batch processing**: uses Rayon to process directories in parallel

pub mod config;
pub mod detect;
pub mod error;
pub mod format;
pub mod model;
pub mod process;
pub mod validate;

// Re-export commonly used types
pub use config::StyleConfig;
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_docx, DocxFormat};
pub use error::{Error, Result};
pub use format::{normalize, Anomaly, FormatPass, FormatReport, Formatter, LineRole};
pub use model::{Alignment, Block, Cell, Document, Length, Paragraph, Row, Run, Table};
pub use process::{
    default_output_path, process_bytes, process_document, ProcessOptions, ProcessOutcome,
};
pub use validate::{validate_output, Issue, ValidationInput, Validator};

use std::path::Path;

/// Format, validate and save a document with the default options.
///
/// # Arguments
///
/// * `input` - Path to the source `.docx` file
/// * `output` - Where to write the formatted document
///
/// # Example
///
/// ```no_run
/// use finstyle::process_file;
///
/// let outcome = process_file("report.docx", "report_processed.docx").unwrap();
/// println!("Passed: {}", outcome.passed());
/// ```
pub fn process_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<ProcessOutcome> {
    process_document(input.as_ref(), output.as_ref(), &ProcessOptions::default())
}

/// Load a document and apply the house style in memory.
///
/// # Example
///
/// ```no_run
/// use finstyle::format_file;
///
/// let (doc, report) = finstyle::format_file("report.docx").unwrap();
/// println!("{} anomalies", report.anomalies.len());
/// doc.save("report_processed.docx").unwrap();
/// ```
pub fn format_file<P: AsRef<Path>>(path: P) -> Result<(Document, FormatReport)> {
    let mut doc = Document::open(path)?;
    let report = normalize(&mut doc, &StyleConfig::house());
    Ok((doc, report))
}

/// Validate a document on disk against the house style.
///
/// # Example
///
/// ```no_run
/// use finstyle::validate_file;
///
/// let issues = validate_file("report_processed.docx");
/// assert!(issues.is_empty());
/// ```
pub fn validate_file<P: AsRef<Path>>(path: P) -> Vec<Issue> {
    validate_output(path.as_ref())
}

/// Builder for formatting documents.
///
/// # Example
///
/// ```no_run
/// use finstyle::Finstyle;
///
/// let outcome = Finstyle::new()
///     .without_validation()
///     .run("report.docx", "out/report.docx")?;
/// # Ok::<(), finstyle::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Finstyle {
    options: ProcessOptions,
}

impl Finstyle {
    /// Create a builder with the house style, validation enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip validation after formatting.
    pub fn without_validation(mut self) -> Self {
        self.options = self.options.with_validation(false);
        self
    }

    /// Use a different style.
    pub fn with_config(mut self, config: StyleConfig) -> Self {
        self.options = self.options.with_config(config);
        self
    }

    /// Options the builder will run with.
    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Format `input` and write the result.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<ProcessOutcome> {
        let options = self.options.clone().with_persist(true);
        process_document(input.as_ref(), output.as_ref(), &options)
    }

    /// Format `input` in memory; nothing is written.
    pub fn load<P: AsRef<Path>>(&self, input: P) -> Result<ProcessOutcome> {
        let options = self.options.clone().with_persist(false);
        process_document(input.as_ref(), Path::new(""), &options)
    }

    /// Format a package held in memory.
    pub fn load_bytes(&self, data: &[u8]) -> Result<ProcessOutcome> {
        process_bytes(data, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_options() {
        let builder = Finstyle::new();
        assert!(builder.options().validate);

        let builder = Finstyle::new().without_validation();
        assert!(!builder.options().validate);
    }

    #[test]
    fn test_load_bytes_formats_in_memory() {
        let mut doc = Document::new().unwrap();
        doc.add_paragraph("Acme (formerly Beta)");
        let bytes = doc.to_bytes().unwrap();

        let outcome = Finstyle::new().without_validation().load_bytes(&bytes).unwrap();
        assert!(outcome.issues.is_empty());
        let formatted = outcome.document.unwrap();
        assert_eq!(formatted.paragraphs().len(), 20);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(format_file("missing.docx"), Err(Error::NotFound(_))));
        assert_eq!(validate_file("missing.docx").len(), 1);
    }
}
