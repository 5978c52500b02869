//! End-to-end processing: load, normalize, validate and persist.

use crate::config::StyleConfig;
use crate::detect;
use crate::error::{Error, Result};
use crate::format::{self, FormatReport};
use crate::model::Document;
use crate::validate::{Issue, Validator};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for processing a document.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Run the validator after formatting
    pub validate: bool,

    /// Write results to disk instead of returning the document
    pub persist: bool,

    /// House style to apply
    pub config: StyleConfig,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            validate: true,
            persist: true,
            config: StyleConfig::house(),
        }
    }
}

impl ProcessOptions {
    /// Create new options: validate and persist with the house style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable validation.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Enable or disable writing to disk.
    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Set the style to apply.
    pub fn with_config(mut self, config: StyleConfig) -> Self {
        self.config = config;
        self
    }
}

/// Result of processing one document.
#[derive(Debug)]
pub struct ProcessOutcome {
    /// The formatted document, when it was not written to disk
    pub document: Option<Document>,

    /// What the formatter changed and could not fix
    pub report: FormatReport,

    /// Validation issues; empty when validation passed or was skipped
    pub issues: Vec<Issue>,

    /// Where the document was written
    pub output: Option<PathBuf>,

    /// Where the issues report was written
    pub issues_path: Option<PathBuf>,
}

impl ProcessOutcome {
    fn in_memory(document: Document, report: FormatReport, issues: Vec<Issue>) -> Self {
        Self {
            document: Some(document),
            report,
            issues,
            output: None,
            issues_path: None,
        }
    }

    /// True when no validation issue was found.
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

fn run_pipeline(doc: &mut Document, options: &ProcessOptions) -> (FormatReport, Vec<Issue>) {
    log::info!("Processing cover page and tables...");
    let report = format::normalize(doc, &options.config);
    for anomaly in &report.anomalies {
        log::warn!("{}", anomaly);
    }

    let issues = if options.validate {
        Validator::new(&options.config).validate(doc)
    } else {
        Vec::new()
    };
    for issue in &issues {
        log::warn!("{}", issue);
    }
    (report, issues)
}

/// Format `input` and, depending on the options, validate and write it.
///
/// With `persist` set, a document that passes (or was not validated) is
/// written to `output`, creating parent directories. A document with issues
/// is written next to `output` as `<stem>_WITH_ISSUES.docx` together with a
/// `<stem>_ISSUES.txt` report, and `output` itself is not written. Without
/// `persist` nothing touches the disk and the document is returned.
///
/// # Example
///
/// ```no_run
/// use finstyle::process::{process_document, ProcessOptions};
/// use std::path::Path;
///
/// let options = ProcessOptions::new().with_validation(true);
/// let outcome = process_document(
///     Path::new("report.docx"),
///     Path::new("out/report.docx"),
///     &options,
/// )?;
/// println!("{} issues", outcome.issues.len());
/// # Ok::<(), finstyle::Error>(())
/// ```
pub fn process_document(
    input: &Path,
    output: &Path,
    options: &ProcessOptions,
) -> Result<ProcessOutcome> {
    if !input.exists() {
        return Err(Error::NotFound(input.to_path_buf()));
    }

    let name = display_name(input);
    log::info!("Loading document: {}", name);
    let mut doc = Document::open(input)?;
    let (report, issues) = run_pipeline(&mut doc, options);

    if !options.persist {
        log::info!("Processing complete. Returning document object.");
        return Ok(ProcessOutcome::in_memory(doc, report, issues));
    }

    if issues.is_empty() {
        doc.save(output)?;
        if options.validate {
            log::info!("Processing complete. Validation PASSED. Saved to: {}", output.display());
        } else {
            log::info!("Processing complete. Saved to: {}", output.display());
        }
        return Ok(ProcessOutcome {
            document: None,
            report,
            issues,
            output: Some(output.to_path_buf()),
            issues_path: None,
        });
    }

    let (doc_path, issues_path) = issue_paths(output);
    doc.save(&doc_path)?;
    fs::write(&issues_path, issue_report(&name, &issues))?;
    log::error!("Validation FAILED. Output saved to: {}", doc_path.display());
    log::error!("Issue log saved to: {}", issues_path.display());

    Ok(ProcessOutcome {
        document: None,
        report,
        issues,
        output: Some(doc_path),
        issues_path: Some(issues_path),
    })
}

/// Run the pipeline on an in-memory package. Nothing is written.
pub fn process_bytes(data: &[u8], options: &ProcessOptions) -> Result<ProcessOutcome> {
    let mut doc = Document::from_bytes(data)?;
    let (report, issues) = run_pipeline(&mut doc, options);
    Ok(ProcessOutcome::in_memory(doc, report, issues))
}

/// Process several files in parallel.
///
/// Each result is written to `output_dir` (or beside its input) under its
/// default output name. `on_done` is called from worker threads as each file
/// finishes; results are returned in input order.
pub fn process_batch<F>(
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    options: &ProcessOptions,
    on_done: F,
) -> Vec<(PathBuf, Result<ProcessOutcome>)>
where
    F: Fn(&Path, &Result<ProcessOutcome>) + Sync,
{
    inputs
        .par_iter()
        .map(|input| {
            let output = match output_dir {
                Some(dir) => dir.join(default_output_name(input)),
                None => default_output_path(input),
            };
            let result = process_document(input, &output, options);
            on_done(input, &result);
            (input.clone(), result)
        })
        .collect()
}

/// `.docx` files directly inside `dir`, sorted by name. Office lock files
/// (`~$name.docx`) are skipped.
pub fn collect_docx_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::NotFound(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_lock_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("~$"));
        if path.is_file() && detect::has_docx_extension(&path) && !is_lock_file {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn default_output_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "docx".to_string());
    format!("{}_processed.{}", stem, extension)
}

/// `<stem>_processed.<ext>` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_file_name(default_output_name(input))
}

/// Paths of the document and report written when validation fails.
pub fn issue_paths(output: &Path) -> (PathBuf, PathBuf) {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    (
        output.with_file_name(format!("{}_WITH_ISSUES.docx", stem)),
        output.with_file_name(format!("{}_ISSUES.txt", stem)),
    )
}

/// Plain-text issues report.
pub fn issue_report(source_name: &str, issues: &[Issue]) -> String {
    let mut report = format!("Validation Report for {}\n", source_name);
    report.push_str(&"=".repeat(40));
    report.push('\n');
    report.push_str(&format!(
        "Generated: {}\n\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    for issue in issues {
        report.push_str(&format!("- {}\n", issue));
    }
    report
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
