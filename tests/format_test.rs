//! Integration tests for the formatter.

use finstyle::format::{current_period_column, split_title, FormatPass};
use finstyle::{normalize, Anomaly, Document, Formatter, FormatReport, StyleConfig};

/// An unformatted quarterly report: a few leading blanks, the four cover
/// lines with no separators, a heading and one table.
fn raw_report(leading_blanks: usize) -> Document {
    let mut doc = Document::new().unwrap();
    for _ in 0..leading_blanks {
        doc.add_paragraph("");
    }
    doc.add_paragraph("Acme Mining Corp (formerly NORTHERN GOLD LTD)");
    doc.add_paragraph("CONDENSED INTERIM CONSOLIDATED FINANCIAL STATEMENTS");
    doc.add_paragraph("For the three months ended March 31, 2024");
    doc.add_paragraph("(unaudited - expressed in Canadian dollars)");
    doc.add_paragraph("Statement of financial position");
    doc.add_table(&[
        &["", "Note", "March 31, 2024", "December 31, 2023"],
        &["Cash", "4", "1,200", "900"],
        &["Receivables", "5", "$300", "250"],
    ]);
    doc
}

fn first_text_index(doc: &Document) -> Option<usize> {
    doc.paragraphs().iter().position(|p| !p.is_blank(doc.tree()))
}

#[test]
fn test_full_report_is_clean() {
    let mut doc = raw_report(6);
    let report = normalize(&mut doc, &StyleConfig::house());

    assert!(report.is_clean(), "{:?}", report.anomalies);
    assert_eq!(report.rows_inserted, 12);
    assert_eq!(report.cover_lines_formatted, 4);
    assert_eq!(report.tables_formatted, 1);
    assert_eq!(report.current_period_columns, vec![Some(2)]);
    assert_eq!(first_text_index(&doc), Some(18));
}

#[test]
fn test_cover_text_and_casing() {
    let mut doc = raw_report(18);
    normalize(&mut doc, &StyleConfig::house());

    let tree = doc.tree();
    let lines: Vec<String> = doc
        .paragraphs()
        .iter()
        .map(|p| p.text(tree))
        .filter(|t| !t.is_empty())
        .collect();
    assert_eq!(
        lines[..4],
        [
            "ACME MINING CORP (formerly Northern Gold Ltd)",
            "Condensed Interim Consolidated Financial Statements",
            "For the three months ended March 31, 2024",
            "(Unaudited - expressed in Canadian dollars)",
        ]
    );
}

#[test]
fn test_normalize_is_idempotent() {
    let mut doc = raw_report(3);
    let config = StyleConfig::house();
    normalize(&mut doc, &config);
    let once = doc.tree().to_bytes().unwrap();

    let second = normalize(&mut doc, &config);
    assert!(second.is_clean(), "{:?}", second.anomalies);
    assert_eq!(second.rows_inserted, 0);
    assert_eq!(second.rows_removed, 0);
    assert_eq!(doc.tree().to_bytes().unwrap(), once);
}

#[test]
fn test_placement_from_ten_and_twenty_five_rows() {
    let config = StyleConfig::house();

    let mut short = raw_report(10);
    let report = normalize(&mut short, &config);
    assert_eq!(report.rows_inserted, 8);
    assert_eq!(first_text_index(&short), Some(18));

    let mut long = raw_report(25);
    let report = normalize(&mut long, &config);
    assert_eq!(report.rows_removed, 7);
    assert_eq!(first_text_index(&long), Some(18));
}

#[test]
fn test_formatting_survives_save_and_reload() {
    let mut doc = raw_report(0);
    normalize(&mut doc, &StyleConfig::house());
    let bytes = doc.to_bytes().unwrap();

    let reloaded = Document::from_bytes(&bytes).unwrap();
    assert_eq!(first_text_index(&reloaded), Some(18));
    assert_eq!(reloaded.tables().len(), 1);
    let styles = reloaded.styles().unwrap();
    assert_eq!(
        styles.font("Normal"),
        Some((Some("Arial".to_string()), Some(9.0)))
    );
}

#[test]
fn test_latest_year_tie_goes_to_first_column() {
    let mut doc = Document::new().unwrap();
    let table = doc.add_table(&[
        &["", "", "Three months 2024", "Six months 2024", "2023"],
        &["Revenue", "3", "10", "20", "30"],
    ]);
    assert_eq!(current_period_column(doc.tree(), table, 5), Some(2));
}

#[test]
fn test_title_parsing() {
    let parts = split_title("Acme Corp (Formerly Beta Ltd.)").unwrap();
    assert_eq!(parts.name, "Acme Corp ");
    assert_eq!(parts.marker, "(Formerly");
    assert_eq!(parts.former_name, " Beta Ltd.");
    assert_eq!(parts.close, ")");

    assert!(split_title("Acme Corp (formerly Beta Ltd.) Annual").is_none());
    assert!(split_title("Acme Corp").is_none());
}

#[test]
fn test_document_without_tables() {
    let mut doc = raw_report(18);
    let table = doc.tables()[0];
    doc.remove(table.id());

    let report = normalize(&mut doc, &StyleConfig::house());
    assert_eq!(report.anomalies, vec![Anomaly::NoTables]);
    assert!(report.current_period_columns.is_empty());
}

struct CountingPass;

impl FormatPass for CountingPass {
    fn name(&self) -> &str {
        "counting"
    }

    fn apply(&self, doc: &mut Document, _config: &StyleConfig, report: &mut FormatReport) {
        report.cover_lines_formatted += doc.paragraphs().len();
    }
}

#[test]
fn test_custom_pass_runs_after_defaults() {
    let formatter = Formatter::with_defaults().with_pass(CountingPass);
    assert_eq!(
        formatter.pass_names(),
        ["global-font", "cover-page", "table", "counting"]
    );

    let mut doc = raw_report(18);
    let report = formatter.run(&mut doc, &StyleConfig::house());
    assert_eq!(report.cover_lines_formatted, 4 + doc.paragraphs().len());
}
