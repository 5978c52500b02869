//! Integration tests for the validator.

use finstyle::validate::validate_with;
use finstyle::{normalize, validate_output, Anomaly, Document, Issue, StyleConfig, Validator};
use std::path::Path;

fn raw_report() -> Document {
    let mut doc = Document::new().unwrap();
    for _ in 0..4 {
        doc.add_paragraph("");
    }
    doc.add_paragraph("Acme Mining Corp (formerly Northern Gold Ltd)");
    doc.add_paragraph("Condensed Consolidated Financial Statements");
    doc.add_paragraph("June 30, 2024");
    doc.add_paragraph("(Expressed in thousands of US dollars)");
    doc.add_paragraph("Balance sheet");
    doc.add_table(&[
        &["", "Note", "2024", "2023"],
        &["Cash", "4", "1,200", "900"],
        &["Inventory", "5", "310", "250"],
    ]);
    doc
}

fn messages(issues: &[Issue]) -> Vec<&str> {
    issues.iter().map(Issue::message).collect()
}

#[test]
fn test_clean_normalize_validates_clean() {
    let config = StyleConfig::house();
    let mut doc = raw_report();
    let report = normalize(&mut doc, &config);
    assert!(report.is_clean(), "{:?}", report.anomalies);

    let issues = Validator::new(&config).validate(&doc);
    assert!(issues.is_empty(), "{:?}", messages(&issues));
}

#[test]
fn test_clean_result_survives_round_trip() {
    let mut doc = raw_report();
    normalize(&mut doc, &StyleConfig::house());
    let bytes = doc.to_bytes().unwrap();

    assert!(validate_output(bytes.as_slice()).is_empty());
}

#[test]
fn test_raw_report_fails_in_check_order() {
    let doc = raw_report();
    let issues = validate_output(&doc);
    let messages = messages(&issues);

    assert_eq!(messages[0], "[FAIL] Cover page text starts on Row 5 (Expected: 19).");
    assert!(messages[1].starts_with("[FAIL] LINE 1 (Title): Style mismatch."));
    assert_eq!(messages[2], "[FAIL] Missing blank row after Title.");

    let first_table = messages.iter().position(|m| m.starts_with("[FAIL] Table 1:"));
    let first_font = messages.iter().position(|m| m.contains("Font Issue"));
    assert!(first_table.unwrap() < first_font.unwrap());
    assert_eq!(*messages.last().unwrap(), "[FAIL] Body font is not Arial 9pt.");
}

#[test]
fn test_validation_does_not_modify_document() {
    let doc = raw_report();
    let before = doc.tree().to_bytes().unwrap();
    let _ = validate_output(&doc);
    assert_eq!(doc.tree().to_bytes().unwrap(), before);
}

#[test]
fn test_empty_path_is_reported_as_misuse() {
    let issues = validate_output(Path::new(""));
    assert_eq!(
        messages(&issues),
        ["The input must be either a path to a .docx file or a loaded document. Got an empty path."]
    );
}

#[test]
fn test_unreadable_input_yields_single_issue() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.docx");
    std::fs::write(&path, b"this is not a zip archive").unwrap();

    let issues = validate_output(path.as_path());
    assert_eq!(issues.len(), 1);
    assert!(issues[0].message().starts_with("Could not load document. "));

    let missing = validate_output(dir.path().join("missing.docx").as_path());
    assert_eq!(missing.len(), 1);
    assert!(missing[0].message().contains("not found"));
}

#[test]
fn test_missing_cover_lines() {
    let mut doc = Document::new().unwrap();
    for _ in 0..18 {
        doc.add_paragraph("");
    }
    doc.add_paragraph("Acme (formerly Beta)");

    let issues = validate_output(&doc);
    let messages = messages(&issues);
    assert!(messages.contains(&"[FAIL] LINE 2 missing."));
    assert!(messages.contains(&"[FAIL] LINE 3 missing."));
    assert!(messages.contains(&"[FAIL] LINE 4 missing."));
    assert!(messages.contains(&"No tables found in document."));
}

#[test]
fn test_halted_placement_is_reported_by_validator() {
    let mut doc = Document::new().unwrap();
    for _ in 0..25 {
        doc.add_paragraph("");
    }
    doc.add_paragraph("Acme Mining Corp (formerly Northern Gold Ltd)");
    doc.add_paragraph("Financial Statements");
    doc.add_paragraph("June 30, 2024");
    doc.add_paragraph("(Expressed in thousands of US dollars)");
    doc.add_table(&[&["", "Note", "2024", "2023"], &["Cash", "4", "1,200", "900"]]);

    let page_break_row = doc.paragraphs()[2];
    let tree = doc.tree_mut();
    let run = page_break_row.add_run(tree, "");
    let page_break = tree.create_element_with("w:br", &[("w:type", "page")]);
    tree.append_child(run.id(), page_break);

    let config = StyleConfig::house();
    let report = normalize(&mut doc, &config);
    assert_eq!(
        report.anomalies,
        vec![Anomaly::PlacementHalted {
            row: 3,
            removed: 2,
            requested: 7
        }]
    );

    let issues = Validator::new(&config).validate(&doc);
    assert_eq!(
        messages(&issues),
        ["[FAIL] Cover page text starts on Row 24 (Expected: 19)."]
    );
}

#[test]
fn test_custom_style_changes_expectations() {
    let mut config = StyleConfig::house();
    config.cover_start_row = 5;

    let doc = raw_report();
    let issues = validate_with(&doc, &config);
    assert!(!messages(&issues)
        .iter()
        .any(|m| m.starts_with("[FAIL] Cover page text starts")));
}
