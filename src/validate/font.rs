//! House font checks for body text and table cells.

use super::{preview, Issue};
use crate::config::StyleConfig;
use crate::model::{Document, Paragraph, Run, XmlTree};

const INHERITED: &str = "None (Inherited)";

/// The first run with visible text that does not use the house font.
fn first_mismatch(tree: &XmlTree, paragraph: Paragraph, config: &StyleConfig) -> Option<Run> {
    paragraph.runs(tree).into_iter().find(|run| {
        if run.text(tree).trim().is_empty() {
            return false;
        }
        let name_bad = run.font_name(tree).as_deref() != Some(config.font_name.as_str());
        let size_bad = run
            .font_size(tree)
            .is_some_and(|size| size != config.font_size);
        name_bad || size_bad
    })
}

fn describe(tree: &XmlTree, run: Run) -> (String, String) {
    let name = run.font_name(tree).unwrap_or_else(|| INHERITED.to_string());
    let size = run
        .font_size(tree)
        .map_or_else(|| INHERITED.to_string(), |size| size.to_string());
    (name, size)
}

/// At most one issue per body paragraph and per table cell, then a summary
/// issue when any was found. The title paragraph is skipped.
pub(super) fn check(
    doc: &Document,
    config: &StyleConfig,
    title_index: usize,
    issues: &mut Vec<Issue>,
) {
    let tree = doc.tree();
    let mut found = false;

    for (index, paragraph) in doc.paragraphs().into_iter().enumerate() {
        if index == title_index {
            continue;
        }
        let text = paragraph.text(tree);
        if text.trim().is_empty() {
            continue;
        }
        if let Some(run) = first_mismatch(tree, paragraph, config) {
            found = true;
            let (name, size) = describe(tree, run);
            issues.push(Issue::new(format!(
                "[FAIL] Font Issue in Para {} ('{}'): Name='{}', Size={}. Expected {}.",
                index + 1,
                preview(&text, 30),
                name,
                size,
                config.font_label()
            )));
        }
    }

    for (t, table) in doc.tables().into_iter().enumerate() {
        for (r, row) in table.rows(tree).into_iter().enumerate() {
            for (c, cell) in row.cells(tree).into_iter().enumerate() {
                let mismatch = cell.paragraphs(tree).into_iter().find_map(|paragraph| {
                    let text = paragraph.text(tree);
                    if text.trim().is_empty() {
                        return None;
                    }
                    first_mismatch(tree, paragraph, config).map(|run| (text, run))
                });
                if let Some((text, run)) = mismatch {
                    found = true;
                    let (name, size) = describe(tree, run);
                    issues.push(Issue::new(format!(
                        "[FAIL] Table Font Issue (Table {}, Row {}, Col {}): '{}' -> Name='{}', Size={}.",
                        t + 1,
                        r + 1,
                        c + 1,
                        preview(&text, 20),
                        name,
                        size
                    )));
                }
            }
        }
    }

    if found {
        issues.push(Issue::new(format!(
            "[FAIL] Body font is not {}.",
            config.font_label()
        )));
    } else {
        log::debug!("[PASS] Body font appears to be {}.", config.font_label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_check(doc: &Document, title_index: usize) -> Vec<String> {
        let mut issues = Vec::new();
        check(doc, &StyleConfig::house(), title_index, &mut issues);
        issues.iter().map(|i| i.message().to_string()).collect()
    }

    #[test]
    fn test_house_font_passes() {
        let mut doc = Document::new().unwrap();
        let title = doc.add_paragraph("ACME (formerly Beta)");
        let body = doc.add_paragraph("Notes");
        let tree = doc.tree_mut();
        title.runs(tree)[0].set_font(tree, "Times New Roman", 14.0);
        body.runs(tree)[0].set_font(tree, "Arial", 9.0);

        assert!(run_check(&doc, 0).is_empty());
    }

    #[test]
    fn test_one_issue_per_paragraph_and_summary() {
        let mut doc = Document::new().unwrap();
        doc.add_paragraph("Title");
        let body = doc.add_paragraph("Consolidated statement of financial position");
        let tree = doc.tree_mut();
        body.add_run(tree, " more");

        let issues = run_check(&doc, 0);
        assert_eq!(
            issues,
            vec![
                "[FAIL] Font Issue in Para 2 ('Consolidated statement of fina...'): Name='None (Inherited)', Size=None (Inherited). Expected Arial 9pt.",
                "[FAIL] Body font is not Arial 9pt.",
            ]
        );
    }

    #[test]
    fn test_size_checked_only_when_set() {
        let mut doc = Document::new().unwrap();
        doc.add_paragraph("Title");
        let body = doc.add_paragraph("Notes");
        let tree = doc.tree_mut();
        body.runs(tree)[0].set_font_name(tree, "Arial");
        assert!(run_check(&doc, 0).is_empty());

        let tree = doc.tree_mut();
        body.runs(tree)[0].set_font_size(tree, 10.0);
        let issues = run_check(&doc, 0);
        assert!(issues[0].contains("Name='Arial', Size=10."));
    }

    #[test]
    fn test_one_issue_per_cell() {
        let mut doc = Document::new().unwrap();
        doc.add_paragraph("Title");
        let table = doc.add_table(&[&["Cash and cash equivalents", "12"]]);
        let tree = doc.tree_mut();
        let cell = table.rows(tree)[0].cells(tree)[0];
        let second = crate::model::Paragraph::create(tree);
        tree.append_child(cell.id(), second.id());
        second.add_run(tree, "restricted");

        let issues = run_check(&doc, 0);
        assert_eq!(
            issues,
            vec![
                "[FAIL] Table Font Issue (Table 1, Row 1, Col 1): 'Cash and cash equiva...' -> Name='None (Inherited)', Size=None (Inherited).",
                "[FAIL] Table Font Issue (Table 1, Row 1, Col 2): '12' -> Name='None (Inherited)', Size=None (Inherited).",
                "[FAIL] Body font is not Arial 9pt.",
            ]
        );
    }
}
