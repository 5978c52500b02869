//! Cover page layout and typography.

use super::classify::{split_title, LineRole};
use super::text::{is_all_upper, is_parenthetical_sentence, sentence_case, title_case, TitleCaser};
use super::{Anomaly, FormatPass, FormatReport};
use crate::config::StyleConfig;
use crate::model::{Alignment, Block, Document, Paragraph, RunContent};

/// Moves the cover text to the start row and restyles the title, statements,
/// period and unaudited lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoverPageNormalizer;

impl FormatPass for CoverPageNormalizer {
    fn name(&self) -> &str {
        "cover-page"
    }

    fn apply(&self, doc: &mut Document, config: &StyleConfig, report: &mut FormatReport) {
        place_cover_text(doc, config, report);
        style_cover_lines(doc, config, report);
        check_cover_sequence(doc, report);
    }
}

// ==================== Vertical placement ====================

fn place_cover_text(doc: &mut Document, config: &StyleConfig, report: &mut FormatReport) {
    let paragraphs = doc.paragraphs();
    let first_text = paragraphs
        .iter()
        .position(|p| !p.is_blank(doc.tree()))
        .unwrap_or(paragraphs.len());
    let target = config.cover_start_index();

    if first_text < target {
        let missing = target - first_text;
        let anchor = paragraphs.first().map(|p| p.id());
        for _ in 0..missing {
            let blank = match anchor {
                Some(anchor) => doc.insert_paragraph_before(anchor),
                None => doc.append_paragraph(),
            };
            blank.set_mark_font(doc.tree_mut(), &config.font_name, config.font_size);
        }
        report.rows_inserted += missing;
        log::debug!("Inserted {} blank rows above the cover text", missing);
    } else if first_text > target {
        let requested = first_text - target;
        let mut removed = 0;
        while removed < requested {
            let Some(top) = doc.paragraphs().first().copied() else {
                break;
            };
            // Blank rows holding a page break or drawing also stop the removal.
            if !top.is_removable_blank(doc.tree()) {
                report.record(Anomaly::PlacementHalted {
                    row: removed + 1,
                    removed,
                    requested,
                });
                break;
            }
            doc.remove(top.id());
            removed += 1;
        }
        report.rows_removed += removed;
        log::debug!("Removed {} blank rows above the cover text", removed);
    }
}

// ==================== Line styling ====================

fn style_cover_lines(doc: &mut Document, config: &StyleConfig, report: &mut FormatReport) {
    let mut handled: Vec<LineRole> = Vec::with_capacity(LineRole::ALL.len());
    let mut cursor = doc.paragraphs().first().copied();
    let mut position = 0;

    while let Some(paragraph) = cursor {
        if position >= config.cover_scan_rows {
            break;
        }

        let text = paragraph.text(doc.tree());
        let role = LineRole::classify(text.trim()).filter(|role| !handled.contains(role));

        cursor = match role {
            Some(role) => {
                match role {
                    LineRole::Title => format_title(doc, paragraph, config, report),
                    LineRole::Statements => format_statements(doc, paragraph, config),
                    LineRole::Period => format_period(doc, paragraph, config, report),
                    LineRole::Unaudited => format_unaudited(doc, paragraph, config, report),
                }
                handled.push(role);
                report.cover_lines_formatted += 1;
                enforce_blank_after(doc, paragraph, config);

                // The row after a cover line is its blank separator.
                position += 1;
                doc.next_paragraph(paragraph)
                    .and_then(|blank| doc.next_paragraph(blank))
            }
            None => doc.next_paragraph(paragraph),
        };
        position += 1;
    }

    for role in LineRole::ALL {
        if !handled.contains(&role) {
            report.record(Anomaly::MissingRole { role });
        }
    }
}

fn format_title(
    doc: &mut Document,
    paragraph: Paragraph,
    config: &StyleConfig,
    report: &mut FormatReport,
) {
    let tree = doc.tree_mut();
    let text = paragraph.text(tree).trim().to_string();

    let pieces = match split_title(&text) {
        Some(parts) => vec![
            parts.name.to_uppercase(),
            parts.marker.to_lowercase(),
            title_case(parts.former_name),
            parts.close.to_string(),
        ],
        None => {
            report.record(Anomaly::TitleNotMatched { text: text.clone() });
            vec![text]
        }
    };

    paragraph.clear(tree);
    paragraph.set_alignment(tree, Some(Alignment::Center));
    for piece in pieces.iter().filter(|piece| !piece.is_empty()) {
        let run = paragraph.add_run(tree, piece);
        run.set_font(tree, &config.font_name, config.title_font_size);
        run.set_bold(tree, true);
    }
}

fn format_statements(doc: &mut Document, paragraph: Paragraph, config: &StyleConfig) {
    let tree = doc.tree_mut();
    paragraph.set_style_id(tree, None);
    paragraph.set_alignment(tree, Some(Alignment::Center));

    let mut caser = TitleCaser::new();
    for run in paragraph.runs(tree) {
        run.set_font(tree, &config.font_name, config.font_size);
        run.set_bold(tree, true);
        for content in run.content(tree) {
            match content {
                RunContent::Text(t) => {
                    let cased = caser.apply(&tree.text(t));
                    tree.set_text(t, &cased);
                    tree.set_attribute(t, "xml:space", "preserve");
                }
                RunContent::Break => caser.reset(),
            }
        }
    }
}

fn format_period(
    doc: &mut Document,
    paragraph: Paragraph,
    config: &StyleConfig,
    report: &mut FormatReport,
) {
    let tree = doc.tree_mut();
    paragraph.set_style_id(tree, None);
    paragraph.set_alignment(tree, Some(Alignment::Center));
    for run in paragraph.runs(tree) {
        run.set_font(tree, &config.font_name, config.font_size);
        run.set_bold(tree, true);
    }

    let text = paragraph.text(tree);
    if is_all_upper(text.trim()) {
        report.record(Anomaly::PeriodAllCaps {
            text: text.trim().to_string(),
        });
    }
}

fn format_unaudited(
    doc: &mut Document,
    paragraph: Paragraph,
    config: &StyleConfig,
    report: &mut FormatReport,
) {
    let tree = doc.tree_mut();
    let text = sentence_case(paragraph.text(tree).trim());

    paragraph.set_style_id(tree, None);
    paragraph.set_alignment(tree, Some(Alignment::Center));
    paragraph.clear(tree);
    let run = paragraph.add_run(tree, &text);
    run.set_font(tree, &config.font_name, config.font_size);
    run.set_bold(tree, false);

    if !is_parenthetical_sentence(&text) {
        report.record(Anomaly::UnauditedNotSentenceCase { text });
    }
}

// ==================== Blank rows ====================

/// Leave exactly one blank row between `paragraph` and the next block.
fn enforce_blank_after(doc: &mut Document, paragraph: Paragraph, config: &StyleConfig) {
    match doc.next_block(paragraph.id()) {
        None => {
            let blank = doc.append_paragraph();
            blank.set_mark_font(doc.tree_mut(), &config.font_name, config.font_size);
        }
        Some(Block::Paragraph(next)) if next.is_blank(doc.tree()) => {
            while let Some(Block::Paragraph(extra)) = doc.next_block(next.id()) {
                if !extra.is_removable_blank(doc.tree()) {
                    break;
                }
                doc.remove(extra.id());
            }
        }
        Some(_) => {
            let blank = doc.insert_paragraph_after(paragraph.id());
            blank.set_mark_font(doc.tree_mut(), &config.font_name, config.font_size);
        }
    }
}

/// Cover lines are read positionally: the first four lines with text must be
/// the title, statements, period and unaudited lines in that order.
fn check_cover_sequence(doc: &Document, report: &mut FormatReport) {
    let tree = doc.tree();
    let lines: Vec<String> = doc
        .paragraphs()
        .iter()
        .map(|p| p.text(tree).trim().to_string())
        .filter(|text| !text.is_empty())
        .take(LineRole::ALL.len())
        .collect();

    for (role, text) in LineRole::ALL.into_iter().zip(lines) {
        if !role.accepts(&text) {
            report.record(Anomaly::UnexpectedCoverLine {
                expected: role,
                text,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cover(leading_blanks: usize, lines: &[&str]) -> Document {
        let mut doc = Document::new().unwrap();
        for _ in 0..leading_blanks {
            doc.add_paragraph("");
        }
        for line in lines {
            doc.add_paragraph(line);
        }
        doc
    }

    fn run_pass(doc: &mut Document) -> FormatReport {
        let mut report = FormatReport::new();
        CoverPageNormalizer.apply(doc, &StyleConfig::house(), &mut report);
        report
    }

    fn first_text_index(doc: &Document) -> Option<usize> {
        doc.paragraphs().iter().position(|p| !p.is_blank(doc.tree()))
    }

    fn texts(doc: &Document) -> Vec<String> {
        doc.paragraphs().iter().map(|p| p.text(doc.tree())).collect()
    }

    const LINES: &[&str] = &[
        "Acme Corp (formerly OLD ACME INC)",
        "CONDENSED FINANCIAL STATEMENTS",
        "March 31, 2024",
        "(expressed in Canadian dollars)",
    ];

    #[test]
    fn test_inserts_rows_up_to_start_row() {
        let mut doc = cover(10, LINES);
        let report = run_pass(&mut doc);
        assert_eq!(first_text_index(&doc), Some(18));
        assert_eq!(report.rows_inserted, 8);

        let first = doc.paragraphs()[0];
        let ppr = doc.tree().first_child(first.id(), "w:pPr").unwrap();
        assert!(doc.tree().first_child(ppr, "w:rPr").is_some());
    }

    #[test]
    fn test_removes_rows_down_to_start_row() {
        let mut doc = cover(25, LINES);
        let report = run_pass(&mut doc);
        assert_eq!(first_text_index(&doc), Some(18));
        assert_eq!(report.rows_removed, 7);
        assert!(report.is_clean(), "{:?}", report.anomalies);
    }

    #[test]
    fn test_removal_stops_at_page_break() {
        let mut doc = cover(25, LINES);
        let top = doc.paragraphs()[2];
        let tree = doc.tree_mut();
        let run = top.add_run(tree, "");
        let br = tree.create_element_with("w:br", &[("w:type", "page")]);
        tree.append_child(run.id(), br);

        let report = run_pass(&mut doc);
        assert_eq!(report.rows_removed, 2);
        assert_eq!(
            report.anomalies[0],
            Anomaly::PlacementHalted {
                row: 3,
                removed: 2,
                requested: 7
            }
        );
        assert_eq!(first_text_index(&doc), Some(23));
    }

    #[test]
    fn test_title_rebuilt_in_four_runs() {
        let mut doc = cover(18, &["ACME CORP (formerly Old Acme Inc)"]);
        run_pass(&mut doc);

        let title = doc.paragraphs()[18];
        let tree = doc.tree();
        let runs = title.runs(tree);
        let pieces: Vec<_> = runs.iter().map(|r| r.text(tree)).collect();
        assert_eq!(pieces, ["ACME CORP ", "(formerly", " Old Acme Inc", ")"]);
        assert!(runs.iter().all(|r| r.is_bold(tree)));
        assert!(runs.iter().all(|r| r.font_size(tree) == Some(14.0)));
        assert_eq!(title.alignment(tree), Some(Alignment::Center));
    }

    #[test]
    fn test_title_case_transforms() {
        let mut doc = cover(18, LINES);
        run_pass(&mut doc);
        let texts = texts(&doc);
        assert_eq!(texts[18], "ACME CORP (formerly Old Acme Inc)");
        assert_eq!(texts[20], "Condensed Financial Statements");
        assert_eq!(texts[22], "March 31, 2024");
        assert_eq!(texts[24], "(Expressed in Canadian dollars)");
    }

    #[test]
    fn test_unmatched_title_kept_as_one_bold_run() {
        let mut doc = cover(18, &["Acme (formerly Beta) Holdings"]);
        let report = run_pass(&mut doc);

        let title = doc.paragraphs()[18];
        let runs = title.runs(doc.tree());
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text(doc.tree()), "Acme (formerly Beta) Holdings");
        assert!(runs[0].is_bold(doc.tree()));
        assert!(report.anomalies.contains(&Anomaly::TitleNotMatched {
            text: "Acme (formerly Beta) Holdings".to_string()
        }));
    }

    #[test]
    fn test_statements_casing_spans_runs() {
        let mut doc = cover(18, &["Acme (formerly Beta)"]);
        let statements = doc.add_paragraph("CONSOLIDATED FINAN");
        let tree = doc.tree_mut();
        statements.add_run(tree, "CIAL STATEMENTS");
        run_pass(&mut doc);

        let tree = doc.tree();
        assert_eq!(statements.text(tree), "Consolidated Financial Statements");
        assert!(statements.runs(tree).iter().all(|r| r.is_bold(tree)));
    }

    #[test]
    fn test_unaudited_is_unbolded_single_run() {
        let mut doc = cover(18, LINES);
        let unaudited = doc.paragraphs()[21];
        let tree = doc.tree_mut();
        unaudited.runs(tree)[0].set_bold(tree, true);

        run_pass(&mut doc);
        let unaudited = doc.paragraphs()[24];
        let runs = unaudited.runs(doc.tree());
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].bold(doc.tree()), Some(false));
    }

    #[test]
    fn test_blank_rows_between_lines() {
        let mut doc = cover(18, LINES);
        let report = run_pass(&mut doc);
        let texts = texts(&doc);
        assert_eq!(texts.len(), 26);
        for blank in [19, 21, 23, 25] {
            assert!(texts[blank].is_empty(), "row {} should be blank", blank + 1);
        }
        assert!(report.is_clean(), "{:?}", report.anomalies);
    }

    #[test]
    fn test_extra_blank_rows_collapse() {
        let mut doc = cover(18, &["Acme (formerly Beta)"]);
        for _ in 0..3 {
            doc.add_paragraph("");
        }
        doc.add_paragraph("Financial Statements");
        run_pass(&mut doc);
        assert_eq!(texts(&doc)[19..21], ["".to_string(), "Financial Statements".to_string()]);
    }

    #[test]
    fn test_extra_blank_rows_after_statements_collapse() {
        let mut doc = cover(
            18,
            &["Acme (formerly Beta)", "", "Prepared by management", "Financial Statements"],
        );
        for _ in 0..3 {
            doc.add_paragraph("");
        }
        doc.add_paragraph("March 31, 2024");

        let report = run_pass(&mut doc);
        let texts = texts(&doc);
        assert_eq!(
            texts[20..24],
            [
                "Prepared by management".to_string(),
                "Financial Statements".to_string(),
                String::new(),
                "March 31, 2024".to_string(),
            ]
        );
        assert!(!report.anomalies.contains(&Anomaly::MissingRole {
            role: LineRole::Statements
        }));
    }

    #[test]
    fn test_blank_inserted_before_table() {
        let mut doc = cover(18, &["Acme (formerly Beta)"]);
        doc.add_table(&[&["Cash", "", "2024", "2023"]]);
        run_pass(&mut doc);

        let blocks = doc.blocks();
        assert!(matches!(blocks[19], Block::Paragraph(p) if p.is_blank(doc.tree())));
        assert!(matches!(blocks[20], Block::Table(_)));
    }

    #[test]
    fn test_missing_roles_and_caps_period() {
        let mut doc = cover(18, &["Acme (formerly Beta)", "MARCH 31, 2024"]);
        let report = run_pass(&mut doc);
        assert!(report.anomalies.contains(&Anomaly::MissingRole {
            role: LineRole::Statements
        }));
        assert!(report.anomalies.contains(&Anomaly::MissingRole {
            role: LineRole::Unaudited
        }));
        assert!(report.anomalies.contains(&Anomaly::PeriodAllCaps {
            text: "MARCH 31, 2024".to_string()
        }));
    }

    #[test]
    fn test_out_of_order_lines_are_flagged() {
        let mut doc = cover(
            18,
            &["Acme (formerly Beta)", "March 31, 2024", "Financial Statements"],
        );
        let report = run_pass(&mut doc);
        assert!(report.anomalies.contains(&Anomaly::UnexpectedCoverLine {
            expected: LineRole::Statements,
            text: "March 31, 2024".to_string()
        }));
    }

    #[test]
    fn test_second_pass_is_stable() {
        let mut doc = cover(4, LINES);
        run_pass(&mut doc);
        let once = doc.tree().to_bytes().unwrap();

        let report = run_pass(&mut doc);
        assert_eq!(report.rows_inserted, 0);
        assert_eq!(report.rows_removed, 0);
        assert_eq!(doc.tree().to_bytes().unwrap(), once);
    }
}
