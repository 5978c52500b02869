//! Cover page checks.
//!
//! Cover lines are located positionally: the title is the first paragraph
//! with text, and each following line is the next paragraph with text after
//! the previous line found.

use super::Issue;
use crate::config::StyleConfig;
use crate::format::text::{is_all_upper, is_parenthetical_sentence, title_case};
use crate::format::LineRole;
use crate::model::{Alignment, Block, Document, Paragraph};

enum BlankRows {
    Missing,
    One,
    Extra,
}

fn blank_rows_after(doc: &Document, paragraph: Paragraph) -> BlankRows {
    let tree = doc.tree();
    match doc.next_block(paragraph.id()) {
        Some(Block::Paragraph(next)) if next.is_blank(tree) => match doc.next_block(next.id()) {
            Some(Block::Paragraph(extra)) if extra.is_removable_blank(tree) => BlankRows::Extra,
            _ => BlankRows::One,
        },
        _ => BlankRows::Missing,
    }
}

fn check_blank_after(doc: &Document, paragraph: Paragraph, label: &str, issues: &mut Vec<Issue>) {
    match blank_rows_after(doc, paragraph) {
        BlankRows::One => log::debug!("[PASS] Blank row exists after {}.", label),
        BlankRows::Missing => {
            issues.push(Issue::new(format!("[FAIL] Missing blank row after {}.", label)))
        }
        BlankRows::Extra => issues.push(Issue::new(format!(
            "[FAIL] More than one blank row after {}.",
            label
        ))),
    }
}

fn any_bold(doc: &Document, paragraph: Paragraph) -> bool {
    let tree = doc.tree();
    paragraph.runs(tree).iter().any(|run| run.is_bold(tree))
}

/// Check the cover lines. Returns the title's paragraph index, or `None` when
/// the document has no text at all and checking cannot continue.
pub(super) fn check(
    doc: &Document,
    config: &StyleConfig,
    issues: &mut Vec<Issue>,
) -> Option<usize> {
    let tree = doc.tree();
    let paragraphs = doc.paragraphs();
    let texts: Vec<String> = paragraphs
        .iter()
        .map(|p| p.text(tree).trim().to_string())
        .collect();
    let next_line = |start: usize| (start..texts.len()).find(|&i| !texts[i].is_empty());

    let title_index = next_line(0);
    if title_index == Some(config.cover_start_index()) {
        log::debug!("[PASS] Cover page text starts on Row {}.", config.cover_start_row);
    } else {
        issues.push(Issue::new(format!(
            "[FAIL] Cover page text starts on Row {} (Expected: {}).",
            title_index.map_or(0, |i| i + 1),
            config.cover_start_row
        )));
    }

    let Some(title_index) = title_index else {
        issues.push(Issue::new("CRITICAL: No text found on cover page."));
        return None;
    };

    // Title
    let title = paragraphs[title_index];
    let runs = title.runs(tree);
    let is_bold = runs
        .iter()
        .filter(|run| !run.text(tree).trim().is_empty())
        .all(|run| run.is_bold(tree));
    let is_title_size = runs
        .iter()
        .any(|run| run.font_size(tree) == Some(config.title_font_size));
    let is_centered = title.alignment(tree) == Some(Alignment::Center);
    if is_bold && is_title_size && is_centered {
        log::debug!("[PASS] LINE 1 (Title): Correctly Bold, Size 14, and Centered.");
    } else {
        issues.push(Issue::new(format!(
            "[FAIL] LINE 1 (Title): Style mismatch. Bold: {}, Size {}: {}, Centered: {}",
            is_bold, config.title_font_size, is_title_size, is_centered
        )));
    }
    check_blank_after(doc, title, "Title", issues);

    let mut cursor = title_index;

    // Financial statements
    match next_line(cursor + 1) {
        Some(index) => {
            let text = &texts[index];
            if LineRole::Statements.accepts(text) {
                let is_bold = any_bold(doc, paragraphs[index]);
                let is_title_case = *text == title_case(text);
                if is_bold && is_title_case {
                    log::debug!("[PASS] LINE 2: '{}' is Bold and Title Case.", text);
                } else {
                    issues.push(Issue::new(format!(
                        "[FAIL] LINE 2: '{}' style mismatch. Bold: {}, Title Case: {}",
                        text, is_bold, is_title_case
                    )));
                }
            } else {
                issues.push(Issue::new(format!(
                    "[FAIL] LINE 2: Expected 'Financial Statements', found '{}'.",
                    text
                )));
            }
            check_blank_after(doc, paragraphs[index], "Financial Statements", issues);
            cursor = index;
        }
        None => issues.push(Issue::new("[FAIL] LINE 2 missing.")),
    }

    // Period
    match next_line(cursor + 1) {
        Some(index) => {
            let text = &texts[index];
            let is_bold = any_bold(doc, paragraphs[index]);
            let not_all_caps = !is_all_upper(text);
            if is_bold && not_all_caps {
                log::debug!("[PASS] LINE 3: '{}' is Bold.", text);
            } else {
                issues.push(Issue::new(format!(
                    "[FAIL] LINE 3: '{}' style mismatch. Bold: {}, Caps Check: {}",
                    text, is_bold, not_all_caps
                )));
            }
            check_blank_after(doc, paragraphs[index], "Period Reference", issues);
            cursor = index;
        }
        None => issues.push(Issue::new("[FAIL] LINE 3 missing.")),
    }

    // Unaudited
    match next_line(cursor + 1) {
        Some(index) => {
            let text = &texts[index];
            if LineRole::Unaudited.accepts(text) {
                let is_bold = any_bold(doc, paragraphs[index]);
                if !is_bold && is_parenthetical_sentence(text) {
                    log::debug!("[PASS] LINE 4: '{}' is Un-bolded and Sentence Case.", text);
                } else {
                    issues.push(Issue::new(format!(
                        "[FAIL] LINE 4: '{}' style mismatch. Bold: {} (Should be False).",
                        text, is_bold
                    )));
                }
            } else {
                issues.push(Issue::new(format!(
                    "[FAIL] LINE 4: Expected 'Unaudited...' or 'Expressed...', found '{}'.",
                    text
                )));
            }
        }
        None => issues.push(Issue::new("[FAIL] LINE 4 missing.")),
    }

    Some(title_index)
}
