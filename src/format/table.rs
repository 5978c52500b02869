//! Table geometry, typography and current-period bolding.

use super::{Anomaly, FormatPass, FormatReport};
use crate::config::StyleConfig;
use crate::model::{CellMargins, Document, HeightRule, Table, XmlTree};
use regex::Regex;
use std::sync::LazyLock;

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(20\d{2})\b").expect("valid year regex"));

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

/// Applies the house grid, margins, row heights, fonts and hanging indents to
/// every body table, then bolds the current-period column.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableNormalizer;

impl FormatPass for TableNormalizer {
    fn name(&self) -> &str {
        "table"
    }

    fn apply(&self, doc: &mut Document, config: &StyleConfig, report: &mut FormatReport) {
        let tables = doc.tables();
        if tables.is_empty() {
            report.record(Anomaly::NoTables);
            return;
        }

        let tree = doc.tree_mut();
        for (index, table) in tables.into_iter().enumerate() {
            apply_structure(tree, table, config);

            let column = current_period_column(tree, table, config.header_scan_rows);
            match column {
                Some(column) => apply_period_bolding(tree, table, column, config),
                None => report.record(Anomaly::NoCurrentPeriod { table: index + 1 }),
            }
            report.current_period_columns.push(column);
            report.tables_formatted += 1;
        }
        log::debug!("Formatted {} tables", report.tables_formatted);
    }
}

fn apply_structure(tree: &mut XmlTree, table: Table, config: &StyleConfig) {
    table.set_grid_columns(tree, &config.column_widths);
    table.set_cell_margins(
        tree,
        CellMargins::symmetric(config.cell_margin_side, config.cell_margin_vertical),
    );

    for row in table.rows(tree) {
        row.set_height(tree, config.row_height, HeightRule::AtLeast);

        for (index, cell) in row.cells(tree).into_iter().enumerate() {
            if let Some(&width) = config.column_widths.get(index) {
                cell.set_width(tree, width);
            }

            let hanging = index == 0 && !cell.is_blank(tree);
            for paragraph in cell.paragraphs(tree) {
                for run in paragraph.runs(tree) {
                    run.set_font(tree, &config.font_name, config.font_size);
                }
                if hanging {
                    paragraph.set_left_indent(tree, config.hanging_indent);
                    paragraph.set_first_line_indent(tree, -config.hanging_indent);
                }
            }
        }
    }
}

/// Find the column holding the most recent period in the header rows.
///
/// Each cell contributes the first `20xx` year in its text; a column keeps
/// the year from the last row that has one. The column with the latest year
/// wins, and on a tie the column that was seen first.
pub fn current_period_column(tree: &XmlTree, table: Table, scan_rows: usize) -> Option<usize> {
    let mut years: Vec<(usize, u32)> = Vec::new();

    for row in table.rows(tree).into_iter().take(scan_rows) {
        for (column, cell) in row.cells(tree).into_iter().enumerate() {
            let text = cell.text(tree);
            let Some(year) = YEAR
                .captures(text.trim())
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok())
            else {
                continue;
            };
            match years.iter_mut().find(|(c, _)| *c == column) {
                Some(entry) => entry.1 = year,
                None => years.push((column, year)),
            }
        }
    }

    let mut best: Option<(usize, u32)> = None;
    for (column, year) in years {
        if best.map_or(true, |(_, latest)| year > latest) {
            best = Some((column, year));
        }
    }
    best.map(|(column, _)| column)
}

fn has_figures(text: &str) -> bool {
    text.chars()
        .any(|ch| ch.is_ascii_digit() || CURRENCY_SYMBOLS.contains(&ch))
}

/// Bold figures in the current column and un-bold them in the other value
/// columns.
fn apply_period_bolding(tree: &mut XmlTree, table: Table, current: usize, config: &StyleConfig) {
    for row in table.rows(tree) {
        let cells = row.cells(tree);
        if current >= cells.len() {
            continue;
        }

        for (column, cell) in cells.into_iter().enumerate().skip(config.bold_skip_columns) {
            if !has_figures(cell.text(tree).trim()) {
                continue;
            }
            let bold = column == current;
            for paragraph in cell.paragraphs(tree) {
                for run in paragraph.runs(tree) {
                    run.set_bold(tree, bold);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Length;

    fn run_pass(doc: &mut Document) -> FormatReport {
        let mut report = FormatReport::new();
        TableNormalizer.apply(doc, &StyleConfig::house(), &mut report);
        report
    }

    fn cell_bold(doc: &Document, table: Table, row: usize, column: usize) -> Option<bool> {
        let tree = doc.tree();
        let cell = table.rows(tree)[row].cells(tree)[column];
        cell.paragraphs(tree)[0].runs(tree)[0].bold(tree)
    }

    #[test]
    fn test_year_tie_break() {
        let mut doc = Document::new().unwrap();
        let table = doc.add_table(&[&["", "Note", "2023", "2024"], &["Cash", "4", "10", "12"]]);
        assert_eq!(current_period_column(doc.tree(), table, 5), Some(3));

        let table = doc.add_table(&[&["", "", "2024", "2024"]]);
        assert_eq!(current_period_column(doc.tree(), table, 5), Some(2));

        let table = doc.add_table(&[&["Assets", "Note", "Current", "Prior"]]);
        assert_eq!(current_period_column(doc.tree(), table, 5), None);
    }

    #[test]
    fn test_later_rows_overwrite_years() {
        let mut doc = Document::new().unwrap();
        let table = doc.add_table(&[
            &["", "", "2025", "2024"],
            &["", "", "March 2022", "December 2023"],
        ]);
        assert_eq!(current_period_column(doc.tree(), table, 5), Some(3));
    }

    #[test]
    fn test_years_beyond_scan_window_ignored() {
        let mut doc = Document::new().unwrap();
        let table = doc.add_table(&[
            &["", "", "2023", "2022"],
            &["a", "", "1", "2"],
            &["b", "", "1", "2"],
            &["c", "", "1", "2"],
            &["d", "", "1", "2"],
            &["e", "", "1", "2099"],
        ]);
        assert_eq!(current_period_column(doc.tree(), table, 5), Some(2));
    }

    #[test]
    fn test_geometry_and_fonts() {
        let mut doc = Document::new().unwrap();
        let table = doc.add_table(&[&["", "Note", "2024", "2023"], &["Cash", "4", "$10", "$12"]]);
        let report = run_pass(&mut doc);
        assert!(report.is_clean());
        assert_eq!(report.current_period_columns, vec![Some(2)]);

        let tree = doc.tree();
        assert_eq!(
            table.grid_columns(tree),
            vec![
                Length::from_twips(6797),
                Length::from_twips(680),
                Length::from_twips(1304),
                Length::from_twips(1304)
            ]
        );
        let margins = table.cell_margins(tree).unwrap();
        assert_eq!(margins.left, Some(28));
        assert_eq!(margins.top, Some(0));

        for row in table.rows(tree) {
            assert_eq!(row.height_rule(tree), Some(HeightRule::AtLeast));
            assert!(row.height(tree).unwrap() >= Length::from_cm(0.37));
            let first = row.cells(tree)[0];
            assert!(first.width(tree).unwrap().approx_eq(Length::from_cm(11.99), 0.01));
        }

        let cash = table.rows(tree)[1].cells(tree)[0].paragraphs(tree)[0];
        assert_eq!(cash.left_indent(tree), Some(Length::from_twips(357)));
        assert_eq!(cash.first_line_indent(tree), Some(-Length::from_twips(357)));
        let run = cash.runs(tree)[0];
        assert_eq!(run.font_name(tree), Some("Arial".to_string()));
        assert_eq!(run.font_size(tree), Some(9.0));

        let header = table.rows(tree)[0].cells(tree)[0].paragraphs(tree)[0];
        assert_eq!(header.left_indent(tree), None);
    }

    #[test]
    fn test_current_column_bolded_prior_unbolded() {
        let mut doc = Document::new().unwrap();
        let table = doc.add_table(&[
            &["", "Note", "2023", "2024"],
            &["Cash", "4", "€ 10", "€ 12"],
            &["Total", "", "-", "n/a"],
        ]);
        run_pass(&mut doc);

        assert_eq!(cell_bold(&doc, table, 0, 3), Some(true));
        assert_eq!(cell_bold(&doc, table, 0, 2), Some(false));
        assert_eq!(cell_bold(&doc, table, 1, 3), Some(true));
        assert_eq!(cell_bold(&doc, table, 1, 2), Some(false));
        assert_eq!(cell_bold(&doc, table, 1, 1), None);
        assert_eq!(cell_bold(&doc, table, 2, 3), None);
    }

    #[test]
    fn test_short_rows_skipped() {
        let mut doc = Document::new().unwrap();
        let table = doc.add_table(&[&["", "", "2023", "2024"], &["Subtotal", "", "5"]]);
        run_pass(&mut doc);
        assert_eq!(cell_bold(&doc, table, 1, 2), None);
    }

    #[test]
    fn test_anomalies() {
        let mut doc = Document::new().unwrap();
        let report = run_pass(&mut doc);
        assert_eq!(report.anomalies, vec![Anomaly::NoTables]);

        doc.add_table(&[&["Assets", "", "Current", "Prior"], &["Cash", "", "1", "2"]]);
        let report = run_pass(&mut doc);
        assert_eq!(report.anomalies, vec![Anomaly::NoCurrentPeriod { table: 1 }]);
        assert_eq!(report.current_period_columns, vec![None]);
    }

    #[test]
    fn test_has_figures() {
        assert!(has_figures("1,234"));
        assert!(has_figures("$ -"));
        assert!(has_figures("¥"));
        assert!(!has_figures("-"));
        assert!(!has_figures("nil"));
    }
}
