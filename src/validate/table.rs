//! Table geometry checks.

use super::Issue;
use crate::config::StyleConfig;
use crate::model::{Document, Length, Table, XmlTree};

pub(super) fn check(doc: &Document, config: &StyleConfig, issues: &mut Vec<Issue>) {
    let tables = doc.tables();
    if tables.is_empty() {
        issues.push(Issue::new("No tables found in document."));
        return;
    }

    let tree = doc.tree();
    for (index, table) in tables.into_iter().enumerate() {
        let number = index + 1;
        log::debug!("Checking Table {}...", number);
        check_row_heights(tree, table, number, config, issues);
        check_cell_margins(tree, table, number, config, issues);
        check_column_widths(tree, table, number, config, issues);
        check_hanging_indent(tree, table, number, config, issues);
    }
}

fn check_row_heights(
    tree: &XmlTree,
    table: Table,
    number: usize,
    config: &StyleConfig,
    issues: &mut Vec<Issue>,
) {
    let all_tall_enough = table
        .rows(tree)
        .iter()
        .all(|row| row.height(tree).is_some_and(|h| h >= config.row_height));
    if all_tall_enough {
        log::debug!("[PASS] Row heights are at least {}.", config.row_height);
    } else {
        issues.push(Issue::new(format!(
            "[FAIL] Table {}: One or more rows have incorrect height.",
            number
        )));
    }
}

fn check_cell_margins(
    tree: &XmlTree,
    table: Table,
    number: usize,
    config: &StyleConfig,
    issues: &mut Vec<Issue>,
) {
    match table.cell_margins(tree) {
        Some(margins)
            if margins.left == Some(config.cell_margin_side)
                && margins.top == Some(config.cell_margin_vertical) =>
        {
            log::debug!("[PASS] Cell margins are set correctly.");
        }
        Some(_) => issues.push(Issue::new(format!(
            "[FAIL] Table {}: Cell margins in XML do not match expected values.",
            number
        ))),
        None => issues.push(Issue::new(format!(
            "[FAIL] Table {}: No custom cell margins found in XML.",
            number
        ))),
    }
}

/// Widths are read from the first row only.
fn check_column_widths(
    tree: &XmlTree,
    table: Table,
    number: usize,
    config: &StyleConfig,
    issues: &mut Vec<Issue>,
) {
    let Some(first_row) = table.rows(tree).first().copied() else {
        return;
    };
    let cells = first_row.cells(tree);

    let mut widths_pass = true;
    for (column, (cell, expected)) in cells.iter().zip(&config.column_widths).enumerate() {
        let width = cell.width(tree);
        let matches = width
            .is_some_and(|w| (w.cm() - expected.cm()).abs() <= config.width_tolerance_cm);
        if !matches {
            widths_pass = false;
            let found = width.map_or_else(|| "None".to_string(), |w| w.to_string());
            issues.push(Issue::new(format!(
                "[FAIL] Table {}: Col {} width mismatch. Found {}, Expected {}.",
                number, column, found, expected
            )));
        }
    }
    if widths_pass {
        log::debug!("[PASS] Column widths match the house grid.");
    }
}

/// Only the first data row with text in its first column is inspected.
fn check_hanging_indent(
    tree: &XmlTree,
    table: Table,
    number: usize,
    config: &StyleConfig,
    issues: &mut Vec<Issue>,
) {
    let sample = table.rows(tree).into_iter().enumerate().skip(1).find_map(|(index, row)| {
        let cell = row.cells(tree).first().copied()?;
        if cell.is_blank(tree) {
            return None;
        }
        cell.paragraphs(tree).first().map(|&p| (index, p))
    });

    let Some((index, paragraph)) = sample else {
        log::debug!("[SKIP] Could not validate hanging indent (No data rows found in Col 1).");
        return;
    };

    let left = paragraph.left_indent(tree);
    let first_line = paragraph.first_line_indent(tree);
    let tolerance = config.indent_tolerance_cm;
    let hanging = config.hanging_indent;
    if left.unwrap_or(Length::ZERO).approx_eq(hanging, tolerance)
        && first_line.unwrap_or(Length::ZERO).approx_eq(-hanging, tolerance)
    {
        log::debug!("[PASS] Hanging indent detected in Row {}, Col 1.", index + 1);
    } else {
        let show =
            |value: Option<Length>| value.map_or_else(|| "None".to_string(), |v| v.to_string());
        issues.push(Issue::new(format!(
            "[FAIL] Table {}: Hanging indent mismatch in Row {}. Found Left={}, FirstLine={}. Expected Left={}, FirstLine={}.",
            number,
            index + 1,
            show(left),
            show(first_line),
            hanging,
            -hanging
        )));
    }
}
