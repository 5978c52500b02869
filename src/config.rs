//! House style configuration.
//!
//! Every typographic and geometric constant the formatter and the validator
//! use lives here. Changing the house style means editing [`StyleConfig::house`].

use crate::model::Length;
use serde::Serialize;

/// Typography, cover-page layout and table geometry of the house style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleConfig {
    /// House font family
    pub font_name: String,

    /// House font size in points
    pub font_size: f32,

    /// 1-indexed paragraph row where the cover text must start
    pub cover_start_row: usize,

    /// Title line font size in points
    pub title_font_size: f32,

    /// Number of leading paragraphs scanned for cover lines
    pub cover_scan_rows: usize,

    /// Minimum table row height
    pub row_height: Length,

    /// Target widths of the first table columns
    pub column_widths: Vec<Length>,

    /// Hanging indent of first-column cells
    pub hanging_indent: Length,

    /// Left and right default cell margin, in twips
    pub cell_margin_side: i64,

    /// Top and bottom default cell margin, in twips
    pub cell_margin_vertical: i64,

    /// Number of leading table rows scanned for period headers
    pub header_scan_rows: usize,

    /// Leading columns excluded from current-period bolding
    pub bold_skip_columns: usize,

    /// Accepted deviation of a cell width, in centimeters
    pub width_tolerance_cm: f64,

    /// Accepted deviation of an indent, in centimeters
    pub indent_tolerance_cm: f64,
}

impl StyleConfig {
    /// The house style.
    pub fn house() -> Self {
        Self {
            font_name: "Arial".to_string(),
            font_size: 9.0,
            cover_start_row: 19,
            title_font_size: 14.0,
            cover_scan_rows: 30,
            row_height: Length::from_cm(0.37),
            column_widths: vec![
                Length::from_cm(11.99),
                Length::from_cm(1.20),
                Length::from_cm(2.30),
                Length::from_cm(2.30),
            ],
            hanging_indent: Length::from_cm(0.63),
            cell_margin_side: 28,
            cell_margin_vertical: 0,
            header_scan_rows: 5,
            bold_skip_columns: 2,
            width_tolerance_cm: 0.1,
            indent_tolerance_cm: 0.05,
        }
    }

    /// Zero-based index of the cover start row.
    pub fn cover_start_index(&self) -> usize {
        self.cover_start_row.saturating_sub(1)
    }

    /// Short description used in messages, e.g. "Arial 9pt".
    pub fn font_label(&self) -> String {
        format!("{} {}pt", self.font_name, self.font_size)
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::house()
    }
}
