//! Table, row and cell handles.

use super::length::Length;
use super::paragraph::Paragraph;
use super::props::{
    CELL_MAR_ORDER, TBLPR_ORDER, TBL_ORDER, TCPR_ORDER, TC_ORDER, TRPR_ORDER, TR_ORDER,
};
use super::xml::{NodeId, XmlTree};
use serde::{Deserialize, Serialize};

/// How a row height is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightRule {
    Auto,
    AtLeast,
    Exact,
}

impl HeightRule {
    fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("exact") => HeightRule::Exact,
            Some("auto") => HeightRule::Auto,
            _ => HeightRule::AtLeast,
        }
    }

    fn as_attr(self) -> &'static str {
        match self {
            HeightRule::Auto => "auto",
            HeightRule::AtLeast => "atLeast",
            HeightRule::Exact => "exact",
        }
    }
}

/// Table-level default cell margins, in twips as stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellMargins {
    pub top: Option<i64>,
    pub left: Option<i64>,
    pub bottom: Option<i64>,
    pub right: Option<i64>,
}

impl CellMargins {
    /// Same margin on the left and right, another on top and bottom.
    pub fn symmetric(side: i64, vertical: i64) -> Self {
        Self {
            top: Some(vertical),
            left: Some(side),
            bottom: Some(vertical),
            right: Some(side),
        }
    }
}

/// Handle to a `w:tbl` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Table(NodeId);

impl Table {
    /// Wrap an existing `w:tbl` node.
    pub fn from_node(id: NodeId) -> Self {
        Self(id)
    }

    /// Underlying node.
    pub fn id(self) -> NodeId {
        self.0
    }

    /// Rows in order.
    pub fn rows(self, tree: &XmlTree) -> Vec<Row> {
        tree.child_elements(self.0, "w:tr").map(Row).collect()
    }

    fn ensure_properties(self, tree: &mut XmlTree) -> NodeId {
        tree.ensure_child(self.0, "w:tblPr", TBL_ORDER)
    }

    /// Column widths from `w:tblGrid`.
    pub fn grid_columns(self, tree: &XmlTree) -> Vec<Length> {
        let Some(grid) = tree.first_child(self.0, "w:tblGrid") else {
            return Vec::new();
        };
        tree.child_elements(grid, "w:gridCol")
            .filter_map(|col| tree.attribute(col, "w:w")?.parse::<i64>().ok())
            .map(Length::from_twips)
            .collect()
    }

    /// Replace the grid with the given column widths.
    pub fn set_grid_columns(self, tree: &mut XmlTree, widths: &[Length]) {
        let grid = tree.create_element("w:tblGrid");
        for width in widths {
            let twips = width.twips().to_string();
            let col = tree.create_element_with("w:gridCol", &[("w:w", twips.as_str())]);
            tree.append_child(grid, col);
        }
        tree.replace_child(self.0, grid, TBL_ORDER);
    }

    /// Default cell margins from `w:tblCellMar`, if present.
    pub fn cell_margins(self, tree: &XmlTree) -> Option<CellMargins> {
        let tbl_pr = tree.first_child(self.0, "w:tblPr")?;
        let margins = tree.first_child(tbl_pr, "w:tblCellMar")?;
        let side = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| tree.first_child(margins, name))
                .and_then(|el| tree.attribute(el, "w:w"))
                .and_then(|w| w.parse::<i64>().ok())
        };
        Some(CellMargins {
            top: side(&["w:top"]),
            left: side(&["w:left", "w:start"]),
            bottom: side(&["w:bottom"]),
            right: side(&["w:right", "w:end"]),
        })
    }

    /// Replace `w:tblCellMar`; sides left as `None` are omitted.
    pub fn set_cell_margins(self, tree: &mut XmlTree, margins: CellMargins) {
        let tbl_pr = self.ensure_properties(tree);
        let container = tree.create_element("w:tblCellMar");
        let sides = [
            ("w:top", margins.top),
            ("w:left", margins.left),
            ("w:bottom", margins.bottom),
            ("w:right", margins.right),
        ];
        for (name, value) in sides {
            if let Some(value) = value {
                let twips = value.to_string();
                let side =
                    tree.create_element_with(name, &[("w:w", twips.as_str()), ("w:type", "dxa")]);
                tree.insert_ordered(container, side, CELL_MAR_ORDER);
            }
        }
        tree.replace_child(tbl_pr, container, TBLPR_ORDER);
    }
}

/// Handle to a `w:tr` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Row(NodeId);

impl Row {
    /// Underlying node.
    pub fn id(self) -> NodeId {
        self.0
    }

    /// Cells in order. Spanned cells count once.
    pub fn cells(self, tree: &XmlTree) -> Vec<Cell> {
        tree.child_elements(self.0, "w:tc").map(Cell).collect()
    }

    fn height_element(self, tree: &XmlTree) -> Option<NodeId> {
        tree.first_child(tree.first_child(self.0, "w:trPr")?, "w:trHeight")
    }

    /// Explicit row height.
    pub fn height(self, tree: &XmlTree) -> Option<Length> {
        let element = self.height_element(tree)?;
        tree.attribute(element, "w:val")?
            .parse()
            .ok()
            .map(Length::from_twips)
    }

    /// Height rule; `None` when no height is set.
    pub fn height_rule(self, tree: &XmlTree) -> Option<HeightRule> {
        let element = self.height_element(tree)?;
        Some(HeightRule::from_attr(tree.attribute(element, "w:hRule")))
    }

    /// Set height and rule.
    pub fn set_height(self, tree: &mut XmlTree, height: Length, rule: HeightRule) {
        let tr_pr = tree.ensure_child(self.0, "w:trPr", TR_ORDER);
        let element = tree.ensure_child(tr_pr, "w:trHeight", TRPR_ORDER);
        tree.set_attribute(element, "w:val", height.twips().to_string());
        tree.set_attribute(element, "w:hRule", rule.as_attr());
    }
}

/// Handle to a `w:tc` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell(NodeId);

impl Cell {
    /// Underlying node.
    pub fn id(self) -> NodeId {
        self.0
    }

    /// Paragraphs directly inside the cell.
    pub fn paragraphs(self, tree: &XmlTree) -> Vec<Paragraph> {
        tree.child_elements(self.0, "w:p")
            .map(Paragraph::from_node)
            .collect()
    }

    /// Cell text, paragraphs joined by newlines.
    pub fn text(self, tree: &XmlTree) -> String {
        self.paragraphs(tree)
            .iter()
            .map(|p| p.text(tree))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check whether the cell has no non-whitespace text.
    pub fn is_blank(self, tree: &XmlTree) -> bool {
        self.text(tree).trim().is_empty()
    }

    /// Preferred width when stored in twips (`dxa`).
    pub fn width(self, tree: &XmlTree) -> Option<Length> {
        let tc_pr = tree.first_child(self.0, "w:tcPr")?;
        let tc_w = tree.first_child(tc_pr, "w:tcW")?;
        match tree.attribute(tc_w, "w:type") {
            None | Some("dxa") => tree
                .attribute(tc_w, "w:w")?
                .parse()
                .ok()
                .map(Length::from_twips),
            _ => None,
        }
    }

    /// Set the preferred width in twips.
    pub fn set_width(self, tree: &mut XmlTree, width: Length) {
        let tc_pr = tree.ensure_child(self.0, "w:tcPr", TC_ORDER);
        let tc_w = tree.ensure_child(tc_pr, "w:tcW", TCPR_ORDER);
        tree.set_attribute(tc_w, "w:w", width.twips().to_string());
        tree.set_attribute(tc_w, "w:type", "dxa");
    }
}
