//! Paragraph and run handles.

use super::length::Length;
use super::props::{self, PPR_ORDER, P_ORDER, R_ORDER};
use super::xml::{NodeId, XmlTree};
use serde::{Deserialize, Serialize};

/// Inline wrappers whose runs belong to the enclosing paragraph.
const RUN_CONTAINERS: &[&str] = &[
    "w:hyperlink",
    "w:ins",
    "w:smartTag",
    "w:fldSimple",
    "w:customXml",
    "w:sdt",
    "w:sdtContent",
];

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    fn from_jc(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "both" | "distribute" => Some(Alignment::Justify),
            _ => None,
        }
    }

    fn as_jc(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}

/// Handle to a `w:p` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Paragraph(NodeId);

impl Paragraph {
    /// Wrap an existing `w:p` node.
    pub fn from_node(id: NodeId) -> Self {
        Self(id)
    }

    /// Underlying node.
    pub fn id(self) -> NodeId {
        self.0
    }

    /// Create a detached, empty paragraph.
    pub fn create(tree: &mut XmlTree) -> Self {
        Self(tree.create_element("w:p"))
    }

    /// Runs in document order, including runs nested in hyperlinks and
    /// similar inline wrappers.
    pub fn runs(self, tree: &XmlTree) -> Vec<Run> {
        let mut runs = Vec::new();
        collect_runs(tree, self.0, &mut runs);
        runs
    }

    /// Visible text: run text with tabs as `\t` and breaks as `\n`.
    pub fn text(self, tree: &XmlTree) -> String {
        self.runs(tree).iter().map(|run| run.text(tree)).collect()
    }

    /// Check whether the paragraph has no non-whitespace text.
    pub fn is_blank(self, tree: &XmlTree) -> bool {
        self.text(tree).trim().is_empty()
    }

    /// Check for content that affects layout even without text: page breaks,
    /// drawings and section properties.
    pub fn has_layout_content(self, tree: &XmlTree) -> bool {
        let page_break = tree
            .descendants(self.0, "w:br")
            .into_iter()
            .any(|br| tree.attribute(br, "w:type") == Some("page"));
        page_break
            || ["w:drawing", "w:pict", "w:object", "w:sectPr"]
                .iter()
                .any(|name| !tree.descendants(self.0, name).is_empty())
    }

    /// Blank and safe to delete. Blanks holding a page break, a drawing or
    /// section properties are deliberately kept even though they show no text.
    pub fn is_removable_blank(self, tree: &XmlTree) -> bool {
        self.is_blank(tree) && !self.has_layout_content(tree)
    }

    fn properties(self, tree: &XmlTree) -> Option<NodeId> {
        tree.first_child(self.0, "w:pPr")
    }

    fn ensure_properties(self, tree: &mut XmlTree) -> NodeId {
        tree.ensure_child(self.0, "w:pPr", P_ORDER)
    }

    /// Explicit alignment, if any.
    pub fn alignment(self, tree: &XmlTree) -> Option<Alignment> {
        let jc = tree.first_child(self.properties(tree)?, "w:jc")?;
        Alignment::from_jc(tree.attribute(jc, "w:val")?)
    }

    /// Set or clear the explicit alignment.
    pub fn set_alignment(self, tree: &mut XmlTree, alignment: Option<Alignment>) {
        match alignment {
            Some(alignment) => {
                let ppr = self.ensure_properties(tree);
                let jc = tree.ensure_child(ppr, "w:jc", PPR_ORDER);
                tree.set_attribute(jc, "w:val", alignment.as_jc());
            }
            None => {
                if let Some(ppr) = self.properties(tree) {
                    tree.remove_children_named(ppr, "w:jc");
                }
            }
        }
    }

    /// Referenced paragraph style id; `None` means the default style.
    pub fn style_id(self, tree: &XmlTree) -> Option<String> {
        let style = tree.first_child(self.properties(tree)?, "w:pStyle")?;
        tree.attribute(style, "w:val").map(str::to_string)
    }

    /// Set the style reference; `None` falls back to the default style.
    pub fn set_style_id(self, tree: &mut XmlTree, style_id: Option<&str>) {
        match style_id {
            Some(id) => {
                let ppr = self.ensure_properties(tree);
                let style = tree.ensure_child(ppr, "w:pStyle", PPR_ORDER);
                tree.set_attribute(style, "w:val", id);
            }
            None => {
                if let Some(ppr) = self.properties(tree) {
                    tree.remove_children_named(ppr, "w:pStyle");
                }
            }
        }
    }

    /// Left indent from `w:ind`.
    pub fn left_indent(self, tree: &XmlTree) -> Option<Length> {
        let ind = tree.first_child(self.properties(tree)?, "w:ind")?;
        let value = tree
            .attribute(ind, "w:left")
            .or_else(|| tree.attribute(ind, "w:start"))?;
        value.parse().ok().map(Length::from_twips)
    }

    /// First-line indent; negative for a hanging indent.
    pub fn first_line_indent(self, tree: &XmlTree) -> Option<Length> {
        let ind = tree.first_child(self.properties(tree)?, "w:ind")?;
        if let Some(hanging) = tree.attribute(ind, "w:hanging") {
            return hanging.parse().ok().map(|v: i64| -Length::from_twips(v));
        }
        let first_line = tree.attribute(ind, "w:firstLine")?;
        first_line.parse().ok().map(Length::from_twips)
    }

    /// Set the left indent.
    pub fn set_left_indent(self, tree: &mut XmlTree, indent: Length) {
        let ppr = self.ensure_properties(tree);
        let ind = tree.ensure_child(ppr, "w:ind", PPR_ORDER);
        tree.remove_attribute(ind, "w:start");
        tree.set_attribute(ind, "w:left", indent.twips().to_string());
    }

    /// Set the first-line indent; a negative value becomes a hanging indent.
    pub fn set_first_line_indent(self, tree: &mut XmlTree, indent: Length) {
        let ppr = self.ensure_properties(tree);
        let ind = tree.ensure_child(ppr, "w:ind", PPR_ORDER);
        if indent.emu() < 0 {
            tree.remove_attribute(ind, "w:firstLine");
            tree.set_attribute(ind, "w:hanging", indent.abs().twips().to_string());
        } else {
            tree.remove_attribute(ind, "w:hanging");
            tree.set_attribute(ind, "w:firstLine", indent.twips().to_string());
        }
    }

    /// Set font and size on the paragraph mark, which governs the height of
    /// an empty paragraph.
    pub fn set_mark_font(self, tree: &mut XmlTree, name: &str, points: f32) {
        let ppr = self.ensure_properties(tree);
        let rpr = tree.ensure_child(ppr, "w:rPr", PPR_ORDER);
        props::set_font_name(tree, rpr, name);
        props::set_font_size(tree, rpr, points);
    }

    /// Remove all content except paragraph properties.
    pub fn clear(self, tree: &mut XmlTree) {
        let content: Vec<NodeId> = tree
            .children(self.0)
            .iter()
            .copied()
            .filter(|&child| !tree.is_element(child, "w:pPr"))
            .collect();
        for child in content {
            tree.detach(child);
        }
    }

    /// Append a run holding `text`.
    pub fn add_run(self, tree: &mut XmlTree, text: &str) -> Run {
        let run = Run(tree.create_element("w:r"));
        tree.append_child(self.0, run.0);
        run.set_text(tree, text);
        run
    }
}

fn collect_runs(tree: &XmlTree, parent: NodeId, runs: &mut Vec<Run>) {
    for &child in tree.children(parent) {
        match tree.name(child) {
            Some("w:r") => runs.push(Run(child)),
            Some(name) if RUN_CONTAINERS.contains(&name) => collect_runs(tree, child, runs),
            _ => {}
        }
    }
}

/// Piece of run content relevant to text transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunContent {
    /// A `w:t` element
    Text(NodeId),
    /// A tab or line break
    Break,
}

/// Handle to a `w:r` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run(NodeId);

impl Run {
    /// Underlying node.
    pub fn id(self) -> NodeId {
        self.0
    }

    /// Text and break content in order.
    pub fn content(self, tree: &XmlTree) -> Vec<RunContent> {
        tree.children(self.0)
            .iter()
            .filter_map(|&child| match tree.name(child) {
                Some("w:t") => Some(RunContent::Text(child)),
                Some("w:tab") | Some("w:br") | Some("w:cr") => Some(RunContent::Break),
                _ => None,
            })
            .collect()
    }

    /// Visible text of the run.
    pub fn text(self, tree: &XmlTree) -> String {
        let mut text = String::new();
        for &child in tree.children(self.0) {
            match tree.name(child) {
                Some("w:t") => text.push_str(&tree.text(child)),
                Some("w:tab") => text.push('\t'),
                Some("w:br") | Some("w:cr") => text.push('\n'),
                Some("w:noBreakHyphen") => text.push('-'),
                _ => {}
            }
        }
        text
    }

    /// Replace the run's content with `text`, mapping `\t` and `\n` to tab
    /// and break elements.
    pub fn set_text(self, tree: &mut XmlTree, text: &str) {
        let content: Vec<NodeId> = tree
            .children(self.0)
            .iter()
            .copied()
            .filter(|&child| !tree.is_element(child, "w:rPr"))
            .collect();
        for child in content {
            tree.detach(child);
        }

        let mut pending = String::new();
        for ch in text.chars() {
            match ch {
                '\t' | '\n' => {
                    self.push_text(tree, &pending);
                    pending.clear();
                    let name = if ch == '\t' { "w:tab" } else { "w:br" };
                    let element = tree.create_element(name);
                    tree.append_child(self.0, element);
                }
                _ => pending.push(ch),
            }
        }
        self.push_text(tree, &pending);
    }

    fn push_text(self, tree: &mut XmlTree, text: &str) {
        if text.is_empty() {
            return;
        }
        let t = tree.create_element_with("w:t", &[("xml:space", "preserve")]);
        tree.set_text(t, text);
        tree.append_child(self.0, t);
    }

    fn properties(self, tree: &XmlTree) -> Option<NodeId> {
        tree.first_child(self.0, "w:rPr")
    }

    fn ensure_properties(self, tree: &mut XmlTree) -> NodeId {
        tree.ensure_child(self.0, "w:rPr", R_ORDER)
    }

    /// Explicit typeface name.
    pub fn font_name(self, tree: &XmlTree) -> Option<String> {
        props::font_name(tree, self.properties(tree)?)
    }

    /// Explicit font size in points.
    pub fn font_size(self, tree: &XmlTree) -> Option<f32> {
        props::font_size(tree, self.properties(tree)?)
    }

    /// Explicit bold flag; `None` when inherited.
    pub fn bold(self, tree: &XmlTree) -> Option<bool> {
        props::bold(tree, self.properties(tree)?)
    }

    /// Bold as rendered when nothing is inherited.
    pub fn is_bold(self, tree: &XmlTree) -> bool {
        self.bold(tree).unwrap_or(false)
    }

    pub fn set_font_name(self, tree: &mut XmlTree, name: &str) {
        let rpr = self.ensure_properties(tree);
        props::set_font_name(tree, rpr, name);
    }

    pub fn set_font_size(self, tree: &mut XmlTree, points: f32) {
        let rpr = self.ensure_properties(tree);
        props::set_font_size(tree, rpr, points);
    }

    pub fn set_bold(self, tree: &mut XmlTree, bold: bool) {
        let rpr = self.ensure_properties(tree);
        props::set_bold(tree, rpr, bold);
    }

    /// Apply typeface and size in one step.
    pub fn set_font(self, tree: &mut XmlTree, name: &str, points: f32) {
        let rpr = self.ensure_properties(tree);
        props::set_font_name(tree, rpr, name);
        props::set_font_size(tree, rpr, points);
    }
}
