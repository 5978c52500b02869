//! Named style registry backed by the styles part.

use super::props;
use super::xml::{NodeId, XmlTree};
use crate::error::Result;

const STYLE_ORDER: &[&str] = &[
    "w:name",
    "w:aliases",
    "w:basedOn",
    "w:next",
    "w:link",
    "w:autoRedefine",
    "w:hidden",
    "w:uiPriority",
    "w:semiHidden",
    "w:unhideWhenUsed",
    "w:qFormat",
    "w:locked",
    "w:personal",
    "w:personalCompose",
    "w:personalReply",
    "w:rsid",
    "w:pPr",
    "w:rPr",
    "w:tblPr",
    "w:trPr",
    "w:tcPr",
    "w:tblStylePr",
];

/// Style definitions of a document.
#[derive(Debug, Clone)]
pub struct Styles {
    tree: XmlTree,
}

impl Styles {
    /// Parse a styles part.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Ok(Self {
            tree: XmlTree::parse(data)?,
        })
    }

    /// Serialize back to part bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.tree.to_bytes()
    }

    fn styles(&self) -> Vec<NodeId> {
        match self.tree.root_element() {
            Some(root) => self.tree.child_elements(root, "w:style").collect(),
            None => Vec::new(),
        }
    }

    /// Find a style by display name or style id.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.styles().into_iter().find(|&style| {
            let display = self
                .tree
                .first_child(style, "w:name")
                .and_then(|n| self.tree.attribute(n, "w:val"));
            display.is_some_and(|d| d.eq_ignore_ascii_case(name))
                || self.tree.attribute(style, "w:styleId") == Some(name)
        })
    }

    /// Check whether a style exists.
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Explicit typeface and size of a style's run properties.
    pub fn font(&self, name: &str) -> Option<(Option<String>, Option<f32>)> {
        let style = self.find(name)?;
        match self.tree.first_child(style, "w:rPr") {
            Some(rpr) => Some((
                props::font_name(&self.tree, rpr),
                props::font_size(&self.tree, rpr),
            )),
            None => Some((None, None)),
        }
    }

    /// Set typeface and size on a style. Returns `false` when the style is missing.
    pub fn set_font(&mut self, name: &str, font: &str, points: f32) -> bool {
        let Some(style) = self.find(name) else {
            return false;
        };
        let rpr = self.tree.ensure_child(style, "w:rPr", STYLE_ORDER);
        props::set_font_name(&mut self.tree, rpr, font);
        props::set_font_size(&mut self.tree, rpr, points);
        true
    }
}
