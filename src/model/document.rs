//! Loaded word-processing document.

use super::paragraph::Paragraph;
use super::props::{TBLPR_ORDER, TBL_ORDER};
use super::styles::Styles;
use super::table::Table;
use super::template;
use super::xml::{NodeId, XmlTree};
use super::Package;
use crate::detect::{self, CONTENT_TYPES_PART};
use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// Usable text width of an A4 page with one-inch margins, in twips.
const DEFAULT_TABLE_WIDTH: i64 = 9026;

/// A body-level block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

impl Block {
    /// Underlying node.
    pub fn id(self) -> NodeId {
        match self {
            Block::Paragraph(p) => p.id(),
            Block::Table(t) => t.id(),
        }
    }
}

/// An in-memory document: the package plus the parsed main and styles parts.
///
/// Paragraph, run and table handles borrow nothing; they are resolved
/// against [`Document::tree`] on each call, so the document can be mutated
/// while handles are held.
#[derive(Debug, Clone)]
pub struct Document {
    package: Package,
    main_part: String,
    tree: XmlTree,
    body: NodeId,
    styles_part: Option<String>,
    styles: Option<Styles>,
}

impl Document {
    /// Create an empty document with a default style sheet.
    pub fn new() -> Result<Self> {
        let package = Package::from_parts([
            (CONTENT_TYPES_PART, template::CONTENT_TYPES.as_bytes().to_vec()),
            ("_rels/.rels", template::PACKAGE_RELS.as_bytes().to_vec()),
            (DEFAULT_MAIN_PART, template::DOCUMENT.as_bytes().to_vec()),
            (
                "word/_rels/document.xml.rels",
                template::DOCUMENT_RELS.as_bytes().to_vec(),
            ),
            ("word/styles.xml", template::STYLES.as_bytes().to_vec()),
        ]);
        Self::from_package(package)
    }

    /// Open a document from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Load a document from the complete file content.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_package(Package::from_bytes(data)?)
    }

    /// Load a document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_package(Package::from_reader(reader)?)
    }

    fn from_package(package: Package) -> Result<Self> {
        let main_part = package
            .part(CONTENT_TYPES_PART)
            .and_then(detect::main_part_from_content_types)
            .map(|format| format.main_part)
            .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string());

        let data = package
            .part(&main_part)
            .ok_or_else(|| Error::MissingPart(main_part.clone()))?;
        let tree = XmlTree::parse(data)?;
        let body = tree
            .root_element()
            .and_then(|root| tree.first_child(root, "w:body"))
            .ok_or_else(|| Error::Xml(format!("{} has no w:body", main_part)))?;

        let styles_part = package.related_part(&main_part, "styles");
        let styles = match styles_part.as_deref().and_then(|name| package.part(name)) {
            Some(data) => Some(Styles::parse(data)?),
            None => None,
        };

        Ok(Self {
            package,
            main_part,
            tree,
            body,
            styles_part,
            styles,
        })
    }

    /// Serialize the package with the current main and styles parts.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut replaced = vec![(self.main_part.as_str(), self.tree.to_bytes()?)];
        if let (Some(name), Some(styles)) = (&self.styles_part, &self.styles) {
            replaced.push((name.as_str(), styles.to_bytes()?));
        }
        self.package.to_bytes_with(&replaced)
    }

    /// Write the package to a writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes()?)?;
        Ok(())
    }

    /// Save to a file, creating missing parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Main document tree.
    pub fn tree(&self) -> &XmlTree {
        &self.tree
    }

    /// Mutable main document tree.
    pub fn tree_mut(&mut self) -> &mut XmlTree {
        &mut self.tree
    }

    /// The `w:body` element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Style registry, when the package has a styles part.
    pub fn styles(&self) -> Option<&Styles> {
        self.styles.as_ref()
    }

    /// Mutable style registry.
    pub fn styles_mut(&mut self) -> Option<&mut Styles> {
        self.styles.as_mut()
    }

    // ==================== Blocks ====================

    fn block_at(&self, id: NodeId) -> Option<Block> {
        match self.tree.name(id)? {
            "w:p" => Some(Block::Paragraph(Paragraph::from_node(id))),
            "w:tbl" => Some(Block::Table(Table::from_node(id))),
            _ => None,
        }
    }

    /// Body-level paragraphs and tables in order.
    pub fn blocks(&self) -> Vec<Block> {
        self.tree
            .children(self.body)
            .iter()
            .filter_map(|&id| self.block_at(id))
            .collect()
    }

    /// Body-level paragraphs in order.
    pub fn paragraphs(&self) -> Vec<Paragraph> {
        self.tree
            .child_elements(self.body, "w:p")
            .map(Paragraph::from_node)
            .collect()
    }

    /// Body-level tables in order.
    pub fn tables(&self) -> Vec<Table> {
        self.tree
            .child_elements(self.body, "w:tbl")
            .map(Table::from_node)
            .collect()
    }

    /// The block following `id` in the body, skipping non-block markup.
    pub fn next_block(&self, id: NodeId) -> Option<Block> {
        self.tree
            .following_siblings(id)
            .iter()
            .find_map(|&sibling| self.block_at(sibling))
    }

    /// The body paragraph following `paragraph`, skipping tables.
    pub fn next_paragraph(&self, paragraph: Paragraph) -> Option<Paragraph> {
        self.tree
            .following_siblings(paragraph.id())
            .iter()
            .copied()
            .find(|&sibling| self.tree.is_element(sibling, "w:p"))
            .map(Paragraph::from_node)
    }

    /// Insert an empty paragraph before `anchor`.
    pub fn insert_paragraph_before(&mut self, anchor: NodeId) -> Paragraph {
        let paragraph = Paragraph::create(&mut self.tree);
        self.tree.insert_before(anchor, paragraph.id());
        paragraph
    }

    /// Insert an empty paragraph after `anchor`.
    pub fn insert_paragraph_after(&mut self, anchor: NodeId) -> Paragraph {
        let paragraph = Paragraph::create(&mut self.tree);
        self.tree.insert_after(anchor, paragraph.id());
        paragraph
    }

    /// Append an empty paragraph at the end of the body, ahead of the
    /// trailing section properties.
    pub fn append_paragraph(&mut self) -> Paragraph {
        let paragraph = Paragraph::create(&mut self.tree);
        self.append_block(paragraph.id());
        paragraph
    }

    fn append_block(&mut self, id: NodeId) {
        let section = self
            .tree
            .children(self.body)
            .last()
            .copied()
            .filter(|&last| self.tree.is_element(last, "w:sectPr"));
        match section {
            Some(section) => self.tree.insert_before(section, id),
            None => self.tree.append_child(self.body, id),
        }
    }

    /// Remove a block from the body. Its nodes stay in the arena until the
    /// document is saved and loaded again.
    pub fn remove(&mut self, id: NodeId) {
        self.tree.detach(id);
    }

    /// Append a paragraph holding `text` as a single run.
    pub fn add_paragraph(&mut self, text: &str) -> Paragraph {
        let paragraph = self.append_paragraph();
        if !text.is_empty() {
            paragraph.add_run(&mut self.tree, text);
        }
        paragraph
    }

    /// Append a table with one row per slice and one cell per string.
    pub fn add_table(&mut self, rows: &[&[&str]]) -> Table {
        let columns = rows.iter().map(|row| row.len()).max().unwrap_or(0).max(1);
        let column_width = (DEFAULT_TABLE_WIDTH / columns as i64).to_string();

        let tree = &mut self.tree;
        let table = tree.create_element("w:tbl");
        let tbl_pr = tree.create_element("w:tblPr");
        tree.insert_ordered(table, tbl_pr, TBL_ORDER);
        let tbl_w = tree.create_element_with("w:tblW", &[("w:w", "0"), ("w:type", "auto")]);
        tree.insert_ordered(tbl_pr, tbl_w, TBLPR_ORDER);
        let look = tree.create_element_with("w:tblLook", &[("w:val", "04A0")]);
        tree.insert_ordered(tbl_pr, look, TBLPR_ORDER);

        let grid = tree.create_element("w:tblGrid");
        for _ in 0..columns {
            let col = tree.create_element_with("w:gridCol", &[("w:w", column_width.as_str())]);
            tree.append_child(grid, col);
        }
        tree.append_child(table, grid);

        for row in rows {
            let tr = tree.create_element("w:tr");
            for text in row.iter() {
                let tc = tree.create_element("w:tc");
                let tc_pr = tree.create_element("w:tcPr");
                let tc_w = tree.create_element_with(
                    "w:tcW",
                    &[("w:w", column_width.as_str()), ("w:type", "dxa")],
                );
                tree.append_child(tc_pr, tc_w);
                tree.append_child(tc, tc_pr);

                let paragraph = Paragraph::create(tree);
                tree.append_child(tc, paragraph.id());
                if !text.is_empty() {
                    paragraph.add_run(tree, text);
                }
                tree.append_child(tr, tc);
            }
            tree.append_child(table, tr);
        }

        self.append_block(table);
        Table::from_node(table)
    }

    /// Plain text of the body, one line per paragraph.
    pub fn plain_text(&self) -> String {
        self.paragraphs()
            .iter()
            .map(|p| p.text(&self.tree))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
