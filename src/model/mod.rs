//! Document model for word-processing packages.
//!
//! A [`Document`] owns the zip [`Package`] and the parsed main and styles
//! parts. Paragraphs, runs, tables, rows and cells are lightweight `Copy`
//! handles into the document's [`XmlTree`]; every accessor takes the tree
//! explicitly, so handles stay valid across insertions and removals.

mod document;
mod length;
mod package;
mod paragraph;
mod props;
mod styles;
mod table;
mod template;
mod xml;

pub use document::{Block, Document};
pub use length::Length;
pub use package::Package;
pub use paragraph::{Alignment, Paragraph, Run, RunContent};
pub use styles::Styles;
pub use table::{Cell, CellMargins, HeightRule, Row, Table};
pub use xml::{NodeId, NodeKind, XmlTree};
