//! Lossless XML tree for package parts.
//!
//! Parts are parsed into an arena of nodes addressed by [`NodeId`]. Ids stay
//! valid for the lifetime of the tree: detaching a node only unlinks it from
//! its parent, so handles held elsewhere never dangle. Content the formatter
//! does not understand (extension elements, comments, processing
//! instructions) is kept and written back unchanged.

use crate::error::{Error, Result};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Stable handle to a node in an [`XmlTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Node payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Synthetic document node holding the root element and prolog content
    Document,
    /// An element with its qualified name and attributes in source order
    Element {
        name: String,
        attributes: Vec<(String, String)>,
    },
    /// Unescaped character data
    Text(String),
    /// CDATA section content
    CData(String),
    /// Raw comment content
    Comment(String),
    /// Raw processing instruction content
    ProcessingInstruction(String),
    /// Raw doctype content
    DocType(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct Declaration {
    version: String,
    standalone: Option<String>,
}

/// Arena-backed XML document.
///
/// Nodes are never freed. A detached subtree keeps its arena slots until the
/// tree is serialized and parsed again, so memory grows with the number of
/// edits made to one tree, not with the size of the document.
#[derive(Debug, Clone)]
pub struct XmlTree {
    nodes: Vec<Node>,
    declaration: Option<Declaration>,
}

impl XmlTree {
    /// The synthetic document node.
    pub const DOCUMENT: NodeId = NodeId(0);

    #[cfg(test)]
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Create an empty tree with a standalone UTF-8 declaration.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
            declaration: Some(Declaration {
                version: "1.0".to_string(),
                standalone: Some("yes".to_string()),
            }),
        }
    }

    /// Parse a part into a tree.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(data);
        reader.trim_text(false);

        let mut tree = Self::new();
        tree.declaration = None;

        let mut stack = vec![Self::DOCUMENT];
        let mut buf = Vec::new();

        loop {
            let parent = stack.last().copied().unwrap_or(Self::DOCUMENT);
            match reader.read_event_into(&mut buf)? {
                Event::Decl(decl) => {
                    let version = String::from_utf8_lossy(&decl.version()?).into_owned();
                    let standalone = match decl.standalone() {
                        Some(value) => Some(String::from_utf8_lossy(&value?).into_owned()),
                        None => None,
                    };
                    tree.declaration = Some(Declaration {
                        version,
                        standalone,
                    });
                }
                Event::Start(start) => {
                    let id = tree.push_start(&start)?;
                    tree.append_child(parent, id);
                    stack.push(id);
                }
                Event::Empty(start) => {
                    let id = tree.push_start(&start)?;
                    tree.append_child(parent, id);
                }
                Event::End(_) => {
                    if stack.len() > 1 {
                        stack.pop();
                    }
                }
                Event::Text(text) => {
                    let id = tree.push(NodeKind::Text(text.unescape()?.into_owned()));
                    tree.append_child(parent, id);
                }
                Event::CData(data) => {
                    let content = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    let id = tree.push(NodeKind::CData(content));
                    tree.append_child(parent, id);
                }
                Event::Comment(comment) => {
                    let id = tree.push(NodeKind::Comment(
                        String::from_utf8_lossy(&comment).into_owned(),
                    ));
                    tree.append_child(parent, id);
                }
                Event::PI(pi) => {
                    let id = tree.push(NodeKind::ProcessingInstruction(
                        String::from_utf8_lossy(&pi).into_owned(),
                    ));
                    tree.append_child(parent, id);
                }
                Event::DocType(doctype) => {
                    let id = tree.push(NodeKind::DocType(
                        String::from_utf8_lossy(&doctype).into_owned(),
                    ));
                    tree.append_child(parent, id);
                }
                Event::Eof => break,
            }
            buf.clear();
        }

        if stack.len() > 1 {
            return Err(Error::Xml("unexpected end of document".to_string()));
        }
        if tree.root_element().is_none() {
            return Err(Error::Xml("document has no root element".to_string()));
        }

        Ok(tree)
    }

    /// Serialize the tree back to UTF-8 bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());

        if let Some(decl) = &self.declaration {
            writer.write_event(Event::Decl(BytesDecl::new(
                &decl.version,
                Some("UTF-8"),
                decl.standalone.as_deref(),
            )))?;
        }
        for &child in self.children(Self::DOCUMENT) {
            self.write_node(&mut writer, child)?;
        }

        Ok(writer.into_inner())
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, id: NodeId) -> Result<()> {
        let node = &self.nodes[id.0];
        match &node.kind {
            NodeKind::Document => {}
            NodeKind::Element { name, attributes } => {
                let mut start = BytesStart::new(name.as_str());
                for (key, value) in attributes {
                    start.push_attribute((key.as_str(), value.as_str()));
                }
                if node.children.is_empty() {
                    writer.write_event(Event::Empty(start))?;
                } else {
                    writer.write_event(Event::Start(start))?;
                    for &child in &node.children {
                        self.write_node(writer, child)?;
                    }
                    writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
                }
            }
            NodeKind::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            NodeKind::CData(text) => writer.write_event(Event::CData(BytesCData::new(text)))?,
            NodeKind::Comment(text) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?
            }
            NodeKind::ProcessingInstruction(text) => {
                writer.write_event(Event::PI(BytesText::from_escaped(text.as_str())))?
            }
            NodeKind::DocType(text) => {
                writer.write_event(Event::DocType(BytesText::from_escaped(text.as_str())))?
            }
        }
        Ok(())
    }

    fn push_start(&mut self, start: &BytesStart<'_>) -> Result<NodeId> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(self.push(NodeKind::Element { name, attributes }))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    // ==================== Queries ====================

    /// The root element of the document.
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(Self::DOCUMENT)
            .iter()
            .copied()
            .find(|&id| matches!(self.nodes[id.0].kind, NodeKind::Element { .. }))
    }

    /// Node payload.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Qualified element name, or `None` for non-element nodes.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Check whether `id` is an element with the given qualified name.
    pub fn is_element(&self, id: NodeId, name: &str) -> bool {
        self.name(id) == Some(name)
    }

    /// Attribute value by qualified key.
    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Parent node, `None` for the document node and detached nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// All children in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Child elements with the given name.
    pub fn child_elements<'a>(
        &'a self,
        id: NodeId,
        name: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| self.is_element(child, name))
    }

    /// First child element with the given name.
    pub fn first_child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.child_elements(id, name).next()
    }

    /// Position of `id` among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Siblings after `id`, in document order.
    pub fn following_siblings(&self, id: NodeId) -> &[NodeId] {
        match (self.parent(id), self.index_in_parent(id)) {
            (Some(parent), Some(index)) => &self.children(parent)[index + 1..],
            _ => &[],
        }
    }

    /// Descendant elements with the given name, in document order.
    pub fn descendants(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if self.is_element(node, name) {
                found.push(node);
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        found
    }

    /// Concatenated character data of all descendants.
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for &child in self.children(id) {
            match &self.nodes[child.0].kind {
                NodeKind::Text(t) | NodeKind::CData(t) => out.push_str(t),
                NodeKind::Element { .. } => self.collect_text(child, out),
                _ => {}
            }
        }
    }

    // ==================== Mutation ====================

    /// Create a detached element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(NodeKind::Element {
            name: name.to_string(),
            attributes: Vec::new(),
        })
    }

    /// Create a detached element with attributes.
    pub fn create_element_with(&mut self, name: &str, attributes: &[(&str, &str)]) -> NodeId {
        self.push(NodeKind::Element {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })
    }

    /// Set (or add) an attribute.
    pub fn set_attribute(&mut self, id: NodeId, key: &str, value: impl Into<String>) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[id.0].kind {
            let value = value.into();
            match attributes.iter_mut().find(|(k, _)| k == key) {
                Some(entry) => entry.1 = value,
                None => attributes.push((key.to_string(), value)),
            }
        }
    }

    /// Remove an attribute if present.
    pub fn remove_attribute(&mut self, id: NodeId, key: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[id.0].kind {
            attributes.retain(|(k, _)| k != key);
        }
    }

    /// Replace all children of `id` with a single text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        self.clear_children(id);
        let node = self.push(NodeKind::Text(text.to_string()));
        self.append_child(id, node);
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `child` at `index` among `parent`'s children.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Insert `node` immediately before `reference`.
    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) {
        self.detach(node);
        if let (Some(parent), Some(index)) =
            (self.parent(reference), self.index_in_parent(reference))
        {
            self.insert_child(parent, index, node);
        }
    }

    /// Insert `node` immediately after `reference`.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        self.detach(node);
        if let (Some(parent), Some(index)) =
            (self.parent(reference), self.index_in_parent(reference))
        {
            self.insert_child(parent, index + 1, node);
        }
    }

    /// Unlink `id` from its parent. The node and its subtree stay addressable
    /// and keep their arena slots.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Detach every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    /// Detach every child element named `name`.
    pub fn remove_children_named(&mut self, id: NodeId, name: &str) {
        let doomed: Vec<NodeId> = self.child_elements(id, name).collect();
        for child in doomed {
            self.detach(child);
        }
    }

    /// Insert `child` into `parent` honoring a schema sequence.
    ///
    /// The child goes before the first existing element that either comes
    /// later in `order` or is not listed at all. Names missing from `order`
    /// are appended.
    pub fn insert_ordered(&mut self, parent: NodeId, child: NodeId, order: &[&str]) {
        let rank = |name: Option<&str>| name.and_then(|n| order.iter().position(|o| *o == n));
        let Some(child_rank) = rank(self.name(child)) else {
            self.append_child(parent, child);
            return;
        };

        let position = self.children(parent).iter().position(|&existing| {
            match &self.nodes[existing.0].kind {
                NodeKind::Element { name, .. } => match rank(Some(name)) {
                    Some(r) => r > child_rank,
                    None => true,
                },
                _ => false,
            }
        });

        match position {
            Some(index) => self.insert_child(parent, index, child),
            None => self.append_child(parent, child),
        }
    }

    /// Return the first child named `name`, creating it in schema order when missing.
    pub fn ensure_child(&mut self, parent: NodeId, name: &str, order: &[&str]) -> NodeId {
        if let Some(existing) = self.first_child(parent, name) {
            return existing;
        }
        let child = self.create_element(name);
        self.insert_ordered(parent, child, order);
        child
    }

    /// Replace every child named after `child` with `child`, in schema order.
    pub fn replace_child(&mut self, parent: NodeId, child: NodeId, order: &[&str]) {
        if let Some(name) = self.name(child).map(str::to_string) {
            self.remove_children_named(parent, &name);
        }
        self.insert_ordered(parent, child, order);
    }
}

impl Default for XmlTree {
    fn default() -> Self {
        Self::new()
    }
}
