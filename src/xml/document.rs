/*!
 * Arena-backed XML document.
 *
 * The same type is used both ways: the XLIFF encoder builds a document node
 * by node and serializes it, and the decoder gets one back from
 * [`Document::from_xml`]. Parsing never fails outright; problems are
 * collected and exposed through [`Document::has_errors`] and
 * [`Document::get_errors`], and whatever could be recovered stays
 * available in the tree.
 */

use super::parser::{self, ParseMode};
use super::path;
use super::traversal::{DepthFirst, Tree};

/// Handle to a node inside a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// What a node is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The invisible root holding the top-level nodes
    Document,
    /// An element with its attributes in source order
    Element {
        name: String,
        attributes: Vec<(String, String)>,
    },
    /// Character data, CDATA included
    Text(String),
    Comment(String),
    ProcessingInstruction(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// XML document tree plus the errors met while parsing it
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    errors: Vec<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document holding only the root node
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
            errors: Vec::new(),
        }
    }

    /// Parse strict XML. DOCTYPE declarations are refused, never processed.
    pub fn from_xml(text: &str) -> Self {
        parser::parse(text, ParseMode::Xml)
    }

    /// Parse an HTML fragment leniently; the fragment ends up under a synthetic `body` element
    pub fn from_html(text: &str) -> Self {
        parser::parse(text, ParseMode::Html)
    }

    /// Whether parsing reported anything
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Parse errors in the order they were met
    pub fn get_errors(&self) -> &[String] {
        &self.errors
    }

    pub(crate) fn push_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// The invisible document root
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The first top-level element, if any
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(self.root())
            .iter()
            .copied()
            .find(|id| matches!(self.kind(*id), NodeKind::Element { .. }))
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// All attributes of an element, empty for other nodes
    pub fn attributes(&self, node: NodeId) -> &[(String, String)] {
        match self.kind(node) {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Attribute lookup ignoring any namespace prefix, e.g. `lang` finds `xml:lang`
    pub fn attr_local(&self, node: NodeId, local: &str) -> Option<&str> {
        self.attributes(node)
            .iter()
            .find(|(name, _)| local_name(name) == local)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, node: NodeId) -> String {
        let mut text = String::new();
        for id in DepthFirst::new(node).iter(self) {
            if let NodeKind::Text(chunk) = self.kind(id) {
                text.push_str(chunk);
            }
        }
        text
    }

    /// Element children only
    pub fn child_elements(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(node)
            .iter()
            .copied()
            .filter(|id| matches!(self.kind(*id), NodeKind::Element { .. }))
    }

    /// Whether anything other than elements and text exists in the document
    pub fn contains_disallowed_node_type(&self) -> bool {
        self.subtree_contains_disallowed_node_type(self.root())
    }

    /// Same check limited to the subtree under `node`
    pub fn subtree_contains_disallowed_node_type(&self, node: NodeId) -> bool {
        DepthFirst::new(node).iter(self).any(|id| {
            matches!(
                self.kind(id),
                NodeKind::Comment(_) | NodeKind::ProcessingInstruction(_)
            )
        })
    }

    /// Nodes matched by a path expression evaluated from the root
    pub fn select(&self, expr: &str) -> Vec<NodeId> {
        path::select(self, self.root(), expr).nodes
    }

    /// Nodes matched by a path expression evaluated from `node`
    pub fn select_from(&self, node: NodeId, expr: &str) -> Vec<NodeId> {
        path::select(self, node, expr).nodes
    }

    /// First value matched by a path: the attribute value for `.../@name`, else the text content
    pub fn select_value(&self, expr: &str) -> Option<String> {
        path::select(self, self.root(), expr).first_value(self)
    }

    // -- building ---------------------------------------------------------

    fn push_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append a new element under `parent`
    pub fn create_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        self.push_node(
            parent,
            NodeKind::Element {
                name: name.to_string(),
                attributes: Vec::new(),
            },
        )
    }

    /// Set or replace an attribute; ignored on non-element nodes
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[node.0].kind {
            match attributes.iter_mut().find(|(n, _)| n == name) {
                Some(slot) => slot.1 = value.to_string(),
                None => attributes.push((name.to_string(), value.to_string())),
            }
        }
    }

    /// Append a text node under `parent`
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push_node(parent, NodeKind::Text(text.to_string()))
    }

    /// Element with a single text child, the common leaf of interchange formats
    pub fn create_text_element(&mut self, parent: NodeId, name: &str, text: &str) -> NodeId {
        let element = self.create_element(parent, name);
        if !text.is_empty() {
            self.append_text(element, text);
        }
        element
    }

    pub(crate) fn append_comment(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push_node(parent, NodeKind::Comment(text.to_string()))
    }

    pub(crate) fn append_processing_instruction(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push_node(parent, NodeKind::ProcessingInstruction(text.to_string()))
    }

    // -- serializing ------------------------------------------------------

    /// Serialize with an XML declaration and two-space indentation.
    /// Elements holding text are written inline so no whitespace leaks into content.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        for child in self.children(self.root()) {
            self.write_node(*child, 0, &mut out);
            out.push('\n');
        }
        out
    }

    fn write_node(&self, node: NodeId, depth: usize, out: &mut String) {
        match self.kind(node) {
            NodeKind::Document => {}
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::ProcessingInstruction(text) => {
                out.push_str("<?");
                out.push_str(text);
                out.push_str("?>");
            }
            NodeKind::Element { name, attributes } => {
                out.push('<');
                out.push_str(name);
                for (key, value) in attributes {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(value));
                    out.push('"');
                }

                let children = self.children(node);
                if children.is_empty() {
                    out.push_str("/>");
                    return;
                }
                out.push('>');

                let block = children
                    .iter()
                    .all(|id| matches!(self.kind(*id), NodeKind::Element { .. }));
                for child in children {
                    if block {
                        out.push('\n');
                        out.push_str(&"  ".repeat(depth + 1));
                    }
                    self.write_node(*child, depth + 1, out);
                }
                if block {
                    out.push('\n');
                    out.push_str(&"  ".repeat(depth));
                }

                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }
}

impl Tree for Document {
    type Node = NodeId;

    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        match self.kind(node) {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.attributes(node)
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Name without its namespace prefix
pub fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// Characters XML 1.0 allows in a document
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

/// Escape special XML characters in character data. Characters XML cannot carry are dropped.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars().filter(|c| is_xml_char(*c)) {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            // a literal CR would be normalized away by the reader
            '\r' => escaped.push_str("&#13;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape special XML characters in an attribute value. Characters XML cannot carry are dropped.
pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars().filter(|c| is_xml_char(*c)) {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
