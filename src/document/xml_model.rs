/*!
 * In-memory XML document model.
 *
 * Parses a part's bytes into an arena-style tree and serializes it back.
 * Every node keeps the raw bytes it was parsed from, so serializing an
 * unmutated tree reproduces the original input byte for byte. Text nodes
 * are the only mutable nodes: replacing their content swaps in an escaped
 * replacement string while all surrounding markup (element order,
 * attribute order, namespace declarations, whitespace inside tags) is
 * emitted from the original bytes untouched.
 */

use quick_xml::Reader;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesStart, Event};

use crate::errors::XmlError;

/// Stable index of a node inside its [`XmlTree`] arena.
///
/// Spans hold these indices instead of references so the tree can be
/// mutated after location without invalidating anything.
pub type NodeId = usize;

/// A single node in the parsed tree
#[derive(Debug, Clone)]
pub enum XmlNode {
    /// Synthetic document root holding all top-level nodes
    Document {
        /// Top-level children in document order
        children: Vec<NodeId>,
    },

    /// An element with a start and end tag
    Element {
        /// Qualified tag name (e.g. `w:t`)
        name: String,
        /// Whether the element carries `xml:space="preserve"`
        preserve_space: bool,
        /// Raw bytes of the start tag, attributes included
        raw_start: Vec<u8>,
        /// Raw bytes of the end tag
        raw_end: Vec<u8>,
        /// Children in document order
        children: Vec<NodeId>,
    },

    /// A self-closing element
    Empty {
        /// Qualified tag name
        name: String,
        /// Raw bytes of the tag
        raw: Vec<u8>,
    },

    /// A text node
    Text {
        /// Unescaped text content as parsed
        content: String,
        /// Raw (escaped) bytes as parsed
        raw: Vec<u8>,
        /// Replacement content written by the reinjector, if any
        replacement: Option<String>,
    },

    /// Markup that is carried through verbatim: XML declarations,
    /// processing instructions, comments, CDATA sections and doctypes
    Raw {
        /// Raw bytes as parsed
        raw: Vec<u8>,
    },
}

/// Arena-backed XML tree for one document part
#[derive(Debug, Clone)]
pub struct XmlTree {
    /// Node arena; index 0 is always the document root
    nodes: Vec<XmlNode>,
}

impl XmlTree {
    /// Parse a part's bytes into a tree.
    ///
    /// Rejects unbalanced tags and unresolvable entity references with
    /// [`XmlError::MalformedXml`] instead of guessing a repair.
    pub fn parse(bytes: &[u8]) -> Result<Self, XmlError> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(false);

        let mut nodes = vec![XmlNode::Document { children: Vec::new() }];
        // Stack of open elements; the root is always at the bottom
        let mut stack: Vec<NodeId> = vec![0];
        let mut buf = Vec::new();
        let mut last_pos = 0usize;

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| XmlError::MalformedXml(e.to_string()))?;
            let pos = reader.buffer_position();
            let raw = bytes[last_pos..pos].to_vec();
            last_pos = pos;

            match event {
                Event::Start(e) => {
                    let name = qualified_name(&e);
                    let preserve_space = has_preserve_space(&e)?;
                    let id = nodes.len();
                    nodes.push(XmlNode::Element {
                        name,
                        preserve_space,
                        raw_start: raw,
                        raw_end: Vec::new(),
                        children: Vec::new(),
                    });
                    attach(&mut nodes, *stack.last().expect("stack never empty"), id);
                    stack.push(id);
                }
                Event::End(_) => {
                    // quick-xml already validated that the name matches
                    let id = match stack.pop() {
                        Some(id) if id != 0 => id,
                        _ => {
                            return Err(XmlError::MalformedXml(
                                "closing tag without matching opening tag".to_string(),
                            ));
                        }
                    };
                    if let XmlNode::Element { raw_end, .. } = &mut nodes[id] {
                        *raw_end = raw;
                    }
                }
                Event::Empty(e) => {
                    let name = qualified_name(&e);
                    let id = nodes.len();
                    nodes.push(XmlNode::Empty { name, raw });
                    attach(&mut nodes, *stack.last().expect("stack never empty"), id);
                }
                Event::Text(e) => {
                    let content = e
                        .unescape()
                        .map_err(|e| XmlError::MalformedXml(e.to_string()))?
                        .into_owned();
                    let id = nodes.len();
                    nodes.push(XmlNode::Text {
                        content,
                        raw,
                        replacement: None,
                    });
                    attach(&mut nodes, *stack.last().expect("stack never empty"), id);
                }
                Event::CData(_)
                | Event::Comment(_)
                | Event::Decl(_)
                | Event::PI(_)
                | Event::DocType(_) => {
                    let id = nodes.len();
                    nodes.push(XmlNode::Raw { raw });
                    attach(&mut nodes, *stack.last().expect("stack never empty"), id);
                }
                Event::Eof => {
                    if stack.len() > 1 {
                        let open = match &nodes[*stack.last().expect("stack never empty")] {
                            XmlNode::Element { name, .. } => name.clone(),
                            _ => String::new(),
                        };
                        return Err(XmlError::MalformedXml(format!(
                            "unclosed element '{}' at end of input",
                            open
                        )));
                    }
                    break;
                }
            }
            buf.clear();
        }

        Ok(Self { nodes })
    }

    /// Serialize the tree back to bytes.
    ///
    /// Nodes without a replacement are emitted from their original raw
    /// bytes, so a freshly parsed tree round-trips byte-identically.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_node(Self::root(), &mut out);
        out
    }

    /// Index of the document root
    pub fn root() -> NodeId {
        0
    }

    /// Borrow a node by index
    pub fn node(&self, id: NodeId) -> &XmlNode {
        &self.nodes[id]
    }

    /// Number of nodes in the arena, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the arena holds only the root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Text content of a node, if it is a text node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.nodes.get(id) {
            Some(XmlNode::Text { content, .. }) => Some(content),
            _ => None,
        }
    }

    /// Write text into a text node.
    ///
    /// Writing content identical to the parsed content is a recorded
    /// no-op: the node keeps its original raw bytes so untouched parts
    /// stay byte-exact even when entity escaping differs.
    pub fn write_text(&mut self, id: NodeId, text: &str) -> Result<(), XmlError> {
        match self.nodes.get_mut(id) {
            Some(XmlNode::Text {
                content,
                replacement,
                ..
            }) => {
                if text != content.as_str() {
                    *replacement = Some(text.to_string());
                }
                Ok(())
            }
            _ => Err(XmlError::NotATextNode(id)),
        }
    }

    /// True when at least one text node carries a replacement
    pub fn is_mutated(&self) -> bool {
        self.nodes.iter().any(|n| {
            matches!(
                n,
                XmlNode::Text {
                    replacement: Some(_),
                    ..
                }
            )
        })
    }

    /// Count element nodes (start/end pairs and self-closing)
    pub fn element_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, XmlNode::Element { .. } | XmlNode::Empty { .. }))
            .count()
    }

    /// Count text nodes
    pub fn text_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, XmlNode::Text { .. }))
            .count()
    }

    fn write_node(&self, id: NodeId, out: &mut Vec<u8>) {
        match &self.nodes[id] {
            XmlNode::Document { children } => {
                for &child in children {
                    self.write_node(child, out);
                }
            }
            XmlNode::Element {
                raw_start,
                raw_end,
                children,
                ..
            } => {
                out.extend_from_slice(raw_start);
                for &child in children {
                    self.write_node(child, out);
                }
                out.extend_from_slice(raw_end);
            }
            XmlNode::Empty { raw, .. } | XmlNode::Raw { raw } => {
                out.extend_from_slice(raw);
            }
            XmlNode::Text {
                raw, replacement, ..
            } => match replacement {
                // Replaced content is escaped but never trimmed or
                // collapsed, which keeps xml:space="preserve" semantics
                Some(text) => out.extend_from_slice(partial_escape(text).as_bytes()),
                None => out.extend_from_slice(raw),
            },
        }
    }
}

/// Append a child to a parent's child list
fn attach(nodes: &mut [XmlNode], parent: NodeId, child: NodeId) {
    match &mut nodes[parent] {
        XmlNode::Document { children } | XmlNode::Element { children, .. } => {
            children.push(child);
        }
        _ => unreachable!("only document and element nodes are kept on the open stack"),
    }
}

/// Qualified tag name as a string
fn qualified_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Check a start tag for `xml:space="preserve"`
fn has_preserve_space(e: &BytesStart) -> Result<bool, XmlError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| XmlError::MalformedXml(e.to_string()))?;
        if attr.key.as_ref() == b"xml:space" && attr.value.as_ref() == b"preserve" {
            return Ok(true);
        }
    }
    Ok(false)
}
