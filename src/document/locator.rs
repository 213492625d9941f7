/*!
 * Text span location.
 *
 * Walks a parsed tree and collects the translatable spans in document
 * order. Only leaf text nodes whose nearest element ancestor is a
 * recognized run-of-text container become spans; text that lives in
 * structural elements (relationship identifiers, field instructions,
 * numbering counters) is excluded by ancestor tag, never by content
 * heuristics, so the classifier only ever sees genuine prose candidates.
 */

use std::collections::HashSet;

use crate::document::xml_model::{NodeId, XmlNode, XmlTree};
use crate::translation::classifier::Verdict;

/// A located unit of text tied to one XML text node.
///
/// Created during location, annotated by classification and dispatch,
/// consumed by reinjection. Spans hold arena indices rather than
/// references and are discarded at the end of the run.
#[derive(Debug, Clone)]
pub struct Span {
    /// Arena index of the originating text node
    pub node: NodeId,
    /// Resolved text content as parsed
    pub content: String,
    /// Whether an ancestor carries xml:space="preserve"
    pub preserve_space: bool,
    /// Classifier verdict, set by the classification pass
    pub verdict: Option<Verdict>,
    /// Replacement text assigned by dispatch, if any
    pub replacement: Option<String>,
}

/// Collect spans from a parsed tree in document order.
///
/// `text_containers` is the set of element names recognized as runs of
/// text (for WordprocessingML this is `w:t`).
pub fn locate_spans(tree: &XmlTree, text_containers: &HashSet<String>) -> Vec<Span> {
    let mut spans = Vec::new();
    walk(tree, XmlTree::root(), None, false, text_containers, &mut spans);
    spans
}

fn walk(
    tree: &XmlTree,
    id: NodeId,
    parent_name: Option<&str>,
    preserve_space: bool,
    text_containers: &HashSet<String>,
    spans: &mut Vec<Span>,
) {
    match tree.node(id) {
        XmlNode::Document { children } => {
            for &child in children {
                walk(tree, child, None, false, text_containers, spans);
            }
        }
        XmlNode::Element {
            name,
            preserve_space: marked,
            children,
            ..
        } => {
            // xml:space inherits down the tree until overridden
            let preserve = preserve_space || *marked;
            for &child in children {
                walk(tree, child, Some(name), preserve, text_containers, spans);
            }
        }
        XmlNode::Text { content, .. } => {
            if let Some(name) = parent_name {
                if text_containers.contains(name) {
                    spans.push(Span {
                        node: id,
                        content: content.clone(),
                        preserve_space,
                        verdict: None,
                        replacement: None,
                    });
                }
            }
        }
        XmlNode::Empty { .. } | XmlNode::Raw { .. } => {}
    }
}
