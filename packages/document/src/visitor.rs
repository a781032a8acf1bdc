use crate::{DocumentRuntime, Node, TextProps};

/// Visitor pattern for walking a document subtree immutably
///
/// The default implementations walk the whole subtree depth-first in
/// document order, visiting a node before its children. Override specific
/// visit_* methods to act on nodes.
pub trait Visitor: Sized {
    fn visit_node<D: DocumentRuntime + ?Sized>(&mut self, doc: &D, node: &Node) {
        walk_node(self, doc, node);
    }

    fn visit_text(&mut self, _node: &Node, _text: &TextProps) {
        // Leaf node, no children to walk
    }
}

/// Default walk: text callback for text nodes, then children in order.
/// Children that no longer resolve are skipped.
pub fn walk_node<V: Visitor, D: DocumentRuntime + ?Sized>(visitor: &mut V, doc: &D, node: &Node) {
    if let Some(text) = node.as_text() {
        visitor.visit_text(node, text);
    }

    for child in &node.children {
        if let Some(child) = doc.node(child) {
            visitor.visit_node(doc, child);
        }
    }
}
