//! # Text Extraction
//!
//! Flattens a node subtree into line-framed text:
//!
//! ```text
//! ## Heading            ← text heavier than the baseline weight
//! - body line - wrapped ← everything else, inner breaks folded
//! ```
//!
//! Containers add no lines of their own; their children are walked in
//! document order. The output is trimmed.

use blockscope_document::{DocumentRuntime, Node, NodeId, TextProps, Visitor};

/// Font weights above this become heading lines
pub const HEADING_WEIGHT_THRESHOLD: u16 = 400;

/// Visitor that accumulates one line per text node
#[derive(Debug, Default)]
pub struct TextExtractor {
    output: String,
}

impl TextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulated text, trimmed
    pub fn finish(self) -> String {
        self.output.trim().to_string()
    }
}

impl Visitor for TextExtractor {
    fn visit_text(&mut self, _node: &Node, text: &TextProps) {
        let line = fold_line_breaks(&text.characters);

        if text.font_weight > HEADING_WEIGHT_THRESHOLD {
            self.output.push_str("## ");
        } else {
            self.output.push_str("- ");
        }
        self.output.push_str(&line);
        self.output.push('\n');
    }
}

/// Keep a node's text on a single output line
fn fold_line_breaks(characters: &str) -> String {
    characters
        .replace("\r\n", "\n")
        .replace(['\r', '\u{2028}', '\u{2029}'], "\n")
        .replace('\n', " - ")
}

/// Extract the text under `id`. Ids that do not resolve yield an empty string.
pub fn extract_text<D: DocumentRuntime + ?Sized>(doc: &D, id: &NodeId) -> String {
    match doc.node(id) {
        Some(node) => {
            let mut extractor = TextExtractor::new();
            extractor.visit_node(doc, node);
            extractor.finish()
        }
        None => {
            tracing::debug!("extract: node {} not found", id);
            String::new()
        }
    }
}
