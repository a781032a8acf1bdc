//! # Document-Embedded Store
//!
//! Persists the feature record set inside the document itself, which has
//! no key-value storage of its own. Two named regions live on a reserved
//! page:
//!
//! ```text
//! page "figma-plugin-json"
//! ├── frame "json"     ← exactly one text node: the JSON array
//! └── frame "images"   ← reserved; image references stay pointers
//! ```
//!
//! Saving is find-or-create on the containers and destructive-replace on
//! their contents. Loading is best effort: anything missing or unreadable
//! yields an empty record set.

use crate::EditorError;
use blockscope_document::{AutoLayout, DocumentError, DocumentRuntime, FontName, LayoutMode, NodeId, Padding};
use blockscope_proto::Feature;

/// Reserved page holding the persisted records
pub const STORAGE_PAGE_NAME: &str = "figma-plugin-json";

/// Container of the JSON text node
pub const JSON_FRAME_NAME: &str = "json";

/// Container reserved for materialized images
pub const IMAGES_FRAME_NAME: &str = "images";

/// Horizontal gap between the json and images frames
const FRAME_GAP: f64 = 100.0;

/// Reads and writes feature records in a document
#[derive(Debug, Clone)]
pub struct FeatureStore {
    pub page_name: String,
    pub json_frame_name: String,
    pub images_frame_name: String,
    pub font: FontName,
}

impl Default for FeatureStore {
    fn default() -> Self {
        Self {
            page_name: STORAGE_PAGE_NAME.to_string(),
            json_frame_name: JSON_FRAME_NAME.to_string(),
            images_frame_name: IMAGES_FRAME_NAME.to_string(),
            font: FontName::inter("Regular"),
        }
    }
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is stored with `features`
    pub async fn save<D: DocumentRuntime + ?Sized>(
        &self,
        doc: &mut D,
        features: &[Feature],
    ) -> Result<(), EditorError> {
        let blob = serde_json::to_string_pretty(features)?;

        let root = doc.root();
        let page = match doc.find_child(&root, &|node| node.name == self.page_name) {
            Some(page) => page,
            None => {
                let page = doc.create_page();
                doc.set_name(&page, &self.page_name)?;
                page
            }
        };

        let json_frame = find_or_create_frame(doc, &page, &self.json_frame_name, |_| (0.0, 0.0))?;
        let images_frame = find_or_create_frame(doc, &page, &self.images_frame_name, |doc| {
            let json_width = doc.node(&json_frame).map(|node| node.width).unwrap_or(0.0);
            (json_width + FRAME_GAP, 0.0)
        })?;

        clear_children(doc, &json_frame)?;
        clear_children(doc, &images_frame)?;

        doc.load_font(&self.font).await?;
        let text = doc.create_text();
        doc.set_font(&text, self.font.clone())?;
        doc.set_characters(&text, &blob)?;
        doc.append_child(&json_frame, &text)?;
        doc.set_position(&text, 0.0, 0.0)?;

        let (width, height) = doc
            .node(&text)
            .map(|node| (node.width, node.height))
            .ok_or_else(|| DocumentError::NodeNotFound(text.clone()))?;
        doc.resize(&json_frame, width, height)?;

        if !doc.children(&images_frame).is_empty() {
            doc.set_auto_layout(
                &images_frame,
                AutoLayout::hug(LayoutMode::Horizontal)
                    .with_item_spacing(20.0)
                    .with_padding(Padding::horizontal(20.0)),
            )?;
        }

        tracing::info!("saved {} feature(s) to page {:?}", features.len(), self.page_name);
        Ok(())
    }

    /// Read the stored records. Missing regions, an empty json frame, or an
    /// unparseable blob all give an empty set.
    pub fn load<D: DocumentRuntime + ?Sized>(&self, doc: &D) -> Vec<Feature> {
        let Some(blob) = self.read_blob(doc) else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<Feature>>(&blob) {
            Ok(features) => {
                tracing::debug!("loaded {} feature(s)", features.len());
                features
            }
            Err(error) => {
                tracing::warn!("Error parsing saved features: {}", error);
                Vec::new()
            }
        }
    }

    fn read_blob<D: DocumentRuntime + ?Sized>(&self, doc: &D) -> Option<String> {
        let page = doc.find_child(&doc.root(), &|node| node.name == self.page_name)?;
        let json_frame = doc.find_child(&page, &|node| node.name == self.json_frame_name)?;
        let first = doc.children(&json_frame).into_iter().next()?;

        match doc.node(&first).and_then(|node| node.as_text()) {
            Some(text) => Some(text.characters.clone()),
            None => {
                tracing::warn!("first child of {:?} is not a text node", self.json_frame_name);
                None
            }
        }
    }
}

/// Find a named frame under `parent`, creating it at `position` if absent
fn find_or_create_frame<D, F>(
    doc: &mut D,
    parent: &NodeId,
    name: &str,
    position: F,
) -> Result<NodeId, DocumentError>
where
    D: DocumentRuntime + ?Sized,
    F: FnOnce(&D) -> (f64, f64),
{
    if let Some(existing) = doc.find_child(parent, &|node| node.name == name) {
        return Ok(existing);
    }

    let (x, y) = position(doc);
    let frame = doc.create_frame();
    doc.set_name(&frame, name)?;
    doc.append_child(parent, &frame)?;
    doc.set_position(&frame, x, y)?;
    Ok(frame)
}

fn clear_children<D: DocumentRuntime + ?Sized>(doc: &mut D, id: &NodeId) -> Result<(), DocumentError> {
    for child in doc.children(id) {
        doc.remove(&child)?;
    }
    Ok(())
}
