//! # In-Memory Document
//!
//! Arena-backed [`DocumentRuntime`] used by tests and the command line
//! driver. Snapshots serialize to JSON so a document can live on disk
//! between runs.
//!
//! Mutations keep auto-layout frames resolved: after any change that can
//! affect a frame's contents, every auto-layout ancestor is laid out again
//! from the innermost outwards.

use crate::layout::{measure_text, resolve_auto_layout};
use crate::{
    AutoLayout, DocumentError, DocumentRuntime, FontName, FrameProps, Node, NodeData, NodeId, Rgb,
    TextProps,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::time::Duration;

/// Default size of a newly created frame
const DEFAULT_FRAME_SIZE: f64 = 100.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_key: Option<String>,
    root: NodeId,
    current_page: NodeId,
    nodes: BTreeMap<NodeId, Node>,
    #[serde(default)]
    selection: Vec<NodeId>,
    #[serde(default)]
    viewport: Vec<NodeId>,
    #[serde(default)]
    next_id: u64,

    /// Fonts are session state; a reopened document starts with none loaded
    #[serde(skip)]
    loaded_fonts: HashSet<FontName>,
    #[serde(skip)]
    notifications: Vec<String>,
    #[serde(skip)]
    font_load_delay: Option<Duration>,
}

impl MemoryDocument {
    /// Create a document with a root and a single empty page
    pub fn new(file_key: impl Into<String>) -> Self {
        let root = NodeId::from("0:0");
        let page = NodeId::from("0:1");

        let mut root_node = Node::new(root.clone(), "Document", NodeData::Document);
        root_node.children.push(page.clone());

        let mut page_node = Node::new(page.clone(), "Page 1", NodeData::Page);
        page_node.parent = Some(root.clone());

        let mut nodes = BTreeMap::new();
        nodes.insert(root.clone(), root_node);
        nodes.insert(page.clone(), page_node);

        Self {
            file_key: Some(file_key.into()),
            root,
            current_page: page,
            nodes,
            selection: Vec::new(),
            viewport: Vec::new(),
            next_id: 2,
            loaded_fonts: HashSet::new(),
            notifications: Vec::new(),
            font_load_delay: None,
        }
    }

    /// Simulate a slow typeface fetch
    pub fn with_font_load_delay(mut self, delay: Duration) -> Self {
        self.font_load_delay = Some(delay);
        self
    }

    /// Parse a JSON snapshot
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a snapshot from disk
    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    /// Write a snapshot to disk
    pub fn write(&self, path: &Path) -> Result<(), DocumentError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Notices shown via [`DocumentRuntime::notify`], oldest first
    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    /// Nodes the viewport was last focused on
    pub fn viewport(&self) -> &[NodeId] {
        &self.viewport
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a frame that already exists in the document (fixtures, imports)
    pub fn insert_frame(&mut self, parent: &NodeId, name: &str) -> Result<NodeId, DocumentError> {
        let id = self.create_frame();
        self.set_name(&id, name)?;
        self.append_child(parent, &id)?;
        Ok(id)
    }

    /// Add a text node that already exists in the document. Does not
    /// require the font to be loaded.
    pub fn insert_text(
        &mut self,
        parent: &NodeId,
        name: &str,
        characters: &str,
        font: FontName,
    ) -> Result<NodeId, DocumentError> {
        let id = self.allocate_id();
        let weight = font.weight();
        let text = TextProps {
            characters: characters.to_string(),
            font,
            font_weight: weight,
            ..TextProps::default()
        };
        let (width, height) = measure_text(&text);
        let node = Node::new(id.clone(), name, NodeData::Text(text)).with_size(width, height);
        self.nodes.insert(id.clone(), node);
        self.append_child(parent, &id)?;
        Ok(id)
    }

    fn allocate_id(&mut self) -> NodeId {
        // Snapshots written by hand may not carry a counter; skip taken ids
        loop {
            let id = NodeId::new(format!("1:{}", self.next_id));
            self.next_id += 1;
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    fn node_mut(&mut self, id: &NodeId) -> Result<&mut Node, DocumentError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| DocumentError::NodeNotFound(id.clone()))
    }

    fn text_mut(&mut self, id: &NodeId) -> Result<&mut TextProps, DocumentError> {
        match &mut self.node_mut(id)?.data {
            NodeData::Text(text) => Ok(text),
            _ => Err(DocumentError::NotText(id.clone())),
        }
    }

    fn frame_mut(&mut self, id: &NodeId) -> Result<&mut FrameProps, DocumentError> {
        match &mut self.node_mut(id)?.data {
            NodeData::Frame(frame) => Ok(frame),
            _ => Err(DocumentError::NotAFrame(id.clone())),
        }
    }

    fn ensure_font_loaded(&self, font: &FontName) -> Result<(), DocumentError> {
        if self.loaded_fonts.contains(font) {
            Ok(())
        } else {
            Err(DocumentError::FontNotLoaded(font.clone()))
        }
    }

    fn is_ancestor(&self, ancestor: &NodeId, of: &NodeId) -> bool {
        let mut current = Some(of.clone());
        while let Some(id) = current {
            if &id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|node| node.parent.clone());
        }
        false
    }

    fn detach(&mut self, id: &NodeId) {
        let parent = self.nodes.get(id).and_then(|node| node.parent.clone());
        if let Some(parent) = parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|child| child != id);
            }
            if let Some(node) = self.nodes.get_mut(id) {
                node.parent = None;
            }
            self.relayout_from(&parent);
        }
    }

    fn resize_text_to_fit(&mut self, id: &NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            if let NodeData::Text(text) = &node.data {
                let (width, height) = measure_text(text);
                node.width = width;
                node.height = height;
            }
        }
        self.relayout_parent(id);
    }

    fn relayout_parent(&mut self, id: &NodeId) {
        if let Some(parent) = self.nodes.get(id).and_then(|node| node.parent.clone()) {
            self.relayout_from(&parent);
        }
    }

    /// Lay out `start` and every ancestor above it
    fn relayout_from(&mut self, start: &NodeId) {
        let mut current = Some(start.clone());
        while let Some(id) = current {
            self.relayout(&id);
            current = self.nodes.get(&id).and_then(|node| node.parent.clone());
        }
    }

    fn relayout(&mut self, id: &NodeId) {
        let frame = match self.nodes.get(id) {
            Some(node) if node.as_frame().is_some() => node.clone(),
            _ => return,
        };

        let mut children: Vec<Node> = frame
            .children
            .iter()
            .filter_map(|child| self.nodes.remove(child))
            .collect();

        let size = {
            let mut refs: Vec<&mut Node> = children.iter_mut().collect();
            resolve_auto_layout(&frame, &mut refs)
        };

        for child in children {
            self.nodes.insert(child.id.clone(), child);
        }

        if let Some((width, height)) = size {
            if let Some(node) = self.nodes.get_mut(id) {
                node.width = width;
                node.height = height;
            }
        }
    }

    fn copy_subtree(&mut self, id: &NodeId, parent: Option<NodeId>) -> Result<NodeId, DocumentError> {
        let original = self
            .nodes
            .get(id)
            .cloned()
            .ok_or_else(|| DocumentError::NodeNotFound(id.clone()))?;

        let copy_id = self.allocate_id();
        let mut copy = original.clone();
        copy.id = copy_id.clone();
        copy.parent = parent;
        copy.children = Vec::new();
        self.nodes.insert(copy_id.clone(), copy);

        let children = original
            .children
            .iter()
            .map(|child| self.copy_subtree(child, Some(copy_id.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(copy) = self.nodes.get_mut(&copy_id) {
            copy.children = children;
        }
        Ok(copy_id)
    }

    fn collect_subtree(&self, id: &NodeId, out: &mut Vec<NodeId>) {
        out.push(id.clone());
        if let Some(node) = self.nodes.get(id) {
            for child in &node.children {
                self.collect_subtree(child, out);
            }
        }
    }
}

#[async_trait]
impl DocumentRuntime for MemoryDocument {
    fn file_key(&self) -> Option<String> {
        self.file_key.clone()
    }

    fn root(&self) -> NodeId {
        self.root.clone()
    }

    fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn create_page(&mut self) -> NodeId {
        let id = self.allocate_id();
        let pages = self.children(&self.root).len();

        let mut page = Node::new(id.clone(), format!("Page {}", pages + 1), NodeData::Page);
        page.parent = Some(self.root.clone());
        self.nodes.insert(id.clone(), page);

        if let Some(root) = self.nodes.get_mut(&self.root) {
            root.children.push(id.clone());
        }
        id
    }

    fn create_frame(&mut self) -> NodeId {
        let id = self.allocate_id();
        let frame = FrameProps {
            fills: vec![Rgb::WHITE],
            ..FrameProps::default()
        };
        let node = Node::new(id.clone(), "Frame", NodeData::Frame(frame))
            .with_size(DEFAULT_FRAME_SIZE, DEFAULT_FRAME_SIZE);
        self.nodes.insert(id.clone(), node);
        id
    }

    fn create_text(&mut self) -> NodeId {
        let id = self.allocate_id();
        let text = TextProps::default();
        let (width, height) = measure_text(&text);
        let node = Node::new(id.clone(), "Text", NodeData::Text(text)).with_size(width, height);
        self.nodes.insert(id.clone(), node);
        id
    }

    fn clone_node(&mut self, id: &NodeId) -> Result<NodeId, DocumentError> {
        if id == &self.root {
            return Err(DocumentError::NotAContainer(id.clone()));
        }
        self.copy_subtree(id, None)
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DocumentError> {
        let parent_node = self
            .nodes
            .get(parent)
            .ok_or_else(|| DocumentError::NodeNotFound(parent.clone()))?;
        if !parent_node.is_container() {
            return Err(DocumentError::NotAContainer(parent.clone()));
        }
        if !self.nodes.contains_key(child) {
            return Err(DocumentError::NodeNotFound(child.clone()));
        }
        if child == &self.root || self.is_ancestor(child, parent) {
            return Err(DocumentError::CycleDetected);
        }

        self.detach(child);

        self.node_mut(parent)?.children.push(child.clone());
        self.node_mut(child)?.parent = Some(parent.clone());
        self.relayout_from(parent);
        Ok(())
    }

    fn remove(&mut self, id: &NodeId) -> Result<(), DocumentError> {
        if id == &self.root {
            return Err(DocumentError::CannotRemoveRoot);
        }
        if !self.nodes.contains_key(id) {
            return Err(DocumentError::NodeNotFound(id.clone()));
        }

        self.detach(id);

        let mut removed = Vec::new();
        self.collect_subtree(id, &mut removed);
        for node in &removed {
            self.nodes.remove(node);
        }

        self.selection.retain(|node| !removed.contains(node));
        self.viewport.retain(|node| !removed.contains(node));

        if removed.contains(&self.current_page) {
            self.current_page = self
                .children(&self.root)
                .into_iter()
                .next()
                .unwrap_or_else(|| self.root.clone());
        }

        tracing::trace!("removed {} node(s) under {}", removed.len(), id);
        Ok(())
    }

    fn set_name(&mut self, id: &NodeId, name: &str) -> Result<(), DocumentError> {
        self.node_mut(id)?.name = name.to_string();
        Ok(())
    }

    fn set_position(&mut self, id: &NodeId, x: f64, y: f64) -> Result<(), DocumentError> {
        let node = self.node_mut(id)?;
        node.x = x;
        node.y = y;
        Ok(())
    }

    fn resize(&mut self, id: &NodeId, width: f64, height: f64) -> Result<(), DocumentError> {
        let node = self.node_mut(id)?;
        node.width = width;
        node.height = height;
        self.relayout_parent(id);
        Ok(())
    }

    fn set_auto_layout(&mut self, id: &NodeId, layout: AutoLayout) -> Result<(), DocumentError> {
        self.frame_mut(id)?.layout = layout;
        self.relayout_from(id);
        Ok(())
    }

    fn set_fills(&mut self, id: &NodeId, fills: Vec<Rgb>) -> Result<(), DocumentError> {
        match &mut self.node_mut(id)?.data {
            NodeData::Frame(frame) => frame.fills = fills,
            NodeData::Rectangle { fills: current } => *current = fills,
            _ => return Err(DocumentError::NotAFrame(id.clone())),
        }
        Ok(())
    }

    fn set_corner_radius(&mut self, id: &NodeId, radius: f64) -> Result<(), DocumentError> {
        self.frame_mut(id)?.corner_radius = radius;
        Ok(())
    }

    fn set_font(&mut self, id: &NodeId, font: FontName) -> Result<(), DocumentError> {
        self.ensure_font_loaded(&font)?;
        let text = self.text_mut(id)?;
        text.font_weight = font.weight();
        text.font = font;
        self.resize_text_to_fit(id);
        Ok(())
    }

    fn set_font_size(&mut self, id: &NodeId, size: f64) -> Result<(), DocumentError> {
        let font = self.text_mut(id)?.font.clone();
        self.ensure_font_loaded(&font)?;
        self.text_mut(id)?.font_size = size;
        self.resize_text_to_fit(id);
        Ok(())
    }

    fn set_characters(&mut self, id: &NodeId, characters: &str) -> Result<(), DocumentError> {
        let font = self.text_mut(id)?.font.clone();
        self.ensure_font_loaded(&font)?;
        self.text_mut(id)?.characters = characters.to_string();
        self.resize_text_to_fit(id);
        Ok(())
    }

    async fn load_font(&mut self, font: &FontName) -> Result<(), DocumentError> {
        match self.font_load_delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }
        tracing::trace!("loaded font {}", font);
        self.loaded_fonts.insert(font.clone());
        Ok(())
    }

    fn current_page(&self) -> NodeId {
        self.current_page.clone()
    }

    fn set_current_page(&mut self, page: &NodeId) -> Result<(), DocumentError> {
        match self.nodes.get(page) {
            Some(node) if matches!(node.data, NodeData::Page) => {
                self.current_page = page.clone();
                Ok(())
            }
            Some(_) => Err(DocumentError::NotAContainer(page.clone())),
            None => Err(DocumentError::NodeNotFound(page.clone())),
        }
    }

    fn selection(&self) -> Vec<NodeId> {
        self.selection.clone()
    }

    fn set_selection(&mut self, ids: Vec<NodeId>) {
        self.selection = ids
            .into_iter()
            .filter(|id| self.nodes.contains_key(id))
            .collect();
    }

    fn scroll_and_zoom_into_view(&mut self, ids: &[NodeId]) {
        self.viewport = ids
            .iter()
            .filter(|id| self.nodes.contains_key(*id))
            .cloned()
            .collect();
    }

    fn notify(&mut self, message: &str) {
        tracing::info!("notice: {}", message);
        self.notifications.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LayoutMode, Padding};

    #[test]
    fn test_new_document_has_one_page() {
        let doc = MemoryDocument::new("file");
        let pages = doc.children(&doc.root());

        assert_eq!(pages.len(), 1);
        assert_eq!(doc.current_page(), pages[0]);
        assert_eq!(doc.file_key(), Some("file".to_string()));
    }

    #[test]
    fn test_created_nodes_are_detached() {
        let mut doc = MemoryDocument::new("file");
        let frame = doc.create_frame();

        assert!(doc.node(&frame).unwrap().parent.is_none());
        assert!(doc.children(&doc.current_page()).is_empty());
    }

    #[test]
    fn test_append_moves_node() {
        let mut doc = MemoryDocument::new("file");
        let page = doc.current_page();
        let a = doc.insert_frame(&page, "A").unwrap();
        let b = doc.insert_frame(&page, "B").unwrap();

        doc.append_child(&a, &b).unwrap();

        assert_eq!(doc.children(&page), vec![a.clone()]);
        assert_eq!(doc.children(&a), vec![b.clone()]);
        assert_eq!(doc.node(&b).unwrap().parent, Some(a));
    }

    #[test]
    fn test_append_rejects_cycles() {
        let mut doc = MemoryDocument::new("file");
        let page = doc.current_page();
        let outer = doc.insert_frame(&page, "Outer").unwrap();
        let inner = doc.insert_frame(&outer, "Inner").unwrap();

        let result = doc.append_child(&inner, &outer);
        assert!(matches!(result, Err(DocumentError::CycleDetected)));
    }

    #[test]
    fn test_remove_drops_descendants_and_selection() {
        let mut doc = MemoryDocument::new("file");
        let page = doc.current_page();
        let outer = doc.insert_frame(&page, "Outer").unwrap();
        let text = doc
            .insert_text(&outer, "Label", "hello", FontName::default())
            .unwrap();
        doc.set_selection(vec![text.clone()]);

        doc.remove(&outer).unwrap();

        assert!(!doc.contains(&outer));
        assert!(!doc.contains(&text));
        assert!(doc.selection().is_empty());
        assert!(doc.children(&page).is_empty());
    }

    #[test]
    fn test_set_characters_requires_loaded_font() {
        let mut doc = MemoryDocument::new("file");
        let text = doc.create_text();

        let result = doc.set_characters(&text, "hello");
        assert!(matches!(result, Err(DocumentError::FontNotLoaded(_))));
    }

    #[tokio::test]
    async fn test_set_characters_after_font_load() {
        let mut doc = MemoryDocument::new("file");
        let text = doc.create_text();

        doc.load_font(&FontName::default()).await.unwrap();
        doc.set_characters(&text, "hello\nworld!").unwrap();

        let node = doc.node(&text).unwrap();
        assert_eq!(node.as_text().unwrap().characters, "hello\nworld!");
        assert!(node.height > 0.0);
        assert!(node.width > 0.0);
    }

    #[test]
    fn test_clone_is_deep_and_independent() {
        let mut doc = MemoryDocument::new("file");
        let page = doc.current_page();
        let frame = doc.insert_frame(&page, "Card").unwrap();
        let text = doc
            .insert_text(&frame, "Label", "original", FontName::default())
            .unwrap();

        let copy = doc.clone_node(&frame).unwrap();
        let copy_children = doc.children(&copy);

        assert_ne!(copy, frame);
        assert_eq!(copy_children.len(), 1);
        assert_ne!(copy_children[0], text);
        assert!(doc.node(&copy).unwrap().parent.is_none());

        doc.remove(&frame).unwrap();
        let copied_text = doc.node(&copy_children[0]).unwrap();
        assert_eq!(copied_text.as_text().unwrap().characters, "original");
    }

    #[test]
    fn test_auto_layout_resolves_through_ancestors() {
        let mut doc = MemoryDocument::new("file");
        let page = doc.current_page();
        let outer = doc.insert_frame(&page, "Outer").unwrap();
        doc.set_auto_layout(
            &outer,
            AutoLayout::hug(LayoutMode::Vertical).with_padding(Padding::uniform(10.0)),
        )
        .unwrap();
        let inner = doc.insert_frame(&outer, "Inner").unwrap();

        assert_eq!(doc.node(&outer).unwrap().height, 120.0);

        doc.resize(&inner, 50.0, 40.0).unwrap();
        let outer_node = doc.node(&outer).unwrap();
        assert_eq!((outer_node.width, outer_node.height), (70.0, 60.0));
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut doc = MemoryDocument::new("abc");
        let page = doc.current_page();
        let frame = doc.insert_frame(&page, "Screen").unwrap();
        doc.insert_text(&frame, "Title", "Login", FontName::inter("Bold"))
            .unwrap();

        let json = doc.to_json().unwrap();
        let reopened = MemoryDocument::from_json(&json).unwrap();

        assert_eq!(reopened.len(), doc.len());
        assert_eq!(reopened.children(&frame), doc.children(&frame));
        assert_eq!(reopened.file_key(), Some("abc".to_string()));
    }

    #[test]
    fn test_allocate_skips_existing_ids() {
        let json = r#"{
            "root": "0:0",
            "currentPage": "0:1",
            "nodes": {
                "0:0": {"id": "0:0", "name": "Document", "children": ["0:1"], "data": {"type": "DOCUMENT"}},
                "0:1": {"id": "0:1", "name": "Page 1", "parent": "0:0", "children": ["1:0"], "data": {"type": "PAGE"}},
                "1:0": {"id": "1:0", "name": "Existing", "parent": "0:1", "data": {"type": "FRAME"}}
            }
        }"#;
        let mut doc = MemoryDocument::from_json(json).unwrap();

        let created = doc.create_frame();
        assert_ne!(created, NodeId::from("1:0"));
        assert_eq!(doc.node(&NodeId::from("1:0")).unwrap().name, "Existing");
    }
}
