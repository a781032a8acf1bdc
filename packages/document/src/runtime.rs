//! # Document Runtime
//!
//! The narrow capability set through which the host touches its document.
//!
//! Everything above this trait treats nodes as opaque ids. Lookups return
//! `None` for ids that no longer resolve, so callers decide how to degrade;
//! mutations on missing nodes return [`DocumentError::NodeNotFound`].
//!
//! Newly created frames and text nodes are detached until appended.

use crate::{AutoLayout, DocumentError, FontName, Node, NodeId, Rgb};
use async_trait::async_trait;

#[async_trait]
pub trait DocumentRuntime: Send {
    /// Identifier of the open file, if the host exposes one
    fn file_key(&self) -> Option<String>;

    /// The document root (parent of all pages)
    fn root(&self) -> NodeId;

    /// Resolve a node by id
    fn node(&self, id: &NodeId) -> Option<&Node>;

    /// First direct child of `parent` matching `predicate`
    fn find_child(&self, parent: &NodeId, predicate: &dyn Fn(&Node) -> bool) -> Option<NodeId> {
        let parent = self.node(parent)?;
        parent
            .children
            .iter()
            .filter_map(|id| self.node(id))
            .find(|child| predicate(child))
            .map(|child| child.id.clone())
    }

    /// Direct children of a node (empty for missing nodes and leaves)
    fn children(&self, id: &NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Create a page appended to the document root
    fn create_page(&mut self) -> NodeId;

    /// Create a detached, empty frame
    fn create_frame(&mut self) -> NodeId;

    /// Create a detached, empty text node in the default font
    fn create_text(&mut self) -> NodeId;

    /// Deep-copy a subtree. The copy gets fresh ids, is detached and keeps
    /// no link to the original.
    fn clone_node(&mut self, id: &NodeId) -> Result<NodeId, DocumentError>;

    /// Append `child` as the last child of `parent`, moving it if attached
    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DocumentError>;

    /// Remove a node and all of its descendants
    fn remove(&mut self, id: &NodeId) -> Result<(), DocumentError>;

    fn set_name(&mut self, id: &NodeId, name: &str) -> Result<(), DocumentError>;

    fn set_position(&mut self, id: &NodeId, x: f64, y: f64) -> Result<(), DocumentError>;

    fn resize(&mut self, id: &NodeId, width: f64, height: f64) -> Result<(), DocumentError>;

    fn set_auto_layout(&mut self, id: &NodeId, layout: AutoLayout) -> Result<(), DocumentError>;

    fn set_fills(&mut self, id: &NodeId, fills: Vec<Rgb>) -> Result<(), DocumentError>;

    fn set_corner_radius(&mut self, id: &NodeId, radius: f64) -> Result<(), DocumentError>;

    /// Change a text node's font; the font must be loaded
    fn set_font(&mut self, id: &NodeId, font: FontName) -> Result<(), DocumentError>;

    fn set_font_size(&mut self, id: &NodeId, size: f64) -> Result<(), DocumentError>;

    /// Replace a text node's characters; its current font must be loaded
    fn set_characters(&mut self, id: &NodeId, characters: &str) -> Result<(), DocumentError>;

    /// Make a font available for text edits. May suspend while the
    /// typeface is fetched.
    async fn load_font(&mut self, font: &FontName) -> Result<(), DocumentError>;

    fn current_page(&self) -> NodeId;

    fn set_current_page(&mut self, page: &NodeId) -> Result<(), DocumentError>;

    fn selection(&self) -> Vec<NodeId>;

    fn set_selection(&mut self, ids: Vec<NodeId>);

    /// Scroll and zoom the viewport onto the given nodes (missing ids are skipped)
    fn scroll_and_zoom_into_view(&mut self, ids: &[NodeId]);

    /// Show a user-visible notice
    fn notify(&mut self, message: &str);
}
