//! Error types for document operations

use crate::{FontName, NodeId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node cannot have children: {0}")]
    NotAContainer(NodeId),

    #[error("Node is not text: {0}")]
    NotText(NodeId),

    #[error("Node is not a frame: {0}")]
    NotAFrame(NodeId),

    #[error("Font not loaded: {0}")]
    FontNotLoaded(FontName),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Cannot remove the document root")]
    CannotRemoveRoot,

    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
