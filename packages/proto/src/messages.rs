//! Client ↔ host messages
//!
//! Both directions are one-way and fire-and-forget. Requests that expect an
//! answer carry a [`RequestId`] chosen by the client; the host echoes it on
//! the matching response so the client never has to guess which caller a
//! response belongs to.
//!
//! ```text
//! client                                host
//!   │ GET_NOTE_CONTENT {requestId: 7}    │
//!   │ ─────────────────────────────────▶ │  walk node, extract text
//!   │ POST_NOTE_CONTENT {requestId: 7}   │
//!   │ ◀───────────────────────────────── │
//! ```

use crate::{AppState, Feature, FeatureId, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Correlation id of a request/response pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a tagged node becomes on a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagTarget {
    /// A visual reference (frame, screen, component)
    Image,
    /// A text-bearing note whose content gets extracted
    Document,
}

/// Messages sent from the client to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Ask for the identity of the open document
    GetAppState { request_id: RequestId },

    /// Tag a node on a feature. The node is the client's view of the
    /// current selection, passed explicitly.
    GetNodeId {
        request_id: RequestId,
        feature_id: FeatureId,
        target: TagTarget,
        node_id: NodeId,
    },

    /// Persist the full record set into the document (replaces what is there)
    SaveFeatures { features: Vec<Feature> },

    /// Read the record set persisted in the document
    LoadFeatures { request_id: RequestId },

    /// Bring a node into view; ignored if it no longer exists
    FocusNode { node_id: NodeId },

    /// Re-extract the text of a note node
    GetNoteContent { request_id: RequestId, node_id: NodeId },

    /// Build (or rebuild) the presentation page from the record set
    GenerateBlocksPage { features: Vec<Feature> },
}

impl ClientMessage {
    /// Correlation id, for messages that expect a response
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            ClientMessage::GetAppState { request_id }
            | ClientMessage::GetNodeId { request_id, .. }
            | ClientMessage::LoadFeatures { request_id }
            | ClientMessage::GetNoteContent { request_id, .. } => Some(*request_id),
            ClientMessage::SaveFeatures { .. }
            | ClientMessage::FocusNode { .. }
            | ClientMessage::GenerateBlocksPage { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::GetAppState { .. } => "GET_APP_STATE",
            ClientMessage::GetNodeId { .. } => "GET_NODE_ID",
            ClientMessage::SaveFeatures { .. } => "SAVE_FEATURES",
            ClientMessage::LoadFeatures { .. } => "LOAD_FEATURES",
            ClientMessage::FocusNode { .. } => "FOCUS_NODE",
            ClientMessage::GetNoteContent { .. } => "GET_NOTE_CONTENT",
            ClientMessage::GenerateBlocksPage { .. } => "GENERATE_BLOCKS_PAGE",
        }
    }
}

/// Messages sent from the host to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum HostMessage {
    PostAppState {
        request_id: RequestId,
        app_state: AppState,
    },

    PostNodeTag {
        request_id: RequestId,
        node_id: NodeId,
        node_name: String,
        feature_id: FeatureId,
        target: TagTarget,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },

    FeaturesLoaded {
        request_id: RequestId,
        features: Vec<Feature>,
    },

    PostNoteContent {
        request_id: RequestId,
        node_id: NodeId,
        content: String,
    },

    /// The user's selection in the host changed
    SelectionChanged { node_ids: Vec<NodeId> },

    /// A correlated request could not be answered
    RequestFailed { request_id: RequestId, reason: String },
}

impl HostMessage {
    /// Correlation id, for responses to a request
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            HostMessage::PostAppState { request_id, .. }
            | HostMessage::PostNodeTag { request_id, .. }
            | HostMessage::FeaturesLoaded { request_id, .. }
            | HostMessage::PostNoteContent { request_id, .. }
            | HostMessage::RequestFailed { request_id, .. } => Some(*request_id),
            HostMessage::SelectionChanged { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            HostMessage::PostAppState { .. } => "POST_APP_STATE",
            HostMessage::PostNodeTag { .. } => "POST_NODE_TAG",
            HostMessage::FeaturesLoaded { .. } => "FEATURES_LOADED",
            HostMessage::PostNoteContent { .. } => "POST_NOTE_CONTENT",
            HostMessage::SelectionChanged { .. } => "SELECTION_CHANGED",
            HostMessage::RequestFailed { .. } => "REQUEST_FAILED",
        }
    }
}
