//! Host message loop
//!
//! The host owns the document and is the only party that touches it. Client
//! messages and the user's selection changes arrive on two queues; the loop
//! takes one input at a time and awaits its handler to completion before
//! reading the next, so document mutations never interleave. A handler
//! that suspends on a host resource (font loading) holds up the queue
//! rather than letting a later message run against a half-built tree.

use blockscope_document::{DocumentRuntime, NodeId};
use blockscope_editor::{extract_text, FeatureStore, PresentationGenerator};
use blockscope_proto::{AppState, ClientMessage, HostMessage, TagTarget};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Default bound of every host channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Host is no longer running")]
    Closed,
}

pub struct HostServer<D> {
    doc: D,
    store: FeatureStore,
    generator: PresentationGenerator,
}

/// Channels of a spawned host
pub struct HostHandle<D> {
    /// Client → host messages
    pub messages: mpsc::Sender<ClientMessage>,
    /// Selection changes made by the user in the host UI
    pub selections: mpsc::Sender<Vec<NodeId>>,
    /// Host → client messages
    pub responses: mpsc::Receiver<HostMessage>,
    /// Resolves to the document once every sender is dropped
    pub task: JoinHandle<D>,
}

impl<D> HostHandle<D> {
    /// Report a selection change made in the host UI
    pub async fn select(&self, node_ids: Vec<NodeId>) -> Result<(), HostError> {
        self.selections
            .send(node_ids)
            .await
            .map_err(|_| HostError::Closed)
    }
}

impl<D: DocumentRuntime + 'static> HostServer<D> {
    pub fn new(doc: D) -> Self {
        Self {
            doc,
            store: FeatureStore::default(),
            generator: PresentationGenerator::default(),
        }
    }

    pub fn with_store(mut self, store: FeatureStore) -> Self {
        self.store = store;
        self
    }

    pub fn with_generator(mut self, generator: PresentationGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn into_document(self) -> D {
        self.doc
    }

    /// Run the loop on its own task
    pub fn spawn(self, capacity: usize) -> HostHandle<D> {
        let (message_tx, message_rx) = mpsc::channel(capacity);
        let (selection_tx, selection_rx) = mpsc::channel(capacity);
        let (response_tx, response_rx) = mpsc::channel(capacity);

        let task = tokio::spawn(self.run(message_rx, selection_rx, response_tx));

        HostHandle {
            messages: message_tx,
            selections: selection_tx,
            responses: response_rx,
            task,
        }
    }

    /// Process inputs until both input queues are closed, then hand the
    /// document back.
    pub async fn run(
        mut self,
        mut messages: mpsc::Receiver<ClientMessage>,
        mut selections: mpsc::Receiver<Vec<NodeId>>,
        outbox: mpsc::Sender<HostMessage>,
    ) -> D {
        let mut messages_open = true;
        let mut selections_open = true;

        loop {
            tokio::select! {
                message = messages.recv(), if messages_open => match message {
                    Some(message) => {
                        for response in self.handle(message).await {
                            send(&outbox, response).await;
                        }
                    }
                    None => messages_open = false,
                },
                selection = selections.recv(), if selections_open => match selection {
                    Some(node_ids) => {
                        let response = self.select(node_ids);
                        send(&outbox, response).await;
                    }
                    None => selections_open = false,
                },
                else => break,
            }
        }

        tracing::debug!("[host] inputs closed, stopping");
        self.doc
    }

    /// Apply a selection change from the host UI
    pub fn select(&mut self, node_ids: Vec<NodeId>) -> HostMessage {
        self.doc.set_selection(node_ids);
        HostMessage::SelectionChanged {
            node_ids: self.doc.selection(),
        }
    }

    /// Perform one client command and return its responses
    pub async fn handle(&mut self, message: ClientMessage) -> Vec<HostMessage> {
        tracing::debug!("[host] {} {:?}", message.kind(), message.request_id());

        match message {
            ClientMessage::GetAppState { request_id } => {
                let app_state = AppState {
                    file_key: self.doc.file_key().unwrap_or_default(),
                };
                vec![HostMessage::PostAppState { request_id, app_state }]
            }

            ClientMessage::GetNodeId {
                request_id,
                feature_id,
                target,
                node_id,
            } => {
                let Some(node) = self.doc.node(&node_id) else {
                    tracing::warn!("[GET_NODE_ID] node {} not found", node_id);
                    return vec![HostMessage::RequestFailed {
                        request_id,
                        reason: format!("Node not found: {}", node_id),
                    }];
                };

                let node_name = node.name.clone();
                let content = match target {
                    TagTarget::Document => Some(extract_text(&self.doc, &node_id)),
                    TagTarget::Image => None,
                };

                vec![HostMessage::PostNodeTag {
                    request_id,
                    node_id,
                    node_name,
                    feature_id,
                    target,
                    content,
                }]
            }

            ClientMessage::SaveFeatures { features } => {
                if let Err(error) = self.store.save(&mut self.doc, &features).await {
                    tracing::error!("[SAVE_FEATURES] {}", error);
                }
                vec![]
            }

            ClientMessage::LoadFeatures { request_id } => {
                let features = self.store.load(&self.doc);
                vec![HostMessage::FeaturesLoaded { request_id, features }]
            }

            ClientMessage::FocusNode { node_id } => {
                if self.doc.node(&node_id).is_some() {
                    self.doc.scroll_and_zoom_into_view(std::slice::from_ref(&node_id));
                } else {
                    tracing::debug!("[FOCUS_NODE] node {} not found, ignoring", node_id);
                }
                vec![]
            }

            ClientMessage::GetNoteContent { request_id, node_id } => {
                let content = extract_text(&self.doc, &node_id);
                vec![HostMessage::PostNoteContent {
                    request_id,
                    node_id,
                    content,
                }]
            }

            ClientMessage::GenerateBlocksPage { features } => {
                if let Err(error) = self.generator.generate(&mut self.doc, &features).await {
                    tracing::error!("[GENERATE_BLOCKS_PAGE] {}", error);
                    self.doc.notify("Could not generate the feature blocks page");
                }
                vec![]
            }
        }
    }
}

async fn send(outbox: &mpsc::Sender<HostMessage>, message: HostMessage) {
    let kind = message.kind();
    if outbox.send(message).await.is_err() {
        tracing::debug!("[host] client gone, dropping {}", kind);
    }
}
