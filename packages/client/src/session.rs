//! # Client Session
//!
//! The client half of the protocol. It owns the [`FeatureSet`] and talks to
//! the host only through messages:
//!
//! ```text
//! ┌──────────────────────────┐   ClientMessage   ┌────────────┐
//! │ ClientSession            │ ────────────────▶ │    host    │
//! │  - FeatureSet            │                   │    loop    │
//! │  - Correlator ◀──┐       │   HostMessage     │            │
//! │  - selection ◀───┤ router│ ◀──────────────── │            │
//! └──────────────────┴───────┘                   └────────────┘
//! ```
//!
//! The router task completes pending requests by id and publishes selection
//! changes. Every request is bounded by the configured timeout.

use crate::correlation::Correlator;
use crate::csv::{csv_file_name, export_csv};
use crate::features::FeatureSet;
use crate::ClientError;
use blockscope_proto::{AppState, ClientMessage, FeatureId, HostMessage, NodeId, RequestId, TagTarget};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

pub struct ClientSession {
    outbox: mpsc::Sender<ClientMessage>,
    pending: Arc<Correlator>,
    selection: watch::Receiver<Vec<NodeId>>,
    router: JoinHandle<()>,
    config: ClientConfig,
    app_state: Option<AppState>,
    features: FeatureSet,
}

impl ClientSession {
    /// Start routing host messages. Must be called inside a tokio runtime.
    pub fn connect(
        outbox: mpsc::Sender<ClientMessage>,
        inbox: mpsc::Receiver<HostMessage>,
        config: ClientConfig,
    ) -> Self {
        let pending = Arc::new(Correlator::new());
        let (selection_tx, selection_rx) = watch::channel(Vec::new());
        let router = tokio::spawn(route(inbox, pending.clone(), selection_tx));

        Self {
            outbox,
            pending,
            selection: selection_rx,
            router,
            config,
            app_state: None,
            features: FeatureSet::new(),
        }
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    pub fn features_mut(&mut self) -> &mut FeatureSet {
        &mut self.features
    }

    /// Latest selection reported by the host
    pub fn selection(&self) -> Vec<NodeId> {
        self.selection.borrow().clone()
    }

    /// Wait for the next selection change
    pub async fn selection_changed(&mut self) -> Result<Vec<NodeId>, ClientError> {
        self.selection
            .changed()
            .await
            .map_err(|_| ClientError::Disconnected)?;
        Ok(self.selection.borrow_and_update().clone())
    }

    /// Requests still waiting for a response
    pub fn pending_requests(&self) -> usize {
        self.pending.pending_count()
    }

    async fn send(&self, message: ClientMessage) -> Result<(), ClientError> {
        tracing::debug!("[client] {}", message.kind());
        self.outbox
            .send(message)
            .await
            .map_err(|_| ClientError::Disconnected)
    }

    /// Send a correlated request and wait for its response
    async fn request(
        &self,
        build: impl FnOnce(RequestId) -> ClientMessage,
    ) -> Result<HostMessage, ClientError> {
        let (request_id, response) = self.pending.register();
        let message = build(request_id);
        let kind = message.kind();

        if let Err(error) = self.send(message).await {
            self.pending.cancel(request_id);
            return Err(error);
        }

        match tokio::time::timeout(self.config.request_timeout, response).await {
            Ok(Ok(HostMessage::RequestFailed { reason, .. })) => {
                Err(ClientError::Rejected { request_id, reason })
            }
            Ok(Ok(message)) => Ok(message),
            Ok(Err(_)) => Err(ClientError::Disconnected),
            Err(_) => {
                self.pending.cancel(request_id);
                tracing::warn!("[client] {} {} timed out", kind, request_id);
                Err(ClientError::Timeout {
                    request_id,
                    kind,
                    timeout: self.config.request_timeout,
                })
            }
        }
    }

    /// Fold a response into the record set
    fn reduce(&mut self, response: HostMessage) -> Result<bool, ClientError> {
        let file_key = self
            .app_state
            .as_ref()
            .map(|app_state| app_state.file_key.clone())
            .unwrap_or_default();
        self.features.apply(&file_key, response)
    }

    /// Identity of the open document, fetched once per session
    pub async fn app_state(&mut self) -> Result<AppState, ClientError> {
        if let Some(app_state) = &self.app_state {
            return Ok(app_state.clone());
        }

        match self.request(|request_id| ClientMessage::GetAppState { request_id }).await? {
            HostMessage::PostAppState { app_state, .. } => {
                self.app_state = Some(app_state.clone());
                Ok(app_state)
            }
            other => Err(unexpected("POST_APP_STATE", &other)),
        }
    }

    pub fn create_feature(&mut self) -> FeatureId {
        self.features.create()
    }

    pub fn remove_feature(&mut self, id: FeatureId) -> bool {
        self.features.remove(id).is_some()
    }

    /// Tag the first selected node onto a feature
    pub async fn tag_selection(&mut self, feature_id: FeatureId, target: TagTarget) -> Result<(), ClientError> {
        let node_id = self
            .selection()
            .into_iter()
            .next()
            .ok_or(ClientError::NoSelection)?;
        self.tag_node(feature_id, target, node_id).await
    }

    /// Tag a node onto a feature. Document tags arrive with extracted text.
    pub async fn tag_node(
        &mut self,
        feature_id: FeatureId,
        target: TagTarget,
        node_id: NodeId,
    ) -> Result<(), ClientError> {
        if self.features.get(feature_id).is_none() {
            return Err(ClientError::FeatureNotFound(feature_id));
        }
        // Tags carry embed URLs, which need the file key
        self.app_state().await?;

        let response = self
            .request(|request_id| ClientMessage::GetNodeId {
                request_id,
                feature_id,
                target,
                node_id,
            })
            .await?;

        match response {
            response @ HostMessage::PostNodeTag { .. } => {
                self.reduce(response)?;
                Ok(())
            }
            other => Err(unexpected("POST_NODE_TAG", &other)),
        }
    }

    /// Persist the whole record set into the document
    pub async fn save(&self) -> Result<(), ClientError> {
        self.send(ClientMessage::SaveFeatures {
            features: self.features.features().to_vec(),
        })
        .await
    }

    /// Replace the record set with what the document holds
    pub async fn load(&mut self) -> Result<usize, ClientError> {
        match self.request(|request_id| ClientMessage::LoadFeatures { request_id }).await? {
            response @ HostMessage::FeaturesLoaded { .. } => {
                self.reduce(response)?;
                let count = self.features.len();
                tracing::info!("[client] loaded {} feature(s)", count);
                Ok(count)
            }
            other => Err(unexpected("FEATURES_LOADED", &other)),
        }
    }

    pub async fn focus(&self, node_id: NodeId) -> Result<(), ClientError> {
        self.send(ClientMessage::FocusNode { node_id }).await
    }

    /// Re-extract one note node and update every note pointing at it
    pub async fn refresh_note(&mut self, node_id: NodeId) -> Result<String, ClientError> {
        match self
            .request(|request_id| ClientMessage::GetNoteContent { request_id, node_id })
            .await?
        {
            HostMessage::PostNoteContent {
                request_id,
                node_id,
                content,
            } => {
                self.reduce(HostMessage::PostNoteContent {
                    request_id,
                    node_id,
                    content: content.clone(),
                })?;
                Ok(content)
            }
            other => Err(unexpected("POST_NOTE_CONTENT", &other)),
        }
    }

    /// Re-extract every note at once. Each result lands on the note that
    /// asked for it; a failed refresh keeps that note's previous content.
    /// Returns how many notes were refreshed.
    pub async fn refresh_all_notes(&mut self) -> usize {
        let slots = self.features.note_slots();

        let results = {
            let this = &*self;
            join_all(slots.into_iter().map(|(feature_index, note_index, node_id)| async move {
                let result = this
                    .request(|request_id| ClientMessage::GetNoteContent { request_id, node_id })
                    .await;
                (feature_index, note_index, result)
            }))
            .await
        };

        let mut refreshed = 0;
        for (feature_index, note_index, result) in results {
            match result {
                Ok(HostMessage::PostNoteContent { content, .. }) => {
                    if self.features.set_note_content_at(feature_index, note_index, content) {
                        refreshed += 1;
                    }
                }
                Ok(other) => {
                    tracing::warn!("[client] unexpected {} for note refresh", other.kind());
                }
                Err(error) => {
                    tracing::warn!("[client] keeping stale note content: {}", error);
                }
            }
        }
        refreshed
    }

    /// Refresh every note, then render the record set as CSV
    pub async fn export_csv(&mut self) -> String {
        self.refresh_all_notes().await;
        export_csv(self.features.features())
    }

    /// Download name for the CSV export of this document
    pub async fn csv_file_name(&mut self) -> Result<String, ClientError> {
        let file_key = self.app_state().await?.file_key;
        Ok(csv_file_name(&file_key))
    }

    pub async fn generate_blocks_page(&self) -> Result<(), ClientError> {
        self.send(ClientMessage::GenerateBlocksPage {
            features: self.features.features().to_vec(),
        })
        .await
    }

    /// Stop routing and hand back the record set
    pub fn disconnect(self) -> FeatureSet {
        self.router.abort();
        self.pending.close_all();
        self.features
    }
}

fn unexpected(expected: &'static str, got: &HostMessage) -> ClientError {
    ClientError::UnexpectedResponse {
        expected,
        got: got.kind(),
    }
}

async fn route(
    mut inbox: mpsc::Receiver<HostMessage>,
    pending: Arc<Correlator>,
    selection: watch::Sender<Vec<NodeId>>,
) {
    while let Some(message) = inbox.recv().await {
        match message {
            HostMessage::SelectionChanged { node_ids } => {
                tracing::debug!("[client] selection: {} node(s)", node_ids.len());
                selection.send_replace(node_ids);
            }
            response => {
                pending.resolve(response);
            }
        }
    }

    tracing::debug!("[client] host closed the channel");
    pending.close_all();
}
