//! Pending request table
//!
//! Each outgoing request registers a one-shot slot under a fresh
//! [`RequestId`]; the router completes the slot when a response echoing that
//! id arrives. A response for an id that is no longer pending (the caller
//! timed out) is dropped.

use blockscope_proto::{HostMessage, RequestId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

#[derive(Debug, Default)]
pub struct Correlator {
    next_id: AtomicU64,
    pending: Mutex<HashMap<RequestId, oneshot::Sender<HostMessage>>>,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<RequestId, oneshot::Sender<HostMessage>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allocate an id and the receiver its response will arrive on
    pub fn register(&self) -> (RequestId, oneshot::Receiver<HostMessage>) {
        let request_id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = oneshot::channel();
        self.pending().insert(request_id, tx);
        (request_id, rx)
    }

    /// Complete the request the message answers. Returns false when nobody
    /// is waiting for it.
    pub fn resolve(&self, message: HostMessage) -> bool {
        let Some(request_id) = message.request_id() else {
            tracing::debug!("[client] {} is not a response", message.kind());
            return false;
        };

        let Some(tx) = self.pending().remove(&request_id) else {
            tracing::debug!("[client] dropping late {} for {}", message.kind(), request_id);
            return false;
        };

        // The caller may have given up between the lookup and the send
        tx.send(message).is_ok()
    }

    /// Forget a request; its response, if any, will be dropped
    pub fn cancel(&self, request_id: RequestId) -> bool {
        self.pending().remove(&request_id).is_some()
    }

    pub fn pending_count(&self) -> usize {
        self.pending().len()
    }

    /// Fail every outstanding request
    pub fn close_all(&self) {
        let dropped = std::mem::take(&mut *self.pending());
        if !dropped.is_empty() {
            tracing::debug!("[client] closing {} pending request(s)", dropped.len());
        }
    }
}
