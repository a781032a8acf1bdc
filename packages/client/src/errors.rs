//! Error types for the client

use blockscope_proto::{FeatureId, RequestId};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("{kind} {request_id} got no response within {timeout:?}")]
    Timeout {
        request_id: RequestId,
        kind: &'static str,
        timeout: Duration,
    },

    #[error("Host disconnected")]
    Disconnected,

    #[error("Host rejected {request_id}: {reason}")]
    Rejected { request_id: RequestId, reason: String },

    #[error("Expected {expected} response, got {got}")]
    UnexpectedResponse {
        expected: &'static str,
        got: &'static str,
    },

    #[error("Nothing is selected")]
    NoSelection,

    #[error("Feature not found: {0}")]
    FeatureNotFound(FeatureId),
}
