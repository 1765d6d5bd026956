//! Error types.
//!
//! Gesture handlers never surface errors to the user: a rejected edge or a
//! malformed drop is logged and dropped. These types exist so the lower-level
//! APIs can still say *why* something was refused.

use thiserror::Error;

/// Errors raised while decoding data that crosses the canvas boundary.
#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("drag payload is empty")]
    EmptyPayload,

    #[error("invalid drag payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("invalid workflow graph: {reason}")]
    InvalidGraph { reason: String },

    #[error("failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid canvas configuration: `{field}` {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

/// Reasons an edge is refused by the diagram model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EdgeRejection {
    #[error("cannot connect a node to itself")]
    SelfLoop,

    #[error("an edge between these nodes already exists")]
    Duplicate,

    #[error("node '{0}' does not exist")]
    UnknownNode(String),

    #[error("{0}")]
    Custom(String),
}

pub type Result<T, E = CanvasError> = std::result::Result<T, E>;
