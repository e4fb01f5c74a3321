//! Pipeline error taxonomy.
//!
//! Every variant is a deterministic, data-driven condition; nothing here is
//! transient and nothing is retried.

use thiserror::Error;

use crate::types::NodeId;

#[derive(Debug, Error)]
pub enum PipelineError {
  /// A cleaned graph still violates a structural invariant.
  #[error("data integrity violated at node {node_id}: {reason}")]
  DataIntegrity { node_id: NodeId, reason: String },

  /// Tensor dimensions exceed the configured maxima.
  #[error("shape mismatch: {what} is {actual}, maximum is {max}")]
  ShapeMismatch {
    what: &'static str,
    actual: usize,
    max: usize,
  },

  /// A batch needs at least two distinct class labels.
  #[error("batch contains {found} distinct class label(s), at least 2 are required")]
  InsufficientClasses { found: usize },

  #[error("invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("malformed JSON input: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
