//! Materialized training unit.

use ndarray::{Array1, Array2, Array4};

/// Node, edge and embedding tensors plus one class label per group.
///
/// Axis 0 of every array is the group axis and has the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorBatch {
  /// `(groups, field_count, field_size, channel_count)`, normalised to `[0, 1]`.
  pub nodes: Array4<f32>,
  /// `(groups, field_count, field_size * field_size, 2)`: edge type and state weights.
  pub edges: Array4<f32>,
  /// `(groups, max_nodes * embedding_length * 2)`: bucketed name/cmdline tokens.
  pub embeddings: Array2<u32>,
  pub labels: Array1<i64>,
}

impl TensorBatch {
  pub fn len(&self) -> usize {
    self.labels.len()
  }

  pub fn is_empty(&self) -> bool {
    self.labels.is_empty()
  }
}
