//! Shaping of tensor batches into classifier training sets.

use std::collections::BTreeMap;

use ndarray::{Array1, Array2, Array4, Axis};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

use crate::error::{PipelineError, Result};
use crate::types::TensorBatch;

/// Keeps the rows at `indices` of every array, in that order.
pub fn select_rows(batch: &TensorBatch, indices: &[usize]) -> TensorBatch {
  TensorBatch {
    nodes: batch.nodes.select(Axis(0), indices),
    edges: batch.edges.select(Axis(0), indices),
    embeddings: batch.embeddings.select(Axis(0), indices),
    labels: batch.labels.select(Axis(0), indices),
  }
}

/// Keeps at most `limit` examples of each class, taking the earliest ones.
/// Without a limit the smallest class count is used, so every class ends up
/// equally represented.
#[instrument(level = "trace", skip(batch))]
pub fn balance_classes(batch: &TensorBatch, limit: Option<usize>) -> TensorBatch {
  let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
  for label in &batch.labels {
    *counts.entry(*label).or_default() += 1;
  }
  let limit = limit.unwrap_or_else(|| counts.values().copied().min().unwrap_or(0));
  let mut taken: BTreeMap<i64, usize> = BTreeMap::new();
  let keep: Vec<usize> = batch
    .labels
    .iter()
    .enumerate()
    .filter(|(_, label)| {
      let n = taken.entry(**label).or_default();
      *n += 1;
      *n <= limit
    })
    .map(|(i, _)| i)
    .collect();
  debug!(kept = keep.len(), of = batch.len(), limit, "balanced classes");
  select_rows(batch, &keep)
}

/// Applies one random permutation to every array along the group axis.
pub fn shuffle<R: Rng + ?Sized>(batch: &TensorBatch, rng: &mut R) -> TensorBatch {
  let mut order: Vec<usize> = (0..batch.len()).collect();
  order.shuffle(rng);
  select_rows(batch, &order)
}

/// `(len, class_count)` indicator matrix of integer labels.
pub fn one_hot(labels: &Array1<i64>, class_count: usize) -> Result<Array2<f32>> {
  let mut out = Array2::<f32>::zeros((labels.len(), class_count));
  for (row, label) in labels.iter().enumerate() {
    let class = usize::try_from(*label)
      .ok()
      .filter(|c| *c < class_count)
      .ok_or_else(|| {
        PipelineError::InvalidConfig(format!(
          "label {} outside 0..{}",
          label, class_count
        ))
      })?;
    out[[row, class]] = 1.0;
  }
  Ok(out)
}

/// `(s, field_count, field_size, channels)` to
/// `(s, field_count * field_size, channels, 1)`: fields stacked into one
/// image per group with a single colour plane.
pub fn reshape_for_model(nodes: &Array4<f32>) -> Result<Array4<f32>> {
  let (s, w, k, c) = nodes.dim();
  let shape = (s, w * k, c, 1);
  Array4::from_shape_vec(shape, nodes.iter().copied().collect()).map_err(|_| {
    PipelineError::ShapeMismatch {
      what: "reshaped node tensor",
      actual: nodes.len(),
      max: s * w * k * c,
    }
  })
}
