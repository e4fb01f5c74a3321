//! Materializes receptive-field groups as dense arrays.
//!
//! Every array produced here describes one graph; the orchestrator stacks
//! them along the group axis.

use std::collections::BTreeSet;

use ndarray::{Array1, Array4};
use tracing::instrument;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::graph_store::GraphStore;
use crate::hashing::{StructuralHasher, encode_fixed};
use crate::types::{CMDLINE, FieldGroup, NAME, Node, NodeId};

/// Fails with `InsufficientClasses` unless `labels` holds at least two
/// distinct values.
pub fn check_classes(labels: &[i64]) -> Result<()> {
  let found = labels.iter().collect::<BTreeSet<_>>().len();
  if found < 2 {
    return Err(PipelineError::InsufficientClasses { found });
  }
  Ok(())
}

/// Turns ordered receptive fields into node, edge and embedding arrays.
#[derive(Debug, Clone)]
pub struct TensorAssembler {
  config: PipelineConfig,
  hasher: StructuralHasher,
}

impl TensorAssembler {
  pub fn new(config: PipelineConfig) -> Self {
    let hasher = StructuralHasher::new(config.hashing.clone());
    Self { config, hasher }
  }

  pub fn config(&self) -> &PipelineConfig {
    &self.config
  }

  /// Rejects groups holding more fields, or fields holding more nodes, than
  /// the configured shape allows.
  pub fn check_shape(&self, groups: &[FieldGroup]) -> Result<()> {
    for group in groups {
      if group.len() > self.config.field_count {
        return Err(PipelineError::ShapeMismatch {
          what: "fields per group",
          actual: group.len(),
          max: self.config.field_count,
        });
      }
      if let Some(field) = group.iter().find(|f| f.len() > self.config.field_size) {
        return Err(PipelineError::ShapeMismatch {
          what: "nodes per receptive field",
          actual: field.len(),
          max: self.config.field_size,
        });
      }
    }
    Ok(())
  }

  /// `(groups, field_count, field_size, channels)`: one channel per configured
  /// property, normalized into `[0, 1]`. Missing properties take the default
  /// tensor value; positions past a short field stay at zero.
  #[instrument(level = "trace", skip(self, groups, store))]
  pub fn build_node_tensor(&self, groups: &[FieldGroup], store: &GraphStore) -> Result<Array4<f32>> {
    self.check_shape(groups)?;
    let cfg = &self.config;
    let shape = (groups.len(), cfg.field_count, cfg.field_size, cfg.channel_count());
    let mut raw = Array4::<f64>::zeros(shape);
    for (g, group) in groups.iter().enumerate() {
      for (f, field) in group.iter().enumerate() {
        let members = field.nodes.iter().enumerate();
        for (p, node) in members.filter_map(|(p, id)| store.node(*id).map(|n| (p, n))) {
          for (c, property) in cfg.channel_properties.iter().enumerate() {
            raw[[g, f, p, c]] = self
              .hasher
              .channel_value(node, property, cfg.channel_hash)
              .map(|v| v as f64)
              .unwrap_or(cfg.default_tensor_value);
          }
        }
      }
    }
    let bounds = cfg.normalization_bounds();
    Ok(raw.mapv(|v| bounds.normalize(v)))
  }

  /// `(groups, field_count, field_size^2, 2)`: each edge inside a field writes
  /// its `(type, state)` weights at `start_pos * field_size + end_pos`.
  #[instrument(level = "trace", skip(self, groups, store))]
  pub fn build_edge_tensor(&self, groups: &[FieldGroup], store: &GraphStore) -> Result<Array4<f32>> {
    self.check_shape(groups)?;
    let k = self.config.field_size;
    let mut tensor = Array4::<f32>::zeros((groups.len(), self.config.field_count, k * k, 2));
    for (g, group) in groups.iter().enumerate() {
      for (f, field) in group.iter().enumerate() {
        for edge in field.edges.iter().filter_map(|id| store.edge(*id)) {
          let (Some(start), Some(end)) = (field.position(edge.start), field.position(edge.end))
          else {
            continue;
          };
          let cell = start * k + end;
          tensor[[g, f, cell, 0]] = self.hasher.edge_type_weight(edge) as f32;
          tensor[[g, f, cell, 1]] = self.hasher.edge_state_weight(edge) as f32;
        }
      }
    }
    Ok(tensor)
  }

  /// Nodes in label-hash order (ties by id), as used by the embedding.
  fn embedding_order(&self, store: &GraphStore) -> Vec<NodeId> {
    let mut ids = store.node_ids();
    ids.sort_by_cached_key(|id| {
      let labels = store.node(*id).map(|n| self.hasher.label_hash(n)).unwrap_or(0);
      (labels, *id)
    });
    ids
  }

  fn encode_property(&self, node: &Node, key: &str) -> Vec<u32> {
    let text = node.property(key).and_then(|v| v.hash_text());
    let emb = &self.config.embedding;
    encode_fixed(text.as_deref(), emb.length, emb.vocab_size)
  }

  /// Flattened name and cmdline tokens of the first `max_nodes` nodes in
  /// label-hash order, zero padded to `max_nodes * length * 2`.
  #[instrument(level = "trace", skip(self, store))]
  pub fn build_embedding(&self, store: &GraphStore) -> Array1<u32> {
    let emb = &self.config.embedding;
    let mut tokens = Vec::with_capacity(emb.vector_len());
    for node in self
      .embedding_order(store)
      .into_iter()
      .take(emb.max_nodes)
      .filter_map(|id| store.node(id))
    {
      tokens.extend(self.encode_property(node, NAME));
      tokens.extend(self.encode_property(node, CMDLINE));
    }
    tokens.resize(emb.vector_len(), 0);
    Array1::from(tokens)
  }
}
