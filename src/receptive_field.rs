//! Receptive-field extraction: bounded neighborhoods around selected roots.
//!
//! Roots are every `stride`-th node of the labeled order. An edge's `end`
//! happened before its `start`, so each field is a breadth-first walk along
//! outgoing edges towards a node's causal history. It is cut off at
//! `field_size` nodes and then re-ordered by structural hash so that similar
//! neighborhoods line up position by position.

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, instrument, trace};

use crate::config::Labeling;
use crate::error::{PipelineError, Result};
use crate::graph_store::GraphStore;
use crate::hashing::StructuralHasher;
use crate::labeling::order_nodes;
use crate::types::{EdgeId, FieldGroup, NodeId, ReceptiveField};

/// Edges with both endpoints in `nodes`, in ascending id order.
pub fn get_related_edges(nodes: &[NodeId], store: &GraphStore) -> Vec<EdgeId> {
  let members: BTreeSet<NodeId> = nodes.iter().copied().collect();
  let mut related: Vec<EdgeId> = members
    .iter()
    .flat_map(|n| store.outgoing(*n))
    .filter(|e| store.edge(**e).is_some_and(|edge| members.contains(&edge.end)))
    .copied()
    .collect();
  related.sort_unstable();
  related
}

/// Builds receptive fields and groups of them for one cleaned graph.
#[derive(Debug, Clone, Default)]
pub struct ReceptiveFieldBuilder {
  hasher: StructuralHasher,
}

impl ReceptiveFieldBuilder {
  pub fn new(hasher: StructuralHasher) -> Self {
    Self { hasher }
  }

  pub fn hasher(&self) -> &StructuralHasher {
    &self.hasher
  }

  /// All nodes ascending under `labeling`.
  pub fn ordered_root_nodes(&self, store: &GraphStore, labeling: Labeling) -> Result<Vec<NodeId>> {
    order_nodes(store, labeling, &self.hasher)
  }

  /// Outgoing edges of `node` in visiting order: edge hash, then the hash of
  /// the edge's end node, then edge id.
  fn expansion_order(&self, node: NodeId, store: &GraphStore) -> Vec<(EdgeId, NodeId)> {
    let mut candidates: Vec<_> = store
      .outgoing(node)
      .iter()
      .filter_map(|id| store.edge(*id))
      .map(|e| {
        let end_hash = store.node(e.end).map(|n| self.hasher.node_hash(n));
        ((self.hasher.edge_hash(e), end_hash, e.id), e.end)
      })
      .collect();
    candidates.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    candidates
      .into_iter()
      .map(|((_, _, edge), end)| (edge, end))
      .collect()
  }

  /// Breadth-first neighborhood of `root` holding at most `field_size` nodes,
  /// in visiting order. Nodes are marked when enqueued, so each appears once.
  /// No padding: a small component yields a short field.
  #[instrument(level = "trace", skip(self, store))]
  pub fn get_receptive_field(
    &self,
    root: NodeId,
    store: &GraphStore,
    field_size: usize,
  ) -> ReceptiveField {
    let mut nodes = Vec::with_capacity(field_size);
    if field_size > 0 && store.contains_node(root) {
      let mut visited = BTreeSet::from([root]);
      let mut queue: VecDeque<(NodeId, Option<EdgeId>)> = VecDeque::from([(root, None)]);
      while let Some((current, via)) = queue.pop_front() {
        nodes.push(current);
        if nodes.len() == field_size {
          break;
        }
        for (edge, neighbor) in self.expansion_order(current, store) {
          if visited.insert(neighbor) {
            queue.push_back((neighbor, Some(edge)));
          }
        }
        trace!(node = current, ?via, queued = queue.len(), "visited");
      }
    }
    let edges = get_related_edges(&nodes, store);
    ReceptiveField { root, nodes, edges }
  }

  /// Re-orders a field's nodes by node hash; equal hashes keep visiting order.
  pub fn order_field(&self, field: &mut ReceptiveField, store: &GraphStore) {
    field
      .nodes
      .sort_by_cached_key(|id| store.node(*id).map(|n| self.hasher.node_hash(n)));
  }

  /// Extracts a field for every `stride`-th node of the labeled order and
  /// packs them into groups of exactly `field_count`. A trailing partial group
  /// is dropped.
  #[instrument(level = "trace", skip(self, store))]
  pub fn build_groups_of_receptive_fields(
    &self,
    store: &GraphStore,
    field_count: usize,
    field_size: usize,
    stride: usize,
    labeling: Labeling,
  ) -> Result<Vec<FieldGroup>> {
    if field_count == 0 || field_size == 0 || stride == 0 {
      return Err(PipelineError::InvalidConfig(format!(
        "field_count ({}), field_size ({}) and stride ({}) must be positive",
        field_count, field_size, stride
      )));
    }
    if store.is_empty() {
      debug!("empty graph component, no receptive fields");
      return Ok(Vec::new());
    }
    let roots = self.ordered_root_nodes(store, labeling)?;
    let mut groups = Vec::new();
    let mut current: FieldGroup = Vec::with_capacity(field_count);
    for root in roots.into_iter().step_by(stride) {
      let mut field = self.get_receptive_field(root, store, field_size);
      self.order_field(&mut field, store);
      current.push(field);
      if current.len() == field_count {
        groups.push(std::mem::replace(&mut current, Vec::with_capacity(field_count)));
      }
    }
    debug!(
      groups = groups.len(),
      discarded_fields = current.len(),
      "built receptive field groups"
    );
    Ok(groups)
  }
}
