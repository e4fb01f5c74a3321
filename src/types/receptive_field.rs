//! A bounded neighborhood around a root node.

use super::{EdgeId, NodeId};

/// Ordered sub-graph extracted around `root`.
///
/// `nodes` holds at most `field_size` ids. Its order is the BFS order when
/// freshly extracted and the structural-hash order once normalised. `edges`
/// holds every graph edge whose endpoints both lie in `nodes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceptiveField {
  pub root: NodeId,
  pub nodes: Vec<NodeId>,
  pub edges: Vec<EdgeId>,
}

impl ReceptiveField {
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Position of `node` inside the field, if it is a member.
  pub fn position(&self, node: NodeId) -> Option<usize> {
    self.nodes.iter().position(|n| *n == node)
  }
}

/// A fixed-size group of receptive fields; one training example.
pub type FieldGroup = Vec<ReceptiveField>;
