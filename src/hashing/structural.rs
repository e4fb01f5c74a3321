//! Structural fingerprints of nodes and edges.

use std::fmt;

use tracing::instrument;

use super::simhash::{leading_digits, property_digest};
use crate::config::{ChannelHash, HashingConfig};
use crate::graph_store::GraphStore;
use crate::types::{Edge, Node, NodeId, PropertyValue};

/// One positional slot of a [`NodeHash`]: a value below `10^digits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HashSlot {
  pub value: u64,
  pub digits: u32,
}

/// Mixed-radix node fingerprint.
///
/// Numerically it is `labels * 10^(sum of digits) + slot_1 * 10^(...) + ... + slot_n`,
/// which overflows every fixed-width integer for the default digit budget. The
/// slots are kept apart instead: since each slot is below its radix, comparing
/// `(labels, slots)` lexicographically orders hashes exactly like the integer.
/// `Display` prints the full decimal integer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeHash {
  pub labels: u64,
  pub slots: Vec<HashSlot>,
}

impl fmt::Display for NodeHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut digits = if self.labels > 0 {
      self.labels.to_string()
    } else {
      String::new()
    };
    for slot in &self.slots {
      digits.push_str(&format!("{:0width$}", slot.value, width = slot.digits as usize));
    }
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
      f.write_str("0")
    } else {
      f.write_str(trimmed)
    }
  }
}

/// Computes node and edge fingerprints from an immutable [`HashingConfig`].
#[derive(Debug, Clone, Default)]
pub struct StructuralHasher {
  config: HashingConfig,
}

impl StructuralHasher {
  pub fn new(config: HashingConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &HashingConfig {
    &self.config
  }

  /// Sum of the label weights. Unknown labels weigh 0.
  pub fn label_hash(&self, node: &Node) -> u64 {
    node
      .labels
      .iter()
      .filter_map(|l| self.config.node_label_weights.get(l))
      .sum()
  }

  /// Digest of a property value; `None` when it is empty.
  fn value_digest(value: &PropertyValue) -> Option<u64> {
    if value.is_empty() {
      return None;
    }
    value.hash_text().map(|t| property_digest(&t))
  }

  /// Label weights followed by one slot per hashed property. Absent or empty
  /// properties fill their slot with zero.
  pub fn node_hash(&self, node: &Node) -> NodeHash {
    let slots = self
      .config
      .hashed_properties
      .iter()
      .map(|p| HashSlot {
        value: node
          .property(&p.name)
          .and_then(Self::value_digest)
          .map(|d| leading_digits(d, p.digits))
          .unwrap_or(0),
        digits: p.digits,
      })
      .collect();
    NodeHash {
      labels: self.label_hash(node),
      slots,
    }
  }

  pub fn edge_type_weight(&self, edge: &Edge) -> u64 {
    self
      .config
      .edge_type_weights
      .get(&edge.kind)
      .copied()
      .unwrap_or(0)
  }

  /// Weight of the `state` property; 0 when absent or unknown.
  pub fn edge_state_weight(&self, edge: &Edge) -> u64 {
    edge
      .state()
      .and_then(|s| self.config.edge_state_weights.get(s))
      .copied()
      .unwrap_or(0)
  }

  pub fn edge_hash(&self, edge: &Edge) -> u64 {
    self.edge_type_weight(edge) + self.edge_state_weight(edge)
  }

  /// Per-channel tensor value of `property`, or `None` if the node lacks it.
  pub fn channel_value(&self, node: &Node, property: &str, kind: ChannelHash) -> Option<u64> {
    let digest = node.property(property).and_then(Self::value_digest)?;
    Some(match kind {
      ChannelHash::SimHash => digest,
      ChannelHash::LabelsAndProperty => {
        let digits = self.config.channel_digits;
        self
          .label_hash(node)
          .saturating_mul(10u64.pow(digits))
          .saturating_add(leading_digits(digest, digits))
      }
    })
  }

  /// Sorts `ids` by node hash, ties by id. Ids missing from `store` sort last.
  pub fn sort_by_node_hash(&self, ids: &mut [NodeId], store: &GraphStore) {
    ids.sort_by_cached_key(|id| {
      let hash = store.node(*id).map(|n| self.node_hash(n));
      (hash.is_none(), hash, *id)
    });
  }

  /// Every node of the graph ordered by node hash (ties by id).
  #[instrument(level = "trace", skip(self, store))]
  pub fn canonical_order(&self, store: &GraphStore) -> Vec<NodeId> {
    let mut ids = store.node_ids();
    self.sort_by_node_hash(&mut ids, store);
    ids
  }
}
