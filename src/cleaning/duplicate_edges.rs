//! Drops parallel edges left behind by version consolidation.

use std::collections::BTreeSet;

use tracing::{debug, instrument};

use crate::graph_store::GraphStore;

/// Keeps only the first edge (in outgoing-list order) from each node to each
/// destination. Returns the number of edges removed.
#[instrument(level = "trace", skip(store))]
pub fn remove_duplicate_parallel_edges(store: &mut GraphStore) -> usize {
  let mut redundant = Vec::new();
  for node in store.node_ids() {
    let mut destinations = BTreeSet::new();
    for &edge_id in store.outgoing(node) {
      let Some(edge) = store.edge(edge_id) else {
        continue;
      };
      if !destinations.insert(edge.end) {
        redundant.push(edge_id);
      }
    }
  }
  for edge_id in &redundant {
    store.remove_edge(*edge_id);
  }
  debug!(removed = redundant.len(), "removed parallel edges");
  redundant.len()
}
