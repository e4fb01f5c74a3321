//! Removal of capture artifacts.

use tracing::{debug, instrument};

use crate::graph_store::GraphStore;
use crate::types::NodeId;

/// Deletes nodes flagged `anomalous` or lacking an integer `timestamp`,
/// together with their incident edges. Returns the number of nodes removed.
#[instrument(level = "trace", skip(store))]
pub fn remove_anomalous(store: &mut GraphStore) -> usize {
  let doomed: Vec<NodeId> = store
    .nodes()
    .filter(|n| n.is_anomalous() || n.timestamp().is_none())
    .map(|n| n.id)
    .collect();
  for id in &doomed {
    store.remove_node(*id);
  }
  debug!(removed = doomed.len(), "removed anomalous nodes");
  doomed.len()
}
