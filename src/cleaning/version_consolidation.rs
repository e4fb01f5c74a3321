//! Collapses version chains into their newest node.

use std::collections::VecDeque;

use tracing::{debug, instrument};

use crate::graph_store::{Endpoint, GraphStore};
use crate::types::EdgeId;

/// Merges the superseded end of every version link into its master.
///
/// All outgoing edges of the superseded node are re-pointed to start at the
/// master. Incoming edges are re-pointed to end at the master, except those
/// already starting there; they go away with the superseded node. Each link is
/// read back from the store when its turn comes, so links re-pointed by an
/// earlier merge collapse chains of any depth into their head. Returns the
/// number of nodes merged away.
#[instrument(level = "trace", skip(store))]
pub fn consolidate_versions(store: &mut GraphStore) -> usize {
  let mut pending: VecDeque<EdgeId> = store
    .edges()
    .filter(|e| e.is_version_link())
    .map(|e| e.id)
    .collect();
  let mut merged = 0;
  while let Some(link) = pending.pop_front() {
    // Links into a node merged away earlier were removed with it.
    let Some((master, superseded)) = store.edge(link).map(|e| (e.start, e.end)) else {
      continue;
    };
    store.remove_edge(link);
    if master == superseded {
      continue;
    }
    for edge_id in store.outgoing(superseded).to_vec() {
      store.rewire_edge_endpoint(edge_id, Endpoint::Start(master));
    }
    for edge_id in store.incoming(superseded).to_vec() {
      let from_master = store.edge(edge_id).is_some_and(|e| e.start == master);
      if !from_master {
        store.rewire_edge_endpoint(edge_id, Endpoint::End(master));
      }
    }
    store.remove_node(superseded);
    merged += 1;
  }
  debug!(merged, "consolidated node versions");
  merged
}
