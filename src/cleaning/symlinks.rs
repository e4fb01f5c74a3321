//! Name normalization across the members of one logical file.

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::graph_store::GraphStore;
use crate::types::{NAME, NodeId, PropertyValue, UUID};

/// Nodes sharing a non-empty `uuid`, keyed by its text form.
fn uuid_groups(store: &GraphStore) -> BTreeMap<String, Vec<NodeId>> {
  let mut groups: BTreeMap<String, Vec<NodeId>> = BTreeMap::new();
  for node in store.nodes() {
    if let Some(uuid) = node.property(UUID).filter(|v| !v.is_empty()) {
      groups.entry(uuid.to_string()).or_default().push(node.id);
    }
  }
  groups
}

/// Earliest member having both `timestamp` and `name`; equal timestamps go
/// to the lowest id.
fn canonical_name(store: &GraphStore, members: &[NodeId]) -> Option<(NodeId, PropertyValue)> {
  members
    .iter()
    .filter_map(|id| store.node(*id))
    .filter_map(|n| Some((n.timestamp()?, n.id, n.property(NAME)?)))
    .min_by_key(|(ts, id, _)| (*ts, *id))
    .map(|(_, id, name)| (id, name.clone()))
}

/// Gives every named member of a multi-node `uuid` group the name of the
/// group's canonical member. Groups without one are left alone. Returns the
/// number of names rewritten.
#[instrument(level = "trace", skip(store))]
pub fn normalize_symlinked_names(store: &mut GraphStore) -> usize {
  let mut renamed = 0;
  for (uuid, members) in uuid_groups(store) {
    if members.len() < 2 {
      continue;
    }
    let Some((canonical, name)) = canonical_name(store, &members) else {
      debug!(uuid = %uuid, "no canonical member, group left unchanged");
      continue;
    };
    for id in members {
      if id == canonical {
        continue;
      }
      let stale = store
        .node(id)
        .and_then(|n| n.property(NAME))
        .is_some_and(|current| *current != name);
      if stale && store.set_node_property(id, NAME, name.clone()) {
        renamed += 1;
      }
    }
  }
  debug!(renamed, "normalized symlinked names");
  renamed
}
