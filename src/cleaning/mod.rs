//! In-place cleaning of a provenance graph.
//!
//! The passes run in a fixed order: version consolidation creates parallel
//! edges, which must be gone before anomaly removal cascades through the
//! store, and name normalization comes last.

mod anomalies;
mod duplicate_edges;
mod symlinks;
mod version_consolidation;

use tracing::{debug, instrument};

use crate::error::{PipelineError, Result};
use crate::graph_store::GraphStore;

pub use anomalies::remove_anomalous;
pub use duplicate_edges::remove_duplicate_parallel_edges;
pub use symlinks::normalize_symlinked_names;
pub use version_consolidation::consolidate_versions;

/// What each cleaning pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningReport {
  pub versions_merged: usize,
  pub duplicate_edges_removed: usize,
  pub anomalous_removed: usize,
  pub names_normalized: usize,
}

/// Runs every pass in order, then verifies the result.
#[instrument(level = "trace", skip(store))]
pub fn clean_graph(store: &mut GraphStore) -> Result<CleaningReport> {
  let report = CleaningReport {
    versions_merged: consolidate_versions(store),
    duplicate_edges_removed: remove_duplicate_parallel_edges(store),
    anomalous_removed: remove_anomalous(store),
    names_normalized: normalize_symlinked_names(store),
  };
  check_integrity(store)?;
  debug!(
    nodes = store.node_count(),
    edges = store.edge_count(),
    ?report,
    "graph cleaned"
  );
  Ok(report)
}

/// Fails unless every node has a timestamp, every edge joins stored nodes and
/// the adjacency indices match the edge map.
pub fn check_integrity(store: &GraphStore) -> Result<()> {
  if let Some(node) = store.nodes().find(|n| n.timestamp().is_none()) {
    return Err(PipelineError::DataIntegrity {
      node_id: node.id,
      reason: "missing timestamp".to_string(),
    });
  }
  for edge in store.edges() {
    for endpoint in [edge.start, edge.end] {
      if !store.contains_node(endpoint) {
        return Err(PipelineError::DataIntegrity {
          node_id: endpoint,
          reason: format!("edge {} references a missing node", edge.id),
        });
      }
    }
  }
  if !store.indices_consistent() {
    return Err(PipelineError::DataIntegrity {
      node_id: store.node_ids().first().copied().unwrap_or_default(),
      reason: "adjacency indices diverge from the edge map".to_string(),
    });
  }
  Ok(())
}
