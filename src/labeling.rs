//! Labeling functions: the linear node order from which roots are drawn.

use tracing::instrument;

use crate::config::Labeling;
use crate::error::{PipelineError, Result};
use crate::graph_store::GraphStore;
use crate::hashing::StructuralHasher;
use crate::types::NodeId;

/// Every node of `store`, ascending under `labeling`. Ties break by id.
///
/// `Labeling::Timestamp` fails with `DataIntegrity` on the first node (by id)
/// lacking an integer timestamp.
#[instrument(level = "trace", skip(store, hasher))]
pub fn order_nodes(
  store: &GraphStore,
  labeling: Labeling,
  hasher: &StructuralHasher,
) -> Result<Vec<NodeId>> {
  match labeling {
    Labeling::Timestamp => {
      let mut keyed = store
        .nodes()
        .map(|n| {
          n.timestamp()
            .map(|ts| (ts, n.id))
            .ok_or_else(|| PipelineError::DataIntegrity {
              node_id: n.id,
              reason: "missing timestamp".to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
      keyed.sort_unstable();
      Ok(keyed.into_iter().map(|(_, id)| id).collect())
    }
    Labeling::StructuralHash => Ok(hasher.canonical_order(store)),
  }
}
