//! Synthetic two-class graphs for exercising the pipeline without a database.
//!
//! Class 0 graphs carry a fixed pattern stamped onto a base topology. Class 1
//! graphs are the same pattern with one small perturbation: a relabeled node,
//! an altered command line or a changed edge state.

use std::collections::BTreeSet;

use rand::Rng;
use tracing::{debug, instrument};

use crate::graph_store::GraphStore;
use crate::types::{CMDLINE, Edge, EdgeId, NAME, Node, NodeId, TIMESTAMP};

pub const PATTERN_CMDLINE: &str = "/My/name/is/Homer/Simpson/";
pub const PATTERN_NAME: &str = "/super/secret/password/database/pwd.db";
pub const PERTURBED_CMDLINE: &str = "/My/name/is/Homer/Thompson/";

/// Edges `(id, start, end)` shared by both base graphs.
const BASE_EDGES: [(EdgeId, NodeId, NodeId); 15] = [
  (1, 3, 1),
  (2, 4, 1),
  (3, 2, 1),
  (4, 4, 12),
  (5, 5, 3),
  (6, 7, 5),
  (7, 14, 7),
  (8, 6, 3),
  (9, 8, 6),
  (10, 13, 8),
  (11, 15, 8),
  (12, 6, 9),
  (13, 16, 9),
  (14, 9, 10),
  (15, 2, 11),
];

fn bare_node(id: NodeId) -> Node {
  Node::new(id).with_property(TIMESTAMP, id)
}

fn bare_edge((id, start, end): (EdgeId, NodeId, NodeId)) -> Edge {
  Edge::new(id, start, end, "")
}

/// Sixteen unlabeled nodes (timestamp = id) and fifteen untyped edges.
pub fn base_graph_16() -> GraphStore {
  GraphStore::from_parts((1..=16).map(bare_node), BASE_EDGES.into_iter().map(bare_edge))
}

/// The 16-node graph plus nodes 17..=32, each fed by node 6.
pub fn base_graph_32() -> GraphStore {
  let fan_out = (16..=31).map(|id| (id, 6, id + 1));
  GraphStore::from_parts(
    (1..=32).map(bare_node),
    BASE_EDGES.into_iter().chain(fan_out).map(bare_edge),
  )
}

/// Rewrites labels, properties and edge types into the class-0 pattern:
/// nodes with two or three incoming edges become processes, the rest global
/// files; process-to-process edges are PROC_PARENT/NONE, all others
/// PROC_OBJ/RaW.
#[instrument(level = "trace", skip(store))]
pub fn stamp_pattern(store: &GraphStore) -> GraphStore {
  let nodes: Vec<Node> = store
    .nodes()
    .map(|n| {
      let mut node = n.clone();
      node.labels.clear();
      if matches!(store.incoming(n.id).len(), 2 | 3) {
        node.labels.insert("Process".to_string());
      } else {
        node.labels.insert("File".to_string());
        node.labels.insert("Global".to_string());
      }
      node
        .with_property(CMDLINE, PATTERN_CMDLINE)
        .with_property(NAME, PATTERN_NAME)
    })
    .collect();
  let processes: BTreeSet<NodeId> = nodes
    .iter()
    .filter(|n| n.has_label("Process"))
    .map(|n| n.id)
    .collect();
  let is_process = |id: NodeId| processes.contains(&id);
  let edges: Vec<Edge> = store
    .edges()
    .map(|e| {
      let (kind, state) = if is_process(e.start) && is_process(e.end) {
        ("PROC_PARENT", "NONE")
      } else {
        ("PROC_OBJ", "RaW")
      };
      Edge::new(e.id, e.start, e.end, kind).with_state(state)
    })
    .collect();
  GraphStore::from_parts(nodes, edges)
}

/// The single change [`perturb`] made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perturbation {
  /// Node relabeled as a socket.
  Label(NodeId),
  /// Node command line replaced with [`PERTURBED_CMDLINE`].
  Cmdline(NodeId),
  /// Edge state set to SERVER.
  EdgeState(EdgeId),
}

/// Applies one random perturbation. Returns `None` when the store has no
/// element of the chosen kind.
pub fn perturb<R: Rng + ?Sized>(store: &mut GraphStore, rng: &mut R) -> Option<Perturbation> {
  let choice = rng.gen_range(0..3);
  let nodes = store.node_ids();
  let edges = store.edge_ids();
  let change = match choice {
    0 | 1 => {
      if nodes.is_empty() {
        return None;
      }
      let mut node = store.node(nodes[rng.gen_range(0..nodes.len())])?.clone();
      let change = if choice == 0 {
        node.labels.clear();
        node.labels.insert("Socket".to_string());
        Perturbation::Label(node.id)
      } else {
        node = node.with_property(CMDLINE, PERTURBED_CMDLINE);
        Perturbation::Cmdline(node.id)
      };
      store.insert_node(node);
      change
    }
    _ => {
      if edges.is_empty() {
        return None;
      }
      let edge = store.edge(edges[rng.gen_range(0..edges.len())])?.clone();
      let id = edge.id;
      store.insert_edge(edge.with_state("SERVER"));
      Perturbation::EdgeState(id)
    }
  };
  debug!(?change, "perturbed graph");
  Some(change)
}

/// `per_class` stamped copies of `base` labeled 0, followed by `per_class`
/// perturbed copies labeled 1.
pub fn make_dataset<R: Rng + ?Sized>(
  base: &GraphStore,
  per_class: usize,
  rng: &mut R,
) -> Vec<(i64, GraphStore)> {
  let pattern = stamp_pattern(base);
  let mut graphs = Vec::with_capacity(per_class * 2);
  graphs.extend((0..per_class).map(|_| (0, pattern.clone())));
  for _ in 0..per_class {
    let mut tweaked = pattern.clone();
    perturb(&mut tweaked, rng);
    graphs.push((1, tweaked));
  }
  graphs
}
