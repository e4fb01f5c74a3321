//! In-memory provenance graph with derived adjacency indices.
//!
//! Nodes and edges live in id-keyed maps; `incoming`/`outgoing` hold edge ids
//! only and are maintained by every mutating method, so they always equal what
//! a fresh scan of `edges` would produce.

use std::collections::BTreeMap;

use tracing::{instrument, warn};

use crate::types::{Edge, EdgeId, Node, NodeId, PathRecord, PropertyValue};

type AdjacencyIndex = BTreeMap<NodeId, Vec<EdgeId>>;

/// Which end of an edge to repoint, and where to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
  Start(NodeId),
  End(NodeId),
}

/// Nodes, edges and the incoming/outgoing indices of a single provenance graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphStore {
  nodes: BTreeMap<NodeId, Node>,
  edges: BTreeMap<EdgeId, Edge>,
  incoming: AdjacencyIndex,
  outgoing: AdjacencyIndex,
}

/// Builds both indices in a single pass over `edges`.
fn derive_indices(edges: &BTreeMap<EdgeId, Edge>) -> (AdjacencyIndex, AdjacencyIndex) {
  let mut incoming = AdjacencyIndex::new();
  let mut outgoing = AdjacencyIndex::new();
  for edge in edges.values() {
    incoming.entry(edge.end).or_default().push(edge.id);
    outgoing.entry(edge.start).or_default().push(edge.id);
  }
  (incoming, outgoing)
}

/// Removes `edge` from `node`'s list, dropping the list once empty.
fn detach(index: &mut AdjacencyIndex, node: NodeId, edge: EdgeId) {
  if let Some(list) = index.get_mut(&node) {
    list.retain(|e| *e != edge);
    if list.is_empty() {
      index.remove(&node);
    }
  }
}

fn sorted_index(index: &AdjacencyIndex) -> AdjacencyIndex {
  index
    .iter()
    .filter(|(_, list)| !list.is_empty())
    .map(|(node, list)| {
      let mut list = list.clone();
      list.sort_unstable();
      (*node, list)
    })
    .collect()
}

impl GraphStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Merges every path of every record into one store. Repeated ids collapse to
  /// one entry; edges whose endpoints never appear as nodes are dropped.
  #[instrument(level = "trace", skip(records))]
  pub fn build<I>(records: I) -> Self
  where
    I: IntoIterator<Item = PathRecord>,
  {
    let mut nodes = BTreeMap::new();
    let mut edges = BTreeMap::new();
    for record in records {
      for path in record.into_values() {
        for node in path.nodes {
          nodes.insert(node.id, node);
        }
        for edge in path.relationships {
          edges.insert(edge.id, edge);
        }
      }
    }
    Self::from_maps(nodes, edges)
  }

  /// Builds a store from already materialized nodes and edges.
  pub fn from_parts<N, E>(nodes: N, edges: E) -> Self
  where
    N: IntoIterator<Item = Node>,
    E: IntoIterator<Item = Edge>,
  {
    let nodes = nodes.into_iter().map(|n| (n.id, n)).collect();
    let edges = edges.into_iter().map(|e| (e.id, e)).collect();
    Self::from_maps(nodes, edges)
  }

  fn from_maps(nodes: BTreeMap<NodeId, Node>, mut edges: BTreeMap<EdgeId, Edge>) -> Self {
    edges.retain(|id, edge| {
      let known = nodes.contains_key(&edge.start) && nodes.contains_key(&edge.end);
      if !known {
        warn!(edge_id = id, start = edge.start, end = edge.end, "dropping edge with unknown endpoint");
      }
      known
    });
    let (incoming, outgoing) = derive_indices(&edges);
    Self {
      nodes,
      edges,
      incoming,
      outgoing,
    }
  }

  /// Inserts or replaces a node. Edges attached to an existing id stay attached.
  pub fn insert_node(&mut self, node: Node) {
    self.nodes.insert(node.id, node);
  }

  /// Inserts an edge and indexes it. Replaces an edge with the same id.
  /// Returns `false` without inserting when an endpoint is not in the store.
  pub fn insert_edge(&mut self, edge: Edge) -> bool {
    if !self.contains_node(edge.start) || !self.contains_node(edge.end) {
      return false;
    }
    self.remove_edge(edge.id);
    self.outgoing.entry(edge.start).or_default().push(edge.id);
    self.incoming.entry(edge.end).or_default().push(edge.id);
    self.edges.insert(edge.id, edge);
    true
  }

  pub fn node(&self, id: NodeId) -> Option<&Node> {
    self.nodes.get(&id)
  }

  pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
    self.edges.get(&id)
  }

  /// Nodes in ascending id order.
  pub fn nodes(&self) -> impl Iterator<Item = &Node> {
    self.nodes.values()
  }

  /// Edges in ascending id order.
  pub fn edges(&self) -> impl Iterator<Item = &Edge> {
    self.edges.values()
  }

  pub fn node_ids(&self) -> Vec<NodeId> {
    self.nodes.keys().copied().collect()
  }

  pub fn edge_ids(&self) -> Vec<EdgeId> {
    self.edges.keys().copied().collect()
  }

  /// Ids of edges ending at `node`.
  pub fn incoming(&self, node: NodeId) -> &[EdgeId] {
    self.incoming.get(&node).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Ids of edges starting at `node`.
  pub fn outgoing(&self, node: NodeId) -> &[EdgeId] {
    self.outgoing.get(&node).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  pub fn edge_count(&self) -> usize {
    self.edges.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn contains_node(&self, id: NodeId) -> bool {
    self.nodes.contains_key(&id)
  }

  pub fn contains_edge(&self, id: EdgeId) -> bool {
    self.edges.contains_key(&id)
  }

  /// Overwrites one property of a node. Returns `false` if the node is absent.
  pub fn set_node_property(&mut self, id: NodeId, key: &str, value: PropertyValue) -> bool {
    match self.nodes.get_mut(&id) {
      Some(node) => {
        node.properties.insert(key.to_string(), value);
        true
      }
      None => false,
    }
  }

  /// Removes a node and every edge incident to it. No-op for an absent node.
  #[instrument(level = "trace", skip(self))]
  pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
    let node = self.nodes.remove(&id)?;
    let mut incident: Vec<EdgeId> = self.incoming(id).to_vec();
    incident.extend_from_slice(self.outgoing(id));
    for edge_id in incident {
      self.remove_edge(edge_id);
    }
    Some(node)
  }

  /// Removes an edge from the map and from both endpoint lists.
  pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
    let edge = self.edges.remove(&id)?;
    detach(&mut self.outgoing, edge.start, id);
    detach(&mut self.incoming, edge.end, id);
    Some(edge)
  }

  /// Repoints one end of an edge, moving it between the affected index lists.
  /// Returns `false` if the edge or the new endpoint node is absent.
  pub fn rewire_edge_endpoint(&mut self, id: EdgeId, endpoint: Endpoint) -> bool {
    let target = match endpoint {
      Endpoint::Start(n) | Endpoint::End(n) => n,
    };
    if !self.contains_node(target) {
      return false;
    }
    let Some(edge) = self.edges.get_mut(&id) else {
      return false;
    };
    match endpoint {
      Endpoint::Start(new_start) => {
        let old = std::mem::replace(&mut edge.start, new_start);
        detach(&mut self.outgoing, old, id);
        self.outgoing.entry(new_start).or_default().push(id);
      }
      Endpoint::End(new_end) => {
        let old = std::mem::replace(&mut edge.end, new_end);
        detach(&mut self.incoming, old, id);
        self.incoming.entry(new_end).or_default().push(id);
      }
    }
    true
  }

  /// True when both indices equal a from-scratch derivation over `edges`
  /// (compared as sets per node) and reference only stored nodes.
  pub fn indices_consistent(&self) -> bool {
    let (incoming, outgoing) = derive_indices(&self.edges);
    let nodes_known = self
      .incoming
      .keys()
      .chain(self.outgoing.keys())
      .all(|n| self.nodes.contains_key(n));
    nodes_known
      && sorted_index(&self.incoming) == sorted_index(&incoming)
      && sorted_index(&self.outgoing) == sorted_index(&outgoing)
  }
}
