//! Tests for `ReceptiveFieldBuilder`.

use std::collections::BTreeSet;

use proptest::prelude::*;

use crate::config::Labeling;
use crate::error::PipelineError;
use crate::graph_store::GraphStore;
use crate::receptive_field::{ReceptiveFieldBuilder, get_related_edges};
use crate::types::{Edge, Node};

fn node(id: i64) -> Node {
  Node::new(id).with_property("timestamp", id)
}

fn builder() -> ReceptiveFieldBuilder {
  ReceptiveFieldBuilder::default()
}

/// 4 -> 3 -> 2 -> 1: each node points at the older one it depends on.
fn chain(n: i64) -> GraphStore {
  GraphStore::from_parts(
    (1..=n).map(node),
    (2..=n).map(|i| Edge::new(i, i, i - 1, "PROC_OBJ")),
  )
}

#[test]
fn bfs_walks_towards_causes() {
  let store = chain(4);
  let field = builder().get_receptive_field(4, &store, 3);
  assert_eq!(field.root, 4);
  assert_eq!(field.nodes, vec![4, 3, 2]);
  assert_eq!(field.edges, vec![3, 4]);
  // The oldest node has no history to pick up.
  assert_eq!(builder().get_receptive_field(1, &store, 3).nodes, vec![1]);
}

#[test]
fn newer_node_reaches_its_predecessor() {
  let store = GraphStore::from_parts((1..=2).map(node), vec![Edge::new(10, 2, 1, "PROC_OBJ")]);
  assert_eq!(builder().get_receptive_field(2, &store, 2).nodes, vec![2, 1]);
  assert_eq!(builder().get_receptive_field(1, &store, 2).nodes, vec![1]);
}

#[test]
fn ties_break_by_edge_hash() {
  let store = GraphStore::from_parts(
    (1..=4).map(node),
    vec![
      Edge::new(1, 1, 2, "PROC_OBJ").with_state("READ"),
      Edge::new(2, 1, 3, "PROC_PARENT").with_state("NONE"),
      Edge::new(3, 1, 4, "PROC_OBJ").with_state("RaW"),
    ],
  );
  assert_eq!(builder().get_receptive_field(1, &store, 2).nodes, vec![1, 4]);
  assert_eq!(builder().get_receptive_field(1, &store, 4).nodes, vec![1, 4, 2, 3]);
}

#[test]
fn cycles_visit_each_node_once() {
  let store = GraphStore::from_parts(
    (1..=2).map(node),
    vec![Edge::new(1, 1, 2, "COMM"), Edge::new(2, 2, 1, "COMM")],
  );
  let field = builder().get_receptive_field(1, &store, 5);
  assert_eq!(field.nodes, vec![1, 2]);
  assert_eq!(field.edges, vec![1, 2]);
}

#[test]
fn unknown_root_or_zero_size_is_empty() {
  let store = chain(3);
  assert!(builder().get_receptive_field(42, &store, 3).is_empty());
  assert!(builder().get_receptive_field(1, &store, 0).is_empty());
}

#[test]
fn related_edges_need_both_endpoints() {
  let store = chain(4);
  assert_eq!(get_related_edges(&[1, 2, 4], &store), vec![2]);
  assert!(get_related_edges(&[], &store).is_empty());
}

#[test]
fn field_order_uses_node_hash_and_keeps_bfs_ties() {
  let store = GraphStore::from_parts(
    vec![
      node(1).with_label("Process"),
      node(2).with_label("File"),
      node(3).with_label("Process"),
      node(4).with_label("File"),
    ],
    vec![
      Edge::new(1, 1, 4, "PROC_OBJ"),
      Edge::new(2, 1, 3, "PROC_PARENT"),
      Edge::new(3, 1, 2, "PROC_OBJ").with_state("READ"),
    ],
  );
  let b = builder();
  let mut field = b.get_receptive_field(1, &store, 4);
  assert_eq!(field.nodes, vec![1, 4, 2, 3]);
  b.order_field(&mut field, &store);
  assert_eq!(field.nodes, vec![4, 2, 1, 3]);
  assert_eq!(field.position(1), Some(2));
}

#[test]
fn groups_drop_the_trailing_partial_group() {
  let store = chain(7);
  let groups = builder()
    .build_groups_of_receptive_fields(&store, 2, 3, 1, Labeling::Timestamp)
    .unwrap();
  assert_eq!(groups.len(), 3);
  assert!(groups.iter().all(|g| g.len() == 2));
  let roots: Vec<i64> = groups.iter().flatten().map(|f| f.root).collect();
  assert_eq!(roots, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn stride_skips_roots() {
  let store = chain(7);
  let groups = builder()
    .build_groups_of_receptive_fields(&store, 1, 2, 3, Labeling::Timestamp)
    .unwrap();
  let roots: Vec<i64> = groups.iter().flatten().map(|f| f.root).collect();
  assert_eq!(roots, vec![1, 4, 7]);
}

#[test]
fn empty_graph_yields_no_groups() {
  let groups = builder()
    .build_groups_of_receptive_fields(&GraphStore::new(), 1, 3, 1, Labeling::Timestamp)
    .unwrap();
  assert!(groups.is_empty());
}

#[test]
fn zero_stride_is_rejected() {
  let err = builder()
    .build_groups_of_receptive_fields(&chain(2), 1, 3, 0, Labeling::Timestamp)
    .unwrap_err();
  assert!(matches!(err, PipelineError::InvalidConfig(_)));
}

#[test]
fn missing_timestamp_fails_root_ordering() {
  let store = GraphStore::from_parts(vec![node(1), Node::new(2)], vec![]);
  let err = builder()
    .build_groups_of_receptive_fields(&store, 1, 3, 1, Labeling::Timestamp)
    .unwrap_err();
  assert!(matches!(err, PipelineError::DataIntegrity { node_id: 2, .. }));
}

/// Nodes reachable from `root` by walking edges from `start` to `end`.
fn reachable(store: &GraphStore, root: i64) -> usize {
  let mut seen = BTreeSet::from([root]);
  let mut stack = vec![root];
  while let Some(n) = stack.pop() {
    for edge in store.outgoing(n).iter().filter_map(|e| store.edge(*e)) {
      if seen.insert(edge.end) {
        stack.push(edge.end);
      }
    }
  }
  seen.len()
}

fn random_graph() -> impl Strategy<Value = GraphStore> {
  (1i64..12).prop_flat_map(|n| {
    prop::collection::vec((1..=n, 1..=n), 0..30).prop_map(move |pairs| {
      GraphStore::from_parts(
        (1..=n).map(node),
        pairs
          .into_iter()
          .enumerate()
          .map(|(i, (s, e))| Edge::new(i as i64, s, e, "PROC_OBJ")),
      )
    })
  })
}

proptest! {
  #[test]
  fn field_len_is_min_of_size_and_reachable(store in random_graph(), k in 1usize..8) {
    for root in store.node_ids() {
      let field = builder().get_receptive_field(root, &store, k);
      prop_assert_eq!(field.len(), k.min(reachable(&store, root)));
      let unique: BTreeSet<_> = field.nodes.iter().collect();
      prop_assert_eq!(unique.len(), field.len());
    }
  }

  #[test]
  fn group_count_is_floor_of_roots(n in 1i64..40, stride in 1usize..5, f in 1usize..5) {
    let store = chain(n);
    let groups = builder()
      .build_groups_of_receptive_fields(&store, f, 3, stride, Labeling::Timestamp)
      .unwrap();
    let roots = (n as usize).div_ceil(stride);
    prop_assert_eq!(groups.len(), roots / f);
  }
}
