//! Tests for `patterns`.

use crate::graph_store::GraphStore;
use crate::patterns::{
  DOWNLOAD_FILE_WRITE, NO_PATTERN, PatternRegistry, matches_download_file_write,
};
use crate::types::{Edge, Node};

fn labeled(id: i64, label: &str) -> Node {
  Node::new(id).with_label(label).with_property("timestamp", id)
}

/// Socket 1 and File 2 both feed Process 3.
fn download(state: &str) -> GraphStore {
  GraphStore::from_parts(
    vec![labeled(1, "Socket"), labeled(2, "File"), labeled(3, "Process")],
    vec![
      Edge::new(1, 1, 3, "COMM").with_state("CLIENT"),
      Edge::new(2, 2, 3, "PROC_OBJ").with_state(state),
    ],
  )
}

#[test]
fn download_write_matches_at_the_successor() {
  let store = download("RaW");
  assert!(matches_download_file_write(&store, 3));
  assert!(!matches_download_file_write(&store, 1));
  assert!(matches_download_file_write(&download("WRITE"), 3));
}

#[test]
fn reading_the_file_does_not_match() {
  assert!(!matches_download_file_write(&download("READ"), 3));
}

#[test]
fn socket_alone_does_not_match() {
  let store = GraphStore::from_parts(
    vec![labeled(1, "Socket"), labeled(3, "Process")],
    vec![Edge::new(1, 1, 3, "COMM")],
  );
  assert!(!matches_download_file_write(&store, 3));
}

#[test]
fn default_registry_labels_graphs() {
  let registry = PatternRegistry::default();
  assert_eq!(registry.names(), vec!["download_file_write"]);
  assert_eq!(registry.classify(&download("RaW")), DOWNLOAD_FILE_WRITE);
  assert_eq!(registry.classify(&download("READ")), NO_PATTERN);
  assert_eq!(registry.classify(&GraphStore::new()), NO_PATTERN);
}

#[test]
fn first_registered_pattern_wins() {
  let registry = PatternRegistry::new(-1)
    .register("has_process", 5, |s: &GraphStore, n| {
      s.node(n).is_some_and(|n| n.has_label("Process"))
    })
    .register("anything", 6, |_: &GraphStore, _| true);
  assert_eq!(registry.len(), 2);
  assert_eq!(registry.classify(&download("RaW")), 5);
  let files = GraphStore::from_parts(vec![labeled(1, "File")], vec![]);
  assert_eq!(registry.classify(&files), 6);
  assert_eq!(PatternRegistry::new(-1).classify(&files), -1);
}
