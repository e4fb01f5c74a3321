//! Structural attack patterns used to label raw graphs.
//!
//! A [`PatternRegistry`] is an ordered list of `(label, predicate)` pairs. A
//! graph takes the label of the first pattern matched at any of its nodes,
//! or the registry's negative label when nothing matches.

use std::fmt;
use std::sync::Arc;

use tracing::instrument;

use crate::graph_store::GraphStore;
use crate::types::NodeId;

/// Predicate evaluated at one node of a graph.
pub type PatternFn = Arc<dyn Fn(&GraphStore, NodeId) -> bool + Send + Sync>;

/// Class label given to downloaded-then-written files by the default registry.
pub const DOWNLOAD_FILE_WRITE: i64 = 1;
/// Class label for graphs matching no registered pattern.
pub const NO_PATTERN: i64 = 0;

/// `(m1:File)-[state RaW|WRITE]->(node)<-[]-(m2:Socket)`: the node has an
/// incoming edge from a socket and a writing incoming edge from a file.
pub fn matches_download_file_write(store: &GraphStore, node: NodeId) -> bool {
  let mut found_socket = false;
  let mut found_file = false;
  for edge in store.incoming(node).iter().filter_map(|e| store.edge(*e)) {
    let Some(predecessor) = store.node(edge.start) else {
      continue;
    };
    if predecessor.has_label("Socket") {
      found_socket = true;
    } else if predecessor.has_label("File") && matches!(edge.state(), Some("RaW" | "WRITE")) {
      found_file = true;
    }
  }
  found_socket && found_file
}

#[derive(Clone)]
struct Pattern {
  name: String,
  label: i64,
  predicate: PatternFn,
}

/// Ordered pattern table; earlier registrations win.
#[derive(Clone)]
pub struct PatternRegistry {
  patterns: Vec<Pattern>,
  negative_label: i64,
}

impl fmt::Debug for PatternRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PatternRegistry")
      .field("patterns", &self.names())
      .field("negative_label", &self.negative_label)
      .finish()
  }
}

impl Default for PatternRegistry {
  /// The download-then-write pattern as class 1, everything else class 0.
  fn default() -> Self {
    Self::new(NO_PATTERN).register(
      "download_file_write",
      DOWNLOAD_FILE_WRITE,
      matches_download_file_write,
    )
  }
}

impl PatternRegistry {
  /// An empty registry labeling every graph `negative_label`.
  pub fn new(negative_label: i64) -> Self {
    Self {
      patterns: Vec::new(),
      negative_label,
    }
  }

  /// Appends a pattern after those already registered.
  pub fn register<F>(mut self, name: impl Into<String>, label: i64, predicate: F) -> Self
  where
    F: Fn(&GraphStore, NodeId) -> bool + Send + Sync + 'static,
  {
    self.patterns.push(Pattern {
      name: name.into(),
      label,
      predicate: Arc::new(predicate),
    });
    self
  }

  pub fn negative_label(&self) -> i64 {
    self.negative_label
  }

  pub fn names(&self) -> Vec<&str> {
    self.patterns.iter().map(|p| p.name.as_str()).collect()
  }

  pub fn len(&self) -> usize {
    self.patterns.len()
  }

  pub fn is_empty(&self) -> bool {
    self.patterns.is_empty()
  }

  /// Label of the first pattern matching any node, else the negative label.
  #[instrument(level = "trace", skip(self, store))]
  pub fn classify(&self, store: &GraphStore) -> i64 {
    self
      .patterns
      .iter()
      .find(|p| store.node_ids().into_iter().any(|n| (p.predicate)(store, n)))
      .map(|p| p.label)
      .unwrap_or(self.negative_label)
  }
}
