//! Path query results handed over by the graph-database query layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Edge, Node};

/// One path returned by a query: the nodes and relationships it traverses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPath {
  #[serde(default)]
  pub nodes: Vec<Node>,
  #[serde(default)]
  pub relationships: Vec<Edge>,
}

/// One query result record: path-variable name (e.g. `path1`) to the path bound to it.
pub type PathRecord = BTreeMap<String, GraphPath>;

/// Decodes a JSON array of path records.
pub fn parse_path_records(json: &str) -> Result<Vec<PathRecord>, serde_json::Error> {
  serde_json::from_str(json)
}
