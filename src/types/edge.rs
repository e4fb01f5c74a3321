//! A directed provenance relationship.

use serde::{Deserialize, Serialize};

use super::{NodeId, Properties, PropertyValue};

/// Database id of an edge.
pub type EdgeId = i64;

pub const STATE: &str = "state";

/// Edge types linking a newer version of an object (`start`) to the version it supersedes (`end`).
pub const VERSION_TYPES: [&str; 3] = ["GLOB_OBJ_PREV", "META_PREV", "PROC_OBJ_PREV"];

/// A directed edge: `end` happened before `start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
  pub id: EdgeId,
  pub start: NodeId,
  pub end: NodeId,
  #[serde(rename = "type")]
  pub kind: String,
  #[serde(default)]
  pub properties: Properties,
}

impl Edge {
  pub fn new(id: EdgeId, start: NodeId, end: NodeId, kind: impl Into<String>) -> Self {
    Self {
      id,
      start,
      end,
      kind: kind.into(),
      properties: Properties::new(),
    }
  }

  /// Builder helper: sets the `state` property.
  pub fn with_state(mut self, state: impl Into<String>) -> Self {
    self
      .properties
      .insert(STATE.to_string(), PropertyValue::Str(state.into()));
    self
  }

  pub fn state(&self) -> Option<&str> {
    self.properties.get(STATE).and_then(PropertyValue::as_str)
  }

  pub fn is_version_link(&self) -> bool {
    VERSION_TYPES.contains(&self.kind.as_str())
  }

  pub fn is_self_loop(&self) -> bool {
    self.start == self.end
  }
}
