//! A provenance node (process, file, socket, ...).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Properties, PropertyValue};

/// Database id of a node.
pub type NodeId = i64;

pub const TIMESTAMP: &str = "timestamp";
pub const UUID: &str = "uuid";
pub const NAME: &str = "name";
pub const CMDLINE: &str = "cmdline";
pub const ANOMALOUS: &str = "anomalous";

/// A provenance node as captured from system-call auditing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
  pub id: NodeId,
  #[serde(default)]
  pub labels: BTreeSet<String>,
  #[serde(default)]
  pub properties: Properties,
}

impl Node {
  pub fn new(id: NodeId) -> Self {
    Self {
      id,
      labels: BTreeSet::new(),
      properties: Properties::new(),
    }
  }

  /// Builder helper: adds a type label.
  pub fn with_label(mut self, label: impl Into<String>) -> Self {
    self.labels.insert(label.into());
    self
  }

  /// Builder helper: sets a property.
  pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
    self.properties.insert(key.into(), value.into());
    self
  }

  pub fn has_label(&self, label: &str) -> bool {
    self.labels.contains(label)
  }

  pub fn property(&self, key: &str) -> Option<&PropertyValue> {
    self.properties.get(key)
  }

  /// Happens-before ordering key. `None` when absent or not an integer.
  pub fn timestamp(&self) -> Option<i64> {
    self.property(TIMESTAMP).and_then(PropertyValue::as_i64)
  }

  /// Capture artifacts flagged by the auditing layer.
  pub fn is_anomalous(&self) -> bool {
    self
      .property(ANOMALOUS)
      .map(PropertyValue::is_truthy)
      .unwrap_or(false)
  }
}
