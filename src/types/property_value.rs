//! Property values carried by provenance nodes and edges.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Property map of a node or an edge, keyed by property name.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A scalar or list-of-scalar property value as returned by the graph database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
  Bool(bool),
  Int(i64),
  Float(f64),
  Str(String),
  List(Vec<PropertyValue>),
}

impl PropertyValue {
  /// Integer view; only `Int` values qualify.
  pub fn as_i64(&self) -> Option<i64> {
    match self {
      PropertyValue::Int(v) => Some(*v),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      PropertyValue::Str(s) => Some(s),
      _ => None,
    }
  }

  /// True for empty strings and empty lists.
  pub fn is_empty(&self) -> bool {
    match self {
      PropertyValue::Str(s) => s.is_empty(),
      PropertyValue::List(items) => items.is_empty(),
      _ => false,
    }
  }

  /// Truthiness used for flags such as `anomalous`.
  pub fn is_truthy(&self) -> bool {
    match self {
      PropertyValue::Bool(b) => *b,
      PropertyValue::Int(v) => *v != 0,
      PropertyValue::Float(v) => *v != 0.0,
      PropertyValue::Str(s) => !s.is_empty() && !s.eq_ignore_ascii_case("false"),
      PropertyValue::List(items) => !items.is_empty(),
    }
  }

  /// The value that gets hashed: the first element of a list, the value itself otherwise.
  pub fn primary(&self) -> Option<&PropertyValue> {
    match self {
      PropertyValue::List(items) => items.first(),
      other => Some(other),
    }
  }

  /// Text form of [`PropertyValue::primary`], or `None` for an empty list.
  pub fn hash_text(&self) -> Option<String> {
    self.primary().map(|v| v.to_string())
  }
}

impl fmt::Display for PropertyValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PropertyValue::Bool(b) => write!(f, "{}", b),
      PropertyValue::Int(v) => write!(f, "{}", v),
      PropertyValue::Float(v) => write!(f, "{}", v),
      PropertyValue::Str(s) => f.write_str(s),
      PropertyValue::List(items) => {
        f.write_str("[")?;
        for (i, item) in items.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          write!(f, "{}", item)?;
        }
        f.write_str("]")
      }
    }
  }
}

impl From<&str> for PropertyValue {
  fn from(s: &str) -> Self {
    PropertyValue::Str(s.to_string())
  }
}

impl From<String> for PropertyValue {
  fn from(s: String) -> Self {
    PropertyValue::Str(s)
  }
}

impl From<i64> for PropertyValue {
  fn from(v: i64) -> Self {
    PropertyValue::Int(v)
  }
}

impl From<i32> for PropertyValue {
  fn from(v: i32) -> Self {
    PropertyValue::Int(i64::from(v))
  }
}

impl From<bool> for PropertyValue {
  fn from(b: bool) -> Self {
    PropertyValue::Bool(b)
  }
}

impl From<Vec<PropertyValue>> for PropertyValue {
  fn from(items: Vec<PropertyValue>) -> Self {
    PropertyValue::List(items)
  }
}
