//! Tunable pipeline parameters.
//!
//! The pipeline is a library: configuration is plain data handed to
//! [`crate::PipelineOrchestrator::new`]. Both structs deserialize from JSON
//! with every field optional, falling back to the defaults below.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Largest digit count whose cardinality (`10^digits`) fits in a `u64`.
pub const MAX_DIGITS: u32 = 19;

/// A property folded into the structural node hash, with its digit budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedProperty {
  pub name: String,
  /// Order of magnitude of the property's cardinality.
  pub digits: u32,
}

impl HashedProperty {
  pub fn new(name: impl Into<String>, digits: u32) -> Self {
    Self {
      name: name.into(),
      digits,
    }
  }

  /// `10^digits`: the positional multiplier reserved for this property.
  pub fn cardinality(&self) -> u64 {
    10u64.pow(self.digits)
  }
}

/// Weight tables used by [`crate::StructuralHasher`]. Immutable once the hasher is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
  /// Powers of two so that every label combination sums to a unique value.
  pub node_label_weights: BTreeMap<String, u64>,
  /// Ordered: earlier properties are more significant.
  pub hashed_properties: Vec<HashedProperty>,
  pub edge_type_weights: BTreeMap<String, u64>,
  pub edge_state_weights: BTreeMap<String, u64>,
  /// Leading digits of the property digest kept by the channel hash.
  pub channel_digits: u32,
}

fn weights(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
  pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

impl Default for HashingConfig {
  fn default() -> Self {
    Self {
      node_label_weights: weights(&[
        ("Socket", 1),
        ("Conn", 2),
        ("File", 4),
        ("Global", 8),
        ("Machine", 16),
        ("Meta", 32),
        ("Process", 64),
        ("Pipe", 128),
      ]),
      hashed_properties: vec![
        HashedProperty::new("cmdline", 19),
        HashedProperty::new("name", 19),
        HashedProperty::new("ips", 10),
        HashedProperty::new("client_port", 5),
        HashedProperty::new("meta_login", 10),
      ],
      edge_type_weights: weights(&[
        ("PROC_OBJ", 10),
        ("PROC_OBJ_PREV", 20),
        ("GLOB_OBJ_PREV", 30),
        ("META_PREV", 40),
        ("PROC_PARENT", 50),
        ("COMM", 60),
      ]),
      edge_state_weights: weights(&[
        ("NONE", 1),
        ("RaW", 2),
        ("WRITE", 3),
        ("READ", 4),
        ("CLIENT", 5),
        ("SERVER", 6),
        ("BIN", 7),
      ]),
      channel_digits: 10,
    }
  }
}

impl HashingConfig {
  pub fn validate(&self) -> Result<()> {
    for p in &self.hashed_properties {
      if p.digits == 0 || p.digits > MAX_DIGITS {
        return Err(PipelineError::InvalidConfig(format!(
          "hashed property '{}' has {} digits, expected 1..={}",
          p.name, p.digits, MAX_DIGITS
        )));
      }
    }
    if self.channel_digits == 0 || self.channel_digits > MAX_DIGITS {
      return Err(PipelineError::InvalidConfig(format!(
        "channel_digits is {}, expected 1..={}",
        self.channel_digits, MAX_DIGITS
      )));
    }
    Ok(())
  }
}

/// Function imposing the linear order from which root nodes are picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Labeling {
  /// Ascending `timestamp`.
  #[default]
  Timestamp,
  /// Ascending structural node hash.
  StructuralHash,
}

/// Per-channel value written into the node tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelHash {
  /// Label weight sum followed by the leading digits of the property digest.
  #[default]
  LabelsAndProperty,
  /// Property digest only.
  SimHash,
}

/// Fixed global bounds for linear tensor normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationBounds {
  pub lower: f64,
  pub upper: f64,
}

impl Default for NormalizationBounds {
  fn default() -> Self {
    Self::for_channel(ChannelHash::default())
  }
}

impl NormalizationBounds {
  /// Bounds covering every value `kind` can produce.
  pub fn for_channel(kind: ChannelHash) -> Self {
    let upper = match kind {
      // Label sums stay below 256 and the channel digest below 1e10.
      ChannelHash::LabelsAndProperty => 256e10,
      // The full property digest, a SimHash divided by 100.
      ChannelHash::SimHash => (u64::MAX / 100) as f64,
    };
    Self { lower: 0.0, upper }
  }

  /// `(value - lower) / (upper - lower)`, clamped to `[0, 1]`.
  pub fn normalize(&self, value: f64) -> f32 {
    let v = (value - self.lower) / (self.upper - self.lower);
    v.clamp(0.0, 1.0) as f32
  }
}

/// Shape of the name/cmdline embedding vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
  pub max_nodes: usize,
  /// Tokens kept per encoded string.
  pub length: usize,
  /// Output dimension of the downstream embedding layer; carried, not used here.
  pub dim: usize,
  /// Token buckets are `1..vocab_size`; 0 is padding.
  pub vocab_size: u32,
}

impl Default for EmbeddingConfig {
  fn default() -> Self {
    Self {
      max_nodes: 16,
      length: 8,
      dim: 32,
      vocab_size: 1000,
    }
  }
}

impl EmbeddingConfig {
  /// Length of one graph's flattened embedding vector.
  pub fn vector_len(&self) -> usize {
    self.max_nodes * self.length * 2
  }
}

/// All tunables of the graph-to-tensor pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
  /// Receptive fields per group (w).
  pub field_count: usize,
  /// Maximum nodes per receptive field (k).
  pub field_size: usize,
  /// Spacing between chosen roots in the labeled node order (s).
  pub stride: usize,
  /// One tensor channel per property.
  pub channel_properties: Vec<String>,
  pub channel_hash: ChannelHash,
  pub labeling: Labeling,
  /// Written for absent channel properties before normalisation.
  pub default_tensor_value: f64,
  /// Explicit bounds; when unset they follow `channel_hash`.
  pub normalization: Option<NormalizationBounds>,
  pub embedding: EmbeddingConfig,
  pub class_count: usize,
  pub hashing: HashingConfig,
}

impl Default for PipelineConfig {
  fn default() -> Self {
    let hashing = HashingConfig::default();
    Self {
      field_count: 1,
      field_size: 3,
      stride: 3,
      channel_properties: hashing
        .hashed_properties
        .iter()
        .map(|p| p.name.clone())
        .collect(),
      channel_hash: ChannelHash::default(),
      labeling: Labeling::default(),
      default_tensor_value: 0.0,
      normalization: None,
      embedding: EmbeddingConfig::default(),
      class_count: 2,
      hashing,
    }
  }
}

impl PipelineConfig {
  /// Loads a (possibly partial) JSON config document and validates it.
  pub fn from_json(json: &str) -> Result<Self> {
    let config: PipelineConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
  }

  pub fn channel_count(&self) -> usize {
    self.channel_properties.len()
  }

  pub fn normalization_bounds(&self) -> NormalizationBounds {
    self
      .normalization
      .unwrap_or_else(|| NormalizationBounds::for_channel(self.channel_hash))
  }

  pub fn validate(&self) -> Result<()> {
    let invalid = |msg: &str| Err(PipelineError::InvalidConfig(msg.to_string()));
    if self.field_count == 0 {
      return invalid("field_count must be positive");
    }
    if self.field_size == 0 {
      return invalid("field_size must be positive");
    }
    if self.stride == 0 {
      return invalid("stride must be positive");
    }
    if self.channel_properties.is_empty() {
      return invalid("channel_properties must not be empty");
    }
    let bounds = self.normalization_bounds();
    if !(bounds.upper > bounds.lower) {
      return invalid("normalization upper bound must exceed the lower bound");
    }
    if self.embedding.vocab_size < 2 {
      return invalid("embedding vocab_size must be at least 2");
    }
    if self.class_count < 2 {
      return invalid("class_count must be at least 2");
    }
    self.hashing.validate()
  }
}
