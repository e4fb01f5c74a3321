//! Locality-sensitive string digest.
//!
//! Near-identical strings (paths differing in a version suffix, command lines
//! differing in one argument) land on nearby 64-bit codes, which keeps their
//! sort positions close.

use std::collections::BTreeMap;

/// Width of the character shingles fed into the digest.
const SHINGLE_WIDTH: usize = 4;

/// Stable 64-bit hash of one feature.
pub(crate) fn feature_hash(feature: &str) -> u64 {
  let digest = blake3::hash(feature.as_bytes());
  let mut bytes = [0u8; 8];
  bytes.copy_from_slice(&digest.as_bytes()[..8]);
  u64::from_le_bytes(bytes)
}

/// Lowercased word characters cut into overlapping shingles. Text shorter than
/// one shingle yields itself as the only feature.
pub(crate) fn shingles(text: &str) -> Vec<String> {
  let chars: Vec<char> = text
    .to_lowercase()
    .chars()
    .filter(|c| c.is_alphanumeric() || *c == '_')
    .collect();
  if chars.len() < SHINGLE_WIDTH {
    return vec![chars.into_iter().collect()];
  }
  chars
    .windows(SHINGLE_WIDTH)
    .map(|w| w.iter().collect())
    .collect()
}

/// 64-bit SimHash of `text`.
pub fn simhash(text: &str) -> u64 {
  let mut weights: BTreeMap<String, i64> = BTreeMap::new();
  for s in shingles(text) {
    *weights.entry(s).or_insert(0) += 1;
  }
  let mut votes = [0i64; 64];
  for (feature, weight) in &weights {
    let h = feature_hash(feature);
    for (bit, vote) in votes.iter_mut().enumerate() {
      if (h >> bit) & 1 == 1 {
        *vote += weight;
      } else {
        *vote -= weight;
      }
    }
  }
  votes
    .iter()
    .enumerate()
    .filter(|(_, v)| **v > 0)
    .fold(0u64, |acc, (bit, _)| acc | (1u64 << bit))
}

pub fn hamming_distance(a: u64, b: u64) -> u32 {
  (a ^ b).count_ones()
}

/// Secondary string digest used by the structural hasher: the SimHash scaled down by 100.
pub fn property_digest(text: &str) -> u64 {
  simhash(text) / 100
}

fn decimal_len(mut value: u64) -> u32 {
  let mut len = 1;
  while value >= 10 {
    value /= 10;
    len += 1;
  }
  len
}

/// The first `digits` decimal digits of `value` (all of them if it is shorter).
pub fn leading_digits(value: u64, digits: u32) -> u64 {
  let len = decimal_len(value);
  if len <= digits {
    value
  } else {
    value / 10u64.pow(len - digits)
  }
}
