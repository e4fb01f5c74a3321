//! Bucketed word hashing for the name/cmdline embedding input.

use super::simhash::feature_hash;

/// Characters treated as word separators.
const FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Lowercases `text`, turns separator characters into spaces and splits on whitespace.
pub fn text_to_words(text: &str) -> Vec<String> {
  let cleaned: String = text
    .to_lowercase()
    .chars()
    .map(|c| if FILTERS.contains(c) { ' ' } else { c })
    .collect();
  cleaned.split_whitespace().map(str::to_string).collect()
}

/// Maps every word of `text` to a bucket in `1..vocab_size`. Bucket 0 is reserved for padding.
pub fn hashing_trick(text: &str, vocab_size: u32) -> Vec<u32> {
  let buckets = u64::from(vocab_size.saturating_sub(1).max(1));
  text_to_words(text)
    .iter()
    .map(|w| (feature_hash(w) % buckets) as u32 + 1)
    .collect()
}

/// Encodes `text` into exactly `length` buckets: leading words kept, zero padded at the end.
pub fn encode_fixed(text: Option<&str>, length: usize, vocab_size: u32) -> Vec<u32> {
  let mut encoded = text
    .map(|t| hashing_trick(t, vocab_size))
    .unwrap_or_default();
  encoded.resize(length, 0);
  encoded
}
