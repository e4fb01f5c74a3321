//! Hash functions that impose a canonical order on provenance graphs.

pub mod hashing_trick;
pub mod simhash;
mod structural;

pub use hashing_trick::{encode_fixed, hashing_trick, text_to_words};
pub use simhash::{hamming_distance, leading_digits, property_digest, simhash};
pub use structural::{HashSlot, NodeHash, StructuralHasher};
