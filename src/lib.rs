//! # patchy-provenance
//!
//! Converts provenance graphs (processes, files and sockets captured by
//! system-call auditing) into fixed-shape tensors for a convolutional
//! classifier, following the PATCHY-SAN recipe.
//!
//! ## Pipeline
//!
//! 1. [`GraphStore`]: nodes, edges and derived adjacency indices of one graph.
//! 2. [`cleaning`]: version consolidation, parallel-edge removal, anomaly
//!    removal and symlink name normalization, in place.
//! 3. [`StructuralHasher`]: deterministic node and edge fingerprints.
//! 4. [`ReceptiveFieldBuilder`]: bounded BFS neighborhoods grouped per graph.
//! 5. [`TensorAssembler`]: node, edge and embedding arrays.
//! 6. [`PipelineOrchestrator`]: runs 2-5 over a labeled batch.
//!
//! Everything is synchronous; one store per graph, no shared mutable state.

pub mod cleaning;
pub mod config;
pub mod dataset;
pub mod error;
pub mod graph_store;
pub mod hashing;
pub mod labeling;
pub mod orchestrator;
pub mod patterns;
#[cfg(test)]
mod patterns_test;
pub mod receptive_field;
#[cfg(test)]
mod receptive_field_test;
pub mod synthetic;
pub mod tensor;
pub mod types;

pub use cleaning::{CleaningReport, clean_graph};
pub use config::{ChannelHash, EmbeddingConfig, HashingConfig, Labeling, PipelineConfig};
pub use error::{PipelineError, Result};
pub use graph_store::{Endpoint, GraphStore};
pub use hashing::{NodeHash, StructuralHasher};
pub use orchestrator::{GraphTensors, PipelineOrchestrator};
pub use patterns::PatternRegistry;
pub use receptive_field::ReceptiveFieldBuilder;
pub use tensor::TensorAssembler;
pub use types::{Edge, Node, PathRecord, PropertyValue, ReceptiveField, TensorBatch};
