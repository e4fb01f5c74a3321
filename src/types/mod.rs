//! Value types flowing through the pipeline.
//!
//! Nodes and edges are plain data referenced by id; the [`crate::GraphStore`]
//! owns them and every cross reference is an id lookup.

mod edge;
mod graph_path;
#[cfg(test)]
mod graph_path_test;
mod node;
#[cfg(test)]
mod node_test;
mod property_value;
mod receptive_field;
mod tensor_batch;

pub use edge::{Edge, EdgeId, STATE, VERSION_TYPES};
pub use graph_path::{GraphPath, PathRecord, parse_path_records};
pub use node::{ANOMALOUS, CMDLINE, NAME, Node, NodeId, TIMESTAMP, UUID};
pub use property_value::{Properties, PropertyValue};
pub use receptive_field::{FieldGroup, ReceptiveField};
pub use tensor_batch::TensorBatch;
