//! Drives cleaning, field extraction and tensor assembly over a batch.
//!
//! Each graph runs through the stages on its own store; a graph that fails
//! is logged and left out while the rest of the batch continues. The per-graph
//! arrays are then stacked along the group axis, every group carrying its
//! graph's label and embedding.

use ndarray::{Array1, Array2, Array4, Axis, s};
use tracing::{debug, info, instrument, warn};

use crate::cleaning::clean_graph;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::graph_store::GraphStore;
use crate::hashing::StructuralHasher;
use crate::patterns::PatternRegistry;
use crate::receptive_field::ReceptiveFieldBuilder;
use crate::tensor::{TensorAssembler, check_classes};
use crate::types::{PathRecord, TensorBatch};

/// Arrays produced from one cleaned graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphTensors {
  pub nodes: Array4<f32>,
  pub edges: Array4<f32>,
  pub embedding: Array1<u32>,
}

impl GraphTensors {
  pub fn group_count(&self) -> usize {
    self.nodes.len_of(Axis(0))
  }
}

/// Graph-to-tensor pipeline over a fixed, validated configuration.
#[derive(Debug, Clone)]
pub struct PipelineOrchestrator {
  config: PipelineConfig,
  builder: ReceptiveFieldBuilder,
  assembler: TensorAssembler,
}

impl PipelineOrchestrator {
  pub fn new(config: PipelineConfig) -> Result<Self> {
    config.validate()?;
    let hasher = StructuralHasher::new(config.hashing.clone());
    Ok(Self {
      builder: ReceptiveFieldBuilder::new(hasher),
      assembler: TensorAssembler::new(config.clone()),
      config,
    })
  }

  pub fn config(&self) -> &PipelineConfig {
    &self.config
  }

  /// Cleans `store` in place and converts it. A graph too small to fill one
  /// group yields zero groups.
  #[instrument(level = "trace", skip(self, store))]
  pub fn process_graph(&self, store: &mut GraphStore) -> Result<GraphTensors> {
    clean_graph(store)?;
    let cfg = &self.config;
    let groups = self.builder.build_groups_of_receptive_fields(
      store,
      cfg.field_count,
      cfg.field_size,
      cfg.stride,
      cfg.labeling,
    )?;
    Ok(GraphTensors {
      nodes: self.assembler.build_node_tensor(&groups, store)?,
      edges: self.assembler.build_edge_tensor(&groups, store)?,
      embedding: self.assembler.build_embedding(store),
    })
  }

  /// Builds one store per labeled raw query result, then runs
  /// [`PipelineOrchestrator::process_graphs`].
  pub fn process_batch(&self, labeled: Vec<(i64, Vec<PathRecord>)>) -> Result<TensorBatch> {
    self.process_graphs(
      labeled
        .into_iter()
        .map(|(label, records)| (label, GraphStore::build(records)))
        .collect(),
    )
  }

  /// Labels each raw result with `registry` before processing.
  pub fn process_with_patterns(
    &self,
    raw: Vec<Vec<PathRecord>>,
    registry: &PatternRegistry,
  ) -> Result<TensorBatch> {
    let labeled = raw
      .into_iter()
      .map(|records| {
        let store = GraphStore::build(records);
        (registry.classify(&store), store)
      })
      .collect();
    self.process_graphs(labeled)
  }

  /// Converts labeled graphs into one batch. Fails with `InsufficientClasses`
  /// when fewer than two labels are present, either in the input or among
  /// the graphs that produced groups.
  #[instrument(level = "trace", skip(self, graphs))]
  pub fn process_graphs(&self, graphs: Vec<(i64, GraphStore)>) -> Result<TensorBatch> {
    let input_labels: Vec<i64> = graphs.iter().map(|(label, _)| *label).collect();
    check_classes(&input_labels)?;

    let total = graphs.len();
    let mut produced = Vec::new();
    let mut skipped = 0usize;
    for (index, (label, mut store)) in graphs.into_iter().enumerate() {
      match self.process_graph(&mut store) {
        Ok(tensors) if tensors.group_count() == 0 => {
          debug!(index, label, "graph produced no receptive field groups");
        }
        Ok(tensors) => produced.push((label, tensors)),
        Err(error) => {
          warn!(index, label, %error, "skipping graph");
          skipped += 1;
        }
      }
    }

    let produced_labels: Vec<i64> = produced.iter().map(|(label, _)| *label).collect();
    check_classes(&produced_labels)?;
    let batch = self.stack(&produced);
    info!(
      graphs = total,
      skipped,
      groups = batch.len(),
      "processed batch"
    );
    Ok(batch)
  }

  /// Concatenates per-graph arrays along the group axis.
  fn stack(&self, produced: &[(i64, GraphTensors)]) -> TensorBatch {
    let cfg = &self.config;
    let total: usize = produced.iter().map(|(_, t)| t.group_count()).sum();
    let (w, k) = (cfg.field_count, cfg.field_size);
    let mut nodes = Array4::<f32>::zeros((total, w, k, cfg.channel_count()));
    let mut edges = Array4::<f32>::zeros((total, w, k * k, 2));
    let mut embeddings = Array2::<u32>::zeros((total, cfg.embedding.vector_len()));
    let mut labels = Array1::<i64>::zeros(total);

    let mut offset = 0;
    for (label, tensors) in produced {
      let rows = offset..offset + tensors.group_count();
      nodes.slice_mut(s![rows.clone(), .., .., ..]).assign(&tensors.nodes);
      edges.slice_mut(s![rows.clone(), .., .., ..]).assign(&tensors.edges);
      embeddings
        .slice_mut(s![rows.clone(), ..])
        .assign(&tensors.embedding);
      labels.slice_mut(s![rows.clone()]).fill(*label);
      offset = rows.end;
    }
    TensorBatch {
      nodes,
      edges,
      embeddings,
      labels,
    }
  }
}
