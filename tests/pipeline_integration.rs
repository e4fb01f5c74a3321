//! End-to-end tests: JSON path records from tests/fixtures/ through cleaning,
//! receptive fields and tensor assembly.

use std::path::{Path, PathBuf};

use patchy_provenance::types::parse_path_records;
use patchy_provenance::{
  CleaningReport, GraphStore, PathRecord, PatternRegistry, PipelineConfig, PipelineError,
  PipelineOrchestrator, clean_graph,
};

fn fixture(name: &str) -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_test_writer()
    .with_max_level(tracing::Level::DEBUG)
    .try_init();
}

fn records(name: &str) -> Vec<PathRecord> {
  let json = std::fs::read_to_string(fixture(name)).expect("read fixture");
  parse_path_records(&json).expect("parse fixture")
}

fn fixture_config() -> PipelineConfig {
  let json = std::fs::read_to_string(fixture("pipeline_config.json")).expect("read config");
  PipelineConfig::from_json(&json).expect("valid config")
}

/// Same graph with every node and edge id moved by `offset`.
fn shift_ids(records: Vec<PathRecord>, offset: i64) -> Vec<PathRecord> {
  records
    .into_iter()
    .map(|record| {
      record
        .into_iter()
        .map(|(var, mut path)| {
          for n in &mut path.nodes {
            n.id += offset;
          }
          for e in &mut path.relationships {
            e.id += offset;
            e.start += offset;
            e.end += offset;
          }
          (var, path)
        })
        .collect()
    })
    .collect()
}

#[test]
fn fixture_graph_cleans_as_expected() {
  init_tracing();
  let mut store = GraphStore::build(records("download_write.json"));
  assert_eq!(store.node_count(), 6);
  let report = clean_graph(&mut store).unwrap();
  assert_eq!(
    report,
    CleaningReport {
      versions_merged: 1,
      duplicate_edges_removed: 1,
      anomalous_removed: 1,
      names_normalized: 0,
    }
  );
  assert_eq!(store.node_ids(), vec![1, 2, 3, 5]);
  assert_eq!(store.edge_ids(), vec![10, 11, 14]);
  assert!(store.indices_consistent());
}

#[test]
fn patterns_label_and_default_config_shapes() {
  init_tracing();
  let orchestrator = PipelineOrchestrator::new(PipelineConfig::default()).unwrap();
  let batch = orchestrator
    .process_with_patterns(
      vec![records("download_write.json"), records("benign.json")],
      &PatternRegistry::default(),
    )
    .unwrap();
  // Four cleaned nodes at stride 3 give two roots; three give one.
  assert_eq!(batch.labels.to_vec(), vec![1, 1, 0]);
  assert_eq!(batch.nodes.dim(), (3, 1, 3, 5));
  assert_eq!(batch.edges.dim(), (3, 1, 9, 2));
  assert_eq!(batch.embeddings.dim(), (3, 256));
}

#[test]
fn config_file_drives_the_shapes() {
  init_tracing();
  let orchestrator = PipelineOrchestrator::new(fixture_config()).unwrap();
  let batch = orchestrator
    .process_batch(vec![
      (1, records("download_write.json")),
      (0, records("benign.json")),
    ])
    .unwrap();
  assert_eq!(batch.len(), 7);
  assert_eq!(batch.nodes.dim(), (7, 1, 4, 5));
  assert_eq!(batch.edges.dim(), (7, 1, 16, 2));
  assert_eq!(batch.embeddings.dim(), (7, 48));
  assert!(batch.nodes.iter().all(|v| (0.0..=1.0).contains(v)));
  assert!(batch.edges.iter().any(|v| *v > 0.0));
}

#[test]
fn output_does_not_depend_on_ids() {
  init_tracing();
  let orchestrator = PipelineOrchestrator::new(PipelineConfig::default()).unwrap();
  let run = |offset: i64| {
    orchestrator
      .process_batch(vec![
        (1, shift_ids(records("download_write.json"), offset)),
        (0, shift_ids(records("benign.json"), offset)),
      ])
      .unwrap()
  };
  let base = run(0);
  assert_eq!(base, run(0));
  assert_eq!(base, run(1000));
}

#[test]
fn one_class_batches_are_rejected() {
  let orchestrator = PipelineOrchestrator::new(PipelineConfig::default()).unwrap();
  let err = orchestrator
    .process_with_patterns(vec![records("benign.json")], &PatternRegistry::default())
    .unwrap_err();
  assert!(matches!(err, PipelineError::InsufficientClasses { found: 1 }));
}

#[test]
fn malformed_input_surfaces_as_json_error() {
  let err = PipelineConfig::from_json("{\"field_size\": \"three\"}").unwrap_err();
  assert!(matches!(err, PipelineError::Json(_)));
  assert!(parse_path_records("[{\"p\": {\"nodes\": [{\"labels\": []}]}}]").is_err());
}
