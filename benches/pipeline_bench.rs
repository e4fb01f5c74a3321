//! Throughput of the graph-to-tensor pipeline on synthetic graphs.
//!
//! Run with: cargo bench --bench pipeline_bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use patchy_provenance::synthetic::{base_graph_16, base_graph_32, make_dataset, stamp_pattern};
use patchy_provenance::{PipelineConfig, PipelineOrchestrator, StructuralHasher, clean_graph};

fn bench_hashing(c: &mut Criterion) {
  let store = stamp_pattern(&base_graph_32());
  let hasher = StructuralHasher::default();
  c.bench_function("canonical_order_32", |b| {
    b.iter(|| black_box(hasher.canonical_order(black_box(&store))))
  });
}

fn bench_cleaning(c: &mut Criterion) {
  let store = stamp_pattern(&base_graph_32());
  c.bench_function("clean_graph_32", |b| {
    b.iter(|| {
      let mut s = store.clone();
      black_box(clean_graph(&mut s).ok())
    })
  });
}

fn bench_batch(c: &mut Criterion) {
  let orchestrator = match PipelineOrchestrator::new(PipelineConfig::default()) {
    Ok(o) => o,
    Err(e) => panic!("default config rejected: {}", e),
  };
  let mut group = c.benchmark_group("process_graphs");
  for (name, base) in [("16", base_graph_16()), ("32", base_graph_32())] {
    for per_class in [8usize, 32] {
      let mut rng = StdRng::seed_from_u64(42);
      let graphs = make_dataset(&base, per_class, &mut rng);
      group.bench_with_input(
        BenchmarkId::new(format!("nodes_{}", name), per_class * 2),
        &graphs,
        |b, graphs| b.iter(|| black_box(orchestrator.process_graphs(graphs.clone()).ok())),
      );
    }
  }
  group.finish();
}

criterion_group!(benches, bench_hashing, bench_cleaning, bench_batch);
criterion_main!(benches);
