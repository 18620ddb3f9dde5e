//! Benchmarks for entity composition.
//!
//! These benchmarks measure composing component entities over synthetic
//! project graphs of increasing size, sequentially and on the rayon pool.

use backstage_insights::config;
use backstage_insights::diagnostics::MemoryDiagnostics;
use backstage_insights::graph::{DependencyEdge, ProjectGraph, ProjectKind, ProjectNode};
use backstage_insights::metadata::MemoryMetadataSource;
use backstage_insights::owners::{OwnerRecord, OwnerTable};
use backstage_insights::phases::compose::Composer;
use backstage_insights::phases::emit::emit;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

const MAPPINGS: &str = r#"{
  "mappings": {
    "apiVersion": { "resolverKind": "static", "key": "backstage.io/v1alpha1" },
    "kind": { "resolverKind": "static", "key": "Component" },
    "metadata.name": { "resolverKind": "graph", "key": "name" },
    "metadata.description": { "resolverKind": "localMetadata", "key": "description" },
    "metadata.annotations[\"github.com/project-slug\"]": { "resolverKind": "repositorySlug" },
    "metadata.annotations[\"nx.dev/project-path\"]": {
      "resolverKind": "composite",
      "parts": [
        { "resolverKind": "repositorySlug" },
        { "resolverKind": "graph", "key": "root" }
      ],
      "separator": "/"
    },
    "spec.type": { "resolverKind": "graph", "key": "kind" },
    "spec.owner": { "resolverKind": "localMetadata", "key": "owners" },
    "spec.dependsOn": { "resolverKind": "graph", "key": "dependencies" }
  }
}"#;

const TEAMS: usize = 8;

/// A graph of `size` projects where each depends on the previous three and
/// on one external package.
fn synthetic_workspace(size: usize) -> (ProjectGraph, MemoryMetadataSource) {
    let mut graph = ProjectGraph::new();
    let mut metadata = MemoryMetadataSource::new();

    for i in 0..size {
        let name = format!("project-{}", i);
        let kind = if i % 4 == 0 {
            ProjectKind::Application
        } else {
            ProjectKind::Library
        };
        graph.add_node(ProjectNode::new(&name, kind, format!("libs/{}", name)));
        graph.add_dependency(DependencyEdge::new(&name, "npm:lodash", "static"));
        for dep in i.saturating_sub(3)..i {
            graph.add_dependency(DependencyEdge::new(
                &name,
                format!("project-{}", dep),
                "static",
            ));
        }
        metadata.insert(
            name.clone(),
            json!({
                "name": name,
                "owners": [format!("team-{}", i % TEAMS)],
                "description": format!("Project number {}", i),
            }),
        );
    }

    (graph, metadata)
}

fn owner_table() -> OwnerTable {
    OwnerTable::new(
        (0..TEAMS)
            .map(|i| OwnerRecord::new(format!("team-{}", i), format!("group-{}", i % 3)))
            .collect(),
    )
}

fn bench_compose(c: &mut Criterion) {
    let mappings = config::parse(MAPPINGS).unwrap();
    let owners = owner_table();
    let diagnostics = MemoryDiagnostics::new();

    let mut group = c.benchmark_group("compose_all");
    for size in [10, 100, 1000] {
        let (graph, metadata) = synthetic_workspace(size);
        let composer = Composer::new(
            &mappings,
            &owners,
            &graph,
            "acme/monorepo",
            &metadata,
            &diagnostics,
        );

        group.bench_with_input(BenchmarkId::new("sequential", size), &size, |b, _| {
            b.iter(|| composer.compose_all(black_box(false)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("parallel", size), &size, |b, _| {
            b.iter(|| composer.compose_all(black_box(true)).unwrap())
        });
    }
    group.finish();
}

fn bench_emit(c: &mut Criterion) {
    let mappings = config::parse(MAPPINGS).unwrap();
    let owners = owner_table();
    let diagnostics = MemoryDiagnostics::new();
    let (graph, metadata) = synthetic_workspace(500);
    let composer = Composer::new(
        &mappings,
        &owners,
        &graph,
        "acme/monorepo",
        &metadata,
        &diagnostics,
    );
    let components = composer.compose_all(false).unwrap().components;

    c.bench_function("emit_500_components", |b| {
        b.iter(|| emit(black_box(&components)).unwrap())
    });
}

criterion_group!(benches, bench_compose, bench_emit);
criterion_main!(benches);
