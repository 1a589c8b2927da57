use criterion::{black_box, criterion_group, criterion_main, Criterion};

use go_interactome::term::TermNamespace;
use go_interactome::{
    ClosureEngine, Direction, RelationKind, RelationKinds, TermGraph, TermId, UNBOUNDED_DEPTH,
};

/// Builds a DAG of `layers` layers with `width` terms each
///
/// Every term links to two terms of the previous layer, with alternating
/// relation kinds.
fn layered_graph(layers: usize, width: usize) -> TermGraph {
    let mut graph = TermGraph::with_capacity(layers * width + 1);
    let id = |layer: usize, idx: usize| format!("GO:{:07}", layer * width + idx + 1);
    graph.insert_term("GO:0000000", "root", TermNamespace::BiologicalProcess);
    for layer in 0..layers {
        for idx in 0..width {
            graph.insert_term(id(layer, idx), "term", TermNamespace::BiologicalProcess);
            if layer == 0 {
                graph
                    .add_relation(id(layer, idx), "GO:0000000", RelationKind::IsA)
                    .unwrap();
                continue;
            }
            let kinds = [
                RelationKind::IsA,
                RelationKind::PartOf,
                RelationKind::Regulates,
            ];
            graph
                .add_relation(id(layer, idx), id(layer - 1, idx), kinds[idx % 3].clone())
                .unwrap();
            graph
                .add_relation(
                    id(layer, idx),
                    id(layer - 1, (idx * 7 + 3) % width),
                    RelationKind::IsA,
                )
                .unwrap();
        }
    }
    graph
}

fn closure_benchmark(c: &mut Criterion) {
    let graph = layered_graph(12, 2_000);
    let root = [TermId::from("GO:0000000")];
    let all_kinds = RelationKinds::hierarchy_and_regulation();
    let is_a = RelationKinds::is_a();

    let engine = ClosureEngine::new(&graph);
    c.bench_function("descendants of root", |b| {
        b.iter(|| {
            engine
                .expand(
                    black_box(&root),
                    &all_kinds,
                    UNBOUNDED_DEPTH,
                    Direction::Descendants,
                )
                .unwrap()
                .len()
        })
    });

    c.bench_function("is_a descendants of root, depth 4", |b| {
        b.iter(|| {
            engine
                .expand(black_box(&root), &is_a, 4, Direction::Descendants)
                .unwrap()
                .len()
        })
    });

    let leaves: Vec<TermId> = (0..100)
        .map(|idx| TermId::from(format!("GO:{:07}", 11 * 2_000 + idx + 1)))
        .collect();
    c.bench_function("ancestors of 100 leaves", |b| {
        b.iter(|| {
            engine
                .expand(
                    black_box(&leaves),
                    &all_kinds,
                    UNBOUNDED_DEPTH,
                    Direction::Ancestors,
                )
                .unwrap()
                .len()
        })
    });

    c.bench_function("build index", |b| {
        b.iter(|| ClosureEngine::new(black_box(&graph)).index(&all_kinds, Direction::Descendants))
    });
}

criterion_group!(benches, closure_benchmark);
criterion_main!(benches);
