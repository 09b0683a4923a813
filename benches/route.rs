use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use routegraph::{
    CostDecorator, CsrFactory, CsrGraph, DecoratorFactory, Dijkstra, Location, NodeId, Scc,
    SourceTarget, WeightTimeDistance,
};

struct Edge {
    source: NodeId,
    target: NodeId,
    weight: WeightTimeDistance,
}

impl SourceTarget for Edge {
    fn source(&self) -> NodeId {
        self.source
    }

    fn target(&self) -> NodeId {
        self.target
    }
}

/// Build a side x side grid with eastward and southward edges, weights
/// varied deterministically so routes are not degenerate.
fn grid_edges(side: u64) -> Vec<Edge> {
    let mut edges = Vec::new();
    for row in 0..side {
        for col in 0..side {
            let node = row * side + col;
            if col + 1 < side {
                edges.push(Edge {
                    source: node,
                    target: node + 1,
                    weight: WeightTimeDistance::new(1 + ((node * 7) % 5) as u32, 1, 1),
                });
            }
            if row + 1 < side {
                edges.push(Edge {
                    source: node,
                    target: node + side,
                    weight: WeightTimeDistance::new(1 + ((node * 13) % 5) as u32, 1, 1),
                });
            }
        }
    }
    edges
}

fn grid_graph(side: u64) -> CostDecorator<WeightTimeDistance, CsrGraph> {
    let mut edges = grid_edges(side);
    let base = CsrFactory::directed_from_edges(side * side, &mut edges).unwrap();
    let mut graph = CostDecorator::new(base);
    DecoratorFactory::decorate(&mut graph, &edges, |edge| edge.weight);
    graph
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("csr_construction");
    for side in [32u64, 128, 512] {
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, &side| {
            b.iter(|| {
                let mut edges = grid_edges(side);
                criterion::black_box(
                    CsrFactory::directed_from_edges(side * side, &mut edges).unwrap(),
                )
            });
        });
    }
    group.finish();
}

fn bench_route(c: &mut Criterion) {
    let mut group = c.benchmark_group("dijkstra_route");
    for side in [32u64, 128, 512] {
        let graph = grid_graph(side);
        let mut dijkstra = Dijkstra::new(&graph);
        let from = Location {
            node: 0,
            offset: WeightTimeDistance::ZERO,
        };
        let to = Location {
            node: side * side - 1,
            offset: WeightTimeDistance::ZERO,
        };
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, _| {
            b.iter(|| criterion::black_box(dijkstra.route(from, to)));
        });
    }
    group.finish();
}

fn bench_scc(c: &mut Criterion) {
    let mut group = c.benchmark_group("scc");
    for side in [32u64, 128, 512] {
        let graph = grid_graph(side);
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, _| {
            b.iter(|| criterion::black_box(Scc::compute(&graph)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_construction, bench_route, bench_scc);
criterion_main!(benches);
