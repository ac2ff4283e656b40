use criterion::{criterion_group, criterion_main, Criterion};
use lotuscomm::config::FitnessWeights;
use lotuscomm::graph::ProteinGraph;
use lotuscomm::partition::{Annotations, Partition};
use lotuscomm::reassign::reassign;
use lotuscomm::scorer::setup::build_scorer;
use lotuscomm::scorer::{FitnessEvaluator, ParameterVector};
use std::collections::BTreeSet;
use std::hint::black_box;

const CLUSTERS: usize = 40;
const CLUSTER_SIZE: usize = 12;

// Dense ring-of-cliques network with sparse bridges and a small GO vocabulary.
fn setup_network() -> (ProteinGraph, Partition, Annotations) {
    let name = |c: usize, i: usize| format!("Y{:03}P{:02}", c, i);

    let mut graph = ProteinGraph::new();
    let mut partition = Partition::new();
    let mut annotations = Annotations::new();

    for c in 0..CLUSTERS {
        for i in 0..CLUSTER_SIZE {
            partition.insert(c as u32, name(c, i));
            for j in (i + 1)..CLUSTER_SIZE {
                if (i + j) % 3 != 0 {
                    graph.add_edge(&name(c, i), &name(c, j), None);
                }
            }
            // Bridges into the next two clusters
            if i % 4 == 0 {
                graph.add_edge(&name(c, i), &name((c + 1) % CLUSTERS, i + 1), None);
                graph.add_edge(&name(c, i), &name((c + 2) % CLUSTERS, i + 2), None);
            }

            let terms: BTreeSet<String> = [c % 7, (c + i) % 11, 20 + i % 3]
                .iter()
                .map(|t| format!("GO:{:07}", t))
                .collect();
            annotations.insert(name(c, i), terms);
        }
    }
    (graph, partition, annotations)
}

fn criterion_benchmark(c: &mut Criterion) {
    let (graph, initial, annotations) = setup_network();
    let scorer = build_scorer(&graph, &initial, &annotations);
    let evaluator = FitnessEvaluator::new(&graph, &initial, &scorer, FitnessWeights::default());
    let params = ParameterVector::new(0.6, 0.05, 0.0);

    c.bench_function("build_scorer (480 proteins)", |b| {
        b.iter(|| build_scorer(black_box(&graph), black_box(&initial), black_box(&annotations)))
    });

    c.bench_function("reassign (480 proteins)", |b| {
        b.iter(|| reassign(black_box(&initial), &graph, &scorer, black_box(&params)))
    });

    c.bench_function("fitness (480 proteins)", |b| {
        b.iter(|| evaluator.fitness(black_box(&params)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
