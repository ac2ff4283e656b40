//! Report-only cluster quality metrics.

use crate::graph::InteractionGraph;
use crate::partition::{Annotations, ClusterId, Partition};
use crate::scorer::Scorer;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ClusterEvaluation {
    pub intra_density_mean: f64,
    pub inter_density_mean: f64,
    pub conductance_mean: f64,
    pub overlapping_modularity: f64,
    pub mean_fd_per_cluster: f64,
    pub mean_go_jaccard: f64,

    pub num_clusters: usize,
    pub num_singletons: usize,
    pub mean_cluster_size: f64,
    pub max_cluster_size: usize,
    pub min_cluster_size: usize,
    pub overlapping_proteins: usize,

    pub gold: Option<GoldComparison>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct GoldComparison {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    // F1 stands in for overlapping NMI
    pub overlapping_nmi: f64,
}

pub fn evaluate_clusters<G: InteractionGraph + ?Sized>(
    partition: &Partition,
    graph: &G,
    scorer: &Scorer,
    gold: Option<&Partition>,
) -> ClusterEvaluation {
    let mut intra = Vec::new();
    let mut inter = Vec::new();
    let mut conductance = Vec::new();
    let mut fd_means = Vec::new();
    let mut sizes = Vec::new();

    for (id, members) in partition.iter() {
        if members.is_empty() {
            continue;
        }
        sizes.push(members.len());
        intra.push(intra_density(members, graph));
        inter.push(inter_density(id, members, partition, graph));
        conductance.push(cluster_conductance(members, graph));

        let fd_sum: f64 = members
            .iter()
            .map(|p| scorer.functional_dependency(p, id))
            .sum();
        fd_means.push(fd_sum / members.len() as f64);
    }

    let overlapping_proteins = partition
        .membership_index()
        .values()
        .filter(|ids| ids.len() > 1)
        .count();

    ClusterEvaluation {
        intra_density_mean: mean_or(&intra, 0.0),
        inter_density_mean: mean_or(&inter, 0.0),
        conductance_mean: mean_or(&conductance, 1.0),
        overlapping_modularity: overlapping_modularity(partition, graph),
        mean_fd_per_cluster: mean_or(&fd_means, 0.0),
        mean_go_jaccard: go_jaccard(partition, &scorer.annotations, gold),
        num_clusters: sizes.len(),
        num_singletons: sizes.iter().filter(|&&s| s == 1).count(),
        mean_cluster_size: if sizes.is_empty() {
            0.0
        } else {
            sizes.iter().sum::<usize>() as f64 / sizes.len() as f64
        },
        max_cluster_size: sizes.iter().copied().max().unwrap_or(0),
        min_cluster_size: sizes.iter().copied().min().unwrap_or(0),
        overlapping_proteins,
        gold: gold.map(|g| compare_with_gold(partition, g)),
    }
}

fn mean_or(values: &[f64], empty: f64) -> f64 {
    if values.is_empty() {
        empty
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub fn intra_density<G: InteractionGraph + ?Sized>(members: &BTreeSet<String>, graph: &G) -> f64 {
    let n = members.len();
    if n < 2 {
        return 0.0;
    }
    let endpoints: usize = members
        .iter()
        .filter_map(|p| graph.neighbors(p))
        .map(|nb| nb.iter().filter(|q| members.contains(q.as_str())).count())
        .sum();
    let edges = endpoints / 2;
    edges as f64 / (n * (n - 1) / 2) as f64
}

pub fn inter_density<G: InteractionGraph + ?Sized>(
    id: ClusterId,
    members: &BTreeSet<String>,
    partition: &Partition,
    graph: &G,
) -> f64 {
    let others: HashSet<&str> = partition
        .iter()
        .filter(|(other, _)| *other != id)
        .flat_map(|(_, m)| m.iter().map(String::as_str))
        .collect();
    if others.is_empty() {
        return 0.0;
    }
    let links: usize = members
        .iter()
        .filter_map(|p| graph.neighbors(p))
        .map(|nb| nb.iter().filter(|q| others.contains(q.as_str())).count())
        .sum();
    links as f64 / (members.len() * others.len()) as f64
}

pub fn cluster_conductance<G: InteractionGraph + ?Sized>(
    members: &BTreeSet<String>,
    graph: &G,
) -> f64 {
    if members.is_empty() {
        return 1.0;
    }
    let mut cut = 0usize;
    let mut volume = 0usize;
    for nb in members.iter().filter_map(|p| graph.neighbors(p)) {
        volume += nb.len();
        cut += nb.iter().filter(|q| !members.contains(q.as_str())).count();
    }
    let rest = (2 * graph.edge_count()).saturating_sub(volume);
    let denom = volume.min(rest);
    if denom == 0 {
        1.0
    } else {
        cut as f64 / denom as f64
    }
}

// Each protein's membership split evenly over its clusters
pub fn overlapping_modularity<G: InteractionGraph + ?Sized>(partition: &Partition, graph: &G) -> f64 {
    let m = graph.edge_count();
    if m == 0 {
        return 0.0;
    }
    let two_m = 2.0 * m as f64;
    let index = partition.membership_index();
    let share = |p: &str| index.get(p).map_or(0.0, |ids| 1.0 / ids.len() as f64);

    let mut q = 0.0;
    for (_, members) in partition.iter() {
        let list: Vec<&str> = members.iter().map(String::as_str).collect();
        for (i, &a) in list.iter().enumerate() {
            let share_a = share(a);
            let deg_a = graph.degree(a) as f64;
            for &b in &list[i + 1..] {
                let expected = deg_a * graph.degree(b) as f64 / two_m;
                let actual = if graph.has_edge(a, b) { 1.0 } else { 0.0 };
                q += share_a * share(b) * (actual - expected);
            }
        }
    }
    q / m as f64
}

fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

fn cluster_terms<'a>(members: &'a BTreeSet<String>, annotations: &'a Annotations) -> BTreeSet<&'a str> {
    members
        .iter()
        .filter_map(|p| annotations.get(p))
        .flat_map(|terms| terms.iter().map(String::as_str))
        .collect()
}

pub fn go_jaccard(partition: &Partition, annotations: &Annotations, reference: Option<&Partition>) -> f64 {
    if partition.is_empty() || annotations.is_empty() {
        return 0.0;
    }
    let mut scores = Vec::new();

    match reference {
        Some(reference) => {
            let ref_terms: Vec<BTreeSet<&str>> = reference
                .iter()
                .map(|(_, m)| cluster_terms(m, annotations))
                .filter(|t| !t.is_empty())
                .collect();
            for (_, members) in partition.iter() {
                let terms = cluster_terms(members, annotations);
                if terms.is_empty() {
                    continue;
                }
                let best = ref_terms
                    .iter()
                    .map(|r| jaccard(&terms, r))
                    .fold(0.0, f64::max);
                if best > 0.0 {
                    scores.push(best);
                }
            }
        }
        None => {
            for (_, members) in partition.iter() {
                let sets: Vec<&BTreeSet<String>> = members
                    .iter()
                    .filter_map(|p| annotations.get(p))
                    .filter(|t| !t.is_empty())
                    .collect();
                if sets.len() < 2 {
                    continue;
                }
                let mut pair_scores = Vec::new();
                for (i, a) in sets.iter().enumerate() {
                    for b in &sets[i + 1..] {
                        pair_scores.push(jaccard(*a, *b));
                    }
                }
                scores.push(mean_or(&pair_scores, 0.0));
            }
        }
    }
    mean_or(&scores, 0.0)
}

// Recall is taken equal to precision.
pub fn compare_with_gold(predicted: &Partition, gold: &Partition) -> GoldComparison {
    let pred = predicted.membership_index();
    let truth = gold.membership_index();
    let proteins: BTreeSet<&str> = pred.keys().chain(truth.keys()).copied().collect();

    let similarities: Vec<f64> = proteins
        .iter()
        .map(|p| {
            let a: BTreeSet<ClusterId> = pred.get(p).into_iter().flatten().copied().collect();
            let b: BTreeSet<ClusterId> = truth.get(p).into_iter().flatten().copied().collect();
            match (a.is_empty(), b.is_empty()) {
                (true, true) => 1.0,
                (true, false) | (false, true) => 0.0,
                _ => jaccard(&a, &b),
            }
        })
        .collect();

    let precision = mean_or(&similarities, 0.0);
    let recall = precision;
    let f1_score = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    GoldComparison {
        precision,
        recall,
        f1_score,
        overlapping_nmi: f1_score,
    }
}
