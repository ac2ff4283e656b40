// raw = I / E_max - (1 - C_in), clipped into [-1, 1]

use crate::graph::InteractionGraph;
use crate::partition::{ClusterId, Partition};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermanenceTable {
    scores: HashMap<String, BTreeMap<ClusterId, f64>>,
}

impl PermanenceTable {
    pub fn build<G: InteractionGraph + ?Sized>(graph: &G, partition: &Partition) -> Self {
        let index = partition.membership_index();

        let pairs: Vec<(ClusterId, &BTreeSet<String>, &str)> = partition
            .iter()
            .flat_map(|(id, members)| members.iter().map(move |p| (id, members, p.as_str())))
            .collect();

        let computed: Vec<(&str, ClusterId, f64)> = pairs
            .par_iter()
            .map(|&(id, members, protein)| {
                (protein, id, score_with_index(protein, id, members, &index, graph))
            })
            .collect();

        let mut scores: HashMap<String, BTreeMap<ClusterId, f64>> = HashMap::new();
        for (protein, id, score) in computed {
            scores.entry(protein.to_string()).or_default().insert(id, score);
        }

        debug!("Permanence table: {} proteins", scores.len());
        Self { scores }
    }

    pub fn get(&self, protein: &str, cluster_id: ClusterId) -> f64 {
        self.scores
            .get(protein)
            .and_then(|by_cluster| by_cluster.get(&cluster_id))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn scores_for(&self, protein: &str) -> Option<&BTreeMap<ClusterId, f64>> {
        self.scores.get(protein)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

pub fn permanence<G: InteractionGraph + ?Sized>(
    protein: &str,
    cluster_id: ClusterId,
    partition: &Partition,
    graph: &G,
) -> f64 {
    let Some(members) = partition.cluster(cluster_id) else {
        return 0.0;
    };
    let index = partition.membership_index();
    score_with_index(protein, cluster_id, members, &index, graph)
}

fn score_with_index<G: InteractionGraph + ?Sized>(
    protein: &str,
    cluster_id: ClusterId,
    members: &BTreeSet<String>,
    index: &HashMap<&str, Vec<ClusterId>>,
    graph: &G,
) -> f64 {
    let Some(neighbors) = graph.neighbors(protein) else {
        return 0.0;
    };
    if neighbors.is_empty() {
        return 0.0;
    }

    let internal: Vec<&str> = neighbors
        .iter()
        .filter(|n| members.contains(n.as_str()))
        .map(String::as_str)
        .collect();
    let i_p = internal.len();

    if i_p == neighbors.len() {
        return 1.0;
    }

    // Neighbour counts per rival cluster.
    let mut rival_counts: HashMap<ClusterId, usize> = HashMap::new();
    for n in neighbors {
        if let Some(ids) = index.get(n.as_str()) {
            for &id in ids {
                if id != cluster_id {
                    *rival_counts.entry(id).or_insert(0) += 1;
                }
            }
        }
    }
    let e_max = rival_counts.values().copied().max().unwrap_or(0);

    let c_in = internal_clustering(&internal, graph);

    let raw = if e_max > 0 {
        i_p as f64 / e_max as f64 - (1.0 - c_in)
    } else {
        i_p as f64 / neighbors.len() as f64 - (1.0 - c_in)
    };
    raw.clamp(-1.0, 1.0)
}

fn internal_clustering<G: InteractionGraph + ?Sized>(internal: &[&str], graph: &G) -> f64 {
    let k = internal.len();
    if k < 2 {
        return 0.0;
    }
    let mut links = 0usize;
    for (i, a) in internal.iter().enumerate() {
        for b in &internal[i + 1..] {
            if graph.has_edge(a, b) {
                links += 1;
            }
        }
    }
    links as f64 / (k * (k - 1) / 2) as f64
}
