use crate::partition::{Annotations, ClusterId, Partition};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
struct ClusterTerms {
    // First-seen order; ties in `top_k` resolve by this order.
    ordered: Vec<(String, f64)>,
    position: HashMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TfIdfTable {
    clusters: BTreeMap<ClusterId, ClusterTerms>,
    num_clusters: usize,
}

impl TfIdfTable {
    pub fn build(partition: &Partition, annotations: &Annotations) -> Self {
        let num_clusters = partition.len();

        // Raw counts in first-seen order.
        let mut counts: BTreeMap<ClusterId, Vec<(String, usize)>> = BTreeMap::new();
        let mut df: HashMap<&str, usize> = HashMap::new();

        for (id, members) in partition.iter() {
            let mut seen: HashMap<&str, usize> = HashMap::new();
            let mut ordered: Vec<(String, usize)> = Vec::new();
            for protein in members {
                let Some(terms) = annotations.get(protein) else {
                    continue;
                };
                for term in terms {
                    match seen.get(term.as_str()) {
                        Some(&slot) => ordered[slot].1 += 1,
                        None => {
                            seen.insert(term.as_str(), ordered.len());
                            ordered.push((term.clone(), 1));
                        }
                    }
                }
            }
            for &term in seen.keys() {
                *df.entry(term).or_insert(0) += 1;
            }
            counts.insert(id, ordered);
        }

        let mut clusters = BTreeMap::new();
        for (id, ordered_counts) in counts {
            let size = partition.cluster(id).map_or(0, |m| m.len());
            if size == 0 {
                continue;
            }
            let mut terms = ClusterTerms::default();
            for (term, count) in ordered_counts {
                let tf = count as f64 / size as f64;
                let idf = match df.get(term.as_str()) {
                    Some(&d) if d > 0 => (num_clusters as f64 / d as f64).ln(),
                    _ => 0.0,
                };
                terms.position.insert(term.clone(), terms.ordered.len());
                terms.ordered.push((term, tf * idf));
            }
            clusters.insert(id, terms);
        }

        debug!(
            "TF-IDF table: {} clusters, {} distinct terms",
            num_clusters,
            df.len()
        );

        Self {
            clusters,
            num_clusters,
        }
    }

    pub fn get_score(&self, cluster_id: ClusterId, term: &str) -> f64 {
        self.clusters
            .get(&cluster_id)
            .and_then(|c| c.position.get(term).map(|&i| c.ordered[i].1))
            .unwrap_or(0.0)
    }

    pub fn get_top_k(&self, cluster_id: ClusterId, k: usize) -> Vec<(&str, f64)> {
        let Some(terms) = self.clusters.get(&cluster_id) else {
            return Vec::new();
        };
        let mut ranked: Vec<(&str, f64)> = terms
            .ordered
            .iter()
            .map(|(t, s)| (t.as_str(), *s))
            .collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);
        ranked
    }

    pub fn cluster_terms(&self, cluster_id: ClusterId) -> impl Iterator<Item = (&str, f64)> {
        self.clusters
            .get(&cluster_id)
            .into_iter()
            .flat_map(|c| c.ordered.iter().map(|(t, s)| (t.as_str(), *s)))
    }

    pub fn cluster_ids(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.clusters.keys().copied()
    }

    pub fn num_clusters(&self) -> usize {
        self.num_clusters
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.values().all(|c| c.ordered.is_empty())
    }
}
