use crate::error::{LcResult, LotusError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub type ClusterId = u32;

pub type Annotations = HashMap<String, BTreeSet<String>>;

/// Cluster id -> members, both levels ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    clusters: BTreeMap<ClusterId, BTreeSet<String>>,
}

impl Partition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_clusters<I, S>(clusters: I) -> Self
    where
        I: IntoIterator<Item = (ClusterId, Vec<S>)>,
        S: Into<String>,
    {
        let mut partition = Self::new();
        for (id, members) in clusters {
            partition.ensure_cluster(id);
            for p in members {
                partition.insert(id, p);
            }
        }
        partition
    }

    pub fn ensure_cluster(&mut self, id: ClusterId) {
        self.clusters.entry(id).or_default();
    }

    pub fn insert<S: Into<String>>(&mut self, id: ClusterId, protein: S) -> bool {
        self.clusters.entry(id).or_default().insert(protein.into())
    }

    // The cluster itself stays, even when empty.
    pub fn remove(&mut self, id: ClusterId, protein: &str) -> bool {
        self.clusters
            .get_mut(&id)
            .is_some_and(|members| members.remove(protein))
    }

    pub fn contains(&self, id: ClusterId, protein: &str) -> bool {
        self.clusters
            .get(&id)
            .is_some_and(|members| members.contains(protein))
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&BTreeSet<String>> {
        self.clusters.get(&id)
    }

    pub fn cluster_ids(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.clusters.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClusterId, &BTreeSet<String>)> {
        self.clusters.iter().map(|(id, members)| (*id, members))
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn non_empty_count(&self) -> usize {
        self.clusters.values().filter(|m| !m.is_empty()).count()
    }

    pub fn total_memberships(&self) -> usize {
        self.clusters.values().map(BTreeSet::len).sum()
    }

    pub fn proteins(&self) -> BTreeSet<&str> {
        self.clusters
            .values()
            .flat_map(|m| m.iter().map(String::as_str))
            .collect()
    }

    pub fn clusters_of(&self, protein: &str) -> Vec<ClusterId> {
        self.clusters
            .iter()
            .filter(|(_, members)| members.contains(protein))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn membership_index(&self) -> HashMap<&str, Vec<ClusterId>> {
        let mut index: HashMap<&str, Vec<ClusterId>> = HashMap::new();
        for (id, members) in &self.clusters {
            for p in members {
                index.entry(p.as_str()).or_default().push(*id);
            }
        }
        index
    }

    pub fn is_disjoint(&self) -> bool {
        self.total_memberships() == self.proteins().len()
    }

    pub fn ensure_disjoint(&self) -> LcResult<()> {
        if self.is_disjoint() {
            return Ok(());
        }
        let shared = self
            .membership_index()
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .count();
        Err(LotusError::Input(format!(
            "Initial partition must be disjoint, {} proteins appear in more than one cluster",
            shared
        )))
    }

    pub fn overlap_summary(&self) -> Vec<OverlapEntry> {
        let index = self.membership_index();
        let mut rows: Vec<OverlapEntry> = index
            .into_iter()
            .map(|(protein, clusters)| OverlapEntry {
                protein: protein.to_string(),
                num_clusters: clusters.len(),
                clusters,
            })
            .collect();
        rows.sort_by(|a, b| a.protein.cmp(&b.protein));
        rows
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapEntry {
    pub protein: String,
    pub num_clusters: usize,
    pub clusters: Vec<ClusterId>,
}
