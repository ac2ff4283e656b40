use std::collections::{HashMap, HashSet};

/// Proteins unknown to the graph behave as isolated nodes.
pub trait InteractionGraph: Sync {
    fn neighbors(&self, protein: &str) -> Option<&HashSet<String>>;

    fn has_edge(&self, a: &str, b: &str) -> bool {
        self.neighbors(a).is_some_and(|n| n.contains(b))
    }

    fn degree(&self, protein: &str) -> usize {
        self.neighbors(protein).map_or(0, |n| n.len())
    }

    fn edge_count(&self) -> usize;
}

#[derive(Debug, Clone, Default)]
pub struct ProteinGraph {
    adjacency: HashMap<String, HashSet<String>>,
    weights: HashMap<(String, String), f64>,
    edge_count: usize,
}

fn edge_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl ProteinGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut graph = Self::new();
        for (a, b) in edges {
            graph.add_edge(a, b, None);
        }
        graph
    }

    pub fn add_edge(&mut self, a: &str, b: &str, weight: Option<f64>) -> bool {
        if a == b {
            return false;
        }
        let inserted = self
            .adjacency
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.adjacency
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());

        if inserted {
            self.edge_count += 1;
            if let Some(w) = weight {
                self.weights.insert(edge_key(a, b), w);
            }
        }
        inserted
    }

    pub fn add_node(&mut self, protein: &str) {
        self.adjacency.entry(protein.to_string()).or_default();
    }

    pub fn contains(&self, protein: &str) -> bool {
        self.adjacency.contains_key(protein)
    }

    pub fn weight(&self, a: &str, b: &str) -> Option<f64> {
        self.weights.get(&edge_key(a, b)).copied()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn proteins(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }
}

impl InteractionGraph for ProteinGraph {
    fn neighbors(&self, protein: &str) -> Option<&HashSet<String>> {
        self.adjacency.get(protein)
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }
}
