pub mod engine;
pub mod permanence;
pub mod setup;
pub mod tfidf;
pub mod types;

pub use self::engine::{FitnessEvaluator, PENALTY_FITNESS};
pub use self::permanence::PermanenceTable;
pub use self::tfidf::TfIdfTable;
pub use self::types::{FitnessBreakdown, ParameterVector};
use crate::partition::{Annotations, ClusterId};

pub struct Scorer {
    pub permanence: PermanenceTable,
    pub tfidf: TfIdfTable,
    pub annotations: Annotations,
}

impl Scorer {
    // Keyed by cluster id against the frozen table, whatever the cluster holds now.
    pub fn functional_dependency(&self, protein: &str, cluster_id: ClusterId) -> f64 {
        let Some(terms) = self.annotations.get(protein) else {
            return 0.0;
        };
        if terms.is_empty() {
            return 0.0;
        }
        let total: f64 = terms
            .iter()
            .map(|t| self.tfidf.get_score(cluster_id, t))
            .sum();
        (total / terms.len() as f64).tanh()
    }

    pub fn membership(&self, protein: &str, cluster_id: ClusterId, alpha: f64) -> f64 {
        let alpha = alpha.clamp(0.0, 1.0);
        let perm = self.permanence.get(protein, cluster_id);
        let fd = self.functional_dependency(protein, cluster_id);
        (alpha * perm + (1.0 - alpha) * fd).clamp(-1.0, 1.0)
    }
}
