use super::types::{FitnessBreakdown, ParameterVector};
use super::Scorer;
use crate::config::FitnessWeights;
use crate::error::{LcResult, LotusError};
use crate::graph::InteractionGraph;
use crate::optimizer::runner::Objective;
use crate::partition::Partition;
use crate::reassign::reassign;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

pub const PENALTY_FITNESS: f64 = -1e6;

pub struct FitnessEvaluator<'a, G: InteractionGraph + ?Sized> {
    graph: &'a G,
    initial: &'a Partition,
    scorer: &'a Scorer,
    weights: FitnessWeights,
    calls: AtomicUsize,
    failures: AtomicUsize,
}

impl<'a, G: InteractionGraph + ?Sized> FitnessEvaluator<'a, G> {
    pub fn new(
        graph: &'a G,
        initial: &'a Partition,
        scorer: &'a Scorer,
        weights: FitnessWeights,
    ) -> Self {
        Self {
            graph,
            initial,
            scorer,
            weights,
            calls: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        }
    }

    /// Fitness of `params`, or `PENALTY_FITNESS` if the evaluation fails.
    pub fn fitness(&self, params: &ParameterVector) -> f64 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match self.evaluate(params) {
            Ok(details) => details.fitness,
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                warn!("Candidate {:?} penalised: {}", params, e);
                PENALTY_FITNESS
            }
        }
    }

    pub fn evaluate(&self, params: &ParameterVector) -> LcResult<FitnessBreakdown> {
        let outcome = reassign(self.initial, self.graph, self.scorer, params)?;
        self.score_partition(&outcome.partition, params.alpha.clamp(0.0, 1.0))
    }

    pub fn score_partition(&self, partition: &Partition, alpha: f64) -> LcResult<FitnessBreakdown> {
        let total = partition.total_memberships();
        if total == 0 {
            return Err(LotusError::Evaluation(
                "reassignment left every cluster empty".to_string(),
            ));
        }

        let mut membership_sum = 0.0;
        let mut cohesion_sum = 0.0;
        let mut fd_sum = 0.0;
        let mut outward_links = 0usize;
        let mut non_empty = 0usize;
        let mut singletons = 0usize;

        for (id, members) in partition.iter() {
            let size = members.len();
            if size == 0 {
                continue;
            }
            non_empty += 1;
            if size == 1 {
                singletons += 1;
            }

            let mut internal_endpoints = 0usize;
            for protein in members {
                membership_sum += self.scorer.membership(protein, id, alpha);
                fd_sum += self.scorer.functional_dependency(protein, id);

                if let Some(neighbors) = self.graph.neighbors(protein) {
                    let inside = neighbors
                        .iter()
                        .filter(|n| members.contains(n.as_str()))
                        .count();
                    internal_endpoints += inside;
                    outward_links += neighbors.len() - inside;
                }
            }

            // Each internal edge was seen from both ends.
            let intra_edges = internal_endpoints / 2;
            let possible = size * (size - 1) / 2;
            if possible > 0 {
                cohesion_sum += (intra_edges as f64 / possible as f64) * size as f64;
            }
        }

        let total_f = total as f64;
        let membership = membership_sum / total_f;
        let cohesion = cohesion_sum / total_f;
        let go_coherence = fd_sum / total_f;

        let edges = self.graph.edge_count();
        let coupling = if edges > 0 {
            outward_links as f64 / edges as f64
        } else {
            0.0
        };
        let fragmentation = if non_empty > 0 {
            singletons as f64 / non_empty as f64
        } else {
            1.0
        };

        let fitness = membership + cohesion + go_coherence
            - self.weights.lambda_inter * coupling
            - self.weights.lambda_fragment * fragmentation;

        if !fitness.is_finite() {
            return Err(LotusError::Evaluation(format!(
                "non-finite fitness {}",
                fitness
            )));
        }

        Ok(FitnessBreakdown {
            membership,
            cohesion,
            go_coherence,
            coupling,
            fragmentation,
            fitness,
            total_memberships: total,
            non_empty_clusters: non_empty,
            singleton_clusters: singletons,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn weights(&self) -> &FitnessWeights {
        &self.weights
    }
}

impl<G: InteractionGraph + ?Sized> Objective for FitnessEvaluator<'_, G> {
    fn cost(&self, position: &ParameterVector) -> f64 {
        -self.fitness(position)
    }
}
