use crate::config::Config;
use crate::error::LcResult;
use crate::graph::InteractionGraph;
use crate::optimizer::{OptimizationOptions, Optimizer, ProgressCallback, SilentProgress};
use crate::partition::{Annotations, Partition};
use crate::reassign::{reassign, ReassignOutcome};
use crate::scorer::setup::build_scorer;
use crate::scorer::{FitnessBreakdown, FitnessEvaluator, ParameterVector, Scorer};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct DetectionResult {
    pub best_parameters: ParameterVector,
    pub best_fitness: f64,
    // +inf when nothing was evaluated
    pub best_cost: f64,
    pub partition: Partition,
    pub overlaps_added: usize,
    pub transfers: usize,
    pub breakdown: Option<FitnessBreakdown>,
    pub evaluations: usize,
    pub fitness_calls: usize,
    pub evaluation_failures: usize,
    pub iterations: usize,
    pub history: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReassignReport {
    pub parameters: ParameterVector,
    pub partition: Partition,
    pub overlaps_added: usize,
    pub transfers: usize,
    pub breakdown: Option<FitnessBreakdown>,
}

pub fn detect_communities<G: InteractionGraph + ?Sized>(
    graph: &G,
    initial: &Partition,
    annotations: &Annotations,
    config: &Config,
) -> LcResult<(DetectionResult, Scorer)> {
    detect_communities_with_progress(graph, initial, annotations, config, SilentProgress)
}

pub fn detect_communities_with_progress<G, CB>(
    graph: &G,
    initial: &Partition,
    annotations: &Annotations,
    config: &Config,
    callback: CB,
) -> LcResult<(DetectionResult, Scorer)>
where
    G: InteractionGraph + ?Sized,
    CB: ProgressCallback,
{
    // Reject bad configuration before any table is built.
    let options = OptimizationOptions::try_from(config)?;
    config.fitness.validate()?;
    initial.ensure_disjoint()?;

    let scorer = build_scorer(graph, initial, annotations);
    let evaluator = FitnessEvaluator::new(graph, initial, &scorer, config.fitness);

    let optimizer = Optimizer::new(options);
    let run = optimizer.run(&evaluator, config.search.seed, callback)?;

    if run.fitness_calls == 0 {
        warn!(
            "Budget of {} was spent before any fitness call; returning the first initial vector",
            config.search.max_evaluations
        );
    }
    if evaluator.failures() > 0 {
        warn!(
            "{} of {} fitness calls fell back to the penalty value",
            evaluator.failures(),
            evaluator.calls()
        );
    }

    let best = run.best;
    let outcome = reassign(initial, graph, &scorer, &best)?;
    let breakdown = final_breakdown(&evaluator, &outcome, &best);

    info!(
        "Best parameters alpha={:.4} overlap_tau={:.4} transfer_tau={:.4}, fitness {:.6}",
        best.alpha, best.overlap_tau, best.transfer_tau, -run.best_cost
    );

    let result = DetectionResult {
        best_parameters: best,
        best_fitness: -run.best_cost,
        best_cost: run.best_cost,
        partition: outcome.partition,
        overlaps_added: outcome.overlaps_added,
        transfers: outcome.transfers,
        breakdown,
        evaluations: run.evaluations,
        fitness_calls: run.fitness_calls,
        evaluation_failures: evaluator.failures(),
        iterations: run.iterations,
        history: run.history,
    };
    Ok((result, scorer))
}

pub fn reassign_with_parameters<G: InteractionGraph + ?Sized>(
    graph: &G,
    initial: &Partition,
    annotations: &Annotations,
    config: &Config,
) -> LcResult<(ReassignReport, Scorer)> {
    config.fitness.validate()?;
    initial.ensure_disjoint()?;

    let params = config.reassign.to_vector();
    let scorer = build_scorer(graph, initial, annotations);
    let evaluator = FitnessEvaluator::new(graph, initial, &scorer, config.fitness);

    let outcome = reassign(initial, graph, &scorer, &params)?;
    let breakdown = final_breakdown(&evaluator, &outcome, &params);

    info!(
        "Reassigned with alpha={:.4} overlap_tau={:.4}: +{} overlaps, {} transfers",
        params.alpha, params.overlap_tau, outcome.overlaps_added, outcome.transfers
    );

    let report = ReassignReport {
        parameters: params,
        partition: outcome.partition,
        overlaps_added: outcome.overlaps_added,
        transfers: outcome.transfers,
        breakdown,
    };
    Ok((report, scorer))
}

fn final_breakdown<G: InteractionGraph + ?Sized>(
    evaluator: &FitnessEvaluator<'_, G>,
    outcome: &ReassignOutcome,
    params: &ParameterVector,
) -> Option<FitnessBreakdown> {
    match evaluator.score_partition(&outcome.partition, params.alpha.clamp(0.0, 1.0)) {
        Ok(b) => Some(b),
        Err(e) => {
            warn!("Final partition could not be scored: {}", e);
            None
        }
    }
}
