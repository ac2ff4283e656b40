use super::Inputs;
use crate::reports;
use clap::Args;
use lotuscomm::api::{detect_communities_with_progress, DetectionResult};
use lotuscomm::config::Config;
use lotuscomm::error::LcResult;
use lotuscomm::metrics::{evaluate_clusters, ClusterEvaluation};
use lotuscomm::optimizer::ProgressCallback;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub config: Config,
}

struct LogProgress {
    interval: usize,
    start: Instant,
}

impl ProgressCallback for LogProgress {
    fn on_progress(&self, iteration: usize, evaluations: usize, best_cost: f64) -> bool {
        if iteration % self.interval == 0 {
            info!(
                "Iter {:4} | Evals {:5} | Best fitness {:.6} | {:.1}s",
                iteration,
                evaluations,
                -best_cost,
                self.start.elapsed().as_secs_f32()
            );
        }
        true
    }
}

#[derive(Serialize)]
struct OptimizeSummary<'a> {
    mode: &'static str,
    config: &'a Config,
    result: &'a DetectionResult,
    evaluation_initial: &'a ClusterEvaluation,
    evaluation_final: &'a ClusterEvaluation,
}

pub fn run(config: &Config, inputs: &Inputs, outdir: &Path) -> LcResult<()> {
    let progress = LogProgress {
        interval: 10,
        start: Instant::now(),
    };
    let (result, scorer) = detect_communities_with_progress(
        &inputs.graph,
        &inputs.initial,
        &inputs.annotations,
        config,
        progress,
    )?;

    let gold = inputs.gold.as_ref();
    let before = evaluate_clusters(&inputs.initial, &inputs.graph, &scorer, gold);
    let after = evaluate_clusters(&result.partition, &inputs.graph, &scorer, gold);

    let fitness = (result.fitness_calls > 0).then_some(result.best_fitness);
    reports::print_parameter_table(&result.best_parameters, fitness);
    if let Some(b) = &result.breakdown {
        reports::print_breakdown_table(b);
    }
    let evaluations = [("initial", &before), ("optimized", &after)];
    reports::print_evaluation_table(&evaluations);
    println!(
        "Budget used: {} of {} | fitness calls: {} | penalised: {} | overlaps added: {} | transfers: {}",
        result.evaluations,
        config.search.max_evaluations,
        result.fitness_calls,
        result.evaluation_failures,
        result.overlaps_added,
        result.transfers
    );

    let summary = OptimizeSummary {
        mode: "optimize",
        config,
        result: &result,
        evaluation_initial: &before,
        evaluation_final: &after,
    };
    reports::write_outputs(
        outdir,
        &inputs.initial,
        &result.partition,
        &scorer,
        &inputs.graph,
        result.best_parameters.alpha,
        &evaluations,
        &summary,
    )
}
