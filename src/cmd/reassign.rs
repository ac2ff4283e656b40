use super::Inputs;
use crate::reports;
use clap::Args;
use lotuscomm::api::{reassign_with_parameters, ReassignReport};
use lotuscomm::config::Config;
use lotuscomm::error::LcResult;
use lotuscomm::metrics::{evaluate_clusters, ClusterEvaluation};
use serde::Serialize;
use std::path::Path;

#[derive(Args, Debug, Clone)]
pub struct ReassignArgs {
    #[command(flatten)]
    pub config: Config,
}

#[derive(Serialize)]
struct ReassignSummary<'a> {
    mode: &'static str,
    config: &'a Config,
    result: &'a ReassignReport,
    evaluation_initial: &'a ClusterEvaluation,
    evaluation_final: &'a ClusterEvaluation,
}

pub fn run(config: &Config, inputs: &Inputs, outdir: &Path) -> LcResult<()> {
    let (report, scorer) =
        reassign_with_parameters(&inputs.graph, &inputs.initial, &inputs.annotations, config)?;

    let gold = inputs.gold.as_ref();
    let before = evaluate_clusters(&inputs.initial, &inputs.graph, &scorer, gold);
    let after = evaluate_clusters(&report.partition, &inputs.graph, &scorer, gold);

    reports::print_parameter_table(
        &report.parameters,
        report.breakdown.as_ref().map(|b| b.fitness),
    );
    if let Some(b) = &report.breakdown {
        reports::print_breakdown_table(b);
    }
    let evaluations = [("initial", &before), ("reassigned", &after)];
    reports::print_evaluation_table(&evaluations);
    println!(
        "Overlaps added: {} | transfers: {}",
        report.overlaps_added, report.transfers
    );

    let summary = ReassignSummary {
        mode: "reassign",
        config,
        result: &report,
        evaluation_initial: &before,
        evaluation_final: &after,
    };
    reports::write_outputs(
        outdir,
        &inputs.initial,
        &report.partition,
        &scorer,
        &inputs.graph,
        report.parameters.alpha,
        &evaluations,
        &summary,
    )
}
