use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use lotuscomm::error::LcResult;
use lotuscomm::graph::InteractionGraph;
use lotuscomm::metrics::ClusterEvaluation;
use lotuscomm::partition::{ClusterId, Partition};
use lotuscomm::reassign::{emax_cluster, intra_extra_links};
use lotuscomm::scorer::{FitnessBreakdown, ParameterVector, Scorer};
use serde::Serialize;
use std::fs::{self, File};
use std::path::Path;
use tracing::info;

pub fn print_parameter_table(params: &ParameterVector, fitness: Option<f64>) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("alpha").add_attribute(Attribute::Bold),
        Cell::new("overlap_tau").add_attribute(Attribute::Bold),
        Cell::new("transfer_tau").add_attribute(Attribute::Bold),
        Cell::new("Fitness").fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new(format!("{:.4}", params.alpha)),
        Cell::new(format!("{:.4}", params.overlap_tau)),
        Cell::new(format!("{:.4}", params.transfer_tau)),
        Cell::new(fitness.map_or("-".to_string(), |f| format!("{:.6}", f))).fg(Color::Cyan),
    ]);

    println!("\n=== PARAMETERS ===");
    println!("{}", table);
}

pub fn print_breakdown_table(breakdown: &FitnessBreakdown) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Member"),
        Cell::new("Cohes"),
        Cell::new("GO"),
        Cell::new("Coupl").fg(Color::Red),
        Cell::new("Frag").fg(Color::Red),
        Cell::new("Fitness").add_attribute(Attribute::Bold),
        Cell::new("Assign"),
        Cell::new("Clusters"),
        Cell::new("Single"),
    ]);
    table.add_row(vec![
        Cell::new(format!("{:.4}", breakdown.membership)),
        Cell::new(format!("{:.4}", breakdown.cohesion)),
        Cell::new(format!("{:.4}", breakdown.go_coherence)),
        Cell::new(format!("{:.4}", breakdown.coupling)).fg(Color::Red),
        Cell::new(format!("{:.4}", breakdown.fragmentation)).fg(Color::Red),
        Cell::new(format!("{:.6}", breakdown.fitness)).add_attribute(Attribute::Bold),
        Cell::new(breakdown.total_memberships),
        Cell::new(breakdown.non_empty_clusters),
        Cell::new(breakdown.singleton_clusters),
    ]);

    println!("\n=== FITNESS BREAKDOWN ===");
    println!("{}", table);
}

pub fn print_evaluation_table(rows: &[(&str, &ClusterEvaluation)]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Clusters").add_attribute(Attribute::Bold),
        Cell::new("Count"),
        Cell::new("Single"),
        Cell::new("Mean size"),
        Cell::new("Overlap"),
        Cell::new("Intra").fg(Color::Green),
        Cell::new("Inter").fg(Color::Red),
        Cell::new("Cond").fg(Color::Red),
        Cell::new("Mod Q").fg(Color::Cyan),
        Cell::new("FD"),
        Cell::new("GO Jacc"),
        Cell::new("F1"),
    ]);

    for (name, e) in rows {
        let f1 = e.gold.map_or("-".to_string(), |g| format!("{:.3}", g.f1_score));
        table.add_row(vec![
            Cell::new(name).add_attribute(Attribute::Bold),
            Cell::new(e.num_clusters).set_alignment(CellAlignment::Right),
            Cell::new(e.num_singletons).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", e.mean_cluster_size)),
            Cell::new(e.overlapping_proteins).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", e.intra_density_mean)).fg(Color::Green),
            Cell::new(format!("{:.4}", e.inter_density_mean)).fg(Color::Red),
            Cell::new(format!("{:.4}", e.conductance_mean)).fg(Color::Red),
            Cell::new(format!("{:.4}", e.overlapping_modularity)).fg(Color::Cyan),
            Cell::new(format!("{:.4}", e.mean_fd_per_cluster)),
            Cell::new(format!("{:.4}", e.mean_go_jaccard)),
            Cell::new(f1),
        ]);
    }

    println!("\n=== CLUSTER EVALUATION ===");
    println!("{}", table);
}

#[derive(Serialize)]
struct AssignmentRow<'a> {
    cluster_id: ClusterId,
    protein_id: &'a str,
}

#[derive(Serialize)]
struct ScoredAssignmentRow<'a> {
    cluster_id: ClusterId,
    protein_id: &'a str,
    membership_score: f64,
}

#[derive(Serialize)]
struct TermRow<'a> {
    cluster_id: ClusterId,
    go_term: &'a str,
    tfidf_score: f64,
}

#[derive(Serialize)]
struct MembershipRow<'a> {
    protein_id: &'a str,
    cluster_id: ClusterId,
    permanence: f64,
    fd: f64,
    membership: f64,
    intra: usize,
    extra: usize,
    emax: Option<ClusterId>,
}

#[derive(Serialize)]
struct EvaluationRow<'a> {
    partition: &'a str,
    intra_density_mean: f64,
    inter_density_mean: f64,
    conductance_mean: f64,
    overlapping_modularity: f64,
    mean_fd_per_cluster: f64,
    mean_go_jaccard: f64,
    num_clusters: usize,
    num_singletons: usize,
    mean_cluster_size: f64,
    max_cluster_size: usize,
    min_cluster_size: usize,
    overlapping_proteins: usize,
    precision: Option<f64>,
    recall: Option<f64>,
    f1_score: Option<f64>,
    overlapping_nmi: Option<f64>,
}

impl<'a> EvaluationRow<'a> {
    fn new(partition: &'a str, e: &ClusterEvaluation) -> Self {
        Self {
            partition,
            intra_density_mean: e.intra_density_mean,
            inter_density_mean: e.inter_density_mean,
            conductance_mean: e.conductance_mean,
            overlapping_modularity: e.overlapping_modularity,
            mean_fd_per_cluster: e.mean_fd_per_cluster,
            mean_go_jaccard: e.mean_go_jaccard,
            num_clusters: e.num_clusters,
            num_singletons: e.num_singletons,
            mean_cluster_size: e.mean_cluster_size,
            max_cluster_size: e.max_cluster_size,
            min_cluster_size: e.min_cluster_size,
            overlapping_proteins: e.overlapping_proteins,
            precision: e.gold.map(|g| g.precision),
            recall: e.gold.map(|g| g.recall),
            f1_score: e.gold.map(|g| g.f1_score),
            overlapping_nmi: e.gold.map(|g| g.overlapping_nmi),
        }
    }
}

#[derive(Serialize)]
struct OverlapRow {
    protein_id: String,
    num_clusters: usize,
    clusters_json: String,
}

pub fn write_outputs<G: InteractionGraph + ?Sized, S: Serialize>(
    outdir: &Path,
    initial: &Partition,
    final_partition: &Partition,
    scorer: &Scorer,
    graph: &G,
    alpha: f64,
    evaluations: &[(&str, &ClusterEvaluation)],
    summary: &S,
) -> LcResult<()> {
    fs::create_dir_all(outdir)?;

    let mut wtr = csv::Writer::from_path(outdir.join("clusters_initial.csv"))?;
    for (cluster_id, members) in initial.iter() {
        for protein_id in members {
            wtr.serialize(AssignmentRow {
                cluster_id,
                protein_id,
            })?;
        }
    }
    wtr.flush()?;

    let mut wtr = csv::Writer::from_path(outdir.join("clusters_optimized.csv"))?;
    for (cluster_id, members) in final_partition.iter() {
        for protein_id in members {
            wtr.serialize(ScoredAssignmentRow {
                cluster_id,
                protein_id,
                membership_score: scorer.membership(protein_id, cluster_id, alpha),
            })?;
        }
    }
    wtr.flush()?;

    let mut wtr = csv::Writer::from_path(outdir.join("go_term_importance.csv"))?;
    for cluster_id in scorer.tfidf.cluster_ids() {
        for (go_term, tfidf_score) in scorer.tfidf.cluster_terms(cluster_id) {
            wtr.serialize(TermRow {
                cluster_id,
                go_term,
                tfidf_score,
            })?;
        }
    }
    wtr.flush()?;

    let mut wtr = csv::Writer::from_path(outdir.join("protein_membership.csv"))?;
    for (cluster_id, members) in final_partition.iter() {
        for protein_id in members {
            let (intra, extra) = intra_extra_links(protein_id, cluster_id, final_partition, graph);
            wtr.serialize(MembershipRow {
                protein_id,
                cluster_id,
                permanence: scorer.permanence.get(protein_id, cluster_id),
                fd: scorer.functional_dependency(protein_id, cluster_id),
                membership: scorer.membership(protein_id, cluster_id, alpha),
                intra,
                extra,
                emax: emax_cluster(protein_id, final_partition, graph),
            })?;
        }
    }
    wtr.flush()?;

    let mut wtr = csv::Writer::from_path(outdir.join("overlap_summary.csv"))?;
    for entry in final_partition.overlap_summary() {
        wtr.serialize(OverlapRow {
            clusters_json: serde_json::to_string(&entry.clusters)?,
            protein_id: entry.protein,
            num_clusters: entry.num_clusters,
        })?;
    }
    wtr.flush()?;

    let mut wtr = csv::Writer::from_path(outdir.join("evaluation_results.csv"))?;
    for (name, evaluation) in evaluations {
        wtr.serialize(EvaluationRow::new(name, evaluation))?;
    }
    wtr.flush()?;

    let file = File::create(outdir.join("result.json"))?;
    serde_json::to_writer_pretty(file, summary)?;

    info!("Results written to {}", outdir.display());
    Ok(())
}
