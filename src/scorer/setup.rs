use super::permanence::PermanenceTable;
use super::tfidf::TfIdfTable;
use super::Scorer;
use crate::graph::InteractionGraph;
use crate::partition::{Annotations, Partition};
use tracing::{info, warn};

pub fn build_scorer<G: InteractionGraph + ?Sized>(
    graph: &G,
    partition: &Partition,
    annotations: &Annotations,
) -> Scorer {
    let proteins = partition.proteins();

    let absent = proteins
        .iter()
        .filter(|p| graph.neighbors(p).is_none())
        .count();
    if absent > 0 {
        warn!(
            "{} of {} partition proteins are not in the graph; treating them as isolated",
            absent,
            proteins.len()
        );
    }

    let annotated = proteins
        .iter()
        .filter(|p| annotations.get(**p).is_some_and(|t| !t.is_empty()))
        .count();
    if annotated == 0 {
        warn!("No partition protein carries annotations; scoring is purely structural");
    }

    let permanence = PermanenceTable::build(graph, partition);
    let tfidf = TfIdfTable::build(partition, annotations);

    info!(
        "Frozen tables ready: {} clusters, {} proteins ({} annotated)",
        partition.len(),
        proteins.len(),
        annotated
    );

    Scorer {
        permanence,
        tfidf,
        annotations: annotations.clone(),
    }
}
