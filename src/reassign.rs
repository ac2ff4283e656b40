use crate::error::{LcResult, LotusError};
use crate::graph::InteractionGraph;
use crate::partition::{ClusterId, Partition};
use crate::scorer::{ParameterVector, Scorer};
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ReassignOutcome {
    pub partition: Partition,
    pub overlaps_added: usize,
    pub transfers: usize,
}

/// Runs the overlap pass then the transfer pass on a fresh copy of `initial`.
pub fn reassign<G: InteractionGraph + ?Sized>(
    initial: &Partition,
    graph: &G,
    scorer: &Scorer,
    params: &ParameterVector,
) -> LcResult<ReassignOutcome> {
    if !params.is_finite() {
        return Err(LotusError::Evaluation(format!(
            "non-finite parameter vector {:?}",
            params
        )));
    }
    let params = ParameterVector {
        alpha: params.alpha.clamp(0.0, 1.0),
        ..*params
    };

    let mut working = initial.clone();
    let proteins: Vec<&str> = initial.proteins().into_iter().collect();

    let overlaps_added = overlap_pass(&mut working, &proteins, scorer, &params);
    let transfers = transfer_pass(&mut working, initial, &proteins, graph);

    debug!(
        "Reassignment alpha={:.3} overlap_tau={:.3}: +{} overlaps, {} transfers",
        params.alpha, params.overlap_tau, overlaps_added, transfers
    );

    Ok(ReassignOutcome {
        partition: working,
        overlaps_added,
        transfers,
    })
}

fn overlap_pass(
    working: &mut Partition,
    proteins: &[&str],
    scorer: &Scorer,
    params: &ParameterVector,
) -> usize {
    let cluster_ids: Vec<ClusterId> = working.cluster_ids().collect();
    let mut added = 0;

    for &protein in proteins {
        let current = working.clusters_of(protein);
        if current.is_empty() {
            continue;
        }

        let best_current = current
            .iter()
            .map(|&id| scorer.membership(protein, id, params.alpha))
            .fold(f64::NEG_INFINITY, f64::max);

        for &candidate in &cluster_ids {
            if current.contains(&candidate) {
                continue;
            }
            // Scores are keyed by cluster id, so the candidate's contents
            // (with the protein added) do not change the lookup.
            let if_added = scorer.membership(protein, candidate, params.alpha);
            let gain = if_added - best_current;
            if gain > params.overlap_tau && working.insert(candidate, protein) {
                added += 1;
            }
        }
    }
    added
}

fn transfer_pass<G: InteractionGraph + ?Sized>(
    working: &mut Partition,
    initial: &Partition,
    proteins: &[&str],
    graph: &G,
) -> usize {
    let origins = initial.membership_index();
    let mut transfers = 0;

    for &protein in proteins {
        let Some(neighbors) = graph.neighbors(protein) else {
            continue;
        };
        let Some(original_ids) = origins.get(protein) else {
            continue;
        };

        for &cid in original_ids {
            let intra = links_into(neighbors, working, cid);
            let extra = neighbors.len() - intra;
            if extra <= intra {
                continue;
            }

            if let Some((rival, rival_intra)) = strongest_rival(neighbors, working, cid) {
                if rival_intra > intra {
                    working.remove(cid, protein);
                    working.insert(rival, protein);
                    transfers += 1;
                }
            }
        }
    }
    transfers
}

fn links_into(neighbors: &HashSet<String>, partition: &Partition, id: ClusterId) -> usize {
    partition.cluster(id).map_or(0, |members| {
        neighbors
            .iter()
            .filter(|n| members.contains(n.as_str()))
            .count()
    })
}

// First cluster wins ties.
pub fn strongest_rival(
    neighbors: &HashSet<String>,
    partition: &Partition,
    exclude: ClusterId,
) -> Option<(ClusterId, usize)> {
    let mut best: Option<(ClusterId, usize)> = None;
    for (id, members) in partition.iter() {
        if id == exclude {
            continue;
        }
        let links = neighbors
            .iter()
            .filter(|n| members.contains(n.as_str()))
            .count();
        if links > best.map_or(0, |(_, l)| l) {
            best = Some((id, links));
        }
    }
    best
}

pub fn emax_cluster<G: InteractionGraph + ?Sized>(
    protein: &str,
    partition: &Partition,
    graph: &G,
) -> Option<ClusterId> {
    let neighbors = graph.neighbors(protein)?;
    let mut best: Option<(ClusterId, usize)> = None;
    for (id, members) in partition.iter() {
        if members.contains(protein) {
            continue;
        }
        let links = links_into(neighbors, partition, id);
        if links > best.map_or(0, |(_, l)| l) {
            best = Some((id, links));
        }
    }
    best.map(|(id, _)| id)
}

pub fn intra_extra_links<G: InteractionGraph + ?Sized>(
    protein: &str,
    id: ClusterId,
    partition: &Partition,
    graph: &G,
) -> (usize, usize) {
    graph.neighbors(protein).map_or((0, 0), |neighbors| {
        let intra = links_into(neighbors, partition, id);
        (intra, neighbors.len() - intra)
    })
}
