use crate::error::{LcResult, LotusError};
use crate::graph::{InteractionGraph, ProteinGraph};
use crate::partition::{Annotations, ClusterId, Partition};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

pub fn load_edge_list<R: Read>(
    reader: R,
    delimiter: u8,
    has_header: bool,
    min_weight: Option<f64>,
) -> LcResult<ProteinGraph> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_header)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut graph = ProteinGraph::new();
    let mut skipped = 0usize;
    let mut below_threshold = 0usize;

    for (row_idx, result) in rdr.records().enumerate() {
        let rec = match result {
            Ok(rec) => rec,
            Err(e) => {
                debug!("Edge list row {}: {}", row_idx + 1, e);
                skipped += 1;
                continue;
            }
        };
        if rec.len() < 2 || rec[0].is_empty() || rec[1].is_empty() {
            skipped += 1;
            continue;
        }

        let weight = match rec.get(2).filter(|w| !w.is_empty()) {
            Some(raw) => match raw.parse::<f64>() {
                Ok(w) if w.is_finite() => Some(w),
                _ => {
                    skipped += 1;
                    continue;
                }
            },
            None => None,
        };

        if let Some(threshold) = min_weight {
            if weight.map_or(true, |w| w < threshold) {
                below_threshold += 1;
                continue;
            }
        }

        graph.add_edge(&rec[0], &rec[1], weight);
    }

    if skipped > 0 {
        warn!("Skipped {} malformed edge rows", skipped);
    }
    if below_threshold > 0 {
        debug!("Dropped {} edges below the weight threshold", below_threshold);
    }
    info!(
        "Loaded graph: {} proteins, {} interactions",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Parses a GAF 2.x file into protein -> GO terms.
pub fn load_gaf<R: Read>(reader: R, taxon: Option<u32>, use_symbol: bool) -> LcResult<Annotations> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .comment(Some(b'!'))
        .from_reader(reader);

    let wanted_taxon = taxon.map(|t| format!("taxon:{}", t));
    let mut annotations = Annotations::new();

    for result in rdr.records() {
        let Ok(rec) = result else {
            continue;
        };
        if rec.len() < 5 {
            continue;
        }

        let protein = if use_symbol { &rec[2] } else { &rec[1] };
        let qualifier = &rec[3];
        let go_id = rec[4].trim();

        if protein.is_empty() || !go_id.starts_with("GO:") {
            continue;
        }
        if qualifier.split('|').any(|q| q.trim() == "NOT") {
            continue;
        }
        if let Some(wanted) = &wanted_taxon {
            let listed = rec.get(12).is_some_and(|col| {
                col.split('|').any(|t| t.trim() == wanted.as_str())
            });
            if !listed {
                continue;
            }
        }

        annotations
            .entry(protein.trim().to_string())
            .or_default()
            .insert(go_id.to_string());
    }

    info!("Loaded GO annotations for {} proteins", annotations.len());
    Ok(annotations)
}

#[derive(Debug, Deserialize)]
struct PartitionRow {
    cluster_id: ClusterId,
    protein_id: String,
}

pub fn load_partition<R: Read>(reader: R) -> LcResult<Partition> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut partition = Partition::new();
    for (row_idx, result) in rdr.deserialize::<PartitionRow>().enumerate() {
        let row = result.map_err(|e| {
            LotusError::Input(format!("Partition row {}: {}", row_idx + 1, e))
        })?;
        if row.protein_id.is_empty() {
            return Err(LotusError::Input(format!(
                "Partition row {}: empty protein id",
                row_idx + 1
            )));
        }
        partition.insert(row.cluster_id, row.protein_id);
    }

    if partition.is_empty() {
        return Err(LotusError::Input("Partition file holds no rows".to_string()));
    }
    info!(
        "Loaded partition: {} clusters, {} proteins",
        partition.len(),
        partition.proteins().len()
    );
    Ok(partition)
}

fn open(path: &Path, what: &str) -> LcResult<File> {
    File::open(path).map_err(|e| {
        LotusError::Input(format!("Could not open {} at '{}': {}", what, path.display(), e))
    })
}

pub fn load_edge_list_from_path<P: AsRef<Path>>(
    path: P,
    delimiter: u8,
    has_header: bool,
    min_weight: Option<f64>,
) -> LcResult<ProteinGraph> {
    let path = path.as_ref();
    info!("Loading interactions from {}", path.display());
    load_edge_list(open(path, "edge list")?, delimiter, has_header, min_weight)
}

pub fn load_gaf_from_path<P: AsRef<Path>>(
    path: P,
    taxon: Option<u32>,
    use_symbol: bool,
) -> LcResult<Annotations> {
    let path = path.as_ref();
    info!("Loading annotations from {}", path.display());
    load_gaf(open(path, "GAF file")?, taxon, use_symbol)
}

pub fn load_partition_from_path<P: AsRef<Path>>(path: P) -> LcResult<Partition> {
    let path = path.as_ref();
    info!("Loading initial partition from {}", path.display());
    load_partition(open(path, "partition")?)
}
