pub mod optimize;
pub mod reassign;

use lotuscomm::error::LcResult;
use lotuscomm::graph::ProteinGraph;
use lotuscomm::loader;
use lotuscomm::partition::{Annotations, Partition};
use std::path::PathBuf;

pub struct InputSources {
    pub graph: PathBuf,
    pub annotations: PathBuf,
    pub partition: PathBuf,
    pub gold: Option<PathBuf>,
    pub delimiter: u8,
    pub has_header: bool,
    pub min_weight: Option<f64>,
    pub taxon: Option<u32>,
    pub use_symbol: bool,
}

pub struct Inputs {
    pub graph: ProteinGraph,
    pub annotations: Annotations,
    pub initial: Partition,
    pub gold: Option<Partition>,
}

impl Inputs {
    pub fn load(src: &InputSources) -> LcResult<Self> {
        let graph =
            loader::load_edge_list_from_path(&src.graph, src.delimiter, src.has_header, src.min_weight)?;
        let annotations = loader::load_gaf_from_path(&src.annotations, src.taxon, src.use_symbol)?;
        let initial = loader::load_partition_from_path(&src.partition)?;
        let gold = match &src.gold {
            Some(path) => Some(loader::load_partition_from_path(path)?),
            None => None,
        };
        Ok(Self {
            graph,
            annotations,
            initial,
            gold,
        })
    }
}
