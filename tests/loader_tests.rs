use lotuscomm::error::LotusError;
use lotuscomm::graph::InteractionGraph;
use lotuscomm::loader::{
    load_edge_list, load_edge_list_from_path, load_gaf, load_gaf_from_path, load_partition,
    load_partition_from_path,
};
use std::fs::File;
use std::io::{Cursor, Write};
use tempfile::tempdir;

#[test]
fn test_gavin_style_tsv_with_header() {
    let data = "s\td\tdescription\n\
                YKL144C\tYPR110C\t0.397689\n\
                YPR110C\tYOR116C\t0.9\n\
                YOR116C\tYOR116C\t1.0\n\
                YKL144C\tYPR110C\t0.5\n\
                BAD\tROW\tnot-a-number\n";
    let graph = load_edge_list(Cursor::new(data), b'\t', true, None).unwrap();

    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.node_count(), 3);
    assert!(graph.has_edge("YPR110C", "YKL144C"));
    assert!(!graph.has_edge("YOR116C", "YOR116C"));
    assert!(!graph.contains("BAD"));
    // The first weight wins for a repeated pair.
    assert_eq!(graph.weight("YPR110C", "YKL144C"), Some(0.397689));
}

#[test]
fn test_string_style_threshold() {
    let data = "protein1 protein2 combined_score\n\
                4932.YAL001C 4932.YBR123C 950\n\
                4932.YAL001C 4932.YDR362C 150\n\
                4932.YBR123C 4932.YDR362C 700\n";
    let graph = load_edge_list(Cursor::new(data), b' ', true, Some(400.0)).unwrap();
    assert_eq!(graph.edge_count(), 2);
    assert!(!graph.has_edge("4932.YAL001C", "4932.YDR362C"));
    assert_eq!(graph.degree("4932.YBR123C"), 2);
}

#[test]
fn test_unweighted_pairs() {
    let graph = load_edge_list(Cursor::new("a,b\nb,c\n"), b',', false, None).unwrap();
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.weight("a", "b"), None);
}

fn gaf_line(id: &str, symbol: &str, qualifier: &str, go: &str, taxon: &str) -> String {
    format!(
        "SGD\t{}\t{}\t{}\t{}\tPMID:1\tIDA\t\tP\tname\t\tprotein\t{}\t20200101\tSGD\n",
        id, symbol, qualifier, go, taxon
    )
}

#[test]
fn test_gaf_parsing_rules() {
    let mut data = String::from("!gaf-version: 2.2\n!generated-by: test\n");
    data += &gaf_line("S000001", "YAL001C", "enables", "GO:0003677", "taxon:559292");
    data += &gaf_line("S000001", "YAL001C", "involved_in", "GO:0006384", "taxon:559292");
    data += &gaf_line("S000002", "YBR123C", "NOT|enables", "GO:0005515", "taxon:559292");
    data += &gaf_line("S000003", "YDR362C", "enables", "CHEBI:1234", "taxon:559292");
    data += &gaf_line("S000004", "YGR001W", "enables", "GO:0005515", "taxon:9606");
    data += "short\tline\n";

    let by_id = load_gaf(Cursor::new(data.clone()), None, false).unwrap();
    assert_eq!(by_id.len(), 2);
    assert_eq!(by_id["S000001"].len(), 2);
    assert!(by_id.get("S000002").is_none());
    assert!(by_id.get("S000003").is_none());

    let by_symbol = load_gaf(Cursor::new(data.clone()), None, true).unwrap();
    assert!(by_symbol.contains_key("YAL001C"));
    assert!(by_symbol.contains_key("YGR001W"));

    let yeast = load_gaf(Cursor::new(data), Some(559292), true).unwrap();
    assert_eq!(yeast.len(), 1);
    assert!(yeast["YAL001C"].contains("GO:0003677"));
}

#[test]
fn test_partition_csv() {
    let data = "cluster_id,protein_id\n0,YAL001C\n0,YBR123C\n3,YDR362C\n";
    let partition = load_partition(Cursor::new(data)).unwrap();
    assert_eq!(partition.len(), 2);
    assert_eq!(partition.clusters_of("YDR362C"), vec![3]);
    assert!(partition.is_disjoint());
}

#[test]
fn test_partition_rejects_bad_rows() {
    let bad_id = "cluster_id,protein_id\nx,YAL001C\n";
    assert!(matches!(load_partition(Cursor::new(bad_id)), Err(LotusError::Input(_))));

    let empty = "cluster_id,protein_id\n";
    assert!(matches!(load_partition(Cursor::new(empty)), Err(LotusError::Input(_))));
}

#[test]
fn test_path_loaders() {
    let dir = tempdir().unwrap();
    let edges = dir.path().join("ppi.tsv");
    let gaf = dir.path().join("go.gaf");
    let clusters = dir.path().join("clusters.csv");

    let mut f = File::create(&edges).unwrap();
    writeln!(f, "a\tb\t1.0").unwrap();
    writeln!(f, "b\tc\t0.5").unwrap();

    let mut f = File::create(&gaf).unwrap();
    write!(f, "{}", gaf_line("a", "A", "", "GO:0000001", "taxon:1")).unwrap();

    let mut f = File::create(&clusters).unwrap();
    writeln!(f, "cluster_id,protein_id").unwrap();
    writeln!(f, "1,a").unwrap();
    writeln!(f, "1,b").unwrap();
    writeln!(f, "2,c").unwrap();

    let graph = load_edge_list_from_path(&edges, b'\t', false, None).unwrap();
    assert_eq!(graph.edge_count(), 2);
    let annotations = load_gaf_from_path(&gaf, None, false).unwrap();
    assert_eq!(annotations.len(), 1);
    let partition = load_partition_from_path(&clusters).unwrap();
    assert_eq!(partition.total_memberships(), 3);

    let missing = load_partition_from_path(dir.path().join("nope.csv"));
    assert!(matches!(missing, Err(LotusError::Input(_))));
}
