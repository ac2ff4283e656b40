use lotuscomm::graph::ProteinGraph;
use lotuscomm::partition::{Annotations, ClusterId, Partition};
use lotuscomm::reassign::{emax_cluster, intra_extra_links, reassign, strongest_rival};
use lotuscomm::scorer::setup::build_scorer;
use lotuscomm::scorer::ParameterVector;
use rstest::rstest;
use std::collections::BTreeSet;

fn annotate(rows: &[(&str, &[&str])]) -> Annotations {
    rows.iter()
        .map(|(p, terms)| (p.to_string(), terms.iter().map(|t| t.to_string()).collect()))
        .collect()
}

fn triangles() -> (ProteinGraph, Partition) {
    let graph = ProteinGraph::from_edges([
        ("a1", "a2"),
        ("a2", "a3"),
        ("a1", "a3"),
        ("b1", "b2"),
        ("b2", "b3"),
        ("b1", "b3"),
        ("c1", "c2"),
        ("c2", "c3"),
        ("c1", "c3"),
        ("a1", "b1"),
    ]);
    let partition = Partition::from_clusters(vec![
        (1, vec!["a1", "a2", "a3"]),
        (2, vec!["b1", "b2", "b3"]),
        (3, vec!["c1", "c2", "c3"]),
    ]);
    (graph, partition)
}

fn leaning() -> (ProteinGraph, Partition) {
    let graph = ProteinGraph::from_edges([
        ("p", "q"),
        ("p", "r"),
        ("p", "s"),
        ("r", "s"),
        ("s", "t"),
        ("r", "t"),
    ]);
    let partition = Partition::from_clusters(vec![(1, vec!["p", "q"]), (2, vec!["r", "s", "t"])]);
    (graph, partition)
}

fn functional() -> (ProteinGraph, Partition, Annotations) {
    let graph = ProteinGraph::from_edges([
        ("x", "y"),
        ("x", "u"),
        ("u", "v"),
        ("v", "w"),
        ("u", "w"),
    ]);
    let partition = Partition::from_clusters(vec![
        (1, vec!["x", "y"]),
        (2, vec!["u", "v", "w"]),
        (3, vec!["z"]),
    ]);
    let annotations = annotate(&[
        ("x", &["GO:0000009"]),
        ("y", &["GO:0000002"]),
        ("u", &["GO:0000009"]),
        ("v", &["GO:0000009"]),
        ("w", &["GO:0000009"]),
        ("z", &["GO:0000003"]),
    ]);
    (graph, partition, annotations)
}

fn members(p: &Partition, id: ClusterId) -> Vec<&str> {
    p.cluster(id)
        .map(|m| m.iter().map(String::as_str).collect())
        .unwrap_or_default()
}

#[test]
fn test_unreachable_overlap_threshold_is_a_no_op() {
    let (graph, initial) = triangles();
    let scorer = build_scorer(&graph, &initial, &Annotations::new());

    for alpha in [0.0, 0.5, 1.0] {
        let out = reassign(&initial, &graph, &scorer, &ParameterVector::new(alpha, 2.1, 0.0)).unwrap();
        assert_eq!(out.partition, initial, "alpha {}", alpha);
        assert_eq!(out.overlaps_added, 0);
        assert_eq!(out.transfers, 0);
    }
}

#[test]
fn test_unreachable_threshold_with_annotations() {
    let (graph, initial, annotations) = functional();
    let scorer = build_scorer(&graph, &initial, &annotations);
    let out = reassign(&initial, &graph, &scorer, &ParameterVector::new(0.0, 2.1, 0.0)).unwrap();
    assert_eq!(out.partition, initial);
}

#[test]
fn test_functional_signal_adds_overlap() {
    // With alpha = 0, x gains about 0.18 by joining cluster 2.
    let (graph, initial, annotations) = functional();
    let scorer = build_scorer(&graph, &initial, &annotations);
    let out = reassign(&initial, &graph, &scorer, &ParameterVector::new(0.0, 0.1, 0.0)).unwrap();

    assert_eq!(out.overlaps_added, 1);
    assert_eq!(out.transfers, 0);
    assert_eq!(members(&out.partition, 1), vec!["x", "y"]);
    assert_eq!(members(&out.partition, 2), vec!["u", "v", "w", "x"]);
    assert_eq!(members(&out.partition, 3), vec!["z"]);
    assert_eq!(out.partition.clusters_of("x"), vec![1, 2]);

    // The initial partition is untouched.
    assert_eq!(initial.clusters_of("x"), vec![1]);
}

#[test]
fn test_structural_only_blocks_the_same_overlap() {
    let (graph, initial, annotations) = functional();
    let scorer = build_scorer(&graph, &initial, &annotations);
    let out = reassign(&initial, &graph, &scorer, &ParameterVector::new(1.0, 0.1, 0.0)).unwrap();
    assert_eq!(out.partition, initial);
}

#[test]
fn test_transfer_moves_leaning_proteins() {
    // p has more links into cluster 2; once it leaves, q follows.
    let (graph, initial) = leaning();
    let scorer = build_scorer(&graph, &initial, &Annotations::new());
    let out = reassign(&initial, &graph, &scorer, &ParameterVector::new(0.0, 0.1, 0.0)).unwrap();

    assert_eq!(out.transfers, 2);
    assert_eq!(out.overlaps_added, 0);
    assert!(members(&out.partition, 1).is_empty());
    assert_eq!(members(&out.partition, 2), vec!["p", "q", "r", "s", "t"]);
}

#[rstest]
#[case(0.0, 0.0, 0.0)]
#[case(0.5, 0.1, 0.0)]
#[case(1.0, 0.0, 1.0)]
#[case(0.2, 0.9, 0.5)]
fn test_cluster_ids_are_conserved(#[case] alpha: f64, #[case] otau: f64, #[case] ttau: f64) {
    for (graph, initial, annotations) in [
        {
            let (g, p) = leaning();
            (g, p, Annotations::new())
        },
        functional(),
    ] {
        let scorer = build_scorer(&graph, &initial, &annotations);
        let out = reassign(&initial, &graph, &scorer, &ParameterVector::new(alpha, otau, ttau)).unwrap();
        let before: BTreeSet<ClusterId> = initial.cluster_ids().collect();
        let after: BTreeSet<ClusterId> = out.partition.cluster_ids().collect();
        assert_eq!(before, after);
    }
}

#[test]
fn test_transfer_tau_has_no_effect() {
    let (graph, initial, annotations) = functional();
    let scorer = build_scorer(&graph, &initial, &annotations);
    let base = reassign(&initial, &graph, &scorer, &ParameterVector::new(0.0, 0.1, 0.0)).unwrap();
    for ttau in [0.3, 0.7, 1.0] {
        let other = reassign(&initial, &graph, &scorer, &ParameterVector::new(0.0, 0.1, ttau)).unwrap();
        assert_eq!(base.partition, other.partition);
    }
}

#[test]
fn test_negative_threshold_only_adds() {
    // Every gain beats -1, so the pass adds memberships without removing any.
    let (graph, initial) = triangles();
    let scorer = build_scorer(&graph, &initial, &Annotations::new());
    let out = reassign(&initial, &graph, &scorer, &ParameterVector::new(0.5, -1.0, 0.0)).unwrap();

    for (id, members) in initial.iter() {
        let now = out.partition.cluster(id).unwrap();
        assert!(members.is_subset(now), "cluster {} lost members", id);
    }
    assert!(out.overlaps_added > 0);
    assert_eq!(
        out.partition.total_memberships(),
        initial.total_memberships() + out.overlaps_added
    );
}

#[test]
fn test_non_finite_parameters_are_rejected() {
    let (graph, initial) = triangles();
    let scorer = build_scorer(&graph, &initial, &Annotations::new());
    let err = reassign(&initial, &graph, &scorer, &ParameterVector::new(f64::NAN, 0.1, 0.0));
    assert!(err.is_err());
}

#[test]
fn test_strongest_rival_prefers_first_on_ties() {
    let partition = Partition::from_clusters(vec![
        (1, vec!["p"]),
        (2, vec!["n1"]),
        (3, vec!["n2"]),
    ]);
    let neighbors: std::collections::HashSet<String> =
        ["n1", "n2"].iter().map(|s| s.to_string()).collect();

    assert_eq!(strongest_rival(&neighbors, &partition, 1), Some((2, 1)));
    assert_eq!(strongest_rival(&neighbors, &partition, 2), Some((3, 1)));

    let strangers: std::collections::HashSet<String> = ["zz".to_string()].into_iter().collect();
    assert_eq!(strongest_rival(&strangers, &partition, 1), None);
}

#[test]
fn test_link_helpers() {
    let (graph, partition) = leaning();
    assert_eq!(intra_extra_links("p", 1, &partition, &graph), (1, 2));
    assert_eq!(intra_extra_links("ghost", 1, &partition, &graph), (0, 0));
    assert_eq!(emax_cluster("p", &partition, &graph), Some(2));
    assert_eq!(emax_cluster("t", &partition, &graph), None);
    assert_eq!(emax_cluster("ghost", &partition, &graph), None);
}
