use super::*;
use crate::align::LinearScoring;
use crate::error::SeqError;
use proptest::prelude::*;

fn labels(names: &[&str]) -> Vec<Box<str>> {
    names
        .iter()
        .map(|s| s.to_string().into_boxed_str())
        .collect()
}

fn five_taxa_dm() -> DistanceMatrix {
    let rows = [
        [0.0, 6.0, 10.0, 10.0, 10.0],
        [6.0, 0.0, 10.0, 10.0, 10.0],
        [10.0, 10.0, 0.0, 2.0, 6.0],
        [10.0, 10.0, 2.0, 0.0, 6.0],
        [10.0, 10.0, 6.0, 6.0, 0.0],
    ];
    DistanceMatrix::from_rows(&rows, labels(&["A", "B", "C", "D", "E"])).unwrap()
}

fn six_taxa_dm() -> DistanceMatrix {
    let rows = [
        [0.0, 5.0, 4.0, 7.0, 6.0, 8.0],
        [5.0, 0.0, 7.0, 10.0, 9.0, 11.0],
        [4.0, 7.0, 0.0, 7.0, 6.0, 8.0],
        [7.0, 10.0, 7.0, 0.0, 5.0, 9.0],
        [6.0, 9.0, 6.0, 5.0, 0.0, 8.0],
        [8.0, 11.0, 8.0, 9.0, 8.0, 0.0],
    ];
    DistanceMatrix::from_rows(&rows, labels(&["A", "B", "C", "D", "E", "F"])).unwrap()
}

fn simple_4taxa_dm() -> DistanceMatrix {
    // Additive distance matrix for tree: ((A:1,B:1):1,(C:1,D:1):1)
    let data = vec![
        0.0, 2.0, 4.0, 4.0, //
        2.0, 0.0, 4.0, 4.0, //
        4.0, 4.0, 0.0, 2.0, //
        4.0, 4.0, 2.0, 0.0, //
    ];
    DistanceMatrix::new(labels(&["A", "B", "C", "D"]), data).unwrap()
}

fn heights(records: &[LinkageRecord]) -> Vec<f64> {
    records.iter().map(|r| r.height).collect()
}

// ─── DistanceMatrix validation ──────────────────────────────

#[test]
fn dm_accessors() {
    let dm = simple_4taxa_dm();
    assert_eq!(dm.n(), 4);
    assert_eq!(dm.labels().len(), 4);
    assert_eq!(&*dm.labels()[2], "C");
    assert_eq!(dm.get(0, 2), 4.0);
    assert_eq!(dm.data().len(), 16);
    assert_eq!(dm.to_rows()[3], vec![4.0, 4.0, 2.0, 0.0]);
}

#[test]
fn dm_set_symmetric() {
    let mut dm = simple_4taxa_dm();
    dm.set(0, 3, 7.5);
    assert_eq!(dm.get(0, 3), 7.5);
    assert_eq!(dm.get(3, 0), 7.5);
}

#[test]
fn dm_rejects_non_square() {
    let rows: Vec<Vec<f64>> = vec![vec![0.0, 1.0], vec![1.0, 0.0, 2.0]];
    let result = DistanceMatrix::from_rows(&rows, labels(&["a", "b"]));
    assert!(matches!(result, Err(SeqError::MalformedMatrix { .. })));
}

#[test]
fn dm_rejects_asymmetric() {
    let result = DistanceMatrix::new(labels(&["a", "b"]), vec![0.0, 1.0, 2.0, 0.0]);
    assert!(matches!(result, Err(SeqError::MalformedMatrix { .. })));
}

#[test]
fn dm_tolerates_rounding_asymmetry() {
    let result = DistanceMatrix::new(labels(&["a", "b"]), vec![0.0, 0.3, 0.1 + 0.2, 0.0]);
    assert!(result.is_ok());
}

#[test]
fn dm_rejects_nonzero_diagonal() {
    let result = DistanceMatrix::new(labels(&["a", "b"]), vec![0.5, 1.0, 1.0, 0.0]);
    assert!(matches!(result, Err(SeqError::MalformedMatrix { .. })));
}

#[test]
fn dm_rejects_non_finite() {
    let result = DistanceMatrix::new(
        labels(&["a", "b"]),
        vec![0.0, f64::NAN, f64::NAN, 0.0],
    );
    assert!(matches!(result, Err(SeqError::MalformedMatrix { .. })));
}

#[test]
fn dm_rejects_label_count() {
    let rows = [[0.0, 1.0], [1.0, 0.0]];
    let result = DistanceMatrix::from_rows(&rows, labels(&["a", "b", "c"]));
    assert!(matches!(result, Err(SeqError::MalformedMatrix { .. })));

    let result = DistanceMatrix::new(labels(&["a"]), vec![0.0, 1.0, 1.0, 0.0]);
    assert!(matches!(result, Err(SeqError::MalformedMatrix { .. })));
}

// ─── Jukes-Cantor ───────────────────────────────────────────

#[test]
fn jc_identical_is_zero() {
    assert_eq!(jc_distance(b"ACGTACGT", b"ACGTACGT").unwrap(), 0.0);
}

#[test]
fn jc_ignores_case() {
    assert_eq!(jc_distance(b"acgt", b"ACGT").unwrap(), 0.0);
}

#[test]
fn jc_one_in_ten() {
    // one mismatch in ten columns
    let d = jc_distance(b"AAAAAAAAAA", b"TAAAAAAAAA").unwrap();
    let p = 0.1;
    let expected = -0.75 * (1.0 - 4.0 * p / 3.0_f64).ln();
    assert!((d - expected).abs() < 1e-10);
}

#[test]
fn jc_counts_gap_columns() {
    // 2 of 4 columns differ, one of them against a gap
    let d = jc_distance(b"ACGT", b"A-GA").unwrap();
    assert!((d - 0.8239592165010822).abs() < 1e-10);
}

#[test]
fn jc_length_mismatch() {
    let result = jc_distance(b"ac", b"a");
    assert!(matches!(
        result,
        Err(SeqError::SequenceLength { left: 2, right: 1 })
    ));
}

#[test]
fn jc_empty() {
    assert!(matches!(jc_distance(b"", b""), Err(SeqError::EmptySequence)));
}

#[test]
fn jc_saturated() {
    // p = 1.0 >= 3/4
    let result = jc_distance(b"AAAAA", b"TTTTT");
    assert!(matches!(result, Err(SeqError::SaturatedDistance { .. })));
    // p = 0.75 exactly
    let result = jc_distance(b"AAAA", b"ACGT");
    assert!(matches!(result, Err(SeqError::SaturatedDistance { .. })));
}

// ─── distance matrices from sequences ───────────────────────

#[test]
fn jc_matrix_three_seqs() {
    let seqs: Vec<&[u8]> = vec![b"AAAA", b"AAAT", b"AAAA"];
    let dm = jc_distance_matrix(&seqs, labels(&["a", "b", "c"])).unwrap();
    let d01 = jc_distance(b"AAAA", b"AAAT").unwrap();
    assert_eq!(dm.get(0, 0), 0.0);
    assert!((dm.get(0, 1) - d01).abs() < 1e-10);
    assert!((dm.get(1, 0) - d01).abs() < 1e-10);
    assert_eq!(dm.get(0, 2), 0.0);
    assert!((dm.get(1, 2) - d01).abs() < 1e-10);
}

#[test]
fn jc_matrix_too_few_seqs() {
    let seqs: Vec<&[u8]> = vec![b"ACGT"];
    let result = jc_distance_matrix(&seqs, labels(&["a"]));
    assert!(matches!(
        result,
        Err(SeqError::InsufficientData { needed: 2, n: 1, .. })
    ));
}

#[test]
fn jc_matrix_label_count_mismatch() {
    let seqs: Vec<&[u8]> = vec![b"ACGT", b"ACGT"];
    let result = jc_distance_matrix(&seqs, labels(&["a"]));
    assert!(matches!(
        result,
        Err(SeqError::LabelCountMismatch { labels: 1, n: 2 })
    ));
}

#[test]
fn jc_matrix_unequal_lengths() {
    let seqs: Vec<&[u8]> = vec![b"ACGT", b"ACG"];
    let result = jc_distance_matrix(&seqs, labels(&["a", "b"]));
    assert!(matches!(result, Err(SeqError::SequenceLength { .. })));
}

#[test]
fn pairwise_matrix_aligns_first() {
    // ACGTACGT/ACG-ACGT and ACGTACGT/ACGTACGA differ in 1 of 8 columns,
    // ACG-ACGT/ACGTACGA in 2 of 8
    let seqs: Vec<&[u8]> = vec![b"ACGTACGT", b"ACGACGT", b"ACGTACGA"];
    let dm = pairwise_jc_matrix(&seqs, labels(&["x", "y", "z"]), &LinearScoring::default())
        .unwrap();
    assert!((dm.get(0, 1) - 0.13674116759546595).abs() < 1e-10);
    assert!((dm.get(0, 2) - 0.13674116759546595).abs() < 1e-10);
    assert!((dm.get(1, 2) - 0.30409883108112323).abs() < 1e-10);
    assert_eq!(dm.get(2, 1), dm.get(1, 2));
}

#[test]
fn pairwise_matrix_counts_alignment_gaps() {
    // the single gap column is the only difference
    let seqs: Vec<&[u8]> = vec![b"ACGTACGT", b"ACGACGT"];
    let dm = pairwise_jc_matrix(&seqs, labels(&["x", "y"]), &LinearScoring::default()).unwrap();
    let expected = jc_distance(b"ACGTACGT", b"ACG-ACGT").unwrap();
    assert_eq!(dm.get(0, 1), expected);
    assert!(dm.get(0, 1) > 0.0);

    // AT/ACGA aligns as A--T/ACGA: 3 of 4 columns differ
    let seqs: Vec<&[u8]> = vec![b"AT", b"ACGA"];
    let result = pairwise_jc_matrix(&seqs, labels(&["x", "y"]), &LinearScoring::default());
    assert!(matches!(result, Err(SeqError::SaturatedDistance { .. })));
}

// ─── pair-group clustering ──────────────────────────────────

#[test]
fn wpgma_five_taxa() {
    let dendro = wpgma(&five_taxa_dm()).unwrap();
    assert_eq!(
        dendro.root().to_string(),
        "(5.0, (3.0, (0, 'A'), (1, 'B')), (3.0, (4, 'E'), (1.0, (2, 'C'), (3, 'D'))))"
    );
    let expected = vec![
        LinkageRecord { a: 2, b: 3, height: 1.0, size: 2 },
        LinkageRecord { a: 0, b: 1, height: 3.0, size: 2 },
        LinkageRecord { a: 4, b: 5, height: 3.0, size: 3 },
        LinkageRecord { a: 6, b: 7, height: 5.0, size: 5 },
    ];
    assert_eq!(dendro.linkage(), expected.as_slice());
}

#[test]
fn upgma_matches_wpgma_on_uniform_outgroups() {
    let dm = five_taxa_dm();
    let u = upgma(&dm).unwrap();
    let w = wpgma(&dm).unwrap();
    assert_eq!(u.root(), w.root());
    assert_eq!(u.linkage(), w.linkage());
}

#[test]
fn upgma_weights_by_cluster_size() {
    // {A,C,B} (3 taxa) meets {D,E}: (1 * 9.5 + 2 * 6.5) / 3 = 7.5
    // then F: (2 * 8.5 + 3 * 9) / 5 = 8.8
    let dendro = upgma(&six_taxa_dm()).unwrap();
    let expected = [2.0, 2.5, 3.0, 3.75, 4.4];
    for (h, e) in heights(dendro.linkage()).iter().zip(expected) {
        assert!((h - e).abs() < 1e-10, "{h} vs {e}");
    }
    let pairs: Vec<(usize, usize, usize)> =
        dendro.linkage().iter().map(|r| (r.a, r.b, r.size)).collect();
    assert_eq!(pairs, vec![(0, 2, 2), (3, 4, 2), (1, 6, 3), (7, 8, 5), (5, 9, 6)]);
}

#[test]
fn wpgma_averages_pairwise() {
    let dendro = wpgma(&six_taxa_dm()).unwrap();
    assert_eq!(
        dendro.root().to_string(),
        "(4.5, (5, 'F'), (4.0, (2.5, (3, 'D'), (4, 'E')), (3.0, (1, 'B'), (2.0, (0, 'A'), (2, 'C')))))"
    );
    assert_eq!(heights(dendro.linkage()), vec![2.0, 2.5, 3.0, 4.0, 4.5]);
    let pairs: Vec<(usize, usize)> = dendro.linkage().iter().map(|r| (r.a, r.b)).collect();
    assert_eq!(pairs, vec![(0, 2), (3, 4), (1, 6), (7, 8), (5, 9)]);
}

#[test]
fn upgma_two_taxa() {
    let dm = DistanceMatrix::new(labels(&["X", "Y"]), vec![0.0, 6.0, 6.0, 0.0]).unwrap();
    let dendro = upgma(&dm).unwrap();
    assert_eq!(dendro.root().to_string(), "(3.0, (0, 'X'), (1, 'Y'))");
    assert_eq!(dendro.tree().num_leaves(), 2);
}

#[test]
fn tuple_form_escapes_labels() {
    let dm = DistanceMatrix::new(labels(&["it's", r"a\b"]), vec![0.0, 6.0, 6.0, 0.0]).unwrap();
    let dendro = upgma(&dm).unwrap();
    assert_eq!(
        dendro.root().to_string(),
        r"(3.0, (0, 'it\'s'), (1, 'a\\b'))"
    );
}

#[test]
fn pair_group_needs_two_taxa() {
    let dm = DistanceMatrix::new(labels(&["X"]), vec![0.0]).unwrap();
    assert!(matches!(
        upgma(&dm),
        Err(SeqError::InsufficientData { needed: 2, n: 1, .. })
    ));
    assert!(matches!(
        pair_group(&dm, PairGroupMethod::Weighted),
        Err(SeqError::InsufficientData { .. })
    ));
}

#[test]
fn pair_group_ties_take_smallest_pair() {
    // every pair at distance 2
    let dm = DistanceMatrix::new(
        labels(&["a", "b", "c"]),
        vec![0.0, 2.0, 2.0, 2.0, 0.0, 2.0, 2.0, 2.0, 0.0],
    )
    .unwrap();
    let dendro = upgma(&dm).unwrap();
    assert_eq!(dendro.linkage()[0].a, 0);
    assert_eq!(dendro.linkage()[0].b, 1);
    assert_eq!(dendro.linkage()[1].a, 2);
    assert_eq!(dendro.linkage()[1].b, 3);
}

#[test]
fn dendrogram_parts() {
    let dendro = wpgma(&five_taxa_dm()).unwrap();
    let mut leaves = dendro.root().leaf_indices();
    leaves.sort_unstable();
    assert_eq!(leaves, vec![0, 1, 2, 3, 4]);
    let (root, linkage, names) = dendro.into_parts();
    assert_eq!(root.height(), Some(5.0));
    assert_eq!(linkage.len(), 4);
    assert_eq!(names.len(), 5);
}

// ─── linkage output ─────────────────────────────────────────

#[test]
fn linkage_rows() {
    let dendro = wpgma(&five_taxa_dm()).unwrap();
    let rows = linkage_matrix(dendro.linkage());
    assert_eq!(rows[0], [2.0, 3.0, 1.0, 2.0]);
    assert_eq!(rows[3], [6.0, 7.0, 5.0, 5.0]);
}

#[test]
fn linkage_csv() {
    let dendro = wpgma(&five_taxa_dm()).unwrap();
    let mut buf = Vec::new();
    write_linkage_csv(dendro.linkage(), &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(
        text,
        "cluster_a,cluster_b,height,size\n2,3,1.0,2\n0,1,3.0,2\n4,5,3.0,3\n6,7,5.0,5\n"
    );
}

// ─── NJ tree ────────────────────────────────────────────────

#[test]
fn nj_six_taxa() {
    let tree = neighbor_joining(&six_taxa_dm()).unwrap();
    assert_eq!(
        tree.root().to_string(),
        "((0.5, 0.5), ((3.0, 2.0), (3, 'D'), (4, 'E')), \
         ((5.0, 1.0), (5, 'F'), ((2.0, 1.0), (2, 'C'), ((1.0, 4.0), (0, 'A'), (1, 'B')))))"
    );
    assert_eq!(tree.num_leaves(), 6);
    assert_eq!(tree.names().len(), 6);
}

#[test]
fn nj_recovers_additive_lengths() {
    let tree = neighbor_joining(&simple_4taxa_dm()).unwrap();
    assert_eq!(
        tree.root().to_string(),
        "((1.0, 1.0), ((1.0, 1.0), (0, 'A'), (1, 'B')), ((1.0, 1.0), (2, 'C'), (3, 'D')))"
    );
}

#[test]
fn nj_three_taxa() {
    let dm = DistanceMatrix::new(
        labels(&["A", "B", "C"]),
        vec![0.0, 3.0, 4.0, 3.0, 0.0, 5.0, 4.0, 5.0, 0.0],
    )
    .unwrap();
    let tree = neighbor_joining(&dm).unwrap();
    assert_eq!(
        tree.root().to_string(),
        "((1.5, 1.5), (2, 'C'), ((1.0, 2.0), (0, 'A'), (1, 'B')))"
    );
    assert_eq!(tree.root().height(), None);
}

#[test]
fn nj_needs_three_taxa() {
    let dm = DistanceMatrix::new(labels(&["X", "Y"]), vec![0.0, 3.0, 3.0, 0.0]).unwrap();
    assert!(matches!(
        neighbor_joining(&dm),
        Err(SeqError::InsufficientData { needed: 3, n: 2, .. })
    ));
}

// ─── Newick ─────────────────────────────────────────────────

#[test]
fn newick_nj() {
    let dm = DistanceMatrix::new(
        labels(&["A", "B", "C"]),
        vec![0.0, 3.0, 4.0, 3.0, 0.0, 5.0, 4.0, 5.0, 0.0],
    )
    .unwrap();
    let tree = neighbor_joining(&dm).unwrap();
    assert_eq!(
        to_newick(&tree),
        "(C:1.500000,(A:1.000000,B:2.000000):1.500000);"
    );
}

#[test]
fn newick_pair_group_branch_lengths() {
    let dendro = wpgma(&five_taxa_dm()).unwrap();
    assert_eq!(
        to_newick(dendro.tree()),
        "((A:3.000000,B:3.000000):2.000000,\
         (E:3.000000,(C:1.000000,D:1.000000):2.000000):2.000000);"
    );
}

#[test]
fn newick_quotes_labels() {
    let data = vec![
        0.0, 1.0, 2.0, 3.0, //
        1.0, 0.0, 2.0, 3.0, //
        2.0, 2.0, 0.0, 3.0, //
        3.0, 3.0, 3.0, 0.0, //
    ];
    let dm = DistanceMatrix::new(labels(&["A B", "C:D", "E'F", "G"]), data).unwrap();
    let nwk = to_newick(&neighbor_joining(&dm).unwrap());
    assert!(nwk.contains("'A B'"));
    assert!(nwk.contains("'C:D'"));
    assert!(nwk.contains("'E''F'"));
    assert!(nwk.contains("G:"));
    assert!(nwk.ends_with(';'));
}

// ─── properties ─────────────────────────────────────────────

fn dna_pair(len: usize) -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
    let base = prop::sample::select(vec![b'A', b'C', b'G', b'T']);
    (
        prop::collection::vec(base.clone(), len),
        prop::collection::vec(base, len),
    )
}

fn random_dm(n: usize) -> impl Strategy<Value = DistanceMatrix> {
    prop::collection::vec(1u32..50, n * (n - 1) / 2).prop_map(move |upper| {
        let mut data = vec![0.0; n * n];
        let mut it = upper.into_iter();
        for i in 0..n {
            for j in (i + 1)..n {
                let d = it.next().unwrap_or(1) as f64;
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        let names: Vec<String> = (0..n).map(|i| format!("t{i}")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        DistanceMatrix::new(labels(&names), data).unwrap()
    })
}

proptest! {
    #[test]
    fn jc_is_symmetric((a, b) in dna_pair(24)) {
        match (jc_distance(&a, &b), jc_distance(&b, &a)) {
            (Ok(x), Ok(y)) => prop_assert_eq!(x, y),
            (Err(_), Err(_)) => {}
            _ => prop_assert!(false, "one direction failed"),
        }
    }

    #[test]
    fn jc_grows_with_mismatches(k in 0usize..14) {
        let a = vec![b'A'; 20];
        let mut b = a.clone();
        let mut c = a.clone();
        for x in b.iter_mut().take(k) {
            *x = b'C';
        }
        for x in c.iter_mut().take(k + 1) {
            *x = b'C';
        }
        prop_assert!(jc_distance(&a, &b).unwrap() < jc_distance(&a, &c).unwrap());
    }

    #[test]
    fn pair_group_heights_never_decrease(dm in (2usize..9).prop_flat_map(random_dm)) {
        for method in [PairGroupMethod::Unweighted, PairGroupMethod::Weighted] {
            let dendro = pair_group(&dm, method).unwrap();
            prop_assert_eq!(dendro.linkage().len(), dm.n() - 1);
            prop_assert_eq!(dendro.root().num_leaves(), dm.n());
            for w in dendro.linkage().windows(2) {
                prop_assert!(w[1].height >= w[0].height - 1e-9);
            }
        }
    }

    #[test]
    fn nj_keeps_every_taxon(dm in (3usize..9).prop_flat_map(random_dm)) {
        let tree = neighbor_joining(&dm).unwrap();
        let mut leaves = tree.root().leaf_indices();
        leaves.sort_unstable();
        prop_assert_eq!(leaves, (0..dm.n()).collect::<Vec<_>>());
    }
}
