//! Per-cell velocity graph: duplicate contraction and branch voting

mod common;

use common::*;
use ndarray::array;
use veltree::cell::{contract_duplicates, contract_velocity_tree, vote_branch_directions};
use veltree::{
    augment_with_velocity, BranchSource, CellVelocityTree, SegmentDecomposition, VelocityConfig,
    WeightedTree,
};

#[test]
fn test_contraction_yields_tree_over_cells() {
    for seed in 0..30 {
        let mut rng = rng(seed);
        let cells = 2 + seed as usize % 9;
        let augmented = WeightedTree::from_adjacency(&random_tree(&mut rng, 2 * cells)).unwrap();

        let contracted = contract_duplicates(&augmented).unwrap();
        assert_eq!(contracted.node_count(), cells, "seed {seed}");
        assert_eq!(contracted.edge_count(), cells - 1, "seed {seed}");
        contracted.ensure_tree().unwrap();
        for (_, _, w) in contracted.edges() {
            assert!(w > 0.0 && w.is_finite());
        }
    }
}

#[test]
fn test_star_hub_duplicate_is_absorbed_by_lightest_neighbor() {
    // Duplicate 3' (node 7) is the hub joining cells 0, 1, 2 and 3
    let mut tree = ndarray::Array2::<f64>::zeros((8, 8));
    for (cell, w) in [(0, 2.0), (1, 1.0), (2, 3.0), (3, 4.0)] {
        tree[[7, cell]] = w;
    }
    for cell in 0..3 {
        tree[[cell, cell + 4]] = 0.5;
    }

    let contracted = contract_velocity_tree(&tree).unwrap();
    let expected = array![
        [0.0, 3.0, 0.0, 0.0],
        [3.0, 0.0, 4.0, 5.0],
        [0.0, 4.0, 0.0, 0.0],
        [0.0, 5.0, 0.0, 0.0],
    ];
    assert_eq!(contracted, expected);
}

#[test]
fn test_random_pipeline_orients_every_tree_edge() {
    for seed in 0..25 {
        let mut rng = rng(500 + seed);
        let cells = 3 + seed as usize % 8;
        let tree = random_tree(&mut rng, 2 * cells);
        let z = random_embedding(&mut rng, 2 * cells, 3);
        let y = random_embedding(&mut rng, cells, 2);

        let result = CellVelocityTree::default()
            .build(&tree, &z, &y, &SegmentDecomposition::from_root(0))
            .unwrap();

        let graph = &result.voted.graph;
        assert_eq!(graph.edge_count(), cells - 1, "seed {seed}");
        assert!(graph.is_oriented(), "seed {seed}");
        for (from, to) in graph.edges() {
            assert!(result.contracted.has_edge(from, to), "seed {seed}: {from} -> {to}");
        }
        assert_eq!(result.voted.positions, y);
        assert_all_finite(graph.as_matrix());
    }
}

#[test]
fn test_revoting_on_directed_graph_is_stable() {
    for seed in 0..15 {
        let mut rng = rng(900 + seed);
        let cells = 4 + seed as usize % 5;
        let augmented = WeightedTree::from_adjacency(&random_tree(&mut rng, 2 * cells)).unwrap();
        let z = random_embedding(&mut rng, 2 * cells, 2);
        let y = random_embedding(&mut rng, cells, 2);
        let config = VelocityConfig::default();

        let contracted = contract_duplicates(&augmented).unwrap();
        let branches = SegmentDecomposition::from_root(0).branches(&contracted).unwrap();
        let first =
            vote_branch_directions(&augmented, &contracted, &branches, &z, &y, &config).unwrap();

        // The directed graph spans the same edges, so voting again changes nothing
        let rebuilt = WeightedTree::from_adjacency(first.graph.as_matrix()).unwrap();
        let second =
            vote_branch_directions(&augmented, &rebuilt, &branches, &z, &y, &config).unwrap();
        assert_eq!(first.graph, second.graph, "seed {seed}");
        assert_eq!(first.verdicts, second.verdicts, "seed {seed}");
    }
}

#[test]
fn test_augmented_states_feed_the_voter() {
    // Cells on a line moving toward +x; duplicates sit a half step ahead
    let states = array![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]];
    let velocity = array![[1.0, 0.2], [1.0, 0.2], [1.0, 0.2]];
    let z = augment_with_velocity(&states, &velocity, 0.5).unwrap();
    assert_eq!(z.nrows(), 6);

    let mut tree = ndarray::Array2::<f64>::zeros((6, 6));
    tree[[0, 1]] = 1.0;
    tree[[1, 2]] = 1.0;
    for cell in 0..3 {
        tree[[cell, cell + 3]] = 0.3;
    }

    // Rooted at the far end, the branch runs 2 -> 1 -> 0 and must flip
    let result = CellVelocityTree::default()
        .build(&tree, &z, &states, &SegmentDecomposition::from_root(2))
        .unwrap();
    assert_eq!(result.voted.verdicts.len(), 1);
    assert_eq!(result.voted.verdicts[0].backward_votes, 3);
    assert_eq!(result.voted.graph.edges(), vec![(0, 1), (1, 2)]);
}
