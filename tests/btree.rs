use std::collections::BTreeSet;

use degree_btree::{BTree, Degree, Error};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Keys inserted by the reference scenarios, in insertion order.
const SCENARIO_KEYS: [i32; 8] = [10, 20, 5, 6, 12, 30, 7, 17];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn keys(tree: &BTree<i32>) -> Vec<i32> {
    tree.traverse().into_iter().copied().collect()
}

fn scenario_tree() -> BTree<i32> {
    init_logging();
    let mut tree = BTree::new(2).unwrap();
    for key in SCENARIO_KEYS {
        tree.insert(key);
        tree.check_invariants().unwrap();
    }
    tree
}

// ─── Construction ───────────────────────────────────────────────────────────

#[test]
fn construction_rejects_small_degrees() {
    init_logging();
    assert!(matches!(BTree::<i32>::new(0), Err(Error::InvalidDegree { degree: 0 })));
    assert!(matches!(BTree::<i32>::new(1), Err(Error::InvalidDegree { degree: 1 })));
    assert_eq!(BTree::<i32>::new(2).unwrap().degree(), Degree::MIN);
}

#[test]
fn construction_rejects_overflowing_degrees() {
    init_logging();
    assert!(matches!(
        BTree::<i32>::new(usize::MAX),
        Err(Error::InvalidDegree { degree: usize::MAX })
    ));

    // The largest accepted degree still handles ordinary inserts without overflowing its bounds.
    let mut tree: BTree<i32> = BTree::new(usize::MAX / 2).unwrap();
    assert_eq!(tree.degree(), Degree::MAX);
    tree.extend([3, 1, 2]);
    assert_eq!(keys(&tree), vec![1, 2, 3]);
    assert!(tree.erase(&2));
    tree.check_invariants().unwrap();
}

#[test]
fn empty_tree_reports_nothing() {
    init_logging();
    let mut tree: BTree<i32> = BTree::new(3).unwrap();
    assert_eq!(tree.search(&1), None);
    assert_eq!(keys(&tree), Vec::<i32>::new());
    assert!(!tree.erase(&1));
    assert_eq!(tree.height(), 0);
    tree.check_invariants().unwrap();
}

// ─── Reference scenarios (t = 2) ────────────────────────────────────────────

#[test]
fn scenario_insert_yields_sorted_keys() {
    let tree = scenario_tree();
    assert_eq!(keys(&tree), vec![5, 6, 7, 10, 12, 17, 20, 30]);
    assert_eq!(tree.len(), 8);
}

#[test]
fn scenario_search() {
    let tree = scenario_tree();
    assert_eq!(tree.search(&6), Some(&6));
    assert_eq!(tree.search(&99), None);
}

#[test]
fn scenario_erase_twice() {
    let mut tree = scenario_tree();
    assert!(tree.erase(&6));
    tree.check_invariants().unwrap();
    assert_eq!(keys(&tree), vec![5, 7, 10, 12, 17, 20, 30]);

    assert!(!tree.erase(&6));
    tree.check_invariants().unwrap();
    assert_eq!(keys(&tree), vec![5, 7, 10, 12, 17, 20, 30]);
}

#[test]
fn scenario_erase_everything_ascending() {
    let mut tree = scenario_tree();
    let mut remaining = keys(&tree);

    while let Some(&key) = remaining.first() {
        assert!(tree.erase(&key), "erase({key})");
        tree.check_invariants().unwrap();
        remaining.remove(0);
        assert_eq!(keys(&tree), remaining);
    }

    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
}

#[test]
fn scenario_descending_insert_matches() {
    init_logging();
    let mut tree = BTree::new(2).unwrap();
    for key in [30, 20, 17, 12, 10, 7, 6, 5] {
        tree.insert(key);
        tree.check_invariants().unwrap();
    }
    assert_eq!(keys(&tree), keys(&scenario_tree()));
}

// ─── Set semantics ──────────────────────────────────────────────────────────

#[test]
fn insert_is_idempotent() {
    init_logging();
    let mut once = BTree::new(2).unwrap();
    let mut twice = BTree::new(2).unwrap();
    for key in SCENARIO_KEYS {
        once.insert(key);
        twice.insert(key);
        assert!(!twice.insert(key));
    }
    twice.check_invariants().unwrap();
    assert_eq!(keys(&once), keys(&twice));
    assert_eq!(once.height(), twice.height());
}

#[test]
fn insert_then_erase_round_trip() {
    init_logging();
    let mut tree = BTree::new(2).unwrap();
    tree.insert(42);
    assert!(tree.erase(&42));
    assert!(tree.is_empty());
    tree.check_invariants().unwrap();

    tree.insert(42);
    tree.insert(42);
    assert!(tree.erase(&42));
    assert_eq!(tree.search(&42), None);
    assert!(tree.is_empty());
}

#[test]
fn erase_descending_from_large_tree() {
    init_logging();
    for t in 2..=5 {
        let mut tree: BTree<i32> = BTree::new(t).unwrap();
        tree.extend((0..1_000).map(|i| (i * 7919) % 1_000));
        tree.check_invariants().unwrap();
        assert_eq!(tree.len(), 1_000);

        for key in (0..1_000).rev() {
            assert!(tree.erase(&key));
            tree.check_invariants().unwrap();
        }
        assert!(tree.is_empty());
    }
}

#[test]
fn string_keys_are_searchable_by_str() {
    init_logging();
    let mut tree: BTree<String> = BTree::default();
    for word in ["delta", "alpha", "echo", "charlie", "bravo"] {
        tree.insert(word.to_string());
    }
    assert!(tree.contains("charlie"));
    assert!(tree.erase("alpha"));
    assert_eq!(tree.first().map(String::as_str), Some("bravo"));
    assert_eq!(tree.last().map(String::as_str), Some("echo"));
}

#[test]
fn height_stays_logarithmic() {
    init_logging();
    let mut tree: BTree<i32> = BTree::new(2).unwrap();
    tree.extend(0..4_096);
    // A non-root node of degree 2 has at least 2 children, so 4096 keys need at most 12 levels.
    assert!(tree.height() <= 12, "height {}", tree.height());
    tree.check_invariants().unwrap();
}

// ─── Randomized comparison against BTreeSet ─────────────────────────────────

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i64),
    Erase(i64),
    Search(i64),
}

fn value_strategy() -> impl Strategy<Value = i64> {
    -2_000i64..2_000i64
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(SetOp::Insert),
        3 => value_strategy().prop_map(SetOp::Erase),
        2 => value_strategy().prop_map(SetOp::Search),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both `BTree` and `BTreeSet` and asserts
    /// identical results at every step.
    #[test]
    fn ops_match_btreeset(
        t in 2usize..8,
        ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE),
    ) {
        init_logging();
        let mut tree: BTree<i64> = BTree::new(t).unwrap();
        let mut model: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                SetOp::Insert(v) => {
                    prop_assert_eq!(tree.insert(*v), model.insert(*v), "insert({})", v);
                }
                SetOp::Erase(v) => {
                    prop_assert_eq!(tree.erase(v), model.remove(v), "erase({})", v);
                }
                SetOp::Search(v) => {
                    prop_assert_eq!(tree.search(v), model.get(v), "search({})", v);
                }
            }
            prop_assert_eq!(tree.len(), model.len(), "len mismatch after {:?}", op);
        }

        tree.check_invariants().unwrap();
        let expected: Vec<&i64> = model.iter().collect();
        prop_assert_eq!(tree.traverse(), expected);
    }

    /// Validates the structure after every single mutation.
    #[test]
    fn invariants_hold_after_every_step(
        t in 2usize..5,
        ops in proptest::collection::vec(set_op_strategy(), 0..300),
    ) {
        init_logging();
        let mut tree: BTree<i64> = BTree::new(t).unwrap();
        for op in ops {
            match op {
                SetOp::Insert(v) => {
                    tree.insert(v);
                }
                SetOp::Erase(v) => {
                    tree.erase(&v);
                }
                SetOp::Search(_) => continue,
            }
            prop_assert_eq!(tree.check_invariants(), Ok(()));
        }
    }

    /// Insertion order never changes the logical set.
    #[test]
    fn insertion_order_is_irrelevant(values in proptest::collection::vec(value_strategy(), 0..500)) {
        init_logging();
        let mut forward: BTree<i64> = BTree::new(3).unwrap();
        let mut backward: BTree<i64> = BTree::new(3).unwrap();
        forward.extend(values.iter().copied());
        backward.extend(values.iter().rev().copied());
        prop_assert_eq!(forward.traverse(), backward.traverse());
    }
}
