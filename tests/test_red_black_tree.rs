use ordered_collections::red_black_tree::{
    DuplicateKeys, RbTree, RedBlackMap, RedBlackMultiset, RedBlackSet,
};
use rand::{thread_rng, Rng};
use simplelog::{Config, LevelFilter, TestLogger};
use std::collections::BTreeMap;

const NUM_OF_OPERATIONS: usize = 10_000;

fn init_logger() {
    TestLogger::init(LevelFilter::Trace, Config::default()).ok();
}

#[test]
fn int_test_red_black_map() {
    init_logger();
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut map = RedBlackMap::new();
    let mut expected = Vec::new();
    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.gen::<u32>();
        let val = rng.gen::<u32>();

        map.insert(key, val);
        expected.push((key, val));
    }

    expected.sort_by(|l, r| l.0.cmp(&r.0));
    expected.dedup_by_key(|pair| pair.0);

    assert_eq!(map.len(), expected.len());

    assert_eq!(map.min(), Some(&expected[0].0));
    assert_eq!(map.max(), Some(&expected[expected.len() - 1].0));

    for entry in &expected {
        assert!(map.contains_key(&entry.0));
        assert_eq!(map.get(&entry.0), Some(&entry.1));
        assert_eq!(map.at(&entry.0), Ok(&entry.1));
    }

    assert_eq!(
        map.iter().map(|(key, value)| (*key, *value)).collect::<Vec<(u32, u32)>>(),
        expected,
    );

    thread_rng().shuffle(&mut expected);

    let mut expected_len = expected.len();
    for entry in expected {
        let old_entry = map.remove(&entry.0);
        expected_len -= 1;
        assert_eq!(old_entry, Some((entry.0, entry.1)));
        assert_eq!(map.len(), expected_len);
    }
    assert!(map.is_empty());
    assert_eq!(map.begin(), map.end());
}

#[test]
fn int_test_tree_invariants_under_churn() {
    init_logger();
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut tree: RbTree<u32, u32> = RbTree::with_chunk_size(16);
    let mut expected = BTreeMap::new();

    for i in 0..NUM_OF_OPERATIONS {
        let key = rng.gen_range(0, 512);
        if rng.gen::<bool>() {
            let val = rng.gen::<u32>();
            let (_, inserted) = tree.insert(key, val);
            assert_eq!(inserted, !expected.contains_key(&key));
            expected.entry(key).or_insert(val);
        } else {
            assert_eq!(tree.remove(&key), expected.remove(&key).map(|val| (key, val)));
        }

        if i % 100 == 0 {
            tree.check_invariants().unwrap();
        }
    }

    tree.check_invariants().unwrap();
    assert_eq!(tree.len(), expected.len());
    assert!(tree.iter().eq(expected.iter()));
    assert!(tree.iter().rev().eq(expected.iter().rev()));
}

#[test]
fn int_test_multiset_invariants_under_churn() {
    init_logger();
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut tree: RbTree<u32, (), DuplicateKeys> = RbTree::new();
    let mut expected: BTreeMap<u32, usize> = BTreeMap::new();

    for i in 0..NUM_OF_OPERATIONS {
        let key = rng.gen_range(0, 64);
        if rng.gen_range(0, 3) < 2 {
            tree.insert(key, ());
            *expected.entry(key).or_insert(0) += 1;
        } else {
            let removed = tree.remove(&key).is_some();
            let count = expected.get(&key).cloned().unwrap_or(0);
            assert_eq!(removed, count > 0);
            if count == 1 {
                expected.remove(&key);
            } else if count > 1 {
                expected.insert(key, count - 1);
            }
        }

        if i % 100 == 0 {
            tree.check_invariants().unwrap();
        }
    }

    tree.check_invariants().unwrap();
    assert_eq!(tree.len(), expected.values().sum::<usize>());
    for key in 0..64 {
        let count = expected.get(&key).cloned().unwrap_or(0);
        assert_eq!(tree.count(&key), count);
        let (start, end) = tree.equal_range(&key);
        assert_eq!(tree.range_between(start, end).count(), count);
    }
}

#[test]
fn int_test_ascending_and_descending_inserts() {
    init_logger();
    let mut ascending: RbTree<u32, ()> = RbTree::new();
    let mut descending: RbTree<u32, ()> = RbTree::new();
    for key in 0..1024u32 {
        ascending.insert(key, ());
        descending.insert(1023 - key, ());
    }

    // A tree of n nodes has a black height of at most log2(n + 1).
    assert!(ascending.check_invariants().unwrap() <= 10);
    assert!(descending.check_invariants().unwrap() <= 10);
    assert!(ascending.iter().eq(descending.iter()));
}

#[test]
fn int_test_erase_root() {
    init_logger();
    let mut tree: RbTree<u32, ()> = vec![10, 5, 15, 3, 7, 12, 18]
        .into_iter()
        .map(|key| (key, ()))
        .collect();
    tree.check_invariants().unwrap();

    let root = tree.find(&10);
    assert_eq!(tree.remove_at(root), (10, ()));

    tree.check_invariants().unwrap();
    assert_eq!(
        tree.iter().map(|(key, _)| *key).collect::<Vec<u32>>(),
        vec![3, 5, 7, 12, 15, 18],
    );
}

#[test]
fn int_test_positions_survive_other_removals() {
    init_logger();
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut map = RedBlackMap::new();
    let positions: Vec<_> = (0..1000u32).map(|key| (key, map.insert(key, key * 2).0)).collect();

    let mut removed = vec![false; positions.len()];
    for _ in 0..500 {
        let index = rng.gen_range(0, positions.len());
        if !removed[index] {
            assert_eq!(map.remove_at(positions[index].1), (index as u32, index as u32 * 2));
            removed[index] = true;
        }
    }

    for (index, &(key, position)) in positions.iter().enumerate() {
        if removed[index] {
            assert_eq!(map.get_at(position), None);
        } else {
            assert_eq!(map.get_at(position), Some((&key, &(key * 2))));
        }
    }
}

#[test]
fn int_test_map_merge() {
    init_logger();
    let mut n: RedBlackMap<u32, &str> = vec![(1, "a"), (3, "c"), (5, "e")].into_iter().collect();
    let mut m: RedBlackMap<u32, &str> = vec![(2, "b"), (3, "x"), (4, "d")].into_iter().collect();
    n.merge(&mut m);

    assert_eq!(
        n.iter().map(|(key, value)| (*key, *value)).collect::<Vec<(u32, &str)>>(),
        vec![(1, "a"), (2, "b"), (3, "c"), (4, "d"), (5, "e")],
    );
    assert_eq!(
        m.iter().map(|(key, value)| (*key, *value)).collect::<Vec<(u32, &str)>>(),
        vec![(3, "x")],
    );
}

#[test]
fn int_test_set_and_multiset() {
    init_logger();
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut set = RedBlackSet::new();
    let mut multiset = RedBlackMultiset::new();
    let mut expected = Vec::new();
    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.gen_range(0, 1000u32);
        set.insert(key);
        multiset.insert(key);
        expected.push(key);
    }

    expected.sort();
    assert_eq!(multiset.len(), expected.len());
    assert!(multiset.iter().eq(expected.iter()));

    expected.dedup();
    assert_eq!(set.len(), expected.len());
    assert!(set.iter().eq(expected.iter()));

    for key in &expected {
        assert_eq!(set.count(key), 1);
        assert!(multiset.count(key) >= 1);
        assert_eq!(multiset.equal_range_iter(key).count(), multiset.count(key));
    }
}
