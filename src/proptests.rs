use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

type Key2 = (i8, i8);

/// Full structural check: arena bookkeeping, parent links, acyclicity, and
/// the KD ordering (active axis, full-key tie-break) over entire subtrees.
/// Returns every node id in the subtree, in no particular order.
fn check_subtree<K: KdKey + std::fmt::Debug, V>(
    t: &KdTree<K, V>,
    id: NodeId,
    parent: NodeId,
    axis: usize,
    seen: &mut [bool],
) -> Vec<NodeId> {
    if id.is_null() {
        return Vec::new();
    }
    assert!(
        !seen[id.idx()],
        "slot {} reached twice (cycle or shared child)",
        id.idx()
    );
    seen[id.idx()] = true;

    let n = t.slots[id.idx()].as_ref().expect("reachable id must be live");
    assert_eq!(n.parent, parent, "parent link mismatch at slot {}", id.idx());

    let next = (axis + 1) % K::DIMS;
    let left = check_subtree(t, n.left, id, next, seen);
    let right = check_subtree(t, n.right, id, next, seen);

    for &m in &left {
        let mk = &t.slots[m.idx()].as_ref().unwrap().key;
        assert_eq!(
            KdTree::<K, V>::cmp_at(mk, &n.key, axis),
            Ordering::Less,
            "left descendant {:?} not below {:?} on axis {}",
            mk,
            n.key,
            axis
        );
    }
    for &m in &right {
        let mk = &t.slots[m.idx()].as_ref().unwrap().key;
        assert_eq!(
            KdTree::<K, V>::cmp_at(mk, &n.key, axis),
            Ordering::Greater,
            "right descendant {:?} not above {:?} on axis {}",
            mk,
            n.key,
            axis
        );
    }

    let mut all = left;
    all.push(id);
    all.extend(right);
    all
}

fn validate_tree<K: KdKey + std::fmt::Debug, V>(t: &KdTree<K, V>) {
    let mut seen = vec![false; t.slots.len()];
    let reachable = check_subtree(t, t.root, NodeId::NULL, 0, &mut seen);
    assert_eq!(reachable.len(), t.count, "len must match reachable nodes");

    let live = t.slots.iter().filter(|s| s.is_some()).count();
    assert_eq!(live, t.count, "live slots must match len");
    for &f in &t.free {
        assert!(t.slots[f.idx()].is_none(), "free-list slot {} is live", f.idx());
    }
    assert_eq!(
        t.free.len() + live,
        t.slots.len(),
        "every slot must be either live or on the free list"
    );
}

fn depth<K: KdKey, V>(t: &KdTree<K, V>, id: NodeId) -> usize {
    if id.is_null() {
        return 0;
    }
    let n = t.slots[id.idx()].as_ref().unwrap();
    1 + depth(t, n.left).max(depth(t, n.right))
}

/// Per-axis extremes must match a brute-force scan of the model map in any
/// tree state, not just freshly built ones.
fn assert_extremes_match_model(t: &KdTree<Key2, u8>, m: &BTreeMap<Key2, u8>) {
    for axis in 0..2 {
        let brute_min = m
            .keys()
            .copied()
            .min_by(|a, b| KdTree::<Key2, u8>::cmp_at(a, b, axis));
        let brute_max = m
            .keys()
            .copied()
            .max_by(|a, b| KdTree::<Key2, u8>::cmp_at(a, b, axis));
        assert_eq!(t.entry(t.min_at(axis)).map(|(k, _)| *k), brute_min);
        assert_eq!(t.entry(t.max_at(axis)).map(|(k, _)| *k), brute_max);
    }
}

fn small_key() -> impl Strategy<Value = Key2> + Clone {
    // Tight coordinate range so single-axis collisions are common and the
    // full-key tie-break is actually exercised.
    (-8i8..=8, -8i8..=8)
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Insert(#[proptest(strategy = "small_key()")] Key2, u8),
    #[proptest(weight = 2)]
    Remove(#[proptest(strategy = "small_key()")] Key2),
    #[proptest(weight = 2)]
    RemoveAt(#[proptest(strategy = "small_key()")] Key2),
    #[proptest(weight = 2)]
    Get(#[proptest(strategy = "small_key()")] Key2),
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_model_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=400)) {
        let mut t: KdTree<Key2, u8> = KdTree::new();
        let mut m: BTreeMap<Key2, u8> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    prop_assert_eq!(t.insert(k, v), m.insert(k, v));
                }
                Op::Remove(k) => {
                    prop_assert_eq!(t.remove(&k), m.remove(&k));
                }
                Op::RemoveAt(k) => {
                    let cur = t.find(&k);
                    let was_live = !cur.is_end();
                    t.remove_at(cur);
                    prop_assert_eq!(was_live, m.remove(&k).is_some());
                }
                Op::Get(k) => {
                    prop_assert_eq!(t.get(&k).copied(), m.get(&k).copied());
                }
            }
            prop_assert_eq!(t.len(), m.len());
            assert_extremes_match_model(&t, &m);
        }

        validate_tree(&t);
        let mut got: Vec<(Key2, u8)> = t.iter().map(|(k, v)| (*k, *v)).collect();
        got.sort();
        let expected: Vec<(Key2, u8)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_bulk_build_matches_model(
        pairs in prop::collection::vec((small_key(), any::<u8>()), 0..=128),
    ) {
        let t = KdTree::from_pairs(pairs.clone());
        validate_tree(&t);

        // BTreeMap insertion is also last-occurrence-wins.
        let mut m: BTreeMap<Key2, u8> = BTreeMap::new();
        for (k, v) in pairs {
            m.insert(k, v);
        }

        prop_assert_eq!(t.len(), m.len());
        let mut got: Vec<(Key2, u8)> = t.iter().map(|(k, v)| (*k, *v)).collect();
        got.sort();
        let expected: Vec<(Key2, u8)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_bulk_build_is_balanced(
        pairs in prop::collection::vec((any::<(i16, i16)>(), any::<u8>()), 1..=512),
    ) {
        let t = KdTree::from_pairs(pairs);
        validate_tree(&t);
        let n = t.len();
        // Lower-median splits give depth at most floor(log2 n) + 1.
        let bound = (usize::BITS - n.leading_zeros()) as usize;
        prop_assert!(depth(&t, t.root) <= bound, "depth {} over bound {} for n = {}",
            depth(&t, t.root), bound, n);
    }

    #[test]
    fn prop_min_max_matches_brute_force(
        pairs in prop::collection::vec((small_key(), any::<u8>()), 1..=64),
    ) {
        let t = KdTree::from_pairs(pairs);
        validate_tree(&t);

        let keys: Vec<Key2> = t.iter().map(|(k, _)| *k).collect();
        for axis in 0..2 {
            let brute_min = keys
                .iter()
                .copied()
                .min_by(|a, b| KdTree::<Key2, u8>::cmp_at(a, b, axis))
                .unwrap();
            let brute_max = keys
                .iter()
                .copied()
                .max_by(|a, b| KdTree::<Key2, u8>::cmp_at(a, b, axis))
                .unwrap();
            prop_assert_eq!(t.entry(t.min_at(axis)).map(|(k, _)| *k), Some(brute_min));
            prop_assert_eq!(t.entry(t.max_at(axis)).map(|(k, _)| *k), Some(brute_max));
        }
    }

    /// Removing through a cursor must produce the identical tree (same
    /// structural in-order sequence) as removing the same key directly.
    #[test]
    fn prop_remove_at_matches_remove_by_key(
        pairs in prop::collection::vec((small_key(), any::<u8>()), 1..=64),
        pick in any::<prop::sample::Index>(),
    ) {
        let t = KdTree::from_pairs(pairs);
        let keys: Vec<Key2> = t.iter().map(|(k, _)| *k).collect();
        let key = keys[pick.index(keys.len())];

        let mut by_key = t.clone();
        let mut by_cursor = t;
        prop_assert!(by_key.remove(&key).is_some());
        by_cursor.remove_at(by_cursor.find(&key));

        validate_tree(&by_key);
        validate_tree(&by_cursor);
        let a: Vec<(Key2, u8)> = by_key.iter().map(|(k, v)| (*k, *v)).collect();
        let b: Vec<(Key2, u8)> = by_cursor.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_cursor_walk_is_consistent(
        pairs in prop::collection::vec((small_key(), any::<u8>()), 0..=64),
    ) {
        let t = KdTree::from_pairs(pairs);

        let mut fwd = Vec::new();
        let mut c = t.begin();
        while !c.is_end() {
            fwd.push(*t.entry(c).map(|(k, _)| k).unwrap());
            c = t.next(c).unwrap();
        }
        prop_assert_eq!(fwd.len(), t.len());

        let mut back = Vec::new();
        let mut c = t.end();
        while let Ok(p) = t.prev(c) {
            back.push(*t.entry(p).map(|(k, _)| k).unwrap());
            c = p;
        }
        back.reverse();
        prop_assert_eq!(&back, &fwd);

        prop_assert_eq!(t.next(t.end()), Err(CursorError::PastEnd));
        if t.is_empty() {
            prop_assert_eq!(t.prev(t.end()), Err(CursorError::BeforeBegin));
        } else {
            prop_assert_eq!(t.prev(t.begin()), Err(CursorError::BeforeBegin));
        }
    }

    /// After any op sequence the invariant holds, so insert-built and
    /// bulk-built trees obey the same ordering rules.
    #[test]
    fn prop_insert_built_tree_validates(
        pairs in prop::collection::vec((small_key(), any::<u8>()), 0..=128),
    ) {
        let mut t: KdTree<Key2, u8> = KdTree::new();
        for (k, v) in pairs {
            t.insert(k, v);
        }
        validate_tree(&t);
    }
}
