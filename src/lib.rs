//! # kdmap
//!
//! An ordered k-dimensional map backed by a KD-tree: a binary search tree
//! whose branching rule cycles through the K coordinate axes of the key by
//! depth. Supports exact-key lookup, insert-with-overwrite, balanced bulk
//! construction, per-axis minimum/maximum queries, deletion by the classical
//! Bentley replacement algorithm, and bidirectional in-order traversal.
//!
//! ## Example
//!
//! ```rust
//! use kdmap::KdTree;
//!
//! let mut tree: KdTree<(i32, i32), &str> = KdTree::new();
//! tree.insert((10, 20), "a");
//! tree.insert((5, 30), "b");
//!
//! assert_eq!(tree.get(&(10, 20)), Some(&"a"));
//!
//! // Minimum entry by the first coordinate.
//! let min_x = tree.min_at(0);
//! assert_eq!(tree.entry(min_x).map(|(k, _)| *k), Some((5, 30)));
//! ```

#![forbid(unsafe_code)]

use std::cmp::Ordering;
use std::fmt;
use std::mem;

// =============================================================================
// Key trait
// =============================================================================

/// A fixed-arity coordinate key for a [`KdTree`].
///
/// `DIMS` is the number of axes and must be at least 1. `cmp_axis` compares a
/// single coordinate; the full `Ord` order is used as a tie-break whenever two
/// keys collide on one axis, which keeps the per-axis order total and strict
/// over distinct keys.
///
/// Implementations are provided for tuples of arity 1 through 8 and for
/// `[T; N]` arrays. `cmp_axis` dispatches a runtime axis index to the matching
/// fixed coordinate with a plain unrolled match.
pub trait KdKey: Ord + Clone {
    /// Number of coordinate axes in the key.
    const DIMS: usize;

    /// Compares `self` and `other` on a single axis.
    ///
    /// # Panics
    ///
    /// Panics if `axis >= Self::DIMS`.
    fn cmp_axis(&self, other: &Self, axis: usize) -> Ordering;
}

macro_rules! impl_kdkey_tuple {
    ($dims:expr => $($T:ident: $idx:tt),+) => {
        impl<$($T: Ord + Clone),+> KdKey for ($($T,)+) {
            const DIMS: usize = $dims;

            fn cmp_axis(&self, other: &Self, axis: usize) -> Ordering {
                match axis {
                    $($idx => self.$idx.cmp(&other.$idx),)+
                    _ => panic!(
                        "axis {} out of range for {}-dimensional key",
                        axis,
                        Self::DIMS
                    ),
                }
            }
        }
    };
}

impl_kdkey_tuple!(1 => A: 0);
impl_kdkey_tuple!(2 => A: 0, B: 1);
impl_kdkey_tuple!(3 => A: 0, B: 1, C: 2);
impl_kdkey_tuple!(4 => A: 0, B: 1, C: 2, D: 3);
impl_kdkey_tuple!(5 => A: 0, B: 1, C: 2, D: 3, E: 4);
impl_kdkey_tuple!(6 => A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_kdkey_tuple!(7 => A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_kdkey_tuple!(8 => A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

impl<T: Ord + Clone, const N: usize> KdKey for [T; N] {
    const DIMS: usize = N;

    fn cmp_axis(&self, other: &Self, axis: usize) -> Ordering {
        self[axis].cmp(&other[axis])
    }
}

// =============================================================================
// Node ids and arena storage
// =============================================================================

/// Index of a node slot in the tree's arena. `NULL` doubles as the end/absent
/// marker, so parent and child links need no separate option wrapper.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct NodeId(u32);

impl NodeId {
    const NULL: NodeId = NodeId(u32::MAX);

    #[inline]
    fn is_null(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    /// Non-owning back-reference, used only for traversal and depth walks.
    parent: NodeId,
    left: NodeId,
    right: NodeId,
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Extreme {
    Min,
    Max,
}

/// An ordered map from K-dimensional keys to values.
///
/// The split axis of a node is positional (`depth mod K`), never stored.
/// Ordering at a node splitting on axis `a` is by `(coordinate_a, full key)`,
/// so the left subtree is strictly below the node and the right subtree
/// strictly above even when coordinates collide on the split axis, and no two
/// entries share a key.
///
/// Nodes live in a slot arena indexed by 32-bit ids; the tree exclusively
/// owns every node. Bulk construction ([`KdTree::from_pairs`]) balances the
/// tree; `insert` and `remove` do not rebalance, so adversarial insertion
/// orders can degrade depth like any unbalanced binary search tree.
///
/// Single-threaded: share across threads only behind external
/// synchronization.
#[derive(Clone)]
pub struct KdTree<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<NodeId>,
    root: NodeId,
    count: usize,
}

impl<K: KdKey, V> KdTree<K, V> {
    /// Creates an empty tree.
    ///
    /// # Panics
    ///
    /// Panics if `K::DIMS` is zero.
    pub fn new() -> Self {
        assert!(K::DIMS > 0, "cannot construct a KdTree with zero axes");
        KdTree {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId::NULL,
            count: 0,
        }
    }

    /// Number of entries in the tree.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn node(&self, id: NodeId) -> &Node<K, V> {
        self.slots[id.idx()].as_ref().expect("dangling node id")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        self.slots[id.idx()].as_mut().expect("dangling node id")
    }

    fn alloc(&mut self, key: K, value: V, parent: NodeId) -> NodeId {
        let node = Node {
            key,
            value,
            parent,
            left: NodeId::NULL,
            right: NodeId::NULL,
        };
        match self.free.pop() {
            Some(id) => {
                debug_assert!(self.slots[id.idx()].is_none());
                self.slots[id.idx()] = Some(node);
                id
            }
            None => {
                let id = NodeId(u32::try_from(self.slots.len()).expect("node arena overflow"));
                self.slots.push(Some(node));
                id
            }
        }
    }

    fn dealloc(&mut self, id: NodeId) -> Node<K, V> {
        let node = self.slots[id.idx()].take().expect("double free of node slot");
        self.free.push(id);
        node
    }

    #[inline]
    fn next_axis(axis: usize) -> usize {
        (axis + 1) % K::DIMS
    }

    /// The ordering every structural operation uses: the active axis first,
    /// the full key as tie-break. Equal only for identical keys.
    #[inline]
    fn cmp_at(a: &K, b: &K, axis: usize) -> Ordering {
        a.cmp_axis(b, axis).then_with(|| a.cmp(b))
    }

    /// Re-points one child slot of `parent` and the child's back-reference.
    fn attach(&mut self, parent: NodeId, side: Side, child: NodeId) {
        let p = self.node_mut(parent);
        match side {
            Side::Left => p.left = child,
            Side::Right => p.right = child,
        }
        if !child.is_null() {
            self.node_mut(child).parent = parent;
        }
    }
}

// =============================================================================
// Construction
// =============================================================================

impl<K: KdKey, V> KdTree<K, V> {
    /// Builds a balanced tree from an unordered collection of pairs.
    ///
    /// When the same key appears more than once, the value of the occurrence
    /// that comes last in input order wins. The resulting tree has one node
    /// per distinct key and depth at most `floor(log2 n) + 1`. O(n log n)
    /// expected.
    pub fn from_pairs(mut pairs: Vec<(K, V)>) -> Self {
        let mut tree = Self::new();

        // Stable sort keeps input order within equal-key runs, so keeping the
        // last element of each run is exactly last-occurrence-wins.
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        let mut dedup: Vec<(K, V)> = Vec::with_capacity(pairs.len());
        for pair in pairs {
            match dedup.last_mut() {
                Some(last) if last.0 == pair.0 => *last = pair,
                _ => dedup.push(pair),
            }
        }

        tree.slots.reserve(dedup.len());
        tree.count = dedup.len();
        tree.root = tree.build_rec(dedup, NodeId::NULL, 0);
        tree
    }

    /// Recursive median split. The order statistic uses the same tie-broken
    /// per-axis comparator as insertion, so bulk-built trees satisfy the
    /// identical invariant as insert-built ones.
    fn build_rec(&mut self, mut items: Vec<(K, V)>, parent: NodeId, axis: usize) -> NodeId {
        if items.is_empty() {
            return NodeId::NULL;
        }

        // Lower median: rank (n - 1) / 2 on this axis, linear time.
        let mid = (items.len() - 1) / 2;
        items.select_nth_unstable_by(mid, |a, b| Self::cmp_at(&a.0, &b.0, axis));
        let upper = items.split_off(mid + 1);
        let (key, value) = items.pop().expect("median partition is non-empty");

        let id = self.alloc(key, value, parent);
        let next = Self::next_axis(axis);
        let left = self.build_rec(items, id, next);
        let right = self.build_rec(upper, id, next);
        let n = self.node_mut(id);
        n.left = left;
        n.right = right;
        id
    }
}

impl<K: KdKey, V> FromIterator<(K, V)> for KdTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter.into_iter().collect())
    }
}

impl<K: KdKey, V> Extend<(K, V)> for KdTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

// =============================================================================
// Insert and lookup
// =============================================================================

impl<K: KdKey, V> KdTree<K, V> {
    /// Inserts a key-value pair.
    ///
    /// If the key is already present its value is overwritten in place and
    /// the previous value returned; the tree's shape does not change. Returns
    /// `None` when a new entry was created. Insertion never rebalances.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.root.is_null() {
            self.root = self.alloc(key, value, NodeId::NULL);
            self.count += 1;
            return None;
        }

        let mut cur = self.root;
        let mut axis = 0;
        loop {
            let n = self.node(cur);
            if key == n.key {
                return Some(mem::replace(&mut self.node_mut(cur).value, value));
            }
            let go_left = Self::cmp_at(&key, &n.key, axis) == Ordering::Less;
            let child = if go_left { n.left } else { n.right };
            if child.is_null() {
                let id = self.alloc(key, value, cur);
                let n = self.node_mut(cur);
                if go_left {
                    n.left = id;
                } else {
                    n.right = id;
                }
                self.count += 1;
                return None;
            }
            cur = child;
            axis = Self::next_axis(axis);
        }
    }

    /// Same descent as insert, read-only. NULL when the key is absent.
    /// O(K · depth).
    fn find_node(&self, key: &K) -> NodeId {
        let mut cur = self.root;
        let mut axis = 0;
        while !cur.is_null() {
            let n = self.node(cur);
            if *key == n.key {
                return cur;
            }
            cur = if Self::cmp_at(key, &n.key, axis) == Ordering::Less {
                n.left
            } else {
                n.right
            };
            axis = Self::next_axis(axis);
        }
        NodeId::NULL
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let id = self.find_node(key);
        if id.is_null() {
            None
        } else {
            Some(&self.node(id).value)
        }
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find_node(key);
        if id.is_null() {
            None
        } else {
            Some(&mut self.node_mut(id).value)
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        !self.find_node(key).is_null()
    }

    /// Returns a cursor at the entry with `key`, or the end cursor if the
    /// key is absent.
    pub fn find(&self, key: &K) -> Cursor {
        Cursor(self.find_node(key))
    }
}

// =============================================================================
// Per-axis minimum / maximum
// =============================================================================

impl<K: KdKey, V> KdTree<K, V> {
    /// Picks the better of two candidate nodes on `target`, either of which
    /// may be NULL.
    fn better(&self, a: NodeId, b: NodeId, target: usize, dir: Extreme) -> NodeId {
        if a.is_null() {
            return b;
        }
        if b.is_null() {
            return a;
        }
        let ord = Self::cmp_at(&self.node(a).key, &self.node(b).key, target);
        let a_wins = match dir {
            Extreme::Min => ord == Ordering::Less,
            Extreme::Max => ord == Ordering::Greater,
        };
        if a_wins {
            a
        } else {
            b
        }
    }

    /// Extreme entry on `target` within the subtree at `node` (split axis
    /// `axis`). The subtree on the shrinking side of the split always holds
    /// candidates; the other side only when this node splits on a different
    /// axis, which is the pruning that keeps the query sub-linear on a
    /// balanced tree.
    fn extreme_rec(&self, node: NodeId, target: usize, axis: usize, dir: Extreme) -> NodeId {
        if node.is_null() {
            return NodeId::NULL;
        }
        let n = self.node(node);
        let (always, pruned) = match dir {
            Extreme::Min => (n.left, n.right),
            Extreme::Max => (n.right, n.left),
        };
        let next = Self::next_axis(axis);
        let mut best = self.extreme_rec(always, target, next, dir);
        if axis != target {
            let other = self.extreme_rec(pruned, target, next, dir);
            best = self.better(best, other, target, dir);
        }
        self.better(best, node, target, dir)
    }

    /// Cursor at the entry whose coordinate on `axis` is minimal, ties broken
    /// by full-key order. Out-of-range axes wrap (`axis % K::DIMS`). Returns
    /// the end cursor on an empty tree.
    pub fn min_at(&self, axis: usize) -> Cursor {
        Cursor(self.extreme_rec(self.root, axis % K::DIMS, 0, Extreme::Min))
    }

    /// Mirror of [`KdTree::min_at`]: the entry whose coordinate on `axis` is
    /// maximal.
    pub fn max_at(&self, axis: usize) -> Cursor {
        Cursor(self.extreme_rec(self.root, axis % K::DIMS, 0, Extreme::Max))
    }
}

// =============================================================================
// Removal
// =============================================================================

impl<K: KdKey, V> KdTree<K, V> {
    /// Removes the entry with `key`, returning its value, or `None` if the
    /// key is absent.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let (new_root, removed) = self.remove_rec(self.root, key, 0);
        self.root = new_root;
        if !new_root.is_null() {
            self.node_mut(new_root).parent = NodeId::NULL;
        }
        removed.map(|(_, v)| v)
    }

    /// Removes `key` from the subtree rooted at `node` (split axis `axis`),
    /// returning the new subtree root and the extracted payload.
    ///
    /// A matched node with children is not unlinked: the extreme entry of one
    /// subtree on the node's split axis donates its payload into the matched
    /// slot and is itself removed recursively, so the only topology change is
    /// the removal of the donor. Using the minimum of the right subtree (or
    /// the maximum of the left) keeps the invariant on the node's axis.
    fn remove_rec(&mut self, node: NodeId, key: &K, axis: usize) -> (NodeId, Option<(K, V)>) {
        if node.is_null() {
            return (NodeId::NULL, None);
        }
        let next = Self::next_axis(axis);
        let n = self.node(node);

        if *key != n.key {
            let go_left = Self::cmp_at(key, &n.key, axis) == Ordering::Less;
            let child = if go_left { n.left } else { n.right };
            let side = if go_left { Side::Left } else { Side::Right };
            let (new_child, removed) = self.remove_rec(child, key, next);
            self.attach(node, side, new_child);
            return (node, removed);
        }

        let (left, right) = (n.left, n.right);
        if left.is_null() && right.is_null() {
            let freed = self.dealloc(node);
            self.count -= 1;
            return (NodeId::NULL, Some((freed.key, freed.value)));
        }

        let donor_payload = if !right.is_null() {
            let donor = self.extreme_rec(right, axis, next, Extreme::Min);
            let donor_key = self.node(donor).key.clone();
            let (new_right, payload) = self.remove_rec(right, &donor_key, next);
            self.attach(node, Side::Right, new_right);
            payload.expect("donor key must exist in its subtree")
        } else {
            let donor = self.extreme_rec(left, axis, next, Extreme::Max);
            let donor_key = self.node(donor).key.clone();
            let (new_left, payload) = self.remove_rec(left, &donor_key, next);
            self.attach(node, Side::Left, new_left);
            payload.expect("donor key must exist in its subtree")
        };

        let n = self.node_mut(node);
        let old_key = mem::replace(&mut n.key, donor_payload.0);
        let old_value = mem::replace(&mut n.value, donor_payload.1);
        (node, Some((old_key, old_value)))
    }
}

// =============================================================================
// Cursors
// =============================================================================

/// A position in a [`KdTree`]: either a live entry or the end sentinel.
///
/// Cursors are cheap copies holding no borrow; all navigation goes through
/// the tree ([`KdTree::next`], [`KdTree::prev`], [`KdTree::entry`]). A cursor
/// is invalidated by any removal that frees or overwrites the payload of the
/// entry it addresses — including entries used as replacement donors during
/// the removal of a different key. Using a stale cursor is a logic error: it
/// may panic or address a different live entry, but never breaks memory
/// safety.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cursor(NodeId);

impl Cursor {
    /// Whether this cursor is the end sentinel.
    pub fn is_end(self) -> bool {
        self.0.is_null()
    }
}

/// Error from stepping a cursor outside the tree's range. The failing call
/// has no effect on the tree or on other cursors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// `next` was called on the end cursor.
    PastEnd,
    /// `prev` was called on the first entry, or on an empty tree.
    BeforeBegin,
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorError::PastEnd => write!(f, "cannot step a cursor past the end of the tree"),
            CursorError::BeforeBegin => {
                write!(f, "cannot step a cursor before the first entry of the tree")
            }
        }
    }
}

impl std::error::Error for CursorError {}

impl<K: KdKey, V> KdTree<K, V> {
    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while !id.is_null() {
            let left = self.node(id).left;
            if left.is_null() {
                break;
            }
            id = left;
        }
        id
    }

    fn rightmost(&self, mut id: NodeId) -> NodeId {
        while !id.is_null() {
            let right = self.node(id).right;
            if right.is_null() {
                break;
            }
            id = right;
        }
        id
    }

    /// In-order successor, NULL past the last entry.
    fn successor(&self, id: NodeId) -> NodeId {
        let right = self.node(id).right;
        if !right.is_null() {
            return self.leftmost(right);
        }
        // Climb while we are a right child; the first ancestor reached from
        // its left side is the successor.
        let mut cur = id;
        loop {
            let parent = self.node(cur).parent;
            if parent.is_null() {
                return NodeId::NULL;
            }
            if self.node(parent).left == cur {
                return parent;
            }
            cur = parent;
        }
    }

    /// In-order predecessor, NULL before the first entry.
    fn predecessor(&self, id: NodeId) -> NodeId {
        let left = self.node(id).left;
        if !left.is_null() {
            return self.rightmost(left);
        }
        let mut cur = id;
        loop {
            let parent = self.node(cur).parent;
            if parent.is_null() {
                return NodeId::NULL;
            }
            if self.node(parent).right == cur {
                return parent;
            }
            cur = parent;
        }
    }

    /// Cursor at the first entry of the structural in-order sequence (the
    /// leftmost node), or the end cursor on an empty tree.
    ///
    /// The in-order sequence is the tree's structural walk; it is not sorted
    /// by any single axis.
    pub fn begin(&self) -> Cursor {
        Cursor(self.leftmost(self.root))
    }

    /// The end sentinel cursor.
    pub fn end(&self) -> Cursor {
        Cursor(NodeId::NULL)
    }

    /// Reads the entry a cursor addresses; `None` for the end cursor.
    pub fn entry(&self, cursor: Cursor) -> Option<(&K, &V)> {
        if cursor.0.is_null() {
            return None;
        }
        let n = self.node(cursor.0);
        Some((&n.key, &n.value))
    }

    /// Mutable access to the value a cursor addresses; `None` for the end
    /// cursor.
    pub fn value_mut_at(&mut self, cursor: Cursor) -> Option<&mut V> {
        if cursor.0.is_null() {
            return None;
        }
        Some(&mut self.node_mut(cursor.0).value)
    }

    /// Steps a cursor to its in-order successor. The successor of the last
    /// entry is the end cursor; stepping the end cursor fails with
    /// [`CursorError::PastEnd`].
    pub fn next(&self, cursor: Cursor) -> Result<Cursor, CursorError> {
        if cursor.0.is_null() {
            return Err(CursorError::PastEnd);
        }
        Ok(Cursor(self.successor(cursor.0)))
    }

    /// Steps a cursor to its in-order predecessor. Stepping the end cursor
    /// yields the last entry; stepping the first entry (or the end cursor of
    /// an empty tree) fails with [`CursorError::BeforeBegin`].
    pub fn prev(&self, cursor: Cursor) -> Result<Cursor, CursorError> {
        if cursor.0.is_null() {
            let last = self.rightmost(self.root);
            return if last.is_null() {
                Err(CursorError::BeforeBegin)
            } else {
                Ok(Cursor(last))
            };
        }
        let pred = self.predecessor(cursor.0);
        if pred.is_null() {
            Err(CursorError::BeforeBegin)
        } else {
            Ok(Cursor(pred))
        }
    }

    /// Removes the entry a cursor addresses and returns the cursor of its
    /// in-order successor (the end cursor if it was the last entry). Removing
    /// at the end cursor is a no-op returning the end cursor.
    ///
    /// Produces the same tree as [`KdTree::remove`] on the entry's key: the
    /// node's split axis is recovered by counting parent links up to the
    /// root, then the same replacement algorithm runs rooted at the node.
    pub fn remove_at(&mut self, cursor: Cursor) -> Cursor {
        let node = cursor.0;
        if node.is_null() {
            return cursor;
        }

        let succ = self.successor(node);
        let succ_key = if succ.is_null() {
            None
        } else {
            Some(self.node(succ).key.clone())
        };

        // Split axis is positional: depth mod K, depth by walking to the root.
        let mut depth = 0;
        let mut cur = self.node(node).parent;
        while !cur.is_null() {
            depth += 1;
            cur = self.node(cur).parent;
        }
        let axis = depth % K::DIMS;

        let parent = self.node(node).parent;
        let key = self.node(node).key.clone();
        let (new_sub, removed) = self.remove_rec(node, &key, axis);
        debug_assert!(removed.is_some());
        if parent.is_null() {
            self.root = new_sub;
            if !new_sub.is_null() {
                self.node_mut(new_sub).parent = NodeId::NULL;
            }
        } else if self.node(parent).left == node {
            self.attach(parent, Side::Left, new_sub);
        } else {
            self.attach(parent, Side::Right, new_sub);
        }

        // The successor may have donated its payload elsewhere during the
        // removal, so locate it again by key.
        match succ_key {
            Some(k) => Cursor(self.find_node(&k)),
            None => self.end(),
        }
    }
}

// =============================================================================
// Iteration
// =============================================================================

/// Double-ended iterator over a tree's structural in-order sequence.
pub struct Iter<'a, K, V> {
    tree: &'a KdTree<K, V>,
    front: NodeId,
    back: NodeId,
    remaining: usize,
}

impl<'a, K: KdKey, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let n = self.tree.node(self.front);
        self.remaining -= 1;
        if self.remaining > 0 {
            self.front = self.tree.successor(self.front);
        }
        Some((&n.key, &n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: KdKey, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let n = self.tree.node(self.back);
        self.remaining -= 1;
        if self.remaining > 0 {
            self.back = self.tree.predecessor(self.back);
        }
        Some((&n.key, &n.value))
    }
}

impl<'a, K: KdKey, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<K: KdKey, V> KdTree<K, V> {
    /// Iterates the structural in-order sequence front to back; supports
    /// reverse iteration via [`DoubleEndedIterator`].
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tree: self,
            front: self.leftmost(self.root),
            back: self.rightmost(self.root),
            remaining: self.count,
        }
    }
}

impl<'a, K: KdKey, V> IntoIterator for &'a KdTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Std trait impls
// =============================================================================

impl<K: KdKey, V> Default for KdTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: KdKey + fmt::Debug, V: fmt::Debug> fmt::Debug for KdTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}


#[cfg(test)]
mod proptests;
