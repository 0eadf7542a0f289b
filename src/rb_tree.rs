//! RbTree: red-black tree engine behind `TreeMap` and `TreeSet`.
//!
//! Nodes live in a `SlotMap` arena that owns them all. Structure is
//! expressed through `left`/`right` child keys from the root down; the
//! `parent` key is a back link used by the fixup and the iterator and never
//! decides what gets dropped. Rotations only rewrite keys, so a `NodeKey`
//! stays valid for the life of its node.
//!
//! Invariants after every insertion:
//! - the root is black;
//! - a red node has no red child;
//! - every root-to-nil path crosses the same number of black nodes;
//! - in-order traversal is strictly increasing under `Ord`;
//! - `max` names the rightmost node.
//!
//! `K: Ord` runs only during the descent that precedes an insertion; the
//! fixup decides shapes from child links alone.

use core::borrow::Borrow;
use core::cmp::Ordering;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub(crate) struct NodeKey;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn flip(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Fixup step taken by `balance_after_insert`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Fixup {
    RootRecolor,
    NoGrandparent,
    RedUncle,
    Straight,
    ZigZag,
}

#[derive(Debug)]
struct TreeNode<K, V> {
    key: K,
    value: V,
    color: Color,
    left: Option<NodeKey>,
    right: Option<NodeKey>,
    parent: Option<NodeKey>,
}

impl<K: Clone, V: Clone> TreeNode<K, V> {
    fn detached_copy(&self, parent: Option<NodeKey>) -> Self {
        TreeNode {
            key: self.key.clone(),
            value: self.value.clone(),
            color: self.color,
            left: None,
            right: None,
            parent,
        }
    }
}

enum Search {
    Found(NodeKey),
    /// Where a missing key would be attached; `None` for an empty tree.
    Vacant(Option<(NodeKey, Side)>),
}

pub(crate) struct RbTree<K, V> {
    nodes: SlotMap<NodeKey, TreeNode<K, V>>,
    root: Option<NodeKey>,
    max: Option<NodeKey>,
}

impl<K, V> RbTree<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            max: None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Tear down every node.
    pub(crate) fn clear(&mut self) {
        let dropped = self.nodes.len();
        self.root = None;
        self.max = None;
        self.nodes.clear();
        tracing::debug!(dropped, "rb tree cleared");
    }

    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        let n = self.leftmost(self.root?);
        self.nodes.get(n).map(|node| (&node.key, &node.value))
    }

    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        self.nodes.get(self.max?).map(|node| (&node.key, &node.value))
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            cursor: Cursor::new(self),
            remaining: self.nodes.len(),
        }
    }

    pub(crate) fn into_entries(self) -> IntoIter<K, V> {
        let mut cursor = Cursor::new(&self);
        let order: Vec<NodeKey> = core::iter::from_fn(|| cursor.advance(&self.nodes)).collect();
        IntoIter {
            nodes: self.nodes,
            order: order.into_iter(),
        }
    }

    fn child(&self, n: NodeKey, side: Side) -> Option<NodeKey> {
        match side {
            Side::Left => self.nodes[n].left,
            Side::Right => self.nodes[n].right,
        }
    }

    fn set_child(&mut self, n: NodeKey, side: Side, child: Option<NodeKey>) {
        match side {
            Side::Left => self.nodes[n].left = child,
            Side::Right => self.nodes[n].right = child,
        }
    }

    /// Which child of `parent` the node `child` is.
    fn side_of(&self, child: NodeKey, parent: NodeKey) -> Side {
        if self.nodes[parent].left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    fn is_red(&self, n: Option<NodeKey>) -> bool {
        n.map(|n| self.nodes[n].color == Color::Red).unwrap_or(false)
    }

    fn leftmost(&self, mut n: NodeKey) -> NodeKey {
        while let Some(l) = self.nodes[n].left {
            n = l;
        }
        n
    }

    fn rightmost(&self, mut n: NodeKey) -> NodeKey {
        while let Some(r) = self.nodes[n].right {
            n = r;
        }
        n
    }

    /// Rotate `x` down toward `dir`; its child on the other side takes its
    /// place. Rewrites the links of `x`, that child, the subtree crossing
    /// between them and `x`'s former parent (or the root).
    fn rotate(&mut self, x: NodeKey, dir: Side) {
        let Some(y) = self.child(x, dir.flip()) else {
            return;
        };
        let crossing = self.child(y, dir);
        self.set_child(x, dir.flip(), crossing);
        if let Some(c) = crossing {
            self.nodes[c].parent = Some(x);
        }

        let above = self.nodes[x].parent;
        self.nodes[y].parent = above;
        match above {
            None => self.root = Some(y),
            Some(p) => {
                let side = self.side_of(x, p);
                self.set_child(p, side, Some(y));
            }
        }

        self.set_child(y, dir, Some(x));
        self.nodes[x].parent = Some(y);
    }

    /// Restore the red-black invariants after `node` was attached red.
    fn balance_after_insert(&mut self, mut node: NodeKey) {
        loop {
            if self.root == Some(node) {
                self.nodes[node].color = Color::Black;
                tracing::trace!(case = ?Fixup::RootRecolor, "rb fixup");
                return;
            }
            let Some(parent) = self.nodes[node].parent else {
                return;
            };
            if self.nodes[parent].color == Color::Black {
                return;
            }
            let Some(grand) = self.nodes[parent].parent else {
                tracing::trace!(case = ?Fixup::NoGrandparent, "rb fixup");
                return;
            };

            let parent_side = self.side_of(parent, grand);
            let uncle = self.child(grand, parent_side.flip());
            if let Some(u) = uncle.filter(|&u| self.nodes[u].color == Color::Red) {
                self.nodes[parent].color = Color::Black;
                self.nodes[u].color = Color::Black;
                self.nodes[grand].color = Color::Red;
                tracing::trace!(case = ?Fixup::RedUncle, "rb fixup");
                node = grand;
                continue;
            }

            if self.side_of(node, parent) == parent_side {
                self.rotate(grand, parent_side.flip());
                self.nodes[grand].color = Color::Red;
                self.nodes[parent].color = Color::Black;
                tracing::trace!(case = ?Fixup::Straight, "rb fixup");
            } else {
                self.rotate(parent, parent_side);
                self.rotate(grand, parent_side.flip());
                self.nodes[grand].color = Color::Red;
                self.nodes[node].color = Color::Black;
                tracing::trace!(case = ?Fixup::ZigZag, "rb fixup");
            }
            return;
        }
    }

    /// Hang a new red leaf at `at`, keep `max` current and rebalance.
    fn attach(&mut self, at: Option<(NodeKey, Side)>, key: K, value: V) -> NodeKey {
        let n = self.nodes.insert(TreeNode {
            key,
            value,
            color: Color::Red,
            left: None,
            right: None,
            parent: at.map(|(p, _)| p),
        });
        match at {
            None => {
                self.root = Some(n);
                self.max = Some(n);
            }
            Some((p, side)) => {
                self.set_child(p, side, Some(n));
                // Only a right child of the old maximum can exceed it.
                if side == Side::Right && self.max == Some(p) {
                    self.max = Some(n);
                }
            }
        }
        let parent = self.nodes[n].parent;
        if parent.is_none() || self.is_red(parent) {
            self.balance_after_insert(n);
        }
        n
    }
}

impl<K: Ord, V> RbTree<K, V> {
    fn search<Q>(&self, q: &Q) -> Search
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(mut cur) = self.root else {
            return Search::Vacant(None);
        };
        loop {
            let node = &self.nodes[cur];
            let (side, next) = match q.cmp(node.key.borrow()) {
                Ordering::Less => (Side::Left, node.left),
                Ordering::Greater => (Side::Right, node.right),
                Ordering::Equal => return Search::Found(cur),
            };
            match next {
                Some(n) => cur = n,
                None => return Search::Vacant(Some((cur, side))),
            }
        }
    }

    fn find<Q>(&self, q: &Q) -> Option<NodeKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.search(q) {
            Search::Found(n) => Some(n),
            Search::Vacant(_) => None,
        }
    }

    /// Insert or overwrite. Overwriting never restructures the tree.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.search(&key) {
            Search::Found(n) => Some(core::mem::replace(&mut self.nodes[n].value, value)),
            Search::Vacant(at) => {
                self.attach(at, key, value);
                None
            }
        }
    }

    /// Insert only when absent; an existing entry is left untouched.
    pub(crate) fn insert_new(&mut self, key: K, value: V) -> bool {
        match self.search(&key) {
            Search::Found(_) => false,
            Search::Vacant(at) => {
                self.attach(at, key, value);
                true
            }
        }
    }

    /// Insert-on-miss access.
    pub(crate) fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let n = match self.search(&key) {
            Search::Found(n) => n,
            Search::Vacant(at) => {
                let value = default();
                self.attach(at, key, value)
            }
        };
        &mut self.nodes[n].value
    }

    pub(crate) fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let n = self.find(q)?;
        self.nodes.get(n).map(|node| (&node.key, &node.value))
    }

    pub(crate) fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let n = self.find(q)?;
        self.nodes.get_mut(n).map(|node| &mut node.value)
    }

    pub(crate) fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.find(q).is_some()
    }
}

/// Deep copy: pre-order walk into a fresh arena, then `max` is found again
/// along the right spine.
impl<K: Clone, V: Clone> Clone for RbTree<K, V> {
    fn clone(&self) -> Self {
        let mut out = RbTree::new();
        let Some(src_root) = self.root else {
            return out;
        };
        let root = out.nodes.insert(self.nodes[src_root].detached_copy(None));
        out.root = Some(root);

        let mut stack = vec![(src_root, root)];
        while let Some((src, dst)) = stack.pop() {
            // Right is pushed first so the left subtree is walked first.
            for side in [Side::Right, Side::Left] {
                if let Some(src_child) = self.child(src, side) {
                    let copy = self.nodes[src_child].detached_copy(Some(dst));
                    let dst_child = out.nodes.insert(copy);
                    out.set_child(dst, side, Some(dst_child));
                    stack.push((src_child, dst_child));
                }
            }
        }
        out.max = Some(out.rightmost(root));
        out
    }
}

/// In-order walk over parent links.
///
/// `history` holds the ancestors whose right subtree contains the cursor,
/// nearest last. Climbing out of a subtree, a parent on top of the stack
/// has already been visited and is skipped; any other parent is next.
/// The walk ends at the sentinel one past `max`: its (always absent) right
/// child.
#[derive(Clone)]
struct Cursor {
    cursor: Option<NodeKey>,
    history: Vec<NodeKey>,
    max: Option<NodeKey>,
}

impl Cursor {
    fn new<K, V>(tree: &RbTree<K, V>) -> Self {
        Self {
            cursor: tree.root.map(|r| tree.leftmost(r)),
            history: Vec::new(),
            max: tree.max,
        }
    }

    fn advance<K, V>(&mut self, nodes: &SlotMap<NodeKey, TreeNode<K, V>>) -> Option<NodeKey> {
        let cur = self.cursor?;
        self.cursor = self.successor(cur, nodes);
        Some(cur)
    }

    fn successor<K, V>(
        &mut self,
        cur: NodeKey,
        nodes: &SlotMap<NodeKey, TreeNode<K, V>>,
    ) -> Option<NodeKey> {
        if self.max == Some(cur) {
            return nodes[cur].right;
        }
        if let Some(mut next) = nodes[cur].right {
            self.history.push(cur);
            while let Some(l) = nodes[next].left {
                next = l;
            }
            return Some(next);
        }
        let mut child = cur;
        while let Some(parent) = nodes[child].parent {
            if self.history.last() == Some(&parent) {
                self.history.pop();
                child = parent;
            } else {
                return Some(parent);
            }
        }
        None
    }
}

/// Entries in ascending key order.
pub struct Iter<'a, K, V> {
    nodes: &'a SlotMap<NodeKey, TreeNode<K, V>>,
    cursor: Cursor,
    remaining: usize,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            cursor: self.cursor.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let n = self.cursor.advance(nodes)?;
        self.remaining -= 1;
        nodes.get(n).map(|node| (&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// Owning iterator in ascending key order.
pub struct IntoIter<K, V> {
    nodes: SlotMap<NodeKey, TreeNode<K, V>>,
    order: std::vec::IntoIter<NodeKey>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = &mut self.nodes;
        self.order
            .find_map(|n| nodes.remove(n).map(|node| (node.key, node.value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

#[cfg(test)]
impl<K: Ord, V> RbTree<K, V> {
    /// Check every structural invariant; returns the black height (nil
    /// leaves count as one).
    pub(crate) fn assert_invariants(&self) -> usize {
        let Some(root) = self.root else {
            assert!(self.nodes.is_empty(), "nodes without a root");
            assert!(self.max.is_none(), "max without a root");
            return 1;
        };
        assert_eq!(self.nodes[root].color, Color::Black, "root must be black");
        assert!(self.nodes[root].parent.is_none(), "root has a parent");
        assert_eq!(self.max, Some(self.rightmost(root)), "cached max drifted");
        let (height, count) = self.check_subtree(root, None, None);
        assert_eq!(count, self.nodes.len(), "unreachable nodes in arena");
        height
    }

    fn check_subtree(&self, n: NodeKey, lo: Option<&K>, hi: Option<&K>) -> (usize, usize) {
        let node = &self.nodes[n];
        if let Some(lo) = lo {
            assert!(node.key > *lo, "BST order violated");
        }
        if let Some(hi) = hi {
            assert!(node.key < *hi, "BST order violated");
        }
        let mut heights = [1usize; 2];
        let mut count = 1;
        for (i, (child, lo, hi)) in [
            (node.left, lo, Some(&node.key)),
            (node.right, Some(&node.key), hi),
        ]
        .into_iter()
        .enumerate()
        {
            if let Some(c) = child {
                assert_eq!(self.nodes[c].parent, Some(n), "broken parent link");
                if node.color == Color::Red {
                    assert_eq!(self.nodes[c].color, Color::Black, "red node with red child");
                }
                let (h, cnt) = self.check_subtree(c, lo, hi);
                heights[i] = h;
                count += cnt;
            }
        }
        assert_eq!(heights[0], heights[1], "black height mismatch");
        let own = usize::from(node.color == Color::Black);
        (heights[0] + own, count)
    }

    pub(crate) fn root_key(&self) -> Option<&K> {
        self.root.map(|r| &self.nodes[r].key)
    }

    pub(crate) fn color_of<Q>(&self, q: &Q) -> Option<Color>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.find(q).map(|n| self.nodes[n].color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(keys: &[i32]) -> RbTree<i32, i32> {
        let mut t = RbTree::new();
        for &k in keys {
            t.insert(k, k * 10);
            t.assert_invariants();
        }
        t
    }

    fn keys(t: &RbTree<i32, i32>) -> Vec<i32> {
        t.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn first_insert_becomes_black_root_and_max() {
        let t = tree_of(&[5]);
        assert_eq!(t.root_key(), Some(&5));
        assert_eq!(t.color_of(&5), Some(Color::Black));
        assert_eq!(t.last_key_value(), Some((&5, &50)));
    }

    /// Ascending keys: right-right line, single left rotation at the root.
    #[test]
    fn straight_line_rotates_once() {
        let t = tree_of(&[1, 2, 3]);
        assert_eq!(t.root_key(), Some(&2));
        assert_eq!(t.color_of(&2), Some(Color::Black));
        assert_eq!(t.color_of(&1), Some(Color::Red));
        assert_eq!(t.color_of(&3), Some(Color::Red));
        assert_eq!(keys(&t), vec![1, 2, 3]);
    }

    /// Left-right zig-zag: two rotations, the new node becomes the root.
    #[test]
    fn zig_zag_rotates_twice() {
        let t = tree_of(&[3, 1, 2]);
        assert_eq!(t.root_key(), Some(&2));
        assert_eq!(t.color_of(&2), Some(Color::Black));
        assert_eq!(t.color_of(&1), Some(Color::Red));
        assert_eq!(t.color_of(&3), Some(Color::Red));

        let t = tree_of(&[1, 3, 2]);
        assert_eq!(t.root_key(), Some(&2));
    }

    /// Red uncle: recolor only, the grandparent (root) turns back black.
    #[test]
    fn red_uncle_recolors() {
        let t = tree_of(&[2, 1, 3, 4]);
        assert_eq!(t.root_key(), Some(&2));
        assert_eq!(t.color_of(&1), Some(Color::Black));
        assert_eq!(t.color_of(&3), Some(Color::Black));
        assert_eq!(t.color_of(&4), Some(Color::Red));
        assert_eq!(t.assert_invariants(), 3);
    }

    #[test]
    fn overwrite_keeps_shape() {
        let mut t = tree_of(&[2, 1, 3]);
        assert_eq!(t.insert(1, 99), Some(10));
        assert_eq!(t.len(), 3);
        assert_eq!(t.root_key(), Some(&2));
        assert_eq!(t.get_key_value(&1), Some((&1, &99)));
        assert!(!t.insert_new(1, 7));
        assert_eq!(t.get_key_value(&1), Some((&1, &99)));
    }

    #[test]
    fn max_tracks_right_spine_only() {
        let mut t = tree_of(&[50, 30, 80]);
        assert_eq!(t.last_key_value().map(|(k, _)| *k), Some(80));
        t.insert(70, 0);
        assert_eq!(t.last_key_value().map(|(k, _)| *k), Some(80));
        t.insert(90, 0);
        assert_eq!(t.last_key_value().map(|(k, _)| *k), Some(90));
        *t.get_or_insert_with(100, || 1) += 1;
        assert_eq!(t.last_key_value(), Some((&100, &2)));
        assert_eq!(t.first_key_value().map(|(k, _)| *k), Some(30));
        t.assert_invariants();
    }

    /// Insert-on-miss rebalances like `insert`.
    #[test]
    fn get_or_insert_with_keeps_invariants() {
        let mut t: RbTree<i32, i32> = RbTree::new();
        for k in 0..64 {
            *t.get_or_insert_with(k, Default::default) += k;
            t.assert_invariants();
        }
        assert_eq!(t.len(), 64);
        assert_eq!(t.get_key_value(&63), Some((&63, &63)));
    }

    #[test]
    fn iteration_is_in_order_with_history_stack() {
        let input = [200, 150, 250, 120, 160, 230, 280, 270, 90, 110, 100];
        let t = tree_of(&input);
        let mut sorted = input.to_vec();
        sorted.sort();
        assert_eq!(keys(&t), sorted);
        // A cloned iterator resumes from the same position.
        let mut it = t.iter();
        it.next();
        it.next();
        let rest: Vec<_> = it.clone().map(|(k, _)| *k).collect();
        assert_eq!(rest, sorted[2..].to_vec());
    }

    #[test]
    fn empty_tree_iterates_nothing() {
        let t: RbTree<i32, i32> = RbTree::new();
        assert_eq!(t.iter().next(), None);
        assert_eq!(t.first_key_value(), None);
        assert_eq!(t.last_key_value(), None);
        assert_eq!(t.assert_invariants(), 1);
    }

    #[test]
    fn clone_rebuilds_links_and_max() {
        let src = tree_of(&[8, 4, 12, 2, 6, 10, 14, 1, 3]);
        let mut copy = src.clone();
        copy.assert_invariants();
        assert_eq!(keys(&copy), keys(&src));
        assert_eq!(copy.root_key(), src.root_key());
        assert_eq!(copy.last_key_value(), Some((&14, &140)));

        copy.insert(20, 0);
        *copy.get_mut(&8).unwrap() = -1;
        assert_eq!(src.len(), 9);
        assert!(!src.contains_key(&20));
        assert_eq!(src.get_key_value(&8), Some((&8, &80)));
        src.assert_invariants();
    }

    #[test]
    fn clear_then_reuse() {
        let mut t = tree_of(&[1, 2, 3, 4, 5]);
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.assert_invariants(), 1);
        t.insert(9, 9);
        assert_eq!(keys(&t), vec![9]);
        t.assert_invariants();
    }

    #[test]
    fn into_entries_consumes_in_order() {
        let t = tree_of(&[3, 1, 2]);
        let pairs: Vec<_> = t.into_entries().collect();
        assert_eq!(pairs, vec![(1, 10), (2, 20), (3, 30)]);
    }
}
