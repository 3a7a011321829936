use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;

use log::trace;
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Children, Node, SearchResult};
use crate::Degree;
use crate::error::{Error, Result};

/// The core B-tree implementation backing `BTree`.
#[derive(Clone)]
pub(crate) struct RawBTree<K> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    degree: Degree,
    /// Total number of keys in the tree.
    len: usize,
}

/// Path element for tracking traversal during mutations.
struct PathElement {
    /// Handle to the node at this level.
    node: Handle,
    /// Index of the child we descended into.
    child_index: usize,
}

/// A path through the tree, root first. The last element is the parent of the current node.
type Path = SmallVec<[PathElement; 16]>;

impl<K> RawBTree<K> {
    /// Creates a new, empty tree.
    pub(crate) const fn new(degree: Degree) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            degree,
            len: 0,
        }
    }

    pub(crate) const fn degree(&self) -> Degree {
        self.degree
    }

    /// Returns the number of keys in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels; every leaf sits at this depth.
    pub(crate) fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            height += 1;
            let node = self.nodes.get(handle);
            current = node.children().first().copied();
        }
        height
    }

    /// Drops every node.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Returns the smallest key.
    pub(crate) fn first(&self) -> Option<&K> {
        let mut node = self.nodes.get(self.root?);
        while let Some(&child) = node.children().first() {
            node = self.nodes.get(child);
        }
        node.keys().first()
    }

    /// Returns the largest key.
    pub(crate) fn last(&self) -> Option<&K> {
        let mut node = self.nodes.get(self.root?);
        while let Some(&child) = node.children().last() {
            node = self.nodes.get(child);
        }
        node.keys().last()
    }

    /// Collects every key in ascending order.
    pub(crate) fn traverse(&self) -> Vec<&K> {
        let mut out = Vec::with_capacity(self.len);
        if let Some(root) = self.root {
            self.traverse_node(root, &mut out);
        }
        out
    }

    fn traverse_node<'a>(&'a self, handle: Handle, out: &mut Vec<&'a K>) {
        let node = self.nodes.get(handle);
        if node.is_leaf() {
            out.extend(node.keys().iter());
            return;
        }
        for (i, key) in node.keys().iter().enumerate() {
            self.traverse_node(node.child(i), out);
            out.push(key);
        }
        self.traverse_node(node.child(node.key_count()), out);
    }

    /// Points the parent link of every handle in `children` at `parent`.
    fn reparent(&mut self, children: &[Handle], parent: Handle) {
        for &child in children {
            self.nodes.get_mut(child).set_parent(Some(parent));
        }
    }

    /// Walks `children[0]` down to a leaf, recording the path.
    fn descend_leftmost(&self, start: Handle, path: &mut Path) -> Handle {
        let mut current = start;
        loop {
            let node = self.nodes.get(current);
            if node.is_leaf() {
                return current;
            }
            path.push(PathElement {
                node: current,
                child_index: 0,
            });
            current = node.child(0);
        }
    }
}

impl<K: Ord> RawBTree<K> {
    /// Returns the stored key equal to `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root?;

        loop {
            let node = self.nodes.get(current);
            match node.search(key) {
                SearchResult::Found(idx) => return Some(&node.keys()[idx]),
                SearchResult::GoDown(_) if node.is_leaf() => return None,
                SearchResult::GoDown(idx) => current = node.child(idx),
            }
        }
    }

    /// Inserts `key`. Returns `false`, leaving the tree untouched, if it is already present.
    pub(crate) fn insert(&mut self, key: K) -> bool {
        let Some(root) = self.root else {
            let leaf = self.nodes.alloc(Node::leaf_with(key, None));
            trace!("created root leaf {leaf:?}");
            self.root = Some(leaf);
            self.len = 1;
            return true;
        };

        // Build path from root to leaf
        let mut path: Path = SmallVec::new();
        let mut current = root;

        let index = loop {
            let node = self.nodes.get(current);
            match node.search(&key) {
                SearchResult::Found(_) => return false,
                SearchResult::GoDown(idx) if node.is_leaf() => break idx,
                SearchResult::GoDown(idx) => {
                    path.push(PathElement {
                        node: current,
                        child_index: idx,
                    });
                    current = node.child(idx);
                }
            }
        };

        self.nodes.get_mut(current).insert_key(index, key);
        self.len += 1;
        self.split_and_propagate(current, &mut path);
        true
    }

    /// Splits `current` while it holds `2t` keys, promoting medians up the path.
    fn split_and_propagate(&mut self, mut current: Handle, path: &mut Path) {
        while self.nodes.get(current).key_count() > self.degree.max_keys() {
            let (median, right) = self.nodes.get_mut(current).split(self.degree);
            let moved = Children::from_slice(right.children());
            let right_handle = self.nodes.alloc(right);
            self.reparent(&moved, right_handle);

            if let Some(PathElement { node: parent, child_index }) = path.pop() {
                debug_assert_eq!(self.nodes.get(current).parent(), Some(parent));
                trace!("split {current:?} into {right_handle:?} under {parent:?}");
                self.nodes.get_mut(parent).insert_child(child_index, median, right_handle);
                current = parent;
            } else {
                // The split reached the root: grow the tree by one level.
                let new_root = self.nodes.alloc(Node::new_root(current, median, right_handle));
                trace!("split root {current:?} into {right_handle:?} under new root {new_root:?}");
                self.reparent(&[current, right_handle], new_root);
                self.root = Some(new_root);
                return;
            }
        }
    }

    /// Removes `key` and returns it, or `None` if it is absent (the tree is then unchanged).
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let root = self.root?;
        let mut path: Path = SmallVec::new();
        let mut current = root;

        loop {
            let node = self.nodes.get(current);
            match node.search(key) {
                SearchResult::Found(idx) if node.is_leaf() => {
                    let removed = self.nodes.get_mut(current).remove_key(idx);
                    self.len -= 1;
                    self.rebalance(current, &mut path);
                    return Some(removed);
                }
                SearchResult::Found(idx) => {
                    // Swap in the successor: the minimum of the subtree right of the key.
                    let right = node.child(idx + 1);
                    path.push(PathElement {
                        node: current,
                        child_index: idx + 1,
                    });
                    let leaf = self.descend_leftmost(right, &mut path);
                    let successor = self.nodes.get_mut(leaf).remove_key(0);
                    let removed = self.nodes.get_mut(current).replace_key(idx, successor);
                    self.len -= 1;
                    self.rebalance(leaf, &mut path);
                    return Some(removed);
                }
                SearchResult::GoDown(_) if node.is_leaf() => return None,
                SearchResult::GoDown(idx) => {
                    path.push(PathElement {
                        node: current,
                        child_index: idx,
                    });
                    current = node.child(idx);
                }
            }
        }
    }

    /// Restores the occupancy bound on `current` and, after merges, on its ancestors.
    ///
    /// The sibling is always the left one unless `current` is the first child. Separators are
    /// read only through the parent recorded in `path`.
    fn rebalance(&mut self, mut current: Handle, path: &mut Path) {
        let min_keys = self.degree.min_keys();

        while self.nodes.get(current).key_count() < min_keys {
            let Some(PathElement { node: parent, child_index }) = path.pop() else {
                self.collapse_root(current);
                return;
            };
            debug_assert_eq!(self.nodes.get(current).parent(), Some(parent));

            let parent_node = self.nodes.get(parent);
            if child_index > 0 {
                let left = parent_node.child(child_index - 1);
                if self.nodes.get(left).key_count() > min_keys {
                    self.borrow_from_left(current, left, parent, child_index);
                    return;
                }
                self.merge(left, current, parent, child_index - 1);
            } else {
                let right = parent_node.child(1);
                if self.nodes.get(right).key_count() > min_keys {
                    self.borrow_from_right(current, right, parent, child_index);
                    return;
                }
                self.merge(current, right, parent, child_index);
            }

            current = parent;
        }
    }

    /// Rotates the left sibling's last key up and the separator down into `node`.
    fn borrow_from_left(&mut self, node: Handle, left: Handle, parent: Handle, child_index: usize) {
        let (key, child) = self.nodes.get_mut(left).pop_back();
        let separator = self.nodes.get_mut(parent).replace_key(child_index - 1, key);
        self.nodes.get_mut(node).push_front(separator, child);
        if let Some(child) = child {
            self.reparent(&[child], node);
        }
        trace!("borrowed from left sibling {left:?} into {node:?}");
    }

    /// Rotates the right sibling's first key up and the separator down into `node`.
    fn borrow_from_right(&mut self, node: Handle, right: Handle, parent: Handle, child_index: usize) {
        let (key, child) = self.nodes.get_mut(right).pop_front();
        let separator = self.nodes.get_mut(parent).replace_key(child_index, key);
        self.nodes.get_mut(node).push_back(separator, child);
        if let Some(child) = child {
            self.reparent(&[child], node);
        }
        trace!("borrowed from right sibling {right:?} into {node:?}");
    }

    /// Folds `right` and the separator at `separator_index` into `left`, releasing `right`.
    fn merge(&mut self, left: Handle, right: Handle, parent: Handle, separator_index: usize) {
        let (separator, removed) = self.nodes.get_mut(parent).remove_child(separator_index);
        debug_assert_eq!(removed, right, "merge removed the wrong child slot");

        let right_node = self.nodes.take(right);
        let moved = self.nodes.get_mut(left).merge_with_right(separator, right_node);
        self.reparent(&moved, left);
        debug_assert!(self.nodes.get(left).key_count() <= self.degree.max_keys());
        trace!("merged {right:?} into {left:?}");
    }

    /// Handles an under-occupied root: an empty leaf root empties the tree, an empty internal
    /// root hands the root role to its only child. A root with at least one key is left as is.
    fn collapse_root(&mut self, root: Handle) {
        let node = self.nodes.get(root);
        if node.key_count() > 0 {
            return;
        }

        if node.is_leaf() {
            debug_assert_eq!(self.len, 0);
            self.nodes.free(root);
            self.root = None;
            trace!("removed last key, tree is empty");
        } else {
            let child = node.child(0);
            self.nodes.free(root);
            self.nodes.get_mut(child).set_parent(None);
            self.root = Some(child);
            trace!("collapsed root {root:?}, {child:?} is the new root");
        }
    }

    /// Checks every structural invariant and reports all violations at once.
    pub(crate) fn check_invariants(&self) -> Result<()> {
        let mut checker = Checker {
            tree: self,
            leaf_depth: None,
            reachable: 0,
            keys: 0,
            errors: Vec::new(),
        };

        match self.root {
            Some(root) => checker.visit(root, None, 0, None, None),
            None if self.len != 0 => {
                checker.errors.push(format!("empty tree reports len {}", self.len));
            }
            None => {}
        }

        if checker.keys != self.len {
            checker.errors.push(format!("len mismatch: self.len={}, actual count={}", self.len, checker.keys));
        }
        if checker.reachable != self.nodes.len() {
            checker.errors.push(format!(
                "arena holds {} nodes but {} are reachable from the root",
                self.nodes.len(),
                checker.reachable
            ));
        }

        if checker.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::InvariantViolation {
                report: checker.errors.join("\n"),
            })
        }
    }
}

/// Recursive validator state for [`RawBTree::check_invariants`].
struct Checker<'a, K> {
    tree: &'a RawBTree<K>,
    leaf_depth: Option<usize>,
    reachable: usize,
    keys: usize,
    errors: Vec<String>,
}

impl<'a, K: Ord> Checker<'a, K> {
    /// Validates the subtree at `handle`, whose keys must lie strictly between `lower` and `upper`.
    fn visit(&mut self, handle: Handle, parent: Option<Handle>, depth: usize, lower: Option<&'a K>, upper: Option<&'a K>) {
        let tree = self.tree;
        let node = tree.nodes.get(handle);
        let degree = tree.degree;
        let count = node.key_count();
        self.reachable += 1;
        self.keys += count;

        if node.parent() != parent {
            self.errors.push(format!(
                "Parent mismatch at handle {handle:?}: expected {parent:?}, got {:?}",
                node.parent()
            ));
        }

        let min_keys = if parent.is_none() { 1 } else { degree.min_keys() };
        if count < min_keys || count > degree.max_keys() {
            self.errors.push(format!(
                "Occupancy out of bounds at handle {handle:?}: {count} keys, allowed [{min_keys}, {}]",
                degree.max_keys()
            ));
        }

        let keys = node.keys();
        for i in 1..count {
            if keys[i - 1] >= keys[i] {
                self.errors.push(format!("Keys not sorted at handle {handle:?}, indices {} and {i}", i - 1));
            }
        }
        if let (Some(lower), Some(first)) = (lower, keys.first())
            && first <= lower
        {
            self.errors.push(format!("First key at handle {handle:?} is not above its separator"));
        }
        if let (Some(upper), Some(last)) = (upper, keys.last())
            && last >= upper
        {
            self.errors.push(format!("Last key at handle {handle:?} is not below its separator"));
        }

        if node.is_leaf() {
            match self.leaf_depth {
                None => self.leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    self.errors.push(format!(
                        "Leaf depth mismatch: expected {expected}, got {depth} at handle {handle:?}"
                    ));
                }
                Some(_) => {}
            }
            return;
        }

        let children = node.children();
        if children.len() != count + 1 {
            self.errors.push(format!(
                "Internal node {handle:?} has {} children for {count} keys",
                children.len()
            ));
            return;
        }

        for (i, &child) in children.iter().enumerate() {
            let child_lower = if i == 0 { lower } else { Some(&keys[i - 1]) };
            let child_upper = if i == count { upper } else { Some(&keys[i]) };
            self.visit(child, Some(handle), depth + 1, child_lower, child_upper);
        }
    }
}
