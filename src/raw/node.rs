use core::borrow::Borrow;

use smallvec::SmallVec;

use super::handle::Handle;
use crate::Degree;

// Sized so a tree of the default degree never spills, including the transient `2t`-key overflow
// right before a split. Larger degrees fall back to the heap.
const INLINE_KEYS: usize = Degree::DEFAULT.max_keys() + 1;
const INLINE_CHILDREN: usize = Degree::DEFAULT.max_children() + 1;

pub(crate) type Keys<K> = SmallVec<[K; INLINE_KEYS]>;
pub(crate) type Children = SmallVec<[Handle; INLINE_CHILDREN]>;

/// A B-tree node. Keys live in every node; internal nodes carry `keys.len() + 1` children.
#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    keys: Keys<K>,
    // Owning edges: the arena slot of a child is freed only through its parent.
    children: Children,
    // Non-owning edge back to the node that lists this one among its children.
    parent: Option<Handle>,
}

/// Result of searching for a key in a single node.
pub(crate) enum SearchResult {
    /// Key was found at the given index.
    Found(usize),
    /// Key was not found; index is where it would be inserted, and the child to descend into.
    GoDown(usize),
}

impl<K> Node<K> {
    /// Creates a leaf holding a single key.
    pub(crate) fn leaf_with(key: K, parent: Option<Handle>) -> Self {
        let mut keys = Keys::new();
        keys.push(key);
        Self {
            keys,
            children: Children::new(),
            parent,
        }
    }

    /// Creates a root above a node that just split into `left` and `right` around `median`.
    pub(crate) fn new_root(left: Handle, median: K, right: Handle) -> Self {
        let mut keys = Keys::new();
        keys.push(median);
        let mut children = Children::new();
        children.push(left);
        children.push(right);
        Self {
            keys,
            children,
            parent: None,
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub(crate) fn keys(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    pub(crate) fn children(&self) -> &[Handle] {
        &self.children
    }

    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    /// Locates `key` among this node's keys.
    #[inline]
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.keys.binary_search_by(|k| k.borrow().cmp(key)) {
            Ok(idx) => SearchResult::Found(idx),
            Err(idx) => SearchResult::GoDown(idx),
        }
    }

    pub(crate) fn insert_key(&mut self, index: usize, key: K) {
        self.keys.insert(index, key);
    }

    pub(crate) fn remove_key(&mut self, index: usize) -> K {
        self.keys.remove(index)
    }

    pub(crate) fn replace_key(&mut self, index: usize, key: K) -> K {
        core::mem::replace(&mut self.keys[index], key)
    }

    /// Inserts `key` at `index` with `child` as its right-hand child.
    pub(crate) fn insert_child(&mut self, index: usize, key: K, child: Handle) {
        self.keys.insert(index, key);
        self.children.insert(index + 1, child);
    }

    /// Removes the key at `index` together with its right-hand child.
    pub(crate) fn remove_child(&mut self, index: usize) -> (K, Handle) {
        let key = self.keys.remove(index);
        let child = self.children.remove(index + 1);
        (key, child)
    }

    /// Prepends a key and, for internal nodes, a new first child.
    pub(crate) fn push_front(&mut self, key: K, child: Option<Handle>) {
        self.keys.insert(0, key);
        if let Some(child) = child {
            self.children.insert(0, child);
        }
    }

    /// Appends a key and, for internal nodes, a new last child.
    pub(crate) fn push_back(&mut self, key: K, child: Option<Handle>) {
        self.keys.push(key);
        if let Some(child) = child {
            self.children.push(child);
        }
    }

    /// Removes the first key and, for internal nodes, the first child.
    pub(crate) fn pop_front(&mut self) -> (K, Option<Handle>) {
        let key = self.keys.remove(0);
        let child = if self.is_leaf() {
            None
        } else {
            Some(self.children.remove(0))
        };
        (key, child)
    }

    /// Removes the last key and, for internal nodes, the last child.
    pub(crate) fn pop_back(&mut self) -> (K, Option<Handle>) {
        let key = self.keys.remove(self.keys.len() - 1);
        let child = self.children.pop();
        (key, child)
    }

    /// Splits an overflowing node of `2t` keys at index `t`.
    ///
    /// `self` keeps keys `[0, t)` and children `[0, t]`; the returned sibling holds keys
    /// `(t, 2t)` and children `(t, 2t]`. The sibling's children still name `self` as their
    /// parent and must be reparented by the caller.
    pub(crate) fn split(&mut self, degree: Degree) -> (K, Node<K>) {
        let t = degree.get();
        debug_assert_eq!(self.keys.len(), degree.max_keys() + 1, "split of a node that is not overflowing");

        let right_keys: Keys<K> = self.keys.drain(t + 1..).collect();
        let right_children: Children = if self.is_leaf() {
            Children::new()
        } else {
            self.children.drain(t + 1..).collect()
        };
        let median = self.keys.remove(t);

        let right = Node {
            keys: right_keys,
            children: right_children,
            parent: self.parent,
        };
        (median, right)
    }

    /// Absorbs `separator` followed by the contents of the right-hand sibling `right`.
    ///
    /// Returns the children moved over from `right`, which the caller must reparent.
    pub(crate) fn merge_with_right(&mut self, separator: K, right: Node<K>) -> Children {
        debug_assert_eq!(self.is_leaf(), right.is_leaf(), "merge of nodes at different depths");
        self.keys.push(separator);
        self.keys.extend(right.keys);
        let moved = right.children;
        self.children.extend(moved.iter().copied());
        moved
    }
}
