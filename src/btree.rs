use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;

use log::debug;

use crate::Degree;
use crate::error::Result;
use crate::raw::RawBTree;

/// An ordered set of keys stored in a classical B-tree of minimum degree `t`.
///
/// Keys live in every node, not only in leaves. Every node other than the root holds between
/// `t - 1` and `2t - 1` keys, and all leaves sit at the same depth, so search, insertion and
/// removal visit `O(log_t n)` nodes.
///
/// A key that is already present is never stored twice: [`insert`](BTree::insert) of a present key
/// leaves the tree unchanged.
///
/// It is a logic error for a key to be modified in such a way that its ordering relative to any
/// other key, as determined by the [`Ord`] trait, changes while it is in the tree. The behavior
/// resulting from such a logic error is not specified, but will not result in undefined behavior.
///
/// The tree is not synchronized. Callers sharing one tree between threads must wrap it in their
/// own lock.
///
/// # Examples
///
/// ```
/// use degree_btree::BTree;
///
/// let mut tree = BTree::new(2)?;
/// for key in [10, 20, 5, 6, 12, 30, 7, 17] {
///     tree.insert(key);
/// }
///
/// assert_eq!(tree.search(&6), Some(&6));
/// assert_eq!(tree.search(&99), None);
/// assert_eq!(tree.traverse(), [&5, &6, &7, &10, &12, &17, &20, &30]);
///
/// assert!(tree.erase(&6));
/// assert!(!tree.erase(&6));
/// # Ok::<(), degree_btree::Error>(())
/// ```
#[derive(Clone)]
pub struct BTree<K> {
    raw: RawBTree<K>,
}

impl<K> BTree<K> {
    /// Makes a new, empty tree of minimum degree `degree`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDegree`](crate::Error::InvalidDegree) if `degree < 2`, or if
    /// `degree` is so large that a node's `2 * degree` bound would overflow.
    ///
    /// # Examples
    ///
    /// ```
    /// use degree_btree::{BTree, Error};
    ///
    /// let tree: BTree<u32> = BTree::new(4)?;
    /// assert!(tree.is_empty());
    ///
    /// assert!(matches!(BTree::<u32>::new(1), Err(Error::InvalidDegree { degree: 1 })));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn new(degree: usize) -> Result<Self> {
        Ok(Self::with_degree(Degree::new(degree)?))
    }

    /// Makes a new, empty tree from an already validated [`Degree`].
    #[must_use]
    pub fn with_degree(degree: Degree) -> Self {
        debug!("creating B-tree with minimum degree {degree}");
        BTree {
            raw: RawBTree::new(degree),
        }
    }

    /// Returns the minimum degree of the tree.
    #[must_use]
    pub fn degree(&self) -> Degree {
        self.raw.degree()
    }

    /// Returns the number of keys in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use degree_btree::BTree;
    ///
    /// let mut tree = BTree::new(2)?;
    /// assert_eq!(tree.len(), 0);
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 1);
    /// # Ok::<(), degree_btree::Error>(())
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of levels in the tree: 0 when empty, 1 for a lone leaf root.
    ///
    /// # Examples
    ///
    /// ```
    /// use degree_btree::BTree;
    ///
    /// let mut tree: BTree<i32> = BTree::new(2)?;
    /// assert_eq!(tree.height(), 0);
    /// tree.extend([1, 2, 3]);
    /// assert_eq!(tree.height(), 1);
    /// tree.insert(4);
    /// assert_eq!(tree.height(), 2);
    /// # Ok::<(), degree_btree::Error>(())
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Removes every key, releasing all nodes.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the smallest key, if any.
    #[must_use]
    pub fn first(&self) -> Option<&K> {
        self.raw.first()
    }

    /// Returns the largest key, if any.
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        self.raw.last()
    }

    /// Returns every key in ascending order.
    ///
    /// The walk does not modify the tree and can be repeated at will.
    ///
    /// # Examples
    ///
    /// ```
    /// use degree_btree::BTree;
    ///
    /// let mut tree: BTree<i32> = BTree::new(2)?;
    /// tree.extend([30, 20, 17, 12, 10, 7, 6, 5]);
    /// assert_eq!(tree.traverse(), [&5, &6, &7, &10, &12, &17, &20, &30]);
    /// # Ok::<(), degree_btree::Error>(())
    /// ```
    #[must_use]
    pub fn traverse(&self) -> Vec<&K> {
        self.raw.traverse()
    }

    /// Appends a clone of every key, in ascending order, to `out`.
    pub fn traverse_into(&self, out: &mut Vec<K>)
    where
        K: Clone,
    {
        out.extend(self.raw.traverse().into_iter().cloned());
    }
}

impl<K: Ord> BTree<K> {
    /// Returns a reference to the stored key equal to `key`, if any.
    ///
    /// The key may be any borrowed form of the tree's key type, but the ordering on the borrowed
    /// form *must* match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```
    /// use degree_btree::BTree;
    ///
    /// let mut tree = BTree::new(3)?;
    /// tree.insert(String::from("kiwi"));
    /// assert_eq!(tree.search("kiwi").map(String::as_str), Some("kiwi"));
    /// assert_eq!(tree.search("fig"), None);
    /// # Ok::<(), degree_btree::Error>(())
    /// ```
    pub fn search<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key)
    }

    /// Returns `true` if the tree contains a key equal to `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).is_some()
    }

    /// Adds `key` to the tree.
    ///
    /// Returns whether the key was newly inserted. Inserting a key that is already present is a
    /// no-op and returns `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use degree_btree::BTree;
    ///
    /// let mut tree = BTree::new(2)?;
    /// assert!(tree.insert(7));
    /// assert!(!tree.insert(7));
    /// assert_eq!(tree.traverse(), [&7]);
    /// # Ok::<(), degree_btree::Error>(())
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        self.raw.insert(key)
    }

    /// Removes the key equal to `key`.
    ///
    /// Returns `true` if the key was present. An absent key leaves the tree unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use degree_btree::BTree;
    ///
    /// let mut tree: BTree<i32> = BTree::new(2)?;
    /// tree.extend([1, 2, 3, 4]);
    /// assert!(tree.erase(&3));
    /// assert!(!tree.erase(&3));
    /// assert_eq!(tree.traverse(), [&1, &2, &4]);
    /// # Ok::<(), degree_btree::Error>(())
    /// ```
    pub fn erase<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key).is_some()
    }

    /// Removes and returns the stored key equal to `key`, if any.
    pub fn take<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key)
    }

    /// Checks every structural invariant of the tree.
    ///
    /// Verifies equal leaf depth, strictly ascending keys, key separation by children, the
    /// child-count to key-count relation, occupancy bounds, parent links, and that no released
    /// node is still held.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvariantViolation`](crate::Error::InvariantViolation) listing every
    /// violation found. A correct tree never reports one.
    pub fn check_invariants(&self) -> Result<()> {
        self.raw.check_invariants()
    }
}

impl<K> Default for BTree<K> {
    /// Creates an empty tree of degree [`Degree::DEFAULT`].
    fn default() -> Self {
        Self::with_degree(Degree::DEFAULT)
    }
}

impl<K: Ord> Extend<K> for BTree<K> {
    #[inline]
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K: Ord + Copy + 'a> Extend<&'a K> for BTree<K> {
    fn extend<I: IntoIterator<Item = &'a K>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<K: fmt::Debug> fmt::Debug for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.raw.traverse()).finish()
    }
}
