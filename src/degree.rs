use core::fmt;

use crate::error::{Error, Result};

/// The minimum degree `t` of a [`BTree`](crate::BTree).
///
/// Every node except the root holds between `t - 1` and `2t - 1` keys, and every internal node
/// except the root has between `t` and `2t` children. A degree below 2 cannot satisfy those
/// bounds, so it is rejected when the `Degree` is built, as is a degree whose `2t` bound
/// does not fit in a `usize`.
///
/// # Examples
///
/// ```
/// use degree_btree::Degree;
///
/// let t = Degree::new(3)?;
/// assert_eq!(t.min_keys(), 2);
/// assert_eq!(t.max_keys(), 5);
/// assert_eq!(t.max_children(), 6);
///
/// assert!(Degree::new(1).is_err());
/// # Ok::<(), degree_btree::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Degree(usize);

impl Degree {
    /// The smallest valid degree (a 2-3-4 tree).
    pub const MIN: Self = Self(2);

    /// The largest valid degree; `2t` keys must still fit in a `usize`.
    pub const MAX: Self = Self(usize::MAX / 2);

    /// Degree used by [`BTree::default`](crate::BTree::default).
    pub const DEFAULT: Self = Self(6);

    /// Validates `t` as a minimum degree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDegree`] when `t` lies outside [`MIN`](Self::MIN)..=[`MAX`](Self::MAX).
    pub fn new(t: usize) -> Result<Self> {
        if !(Self::MIN.0..=Self::MAX.0).contains(&t) {
            return Err(Error::InvalidDegree { degree: t });
        }
        Ok(Self(t))
    }

    /// Returns `t`.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Fewest keys a non-root node may hold: `t - 1`.
    #[must_use]
    pub const fn min_keys(self) -> usize {
        self.0 - 1
    }

    /// Most keys any node may hold: `2t - 1`.
    #[must_use]
    pub const fn max_keys(self) -> usize {
        2 * self.0 - 1
    }

    /// Fewest children a non-root internal node may have: `t`.
    #[must_use]
    pub const fn min_children(self) -> usize {
        self.0
    }

    /// Most children any internal node may have: `2t`.
    #[must_use]
    pub const fn max_children(self) -> usize {
        2 * self.0
    }
}

impl Default for Degree {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for Degree {
    type Error = Error;

    fn try_from(t: usize) -> Result<Self> {
        Self::new(t)
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}
