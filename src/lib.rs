//! A classical B-tree set with a configurable minimum degree.
//!
//! This crate provides [`BTree`], an in-memory ordered set of keys stored in a B-tree of minimum
//! degree `t` (see [`Degree`]):
//!
//! - [`search`](BTree::search) - Find the stored key equal to a probe
//! - [`traverse`](BTree::traverse) - All keys in ascending order
//! - [`insert`](BTree::insert) - Add a key; inserting a present key is a no-op
//! - [`erase`](BTree::erase) - Remove a key, reporting whether it was present
//!
//! # Example
//!
//! ```
//! use degree_btree::BTree;
//!
//! let mut tree = BTree::new(2)?;
//! for key in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     tree.insert(key);
//! }
//! assert_eq!(tree.traverse(), [&5, &6, &7, &10, &12, &17, &20, &30]);
//!
//! assert!(tree.erase(&6));
//! assert_eq!(tree.search(&6), None);
//! tree.check_invariants()?;
//! # Ok::<(), degree_btree::Error>(())
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Configurable degree** - Every non-root node holds between `t - 1` and `2t - 1` keys
//! - **Self-checking** - [`BTree::check_invariants`] validates the whole structure on demand
//!
//! # Implementation
//!
//! Nodes live in an arena and refer to each other through stable handles: each node owns its
//! children's slots, and keeps a plain handle to its parent. Insertion splits overflowing nodes on
//! the way back up; removal substitutes the in-order successor for keys held in internal nodes and
//! then repairs underflow by borrowing from, or merging with, an adjacent sibling. Nodes absorbed
//! by a merge are released immediately.
//!
//! Structural changes are reported through the [`log`] facade at `trace` level.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod btree;
mod degree;
mod raw;

pub mod error;

pub use btree::BTree;
pub use degree::Degree;
pub use error::{Error, Result};
