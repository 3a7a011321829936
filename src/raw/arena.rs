use alloc::vec::Vec;

use super::handle::Handle;

/// Node store addressed by [`Handle`].
///
/// A node released by a merge or a root collapse leaves a vacant slot behind; the next split
/// fills the most recently vacated slot before the store grows. A handle therefore names a node
/// only until that node is released.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    entries: Vec<Option<T>>,
    vacant: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
            vacant: Vec::new(),
        }
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.entries.len() - self.vacant.len()
    }

    /// Stores `node`, reusing a vacant slot when one exists.
    pub(crate) fn alloc(&mut self, node: T) -> Handle {
        match self.vacant.pop() {
            Some(handle) => {
                let entry = &mut self.entries[handle.to_index()];
                debug_assert!(entry.is_none(), "vacant list names a live slot");
                *entry = Some(node);
                handle
            }
            None => {
                let index = self.entries.len();
                assert!(index <= Handle::MAX, "`Arena::alloc()` - node store is full ({} slots)", Handle::MAX + 1);
                self.entries.push(Some(node));
                Handle::from_index(index)
            }
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match &self.entries[handle.to_index()] {
            Some(node) => node,
            None => panic!("`Arena::get()` - {handle:?} names a released node"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match &mut self.entries[handle.to_index()] {
            Some(node) => node,
            None => panic!("`Arena::get_mut()` - {handle:?} names a released node"),
        }
    }

    /// Moves a node out of the store and marks its slot vacant.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let Some(node) = self.entries[handle.to_index()].take() else {
            panic!("`Arena::take()` - {handle:?} names a released node");
        };
        self.vacant.push(handle);
        node
    }

    /// Drops a node and marks its slot vacant.
    pub(crate) fn free(&mut self, handle: Handle) {
        drop(self.take(handle));
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.vacant.clear();
    }
}
