//! Shared, freezable node holder.

use crate::WriteError;
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct Node<T> {
    frozen: AtomicBool,
    data: T,
}

/// Reference-counted container node.
///
/// Cloning a `Heap` shares the node. Identity is pointer identity
/// ([`Heap::ptr_eq`]); `==` compares contents.
///
/// The constructor is crate-private: values are built through the factory
/// methods on [`Value`](crate::Value).
pub struct Heap<T>(Arc<Node<T>>);

impl<T> Heap<T> {
    pub(crate) fn new(data: T) -> Self {
        Heap(Arc::new(Node {
            frozen: AtomicBool::new(false),
            data,
        }))
    }

    /// Whether both handles point at the same node.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.0.frozen.load(Ordering::Acquire)
    }

    /// Mark this node read-only. Returns `false` if it already was.
    pub(crate) fn freeze(&self) -> bool {
        !self.0.frozen.swap(true, Ordering::AcqRel)
    }

    /// Number of handles sharing this node.
    pub fn share_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// Mutable access to the node's contents.
    ///
    /// Only a node that is neither frozen nor shared with another handle can
    /// be written. A freshly cloned node on a write path satisfies both.
    pub fn get_mut(&mut self) -> Result<&mut T, WriteError> {
        if self.is_frozen() {
            return Err(WriteError::Frozen);
        }
        match Arc::get_mut(&mut self.0) {
            Some(node) => Ok(&mut node.data),
            None => Err(WriteError::Shared),
        }
    }
}

impl<T> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Arc::clone(&self.0))
    }
}

impl<T> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0.data
    }
}

impl<T: PartialEq> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0.data == other.0.data
    }
}

impl<T: fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.data.fmt(f)
    }
}
