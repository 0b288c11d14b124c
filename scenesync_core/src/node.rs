// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node, instance, and core identity types.
//!
//! A [`NodeHandle`] names exactly one node in a rendering core's retained
//! tree for that node's entire lifetime. Handles are issued by a
//! [`NodeIdAllocator`] that is owned by the
//! [`Mapper`](crate::lifecycle::Mapper) rather than held as process-wide
//! state. Handles start at 1, only ever increase, and are never recycled, even
//! after the node they named has been removed.
//!
//! [`NodeHandle::ROOT`] (`0`) is reserved for the root container of a Surface
//! and is never returned by an allocator.

use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// An opaque handle to one node of a retained tree.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeHandle(pub(crate) u32);

impl NodeHandle {
    /// The root container of a Surface.
    pub const ROOT: Self = Self(0);

    /// Wraps a raw value received from the wire.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value sent over the wire.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns `true` for [`NodeHandle::ROOT`].
    #[inline]
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.0 == Self::ROOT.0
    }
}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("NodeHandle(root)")
        } else {
            write!(f, "NodeHandle({})", self.0)
        }
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies a component instance mirrored by a
/// [`Mapper`](crate::lifecycle::Mapper).
///
/// Assigned by the mapper in declaration order. Unlike [`NodeHandle`], this
/// identifies the host-side component, not a retained-tree node.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(pub(crate) u32);

impl InstanceId {
    /// Wraps a raw index received across an FFI boundary.
    ///
    /// The mapper rejects ids it did not issue with
    /// [`UnknownInstance`](crate::lifecycle::LifecycleError::UnknownInstance).
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index (for diagnostics and FFI only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceId({})", self.0)
    }
}

/// Identifies a rendering core attached to a
/// [`Mapper`](crate::lifecycle::Mapper) through a Surface root.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoreId(pub(crate) u32);

impl fmt::Debug for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CoreId({})", self.0)
    }
}

/// Issues strictly increasing [`NodeHandle`]s, starting at 1.
#[derive(Debug)]
pub struct NodeIdAllocator {
    /// Last handle issued; `0` (ROOT) before the first allocation.
    last: u32,
}

impl Default for NodeIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeIdAllocator {
    /// Creates an allocator whose first handle is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    /// Returns a handle greater than every handle previously returned.
    ///
    /// # Panics
    ///
    /// Panics if the `u32` handle space is exhausted.
    pub fn allocate(&mut self) -> NodeHandle {
        self.try_allocate().expect("node handle space exhausted")
    }

    /// Like [`allocate`](Self::allocate), but returns `None` once every
    /// handle up to `u32::MAX` has been issued.
    pub fn try_allocate(&mut self) -> Option<NodeHandle> {
        self.last = self.last.checked_add(1)?;
        Some(NodeHandle(self.last))
    }

    /// Returns the handle the next call to [`allocate`](Self::allocate) will
    /// produce, without consuming it. `None` once exhausted.
    #[must_use]
    pub const fn peek(&self) -> Option<NodeHandle> {
        match self.last.checked_add(1) {
            Some(next) => Some(NodeHandle(next)),
            None => None,
        }
    }
}

/// A [`NodeIdAllocator`] that can be shared between threads.
///
/// The [`Mapper`](crate::lifecycle::Mapper) owns a plain [`NodeIdAllocator`].
/// Hosts that issue handles for one core from several threads (for example a
/// worker that pre-allocates nodes) share this type instead. Calls into the
/// rendering core must still be serialized; this type only keeps handle
/// issuance unique.
#[derive(Debug)]
pub struct AtomicNodeIdAllocator {
    last: AtomicU32,
}

impl Default for AtomicNodeIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomicNodeIdAllocator {
    /// Creates an allocator whose first handle is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicU32::new(0),
        }
    }

    /// Returns a handle distinct from every handle previously returned.
    ///
    /// # Panics
    ///
    /// Panics if the `u32` handle space is exhausted.
    pub fn allocate(&self) -> NodeHandle {
        self.try_allocate().expect("node handle space exhausted")
    }

    /// Like [`allocate`](Self::allocate), but returns `None` once every
    /// handle up to `u32::MAX` has been issued. An exhausted allocator stays
    /// exhausted.
    pub fn try_allocate(&self) -> Option<NodeHandle> {
        let last = self
            .last
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
                last.checked_add(1)
            })
            .ok()?;
        Some(NodeHandle(last + 1))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn first_handle_is_one() {
        let mut ids = NodeIdAllocator::new();
        assert_eq!(ids.allocate(), NodeHandle(1));
        assert_eq!(ids.allocate(), NodeHandle(2));
    }

    #[test]
    fn handles_strictly_increase() {
        let mut ids = NodeIdAllocator::new();
        let handles: Vec<_> = (0..64).map(|_| ids.allocate()).collect();
        assert!(
            handles.windows(2).all(|w| w[0] < w[1]),
            "handles must be strictly increasing"
        );
        assert!(
            handles.iter().all(|h| !h.is_root()),
            "allocator never issues ROOT"
        );
    }

    #[test]
    fn peek_does_not_consume() {
        let mut ids = NodeIdAllocator::new();
        assert_eq!(ids.peek(), Some(NodeHandle(1)));
        assert_eq!(ids.peek(), Some(NodeHandle(1)));
        assert_eq!(ids.allocate(), NodeHandle(1));
        assert_eq!(ids.peek(), Some(NodeHandle(2)));
    }

    #[test]
    fn last_handle_is_issued_before_exhaustion() {
        let mut ids = NodeIdAllocator { last: u32::MAX - 1 };
        assert_eq!(ids.peek(), Some(NodeHandle(u32::MAX)));
        assert_eq!(ids.allocate(), NodeHandle(u32::MAX));
        assert_eq!(ids.peek(), None);
        assert_eq!(ids.try_allocate(), None);
        assert_eq!(ids.try_allocate(), None);
    }

    #[test]
    #[should_panic(expected = "node handle space exhausted")]
    fn exhaustion_panics() {
        let mut ids = NodeIdAllocator { last: u32::MAX };
        let _ = ids.allocate();
    }

    #[test]
    fn atomic_allocator_matches_sequential_contract() {
        let ids = AtomicNodeIdAllocator::new();
        assert_eq!(ids.allocate(), NodeHandle(1));
        assert_eq!(ids.allocate(), NodeHandle(2));
        assert_eq!(ids.allocate(), NodeHandle(3));
    }

    #[test]
    fn atomic_exhaustion_never_wraps() {
        let ids = AtomicNodeIdAllocator {
            last: AtomicU32::new(u32::MAX - 1),
        };
        assert_eq!(ids.allocate(), NodeHandle(u32::MAX));
        for _ in 0..3 {
            assert_eq!(ids.try_allocate(), None);
        }
        assert_eq!(ids.last.load(Ordering::Relaxed), u32::MAX);
    }

    #[test]
    #[should_panic(expected = "node handle space exhausted")]
    fn atomic_exhaustion_panics() {
        let ids = AtomicNodeIdAllocator {
            last: AtomicU32::new(u32::MAX),
        };
        let _ = ids.allocate();
    }

    #[test]
    fn handle_formats() {
        assert_eq!(alloc::format!("{:?}", NodeHandle::ROOT), "NodeHandle(root)");
        assert_eq!(alloc::format!("{:?}", NodeHandle(7)), "NodeHandle(7)");
        assert_eq!(alloc::format!("{}", NodeHandle(7)), "#7");
    }
}
