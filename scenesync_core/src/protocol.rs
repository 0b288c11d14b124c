// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tree mutation protocol spoken to a rendering core.
//!
//! A rendering core owns a retained tree and is never created by this crate.
//! It only has to accept three operations:
//!
//! | Operation | Wire name |
//! |---|---|
//! | [`create_child_append_to_container`](RenderingCore::create_child_append_to_container) | `createChildAppendToContainer` |
//! | [`set_shape_by_serde`](RenderingCore::set_shape_by_serde) | `setShapeBySerde` |
//! | [`remove_child_from_container`](RenderingCore::remove_child_from_container) | `removeChildFromContainer` |
//!
//! Every call is a single best-effort attempt. Rejections are returned as the
//! core's own error type and are neither retried nor rolled back here.
//!
//! [`MutationLog`] records calls instead of applying them. Tests use it, and
//! it can replay a recorded sequence onto any other core.

use alloc::vec::Vec;
use core::convert::Infallible;

use crate::node::NodeHandle;
use crate::shape::ShapeDescriptor;

/// The three mutations a rendering core accepts against its retained tree.
///
/// Both `CALayer`-style native trees and the reference
/// [`RetainedTree`](crate::tree::RetainedTree) implement this trait, as do
/// test doubles such as [`MutationLog`].
pub trait RenderingCore {
    /// Rejection reported by the core.
    type Error;

    /// Registers `child` as a new node at position `index`.
    fn create_child_append_to_container(
        &mut self,
        child: NodeHandle,
        index: usize,
    ) -> Result<(), Self::Error>;

    /// Sets or replaces the shape payload of an existing node.
    fn set_shape_by_serde(
        &mut self,
        id: NodeHandle,
        descriptor: &ShapeDescriptor,
    ) -> Result<(), Self::Error>;

    /// Detaches `child` from `parent` and frees it.
    fn remove_child_from_container(
        &mut self,
        child: NodeHandle,
        parent: NodeHandle,
    ) -> Result<(), Self::Error>;
}

impl<C: RenderingCore + ?Sized> RenderingCore for &mut C {
    type Error = C::Error;

    fn create_child_append_to_container(
        &mut self,
        child: NodeHandle,
        index: usize,
    ) -> Result<(), Self::Error> {
        (**self).create_child_append_to_container(child, index)
    }

    fn set_shape_by_serde(
        &mut self,
        id: NodeHandle,
        descriptor: &ShapeDescriptor,
    ) -> Result<(), Self::Error> {
        (**self).set_shape_by_serde(id, descriptor)
    }

    fn remove_child_from_container(
        &mut self,
        child: NodeHandle,
        parent: NodeHandle,
    ) -> Result<(), Self::Error> {
        (**self).remove_child_from_container(child, parent)
    }
}

/// One recorded protocol call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    /// `createChildAppendToContainer(child, index)`.
    Create {
        /// New node.
        child: NodeHandle,
        /// Requested position.
        index: usize,
    },
    /// `setShapeBySerde(id, descriptor)`.
    SetShape {
        /// Target node.
        id: NodeHandle,
        /// Payload.
        descriptor: ShapeDescriptor,
    },
    /// `removeChildFromContainer(child, parent)`.
    Remove {
        /// Node being removed.
        child: NodeHandle,
        /// Its structural parent at mount time.
        parent: NodeHandle,
    },
}

impl Mutation {
    /// Returns the wire method name of this call.
    #[must_use]
    pub const fn op_name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "createChildAppendToContainer",
            Self::SetShape { .. } => "setShapeBySerde",
            Self::Remove { .. } => "removeChildFromContainer",
        }
    }

    /// Returns the node this call targets.
    #[must_use]
    pub const fn target(&self) -> NodeHandle {
        match self {
            Self::Create { child, .. } | Self::Remove { child, .. } => *child,
            Self::SetShape { id, .. } => *id,
        }
    }

    /// Issues this call against `core`.
    pub fn apply<C: RenderingCore + ?Sized>(&self, core: &mut C) -> Result<(), C::Error> {
        match self {
            Self::Create { child, index } => core.create_child_append_to_container(*child, *index),
            Self::SetShape { id, descriptor } => core.set_shape_by_serde(*id, descriptor),
            Self::Remove { child, parent } => core.remove_child_from_container(*child, *parent),
        }
    }
}

/// A rendering core that records every call and never rejects one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MutationLog {
    mutations: Vec<Mutation>,
}

impl MutationLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mutations: Vec::new(),
        }
    }

    /// Returns the recorded calls in issue order.
    #[must_use]
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Returns the number of recorded calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    /// Returns `true` if no call has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    /// Removes and returns every recorded call.
    pub fn take(&mut self) -> Vec<Mutation> {
        core::mem::take(&mut self.mutations)
    }

    /// Issues every recorded call against `core`, stopping at the first
    /// rejection.
    pub fn replay<C: RenderingCore + ?Sized>(&self, core: &mut C) -> Result<(), C::Error> {
        self.mutations.iter().try_for_each(|m| m.apply(core))
    }
}

impl RenderingCore for MutationLog {
    type Error = Infallible;

    fn create_child_append_to_container(
        &mut self,
        child: NodeHandle,
        index: usize,
    ) -> Result<(), Self::Error> {
        self.mutations.push(Mutation::Create { child, index });
        Ok(())
    }

    fn set_shape_by_serde(
        &mut self,
        id: NodeHandle,
        descriptor: &ShapeDescriptor,
    ) -> Result<(), Self::Error> {
        self.mutations.push(Mutation::SetShape {
            id,
            descriptor: descriptor.clone(),
        });
        Ok(())
    }

    fn remove_child_from_container(
        &mut self,
        child: NodeHandle,
        parent: NodeHandle,
    ) -> Result<(), Self::Error> {
        self.mutations.push(Mutation::Remove { child, parent });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{DescriptorAttr, RectPayload};

    fn descriptor() -> ShapeDescriptor {
        ShapeDescriptor::new(DescriptorAttr::R(RectPayload::default()))
    }

    #[test]
    fn log_records_in_order() {
        let mut log = MutationLog::new();
        let a = NodeHandle::from_raw(1);
        log.create_child_append_to_container(a, 0).unwrap();
        log.set_shape_by_serde(a, &descriptor()).unwrap();
        log.remove_child_from_container(a, NodeHandle::ROOT).unwrap();

        let ops: Vec<_> = log.mutations().iter().map(Mutation::op_name).collect();
        assert_eq!(
            ops,
            [
                "createChildAppendToContainer",
                "setShapeBySerde",
                "removeChildFromContainer"
            ]
        );
        assert!(log.mutations().iter().all(|m| m.target() == a));
    }

    #[test]
    fn replay_reproduces_the_sequence() {
        let mut source = MutationLog::new();
        source
            .create_child_append_to_container(NodeHandle::from_raw(3), 0)
            .unwrap();
        source
            .set_shape_by_serde(NodeHandle::from_raw(3), &descriptor())
            .unwrap();

        let mut copy = MutationLog::new();
        source.replay(&mut copy).unwrap();
        assert_eq!(copy, source);
    }

    #[test]
    fn mutable_reference_forwards() {
        fn drive<C: RenderingCore>(mut core: C) {
            let _ = core.create_child_append_to_container(NodeHandle::from_raw(1), 0);
        }

        let mut log = MutationLog::new();
        drive(&mut log);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn take_drains() {
        let mut log = MutationLog::new();
        log.create_child_append_to_container(NodeHandle::from_raw(1), 0)
            .unwrap();
        assert_eq!(log.take().len(), 1);
        assert!(log.is_empty());
    }
}
