// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference retained tree.
//!
//! [`RetainedTree`] is an in-memory rendering core: it implements
//! [`RenderingCore`](crate::protocol::RenderingCore) and keeps the scene graph
//! that a native surface would otherwise own. Each node has:
//!
//! - An identity ([`NodeHandle`](crate::node::NodeHandle)) assigned by the
//!   caller. The tree never invents identity; it only maps handles to slots.
//! - Topology: parent, first-child, and sibling links forming an ordered
//!   tree under a single root container ([`NodeHandle::ROOT`]).
//! - An optional payload ([`DescriptorAttr`](crate::shape::DescriptorAttr))
//!   set through `set_shape_by_serde`.
//!
//! Nodes are stored in struct-of-arrays layout. Freed slots are recycled;
//! handles are not.
//!
//! # Protocol placement
//!
//! `create_child_append_to_container(child, index)` has no container
//! argument, so protocol-created nodes always land under the root container,
//! at position `index` clamped to the current child count. Nested placement
//! is available through the inherent [`append_child`](RetainedTree::append_child),
//! [`insert_child`](RetainedTree::insert_child), and
//! [`insert_before`](RetainedTree::insert_before) operations.
//!
//! # Change tracking
//!
//! Mutations mark [`dirty`](crate::dirty) channels; [`RetainedTree::take_changes`]
//! drains them into a [`TreeChanges`] for whoever presents the tree.
//!
//! [`NodeHandle::ROOT`]: crate::node::NodeHandle::ROOT

mod changes;
mod error;
mod store;
mod traverse;

pub use changes::TreeChanges;
pub use error::TreeError;
pub use store::RetainedTree;
pub use traverse::Children;
