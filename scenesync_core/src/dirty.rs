// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants for the reference
//! [`RetainedTree`](crate::tree::RetainedTree).
//!
//! Both channels are local-only: marking a node never marks its descendants,
//! because neither payloads nor sibling order are inherited.
//!
//! - [`CONTENT`] is marked when a node's shape payload is set.
//! - [`TOPOLOGY`] is marked on the container whose child list changed
//!   (create, insert, remove).
//!
//! Callers consume both through
//! [`RetainedTree::take_changes`](crate::tree::RetainedTree::take_changes).

use understory_dirty::Channel;

/// Shape payload changed.
pub const CONTENT: Channel = Channel::new(0);

/// A container's child list changed.
pub const TOPOLOGY: Channel = Channel::new(1);
