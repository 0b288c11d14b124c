// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change draining.
//!
//! [`TreeChanges`] reports handles rather than raw slots: slots are recycled
//! and a presenter holding a slot across a drain could not tell two nodes
//! apart.

use alloc::vec::Vec;

use super::store::RetainedTree;
use crate::dirty;
use crate::node::NodeHandle;

/// The set of changes accumulated since the previous
/// [`RetainedTree::take_changes`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeChanges {
    /// Nodes created, in creation order.
    pub added: Vec<NodeHandle>,
    /// Nodes freed, descendants before ancestors.
    ///
    /// A node created and removed within the same batch appears in both
    /// `added` and `removed`.
    pub removed: Vec<NodeHandle>,
    /// Live nodes whose payload was set.
    pub content: Vec<NodeHandle>,
    /// Whether any container's child list changed.
    pub topology_changed: bool,
}

impl TreeChanges {
    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.content.is_empty()
            && !self.topology_changed
    }
}

impl RetainedTree {
    /// Drains every dirty channel and returns what changed.
    pub fn take_changes(&mut self) -> TreeChanges {
        let content_slots: Vec<u32> = self
            .dirty
            .drain(dirty::CONTENT)
            .deterministic()
            .run()
            .collect();
        // Skip slots freed after they were marked.
        let content = content_slots
            .into_iter()
            .filter_map(|idx| {
                let id = self.handle[idx as usize];
                (self.slot(id) == Some(idx)).then_some(id)
            })
            .collect();

        let topology: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();

        TreeChanges {
            added: core::mem::take(&mut self.pending_added),
            removed: core::mem::take(&mut self.pending_removed),
            content,
            topology_changed: !topology.is_empty(),
        }
    }
}
