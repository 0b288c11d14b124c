// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::vec::Vec;

use super::store::{INVALID, RetainedTree};
use crate::node::NodeHandle;

/// An iterator over the direct children of a node.
///
/// Created by [`RetainedTree::children`].
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a RetainedTree,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a RetainedTree, first: u32) -> Self {
        Self {
            tree,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeHandle;

    fn next(&mut self) -> Option<NodeHandle> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.tree.next_sibling[idx as usize];
        Some(self.tree.handle[idx as usize])
    }
}

impl RetainedTree {
    /// Returns every live node below the root in depth-first pre-order,
    /// which is also paint order.
    #[must_use]
    pub fn traversal(&self) -> Vec<NodeHandle> {
        let mut order = Vec::with_capacity(self.len());
        let mut child = self.first_child[super::store::ROOT_SLOT as usize];
        while child != INVALID {
            self.dfs_collect(child, &mut order);
            child = self.next_sibling[child as usize];
        }
        order
    }

    fn dfs_collect(&self, idx: u32, order: &mut Vec<NodeHandle>) {
        order.push(self.handle[idx as usize]);
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.dfs_collect(child, order);
            child = self.next_sibling[child as usize];
        }
    }

    /// Returns the raw slots of the subtree rooted at `idx`, children first.
    pub(crate) fn subtree_post_order(&self, idx: u32) -> Vec<u32> {
        let mut out = Vec::new();
        let mut stack = alloc::vec![(idx, false)];
        while let Some((slot, visited)) = stack.pop() {
            if visited {
                out.push(slot);
                continue;
            }
            stack.push((slot, true));
            let mut child = self.first_child[slot as usize];
            while child != INVALID {
                stack.push((child, false));
                child = self.next_sibling[child as usize];
            }
        }
        out
    }
}
