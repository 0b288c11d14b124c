// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with slot allocation, topology, and payloads.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::Shape as _;
use understory_dirty::{CycleHandling, DirtyTracker};

use super::error::TreeError;
use super::traverse::Children;
use crate::dirty;
use crate::node::NodeHandle;
use crate::protocol::RenderingCore;
use crate::shape::{DescriptorAttr, ShapeDescriptor};

/// Sentinel value indicating "no node" in index fields.
pub(crate) const INVALID: u32 = u32::MAX;

/// Slot of the root container. Never freed.
pub(crate) const ROOT_SLOT: u32 = 0;

/// An in-memory retained tree that accepts the mutation protocol.
///
/// Nodes are addressed by caller-assigned [`NodeHandle`]s. Internally each
/// node occupies a slot in parallel arrays; removed nodes free their slots
/// for reuse.
#[derive(Debug)]
pub struct RetainedTree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Per-node data --
    pub(crate) handle: Vec<NodeHandle>,
    pub(crate) shape: Vec<Option<DescriptorAttr>>,

    // -- Allocation --
    pub(crate) slots: BTreeMap<NodeHandle, u32>,
    pub(crate) free_list: Vec<u32>,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<NodeHandle>,
    pub(crate) pending_removed: Vec<NodeHandle>,
}

impl Default for RetainedTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RetainedTree {
    /// Creates a tree containing only the root container.
    #[must_use]
    pub fn new() -> Self {
        let mut slots = BTreeMap::new();
        slots.insert(NodeHandle::ROOT, ROOT_SLOT);
        Self {
            parent: alloc::vec![INVALID],
            first_child: alloc::vec![INVALID],
            next_sibling: alloc::vec![INVALID],
            prev_sibling: alloc::vec![INVALID],
            handle: alloc::vec![NodeHandle::ROOT],
            shape: alloc::vec![None],
            slots,
            free_list: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Topology API --

    /// Creates `child` as the last child of `container`.
    pub fn append_child(
        &mut self,
        container: NodeHandle,
        child: NodeHandle,
    ) -> Result<(), TreeError> {
        self.insert_child(container, child, usize::MAX)
    }

    /// Creates `child` as the `index`-th child of `container`.
    ///
    /// An `index` past the end appends.
    pub fn insert_child(
        &mut self,
        container: NodeHandle,
        child: NodeHandle,
        index: usize,
    ) -> Result<(), TreeError> {
        let p = self
            .slot(container)
            .ok_or(TreeError::UnknownContainer(container))?;
        if self.slots.contains_key(&child) {
            return Err(TreeError::DuplicateNode(child));
        }

        let c = self.alloc_slot(child);
        self.parent[c as usize] = p;

        // Find the sibling currently at `index`, if any.
        let mut at = self.first_child[p as usize];
        let mut prev = INVALID;
        let mut i = 0;
        while at != INVALID && i < index {
            prev = at;
            at = self.next_sibling[at as usize];
            i += 1;
        }

        self.prev_sibling[c as usize] = prev;
        self.next_sibling[c as usize] = at;
        if prev == INVALID {
            self.first_child[p as usize] = c;
        } else {
            self.next_sibling[prev as usize] = c;
        }
        if at != INVALID {
            self.prev_sibling[at as usize] = c;
        }

        self.dirty.mark(p, dirty::TOPOLOGY);
        Ok(())
    }

    /// Creates `child` immediately before the existing node `before`, under
    /// the same container.
    pub fn insert_before(
        &mut self,
        child: NodeHandle,
        before: NodeHandle,
    ) -> Result<(), TreeError> {
        let s = self.slot(before).ok_or(TreeError::UnknownNode(before))?;
        if s == ROOT_SLOT {
            return Err(TreeError::RootHasNoSiblings);
        }
        if self.slots.contains_key(&child) {
            return Err(TreeError::DuplicateNode(child));
        }

        let p = self.parent[s as usize];
        let c = self.alloc_slot(child);
        let prev = self.prev_sibling[s as usize];

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = prev;
        if prev == INVALID {
            // `before` was the first child.
            self.first_child[p as usize] = c;
        } else {
            self.next_sibling[prev as usize] = c;
        }
        self.prev_sibling[s as usize] = c;

        self.dirty.mark(p, dirty::TOPOLOGY);
        Ok(())
    }

    /// Detaches `child` from its container and frees it together with its
    /// whole subtree.
    pub fn remove(&mut self, child: NodeHandle) -> Result<(), TreeError> {
        let c = self.slot(child).ok_or(TreeError::UnknownNode(child))?;
        if c == ROOT_SLOT {
            return Err(TreeError::RootNotRemovable);
        }

        let p = self.parent[c as usize];
        self.unlink_from_parent(c);
        self.dirty.mark(p, dirty::TOPOLOGY);

        for idx in self.subtree_post_order(c) {
            self.free_slot(idx);
        }
        Ok(())
    }

    /// Sets or replaces the payload of `id`.
    pub fn set_shape(&mut self, id: NodeHandle, attr: DescriptorAttr) -> Result<(), TreeError> {
        let idx = self.slot(id).ok_or(TreeError::UnknownNode(id))?;
        self.shape[idx as usize] = Some(attr);
        self.dirty.mark(idx, dirty::CONTENT);
        Ok(())
    }

    // -- Queries --

    /// Returns whether `id` names a live node (the root always does).
    #[must_use]
    pub fn contains(&self, id: NodeHandle) -> bool {
        self.slots.contains_key(&id)
    }

    /// Returns the number of live nodes, not counting the root container.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - 1
    }

    /// Returns `true` if only the root container exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the container of `id`, or `None` for the root or an unknown
    /// handle.
    #[must_use]
    pub fn parent(&self, id: NodeHandle) -> Option<NodeHandle> {
        let p = self.parent[self.slot(id)? as usize];
        (p != INVALID).then(|| self.handle[p as usize])
    }

    /// Returns an iterator over the direct children of `id`.
    ///
    /// An unknown handle yields no children.
    #[must_use]
    pub fn children(&self, id: NodeHandle) -> Children<'_> {
        let first = self
            .slot(id)
            .map_or(INVALID, |idx| self.first_child[idx as usize]);
        Children::new(self, first)
    }

    /// Returns the payload of `id`, if one has been set.
    #[must_use]
    pub fn shape(&self, id: NodeHandle) -> Option<&DescriptorAttr> {
        self.shape[self.slot(id)? as usize].as_ref()
    }

    /// Returns the bounding box of `id`'s payload.
    ///
    /// `None` if the node has no payload or the payload has unresolved
    /// geometry.
    #[must_use]
    pub fn bounds(&self, id: NodeHandle) -> Option<kurbo::Rect> {
        match self.shape(id)? {
            DescriptorAttr::R(rect) => {
                let x = f64::from(rect.x?);
                let y = f64::from(rect.y?);
                Some(kurbo::Rect::new(
                    x,
                    y,
                    x + f64::from(rect.width?),
                    y + f64::from(rect.height?),
                ))
            }
            DescriptorAttr::C(circle) => {
                let center = (f64::from(circle.cx?), f64::from(circle.cy?));
                Some(kurbo::Circle::new(center, f64::from(circle.r?)).bounding_box())
            }
        }
    }

    // -- Internal helpers --

    pub(crate) fn slot(&self, id: NodeHandle) -> Option<u32> {
        self.slots.get(&id).copied()
    }

    fn alloc_slot(&mut self, id: NodeHandle) -> u32 {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.parent[idx as usize] = INVALID;
            self.first_child[idx as usize] = INVALID;
            self.next_sibling[idx as usize] = INVALID;
            self.prev_sibling[idx as usize] = INVALID;
            self.handle[idx as usize] = id;
            self.shape[idx as usize] = None;
            idx
        } else {
            let idx = u32::try_from(self.handle.len())
                .ok()
                .filter(|&idx| idx != INVALID)
                .expect("retained tree slot space exhausted");
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.handle.push(id);
            self.shape.push(None);
            idx
        };
        self.slots.insert(id, idx);
        self.pending_added.push(id);
        idx
    }

    fn free_slot(&mut self, idx: u32) {
        let id = self.handle[idx as usize];
        self.slots.remove(&id);
        self.shape[idx as usize] = None;
        self.parent[idx as usize] = INVALID;
        self.first_child[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.dirty.remove_key(idx);
        self.free_list.push(idx);
        self.pending_removed.push(id);
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}

impl RenderingCore for RetainedTree {
    type Error = TreeError;

    fn create_child_append_to_container(
        &mut self,
        child: NodeHandle,
        index: usize,
    ) -> Result<(), TreeError> {
        self.insert_child(NodeHandle::ROOT, child, index)
    }

    fn set_shape_by_serde(
        &mut self,
        id: NodeHandle,
        descriptor: &ShapeDescriptor,
    ) -> Result<(), TreeError> {
        self.set_shape(id, *descriptor.attr())
    }

    /// `parent` must name the root or a live node; the child is detached from
    /// whichever container currently holds it.
    fn remove_child_from_container(
        &mut self,
        child: NodeHandle,
        parent: NodeHandle,
    ) -> Result<(), TreeError> {
        if !self.contains(parent) {
            return Err(TreeError::UnknownContainer(parent));
        }
        self.remove(child)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::shape::{CirclePayload, RectPayload};

    fn h(raw: u32) -> NodeHandle {
        NodeHandle::from_raw(raw)
    }

    fn root_children(tree: &RetainedTree) -> Vec<NodeHandle> {
        tree.children(NodeHandle::ROOT).collect()
    }

    #[test]
    fn starts_with_root_only() {
        let tree = RetainedTree::new();
        assert!(tree.is_empty());
        assert!(tree.contains(NodeHandle::ROOT));
        assert_eq!(tree.parent(NodeHandle::ROOT), None);
    }

    #[test]
    fn protocol_create_at_zero_prepends() {
        let mut tree = RetainedTree::new();
        tree.create_child_append_to_container(h(1), 0).unwrap();
        tree.create_child_append_to_container(h(2), 0).unwrap();
        tree.create_child_append_to_container(h(3), 0).unwrap();
        assert_eq!(root_children(&tree), vec![h(3), h(2), h(1)]);
    }

    #[test]
    fn protocol_create_index_is_clamped() {
        let mut tree = RetainedTree::new();
        tree.create_child_append_to_container(h(1), 0).unwrap();
        tree.create_child_append_to_container(h(2), 99).unwrap();
        tree.create_child_append_to_container(h(3), 1).unwrap();
        assert_eq!(root_children(&tree), vec![h(1), h(3), h(2)]);
    }

    #[test]
    fn duplicate_handle_is_rejected() {
        let mut tree = RetainedTree::new();
        tree.create_child_append_to_container(h(1), 0).unwrap();
        assert_eq!(
            tree.create_child_append_to_container(h(1), 0),
            Err(TreeError::DuplicateNode(h(1)))
        );
        assert_eq!(
            tree.append_child(NodeHandle::ROOT, NodeHandle::ROOT),
            Err(TreeError::DuplicateNode(NodeHandle::ROOT))
        );
    }

    #[test]
    fn append_and_insert_before_nest() {
        let mut tree = RetainedTree::new();
        tree.append_child(NodeHandle::ROOT, h(1)).unwrap();
        tree.append_child(h(1), h(2)).unwrap();
        tree.append_child(h(1), h(4)).unwrap();
        tree.insert_before(h(3), h(4)).unwrap();
        tree.insert_before(h(5), h(2)).unwrap();

        assert_eq!(tree.parent(h(3)), Some(h(1)));
        let kids: Vec<_> = tree.children(h(1)).collect();
        assert_eq!(kids, vec![h(5), h(2), h(3), h(4)]);
        assert_eq!(tree.traversal(), vec![h(1), h(5), h(2), h(3), h(4)]);
    }

    #[test]
    fn insert_before_root_is_rejected() {
        let mut tree = RetainedTree::new();
        assert_eq!(
            tree.insert_before(h(1), NodeHandle::ROOT),
            Err(TreeError::RootHasNoSiblings)
        );
        assert_eq!(
            tree.insert_before(h(1), h(9)),
            Err(TreeError::UnknownNode(h(9)))
        );
    }

    #[test]
    fn unknown_container_is_rejected() {
        let mut tree = RetainedTree::new();
        assert_eq!(
            tree.append_child(h(7), h(1)),
            Err(TreeError::UnknownContainer(h(7)))
        );
        assert!(!tree.contains(h(1)), "failed insert must not allocate");
    }

    #[test]
    fn remove_frees_whole_subtree() {
        let mut tree = RetainedTree::new();
        tree.append_child(NodeHandle::ROOT, h(1)).unwrap();
        tree.append_child(h(1), h(2)).unwrap();
        tree.append_child(h(2), h(3)).unwrap();
        tree.append_child(NodeHandle::ROOT, h(4)).unwrap();

        tree.remove_child_from_container(h(1), NodeHandle::ROOT)
            .unwrap();
        assert!(!tree.contains(h(1)));
        assert!(!tree.contains(h(2)));
        assert!(!tree.contains(h(3)));
        assert_eq!(root_children(&tree), vec![h(4)]);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn remove_checks_container_and_child() {
        let mut tree = RetainedTree::new();
        tree.create_child_append_to_container(h(1), 0).unwrap();
        assert_eq!(
            tree.remove_child_from_container(h(1), h(42)),
            Err(TreeError::UnknownContainer(h(42)))
        );
        assert_eq!(
            tree.remove_child_from_container(h(2), NodeHandle::ROOT),
            Err(TreeError::UnknownNode(h(2)))
        );
        assert_eq!(
            tree.remove(NodeHandle::ROOT),
            Err(TreeError::RootNotRemovable)
        );
        assert!(tree.contains(h(1)));
    }

    #[test]
    fn remove_accepts_a_live_logical_parent() {
        let mut tree = RetainedTree::new();
        tree.create_child_append_to_container(h(1), 0).unwrap();
        tree.create_child_append_to_container(h(2), 1).unwrap();
        // `2` lives under the root but names `1` as its structural parent.
        tree.remove_child_from_container(h(2), h(1)).unwrap();
        assert_eq!(root_children(&tree), vec![h(1)]);
    }

    #[test]
    fn slots_are_recycled_but_handles_are_not_confused() {
        let mut tree = RetainedTree::new();
        tree.create_child_append_to_container(h(1), 0).unwrap();
        let slot = tree.slot(h(1)).unwrap();
        tree.remove(h(1)).unwrap();
        tree.create_child_append_to_container(h(2), 0).unwrap();
        assert_eq!(tree.slot(h(2)), Some(slot));
        assert!(!tree.contains(h(1)));
        assert_eq!(tree.shape(h(2)), None);
    }

    #[test]
    fn set_shape_stores_payload_and_bounds() {
        let mut tree = RetainedTree::new();
        tree.create_child_append_to_container(h(1), 0).unwrap();
        tree.create_child_append_to_container(h(2), 0).unwrap();
        let rect = DescriptorAttr::R(RectPayload {
            x: Some(10),
            y: Some(20),
            width: Some(30),
            height: Some(40),
            color: [Some(1), Some(2), Some(3), Some(4)],
        });
        let circle = DescriptorAttr::C(CirclePayload {
            cx: Some(50),
            cy: Some(50),
            r: Some(5),
            color: [None; 4],
        });
        tree.set_shape_by_serde(h(1), &ShapeDescriptor::new(rect))
            .unwrap();
        tree.set_shape_by_serde(h(2), &ShapeDescriptor::new(circle))
            .unwrap();

        assert_eq!(tree.shape(h(1)), Some(&rect));
        assert_eq!(
            tree.bounds(h(1)),
            Some(kurbo::Rect::new(10.0, 20.0, 40.0, 60.0))
        );
        assert_eq!(
            tree.bounds(h(2)),
            Some(kurbo::Rect::new(45.0, 45.0, 55.0, 55.0))
        );
    }

    #[test]
    fn incomplete_payload_has_no_bounds() {
        let mut tree = RetainedTree::new();
        tree.create_child_append_to_container(h(1), 0).unwrap();
        tree.set_shape(
            h(1),
            DescriptorAttr::R(RectPayload {
                x: Some(1),
                ..RectPayload::default()
            }),
        )
        .unwrap();
        assert!(tree.shape(h(1)).is_some());
        assert_eq!(tree.bounds(h(1)), None);
    }

    #[test]
    fn set_shape_on_unknown_node_is_rejected() {
        let mut tree = RetainedTree::new();
        assert_eq!(
            tree.set_shape(h(3), DescriptorAttr::R(RectPayload::default())),
            Err(TreeError::UnknownNode(h(3)))
        );
    }
}
