// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The reference retained tree, exported to JavaScript.

use alloc::string::String;
use alloc::vec::Vec;

use wasm_bindgen::prelude::*;

use scenesync_core::node::NodeHandle;
use scenesync_core::protocol::RenderingCore as _;
use scenesync_core::tree::{RetainedTree, TreeError};

use crate::js_core::from_js;

/// A [`RetainedTree`] with the protocol's JavaScript method names.
///
/// Accepts the same calls as a native rendering core, so it can be passed to
/// [`SceneBridge::attach_surface`](crate::SceneBridge::attach_surface) for
/// headless use.
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct WasmRetainedTree {
    tree: RetainedTree,
}

#[wasm_bindgen]
impl WasmRetainedTree {
    /// Creates an empty tree whose root container is node `0`.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `child` under the root container at `index`.
    #[wasm_bindgen(js_name = createChildAppendToContainer)]
    pub fn create_child_append_to_container(
        &mut self,
        child: u32,
        index: u32,
    ) -> Result<(), JsError> {
        Ok(self
            .tree
            .create_child_append_to_container(NodeHandle::from_raw(child), index as usize)?)
    }

    /// Creates `child` directly before `before`, which must be a child of
    /// `container`.
    #[wasm_bindgen(js_name = createChildInsertBeforeElementOfContainer)]
    pub fn create_child_insert_before_element_of_container(
        &mut self,
        child: u32,
        before: u32,
        container: u32,
    ) -> Result<(), JsError> {
        Ok(insert_before_in(
            &mut self.tree,
            NodeHandle::from_raw(child),
            NodeHandle::from_raw(before),
            NodeHandle::from_raw(container),
        )?)
    }

    /// Sets the payload of `id` from a descriptor object.
    #[wasm_bindgen(js_name = setShapeBySerde)]
    pub fn set_shape_by_serde(&mut self, id: u32, descriptor: JsValue) -> Result<(), JsValue> {
        let descriptor = from_js(&descriptor)?;
        self.tree
            .set_shape_by_serde(NodeHandle::from_raw(id), &descriptor)
            .map_err(|e| JsError::from(e).into())
    }

    /// Removes `child` and its subtree.
    #[wasm_bindgen(js_name = removeChildFromContainer)]
    pub fn remove_child_from_container(&mut self, child: u32, parent: u32) -> Result<(), JsError> {
        Ok(self.tree.remove_child_from_container(
            NodeHandle::from_raw(child),
            NodeHandle::from_raw(parent),
        )?)
    }

    /// Returns whether `id` is live.
    pub fn contains(&self, id: u32) -> bool {
        self.tree.contains(NodeHandle::from_raw(id))
    }

    /// Returns the number of nodes below the root.
    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.tree.len()
    }

    /// Returns the direct children of `id`, in order.
    pub fn children(&self, id: u32) -> Vec<u32> {
        self.tree
            .children(NodeHandle::from_raw(id))
            .map(NodeHandle::get)
            .collect()
    }

    /// Returns every node in paint order.
    pub fn traversal(&self) -> Vec<u32> {
        self.tree.traversal().into_iter().map(NodeHandle::get).collect()
    }

    /// Returns an indented outline of the tree.
    #[wasm_bindgen(js_name = toDebug)]
    pub fn to_debug(&self) -> String {
        scenesync_debug::outline::render(&self.tree)
    }
}

impl WasmRetainedTree {
    /// Returns the wrapped tree.
    pub fn tree(&self) -> &RetainedTree {
        &self.tree
    }
}

/// Inserts `child` before `before`, which must currently sit in `container`.
fn insert_before_in(
    tree: &mut RetainedTree,
    child: NodeHandle,
    before: NodeHandle,
    container: NodeHandle,
) -> Result<(), TreeError> {
    if tree.parent(before) != Some(container) {
        return Err(TreeError::UnknownContainer(container));
    }
    tree.insert_before(child, before)
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn h(raw: u32) -> NodeHandle {
        NodeHandle::from_raw(raw)
    }

    fn tree_with_layer() -> RetainedTree {
        let mut tree = RetainedTree::new();
        tree.create_child_append_to_container(h(1), 0).unwrap();
        tree.append_child(h(1), h(2)).unwrap();
        tree
    }

    #[test]
    fn insert_before_sibling_in_named_container() {
        let mut tree = tree_with_layer();
        insert_before_in(&mut tree, h(3), h(2), h(1)).unwrap();
        assert_eq!(tree.children(h(1)).collect::<Vec<_>>(), vec![h(3), h(2)]);

        insert_before_in(&mut tree, h(4), h(1), NodeHandle::ROOT).unwrap();
        assert_eq!(
            tree.children(NodeHandle::ROOT).collect::<Vec<_>>(),
            vec![h(4), h(1)]
        );
    }

    #[test]
    fn insert_before_rejects_wrong_container() {
        let mut tree = tree_with_layer();
        assert_eq!(
            insert_before_in(&mut tree, h(3), h(2), NodeHandle::ROOT),
            Err(TreeError::UnknownContainer(NodeHandle::ROOT))
        );
        assert_eq!(
            insert_before_in(&mut tree, h(3), h(9), h(1)),
            Err(TreeError::UnknownContainer(h(1)))
        );
        assert!(!tree.contains(h(3)), "nothing was created");
    }

    #[test]
    fn duplicate_child_is_rejected_after_container_check() {
        let mut tree = tree_with_layer();
        assert_eq!(
            insert_before_in(&mut tree, h(1), h(2), h(1)),
            Err(TreeError::DuplicateNode(h(1)))
        );
    }
}
