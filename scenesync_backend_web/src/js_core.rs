// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering cores implemented in JavaScript.

use alloc::string::ToString as _;

use wasm_bindgen::prelude::*;

use scenesync_core::node::NodeHandle;
use scenesync_core::protocol::RenderingCore;
use scenesync_core::shape::ShapeDescriptor;

#[wasm_bindgen]
extern "C" {
    /// Any JavaScript object with `createChildAppendToContainer`,
    /// `setShapeBySerde`, and `removeChildFromContainer` methods.
    #[derive(Debug, Clone)]
    pub type JsCore;

    #[wasm_bindgen(method, catch, js_name = "createChildAppendToContainer")]
    fn js_create(this: &JsCore, child: u32, index: u32) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = "setShapeBySerde")]
    fn js_set_shape(this: &JsCore, id: u32, descriptor: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = "removeChildFromContainer")]
    fn js_remove(this: &JsCore, child: u32, parent: u32) -> Result<(), JsValue>;
}

/// Exceptions thrown by the JavaScript object are returned unchanged.
impl RenderingCore for JsCore {
    type Error = JsValue;

    fn create_child_append_to_container(
        &mut self,
        child: NodeHandle,
        index: usize,
    ) -> Result<(), JsValue> {
        let index =
            u32::try_from(index).map_err(|_| JsError::new("insertion index exceeds u32"))?;
        self.js_create(child.get(), index)
    }

    fn set_shape_by_serde(
        &mut self,
        id: NodeHandle,
        descriptor: &ShapeDescriptor,
    ) -> Result<(), JsValue> {
        self.js_set_shape(id.get(), to_js(descriptor)?)
    }

    fn remove_child_from_container(
        &mut self,
        child: NodeHandle,
        parent: NodeHandle,
    ) -> Result<(), JsValue> {
        self.js_remove(child.get(), parent.get())
    }
}

/// Converts a descriptor into a plain JavaScript object.
pub(crate) fn to_js(descriptor: &ShapeDescriptor) -> Result<JsValue, JsValue> {
    let json =
        serde_json::to_string(descriptor).map_err(|e| JsError::new(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

/// Reads a descriptor from a plain JavaScript object.
pub(crate) fn from_js(value: &JsValue) -> Result<ShapeDescriptor, JsValue> {
    let json: alloc::string::String = js_sys::JSON::stringify(value)?.into();
    serde_json::from_str(&json).map_err(|e| JsError::new(&e.to_string()).into())
}
