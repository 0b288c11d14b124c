// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The lifecycle mapper, exported to JavaScript.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString as _};
use alloc::vec::Vec;

use serde::Deserialize;
use wasm_bindgen::prelude::*;

use scenesync_core::lifecycle::{LifecycleError, LifecycleState, Mapper, MapperConfig};
use scenesync_core::node::InstanceId;
use scenesync_core::registry::{Registration, Registry, RegistryConfig};
use scenesync_core::shape::{AttributeBag, ShapeAttrs};

use crate::js_core::JsCore;

/// Configuration accepted by the [`SceneBridge`] constructor.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BridgeConfig {
    mapper: MapperConfig,
    registry: RegistryConfig,
}

/// Drives JavaScript rendering cores from component lifecycle hooks.
///
/// Component ids and node handles cross the boundary as numbers. Exceptions
/// thrown by a core are rethrown unchanged; every other failure is thrown as
/// an `Error` with a descriptive message.
#[wasm_bindgen]
pub struct SceneBridge {
    mapper: Mapper<JsCore>,
    registry: Registry,
}

impl core::fmt::Debug for SceneBridge {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SceneBridge")
            .field("components", &self.mapper.len())
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

#[wasm_bindgen]
impl SceneBridge {
    /// Creates a bridge.
    ///
    /// `config` may be `undefined` or an object such as
    /// `{ mapper: { insertion_index: 0, update_policy: "resend" }, registry: { prefix: "v" } }`;
    /// missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<Self, JsValue> {
        let config = parse_config(json_of(&config)?.as_deref()).map_err(serde_to_js)?;
        Ok(Self {
            mapper: Mapper::with_config(config.mapper),
            registry: Registry::new(&config.registry),
        })
    }

    /// Returns every registered component tag.
    #[wasm_bindgen(js_name = componentTags)]
    pub fn component_tags(&self) -> Vec<String> {
        self.registry.tags().map(String::from).collect()
    }

    /// Attaches `core` as a Surface root and returns its component id.
    #[wasm_bindgen(js_name = attachSurface)]
    pub fn attach_surface(&mut self, core: JsCore) -> u32 {
        self.mapper.attach_surface(core).index()
    }

    /// Declares a component registered under `tag`.
    ///
    /// Numeric entries of `attrs` are read as the component's attributes;
    /// anything else is ignored.
    pub fn declare(
        &mut self,
        tag: &str,
        parent: Option<u32>,
        attrs: JsValue,
    ) -> Result<u32, JsValue> {
        let kind = match self.registry.lookup(tag) {
            Some(Registration::Shape(kind)) => kind,
            Some(Registration::Surface) => {
                return Err(
                    JsError::new("Surface components are attached with attachSurface").into(),
                );
            }
            None => {
                return Err(JsError::new(&alloc::format!("unknown component tag `{tag}`")).into());
            }
        };
        let attrs = ShapeAttrs::resolve(kind, &bag_from_js(&attrs)?)
            .ok_or_else(|| JsError::new("component kind has no attributes"))?;
        let id = self
            .mapper
            .declare(attrs, parent.map(InstanceId::from_raw))
            .map_err(into_js)?;
        tracing::debug!(tag, instance = id.index(), "declared");
        Ok(id.index())
    }

    /// Replaces the attributes of `id`.
    #[wasm_bindgen(js_name = setAttrs)]
    pub fn set_attrs(&mut self, id: u32, attrs: JsValue) -> Result<(), JsValue> {
        let id = InstanceId::from_raw(id);
        let kind = self
            .mapper
            .kind(id)
            .ok_or(LifecycleError::<JsValue>::UnknownInstance(id))
            .map_err(into_js)?;
        let attrs = ShapeAttrs::resolve(kind, &bag_from_js(&attrs)?)
            .ok_or_else(|| JsError::new("Surface roots have no attributes"))?;
        self.mapper.set_attrs(id, attrs).map_err(into_js)
    }

    /// Moves `id` under `parent`.
    #[wasm_bindgen(js_name = setParent)]
    pub fn set_parent(&mut self, id: u32, parent: Option<u32>) -> Result<(), JsValue> {
        self.mapper
            .set_parent(InstanceId::from_raw(id), parent.map(InstanceId::from_raw))
            .map_err(into_js)
    }

    /// Post-mount hook. Returns the new node handle.
    pub fn mount(&mut self, id: u32) -> Result<u32, JsValue> {
        self.mapper
            .mount(InstanceId::from_raw(id))
            .map(|handle| handle.get())
            .map_err(into_js)
    }

    /// Post-update hook. Returns whether a payload was re-sent.
    pub fn update(&mut self, id: u32) -> Result<bool, JsValue> {
        self.mapper
            .update(InstanceId::from_raw(id))
            .map_err(into_js)
    }

    /// Pre-unmount hook.
    pub fn unmount(&mut self, id: u32) -> Result<(), JsValue> {
        self.mapper
            .unmount(InstanceId::from_raw(id))
            .map_err(into_js)
    }

    /// Returns `"unmounted"`, `"mounted"`, `"removed"`, or `undefined`.
    pub fn state(&self, id: u32) -> Option<String> {
        self.mapper
            .state(InstanceId::from_raw(id))
            .map(|state| state_name(state).into())
    }

    /// Returns the node handle of `id` once mounted.
    pub fn handle(&self, id: u32) -> Option<u32> {
        self.mapper
            .handle(InstanceId::from_raw(id))
            .map(|handle| handle.get())
    }
}

/// Core exceptions pass through; everything else becomes an `Error`.
fn into_js(err: LifecycleError<JsValue>) -> JsValue {
    match err {
        LifecycleError::Core(thrown) => thrown,
        other => JsError::new(&other.to_string()).into(),
    }
}

fn serde_to_js(err: serde_json::Error) -> JsValue {
    JsError::new(&err.to_string()).into()
}

/// JSON text of `value`, or `None` for `undefined` and `null`.
fn json_of(value: &JsValue) -> Result<Option<String>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    Ok(Some(js_sys::JSON::stringify(value)?.into()))
}

fn bag_from_js(value: &JsValue) -> Result<AttributeBag, JsValue> {
    match json_of(value)? {
        Some(json) => bag_from_json(&json).map_err(serde_to_js),
        None => Ok(AttributeBag::new()),
    }
}

/// Missing sections and fields take their defaults.
fn parse_config(json: Option<&str>) -> Result<BridgeConfig, serde_json::Error> {
    match json {
        Some(json) => serde_json::from_str(json),
        None => Ok(BridgeConfig::default()),
    }
}

/// Keeps the numeric entries of a JSON object.
fn bag_from_json(json: &str) -> Result<AttributeBag, serde_json::Error> {
    let entries: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;
    Ok(entries
        .into_iter()
        .filter_map(|(key, value)| value.as_f64().map(|v| (key, v)))
        .collect())
}

const fn state_name(state: LifecycleState) -> &'static str {
    match state {
        LifecycleState::Unmounted => "unmounted",
        LifecycleState::Mounted => "mounted",
        LifecycleState::Removed => "removed",
    }
}
