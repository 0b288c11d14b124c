// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! WebAssembly bindings for scenesync.
//!
//! - [`JsCore`]: a JavaScript object implementing the mutation protocol,
//!   usable as a [`RenderingCore`](scenesync_core::protocol::RenderingCore).
//! - [`WasmRetainedTree`]: the reference
//!   [`RetainedTree`](scenesync_core::tree::RetainedTree), exported under the
//!   protocol's JavaScript method names so it can stand in for a native core.
//! - [`SceneBridge`]: the lifecycle mapper and component registry, for hosts
//!   that drive components from JavaScript.
//!
//! The exports only work on `wasm32`. The parsing and tree helpers behind them
//! are plain Rust and are tested natively.

#![no_std]

extern crate alloc;

mod bridge;
mod js_core;
mod tree;

pub use bridge::SceneBridge;
pub use js_core::JsCore;
pub use tree::WasmRetainedTree;
