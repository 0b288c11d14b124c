// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keeps a rendering core's retained scene graph in step with a host
//! component tree.
//!
//! `scenesync_core` translates the mount, update, and unmount hooks of
//! declarative shape components into incremental calls against a
//! [`RenderingCore`](protocol::RenderingCore). It is `no_std` compatible
//! (with `alloc`) and does no rendering of its own.
//!
//! # Architecture
//!
//! ```text
//!   Host framework (lifecycle hooks)
//!       │
//!       ▼
//!   Registry::lookup() ──► ShapeAttrs::resolve() ──► Mapper::declare()
//!                                                         │
//!                 ┌───────────────────────────────────────┘
//!                 ▼
//!   Mapper::mount() / update() / unmount()
//!       │   NodeIdAllocator ──► NodeHandle
//!       │   serialize() ──► ShapeDescriptor
//!       ▼
//!   RenderingCore (createChildAppendToContainer,
//!                  setShapeBySerde, removeChildFromContainer)
//! ```
//!
//! **[`node`]**: Node handles, instance and core ids, and the handle
//! allocators.
//!
//! **[`shape`]**: The closed set of shape kinds, their typed attributes, and
//! the descriptor serializer.
//!
//! **[`protocol`]**: The three-call [`RenderingCore`](protocol::RenderingCore)
//! contract, plus a recording [`MutationLog`](protocol::MutationLog).
//!
//! **[`lifecycle`]**: The [`Mapper`](lifecycle::Mapper) state machine and root
//! resolution.
//!
//! **[`tree`]**: [`RetainedTree`](tree::RetainedTree), a struct-of-arrays
//! reference core with change tracking.
//!
//! **[`dirty`]**: Dirty channels used by the reference tree.
//!
//! **[`registry`]**: Component names and their namespaced tags.
//!
//! **[`trace`]**: [`MutationSink`](trace::MutationSink) and the
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod dirty;
pub mod lifecycle;
pub mod node;
pub mod protocol;
pub mod registry;
pub mod shape;
pub mod trace;
pub mod tree;
