// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mutation tracing for the lifecycle mapper.
//!
//! [`MutationSink`] has one method per event, all defaulting to no-ops, so a
//! sink only implements what it cares about. The
//! [`Mapper`](crate::lifecycle::Mapper) owns a [`Tracer`] and reports every
//! protocol call it issues, every shape it skips, and every failed root
//! resolution.
//!
//! When the `trace` feature is **off**, every `Tracer` method compiles to
//! nothing. When **on**, each method performs a single `Option` branch before
//! dispatching.
//!
//! Independently of this module, the mapper emits `tracing` log lines, so a
//! host with a `tracing` subscriber sees the same activity without installing
//! a sink.

use alloc::boxed::Box;

use crate::lifecycle::{LifecycleOp, UpdatePolicy};
use crate::node::{CoreId, InstanceId, NodeHandle};
use crate::shape::ShapeKind;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after `createChildAppendToContainer` was accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreateEvent {
    /// Component that mounted.
    pub instance: InstanceId,
    /// Core that received the call.
    pub core: CoreId,
    /// Freshly allocated handle.
    pub handle: NodeHandle,
    /// Structural parent captured for the later removal.
    pub parent: NodeHandle,
    /// Position argument that was sent.
    pub index: usize,
    /// Kind of the mounted component.
    pub kind: ShapeKind,
}

/// Emitted after `setShapeBySerde` was accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetShapeEvent {
    /// Component whose payload was sent.
    pub instance: InstanceId,
    /// Target node.
    pub handle: NodeHandle,
    /// Kind of the payload.
    pub kind: ShapeKind,
    /// Which transition sent it.
    pub op: LifecycleOp,
}

/// Emitted when a mounted kind has no descriptor and no payload is sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeSkippedEvent {
    /// Component that mounted.
    pub instance: InstanceId,
    /// Its node.
    pub handle: NodeHandle,
    /// The kind without a descriptor.
    pub kind: ShapeKind,
}

/// Emitted after `removeChildFromContainer` was accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemoveEvent {
    /// Component that unmounted.
    pub instance: InstanceId,
    /// Core that received the call.
    pub core: CoreId,
    /// Removed node.
    pub handle: NodeHandle,
    /// Parent handle captured at mount.
    pub parent: NodeHandle,
}

/// Emitted for every update of a mounted component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdateEvent {
    /// Component that updated.
    pub instance: InstanceId,
    /// Its node.
    pub handle: NodeHandle,
    /// Policy in force.
    pub policy: UpdatePolicy,
    /// Whether a payload was re-sent.
    pub resent: bool,
}

/// Emitted when no rendering core is reachable from a component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolveFailedEvent {
    /// Component whose ancestry has no Surface root.
    pub instance: InstanceId,
    /// Transition that was aborted.
    pub op: LifecycleOp,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives mapper events. Every method defaults to a no-op.
pub trait MutationSink {
    /// A node was created.
    fn on_create(&mut self, e: &CreateEvent) {
        _ = e;
    }

    /// A payload was sent.
    fn on_set_shape(&mut self, e: &SetShapeEvent) {
        _ = e;
    }

    /// A mounted kind had no payload to send.
    fn on_shape_skipped(&mut self, e: &ShapeSkippedEvent) {
        _ = e;
    }

    /// A node was removed.
    fn on_remove(&mut self, e: &RemoveEvent) {
        _ = e;
    }

    /// A mounted component updated.
    fn on_update(&mut self, e: &UpdateEvent) {
        _ = e;
    }

    /// Root resolution failed and a transition was aborted.
    fn on_resolve_failed(&mut self, e: &ResolveFailedEvent) {
        _ = e;
    }
}

/// A sink that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl MutationSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer
// ---------------------------------------------------------------------------

/// Owner of an optional [`MutationSink`].
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn MutationSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::none()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to `sink`.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn MutationSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            drop(sink);
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub const fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {}
        }
    }

    /// Returns `true` if events reach a sink.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    /// Emits a [`CreateEvent`].
    #[inline]
    pub fn create(&mut self, e: &CreateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_create(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SetShapeEvent`].
    #[inline]
    pub fn set_shape(&mut self, e: &SetShapeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_set_shape(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ShapeSkippedEvent`].
    #[inline]
    pub fn shape_skipped(&mut self, e: &ShapeSkippedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_shape_skipped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RemoveEvent`].
    #[inline]
    pub fn remove(&mut self, e: &RemoveEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_remove(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`UpdateEvent`].
    #[inline]
    pub fn update(&mut self, e: &UpdateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_update(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ResolveFailedEvent`].
    #[inline]
    pub fn resolve_failed(&mut self, e: &ResolveFailedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_resolve_failed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_create() -> CreateEvent {
        CreateEvent {
            instance: InstanceId(3),
            core: CoreId(0),
            handle: NodeHandle(1),
            parent: NodeHandle::ROOT,
            index: 0,
            kind: ShapeKind::Rect,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_create(&sample_create());
        sink.on_resolve_failed(&ResolveFailedEvent {
            instance: InstanceId(0),
            op: LifecycleOp::Mount,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        assert!(!tracer.is_active());
        tracer.create(&sample_create());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::rc::Rc;
        use alloc::vec::Vec;
        use core::cell::RefCell;

        struct RecordingSink {
            handles: Rc<RefCell<Vec<NodeHandle>>>,
        }
        impl MutationSink for RecordingSink {
            fn on_create(&mut self, e: &CreateEvent) {
                self.handles.borrow_mut().push(e.handle);
            }
        }

        let handles = Rc::new(RefCell::new(Vec::new()));
        let mut tracer = Tracer::new(Box::new(RecordingSink {
            handles: Rc::clone(&handles),
        }));
        assert!(tracer.is_active());
        tracer.create(&sample_create());
        tracer.remove(&RemoveEvent {
            instance: InstanceId(3),
            core: CoreId(0),
            handle: NodeHandle(1),
            parent: NodeHandle::ROOT,
        });
        assert_eq!(*handles.borrow(), [NodeHandle(1)]);
    }
}
