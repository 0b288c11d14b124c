// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The lifecycle mapper.

use alloc::vec;
use alloc::vec::Vec;

use super::{LifecycleError, LifecycleOp, LifecycleState, MapperConfig, UpdatePolicy};
use crate::node::{CoreId, InstanceId, NodeHandle, NodeIdAllocator};
use crate::protocol::RenderingCore;
use crate::shape::{ShapeAttrs, ShapeKind, serialize};
use crate::trace::{
    CreateEvent, RemoveEvent, ResolveFailedEvent, SetShapeEvent, ShapeSkippedEvent, Tracer,
    UpdateEvent,
};

#[derive(Clone, Copy, Debug)]
enum Role {
    /// Root carrying an attached core.
    Surface(CoreId),
    Shape(ShapeAttrs),
}

/// Where a mounted component lives, captured once at mount.
#[derive(Clone, Copy, Debug)]
struct Placement {
    core: CoreId,
    handle: NodeHandle,
    parent: NodeHandle,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Unmounted,
    Mounted(Placement),
    Removed(Placement),
}

impl Phase {
    const fn state(self) -> LifecycleState {
        match self {
            Self::Unmounted => LifecycleState::Unmounted,
            Self::Mounted(_) => LifecycleState::Mounted,
            Self::Removed(_) => LifecycleState::Removed,
        }
    }

    const fn placement(self) -> Option<Placement> {
        match self {
            Self::Unmounted => None,
            Self::Mounted(p) | Self::Removed(p) => Some(p),
        }
    }
}

#[derive(Clone, Debug)]
struct Instance {
    role: Role,
    parent: Option<InstanceId>,
    /// Structural children, in declaration order.
    children: Vec<InstanceId>,
    /// Core inherited from the parent at declaration, if it had one.
    capability: Option<CoreId>,
    phase: Phase,
}

/// Mirrors a host component tree and translates its lifecycle events into
/// [`RenderingCore`] calls.
///
/// The mapper owns the [`NodeIdAllocator`], so handles are unique across
/// every core it drives. Cores are attached as Surface roots and addressed by
/// [`CoreId`].
///
/// Each declared component inherits its parent's core when it is declared.
/// Components declared before their Surface was reachable fall back to walking
/// the parent chain on their next transition. So does every component below
/// one that is moved with [`set_parent`](Self::set_parent) or unmounted.
#[derive(Debug)]
pub struct Mapper<C> {
    ids: NodeIdAllocator,
    instances: Vec<Instance>,
    cores: Vec<C>,
    config: MapperConfig,
    tracer: Tracer,
}

impl<C: RenderingCore> Default for Mapper<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: RenderingCore> Mapper<C> {
    /// Creates a mapper with [`MapperConfig::default`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_config(MapperConfig::literal())
    }

    /// Creates a mapper with the given configuration.
    #[must_use]
    pub const fn with_config(config: MapperConfig) -> Self {
        Self {
            ids: NodeIdAllocator::new(),
            instances: Vec::new(),
            cores: Vec::new(),
            config,
            tracer: Tracer::none(),
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Replaces the tracer.
    pub fn set_tracer(&mut self, tracer: Tracer) {
        self.tracer = tracer;
    }

    /// Returns the number of mirrored components, Surface roots included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns `true` if nothing has been attached or declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    // -----------------------------------------------------------------------
    // Declaration
    // -----------------------------------------------------------------------

    /// Attaches `core` as a new Surface root.
    ///
    /// The root is Mounted from the start and holds [`NodeHandle::ROOT`].
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` cores or components are attached.
    pub fn attach_surface(&mut self, core: C) -> InstanceId {
        let core_id = CoreId(u32::try_from(self.cores.len()).expect("too many rendering cores"));
        self.cores.push(core);
        self.push(Instance {
            role: Role::Surface(core_id),
            parent: None,
            children: Vec::new(),
            capability: Some(core_id),
            phase: Phase::Mounted(Placement {
                core: core_id,
                handle: NodeHandle::ROOT,
                parent: NodeHandle::ROOT,
            }),
        })
    }

    /// Declares an Unmounted component under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` components are declared.
    pub fn declare(
        &mut self,
        attrs: ShapeAttrs,
        parent: Option<InstanceId>,
    ) -> Result<InstanceId, LifecycleError<C::Error>> {
        let capability = match parent {
            Some(p) => self.instance(p)?.capability,
            None => None,
        };
        let id = self.push(Instance {
            role: Role::Shape(attrs),
            parent: None,
            children: Vec::new(),
            capability,
            phase: Phase::Unmounted,
        });
        self.link(id, parent);
        Ok(id)
    }

    /// Moves `id` under `parent`.
    ///
    /// A Mounted component keeps the core and parent handle captured at its
    /// mount; reparenting only affects roots resolved afterwards.
    pub fn set_parent(
        &mut self,
        id: InstanceId,
        parent: Option<InstanceId>,
    ) -> Result<(), LifecycleError<C::Error>> {
        if let Role::Surface(_) = self.instance(id)?.role {
            return Err(LifecycleError::SurfaceRoot(id));
        }
        if let Some(p) = parent {
            let mut cursor = Some(p);
            while let Some(current) = cursor {
                if current == id {
                    return Err(LifecycleError::ParentCycle { id, parent: p });
                }
                cursor = self.instance(current)?.parent;
            }
        }

        self.unlink(id);
        self.link(id, parent);
        self.invalidate_subtree(id);
        Ok(())
    }

    /// Replaces the attributes of `id`. The kind cannot change.
    ///
    /// Mounted components only see the new attributes on the next
    /// [`update`](Self::update), and only under [`UpdatePolicy::Resend`].
    pub fn set_attrs(
        &mut self,
        id: InstanceId,
        attrs: ShapeAttrs,
    ) -> Result<(), LifecycleError<C::Error>> {
        let expected = match self.instance(id)?.role {
            Role::Surface(_) => ShapeKind::Surface,
            Role::Shape(current) => current.kind(),
        };
        if expected != attrs.kind() {
            return Err(LifecycleError::KindMismatch {
                id,
                expected,
                found: attrs.kind(),
            });
        }
        self.instances[id.0 as usize].role = Role::Shape(attrs);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Returns the lifecycle state of `id`.
    #[must_use]
    pub fn state(&self, id: InstanceId) -> Option<LifecycleState> {
        self.get(id).map(|i| i.phase.state())
    }

    /// Returns the kind of `id`.
    #[must_use]
    pub fn kind(&self, id: InstanceId) -> Option<ShapeKind> {
        self.get(id).map(|i| match i.role {
            Role::Surface(_) => ShapeKind::Surface,
            Role::Shape(attrs) => attrs.kind(),
        })
    }

    /// Returns the current attributes of `id`. `None` for Surface roots.
    #[must_use]
    pub fn attrs(&self, id: InstanceId) -> Option<&ShapeAttrs> {
        match &self.get(id)?.role {
            Role::Surface(_) => None,
            Role::Shape(attrs) => Some(attrs),
        }
    }

    /// Returns the structural parent of `id`.
    #[must_use]
    pub fn parent(&self, id: InstanceId) -> Option<InstanceId> {
        self.get(id)?.parent
    }

    /// Returns the node handle of `id` once it has been mounted.
    ///
    /// Removed components keep reporting the handle they had.
    #[must_use]
    pub fn handle(&self, id: InstanceId) -> Option<NodeHandle> {
        self.get(id)?.phase.placement().map(|p| p.handle)
    }

    /// Returns the parent handle captured when `id` was mounted.
    #[must_use]
    pub fn parent_handle(&self, id: InstanceId) -> Option<NodeHandle> {
        self.get(id)?.phase.placement().map(|p| p.parent)
    }

    /// Returns the core holding the node of `id`, or the core it inherited
    /// if it has not been mounted.
    #[must_use]
    pub fn core_of(&self, id: InstanceId) -> Option<CoreId> {
        let instance = self.get(id)?;
        instance
            .phase
            .placement()
            .map(|p| p.core)
            .or(instance.capability)
    }

    /// Returns an attached core.
    #[must_use]
    pub fn core(&self, id: CoreId) -> Option<&C> {
        self.cores.get(id.0 as usize)
    }

    /// Returns an attached core mutably.
    pub fn core_mut(&mut self, id: CoreId) -> Option<&mut C> {
        self.cores.get_mut(id.0 as usize)
    }

    /// Finds the rendering core that owns `id` by walking its parent chain
    /// up to a Surface root.
    pub fn resolve_core(&self, id: InstanceId) -> Result<CoreId, LifecycleError<C::Error>> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let instance = self.instance(current)?;
            if let Role::Surface(core) = instance.role {
                return Ok(core);
            }
            cursor = instance.parent;
        }
        Err(LifecycleError::NoSurfaceRoot(id))
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Unmounted → Mounted.
    ///
    /// Issues `createChildAppendToContainer` with the configured insertion
    /// index, then `setShapeBySerde` if the kind has a descriptor. Returns the
    /// new handle.
    ///
    /// If no Surface root is reachable, returns
    /// [`NoSurfaceRoot`](LifecycleError::NoSurfaceRoot) before any handle is
    /// allocated or any call is issued. If the core rejects the create, the
    /// handle is consumed and the component stays Unmounted. If it rejects the
    /// payload, the component is already Mounted.
    pub fn mount(&mut self, id: InstanceId) -> Result<NodeHandle, LifecycleError<C::Error>> {
        let instance = self.instance(id)?;
        let Role::Shape(attrs) = instance.role else {
            return Err(LifecycleError::SurfaceRoot(id));
        };
        if !matches!(instance.phase, Phase::Unmounted) {
            return Err(LifecycleError::InvalidTransition {
                id,
                op: LifecycleOp::Mount,
                state: instance.phase.state(),
            });
        }

        let core = self.root_for(id, LifecycleOp::Mount)?;
        let parent = self.nearest_handle(id).unwrap_or(NodeHandle::ROOT);
        let handle = self.ids.allocate();
        let index = self.config.insertion_index;

        self.cores[core.0 as usize]
            .create_child_append_to_container(handle, index)
            .map_err(LifecycleError::Core)?;
        self.instances[id.0 as usize].phase = Phase::Mounted(Placement {
            core,
            handle,
            parent,
        });
        tracing::debug!(
            instance = id.index(),
            handle = handle.get(),
            parent = parent.get(),
            index,
            "createChildAppendToContainer"
        );
        self.tracer.create(&CreateEvent {
            instance: id,
            core,
            handle,
            parent,
            index,
            kind: attrs.kind(),
        });

        self.send_shape(id, core, handle, &attrs, LifecycleOp::Mount)?;
        Ok(handle)
    }

    /// Mounted → Mounted.
    ///
    /// Resolves the root again. Under [`UpdatePolicy::Ignore`] nothing else
    /// happens; under [`UpdatePolicy::Resend`] the current attributes are
    /// re-serialized and sent. Returns whether a payload was sent.
    pub fn update(&mut self, id: InstanceId) -> Result<bool, LifecycleError<C::Error>> {
        let instance = self.instance(id)?;
        let Role::Shape(attrs) = instance.role else {
            return Err(LifecycleError::SurfaceRoot(id));
        };
        let Phase::Mounted(placement) = instance.phase else {
            return Err(LifecycleError::InvalidTransition {
                id,
                op: LifecycleOp::Update,
                state: instance.phase.state(),
            });
        };

        self.root_for(id, LifecycleOp::Update)?;
        let policy = self.config.update_policy;
        let resent = match policy {
            UpdatePolicy::Ignore => {
                tracing::trace!(instance = id.index(), "update ignored");
                false
            }
            UpdatePolicy::Resend => self.send_shape(
                id,
                placement.core,
                placement.handle,
                &attrs,
                LifecycleOp::Update,
            )?,
        };
        self.tracer.update(&UpdateEvent {
            instance: id,
            handle: placement.handle,
            policy,
            resent,
        });
        Ok(resent)
    }

    /// Mounted → Removed.
    ///
    /// Issues `removeChildFromContainer` against the core and with the parent
    /// handle captured at mount. The component's ancestry is discarded, and
    /// components declared below it must resolve their core again. If the
    /// core rejects the call, the component stays Mounted.
    pub fn unmount(&mut self, id: InstanceId) -> Result<(), LifecycleError<C::Error>> {
        let instance = self.instance(id)?;
        if let Role::Surface(_) = instance.role {
            return Err(LifecycleError::SurfaceRoot(id));
        }
        let Phase::Mounted(placement) = instance.phase else {
            return Err(LifecycleError::InvalidTransition {
                id,
                op: LifecycleOp::Unmount,
                state: instance.phase.state(),
            });
        };

        self.cores[placement.core.0 as usize]
            .remove_child_from_container(placement.handle, placement.parent)
            .map_err(LifecycleError::Core)?;

        self.instances[id.0 as usize].phase = Phase::Removed(placement);
        self.unlink(id);
        self.invalidate_subtree(id);
        tracing::debug!(
            instance = id.index(),
            handle = placement.handle.get(),
            parent = placement.parent.get(),
            "removeChildFromContainer"
        );
        self.tracer.remove(&RemoveEvent {
            instance: id,
            core: placement.core,
            handle: placement.handle,
            parent: placement.parent,
        });
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn push(&mut self, instance: Instance) -> InstanceId {
        let id = InstanceId(u32::try_from(self.instances.len()).expect("too many components"));
        self.instances.push(instance);
        id
    }

    fn link(&mut self, id: InstanceId, parent: Option<InstanceId>) {
        self.instances[id.0 as usize].parent = parent;
        if let Some(p) = parent {
            self.instances[p.0 as usize].children.push(id);
        }
    }

    fn unlink(&mut self, id: InstanceId) {
        if let Some(p) = self.instances[id.0 as usize].parent.take() {
            self.instances[p.0 as usize].children.retain(|&c| c != id);
        }
    }

    /// Drops the cached core of `id` and everything declared below it.
    fn invalidate_subtree(&mut self, id: InstanceId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let instance = &mut self.instances[current.0 as usize];
            if let Role::Shape(_) = instance.role {
                instance.capability = None;
            }
            stack.extend_from_slice(&instance.children);
        }
    }

    fn get(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(id.0 as usize)
    }

    fn instance(&self, id: InstanceId) -> Result<&Instance, LifecycleError<C::Error>> {
        self.get(id).ok_or(LifecycleError::UnknownInstance(id))
    }

    /// Uses the inherited capability, or walks the chain and caches the result.
    fn root_for(
        &mut self,
        id: InstanceId,
        op: LifecycleOp,
    ) -> Result<CoreId, LifecycleError<C::Error>> {
        if let Some(core) = self.instance(id)?.capability {
            return Ok(core);
        }
        match self.resolve_core(id) {
            Ok(core) => {
                self.instances[id.0 as usize].capability = Some(core);
                Ok(core)
            }
            Err(err) => {
                tracing::warn!(
                    instance = id.index(),
                    op = op.name(),
                    "no Surface root in ancestry"
                );
                self.tracer
                    .resolve_failed(&ResolveFailedEvent { instance: id, op });
                Err(err)
            }
        }
    }

    /// Handle of the nearest Mounted ancestor of `id`.
    fn nearest_handle(&self, id: InstanceId) -> Option<NodeHandle> {
        let mut cursor = self.get(id)?.parent;
        while let Some(current) = cursor {
            let instance = self.get(current)?;
            if let Phase::Mounted(placement) = instance.phase {
                return Some(placement.handle);
            }
            cursor = instance.parent;
        }
        None
    }

    fn send_shape(
        &mut self,
        id: InstanceId,
        core: CoreId,
        handle: NodeHandle,
        attrs: &ShapeAttrs,
        op: LifecycleOp,
    ) -> Result<bool, LifecycleError<C::Error>> {
        let kind = attrs.kind();
        let Some(descriptor) = serialize(attrs) else {
            if op == LifecycleOp::Mount {
                tracing::trace!(
                    instance = id.index(),
                    kind = kind.name(),
                    "no descriptor for kind"
                );
                self.tracer.shape_skipped(&ShapeSkippedEvent {
                    instance: id,
                    handle,
                    kind,
                });
            }
            return Ok(false);
        };

        self.cores[core.0 as usize]
            .set_shape_by_serde(handle, &descriptor)
            .map_err(LifecycleError::Core)?;
        tracing::debug!(
            instance = id.index(),
            handle = handle.get(),
            kind = kind.name(),
            "setShapeBySerde"
        );
        self.tracer.set_shape(&SetShapeEvent {
            instance: id,
            handle,
            kind,
            op,
        });
        Ok(true)
    }
}
