// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle-to-mutation mapping.
//!
//! The [`Mapper`] mirrors the host framework's component tree. Each component
//! is a [`LifecycleState`] machine:
//!
//! ```text
//!   Unmounted ──mount──▶ Mounted ──unmount──▶ Removed
//!                          │  ▲
//!                          └──┘ update
//! ```
//!
//! Every transition is translated into at most two calls against the
//! [`RenderingCore`](crate::protocol::RenderingCore) that owns the
//! component's Surface root:
//!
//! | Transition | Calls |
//! |---|---|
//! | mount | `createChildAppendToContainer`, then `setShapeBySerde` for Rect and Circle |
//! | update | none, or `setShapeBySerde` under [`UpdatePolicy::Resend`] |
//! | unmount | `removeChildFromContainer` with the parent handle captured at mount |
//!
//! Surface roots are attached with [`Mapper::attach_surface`] and start out
//! Mounted, holding [`NodeHandle::ROOT`](crate::node::NodeHandle::ROOT).
//! Their own lifecycle belongs to the host.

mod config;
mod error;
mod mapper;

use core::fmt;

pub use config::{MapperConfig, UpdatePolicy};
pub use error::LifecycleError;
pub use mapper::Mapper;

/// Lifecycle state of a mirrored component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Declared but not yet in the retained tree.
    Unmounted,
    /// Has a node in the retained tree.
    Mounted,
    /// Its node was removed. Terminal.
    Removed,
}

/// A lifecycle transition requested by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleOp {
    /// Post-mount hook.
    Mount,
    /// Post-update hook.
    Update,
    /// Pre-unmount hook.
    Unmount,
}

impl LifecycleOp {
    /// Returns the lowercase hook name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mount => "mount",
            Self::Update => "update",
            Self::Unmount => "unmount",
        }
    }
}

impl fmt::Display for LifecycleOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
