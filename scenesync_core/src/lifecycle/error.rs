// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

use super::{LifecycleOp, LifecycleState};
use crate::node::InstanceId;
use crate::shape::ShapeKind;

/// A lifecycle transition that could not be carried out.
///
/// `E` is the rendering core's own error type; core rejections are passed
/// through untranslated in [`Core`](Self::Core).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LifecycleError<E> {
    /// No ancestor of the component carries a rendering core. The component
    /// was placed outside a Surface root; no protocol call was issued.
    #[error("{0:?} has no Surface root in its ancestry")]
    NoSurfaceRoot(InstanceId),
    /// The id was never issued by this mapper.
    #[error("unknown component instance {0:?}")]
    UnknownInstance(InstanceId),
    /// Surface roots are attached and detached by the host, not driven
    /// through lifecycle transitions.
    #[error("{0:?} is a Surface root")]
    SurfaceRoot(InstanceId),
    /// Reparenting would make the component its own ancestor.
    #[error("{id:?} cannot be placed under its descendant {parent:?}")]
    ParentCycle {
        /// Component being moved.
        id: InstanceId,
        /// Rejected parent.
        parent: InstanceId,
    },
    /// The transition is not valid from the component's current state.
    #[error("cannot {op} {id:?} while {state:?}")]
    InvalidTransition {
        /// Component.
        id: InstanceId,
        /// Attempted transition.
        op: LifecycleOp,
        /// State it was in.
        state: LifecycleState,
    },
    /// New attributes belong to a different kind than the component.
    #[error("{id:?} is a {expected}, not a {found}")]
    KindMismatch {
        /// Component.
        id: InstanceId,
        /// Its declared kind.
        expected: ShapeKind,
        /// Kind of the rejected attributes.
        found: ShapeKind,
    },
    /// The rendering core rejected a protocol call.
    #[error("rendering core rejected a mutation: {0:?}")]
    Core(E),
}

impl<E> LifecycleError<E> {
    /// Converts the core error with `f`, leaving other variants unchanged.
    pub fn map_core<F, G: FnOnce(E) -> F>(self, f: G) -> LifecycleError<F> {
        match self {
            Self::NoSurfaceRoot(id) => LifecycleError::NoSurfaceRoot(id),
            Self::UnknownInstance(id) => LifecycleError::UnknownInstance(id),
            Self::SurfaceRoot(id) => LifecycleError::SurfaceRoot(id),
            Self::ParentCycle { id, parent } => LifecycleError::ParentCycle { id, parent },
            Self::InvalidTransition { id, op, state } => {
                LifecycleError::InvalidTransition { id, op, state }
            }
            Self::KindMismatch {
                id,
                expected,
                found,
            } => LifecycleError::KindMismatch {
                id,
                expected,
                found,
            },
            Self::Core(e) => LifecycleError::Core(f(e)),
        }
    }
}
