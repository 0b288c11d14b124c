// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

use crate::node::NodeHandle;

/// A mutation rejected by [`RetainedTree`](super::RetainedTree).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The handle is already registered.
    #[error("node {0} already exists")]
    DuplicateNode(NodeHandle),
    /// The handle does not name a live node.
    #[error("node {0} does not exist")]
    UnknownNode(NodeHandle),
    /// The container handle does not name a live node or the root.
    #[error("container {0} does not exist")]
    UnknownContainer(NodeHandle),
    /// The root container cannot be removed.
    #[error("the root container cannot be removed")]
    RootNotRemovable,
    /// The root container has no siblings to insert next to.
    #[error("cannot insert next to the root container")]
    RootHasNoSiblings,
}
