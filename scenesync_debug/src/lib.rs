// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, JSON export, and tree outlines for scenesync
//! diagnostics.
//!
//! - [`pretty::PrettyPrintSink`]: a
//!   [`MutationSink`](scenesync_core::trace::MutationSink) that writes one
//!   line per mapper event.
//! - [`json::export`]: writes a recorded
//!   [`MutationLog`](scenesync_core::protocol::MutationLog) as a JSON array
//!   keyed by wire method name.
//! - [`outline::render`]: an indented listing of a
//!   [`RetainedTree`](scenesync_core::tree::RetainedTree).

pub mod json;
pub mod outline;
pub mod pretty;
