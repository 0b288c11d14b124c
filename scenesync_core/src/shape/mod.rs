// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape kinds, typed attributes, and the descriptor serializer.
//!
//! A host hands attributes over as an untyped [`AttributeBag`].
//! [`ShapeAttrs::resolve`] turns that bag into a typed, per-kind attribute
//! struct once, at the boundary. From there, [`serialize`] is a pure total
//! function from [`ShapeAttrs`] to an optional [`ShapeDescriptor`], which is
//! the normalized payload a rendering core receives through
//! [`set_shape_by_serde`](crate::protocol::RenderingCore::set_shape_by_serde).
//!
//! Only [`Rect`](ShapeKind::Rect) and [`Circle`](ShapeKind::Circle) produce a
//! descriptor. The other declarable kinds mount as bare nodes with no payload.

mod attrs;
mod descriptor;

pub use attrs::{
    AttributeBag, CircleAttrs, RectAttrs, Rgba, RoundRectAttrs, ShapeAttrs, ShapeKind,
    TriangleAttrs,
};
pub use descriptor::{
    CirclePayload, DescriptorAttr, NonZeroReservedSlot, RectPayload, ShapeDescriptor, serialize,
};
