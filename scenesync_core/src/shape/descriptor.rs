// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The normalized shape payload and the serializer that produces it.
//!
//! The wire shape is fixed by the rendering core:
//!
//! ```text
//! { "field2": [[0]], "field3": [0, 0, 0, 0], "attr": { "R": { ... } } }
//! ```
//!
//! `field2` and `field3` are reserved transform and bounds slots. They are
//! always present and always zero; deserializing a descriptor with a non-zero
//! slot fails with [`NonZeroReservedSlot`]. `attr` is externally tagged and
//! carries exactly one populated variant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::attrs::{CircleAttrs, RectAttrs, ShapeAttrs};

/// A serialized shape payload accepted by
/// [`RenderingCore::set_shape_by_serde`](crate::protocol::RenderingCore::set_shape_by_serde).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WireDescriptor")]
pub struct ShapeDescriptor {
    #[serde(rename = "field2")]
    transform: [[u32; 1]; 1],
    #[serde(rename = "field3")]
    bounds: [u32; 4],
    attr: DescriptorAttr,
}

/// A descriptor whose `field2` or `field3` slot is not zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("reserved descriptor slots `field2` and `field3` must be zero")]
pub struct NonZeroReservedSlot;

/// Descriptor as read off the wire, before the reserved slots are checked.
#[derive(Deserialize)]
struct WireDescriptor {
    #[serde(rename = "field2", default)]
    transform: [[u32; 1]; 1],
    #[serde(rename = "field3", default)]
    bounds: [u32; 4],
    attr: DescriptorAttr,
}

impl TryFrom<WireDescriptor> for ShapeDescriptor {
    type Error = NonZeroReservedSlot;

    fn try_from(wire: WireDescriptor) -> Result<Self, Self::Error> {
        if wire.transform != [[0]] || wire.bounds != [0; 4] {
            return Err(NonZeroReservedSlot);
        }
        Ok(Self::new(wire.attr))
    }
}

impl ShapeDescriptor {
    /// Wraps `attr` with zeroed reserved slots.
    #[must_use]
    pub const fn new(attr: DescriptorAttr) -> Self {
        Self {
            transform: [[0]],
            bounds: [0; 4],
            attr,
        }
    }

    /// Returns the populated payload.
    #[must_use]
    pub const fn attr(&self) -> &DescriptorAttr {
        &self.attr
    }

    /// Consumes the descriptor and returns its payload.
    #[must_use]
    pub fn into_attr(self) -> DescriptorAttr {
        self.attr
    }
}

/// The tagged payload of a [`ShapeDescriptor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DescriptorAttr {
    /// Rectangle payload.
    R(RectPayload),
    /// Circle payload.
    C(CirclePayload),
}

/// Wire form of a rectangle.
///
/// Unresolved coordinates are omitted; unresolved colour channels are `null`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RectPayload {
    /// Left edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<u32>,
    /// Top edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<u32>,
    /// Width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// `[r, g, b, a]`.
    #[serde(default)]
    pub color: [Option<u8>; 4],
}

/// Wire form of a circle.
///
/// Unresolved coordinates are omitted; unresolved colour channels are `null`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CirclePayload {
    /// Centre x.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cx: Option<u32>,
    /// Centre y.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cy: Option<u32>,
    /// Radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<u32>,
    /// `[r, g, b, a]`.
    #[serde(default)]
    pub color: [Option<u8>; 4],
}

impl From<&RectAttrs> for RectPayload {
    fn from(attrs: &RectAttrs) -> Self {
        Self {
            x: attrs.x,
            y: attrs.y,
            width: attrs.width,
            height: attrs.height,
            color: attrs.color.channels(),
        }
    }
}

impl From<&CircleAttrs> for CirclePayload {
    fn from(attrs: &CircleAttrs) -> Self {
        Self {
            cx: attrs.cx,
            cy: attrs.cy,
            r: attrs.radius,
            color: attrs.color.channels(),
        }
    }
}

/// Serializes typed attributes into a descriptor.
///
/// Returns `None` for kinds the rendering core has no payload for (Layer,
/// Triangle, RoundRect); such nodes are created but never receive a shape.
/// Attributes are passed through as-is: nothing is validated or defaulted.
#[must_use]
pub fn serialize(attrs: &ShapeAttrs) -> Option<ShapeDescriptor> {
    let attr = match attrs {
        ShapeAttrs::Rect(rect) => DescriptorAttr::R(rect.into()),
        ShapeAttrs::Circle(circle) => DescriptorAttr::C(circle.into()),
        ShapeAttrs::Layer | ShapeAttrs::Triangle(_) | ShapeAttrs::RoundRect(_) => return None,
    };
    Some(ShapeDescriptor::new(attr))
}
