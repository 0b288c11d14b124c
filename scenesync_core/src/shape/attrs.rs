// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape kinds and typed per-kind attributes.

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of shape kinds a tree may declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Root that owns a rendering core. Attached, never declared.
    Surface,
    /// Grouping node with no payload.
    Layer,
    /// Three-point polygon.
    Triangle,
    /// Rectangle with a corner radius.
    RoundRect,
    /// Axis-aligned rectangle.
    Rect,
    /// Circle.
    Circle,
}

impl ShapeKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Surface,
        Self::Layer,
        Self::Triangle,
        Self::RoundRect,
        Self::Rect,
        Self::Circle,
    ];

    /// Returns the component name for this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Surface => "Surface",
            Self::Layer => "Layer",
            Self::Triangle => "Triangle",
            Self::RoundRect => "RoundRect",
            Self::Rect => "Rect",
            Self::Circle => "Circle",
        }
    }

    /// Returns `true` if [`serialize`](super::serialize) produces a
    /// descriptor for this kind.
    #[must_use]
    pub const fn has_descriptor(self) -> bool {
        matches!(self, Self::Rect | Self::Circle)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An RGBA colour whose channels may be unresolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red.
    pub r: Option<u8>,
    /// Green.
    pub g: Option<u8>,
    /// Blue.
    pub b: Option<u8>,
    /// Alpha.
    pub a: Option<u8>,
}

impl Rgba {
    /// A colour with every channel resolved.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: Some(r),
            g: Some(g),
            b: Some(b),
            a: Some(a),
        }
    }

    /// Returns the channels in wire order.
    #[must_use]
    pub const fn channels(self) -> [Option<u8>; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns `true` if every channel is resolved.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.r.is_some() && self.g.is_some() && self.b.is_some() && self.a.is_some()
    }

    fn from_bag(bag: &AttributeBag) -> Self {
        Self {
            r: bag.channel("r"),
            g: bag.channel("g"),
            b: bag.channel("b"),
            a: bag.channel("a"),
        }
    }
}

/// Attributes of a [`Rect`](ShapeKind::Rect).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RectAttrs {
    /// Left edge.
    pub x: Option<u32>,
    /// Top edge.
    pub y: Option<u32>,
    /// Width.
    pub width: Option<u32>,
    /// Height.
    pub height: Option<u32>,
    /// Fill colour.
    pub color: Rgba,
}

impl RectAttrs {
    /// A rectangle with every attribute resolved.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32, color: Rgba) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            color,
        }
    }
}

/// Attributes of a [`Circle`](ShapeKind::Circle).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CircleAttrs {
    /// Centre x.
    pub cx: Option<u32>,
    /// Centre y.
    pub cy: Option<u32>,
    /// Radius.
    pub radius: Option<u32>,
    /// Fill colour.
    pub color: Rgba,
}

impl CircleAttrs {
    /// A circle with every attribute resolved.
    #[must_use]
    pub const fn new(cx: u32, cy: u32, radius: u32, color: Rgba) -> Self {
        Self {
            cx: Some(cx),
            cy: Some(cy),
            radius: Some(radius),
            color,
        }
    }
}

/// Attributes of a [`RoundRect`](ShapeKind::RoundRect).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RoundRectAttrs {
    /// Left edge.
    pub x: Option<u32>,
    /// Top edge.
    pub y: Option<u32>,
    /// Width.
    pub width: Option<u32>,
    /// Height.
    pub height: Option<u32>,
    /// Corner radius.
    pub radius: Option<u32>,
    /// Fill colour.
    pub color: Rgba,
}

/// Attributes of a [`Triangle`](ShapeKind::Triangle).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TriangleAttrs {
    /// Vertices; a vertex is `None` unless both of its coordinates resolved.
    pub points: [Option<[u32; 2]>; 3],
    /// Fill colour.
    pub color: Rgba,
}

/// Typed attributes for every kind a tree can declare.
///
/// [`Surface`](ShapeKind::Surface) has no variant: Surfaces are attached as
/// roots with [`Mapper::attach_surface`](crate::lifecycle::Mapper::attach_surface).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeAttrs {
    /// A grouping layer.
    Layer,
    /// A triangle.
    Triangle(TriangleAttrs),
    /// A rounded rectangle.
    RoundRect(RoundRectAttrs),
    /// A rectangle.
    Rect(RectAttrs),
    /// A circle.
    Circle(CircleAttrs),
}

impl ShapeAttrs {
    /// Returns the kind these attributes belong to.
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Layer => ShapeKind::Layer,
            Self::Triangle(_) => ShapeKind::Triangle,
            Self::RoundRect(_) => ShapeKind::RoundRect,
            Self::Rect(_) => ShapeKind::Rect,
            Self::Circle(_) => ShapeKind::Circle,
        }
    }

    /// Resolves an untyped bag into the attribute struct for `kind`.
    ///
    /// Keys that are missing or whose values are not exact non-negative
    /// integers in range stay `None`; nothing is defaulted. Colour channels
    /// read `r`, `g`, `b`, `a`. A circle's radius reads `radius` and falls back
    /// to `r`, so a bag that only carries `r` uses it for both the radius and
    /// the red channel.
    ///
    /// Returns `None` for [`ShapeKind::Surface`].
    #[must_use]
    pub fn resolve(kind: ShapeKind, bag: &AttributeBag) -> Option<Self> {
        let attrs = match kind {
            ShapeKind::Surface => return None,
            ShapeKind::Layer => Self::Layer,
            ShapeKind::Triangle => Self::Triangle(TriangleAttrs {
                points: [
                    bag.point("x1", "y1"),
                    bag.point("x2", "y2"),
                    bag.point("x3", "y3"),
                ],
                color: Rgba::from_bag(bag),
            }),
            ShapeKind::RoundRect => Self::RoundRect(RoundRectAttrs {
                x: bag.coord("x"),
                y: bag.coord("y"),
                width: bag.coord("width"),
                height: bag.coord("height"),
                radius: bag.coord("radius"),
                color: Rgba::from_bag(bag),
            }),
            ShapeKind::Rect => Self::Rect(RectAttrs {
                x: bag.coord("x"),
                y: bag.coord("y"),
                width: bag.coord("width"),
                height: bag.coord("height"),
                color: Rgba::from_bag(bag),
            }),
            ShapeKind::Circle => Self::Circle(CircleAttrs {
                cx: bag.coord("cx"),
                cy: bag.coord("cy"),
                radius: bag.coord("radius").or_else(|| bag.coord("r")),
                color: Rgba::from_bag(bag),
            }),
        };
        Some(attrs)
    }
}

/// Untyped numeric attributes as supplied by a host framework.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeBag(BTreeMap<String, f64>);

impl AttributeBag {
    /// Creates an empty bag.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.0.insert(key.into(), value);
    }

    /// Returns the raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the bag has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn coord(&self, key: &str) -> Option<u32> {
        let value = self.get(key)?;
        if !(value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX)) {
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "range checked above; fractional values are rejected below"
        )]
        let truncated = value as u32;
        (f64::from(truncated) == value).then_some(truncated)
    }

    fn channel(&self, key: &str) -> Option<u8> {
        self.coord(key).and_then(|v| u8::try_from(v).ok())
    }

    fn point(&self, x: &str, y: &str) -> Option<[u32; 2]> {
        Some([self.coord(x)?, self.coord(y)?])
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for AttributeBag {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_bag() -> AttributeBag {
        [
            ("x", 1.0),
            ("y", 2.0),
            ("width", 3.0),
            ("height", 4.0),
            ("r", 10.0),
            ("g", 20.0),
            ("b", 30.0),
            ("a", 255.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn resolves_complete_rect() {
        let attrs = ShapeAttrs::resolve(ShapeKind::Rect, &rect_bag());
        assert_eq!(
            attrs,
            Some(ShapeAttrs::Rect(RectAttrs::new(
                1,
                2,
                3,
                4,
                Rgba::new(10, 20, 30, 255)
            )))
        );
    }

    #[test]
    fn missing_keys_stay_unresolved() {
        let bag = AttributeBag::new().with("x", 5.0);
        let Some(ShapeAttrs::Rect(rect)) = ShapeAttrs::resolve(ShapeKind::Rect, &bag) else {
            panic!("rect kind resolves to rect attrs");
        };
        assert_eq!(rect.x, Some(5));
        assert_eq!(rect.y, None);
        assert_eq!(rect.width, None);
        assert!(!rect.color.is_complete());
    }

    #[test]
    fn non_integral_values_stay_unresolved() {
        let bag = AttributeBag::new()
            .with("x", 1.5)
            .with("y", -1.0)
            .with("width", f64::NAN)
            .with("height", f64::INFINITY)
            .with("r", 256.0);
        let Some(ShapeAttrs::Rect(rect)) = ShapeAttrs::resolve(ShapeKind::Rect, &bag) else {
            panic!("rect kind resolves to rect attrs");
        };
        assert_eq!(rect, RectAttrs::default());
    }

    #[test]
    fn circle_radius_falls_back_to_r() {
        let bag = AttributeBag::new()
            .with("cx", 5.0)
            .with("cy", 6.0)
            .with("r", 7.0);
        let Some(ShapeAttrs::Circle(circle)) = ShapeAttrs::resolve(ShapeKind::Circle, &bag) else {
            panic!("circle kind resolves to circle attrs");
        };
        assert_eq!(circle.radius, Some(7));
        assert_eq!(circle.color.r, Some(7));
    }

    #[test]
    fn circle_radius_key_wins_over_r() {
        let bag = AttributeBag::new().with("radius", 9.0).with("r", 7.0);
        let Some(ShapeAttrs::Circle(circle)) = ShapeAttrs::resolve(ShapeKind::Circle, &bag) else {
            panic!("circle kind resolves to circle attrs");
        };
        assert_eq!(circle.radius, Some(9));
        assert_eq!(circle.color.r, Some(7));
    }

    #[test]
    fn triangle_points_need_both_coordinates() {
        let bag = AttributeBag::new()
            .with("x1", 0.0)
            .with("y1", 0.0)
            .with("x2", 10.0)
            .with("x3", 5.0)
            .with("y3", 8.0);
        let Some(ShapeAttrs::Triangle(tri)) = ShapeAttrs::resolve(ShapeKind::Triangle, &bag)
        else {
            panic!("triangle kind resolves to triangle attrs");
        };
        assert_eq!(tri.points, [Some([0, 0]), None, Some([5, 8])]);
    }

    #[test]
    fn surface_is_not_declarable() {
        assert_eq!(ShapeAttrs::resolve(ShapeKind::Surface, &rect_bag()), None);
    }

    #[test]
    fn kind_round_trips_through_resolve() {
        for kind in ShapeKind::ALL {
            if let Some(attrs) = ShapeAttrs::resolve(kind, &AttributeBag::new()) {
                assert_eq!(attrs.kind(), kind);
            }
        }
    }

    #[test]
    fn only_rect_and_circle_have_descriptors() {
        let with: alloc::vec::Vec<_> = ShapeKind::ALL
            .into_iter()
            .filter(|k| k.has_descriptor())
            .collect();
        assert_eq!(with, [ShapeKind::Rect, ShapeKind::Circle]);
    }
}
