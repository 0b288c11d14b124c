// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Component registration.
//!
//! A host registers each [`ComponentName`] under a namespaced tag such as
//! `vRect`. Surface tags are handed to an external Surface component; every
//! other tag is bound to the [`Mapper`](crate::lifecycle::Mapper).

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::shape::ShapeKind;

/// The registrable component names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentName {
    /// Root that owns a rendering core.
    Surface,
    /// Grouping layer.
    Layer,
    /// Triangle.
    Triangle,
    /// Rounded rectangle.
    RoundRect,
    /// Rectangle.
    Rect,
    /// Circle.
    Circle,
}

impl ComponentName {
    /// Every name, in registration order.
    pub const ALL: [Self; 6] = [
        Self::Surface,
        Self::Layer,
        Self::Triangle,
        Self::RoundRect,
        Self::Rect,
        Self::Circle,
    ];

    /// Returns the unprefixed name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.kind().name()
    }

    /// Returns the shape kind this name declares.
    #[must_use]
    pub const fn kind(self) -> ShapeKind {
        match self {
            Self::Surface => ShapeKind::Surface,
            Self::Layer => ShapeKind::Layer,
            Self::Triangle => ShapeKind::Triangle,
            Self::RoundRect => ShapeKind::RoundRect,
            Self::Rect => ShapeKind::Rect,
            Self::Circle => ShapeKind::Circle,
        }
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a registered tag is handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Registration {
    /// Delegated to the host's Surface component.
    Surface,
    /// Bound to the lifecycle mapper.
    Shape(ShapeKind),
}

/// Registry configuration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Namespace prepended to every component name.
    pub prefix: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            prefix: String::from("v"),
        }
    }
}

/// Maps namespaced tags to components.
#[derive(Clone, Debug)]
pub struct Registry {
    tags: Vec<(String, ComponentName)>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(&RegistryConfig::default())
    }
}

impl Registry {
    /// Registers every [`ComponentName`] under `config.prefix`.
    #[must_use]
    pub fn new(config: &RegistryConfig) -> Self {
        let tags = ComponentName::ALL
            .iter()
            .map(|&name| (format!("{}{}", config.prefix, name), name))
            .collect();
        Self { tags }
    }

    /// Returns every registered tag, in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.tags.iter().map(|(tag, _)| tag.as_str())
    }

    /// Returns the component registered under `tag`.
    #[must_use]
    pub fn component(&self, tag: &str) -> Option<ComponentName> {
        self.tags
            .iter()
            .find_map(|(registered, name)| (registered == tag).then_some(*name))
    }

    /// Returns how `tag` is handled, or `None` if it is not registered.
    #[must_use]
    pub fn lookup(&self, tag: &str) -> Option<Registration> {
        self.component(tag).map(|name| match name {
            ComponentName::Surface => Registration::Surface,
            other => Registration::Shape(other.kind()),
        })
    }
}
