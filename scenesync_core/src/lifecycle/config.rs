// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapper configuration.

use serde::{Deserialize, Serialize};

/// What an update of a mounted component does to the retained tree.
///
/// Passed to the [`Mapper`](super::Mapper) via [`MapperConfig::update_policy`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdatePolicy {
    /// Resolve the core and issue nothing. Attribute changes after mount do
    /// not reach the rendering core.
    #[default]
    Ignore,
    /// Re-serialize the current attributes and re-send the payload for kinds
    /// that have one.
    Resend,
}

/// Configuration for the [`Mapper`](super::Mapper).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Position argument sent with every `createChildAppendToContainer`.
    pub insertion_index: usize,
    /// Behaviour of [`Mapper::update`](super::Mapper::update).
    pub update_policy: UpdatePolicy,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self::literal()
    }
}

impl MapperConfig {
    /// Constant first-slot insertion and no-op updates.
    #[must_use]
    pub const fn literal() -> Self {
        Self {
            insertion_index: 0,
            update_policy: UpdatePolicy::Ignore,
        }
    }

    /// Like [`literal`](Self::literal), but updates re-send payloads.
    #[must_use]
    pub const fn propagating() -> Self {
        Self {
            update_policy: UpdatePolicy::Resend,
            ..Self::literal()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_literal() {
        assert_eq!(MapperConfig::default(), MapperConfig::literal());
        assert_eq!(MapperConfig::default().insertion_index, 0);
        assert_eq!(MapperConfig::default().update_policy, UpdatePolicy::Ignore);
    }

    #[test]
    fn parses_partial_json() {
        let config: MapperConfig =
            serde_json::from_str(r#"{ "update_policy": "resend" }"#).unwrap();
        assert_eq!(config, MapperConfig::propagating());
    }

    #[test]
    fn empty_json_is_default() {
        let config: MapperConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MapperConfig::default());
    }
}
