// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Entity QoS and the named profile library.
//!
//! Profiles are grouped into libraries and looked up by
//! `(library, profile)`. The provider also remembers a default library and
//! a default profile inside it; entities created without an explicit
//! profile start from that default.

use super::{DdsError, Result};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Library installed by every provider.
pub const BUILTIN_QOS_LIBRARY: &str = "BuiltinQosLib";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryKind {
    KeepLast,
    KeepAll,
}

/// Ordered so that a writer offers at least what a reader requests when
/// `writer >= reader`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReliabilityKind {
    BestEffort,
    Reliable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DurabilityKind {
    Volatile,
    TransientLocal,
}

/// QoS of one data writer or data reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityQos {
    pub history: HistoryKind,
    /// Keep-last depth; ignored for keep-all.
    pub depth: u32,
    pub reliability: ReliabilityKind,
    pub durability: DurabilityKind,
    /// Upper limit of queued samples under keep-all.
    pub max_samples: usize,
}

impl Default for EntityQos {
    fn default() -> Self {
        Self {
            history: HistoryKind::KeepLast,
            depth: 1,
            reliability: ReliabilityKind::BestEffort,
            durability: DurabilityKind::Volatile,
            max_samples: 5000,
        }
    }
}

impl EntityQos {
    pub fn reliable() -> Self {
        Self {
            reliability: ReliabilityKind::Reliable,
            ..Self::default()
        }
    }

    pub fn best_effort() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn keep_last(mut self, depth: u32) -> Self {
        self.history = HistoryKind::KeepLast;
        self.depth = depth;
        self
    }

    #[must_use]
    pub fn keep_all(mut self) -> Self {
        self.history = HistoryKind::KeepAll;
        self
    }

    #[must_use]
    pub fn transient_local(mut self) -> Self {
        self.durability = DurabilityKind::TransientLocal;
        self
    }

    /// Number of samples a history with this QoS retains.
    pub fn capacity(&self) -> usize {
        match self.history {
            HistoryKind::KeepLast => self.depth as usize,
            HistoryKind::KeepAll => self.max_samples,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.history == HistoryKind::KeepLast && self.depth == 0 {
            return Err(DdsError::InvalidQos("keep-last depth must be > 0".into()));
        }
        if self.max_samples == 0 {
            return Err(DdsError::InvalidQos("max_samples must be > 0".into()));
        }
        Ok(())
    }

    /// Request/offered check between a writer and a reader.
    pub fn compatible(writer: &EntityQos, reader: &EntityQos) -> bool {
        writer.reliability >= reader.reliability && writer.durability >= reader.durability
    }
}

/// Named QoS profiles grouped by library.
pub struct QosProvider {
    libraries: DashMap<String, HashMap<String, EntityQos>>,
    default_library: RwLock<Option<String>>,
    default_profile: RwLock<Option<String>>,
}

impl QosProvider {
    /// Provider holding only the builtin library, with no default selected.
    pub fn new() -> Self {
        let provider = Self {
            libraries: DashMap::new(),
            default_library: RwLock::new(None),
            default_profile: RwLock::new(None),
        };
        provider.add_profile(BUILTIN_QOS_LIBRARY, "Generic.Common", EntityQos::default());
        provider.add_profile(
            BUILTIN_QOS_LIBRARY,
            "Generic.StrictReliable",
            EntityQos::reliable().keep_all(),
        );
        provider.add_profile(
            BUILTIN_QOS_LIBRARY,
            "Generic.KeepLastReliable",
            EntityQos::reliable().keep_last(10),
        );
        provider.add_profile(
            BUILTIN_QOS_LIBRARY,
            "Generic.KeepLastReliable.TransientLocal",
            EntityQos::reliable().keep_last(10).transient_local(),
        );
        provider.add_profile(
            BUILTIN_QOS_LIBRARY,
            "Generic.BestEffort",
            EntityQos::best_effort().keep_last(1),
        );
        provider
    }

    /// Add or replace a profile, creating the library on first use.
    pub fn add_profile(&self, library: &str, profile: &str, qos: EntityQos) {
        self.libraries
            .entry(library.to_string())
            .or_default()
            .insert(profile.to_string(), qos);
    }

    pub fn has_library(&self, library: &str) -> bool {
        self.libraries.contains_key(library)
    }

    pub fn profile(&self, library: &str, profile: &str) -> Result<EntityQos> {
        let lib = self
            .libraries
            .get(library)
            .ok_or_else(|| DdsError::UnknownQosLibrary(library.to_string()))?;
        lib.get(profile)
            .copied()
            .ok_or_else(|| DdsError::UnknownQosProfile {
                library: library.to_string(),
                profile: profile.to_string(),
            })
    }

    pub fn set_default_library(&self, library: &str) -> Result<()> {
        if !self.has_library(library) {
            return Err(DdsError::UnknownQosLibrary(library.to_string()));
        }
        *self.default_library.write() = Some(library.to_string());
        *self.default_profile.write() = None;
        log::debug!("[dds] default QoS library set to '{}'", library);
        Ok(())
    }

    /// Select the default profile inside the default library.
    pub fn set_default_profile(&self, profile: &str) -> Result<()> {
        let library = self.default_library().ok_or(DdsError::NoDefaultLibrary)?;
        self.profile(&library, profile)?;
        *self.default_profile.write() = Some(profile.to_string());
        log::debug!("[dds] default QoS profile set to '{}::{}'", library, profile);
        Ok(())
    }

    pub fn default_library(&self) -> Option<String> {
        self.default_library.read().clone()
    }

    pub fn default_profile(&self) -> Option<String> {
        self.default_profile.read().clone()
    }

    /// QoS of the default profile, or [`EntityQos::default`] when none is
    /// selected.
    pub fn default_qos(&self) -> EntityQos {
        match (self.default_library(), self.default_profile()) {
            (Some(library), Some(profile)) => self
                .profile(&library, &profile)
                .unwrap_or_else(|_| EntityQos::default()),
            _ => EntityQos::default(),
        }
    }

    /// Look up `profile` in the default library.
    pub fn profile_in_default_library(&self, profile: &str) -> Option<EntityQos> {
        let library = self.default_library()?;
        self.profile(&library, profile).ok()
    }
}

impl Default for QosProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QosProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QosProvider")
            .field("libraries", &self.libraries.len())
            .field("default_library", &self.default_library())
            .field("default_profile", &self.default_profile())
            .finish()
    }
}
