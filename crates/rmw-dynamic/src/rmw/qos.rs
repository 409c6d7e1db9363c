// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! ROS QoS profiles and their mapping onto entity QoS.
//!
//! A ROS profile is applied on top of a base entity QoS taken from the
//! profile library. `SystemDefault` policies and a depth of 0 keep the base
//! value; everything else overrides it. For keep-last history the resulting
//! depth is then raised to at least the requested depth.

use crate::dds::{DurabilityKind, EntityQos, HistoryKind, ReliabilityKind};
use crate::error::{Error, Result};

/// Largest history depth an entity accepts (the range of a DDS `Long`).
pub const MAX_HISTORY_DEPTH: usize = i32::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HistoryPolicy {
    #[default]
    SystemDefault,
    KeepLast,
    KeepAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReliabilityPolicy {
    #[default]
    SystemDefault,
    Reliable,
    BestEffort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DurabilityPolicy {
    #[default]
    SystemDefault,
    TransientLocal,
    Volatile,
}

/// QoS requested by a ROS endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QosProfile {
    pub history: HistoryPolicy,
    /// Requested queue size; 0 keeps the base depth.
    pub depth: usize,
    pub reliability: ReliabilityPolicy,
    pub durability: DurabilityPolicy,
    /// Use the topic or service name verbatim, without `rt/`, `rq/`, `rr/`.
    pub avoid_ros_namespace_conventions: bool,
}

impl QosProfile {
    /// Everything left to the base entity QoS.
    pub const SYSTEM_DEFAULT: QosProfile = QosProfile {
        history: HistoryPolicy::SystemDefault,
        depth: 0,
        reliability: ReliabilityPolicy::SystemDefault,
        durability: DurabilityPolicy::SystemDefault,
        avoid_ros_namespace_conventions: false,
    };

    pub const DEFAULT: QosProfile = QosProfile {
        history: HistoryPolicy::KeepLast,
        depth: 10,
        reliability: ReliabilityPolicy::Reliable,
        durability: DurabilityPolicy::Volatile,
        avoid_ros_namespace_conventions: false,
    };

    pub const SENSOR_DATA: QosProfile = QosProfile {
        history: HistoryPolicy::KeepLast,
        depth: 5,
        reliability: ReliabilityPolicy::BestEffort,
        durability: DurabilityPolicy::Volatile,
        avoid_ros_namespace_conventions: false,
    };

    pub const SERVICES_DEFAULT: QosProfile = QosProfile {
        history: HistoryPolicy::KeepLast,
        depth: 10,
        reliability: ReliabilityPolicy::Reliable,
        durability: DurabilityPolicy::Volatile,
        avoid_ros_namespace_conventions: false,
    };

    pub const PARAMETERS: QosProfile = QosProfile {
        history: HistoryPolicy::KeepLast,
        depth: 1000,
        reliability: ReliabilityPolicy::Reliable,
        durability: DurabilityPolicy::Volatile,
        avoid_ros_namespace_conventions: false,
    };

    #[must_use]
    pub fn keep_last(mut self, depth: usize) -> Self {
        self.history = HistoryPolicy::KeepLast;
        self.depth = depth;
        self
    }

    #[must_use]
    pub fn keep_all(mut self) -> Self {
        self.history = HistoryPolicy::KeepAll;
        self
    }

    #[must_use]
    pub fn reliable(mut self) -> Self {
        self.reliability = ReliabilityPolicy::Reliable;
        self
    }

    #[must_use]
    pub fn best_effort(mut self) -> Self {
        self.reliability = ReliabilityPolicy::BestEffort;
        self
    }

    #[must_use]
    pub fn transient_local(mut self) -> Self {
        self.durability = DurabilityPolicy::TransientLocal;
        self
    }

    #[must_use]
    pub fn avoid_ros_namespace_conventions(mut self, avoid: bool) -> Self {
        self.avoid_ros_namespace_conventions = avoid;
        self
    }

    /// Apply this profile on top of `base`.
    pub fn apply(&self, base: EntityQos) -> Result<EntityQos> {
        if self.depth > MAX_HISTORY_DEPTH {
            return Err(Error::InvalidArgument(format!(
                "requested queue size {} exceeds the history depth range",
                self.depth
            )));
        }

        let mut qos = base;
        match self.history {
            HistoryPolicy::KeepLast => qos.history = HistoryKind::KeepLast,
            HistoryPolicy::KeepAll => qos.history = HistoryKind::KeepAll,
            HistoryPolicy::SystemDefault => {}
        }
        match self.reliability {
            ReliabilityPolicy::Reliable => qos.reliability = ReliabilityKind::Reliable,
            ReliabilityPolicy::BestEffort => qos.reliability = ReliabilityKind::BestEffort,
            ReliabilityPolicy::SystemDefault => {}
        }
        match self.durability {
            DurabilityPolicy::TransientLocal => qos.durability = DurabilityKind::TransientLocal,
            DurabilityPolicy::Volatile => qos.durability = DurabilityKind::Volatile,
            DurabilityPolicy::SystemDefault => {}
        }

        // Bounded by MAX_HISTORY_DEPTH above.
        let requested = self.depth as u32;
        if requested != 0 {
            qos.depth = requested;
        }
        if qos.history == HistoryKind::KeepLast && qos.depth < requested {
            qos.depth = requested;
        }
        Ok(qos)
    }
}
