// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Environment variable configuration for rmw_dynamic.
//!
//! Read once by [`Context::from_env`](crate::Context::from_env) and carried
//! by the context from then on:
//!
//! ## QoS
//! - `RMW_DYNAMIC_QOS_PROFILE_LIBRARY`: default QoS library (unset or empty: none)
//! - `RMW_DYNAMIC_DEFAULT_QOS_PROFILE`: default profile within that library
//! - `RMW_DYNAMIC_IGNORE_ROS_QOS`: `1`/`true` takes endpoint QoS from profiles only
//! - `RMW_DYNAMIC_NODE_PROFILE_OVERRIDE`: `1`/`true` lets a profile named after
//!   the node override the default profile for that node's endpoints
//!
//! ## Core
//! - `RMW_DYNAMIC_DOMAIN_ID`: domain id (default: 0, or ROS_DOMAIN_ID if set)
//! - `RMW_DYNAMIC_LOG_LEVEL`: logging level (default: "info")
//!
//! # Example
//!
//! ```bash
//! export RMW_DYNAMIC_QOS_PROFILE_LIBRARY=BuiltinQosLib
//! export RMW_DYNAMIC_DEFAULT_QOS_PROFILE=Generic.KeepLastReliable
//! export RMW_DYNAMIC_IGNORE_ROS_QOS=1
//! ```

use std::env;

/// Environment variable names
pub const ENV_QOS_PROFILE_LIBRARY: &str = "RMW_DYNAMIC_QOS_PROFILE_LIBRARY";
pub const ENV_DEFAULT_QOS_PROFILE: &str = "RMW_DYNAMIC_DEFAULT_QOS_PROFILE";
pub const ENV_IGNORE_ROS_QOS: &str = "RMW_DYNAMIC_IGNORE_ROS_QOS";
pub const ENV_NODE_PROFILE_OVERRIDE: &str = "RMW_DYNAMIC_NODE_PROFILE_OVERRIDE";
pub const ENV_DOMAIN_ID: &str = "RMW_DYNAMIC_DOMAIN_ID";
pub const ENV_LOG_LEVEL: &str = "RMW_DYNAMIC_LOG_LEVEL";

/// ROS 2 environment variable for domain ID (fallback)
pub const ENV_ROS_DOMAIN_ID: &str = "ROS_DOMAIN_ID";

/// Runtime configuration from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    /// Domain ID joined by every participant of the context
    pub domain_id: u32,

    /// QoS library made the default library of the factory
    pub qos_library: Option<String>,

    /// Profile inside `qos_library` used as the base for all endpoints
    pub default_profile: Option<String>,

    /// Endpoint QoS comes from profiles only; ROS QoS arguments are ignored
    pub ignore_ros_qos: bool,

    /// A profile named after the node overrides the default profile
    pub node_profile_override: bool,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            domain_id: 0,
            qos_library: None,
            default_profile: None,
            ignore_ros_qos: false,
            node_profile_override: false,
            log_level: "info".to_string(),
        }
    }
}

fn flag(name: &str) -> bool {
    env::var(name)
        .ok()
        .map(|s| s == "1" || s.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.is_empty())
}

impl EnvConfig {
    /// Load configuration from environment variables
    ///
    /// Priority for domain ID:
    /// 1. RMW_DYNAMIC_DOMAIN_ID
    /// 2. ROS_DOMAIN_ID
    /// 3. Default (0)
    #[must_use]
    pub fn from_env() -> Self {
        let domain_id = env::var(ENV_DOMAIN_ID)
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .or_else(|| {
                env::var(ENV_ROS_DOMAIN_ID)
                    .ok()
                    .and_then(|s| s.parse::<u32>().ok())
            })
            .unwrap_or(0);

        let log_level = non_empty(ENV_LOG_LEVEL).unwrap_or_else(|| "info".to_string());

        Self {
            domain_id,
            qos_library: non_empty(ENV_QOS_PROFILE_LIBRARY),
            default_profile: non_empty(ENV_DEFAULT_QOS_PROFILE),
            ignore_ros_qos: flag(ENV_IGNORE_ROS_QOS),
            node_profile_override: flag(ENV_NODE_PROFILE_OVERRIDE),
            log_level,
        }
    }

    /// Check if any custom configuration was provided
    #[must_use]
    pub fn is_custom(&self) -> bool {
        *self != Self::default()
    }

    /// Parsed `log_level`, `None` when it names no known level.
    #[must_use]
    pub fn level_filter(&self) -> Option<log::LevelFilter> {
        self.log_level.parse().ok()
    }
}
