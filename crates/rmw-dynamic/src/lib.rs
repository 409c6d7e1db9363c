// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # rmw-dynamic
//!
//! ROS-style middleware binding over DDS dynamic data.
//!
//! Native messages are described at runtime by an introspection tree
//! ([`introspection::MessageMembers`]); the marshaler walks that tree to copy
//! values into and out of dynamic data containers, which travel between
//! endpoints as CDR. A single [`wait`] call blocks on subscriptions, guard
//! conditions, services and clients together.
//!
//! ## Quick Start
//!
//! ```rust
//! use rmw_dynamic::introspection::{Accessor, FieldKind, MessageMember, MessageMembers};
//! use rmw_dynamic::{Context, EnvConfig, MessageTypeSupport, QosProfile};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Temperature {
//!     celsius: f64,
//! }
//!
//! # fn main() -> rmw_dynamic::Result<()> {
//! let members = Arc::new(MessageMembers::new(
//!     "sensor_msgs",
//!     "Temperature",
//!     vec![MessageMember::new(
//!         "celsius",
//!         FieldKind::Float64,
//!         Accessor::scalar(|m: &Temperature| &m.celsius, |m: &mut Temperature| &mut m.celsius),
//!     )],
//! ));
//! let type_support = MessageTypeSupport::new(members);
//!
//! let context = Context::new(EnvConfig::default())?;
//! let node = context.create_node("thermometer", "/")?;
//! let publisher = node.create_publisher(&type_support, "/temperature", &QosProfile::DEFAULT)?;
//! let subscription =
//!     node.create_subscription(&type_support, "/temperature", &QosProfile::DEFAULT, false)?;
//!
//! publisher.publish(&Temperature { celsius: 21.5 })?;
//!
//! let mut received = Temperature::default();
//! assert!(subscription.take(&mut received)?);
//! assert_eq!(received.celsius, 21.5);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules Overview
//!
//! - [`introspection`] - message descriptions and field accessors
//! - [`dynamic`] - type codes, dynamic data containers, CDR codec
//! - [`marshal`] - native message <-> dynamic data
//! - [`dds`] - in-process DDS runtime (participants, readers, writers, waitsets)
//! - [`rmw`] - ROS-style endpoints and the unified wait

pub mod dds;
pub mod dynamic;
pub mod env_config;
pub mod error;
pub mod introspection;
pub mod logging;
pub mod marshal;
pub mod rmw;

pub use env_config::EnvConfig;
pub use error::{last_error, reset_error, DestroyError, Error, Result};
pub use rmw::{
    compare_gids_equal, wait, Client, Context, Gid, GuardCondition, MessageInfo,
    MessageTypeSupport, Node, Publisher, QosProfile, RequestId, Service, ServiceTypeSupport,
    Subscription, WaitArgs, IMPLEMENTATION_IDENTIFIER,
};
