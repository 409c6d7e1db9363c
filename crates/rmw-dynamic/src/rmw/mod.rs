// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! ROS-style middleware surface over the in-process DDS runtime.
//!
//! # Architecture
//!
//! ```text
//! Context (EnvConfig + DomainParticipantFactory)
//! +-- Node (one Participant each)
//!     +-- Publisher     -> DataWriter  on rt/<topic>
//!     +-- Subscription  -> DataReader  on rt/<topic>
//!     +-- Client        -> Requester   on rq/<service>Request, rr/<service>Reply
//!     +-- Service       -> Replier     on rq/<service>Request, rr/<service>Reply
//!
//! wait(WaitArgs, timeout)
//!     fresh WaitSet per call, one condition per entry,
//!     entries that did not fire are set to None
//! ```
//!
//! Every handle reports [`IMPLEMENTATION_IDENTIFIER`]; type supports report
//! the identifier of the type-support library that produced them.

mod client;
mod context;
mod guard_condition;
mod publisher;
pub mod qos;
mod service;
mod subscription;
pub mod type_support;
mod wait;

pub use client::Client;
pub use context::{Context, Node};
pub use guard_condition::GuardCondition;
pub use publisher::{compare_gids_equal, Gid, Publisher, GID_STORAGE_SIZE};
pub use qos::{DurabilityPolicy, HistoryPolicy, QosProfile, ReliabilityPolicy};
pub use service::{RequestId, Service};
pub use subscription::{MessageInfo, Subscription};
pub use type_support::{MessageTypeSupport, ServiceTypeSupport};
pub use wait::{wait, WaitArgs};

use crate::error::{Error, Result};
use crate::introspection::INTROSPECTION_IDENTIFIER;

/// Identifier carried by every handle this implementation creates.
pub const IMPLEMENTATION_IDENTIFIER: &str = "rmw_dynamic_rs";

const ROS_TOPIC_PREFIX: &str = "rt";
const ROS_SERVICE_REQUESTER_PREFIX: &str = "rq";
const ROS_SERVICE_RESPONSE_PREFIX: &str = "rr";

pub(crate) fn check_identifier(what: &'static str, found: &str) -> Result<()> {
    if found == IMPLEMENTATION_IDENTIFIER {
        Ok(())
    } else {
        Err(Error::WrongImplementation {
            what,
            expected: IMPLEMENTATION_IDENTIFIER,
            found: found.to_string(),
        })
    }
}

pub(crate) fn check_typesupport(what: &'static str, found: &str) -> Result<()> {
    if found == INTROSPECTION_IDENTIFIER {
        Ok(())
    } else {
        Err(Error::WrongImplementation {
            what,
            expected: INTROSPECTION_IDENTIFIER,
            found: found.to_string(),
        })
    }
}

fn with_leading_slash(name: &str) -> String {
    if name.starts_with('/') {
        name.to_string()
    } else {
        format!("/{}", name)
    }
}

/// DDS topic name of a ROS topic: `rt/chatter` for `/chatter`.
#[must_use]
pub fn topic_name(ros_name: &str, avoid_ros_namespace_conventions: bool) -> String {
    if avoid_ros_namespace_conventions {
        ros_name.to_string()
    } else {
        format!("{}{}", ROS_TOPIC_PREFIX, with_leading_slash(ros_name))
    }
}

/// DDS request and reply topic names of a ROS service.
#[must_use]
pub fn service_topic_names(
    service_name: &str,
    avoid_ros_namespace_conventions: bool,
) -> (String, String) {
    if avoid_ros_namespace_conventions {
        (
            format!("{}Request", service_name),
            format!("{}Reply", service_name),
        )
    } else {
        let name = with_leading_slash(service_name);
        (
            format!("{}{}Request", ROS_SERVICE_REQUESTER_PREFIX, name),
            format!("{}{}Reply", ROS_SERVICE_RESPONSE_PREFIX, name),
        )
    }
}

/// ROS name of a DDS topic created under the `rt` prefix.
pub(crate) fn demangle_topic_name(dds_name: &str) -> Option<String> {
    dds_name
        .strip_prefix(ROS_TOPIC_PREFIX)
        .filter(|rest| rest.starts_with('/'))
        .map(str::to_string)
}

/// ROS service name of a request or reply topic.
pub(crate) fn demangle_service_name(dds_name: &str) -> Option<String> {
    let request = dds_name
        .strip_prefix(ROS_SERVICE_REQUESTER_PREFIX)
        .and_then(|rest| rest.strip_suffix("Request"));
    let reply = dds_name
        .strip_prefix(ROS_SERVICE_RESPONSE_PREFIX)
        .and_then(|rest| rest.strip_suffix("Reply"));
    request
        .or(reply)
        .filter(|name| name.len() > 1 && name.starts_with('/'))
        .map(str::to_string)
}

/// `pkg/msg/Name` for `pkg::msg::dds_::Name_`; other names pass through.
pub(crate) fn demangle_type_name(dds_type: &str) -> String {
    let Some((scope, name)) = dds_type.split_once("::dds_::") else {
        return dds_type.to_string();
    };
    let name = name.strip_suffix('_').unwrap_or(name);
    format!("{}/{}", scope.replace("::", "/"), name)
}

/// `pkg/srv/Name` for either half of a service type.
pub(crate) fn demangle_service_type_name(dds_type: &str) -> Option<String> {
    let (scope, name) = dds_type.split_once("::dds_::")?;
    let name = name
        .strip_suffix("_Request_")
        .or_else(|| name.strip_suffix("_Response_"))?;
    Some(format!("{}/{}", scope.replace("::", "/"), name))
}
