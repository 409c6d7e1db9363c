// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message fixtures shared by the integration tests.

#![allow(dead_code)]

use rmw_dynamic::introspection::{
    Accessor, FieldKind, MessageMember, MessageMembers, ServiceMembers,
};
use rmw_dynamic::{Context, EnvConfig, MessageTypeSupport, Node, ServiceTypeSupport};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Telemetry {
    pub seq: u32,
    pub level: i8,
    pub stamp: i64,
    pub ratio: f64,
    pub label: String,
    pub samples: Vec<u16>,
    pub pose: Pose,
}

#[derive(Debug, Default, PartialEq)]
pub struct Empty;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddRequest {
    pub a: i64,
    pub b: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddResponse {
    pub sum: i64,
}

pub fn pose_members() -> Arc<MessageMembers> {
    Arc::new(MessageMembers::new(
        "geometry_msgs",
        "Pose2D",
        vec![
            MessageMember::new(
                "x",
                FieldKind::Float64,
                Accessor::scalar(|m: &Pose| &m.x, |m: &mut Pose| &mut m.x),
            ),
            MessageMember::new(
                "y",
                FieldKind::Float64,
                Accessor::scalar(|m: &Pose| &m.y, |m: &mut Pose| &mut m.y),
            ),
        ],
    ))
}

pub fn telemetry_support() -> MessageTypeSupport {
    let members = MessageMembers::new(
        "robot_msgs",
        "Telemetry",
        vec![
            MessageMember::new(
                "seq",
                FieldKind::Uint32,
                Accessor::scalar(|m: &Telemetry| &m.seq, |m: &mut Telemetry| &mut m.seq),
            ),
            MessageMember::new(
                "level",
                FieldKind::Int8,
                Accessor::scalar(|m: &Telemetry| &m.level, |m: &mut Telemetry| &mut m.level),
            ),
            MessageMember::new(
                "stamp",
                FieldKind::Int64,
                Accessor::scalar(|m: &Telemetry| &m.stamp, |m: &mut Telemetry| &mut m.stamp),
            ),
            MessageMember::new(
                "ratio",
                FieldKind::Float64,
                Accessor::scalar(|m: &Telemetry| &m.ratio, |m: &mut Telemetry| &mut m.ratio),
            ),
            MessageMember::new(
                "label",
                FieldKind::String,
                Accessor::scalar(|m: &Telemetry| &m.label, |m: &mut Telemetry| &mut m.label),
            )
            .string_bound(16),
            MessageMember::new(
                "samples",
                FieldKind::Uint16,
                Accessor::sequence(
                    |m: &Telemetry| &m.samples,
                    |m: &mut Telemetry| &mut m.samples,
                ),
            )
            .bounded_sequence(8),
            MessageMember::message(
                "pose",
                pose_members(),
                Accessor::message(|m: &Telemetry| &m.pose, |m: &mut Telemetry| &mut m.pose),
            ),
        ],
    );
    MessageTypeSupport::new(Arc::new(members))
}

pub fn empty_support() -> MessageTypeSupport {
    MessageTypeSupport::new(Arc::new(MessageMembers::new("std_msgs", "Empty", vec![])))
}

pub fn add_two_ints_support() -> ServiceTypeSupport {
    let request = MessageMembers::new(
        "example_interfaces",
        "AddTwoInts_Request",
        vec![
            MessageMember::new(
                "a",
                FieldKind::Int64,
                Accessor::scalar(|m: &AddRequest| &m.a, |m: &mut AddRequest| &mut m.a),
            ),
            MessageMember::new(
                "b",
                FieldKind::Int64,
                Accessor::scalar(|m: &AddRequest| &m.b, |m: &mut AddRequest| &mut m.b),
            ),
        ],
    );
    let response = MessageMembers::new(
        "example_interfaces",
        "AddTwoInts_Response",
        vec![MessageMember::new(
            "sum",
            FieldKind::Int64,
            Accessor::scalar(|m: &AddResponse| &m.sum, |m: &mut AddResponse| &mut m.sum),
        )],
    );
    ServiceTypeSupport::new(Arc::new(ServiceMembers::new(
        "example_interfaces",
        "AddTwoInts",
        Arc::new(request),
        Arc::new(response),
    )))
}

pub fn telemetry(seq: u32) -> Telemetry {
    Telemetry {
        seq,
        level: -3,
        stamp: -1_700_000_000_000,
        ratio: 0.25,
        label: format!("t{}", seq),
        samples: vec![1, 2, 65535],
        pose: Pose { x: 1.5, y: -2.5 },
    }
}

/// Fresh context with its own participant factory, so domains never leak
/// between tests.
pub fn context() -> Context {
    Context::new(EnvConfig::default()).expect("Failed to create context")
}

pub fn node(context: &Context, name: &str) -> Node {
    context
        .create_node(name, "/")
        .expect("Failed to create node")
}
