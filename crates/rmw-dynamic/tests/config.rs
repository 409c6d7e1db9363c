// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Context configuration integration tests.
//!
//! Validates:
//! - QoS library and profile selection from the environment
//! - registration errors for unknown libraries and profiles
//! - domain isolation and the ROS QoS override switches
//! - node name discovery per domain

mod common;

use common::{node, telemetry, telemetry_support, Telemetry};
use rmw_dynamic::dds::{
    DomainParticipantFactory, EntityQos, HistoryKind, ReliabilityKind, BUILTIN_QOS_LIBRARY,
};
use rmw_dynamic::env_config::{ENV_DEFAULT_QOS_PROFILE, ENV_QOS_PROFILE_LIBRARY};
use rmw_dynamic::{last_error, reset_error, Context, EnvConfig, Error, QosProfile};

fn config_with(library: Option<&str>, profile: Option<&str>) -> EnvConfig {
    EnvConfig {
        qos_library: library.map(str::to_string),
        default_profile: profile.map(str::to_string),
        ..EnvConfig::default()
    }
}

// The only test in this binary touching the process environment.
#[test]
fn test_context_from_env() {
    std::env::set_var(ENV_QOS_PROFILE_LIBRARY, BUILTIN_QOS_LIBRARY);
    std::env::set_var(ENV_DEFAULT_QOS_PROFILE, "Generic.KeepLastReliable");
    let context = Context::from_env().expect("Failed to create context from env");
    let node = node(&context, "configured");
    let base = node.base_qos();
    assert_eq!(base.reliability, ReliabilityKind::Reliable);
    assert_eq!(base.history, HistoryKind::KeepLast);
    assert_eq!(base.depth, 10);

    std::env::set_var(ENV_DEFAULT_QOS_PROFILE, "Generic.Missing");
    reset_error();
    let err = Context::from_env().expect_err("Unknown profile must fail");
    assert!(matches!(err, Error::Registration(_)));
    assert!(last_error().is_some_and(|text| text.contains("default profile")));

    std::env::remove_var(ENV_QOS_PROFILE_LIBRARY);
    std::env::remove_var(ENV_DEFAULT_QOS_PROFILE);
}

#[test]
fn test_unknown_library_is_a_registration_error() {
    let err = Context::new(config_with(Some("NoSuchLib"), None))
        .expect_err("Unknown library must fail");
    assert!(matches!(err, Error::Registration(ref text) if text.contains("library")));
}

#[test]
fn test_profile_without_library_fails() {
    let err = Context::new(config_with(None, Some("Generic.Common")))
        .expect_err("Profile needs a library");
    assert!(matches!(err, Error::Registration(_)));
}

#[test]
fn test_custom_library_profile_becomes_base() -> anyhow::Result<()> {
    let factory = DomainParticipantFactory::new();
    factory
        .qos_provider()
        .add_profile("Robot", "Telemetry", EntityQos::reliable().keep_last(25));
    let context = Context::with_factory(config_with(Some("Robot"), Some("Telemetry")), factory)?;
    let node = context.create_node("robot", "/fleet")?;
    assert_eq!(node.base_qos().depth, 25);
    assert_eq!(node.fully_qualified_name(), "/fleet/robot");

    // An explicit depth replaces the base one.
    let subscription = node.create_subscription(
        &telemetry_support(),
        "/status",
        &QosProfile::DEFAULT.keep_last(40),
        false,
    )?;
    assert_eq!(subscription.qos().depth, 40);

    let publisher = node.create_publisher(
        &telemetry_support(),
        "/status_low",
        &QosProfile::DEFAULT.keep_last(3),
    )?;
    assert_eq!(publisher.qos().depth, 3);
    assert_eq!(publisher.qos().reliability, ReliabilityKind::Reliable);
    Ok(())
}

#[test]
fn test_oversized_depth_is_rejected() {
    let context = common::context();
    let node = node(&context, "greedy");
    let qos = QosProfile::DEFAULT.keep_last(usize::MAX);
    let err = node
        .create_publisher(&telemetry_support(), "/greedy", &qos)
        .expect_err("Depth beyond i32 must fail");
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn test_ignore_ros_qos_keeps_base() -> anyhow::Result<()> {
    let config = EnvConfig {
        ignore_ros_qos: true,
        ..config_with(Some(BUILTIN_QOS_LIBRARY), Some("Generic.BestEffort"))
    };
    let context = Context::new(config)?;
    let node = node(&context, "stubborn");
    let subscription =
        node.create_subscription(&telemetry_support(), "/s", &QosProfile::DEFAULT, false)?;
    assert_eq!(subscription.qos(), node.base_qos());
    assert_eq!(subscription.qos().reliability, ReliabilityKind::BestEffort);
    Ok(())
}

#[test]
fn test_domains_are_isolated() -> anyhow::Result<()> {
    let factory = DomainParticipantFactory::new();
    let zero = Context::with_factory(EnvConfig::default(), factory.clone())?;
    let seven = Context::with_factory(
        EnvConfig {
            domain_id: 7,
            ..EnvConfig::default()
        },
        factory,
    )?;
    let left = node(&zero, "left");
    let right = node(&seven, "right");
    let same = node(&zero, "same");
    assert_eq!(right.domain_id(), 7);

    let support = telemetry_support();
    let publisher = left.create_publisher(&support, "/iso", &QosProfile::DEFAULT)?;
    let isolated = right.create_subscription(&support, "/iso", &QosProfile::DEFAULT, false)?;
    let shared = same.create_subscription(&support, "/iso", &QosProfile::DEFAULT, false)?;
    assert_eq!(publisher.matched_subscription_count(), 1);

    publisher.publish(&telemetry(1))?;
    let mut message = Telemetry::default();
    assert!(!isolated.take(&mut message)?);
    assert!(shared.take(&mut message)?);
    assert_eq!(right.count_publishers("/iso"), 0);
    Ok(())
}

#[test]
fn test_node_names_follow_domain_membership() -> anyhow::Result<()> {
    let factory = DomainParticipantFactory::new();
    let zero = Context::with_factory(EnvConfig::default(), factory.clone())?;
    let seven = Context::with_factory(
        EnvConfig {
            domain_id: 7,
            ..EnvConfig::default()
        },
        factory,
    )?;
    let talker = zero.create_node("talker", "/chat")?;
    let listener = zero.create_node("listener", "/")?;
    let loner = seven.create_node("loner", "/")?;

    assert_eq!(talker.node_names(), vec!["talker", "listener"]);
    assert_eq!(listener.node_names(), vec!["listener", "talker"]);
    assert_eq!(
        listener.node_names_and_namespaces()[1],
        ("talker".to_string(), "/chat".to_string())
    );
    assert_eq!(loner.node_names(), vec!["loner"]);

    listener.destroy()?;
    assert_eq!(talker.node_names(), vec!["talker"]);
    Ok(())
}

#[test]
fn test_invalid_node_names_are_rejected() {
    let context = common::context();
    for (name, namespace) in [("", "/"), ("has space", "/"), ("ok", "relative"), ("ok", "/trailing/")] {
        let err = context
            .create_node(name, namespace)
            .expect_err("Invalid name must fail");
        assert!(matches!(err, Error::InvalidArgument(_)), "{} in {}", name, namespace);
    }
}
