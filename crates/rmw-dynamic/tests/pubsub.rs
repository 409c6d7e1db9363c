// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::float_cmp)]

//! Publish/subscribe integration tests.
//!
//! Validates:
//! - nested messages survive the native -> dynamic -> CDR -> native path
//! - serialized publish and take
//! - history depth and local publication filtering
//! - graph queries and symmetric endpoint teardown

mod common;

use common::{
    context, empty_support, node, telemetry, telemetry_support, Empty, Pose, Telemetry,
};
use rmw_dynamic::{compare_gids_equal, last_error, reset_error, Error, QosProfile};

#[test]
fn test_publish_take_round_trip() -> anyhow::Result<()> {
    let context = context();
    let node = node(&context, "talker");
    let support = telemetry_support();
    let publisher = node.create_publisher(&support, "/telemetry", &QosProfile::DEFAULT)?;
    let subscription =
        node.create_subscription(&support, "/telemetry", &QosProfile::DEFAULT, false)?;
    assert_eq!(publisher.matched_subscription_count(), 1);

    let sent = telemetry(42);
    publisher.publish(&sent)?;

    let mut received = Telemetry::default();
    let info = subscription
        .take_with_info(&mut received)?
        .expect("Expected one sample");
    assert_eq!(received, sent);
    assert!(compare_gids_equal(&info.publisher_gid, &publisher.gid())?);

    assert!(!subscription.take(&mut received)?);
    Ok(())
}

#[test]
fn test_random_messages_round_trip() -> anyhow::Result<()> {
    let context = context();
    let node = node(&context, "fuzzer");
    let support = telemetry_support();
    let publisher = node.create_publisher(&support, "/random", &QosProfile::DEFAULT)?;
    let subscription = node.create_subscription(&support, "/random", &QosProfile::DEFAULT, false)?;

    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for _ in 0..32 {
        let label_len = rng.usize(..=16);
        let sample_len = rng.usize(..=8);
        let sent = Telemetry {
            seq: rng.u32(..),
            level: rng.i8(..),
            stamp: rng.i64(..),
            ratio: rng.f64(),
            label: (0..label_len).map(|_| rng.alphanumeric()).collect(),
            samples: (0..sample_len).map(|_| rng.u16(..)).collect(),
            pose: Pose {
                x: rng.f64(),
                y: -rng.f64(),
            },
        };
        publisher.publish(&sent)?;

        let mut received = Telemetry::default();
        assert!(subscription.take(&mut received)?);
        assert_eq!(received, sent);
    }
    Ok(())
}

#[test]
fn test_take_overwrites_previous_contents() -> anyhow::Result<()> {
    let context = context();
    let node = node(&context, "overwrite");
    let support = telemetry_support();
    let publisher = node.create_publisher(&support, "/overwrite", &QosProfile::DEFAULT)?;
    let subscription =
        node.create_subscription(&support, "/overwrite", &QosProfile::DEFAULT, false)?;

    let mut short = telemetry(1);
    short.samples.clear();
    short.label.clear();
    publisher.publish(&short)?;

    let mut received = telemetry(99);
    assert!(subscription.take(&mut received)?);
    assert_eq!(received, short);
    Ok(())
}

#[test]
fn test_serialized_publish_and_take() -> anyhow::Result<()> {
    let context = context();
    let node = node(&context, "relay");
    let support = telemetry_support();
    let source = node.create_publisher(&support, "/raw_in", &QosProfile::DEFAULT)?;
    let tap = node.create_subscription(&support, "/raw_in", &QosProfile::DEFAULT, false)?;
    let relay = node.create_publisher(&support, "/raw_out", &QosProfile::DEFAULT)?;
    let sink = node.create_subscription(&support, "/raw_out", &QosProfile::DEFAULT, false)?;

    let sent = telemetry(7);
    source.publish(&sent)?;
    let bytes = tap.take_serialized()?.expect("Expected serialized sample");
    assert!(bytes.len() > 4);

    relay.publish_serialized(&bytes)?;
    let mut received = Telemetry::default();
    assert!(sink.take(&mut received)?);
    assert_eq!(received, sent);
    Ok(())
}

#[test]
fn test_serialized_publish_rejects_bad_header() {
    let context = context();
    let node = node(&context, "bad_relay");
    let publisher = node
        .create_publisher(&telemetry_support(), "/raw", &QosProfile::DEFAULT)
        .expect("Failed to create publisher");

    reset_error();
    let err = publisher
        .publish_serialized(&[0xFF, 0xFF, 0, 0, 1])
        .expect_err("Bad encapsulation must fail");
    assert!(matches!(err, Error::Dds(_)));
    assert!(last_error().is_some());
}

#[test]
fn test_keep_last_depth_from_profile() -> anyhow::Result<()> {
    let context = context();
    let node = node(&context, "history");
    let support = telemetry_support();
    let qos = QosProfile::DEFAULT.keep_last(4);
    let publisher = node.create_publisher(&support, "/history", &qos)?;
    let subscription = node.create_subscription(&support, "/history", &qos, false)?;
    assert_eq!(subscription.qos().depth, 4);

    for seq in 0..10 {
        publisher.publish(&telemetry(seq))?;
    }
    assert_eq!(subscription.queued_count(), 4);

    let mut received = Telemetry::default();
    let mut seen = Vec::new();
    while subscription.take(&mut received)? {
        seen.push(received.seq);
    }
    assert_eq!(seen, vec![6, 7, 8, 9]);
    Ok(())
}

#[test]
fn test_system_default_keeps_base_depth() -> anyhow::Result<()> {
    let context = context();
    let node = node(&context, "defaults");
    let support = telemetry_support();
    let publisher = node.create_publisher(&support, "/defaults", &QosProfile::SYSTEM_DEFAULT)?;
    let subscription =
        node.create_subscription(&support, "/defaults", &QosProfile::SYSTEM_DEFAULT, false)?;
    assert_eq!(subscription.qos(), node.base_qos());
    assert_eq!(publisher.qos(), node.base_qos());
    Ok(())
}

#[test]
fn test_ignore_local_publications() -> anyhow::Result<()> {
    let context = context();
    let local = node(&context, "local");
    let remote = node(&context, "remote");
    let support = telemetry_support();

    let publisher = local.create_publisher(&support, "/echo", &QosProfile::DEFAULT)?;
    let own = local.create_subscription(&support, "/echo", &QosProfile::DEFAULT, true)?;
    let other = remote.create_subscription(&support, "/echo", &QosProfile::DEFAULT, true)?;

    publisher.publish(&telemetry(3))?;

    let mut received = Telemetry::default();
    assert!(!own.take(&mut received)?);
    assert_eq!(own.queued_count(), 0);
    assert!(other.take(&mut received)?);
    assert_eq!(received.seq, 3);
    Ok(())
}

#[test]
fn test_empty_message_uses_placeholder_member() -> anyhow::Result<()> {
    let context = context();
    let node = node(&context, "pinger");
    let support = empty_support();
    let publisher = node.create_publisher(&support, "/ping", &QosProfile::DEFAULT)?;
    let subscription = node.create_subscription(&support, "/ping", &QosProfile::DEFAULT, false)?;
    assert_eq!(publisher.type_name(), "std_msgs::msg::dds_::Empty_");

    publisher.publish(&Empty)?;
    let bytes = subscription.take_serialized()?.expect("Expected sample");
    // Encapsulation header followed by the single placeholder bool.
    assert_eq!(bytes.len(), 5);

    publisher.publish(&Empty)?;
    let mut received = Empty;
    assert!(subscription.take(&mut received)?);
    Ok(())
}

#[test]
fn test_wrong_message_type_is_reported() {
    let context = context();
    let node = node(&context, "confused");
    let publisher = node
        .create_publisher(&telemetry_support(), "/typed", &QosProfile::DEFAULT)
        .expect("Failed to create publisher");

    reset_error();
    let err = publisher.publish(&Empty).expect_err("Mismatched message must fail");
    assert!(matches!(err, Error::Marshal(_)));
    assert!(last_error().is_some());
}

#[test]
fn test_topic_type_conflict_is_rejected() {
    let context = context();
    let node = node(&context, "conflict");
    node.create_publisher(&telemetry_support(), "/shared", &QosProfile::DEFAULT)
        .expect("Failed to create publisher");

    let err = node
        .create_publisher(&empty_support(), "/shared", &QosProfile::DEFAULT)
        .expect_err("Second type on one topic must fail");
    assert!(matches!(err, Error::Registration(_)));
}

#[test]
fn test_topic_names_and_types() -> anyhow::Result<()> {
    let context = context();
    let node = node(&context, "graph");
    let _publisher =
        node.create_publisher(&telemetry_support(), "/telemetry", &QosProfile::DEFAULT)?;
    let _raw = node.create_subscription(
        &empty_support(),
        "plain",
        &QosProfile::DEFAULT.avoid_ros_namespace_conventions(true),
        false,
    )?;

    let topics = node.topic_names_and_types(false);
    assert_eq!(
        topics,
        vec![(
            "/telemetry".to_string(),
            vec!["robot_msgs/msg/Telemetry".to_string()]
        )]
    );

    let raw = node.topic_names_and_types(true);
    let names: Vec<&str> = raw.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["plain", "rt/telemetry"]);
    assert_eq!(raw[1].1, vec!["robot_msgs::msg::dds_::Telemetry_".to_string()]);
    Ok(())
}

#[test]
fn test_destroy_counts_are_symmetric() -> anyhow::Result<()> {
    let context = context();
    let first = node(&context, "first");
    let second = node(&context, "second");
    let support = telemetry_support();

    let publisher = first.create_publisher(&support, "/count", &QosProfile::DEFAULT)?;
    let subscription = second.create_subscription(&support, "/count", &QosProfile::DEFAULT, false)?;
    assert_eq!(second.count_publishers("/count"), 1);
    assert_eq!(first.count_subscribers("/count"), 1);

    first.destroy_publisher(publisher)?;
    assert_eq!(second.count_publishers("/count"), 0);
    assert_eq!(first.count_subscribers("/count"), 1);

    second.destroy_subscription(subscription)?;
    assert_eq!(first.count_subscribers("/count"), 0);
    assert!(first.topic_names_and_types(false).is_empty());
    Ok(())
}

#[test]
fn test_destroy_with_foreign_node_fails() -> anyhow::Result<()> {
    let context = context();
    let owner = node(&context, "owner");
    let stranger = node(&context, "stranger");
    let publisher = owner.create_publisher(&telemetry_support(), "/owned", &QosProfile::DEFAULT)?;

    reset_error();
    let refused = stranger
        .destroy_publisher(publisher)
        .expect_err("Only the owning node may destroy");
    assert!(matches!(refused.error, Error::InvalidArgument(_)));
    assert!(last_error().is_some_and(|text| text.contains("stranger")));
    assert_eq!(owner.count_publishers("/owned"), 1);

    // The refused publisher is still usable and still destroyable.
    let publisher = refused.into_inner();
    publisher.publish(&telemetry(1))?;
    owner.destroy_publisher(publisher)?;
    assert_eq!(owner.count_publishers("/owned"), 0);
    Ok(())
}

#[test]
fn test_node_destroy_waits_for_endpoints() -> anyhow::Result<()> {
    let context = context();
    let busy = node(&context, "busy");
    let subscription =
        busy.create_subscription(&telemetry_support(), "/busy", &QosProfile::DEFAULT, false)?;

    let refused = busy.destroy().expect_err("Live subscription blocks destroy");
    assert!(matches!(refused.error, Error::InvalidArgument(ref text) if text.contains("/busy")));
    let busy = refused.into_inner();

    busy.destroy_subscription(subscription)?;
    busy.destroy()?;
    Ok(())
}

#[test]
fn test_subscription_counts_matched_publishers() -> anyhow::Result<()> {
    let context = context();
    let reader_node = node(&context, "reader");
    let writer_node = node(&context, "writer");
    let support = telemetry_support();

    let subscription = reader_node.create_subscription(
        &support,
        "/matched",
        &QosProfile::DEFAULT,
        false,
    )?;
    assert_eq!(subscription.matched_publisher_count(), 0);

    let first = writer_node.create_publisher(&support, "/matched", &QosProfile::DEFAULT)?;
    let second = reader_node.create_publisher(&support, "/matched", &QosProfile::DEFAULT)?;
    let _elsewhere = writer_node.create_publisher(&support, "/unmatched", &QosProfile::DEFAULT)?;
    assert_eq!(subscription.matched_publisher_count(), 2);
    assert_eq!(first.matched_subscription_count(), 1);

    writer_node.destroy_publisher(first)?;
    assert_eq!(subscription.matched_publisher_count(), 1);
    drop(second);
    assert_eq!(subscription.matched_publisher_count(), 0);
    Ok(())
}
