// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;

#[derive(Debug, Default, PartialEq)]
struct Point {
    x: f32,
}

#[derive(Debug, Default, PartialEq)]
struct Track {
    id: u32,
    name: String,
    window: [i16; 3],
    readings: Vec<u8>,
    origin: Point,
    waypoints: Vec<Point>,
    corners: [Point; 2],
}

#[test]
fn type_ids_map_to_field_kinds() {
    for type_id in ROS_TYPE_FLOAT32..=ROS_TYPE_MESSAGE {
        match FieldKind::from_type_id(type_id) {
            Some(kind) => assert_eq!(kind.type_id(), type_id),
            None => assert!(
                [ROS_TYPE_LONG_DOUBLE, ROS_TYPE_WCHAR, ROS_TYPE_WSTRING].contains(&type_id),
                "type id {} should map",
                type_id
            ),
        }
    }
    assert!(FieldKind::from_type_id(0).is_none());
    assert!(FieldKind::from_type_id(ROS_TYPE_MESSAGE + 1).is_none());
    assert!(FieldKind::Int8.is_primitive());
    assert!(!FieldKind::String.is_primitive());
    assert!(!FieldKind::Message.is_primitive());
}

#[test]
fn array_shape_follows_size_and_bound() {
    let scalar = MessageMember::new("a", FieldKind::Int32, Accessor::none());
    assert!(!scalar.is_fixed_array() && !scalar.is_sequence());

    let fixed = scalar.clone().fixed_array(4);
    assert!(fixed.is_fixed_array() && !fixed.is_sequence());

    let bounded = scalar.clone().bounded_sequence(4);
    assert!(bounded.is_sequence() && !bounded.is_fixed_array());

    let unbounded = scalar.sequence();
    assert!(unbounded.is_sequence());
    assert_eq!(unbounded.array_size, 0);
}

#[test]
fn scalar_accessor_reads_and_writes_field() {
    let accessor = Accessor::scalar(|m: &Track| &m.id, |m: &mut Track| &mut m.id);
    let mut track = Track {
        id: 7,
        ..Track::default()
    };

    assert_eq!(accessor.size(&track), Some(1));
    assert_eq!(accessor.fetch(&track, 0), Some(FieldValue::U32(7)));
    assert_eq!(accessor.fetch(&track, 1), None);

    assert!(accessor.assign(&mut track, 0, FieldValue::U32(9)));
    assert_eq!(track.id, 9);
    assert!(!accessor.assign(&mut track, 0, FieldValue::I32(9)));
    assert!(!accessor.assign(&mut track, 1, FieldValue::U32(1)));

    let mut other = Point::default();
    assert_eq!(accessor.size(&other), None);
    assert!(!accessor.assign(&mut other, 0, FieldValue::U32(1)));
}

#[test]
fn string_accessor_copies_value() {
    let accessor = Accessor::scalar(|m: &Track| &m.name, |m: &mut Track| &mut m.name);
    let mut track = Track::default();
    assert!(accessor.assign(&mut track, 0, FieldValue::String("north".into())));
    assert_eq!(
        accessor.fetch(&track, 0),
        Some(FieldValue::String("north".into()))
    );
}

#[test]
fn array_accessor_is_fixed_length() {
    let accessor = Accessor::array(|m: &Track| &m.window, |m: &mut Track| &mut m.window);
    let mut track = Track::default();

    assert_eq!(accessor.size(&track), Some(3));
    assert!(accessor.resize(&mut track, 3));
    assert!(!accessor.resize(&mut track, 4));
    assert!(accessor.assign(&mut track, 2, FieldValue::I16(-5)));
    assert!(!accessor.assign(&mut track, 3, FieldValue::I16(1)));
    assert_eq!(track.window, [0, 0, -5]);
}

#[test]
fn sequence_accessor_resizes() {
    let accessor =
        Accessor::sequence(|m: &Track| &m.readings, |m: &mut Track| &mut m.readings);
    let mut track = Track::default();

    assert_eq!(accessor.size(&track), Some(0));
    assert!(accessor.resize(&mut track, 2));
    assert!(accessor.assign(&mut track, 1, FieldValue::U8(200)));
    assert_eq!(track.readings, vec![0, 200]);
    assert_eq!(accessor.fetch(&track, 1), Some(FieldValue::U8(200)));
}

#[test]
fn message_accessors_expose_nested_values() {
    let single = Accessor::message(|m: &Track| &m.origin, |m: &mut Track| &mut m.origin);
    let sequence =
        Accessor::message_sequence(|m: &Track| &m.waypoints, |m: &mut Track| &mut m.waypoints);
    let array = Accessor::message_array(|m: &Track| &m.corners, |m: &mut Track| &mut m.corners);
    let mut track = Track::default();

    let origin = single.nested_mut(&mut track, 0).expect("origin");
    origin.downcast_mut::<Point>().expect("point").x = 1.5;
    assert_eq!(track.origin.x, 1.5);
    assert!(single.nested(&track, 1).is_none());
    assert!(single.fetch(&track, 0).is_none());

    assert!(sequence.resize(&mut track, 2));
    assert_eq!(sequence.size(&track), Some(2));
    let second = sequence.nested_mut(&mut track, 1).expect("waypoint");
    second.downcast_mut::<Point>().expect("point").x = -2.0;
    assert_eq!(track.waypoints[1].x, -2.0);

    assert_eq!(array.size(&track), Some(2));
    assert!(!array.resize(&mut track, 3));
    let corner = array.nested(&track, 1).expect("corner");
    assert_eq!(corner.downcast_ref::<Point>(), Some(&Point::default()));
}

#[test]
fn none_accessor_never_resolves() {
    let accessor = Accessor::none();
    let mut track = Track::default();
    assert_eq!(accessor.size(&track), None);
    assert!(accessor.fetch(&track, 0).is_none());
    assert!(!accessor.assign(&mut track, 0, FieldValue::Bool(true)));
    assert!(accessor.nested(&track, 0).is_none());
}

#[test]
fn members_share_nested_descriptions() {
    let point = Arc::new(MessageMembers::new(
        "geometry_msgs",
        "Point",
        vec![MessageMember::new(
            "x",
            FieldKind::Float32,
            Accessor::scalar(|m: &Point| &m.x, |m: &mut Point| &mut m.x),
        )],
    ));
    let track = MessageMembers::new(
        "nav_msgs",
        "Track",
        vec![
            MessageMember::message("origin", Arc::clone(&point), Accessor::none()),
            MessageMember::message("waypoints", Arc::clone(&point), Accessor::none()).sequence(),
        ],
    );
    assert_eq!(track.member_count(), 2);
    assert!(!track.is_empty());
    assert_eq!(Arc::strong_count(&point), 3);
    assert_eq!(track.members[1].kind(), Some(FieldKind::Message));

    let debug = format!("{:?}", track.members[0]);
    assert!(debug.contains("Point"));
}
