// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;
use crate::dynamic::{DynamicSample, TypeCode};
use crate::introspection::{Accessor, MessageMember, MessageMembers, ROS_TYPE_WSTRING};
use crate::rmw::type_support::create_type_code;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
struct Vector3 {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Joint {
    name: String,
    position: f32,
    offsets: [i8; 2],
}

#[derive(Debug, Clone, Default, PartialEq)]
struct RobotState {
    active: bool,
    mode: u8,
    grade: u8,
    level: i8,
    count: u8,
    temperature: i16,
    port: u16,
    tick: i32,
    mask: u32,
    stamp: i64,
    serial: u64,
    ratio: f32,
    energy: f64,
    label: String,
    tags: Vec<String>,
    history: [i32; 3],
    samples: Vec<u16>,
    origin: Vector3,
    joints: Vec<Joint>,
    corners: [Vector3; 2],
}

fn vector3_members() -> Arc<MessageMembers> {
    Arc::new(MessageMembers::new(
        "geometry_msgs",
        "Vector3",
        vec![
            MessageMember::new(
                "x",
                FieldKind::Float64,
                Accessor::scalar(|m: &Vector3| &m.x, |m: &mut Vector3| &mut m.x),
            ),
            MessageMember::new(
                "y",
                FieldKind::Float64,
                Accessor::scalar(|m: &Vector3| &m.y, |m: &mut Vector3| &mut m.y),
            ),
            MessageMember::new(
                "z",
                FieldKind::Float64,
                Accessor::scalar(|m: &Vector3| &m.z, |m: &mut Vector3| &mut m.z),
            ),
        ],
    ))
}

fn joint_members() -> Arc<MessageMembers> {
    Arc::new(MessageMembers::new(
        "robot_msgs",
        "Joint",
        vec![
            MessageMember::new(
                "name",
                FieldKind::String,
                Accessor::scalar(|m: &Joint| &m.name, |m: &mut Joint| &mut m.name),
            )
            .string_bound(16),
            MessageMember::new(
                "position",
                FieldKind::Float32,
                Accessor::scalar(|m: &Joint| &m.position, |m: &mut Joint| &mut m.position),
            ),
            MessageMember::new(
                "offsets",
                FieldKind::Int8,
                Accessor::array(|m: &Joint| &m.offsets, |m: &mut Joint| &mut m.offsets),
            )
            .fixed_array(2),
        ],
    ))
}

fn robot_state_members() -> Arc<MessageMembers> {
    Arc::new(MessageMembers::new(
        "robot_msgs",
        "RobotState",
        vec![
            MessageMember::new(
                "active",
                FieldKind::Bool,
                Accessor::scalar(|m: &RobotState| &m.active, |m: &mut RobotState| &mut m.active),
            ),
            MessageMember::new(
                "mode",
                FieldKind::Byte,
                Accessor::scalar(|m: &RobotState| &m.mode, |m: &mut RobotState| &mut m.mode),
            ),
            MessageMember::new(
                "grade",
                FieldKind::Char,
                Accessor::scalar(|m: &RobotState| &m.grade, |m: &mut RobotState| &mut m.grade),
            ),
            MessageMember::new(
                "level",
                FieldKind::Int8,
                Accessor::scalar(|m: &RobotState| &m.level, |m: &mut RobotState| &mut m.level),
            ),
            MessageMember::new(
                "count",
                FieldKind::Uint8,
                Accessor::scalar(|m: &RobotState| &m.count, |m: &mut RobotState| &mut m.count),
            ),
            MessageMember::new(
                "temperature",
                FieldKind::Int16,
                Accessor::scalar(
                    |m: &RobotState| &m.temperature,
                    |m: &mut RobotState| &mut m.temperature,
                ),
            ),
            MessageMember::new(
                "port",
                FieldKind::Uint16,
                Accessor::scalar(|m: &RobotState| &m.port, |m: &mut RobotState| &mut m.port),
            ),
            MessageMember::new(
                "tick",
                FieldKind::Int32,
                Accessor::scalar(|m: &RobotState| &m.tick, |m: &mut RobotState| &mut m.tick),
            ),
            MessageMember::new(
                "mask",
                FieldKind::Uint32,
                Accessor::scalar(|m: &RobotState| &m.mask, |m: &mut RobotState| &mut m.mask),
            ),
            MessageMember::new(
                "stamp",
                FieldKind::Int64,
                Accessor::scalar(|m: &RobotState| &m.stamp, |m: &mut RobotState| &mut m.stamp),
            ),
            MessageMember::new(
                "serial",
                FieldKind::Uint64,
                Accessor::scalar(|m: &RobotState| &m.serial, |m: &mut RobotState| &mut m.serial),
            ),
            MessageMember::new(
                "ratio",
                FieldKind::Float32,
                Accessor::scalar(|m: &RobotState| &m.ratio, |m: &mut RobotState| &mut m.ratio),
            ),
            MessageMember::new(
                "energy",
                FieldKind::Float64,
                Accessor::scalar(|m: &RobotState| &m.energy, |m: &mut RobotState| &mut m.energy),
            ),
            MessageMember::new(
                "label",
                FieldKind::String,
                Accessor::scalar(|m: &RobotState| &m.label, |m: &mut RobotState| &mut m.label),
            ),
            MessageMember::new(
                "tags",
                FieldKind::String,
                Accessor::sequence(|m: &RobotState| &m.tags, |m: &mut RobotState| &mut m.tags),
            )
            .sequence(),
            MessageMember::new(
                "history",
                FieldKind::Int32,
                Accessor::array(
                    |m: &RobotState| &m.history,
                    |m: &mut RobotState| &mut m.history,
                ),
            )
            .fixed_array(3),
            MessageMember::new(
                "samples",
                FieldKind::Uint16,
                Accessor::sequence(
                    |m: &RobotState| &m.samples,
                    |m: &mut RobotState| &mut m.samples,
                ),
            )
            .bounded_sequence(5),
            MessageMember::message(
                "origin",
                vector3_members(),
                Accessor::message(|m: &RobotState| &m.origin, |m: &mut RobotState| &mut m.origin),
            ),
            MessageMember::message(
                "joints",
                joint_members(),
                Accessor::message_sequence(
                    |m: &RobotState| &m.joints,
                    |m: &mut RobotState| &mut m.joints,
                ),
            )
            .sequence(),
            MessageMember::message(
                "corners",
                vector3_members(),
                Accessor::message_array(
                    |m: &RobotState| &m.corners,
                    |m: &mut RobotState| &mut m.corners,
                ),
            )
            .fixed_array(2),
        ],
    ))
}

fn sample_state() -> RobotState {
    RobotState {
        active: true,
        mode: 0xFE,
        grade: b'A',
        level: -128,
        count: 255,
        temperature: -40,
        port: 7400,
        tick: -123_456,
        mask: 0xDEAD_BEEF,
        stamp: i64::MIN,
        serial: u64::MAX,
        ratio: 0.25,
        energy: -1.5e9,
        label: "arm".to_string(),
        tags: vec!["left".to_string(), String::new(), "tool".to_string()],
        history: [i32::MIN, 0, i32::MAX],
        samples: vec![1, 2, 65535],
        origin: Vector3 {
            x: 1.0,
            y: -2.0,
            z: 3.5,
        },
        joints: vec![
            Joint {
                name: "shoulder".to_string(),
                position: 0.5,
                offsets: [-1, 127],
            },
            Joint {
                name: "elbow".to_string(),
                position: -0.75,
                offsets: [-128, 0],
            },
        ],
        corners: [
            Vector3 {
                x: -1.0,
                y: 0.0,
                z: 9.0,
            },
            Vector3 {
                x: 4.0,
                y: 5.0,
                z: -6.0,
            },
        ],
    }
}

fn round_trip(members: &MessageMembers, state: &RobotState) -> RobotState {
    let type_code = create_type_code(members).expect("type code");
    let mut sample = DynamicSample::new(type_code);
    write(&mut sample, state, members).expect("write");
    let mut out = RobotState::default();
    read(&mut out, &sample, members).expect("read");
    out
}

#[test]
fn round_trip_preserves_every_field_kind() {
    let members = robot_state_members();
    let state = sample_state();
    assert_eq!(round_trip(&members, &state), state);
}

#[test]
fn int8_travels_as_octet_with_same_bits() {
    let members = robot_state_members();
    let type_code = create_type_code(&members).expect("type code");
    let mut sample = DynamicSample::new(type_code);
    write(&mut sample, &sample_state(), &members).expect("write");

    assert_eq!(sample.get_value(4).expect("level"), Value::Octet(0x80));
    assert_eq!(sample.get_value(3).expect("grade"), Value::Char(b'A'));
    assert_eq!(sample.get_value(10).expect("stamp"), Value::LongLong(i64::MIN));
}

#[test]
fn round_trip_random_states() {
    let members = robot_state_members();
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for _ in 0..32 {
        let mut state = sample_state();
        state.level = rng.i8(..);
        state.stamp = rng.i64(..);
        state.serial = rng.u64(..);
        state.tick = rng.i32(..);
        state.samples = (0..rng.usize(0..=5)).map(|_| rng.u16(..)).collect();
        state.joints = (0..rng.usize(0..4))
            .map(|i| Joint {
                name: format!("j{}", i),
                position: rng.f32(),
                offsets: [rng.i8(..), rng.i8(..)],
            })
            .collect();
        assert_eq!(round_trip(&members, &state), state);
    }
}

#[test]
fn read_shrinks_native_sequences_to_container_length() {
    let members = robot_state_members();
    let mut state = sample_state();
    state.tags.clear();
    state.joints.truncate(1);

    let type_code = create_type_code(&members).expect("type code");
    let mut sample = DynamicSample::new(type_code);
    write(&mut sample, &state, &members).expect("write");

    let mut out = sample_state();
    read(&mut out, &sample, &members).expect("read");
    assert!(out.tags.is_empty());
    assert_eq!(out.joints.len(), 1);
}

#[test]
fn unknown_type_id_names_member_and_id() {
    let members = MessageMembers::new(
        "test_msgs",
        "Wide",
        vec![MessageMember::with_type_id(
            "text",
            ROS_TYPE_WSTRING,
            Accessor::none(),
        )],
    );
    let type_code = TypeCode::structure("test_msgs::msg::dds_::Wide_", vec![]);
    let mut sample = DynamicSample::new(type_code);

    let err = write(&mut sample, &(), &members).expect_err("wstring is unsupported");
    assert_eq!(
        err,
        MarshalError::UnknownTypeId {
            member: "text".to_string(),
            type_id: ROS_TYPE_WSTRING,
        }
    );
    assert!(err.to_string().contains("unknown type id 17"));
}

#[test]
fn message_member_without_description_fails() {
    let mut member = MessageMember::message(
        "origin",
        vector3_members(),
        Accessor::message(|m: &RobotState| &m.origin, |m: &mut RobotState| &mut m.origin),
    );
    member.members = None;
    let members = MessageMembers::new("robot_msgs", "Broken", vec![member]);
    let type_code = TypeCode::structure("Broken_", vec![]);
    let mut sample = DynamicSample::new(type_code);

    assert_eq!(
        write(&mut sample, &sample_state(), &members),
        Err(MarshalError::MissingMembers("origin".to_string()))
    );
}

#[test]
fn fixed_array_size_must_match_description() {
    let members = MessageMembers::new(
        "robot_msgs",
        "History",
        vec![MessageMember::new(
            "history",
            FieldKind::Int32,
            Accessor::array(|m: &RobotState| &m.history, |m: &mut RobotState| &mut m.history),
        )
        .fixed_array(4)],
    );
    let type_code = create_type_code(&members).expect("type code");
    let mut sample = DynamicSample::new(type_code);

    assert!(matches!(
        write(&mut sample, &sample_state(), &members),
        Err(MarshalError::LengthMismatch {
            expected: 4,
            found: 3,
            ..
        })
    ));
}

#[test]
fn accessor_for_other_message_type_is_rejected() {
    let members = vector3_members();
    let type_code = create_type_code(&members).expect("type code");
    let mut sample = DynamicSample::new(type_code);

    assert_eq!(
        write(&mut sample, &sample_state(), &members),
        Err(MarshalError::Accessor("x".to_string()))
    );
}

#[test]
fn container_bound_violation_surfaces_as_data_error() {
    let members = robot_state_members();
    let type_code = create_type_code(&members).expect("type code");
    let mut sample = DynamicSample::new(type_code);
    let mut state = sample_state();
    state.samples = vec![0; 6];

    let err = write(&mut sample, &state, &members).expect_err("bound is 5");
    assert!(matches!(
        err,
        MarshalError::Data {
            ref member,
            source: DataError::BoundExceeded { bound: 5, .. },
        } if member == "samples"
    ));
}

/// Container stub that counts calls and fails on a chosen `set_value`.
#[derive(Default)]
struct CountingData {
    set_calls: usize,
    fail_on: usize,
    binds: usize,
    unbinds: usize,
    child: Option<Box<CountingData>>,
}

impl DynamicData for CountingData {
    fn set_value(&mut self, id: MemberId, _value: Value) -> Result<(), DataError> {
        self.set_calls += 1;
        if self.set_calls == self.fail_on {
            Err(DataError::MemberNotFound(id))
        } else {
            Ok(())
        }
    }

    fn get_value(&self, id: MemberId) -> Result<Value, DataError> {
        Err(DataError::MemberNotFound(id))
    }

    fn set_array(&mut self, _id: MemberId, _values: ArrayValue) -> Result<(), DataError> {
        Ok(())
    }

    fn get_array(&self, id: MemberId) -> Result<ArrayValue, DataError> {
        Err(DataError::MemberNotFound(id))
    }

    fn bind_complex_member(&mut self, id: MemberId) -> Result<&mut dyn DynamicData, DataError> {
        self.binds += 1;
        match self.child.as_deref_mut() {
            Some(child) => Ok(child),
            None => Err(DataError::NotComplex { id }),
        }
    }

    fn unbind_complex_member(&mut self, _id: MemberId) -> Result<(), DataError> {
        self.unbinds += 1;
        Ok(())
    }

    fn complex_member(&self, id: MemberId) -> Result<&dyn DynamicData, DataError> {
        Err(DataError::NotComplex { id })
    }

    fn member_count(&self) -> u32 {
        0
    }

    fn clear_all_members(&mut self) -> Result<(), DataError> {
        Ok(())
    }
}

#[test]
fn first_failure_stops_the_walk() {
    let members = vector3_members();
    let mut stub = CountingData {
        fail_on: 2,
        ..CountingData::default()
    };

    let err = write(&mut stub, &Vector3::default(), &members).expect_err("second set fails");
    assert!(matches!(err, MarshalError::Data { ref member, .. } if member == "y"));
    assert_eq!(stub.set_calls, 2, "member z must not be attempted");
}

#[test]
fn nested_failure_aborts_parent_members() {
    #[derive(Default)]
    struct Outer {
        origin: Vector3,
        tick: i32,
    }

    let members = MessageMembers::new(
        "robot_msgs",
        "Outer",
        vec![
            MessageMember::message(
                "origin",
                vector3_members(),
                Accessor::message(|m: &Outer| &m.origin, |m: &mut Outer| &mut m.origin),
            ),
            MessageMember::new(
                "tick",
                FieldKind::Int32,
                Accessor::scalar(|m: &Outer| &m.tick, |m: &mut Outer| &mut m.tick),
            ),
        ],
    );
    let mut stub = CountingData {
        child: Some(Box::new(CountingData {
            fail_on: 1,
            ..CountingData::default()
        })),
        ..CountingData::default()
    };

    let err = write(&mut stub, &Outer::default(), &members).expect_err("nested x fails");
    assert!(matches!(err, MarshalError::Data { ref member, .. } if member == "x"));
    assert_eq!(stub.binds, 1);
    assert_eq!(stub.unbinds, 0);
    assert_eq!(stub.set_calls, 0, "outer member tick must not be attempted");
    assert_eq!(stub.child.as_ref().map(|c| c.set_calls), Some(1));
}
