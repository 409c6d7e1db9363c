// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Introspective marshaler.
//!
//! Walks a [`MessageMembers`] description alongside a native message and a
//! [`DynamicData`] container, copying every field in declaration order.
//! Member `i` of the description lives at container position `i + 1`.
//! The first failure aborts the walk at every recursion level; fields
//! written before the failure are left in place.

use crate::dynamic::{ArrayValue, DataError, DynamicData, MemberId, PrimitiveKind, Value};
use crate::introspection::{FieldKind, FieldValue, MessageMember, MessageMembers};
use std::any::Any;
use thiserror::Error;

/// Errors raised while marshaling between native and dynamic data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarshalError {
    #[error("unknown type id {type_id} for member '{member}'")]
    UnknownTypeId { member: String, type_id: u8 },
    #[error("member '{0}' is a message but carries no nested description")]
    MissingMembers(String),
    #[error("accessor for member '{0}' does not match the native message")]
    Accessor(String),
    #[error("member '{member}': native value {found} does not fit {expected}")]
    ValueMismatch {
        member: String,
        expected: &'static str,
        found: String,
    },
    #[error("member '{member}': expected {expected} elements, found {found}")]
    LengthMismatch {
        member: String,
        expected: usize,
        found: usize,
    },
    #[error("member '{0}': position does not fit a member id")]
    PositionOverflow(String),
    #[error("member '{member}': {source}")]
    Data {
        member: String,
        #[source]
        source: DataError,
    },
}

/// Container kind a primitive field kind travels as.
pub(crate) fn primitive_kind(kind: FieldKind) -> Option<PrimitiveKind> {
    Some(match kind {
        FieldKind::Bool => PrimitiveKind::Boolean,
        FieldKind::Byte | FieldKind::Uint8 | FieldKind::Int8 => PrimitiveKind::Octet,
        FieldKind::Char => PrimitiveKind::Char,
        FieldKind::Int16 => PrimitiveKind::Short,
        FieldKind::Uint16 => PrimitiveKind::UShort,
        FieldKind::Int32 => PrimitiveKind::Long,
        FieldKind::Uint32 => PrimitiveKind::ULong,
        FieldKind::Int64 => PrimitiveKind::LongLong,
        FieldKind::Uint64 => PrimitiveKind::ULongLong,
        FieldKind::Float32 => PrimitiveKind::Float,
        FieldKind::Float64 => PrimitiveKind::Double,
        FieldKind::String | FieldKind::Message => return None,
    })
}

/// Resolve the field kind of a member, rejecting unmapped type ids.
pub(crate) fn resolve_kind(member: &MessageMember) -> Result<FieldKind, MarshalError> {
    member.kind().ok_or_else(|| {
        log::warn!(
            "[marshal] member '{}' has unsupported type id {}",
            member.name,
            member.type_id
        );
        MarshalError::UnknownTypeId {
            member: member.name.clone(),
            type_id: member.type_id,
        }
    })
}

/// Copy a native message into a dynamic container.
pub fn write(
    target: &mut dyn DynamicData,
    source: &dyn Any,
    members: &MessageMembers,
) -> Result<(), MarshalError> {
    log::trace!(
        "[marshal] write {}/{} ({} members)",
        members.package_name,
        members.message_name,
        members.member_count()
    );
    for (index, member) in members.members.iter().enumerate() {
        let id = position(member, index)?;
        let kind = resolve_kind(member)?;
        match kind {
            FieldKind::Message => write_message(target, id, source, member)?,
            FieldKind::String if member.is_array => write_string_array(target, id, source, member)?,
            _ if member.is_array => write_primitive_array(target, id, source, member, kind)?,
            _ => {
                let value = to_container(member, kind, fetch(member, source, 0)?)?;
                target.set_value(id, value).map_err(data_error(member))?;
            }
        }
    }
    Ok(())
}

/// Copy a dynamic container into a native message.
pub fn read(
    target: &mut dyn Any,
    source: &dyn DynamicData,
    members: &MessageMembers,
) -> Result<(), MarshalError> {
    log::trace!(
        "[marshal] read {}/{} ({} members)",
        members.package_name,
        members.message_name,
        members.member_count()
    );
    for (index, member) in members.members.iter().enumerate() {
        let id = position(member, index)?;
        let kind = resolve_kind(member)?;
        match kind {
            FieldKind::Message => read_message(target, id, source, member)?,
            FieldKind::String if member.is_array => read_string_array(target, id, source, member)?,
            _ if member.is_array => read_primitive_array(target, id, source, member, kind)?,
            _ => {
                let value = source.get_value(id).map_err(data_error(member))?;
                assign(member, target, 0, from_container(member, kind, value)?)?;
            }
        }
    }
    Ok(())
}

fn write_primitive_array(
    target: &mut dyn DynamicData,
    id: MemberId,
    source: &dyn Any,
    member: &MessageMember,
    kind: FieldKind,
) -> Result<(), MarshalError> {
    let len = native_len(member, source)?;
    let values = (0..len)
        .map(|i| to_container(member, kind, fetch(member, source, i)?))
        .collect::<Result<Vec<_>, _>>()?;
    let array = primitive_kind(kind)
        .and_then(|p| ArrayValue::from_values(p, values))
        .ok_or_else(|| MarshalError::Accessor(member.name.clone()))?;
    target.set_array(id, array).map_err(data_error(member))
}

fn write_string_array(
    target: &mut dyn DynamicData,
    id: MemberId,
    source: &dyn Any,
    member: &MessageMember,
) -> Result<(), MarshalError> {
    let len = native_len(member, source)?;
    let child = target.bind_complex_member(id).map_err(data_error(member))?;
    for i in 0..len {
        let value = to_container(member, FieldKind::String, fetch(member, source, i)?)?;
        child
            .set_value(position(member, i)?, value)
            .map_err(data_error(member))?;
    }
    target.unbind_complex_member(id).map_err(data_error(member))
}

fn write_message(
    target: &mut dyn DynamicData,
    id: MemberId,
    source: &dyn Any,
    member: &MessageMember,
) -> Result<(), MarshalError> {
    let nested_members = nested_members(member)?;
    if !member.is_array {
        let nested = nested(member, source, 0)?;
        let child = target.bind_complex_member(id).map_err(data_error(member))?;
        write(child, nested, nested_members)?;
        return target.unbind_complex_member(id).map_err(data_error(member));
    }

    let len = native_len(member, source)?;
    let child = target.bind_complex_member(id).map_err(data_error(member))?;
    for i in 0..len {
        let element_id = position(member, i)?;
        let nested = nested(member, source, i)?;
        let element = child
            .bind_complex_member(element_id)
            .map_err(data_error(member))?;
        write(element, nested, nested_members)?;
        child
            .unbind_complex_member(element_id)
            .map_err(data_error(member))?;
    }
    target.unbind_complex_member(id).map_err(data_error(member))
}

fn read_primitive_array(
    target: &mut dyn Any,
    id: MemberId,
    source: &dyn DynamicData,
    member: &MessageMember,
    kind: FieldKind,
) -> Result<(), MarshalError> {
    let len = container_len(member, source, id)?;
    let array = source.get_array(id).map_err(data_error(member))?;
    if array.len() != len {
        return Err(MarshalError::LengthMismatch {
            member: member.name.clone(),
            expected: len,
            found: array.len(),
        });
    }
    resize(member, target, len)?;
    for (i, value) in array.into_values().into_iter().enumerate() {
        assign(member, target, i, from_container(member, kind, value)?)?;
    }
    Ok(())
}

fn read_string_array(
    target: &mut dyn Any,
    id: MemberId,
    source: &dyn DynamicData,
    member: &MessageMember,
) -> Result<(), MarshalError> {
    let len = container_len(member, source, id)?;
    let child = source.complex_member(id).map_err(data_error(member))?;
    resize(member, target, len)?;
    for i in 0..len {
        let value = child
            .get_value(position(member, i)?)
            .map_err(data_error(member))?;
        assign(member, target, i, from_container(member, FieldKind::String, value)?)?;
    }
    Ok(())
}

fn read_message(
    target: &mut dyn Any,
    id: MemberId,
    source: &dyn DynamicData,
    member: &MessageMember,
) -> Result<(), MarshalError> {
    let nested_members = nested_members(member)?;
    let child = source.complex_member(id).map_err(data_error(member))?;
    if !member.is_array {
        let nested = nested_mut(member, target, 0)?;
        return read(nested, child, nested_members);
    }

    let len = container_len(member, source, id)?;
    resize(member, target, len)?;
    for i in 0..len {
        let element = child
            .complex_member(position(member, i)?)
            .map_err(data_error(member))?;
        let nested = nested_mut(member, target, i)?;
        read(nested, element, nested_members)?;
    }
    Ok(())
}

/// 1-based container position of the element at `index`.
fn position(member: &MessageMember, index: usize) -> Result<MemberId, MarshalError> {
    index
        .checked_add(1)
        .and_then(|p| MemberId::try_from(p).ok())
        .ok_or_else(|| MarshalError::PositionOverflow(member.name.clone()))
}

fn data_error(member: &MessageMember) -> impl FnOnce(DataError) -> MarshalError + '_ {
    move |source| MarshalError::Data {
        member: member.name.clone(),
        source,
    }
}

fn nested_members(member: &MessageMember) -> Result<&MessageMembers, MarshalError> {
    member
        .members
        .as_deref()
        .ok_or_else(|| MarshalError::MissingMembers(member.name.clone()))
}

/// Element count on the native side; fixed arrays must match their size.
fn native_len(member: &MessageMember, source: &dyn Any) -> Result<usize, MarshalError> {
    let len = member
        .accessor
        .size(source)
        .ok_or_else(|| MarshalError::Accessor(member.name.clone()))?;
    if member.is_fixed_array() && len != member.array_size {
        return Err(MarshalError::LengthMismatch {
            member: member.name.clone(),
            expected: member.array_size,
            found: len,
        });
    }
    Ok(len)
}

/// Element count on the container side.
fn container_len(
    member: &MessageMember,
    source: &dyn DynamicData,
    id: MemberId,
) -> Result<usize, MarshalError> {
    if member.is_fixed_array() {
        return Ok(member.array_size);
    }
    let child = source.complex_member(id).map_err(data_error(member))?;
    Ok(child.member_count() as usize)
}

fn fetch(member: &MessageMember, source: &dyn Any, index: usize) -> Result<FieldValue, MarshalError> {
    member
        .accessor
        .fetch(source, index)
        .ok_or_else(|| MarshalError::Accessor(member.name.clone()))
}

fn assign(
    member: &MessageMember,
    target: &mut dyn Any,
    index: usize,
    value: FieldValue,
) -> Result<(), MarshalError> {
    if member.accessor.assign(target, index, value) {
        Ok(())
    } else {
        Err(MarshalError::Accessor(member.name.clone()))
    }
}

fn resize(member: &MessageMember, target: &mut dyn Any, len: usize) -> Result<(), MarshalError> {
    if member.accessor.resize(target, len) {
        Ok(())
    } else {
        Err(MarshalError::LengthMismatch {
            member: member.name.clone(),
            expected: member.array_size,
            found: len,
        })
    }
}

fn nested<'a>(
    member: &MessageMember,
    source: &'a dyn Any,
    index: usize,
) -> Result<&'a dyn Any, MarshalError> {
    member
        .accessor
        .nested(source, index)
        .ok_or_else(|| MarshalError::Accessor(member.name.clone()))
}

fn nested_mut<'a>(
    member: &MessageMember,
    target: &'a mut dyn Any,
    index: usize,
) -> Result<&'a mut dyn Any, MarshalError> {
    member
        .accessor
        .nested_mut(target, index)
        .ok_or_else(|| MarshalError::Accessor(member.name.clone()))
}

fn kind_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Bool => "bool",
        FieldKind::Byte => "byte",
        FieldKind::Char => "char",
        FieldKind::Float32 => "float32",
        FieldKind::Float64 => "float64",
        FieldKind::Int8 => "int8",
        FieldKind::Uint8 => "uint8",
        FieldKind::Int16 => "int16",
        FieldKind::Uint16 => "uint16",
        FieldKind::Int32 => "int32",
        FieldKind::Uint32 => "uint32",
        FieldKind::Int64 => "int64",
        FieldKind::Uint64 => "uint64",
        FieldKind::String => "string",
        FieldKind::Message => "message",
    }
}

/// Native value to container value. `int8` is carried as an octet with the
/// same bit pattern.
fn to_container(
    member: &MessageMember,
    kind: FieldKind,
    value: FieldValue,
) -> Result<Value, MarshalError> {
    Ok(match (kind, value) {
        (FieldKind::Bool, FieldValue::Bool(v)) => Value::Boolean(v),
        (FieldKind::Byte | FieldKind::Uint8, FieldValue::U8(v)) => Value::Octet(v),
        (FieldKind::Int8, FieldValue::I8(v)) => Value::Octet(u8::from_ne_bytes(v.to_ne_bytes())),
        (FieldKind::Char, FieldValue::U8(v)) => Value::Char(v),
        (FieldKind::Int16, FieldValue::I16(v)) => Value::Short(v),
        (FieldKind::Uint16, FieldValue::U16(v)) => Value::UShort(v),
        (FieldKind::Int32, FieldValue::I32(v)) => Value::Long(v),
        (FieldKind::Uint32, FieldValue::U32(v)) => Value::ULong(v),
        (FieldKind::Int64, FieldValue::I64(v)) => Value::LongLong(v),
        (FieldKind::Uint64, FieldValue::U64(v)) => Value::ULongLong(v),
        (FieldKind::Float32, FieldValue::F32(v)) => Value::Float(v),
        (FieldKind::Float64, FieldValue::F64(v)) => Value::Double(v),
        (FieldKind::String, FieldValue::String(v)) => Value::String(v),
        (kind, other) => {
            return Err(MarshalError::ValueMismatch {
                member: member.name.clone(),
                expected: kind_name(kind),
                found: format!("{:?}", other),
            })
        }
    })
}

/// Container value to native value, the inverse of [`to_container`].
fn from_container(
    member: &MessageMember,
    kind: FieldKind,
    value: Value,
) -> Result<FieldValue, MarshalError> {
    Ok(match (kind, value) {
        (FieldKind::Bool, Value::Boolean(v)) => FieldValue::Bool(v),
        (FieldKind::Byte | FieldKind::Uint8, Value::Octet(v)) => FieldValue::U8(v),
        (FieldKind::Int8, Value::Octet(v)) => FieldValue::I8(i8::from_ne_bytes([v])),
        (FieldKind::Char, Value::Char(v)) => FieldValue::U8(v),
        (FieldKind::Int16, Value::Short(v)) => FieldValue::I16(v),
        (FieldKind::Uint16, Value::UShort(v)) => FieldValue::U16(v),
        (FieldKind::Int32, Value::Long(v)) => FieldValue::I32(v),
        (FieldKind::Uint32, Value::ULong(v)) => FieldValue::U32(v),
        (FieldKind::Int64, Value::LongLong(v)) => FieldValue::I64(v),
        (FieldKind::Uint64, Value::ULongLong(v)) => FieldValue::U64(v),
        (FieldKind::Float32, Value::Float(v)) => FieldValue::F32(v),
        (FieldKind::Float64, Value::Double(v)) => FieldValue::F64(v),
        (FieldKind::String, Value::String(v)) => FieldValue::String(v),
        (kind, other) => {
            return Err(MarshalError::ValueMismatch {
                member: member.name.clone(),
                expected: kind_name(kind),
                found: other.kind_name().to_string(),
            })
        }
    })
}

#[cfg(test)]
mod tests;
