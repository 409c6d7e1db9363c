// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type support handles and type-code construction from message
//! descriptions.
//!
//! Registered names follow the DDS mangling of ROS interfaces:
//! `pkg::msg::dds_::Name_` for messages and
//! `pkg::srv::dds_::Name_Request_` / `pkg::srv::dds_::Name_Response_` for
//! services. Every member name gets a trailing underscore.

use crate::dynamic::{PrimitiveKind, TypeCode};
use crate::introspection::{
    FieldKind, MessageMember, MessageMembers, ServiceMembers, INTROSPECTION_IDENTIFIER,
};
use crate::marshal::primitive_kind;
use std::sync::Arc;
use thiserror::Error;

/// Bound applied to unbounded sequences.
pub const DEFAULT_SEQUENCE_BOUND: u32 = 100;
/// Bound applied to unbounded strings.
pub const DEFAULT_STRING_BOUND: u32 = 255;
/// Placeholder member injected into messages without fields.
pub const DUMMY_MEMBER_NAME: &str = "_dummy";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeCodeError {
    #[error("unknown type id {type_id} for member '{member}'")]
    UnknownTypeId { member: String, type_id: u8 },
    #[error("member '{0}' is a message but carries no nested description")]
    MissingMembers(String),
    #[error("member '{member}': bound {bound} does not fit 32 bits")]
    BoundOverflow { member: String, bound: usize },
}

/// Message type support: a description plus the identifier of the
/// type-support library that produced it.
#[derive(Debug, Clone)]
pub struct MessageTypeSupport {
    pub typesupport_identifier: &'static str,
    pub members: Arc<MessageMembers>,
}

impl MessageTypeSupport {
    pub fn new(members: Arc<MessageMembers>) -> Self {
        Self::with_identifier(INTROSPECTION_IDENTIFIER, members)
    }

    pub fn with_identifier(identifier: &'static str, members: Arc<MessageMembers>) -> Self {
        Self {
            typesupport_identifier: identifier,
            members,
        }
    }

    pub fn type_name(&self) -> String {
        message_type_name(&self.members)
    }
}

#[derive(Debug, Clone)]
pub struct ServiceTypeSupport {
    pub typesupport_identifier: &'static str,
    pub members: Arc<ServiceMembers>,
}

impl ServiceTypeSupport {
    pub fn new(members: Arc<ServiceMembers>) -> Self {
        Self::with_identifier(INTROSPECTION_IDENTIFIER, members)
    }

    pub fn with_identifier(identifier: &'static str, members: Arc<ServiceMembers>) -> Self {
        Self {
            typesupport_identifier: identifier,
            members,
        }
    }

    pub fn request_type_name(&self) -> String {
        service_type_name(&self.members, "Request")
    }

    pub fn response_type_name(&self) -> String {
        service_type_name(&self.members, "Response")
    }
}

pub fn message_type_name(members: &MessageMembers) -> String {
    format!(
        "{}::msg::dds_::{}_",
        members.package_name, members.message_name
    )
}

/// `suffix` is `Request` or `Response`.
pub fn service_type_name(members: &ServiceMembers, suffix: &str) -> String {
    format!(
        "{}::srv::dds_::{}_{}_",
        members.package_name, members.service_name, suffix
    )
}

/// Build the type code of a message, named after its description.
pub fn create_type_code(members: &MessageMembers) -> Result<Arc<TypeCode>, TypeCodeError> {
    create_named_type_code(&message_type_name(members), members)
}

/// Build a struct type code named `type_name` from `members`.
pub fn create_named_type_code(
    type_name: &str,
    members: &MessageMembers,
) -> Result<Arc<TypeCode>, TypeCodeError> {
    let mut fields = members
        .members
        .iter()
        .map(|member| Ok((format!("{}_", member.name), member_type_code(member)?)))
        .collect::<Result<Vec<_>, TypeCodeError>>()?;

    if fields.is_empty() {
        fields.push((
            DUMMY_MEMBER_NAME.to_string(),
            TypeCode::primitive(PrimitiveKind::Boolean),
        ));
    }

    Ok(TypeCode::structure(type_name, fields))
}

fn member_type_code(member: &MessageMember) -> Result<Arc<TypeCode>, TypeCodeError> {
    let kind = member.kind().ok_or_else(|| TypeCodeError::UnknownTypeId {
        member: member.name.clone(),
        type_id: member.type_id,
    })?;

    let element = match kind {
        FieldKind::String => {
            let bound = match member.string_upper_bound {
                0 => DEFAULT_STRING_BOUND,
                bound => to_bound(member, bound)?,
            };
            TypeCode::string(bound)
        }
        FieldKind::Message => {
            let nested = member
                .members
                .as_ref()
                .ok_or_else(|| TypeCodeError::MissingMembers(member.name.clone()))?;
            create_type_code(nested)?
        }
        primitive => match primitive_kind(primitive) {
            Some(p) => TypeCode::primitive(p),
            None => {
                return Err(TypeCodeError::UnknownTypeId {
                    member: member.name.clone(),
                    type_id: member.type_id,
                })
            }
        },
    };

    if !member.is_array {
        return Ok(element);
    }
    if member.is_fixed_array() {
        return Ok(TypeCode::array(element, to_bound(member, member.array_size)?));
    }
    let bound = if member.is_upper_bound && member.array_size > 0 {
        to_bound(member, member.array_size)?
    } else {
        DEFAULT_SEQUENCE_BOUND
    };
    Ok(TypeCode::sequence(element, bound))
}

fn to_bound(member: &MessageMember, bound: usize) -> Result<u32, TypeCodeError> {
    u32::try_from(bound).map_err(|_| TypeCodeError::BoundOverflow {
        member: member.name.clone(),
        bound,
    })
}
