// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-erased, introspectable message descriptions.
//!
//! A [`MessageMembers`] tree describes the layout of a native message type:
//! one [`MessageMember`] per field, in declaration order, each carrying its
//! rosidl type id, bounds, an optional nested description and an
//! [`Accessor`] that reads and writes the field on a native value passed as
//! `&dyn Any`. Descriptions are built once per message type and shared by
//! `Arc` across every marshal call.

mod access;

pub use access::{Accessor, FieldValue, NativeValue};

use std::fmt;
use std::sync::Arc;

pub const ROS_TYPE_FLOAT32: u8 = 1;
pub const ROS_TYPE_FLOAT64: u8 = 2;
pub const ROS_TYPE_LONG_DOUBLE: u8 = 3;
pub const ROS_TYPE_CHAR: u8 = 4;
pub const ROS_TYPE_WCHAR: u8 = 5;
pub const ROS_TYPE_BOOL: u8 = 6;
pub const ROS_TYPE_BYTE: u8 = 7;
pub const ROS_TYPE_UINT8: u8 = 8;
pub const ROS_TYPE_INT8: u8 = 9;
pub const ROS_TYPE_UINT16: u8 = 10;
pub const ROS_TYPE_INT16: u8 = 11;
pub const ROS_TYPE_UINT32: u8 = 12;
pub const ROS_TYPE_INT32: u8 = 13;
pub const ROS_TYPE_UINT64: u8 = 14;
pub const ROS_TYPE_INT64: u8 = 15;
pub const ROS_TYPE_STRING: u8 = 16;
pub const ROS_TYPE_WSTRING: u8 = 17;
pub const ROS_TYPE_MESSAGE: u8 = 18;

/// Type-support identifier carried by every description built in this crate.
pub const INTROSPECTION_IDENTIFIER: &str = "rosidl_typesupport_introspection_rs";

/// Field kinds the bridge knows how to marshal.
///
/// Every rosidl type id outside this set (long double, wide char, wide
/// string, or an out-of-range value) is rejected when a member is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    Byte,
    Char,
    Float32,
    Float64,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    String,
    Message,
}

impl FieldKind {
    /// Resolve a raw rosidl type id.
    #[must_use]
    pub const fn from_type_id(type_id: u8) -> Option<Self> {
        match type_id {
            ROS_TYPE_BOOL => Some(Self::Bool),
            ROS_TYPE_BYTE => Some(Self::Byte),
            ROS_TYPE_CHAR => Some(Self::Char),
            ROS_TYPE_FLOAT32 => Some(Self::Float32),
            ROS_TYPE_FLOAT64 => Some(Self::Float64),
            ROS_TYPE_INT8 => Some(Self::Int8),
            ROS_TYPE_UINT8 => Some(Self::Uint8),
            ROS_TYPE_INT16 => Some(Self::Int16),
            ROS_TYPE_UINT16 => Some(Self::Uint16),
            ROS_TYPE_INT32 => Some(Self::Int32),
            ROS_TYPE_UINT32 => Some(Self::Uint32),
            ROS_TYPE_INT64 => Some(Self::Int64),
            ROS_TYPE_UINT64 => Some(Self::Uint64),
            ROS_TYPE_STRING => Some(Self::String),
            ROS_TYPE_MESSAGE => Some(Self::Message),
            _ => None,
        }
    }

    #[must_use]
    pub const fn type_id(self) -> u8 {
        match self {
            Self::Bool => ROS_TYPE_BOOL,
            Self::Byte => ROS_TYPE_BYTE,
            Self::Char => ROS_TYPE_CHAR,
            Self::Float32 => ROS_TYPE_FLOAT32,
            Self::Float64 => ROS_TYPE_FLOAT64,
            Self::Int8 => ROS_TYPE_INT8,
            Self::Uint8 => ROS_TYPE_UINT8,
            Self::Int16 => ROS_TYPE_INT16,
            Self::Uint16 => ROS_TYPE_UINT16,
            Self::Int32 => ROS_TYPE_INT32,
            Self::Uint32 => ROS_TYPE_UINT32,
            Self::Int64 => ROS_TYPE_INT64,
            Self::Uint64 => ROS_TYPE_UINT64,
            Self::String => ROS_TYPE_STRING,
            Self::Message => ROS_TYPE_MESSAGE,
        }
    }

    /// True for every kind that maps onto a container primitive.
    #[must_use]
    pub const fn is_primitive(self) -> bool {
        !matches!(self, Self::String | Self::Message)
    }
}

/// One field of a message description.
#[derive(Clone)]
pub struct MessageMember {
    pub name: String,
    pub type_id: u8,
    /// Maximum string length in bytes, 0 when unbounded.
    pub string_upper_bound: usize,
    pub is_array: bool,
    /// Fixed length, or sequence bound when `is_upper_bound` is set; 0 for
    /// an unbounded sequence.
    pub array_size: usize,
    pub is_upper_bound: bool,
    /// Nested description, present whenever `type_id` is a message.
    pub members: Option<Arc<MessageMembers>>,
    pub accessor: Accessor,
}

impl MessageMember {
    /// Scalar member of the given kind.
    pub fn new(name: impl Into<String>, kind: FieldKind, accessor: Accessor) -> Self {
        Self::with_type_id(name, kind.type_id(), accessor)
    }

    /// Member carrying a raw type id, including ids the bridge cannot map.
    pub fn with_type_id(name: impl Into<String>, type_id: u8, accessor: Accessor) -> Self {
        Self {
            name: name.into(),
            type_id,
            string_upper_bound: 0,
            is_array: false,
            array_size: 0,
            is_upper_bound: false,
            members: None,
            accessor,
        }
    }

    /// Nested message member.
    pub fn message(
        name: impl Into<String>,
        members: Arc<MessageMembers>,
        accessor: Accessor,
    ) -> Self {
        let mut member = Self::new(name, FieldKind::Message, accessor);
        member.members = Some(members);
        member
    }

    /// Turn this member into a fixed-length array.
    #[must_use]
    pub fn fixed_array(mut self, length: usize) -> Self {
        self.is_array = true;
        self.array_size = length;
        self.is_upper_bound = false;
        self
    }

    /// Turn this member into a sequence bounded by `bound`.
    #[must_use]
    pub fn bounded_sequence(mut self, bound: usize) -> Self {
        self.is_array = true;
        self.array_size = bound;
        self.is_upper_bound = true;
        self
    }

    /// Turn this member into an unbounded sequence.
    #[must_use]
    pub fn sequence(mut self) -> Self {
        self.is_array = true;
        self.array_size = 0;
        self.is_upper_bound = false;
        self
    }

    #[must_use]
    pub fn string_bound(mut self, bound: usize) -> Self {
        self.string_upper_bound = bound;
        self
    }

    #[must_use]
    pub fn kind(&self) -> Option<FieldKind> {
        FieldKind::from_type_id(self.type_id)
    }

    /// Fixed-length array (as opposed to a bounded or unbounded sequence).
    #[must_use]
    pub fn is_fixed_array(&self) -> bool {
        self.is_array && self.array_size > 0 && !self.is_upper_bound
    }

    #[must_use]
    pub fn is_sequence(&self) -> bool {
        self.is_array && !self.is_fixed_array()
    }
}

impl fmt::Debug for MessageMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageMember")
            .field("name", &self.name)
            .field("type_id", &self.type_id)
            .field("string_upper_bound", &self.string_upper_bound)
            .field("is_array", &self.is_array)
            .field("array_size", &self.array_size)
            .field("is_upper_bound", &self.is_upper_bound)
            .field(
                "members",
                &self.members.as_ref().map(|m| m.message_name.as_str()),
            )
            .finish_non_exhaustive()
    }
}

/// Ordered field list of one message type.
#[derive(Debug, Clone)]
pub struct MessageMembers {
    pub package_name: String,
    pub message_name: String,
    pub members: Vec<MessageMember>,
}

impl MessageMembers {
    pub fn new(
        package_name: impl Into<String>,
        message_name: impl Into<String>,
        members: Vec<MessageMember>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            message_name: message_name.into(),
            members,
        }
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Request/response pair of one service type.
#[derive(Debug, Clone)]
pub struct ServiceMembers {
    pub package_name: String,
    pub service_name: String,
    pub request: Arc<MessageMembers>,
    pub response: Arc<MessageMembers>,
}

impl ServiceMembers {
    pub fn new(
        package_name: impl Into<String>,
        service_name: impl Into<String>,
        request: Arc<MessageMembers>,
        response: Arc<MessageMembers>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            service_name: service_name.into(),
            request,
            response,
        }
    }
}

#[cfg(test)]
mod tests;
