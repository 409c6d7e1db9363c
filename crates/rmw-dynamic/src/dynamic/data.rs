// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The dynamic data container interface consumed by the marshaler.

use super::{ArrayValue, MemberId, Value};
use thiserror::Error;

/// Errors reported by a dynamic data container.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("member {0} does not exist")]
    MemberNotFound(MemberId),
    #[error("member {id} holds {expected}, got {found}")]
    KindMismatch {
        id: MemberId,
        expected: String,
        found: String,
    },
    #[error("member {id} is not a primitive or string")]
    NotPrimitive { id: MemberId },
    #[error("member {id} is not a complex member")]
    NotComplex { id: MemberId },
    #[error("member {id} is not a primitive array or sequence")]
    NotArray { id: MemberId },
    #[error("array member {id} expects {expected} elements, got {found}")]
    LengthMismatch {
        id: MemberId,
        expected: usize,
        found: usize,
    },
    #[error("member {id}: length {length} exceeds bound {bound}")]
    BoundExceeded {
        id: MemberId,
        length: usize,
        bound: usize,
    },
    #[error("member {0} is currently bound")]
    MemberBound(MemberId),
    #[error("member {0} is not bound")]
    NotBound(MemberId),
}

/// Position-addressed access to a runtime sample.
///
/// Member ids are 1-based positions: struct members in declaration order,
/// collection elements by index. While a complex member is bound, the
/// parent rejects every other operation until it is unbound again.
pub trait DynamicData: Send {
    /// Set a primitive or string member.
    fn set_value(&mut self, id: MemberId, value: Value) -> Result<(), DataError>;

    fn get_value(&self, id: MemberId) -> Result<Value, DataError>;

    /// Replace the content of a primitive array or sequence member.
    fn set_array(&mut self, id: MemberId, values: ArrayValue) -> Result<(), DataError>;

    fn get_array(&self, id: MemberId) -> Result<ArrayValue, DataError>;

    /// Bind a struct, array or sequence member for writing. Binding one
    /// position past the end of a sequence of complex elements appends a
    /// default element.
    fn bind_complex_member(&mut self, id: MemberId) -> Result<&mut dyn DynamicData, DataError>;

    fn unbind_complex_member(&mut self, id: MemberId) -> Result<(), DataError>;

    /// Read-only view of a complex member.
    fn complex_member(&self, id: MemberId) -> Result<&dyn DynamicData, DataError>;

    /// Struct member count, or collection length.
    fn member_count(&self) -> u32;

    /// Reset every member to its default and drop any binding.
    fn clear_all_members(&mut self) -> Result<(), DataError>;
}
