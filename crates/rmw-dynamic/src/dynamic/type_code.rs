// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type codes describing the layout of a dynamic sample.

use std::fmt;
use std::sync::Arc;

/// 1-based member position inside a struct, or element position inside a
/// collection.
pub type MemberId = u32;

/// Primitive container kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Octet,
    Char,
    Short,
    UShort,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Float,
    Double,
}

impl PrimitiveKind {
    /// Size in bytes on the wire.
    pub const fn size(self) -> usize {
        match self {
            Self::Boolean | Self::Octet | Self::Char => 1,
            Self::Short | Self::UShort => 2,
            Self::Long | Self::ULong | Self::Float => 4,
            Self::LongLong | Self::ULongLong | Self::Double => 8,
        }
    }

    /// CDR alignment requirement.
    pub const fn alignment(self) -> usize {
        self.size()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Octet => "octet",
            Self::Char => "char",
            Self::Short => "short",
            Self::UShort => "unsigned short",
            Self::Long => "long",
            Self::ULong => "unsigned long",
            Self::LongLong => "long long",
            Self::ULongLong => "unsigned long long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Primitive(PrimitiveKind),
    /// Bounded string; a bound of 0 means unbounded.
    String { bound: u32 },
    Struct(Vec<MemberDescriptor>),
    Array { element: Arc<TypeCode>, length: u32 },
    /// Sequence; a bound of 0 means unbounded.
    Sequence { element: Arc<TypeCode>, bound: u32 },
}

/// A complete type code.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeCode {
    pub name: String,
    pub kind: TypeKind,
}

impl TypeCode {
    pub fn primitive(kind: PrimitiveKind) -> Arc<Self> {
        Arc::new(Self {
            name: kind.name().to_string(),
            kind: TypeKind::Primitive(kind),
        })
    }

    pub fn string(bound: u32) -> Arc<Self> {
        Arc::new(Self {
            name: format!("string<{}>", bound),
            kind: TypeKind::String { bound },
        })
    }

    pub fn array(element: Arc<TypeCode>, length: u32) -> Arc<Self> {
        Arc::new(Self {
            name: format!("{}[{}]", element.name, length),
            kind: TypeKind::Array { element, length },
        })
    }

    pub fn sequence(element: Arc<TypeCode>, bound: u32) -> Arc<Self> {
        Arc::new(Self {
            name: format!("sequence<{}, {}>", element.name, bound),
            kind: TypeKind::Sequence { element, bound },
        })
    }

    /// Struct type code; member ids are assigned by position, starting at 1.
    pub fn structure(name: impl Into<String>, members: Vec<(String, Arc<TypeCode>)>) -> Arc<Self> {
        let members = members
            .into_iter()
            .zip(1..)
            .map(|((name, type_code), id)| MemberDescriptor {
                name,
                id,
                type_code,
            })
            .collect();
        Arc::new(Self {
            name: name.into(),
            kind: TypeKind::Struct(members),
        })
    }

    pub fn members(&self) -> Option<&[MemberDescriptor]> {
        match &self.kind {
            TypeKind::Struct(members) => Some(members),
            _ => None,
        }
    }

    pub fn member(&self, id: MemberId) -> Option<&MemberDescriptor> {
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        self.members()?.get(index)
    }

    pub fn member_by_name(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members()?.iter().find(|m| m.name == name)
    }

    /// Element type of an array or sequence.
    pub fn element(&self) -> Option<&Arc<TypeCode>> {
        match &self.kind {
            TypeKind::Array { element, .. } | TypeKind::Sequence { element, .. } => Some(element),
            _ => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.kind, TypeKind::Array { .. } | TypeKind::Sequence { .. })
    }

    /// True for types stored as a nested sample rather than a single value.
    pub fn is_complex(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Struct(_) | TypeKind::Array { .. } | TypeKind::Sequence { .. }
        )
    }

    /// CDR alignment requirement.
    pub fn alignment(&self) -> usize {
        match &self.kind {
            TypeKind::Primitive(p) => p.alignment(),
            TypeKind::String { .. } => 4,
            TypeKind::Struct(members) => members
                .iter()
                .map(|m| m.type_code.alignment())
                .max()
                .unwrap_or(1),
            TypeKind::Array { element, .. } => element.alignment(),
            TypeKind::Sequence { element, .. } => element.alignment().max(4),
        }
    }
}

/// Struct member descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDescriptor {
    pub name: String,
    pub id: MemberId,
    pub type_code: Arc<TypeCode>,
}
