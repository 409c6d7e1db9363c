// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Values held by a dynamic sample.

use super::PrimitiveKind;

/// A single primitive or string value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Octet(u8),
    Char(u8),
    Short(i16),
    UShort(u16),
    Long(i32),
    ULong(u32),
    LongLong(i64),
    ULongLong(u64),
    Float(f32),
    Double(f64),
    String(String),
}

impl Value {
    /// Zero value of a primitive kind.
    pub fn default_for(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Boolean => Self::Boolean(false),
            PrimitiveKind::Octet => Self::Octet(0),
            PrimitiveKind::Char => Self::Char(0),
            PrimitiveKind::Short => Self::Short(0),
            PrimitiveKind::UShort => Self::UShort(0),
            PrimitiveKind::Long => Self::Long(0),
            PrimitiveKind::ULong => Self::ULong(0),
            PrimitiveKind::LongLong => Self::LongLong(0),
            PrimitiveKind::ULongLong => Self::ULongLong(0),
            PrimitiveKind::Float => Self::Float(0.0),
            PrimitiveKind::Double => Self::Double(0.0),
        }
    }

    /// Primitive kind of this value, `None` for strings.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        Some(match self {
            Self::Boolean(_) => PrimitiveKind::Boolean,
            Self::Octet(_) => PrimitiveKind::Octet,
            Self::Char(_) => PrimitiveKind::Char,
            Self::Short(_) => PrimitiveKind::Short,
            Self::UShort(_) => PrimitiveKind::UShort,
            Self::Long(_) => PrimitiveKind::Long,
            Self::ULong(_) => PrimitiveKind::ULong,
            Self::LongLong(_) => PrimitiveKind::LongLong,
            Self::ULongLong(_) => PrimitiveKind::ULongLong,
            Self::Float(_) => PrimitiveKind::Float,
            Self::Double(_) => PrimitiveKind::Double,
            Self::String(_) => return None,
        })
    }

    pub fn kind_name(&self) -> &'static str {
        self.primitive_kind().map_or("string", PrimitiveKind::name)
    }
}

/// A homogeneous primitive array, the unit of bulk get/set.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValue {
    Boolean(Vec<bool>),
    Octet(Vec<u8>),
    Char(Vec<u8>),
    Short(Vec<i16>),
    UShort(Vec<u16>),
    Long(Vec<i32>),
    ULong(Vec<u32>),
    LongLong(Vec<i64>),
    ULongLong(Vec<u64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

macro_rules! for_each_array {
    ($array:expr, $items:ident => $body:expr) => {
        match $array {
            ArrayValue::Boolean($items) => $body,
            ArrayValue::Octet($items) => $body,
            ArrayValue::Char($items) => $body,
            ArrayValue::Short($items) => $body,
            ArrayValue::UShort($items) => $body,
            ArrayValue::Long($items) => $body,
            ArrayValue::ULong($items) => $body,
            ArrayValue::LongLong($items) => $body,
            ArrayValue::ULongLong($items) => $body,
            ArrayValue::Float($items) => $body,
            ArrayValue::Double($items) => $body,
        }
    };
}

macro_rules! collect_values {
    ($values:expr, $variant:ident) => {
        $values
            .into_iter()
            .map(|v| match v {
                Value::$variant(x) => Some(x),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(ArrayValue::$variant)
    };
}

impl ArrayValue {
    pub fn len(&self) -> usize {
        for_each_array!(self, items => items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element_kind(&self) -> PrimitiveKind {
        match self {
            Self::Boolean(_) => PrimitiveKind::Boolean,
            Self::Octet(_) => PrimitiveKind::Octet,
            Self::Char(_) => PrimitiveKind::Char,
            Self::Short(_) => PrimitiveKind::Short,
            Self::UShort(_) => PrimitiveKind::UShort,
            Self::Long(_) => PrimitiveKind::Long,
            Self::ULong(_) => PrimitiveKind::ULong,
            Self::LongLong(_) => PrimitiveKind::LongLong,
            Self::ULongLong(_) => PrimitiveKind::ULongLong,
            Self::Float(_) => PrimitiveKind::Float,
            Self::Double(_) => PrimitiveKind::Double,
        }
    }

    /// Split into individual values.
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Self::Boolean(v) => v.into_iter().map(Value::Boolean).collect(),
            Self::Octet(v) => v.into_iter().map(Value::Octet).collect(),
            Self::Char(v) => v.into_iter().map(Value::Char).collect(),
            Self::Short(v) => v.into_iter().map(Value::Short).collect(),
            Self::UShort(v) => v.into_iter().map(Value::UShort).collect(),
            Self::Long(v) => v.into_iter().map(Value::Long).collect(),
            Self::ULong(v) => v.into_iter().map(Value::ULong).collect(),
            Self::LongLong(v) => v.into_iter().map(Value::LongLong).collect(),
            Self::ULongLong(v) => v.into_iter().map(Value::ULongLong).collect(),
            Self::Float(v) => v.into_iter().map(Value::Float).collect(),
            Self::Double(v) => v.into_iter().map(Value::Double).collect(),
        }
    }

    /// Gather values of one kind back into an array.
    ///
    /// Returns `None` if any value is not of `kind`.
    pub fn from_values(kind: PrimitiveKind, values: Vec<Value>) -> Option<Self> {
        match kind {
            PrimitiveKind::Boolean => collect_values!(values, Boolean),
            PrimitiveKind::Octet => collect_values!(values, Octet),
            PrimitiveKind::Char => collect_values!(values, Char),
            PrimitiveKind::Short => collect_values!(values, Short),
            PrimitiveKind::UShort => collect_values!(values, UShort),
            PrimitiveKind::Long => collect_values!(values, Long),
            PrimitiveKind::ULong => collect_values!(values, ULong),
            PrimitiveKind::LongLong => collect_values!(values, LongLong),
            PrimitiveKind::ULongLong => collect_values!(values, ULongLong),
            PrimitiveKind::Float => collect_values!(values, Float),
            PrimitiveKind::Double => collect_values!(values, Double),
        }
    }
}
