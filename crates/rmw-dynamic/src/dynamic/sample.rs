// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-process dynamic data container.

use super::{
    ArrayValue, DataError, DynamicData, MemberId, PrimitiveKind, TypeCode, TypeKind, Value,
};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Slot {
    Value(Value),
    Complex(DynamicSample),
}

/// A runtime sample laid out by its [`TypeCode`].
///
/// Struct samples hold one slot per member, collection samples one slot per
/// element. Every write is validated against the type code: value kinds,
/// fixed array lengths, sequence bounds and string bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicSample {
    type_code: Arc<TypeCode>,
    slots: Vec<Slot>,
    bound: Option<MemberId>,
}

impl DynamicSample {
    /// Create a sample with every member at its default value.
    pub fn new(type_code: Arc<TypeCode>) -> Self {
        let slots = default_slots(&type_code);
        Self {
            type_code,
            slots,
            bound: None,
        }
    }

    pub fn type_code(&self) -> &Arc<TypeCode> {
        &self.type_code
    }

    /// Look up a primitive or string member by name.
    pub fn value_by_name(&self, name: &str) -> Result<Value, DataError> {
        let id = self
            .type_code
            .member_by_name(name)
            .map(|m| m.id)
            .ok_or(DataError::MemberNotFound(0))?;
        self.get_value(id)
    }

    pub(crate) fn from_slots(type_code: Arc<TypeCode>, slots: Vec<Slot>) -> Self {
        Self {
            type_code,
            slots,
            bound: None,
        }
    }

    pub(crate) fn slots(&self) -> &[Slot] {
        &self.slots
    }

    fn ensure_unbound(&self) -> Result<(), DataError> {
        match self.bound {
            Some(id) => Err(DataError::MemberBound(id)),
            None => Ok(()),
        }
    }

    /// Type of the slot a write at `id` lands in, including the append
    /// position of a sequence.
    fn writable_type(&self, id: MemberId) -> Result<Arc<TypeCode>, DataError> {
        let index = slot_index(id)?;
        match &self.type_code.kind {
            TypeKind::Struct(_) => self
                .type_code
                .member(id)
                .map(|m| Arc::clone(&m.type_code))
                .ok_or(DataError::MemberNotFound(id)),
            TypeKind::Array { element, length } if index < *length as usize => {
                Ok(Arc::clone(element))
            }
            TypeKind::Sequence { element, bound } => {
                let len = self.slots.len();
                if index > len {
                    return Err(DataError::MemberNotFound(id));
                }
                if index == len && *bound > 0 && len >= *bound as usize {
                    return Err(DataError::BoundExceeded {
                        id,
                        length: len + 1,
                        bound: *bound as usize,
                    });
                }
                Ok(Arc::clone(element))
            }
            _ => Err(DataError::MemberNotFound(id)),
        }
    }

    /// Primitive element kind and length rule of a primitive array member.
    fn array_member(&self, id: MemberId) -> Result<(PrimitiveKind, ArrayLength), DataError> {
        let member = self
            .type_code
            .member(id)
            .ok_or(DataError::MemberNotFound(id))?;
        let (element, length) = match &member.type_code.kind {
            TypeKind::Array { element, length } => (element, ArrayLength::Fixed(*length)),
            TypeKind::Sequence { element, bound } => (element, ArrayLength::Bounded(*bound)),
            _ => return Err(DataError::NotArray { id }),
        };
        match element.kind {
            TypeKind::Primitive(kind) => Ok((kind, length)),
            _ => Err(DataError::NotArray { id }),
        }
    }
}

enum ArrayLength {
    Fixed(u32),
    Bounded(u32),
}

fn slot_index(id: MemberId) -> Result<usize, DataError> {
    id.checked_sub(1)
        .and_then(|i| usize::try_from(i).ok())
        .ok_or(DataError::MemberNotFound(id))
}

fn default_slot(type_code: &Arc<TypeCode>) -> Slot {
    match &type_code.kind {
        TypeKind::Primitive(kind) => Slot::Value(Value::default_for(*kind)),
        TypeKind::String { .. } => Slot::Value(Value::String(String::new())),
        _ => Slot::Complex(DynamicSample::new(Arc::clone(type_code))),
    }
}

fn default_slots(type_code: &TypeCode) -> Vec<Slot> {
    match &type_code.kind {
        TypeKind::Struct(members) => members.iter().map(|m| default_slot(&m.type_code)).collect(),
        TypeKind::Array { element, length } => (0..*length).map(|_| default_slot(element)).collect(),
        _ => Vec::new(),
    }
}

fn check_value(id: MemberId, type_code: &TypeCode, value: &Value) -> Result<(), DataError> {
    match (&type_code.kind, value) {
        (TypeKind::String { bound }, Value::String(s)) => {
            if *bound > 0 && s.len() > *bound as usize {
                Err(DataError::BoundExceeded {
                    id,
                    length: s.len(),
                    bound: *bound as usize,
                })
            } else {
                Ok(())
            }
        }
        (TypeKind::Primitive(kind), v) if v.primitive_kind() == Some(*kind) => Ok(()),
        (TypeKind::Primitive(kind), v) => Err(DataError::KindMismatch {
            id,
            expected: kind.name().to_string(),
            found: v.kind_name().to_string(),
        }),
        (TypeKind::String { .. }, v) => Err(DataError::KindMismatch {
            id,
            expected: "string".to_string(),
            found: v.kind_name().to_string(),
        }),
        _ => Err(DataError::NotPrimitive { id }),
    }
}

impl DynamicData for DynamicSample {
    fn set_value(&mut self, id: MemberId, value: Value) -> Result<(), DataError> {
        self.ensure_unbound()?;
        let slot_type = self.writable_type(id)?;
        check_value(id, &slot_type, &value)?;
        let index = slot_index(id)?;
        if index == self.slots.len() {
            self.slots.push(Slot::Value(value));
        } else {
            self.slots[index] = Slot::Value(value);
        }
        Ok(())
    }

    fn get_value(&self, id: MemberId) -> Result<Value, DataError> {
        self.ensure_unbound()?;
        match self.slots.get(slot_index(id)?) {
            Some(Slot::Value(value)) => Ok(value.clone()),
            Some(Slot::Complex(_)) => Err(DataError::NotPrimitive { id }),
            None => Err(DataError::MemberNotFound(id)),
        }
    }

    fn set_array(&mut self, id: MemberId, values: ArrayValue) -> Result<(), DataError> {
        self.ensure_unbound()?;
        let (kind, length) = self.array_member(id)?;
        if values.element_kind() != kind {
            return Err(DataError::KindMismatch {
                id,
                expected: kind.name().to_string(),
                found: values.element_kind().name().to_string(),
            });
        }
        match length {
            ArrayLength::Fixed(expected) if values.len() != expected as usize => {
                return Err(DataError::LengthMismatch {
                    id,
                    expected: expected as usize,
                    found: values.len(),
                });
            }
            ArrayLength::Bounded(bound) if bound > 0 && values.len() > bound as usize => {
                return Err(DataError::BoundExceeded {
                    id,
                    length: values.len(),
                    bound: bound as usize,
                });
            }
            _ => {}
        }
        match self.slots.get_mut(slot_index(id)?) {
            Some(Slot::Complex(child)) => {
                child.slots = values.into_values().into_iter().map(Slot::Value).collect();
                Ok(())
            }
            _ => Err(DataError::NotArray { id }),
        }
    }

    fn get_array(&self, id: MemberId) -> Result<ArrayValue, DataError> {
        self.ensure_unbound()?;
        let (kind, _) = self.array_member(id)?;
        let Some(Slot::Complex(child)) = self.slots.get(slot_index(id)?) else {
            return Err(DataError::NotArray { id });
        };
        let values = child
            .slots
            .iter()
            .map(|slot| match slot {
                Slot::Value(v) => Some(v.clone()),
                Slot::Complex(_) => None,
            })
            .collect::<Option<Vec<_>>>()
            .ok_or(DataError::NotArray { id })?;
        ArrayValue::from_values(kind, values).ok_or(DataError::NotArray { id })
    }

    fn bind_complex_member(&mut self, id: MemberId) -> Result<&mut dyn DynamicData, DataError> {
        self.ensure_unbound()?;
        let index = slot_index(id)?;
        if index == self.slots.len() {
            if let TypeKind::Sequence { element, .. } = &self.type_code.kind {
                if !element.is_complex() {
                    return Err(DataError::NotComplex { id });
                }
                let element = self.writable_type(id)?;
                self.slots.push(Slot::Complex(DynamicSample::new(element)));
            }
        }
        match self.slots.get_mut(index) {
            Some(Slot::Complex(child)) => {
                self.bound = Some(id);
                Ok(child)
            }
            Some(Slot::Value(_)) => Err(DataError::NotComplex { id }),
            None => Err(DataError::MemberNotFound(id)),
        }
    }

    fn unbind_complex_member(&mut self, id: MemberId) -> Result<(), DataError> {
        if self.bound == Some(id) {
            self.bound = None;
            Ok(())
        } else {
            Err(DataError::NotBound(id))
        }
    }

    fn complex_member(&self, id: MemberId) -> Result<&dyn DynamicData, DataError> {
        self.ensure_unbound()?;
        match self.slots.get(slot_index(id)?) {
            Some(Slot::Complex(child)) => Ok(child),
            Some(Slot::Value(_)) => Err(DataError::NotComplex { id }),
            None => Err(DataError::MemberNotFound(id)),
        }
    }

    fn member_count(&self) -> u32 {
        match &self.type_code.kind {
            TypeKind::Struct(members) => u32::try_from(members.len()).unwrap_or(u32::MAX),
            _ => u32::try_from(self.slots.len()).unwrap_or(u32::MAX),
        }
    }

    fn clear_all_members(&mut self) -> Result<(), DataError> {
        self.slots = default_slots(&self.type_code);
        self.bound = None;
        Ok(())
    }
}
