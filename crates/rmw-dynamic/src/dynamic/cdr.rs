// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! CDR encoding/decoding for dynamic samples.
//!
//! Payloads are little-endian plain CDR preceded by the 4-byte
//! encapsulation header. Alignment is relative to the end of the header.

use super::sample::Slot;
use super::{DynamicSample, PrimitiveKind, TypeCode, TypeKind, Value};
use std::sync::Arc;
use thiserror::Error;

/// Encapsulation header for little-endian plain CDR.
pub const CDR_LE: [u8; 4] = [0x00, 0x01, 0x00, 0x00];

pub const ENCAPSULATION_HEADER_SIZE: usize = 4;

/// Errors for dynamic CDR operations.
#[derive(Debug, Error)]
pub enum CdrError {
    #[error("buffer too small: need {need} bytes, have {have}")]
    BufferTooSmall { need: usize, have: usize },
    #[error("unsupported encapsulation {0:02x?}")]
    UnsupportedEncapsulation([u8; 2]),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("sample of type '{0}' cannot be encoded at top level")]
    NotAStruct(String),
}

/// Encode a sample to CDR bytes, header included.
pub fn encode(sample: &DynamicSample) -> Result<Vec<u8>, CdrError> {
    if !sample.type_code().is_complex() {
        return Err(CdrError::NotAStruct(sample.type_code().name.clone()));
    }
    let mut encoder = CdrEncoder::new();
    encoder.encode_sample(sample)?;
    Ok(encoder.into_bytes())
}

/// Decode CDR bytes, header included, into a sample of `type_code`.
pub fn decode(bytes: &[u8], type_code: &Arc<TypeCode>) -> Result<DynamicSample, CdrError> {
    check_encapsulation(bytes)?;
    if !type_code.is_complex() {
        return Err(CdrError::NotAStruct(type_code.name.clone()));
    }
    let mut decoder = CdrDecoder::new(&bytes[ENCAPSULATION_HEADER_SIZE..]);
    decoder.decode_sample(type_code)
}

/// Validate the encapsulation header of a serialized payload.
pub fn check_encapsulation(bytes: &[u8]) -> Result<(), CdrError> {
    if bytes.len() < ENCAPSULATION_HEADER_SIZE {
        return Err(CdrError::BufferTooSmall {
            need: ENCAPSULATION_HEADER_SIZE,
            have: bytes.len(),
        });
    }
    let scheme = [bytes[0], bytes[1]];
    if scheme == [CDR_LE[0], CDR_LE[1]] {
        Ok(())
    } else {
        Err(CdrError::UnsupportedEncapsulation(scheme))
    }
}

struct CdrEncoder {
    buffer: Vec<u8>,
}

impl CdrEncoder {
    fn new() -> Self {
        let mut buffer = Vec::with_capacity(64);
        buffer.extend_from_slice(&CDR_LE);
        Self { buffer }
    }

    fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    fn align(&mut self, alignment: usize) {
        let offset = self.buffer.len() - ENCAPSULATION_HEADER_SIZE;
        let padding = (alignment - (offset % alignment)) % alignment;
        self.buffer.resize(self.buffer.len() + padding, 0);
    }

    fn write_u32(&mut self, value: u32) {
        self.align(4);
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    fn encode_sample(&mut self, sample: &DynamicSample) -> Result<(), CdrError> {
        if let TypeKind::Sequence { .. } = sample.type_code().kind {
            let len = u32::try_from(sample.slots().len())
                .map_err(|_| CdrError::InvalidData("sequence too long".into()))?;
            self.write_u32(len);
        }
        for slot in sample.slots() {
            match slot {
                Slot::Value(value) => self.encode_value(value)?,
                Slot::Complex(child) => self.encode_sample(child)?,
            }
        }
        Ok(())
    }

    fn encode_value(&mut self, value: &Value) -> Result<(), CdrError> {
        match value {
            Value::Boolean(v) => self.buffer.push(u8::from(*v)),
            Value::Octet(v) | Value::Char(v) => self.buffer.push(*v),
            Value::Short(v) => {
                self.align(2);
                self.buffer.extend_from_slice(&v.to_le_bytes());
            }
            Value::UShort(v) => {
                self.align(2);
                self.buffer.extend_from_slice(&v.to_le_bytes());
            }
            Value::Long(v) => {
                self.align(4);
                self.buffer.extend_from_slice(&v.to_le_bytes());
            }
            Value::ULong(v) => self.write_u32(*v),
            Value::LongLong(v) => {
                self.align(8);
                self.buffer.extend_from_slice(&v.to_le_bytes());
            }
            Value::ULongLong(v) => {
                self.align(8);
                self.buffer.extend_from_slice(&v.to_le_bytes());
            }
            Value::Float(v) => {
                self.align(4);
                self.buffer.extend_from_slice(&v.to_le_bytes());
            }
            Value::Double(v) => {
                self.align(8);
                self.buffer.extend_from_slice(&v.to_le_bytes());
            }
            Value::String(s) => {
                // Length includes the NUL terminator.
                let len = u32::try_from(s.len() + 1)
                    .map_err(|_| CdrError::InvalidData("string too long".into()))?;
                self.write_u32(len);
                self.buffer.extend_from_slice(s.as_bytes());
                self.buffer.push(0);
            }
        }
        Ok(())
    }
}

struct CdrDecoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> CdrDecoder<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn align(&mut self, alignment: usize) {
        self.pos += (alignment - (self.pos % alignment)) % alignment;
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], CdrError> {
        if self.remaining() < len {
            return Err(CdrError::BufferTooSmall {
                need: self.pos + len,
                have: self.data.len(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CdrError> {
        self.align(N);
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn read_u32(&mut self) -> Result<u32, CdrError> {
        Ok(u32::from_le_bytes(self.read_array::<4>()?))
    }

    fn decode_sample(&mut self, type_code: &Arc<TypeCode>) -> Result<DynamicSample, CdrError> {
        let slots = match &type_code.kind {
            TypeKind::Struct(members) => members
                .iter()
                .map(|m| self.decode_slot(&m.type_code))
                .collect::<Result<Vec<_>, _>>()?,
            TypeKind::Array { element, length } => (0..*length)
                .map(|_| self.decode_slot(element))
                .collect::<Result<Vec<_>, _>>()?,
            TypeKind::Sequence { element, bound } => {
                let len = self.read_u32()?;
                if *bound > 0 && len > *bound {
                    return Err(CdrError::InvalidData(format!(
                        "sequence length {} exceeds bound {}",
                        len, bound
                    )));
                }
                // Every element takes at least one byte.
                if len as usize > self.remaining() {
                    return Err(CdrError::BufferTooSmall {
                        need: self.pos + len as usize,
                        have: self.data.len(),
                    });
                }
                (0..len)
                    .map(|_| self.decode_slot(element))
                    .collect::<Result<Vec<_>, _>>()?
            }
            _ => return Err(CdrError::NotAStruct(type_code.name.clone())),
        };
        Ok(DynamicSample::from_slots(Arc::clone(type_code), slots))
    }

    fn decode_slot(&mut self, type_code: &Arc<TypeCode>) -> Result<Slot, CdrError> {
        match &type_code.kind {
            TypeKind::Primitive(kind) => Ok(Slot::Value(self.decode_primitive(*kind)?)),
            TypeKind::String { bound } => {
                let s = self.decode_string()?;
                if *bound > 0 && s.len() > *bound as usize {
                    return Err(CdrError::InvalidData(format!(
                        "string length {} exceeds bound {}",
                        s.len(),
                        bound
                    )));
                }
                Ok(Slot::Value(Value::String(s)))
            }
            _ => Ok(Slot::Complex(self.decode_sample(type_code)?)),
        }
    }

    fn decode_primitive(&mut self, kind: PrimitiveKind) -> Result<Value, CdrError> {
        Ok(match kind {
            PrimitiveKind::Boolean => Value::Boolean(self.take(1)?[0] != 0),
            PrimitiveKind::Octet => Value::Octet(self.take(1)?[0]),
            PrimitiveKind::Char => Value::Char(self.take(1)?[0]),
            PrimitiveKind::Short => Value::Short(i16::from_le_bytes(self.read_array()?)),
            PrimitiveKind::UShort => Value::UShort(u16::from_le_bytes(self.read_array()?)),
            PrimitiveKind::Long => Value::Long(i32::from_le_bytes(self.read_array()?)),
            PrimitiveKind::ULong => Value::ULong(u32::from_le_bytes(self.read_array()?)),
            PrimitiveKind::LongLong => Value::LongLong(i64::from_le_bytes(self.read_array()?)),
            PrimitiveKind::ULongLong => Value::ULongLong(u64::from_le_bytes(self.read_array()?)),
            PrimitiveKind::Float => Value::Float(f32::from_le_bytes(self.read_array()?)),
            PrimitiveKind::Double => Value::Double(f64::from_le_bytes(self.read_array()?)),
        })
    }

    fn decode_string(&mut self) -> Result<String, CdrError> {
        let len = self.read_u32()? as usize;
        if len == 0 {
            return Ok(String::new());
        }
        let bytes = self.take(len)?;
        let (text, terminator) = bytes.split_at(len - 1);
        if terminator.first() != Some(&0) {
            return Err(CdrError::InvalidData("string is not NUL-terminated".into()));
        }
        Ok(String::from_utf8(text.to_vec())?)
    }
}
