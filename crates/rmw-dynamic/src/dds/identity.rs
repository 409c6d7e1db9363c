// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Entity and sample identities.

use std::fmt;

pub const GUID_PREFIX_LEN: usize = 12;
pub const GUID_LEN: usize = 16;

/// 16-byte entity GUID: 12-byte participant prefix followed by a 4-byte
/// entity id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Guid {
    pub prefix: [u8; GUID_PREFIX_LEN],
    pub entity_id: [u8; 4],
}

impl Guid {
    pub const UNKNOWN: Guid = Guid {
        prefix: [0; GUID_PREFIX_LEN],
        entity_id: [0; 4],
    };

    pub const fn new(prefix: [u8; GUID_PREFIX_LEN], entity_id: [u8; 4]) -> Self {
        Self { prefix, entity_id }
    }

    pub fn to_bytes(&self) -> [u8; GUID_LEN] {
        let mut bytes = [0u8; GUID_LEN];
        bytes[..GUID_PREFIX_LEN].copy_from_slice(&self.prefix);
        bytes[GUID_PREFIX_LEN..].copy_from_slice(&self.entity_id);
        bytes
    }

    pub fn from_bytes(bytes: [u8; GUID_LEN]) -> Self {
        let mut prefix = [0u8; GUID_PREFIX_LEN];
        let mut entity_id = [0u8; 4];
        prefix.copy_from_slice(&bytes[..GUID_PREFIX_LEN]);
        entity_id.copy_from_slice(&bytes[GUID_PREFIX_LEN..]);
        Self { prefix, entity_id }
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.prefix {
            write!(f, "{:02x}", byte)?;
        }
        f.write_str(".")?;
        for byte in &self.entity_id {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// 64-bit sequence number carried as a signed high word and an unsigned
/// low word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SequenceNumber {
    pub high: i32,
    pub low: u32,
}

impl SequenceNumber {
    pub const UNKNOWN: SequenceNumber = SequenceNumber { high: -1, low: 0 };

    pub const fn new(high: i32, low: u32) -> Self {
        Self { high, low }
    }
}

impl From<i64> for SequenceNumber {
    fn from(value: i64) -> Self {
        Self {
            high: (value >> 32) as i32,
            low: (value & 0xFFFF_FFFF) as u32,
        }
    }
}

impl From<SequenceNumber> for i64 {
    fn from(sn: SequenceNumber) -> Self {
        (i64::from(sn.high) << 32) | i64::from(sn.low)
    }
}

/// Writer GUID plus sequence number: identifies one sample in the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SampleIdentity {
    pub writer_guid: Guid,
    pub sequence_number: SequenceNumber,
}

impl SampleIdentity {
    pub const UNKNOWN: SampleIdentity = SampleIdentity {
        writer_guid: Guid::UNKNOWN,
        sequence_number: SequenceNumber::UNKNOWN,
    };

    pub const fn new(writer_guid: Guid, sequence_number: SequenceNumber) -> Self {
        Self {
            writer_guid,
            sequence_number,
        }
    }
}
