// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic data for the bridge.
//!
//! Runtime type manipulation without compile-time type knowledge.
//!
//! - **TypeCode**: runtime type description (primitives, bounded strings,
//!   structs, arrays, sequences)
//! - **DynamicData**: the position-addressed container interface the
//!   marshaler writes into and reads from
//! - **DynamicSample**: the in-process container implementation
//! - **CDR**: encode/decode samples to/from the wire format
//!
//! # Example
//!
//! ```rust
//! use rmw_dynamic::dynamic::{DynamicData, DynamicSample, PrimitiveKind, TypeCode, Value};
//!
//! let type_code = TypeCode::structure(
//!     "sensor_msgs::msg::dds_::Reading_",
//!     vec![
//!         ("id_".to_string(), TypeCode::primitive(PrimitiveKind::ULong)),
//!         ("celsius_".to_string(), TypeCode::primitive(PrimitiveKind::Double)),
//!     ],
//! );
//!
//! let mut sample = DynamicSample::new(type_code);
//! sample.set_value(1, Value::ULong(42)).unwrap();
//! sample.set_value(2, Value::Double(23.5)).unwrap();
//! assert_eq!(sample.get_value(2).unwrap(), Value::Double(23.5));
//! ```

pub mod cdr;
mod data;
mod sample;
mod type_code;
mod value;

pub use cdr::{decode, encode, CdrError};
pub use data::{DataError, DynamicData};
pub use sample::DynamicSample;
pub use type_code::{MemberDescriptor, MemberId, PrimitiveKind, TypeCode, TypeKind};
pub use value::{ArrayValue, Value};
