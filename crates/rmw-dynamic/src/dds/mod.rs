// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-process DDS runtime.
//!
//! Supplies the entities the bridge consumes: a participant factory with a
//! QoS profile library, participants sharing a per-factory domain, topics
//! bound to registered type codes, data writers and readers exchanging CDR
//! payloads, conditions and waitsets, and a requester/replier pair that
//! correlates replies through sample identities.
//!
//! Samples are delivered synchronously inside `write`; there is no
//! transport and no discovery traffic.

mod condition;
mod identity;
mod participant;
mod qos;
mod reader;
mod rpc;
mod waitset;
mod writer;

pub use condition::{Condition, GuardCondition, StatusCondition, StatusMask, WaitSignal};
pub use identity::{Guid, SampleIdentity, SequenceNumber, GUID_PREFIX_LEN, GUID_LEN};
pub use participant::{DomainParticipantFactory, Participant, ParticipantName, Topic};
pub use qos::{
    DurabilityKind, EntityQos, HistoryKind, QosProvider, ReliabilityKind, BUILTIN_QOS_LIBRARY,
};
pub use reader::{DataReader, Sample, SampleInfo};
pub use rpc::{Replier, Requester};
pub use waitset::WaitSet;
pub use writer::{DataWriter, SerializedPayload};

use crate::dynamic::CdrError;
use thiserror::Error;

/// Errors reported by the runtime.
#[derive(Debug, Error)]
pub enum DdsError {
    #[error("type '{0}' is not registered")]
    TypeNotRegistered(String),
    #[error("type '{0}' is already registered with a different type code")]
    TypeConflict(String),
    #[error("topic '{0}' already exists")]
    TopicExists(String),
    #[error("topic '{topic}' has type '{existing}', requested '{requested}'")]
    TopicTypeMismatch {
        topic: String,
        existing: String,
        requested: String,
    },
    #[error("unknown QoS library '{0}'")]
    UnknownQosLibrary(String),
    #[error("unknown QoS profile '{profile}' in library '{library}'")]
    UnknownQosProfile { library: String, profile: String },
    #[error("no default QoS library is set")]
    NoDefaultLibrary,
    #[error("invalid QoS: {0}")]
    InvalidQos(String),
    #[error("condition {0} is already attached")]
    AlreadyAttached(u64),
    #[error("condition {0} is not attached")]
    NotAttached(u64),
    #[error("wait timed out")]
    Timeout,
    #[error("payload already loaned")]
    AlreadyLoaned,
    #[error("no payload loaned")]
    EmptyPayload,
    #[error(transparent)]
    Cdr(#[from] CdrError),
}

pub type Result<T> = std::result::Result<T, DdsError>;
