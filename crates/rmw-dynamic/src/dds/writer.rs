// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DataWriter and the loanable serialized payload container.

use super::identity::{Guid, SampleIdentity, SequenceNumber};
use super::participant::{BindToken, Domain, MatchKey, Topic};
use super::qos::{DurabilityKind, EntityQos};
use super::reader::{ReaderCore, Sample, SampleInfo};
use super::{DdsError, Result};
use crate::dynamic::{cdr, DynamicSample};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Send side registered with the domain.
pub(crate) struct WriterCore {
    pub(crate) guid: Guid,
    pub(crate) qos: EntityQos,
    /// Last sequence number handed out; the first write gets 1.
    last_sn: Mutex<i64>,
    /// Retained samples for late-joining transient-local readers.
    history: Mutex<VecDeque<Sample>>,
}

impl WriterCore {
    pub(crate) fn new(guid: Guid, qos: EntityQos) -> Self {
        Self {
            guid,
            qos,
            last_sn: Mutex::new(0),
            history: Mutex::new(VecDeque::new()),
        }
    }

    /// Replay retained samples into a reader that just matched.
    pub(crate) fn replay_to(&self, reader: &ReaderCore) {
        if self.qos.durability != DurabilityKind::TransientLocal
            || reader.qos.durability != DurabilityKind::TransientLocal
        {
            return;
        }
        for sample in self.history.lock().iter() {
            reader.deliver(sample.clone());
        }
    }
}

/// Writer bound to one topic.
pub struct DataWriter {
    core: Arc<WriterCore>,
    topic: Topic,
    domain: Arc<Domain>,
    key: MatchKey,
    _token: BindToken,
}

impl DataWriter {
    pub(crate) fn new(
        core: Arc<WriterCore>,
        topic: Topic,
        domain: Arc<Domain>,
        key: MatchKey,
        token: BindToken,
    ) -> Self {
        Self {
            core,
            topic,
            domain,
            key,
            _token: token,
        }
    }

    pub fn guid(&self) -> Guid {
        self.core.guid
    }

    pub fn qos(&self) -> &EntityQos {
        &self.core.qos
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Serialize `data` and deliver it to every matched reader.
    pub fn write(&self, data: &DynamicSample) -> Result<SampleIdentity> {
        self.write_related(data, SampleIdentity::UNKNOWN)
    }

    /// Like [`write`](Self::write), tagging the sample as related to
    /// `related` (used for replies).
    pub fn write_related(
        &self,
        data: &DynamicSample,
        related: SampleIdentity,
    ) -> Result<SampleIdentity> {
        if data.type_code().name != self.topic.type_name() {
            return Err(DdsError::TopicTypeMismatch {
                topic: self.topic.name().to_string(),
                existing: self.topic.type_name().to_string(),
                requested: data.type_code().name.clone(),
            });
        }
        let bytes = cdr::encode(data)?;
        Ok(self.publish(Arc::from(bytes), related, true))
    }

    /// Deliver an already serialized payload as-is.
    pub fn write_payload(&self, payload: &SerializedPayload<'_>) -> Result<SampleIdentity> {
        let bytes = payload.bytes().ok_or(DdsError::EmptyPayload)?;
        Ok(self.publish(Arc::from(bytes), SampleIdentity::UNKNOWN, true))
    }

    /// Number of readers currently receiving from this writer.
    pub fn matched_reader_count(&self) -> usize {
        self.domain.matched_readers(&self.key, &self.core.qos).len()
    }

    fn publish(&self, payload: Arc<[u8]>, related: SampleIdentity, valid_data: bool) -> SampleIdentity {
        // Holding the counter across delivery keeps per-writer order.
        let mut last_sn = self.core.last_sn.lock();
        *last_sn += 1;
        let identity = SampleIdentity::new(self.core.guid, SequenceNumber::from(*last_sn));
        let sample = Sample {
            payload,
            info: SampleInfo {
                writer_guid: self.core.guid,
                identity,
                related_identity: related,
                valid_data,
            },
        };

        if valid_data && self.core.qos.durability == DurabilityKind::TransientLocal {
            let mut history = self.core.history.lock();
            if history.len() >= self.core.qos.capacity() {
                history.pop_front();
            }
            history.push_back(sample.clone());
        }

        let readers = self.domain.matched_readers(&self.key, &self.core.qos);
        log::debug!(
            "[dds] writer {} seq={} -> {} reader(s) on '{}'",
            self.core.guid,
            *last_sn,
            readers.len(),
            self.topic.name()
        );
        for reader in readers {
            reader.deliver(sample.clone());
        }
        identity
    }
}

impl Drop for DataWriter {
    fn drop(&mut self) {
        // Matched readers see a payload-less sample announcing the writer is gone.
        self.publish(Arc::from(Vec::<u8>::new()), SampleIdentity::UNKNOWN, false);
    }
}

impl std::fmt::Debug for DataWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataWriter")
            .field("guid", &self.core.guid)
            .field("topic", &self.topic.name())
            .field("qos", &self.core.qos)
            .finish()
    }
}

/// Container that borrows caller-owned serialized bytes for one write.
#[derive(Debug, Default)]
pub struct SerializedPayload<'a> {
    loaned: Option<&'a [u8]>,
}

impl<'a> SerializedPayload<'a> {
    pub fn new() -> Self {
        Self { loaned: None }
    }

    /// Borrow `bytes` without copying. They must start with a CDR
    /// encapsulation header.
    pub fn loan(&mut self, bytes: &'a [u8]) -> Result<()> {
        if self.loaned.is_some() {
            return Err(DdsError::AlreadyLoaned);
        }
        cdr::check_encapsulation(bytes)?;
        self.loaned = Some(bytes);
        Ok(())
    }

    /// Give the borrowed bytes back.
    pub fn unloan(&mut self) -> Option<&'a [u8]> {
        self.loaned.take()
    }

    pub fn bytes(&self) -> Option<&'a [u8]> {
        self.loaned
    }

    pub fn is_loaned(&self) -> bool {
        self.loaned.is_some()
    }
}
