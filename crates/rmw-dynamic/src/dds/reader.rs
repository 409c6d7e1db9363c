// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DataReader and its receive queue.

use super::condition::{StatusCondition, StatusMask};
use super::identity::{Guid, SampleIdentity};
use super::participant::{BindToken, Topic};
use super::qos::{EntityQos, HistoryKind};
use crate::dynamic::TypeCode;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metadata delivered with each sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleInfo {
    pub writer_guid: Guid,
    /// Identity assigned by the writer.
    pub identity: SampleIdentity,
    /// Identity of the sample this one answers, `UNKNOWN` for plain data.
    pub related_identity: SampleIdentity,
    /// `false` for lifecycle notifications that carry no payload.
    pub valid_data: bool,
}

/// One received sample: CDR payload plus metadata.
#[derive(Debug, Clone)]
pub struct Sample {
    pub payload: Arc<[u8]>,
    pub info: SampleInfo,
}

/// Receive side shared with the domain so writers can deliver into it.
pub(crate) struct ReaderCore {
    pub(crate) guid: Guid,
    pub(crate) qos: EntityQos,
    queue: Mutex<VecDeque<Sample>>,
    status: Arc<StatusCondition>,
    /// Only samples related to this writer are accepted.
    related_writer: Option<Guid>,
    dropped: AtomicU64,
}

impl ReaderCore {
    pub(crate) fn new(guid: Guid, qos: EntityQos, related_writer: Option<Guid>) -> Self {
        Self {
            guid,
            qos,
            queue: Mutex::new(VecDeque::new()),
            status: Arc::new(StatusCondition::new()),
            related_writer,
            dropped: AtomicU64::new(0),
        }
    }

    pub(crate) fn deliver(&self, sample: Sample) {
        if let Some(expected) = self.related_writer {
            if sample.info.related_identity.writer_guid != expected {
                return;
            }
        }

        {
            let mut queue = self.queue.lock();
            if queue.len() >= self.qos.capacity() {
                match self.qos.history {
                    HistoryKind::KeepLast => {
                        queue.pop_front();
                    }
                    HistoryKind::KeepAll => {
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                        log::warn!(
                            "[dds] reader {} history full ({} samples), dropping sample",
                            self.guid,
                            queue.len()
                        );
                        return;
                    }
                }
            }
            queue.push_back(sample);
        }
        self.status.activate(StatusMask::DATA_AVAILABLE);
    }

    fn take(&self) -> Option<Sample> {
        let mut queue = self.queue.lock();
        let sample = queue.pop_front();
        if queue.is_empty() {
            self.status.deactivate(StatusMask::DATA_AVAILABLE);
        }
        sample
    }
}

/// Typed-by-code reader bound to one topic.
pub struct DataReader {
    core: Arc<ReaderCore>,
    topic: Topic,
    token: BindToken,
}

impl DataReader {
    pub(crate) fn new(core: Arc<ReaderCore>, topic: Topic, token: BindToken) -> Self {
        Self {
            core,
            topic,
            token,
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

    pub fn type_code(&self) -> &Arc<TypeCode> {
        self.topic.type_code()
    }

    /// Remove and return the oldest queued sample.
    pub fn take(&self) -> Option<Sample> {
        self.core.take()
    }

    /// Number of writers this reader currently receives from.
    pub fn matched_writer_count(&self) -> usize {
        self.token.matched_writer_count(&self.core.qos)
    }

    pub fn unread_count(&self) -> usize {
        self.core.queue.lock().len()
    }

    /// Samples refused because a keep-all history was full.
    pub fn dropped_count(&self) -> u64 {
        self.core.dropped.load(Ordering::Relaxed)
    }

    /// Condition raised with [`StatusMask::DATA_AVAILABLE`] while samples
    /// are queued.
    pub fn status_condition(&self) -> Arc<StatusCondition> {
        Arc::clone(&self.core.status)
    }
}

impl std::fmt::Debug for DataReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataReader")
            .field("guid", &self.core.guid)
            .field("topic", &self.topic.name())
            .field("qos", &self.core.qos)
            .finish()
    }
}
