// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Participants, topics and the per-domain endpoint registry.
//!
//! # Architecture
//!
//! ```text
//! DomainParticipantFactory
//! +-- qos_provider: QosProvider
//! +-- domains: DashMap<DomainId, Weak<Domain>>
//!
//! Domain (one per domain id, per factory)
//! +-- endpoints: RwLock<HashMap<MatchKey, Vec<EndpointEntry>>>
//! +-- participants: RwLock<Vec<ParticipantRecord>> (join order)
//!     +-- graph: GuardCondition (triggered on every graph change)
//! ```
//!
//! Each participant owns its graph condition, so consumers that clear one
//! participant's condition never hide a graph change from another.
//!
//! A writer and a reader match when they share `(topic, type name)` and the
//! writer offers at least the reliability and durability the reader asks for.

use super::condition::GuardCondition;
use super::identity::{Guid, GUID_PREFIX_LEN};
use super::qos::{EntityQos, QosProvider};
use super::reader::{DataReader, ReaderCore};
use super::writer::{DataWriter, WriterCore};
use super::{DdsError, Result};
use crate::dynamic::TypeCode;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};

pub type DomainId = u32;

const ENTITY_KIND_WRITER: u8 = 0x03;
const ENTITY_KIND_READER: u8 = 0x04;

static NEXT_FACTORY: AtomicU32 = AtomicU32::new(1);

/// Entry point of the runtime: owns the QoS profile library and the domains
/// its participants join.
pub struct DomainParticipantFactory {
    qos_provider: QosProvider,
    domains: DashMap<DomainId, Weak<Domain>>,
    instance: u32,
    next_participant: AtomicU32,
}

impl DomainParticipantFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            qos_provider: QosProvider::new(),
            domains: DashMap::new(),
            instance: NEXT_FACTORY.fetch_add(1, Ordering::Relaxed),
            next_participant: AtomicU32::new(1),
        })
    }

    pub fn qos_provider(&self) -> &QosProvider {
        &self.qos_provider
    }

    /// Create an unnamed participant on `domain_id`. Participants of the
    /// same factory and domain see each other's endpoints.
    pub fn create_participant(self: &Arc<Self>, domain_id: DomainId) -> Participant {
        self.create_participant_inner(domain_id, None)
    }

    /// Create a participant that announces `name` to the domain.
    pub fn create_named_participant(
        self: &Arc<Self>,
        domain_id: DomainId,
        name: ParticipantName,
    ) -> Participant {
        self.create_participant_inner(domain_id, Some(name))
    }

    fn create_participant_inner(
        self: &Arc<Self>,
        domain_id: DomainId,
        name: Option<ParticipantName>,
    ) -> Participant {
        let domain = {
            let mut slot = self.domains.entry(domain_id).or_insert_with(Weak::new);
            match slot.upgrade() {
                Some(domain) => domain,
                None => {
                    let domain = Arc::new(Domain::new(domain_id));
                    *slot = Arc::downgrade(&domain);
                    log::debug!("[dds] created domain state for domain_id={}", domain_id);
                    domain
                }
            }
        };

        let counter = self.next_participant.fetch_add(1, Ordering::Relaxed);
        let mut guid_prefix = [0u8; GUID_PREFIX_LEN];
        guid_prefix[..4].copy_from_slice(&std::process::id().to_be_bytes());
        guid_prefix[4..8].copy_from_slice(&self.instance.to_be_bytes());
        guid_prefix[8..].copy_from_slice(&counter.to_be_bytes());

        let graph = Arc::new(GuardCondition::new());
        domain.join(ParticipantRecord {
            guid_prefix,
            name: name.clone(),
            graph: Arc::clone(&graph),
        });

        Participant {
            inner: Arc::new(ParticipantInner {
                guid_prefix,
                name,
                graph,
                domain,
                factory: Arc::clone(self),
                types: DashMap::new(),
                topics: DashMap::new(),
                next_entity: AtomicU32::new(1),
            }),
        }
    }
}

impl std::fmt::Debug for DomainParticipantFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainParticipantFactory")
            .field("instance", &self.instance)
            .field("domains", &self.domains.len())
            .finish()
    }
}

/// Name and namespace a participant announces to its domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantName {
    pub name: String,
    pub namespace: String,
}

impl ParticipantName {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

struct ParticipantRecord {
    guid_prefix: [u8; GUID_PREFIX_LEN],
    name: Option<ParticipantName>,
    graph: Arc<GuardCondition>,
}

/// Two endpoints match only if they share this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct MatchKey {
    pub(crate) topic_name: Arc<str>,
    pub(crate) type_name: Arc<str>,
}

impl MatchKey {
    fn for_topic(topic: &Topic) -> Self {
        Self {
            topic_name: Arc::from(topic.name()),
            type_name: Arc::from(topic.type_name()),
        }
    }
}

enum EndpointEntry {
    Writer(Arc<WriterCore>),
    Reader(Arc<ReaderCore>),
}

impl EndpointEntry {
    fn guid(&self) -> Guid {
        match self {
            EndpointEntry::Writer(core) => core.guid,
            EndpointEntry::Reader(core) => core.guid,
        }
    }
}

/// Unregisters its endpoint from the domain when dropped.
pub(crate) struct BindToken {
    domain: Weak<Domain>,
    key: MatchKey,
    guid: Guid,
}

impl BindToken {
    /// Writers on this endpoint's topic that a reader with `reader_qos`
    /// receives from.
    pub(crate) fn matched_writer_count(&self, reader_qos: &EntityQos) -> usize {
        self.domain
            .upgrade()
            .map_or(0, |domain| domain.matched_writer_count(&self.key, reader_qos))
    }
}

impl Drop for BindToken {
    fn drop(&mut self) {
        if let Some(domain) = self.domain.upgrade() {
            domain.unregister(&self.key, self.guid);
        }
    }
}

/// Endpoints of one domain.
pub(crate) struct Domain {
    id: DomainId,
    endpoints: RwLock<HashMap<MatchKey, Vec<EndpointEntry>>>,
    participants: RwLock<Vec<ParticipantRecord>>,
}

impl Domain {
    fn new(id: DomainId) -> Self {
        Self {
            id,
            endpoints: RwLock::new(HashMap::new()),
            participants: RwLock::new(Vec::new()),
        }
    }

    fn join(&self, record: ParticipantRecord) {
        self.participants.write().push(record);
        self.notify_graph();
    }

    fn leave(&self, guid_prefix: [u8; GUID_PREFIX_LEN]) {
        self.participants
            .write()
            .retain(|record| record.guid_prefix != guid_prefix);
        self.notify_graph();
    }

    /// Raise the graph condition of every participant in the domain.
    fn notify_graph(&self) {
        for record in self.participants.read().iter() {
            record.graph.set_trigger_value(true);
        }
    }

    /// Names announced by participants other than `except`, in join order.
    fn participant_names(&self, except: [u8; GUID_PREFIX_LEN]) -> Vec<ParticipantName> {
        self.participants
            .read()
            .iter()
            .filter(|record| record.guid_prefix != except)
            .filter_map(|record| record.name.clone())
            .collect()
    }

    fn register_writer(self: &Arc<Self>, key: MatchKey, core: Arc<WriterCore>) -> BindToken {
        let guid = core.guid;
        {
            let mut endpoints = self.endpoints.write();
            let entries = endpoints.entry(key.clone()).or_default();
            for existing in entries.iter() {
                if let EndpointEntry::Reader(reader) = existing {
                    if EntityQos::compatible(&core.qos, &reader.qos) {
                        log::debug!("[dds] reader {} matched new writer {}", reader.guid, guid);
                    } else {
                        log::debug!(
                            "[dds] skipping match: writer {:?} incompatible with reader {:?}",
                            core.qos.reliability,
                            reader.qos.reliability
                        );
                    }
                }
            }
            entries.push(EndpointEntry::Writer(core));
        }
        self.notify_graph();
        self.token(key, guid)
    }

    fn register_reader(self: &Arc<Self>, key: MatchKey, core: Arc<ReaderCore>) -> BindToken {
        let guid = core.guid;
        {
            let mut endpoints = self.endpoints.write();
            let entries = endpoints.entry(key.clone()).or_default();
            for existing in entries.iter() {
                if let EndpointEntry::Writer(writer) = existing {
                    if EntityQos::compatible(&writer.qos, &core.qos) {
                        log::debug!("[dds] new reader {} matched writer {}", guid, writer.guid);
                        writer.replay_to(&core);
                    }
                }
            }
            entries.push(EndpointEntry::Reader(core));
        }
        self.notify_graph();
        self.token(key, guid)
    }

    fn token(self: &Arc<Self>, key: MatchKey, guid: Guid) -> BindToken {
        BindToken {
            domain: Arc::downgrade(self),
            key,
            guid,
        }
    }

    fn unregister(&self, key: &MatchKey, guid: Guid) {
        {
            let mut endpoints = self.endpoints.write();
            if let Some(entries) = endpoints.get_mut(key) {
                entries.retain(|entry| entry.guid() != guid);
                if entries.is_empty() {
                    endpoints.remove(key);
                }
            }
        }
        log::debug!(
            "[dds] unregistered endpoint {} from topic '{}'",
            guid,
            key.topic_name
        );
        self.notify_graph();
    }

    /// Readers a writer with `qos` on `key` delivers to.
    pub(crate) fn matched_readers(&self, key: &MatchKey, qos: &EntityQos) -> Vec<Arc<ReaderCore>> {
        self.endpoints
            .read()
            .get(key)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| match entry {
                        EndpointEntry::Reader(reader) if EntityQos::compatible(qos, &reader.qos) => {
                            Some(Arc::clone(reader))
                        }
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn matched_writer_count(&self, key: &MatchKey, reader_qos: &EntityQos) -> usize {
        self.endpoints.read().get(key).map_or(0, |entries| {
            entries
                .iter()
                .filter(|entry| {
                    matches!(entry, EndpointEntry::Writer(writer)
                        if EntityQos::compatible(&writer.qos, reader_qos))
                })
                .count()
        })
    }

    fn count_owned_by(&self, guid_prefix: [u8; GUID_PREFIX_LEN]) -> usize {
        self.endpoints
            .read()
            .values()
            .flat_map(|entries| entries.iter())
            .filter(|entry| entry.guid().prefix == guid_prefix)
            .count()
    }

    fn count_on_topic(&self, topic_name: &str, writers: bool) -> usize {
        self.endpoints
            .read()
            .iter()
            .filter(|(key, _)| &*key.topic_name == topic_name)
            .flat_map(|(_, entries)| entries.iter())
            .filter(|entry| matches!(entry, EndpointEntry::Writer(_)) == writers)
            .count()
    }

    fn topic_names_and_types(&self) -> Vec<(String, Vec<String>)> {
        let mut topics: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for key in self.endpoints.read().keys() {
            topics
                .entry(key.topic_name.to_string())
                .or_default()
                .insert(key.type_name.to_string());
        }
        topics
            .into_iter()
            .map(|(topic, types)| (topic, types.into_iter().collect()))
            .collect()
    }
}

/// A named topic bound to a registered type.
#[derive(Clone)]
pub struct Topic {
    inner: Arc<TopicInner>,
}

struct TopicInner {
    name: String,
    type_code: Arc<TypeCode>,
}

impl Topic {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn type_name(&self) -> &str {
        &self.inner.type_code.name
    }

    pub fn type_code(&self) -> &Arc<TypeCode> {
        &self.inner.type_code
    }
}

impl std::fmt::Debug for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Topic")
            .field("name", &self.inner.name)
            .field("type_name", &self.type_name())
            .finish()
    }
}

/// Domain participant: scope for types, topics, writers and readers.
#[derive(Clone)]
pub struct Participant {
    inner: Arc<ParticipantInner>,
}

struct ParticipantInner {
    guid_prefix: [u8; GUID_PREFIX_LEN],
    name: Option<ParticipantName>,
    graph: Arc<GuardCondition>,
    domain: Arc<Domain>,
    factory: Arc<DomainParticipantFactory>,
    types: DashMap<String, Arc<TypeCode>>,
    topics: DashMap<String, Topic>,
    next_entity: AtomicU32,
}

impl Drop for ParticipantInner {
    fn drop(&mut self) {
        self.domain.leave(self.guid_prefix);
        log::debug!("[dds] participant {:02x?} left domain {}", self.guid_prefix, self.domain.id);
    }
}

impl Participant {
    pub fn name(&self) -> Option<&ParticipantName> {
        self.inner.name.as_ref()
    }

    /// Names of the other named participants in the domain, in join order.
    pub fn discovered_participant_names(&self) -> Vec<ParticipantName> {
        self.inner.domain.participant_names(self.inner.guid_prefix)
    }

    pub fn guid_prefix(&self) -> [u8; GUID_PREFIX_LEN] {
        self.inner.guid_prefix
    }

    pub fn domain_id(&self) -> DomainId {
        self.inner.domain.id
    }

    pub fn qos_provider(&self) -> &QosProvider {
        self.inner.factory.qos_provider()
    }

    /// Register a type code under its name. Registering an identical code
    /// again is a no-op; a different code under the same name is refused.
    pub fn register_type(&self, type_code: Arc<TypeCode>) -> Result<()> {
        if let Some(existing) = self.inner.types.get(&type_code.name) {
            if **existing != *type_code {
                return Err(DdsError::TypeConflict(type_code.name.clone()));
            }
            return Ok(());
        }
        log::debug!("[dds] registered type '{}'", type_code.name);
        self.inner.types.insert(type_code.name.clone(), type_code);
        Ok(())
    }

    pub fn find_type(&self, type_name: &str) -> Option<Arc<TypeCode>> {
        self.inner.types.get(type_name).map(|t| Arc::clone(&t))
    }

    pub fn find_topic(&self, name: &str) -> Option<Topic> {
        self.inner.topics.get(name).map(|t| t.value().clone())
    }

    pub fn create_topic(&self, name: &str, type_name: &str) -> Result<Topic> {
        let type_code = self
            .find_type(type_name)
            .ok_or_else(|| DdsError::TypeNotRegistered(type_name.to_string()))?;
        match self.inner.topics.entry(name.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(DdsError::TopicExists(name.to_string()))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let topic = Topic {
                    inner: Arc::new(TopicInner {
                        name: name.to_string(),
                        type_code,
                    }),
                };
                slot.insert(topic.clone());
                log::debug!("[dds] created topic '{}' type='{}'", name, type_name);
                Ok(topic)
            }
        }
    }

    pub fn create_writer(&self, topic: &Topic, qos: EntityQos) -> Result<DataWriter> {
        qos.validate()?;
        let core = Arc::new(WriterCore::new(self.next_guid(ENTITY_KIND_WRITER), qos));
        let key = MatchKey::for_topic(topic);
        let token = self.inner.domain.register_writer(key.clone(), Arc::clone(&core));
        Ok(DataWriter::new(
            core,
            topic.clone(),
            Arc::clone(&self.inner.domain),
            key,
            token,
        ))
    }

    pub fn create_reader(&self, topic: &Topic, qos: EntityQos) -> Result<DataReader> {
        self.create_reader_inner(topic, qos, None)
    }

    /// Reader that only accepts samples whose related identity names
    /// `related_writer`.
    pub(crate) fn create_related_reader(
        &self,
        topic: &Topic,
        qos: EntityQos,
        related_writer: Guid,
    ) -> Result<DataReader> {
        self.create_reader_inner(topic, qos, Some(related_writer))
    }

    fn create_reader_inner(
        &self,
        topic: &Topic,
        qos: EntityQos,
        related_writer: Option<Guid>,
    ) -> Result<DataReader> {
        qos.validate()?;
        let core = Arc::new(ReaderCore::new(
            self.next_guid(ENTITY_KIND_READER),
            qos,
            related_writer,
        ));
        let token = self
            .inner
            .domain
            .register_reader(MatchKey::for_topic(topic), Arc::clone(&core));
        Ok(DataReader::new(core, topic.clone(), token))
    }

    /// This participant's condition, triggered whenever an endpoint or a
    /// participant joins or leaves the domain.
    pub fn graph_condition(&self) -> Arc<GuardCondition> {
        Arc::clone(&self.inner.graph)
    }

    /// Writers and readers this participant has alive in the domain.
    pub fn endpoint_count(&self) -> usize {
        self.inner.domain.count_owned_by(self.inner.guid_prefix)
    }

    pub fn count_writers(&self, topic_name: &str) -> usize {
        self.inner.domain.count_on_topic(topic_name, true)
    }

    pub fn count_readers(&self, topic_name: &str) -> usize {
        self.inner.domain.count_on_topic(topic_name, false)
    }

    /// Topics with at least one endpoint in the domain, sorted by name.
    pub fn topic_names_and_types(&self) -> Vec<(String, Vec<String>)> {
        self.inner.domain.topic_names_and_types()
    }

    fn next_guid(&self, kind: u8) -> Guid {
        let counter = self.inner.next_entity.fetch_add(1, Ordering::Relaxed);
        let [_, a, b, c] = counter.to_be_bytes();
        Guid::new(self.inner.guid_prefix, [a, b, c, kind])
    }
}

impl std::fmt::Debug for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Participant")
            .field("domain_id", &self.inner.domain.id)
            .field("topics", &self.inner.topics.len())
            .finish()
    }
}
