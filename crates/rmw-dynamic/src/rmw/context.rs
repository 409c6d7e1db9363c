// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Context and node lifecycle.
//!
//! A [`Context`] owns the environment configuration and the participant
//! factory; the QoS library and profile selection happen once, when the
//! context is created. Each [`Node`] owns one participant, so endpoints of
//! different nodes are told apart by their GUID prefix.

use super::client::Client;
use super::guard_condition::GuardCondition;
use super::publisher::Publisher;
use super::qos::QosProfile;
use super::service::Service;
use super::subscription::Subscription;
use super::type_support::{MessageTypeSupport, ServiceTypeSupport};
use super::{
    demangle_service_name, demangle_service_type_name, demangle_topic_name,
    demangle_type_name, topic_name, IMPLEMENTATION_IDENTIFIER,
};
use crate::dds::{
    DdsError, DomainParticipantFactory, EntityQos, Participant, ParticipantName, Topic,
    GUID_PREFIX_LEN,
};
use crate::dynamic::TypeCode;
use crate::env_config::EnvConfig;
use crate::error::{record, DestroyError, Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

const MAX_NODE_NAME_LEN: usize = 255;

/// Process-side entry point: configuration plus the participant factory.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    config: EnvConfig,
    factory: Arc<DomainParticipantFactory>,
}

impl Context {
    pub fn new(config: EnvConfig) -> Result<Self> {
        Self::with_factory(config, DomainParticipantFactory::new())
    }

    /// Context configured from `RMW_DYNAMIC_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(EnvConfig::from_env())
    }

    /// Context sharing `factory` (and therefore its domains) with others.
    pub fn with_factory(config: EnvConfig, factory: Arc<DomainParticipantFactory>) -> Result<Self> {
        Self::configure(&config, &factory).map_err(record)?;
        log::info!(
            "[rmw] context created domain={} library={:?} profile={:?}",
            config.domain_id,
            config.qos_library,
            config.default_profile
        );
        Ok(Self {
            inner: Arc::new(ContextInner { config, factory }),
        })
    }

    fn configure(config: &EnvConfig, factory: &DomainParticipantFactory) -> Result<()> {
        let provider = factory.qos_provider();
        if let Some(library) = &config.qos_library {
            provider
                .set_default_library(library)
                .map_err(|e| Error::Registration(format!("failed to set default library: {}", e)))?;
        }
        if let Some(profile) = &config.default_profile {
            provider
                .set_default_profile(profile)
                .map_err(|e| Error::Registration(format!("failed to set default profile: {}", e)))?;
        }
        Ok(())
    }

    pub fn config(&self) -> &EnvConfig {
        &self.inner.config
    }

    pub fn factory(&self) -> &Arc<DomainParticipantFactory> {
        &self.inner.factory
    }

    pub fn implementation_identifier(&self) -> &'static str {
        IMPLEMENTATION_IDENTIFIER
    }

    /// Create a node in the configured domain.
    ///
    /// An empty namespace is the root namespace `/`.
    pub fn create_node(&self, name: &str, namespace: &str) -> Result<Node> {
        self.create_node_inner(name, namespace).map_err(record)
    }

    fn create_node_inner(&self, name: &str, namespace: &str) -> Result<Node> {
        validate_node_name(name)?;
        let namespace = if namespace.is_empty() { "/" } else { namespace };
        validate_namespace(namespace)?;

        let config = &self.inner.config;
        let provider = self.inner.factory.qos_provider();
        let node_profile = if config.node_profile_override {
            provider.profile_in_default_library(name)
        } else {
            None
        };
        let base_qos = node_profile.unwrap_or_else(|| provider.default_qos());

        let participant = self
            .inner
            .factory
            .create_named_participant(config.domain_id, ParticipantName::new(name, namespace));
        log::info!(
            "[rmw] node '{}' created in namespace '{}' (domain {}, node profile: {})",
            name,
            namespace,
            config.domain_id,
            node_profile.is_some()
        );
        Ok(Node {
            inner: Arc::new(NodeInner {
                name: name.to_string(),
                namespace: namespace.to_string(),
                graph_guard: GuardCondition::from_condition(participant.graph_condition()),
                participant,
                ignore_ros_qos: config.ignore_ros_qos,
                base_qos,
            }),
        })
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

fn validate_node_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.len() < MAX_NODE_NAME_LEN
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!("invalid node name '{}'", name)))
    }
}

fn validate_namespace(namespace: &str) -> Result<()> {
    let tokens_ok = namespace
        .split('/')
        .skip(1)
        .enumerate()
        .all(|(i, token)| {
            // "/" alone splits into one empty token.
            (token.is_empty() && i == 0 && namespace == "/")
                || (!token.is_empty()
                    && !token.starts_with(|c: char| c.is_ascii_digit())
                    && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
        });
    if namespace.starts_with('/') && tokens_ok {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "invalid node namespace '{}'",
            namespace
        )))
    }
}

/// A node: one participant plus the base QoS its endpoints start from.
#[derive(Clone)]
pub struct Node {
    inner: Arc<NodeInner>,
}

struct NodeInner {
    name: String,
    namespace: String,
    participant: Participant,
    graph_guard: GuardCondition,
    ignore_ros_qos: bool,
    base_qos: EntityQos,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    pub fn fully_qualified_name(&self) -> String {
        if self.inner.namespace == "/" {
            format!("/{}", self.inner.name)
        } else {
            format!("{}/{}", self.inner.namespace, self.inner.name)
        }
    }

    pub fn implementation_identifier(&self) -> &'static str {
        IMPLEMENTATION_IDENTIFIER
    }

    pub fn domain_id(&self) -> u32 {
        self.inner.participant.domain_id()
    }

    /// Entity QoS endpoints of this node start from before their ROS
    /// profile is applied.
    pub fn base_qos(&self) -> EntityQos {
        self.inner.base_qos
    }

    pub(crate) fn participant(&self) -> &Participant {
        &self.inner.participant
    }

    pub(crate) fn guid_prefix(&self) -> [u8; GUID_PREFIX_LEN] {
        self.inner.participant.guid_prefix()
    }

    pub(crate) fn entity_qos(&self, profile: &QosProfile) -> Result<EntityQos> {
        if self.inner.ignore_ros_qos {
            return Ok(self.inner.base_qos);
        }
        profile.apply(self.inner.base_qos)
    }

    /// Register `type_code` and reuse or create the topic `name` for it.
    pub(crate) fn bind_topic(&self, type_code: Arc<TypeCode>, name: &str) -> Result<Topic> {
        let participant = &self.inner.participant;
        let type_name = type_code.name.clone();
        participant.register_type(type_code).map_err(|e| match e {
            DdsError::TypeConflict(name) => Error::Registration(format!(
                "type '{}' is already registered with a different layout",
                name
            )),
            other => Error::Dds(other),
        })?;

        match participant.find_topic(name) {
            Some(topic) if topic.type_name() == type_name => Ok(topic),
            Some(topic) => Err(Error::Registration(format!(
                "topic '{}' exists with type '{}', requested '{}'",
                name,
                topic.type_name(),
                type_name
            ))),
            None => participant
                .create_topic(name, &type_name)
                .map_err(|e| Error::Registration(e.to_string())),
        }
    }

    /// Endpoints are owned by the node whose participant prefix they carry.
    fn check_owner(&self, what: &'static str, prefix: [u8; GUID_PREFIX_LEN]) -> Result<()> {
        if prefix != self.guid_prefix() {
            return Err(Error::InvalidArgument(format!(
                "{} does not belong to node '{}'",
                what, self.inner.name
            )));
        }
        Ok(())
    }

    /// Hand `handle` back unless `check` passes, recording the refusal.
    fn refuse_unless<T>(check: Result<()>, handle: T) -> std::result::Result<T, DestroyError<T>> {
        match check {
            Ok(()) => Ok(handle),
            Err(err) => Err(DestroyError::new(record(err), handle)),
        }
    }

    pub fn create_publisher(
        &self,
        type_support: &MessageTypeSupport,
        topic: &str,
        qos: &QosProfile,
    ) -> Result<Publisher> {
        Publisher::new(self, type_support, topic, qos).map_err(record)
    }

    /// Destroy a publisher of this node. A publisher of another node is
    /// handed back inside the error.
    pub fn destroy_publisher(
        &self,
        publisher: Publisher,
    ) -> std::result::Result<(), DestroyError<Publisher>> {
        let check = self.check_owner("publisher", publisher.gid().guid().prefix);
        let publisher = Self::refuse_unless(check, publisher)?;
        log::debug!("[rmw] destroying publisher on '{}'", publisher.topic_name());
        drop(publisher);
        Ok(())
    }

    pub fn create_subscription(
        &self,
        type_support: &MessageTypeSupport,
        topic: &str,
        qos: &QosProfile,
        ignore_local_publications: bool,
    ) -> Result<Subscription> {
        Subscription::new(self, type_support, topic, qos, ignore_local_publications)
            .map_err(record)
    }

    pub fn destroy_subscription(
        &self,
        subscription: Subscription,
    ) -> std::result::Result<(), DestroyError<Subscription>> {
        let check = self.check_owner("subscription", subscription.node_prefix());
        let subscription = Self::refuse_unless(check, subscription)?;
        log::debug!(
            "[rmw] destroying subscription on '{}'",
            subscription.topic_name()
        );
        drop(subscription);
        Ok(())
    }

    pub fn create_client(
        &self,
        type_support: &ServiceTypeSupport,
        service: &str,
        qos: &QosProfile,
    ) -> Result<Client> {
        Client::new(self, type_support, service, qos).map_err(record)
    }

    /// Destroy a client together with its request writer and reply reader.
    pub fn destroy_client(&self, client: Client) -> std::result::Result<(), DestroyError<Client>> {
        let check = self.check_owner("client", client.node_prefix());
        let client = Self::refuse_unless(check, client)?;
        log::debug!("[rmw] destroying client for '{}'", client.service_name());
        drop(client);
        Ok(())
    }

    pub fn create_service(
        &self,
        type_support: &ServiceTypeSupport,
        service: &str,
        qos: &QosProfile,
    ) -> Result<Service> {
        Service::new(self, type_support, service, qos).map_err(record)
    }

    pub fn destroy_service(
        &self,
        service: Service,
    ) -> std::result::Result<(), DestroyError<Service>> {
        let check = self.check_owner("service", service.node_prefix());
        let service = Self::refuse_unless(check, service)?;
        log::debug!("[rmw] destroying service '{}'", service.service_name());
        drop(service);
        Ok(())
    }

    /// Guard triggered whenever an endpoint joins or leaves the domain.
    pub fn graph_guard_condition(&self) -> &GuardCondition {
        &self.inner.graph_guard
    }

    /// Data writers in the domain on ROS topic `topic`.
    pub fn count_publishers(&self, topic: &str) -> usize {
        self.count_on(topic, true)
    }

    /// Data readers in the domain on ROS topic `topic`.
    pub fn count_subscribers(&self, topic: &str) -> usize {
        self.count_on(topic, false)
    }

    fn count_on(&self, topic: &str, writers: bool) -> usize {
        let participant = &self.inner.participant;
        let count = |name: &str| {
            if writers {
                participant.count_writers(name)
            } else {
                participant.count_readers(name)
            }
        };
        let mangled = topic_name(topic, false);
        if mangled == topic {
            count(topic)
        } else {
            count(&mangled) + count(topic)
        }
    }

    /// ROS topics with at least one endpoint, sorted by name.
    ///
    /// Unless `no_demangle` is set, only topics under the `rt` prefix are
    /// listed, with the prefix stripped and type names in `pkg/msg/Name`
    /// form.
    pub fn topic_names_and_types(&self, no_demangle: bool) -> Vec<(String, Vec<String>)> {
        let topics = self.inner.participant.topic_names_and_types();
        if no_demangle {
            return topics;
        }
        topics
            .into_iter()
            .filter_map(|(name, types)| {
                let name = demangle_topic_name(&name)?;
                let types = types.iter().map(|t| demangle_type_name(t)).collect();
                Some((name, types))
            })
            .collect()
    }

    /// ROS services with at least one request or reply endpoint.
    pub fn service_names_and_types(&self) -> Vec<(String, Vec<String>)> {
        let mut services: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (name, types) in self.inner.participant.topic_names_and_types() {
            let Some(service) = demangle_service_name(&name) else {
                continue;
            };
            let entry = services.entry(service).or_default();
            entry.extend(types.iter().filter_map(|t| demangle_service_type_name(t)));
        }
        services
            .into_iter()
            .map(|(name, types)| (name, types.into_iter().collect()))
            .collect()
    }

    /// Names of the nodes in this node's domain: this node first, then the
    /// others in the order they joined.
    pub fn node_names(&self) -> Vec<String> {
        self.node_names_and_namespaces()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }

    /// `(name, namespace)` of the nodes in this node's domain, this node
    /// first.
    pub fn node_names_and_namespaces(&self) -> Vec<(String, String)> {
        let own = (self.inner.name.clone(), self.inner.namespace.clone());
        let others = self
            .inner
            .participant
            .discovered_participant_names()
            .into_iter()
            .map(|ParticipantName { name, namespace }| (name, namespace));
        std::iter::once(own).chain(others).collect()
    }

    /// Destroy the node.
    ///
    /// Refused while any publisher, subscription, client or service of the
    /// node is alive; the node is handed back inside the error. The
    /// participant leaves the domain once the last clone of the node is
    /// dropped.
    pub fn destroy(self) -> std::result::Result<(), DestroyError<Node>> {
        let alive = self.inner.participant.endpoint_count();
        let check = if alive == 0 {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!(
                "node '{}' still has {} live endpoints",
                self.fully_qualified_name(),
                alive
            )))
        };
        let node = Self::refuse_unless(check, self)?;
        log::info!("[rmw] destroying node '{}'", node.fully_qualified_name());
        Ok(())
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.inner.name)
            .field("namespace", &self.inner.namespace)
            .field("participant", &self.inner.participant)
            .finish()
    }
}
