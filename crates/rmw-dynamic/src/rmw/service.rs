// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Service endpoint and request ids.

use super::context::Node;
use super::publisher::fill_sample;
use super::qos::QosProfile;
use super::subscription::read_sample;
use super::type_support::{create_named_type_code, ServiceTypeSupport};
use super::{check_typesupport, service_topic_names, IMPLEMENTATION_IDENTIFIER};
use crate::dds::{
    Guid, Replier, SampleIdentity, SequenceNumber, StatusCondition, GUID_LEN, GUID_PREFIX_LEN,
};
use crate::dynamic::DynamicSample;
use crate::error::{record, Error, Result};
use crate::introspection::MessageMembers;
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;

/// Identifies one request: the requesting writer and the request's
/// sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId {
    pub writer_guid: [u8; GUID_LEN],
    pub sequence_number: i64,
}

impl From<SampleIdentity> for RequestId {
    fn from(identity: SampleIdentity) -> Self {
        Self {
            writer_guid: identity.writer_guid.to_bytes(),
            sequence_number: i64::from(identity.sequence_number),
        }
    }
}

impl From<&RequestId> for SampleIdentity {
    fn from(id: &RequestId) -> Self {
        SampleIdentity::new(
            Guid::from_bytes(id.writer_guid),
            SequenceNumber::from(id.sequence_number),
        )
    }
}

/// Serves requests of one ROS service.
pub struct Service {
    replier: Replier,
    request_members: Arc<MessageMembers>,
    response_members: Arc<MessageMembers>,
    response_scratch: Mutex<DynamicSample>,
    node_prefix: [u8; GUID_PREFIX_LEN],
    service_name: String,
}

impl Service {
    pub(crate) fn new(
        node: &Node,
        type_support: &ServiceTypeSupport,
        service_name: &str,
        qos: &QosProfile,
    ) -> Result<Self> {
        check_typesupport("service type support", type_support.typesupport_identifier)?;
        if service_name.is_empty() {
            return Err(Error::InvalidArgument("service name is empty".into()));
        }

        let members = &type_support.members;
        let request_type =
            create_named_type_code(&type_support.request_type_name(), &members.request)?;
        let response_type =
            create_named_type_code(&type_support.response_type_name(), &members.response)?;
        let (request_topic, reply_topic) =
            service_topic_names(service_name, qos.avoid_ros_namespace_conventions);
        let request_topic = node.bind_topic(request_type, &request_topic)?;
        let reply_topic = node.bind_topic(Arc::clone(&response_type), &reply_topic)?;

        let replier = Replier::new(
            node.participant(),
            &request_topic,
            &reply_topic,
            node.entity_qos(qos)?,
        )?;
        log::debug!(
            "[rmw] service '{}' created on '{}' / '{}'",
            service_name,
            request_topic.name(),
            reply_topic.name()
        );

        Ok(Self {
            replier,
            request_members: Arc::clone(&members.request),
            response_members: Arc::clone(&members.response),
            response_scratch: Mutex::new(DynamicSample::new(response_type)),
            node_prefix: node.guid_prefix(),
            service_name: service_name.to_string(),
        })
    }

    /// Take at most one request; the returned id must be passed back to
    /// [`send_response`](Self::send_response).
    pub fn take_request(&self, request: &mut dyn Any) -> Result<Option<RequestId>> {
        let Some(sample) = self.replier.take_request() else {
            return Ok(None);
        };
        if !sample.info.valid_data {
            return Ok(None);
        }
        read_sample(
            &sample,
            self.replier.request_reader().type_code(),
            &self.request_members,
            request,
        )
        .map_err(record)?;
        Ok(Some(RequestId::from(sample.info.identity)))
    }

    pub fn send_response(&self, request_id: &RequestId, response: &dyn Any) -> Result<()> {
        self.send_response_inner(request_id, response)
            .map_err(record)
    }

    fn send_response_inner(&self, request_id: &RequestId, response: &dyn Any) -> Result<()> {
        let mut sample = self.response_scratch.lock();
        fill_sample(&mut sample, response, &self.response_members)?;
        self.replier
            .send_reply(&sample, SampleIdentity::from(request_id))?;
        log::trace!(
            "[rmw] service '{}' answered request seq={}",
            self.service_name,
            request_id.sequence_number
        );
        Ok(())
    }

    pub(crate) fn condition(&self) -> Arc<StatusCondition> {
        self.replier.request_condition()
    }

    pub(crate) fn node_prefix(&self) -> [u8; GUID_PREFIX_LEN] {
        self.node_prefix
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn implementation_identifier(&self) -> &'static str {
        IMPLEMENTATION_IDENTIFIER
    }
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("service_name", &self.service_name)
            .field("replier", &self.replier)
            .finish()
    }
}
