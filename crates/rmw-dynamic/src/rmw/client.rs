// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Client endpoint.

use super::context::Node;
use super::publisher::fill_sample;
use super::qos::QosProfile;
use super::service::RequestId;
use super::subscription::read_sample;
use super::type_support::{create_named_type_code, ServiceTypeSupport};
use super::{check_typesupport, service_topic_names, IMPLEMENTATION_IDENTIFIER};
use crate::dds::{Requester, StatusCondition, GUID_PREFIX_LEN};
use crate::dynamic::DynamicSample;
use crate::error::{record, Error, Result};
use crate::introspection::MessageMembers;
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;

/// Sends requests to one ROS service and takes the matching responses.
pub struct Client {
    requester: Requester,
    request_members: Arc<MessageMembers>,
    response_members: Arc<MessageMembers>,
    request_scratch: Mutex<DynamicSample>,
    node_prefix: [u8; GUID_PREFIX_LEN],
    service_name: String,
}

impl Client {
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
        let request_topic = node.bind_topic(Arc::clone(&request_type), &request_topic)?;
        let reply_topic = node.bind_topic(response_type, &reply_topic)?;

        let requester = Requester::new(
            node.participant(),
            &request_topic,
            &reply_topic,
            node.entity_qos(qos)?,
        )?;
        log::debug!(
            "[rmw] client for '{}' created writer={}",
            service_name,
            requester.request_writer().guid()
        );

        Ok(Self {
            requester,
            request_members: Arc::clone(&members.request),
            response_members: Arc::clone(&members.response),
            request_scratch: Mutex::new(DynamicSample::new(request_type)),
            node_prefix: node.guid_prefix(),
            service_name: service_name.to_string(),
        })
    }

    /// Send a request and return its sequence number. The response to it
    /// carries the same number in its [`RequestId`].
    pub fn send_request(&self, request: &dyn Any) -> Result<i64> {
        self.send_request_inner(request).map_err(record)
    }

    fn send_request_inner(&self, request: &dyn Any) -> Result<i64> {
        let mut sample = self.request_scratch.lock();
        fill_sample(&mut sample, request, &self.request_members)?;
        let identity = self.requester.send_request(&sample)?;
        let sequence_number = i64::from(identity.sequence_number);
        log::trace!(
            "[rmw] client '{}' sent request seq={}",
            self.service_name,
            sequence_number
        );
        Ok(sequence_number)
    }

    /// Take at most one response addressed to this client. The returned id
    /// names the request being answered.
    pub fn take_response(&self, response: &mut dyn Any) -> Result<Option<RequestId>> {
        let Some(sample) = self.requester.take_reply() else {
            return Ok(None);
        };
        if !sample.info.valid_data {
            return Ok(None);
        }
        read_sample(
            &sample,
            self.requester.reply_reader().type_code(),
            &self.response_members,
            response,
        )
        .map_err(record)?;
        Ok(Some(RequestId::from(sample.info.related_identity)))
    }

    /// True once a service is listening for this client's requests.
    pub fn service_is_available(&self) -> bool {
        self.requester.matched_replier_count() > 0
    }

    pub(crate) fn condition(&self) -> Arc<StatusCondition> {
        self.requester.reply_condition()
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

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("service_name", &self.service_name)
            .field("requester", &self.requester)
            .finish()
    }
}
