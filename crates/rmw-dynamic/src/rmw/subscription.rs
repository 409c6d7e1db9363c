// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Subscription endpoint.

use super::context::Node;
use super::publisher::Gid;
use super::qos::QosProfile;
use super::type_support::{create_type_code, MessageTypeSupport};
use super::{check_typesupport, topic_name, IMPLEMENTATION_IDENTIFIER};
use crate::dds::{DataReader, DdsError, EntityQos, Sample, StatusCondition, GUID_PREFIX_LEN};
use crate::dynamic::{cdr, TypeCode};
use crate::error::{record, Error, Result};
use crate::introspection::MessageMembers;
use crate::marshal;
use std::any::Any;
use std::sync::Arc;

/// Metadata returned with a taken message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageInfo {
    pub publisher_gid: Gid,
}

/// Decode a sample's CDR payload and marshal it into `target`.
pub(crate) fn read_sample(
    sample: &Sample,
    type_code: &Arc<TypeCode>,
    members: &MessageMembers,
    target: &mut dyn Any,
) -> Result<()> {
    let data = cdr::decode(&sample.payload, type_code).map_err(DdsError::from)?;
    marshal::read(target, &data, members)?;
    Ok(())
}

/// Takes native messages from one ROS topic.
pub struct Subscription {
    reader: DataReader,
    members: Arc<MessageMembers>,
    ignore_local_publications: bool,
    node_prefix: [u8; GUID_PREFIX_LEN],
    topic_name: String,
}

impl Subscription {
    pub(crate) fn new(
        node: &Node,
        type_support: &MessageTypeSupport,
        topic: &str,
        qos: &QosProfile,
        ignore_local_publications: bool,
    ) -> Result<Self> {
        check_typesupport("message type support", type_support.typesupport_identifier)?;
        if topic.is_empty() {
            return Err(Error::InvalidArgument("topic name is empty".into()));
        }

        let type_code = create_type_code(&type_support.members)?;
        let dds_topic = node.bind_topic(
            type_code,
            &topic_name(topic, qos.avoid_ros_namespace_conventions),
        )?;
        let reader = node
            .participant()
            .create_reader(&dds_topic, node.entity_qos(qos)?)?;
        log::debug!(
            "[rmw] subscription created on '{}' type='{}' reader={} ignore_local={}",
            dds_topic.name(),
            dds_topic.type_name(),
            reader.guid(),
            ignore_local_publications
        );

        Ok(Self {
            reader,
            members: Arc::clone(&type_support.members),
            ignore_local_publications,
            node_prefix: node.guid_prefix(),
            topic_name: topic.to_string(),
        })
    }

    /// Take at most one message. Returns `false` when nothing was taken,
    /// which includes a sample that carried no data or came from a
    /// publisher of the same node while local publications are ignored.
    pub fn take(&self, message: &mut dyn Any) -> Result<bool> {
        Ok(self.take_with_info(message)?.is_some())
    }

    pub fn take_with_info(&self, message: &mut dyn Any) -> Result<Option<MessageInfo>> {
        let Some(sample) = self.next_sample() else {
            return Ok(None);
        };
        read_sample(&sample, self.reader.type_code(), &self.members, message).map_err(record)?;
        Ok(Some(MessageInfo {
            publisher_gid: Gid::from_guid(sample.info.writer_guid),
        }))
    }

    /// Take at most one message as its raw CDR bytes.
    pub fn take_serialized(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.next_sample().map(|sample| sample.payload.to_vec()))
    }

    fn next_sample(&self) -> Option<Sample> {
        let sample = self.reader.take()?;
        if !sample.info.valid_data {
            log::trace!("[rmw] '{}': skipped sample without data", self.topic_name);
            return None;
        }
        if self.ignore_local_publications && sample.info.writer_guid.prefix == self.node_prefix {
            log::trace!("[rmw] '{}': ignored local publication", self.topic_name);
            return None;
        }
        Some(sample)
    }

    pub(crate) fn condition(&self) -> Arc<StatusCondition> {
        self.reader.status_condition()
    }

    pub(crate) fn node_prefix(&self) -> [u8; GUID_PREFIX_LEN] {
        self.node_prefix
    }

    pub fn topic_name(&self) -> &str {
        &self.topic_name
    }

    pub fn type_name(&self) -> &str {
        self.reader.topic().type_name()
    }

    pub fn qos(&self) -> EntityQos {
        *self.reader.qos()
    }

    /// Samples currently queued, including ones `take` will skip.
    pub fn queued_count(&self) -> usize {
        self.reader.unread_count()
    }

    /// Publishers in the domain currently matched with this subscription.
    pub fn matched_publisher_count(&self) -> usize {
        self.reader.matched_writer_count()
    }

    pub fn implementation_identifier(&self) -> &'static str {
        IMPLEMENTATION_IDENTIFIER
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("topic_name", &self.topic_name)
            .field("ignore_local_publications", &self.ignore_local_publications)
            .field("reader", &self.reader)
            .finish()
    }
}
