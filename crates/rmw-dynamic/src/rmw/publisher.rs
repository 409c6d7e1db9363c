// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Publisher endpoint and publisher GIDs.

use super::context::Node;
use super::qos::QosProfile;
use super::type_support::{create_type_code, MessageTypeSupport};
use super::{check_identifier, check_typesupport, topic_name, IMPLEMENTATION_IDENTIFIER};
use crate::dds::{DataWriter, EntityQos, Guid, SerializedPayload, GUID_LEN};
use crate::dynamic::{DynamicData, DynamicSample};
use crate::error::{record, Error, Result};
use crate::introspection::MessageMembers;
use crate::marshal;
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;

pub const GID_STORAGE_SIZE: usize = 24;

/// Globally unique id of a publisher: the writer GUID, zero padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gid {
    implementation_identifier: &'static str,
    data: [u8; GID_STORAGE_SIZE],
}

impl Gid {
    pub fn new(implementation_identifier: &'static str, data: [u8; GID_STORAGE_SIZE]) -> Self {
        Self {
            implementation_identifier,
            data,
        }
    }

    pub(crate) fn from_guid(guid: Guid) -> Self {
        let mut data = [0u8; GID_STORAGE_SIZE];
        data[..GUID_LEN].copy_from_slice(&guid.to_bytes());
        Self::new(IMPLEMENTATION_IDENTIFIER, data)
    }

    pub fn implementation_identifier(&self) -> &'static str {
        self.implementation_identifier
    }

    pub fn data(&self) -> &[u8; GID_STORAGE_SIZE] {
        &self.data
    }

    /// Writer GUID held in the first 16 bytes.
    pub fn guid(&self) -> Guid {
        let mut bytes = [0u8; GUID_LEN];
        bytes.copy_from_slice(&self.data[..GUID_LEN]);
        Guid::from_bytes(bytes)
    }
}

/// Compare two GIDs; both must come from this implementation.
pub fn compare_gids_equal(a: &Gid, b: &Gid) -> Result<bool> {
    check_identifier("gid", a.implementation_identifier)
        .and_then(|()| check_identifier("gid", b.implementation_identifier))
        .map_err(record)?;
    Ok(a.data == b.data)
}

/// Marshal `source` into a cleared scratch sample.
pub(crate) fn fill_sample(
    sample: &mut DynamicSample,
    source: &dyn Any,
    members: &MessageMembers,
) -> Result<()> {
    sample.clear_all_members()?;
    marshal::write(sample, source, members)?;
    Ok(())
}

/// Publishes native messages on one ROS topic.
pub struct Publisher {
    writer: DataWriter,
    members: Arc<MessageMembers>,
    /// Reused for every publish; the lock serializes concurrent publishers.
    scratch: Mutex<DynamicSample>,
    topic_name: String,
    gid: Gid,
}

impl Publisher {
    pub(crate) fn new(
        node: &Node,
        type_support: &MessageTypeSupport,
        topic: &str,
        qos: &QosProfile,
    ) -> Result<Self> {
        check_typesupport("message type support", type_support.typesupport_identifier)?;
        if topic.is_empty() {
            return Err(Error::InvalidArgument("topic name is empty".into()));
        }

        let type_code = create_type_code(&type_support.members)?;
        let dds_topic = node.bind_topic(
            Arc::clone(&type_code),
            &topic_name(topic, qos.avoid_ros_namespace_conventions),
        )?;
        let writer = node
            .participant()
            .create_writer(&dds_topic, node.entity_qos(qos)?)?;
        log::debug!(
            "[rmw] publisher created on '{}' type='{}' writer={}",
            dds_topic.name(),
            dds_topic.type_name(),
            writer.guid()
        );

        Ok(Self {
            gid: Gid::from_guid(writer.guid()),
            writer,
            members: Arc::clone(&type_support.members),
            scratch: Mutex::new(DynamicSample::new(type_code)),
            topic_name: topic.to_string(),
        })
    }

    /// Marshal `message` and write it to every matched subscription.
    pub fn publish(&self, message: &dyn Any) -> Result<()> {
        self.publish_inner(message).map_err(record)
    }

    fn publish_inner(&self, message: &dyn Any) -> Result<()> {
        let mut sample = self.scratch.lock();
        fill_sample(&mut sample, message, &self.members)?;
        self.writer.write(&sample)?;
        Ok(())
    }

    /// Write an already serialized CDR message without copying it.
    pub fn publish_serialized(&self, bytes: &[u8]) -> Result<()> {
        self.publish_serialized_inner(bytes).map_err(record)
    }

    fn publish_serialized_inner(&self, bytes: &[u8]) -> Result<()> {
        let mut payload = SerializedPayload::new();
        payload.loan(bytes)?;
        let written = self.writer.write_payload(&payload);
        payload.unloan();
        written?;
        Ok(())
    }

    pub fn gid(&self) -> Gid {
        self.gid
    }

    /// ROS topic name as given at creation.
    pub fn topic_name(&self) -> &str {
        &self.topic_name
    }

    pub fn type_name(&self) -> &str {
        self.writer.topic().type_name()
    }

    pub fn qos(&self) -> EntityQos {
        *self.writer.qos()
    }

    pub fn matched_subscription_count(&self) -> usize {
        self.writer.matched_reader_count()
    }

    pub fn implementation_identifier(&self) -> &'static str {
        IMPLEMENTATION_IDENTIFIER
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("topic_name", &self.topic_name)
            .field("writer", &self.writer)
            .finish()
    }
}
