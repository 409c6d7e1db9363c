// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Requester/replier pair built from one request topic and one reply topic.
//!
//! A reply carries the identity of the request it answers as its related
//! identity. Each requester's reply reader only accepts replies whose
//! related identity names that requester's request writer, so requesters
//! sharing a service never see each other's replies.

use super::condition::StatusCondition;
use super::identity::SampleIdentity;
use super::participant::{Participant, Topic};
use super::qos::EntityQos;
use super::reader::{DataReader, Sample};
use super::writer::DataWriter;
use super::Result;
use crate::dynamic::DynamicSample;
use std::sync::Arc;

/// Client side: writes requests, takes correlated replies.
#[derive(Debug)]
pub struct Requester {
    request_writer: DataWriter,
    reply_reader: DataReader,
}

impl Requester {
    pub fn new(
        participant: &Participant,
        request_topic: &Topic,
        reply_topic: &Topic,
        qos: EntityQos,
    ) -> Result<Self> {
        let request_writer = participant.create_writer(request_topic, qos)?;
        let reply_reader =
            participant.create_related_reader(reply_topic, qos, request_writer.guid())?;
        Ok(Self {
            request_writer,
            reply_reader,
        })
    }

    /// Send a request; the returned identity is what replies will carry.
    pub fn send_request(&self, request: &DynamicSample) -> Result<SampleIdentity> {
        self.request_writer.write(request)
    }

    pub fn take_reply(&self) -> Option<Sample> {
        self.reply_reader.take()
    }

    pub fn reply_condition(&self) -> Arc<StatusCondition> {
        self.reply_reader.status_condition()
    }

    pub fn request_writer(&self) -> &DataWriter {
        &self.request_writer
    }

    pub fn reply_reader(&self) -> &DataReader {
        &self.reply_reader
    }

    /// Repliers currently listening for this requester's requests.
    pub fn matched_replier_count(&self) -> usize {
        self.request_writer.matched_reader_count()
    }
}

/// Service side: takes requests, writes replies tagged with the request
/// identity.
#[derive(Debug)]
pub struct Replier {
    request_reader: DataReader,
    reply_writer: DataWriter,
}

impl Replier {
    pub fn new(
        participant: &Participant,
        request_topic: &Topic,
        reply_topic: &Topic,
        qos: EntityQos,
    ) -> Result<Self> {
        let request_reader = participant.create_reader(request_topic, qos)?;
        let reply_writer = participant.create_writer(reply_topic, qos)?;
        Ok(Self {
            request_reader,
            reply_writer,
        })
    }

    pub fn take_request(&self) -> Option<Sample> {
        self.request_reader.take()
    }

    pub fn send_reply(
        &self,
        reply: &DynamicSample,
        related: SampleIdentity,
    ) -> Result<SampleIdentity> {
        self.reply_writer.write_related(reply, related)
    }

    pub fn request_condition(&self) -> Arc<StatusCondition> {
        self.request_reader.status_condition()
    }

    pub fn request_reader(&self) -> &DataReader {
        &self.request_reader
    }

    pub fn reply_writer(&self) -> &DataWriter {
        &self.reply_writer
    }
}
