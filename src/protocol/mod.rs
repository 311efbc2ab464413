// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broker protocol layer.
//!
//! This module holds everything that touches MQTT: the topic set for a
//! device, the publish capability handed to the controller, status
//! publication, and the connection supervisor that owns the event loop
//! and its retry policy.
//!
//! The controller never sees the MQTT client directly; it publishes
//! through the [`MessagePublisher`] trait, which tests substitute with
//! a recording implementation.

mod connection;
mod status;
mod topics;

pub use connection::ConnectionSupervisor;
pub use status::StatusPublisher;
pub use topics::{CommandTopic, DeviceTopics};

use rumqttc::{AsyncClient, QoS};

use crate::error::ConnectionError;

/// Capability to publish a message on the broker.
#[allow(async_fn_in_trait)]
pub trait MessagePublisher {
    /// Publishes a payload to a topic.
    ///
    /// # Errors
    ///
    /// Returns error if the message cannot be handed to the transport.
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), ConnectionError>;
}

/// Publisher backed by the live MQTT connection.
///
/// Cheap to clone; all clones share the supervisor's client. Publishes
/// are queued at QoS 1 and not retained; delivery is the event loop's
/// business, no acknowledgement is awaited here.
#[derive(Debug, Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
}

impl MqttPublisher {
    /// Wraps an MQTT client as a publish capability.
    #[must_use]
    pub fn new(client: AsyncClient) -> Self {
        Self { client }
    }
}

impl MessagePublisher for MqttPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), ConnectionError> {
        self.client
            .publish(topic, QoS::AtLeastOnce, false, payload)
            .await
            .map_err(ConnectionError::Mqtt)
    }
}
