// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status publication.

use crate::types::PowerState;

use super::{DeviceTopics, MessagePublisher};

/// Publishes strip status to the broker.
///
/// Three channels, each with a fixed topic and a boolean payload
/// vocabulary: effect and power speak `ON`/`OFF`, availability speaks
/// `Online`/`Offline`. Publication is fire-and-forget from the
/// dispatcher's perspective: a failed publish is logged and otherwise
/// ignored, the command that triggered it proceeds.
#[derive(Debug)]
pub struct StatusPublisher<P: MessagePublisher> {
    publisher: P,
    effect_topic: String,
    power_topic: String,
    availability_topic: String,
}

impl<P: MessagePublisher> StatusPublisher<P> {
    /// Creates a status publisher over the given publish capability.
    #[must_use]
    pub fn new(publisher: P, topics: &DeviceTopics) -> Self {
        Self {
            publisher,
            effect_topic: topics.effect_status().to_string(),
            power_topic: topics.power_status().to_string(),
            availability_topic: topics.availability_status().to_string(),
        }
    }

    /// Reports whether the rainbow effect is running.
    pub async fn publish_effect(&self, on: bool) {
        self.send(&self.effect_topic, PowerState::from(on).as_str())
            .await;
    }

    /// Reports whether the strip is effectively on.
    pub async fn publish_power(&self, on: bool) {
        self.send(&self.power_topic, PowerState::from(on).as_str())
            .await;
    }

    /// Reports whether this controller is reachable.
    pub async fn publish_availability(&self, online: bool) {
        let payload = if online { "Online" } else { "Offline" };
        self.send(&self.availability_topic, payload).await;
    }

    async fn send(&self, topic: &str, payload: &str) {
        tracing::debug!(%topic, %payload, "publishing status");
        if let Err(error) = self.publisher.publish(topic, payload).await {
            tracing::warn!(%topic, %payload, %error, "status publish failed");
        }
    }
}
