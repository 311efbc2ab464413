// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Topic names for one device.

use crate::types::DeviceId;

/// The kind of command a subscribed topic carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandTopic {
    /// `cmnd/{id}/POWER`
    Power,
    /// `cmnd/{id}/HSBColor`
    HsbColor,
    /// `cmnd/{id}/effects/rainbow/set`
    EffectSwitch,
}

/// The fixed topic set of a single device.
///
/// Command topics are subscribed on every (re)connect; status topics
/// are published to on state change. All six are derived from the
/// device identity once, at startup.
///
/// # Examples
///
/// ```
/// use stripd::protocol::{CommandTopic, DeviceTopics};
/// use stripd::types::DeviceId;
///
/// let id = DeviceId::new("rpi4_debug").unwrap();
/// let topics = DeviceTopics::new(&id);
///
/// assert_eq!(topics.power_status(), "stat/rpi4_debug/POWER");
/// assert_eq!(
///     topics.classify("cmnd/rpi4_debug/POWER"),
///     Some(CommandTopic::Power)
/// );
/// assert_eq!(topics.classify("cmnd/other_device/POWER"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceTopics {
    power_command: String,
    hsb_command: String,
    effect_command: String,
    effect_status: String,
    power_status: String,
    availability_status: String,
}

impl DeviceTopics {
    /// Builds the topic set for the given device identity.
    #[must_use]
    pub fn new(id: &DeviceId) -> Self {
        Self {
            power_command: format!("cmnd/{id}/POWER"),
            hsb_command: format!("cmnd/{id}/HSBColor"),
            effect_command: format!("cmnd/{id}/effects/rainbow/set"),
            effect_status: format!("stat/{id}/effects/rainbow"),
            power_status: format!("stat/{id}/POWER"),
            availability_status: format!("stat/{id}/STATUS"),
        }
    }

    /// The command topics to subscribe to.
    #[must_use]
    pub fn subscriptions(&self) -> [&str; 3] {
        [&self.power_command, &self.hsb_command, &self.effect_command]
    }

    /// Matches an inbound topic against the command set.
    ///
    /// Returns `None` for anything outside this device's three command
    /// topics, including other devices' commands.
    #[must_use]
    pub fn classify(&self, topic: &str) -> Option<CommandTopic> {
        if topic == self.power_command {
            Some(CommandTopic::Power)
        } else if topic == self.hsb_command {
            Some(CommandTopic::HsbColor)
        } else if topic == self.effect_command {
            Some(CommandTopic::EffectSwitch)
        } else {
            None
        }
    }

    /// Topic for the rainbow effect status (`ON`/`OFF`).
    #[must_use]
    pub fn effect_status(&self) -> &str {
        &self.effect_status
    }

    /// Topic for the power status (`ON`/`OFF`).
    #[must_use]
    pub fn power_status(&self) -> &str {
        &self.power_status
    }

    /// Topic for the availability status (`Online`/`Offline`).
    #[must_use]
    pub fn availability_status(&self) -> &str {
        &self.availability_status
    }
}
