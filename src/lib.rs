// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `stripd` - MQTT-controlled addressable LED strip daemon.
//!
//! A device-side controller for a single-board computer that maps
//! remote MQTT commands onto the state of a WS281x-class LED strip:
//! power, static HSB color, and an animated rainbow effect.
//!
//! # Command surface
//!
//! The daemon subscribes to three command topics (templated on the
//! device identity) and reports back on three status topics:
//!
//! | direction | topic | payload |
//! |---|---|---|
//! | subscribe | `cmnd/{id}/POWER` | `ON` / anything else is `OFF` |
//! | subscribe | `cmnd/{id}/HSBColor` | `"H,S,B"` decimal integers |
//! | subscribe | `cmnd/{id}/effects/rainbow/set` | `ON` / `OFF` |
//! | publish | `stat/{id}/effects/rainbow` | `ON` / `OFF` |
//! | publish | `stat/{id}/POWER` | `ON` / `OFF` |
//! | publish | `stat/{id}/STATUS` | `Online` / `Offline` |
//!
//! # Quick Start
//!
//! The whole control surface lives in this library so it can run and
//! be tested without strip hardware or a live broker. The daemon
//! wiring looks like this:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use stripd::config::Config;
//! use stripd::controller::Controller;
//! use stripd::device::{MemoryStrip, shared};
//! use stripd::protocol::{ConnectionSupervisor, DeviceTopics, MqttPublisher, StatusPublisher};
//!
//! #[tokio::main]
//! async fn main() -> stripd::Result<()> {
//!     let config = Config::from_env()?;
//!     let strip = shared(MemoryStrip::new(config.pixel_count()));
//!
//!     let supervisor = ConnectionSupervisor::new(&config)?;
//!     let topics = DeviceTopics::new(config.device_id());
//!     let status = StatusPublisher::new(MqttPublisher::new(supervisor.client()), &topics);
//!     let mut controller = Controller::new(Arc::clone(&strip), status, topics);
//!
//!     let terminate = async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     };
//!     supervisor.run(&mut controller, terminate).await?;
//!     Ok(())
//! }
//! ```
//!
//! On a Raspberry Pi, build with the `rpi` feature and swap
//! [`MemoryStrip`](device::MemoryStrip) for
//! [`SpiStrip`](device::SpiStrip).

pub mod config;
pub mod controller;
pub mod device;
pub mod effect;
pub mod error;
pub mod protocol;
pub mod state;
pub mod types;

pub use config::{Config, RetryPolicy};
pub use controller::Controller;
pub use error::{
    CommandError, ConfigError, ConnectionError, DeviceError, Error, Result, ValueError,
};
pub use protocol::{
    CommandTopic, ConnectionSupervisor, DeviceTopics, MessagePublisher, MqttPublisher,
    StatusPublisher,
};
pub use state::StripState;
pub use types::{DeviceId, HsbColor, PowerState, RgbColor};
