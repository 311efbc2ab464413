// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command dispatch.
//!
//! The [`Controller`] is the single owner of strip state and the only
//! code that mutates it. Inbound topic/payload pairs are parsed before
//! any side effect, so a malformed command is dropped with the state
//! and device untouched. All per-message errors end here; nothing
//! propagates to the receive loop.

use std::sync::Arc;

use crate::device::{Frame, SharedStrip, Strip};
use crate::effect::EffectRunner;
use crate::error::{CommandError, DeviceError, Error};
use crate::protocol::{CommandTopic, DeviceTopics, MessagePublisher, StatusPublisher};
use crate::state::StripState;
use crate::types::{HsbColor, PowerState, RgbColor};

/// Orchestrator between broker messages and the strip.
///
/// Runs on the single dispatch task. Every handler finishes tearing
/// down the animation worker before writing a static frame, so the two
/// writers never touch the device concurrently.
#[derive(Debug)]
pub struct Controller<S: Strip, P: MessagePublisher> {
    topics: DeviceTopics,
    state: StripState,
    strip: SharedStrip<S>,
    effects: EffectRunner<S>,
    status: StatusPublisher<P>,
}

impl<S: Strip, P: MessagePublisher> Controller<S, P> {
    /// Creates a controller over a strip and a publish capability.
    #[must_use]
    pub fn new(strip: SharedStrip<S>, status: StatusPublisher<P>, topics: DeviceTopics) -> Self {
        let effects = EffectRunner::new(Arc::clone(&strip));
        Self {
            topics,
            state: StripState::new(),
            strip,
            effects,
            status,
        }
    }

    /// The current strip state.
    #[must_use]
    pub fn state(&self) -> &StripState {
        &self.state
    }

    /// Returns `true` while the animation worker is live.
    #[must_use]
    pub fn effect_running(&self) -> bool {
        self.effects.is_running()
    }

    /// Announces this controller as reachable.
    ///
    /// Called by the connection supervisor after every successful
    /// (re)connect.
    pub async fn announce(&self) {
        self.status.publish_availability(true).await;
    }

    /// Handles one inbound broker message.
    ///
    /// Never fails from the caller's view: unknown topics and malformed
    /// payloads are logged and dropped with state unchanged; a device
    /// write failure abandons the command.
    pub async fn handle_message(&mut self, topic: &str, payload: &[u8]) {
        let Some(kind) = self.topics.classify(topic) else {
            tracing::warn!(%topic, "unknown topic");
            return;
        };

        let Ok(payload) = std::str::from_utf8(payload) else {
            tracing::warn!(%topic, error = %CommandError::InvalidUtf8, "command dropped");
            return;
        };

        tracing::info!(%topic, %payload, "command received");
        if let Err(error) = self.dispatch(kind, payload).await {
            match error {
                Error::Device(error) => {
                    tracing::error!(%topic, %error, "device write failed, command abandoned");
                }
                error => tracing::warn!(%topic, %error, "command dropped"),
            }
        }
    }

    async fn dispatch(&mut self, kind: CommandTopic, payload: &str) -> Result<(), Error> {
        match kind {
            CommandTopic::Power => match PowerState::from_payload(payload) {
                PowerState::On => {
                    self.stop_effect().await?;
                    let color = self.state.color();
                    self.apply_color(color).await?;
                    self.status
                        .publish_power(self.state.is_effectively_on())
                        .await;
                }
                PowerState::Off => {
                    self.stop_effect().await?;
                    self.strip.lock().await.blank()?;
                    self.status.publish_power(false).await;
                }
            },
            CommandTopic::HsbColor => {
                let color = payload.parse::<HsbColor>()?.to_rgb();
                self.state.set_color(color);
                self.stop_effect().await?;
                self.apply_color(color).await?;
                self.status
                    .publish_power(self.state.is_effectively_on())
                    .await;
            }
            CommandTopic::EffectSwitch => match payload {
                "ON" => {
                    self.status.publish_power(false).await;
                    self.effects.start().await?;
                    self.state.set_effect_active(true);
                    self.status.publish_effect(true).await;
                }
                "OFF" => {
                    self.effects.stop().await?;
                    self.state.set_effect_active(false);
                    self.strip.lock().await.blank()?;
                    self.status.publish_effect(false).await;
                }
                other => {
                    return Err(CommandError::UnknownEffectSwitch(other.to_string()).into());
                }
            },
        }
        Ok(())
    }

    /// Runs the termination sequence.
    ///
    /// Stop the worker, report everything off, report this controller
    /// offline, then leave the strip dark. Device errors here are
    /// logged and skipped over so the sequence always reaches the final
    /// blank.
    pub async fn shutdown(&mut self) {
        if let Err(error) = self.effects.stop().await {
            tracing::error!(%error, "could not darken strip while stopping effect");
        }
        self.state.set_effect_active(false);

        self.status.publish_effect(false).await;
        self.status.publish_power(false).await;
        self.status.publish_availability(false).await;

        self.state.set_color(RgbColor::BLACK);
        if let Err(error) = self.strip.lock().await.blank() {
            tracing::error!(%error, "could not darken strip on shutdown");
        }
    }

    /// Tears down the worker and reports the effect off.
    ///
    /// The effect-off report goes out on every stop path, matching the
    /// status a command implies rather than what was running before.
    async fn stop_effect(&mut self) -> Result<(), DeviceError> {
        self.effects.stop().await?;
        self.state.set_effect_active(false);
        self.status.publish_effect(false).await;
        Ok(())
    }

    /// Writes a full static frame of `color` and flushes.
    async fn apply_color(&mut self, color: RgbColor) -> Result<(), DeviceError> {
        let mut strip = self.strip.lock().await;
        let frame = Frame::filled(strip.len(), color);
        strip.write_frame(&frame)?;
        strip.flush()
    }
}
