// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Daemon entry point.
//!
//! Loads configuration, opens the strip backend, wires the controller
//! to the broker connection, and runs until a termination signal or a
//! fatal connection failure. Exit code 0 after a graceful shutdown,
//! 1 on any fatal error.

use std::process::ExitCode;
use std::sync::Arc;

use tokio::signal::unix::{SignalKind, signal};
use tracing_subscriber::EnvFilter;

use stripd::config::Config;
use stripd::controller::Controller;
use stripd::error::Error;
use stripd::protocol::{ConnectionSupervisor, DeviceTopics, MqttPublisher, StatusPublisher};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "fatal");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Error> {
    let config = Config::from_env()?;
    tracing::info!(
        device_id = %config.device_id(),
        pixels = config.pixel_count(),
        host = %config.host(),
        port = config.port(),
        "starting"
    );

    let strip = stripd::device::shared(open_strip(&config)?);

    let supervisor = ConnectionSupervisor::new(&config)?;
    let topics = DeviceTopics::new(config.device_id());
    let status = StatusPublisher::new(MqttPublisher::new(supervisor.client()), &topics);
    let mut controller = Controller::new(Arc::clone(&strip), status, topics);

    supervisor.run(&mut controller, terminate_signal()).await?;
    tracing::info!("shutdown complete");
    Ok(())
}

#[cfg(feature = "rpi")]
fn open_strip(config: &Config) -> Result<stripd::device::SpiStrip, Error> {
    let strip = stripd::device::SpiStrip::new(config.pixel_count(), config.channel_order())?;
    Ok(strip)
}

#[cfg(not(feature = "rpi"))]
fn open_strip(config: &Config) -> Result<stripd::device::MemoryStrip, Error> {
    tracing::warn!("built without the `rpi` feature, frames go to an in-memory strip");
    Ok(stripd::device::MemoryStrip::new(config.pixel_count()))
}

/// Completes when SIGTERM or SIGINT arrives.
async fn terminate_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = ctrl_c => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(error) => {
            tracing::warn!(%error, "cannot listen for SIGTERM, shutting down on ctrl-c only");
            let _ = ctrl_c.await;
        }
    }
}
