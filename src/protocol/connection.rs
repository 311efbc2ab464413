// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broker connection lifecycle.
//!
//! [`ConnectionSupervisor`] owns the MQTT client and event loop. It
//! establishes the connection with bounded exponential backoff,
//! re-subscribes and announces availability on every reconnect, feeds
//! inbound messages to the controller strictly in arrival order, and
//! runs the shutdown sequence when the termination future completes.

use std::time::Duration;

use rumqttc::{
    AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS, TlsConfiguration, Transport,
};

use crate::config::{Config, RetryPolicy};
use crate::controller::Controller;
use crate::device::Strip;
use crate::error::ConnectionError;

use super::{DeviceTopics, MessagePublisher};

/// How long the outbound queue is given to drain on disconnect.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Owner of the broker connection.
///
/// Built once at startup from the validated configuration; the event
/// loop is driven by [`run`](Self::run) on the dispatch task. The
/// client handed out by [`client`](Self::client) is the only publish
/// path; no other writer to the connection exists.
pub struct ConnectionSupervisor {
    client: AsyncClient,
    event_loop: EventLoop,
    topics: DeviceTopics,
    retry: RetryPolicy,
    host: String,
    port: u16,
}

impl ConnectionSupervisor {
    /// Prepares a connection from the configuration.
    ///
    /// The TLS CA certificate, when configured, is read here so that an
    /// unreadable file fails before the first connection attempt.
    ///
    /// # Errors
    ///
    /// Returns error if the CA certificate cannot be read.
    pub fn new(config: &Config) -> Result<Self, ConnectionError> {
        let client_id = format!("stripd_{}", config.device_id());
        let mut options = MqttOptions::new(client_id, config.host(), config.port());
        options.set_keep_alive(config.keepalive());
        options.set_clean_session(true);

        if let Some((username, password)) = config.credentials() {
            options.set_credentials(username, password);
        }

        if let Some(path) = config.ca_cert() {
            let ca = std::fs::read(path).map_err(|source| ConnectionError::CaCertificate {
                path: path.display().to_string(),
                source,
            })?;
            options.set_transport(Transport::Tls(TlsConfiguration::Simple {
                ca,
                alpn: None,
                client_auth: None,
            }));
        }

        let (client, event_loop) = AsyncClient::new(options, 10);

        Ok(Self {
            client,
            event_loop,
            topics: DeviceTopics::new(config.device_id()),
            retry: config.retry_policy(),
            host: config.host().to_string(),
            port: config.port(),
        })
    }

    /// Returns a handle to the MQTT client for publishing.
    #[must_use]
    pub fn client(&self) -> AsyncClient {
        self.client.clone()
    }

    /// Drives the connection until shutdown or exhausted retries.
    ///
    /// Inbound messages are dispatched to the controller one at a time,
    /// in arrival order; the loop does not poll again until the handler
    /// returns. Every successful connect resets the retry counter, so a
    /// mid-run outage gets the same bounded backoff schedule as the
    /// initial connect.
    ///
    /// When `shutdown` completes the controller's shutdown sequence
    /// runs, queued status publishes are drained through the event
    /// loop, and this returns `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::RetriesExhausted`] after the
    /// configured number of consecutive failed attempts. The caller
    /// treats this as fatal.
    pub async fn run<S, P>(
        mut self,
        controller: &mut Controller<S, P>,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), ConnectionError>
    where
        S: Strip,
        P: MessagePublisher,
    {
        tokio::pin!(shutdown);

        let retry = self.retry;
        let mut failures: u32 = 0;
        let mut delays = retry.delays();

        loop {
            let event = tokio::select! {
                biased;
                () = &mut shutdown => None,
                event = self.event_loop.poll() => Some(event),
            };

            let Some(event) = event else {
                tracing::info!("termination requested");
                controller.shutdown().await;
                self.drain_and_disconnect().await;
                return Ok(());
            };

            match event {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    tracing::info!(host = %self.host, port = self.port, "connected to broker");
                    failures = 0;
                    delays = retry.delays();
                    self.subscribe_commands().await?;
                    controller.announce().await;
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    controller
                        .handle_message(&publish.topic, &publish.payload)
                        .await;
                }
                Ok(_) => {}
                Err(error) => {
                    failures += 1;
                    if failures >= retry.max_attempts() {
                        tracing::error!(%error, attempts = failures, "giving up on broker");
                        return Err(ConnectionError::RetriesExhausted {
                            attempts: failures,
                            last_error: error.to_string(),
                        });
                    }
                    let delay = delays.next().unwrap_or_else(|| retry.initial_delay());
                    tracing::warn!(
                        %error,
                        attempt = failures,
                        next_in_secs = delay.as_secs(),
                        "connection attempt failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Subscribes to the device's three command topics.
    ///
    /// Called on every `ConnAck`; the broker was connected with a clean
    /// session, so nothing survives a reconnect.
    async fn subscribe_commands(&self) -> Result<(), ConnectionError> {
        for topic in self.topics.subscriptions() {
            self.client
                .subscribe(topic, QoS::AtLeastOnce)
                .await
                .map_err(ConnectionError::Mqtt)?;
            tracing::debug!(%topic, "subscribed");
        }
        Ok(())
    }

    /// Flushes queued publishes and disconnects.
    ///
    /// Publishes only leave through the event loop, so the final status
    /// messages enqueued during shutdown need a few more polls before
    /// the socket closes. The disconnect request is queued behind them;
    /// once it goes out everything before it has been written.
    async fn drain_and_disconnect(&mut self) {
        if let Err(error) = self.client.disconnect().await {
            tracing::warn!(%error, "disconnect request failed");
            return;
        }

        let drain = async {
            loop {
                match self.event_loop.poll().await {
                    Ok(Event::Outgoing(Outgoing::Disconnect)) | Err(_) => break,
                    Ok(_) => {}
                }
            }
        };
        if tokio::time::timeout(DRAIN_TIMEOUT, drain).await.is_err() {
            tracing::warn!("outbound queue did not drain before disconnect");
        }
    }
}

impl std::fmt::Debug for ConnectionSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSupervisor")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned()).unwrap()
    }

    #[test]
    fn unreadable_ca_certificate_fails_before_connecting() {
        let config = config(&[
            ("LEDS_NUM", "8"),
            ("MQTT_HOST", "127.0.0.1"),
            ("MQTT_CA_CERT", "/nonexistent/ca.crt"),
        ]);
        let result = ConnectionSupervisor::new(&config);
        assert!(matches!(
            result,
            Err(ConnectionError::CaCertificate { .. })
        ));
    }

    #[test]
    fn plain_connection_builds() {
        let config = config(&[("LEDS_NUM", "8"), ("MQTT_HOST", "127.0.0.1")]);
        let supervisor = ConnectionSupervisor::new(&config).unwrap();
        assert_eq!(supervisor.retry, RetryPolicy::default());
        assert_eq!(supervisor.port, 1883);
    }
}
