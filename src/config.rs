// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Environment-sourced configuration.
//!
//! All configuration is read and validated once at startup; any
//! invalid value is a named [`ConfigError`] and fatal before the first
//! connection attempt. Nothing here is re-read or coerced later.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::device::ChannelOrder;
use crate::error::ConfigError;
use crate::types::DeviceId;

/// Retry schedule for broker connection attempts.
///
/// The first failure waits the initial delay; every further failure
/// multiplies the delay by the backoff factor. Growth is unbounded, no
/// jitter, no cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_factor: u32,
}

impl RetryPolicy {
    /// Creates a policy with a one-second initial delay.
    #[must_use]
    pub const fn new(max_attempts: u32, backoff_factor: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::from_secs(1),
            backoff_factor,
        }
    }

    /// Consecutive failures tolerated before giving up.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the first retry.
    #[must_use]
    pub const fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Multiplier applied to the delay after each failure.
    #[must_use]
    pub const fn backoff_factor(&self) -> u32 {
        self.backoff_factor
    }

    /// The delay before each retry, in order: 1, factor, factor², …
    /// time-units. Endless; growth saturates instead of overflowing.
    pub fn delays(self) -> impl Iterator<Item = Duration> {
        std::iter::successors(Some(self.initial_delay), move |delay| {
            Some(delay.saturating_mul(self.backoff_factor))
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_BACKOFF_FACTOR)
    }
}

const DEFAULT_DEVICE_ID: &str = "rpi4_debug";
const DEFAULT_PORT: u16 = 1883;
const DEFAULT_KEEPALIVE_SECS: u64 = 15;
const DEFAULT_MAX_RETRIES: u32 = 10;
const DEFAULT_BACKOFF_FACTOR: u32 = 2;

/// Validated daemon configuration.
///
/// Immutable after load. Constructed from the process environment by
/// [`from_env`](Self::from_env), or from any name-to-value lookup by
/// [`from_lookup`](Self::from_lookup) (which tests use to avoid
/// touching the real environment).
///
/// | variable | meaning | default |
/// |---|---|---|
/// | `DEVICE_ID` | identity used in every topic | `rpi4_debug` |
/// | `LEDS_NUM` | pixel count, positive | required |
/// | `CHANNEL_ORDER` | `RGB`/`GRB`/`RGBW`/`GRBW` | `RGB` |
/// | `MQTT_HOST` | broker host | required |
/// | `MQTT_PORT` | broker port | `1883` |
/// | `MQTT_USERNAME` / `MQTT_PASSWORD` | credentials, both or neither | none |
/// | `MQTT_CA_CERT` | CA certificate path, enables TLS | none |
/// | `MQTT_KEEPALIVE_SECS` | keepalive interval | `15` |
/// | `MQTT_MAX_RETRIES` | connection attempts before giving up | `10` |
/// | `MQTT_BACKOFF_FACTOR` | retry delay multiplier | `2` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    device_id: DeviceId,
    pixel_count: usize,
    channel_order: ChannelOrder,
    host: String,
    port: u16,
    credentials: Option<(String, String)>,
    ca_cert: Option<PathBuf>,
    keepalive: Duration,
    retry: RetryPolicy,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns error if a required variable is missing or any value is
    /// invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration from an arbitrary name-to-value lookup.
    ///
    /// # Errors
    ///
    /// Returns error if a required variable is missing or any value is
    /// invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let device_id = DeviceId::new(
            lookup("DEVICE_ID").unwrap_or_else(|| DEFAULT_DEVICE_ID.to_string()),
        )?;
        let pixel_count = parse_pixel_count(lookup("LEDS_NUM"))?;

        let channel_order = match lookup("CHANNEL_ORDER") {
            Some(raw) => ChannelOrder::from_str(&raw)?,
            None => ChannelOrder::default(),
        };

        let host = lookup("MQTT_HOST").ok_or(ConfigError::MissingVar("MQTT_HOST"))?;
        let port = numeric(lookup("MQTT_PORT"), "MQTT_PORT", DEFAULT_PORT)?;

        let credentials = match (lookup("MQTT_USERNAME"), lookup("MQTT_PASSWORD")) {
            (Some(username), Some(password)) => Some((username, password)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::IncompleteCredentials("MQTT_USERNAME"));
            }
            (None, Some(_)) => {
                return Err(ConfigError::IncompleteCredentials("MQTT_PASSWORD"));
            }
        };

        let ca_cert = lookup("MQTT_CA_CERT").map(PathBuf::from);
        let keepalive_secs = numeric(
            lookup("MQTT_KEEPALIVE_SECS"),
            "MQTT_KEEPALIVE_SECS",
            DEFAULT_KEEPALIVE_SECS,
        )?;
        let max_retries = numeric(
            lookup("MQTT_MAX_RETRIES"),
            "MQTT_MAX_RETRIES",
            DEFAULT_MAX_RETRIES,
        )?;
        let backoff_factor = numeric(
            lookup("MQTT_BACKOFF_FACTOR"),
            "MQTT_BACKOFF_FACTOR",
            DEFAULT_BACKOFF_FACTOR,
        )?;

        Ok(Self {
            device_id,
            pixel_count,
            channel_order,
            host,
            port,
            credentials,
            ca_cert,
            keepalive: Duration::from_secs(keepalive_secs),
            retry: RetryPolicy::new(max_retries, backoff_factor),
        })
    }

    /// The device identity.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Number of pixels on the strip.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// Channel order of the strip hardware.
    #[must_use]
    pub fn channel_order(&self) -> ChannelOrder {
        self.channel_order
    }

    /// Broker host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Broker port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Broker credentials, if configured.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.credentials
            .as_ref()
            .map(|(u, p)| (u.as_str(), p.as_str()))
    }

    /// Path to the CA certificate; `Some` enables TLS.
    #[must_use]
    pub fn ca_cert(&self) -> Option<&Path> {
        self.ca_cert.as_deref()
    }

    /// MQTT keepalive interval.
    #[must_use]
    pub fn keepalive(&self) -> Duration {
        self.keepalive
    }

    /// Connection retry schedule.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }
}

fn parse_pixel_count(raw: Option<String>) -> Result<usize, ConfigError> {
    let raw = raw.ok_or(ConfigError::MissingVar("LEDS_NUM"))?;
    let count = raw
        .trim()
        .parse::<usize>()
        .map_err(|error| ConfigError::InvalidPixelCount {
            value: raw.clone(),
            reason: error.to_string(),
        })?;
    if count == 0 {
        return Err(ConfigError::InvalidPixelCount {
            value: raw,
            reason: "must be positive".to_string(),
        });
    }
    Ok(count)
}

fn numeric<T: FromStr>(
    raw: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config =
            Config::from_lookup(lookup(&[("LEDS_NUM", "30"), ("MQTT_HOST", "broker.local")]))
                .unwrap();

        assert_eq!(config.device_id().as_str(), "rpi4_debug");
        assert_eq!(config.pixel_count(), 30);
        assert_eq!(config.channel_order(), ChannelOrder::Rgb);
        assert_eq!(config.host(), "broker.local");
        assert_eq!(config.port(), 1883);
        assert!(config.credentials().is_none());
        assert!(config.ca_cert().is_none());
        assert_eq!(config.keepalive(), Duration::from_secs(15));
        assert_eq!(config.retry_policy(), RetryPolicy::new(10, 2));
    }

    #[test]
    fn full_config() {
        let config = Config::from_lookup(lookup(&[
            ("DEVICE_ID", "livingroom"),
            ("LEDS_NUM", "144"),
            ("CHANNEL_ORDER", "GRB"),
            ("MQTT_HOST", "10.0.0.2"),
            ("MQTT_PORT", "8883"),
            ("MQTT_USERNAME", "strip"),
            ("MQTT_PASSWORD", "hunter2"),
            ("MQTT_CA_CERT", "/etc/stripd/ca.crt"),
            ("MQTT_KEEPALIVE_SECS", "30"),
            ("MQTT_MAX_RETRIES", "5"),
            ("MQTT_BACKOFF_FACTOR", "3"),
        ]))
        .unwrap();

        assert_eq!(config.device_id().as_str(), "livingroom");
        assert_eq!(config.channel_order(), ChannelOrder::Grb);
        assert_eq!(config.port(), 8883);
        assert_eq!(config.credentials(), Some(("strip", "hunter2")));
        assert_eq!(config.ca_cert(), Some(Path::new("/etc/stripd/ca.crt")));
        assert_eq!(config.keepalive(), Duration::from_secs(30));
        assert_eq!(config.retry_policy().max_attempts(), 5);
        assert_eq!(config.retry_policy().backoff_factor(), 3);
    }

    #[test]
    fn missing_pixel_count_is_fatal() {
        let result = Config::from_lookup(lookup(&[("MQTT_HOST", "broker.local")]));
        assert!(matches!(result, Err(ConfigError::MissingVar("LEDS_NUM"))));
    }

    #[test]
    fn non_numeric_pixel_count_is_fatal() {
        let result = Config::from_lookup(lookup(&[
            ("LEDS_NUM", "thirty"),
            ("MQTT_HOST", "broker.local"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidPixelCount { .. })
        ));
    }

    #[test]
    fn zero_pixel_count_is_fatal() {
        let result =
            Config::from_lookup(lookup(&[("LEDS_NUM", "0"), ("MQTT_HOST", "broker.local")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidPixelCount { .. })
        ));
    }

    #[test]
    fn missing_host_is_fatal() {
        let result = Config::from_lookup(lookup(&[("LEDS_NUM", "8")]));
        assert!(matches!(result, Err(ConfigError::MissingVar("MQTT_HOST"))));
    }

    #[test]
    fn username_without_password_is_fatal() {
        let result = Config::from_lookup(lookup(&[
            ("LEDS_NUM", "8"),
            ("MQTT_HOST", "broker.local"),
            ("MQTT_USERNAME", "strip"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::IncompleteCredentials("MQTT_USERNAME"))
        ));
    }

    #[test]
    fn password_without_username_is_fatal() {
        let result = Config::from_lookup(lookup(&[
            ("LEDS_NUM", "8"),
            ("MQTT_HOST", "broker.local"),
            ("MQTT_PASSWORD", "hunter2"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::IncompleteCredentials("MQTT_PASSWORD"))
        ));
    }

    #[test]
    fn bad_channel_order_is_fatal() {
        let result = Config::from_lookup(lookup(&[
            ("LEDS_NUM", "8"),
            ("MQTT_HOST", "broker.local"),
            ("CHANNEL_ORDER", "BGR"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidChannelOrder(_))
        ));
    }

    #[test]
    fn bad_port_is_fatal() {
        let result = Config::from_lookup(lookup(&[
            ("LEDS_NUM", "8"),
            ("MQTT_HOST", "broker.local"),
            ("MQTT_PORT", "70000"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidNumber {
                name: "MQTT_PORT",
                ..
            })
        ));
    }

    #[test]
    fn backoff_schedule_doubles() {
        let delays: Vec<u64> = RetryPolicy::new(10, 2)
            .delays()
            .take(4)
            .map(|d| d.as_secs())
            .collect();
        assert_eq!(delays, vec![1, 2, 4, 8]);
    }

    #[test]
    fn backoff_schedule_with_factor_three() {
        let delays: Vec<u64> = RetryPolicy::new(10, 3)
            .delays()
            .take(3)
            .map(|d| d.as_secs())
            .collect();
        assert_eq!(delays, vec![1, 3, 9]);
    }

    #[test]
    fn empty_device_id_is_fatal() {
        let result = Config::from_lookup(lookup(&[
            ("DEVICE_ID", ""),
            ("LEDS_NUM", "8"),
            ("MQTT_HOST", "broker.local"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidDeviceId(_))));
    }
}
