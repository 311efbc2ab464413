// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the strip controller.
//!
//! Each failure domain gets its own enum: configuration loading,
//! broker connectivity, inbound command parsing, value validation, and
//! output-device writes. Only [`ConfigError`] and an exhausted
//! [`ConnectionError`] are fatal to the process; everything else is
//! contained where it occurs.

use thiserror::Error;

/// The top-level error type for the daemon.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or validated.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Broker connection failed.
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// An inbound command could not be parsed.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// A write to the output device failed.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

/// Errors raised while loading configuration from the environment.
///
/// All of these are fatal at startup; the daemon exits with a non-zero
/// code before any connection attempt.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// The pixel count is absent, non-numeric, or zero.
    #[error("invalid pixel count {value:?}: {reason}")]
    InvalidPixelCount {
        /// The raw value as found in the environment.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A numeric variable could not be parsed.
    #[error("invalid value {value:?} for {name}")]
    InvalidNumber {
        /// The environment variable name.
        name: &'static str,
        /// The raw value as found in the environment.
        value: String,
    },

    /// The channel order string is not one of the supported orders.
    #[error("unsupported channel order {0:?}")]
    InvalidChannelOrder(String),

    /// Username and password must be provided together.
    #[error("MQTT credentials are incomplete: {0} is set without its counterpart")]
    IncompleteCredentials(&'static str),

    /// The device identity is not usable.
    #[error("invalid device id: {0}")]
    InvalidDeviceId(#[from] ValueError),
}

/// Errors related to the broker connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// MQTT client operation failed.
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// The configured maximum number of connection attempts was used up.
    #[error("gave up connecting after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// How many attempts were made.
        attempts: u32,
        /// The error from the final attempt.
        last_error: String,
    },

    /// The TLS CA certificate could not be read.
    #[error("failed to read CA certificate {path}: {source}")]
    CaCertificate {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors raised while parsing an inbound command message.
///
/// These are always recovered locally: the message is logged and
/// dropped, state is left unchanged, and nothing reaches the receive
/// loop.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The payload is not valid UTF-8.
    #[error("payload is not valid UTF-8")]
    InvalidUtf8,

    /// The HSB payload does not have exactly three comma-separated fields.
    #[error("malformed HSB payload {0:?}: expected \"H,S,B\"")]
    MalformedHsb(String),

    /// An HSB field is not a decimal integer.
    #[error("non-numeric HSB field {0:?}")]
    NonNumericHsb(String),

    /// An HSB field is outside its valid range.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// The effect switch payload is neither `ON` nor `OFF`.
    #[error("unknown effect switch {0:?}")]
    UnknownEffectSwitch(String),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A hue value is outside the valid range (0-360).
    #[error("hue value {0} is out of range [0, 360]")]
    InvalidHue(u16),

    /// A saturation value is outside the valid range (0-100).
    #[error("saturation value {0} is out of range [0, 100]")]
    InvalidSaturation(u8),

    /// A brightness value is outside the valid range (0-100).
    #[error("brightness value {0} is out of range [0, 100]")]
    InvalidBrightness(u8),

    /// The device identity string is empty.
    #[error("device id must not be empty")]
    EmptyDeviceId,
}

/// Errors raised by an output-device backend.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// A frame does not match the strip's pixel count.
    #[error("frame has {got} pixels, strip has {expected}")]
    FrameSize {
        /// Pixels in the rejected frame.
        got: usize,
        /// Pixels the strip expects.
        expected: usize,
    },

    /// The underlying transport failed to accept the buffer.
    #[error("device write failed: {0}")]
    Write(#[from] std::io::Error),

    /// SPI transfer to the strip failed.
    #[cfg(feature = "rpi")]
    #[error("SPI error: {0}")]
    Spi(#[from] rppal::spi::Error),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
