// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Output-device abstraction for the LED strip.
//!
//! The strip is a write-only sink: a backend accepts a full pixel
//! buffer ([`Frame`]) and latches it with [`Strip::flush`]. There is no
//! read-back. Two backends exist:
//!
//! - [`MemoryStrip`]: in-memory, used by tests and by dry runs on
//!   machines without strip hardware
//! - [`SpiStrip`] (feature `rpi`): WS281x driven over SPI via `rppal`
//!
//! At most one writer may touch a strip at any instant. The daemon
//! enforces this by keeping the strip behind a shared async mutex
//! ([`SharedStrip`]); the animation worker and the command dispatch
//! path both lock it per frame.

mod memory;
#[cfg(feature = "rpi")]
mod spi;

pub use memory::MemoryStrip;
#[cfg(feature = "rpi")]
pub use spi::SpiStrip;

use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{ConfigError, DeviceError};
use crate::types::RgbColor;

/// A strip shared between the dispatch path and the animation worker.
pub type SharedStrip<S> = Arc<Mutex<S>>;

/// Wraps a strip backend for shared use.
pub fn shared<S: Strip>(strip: S) -> SharedStrip<S> {
    Arc::new(Mutex::new(strip))
}

/// Write-only sink for full-frame pixel data.
pub trait Strip: Send + 'static {
    /// Number of pixels on the strip.
    fn len(&self) -> usize;

    /// Returns `true` if the strip has no pixels.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stages a full frame into the output buffer.
    ///
    /// # Errors
    ///
    /// Returns error if the frame size does not match the strip or the
    /// backend rejects the buffer.
    fn write_frame(&mut self, frame: &Frame) -> Result<(), DeviceError>;

    /// Latches the staged buffer onto the physical device.
    ///
    /// # Errors
    ///
    /// Returns error if the transfer fails.
    fn flush(&mut self) -> Result<(), DeviceError>;

    /// Overwrites the entire strip with black and flushes.
    ///
    /// Every stop path ends with this call, erasing whatever partial
    /// frame a torn-down worker may have left behind.
    ///
    /// # Errors
    ///
    /// Returns error if the write or flush fails.
    fn blank(&mut self) -> Result<(), DeviceError> {
        let frame = Frame::new(self.len());
        self.write_frame(&frame)?;
        self.flush()
    }
}

/// A full frame of pixel colors, sized to the strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: Vec<RgbColor>,
}

impl Frame {
    /// Creates an all-black frame of the given size.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![RgbColor::BLACK; len],
        }
    }

    /// Creates a frame with every pixel set to `color`.
    #[must_use]
    pub fn filled(len: usize, color: RgbColor) -> Self {
        Self {
            pixels: vec![color; len],
        }
    }

    /// Number of pixels in the frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Returns `true` if the frame has no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Sets a single pixel. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, color: RgbColor) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    /// Sets every pixel to `color`.
    pub fn fill(&mut self, color: RgbColor) {
        self.pixels.fill(color);
    }

    /// Returns the pixel colors.
    #[must_use]
    pub fn pixels(&self) -> &[RgbColor] {
        &self.pixels
    }

    /// Returns `true` if every pixel is black.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.pixels.iter().all(RgbColor::is_black)
    }
}

/// Byte order of the color channels on the wire to the strip.
///
/// Some WS281x variants swap red and green; four-channel variants
/// carry a white channel, which this controller always drives at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    /// Red, green, blue.
    #[default]
    Rgb,
    /// Green, red, blue (common WS2812 order).
    Grb,
    /// Red, green, blue, white.
    Rgbw,
    /// Green, red, blue, white.
    Grbw,
}

impl ChannelOrder {
    /// Bytes emitted per pixel for this order.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb | Self::Grb => 3,
            Self::Rgbw | Self::Grbw => 4,
        }
    }

    /// Lays out a pixel's channel bytes in wire order.
    ///
    /// Returns a four-byte buffer and the number of valid bytes; the
    /// white channel of four-channel orders is always zero.
    #[must_use]
    pub const fn channels(self, color: RgbColor) -> ([u8; 4], usize) {
        let (r, g, b) = (color.red(), color.green(), color.blue());
        match self {
            Self::Rgb => ([r, g, b, 0], 3),
            Self::Grb => ([g, r, b, 0], 3),
            Self::Rgbw => ([r, g, b, 0], 4),
            Self::Grbw => ([g, r, b, 0], 4),
        }
    }
}

impl FromStr for ChannelOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "RGB" => Ok(Self::Rgb),
            "GRB" => Ok(Self::Grb),
            "RGBW" => Ok(Self::Rgbw),
            "GRBW" => Ok(Self::Grbw),
            _ => Err(ConfigError::InvalidChannelOrder(s.to_string())),
        }
    }
}
