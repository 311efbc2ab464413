// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WS281x strip driven over SPI.
//!
//! Encodes each LED data bit as three SPI bits (`100` for 0, `110` for
//! 1) and clocks them out at 2.4 MHz, which reproduces the 800 kHz
//! WS281x waveform closely enough for the strip's sampling window. The
//! frame ends with a >50 us low tail so the strip latches.

use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

use crate::error::DeviceError;
use crate::types::RgbColor;

use super::{ChannelOrder, Frame, Strip};

/// SPI clock producing 3 encoded bits per 800 kHz LED bit.
const CLOCK_HZ: u32 = 2_400_000;

/// Zero bytes appended after the frame; 24 bytes at 2.4 MHz is 80 us,
/// comfortably past the WS281x 50 us reset threshold.
const LATCH_BYTES: usize = 24;

/// Strip backend writing WS281x frames through the Raspberry Pi SPI
/// peripheral (MOSI pin, `/dev/spidev0.0`).
#[derive(Debug)]
pub struct SpiStrip {
    spi: Spi,
    len: usize,
    order: ChannelOrder,
    tx: Vec<u8>,
}

impl SpiStrip {
    /// Opens the SPI bus and prepares a transmit buffer for `len`
    /// pixels in the given channel order.
    ///
    /// # Errors
    ///
    /// Returns error if the SPI device cannot be opened.
    pub fn new(len: usize, order: ChannelOrder) -> Result<Self, DeviceError> {
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, CLOCK_HZ, Mode::Mode0)?;
        let capacity = len * order.bytes_per_pixel() * 3 + LATCH_BYTES;
        Ok(Self {
            spi,
            len,
            order,
            tx: vec![0; capacity],
        })
    }
}

impl Strip for SpiStrip {
    fn len(&self) -> usize {
        self.len
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<(), DeviceError> {
        if frame.len() != self.len {
            return Err(DeviceError::FrameSize {
                got: frame.len(),
                expected: self.len,
            });
        }

        self.tx.clear();
        for pixel in frame.pixels() {
            let (bytes, count) = self.order.channels(*pixel);
            for byte in &bytes[..count] {
                self.tx.extend_from_slice(&encode_byte(*byte));
            }
        }
        self.tx.extend(std::iter::repeat_n(0u8, LATCH_BYTES));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DeviceError> {
        self.spi.write(&self.tx)?;
        Ok(())
    }
}

/// Expands one LED data byte into its 24-bit SPI representation.
fn encode_byte(value: u8) -> [u8; 3] {
    let mut bits: u32 = 0;
    for i in 0..8 {
        bits <<= 3;
        bits |= if value & (0x80 >> i) == 0 { 0b100 } else { 0b110 };
    }
    #[allow(clippy::cast_possible_truncation)]
    [(bits >> 16) as u8, (bits >> 8) as u8, bits as u8]
}
