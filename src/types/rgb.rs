// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color type and the HSB conversion.

use std::fmt;

use super::HsbColor;

/// RGB color with 8-bit channels (0-255).
///
/// This is the form that reaches the strip. Commands arrive as HSB and
/// are converted once, on receipt.
///
/// # Examples
///
/// ```
/// use stripd::types::{HsbColor, RgbColor};
///
/// let red = HsbColor::new(0, 100, 100).unwrap().to_rgb();
/// assert_eq!(red, RgbColor::new(255, 0, 0));
/// assert!(!red.is_black());
/// assert!(RgbColor::BLACK.is_black());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// All channels zero. The strip shows nothing; status reporting
    /// reads this as power-off.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns `true` if all channels are zero.
    #[must_use]
    pub const fn is_black(&self) -> bool {
        self.red == 0 && self.green == 0 && self.blue == 0
    }

    /// Creates an RGB color from an HSB color.
    ///
    /// Standard HSV to RGB conversion with each channel rounded to the
    /// nearest integer in 0-255.
    #[must_use]
    pub fn from_hsb(hsb: HsbColor) -> Self {
        let (r, g, b) = hsb_to_rgb(hsb.hue(), hsb.saturation(), hsb.brightness());
        Self::new(r, g, b)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

/// Standard HSV to RGB conversion.
///
/// The hue picks one of six 60-degree sectors of the color wheel; the
/// position inside the sector blends the in-between channel from the
/// channel floor up to the full value, while the other two channels
/// sit at the value and the floor. Channels round to the nearest 8-bit
/// step.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn hsb_to_rgb(hue: u16, saturation: u8, brightness: u8) -> (u8, u8, u8) {
    let value = f32::from(brightness) / 100.0;
    let saturation = f32::from(saturation) / 100.0;

    let sector = f32::from(hue) / 60.0;
    let fraction = sector.fract();

    let floor = value * (1.0 - saturation);
    let falling = value * (1.0 - saturation * fraction);
    let rising = value * (1.0 - saturation * (1.0 - fraction));

    // hue 360 lands in sector 6, which wraps back onto red
    let (red, green, blue) = match sector as u8 % 6 {
        0 => (value, rising, floor),
        1 => (falling, value, floor),
        2 => (floor, value, rising),
        3 => (floor, falling, value),
        4 => (rising, floor, value),
        _ => (value, floor, falling),
    };

    let scale = |channel: f32| (channel * 255.0).round() as u8;
    (scale(red), scale(green), scale(blue))
}
