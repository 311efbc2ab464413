// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HSB color parsing and validation.

use std::fmt;
use std::str::FromStr;

use crate::error::{CommandError, ValueError};

use super::RgbColor;

/// HSB color representation (Hue, Saturation, Brightness).
///
/// This is the wire format of the `HSBColor` command: three
/// comma-separated decimal integers, hue in degrees and the other two
/// as percentages.
///
/// # Examples
///
/// ```
/// use stripd::types::HsbColor;
///
/// let red: HsbColor = "0,100,100".parse().unwrap();
/// assert_eq!(red.hue(), 0);
/// assert_eq!(red.saturation(), 100);
/// assert_eq!(red.brightness(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HsbColor {
    hue: u16,
    saturation: u8,
    brightness: u8,
}

impl HsbColor {
    /// Maximum hue value (inclusive, 360 wraps back to red).
    pub const MAX_HUE: u16 = 360;

    /// Maximum saturation value.
    pub const MAX_SATURATION: u8 = 100;

    /// Maximum brightness value.
    pub const MAX_BRIGHTNESS: u8 = 100;

    /// Validates and builds an HSB color from its three components.
    ///
    /// Hue is in degrees (0 and 360 both mean red); saturation and
    /// brightness are percentages.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] naming the first component outside its
    /// range.
    pub fn new(hue: u16, saturation: u8, brightness: u8) -> Result<Self, ValueError> {
        match (hue, saturation, brightness) {
            (h, _, _) if h > Self::MAX_HUE => Err(ValueError::InvalidHue(h)),
            (_, s, _) if s > Self::MAX_SATURATION => Err(ValueError::InvalidSaturation(s)),
            (_, _, b) if b > Self::MAX_BRIGHTNESS => Err(ValueError::InvalidBrightness(b)),
            _ => Ok(Self {
                hue,
                saturation,
                brightness,
            }),
        }
    }

    /// Returns the hue value (0-360).
    #[must_use]
    pub const fn hue(&self) -> u16 {
        self.hue
    }

    /// Returns the saturation value (0-100).
    #[must_use]
    pub const fn saturation(&self) -> u8 {
        self.saturation
    }

    /// Returns the brightness value (0-100).
    #[must_use]
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Converts to the RGB triple written to the strip.
    #[must_use]
    pub fn to_rgb(self) -> RgbColor {
        RgbColor::from_hsb(self)
    }
}

impl fmt::Display for HsbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.hue, self.saturation, self.brightness)
    }
}

impl FromStr for HsbColor {
    type Err = CommandError;

    /// Parses the `"H,S,B"` wire payload.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').collect();
        let [h, sat, bri] = fields.as_slice() else {
            return Err(CommandError::MalformedHsb(s.to_string()));
        };

        let hue = parse_field(h)?;
        let saturation = parse_field(sat)?;
        let brightness = parse_field(bri)?;

        if saturation > u16::from(u8::MAX) {
            return Err(ValueError::InvalidSaturation(u8::MAX).into());
        }
        if brightness > u16::from(u8::MAX) {
            return Err(ValueError::InvalidBrightness(u8::MAX).into());
        }

        #[allow(clippy::cast_possible_truncation)]
        let color = Self::new(hue, saturation as u8, brightness as u8)?;
        Ok(color)
    }
}

fn parse_field(field: &str) -> Result<u16, CommandError> {
    field
        .trim()
        .parse::<u16>()
        .map_err(|_| CommandError::NonNumericHsb(field.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_values() {
        let color = HsbColor::new(180, 50, 75).unwrap();
        assert_eq!(color.hue(), 180);
        assert_eq!(color.saturation(), 50);
        assert_eq!(color.brightness(), 75);
    }

    #[test]
    fn hue_361_rejected() {
        assert!(matches!(
            HsbColor::new(361, 50, 50),
            Err(ValueError::InvalidHue(361))
        ));
    }

    #[test]
    fn hue_360_accepted() {
        assert!(HsbColor::new(360, 100, 100).is_ok());
    }

    #[test]
    fn saturation_101_rejected() {
        assert!(matches!(
            HsbColor::new(180, 101, 50),
            Err(ValueError::InvalidSaturation(101))
        ));
    }

    #[test]
    fn brightness_101_rejected() {
        assert!(matches!(
            HsbColor::new(180, 50, 101),
            Err(ValueError::InvalidBrightness(101))
        ));
    }

    #[test]
    fn parse_payload() {
        let color: HsbColor = "120,100,50".parse().unwrap();
        assert_eq!(color.hue(), 120);
        assert_eq!(color.saturation(), 100);
        assert_eq!(color.brightness(), 50);
    }

    #[test]
    fn parse_tolerates_spaces() {
        let color: HsbColor = "120, 100, 50".parse().unwrap();
        assert_eq!(color.hue(), 120);
    }

    #[test]
    fn parse_wrong_field_count() {
        assert!(matches!(
            "120,100".parse::<HsbColor>(),
            Err(CommandError::MalformedHsb(_))
        ));
        assert!(matches!(
            "1,2,3,4".parse::<HsbColor>(),
            Err(CommandError::MalformedHsb(_))
        ));
        assert!(matches!(
            "".parse::<HsbColor>(),
            Err(CommandError::MalformedHsb(_))
        ));
    }

    #[test]
    fn parse_non_numeric() {
        assert!(matches!(
            "red,100,100".parse::<HsbColor>(),
            Err(CommandError::NonNumericHsb(_))
        ));
        assert!(matches!(
            "120,100,-5".parse::<HsbColor>(),
            Err(CommandError::NonNumericHsb(_))
        ));
    }

    #[test]
    fn parse_out_of_range() {
        assert!(matches!(
            "400,100,100".parse::<HsbColor>(),
            Err(CommandError::Value(ValueError::InvalidHue(400)))
        ));
        assert!("120,101,100".parse::<HsbColor>().is_err());
        assert!("120,100,999".parse::<HsbColor>().is_err());
    }

    #[test]
    fn display_roundtrip() {
        let color = HsbColor::new(240, 80, 60).unwrap();
        assert_eq!(color.to_string(), "240,80,60");
        assert_eq!(color.to_string().parse::<HsbColor>().unwrap(), color);
    }
}
