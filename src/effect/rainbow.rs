// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rainbow frame generation.
//!
//! Pure functions; the worker in [`super`] turns them into an animation.

use crate::device::Frame;
use crate::types::RgbColor;

/// Number of hue-wheel positions one cycle walks through.
pub(super) const WHEEL_POSITIONS: u8 = 255;

/// Maps a wheel position to a color.
///
/// The colors are a transition red -> green -> blue -> back to red,
/// in three linear segments: 0-84, 85-169, 170-255.
#[must_use]
pub fn wheel(pos: u8) -> RgbColor {
    let pos = u16::from(pos);
    #[allow(clippy::cast_possible_truncation)]
    let (r, g, b) = if pos < 85 {
        (pos * 3, 255 - pos * 3, 0)
    } else if pos < 170 {
        let pos = pos - 85;
        (255 - pos * 3, 0, pos * 3)
    } else {
        let pos = pos - 170;
        (0, pos * 3, 255 - pos * 3)
    };
    #[allow(clippy::cast_possible_truncation)]
    RgbColor::new(r as u8, g as u8, b as u8)
}

/// Builds one rainbow frame for hue-wheel position `j`.
///
/// Pixel `i` of `len` takes the wheel color at
/// `(i * 256 / len + j) mod 256`, spreading one full wheel revolution
/// across the strip and rotating it by `j`.
#[must_use]
pub fn frame(len: usize, j: u8) -> Frame {
    let mut frame = Frame::new(len);
    for i in 0..len {
        let index = (i * 256 / len + usize::from(j)) % 256;
        #[allow(clippy::cast_possible_truncation)]
        frame.set(i, wheel(index as u8));
    }
    frame
}
