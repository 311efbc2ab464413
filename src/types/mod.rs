// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for strip control.
//!
//! Each type ensures values are within their valid ranges at
//! construction time, so the dispatch path never sees an out-of-range
//! hue or an empty device identity.
//!
//! # Types
//!
//! - [`DeviceId`] - Immutable device identity used in every topic name
//! - [`PowerState`] - ON/OFF wire vocabulary
//! - [`HsbColor`] - HSB color (Hue 0-360, Saturation 0-100, Brightness 0-100)
//! - [`RgbColor`] - 8-bit RGB triple written to the strip

mod device_id;
mod hsb;
mod power;
mod rgb;

pub use device_id::DeviceId;
pub use hsb::HsbColor;
pub use power::PowerState;
pub use rgb::RgbColor;
