// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state vocabulary.

use std::fmt;

/// Power state of the strip as spoken on the wire.
///
/// The `POWER` command topic is lenient by contract: the payload `ON`
/// switches on and anything else switches off, so
/// [`from_payload`](Self::from_payload) cannot fail.
///
/// # Examples
///
/// ```
/// use stripd::types::PowerState;
///
/// assert_eq!(PowerState::from_payload("ON"), PowerState::On);
/// assert_eq!(PowerState::from_payload("OFF"), PowerState::Off);
/// assert_eq!(PowerState::from_payload("banana"), PowerState::Off);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerState {
    /// Power is off.
    Off,
    /// Power is on.
    On,
}

impl PowerState {
    /// Returns the wire string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }

    /// Interprets a `POWER` command payload.
    ///
    /// `ON` means on; any other payload, including `OFF`, means off.
    #[must_use]
    pub fn from_payload(payload: &str) -> Self {
        if payload == "ON" { Self::On } else { Self::Off }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str() {
        assert_eq!(PowerState::On.as_str(), "ON");
        assert_eq!(PowerState::Off.as_str(), "OFF");
    }

    #[test]
    fn from_payload_is_lenient() {
        assert_eq!(PowerState::from_payload("ON"), PowerState::On);
        assert_eq!(PowerState::from_payload("OFF"), PowerState::Off);
        assert_eq!(PowerState::from_payload("on"), PowerState::Off);
        assert_eq!(PowerState::from_payload(""), PowerState::Off);
        assert_eq!(PowerState::from_payload("TOGGLE"), PowerState::Off);
    }

    #[test]
    fn from_bool() {
        assert_eq!(PowerState::from(true), PowerState::On);
        assert_eq!(PowerState::from(false), PowerState::Off);
    }
}
