// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identity.

use std::fmt;

use crate::error::ValueError;

/// Immutable identifier for this device.
///
/// The identity is set once at startup and is used to build every
/// command and status topic (`cmnd/{id}/…`, `stat/{id}/…`).
///
/// # Examples
///
/// ```
/// use stripd::types::DeviceId;
///
/// let id = DeviceId::new("livingroom_strip").unwrap();
/// assert_eq!(id.as_str(), "livingroom_strip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates a new device identity.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::EmptyDeviceId` if the string is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValueError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValueError::EmptyDeviceId);
        }
        Ok(Self(id))
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_id() {
        let id = DeviceId::new("rpi4_debug").unwrap();
        assert_eq!(id.as_str(), "rpi4_debug");
        assert_eq!(id.to_string(), "rpi4_debug");
    }

    #[test]
    fn empty_id_rejected() {
        assert!(matches!(DeviceId::new(""), Err(ValueError::EmptyDeviceId)));
    }
}
