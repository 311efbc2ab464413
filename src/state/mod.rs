// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Strip state tracking.

use crate::types::RgbColor;

/// In-memory record of what the strip is showing.
///
/// Created once at startup (black, no effect) and mutated only by the
/// controller, which runs on a single dispatch task, so no locking is
/// needed. Power is not stored: it is derived from the color, which
/// keeps the reported power status and the stored color from ever
/// drifting apart.
///
/// The strip shows either the animation or the static color, never
/// both; the controller flips `effect_active` only around effect
/// worker start/stop.
///
/// # Examples
///
/// ```
/// use stripd::state::StripState;
/// use stripd::types::RgbColor;
///
/// let mut state = StripState::new();
/// assert!(!state.is_effectively_on());
///
/// state.set_color(RgbColor::new(255, 0, 0));
/// assert!(state.is_effectively_on());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StripState {
    color: RgbColor,
    effect_active: bool,
}

impl StripState {
    /// Creates the startup state: black, no effect.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored static color.
    #[must_use]
    pub fn color(&self) -> RgbColor {
        self.color
    }

    /// Stores a new static color.
    ///
    /// The color survives `POWER OFF`, so a later `POWER ON` restores
    /// it.
    pub fn set_color(&mut self, color: RgbColor) {
        self.color = color;
    }

    /// Returns `true` while the animation worker owns the strip.
    #[must_use]
    pub fn effect_active(&self) -> bool {
        self.effect_active
    }

    /// Records whether the animation worker is running.
    pub fn set_effect_active(&mut self, active: bool) {
        self.effect_active = active;
    }

    /// Returns `true` iff the stored color is not black.
    ///
    /// This is the power status reported to the broker: an all-zero
    /// color is indistinguishable from off.
    #[must_use]
    pub fn is_effectively_on(&self) -> bool {
        !self.color.is_black()
    }
}
