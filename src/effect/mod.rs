// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Animation effects.
//!
//! [`EffectRunner`] owns at most one concurrent worker that writes
//! rainbow frames to the strip. The start/stop contract is the heart
//! of the controller's mutual-exclusion guarantee: both calls tear the
//! previous worker down completely before anything else touches the
//! device, and every stop path ends with a full black overwrite so a
//! forcefully aborted worker can never leave a partial frame visible.

pub mod rainbow;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::device::{SharedStrip, Strip};
use crate::error::DeviceError;

/// Pause between animation frames.
const FRAME_INTERVAL: Duration = Duration::from_millis(10);

/// Owner of the single animation worker.
///
/// `Idle` when no worker handle is held, `Running` otherwise. Both
/// `start` and `stop` are awaited by the dispatch path, so the
/// dispatch task never races the worker for the strip.
#[derive(Debug)]
pub struct EffectRunner<S: Strip> {
    strip: SharedStrip<S>,
    frame_interval: Duration,
    worker: Option<JoinHandle<()>>,
}

impl<S: Strip> EffectRunner<S> {
    /// Creates an idle runner for the given strip.
    #[must_use]
    pub fn new(strip: SharedStrip<S>) -> Self {
        Self::with_interval(strip, FRAME_INTERVAL)
    }

    /// Creates an idle runner with a custom frame interval.
    #[must_use]
    pub fn with_interval(strip: SharedStrip<S>, frame_interval: Duration) -> Self {
        Self {
            strip,
            frame_interval,
            worker: None,
        }
    }

    /// Returns `true` while a worker is live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    /// Starts the rainbow animation.
    ///
    /// Idempotent: any existing worker is terminated and joined first,
    /// the device is reset to a clean slate, and a fresh worker is
    /// launched. There is never more than one worker.
    ///
    /// # Errors
    ///
    /// Returns error if the clean-slate write fails; no worker is
    /// launched in that case.
    pub async fn start(&mut self) -> Result<(), DeviceError> {
        self.terminate().await;
        self.strip.lock().await.blank()?;

        let strip = Arc::clone(&self.strip);
        let interval = self.frame_interval;
        self.worker = Some(tokio::spawn(animate(strip, interval)));
        Ok(())
    }

    /// Stops the animation and darkens the strip.
    ///
    /// The worker is terminated forcefully (no cooperative flag to
    /// poll) and joined, then the entire buffer is overwritten with
    /// black and flushed before this returns. A no-op when idle.
    ///
    /// # Errors
    ///
    /// Returns error if the final overwrite fails; the worker is gone
    /// regardless.
    pub async fn stop(&mut self) -> Result<(), DeviceError> {
        if self.worker.is_none() {
            return Ok(());
        }
        self.terminate().await;
        self.strip.lock().await.blank()
    }

    /// Aborts and joins the worker, if any.
    async fn terminate(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.abort();
            // A JoinError from the abort is the expected outcome.
            let _ = worker.await;
        }
    }
}

/// The worker loop: write a frame, flush, wait, advance the wheel.
///
/// Runs until aborted. The strip lock is held only across one frame
/// write, never across the sleep, so an abort can only land while the
/// lock is free and the dispatch path's subsequent overwrite is always
/// able to proceed.
async fn animate<S: Strip>(strip: SharedStrip<S>, interval: Duration) {
    let mut j: u8 = 0;
    loop {
        let written = {
            let mut strip = strip.lock().await;
            let frame = rainbow::frame(strip.len(), j);
            strip.write_frame(&frame).and_then(|()| strip.flush())
        };
        if let Err(error) = written {
            tracing::error!(%error, "effect worker could not write frame, giving up");
            return;
        }

        tokio::time::sleep(interval).await;
        j = (j + 1) % rainbow::WHEEL_POSITIONS;
    }
}
