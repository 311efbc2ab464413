// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end command dispatch semantics over an in-memory strip.
//!
//! No broker and no hardware: messages are fed straight into the
//! controller and observed through the strip's flushed frames and a
//! recording publisher.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use stripd::controller::Controller;
use stripd::device::{MemoryStrip, SharedStrip, shared};
use stripd::error::ConnectionError;
use stripd::protocol::{DeviceTopics, MessagePublisher, StatusPublisher};
use stripd::types::{DeviceId, RgbColor};
use tokio::time::sleep;

const PIXELS: usize = 8;

const POWER: &str = "cmnd/strip_test/POWER";
const HSB: &str = "cmnd/strip_test/HSBColor";
const EFFECT: &str = "cmnd/strip_test/effects/rainbow/set";

const STAT_EFFECT: &str = "stat/strip_test/effects/rainbow";
const STAT_POWER: &str = "stat/strip_test/POWER";
const STAT_AVAILABILITY: &str = "stat/strip_test/STATUS";

#[derive(Debug, Clone, Default)]
struct RecordingPublisher {
    messages: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingPublisher {
    fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

impl MessagePublisher for RecordingPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), ConnectionError> {
        self.messages
            .lock()
            .unwrap()
            .push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}

fn controller() -> (
    SharedStrip<MemoryStrip>,
    RecordingPublisher,
    Controller<MemoryStrip, RecordingPublisher>,
) {
    let strip = shared(MemoryStrip::new(PIXELS));
    let publisher = RecordingPublisher::default();
    let topics = DeviceTopics::new(&DeviceId::new("strip_test").unwrap());
    let status = StatusPublisher::new(publisher.clone(), &topics);
    let controller = Controller::new(Arc::clone(&strip), status, topics);
    (strip, publisher, controller)
}

fn last_on(messages: &[(String, String)], topic: &str) -> Option<String> {
    messages
        .iter()
        .rev()
        .find(|(t, _)| t == topic)
        .map(|(_, p)| p.clone())
}

#[tokio::test]
async fn hsb_color_lights_the_strip() {
    let (strip, publisher, mut controller) = controller();

    controller.handle_message(HSB, b"0,100,100").await;

    let red = RgbColor::new(255, 0, 0);
    assert_eq!(controller.state().color(), red);
    {
        let strip = strip.lock().await;
        assert!(strip.flushed().pixels().iter().all(|p| *p == red));
    }
    let messages = publisher.messages();
    assert_eq!(last_on(&messages, STAT_POWER).as_deref(), Some("ON"));
    assert_eq!(last_on(&messages, STAT_EFFECT).as_deref(), Some("OFF"));
}

#[tokio::test]
async fn hsb_then_power_on_reports_on() {
    let (strip, publisher, mut controller) = controller();

    controller.handle_message(HSB, b"0,100,100").await;
    controller.handle_message(POWER, b"ON").await;

    assert_eq!(
        last_on(&publisher.messages(), STAT_POWER).as_deref(),
        Some("ON")
    );
    let red = RgbColor::new(255, 0, 0);
    assert!(strip.lock().await.flushed().pixels().iter().all(|p| *p == red));
}

#[tokio::test]
async fn black_hsb_then_power_on_reports_off() {
    let (strip, publisher, mut controller) = controller();

    controller.handle_message(HSB, b"0,0,0").await;
    controller.handle_message(POWER, b"ON").await;

    assert_eq!(
        last_on(&publisher.messages(), STAT_POWER).as_deref(),
        Some("OFF")
    );
    assert!(strip.lock().await.flushed().is_dark());
}

#[tokio::test]
async fn power_off_always_darkens() {
    let (strip, publisher, mut controller) = controller();

    // static color first
    controller.handle_message(HSB, b"120,100,100").await;
    controller.handle_message(POWER, b"OFF").await;
    assert!(strip.lock().await.flushed().is_dark());

    // then with the effect running
    controller.handle_message(EFFECT, b"ON").await;
    sleep(Duration::from_millis(30)).await;
    controller.handle_message(POWER, b"OFF").await;

    assert!(!controller.effect_running());
    assert!(strip.lock().await.flushed().is_dark());
    assert_eq!(
        last_on(&publisher.messages(), STAT_POWER).as_deref(),
        Some("OFF")
    );

    // the stored color survives for a later POWER ON
    controller.handle_message(POWER, b"ON").await;
    let green = RgbColor::new(0, 255, 0);
    assert!(strip.lock().await.flushed().pixels().iter().all(|p| *p == green));
}

#[tokio::test]
async fn unrecognized_power_payload_means_off() {
    let (strip, publisher, mut controller) = controller();

    controller.handle_message(HSB, b"240,100,100").await;
    controller.handle_message(POWER, b"TOGGLE").await;

    assert!(strip.lock().await.flushed().is_dark());
    assert_eq!(
        last_on(&publisher.messages(), STAT_POWER).as_deref(),
        Some("OFF")
    );
}

#[tokio::test]
async fn effect_on_twice_keeps_a_single_worker() {
    let (strip, _publisher, mut controller) = controller();

    controller.handle_message(EFFECT, b"ON").await;
    controller.handle_message(EFFECT, b"ON").await;
    assert!(controller.effect_running());

    sleep(Duration::from_millis(30)).await;
    controller.handle_message(EFFECT, b"OFF").await;
    assert!(!controller.effect_running());

    // a second worker would keep flushing after the stop
    let quiesced = strip.lock().await.flush_count();
    sleep(Duration::from_millis(30)).await;
    assert_eq!(strip.lock().await.flush_count(), quiesced);
}

#[tokio::test]
async fn effect_off_while_idle_is_harmless() {
    let (strip, publisher, mut controller) = controller();

    controller.handle_message(EFFECT, b"OFF").await;

    assert!(!controller.effect_running());
    assert!(strip.lock().await.flushed().is_dark());
    assert_eq!(
        last_on(&publisher.messages(), STAT_EFFECT).as_deref(),
        Some("OFF")
    );
}

#[tokio::test]
async fn effect_on_reports_power_off_before_effect_on() {
    let (_strip, publisher, mut controller) = controller();

    controller.handle_message(EFFECT, b"ON").await;

    let messages = publisher.messages();
    let power_off = messages
        .iter()
        .position(|(t, p)| t == STAT_POWER && p == "OFF");
    let effect_on = messages
        .iter()
        .position(|(t, p)| t == STAT_EFFECT && p == "ON");
    assert!(power_off.is_some());
    assert!(effect_on.is_some());
    assert!(power_off < effect_on);
}

#[tokio::test]
async fn effect_replaces_static_color_on_the_device_only() {
    let (_strip, _publisher, mut controller) = controller();

    controller.handle_message(HSB, b"0,100,100").await;
    controller.handle_message(EFFECT, b"ON").await;

    // the stored color is untouched while the animation owns the strip
    assert_eq!(controller.state().color(), RgbColor::new(255, 0, 0));
    assert!(controller.state().effect_active());
    assert!(controller.effect_running());
}

#[tokio::test]
async fn unknown_effect_switch_is_dropped() {
    let (strip, publisher, mut controller) = controller();

    controller.handle_message(EFFECT, b"BANANA").await;

    assert!(!controller.effect_running());
    assert!(publisher.messages().is_empty());
    assert_eq!(strip.lock().await.flush_count(), 0);
}

#[tokio::test]
async fn unknown_topic_mutates_nothing() {
    let (strip, publisher, mut controller) = controller();

    controller.handle_message("cmnd/strip_test/Foo", b"ON").await;
    controller.handle_message("cmnd/other_device/POWER", b"ON").await;

    assert_eq!(controller.state().color(), RgbColor::BLACK);
    assert!(publisher.messages().is_empty());
    assert_eq!(strip.lock().await.flush_count(), 0);
}

#[tokio::test]
async fn malformed_hsb_is_dropped() {
    let (strip, publisher, mut controller) = controller();

    controller.handle_message(HSB, b"red,100,100").await;
    controller.handle_message(HSB, b"1,2").await;
    controller.handle_message(HSB, b"400,100,100").await;
    controller.handle_message(HSB, b"\xff\xfe\xfd").await;

    assert_eq!(controller.state().color(), RgbColor::BLACK);
    assert!(publisher.messages().is_empty());
    assert_eq!(strip.lock().await.flush_count(), 0);
}

#[tokio::test]
async fn announce_reports_online() {
    let (_strip, publisher, controller) = controller();

    controller.announce().await;

    assert_eq!(
        publisher.messages(),
        vec![(STAT_AVAILABILITY.to_string(), "Online".to_string())]
    );
}

#[tokio::test]
async fn shutdown_while_effect_runs() {
    let (strip, publisher, mut controller) = controller();

    controller.handle_message(HSB, b"0,100,100").await;
    controller.handle_message(EFFECT, b"ON").await;
    sleep(Duration::from_millis(30)).await;

    controller.shutdown().await;

    assert!(!controller.effect_running());
    assert!(strip.lock().await.flushed().is_dark());
    assert_eq!(controller.state().color(), RgbColor::BLACK);

    // final statuses in order, Offline exactly once and last
    let messages = publisher.messages();
    let tail: Vec<(&str, &str)> = messages
        .iter()
        .rev()
        .take(3)
        .map(|(t, p)| (t.as_str(), p.as_str()))
        .collect();
    assert_eq!(
        tail,
        vec![
            (STAT_AVAILABILITY, "Offline"),
            (STAT_POWER, "OFF"),
            (STAT_EFFECT, "OFF"),
        ]
    );
    let offline_count = messages
        .iter()
        .filter(|(t, p)| t == STAT_AVAILABILITY && p == "Offline")
        .count();
    assert_eq!(offline_count, 1);
}
