// SPDX-FileCopyrightText: The deckmap authors
// SPDX-License-Identifier: MPL-2.0

//! Fake host runtime for tests.

use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};

use crate::engine::{Engine, MidiOutput, TimerHandle};

#[derive(Debug, Default)]
pub(crate) struct FakeEngine {
    parameters: HashMap<(String, String), f64>,
    values: HashMap<(String, String), f64>,
    settings: HashMap<String, i64>,
    scratching: HashSet<u8>,
    next_timer: u64,
    pub(crate) scheduled: Vec<(TimerHandle, Duration)>,
    pub(crate) cancelled: Vec<TimerHandle>,
    pub(crate) parameter_log: Vec<(String, String, f64)>,
    pub(crate) value_log: Vec<(String, String, f64)>,
}

impl FakeEngine {
    /// Engine with the settings the VCI-400 mapping expects.
    pub(crate) fn with_default_settings() -> Self {
        let mut engine = Self::default();
        engine.put_setting("channelA", 1);
        engine.put_setting("channelB", 2);
        engine.put_setting("channelC", 3);
        engine.put_setting("channelD", 4);
        engine.put_setting("leftFX", 1);
        engine.put_setting("rightFX", 2);
        engine
    }

    pub(crate) fn put_setting(&mut self, name: &str, value: i64) {
        self.settings.insert(name.to_owned(), value);
    }

    pub(crate) fn put_parameter(&mut self, group: &str, key: &str, value: f64) {
        self.parameters
            .insert((group.to_owned(), key.to_owned()), value);
    }

    pub(crate) fn put_value(&mut self, group: &str, key: &str, value: f64) {
        self.values.insert((group.to_owned(), key.to_owned()), value);
    }

    pub(crate) fn set_scratching(&mut self, deck: u8, scratching: bool) {
        if scratching {
            self.scratching.insert(deck);
        } else {
            self.scratching.remove(&deck);
        }
    }

    pub(crate) fn parameter(&self, group: &str, key: &str) -> f64 {
        self.get_parameter(group, key)
    }

    pub(crate) fn value(&self, group: &str, key: &str) -> f64 {
        self.get_value(group, key)
    }

    pub(crate) fn last_scheduled(&self) -> Option<TimerHandle> {
        self.scheduled.last().map(|(timer, _)| *timer)
    }
}

impl Engine for FakeEngine {
    fn get_parameter(&self, group: &str, key: &str) -> f64 {
        self.parameters
            .get(&(group.to_owned(), key.to_owned()))
            .copied()
            .unwrap_or_default()
    }

    fn set_parameter(&mut self, group: &str, key: &str, value: f64) {
        self.parameters
            .insert((group.to_owned(), key.to_owned()), value);
        self.parameter_log
            .push((group.to_owned(), key.to_owned(), value));
    }

    fn get_value(&self, group: &str, key: &str) -> f64 {
        self.values
            .get(&(group.to_owned(), key.to_owned()))
            .copied()
            .unwrap_or_default()
    }

    fn set_value(&mut self, group: &str, key: &str, value: f64) {
        self.values.insert((group.to_owned(), key.to_owned()), value);
        self.value_log
            .push((group.to_owned(), key.to_owned(), value));
    }

    fn is_scratching(&self, deck: u8) -> bool {
        self.scratching.contains(&deck)
    }

    fn get_setting(&self, name: &str) -> Option<i64> {
        self.settings.get(name).copied()
    }

    fn schedule_once(&mut self, delay: Duration) -> TimerHandle {
        self.next_timer += 1;
        let timer = TimerHandle::new(self.next_timer);
        self.scheduled.push((timer, delay));
        timer
    }

    fn cancel_timer(&mut self, timer: TimerHandle) {
        self.cancelled.push(timer);
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeOutput {
    pub(crate) messages: Vec<[u8; 3]>,
}

impl MidiOutput for FakeOutput {
    fn send_message(&mut self, status: u8, data1: u8, data2: u8) {
        self.messages.push([status, data1, data2]);
    }
}
