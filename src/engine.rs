// SPDX-FileCopyrightText: The deckmap authors
// SPDX-License-Identifier: MPL-2.0

//! Interfaces provided by the host runtime.

use std::time::Duration;

use derive_more::Display;

/// Opaque handle for a one-shot timer scheduled on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub struct TimerHandle(u64);

impl TimerHandle {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Logical control surface of the host mixing engine.
///
/// Groups and parameter keys are plain strings in the engine's own
/// vocabulary, e.g. group `"[Channel1]"` with key `"play"`.
///
/// All callbacks into the mapping run on a single dispatch thread and
/// run to completion, so implementations never need to synchronize
/// against concurrent calls.
pub trait Engine {
    /// Read a parameter, normalized to [0, 1].
    fn get_parameter(&self, group: &str, key: &str) -> f64;

    /// Write a parameter, normalized to [0, 1].
    fn set_parameter(&mut self, group: &str, key: &str, value: f64);

    /// Read a value in the engine's native range.
    fn get_value(&self, group: &str, key: &str) -> f64;

    /// Write a value in the engine's native range.
    fn set_value(&mut self, group: &str, key: &str, value: f64);

    /// Whether the given deck is currently in manual scratch mode.
    fn is_scratching(&self, deck: u8) -> bool;

    /// Read a configured integer setting, e.g. the engine channel
    /// number assigned to a physical deck letter.
    fn get_setting(&self, name: &str) -> Option<i64>;

    /// Schedule a one-shot timer. The host delivers expiry through
    /// [`Controller::on_timer`](crate::Controller::on_timer) on the
    /// same dispatch context.
    fn schedule_once(&mut self, delay: Duration) -> TimerHandle;

    /// Cancel a pending timer. Cancelling an already expired timer
    /// is a no-op.
    fn cancel_timer(&mut self, timer: TimerHandle);
}

/// Outbound MIDI messages, used for LED feedback and for the
/// shift-button hardware echo.
pub trait MidiOutput {
    fn send_message(&mut self, status: u8, data1: u8, data2: u8);
}
