// SPDX-FileCopyrightText: The deckmap authors
// SPDX-License-Identifier: MPL-2.0

//! Control behaviors: decoding raw MIDI values into logical engine
//! operations and encoding engine state back into LED feedback.
//!
//! Each control carries one binding per shift layer. The active binding
//! is selected against the current [`ShiftLayer`] when an input event
//! is decoded, never mutated in place.

use std::{borrow::Cow, time::Duration};

use float_cmp::approx_eq;

use crate::{
    address::{MessageKind, MidiKey},
    engine::{Engine, TimerHandle},
    shift::ShiftLayer,
};

/// Raw encoder center value. Values on one side of the center denote
/// one rotation direction, values on the other side the opposite one.
pub const ENCODER_CENTER: u8 = 0x40;

/// Detent for the clockwise wrap-around sentinel (raw 0x01).
pub const ENCODER_CW: u8 = 0x01;

/// Detent for the counter-clockwise wrap-around sentinel (raw 0x7f).
pub const ENCODER_CCW: u8 = 0x7f;

pub const LED_ON: u8 = 0x7f;
pub const LED_OFF: u8 = 0x00;

/// Jog rotation scale while the engine reports an active scratch.
pub const JOG_SCRATCH_SCALE: f64 = 1.0;

/// Jog rotation scale for pitch bending outside of scratch mode.
pub const JOG_BEND_SCALE: f64 = 0.2;

pub const DEFAULT_LONG_PRESS_TIMEOUT: Duration = Duration::from_millis(275);

/// Target of a logical engine operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub group: Cow<'static, str>,
    pub key: Cow<'static, str>,
}

impl Binding {
    pub fn new(group: impl Into<Cow<'static, str>>, key: impl Into<Cow<'static, str>>) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
        }
    }
}

/// A pair of per-layer values selected by the current shift state.
///
/// `shifted: None` makes the control a no-op while shift is held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layered<T> {
    pub unshifted: T,
    pub shifted: Option<T>,
}

impl<T> Layered<T> {
    /// Identical behavior on both layers.
    pub fn uniform(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            shifted: Some(value.clone()),
            unshifted: value,
        }
    }

    /// Distinct behavior per layer.
    #[must_use]
    pub const fn split(unshifted: T, shifted: T) -> Self {
        Self {
            unshifted,
            shifted: Some(shifted),
        }
    }

    /// No-op while shift is held.
    #[must_use]
    pub const fn unshifted_only(unshifted: T) -> Self {
        Self {
            unshifted,
            shifted: None,
        }
    }

    #[must_use]
    pub const fn active(&self, layer: ShiftLayer) -> Option<&T> {
        match layer {
            ShiftLayer::Unshifted => Some(&self.unshifted),
            ShiftLayer::Shifted => self.shifted.as_ref(),
        }
    }
}

/// Discrete press/release decoded from a raw MIDI message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonInput {
    Pressed,
    Released,
}

impl ButtonInput {
    /// Note-off always releases. Note-on and CC messages use a
    /// threshold so velocity-0 note-ons release as well.
    #[must_use]
    pub const fn from_midi(kind: MessageKind, data2: u8) -> Self {
        match kind {
            MessageKind::NoteOff => Self::Released,
            MessageKind::NoteOn | MessageKind::ControlChange => {
                if data2 >= 0x40 {
                    Self::Pressed
                } else {
                    Self::Released
                }
            }
        }
    }
}

/// Long-press extension of a button: press arms a one-shot timer.
/// A release before expiry fires `short` exactly once; expiry fires
/// `long` exactly once and disarms. Never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongPress {
    pub short: Binding,
    pub long: Binding,
    pub timeout: Duration,
}

/// Per-layer button behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonBehavior {
    /// Engine value 1 on press, 0 on release.
    Push(Binding),
    /// Engine-tracked latch, flipped once per press.
    Toggle(Binding),
    /// Timer-disambiguated short/long press.
    LongPress(LongPress),
}

#[derive(Debug)]
pub struct Button {
    behavior: Layered<ButtonBehavior>,
    timer: Option<TimerHandle>,
}

impl Button {
    #[must_use]
    pub const fn new(behavior: Layered<ButtonBehavior>) -> Self {
        Self {
            behavior,
            timer: None,
        }
    }

    fn handle(&mut self, input: ButtonInput, layer: ShiftLayer, engine: &mut dyn Engine) {
        match input {
            ButtonInput::Pressed => match self.behavior.active(layer) {
                Some(ButtonBehavior::Push(target)) => {
                    engine.set_value(&target.group, &target.key, 1.0);
                }
                Some(ButtonBehavior::Toggle(target)) => {
                    let latched = engine.get_value(&target.group, &target.key) != 0.0;
                    engine.set_value(&target.group, &target.key, f64::from(!latched));
                }
                Some(ButtonBehavior::LongPress(long_press)) => {
                    // Arming implicitly supersedes a stale timer.
                    if let Some(stale) = self.timer.take() {
                        engine.cancel_timer(stale);
                    }
                    self.timer = Some(engine.schedule_once(long_press.timeout));
                }
                None => (),
            },
            ButtonInput::Released => {
                // Cancel a pending timer even if the layer changed
                // mid-press, so it can never fire after release.
                let pending = self.timer.take();
                if let Some(timer) = pending {
                    engine.cancel_timer(timer);
                }
                match self.behavior.active(layer) {
                    Some(ButtonBehavior::Push(target)) => {
                        engine.set_value(&target.group, &target.key, 0.0);
                    }
                    Some(ButtonBehavior::LongPress(long_press)) => {
                        if pending.is_some() {
                            let short = &long_press.short;
                            engine.set_value(&short.group, &short.key, 1.0);
                        }
                    }
                    Some(ButtonBehavior::Toggle(_)) | None => (),
                }
            }
        }
    }

    /// Returns `true` if the timer belonged to this button.
    fn on_timer(&mut self, timer: TimerHandle, layer: ShiftLayer, engine: &mut dyn Engine) -> bool {
        if self.timer != Some(timer) {
            return false;
        }
        self.timer = None;
        if let Some(ButtonBehavior::LongPress(long_press)) = self.behavior.active(layer) {
            let long = &long_press.long;
            engine.set_value(&long.group, &long.key, 1.0);
        }
        true
    }

    fn cancel_timer(&mut self, engine: &mut dyn Engine) {
        if let Some(timer) = self.timer.take() {
            engine.cancel_timer(timer);
        }
    }
}

/// Continuous 7-bit or split 14-bit value source of a [`Pot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PotValue {
    Single,
    /// The halves may arrive in any order; the most recent of each is
    /// buffered and the value recomputed on every update.
    HiRes {
        msb: Option<u8>,
        lsb: Option<u8>,
    },
}

#[derive(Debug)]
pub struct Pot {
    target: Binding,
    value: PotValue,
    last_sent: Option<f64>,
}

impl Pot {
    /// Single-message 7-bit pot or fader.
    #[must_use]
    pub const fn single(target: Binding) -> Self {
        Self {
            target,
            value: PotValue::Single,
            last_sent: None,
        }
    }

    /// Paired-message 14-bit pot or fader (MSB + LSB).
    #[must_use]
    pub const fn hi_res(target: Binding) -> Self {
        Self {
            target,
            value: PotValue::HiRes {
                msb: None,
                lsb: None,
            },
            last_sent: None,
        }
    }

    fn handle(&mut self, lane: InputLane, data2: u8, engine: &mut dyn Engine) {
        let normalized = match (&mut self.value, lane) {
            (PotValue::Single, InputLane::Primary) => f64::from(data2) / 127.0,
            (PotValue::HiRes { msb, lsb }, InputLane::Msb | InputLane::Lsb) => {
                if lane == InputLane::Msb {
                    *msb = Some(data2);
                } else {
                    *lsb = Some(data2);
                }
                let value = u16::from(msb.unwrap_or(0)) << 7 | u16::from(lsb.unwrap_or(0));
                f64::from(value) / 16383.0
            }
            _ => return,
        };
        let normalized = normalized.clamp(0.0, 1.0);
        if let Some(last_sent) = self.last_sent {
            if approx_eq!(f64, last_sent, normalized, ulps = 2) {
                return;
            }
        }
        self.last_sent = Some(normalized);
        engine.set_parameter(&self.target.group, &self.target.key, normalized);
    }
}

/// How an encoder detent is applied to its target parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EncoderResponse {
    /// Set the parameter to the signed detent itself, e.g. for
    /// list navigation.
    Select,
    /// Double the current parameter on a CW detent, halve it on a
    /// CCW detent, e.g. for beatjump/beatloop sizes.
    DoubleHalve,
    /// Add the signed detent times the step to the current parameter.
    Step(f64),
}

#[derive(Debug)]
pub struct Encoder {
    target: Layered<Binding>,
    response: EncoderResponse,
}

impl Encoder {
    #[must_use]
    pub const fn new(target: Layered<Binding>, response: EncoderResponse) -> Self {
        Self { target, response }
    }

    /// Signed detent decoded relative to the center value.
    ///
    /// The wrap-around sentinels 0x01 and 0x7f land on the CW/CCW side
    /// of the center respectively, independent of any prior state.
    #[must_use]
    pub const fn detent(raw: u8) -> i32 {
        if raw == ENCODER_CENTER {
            0
        } else if raw < ENCODER_CENTER {
            1
        } else {
            -1
        }
    }

    fn handle(&mut self, data2: u8, layer: ShiftLayer, engine: &mut dyn Engine) {
        let detent = Self::detent(data2);
        if detent == 0 {
            return;
        }
        let Some(target) = self.target.active(layer) else {
            return;
        };
        match self.response {
            EncoderResponse::Select => {
                engine.set_parameter(&target.group, &target.key, f64::from(detent));
            }
            EncoderResponse::DoubleHalve => {
                let current = engine.get_parameter(&target.group, &target.key);
                let updated = if detent > 0 { current * 2.0 } else { current / 2.0 };
                engine.set_parameter(&target.group, &target.key, updated);
            }
            EncoderResponse::Step(step) => {
                let current = engine.get_parameter(&target.group, &target.key);
                engine.set_parameter(&target.group, &target.key, current + f64::from(detent) * step);
            }
        }
    }
}

/// Button bound to an enumerated hotcue slot.
///
/// Press activates the slot, the LED mirrors whether the slot is
/// occupied. The press is a no-op while shift is held; the LED state
/// is independent of shift.
#[derive(Debug)]
pub struct HotcueButton {
    activate: Binding,
    number: u8,
}

impl HotcueButton {
    #[must_use]
    pub fn new(group: impl Into<Cow<'static, str>>, number: u8) -> Self {
        let group = group.into();
        let activate = Binding::new(group, format!("hotcue_{number}_activate"));
        Self { activate, number }
    }

    /// Engine key that reflects whether the slot is occupied.
    #[must_use]
    pub fn status_key(&self) -> String {
        format!("hotcue_{number}_status", number = self.number)
    }

    #[must_use]
    pub fn group(&self) -> &str {
        &self.activate.group
    }

    fn handle(&mut self, input: ButtonInput, layer: ShiftLayer, engine: &mut dyn Engine) {
        if layer == ShiftLayer::Shifted {
            return;
        }
        let value = match input {
            ButtonInput::Pressed => 1.0,
            ButtonInput::Released => 0.0,
        };
        engine.set_value(&self.activate.group, &self.activate.key, value);
    }
}

/// Touch-sensitive jog wheel.
///
/// Rotation is a continuous signal around the encoder center, scaled
/// by one of two discrete factors depending on whether the engine
/// reports an active manual scratch for the owning deck. The separate
/// touch signal drives scratch enable/disable.
#[derive(Debug)]
pub struct JogWheel {
    group: Cow<'static, str>,
    deck: u8,
    scratch_scale: f64,
    bend_scale: f64,
}

impl JogWheel {
    #[must_use]
    pub fn new(group: impl Into<Cow<'static, str>>, deck: u8) -> Self {
        Self {
            group: group.into(),
            deck,
            scratch_scale: JOG_SCRATCH_SCALE,
            bend_scale: JOG_BEND_SCALE,
        }
    }

    fn handle_wheel(&mut self, data2: u8, engine: &mut dyn Engine) {
        let delta = f64::from(data2) - f64::from(ENCODER_CENTER);
        if engine.is_scratching(self.deck) {
            engine.set_value(&self.group, "scratch2", delta * self.scratch_scale);
        } else {
            engine.set_value(&self.group, "jog", delta * self.bend_scale);
        }
    }

    fn handle_touch(&mut self, input: ButtonInput, engine: &mut dyn Engine) {
        let value = match input {
            ButtonInput::Pressed => 1.0,
            ButtonInput::Released => 0.0,
        };
        engine.set_value(&self.group, "scratch2_enable", value);
    }
}

/// Input lane of a multi-address control.
///
/// Pots with a hi-res split source listen on two addresses (`Msb`,
/// `Lsb`), jog wheels on a rotation address (`Primary`) plus a touch
/// address (`Touch`). Everything else listens on `Primary` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLane {
    Primary,
    Msb,
    Lsb,
    Touch,
}

/// LED feedback declaration: mirror the engine value at `source` on
/// the hardware address `led`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub source: Binding,
    pub led: MidiKey,
}

/// The behavior variants a control instance can take.
#[derive(Debug)]
pub enum ControlBehavior {
    Button(Button),
    Pot(Pot),
    Encoder(Encoder),
    Hotcue(HotcueButton),
    Jog(JogWheel),
}

/// A single logical control with optional LED feedback.
#[derive(Debug)]
pub struct Control {
    behavior: ControlBehavior,
    feedback: Option<Feedback>,
}

impl Control {
    #[must_use]
    pub const fn new(behavior: ControlBehavior) -> Self {
        Self {
            behavior,
            feedback: None,
        }
    }

    #[must_use]
    pub const fn with_feedback(behavior: ControlBehavior, feedback: Feedback) -> Self {
        Self {
            behavior,
            feedback: Some(feedback),
        }
    }

    #[must_use]
    pub const fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Decode a raw value on one of the control's input lanes.
    ///
    /// Message kinds that do not apply to the control are ignored.
    pub fn handle_midi(
        &mut self,
        lane: InputLane,
        kind: MessageKind,
        data2: u8,
        layer: ShiftLayer,
        engine: &mut dyn Engine,
    ) {
        match &mut self.behavior {
            ControlBehavior::Button(button) => {
                button.handle(ButtonInput::from_midi(kind, data2), layer, engine);
            }
            ControlBehavior::Pot(pot) => {
                if kind == MessageKind::ControlChange {
                    pot.handle(lane, data2, engine);
                }
            }
            ControlBehavior::Encoder(encoder) => {
                if kind == MessageKind::ControlChange {
                    encoder.handle(data2, layer, engine);
                }
            }
            ControlBehavior::Hotcue(hotcue) => {
                hotcue.handle(ButtonInput::from_midi(kind, data2), layer, engine);
            }
            ControlBehavior::Jog(jog) => match lane {
                InputLane::Primary if kind == MessageKind::ControlChange => {
                    jog.handle_wheel(data2, engine);
                }
                InputLane::Touch => {
                    jog.handle_touch(ButtonInput::from_midi(kind, data2), engine);
                }
                _ => (),
            },
        }
    }

    /// Deliver a timer expiry. Returns `true` if this control owned
    /// the timer.
    pub fn handle_timer(
        &mut self,
        timer: TimerHandle,
        layer: ShiftLayer,
        engine: &mut dyn Engine,
    ) -> bool {
        match &mut self.behavior {
            ControlBehavior::Button(button) => button.on_timer(timer, layer, engine),
            _ => false,
        }
    }

    /// Cancel any outstanding timer, e.g. on shutdown.
    pub fn cancel_timers(&mut self, engine: &mut dyn Engine) {
        if let ControlBehavior::Button(button) = &mut self.behavior {
            button.cancel_timer(engine);
        }
    }

    /// Format the LED feedback message for an engine value, if this
    /// control declares feedback.
    #[must_use]
    pub fn led_message(&self, value: f64) -> Option<(MidiKey, u8)> {
        let feedback = self.feedback.as_ref()?;
        let data2 = if value > 0.0 { LED_ON } else { LED_OFF };
        Some((feedback.led, data2))
    }
}
