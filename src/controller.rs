// SPDX-FileCopyrightText: The deckmap authors
// SPDX-License-Identifier: MPL-2.0

//! Containers, routing tables, and the single-threaded dispatch loop.

use std::{borrow::Cow, collections::HashMap};

use derive_more::Display;
use thiserror::Error;

use crate::{
    address::{HardwareAddress, MessageKind, MidiKey},
    control::{ButtonInput, Control, InputLane},
    engine::{Engine, MidiOutput},
    shift::{ShiftDispatcher, ShiftLayer},
    TimerHandle,
};

/// Startup/configuration failures. Surfaced once when the mapping is
/// built; dispatch itself never fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing controller setting: {name}")]
    MissingSetting { name: String },
    #[error("controller setting {name} out of range: {value}")]
    SettingOutOfRange { name: String, value: i64 },
    #[error("duplicate MIDI address mapping: {:#04x} {:#04x}", .key.status, .key.data1)]
    DuplicateAddress { key: MidiKey },
}

/// A logical unit of the control surface that owns its controls,
/// e.g. a deck, a mixer channel, or an effect unit.
#[derive(Debug)]
pub struct Container {
    label: Cow<'static, str>,
    controls: Vec<Control>,
}

impl Container {
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }
}

/// Index of a container within its controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub struct ContainerId(usize);

#[derive(Debug, Clone, Copy)]
struct ControlRef {
    container: usize,
    control: usize,
}

#[derive(Debug, Clone, Copy)]
struct Route {
    target: ControlRef,
    lane: InputLane,
}

/// Assembles the container tree and the routing tables.
///
/// Registration is static: all controls and shift publishers are
/// declared up front; the only teardown path is
/// [`Controller::shutdown`].
#[derive(Debug, Default)]
pub struct ControllerBuilder {
    containers: Vec<Container>,
    routes: HashMap<MidiKey, Route>,
    shift_keys: Vec<MidiKey>,
}

impl ControllerBuilder {
    /// Open a new, empty container.
    pub fn container(&mut self, label: impl Into<Cow<'static, str>>) -> ContainerId {
        self.containers.push(Container {
            label: label.into(),
            controls: Vec::new(),
        });
        ContainerId(self.containers.len() - 1)
    }

    /// Add a control to a container and route the given input keys
    /// to it. Duplicate routes are a build-time error.
    pub fn add_control(
        &mut self,
        container: ContainerId,
        control: Control,
        inputs: &[(MidiKey, InputLane)],
    ) -> Result<(), ConfigError> {
        let target = ControlRef {
            container: container.0,
            control: self.containers[container.0].controls.len(),
        };
        for &(key, lane) in inputs {
            if self.routes.contains_key(&key) || self.shift_keys.contains(&key) {
                return Err(ConfigError::DuplicateAddress { key });
            }
            self.routes.insert(key, Route { target, lane });
        }
        self.containers[container.0].controls.push(control);
        Ok(())
    }

    /// Register a shift button address as publisher into the fused
    /// shift state. Both its note-on and note-off keys are claimed.
    pub fn add_shift_button(&mut self, address: HardwareAddress) -> Result<(), ConfigError> {
        for key in [address.note_on(), address.note_off()] {
            if self.routes.contains_key(&key) || self.shift_keys.contains(&key) {
                return Err(ConfigError::DuplicateAddress { key });
            }
            self.shift_keys.push(key);
        }
        Ok(())
    }

    #[must_use]
    pub fn build(self) -> Controller {
        let Self {
            containers,
            routes,
            shift_keys,
        } = self;
        Controller {
            containers,
            routes,
            shift_keys,
            shift: ShiftDispatcher::default(),
        }
    }
}

/// The assembled mapping: container tree, routing tables, and the
/// fused shift state.
///
/// All entry points run on a single dispatch thread and run to
/// completion. A shift transition is fully applied before
/// [`Controller::on_message`] returns, so the next event always
/// observes the post-transition bindings.
#[derive(Debug)]
pub struct Controller {
    containers: Vec<Container>,
    routes: HashMap<MidiKey, Route>,
    shift_keys: Vec<MidiKey>,
    shift: ShiftDispatcher,
}

impl Controller {
    #[must_use]
    pub const fn shift_layer(&self) -> ShiftLayer {
        self.shift.layer()
    }

    #[must_use]
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    /// Inbound hardware event.
    ///
    /// Unmapped events are ignored; data bytes are masked to 7 bits.
    /// A handler never fails: one malformed event must not prevent
    /// processing of subsequent events.
    pub fn on_message(
        &mut self,
        engine: &mut dyn Engine,
        out: &mut dyn MidiOutput,
        status: u8,
        data1: u8,
        data2: u8,
    ) {
        let data1 = data1 & 0x7f;
        let data2 = data2 & 0x7f;
        let Some((kind, _)) = MessageKind::from_status(status) else {
            log::debug!("Ignoring MIDI message with unhandled status: {status:#04x}");
            return;
        };
        let key = MidiKey::new(status, data1);
        if self.shift_keys.contains(&key) {
            // Hardware LED pass-through: the raw message is echoed
            // unchanged regardless of the transition direction.
            out.send_message(status, data1, data2);
            let pressed = ButtonInput::from_midi(kind, data2) == ButtonInput::Pressed;
            self.shift.transition(pressed);
            return;
        }
        let Some(route) = self.routes.get(&key) else {
            log::debug!("Unmapped input event: {status:#04x} {data1:#04x} {data2:#04x}");
            return;
        };
        let layer = self.shift.layer();
        let control =
            &mut self.containers[route.target.container].controls[route.target.control];
        control.handle_midi(route.lane, kind, data2, layer, engine);
    }

    /// Host delivery of a one-shot timer expiry.
    pub fn on_timer(&mut self, engine: &mut dyn Engine, timer: TimerHandle) {
        let layer = self.shift.layer();
        for container in &mut self.containers {
            for control in &mut container.controls {
                if control.handle_timer(timer, layer, engine) {
                    return;
                }
            }
        }
        log::debug!("Ignoring unknown timer: {timer}");
    }

    /// Engine state-change notification; drives LED feedback.
    ///
    /// The LED state is independent of the shift layer.
    pub fn on_engine_update(&mut self, out: &mut dyn MidiOutput, group: &str, key: &str, value: f64) {
        for container in &self.containers {
            for control in &container.controls {
                let Some(feedback) = control.feedback() else {
                    continue;
                };
                if feedback.source.group != group || feedback.source.key != key {
                    continue;
                }
                if let Some((led, data2)) = control.led_message(value) {
                    out.send_message(led.status, led.data1, data2);
                }
            }
        }
    }

    /// Tear down the mapping: cancel outstanding timers, extinguish
    /// all feedback LEDs, and drop the routing tables. Subsequent
    /// input events are ignored.
    pub fn shutdown(&mut self, engine: &mut dyn Engine, out: &mut dyn MidiOutput) {
        for container in &mut self.containers {
            for control in &mut container.controls {
                control.cancel_timers(engine);
                if let Some(feedback) = control.feedback() {
                    let led = feedback.led;
                    out.send_message(led.status, led.data1, crate::control::LED_OFF);
                }
            }
        }
        self.routes.clear();
        self.shift_keys.clear();
        self.shift.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        control::{Binding, Button, ButtonBehavior, ControlBehavior, Feedback, Layered},
        testing::{FakeEngine, FakeOutput},
    };

    fn push_button(key: &'static str) -> Control {
        Control::new(ControlBehavior::Button(Button::new(Layered::uniform(
            ButtonBehavior::Push(Binding::new("[Test]", key)),
        ))))
    }

    #[test]
    fn duplicate_route_is_rejected() {
        let address = HardwareAddress::new(0, 0x10);
        let mut builder = ControllerBuilder::default();
        let container = builder.container("test");
        builder
            .add_control(
                container,
                push_button("first"),
                &[(address.note_on(), InputLane::Primary)],
            )
            .expect("first registration");
        let err = builder
            .add_control(
                container,
                push_button("second"),
                &[(address.note_on(), InputLane::Primary)],
            )
            .expect_err("duplicate registration");
        assert!(matches!(err, ConfigError::DuplicateAddress { .. }));
    }

    #[test]
    fn unmapped_input_is_ignored() {
        let mut controller = ControllerBuilder::default().build();
        let mut engine = FakeEngine::default();
        let mut out = FakeOutput::default();
        controller.on_message(&mut engine, &mut out, 0x90, 0x10, 0x7f);
        assert!(engine.value_log.is_empty());
        assert!(out.messages.is_empty());
    }

    #[test]
    fn shift_echo_and_transition() {
        let shift = HardwareAddress::new(2, 0x0f);
        let mut builder = ControllerBuilder::default();
        builder.add_shift_button(shift).expect("shift registered");
        let mut controller = builder.build();
        let mut engine = FakeEngine::default();
        let mut out = FakeOutput::default();

        controller.on_message(&mut engine, &mut out, 0x92, 0x0f, 0x7f);
        assert_eq!(ShiftLayer::Shifted, controller.shift_layer());
        controller.on_message(&mut engine, &mut out, 0x82, 0x0f, 0x00);
        assert_eq!(ShiftLayer::Unshifted, controller.shift_layer());
        // Both raw messages are echoed verbatim.
        assert_eq!(vec![[0x92, 0x0f, 0x7f], [0x82, 0x0f, 0x00]], out.messages);
    }

    #[test]
    fn shutdown_extinguishes_leds_and_drops_routes() {
        let address = HardwareAddress::new(0, 0x10);
        let mut builder = ControllerBuilder::default();
        let container = builder.container("test");
        builder
            .add_control(
                container,
                Control::with_feedback(
                    ControlBehavior::Button(Button::new(Layered::uniform(
                        ButtonBehavior::Toggle(Binding::new("[Test]", "pfl")),
                    ))),
                    Feedback {
                        source: Binding::new("[Test]", "pfl"),
                        led: address.note_on(),
                    },
                ),
                &[
                    (address.note_on(), InputLane::Primary),
                    (address.note_off(), InputLane::Primary),
                ],
            )
            .expect("registration");
        let mut controller = builder.build();
        let mut engine = FakeEngine::default();
        let mut out = FakeOutput::default();

        controller.shutdown(&mut engine, &mut out);
        assert_eq!(vec![[0x90, 0x10, 0x00]], out.messages);

        out.messages.clear();
        controller.on_message(&mut engine, &mut out, 0x90, 0x10, 0x7f);
        assert!(engine.value_log.is_empty());
    }
}
