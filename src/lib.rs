// SPDX-FileCopyrightText: The deckmap authors
// SPDX-License-Identifier: MPL-2.0

#![allow(rustdoc::invalid_rust_codeblocks)]
#![doc = include_str!("../README.md")]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(unreachable_pub)]
#![warn(unsafe_code)]
#![warn(clippy::pedantic)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(rustdoc::broken_intra_doc_links)]
// Repetitions of module/type names occur frequently when using many
// modules for keeping the size of the source files handy. Often
// types have the same name as their parent module.
#![allow(clippy::module_name_repetitions)]
// Repeating the type name in `..Default::default()` expressions
// is not needed since the context is obvious.
#![allow(clippy::default_trait_access)]

pub mod address;
pub mod control;
pub mod controller;
pub mod devices;
pub mod engine;
pub mod shift;

#[cfg(test)]
pub(crate) mod testing;

pub use self::{
    address::{HardwareAddress, MessageKind, MidiKey},
    control::{
        Binding, Button, ButtonBehavior, ButtonInput, Control, ControlBehavior, Encoder,
        EncoderResponse, Feedback, HotcueButton, InputLane, JogWheel, Layered, LongPress, Pot,
    },
    controller::{ConfigError, Container, ContainerId, Controller, ControllerBuilder},
    engine::{Engine, MidiOutput, TimerHandle},
    shift::{ShiftDispatcher, ShiftLayer},
};
