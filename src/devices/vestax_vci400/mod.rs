// SPDX-FileCopyrightText: The deckmap authors
// SPDX-License-Identifier: MPL-2.0

//! # Vestax VCI-400
//!
//! Four-deck MIDI controller with per-deck pad grids, hi-res pitch and
//! line faders, touch-sensitive jog wheels, and two effect sections.
//!
//! MIDI channel layout (1-based, as printed in the hardware manual):
//! deck strips on channels 3–6 (A–D), pad grids on channels 1/4/7/10,
//! encoder pushes on channels 1–4, effect sections on channels 13/14,
//! master/library controls on channel 15.
//!
//! The mapping fuses all four deck shift buttons into one global shift
//! layer: holding any of them shifts the entire surface.

use strum::{Display, EnumCount, EnumIter, FromRepr};

use crate::{
    controller::{ConfigError, Controller},
    engine::Engine,
};

mod layout;
mod map;

#[cfg(test)]
mod tests;

pub use self::map::{
    AddressTable, ControlMap, DeckMap, FxMap, GlobalMap, Scope, FX_CONTROLS, PADS_PER_SECTION,
    PAD_SECTIONS, TRANSPORT_BUTTONS,
};

/// Physical deck of the controller.
///
/// The engine channel a deck controls is configurable via the
/// `channelA`..`channelD` settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter, FromRepr)]
#[repr(u8)]
pub enum Deck {
    A,
    B,
    C,
    D,
}

impl Deck {
    /// 1-based MIDI channel of the deck strip controls.
    #[must_use]
    pub const fn deck_channel(self) -> u8 {
        match self {
            Self::A => 3,
            Self::B => 4,
            Self::C => 5,
            Self::D => 6,
        }
    }

    /// 1-based MIDI channel of the pad grid.
    #[must_use]
    pub const fn pads_channel(self) -> u8 {
        match self {
            Self::A => 1,
            Self::B => 4,
            Self::C => 7,
            Self::D => 10,
        }
    }

    /// 1-based MIDI channel of the encoder push buttons.
    #[must_use]
    pub const fn encoder_push_channel(self) -> u8 {
        match self {
            Self::A => 1,
            Self::B => 2,
            Self::C => 3,
            Self::D => 4,
        }
    }

    /// Name of the engine setting that maps this deck to an engine
    /// channel number.
    #[must_use]
    pub fn setting_name(self) -> String {
        format!("channel{self}")
    }
}

/// Physical effect section of the controller.
///
/// The engine effect unit a section controls is configurable via the
/// `leftFX`/`rightFX` settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter, FromRepr)]
#[repr(u8)]
pub enum FxSide {
    Left,
    Right,
}

impl FxSide {
    /// 1-based MIDI channel of the effect section controls.
    #[must_use]
    pub const fn channel(self) -> u8 {
        match self {
            Self::Left => 13,
            Self::Right => 14,
        }
    }

    #[must_use]
    pub const fn setting_name(self) -> &'static str {
        match self {
            Self::Left => "leftFX",
            Self::Right => "rightFX",
        }
    }
}

/// Build the complete VCI-400 mapping.
///
/// Reads the deck and effect unit assignments from the engine settings,
/// constructs all containers, and wires the shift publishers. This is
/// the `init()` lifecycle entry point of the host; the counterpart is
/// [`Controller::shutdown`].
pub fn new_controller(engine: &dyn Engine) -> Result<Controller, ConfigError> {
    layout::build(engine)
}
