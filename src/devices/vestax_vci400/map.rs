// SPDX-FileCopyrightText: The deckmap authors
// SPDX-License-Identifier: MPL-2.0

//! The static address table of the controller.
//!
//! Pure data: every named control of every scope resolves to exactly
//! one [`HardwareAddress`]. Maps are built once and memoized per
//! (scope, instance) so repeated resolution returns the same shared
//! instance.

use std::{array, cell::OnceCell, rc::Rc};

use super::{Deck, FxSide};
use crate::address::HardwareAddress;

/// Number of pads per pad-grid section.
pub const PADS_PER_SECTION: usize = 8;

/// Number of pad-grid sections per deck.
pub const PAD_SECTIONS: usize = 4;

/// Number of transport buttons per deck (three groups of four).
pub const TRANSPORT_BUTTONS: usize = 12;

/// Number of effect control knobs per effect section.
pub const FX_CONTROLS: usize = 4;

fn element(channel: u8, control_number: u8) -> HardwareAddress {
    // The hardware manual counts MIDI channels 1-based.
    HardwareAddress::new(channel - 1, control_number)
}

/// Master/library controls shared by the whole surface.
#[derive(Debug)]
pub struct GlobalMap {
    pub master: HardwareAddress,
    pub center_pads: [HardwareAddress; 4],
    pub browse_turn: HardwareAddress,
    pub browse_click: HardwareAddress,
    pub cross_fader: HardwareAddress,
}

impl GlobalMap {
    #[allow(clippy::cast_possible_truncation)]
    fn build() -> Self {
        const MIDI_CHANNEL: u8 = 15;
        Self {
            master: element(MIDI_CHANNEL, 0x2b),
            center_pads: array::from_fn(|i| element(MIDI_CHANNEL, 0x6b + i as u8)),
            browse_turn: element(MIDI_CHANNEL, 0x28),
            browse_click: element(12, 0x71),
            cross_fader: element(1, 0x14),
        }
    }

    #[must_use]
    pub fn entries(&self) -> Vec<(String, HardwareAddress)> {
        let mut entries = vec![
            ("master".to_owned(), self.master),
            ("browse_turn".to_owned(), self.browse_turn),
            ("browse_click".to_owned(), self.browse_click),
            ("cross_fader".to_owned(), self.cross_fader),
        ];
        for (i, &pad) in self.center_pads.iter().enumerate() {
            entries.push((format!("center_pad{}", i + 1), pad));
        }
        entries
    }
}

/// Per-deck controls: the deck strip, the pad grid, and the channel
/// strip controls that share the deck's MIDI channel.
#[derive(Debug)]
pub struct DeckMap {
    pub trim: HardwareAddress,
    pub eq_hi: HardwareAddress,
    pub eq_mid: HardwareAddress,
    pub eq_low: HardwareAddress,
    pub sync: HardwareAddress,
    pub load: HardwareAddress,
    pub filter: HardwareAddress,
    pub fx_assign_left: HardwareAddress,
    pub fx_assign_right: HardwareAddress,
    pub pfl: HardwareAddress,
    pub fader_msb: HardwareAddress,
    pub fader_lsb: HardwareAddress,
    pub encoder_left: HardwareAddress,
    pub encoder_left_push: HardwareAddress,
    pub shift: HardwareAddress,
    pub encoder_right: HardwareAddress,
    pub encoder_right_push: HardwareAddress,
    /// Four sections of eight pads each.
    pub main_pads: [[HardwareAddress; PADS_PER_SECTION]; PAD_SECTIONS],
    pub pitch_msb: HardwareAddress,
    pub pitch_lsb: HardwareAddress,
    pub jog_wheel: HardwareAddress,
    pub jog_scratch: HardwareAddress,
    /// Shares the scratch address: the hardware sends touch and
    /// scratch on the same code.
    pub jog_touch: HardwareAddress,
    pub cue: HardwareAddress,
    pub play: HardwareAddress,
    pub transport: [HardwareAddress; TRANSPORT_BUTTONS],
}

impl DeckMap {
    #[allow(clippy::too_many_lines, clippy::cast_possible_truncation)]
    fn build(deck: Deck) -> Self {
        let deck_channel = deck.deck_channel();
        let pads_channel = deck.pads_channel();
        let push_channel = deck.encoder_push_channel();
        Self {
            trim: element(deck_channel, 0x0c),
            eq_hi: element(deck_channel, 0x0d),
            eq_mid: element(deck_channel, 0x0e),
            eq_low: element(deck_channel, 0x0f),
            sync: element(deck_channel, 0x01),
            load: element(deck_channel, 0x02),
            filter: element(deck_channel, 0x10),
            fx_assign_left: element(deck_channel, 0x03),
            fx_assign_right: element(deck_channel, 0x04),
            pfl: element(deck_channel, 0x05),
            fader_msb: element(deck_channel, 0x11),
            fader_lsb: element(deck_channel, 0x31),
            encoder_left: element(deck_channel, 0x05),
            encoder_left_push: element(push_channel, 0x11),
            shift: element(deck_channel, 0x0f),
            encoder_right: element(deck_channel, 0x06),
            encoder_right_push: element(push_channel, 0x14),
            main_pads: array::from_fn(|section| {
                array::from_fn(|i| element(pads_channel, 0x29 + section as u8 + 4 * i as u8))
            }),
            pitch_msb: element(deck_channel, 0x12),
            pitch_lsb: element(deck_channel, 0x32),
            jog_wheel: element(deck_channel, 0x13),
            jog_scratch: element(deck_channel, 0x27),
            jog_touch: element(deck_channel, 0x27),
            cue: element(deck_channel, 0x19),
            play: element(deck_channel, 0x1a),
            transport: array::from_fn(|i| element(deck_channel, 0x1b + i as u8)),
        }
    }

    #[must_use]
    pub fn entries(&self) -> Vec<(String, HardwareAddress)> {
        let mut entries = vec![
            ("trim".to_owned(), self.trim),
            ("eq_hi".to_owned(), self.eq_hi),
            ("eq_mid".to_owned(), self.eq_mid),
            ("eq_low".to_owned(), self.eq_low),
            ("sync".to_owned(), self.sync),
            ("load".to_owned(), self.load),
            ("filter".to_owned(), self.filter),
            ("fx_assign_left".to_owned(), self.fx_assign_left),
            ("fx_assign_right".to_owned(), self.fx_assign_right),
            ("pfl".to_owned(), self.pfl),
            ("fader_msb".to_owned(), self.fader_msb),
            ("fader_lsb".to_owned(), self.fader_lsb),
            ("encoder_left".to_owned(), self.encoder_left),
            ("encoder_left_push".to_owned(), self.encoder_left_push),
            ("shift".to_owned(), self.shift),
            ("encoder_right".to_owned(), self.encoder_right),
            ("encoder_right_push".to_owned(), self.encoder_right_push),
            ("pitch_msb".to_owned(), self.pitch_msb),
            ("pitch_lsb".to_owned(), self.pitch_lsb),
            ("jog_wheel".to_owned(), self.jog_wheel),
            ("jog_scratch".to_owned(), self.jog_scratch),
            ("jog_touch".to_owned(), self.jog_touch),
            ("cue".to_owned(), self.cue),
            ("play".to_owned(), self.play),
        ];
        for (section, pads) in self.main_pads.iter().enumerate() {
            for (i, &pad) in pads.iter().enumerate() {
                entries.push((format!("main_pad_{}_{}", section + 1, i + 1), pad));
            }
        }
        for (i, &button) in self.transport.iter().enumerate() {
            entries.push((format!("transport{}", i + 1), button));
        }
        entries
    }
}

/// Per-section effect controls.
#[derive(Debug)]
pub struct FxMap {
    /// Knobs 1–3 control effect parameters, knob 4 the dry/wet mix.
    /// Each knob doubles as a push button on the note address.
    pub controls: [HardwareAddress; FX_CONTROLS],
    pub select1: HardwareAddress,
    pub select2: HardwareAddress,
}

impl FxMap {
    #[allow(clippy::cast_possible_truncation)]
    fn build(side: FxSide) -> Self {
        let channel = side.channel();
        Self {
            controls: array::from_fn(|i| element(channel, 0x01 + i as u8)),
            select1: element(channel, 0x08),
            select2: element(channel, 0x09),
        }
    }

    #[must_use]
    pub fn entries(&self) -> Vec<(String, HardwareAddress)> {
        let mut entries: Vec<_> = self
            .controls
            .iter()
            .enumerate()
            .map(|(i, &knob)| (format!("fx_control{}", i + 1), knob))
            .collect();
        entries.push(("fx_select1".to_owned(), self.select1));
        entries.push(("fx_select2".to_owned(), self.select2));
        entries
    }
}

/// A logical scope of the address table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Deck(Deck),
    Fx(FxSide),
}

/// The control map resolved for one scope.
#[derive(Debug, Clone)]
pub enum ControlMap {
    Global(Rc<GlobalMap>),
    Deck(Rc<DeckMap>),
    Fx(Rc<FxMap>),
}

impl ControlMap {
    #[must_use]
    pub fn entries(&self) -> Vec<(String, HardwareAddress)> {
        match self {
            Self::Global(map) => map.entries(),
            Self::Deck(map) => map.entries(),
            Self::Fx(map) => map.entries(),
        }
    }
}

/// Memoizing factory for the per-scope control maps.
///
/// Resolution is deterministic and total: every scope resolves to
/// exactly one map, and resolving the same scope twice returns the
/// identical shared instance.
#[derive(Debug, Default)]
pub struct AddressTable {
    global: OnceCell<Rc<GlobalMap>>,
    decks: [OnceCell<Rc<DeckMap>>; 4],
    fx: [OnceCell<Rc<FxMap>>; 2],
}

impl AddressTable {
    #[must_use]
    pub fn global(&self) -> Rc<GlobalMap> {
        Rc::clone(self.global.get_or_init(|| Rc::new(GlobalMap::build())))
    }

    #[must_use]
    pub fn deck(&self, deck: Deck) -> Rc<DeckMap> {
        Rc::clone(self.decks[deck as usize].get_or_init(|| Rc::new(DeckMap::build(deck))))
    }

    #[must_use]
    pub fn fx(&self, side: FxSide) -> Rc<FxMap> {
        Rc::clone(self.fx[side as usize].get_or_init(|| Rc::new(FxMap::build(side))))
    }

    #[must_use]
    pub fn resolve(&self, scope: Scope) -> ControlMap {
        match scope {
            Scope::Global => ControlMap::Global(self.global()),
            Scope::Deck(deck) => ControlMap::Deck(self.deck(deck)),
            Scope::Fx(side) => ControlMap::Fx(self.fx(side)),
        }
    }
}
