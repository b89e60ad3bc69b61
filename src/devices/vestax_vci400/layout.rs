// SPDX-FileCopyrightText: The deckmap authors
// SPDX-License-Identifier: MPL-2.0

//! Wiring of the address table to engine bindings.

use std::rc::Rc;

use strum::IntoEnumIterator as _;

use super::{
    map::{AddressTable, DeckMap, FxMap, GlobalMap, PADS_PER_SECTION},
    Deck, FxSide,
};
use crate::{
    address::{HardwareAddress, MidiKey},
    control::{
        Binding, Button, ButtonBehavior, Control, ControlBehavior, Encoder, EncoderResponse,
        Feedback, HotcueButton, InputLane, JogWheel, Layered, LongPress, Pot,
        DEFAULT_LONG_PRESS_TIMEOUT,
    },
    controller::{ConfigError, Controller, ControllerBuilder},
    engine::Engine,
};

const LOOP_SIZES: [&str; PADS_PER_SECTION] = ["0.125", "0.25", "0.5", "1", "2", "4", "8", "16"];
const BEATJUMP_SIZES: [&str; PADS_PER_SECTION] = ["0.5", "1", "2", "4", "8", "16", "32", "64"];
const DRY_WET_STEP: f64 = 0.05;

/// Extra hotcue slots on the bottom row of the last pad section,
/// continuing the eight slots of the first section.
const EXTRA_HOTCUES: std::ops::RangeInclusive<u8> = 9..=12;

fn read_setting(engine: &dyn Engine, name: &str) -> Result<u8, ConfigError> {
    let value = engine
        .get_setting(name)
        .ok_or_else(|| ConfigError::MissingSetting {
            name: name.to_owned(),
        })?;
    if !(1..=4).contains(&value) {
        return Err(ConfigError::SettingOutOfRange {
            name: name.to_owned(),
            value,
        });
    }
    u8::try_from(value).map_err(|_| ConfigError::SettingOutOfRange {
        name: name.to_owned(),
        value,
    })
}

fn channel_group(channel: u8) -> String {
    format!("[Channel{channel}]")
}

fn quick_effect_group(channel: u8) -> String {
    format!("[QuickEffectRack1_[Channel{channel}]]")
}

fn equalizer_group(channel: u8) -> String {
    format!("[EqualizerRack1_[Channel{channel}]_Effect1]")
}

fn fx_unit_group(unit: u8) -> String {
    format!("[EffectRack1_EffectUnit{unit}]")
}

fn fx_effect_group(unit: u8, effect: usize) -> String {
    format!("[EffectRack1_EffectUnit{unit}_Effect{effect}]")
}

fn note_inputs(address: HardwareAddress) -> [(MidiKey, InputLane); 2] {
    [
        (address.note_on(), InputLane::Primary),
        (address.note_off(), InputLane::Primary),
    ]
}

fn button(behavior: Layered<ButtonBehavior>) -> Control {
    Control::new(ControlBehavior::Button(Button::new(behavior)))
}

fn button_with_led(behavior: Layered<ButtonBehavior>, source: Binding, led: MidiKey) -> Control {
    Control::with_feedback(
        ControlBehavior::Button(Button::new(behavior)),
        Feedback { source, led },
    )
}

fn hotcue_with_led(group: &str, number: u8, led: MidiKey) -> Control {
    let hotcue = HotcueButton::new(group.to_owned(), number);
    let source = Binding::new(group.to_owned(), hotcue.status_key());
    Control::with_feedback(ControlBehavior::Hotcue(hotcue), Feedback { source, led })
}

pub(super) fn build(engine: &dyn Engine) -> Result<Controller, ConfigError> {
    let table = AddressTable::default();
    let left_fx_unit = read_setting(engine, FxSide::Left.setting_name())?;
    let right_fx_unit = read_setting(engine, FxSide::Right.setting_name())?;

    let mut builder = ControllerBuilder::default();
    let global = table.global();
    add_master(&mut builder, &global)?;
    add_library(&mut builder, &global)?;
    for deck in Deck::iter() {
        let map = table.deck(deck);
        let channel = read_setting(engine, &deck.setting_name())?;
        builder.add_shift_button(map.shift)?;
        add_deck(&mut builder, deck, &map, channel)?;
        add_channel(&mut builder, deck, &map, channel, left_fx_unit, right_fx_unit)?;
    }
    for side in FxSide::iter() {
        let unit = match side {
            FxSide::Left => left_fx_unit,
            FxSide::Right => right_fx_unit,
        };
        add_fx(&mut builder, side, &table.fx(side), unit)?;
    }
    Ok(builder.build())
}

fn add_master(builder: &mut ControllerBuilder, map: &Rc<GlobalMap>) -> Result<(), ConfigError> {
    let container = builder.container("master");
    builder.add_control(
        container,
        Control::new(ControlBehavior::Pot(Pot::single(Binding::new(
            "[Master]", "gain",
        )))),
        &[(map.master.cc(), InputLane::Primary)],
    )?;
    builder.add_control(
        container,
        Control::new(ControlBehavior::Pot(Pot::single(Binding::new(
            "[Master]",
            "crossfader",
        )))),
        &[(map.cross_fader.cc(), InputLane::Primary)],
    )?;
    Ok(())
}

fn add_library(builder: &mut ControllerBuilder, map: &Rc<GlobalMap>) -> Result<(), ConfigError> {
    let container = builder.container("library");
    builder.add_control(
        container,
        button(Layered::uniform(ButtonBehavior::Push(Binding::new(
            "[Library]",
            "MoveFocusBackward",
        )))),
        &note_inputs(map.center_pads[2]),
    )?;
    builder.add_control(
        container,
        button(Layered::uniform(ButtonBehavior::Push(Binding::new(
            "[Library]",
            "MoveFocusForward",
        )))),
        &note_inputs(map.center_pads[3]),
    )?;
    builder.add_control(
        container,
        Control::new(ControlBehavior::Encoder(Encoder::new(
            Layered::split(
                Binding::new("[Library]", "MoveVertical"),
                Binding::new("[Library]", "MoveHorizontal"),
            ),
            EncoderResponse::Select,
        ))),
        &[(map.browse_turn.cc(), InputLane::Primary)],
    )?;
    builder.add_control(
        container,
        button(Layered::split(
            ButtonBehavior::Push(Binding::new("[Library]", "GoToItem")),
            ButtonBehavior::Push(Binding::new("[Library]", "sort_focused_column")),
        )),
        &note_inputs(map.browse_click),
    )?;
    Ok(())
}

#[allow(clippy::too_many_lines)]
fn add_deck(
    builder: &mut ControllerBuilder,
    deck: Deck,
    map: &Rc<DeckMap>,
    channel: u8,
) -> Result<(), ConfigError> {
    let group = channel_group(channel);
    let container = builder.container(format!("deck {deck}"));

    builder.add_control(
        container,
        Control::new(ControlBehavior::Encoder(Encoder::new(
            Layered::uniform(Binding::new(group.clone(), "beatjump_size")),
            EncoderResponse::DoubleHalve,
        ))),
        &[(map.encoder_left.cc(), InputLane::Primary)],
    )?;
    builder.add_control(
        container,
        button(Layered::split(
            ButtonBehavior::Push(Binding::new(group.clone(), "beatjump_forward")),
            ButtonBehavior::Push(Binding::new(group.clone(), "beatjump_backward")),
        )),
        &note_inputs(map.encoder_left_push),
    )?;
    builder.add_control(
        container,
        Control::new(ControlBehavior::Encoder(Encoder::new(
            Layered::uniform(Binding::new(group.clone(), "beatloop_size")),
            EncoderResponse::DoubleHalve,
        ))),
        &[(map.encoder_right.cc(), InputLane::Primary)],
    )?;
    builder.add_control(
        container,
        button(Layered::split(
            ButtonBehavior::Push(Binding::new(group.clone(), "beatloop_activate")),
            ButtonBehavior::Push(Binding::new(group.clone(), "reloop_toggle")),
        )),
        &note_inputs(map.encoder_right_push),
    )?;
    builder.add_control(
        container,
        Control::new(ControlBehavior::Pot(Pot::hi_res(Binding::new(
            group.clone(),
            "rate",
        )))),
        &[
            (map.pitch_msb.cc(), InputLane::Msb),
            (map.pitch_lsb.cc(), InputLane::Lsb),
        ],
    )?;

    // First pad section: hotcues 1-8.
    for (number, &pad) in (1..).zip(map.main_pads[0].iter()) {
        builder.add_control(
            container,
            hotcue_with_led(&group, number, pad.note_on()),
            &note_inputs(pad),
        )?;
    }

    // Second pad section: fixed-size beatloops.
    for (&pad, size) in map.main_pads[1].iter().zip(LOOP_SIZES) {
        builder.add_control(
            container,
            button_with_led(
                Layered::split(
                    ButtonBehavior::Push(Binding::new(
                        group.clone(),
                        format!("beatloop_{size}_activate"),
                    )),
                    ButtonBehavior::Push(Binding::new(
                        group.clone(),
                        format!("beatloop_{size}_toggle"),
                    )),
                ),
                Binding::new(group.clone(), format!("beatloop_{size}_enabled")),
                pad.note_on(),
            ),
            &note_inputs(pad),
        )?;
    }

    // Third pad section: fixed-size beatjumps.
    for (&pad, size) in map.main_pads[2].iter().zip(BEATJUMP_SIZES) {
        builder.add_control(
            container,
            button(Layered::split(
                ButtonBehavior::Push(Binding::new(
                    group.clone(),
                    format!("beatjump_{size}_forward"),
                )),
                ButtonBehavior::Push(Binding::new(
                    group.clone(),
                    format!("beatjump_{size}_backward"),
                )),
            )),
            &note_inputs(pad),
        )?;
    }

    // Fourth pad section: intro/outro markers on the top row, hotcues
    // 9-12 on the bottom row.
    for (&pad, marker) in map.main_pads[3]
        .iter()
        .zip(["intro_start", "intro_end", "outro_start", "outro_end"])
    {
        builder.add_control(
            container,
            button_with_led(
                Layered::split(
                    ButtonBehavior::Push(Binding::new(group.clone(), format!("{marker}_activate"))),
                    ButtonBehavior::Push(Binding::new(group.clone(), format!("{marker}_clear"))),
                ),
                Binding::new(group.clone(), format!("{marker}_enabled")),
                pad.note_on(),
            ),
            &note_inputs(pad),
        )?;
    }
    for (&pad, number) in map.main_pads[3][4..].iter().zip(EXTRA_HOTCUES) {
        builder.add_control(
            container,
            hotcue_with_led(&group, number, pad.note_on()),
            &note_inputs(pad),
        )?;
    }

    builder.add_control(
        container,
        Control::new(ControlBehavior::Jog(JogWheel::new(group.clone(), channel))),
        &[
            (map.jog_wheel.cc(), InputLane::Primary),
            (map.jog_touch.note_on(), InputLane::Touch),
            (map.jog_touch.note_off(), InputLane::Touch),
        ],
    )?;

    builder.add_control(
        container,
        button(Layered::split(
            ButtonBehavior::Toggle(Binding::new(group.clone(), "play")),
            ButtonBehavior::Push(Binding::new(group.clone(), "reverse")),
        )),
        &note_inputs(map.play),
    )?;
    builder.add_control(
        container,
        button(Layered::split(
            ButtonBehavior::Push(Binding::new(group.clone(), "cue_default")),
            ButtonBehavior::Push(Binding::new(group.clone(), "start_stop")),
        )),
        &note_inputs(map.cue),
    )?;

    // Center track pad mode buttons; the left and right modes are
    // unmapped.
    builder.add_control(
        container,
        button_with_led(
            Layered::split(
                ButtonBehavior::Push(Binding::new(group.clone(), "beatjump_backward")),
                ButtonBehavior::Push(Binding::new(group.clone(), "beatjump_1_backward")),
            ),
            Binding::new(group.clone(), "beatjump_backward"),
            map.transport[4].note_on(),
        ),
        &note_inputs(map.transport[4]),
    )?;
    builder.add_control(
        container,
        button_with_led(
            Layered::split(
                ButtonBehavior::Push(Binding::new(group.clone(), "beatjump_forward")),
                ButtonBehavior::Push(Binding::new(group.clone(), "beatjump_1_forward")),
            ),
            Binding::new(group.clone(), "beatjump_forward"),
            map.transport[5].note_on(),
        ),
        &note_inputs(map.transport[5]),
    )?;
    builder.add_control(
        container,
        button_with_led(
            Layered::split(
                ButtonBehavior::Push(Binding::new(group.clone(), "beatloop_activate")),
                ButtonBehavior::Push(Binding::new(group.clone(), "reloop_toggle")),
            ),
            Binding::new(group.clone(), "loop_enabled"),
            map.transport[6].note_on(),
        ),
        &note_inputs(map.transport[6]),
    )?;
    builder.add_control(
        container,
        button_with_led(
            Layered::split(
                ButtonBehavior::Toggle(Binding::new(group.clone(), "loop_anchor")),
                ButtonBehavior::Push(Binding::new(group.clone(), "beats_translate_curpos")),
            ),
            Binding::new(group, "loop_anchor"),
            map.transport[7].note_on(),
        ),
        &note_inputs(map.transport[7]),
    )?;
    Ok(())
}

fn add_channel(
    builder: &mut ControllerBuilder,
    deck: Deck,
    map: &Rc<DeckMap>,
    channel: u8,
    left_fx_unit: u8,
    right_fx_unit: u8,
) -> Result<(), ConfigError> {
    let group = channel_group(channel);
    let container = builder.container(format!("channel {deck}"));

    builder.add_control(
        container,
        Control::new(ControlBehavior::Pot(Pot::single(Binding::new(
            group.clone(),
            "pregain",
        )))),
        &[(map.trim.cc(), InputLane::Primary)],
    )?;

    let equalizer = equalizer_group(channel);
    for (address, parameter) in [
        (map.eq_hi, "parameter3"),
        (map.eq_mid, "parameter2"),
        (map.eq_low, "parameter1"),
    ] {
        builder.add_control(
            container,
            Control::new(ControlBehavior::Pot(Pot::single(Binding::new(
                equalizer.clone(),
                parameter,
            )))),
            &[(address.cc(), InputLane::Primary)],
        )?;
    }

    builder.add_control(
        container,
        button_with_led(
            Layered::split(
                ButtonBehavior::LongPress(LongPress {
                    short: Binding::new(group.clone(), "beatsync"),
                    long: Binding::new(group.clone(), "sync_enabled"),
                    timeout: DEFAULT_LONG_PRESS_TIMEOUT,
                }),
                ButtonBehavior::Toggle(Binding::new(group.clone(), "quantize")),
            ),
            Binding::new(group.clone(), "sync_enabled"),
            map.sync.note_on(),
        ),
        &note_inputs(map.sync),
    )?;

    // The load button LED is driven by the hardware itself.
    builder.add_control(
        container,
        button(Layered::split(
            ButtonBehavior::Push(Binding::new(group.clone(), "LoadSelectedTrack")),
            ButtonBehavior::Toggle(Binding::new(group.clone(), "keylock")),
        )),
        &note_inputs(map.load),
    )?;

    builder.add_control(
        container,
        Control::new(ControlBehavior::Pot(Pot::single(Binding::new(
            quick_effect_group(channel),
            "super1",
        )))),
        &[(map.filter.cc(), InputLane::Primary)],
    )?;

    for (address, unit) in [
        (map.fx_assign_left, left_fx_unit),
        (map.fx_assign_right, right_fx_unit),
    ] {
        let binding = Binding::new(fx_unit_group(unit), format!("group_{group}_enable"));
        builder.add_control(
            container,
            button_with_led(
                Layered::uniform(ButtonBehavior::Toggle(binding.clone())),
                binding,
                address.note_on(),
            ),
            &note_inputs(address),
        )?;
    }

    builder.add_control(
        container,
        button_with_led(
            Layered::uniform(ButtonBehavior::Toggle(Binding::new(group.clone(), "pfl"))),
            Binding::new(group.clone(), "pfl"),
            map.pfl.note_on(),
        ),
        &note_inputs(map.pfl),
    )?;

    builder.add_control(
        container,
        Control::new(ControlBehavior::Pot(Pot::hi_res(Binding::new(
            group, "volume",
        )))),
        &[
            (map.fader_msb.cc(), InputLane::Msb),
            (map.fader_lsb.cc(), InputLane::Lsb),
        ],
    )?;
    Ok(())
}

fn add_fx(
    builder: &mut ControllerBuilder,
    side: FxSide,
    map: &Rc<FxMap>,
    unit: u8,
) -> Result<(), ConfigError> {
    let unit_group = fx_unit_group(unit);
    let container = builder.container(format!("fx {side}"));

    // Knobs 1-3: effect meta on the pot, effect enable on the push.
    for (i, &knob) in map.controls[..3].iter().enumerate() {
        let effect_group = fx_effect_group(unit, i + 1);
        builder.add_control(
            container,
            Control::new(ControlBehavior::Pot(Pot::single(Binding::new(
                effect_group.clone(),
                "meta",
            )))),
            &[(knob.cc(), InputLane::Primary)],
        )?;
        builder.add_control(
            container,
            button_with_led(
                Layered::uniform(ButtonBehavior::Toggle(Binding::new(
                    effect_group.clone(),
                    "enabled",
                ))),
                Binding::new(effect_group, "enabled"),
                knob.note_on(),
            ),
            &note_inputs(knob),
        )?;
    }

    // Knob 4: dry/wet on the rotation, headphone pre-listen on the
    // push.
    builder.add_control(
        container,
        Control::new(ControlBehavior::Encoder(Encoder::new(
            Layered::split(
                Binding::new(unit_group.clone(), "mix"),
                Binding::new(unit_group.clone(), "chain_preset_selector"),
            ),
            EncoderResponse::Step(DRY_WET_STEP),
        ))),
        &[(map.controls[3].cc(), InputLane::Primary)],
    )?;
    builder.add_control(
        container,
        button_with_led(
            Layered::uniform(ButtonBehavior::Toggle(Binding::new(
                unit_group.clone(),
                "group_[Headphone]_enable",
            ))),
            Binding::new(unit_group.clone(), "group_[Headphone]_enable"),
            map.controls[3].note_on(),
        ),
        &note_inputs(map.controls[3]),
    )?;

    builder.add_control(
        container,
        button_with_led(
            Layered::split(
                ButtonBehavior::Toggle(Binding::new(unit_group.clone(), "group_[Master]_enable")),
                ButtonBehavior::Push(Binding::new(unit_group.clone(), "next_chain_preset")),
            ),
            Binding::new(unit_group.clone(), "group_[Master]_enable"),
            map.select1.note_on(),
        ),
        &note_inputs(map.select1),
    )?;
    builder.add_control(
        container,
        button_with_led(
            Layered::split(
                ButtonBehavior::Toggle(Binding::new(unit_group.clone(), "mix_mode")),
                ButtonBehavior::Push(Binding::new(unit_group.clone(), "prev_chain_preset")),
            ),
            Binding::new(unit_group, "mix_mode"),
            map.select2.note_on(),
        ),
        &note_inputs(map.select2),
    )?;
    Ok(())
}
