// SPDX-FileCopyrightText: The deckmap authors
// SPDX-License-Identifier: MPL-2.0

use std::rc::Rc;

use strum::IntoEnumIterator as _;

use super::*;
use crate::{
    shift::ShiftLayer,
    testing::{FakeEngine, FakeOutput},
};

#[test]
fn address_table_memoizes_maps() {
    let table = AddressTable::default();
    assert!(Rc::ptr_eq(&table.global(), &table.global()));
    for deck in Deck::iter() {
        assert!(Rc::ptr_eq(&table.deck(deck), &table.deck(deck)));
    }
    assert!(Rc::ptr_eq(
        &table.fx(FxSide::Left),
        &table.fx(FxSide::Left)
    ));
    assert!(!Rc::ptr_eq(
        &table.fx(FxSide::Left),
        &table.fx(FxSide::Right)
    ));
}

#[test]
fn resolve_returns_the_memoized_instance() {
    let table = AddressTable::default();
    let ControlMap::Deck(resolved) = table.resolve(Scope::Deck(Deck::B)) else {
        panic!("deck scope must resolve to a deck map");
    };
    assert!(Rc::ptr_eq(&resolved, &table.deck(Deck::B)));
}

#[test]
fn deck_addresses_follow_the_hardware_layout() {
    let table = AddressTable::default();
    let deck_a = table.deck(Deck::A);
    // Deck strip on MIDI channel 3, pads on channel 1.
    assert_eq!(0x92, deck_a.shift.note_on().status);
    assert_eq!(0x0f, deck_a.shift.note_on().data1);
    assert_eq!(0x90, deck_a.main_pads[0][0].note_on().status);
    assert_eq!(0x29, deck_a.main_pads[0][0].note_on().data1);

    let deck_d = table.deck(Deck::D);
    assert_eq!(0x95, deck_d.shift.note_on().status);

    // Every scope resolves without address clashes within itself.
    for deck in Deck::iter() {
        let entries = table.deck(deck).entries();
        assert_eq!(24 + 32 + 12, entries.len());
    }
}

#[test]
fn new_controller_succeeds_with_default_settings() {
    let engine = FakeEngine::with_default_settings();
    let controller = new_controller(&engine).unwrap();
    assert!(!controller.containers().is_empty());
}

#[test]
fn missing_channel_setting_is_a_config_error() {
    let mut engine = FakeEngine::with_default_settings();
    engine.put_setting("leftFX", 0);
    let err = new_controller(&engine).unwrap_err();
    assert!(matches!(err, ConfigError::SettingOutOfRange { .. }));

    let engine = FakeEngine::default();
    let err = new_controller(&engine).unwrap_err();
    assert!(matches!(err, ConfigError::MissingSetting { .. }));
}

#[test]
fn hotcue_pad_activates_the_slot() {
    let mut engine = FakeEngine::with_default_settings();
    let mut out = FakeOutput::default();
    let mut controller = new_controller(&engine).unwrap();

    controller.on_message(&mut engine, &mut out, 0x90, 0x29, 0x7f);
    assert_eq!(1.0, engine.value("[Channel1]", "hotcue_1_activate"));
    controller.on_message(&mut engine, &mut out, 0x80, 0x29, 0x00);
    assert_eq!(0.0, engine.value("[Channel1]", "hotcue_1_activate"));
}

#[test]
fn hotcue_pad_is_inert_while_shifted() {
    let mut engine = FakeEngine::with_default_settings();
    let mut out = FakeOutput::default();
    let mut controller = new_controller(&engine).unwrap();

    controller.on_message(&mut engine, &mut out, 0x92, 0x0f, 0x7f);
    controller.on_message(&mut engine, &mut out, 0x90, 0x29, 0x7f);
    assert!(engine.value_log.is_empty());
}

#[test]
fn hotcue_status_drives_the_pad_led() {
    let mut engine = FakeEngine::with_default_settings();
    let mut out = FakeOutput::default();
    let mut controller = new_controller(&engine).unwrap();

    controller.on_engine_update(&mut out, "[Channel1]", "hotcue_1_status", 1.0);
    assert_eq!(vec![[0x90, 0x29, 0x7f]], out.messages);
    out.messages.clear();
    controller.on_engine_update(&mut out, "[Channel1]", "hotcue_1_status", 0.0);
    assert_eq!(vec![[0x90, 0x29, 0x00]], out.messages);
}

#[test]
fn extra_hotcues_live_on_the_last_pad_row() {
    let mut engine = FakeEngine::with_default_settings();
    let mut out = FakeOutput::default();
    let mut controller = new_controller(&engine).unwrap();

    // Pad IV5 of deck A, pads channel 1.
    controller.on_message(&mut engine, &mut out, 0x90, 0x3c, 0x7f);
    assert_eq!(1.0, engine.value("[Channel1]", "hotcue_9_activate"));
}

#[test]
fn any_deck_shift_button_shifts_the_whole_surface() {
    let mut engine = FakeEngine::with_default_settings();
    let mut out = FakeOutput::default();
    let mut controller = new_controller(&engine).unwrap();

    // Shift held on deck D, browse encoder turned on the master
    // section.
    controller.on_message(&mut engine, &mut out, 0x95, 0x0f, 0x7f);
    assert_eq!(ShiftLayer::Shifted, controller.shift_layer());
    controller.on_message(&mut engine, &mut out, 0xbe, 0x28, 0x01);
    assert_eq!(1.0, engine.parameter("[Library]", "MoveHorizontal"));

    controller.on_message(&mut engine, &mut out, 0x85, 0x0f, 0x00);
    controller.on_message(&mut engine, &mut out, 0xbe, 0x28, 0x7f);
    assert_eq!(-1.0, engine.parameter("[Library]", "MoveVertical"));
}

#[test]
fn load_button_switches_behavior_with_the_layer() {
    let mut engine = FakeEngine::with_default_settings();
    let mut out = FakeOutput::default();
    let mut controller = new_controller(&engine).unwrap();

    controller.on_message(&mut engine, &mut out, 0x92, 0x02, 0x7f);
    assert_eq!(1.0, engine.value("[Channel1]", "LoadSelectedTrack"));
    controller.on_message(&mut engine, &mut out, 0x82, 0x02, 0x00);

    controller.on_message(&mut engine, &mut out, 0x92, 0x0f, 0x7f);
    controller.on_message(&mut engine, &mut out, 0x92, 0x02, 0x7f);
    assert_eq!(1.0, engine.value("[Channel1]", "keylock"));
}

#[test]
fn sync_button_disambiguates_short_and_long_press() {
    let mut engine = FakeEngine::with_default_settings();
    let mut out = FakeOutput::default();
    let mut controller = new_controller(&engine).unwrap();

    // Short press beat-syncs once.
    controller.on_message(&mut engine, &mut out, 0x92, 0x01, 0x7f);
    controller.on_message(&mut engine, &mut out, 0x82, 0x01, 0x00);
    assert_eq!(1.0, engine.value("[Channel1]", "beatsync"));
    assert_eq!(0.0, engine.value("[Channel1]", "sync_enabled"));

    // Holding past the timeout latches sync instead.
    controller.on_message(&mut engine, &mut out, 0x92, 0x01, 0x7f);
    let timer = engine.last_scheduled().unwrap();
    controller.on_timer(&mut engine, timer);
    assert_eq!(1.0, engine.value("[Channel1]", "sync_enabled"));
}

#[test]
fn volume_fader_combines_both_halves() {
    let mut engine = FakeEngine::with_default_settings();
    let mut out = FakeOutput::default();
    let mut controller = new_controller(&engine).unwrap();

    controller.on_message(&mut engine, &mut out, 0xb2, 0x11, 0x7f);
    controller.on_message(&mut engine, &mut out, 0xb2, 0x31, 0x7f);
    assert_eq!(1.0, engine.parameter("[Channel1]", "volume"));
}

#[test]
fn eq_knobs_target_the_equalizer_rack() {
    let mut engine = FakeEngine::with_default_settings();
    let mut out = FakeOutput::default();
    let mut controller = new_controller(&engine).unwrap();

    controller.on_message(&mut engine, &mut out, 0xb2, 0x0d, 0x7f);
    assert_eq!(
        1.0,
        engine.parameter("[EqualizerRack1_[Channel1]_Effect1]", "parameter3")
    );
}

#[test]
fn jog_touch_enables_scratching() {
    let mut engine = FakeEngine::with_default_settings();
    let mut out = FakeOutput::default();
    let mut controller = new_controller(&engine).unwrap();

    controller.on_message(&mut engine, &mut out, 0x92, 0x27, 0x7f);
    assert_eq!(1.0, engine.value("[Channel1]", "scratch2_enable"));

    engine.set_scratching(1, true);
    controller.on_message(&mut engine, &mut out, 0xb2, 0x13, 0x41);
    assert_eq!(1.0, engine.value("[Channel1]", "scratch2"));
}

#[test]
fn fx_dry_wet_encoder_steps_the_mix() {
    let mut engine = FakeEngine::with_default_settings();
    let mut out = FakeOutput::default();
    let mut controller = new_controller(&engine).unwrap();

    engine.put_parameter("[EffectRack1_EffectUnit1]", "mix", 0.5);
    controller.on_message(&mut engine, &mut out, 0xbc, 0x04, 0x01);
    assert!((engine.parameter("[EffectRack1_EffectUnit1]", "mix") - 0.55).abs() < 1e-9);
}

#[test]
fn fx_assign_targets_the_configured_unit() {
    let mut engine = FakeEngine::with_default_settings();
    let mut out = FakeOutput::default();
    let mut controller = new_controller(&engine).unwrap();

    // Right effect section is assigned to unit 2 by default.
    controller.on_message(&mut engine, &mut out, 0x92, 0x04, 0x7f);
    assert_eq!(
        1.0,
        engine.value("[EffectRack1_EffectUnit2]", "group_[Channel1]_enable")
    );
}
