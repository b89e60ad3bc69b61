// SPDX-FileCopyrightText: The deckmap authors
// SPDX-License-Identifier: MPL-2.0

//! Hardware addresses and their resolved MIDI routing keys.

pub const MIDI_STATUS_NOTE_OFF: u8 = 0x80;
pub const MIDI_STATUS_NOTE_ON: u8 = 0x90;
pub const MIDI_STATUS_CC: u8 = 0xb0;

const MIDI_STATUS_KIND_MASK: u8 = 0xf0;
const MIDI_STATUS_CHANNEL_MASK: u8 = 0x0f;

/// The three MIDI message kinds a control can listen on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    NoteOn,
    NoteOff,
    ControlChange,
}

impl MessageKind {
    /// Split a status byte into message kind and channel offset.
    ///
    /// Returns `None` for message kinds the mapping does not handle,
    /// e.g. pitch bend or system messages.
    #[must_use]
    pub const fn from_status(status: u8) -> Option<(Self, u8)> {
        let channel_offset = status & MIDI_STATUS_CHANNEL_MASK;
        let kind = match status & MIDI_STATUS_KIND_MASK {
            MIDI_STATUS_NOTE_OFF => Self::NoteOff,
            MIDI_STATUS_NOTE_ON => Self::NoteOn,
            MIDI_STATUS_CC => Self::ControlChange,
            _ => return None,
        };
        Some((kind, channel_offset))
    }
}

/// Hardware address of a single physical control.
///
/// Immutable once constructed. The status bytes for the individual
/// message kinds are derived from the channel offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HardwareAddress {
    channel_offset: u8,
    control_number: u8,
}

impl HardwareAddress {
    /// `channel_offset` is the 0-based MIDI channel (0..=15),
    /// `control_number` the note/controller number (0..=127).
    #[must_use]
    pub const fn new(channel_offset: u8, control_number: u8) -> Self {
        assert!(channel_offset <= 0x0f);
        assert!(control_number <= 0x7f);
        Self {
            channel_offset,
            control_number,
        }
    }

    #[must_use]
    pub const fn channel_offset(self) -> u8 {
        self.channel_offset
    }

    #[must_use]
    pub const fn control_number(self) -> u8 {
        self.control_number
    }

    #[must_use]
    pub const fn note_on(self) -> MidiKey {
        self.key(MessageKind::NoteOn)
    }

    #[must_use]
    pub const fn note_off(self) -> MidiKey {
        self.key(MessageKind::NoteOff)
    }

    #[must_use]
    pub const fn cc(self) -> MidiKey {
        self.key(MessageKind::ControlChange)
    }

    #[must_use]
    pub const fn key(self, kind: MessageKind) -> MidiKey {
        let status = match kind {
            MessageKind::NoteOn => MIDI_STATUS_NOTE_ON,
            MessageKind::NoteOff => MIDI_STATUS_NOTE_OFF,
            MessageKind::ControlChange => MIDI_STATUS_CC,
        };
        MidiKey {
            status: status + self.channel_offset,
            data1: self.control_number,
        }
    }
}

/// Resolved (status, data1) pair used as routing key for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MidiKey {
    pub status: u8,
    pub data1: u8,
}

impl MidiKey {
    #[must_use]
    pub const fn new(status: u8, data1: u8) -> Self {
        Self { status, data1 }
    }

    #[must_use]
    pub const fn kind(self) -> Option<MessageKind> {
        match MessageKind::from_status(self.status) {
            Some((kind, _)) => Some(kind),
            None => None,
        }
    }
}
