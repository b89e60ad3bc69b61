// SPDX-FileCopyrightText: The deckmap authors
// SPDX-License-Identifier: MPL-2.0

//! The fused shift layer.
//!
//! The whole mapping shares a single binary shift state. Every shift
//! button on the device publishes into the same dispatcher, so holding
//! any of them shifts the entire surface uniformly.
//!
//! Transitions are applied synchronously inside the dispatch turn that
//! carried the shift event, before control returns to the event source.
//! Controls resolve their active [`Layered`](crate::control::Layered)
//! binding against [`ShiftDispatcher::layer`] when an input event is
//! decoded, so no event can ever observe a stale binding.

/// The two dispatch layers of the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftLayer {
    #[default]
    Unshifted,
    Shifted,
}

/// Fused shift state with multiple publishers and one subscriber set.
#[derive(Debug, Default)]
pub struct ShiftDispatcher {
    layer: ShiftLayer,
}

impl ShiftDispatcher {
    #[must_use]
    pub const fn layer(&self) -> ShiftLayer {
        self.layer
    }

    /// Apply a press/release event from any shift button.
    ///
    /// Returns the new layer if the state actually changed.
    pub fn transition(&mut self, pressed: bool) -> Option<ShiftLayer> {
        let layer = if pressed {
            ShiftLayer::Shifted
        } else {
            ShiftLayer::Unshifted
        };
        if layer == self.layer {
            return None;
        }
        self.layer = layer;
        Some(layer)
    }

    /// Reset to the startup state.
    pub fn reset(&mut self) {
        self.layer = ShiftLayer::Unshifted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_release_round_trip() {
        let mut dispatcher = ShiftDispatcher::default();
        assert_eq!(ShiftLayer::Unshifted, dispatcher.layer());
        assert_eq!(Some(ShiftLayer::Shifted), dispatcher.transition(true));
        assert_eq!(ShiftLayer::Shifted, dispatcher.layer());
        assert_eq!(Some(ShiftLayer::Unshifted), dispatcher.transition(false));
        assert_eq!(ShiftLayer::Unshifted, dispatcher.layer());
    }

    #[test]
    fn redundant_transitions_are_absorbed() {
        let mut dispatcher = ShiftDispatcher::default();
        // A second shift button pressed while already shifted.
        assert_eq!(Some(ShiftLayer::Shifted), dispatcher.transition(true));
        assert_eq!(None, dispatcher.transition(true));
        assert_eq!(Some(ShiftLayer::Unshifted), dispatcher.transition(false));
        assert_eq!(None, dispatcher.transition(false));
    }
}
