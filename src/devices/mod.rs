// SPDX-FileCopyrightText: The deckmap authors
// SPDX-License-Identifier: MPL-2.0

//! Bundled device mappings.

#[cfg(feature = "vestax-vci400")]
pub mod vestax_vci400;
