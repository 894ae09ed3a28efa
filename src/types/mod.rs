// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the library.
//!
//! # Types
//!
//! - [`CableId`] - Global identifier of a cable kind (USB, HDMI, ...)
//! - [`CableSet`] - Validated, ordered list of the cables a connector supports
//! - [`HandleId`] - Opaque external handle used for handle-based lookup

mod cable;
mod cable_set;
mod handle;

pub use cable::CableId;
pub use cable_set::CableSet;
pub use handle::HandleId;

/// Maximum number of cables a single connector can support.
pub const MAX_CABLES: usize = 32;

/// Mask covering every bit of a connector state.
pub const ALL_BITS: u32 = u32::MAX;
