//! Casino domain types.
//!
//! Defines game identifiers, difficulty presets, multipliers and constants used by the
//! execution layer and clients.

mod constants;
mod game;
mod multiplier;

pub use constants::*;
pub use game::*;
pub use multiplier::*;
