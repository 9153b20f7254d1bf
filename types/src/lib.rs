//! Common types used throughout neovegas.
//!
//! Everything here is plain data: game identifiers, difficulty levels, the fixed-point
//! [`casino::Multiplier`], and the constants shared by the execution layer and clients.

pub mod casino;
