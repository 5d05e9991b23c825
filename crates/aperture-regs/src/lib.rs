//! Register-window abstraction and register map for the card's
//! address-translation unit.
//!
//! The translation unit exposes a small memory-mapped register file: a version
//! register, a capability register describing hardware limits, a handful of
//! table-programming registers, and a 256-entry page table of paired 32-bit
//! address halves. This crate defines the offset map and field codecs for that
//! register file, plus the [`RegisterWindow`] seam the translator programs it
//! through, so the same programming logic runs against real mapped hardware or
//! an in-memory model.

#![forbid(unsafe_code)]

pub mod map;
pub mod window;

pub use map::{Capabilities, Version};
pub use window::{RegisterWindow, VecWindow};
