//! Programming core for the card's address-translation unit.
//!
//! The unit maps a bounded set of physical memory regions ("apertures") into
//! one contiguous translated address window. [`AddressTranslator`] owns the
//! mapped register window and programs its page-table-like register file:
//! validation and write ordering live here, serialized per instance so two
//! configuration attempts never interleave their register writes.
//!
//! The hardware register file is the only state; there is no software mirror
//! of the table. Callers supply already-valid physical addresses and consume
//! results synchronously.

#![forbid(unsafe_code)]

pub mod error;
pub mod host;
pub mod translator;

pub use error::{ErrorKind, Result, TranslatorError};
pub use host::TranslatorSlot;
pub use translator::AddressTranslator;
