//! Attach/detach surface for the host integration layer.
//!
//! The host maps the card's register window, hands it to [`TranslatorSlot::attach`],
//! and later tears it down with [`TranslatorSlot::detach`]; the window is
//! released on every exit path because the translator owns it and dropping the
//! slot drops the translator. Operations on an empty slot report the detached
//! state rather than panicking, since attach and teardown race against
//! status queries in real hosts.

use aperture_regs::RegisterWindow;

use crate::error::{Result, TranslatorError};
use crate::translator::AddressTranslator;

/// Holder for at most one attached translator instance.
pub struct TranslatorSlot<W> {
    inner: Option<AddressTranslator<W>>,
}

impl<W> Default for TranslatorSlot<W> {
    fn default() -> Self {
        Self { inner: None }
    }
}

impl<W: RegisterWindow> TranslatorSlot<W> {
    pub fn empty() -> Self {
        Self { inner: None }
    }

    /// Constructs a translator over `window` and installs it in the slot.
    /// The window is dropped (unmapped) if construction fails.
    pub fn attach(&mut self, window: W) -> Result<()> {
        if self.inner.is_some() {
            return Err(TranslatorError::AlreadyAttached);
        }
        self.inner = Some(AddressTranslator::attach(window)?);
        Ok(())
    }

    /// Removes the translator and returns its window for unmapping.
    /// Detaching an empty slot is a no-op.
    pub fn detach(&mut self) -> Option<W> {
        self.inner.take().map(AddressTranslator::detach)
    }

    pub fn is_attached(&self) -> bool {
        self.inner.is_some()
    }

    pub fn translator(&self) -> Result<&AddressTranslator<W>> {
        self.inner.as_ref().ok_or(TranslatorError::Detached)
    }

    pub fn query_entry_capacity(&self) -> Result<u32> {
        Ok(self.translator()?.query_entry_capacity())
    }

    pub fn configure(
        &self,
        phys_addrs: &[u64],
        base_addr: u64,
        entry_size: u64,
        num_entries: u32,
    ) -> Result<()> {
        self.translator()?
            .configure(phys_addrs, base_addr, entry_size, num_entries)
    }

    /// Read-only status string published by the host's attribute layer:
    /// the current entry count in hex, e.g. `"0x100"`.
    pub fn entry_count_status(&self) -> Result<String> {
        Ok(self.translator()?.entry_count_status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use aperture_regs::map::REG_CAPABILITIES;
    use aperture_regs::{Capabilities, VecWindow};

    fn test_window() -> VecWindow {
        let mut window = VecWindow::new();
        window.write32(
            REG_CAPABILITIES,
            Capabilities {
                max_aperture_size_log2: 36,
                aperture_size_log2: 28,
                max_num_apertures: 256,
            }
            .encode(),
        );
        window
    }

    #[test]
    fn detached_slot_reports_state_errors() {
        let slot = TranslatorSlot::<VecWindow>::empty();
        assert!(!slot.is_attached());
        assert_eq!(
            slot.query_entry_capacity().unwrap_err().kind(),
            ErrorKind::State
        );
        assert_eq!(
            slot.configure(&[0x1000], 0, 0x1000, 1).unwrap_err().kind(),
            ErrorKind::State
        );
        assert_eq!(
            slot.entry_count_status().unwrap_err().kind(),
            ErrorKind::State
        );
    }

    #[test]
    fn attach_detach_round_trip_returns_the_window() {
        let mut slot = TranslatorSlot::empty();
        slot.attach(test_window()).unwrap();
        assert!(slot.is_attached());
        assert_eq!(slot.query_entry_capacity().unwrap(), 256);
        assert_eq!(slot.entry_count_status().unwrap(), "0x0");

        let window = slot.detach().expect("window back from detach");
        assert_eq!(window.span_bytes(), aperture_regs::map::REGISTER_FILE_SPAN);
        assert!(!slot.is_attached());
        assert!(slot.detach().is_none());
    }

    #[test]
    fn double_attach_is_a_state_error() {
        let mut slot = TranslatorSlot::empty();
        slot.attach(test_window()).unwrap();
        let err = slot.attach(test_window()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn failed_attach_leaves_the_slot_empty() {
        let mut slot = TranslatorSlot::empty();
        let err = slot.attach(VecWindow::with_span(0x100)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!slot.is_attached());
    }

    #[test]
    fn status_reflects_the_last_successful_configure() {
        let mut slot = TranslatorSlot::empty();
        slot.attach(test_window()).unwrap();
        let addrs: Vec<u64> = (1..=256).map(|i| i as u64 * 0x1000).collect();
        slot.configure(&addrs, 0x1_0000_0000, 0x1000, 256).unwrap();
        assert_eq!(slot.entry_count_status().unwrap(), "0x100");
    }
}
