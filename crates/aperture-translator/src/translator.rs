use std::sync::{Mutex, MutexGuard, PoisonError};

use aperture_regs::map::{
    self, REG_ADDR_RANGE, REG_BASE_ADDR_HI, REG_BASE_ADDR_LO, REG_CAPABILITIES, REG_ENTRY_NUM,
    REG_VERSION,
};
use aperture_regs::{Capabilities, RegisterWindow, Version};

use crate::error::{Result, TranslatorError};

/// Programming front-end for one translation unit.
///
/// Owns the mapped register window for its lifetime and serializes every
/// operation behind one mutex: a `configure` call fully completes (or fails)
/// before another `configure` or capacity query on the same instance begins.
/// The guard gives serialization, not atomicity — anyone reading the raw
/// window concurrently can observe a partially programmed table.
#[derive(Debug)]
pub struct AddressTranslator<W> {
    regs: Mutex<W>,
}

impl<W: RegisterWindow> AddressTranslator<W> {
    /// Takes ownership of a mapped register window.
    ///
    /// Fails only if the window does not cover the register file; that is the
    /// construction-time I/O failure, after which individual register
    /// accesses are assumed to succeed.
    pub fn attach(mut window: W) -> Result<Self> {
        let span = window.span_bytes();
        if span < map::REGISTER_FILE_SPAN {
            return Err(TranslatorError::WindowTooSmall {
                got: span,
                need: map::REGISTER_FILE_SPAN,
            });
        }
        let version = Version::decode(window.read32(REG_VERSION));
        tracing::info!(%version, span, "address translator attached");
        Ok(Self {
            regs: Mutex::new(window),
        })
    }

    /// Releases the register window so the host can unmap it.
    pub fn detach(self) -> W {
        self.regs
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // Register words are written whole, so state behind a poisoned lock is
    // still self-consistent; recover the guard rather than propagate.
    fn lock(&self) -> MutexGuard<'_, W> {
        self.regs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Maximum number of apertures the hardware accepts, re-read from the
    /// capability register on every call.
    pub fn query_entry_capacity(&self) -> u32 {
        map::max_num_apertures(self.lock().read32(REG_CAPABILITIES))
    }

    /// Full capability decode; like the capacity query, never cached.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::decode(self.lock().read32(REG_CAPABILITIES))
    }

    pub fn version(&self) -> Version {
        Version::decode(self.lock().read32(REG_VERSION))
    }

    /// Current value of the entry-count register.
    pub fn entry_count(&self) -> u32 {
        self.lock().read32(REG_ENTRY_NUM)
    }

    /// Entry count formatted for the host's read-only status surface,
    /// e.g. `"0x100"`.
    pub fn entry_count_status(&self) -> String {
        format!("{:#x}", self.entry_count())
    }

    /// Loads a translation table: `num_entries` apertures of `entry_size`
    /// bytes each, translated starting at `base_addr`.
    ///
    /// Register write order is fixed: page table entries, then the base
    /// address halves, then the log2-encoded range, then the entry count
    /// last — so an external reader that observes the count change sees a
    /// fully programmed table.
    ///
    /// Per-entry validation is interleaved with the writes: a zero physical
    /// address at index `i` fails the call with entries `0..i` already in
    /// hardware, and nothing is rolled back. All other rejections happen
    /// before any register is touched.
    pub fn configure(
        &self,
        phys_addrs: &[u64],
        base_addr: u64,
        entry_size: u64,
        num_entries: u32,
    ) -> Result<()> {
        let mut regs = self.lock();

        let capacity = map::max_num_apertures(regs.read32(REG_CAPABILITIES));
        if num_entries > capacity {
            return Err(TranslatorError::CapacityExceeded {
                requested: num_entries,
                capacity,
            });
        }
        if !num_entries.is_power_of_two() {
            return Err(TranslatorError::EntryCountNotPowerOfTwo(num_entries));
        }
        let range = (num_entries as u64)
            .checked_mul(entry_size)
            .filter(|&range| range != 0)
            .ok_or(TranslatorError::InvalidRange {
                num_entries,
                entry_size,
            })?;
        if phys_addrs.len() < num_entries as usize {
            return Err(TranslatorError::TooFewAddresses {
                given: phys_addrs.len(),
                requested: num_entries,
            });
        }

        for (i, &addr) in phys_addrs[..num_entries as usize].iter().enumerate() {
            if addr == 0 {
                return Err(TranslatorError::ZeroPhysAddr { index: i });
            }
            regs.write32(map::page_table_lo(i), addr as u32);
            regs.write32(map::page_table_hi(i), (addr >> 32) as u32);
        }

        regs.write32(REG_BASE_ADDR_LO, base_addr as u32);
        regs.write32(REG_BASE_ADDR_HI, (base_addr >> 32) as u32);

        if !range.is_power_of_two() {
            tracing::warn!(
                range,
                "translation range is not a power of two; log2 encoding truncates"
            );
        }
        regs.write32(REG_ADDR_RANGE, range.ilog2());

        regs.write32(REG_ENTRY_NUM, num_entries);
        Ok(())
    }
}
