//! Register map of the address-translation unit.
//!
//! Byte offsets from the window base:
//!
//! | offset | field | access |
//! |---|---|---|
//! | 0x0 | version: revision bits 5-0, minor bits 9-6, major bits 13-10 | RO |
//! | 0x4 | capabilities: max aperture size log2 bits 7-0, aperture size log2 bits 15-8, max apertures bits 24-16 | RO |
//! | 0x8 | entry count, bits 8-0 | RW |
//! | 0x10/0x14 | translated window base address, low/high 32 bits | RW |
//! | 0x18 | log2 of the translation range, bits 7-0 | RW |
//! | 0x800 + 8i | page table entry i, low/high 32 bits, i = 0..255 | RW |

use std::fmt;

pub const REG_VERSION: u64 = 0x0;
pub const REG_CAPABILITIES: u64 = 0x4;
pub const REG_ENTRY_NUM: u64 = 0x8;
pub const REG_BASE_ADDR_LO: u64 = 0x10;
pub const REG_BASE_ADDR_HI: u64 = 0x14;
pub const REG_ADDR_RANGE: u64 = 0x18;

pub const PAGE_TABLE_BASE: u64 = 0x800;
pub const PAGE_TABLE_ENTRIES: usize = 256;
const PAGE_TABLE_STRIDE: u64 = 8;

/// Total span of the register file in bytes; the mapped window must cover it.
pub const REGISTER_FILE_SPAN: u64 = PAGE_TABLE_BASE + PAGE_TABLE_ENTRIES as u64 * PAGE_TABLE_STRIDE;

const VER_REVISION_MASK: u32 = 0x3F;
const VER_MINOR_SHIFT: u32 = 6;
const VER_MINOR_MASK: u32 = 0xF;
const VER_MAJOR_SHIFT: u32 = 10;
const VER_MAJOR_MASK: u32 = 0xF;

const CAP_MAX_APERTURE_SIZE_MASK: u32 = 0xFF;
const CAP_APERTURE_SIZE_SHIFT: u32 = 8;
const CAP_APERTURE_SIZE_MASK: u32 = 0xFF;
const CAP_MAX_NUM_SHIFT: u32 = 16;
const CAP_MAX_NUM_MASK: u32 = 0x1FF;

/// Offset of page table entry `index`'s low address half.
pub const fn page_table_lo(index: usize) -> u64 {
    PAGE_TABLE_BASE + index as u64 * PAGE_TABLE_STRIDE
}

/// Offset of page table entry `index`'s high address half.
pub const fn page_table_hi(index: usize) -> u64 {
    page_table_lo(index) + 4
}

/// Maximum aperture count advertised by a raw capability register value.
pub const fn max_num_apertures(cap: u32) -> u32 {
    (cap >> CAP_MAX_NUM_SHIFT) & CAP_MAX_NUM_MASK
}

/// Decoded version register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
}

impl Version {
    pub fn decode(raw: u32) -> Self {
        Self {
            major: ((raw >> VER_MAJOR_SHIFT) & VER_MAJOR_MASK) as u8,
            minor: ((raw >> VER_MINOR_SHIFT) & VER_MINOR_MASK) as u8,
            revision: (raw & VER_REVISION_MASK) as u8,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

/// Decoded capability register: the hardware-imposed limits on aperture
/// sizing and count. Sizes are stored log2-encoded; the hardware limits the
/// aperture count to 1..=256 even though nine bits are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub max_aperture_size_log2: u8,
    pub aperture_size_log2: u8,
    pub max_num_apertures: u32,
}

impl Capabilities {
    pub fn decode(raw: u32) -> Self {
        Self {
            max_aperture_size_log2: (raw & CAP_MAX_APERTURE_SIZE_MASK) as u8,
            aperture_size_log2: ((raw >> CAP_APERTURE_SIZE_SHIFT) & CAP_APERTURE_SIZE_MASK) as u8,
            max_num_apertures: max_num_apertures(raw),
        }
    }

    /// Raw register image for this capability set. Hardware never takes this
    /// value (the register is read-only); simulated windows do.
    pub fn encode(&self) -> u32 {
        self.max_aperture_size_log2 as u32
            | (self.aperture_size_log2 as u32) << CAP_APERTURE_SIZE_SHIFT
            | (self.max_num_apertures & CAP_MAX_NUM_MASK) << CAP_MAX_NUM_SHIFT
    }

    pub fn max_aperture_size(&self) -> u64 {
        1u64 << self.max_aperture_size_log2
    }

    pub fn aperture_size(&self) -> u64 {
        1u64 << self.aperture_size_log2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_table_offsets_match_the_register_map() {
        assert_eq!(page_table_lo(0), 0x800);
        assert_eq!(page_table_hi(0), 0x804);
        assert_eq!(page_table_lo(255), 0xFF8);
        assert_eq!(page_table_hi(255), 0xFFC);
        assert_eq!(REGISTER_FILE_SPAN, 0x1000);
    }

    #[test]
    fn max_num_apertures_extracts_bits_16_to_24() {
        assert_eq!(max_num_apertures(0x100 << 16), 0x100);
        // Bits outside 16-24 do not leak into the count.
        assert_eq!(max_num_apertures(0xFE00_FFFF | (0x40 << 16)), 0x40);
        assert_eq!(max_num_apertures(u32::MAX), 0x1FF);
    }

    #[test]
    fn capabilities_round_trip_through_the_register_image() {
        let caps = Capabilities {
            max_aperture_size_log2: 36,
            aperture_size_log2: 28,
            max_num_apertures: 256,
        };
        assert_eq!(Capabilities::decode(caps.encode()), caps);
        assert_eq!(caps.max_aperture_size(), 1 << 36);
        assert_eq!(caps.aperture_size(), 1 << 28);
    }

    #[test]
    fn version_decodes_packed_fields() {
        let raw = (2 << 10) | (3 << 6) | 17;
        let version = Version::decode(raw);
        assert_eq!(
            version,
            Version {
                major: 2,
                minor: 3,
                revision: 17
            }
        );
        assert_eq!(version.to_string(), "2.3.17");
    }
}
