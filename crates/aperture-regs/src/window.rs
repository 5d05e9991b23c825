use crate::map::REGISTER_FILE_SPAN;

/// Abstraction over the mapped register window of the translation unit.
///
/// Accesses are direct windowed I/O: no buffering, no caching, and no ordering
/// guarantees beyond the sequencing of calls. Hardware registers can change
/// underneath the caller and reads can have side effects; therefore reads are
/// defined as `&mut self`.
pub trait RegisterWindow {
    fn read32(&mut self, offset: u64) -> u32;
    fn write32(&mut self, offset: u64, value: u32);

    /// Size of the mapped window in bytes.
    ///
    /// Mapping is the only fallible step in the register path; once a window
    /// of sufficient span exists, individual accesses are assumed to succeed.
    fn span_bytes(&self) -> u64;
}

/// In-memory register window backed by a `Vec<u32>`.
///
/// Stands in for the hardware window in tests and in hosts that simulate the
/// card. It is plain RAM: read-only hardware registers (version, capability)
/// are whatever the test programs into them.
#[derive(Debug, Clone)]
pub struct VecWindow {
    words: Vec<u32>,
}

impl VecWindow {
    /// Window covering the full register file span.
    pub fn new() -> Self {
        Self::with_span(REGISTER_FILE_SPAN)
    }

    /// Window of an arbitrary byte span (may be smaller than the register
    /// file, to exercise attach-time span validation).
    pub fn with_span(bytes: u64) -> Self {
        Self {
            words: vec![0; (bytes / 4) as usize],
        }
    }

    fn word_index(&self, offset: u64) -> usize {
        assert!(offset % 4 == 0, "unaligned register access at {offset:#x}");
        let index = (offset / 4) as usize;
        assert!(
            index < self.words.len(),
            "register access at {offset:#x} outside window of {:#x} bytes",
            self.span_bytes()
        );
        index
    }
}

impl Default for VecWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterWindow for VecWindow {
    fn read32(&mut self, offset: u64) -> u32 {
        let index = self.word_index(offset);
        self.words[index]
    }

    fn write32(&mut self, offset: u64, value: u32) {
        let index = self.word_index(offset);
        self.words[index] = value;
    }

    fn span_bytes(&self) -> u64 {
        self.words.len() as u64 * 4
    }
}
