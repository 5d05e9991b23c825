use thiserror::Error;

pub type Result<T> = std::result::Result<T, TranslatorError>;

/// Errors produced by the translation-unit core.
///
/// Variants carry the concrete rejection; [`TranslatorError::kind`] collapses
/// them onto the three classes callers dispatch on. The core never retries:
/// every error is returned synchronously and retry policy belongs to the host.
#[derive(Debug, Error)]
pub enum TranslatorError {
    #[error("register window spans {got:#x} bytes, register file needs {need:#x}")]
    WindowTooSmall { got: u64, need: u64 },

    #[error("{requested} entries requested, hardware reports capacity {capacity}")]
    CapacityExceeded { requested: u32, capacity: u32 },

    #[error("entry count {0} is not a power of two")]
    EntryCountNotPowerOfTwo(u32),

    #[error("{given} physical addresses supplied for {requested} entries")]
    TooFewAddresses { given: usize, requested: u32 },

    #[error("aperture {index} has a zero physical address")]
    ZeroPhysAddr { index: usize },

    #[error("translation range {num_entries} * {entry_size:#x} is zero or overflows")]
    InvalidRange { num_entries: u32, entry_size: u64 },

    #[error("translator is not attached")]
    Detached,

    #[error("translator is already attached")]
    AlreadyAttached,
}

/// Coarse error classes: I/O failure at window mapping, invalid configure
/// arguments, or operating on a detached instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    InvalidArgument,
    State,
}

impl TranslatorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslatorError::WindowTooSmall { .. } => ErrorKind::Io,
            TranslatorError::CapacityExceeded { .. }
            | TranslatorError::EntryCountNotPowerOfTwo(_)
            | TranslatorError::TooFewAddresses { .. }
            | TranslatorError::ZeroPhysAddr { .. }
            | TranslatorError::InvalidRange { .. } => ErrorKind::InvalidArgument,
            TranslatorError::Detached | TranslatorError::AlreadyAttached => ErrorKind::State,
        }
    }
}
