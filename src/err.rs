use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlinkError {
    #[error("Cannot open physical memory device {}: {source}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Mapping memory for absolute memory access failed (base: 0x{base:x}, len: 0x{len:x}): {source}")]
    Mapping {
        base: u64,
        len: usize,
        #[source]
        source: io::Error,
    },

    #[error("MMIO error: {0}")]
    Mmio(#[from] MmioError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl BlinkError {
    pub fn access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Access {
            path: path.into(),
            source,
        }
    }

    pub fn mapping(base: u64, len: usize, source: io::Error) -> Self {
        Self::Mapping { base, len, source }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MmioError {
    #[error("Access outside mapped window: offset 0x{offset:x} (size: {size}) exceeds window length 0x{len:x}")]
    OutOfBounds { offset: usize, size: usize, len: usize },

    #[error("Invalid alignment: offset 0x{offset:x} not aligned for {size}-byte access")]
    InvalidAlignment { offset: usize, size: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Window length must be non-zero")]
    EmptyWindow,

    #[error("Physical base 0x{base:x} is not aligned to the 0x{page:x}-byte page size")]
    UnalignedBase { base: u64, page: u64 },

    #[error("{name} register offset 0x{offset:x} does not fit in a window of 0x{len:x} bytes")]
    OffsetOutsideWindow {
        name: &'static str,
        offset: usize,
        len: usize,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

impl ConfigError {
    pub fn invalid_value(key: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            value: value.into(),
        }
    }
}
