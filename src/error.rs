use std::fmt::{Display, Formatter};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EchError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EchError {
    #[error("truncated {field}: need {needed} bytes, {available} available")]
    Truncated {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("malformed GREASE ECH extension: {0}")]
    Malformed(MalformedReason),

    #[error("destination too small: need {needed} bytes, {available} available")]
    OversizeRequest { needed: usize, available: usize },

    #[error("{field} of {len} bytes does not fit a 16-bit length")]
    FieldTooLong { field: &'static str, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    HelloType(u8),
    ExtensionType(u16),
    TrailingBytes(usize),
    PayloadTooShort(usize),
    LengthMismatch { declared: usize, actual: usize },
}

impl Display for MalformedReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::HelloType(t) => write!(f, "unexpected hello type {}", t),
            MalformedReason::ExtensionType(t) => write!(f, "unexpected extension type {:#06x}", t),
            MalformedReason::TrailingBytes(n) => write!(f, "{} trailing bytes", n),
            MalformedReason::PayloadTooShort(n) => {
                write!(f, "payload of {} bytes is shorter than the AEAD tag", n)
            }
            MalformedReason::LengthMismatch { declared, actual } => {
                write!(f, "declared length {} but {} bytes follow", declared, actual)
            }
        }
    }
}

impl From<MalformedReason> for EchError {
    fn from(reason: MalformedReason) -> Self {
        EchError::Malformed(reason)
    }
}
