//! Error types for the driver
//!
//! This module defines error types for bus transactions ([`BusError`]),
//! configuration building ([`BuilderError`]) and driver/drawing operations
//! ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BusError`] - Why a single bus transaction failed
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during display and frame buffer operations
//!
//! A bus transaction either succeeds or fails as a whole. The [`BusError`]
//! variant only tells *which* stage failed, for diagnostics; after any
//! failure the state of the device is unknown and the full logical operation
//! (for example a complete `redraw`) must be re-issued.
//!
//! ## Example
//!
//! ```
//! use ssd1306_i2cdev::{Address, Builder, BuilderError};
//!
//! // 0x80 does not fit in seven bits
//! let result = Builder::new().address(Address::SevenBit(0x80)).build();
//! assert!(matches!(result, Err(BuilderError::InvalidAddress(0x80))));
//! ```

/// Reasons a bus transaction can fail
///
/// Every stage of a transaction (open, address, transfer, close) maps to
/// exactly one variant. A close failure after an otherwise successful
/// transfer still fails the transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusError {
    /// The bus device could not be opened
    OpenFailed,
    /// The target address could not be selected (or was rejected by the bus)
    AddressingFailed,
    /// Fewer bytes were written or read than requested
    ///
    /// A transfer that errors outright is reported with `transferred: 0`.
    ShortTransfer {
        /// Number of bytes the transaction asked for
        requested: usize,
        /// Number of bytes actually moved
        transferred: usize,
    },
    /// The device handle could not be released
    CloseFailed,
}

impl core::fmt::Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OpenFailed => write!(f, "Failed to open bus device"),
            Self::AddressingFailed => write!(f, "Failed to select target address"),
            Self::ShortTransfer {
                requested,
                transferred,
            } => write!(
                f,
                "Short transfer: requested {requested} bytes, transferred {transferred}"
            ),
            Self::CloseFailed => write!(f, "Failed to close bus device"),
        }
    }
}

impl core::error::Error for BusError {}

/// Errors that can occur when interacting with the display or frame buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Bus transaction failed
    ///
    /// Wraps the [`BusError`] reported by the [`Transport`](crate::Transport).
    Bus(BusError),
    /// Pixel coordinates outside the 128x64 canvas
    PixelOutOfBounds {
        /// X coordinate requested
        x: i32,
        /// Y coordinate requested
        y: i32,
    },
    /// A glyph block would write past the end of the frame buffer
    BlockOutOfBounds {
        /// Starting buffer offset
        offset: usize,
        /// Number of 8-pixel row groups
        rows: usize,
        /// Number of columns
        cols: usize,
    },
    /// Glyph or bitmap data holds fewer bytes than the block needs
    GlyphDataTooShort {
        /// Bytes needed (`rows * cols`)
        required: usize,
        /// Bytes provided
        provided: usize,
    },
    /// Character outside printable ASCII (32..=126)
    UnsupportedCharacter(char),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "Bus error: {e}"),
            Self::PixelOutOfBounds { x, y } => {
                write!(f, "Pixel out of bounds: ({x}, {y})")
            }
            Self::BlockOutOfBounds { offset, rows, cols } => write!(
                f,
                "Block of {rows}x{cols} at offset {offset} exceeds frame buffer"
            ),
            Self::GlyphDataTooShort { required, provided } => {
                write!(
                    f,
                    "Glyph data too short: required {required} bytes, provided {provided}"
                )
            }
            Self::UnsupportedCharacter(ch) => {
                write!(f, "Unsupported character: {ch:?}")
            }
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Bus(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the display is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Address does not fit its addressing mode
    ///
    /// Seven-bit addresses must be at most `0x7F`, ten-bit at most `0x3FF`.
    InvalidAddress(u16),
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidAddress(addr) => write!(f, "Invalid bus address {addr:#05x}"),
        }
    }
}

impl core::error::Error for BuilderError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_bus_error_converts_into_error() {
        let err: Error = BusError::CloseFailed.into();
        assert_eq!(err, Error::Bus(BusError::CloseFailed));
    }

    #[test]
    fn test_short_transfer_message_mentions_counts() {
        let msg = BusError::ShortTransfer {
            requested: 1025,
            transferred: 12,
        }
        .to_string();
        assert!(msg.contains("1025"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn test_error_source_is_bus_error() {
        use core::error::Error as _;
        let err = Error::Bus(BusError::OpenFailed);
        assert!(err.source().is_some());
        assert!(Error::UnsupportedCharacter('\u{7f}').source().is_none());
    }
}
