//! Register-level bus operations
//!
//! Register access is layered on [`Transport`] by the [`Registers`]
//! extension trait, which every transport gets for free. A register write
//! transmits `[register, payload...]`; a register read transmits
//! `[register]` and then reads the requested number of bytes.
//!
//! ## Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "linux")]
//! # {
//! use ssd1306_i2cdev::{Address, DevTransport, Registers};
//!
//! let mut bus = DevTransport::new("i2c-1");
//! let sensor = Address::SevenBit(0x77);
//!
//! let _ = bus.write_register(sensor, 0xF4, 0x2E);
//! let _ = bus.mask_register(sensor, 0xF4, 0x01);
//! if let Ok(id) = bus.read_register(sensor, 0xD0) {
//!     let _ = id;
//! }
//! # }
//! ```

use crate::error::BusError;
use crate::transport::{Address, Transaction, Transport};

/// Largest transfer, register byte included, a generic device is expected to accept
///
/// Not enforced by [`Registers::write_register_bytes`]; keeping generic
/// register writes within this size is the caller's responsibility. The
/// display flush is deliberately larger.
pub const MAX_TRANSFER: usize = 256;

/// A register value encoded little-endian with high zero bytes trimmed
///
/// Produced by [`encode_value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodedValue {
    bytes: [u8; 4],
    len: usize,
}

impl EncodedValue {
    /// The encoded bytes, least significant first
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl AsRef<[u8]> for EncodedValue {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// Encode `value` little-endian using the fewest bytes, never fewer than one
///
/// ```
/// use ssd1306_i2cdev::register::encode_value;
///
/// assert_eq!(encode_value(0).as_slice(), &[0x00]);
/// assert_eq!(encode_value(0x1234).as_slice(), &[0x34, 0x12]);
/// ```
pub fn encode_value(value: u32) -> EncodedValue {
    let bytes = value.to_le_bytes();
    let significant = (u32::BITS - value.leading_zeros()).div_ceil(8) as usize;
    EncodedValue {
        bytes,
        len: significant.max(1),
    }
}

/// Register operations available on every [`Transport`]
///
/// Every call is one self-contained transaction against `address`, except
/// [`mask_register`](Self::mask_register) which is a read followed by a
/// separate write.
pub trait Registers: Transport {
    /// Write raw bytes, no register framing
    fn write(&mut self, address: Address, bytes: &[u8]) -> Result<(), BusError> {
        self.transact(
            address,
            Transaction::Write {
                header: &[],
                payload: bytes,
            },
        )
    }

    /// Write a numeric value to a register
    ///
    /// The value is sent as [`encode_value`] produces it, so `0x1234` goes
    /// out as `[register, 0x34, 0x12]`.
    fn write_register(&mut self, address: Address, register: u8, value: u32) -> Result<(), BusError> {
        let encoded = encode_value(value);
        self.write_register_bytes(address, register, encoded.as_slice())
    }

    /// Write `[register, payload...]`
    ///
    /// See [`MAX_TRANSFER`] for the size the caller should stay within.
    fn write_register_bytes(
        &mut self,
        address: Address,
        register: u8,
        payload: &[u8],
    ) -> Result<(), BusError> {
        self.transact(
            address,
            Transaction::Write {
                header: &[register],
                payload,
            },
        )
    }

    /// Read `buffer.len()` bytes, no register framing
    fn read(&mut self, address: Address, buffer: &mut [u8]) -> Result<(), BusError> {
        self.transact(address, Transaction::Read { buffer })
    }

    /// Read a single register byte
    fn read_register(&mut self, address: Address, register: u8) -> Result<u8, BusError> {
        let mut value = [0u8; 1];
        self.read_register_bytes(address, register, &mut value)?;
        Ok(value[0])
    }

    /// Write `[register]`, then read `buffer.len()` bytes
    fn read_register_bytes(
        &mut self,
        address: Address,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), BusError> {
        self.transact(
            address,
            Transaction::WriteRead {
                write: &[register],
                read: buffer,
            },
        )
    }

    /// Set the bits of `mask` in a register
    ///
    /// Reads the current value, ORs in `mask` and writes it back. Bits can
    /// only be set this way, never cleared; use
    /// [`write_register`](Self::write_register) to clear.
    fn mask_register(&mut self, address: Address, register: u8, mask: u8) -> Result<(), BusError> {
        let value = self.read_register(address, register)?;
        self.write_register(address, register, u32::from(value | mask))
    }
}

impl<T: Transport + ?Sized> Registers for T {}
