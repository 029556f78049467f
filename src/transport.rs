//! Bus transport abstraction
//!
//! This module provides the [`Transport`] trait, the single primitive every
//! bus operation goes through, and two ways of implementing it:
//!
//! - [`HalTransport`] adapts any embedded-hal v1.0 [`I2c`] bus.
//! - [`run_session`] drives a per-call [`Session`] (open, address, transfer,
//!   close). The Linux `/dev/i2c-N` transport is built on it (requires the
//!   `linux` feature).
//!
//! ## Transaction Model
//!
//! A transaction is stateless: every call selects the target address,
//! performs exactly one [`Transaction`], and releases the bus. The outcome is
//! all-or-nothing. Register-level helpers live in [`crate::register`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
//! use ssd1306_i2cdev::{Address, HalTransport, Transaction, Transport};
//! # struct MockI2c;
//! # impl ErrorType for MockI2c { type Error = ErrorKind; }
//! # impl I2c for MockI2c {
//! #     fn transaction(
//! #         &mut self,
//! #         _address: u8,
//! #         _operations: &mut [Operation<'_>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! let mut transport = HalTransport::new(MockI2c);
//!
//! // Display off, framed with the command control byte
//! let _ = transport.transact(
//!     Address::SevenBit(0x3C),
//!     Transaction::Write { header: &[0x80], payload: &[0xAE] },
//! );
//! ```

use embedded_hal::i2c::{Error as _, ErrorKind, I2c, NoAcknowledgeSource};

use crate::error::BusError;

/// Target address on the bus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Address {
    /// Seven-bit address (0x00..=0x7F)
    SevenBit(u8),
    /// Ten-bit address (0x000..=0x3FF)
    TenBit(u16),
}

impl Address {
    /// Whether the address fits its addressing mode
    pub fn is_valid(self) -> bool {
        match self {
            Self::SevenBit(addr) => addr <= 0x7F,
            Self::TenBit(addr) => addr <= 0x3FF,
        }
    }

    /// The raw address value
    pub fn raw(self) -> u16 {
        match self {
            Self::SevenBit(addr) => u16::from(addr),
            Self::TenBit(addr) => addr,
        }
    }
}

/// One bus transaction
///
/// Each variant is executed against a freshly selected target and is never
/// split across calls.
#[derive(Debug)]
pub enum Transaction<'a> {
    /// Write `header` immediately followed by `payload` as one message
    ///
    /// The header is where register framing goes (a register index or a
    /// control byte); raw writes leave it empty.
    Write {
        /// Leading bytes (may be empty)
        header: &'a [u8],
        /// Data bytes
        payload: &'a [u8],
    },
    /// Read `buffer.len()` bytes
    Read {
        /// Destination, zero-filled before the read
        buffer: &'a mut [u8],
    },
    /// Write `write`, then read `read.len()` bytes on the same handle
    WriteRead {
        /// Bytes to write first (typically a register index)
        write: &'a [u8],
        /// Destination, zero-filled before the read
        read: &'a mut [u8],
    },
}

/// Trait for addressed bus transactions
///
/// This trait abstracts over different bus implementations, allowing the
/// [`Display`](crate::display::Display) and the register helpers to work with
/// a Linux device file, an embedded-hal bus, or a test double.
///
/// ## Implementing
///
/// An implementation must perform exactly one transaction per call and must
/// not rely on state left behind by a previous call. Any failing stage fails
/// the whole call.
pub trait Transport {
    /// Execute one transaction against `address`
    ///
    /// # Errors
    ///
    /// Returns the [`BusError`] of the first failing stage, or
    /// [`BusError::CloseFailed`] if only releasing the bus failed.
    fn transact(&mut self, address: Address, transaction: Transaction<'_>)
    -> Result<(), BusError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn transact(
        &mut self,
        address: Address,
        transaction: Transaction<'_>,
    ) -> Result<(), BusError> {
        (**self).transact(address, transaction)
    }
}

/// An open handle to a bus device, valid for one transaction
///
/// [`run_session`] drives a session through its whole lifecycle; a session
/// is consumed by [`close`](Session::close) and never reused.
pub trait Session: Sized {
    /// Select addressing mode and target address
    fn configure(&mut self, address: Address) -> Result<(), BusError>;

    /// Write `header` followed by `payload` as a single message
    ///
    /// Returns the number of bytes the bus accepted.
    fn write(&mut self, header: &[u8], payload: &[u8]) -> Result<usize, BusError>;

    /// Read into `buffer`, returning the number of bytes received
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, BusError>;

    /// Release the handle
    fn close(self) -> Result<(), BusError>;
}

/// Run one transaction on an already opened session
///
/// Configures the address, performs the transfer and always closes the
/// session. If the transfer failed, its error is returned and a close error
/// is only logged. If the transfer succeeded but closing failed, the whole
/// transaction fails with [`BusError::CloseFailed`].
///
/// # Errors
///
/// See [`Transport::transact`].
pub fn run_session<S: Session>(
    mut session: S,
    address: Address,
    transaction: Transaction<'_>,
) -> Result<(), BusError> {
    let outcome = if address.is_valid() {
        session
            .configure(address)
            .and_then(|()| perform(&mut session, transaction))
    } else {
        Err(BusError::AddressingFailed)
    };
    let closed = session.close();

    match (outcome, closed) {
        (Err(e), Err(close_err)) => {
            log::warn!("close failed after {e}: {close_err}");
            Err(e)
        }
        (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
        (Ok(()), Ok(())) => Ok(()),
    }
}

fn perform<S: Session>(session: &mut S, transaction: Transaction<'_>) -> Result<(), BusError> {
    match transaction {
        Transaction::Write { header, payload } => {
            let requested = header.len() + payload.len();
            expect_count(requested, session.write(header, payload)?)
        }
        Transaction::Read { buffer } => {
            buffer.fill(0);
            expect_count(buffer.len(), session.read(buffer)?)
        }
        Transaction::WriteRead { write, read } => {
            expect_count(write.len(), session.write(&[], write)?)?;
            read.fill(0);
            expect_count(read.len(), session.read(read)?)
        }
    }
}

fn expect_count(requested: usize, transferred: usize) -> Result<(), BusError> {
    if transferred == requested {
        Ok(())
    } else {
        Err(BusError::ShortTransfer {
            requested,
            transferred,
        })
    }
}

/// [`Transport`] over an embedded-hal v1.0 I2C bus
///
/// The bus is owned for the lifetime of the transport, but every call is
/// still a self-contained transaction. Only seven-bit addresses are
/// supported; ten-bit targets fail with [`BusError::AddressingFailed`].
///
/// Bus errors are folded into [`BusError`]: a NACK on the address byte is an
/// addressing failure, anything else is a transfer failure.
pub struct HalTransport<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> HalTransport<I2C> {
    /// Wrap an I2C bus
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Give back the wrapped bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> Transport for HalTransport<I2C> {
    fn transact(
        &mut self,
        address: Address,
        transaction: Transaction<'_>,
    ) -> Result<(), BusError> {
        let Address::SevenBit(addr) = address else {
            return Err(BusError::AddressingFailed);
        };
        if !address.is_valid() {
            return Err(BusError::AddressingFailed);
        }

        match transaction {
            Transaction::Write { header, payload } => {
                let requested = header.len() + payload.len();
                let result = if header.is_empty() {
                    self.i2c.write(addr, payload)
                } else {
                    // Adjacent writes go out as one message.
                    self.i2c.transaction(
                        addr,
                        &mut [
                            embedded_hal::i2c::Operation::Write(header),
                            embedded_hal::i2c::Operation::Write(payload),
                        ],
                    )
                };
                result.map_err(|e| map_hal_error(e.kind(), requested))
            }
            Transaction::Read { buffer } => {
                buffer.fill(0);
                let requested = buffer.len();
                self.i2c
                    .read(addr, buffer)
                    .map_err(|e| map_hal_error(e.kind(), requested))
            }
            Transaction::WriteRead { write, read } => {
                self.i2c
                    .write(addr, write)
                    .map_err(|e| map_hal_error(e.kind(), write.len()))?;
                read.fill(0);
                let requested = read.len();
                self.i2c
                    .read(addr, read)
                    .map_err(|e| map_hal_error(e.kind(), requested))
            }
        }
    }
}

fn map_hal_error(kind: ErrorKind, requested: usize) -> BusError {
    log::warn!("i2c bus error: {kind:?}");
    match kind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => BusError::AddressingFailed,
        _ => BusError::ShortTransfer {
            requested,
            transferred: 0,
        },
    }
}
