//! Linux `/dev/i2c-N` transport
//!
//! Every transaction opens the bus device, selects the addressing mode and
//! target with the `I2C_TENBIT` and `I2C_SLAVE` ioctls, performs one
//! `write(2)`/`read(2)` sequence and closes the descriptor again. Nothing is
//! cached between calls, so several drivers (or processes) can share a bus
//! as long as each transaction completes on its own.
//!
//! The close result is checked: a transaction whose descriptor fails to
//! close is reported as failed.

#![allow(unsafe_code)]

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::fd::{AsRawFd, IntoRawFd};
use std::path::{Path, PathBuf};
use std::vec::Vec;

use crate::error::BusError;
use crate::transport::{Address, Session, Transaction, Transport, run_session};

/// Select the target address (`linux/i2c-dev.h`)
const I2C_SLAVE: libc::Ioctl = 0x0703;

/// Select ten-bit (1) or seven-bit (0) addressing (`linux/i2c-dev.h`)
const I2C_TENBIT: libc::Ioctl = 0x0704;

/// [`Transport`] over a Linux i2c-dev character device
///
/// Holds only the device path; the device is opened per transaction.
///
/// ```rust,no_run
/// use ssd1306_i2cdev::{Config, DevTransport, Display};
///
/// let mut display = Display::new(DevTransport::new("i2c-1"), Config::default());
/// if let Err(err) = display.init() {
///     let _ = err;
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DevTransport {
    path: PathBuf,
}

impl DevTransport {
    /// Bus by device name, resolved under `/dev`
    ///
    /// `"i2c-0"` becomes `/dev/i2c-0`. An absolute path is used as is.
    pub fn new(device: impl AsRef<Path>) -> Self {
        Self {
            path: Path::new("/dev").join(device),
        }
    }

    /// Bus at an explicit device path
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Device path opened for each transaction
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<DevSession, BusError> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map(|file| DevSession { file })
            .map_err(|err| {
                log::warn!("open {} failed: {err}", self.path.display());
                BusError::OpenFailed
            })
    }
}

impl Transport for DevTransport {
    fn transact(
        &mut self,
        address: Address,
        transaction: Transaction<'_>,
    ) -> Result<(), BusError> {
        let session = self.open()?;
        run_session(session, address, transaction)
    }
}

/// One open descriptor of the bus device
struct DevSession {
    file: File,
}

impl DevSession {
    fn ioctl(&self, request: libc::Ioctl, arg: libc::c_ulong) -> io::Result<()> {
        // SAFETY: the descriptor is owned by `self.file` and open for the
        // duration of the call; both requests take an integer argument.
        let rc = unsafe { libc::ioctl(self.file.as_raw_fd(), request, arg) };
        if rc < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }
}

impl Session for DevSession {
    fn configure(&mut self, address: Address) -> Result<(), BusError> {
        let tenbit = libc::c_ulong::from(matches!(address, Address::TenBit(_)));
        self.ioctl(I2C_TENBIT, tenbit)
            .and_then(|()| self.ioctl(I2C_SLAVE, libc::c_ulong::from(address.raw())))
            .map_err(|err| {
                log::warn!("selecting {address:?} failed: {err}");
                BusError::AddressingFailed
            })
    }

    fn write(&mut self, header: &[u8], payload: &[u8]) -> Result<usize, BusError> {
        let requested = header.len() + payload.len();
        // One write(2) is one bus message, so the parts must be contiguous
        let result = if header.is_empty() {
            self.file.write(payload)
        } else {
            let mut message = Vec::with_capacity(requested);
            message.extend_from_slice(header);
            message.extend_from_slice(payload);
            self.file.write(&message)
        };
        result.map_err(|err| {
            log::warn!("write of {requested} bytes failed: {err}");
            BusError::ShortTransfer {
                requested,
                transferred: 0,
            }
        })
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, BusError> {
        let requested = buffer.len();
        self.file.read(buffer).map_err(|err| {
            log::warn!("read of {requested} bytes failed: {err}");
            BusError::ShortTransfer {
                requested,
                transferred: 0,
            }
        })
    }

    fn close(self) -> Result<(), BusError> {
        let fd = self.file.into_raw_fd();
        // SAFETY: `into_raw_fd` released ownership, so this is the only close.
        if unsafe { libc::close(fd) } != 0 {
            log::warn!("close failed: {}", io::Error::last_os_error());
            return Err(BusError::CloseFailed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::format;

    struct TempFile(PathBuf);

    impl TempFile {
        fn new(tag: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "ssd1306-i2cdev-{tag}-{}",
                std::process::id()
            ));
            File::create(&path).unwrap();
            Self(path)
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn test_device_name_resolves_under_dev() {
        assert_eq!(DevTransport::new("i2c-0").path(), Path::new("/dev/i2c-0"));
        assert_eq!(
            DevTransport::new("/tmp/fake-bus").path(),
            Path::new("/tmp/fake-bus")
        );
        assert_eq!(
            DevTransport::from_path("/dev/i2c-7").path(),
            Path::new("/dev/i2c-7")
        );
    }

    #[test]
    fn test_missing_device_is_open_failure() {
        let mut bus = DevTransport::from_path("/nonexistent/ssd1306-i2cdev/i2c-99");
        let result = bus.transact(
            Address::SevenBit(0x3C),
            Transaction::Write {
                header: &[0x80],
                payload: &[0xAF],
            },
        );
        assert_eq!(result, Err(BusError::OpenFailed));
    }

    #[test]
    fn test_regular_file_rejects_address_selection() {
        let file = TempFile::new("addr");
        let mut bus = DevTransport::from_path(&file.0);
        let result = bus.transact(
            Address::SevenBit(0x3C),
            Transaction::Write {
                header: &[0x80],
                payload: &[0xAF],
            },
        );
        assert_eq!(result, Err(BusError::AddressingFailed));
        // Nothing was written past the failed ioctl
        assert_eq!(std::fs::metadata(&file.0).unwrap().len(), 0);
    }

    #[test]
    fn test_invalid_address_fails_before_ioctl() {
        let file = TempFile::new("invalid");
        let mut bus = DevTransport::from_path(&file.0);
        let mut buf = [0u8; 1];
        let result = bus.transact(Address::TenBit(0x400), Transaction::Read { buffer: &mut buf });
        assert_eq!(result, Err(BusError::AddressingFailed));
    }
}
