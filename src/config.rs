//! Display configuration types and builder

pub use crate::error::BuilderError;
use crate::transport::Address;

/// Panel width in pixels (segment outputs)
pub const WIDTH: usize = 128;

/// Panel height in pixels (COM outputs)
pub const HEIGHT: usize = 64;

/// Number of 8-row pages
pub const PAGES: usize = HEIGHT / 8;

/// Frame buffer size in bytes, one bit per pixel
pub const BUFFER_SIZE: usize = WIDTH * PAGES;

/// Default seven-bit controller address
///
/// Most 128x64 modules strap SA0 low; modules with SA0 high answer on 0x3D.
pub const DEFAULT_ADDRESS: Address = Address::SevenBit(0x3C);

/// Default contrast sent during initialization
pub const DEFAULT_CONTRAST: u8 = 0xCF;

/// Display rotation relative to native orientation
///
/// Only applies to the embedded-graphics drawing surface; the raw frame
/// buffer API always uses native coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

/// Display configuration
///
/// Use [`Builder`] to create a Config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Controller bus address
    pub address: Address,
    /// Contrast value sent with the contrast command during init
    pub contrast: u8,
    /// Drawing rotation
    pub rotation: Rotation,
}

impl Config {
    /// Get the logical (width, height) after rotation
    pub fn rotated_size(&self) -> (usize, usize) {
        match self.rotation {
            Rotation::Rotate0 | Rotation::Rotate180 => (WIDTH, HEIGHT),
            Rotation::Rotate90 | Rotation::Rotate270 => (HEIGHT, WIDTH),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            contrast: DEFAULT_CONTRAST,
            rotation: Rotation::Rotate0,
        }
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```
/// use ssd1306_i2cdev::{Address, Builder, Rotation};
///
/// let config = match Builder::new()
///     .address(Address::SevenBit(0x3D))
///     .rotation(Rotation::Rotate180)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.contrast, 0xCF);
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the controller bus address (default 7-bit `0x3C`)
    pub fn address(mut self, address: Address) -> Self {
        self.config.address = address;
        self
    }

    /// Set the contrast sent during init (default `0xCF`)
    pub fn contrast(mut self, contrast: u8) -> Self {
        self.config.contrast = contrast;
        self
    }

    /// Set drawing rotation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidAddress`] if the address does not fit
    /// its addressing mode.
    pub fn build(self) -> Result<Config, BuilderError> {
        if !self.config.address.is_valid() {
            return Err(BuilderError::InvalidAddress(self.config.address.raw()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_size() {
        assert_eq!(BUFFER_SIZE, 1024);
        assert_eq!(PAGES, 8);
    }

    #[test]
    fn test_builder_defaults() {
        let config = Builder::new().build().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.address, Address::SevenBit(0x3C));
        assert_eq!(config.contrast, 0xCF);
        assert_eq!(config.rotation, Rotation::Rotate0);
    }

    #[test]
    fn test_builder_rejects_wide_seven_bit_address() {
        let result = Builder::new().address(Address::SevenBit(0xBC)).build();
        assert_eq!(result, Err(BuilderError::InvalidAddress(0xBC)));
    }

    #[test]
    fn test_builder_accepts_ten_bit_address() {
        let config = Builder::new()
            .address(Address::TenBit(0x2F0))
            .build()
            .unwrap();
        assert_eq!(config.address, Address::TenBit(0x2F0));
    }

    #[test]
    fn test_builder_rejects_wide_ten_bit_address() {
        let result = Builder::new().address(Address::TenBit(0x400)).build();
        assert!(matches!(result, Err(BuilderError::InvalidAddress(0x400))));
    }

    #[test]
    fn test_rotated_size() {
        let config = Builder::new()
            .rotation(Rotation::Rotate90)
            .build()
            .unwrap();
        assert_eq!(config.rotated_size(), (64, 128));
        let config = Builder::new()
            .rotation(Rotation::Rotate180)
            .build()
            .unwrap();
        assert_eq!(config.rotated_size(), (128, 64));
    }
}
