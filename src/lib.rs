//! SSD1306 OLED Display Driver
//!
//! A driver for 128x64 monochrome OLED panels built on the SSD1306
//! controller, talking I2C through the Linux i2c-dev interface or any
//! embedded-hal bus.
//!
//! ## Features
//!
//! - `no_std` compatible core
//! - Linux `/dev/i2c-N` transport (with `linux` feature)
//! - `embedded-hal` v1.0 I2C support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Generic register access for other devices on the same bus
//! - Glyph, text and bitmap drawing into a page-major frame buffer
//! - Rotation support (graphics layer)
//!
//! ## Usage
//!
//! ```rust,no_run
//! # #[cfg(feature = "linux")]
//! # {
//! use ssd1306_i2cdev::{Builder, DevTransport, Display, FrameBuffer};
//!
//! let config = match Builder::new().contrast(0x7F).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::new(DevTransport::new("i2c-0"), config);
//! let _ = display.init();
//!
//! let mut buffer = FrameBuffer::new();
//! for x in 0..128 {
//!     let _ = buffer.set_pixel(x, 32);
//! }
//! let _ = display.redraw(&buffer);
//! # }
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

/// SSD1306 command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Glyph table lookup
pub mod font;
/// In-memory frame buffer
pub mod framebuffer;
/// Register-level bus operations
pub mod register;
/// Coordinate rotation utilities
pub mod rotation;
/// Bus transport abstraction
pub mod transport;

/// Linux i2c-dev transport (requires `linux` feature)
#[cfg(feature = "linux")]
pub mod linux;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use config::{
    BUFFER_SIZE, Builder, Config, DEFAULT_ADDRESS, DEFAULT_CONTRAST, HEIGHT, Rotation, WIDTH,
};
pub use display::{Display, PowerState};
pub use error::{BuilderError, BusError, Error};
pub use font::{Glyph, GlyphTable};
pub use framebuffer::{FrameBuffer, LINE_OFFSETS};
pub use register::{MAX_TRANSFER, Registers, encode_value};
pub use transport::{Address, HalTransport, Session, Transaction, Transport, run_session};

#[cfg(feature = "linux")]
pub use linux::DevTransport;

#[cfg(feature = "graphics")]
pub use graphics::GraphicDisplay;
