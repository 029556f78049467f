//! Coordinate rotation utilities
//!
//! This module maps logical pixel coordinates of the (possibly rotated)
//! drawing surface onto the native 128x64 frame buffer.
//!
//! The controller stores pixels page-major: each byte holds 8 vertically
//! stacked pixels of one column, least significant bit on top. Rotation is
//! applied to the coordinates first, then the native layout is used.
//!
//! ## Rotation Modes
//!
//! - **Rotate0**: Native orientation, 128x64
//! - **Rotate90**: 90° clockwise, 64x128, logical origin at the native top-right
//! - **Rotate180**: 180° rotation, origin at the native bottom-right
//! - **Rotate270**: 270° clockwise, 64x128, logical origin at the native bottom-left
//!
//! ## Example
//!
//! ```
//! use ssd1306_i2cdev::{rotation::apply_rotation, Rotation};
//!
//! // Pixel (0, 9) natively is in page 1, byte 128, bit 1
//! let (idx, bit) = apply_rotation(0, 9, Rotation::Rotate0);
//! assert_eq!(idx, 128);
//! assert_eq!(bit, 0x02);
//!
//! // Rotated 180° the logical origin is the last pixel of the buffer
//! let (idx, bit) = apply_rotation(0, 0, Rotation::Rotate180);
//! assert_eq!(idx, 1023);
//! assert_eq!(bit, 0x80);
//! ```

use crate::config::{HEIGHT, Rotation, WIDTH};
use crate::framebuffer::pixel_index;

/// Map logical coordinates to native panel coordinates
///
/// `x` and `y` must lie within the rotated canvas
/// ([`Config::rotated_size`](crate::Config::rotated_size)).
pub fn to_native(x: usize, y: usize, rotation: Rotation) -> (usize, usize) {
    match rotation {
        Rotation::Rotate0 => (x, y),
        Rotation::Rotate90 => (WIDTH - 1 - y, x),
        Rotation::Rotate180 => (WIDTH - 1 - x, HEIGHT - 1 - y),
        Rotation::Rotate270 => (y, HEIGHT - 1 - x),
    }
}

/// Apply rotation transformation to get buffer index and bit mask
///
/// Converts logical (x, y) coordinates to the physical buffer location
/// (byte_index, bit_mask) for the specified rotation.
///
/// # Arguments
///
/// * `x` - X coordinate (column) on the rotated canvas
/// * `y` - Y coordinate (row) on the rotated canvas
/// * `rotation` - Rotation mode
///
/// # Returns
///
/// - `byte_index`: Index into the 1024-byte frame buffer
/// - `bit_mask`: Bit within the byte (0x01 is the top row of a page)
pub fn apply_rotation(x: usize, y: usize, rotation: Rotation) -> (usize, u8) {
    let (px, py) = to_native(x, y, rotation);
    pixel_index(px, py)
}
