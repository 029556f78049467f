//! Graphics support via embedded-graphics
//!
//! This module provides the [`GraphicDisplay`] struct which pairs a
//! [`Display`] with its [`FrameBuffer`] and implements the
//! [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget) trait from
//! the embedded-graphics ecosystem.
//!
//! ## Features
//!
//! - 2D graphics primitives (lines, rectangles, circles, text, etc.)
//! - Rotation support, 90° and 270° present a 64x128 canvas
//! - Raw frame buffer drawing (glyph blocks, bitmaps) on the same buffer
//!
//! Drawing is OR-only like the rest of the frame buffer API:
//! [`BinaryColor::On`] pixels are set, [`BinaryColor::Off`] pixels are left
//! alone. [`DrawTarget::clear`] is the one way to switch pixels off.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X10, MonoTextStyle},
//!     pixelcolor::BinaryColor,
//!     prelude::*,
//!     primitives::{Circle, PrimitiveStyle, Rectangle},
//!     text::Text,
//! };
//! use ssd1306_i2cdev::{Config, Display, GraphicDisplay};
//! # use ssd1306_i2cdev::{Address, BusError, Transaction, Transport};
//! # struct MockBus;
//! # impl Transport for MockBus {
//! #     fn transact(&mut self, _: Address, _: Transaction<'_>) -> Result<(), BusError> {
//! #         Ok(())
//! #     }
//! # }
//! # let bus = MockBus;
//! let mut display = GraphicDisplay::new(Display::new(bus, Config::default()));
//! let _ = display.display_mut().init();
//!
//! let _ = display.clear(BinaryColor::Off);
//!
//! let _ = Rectangle::new(Point::new(0, 0), Size::new(128, 64))
//!     .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
//!     .draw(&mut display);
//!
//! let _ = Circle::new(Point::new(96, 20), 24)
//!     .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
//!     .draw(&mut display);
//!
//! let _ = Text::new(
//!     "Hello, OLED!",
//!     Point::new(6, 30),
//!     MonoTextStyle::new(&FONT_6X10, BinaryColor::On),
//! )
//! .draw(&mut display);
//!
//! // Flush to the panel
//! let _ = display.update();
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::BinaryColor,
    prelude::Pixel,
};

use crate::display::Display;
use crate::error::Error;
use crate::framebuffer::FrameBuffer;
use crate::rotation::apply_rotation;
use crate::transport::Transport;

/// Display with its frame buffer
///
/// This wrapper around [`Display`] provides embedded-graphics support
/// and owns the [`FrameBuffer`] that drawing goes into.
///
/// ## Type Parameters
///
/// * `T` - Bus type implementing [`Transport`]
pub struct GraphicDisplay<T>
where
    T: Transport,
{
    /// The underlying display driver
    display: Display<T>,
    /// Native-orientation pixel buffer
    buffer: FrameBuffer,
}

type GraphicsResult = core::result::Result<(), Error>;

impl<T> GraphicDisplay<T>
where
    T: Transport,
{
    /// Create a new GraphicDisplay with a cleared buffer
    pub fn new(display: Display<T>) -> Self {
        Self {
            display,
            buffer: FrameBuffer::new(),
        }
    }

    /// Flush the buffer to the panel
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the flush transaction failed; the buffer is
    /// kept and the update can simply be repeated.
    pub fn update(&mut self) -> GraphicsResult {
        self.display.redraw(&self.buffer)
    }

    /// Access the underlying Display
    pub fn display(&self) -> &Display<T> {
        &self.display
    }

    /// Access the underlying Display mutably
    ///
    /// Used for [`init`](Display::init) and power control.
    pub fn display_mut(&mut self) -> &mut Display<T> {
        &mut self.display
    }

    /// Access the frame buffer
    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Access the frame buffer mutably
    ///
    /// The buffer always uses native coordinates, whatever the configured
    /// rotation.
    pub fn buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.buffer
    }

    /// Split into driver and buffer
    pub fn release(self) -> (Display<T>, FrameBuffer) {
        (self.display, self.buffer)
    }

    /// Set a single pixel on the rotated canvas
    ///
    /// Internal method used by the [`DrawTarget`] implementation.
    fn set_pixel(&mut self, x: usize, y: usize) {
        let (index, bit) = apply_rotation(x, y, self.display.config().rotation);
        self.buffer.raw_mut()[index] |= bit;
    }
}

impl<T> DrawTarget for GraphicDisplay<T>
where
    T: Transport,
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = self.display.config().rotated_size();

        for Pixel(Point { x, y }, color) in pixels {
            if color.is_off() {
                continue;
            }
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if x >= width || y >= height {
                continue;
            }

            self.set_pixel(x, y);
        }

        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = if color.is_on() { 0xFF } else { 0x00 };
        self.buffer.raw_mut().fill(fill);
        Ok(())
    }
}

impl<T> OriginDimensions for GraphicDisplay<T>
where
    T: Transport,
{
    fn size(&self) -> Size {
        let (width, height) = self.display.config().rotated_size();
        Size::new(width as u32, height as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Builder, Rotation};
    use crate::error::BusError;
    use crate::transport::{Address, Transaction};
    use alloc::vec::Vec;
    use embedded_graphics::{
        prelude::*,
        primitives::{Line, PrimitiveStyle, Rectangle},
    };

    #[derive(Debug, Default)]
    struct MockTransport {
        flushed: Vec<Vec<u8>>,
    }

    impl Transport for MockTransport {
        fn transact(
            &mut self,
            _address: Address,
            transaction: Transaction<'_>,
        ) -> Result<(), BusError> {
            if let Transaction::Write { header, payload } = transaction {
                let mut message = header.to_vec();
                message.extend_from_slice(payload);
                self.flushed.push(message);
            }
            Ok(())
        }
    }

    fn test_display(rotation: Rotation) -> GraphicDisplay<MockTransport> {
        let config = Builder::new().rotation(rotation).build().unwrap();
        GraphicDisplay::new(Display::new(MockTransport::default(), config))
    }

    #[test]
    fn test_size_follows_rotation() {
        assert_eq!(test_display(Rotation::Rotate0).size(), Size::new(128, 64));
        assert_eq!(test_display(Rotation::Rotate90).size(), Size::new(64, 128));
        assert_eq!(test_display(Rotation::Rotate180).size(), Size::new(128, 64));
        assert_eq!(test_display(Rotation::Rotate270).size(), Size::new(64, 128));
    }

    #[test]
    fn test_draw_pixel_matches_frame_buffer() {
        let mut gd = test_display(Rotation::Rotate0);
        Pixel(Point::new(5, 10), BinaryColor::On).draw(&mut gd).unwrap();

        let mut expected = FrameBuffer::new();
        expected.set_pixel(5, 10).unwrap();
        assert_eq!(gd.buffer(), &expected);
    }

    #[test]
    fn test_off_pixels_do_not_clear() {
        let mut gd = test_display(Rotation::Rotate0);
        Pixel(Point::new(0, 0), BinaryColor::On).draw(&mut gd).unwrap();
        Pixel(Point::new(0, 0), BinaryColor::Off).draw(&mut gd).unwrap();
        assert!(gd.buffer().pixel(0, 0));
    }

    #[test]
    fn test_out_of_canvas_pixels_are_ignored() {
        let mut gd = test_display(Rotation::Rotate90);
        Line::new(Point::new(-10, -10), Point::new(200, 200))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut gd)
            .unwrap();
        // 64 points of the diagonal fall on the 64x128 canvas
        let lit: u32 = gd.buffer().as_bytes().iter().map(|b| b.count_ones()).sum();
        assert_eq!(lit, 64);
    }

    #[test]
    fn test_rotate180_maps_origin_to_last_pixel() {
        let mut gd = test_display(Rotation::Rotate180);
        Pixel(Point::new(0, 0), BinaryColor::On).draw(&mut gd).unwrap();
        assert!(gd.buffer().pixel(127, 63));
    }

    #[test]
    fn test_rotate90_maps_origin_to_top_right() {
        let mut gd = test_display(Rotation::Rotate90);
        Pixel(Point::new(0, 0), BinaryColor::On).draw(&mut gd).unwrap();
        assert!(gd.buffer().pixel(127, 0));
    }

    #[test]
    fn test_filled_rectangle_covers_whole_page() {
        let mut gd = test_display(Rotation::Rotate0);
        Rectangle::new(Point::new(0, 8), Size::new(128, 8))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut gd)
            .unwrap();
        let bytes = gd.buffer().as_bytes();
        assert!(bytes[..128].iter().all(|&b| b == 0));
        assert!(bytes[128..256].iter().all(|&b| b == 0xFF));
        assert!(bytes[256..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_clear_fills_buffer() {
        let mut gd = test_display(Rotation::Rotate0);
        gd.clear(BinaryColor::On).unwrap();
        assert!(gd.buffer().as_bytes().iter().all(|&b| b == 0xFF));
        gd.clear(BinaryColor::Off).unwrap();
        assert_eq!(gd.buffer(), &FrameBuffer::new());
    }

    #[test]
    fn test_update_flushes_buffer() {
        let mut gd = test_display(Rotation::Rotate0);
        gd.buffer_mut().set_pixel(127, 63).unwrap();
        gd.update().unwrap();

        let (display, buffer) = gd.release();
        let flushed = &display.transport().flushed;
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0][0], 0x40);
        assert_eq!(&flushed[0][1..], buffer.as_bytes().as_slice());
    }
}
