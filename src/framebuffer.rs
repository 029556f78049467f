//! In-memory frame buffer
//!
//! The buffer mirrors the controller's display RAM in horizontal addressing
//! mode: 8 pages of 128 bytes, each byte one column of 8 vertically stacked
//! pixels with the least significant bit on top.
//!
//! ```text
//!        x=0   x=1         x=127
//! page 0 [   0][   1] ... [ 127]   y = 0..=7
//! page 1 [ 128][ 129] ... [ 255]   y = 8..=15
//!  ...
//! page 7 [ 896][ 897] ... [1023]   y = 56..=63
//! ```
//!
//! Pixel `(x, y)` lives in byte `(y >> 3) * 128 + x`, bit `y & 7`.
//!
//! Every drawing operation only touches memory; nothing reaches the panel
//! until [`Display::redraw`](crate::Display::redraw). Drawing only sets
//! bits, so overlapping drawings combine; use [`FrameBuffer::clear`] to
//! start over.

use crate::config::{BUFFER_SIZE, HEIGHT, WIDTH};
use crate::error::Error;
use crate::font::{GLYPH_ROWS, GLYPH_WIDTH, GlyphTable};

/// Buffer offsets of the four 16-pixel text lines
pub const LINE_OFFSETS: [usize; 4] = [0, 256, 512, 768];

/// Locate a pixel: (byte index, bit mask)
///
/// Coordinates must already be within 128x64.
pub fn pixel_index(x: usize, y: usize) -> (usize, u8) {
    (((y & 0xF8) << 4) + x, 1 << (y & 7))
}

/// 128x64 monochrome frame buffer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    bytes: [u8; BUFFER_SIZE],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Create a cleared buffer
    pub const fn new() -> Self {
        Self {
            bytes: [0; BUFFER_SIZE],
        }
    }

    /// Zero every pixel
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Turn on the pixel at `(x, y)`
    ///
    /// Setting a pixel twice is the same as setting it once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PixelOutOfBounds`] unless `0 <= x < 128` and
    /// `0 <= y < 64`; the buffer is left untouched.
    pub fn set_pixel(&mut self, x: i32, y: i32) -> Result<(), Error> {
        let (Some(px), Some(py)) = (checked_coord(x, WIDTH), checked_coord(y, HEIGHT)) else {
            return Err(Error::PixelOutOfBounds { x, y });
        };
        let (index, bit) = pixel_index(px, py);
        self.bytes[index] |= bit;
        Ok(())
    }

    /// Whether the pixel at `(x, y)` is on
    ///
    /// Out-of-bounds coordinates read as off.
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        match (checked_coord(x, WIDTH), checked_coord(y, HEIGHT)) {
            (Some(px), Some(py)) => {
                let (index, bit) = pixel_index(px, py);
                self.bytes[index] & bit != 0
            }
            _ => false,
        }
    }

    /// Copy a column-major packed block into the buffer
    ///
    /// For column `c` in `0..cols` and row group `r` in `0..rows`,
    /// `buffer[offset + r * 128 + c]` takes the next byte of `data`. Columns
    /// past the end of a page continue on the next page, as the linear
    /// offset dictates.
    ///
    /// # Arguments
    ///
    /// * `rows` - Number of 8-pixel row groups
    /// * `cols` - Number of columns
    /// * `data` - Packed bytes, `rows` per column
    /// * `offset` - Buffer index of the top-left byte
    ///
    /// # Errors
    ///
    /// - [`Error::GlyphDataTooShort`] if `data` holds fewer than `rows * cols` bytes
    /// - [`Error::BlockOutOfBounds`] if the block would write past byte 1023
    ///
    /// The buffer is untouched on error.
    pub fn draw_glyph_block(
        &mut self,
        rows: usize,
        cols: usize,
        data: &[u8],
        offset: usize,
    ) -> Result<(), Error> {
        let required = rows.saturating_mul(cols);
        if data.len() < required {
            return Err(Error::GlyphDataTooShort {
                required,
                provided: data.len(),
            });
        }
        if !block_fits(offset, rows, cols) {
            return Err(Error::BlockOutOfBounds { offset, rows, cols });
        }
        self.blit(rows, cols, data, offset);
        Ok(())
    }

    /// Draw 8x16 text starting at a buffer offset
    ///
    /// Each character is drawn with [`draw_glyph_block`](Self::draw_glyph_block)
    /// and the offset advances by 8. Drawing stops at the first glyph that
    /// would not fit before the end of the buffer. [`LINE_OFFSETS`] holds the
    /// offsets of the four text lines.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCharacter`] for the first character
    /// outside printable ASCII; nothing is drawn in that case.
    pub fn draw_text(
        &mut self,
        text: &str,
        glyphs: &GlyphTable<'_>,
        offset: usize,
    ) -> Result<(), Error> {
        if let Some(ch) = text.chars().find(|&ch| !GlyphTable::is_printable(ch)) {
            return Err(Error::UnsupportedCharacter(ch));
        }
        self.render_text(text, glyphs, offset);
        Ok(())
    }

    /// Draw a packed bitmap with its top-left corner at pixel `(x, y)`
    ///
    /// `bitmap` uses the buffer's native column-major format, `height / 8`
    /// bytes per column. Does nothing unless all of these hold:
    ///
    /// - `bitmap` is present and holds `width * height / 8` bytes
    /// - `height` is a multiple of 8 and `y` is page aligned (multiple of 8)
    /// - `x >= 0`, `y >= 0`, `x + width <= 128`, `y + height <= 64`
    pub fn draw_bitmap_at(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        bitmap: Option<&[u8]>,
    ) {
        let Some(bitmap) = bitmap else {
            log::trace!("bitmap at ({x}, {y}) skipped: no data");
            return;
        };
        let Some((offset, rows, cols)) = bitmap_placement(x, y, width, height) else {
            log::trace!("bitmap {width}x{height} at ({x}, {y}) skipped: outside canvas");
            return;
        };
        if bitmap.len() < rows * cols {
            log::trace!(
                "bitmap {width}x{height} skipped: {} bytes, need {}",
                bitmap.len(),
                rows * cols
            );
            return;
        }
        self.blit(rows, cols, bitmap, offset);
    }

    /// Draw 8x16 text with its top-left corner at pixel `(x, y)`
    ///
    /// Does nothing unless `0 <= x < 128`, `0 <= y <= 56` and `y` is a
    /// multiple of 8. Characters advance 8 pixels each; characters without a
    /// glyph are skipped but still take up their 8 pixels. Stops at the first
    /// glyph that would not fit before the end of the buffer.
    pub fn draw_text_at(&mut self, x: i32, y: i32, text: &str, glyphs: &GlyphTable<'_>) {
        if !(0..WIDTH as i32).contains(&x) || !(0..=56).contains(&y) || y % 8 != 0 {
            log::trace!("text at ({x}, {y}) skipped: invalid position");
            return;
        }
        let offset = ((y as usize) << 4) + x as usize;
        self.render_text(text, glyphs, offset);
    }

    /// The raw buffer, page-major, as it goes out on the wire
    pub fn as_bytes(&self) -> &[u8; BUFFER_SIZE] {
        &self.bytes
    }

    /// Mutable access to the raw buffer
    ///
    /// Bypasses every check of the drawing operations (bounds, OR-only
    /// updates, glyph validation); only the byte layout described in the
    /// module docs still applies.
    pub fn raw_mut(&mut self) -> &mut [u8; BUFFER_SIZE] {
        &mut self.bytes
    }

    fn render_text(&mut self, text: &str, glyphs: &GlyphTable<'_>, mut offset: usize) {
        for ch in text.chars() {
            if !block_fits(offset, GLYPH_ROWS, GLYPH_WIDTH) {
                log::trace!("text truncated at offset {offset}");
                break;
            }
            if let Some(glyph) = glyphs.glyph(ch) {
                self.blit(GLYPH_ROWS, GLYPH_WIDTH, glyph, offset);
            }
            offset += GLYPH_WIDTH;
        }
    }

    /// Copy without checks; callers validate with [`block_fits`] first
    fn blit(&mut self, rows: usize, cols: usize, data: &[u8], offset: usize) {
        if rows == 0 {
            return;
        }
        for (c, column) in data.chunks_exact(rows).take(cols).enumerate() {
            for (r, &byte) in column.iter().enumerate() {
                self.bytes[offset + r * WIDTH + c] = byte;
            }
        }
    }
}

fn checked_coord(value: i32, limit: usize) -> Option<usize> {
    usize::try_from(value).ok().filter(|&v| v < limit)
}

/// Whether a `rows` x `cols` block at `offset` stays inside the buffer
fn block_fits(offset: usize, rows: usize, cols: usize) -> bool {
    if rows == 0 || cols == 0 {
        return true;
    }
    (rows - 1)
        .checked_mul(WIDTH)
        .and_then(|span| span.checked_add(cols))
        .and_then(|span| span.checked_add(offset))
        .is_some_and(|end| end <= BUFFER_SIZE)
}

/// Validate a bitmap rectangle, returning (offset, rows, cols)
fn bitmap_placement(x: i32, y: i32, width: u32, height: u32) -> Option<(usize, usize, usize)> {
    if x < 0 || y < 0 || height % 8 != 0 || y % 8 != 0 {
        return None;
    }
    if i64::from(x) + i64::from(width) > WIDTH as i64
        || i64::from(y) + i64::from(height) > HEIGHT as i64
    {
        return None;
    }
    let offset = ((y as usize) << 4) + x as usize;
    Some((offset, (height / 8) as usize, width as usize))
}
