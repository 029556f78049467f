//! Glyph table lookup
//!
//! Text drawing uses fixed 8x16 glyphs stored in the frame buffer's native
//! format: column-major, two 8-pixel row groups per column, LSB at the top.
//! The glyph data itself is supplied by the caller; this module only wraps
//! it and bounds the lookup to printable ASCII.

/// First character with a glyph (space)
pub const FIRST_CHAR: char = ' ';

/// Last character with a glyph (tilde)
pub const LAST_CHAR: char = '~';

/// Number of glyphs in a table
pub const GLYPH_COUNT: usize = 95;

/// Glyph width in pixels (buffer columns)
pub const GLYPH_WIDTH: usize = 8;

/// Glyph height in 8-pixel row groups
pub const GLYPH_ROWS: usize = 2;

/// Bytes per glyph
pub const GLYPH_BYTES: usize = GLYPH_WIDTH * GLYPH_ROWS;

/// One packed 8x16 glyph
///
/// Byte order: column 0 top half, column 0 bottom half, column 1 top half, ...
pub type Glyph = [u8; GLYPH_BYTES];

/// Read-only table of 95 glyphs for ASCII 32..=126
#[derive(Clone, Copy, Debug)]
pub struct GlyphTable<'a> {
    glyphs: &'a [Glyph; GLYPH_COUNT],
}

impl<'a> GlyphTable<'a> {
    /// Wrap a glyph table, index 0 being the space character
    pub const fn new(glyphs: &'a [Glyph; GLYPH_COUNT]) -> Self {
        Self { glyphs }
    }

    /// Whether `ch` has a glyph
    pub fn is_printable(ch: char) -> bool {
        (FIRST_CHAR..=LAST_CHAR).contains(&ch)
    }

    /// Look up the glyph for `ch`
    ///
    /// Returns `None` for anything outside printable ASCII.
    pub fn glyph(&self, ch: char) -> Option<&'a Glyph> {
        if !Self::is_printable(ch) {
            return None;
        }
        self.glyphs.get(ch as usize - FIRST_CHAR as usize)
    }
}
