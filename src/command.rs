//! SSD1306 command definitions
//!
//! This module defines the command bytes used to control the SSD1306 OLED
//! controller and the control bytes that frame them on the I2C bus.
//!
//! ## Wire Framing
//!
//! Every I2C write to the controller starts with a control byte:
//! - [`CONTROL_COMMAND`] (`0x80`, Co=1 D/C#=0): the next byte is a command,
//!   and another control byte follows it.
//! - [`CONTROL_DATA`] (`0x40`, Co=0 D/C#=1): every following byte up to the
//!   stop condition is display RAM data.
//!
//! Multi-byte commands (contrast, multiplex, ...) send each parameter byte
//! as its own command, each behind its own [`CONTROL_COMMAND`].
//!
//! ## Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "linux")]
//! # {
//! use ssd1306_i2cdev::{command, Address, DevTransport, Registers};
//!
//! let mut bus = DevTransport::new("i2c-0");
//! // Display off
//! let _ = bus.write_register_bytes(
//!     Address::SevenBit(0x3C),
//!     command::CONTROL_COMMAND,
//!     &[command::DISPLAY_OFF],
//! );
//! # }
//! ```

// Control bytes

/// Control byte preceding a single command byte (0x80)
pub const CONTROL_COMMAND: u8 = 0x80;

/// Control byte preceding a stream of display RAM data (0x40)
pub const CONTROL_DATA: u8 = 0x40;

// Fundamental commands

/// Set contrast control command (0x81)
///
/// Followed by 1 byte: contrast, 0x00..=0xFF.
pub const SET_CONTRAST: u8 = 0x81;

/// Normal display, bit 1 = pixel on (0xA6)
pub const NORMAL_DISPLAY: u8 = 0xA6;

/// Display off, sleep mode (0xAE)
pub const DISPLAY_OFF: u8 = 0xAE;

/// Display on, normal mode (0xAF)
pub const DISPLAY_ON: u8 = 0xAF;

// Addressing commands

/// Set memory addressing mode command (0x20)
///
/// Followed by 1 byte: 0x00 horizontal, 0x01 vertical, 0x02 page.
pub const SET_MEMORY_MODE: u8 = 0x20;

/// Horizontal addressing mode: column pointer wraps into the next page
pub const MEMORY_MODE_HORIZONTAL: u8 = 0x00;

// Hardware configuration commands

/// Set display start line 0 (0x40 | line)
pub const SET_START_LINE: u8 = 0x40;

/// Segment remap: column 127 mapped to SEG0 (0xA1)
pub const SEGMENT_REMAP: u8 = 0xA1;

/// Set multiplex ratio command (0xA8)
///
/// Followed by 1 byte: ratio - 1.
pub const SET_MULTIPLEX: u8 = 0xA8;

/// Scan from COM[N-1] to COM0 (0xC8)
pub const COM_SCAN_DEC: u8 = 0xC8;

/// Set display offset command (0xD3)
///
/// Followed by 1 byte: vertical shift, 0..=63.
pub const SET_DISPLAY_OFFSET: u8 = 0xD3;

/// Set COM pins hardware configuration command (0xDA)
///
/// Followed by 1 byte; 0x12 is alternative COM pin layout, no left/right remap.
pub const SET_COM_PINS: u8 = 0xDA;

// Timing and driving scheme commands

/// Set display clock divide ratio / oscillator frequency (0xD5)
///
/// Followed by 1 byte: oscillator in the high nibble, divide ratio - 1 in the low.
pub const SET_CLOCK_DIV: u8 = 0xD5;

/// Set pre-charge period command (0xD9)
///
/// Followed by 1 byte: phase 2 in the high nibble, phase 1 in the low.
pub const SET_PRECHARGE: u8 = 0xD9;

/// Set VCOMH deselect level command (0xDB)
pub const SET_VCOM_DETECT: u8 = 0xDB;

/// Charge pump setting command (0x8D)
///
/// Followed by 1 byte: 0x14 enables the pump, 0x10 disables it.
pub const CHARGE_PUMP: u8 = 0x8D;

/// Charge pump enable argument
pub const CHARGE_PUMP_ON: u8 = 0x14;

/// Number of bytes in the startup command sequence
pub const INIT_SEQUENCE_LEN: usize = 24;

/// Startup command sequence for a 128x64 panel with internal charge pump
///
/// Parameter bytes are listed inline after their command. The contrast
/// parameter is taken from the configuration.
pub fn init_sequence(contrast: u8) -> [u8; INIT_SEQUENCE_LEN] {
    [
        DISPLAY_OFF,
        SET_START_LINE,
        SET_CONTRAST,
        contrast,
        SEGMENT_REMAP,
        NORMAL_DISPLAY,
        SET_MULTIPLEX,
        0x3F, // 1/64 duty
        COM_SCAN_DEC,
        SET_DISPLAY_OFFSET,
        0x00,
        SET_CLOCK_DIV,
        0x80,
        SET_PRECHARGE,
        0xF1,
        SET_COM_PINS,
        0x12,
        SET_VCOM_DETECT,
        0x30,
        CHARGE_PUMP,
        CHARGE_PUMP_ON,
        SET_MEMORY_MODE,
        MEMORY_MODE_HORIZONTAL,
        DISPLAY_ON,
    ]
}

/// Length of the startup sequence on the wire, one control byte per command byte
pub const INIT_WIRE_LEN: usize = INIT_SEQUENCE_LEN * 2;

/// Startup sequence as it goes out on the wire
///
/// Each command byte is preceded by [`CONTROL_COMMAND`]:
/// `[0x80, 0xAE, 0x80, 0x40, 0x80, 0x81, 0x80, contrast, ...]`.
pub fn framed_init_sequence(contrast: u8) -> [u8; INIT_WIRE_LEN] {
    let mut framed = [CONTROL_COMMAND; INIT_WIRE_LEN];
    for (pair, &cmd) in framed.chunks_exact_mut(2).zip(init_sequence(contrast).iter()) {
        pair[1] = cmd;
    }
    framed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_sequence_matches_datasheet_table() {
        assert_eq!(
            init_sequence(0xCF),
            [
                0xAE, 0x40, 0x81, 0xCF, 0xA1, 0xA6, 0xA8, 0x3F, 0xC8, 0xD3, 0x00, 0xD5, 0x80,
                0xD9, 0xF1, 0xDA, 0x12, 0xDB, 0x30, 0x8D, 0x14, 0x20, 0x00, 0xAF,
            ]
        );
    }

    #[test]
    fn test_init_sequence_uses_contrast() {
        assert_eq!(init_sequence(0x10)[3], 0x10);
    }

    #[test]
    fn test_framed_init_sequence_interleaves_control_byte() {
        let framed = framed_init_sequence(0xCF);
        assert_eq!(framed.len(), 48);
        assert_eq!(&framed[..8], &[0x80, 0xAE, 0x80, 0x40, 0x80, 0x81, 0x80, 0xCF]);
        assert!(framed.iter().step_by(2).all(|&b| b == CONTROL_COMMAND));
        assert_eq!(&framed[46..], &[0x80, 0xAF]);
    }
}
