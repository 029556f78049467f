//! Core display operations

use crate::command::{CONTROL_COMMAND, CONTROL_DATA, DISPLAY_OFF, DISPLAY_ON, framed_init_sequence};
use crate::config::Config;
use crate::error::Error;
use crate::framebuffer::FrameBuffer;
use crate::register::Registers;
use crate::transport::Transport;

type DisplayResult = core::result::Result<(), Error>;

/// Panel power state as last commanded by the driver
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PowerState {
    /// [`Display::init`] has not succeeded yet
    #[default]
    Uninitialized,
    /// Panel is on
    On,
    /// Panel is off (sleep mode, display RAM retained)
    Off,
}

/// Core display driver for SSD1306
///
/// This struct provides the controller-level operations: the startup
/// sequence, panel power and flushing a [`FrameBuffer`]. Drawing happens on
/// the frame buffer, which the caller owns. For embedded-graphics support,
/// use `GraphicDisplay` (requires `graphics` feature).
///
/// Each operation is a single bus transaction. A failed operation leaves
/// the driver state as it was and is never retried.
pub struct Display<T>
where
    T: Transport,
{
    /// Bus transport
    transport: T,
    /// Display configuration
    config: Config,
    /// Last power state the panel acknowledged
    state: PowerState,
}

impl<T> Display<T>
where
    T: Transport,
{
    /// Create a new Display instance
    ///
    /// No bus traffic happens until [`init`](Self::init).
    pub fn new(transport: T, config: Config) -> Self {
        Self {
            transport,
            config,
            state: PowerState::Uninitialized,
        }
    }

    /// Send the startup sequence and switch the panel on
    ///
    /// The 24 startup bytes go out in one transaction, each preceded by the
    /// command control byte (48 bytes on the wire). May be repeated, e.g.
    /// after the panel lost power.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transaction failed; the power state is
    /// unchanged.
    pub fn init(&mut self) -> DisplayResult {
        let framed = framed_init_sequence(self.config.contrast);
        log::debug!(
            "initializing display at {:?}, contrast {:#04x}",
            self.config.address,
            self.config.contrast
        );
        // The first control byte travels as the register byte
        self.transport
            .write_register_bytes(self.config.address, CONTROL_COMMAND, &framed[1..])?;
        self.state = PowerState::On;
        Ok(())
    }

    /// Switch the panel on or off
    ///
    /// Display RAM is kept while the panel is off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transaction failed; the power state is
    /// unchanged.
    pub fn turn_on_off(&mut self, on: bool) -> DisplayResult {
        let (command, state) = if on {
            (DISPLAY_ON, PowerState::On)
        } else {
            (DISPLAY_OFF, PowerState::Off)
        };
        self.transport
            .write_register_bytes(self.config.address, CONTROL_COMMAND, &[command])?;
        log::debug!("display {state:?}");
        self.state = state;
        Ok(())
    }

    /// Flush the whole frame buffer to display RAM
    ///
    /// Sends the data control byte followed by all 1024 buffer bytes in one
    /// transaction. Relies on the horizontal addressing mode set by
    /// [`init`](Self::init). The buffer is only read, so it is intact
    /// whether or not the flush succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transaction failed. Display RAM content
    /// is then unknown; flush again to recover.
    pub fn redraw(&mut self, buffer: &FrameBuffer) -> DisplayResult {
        log::debug!("flushing frame buffer to {:?}", self.config.address);
        self.transport
            .write_register_bytes(self.config.address, CONTROL_DATA, buffer.as_bytes())?;
        Ok(())
    }

    /// Get the current power state
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Get the display configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a reference to the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the transport
    ///
    /// Useful for talking to other devices sharing the bus.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the driver, giving back the transport
    pub fn release(self) -> T {
        self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Builder;
    use crate::error::BusError;
    use crate::transport::{Address, Transaction};
    use alloc::vec::Vec;

    #[derive(Debug, Default)]
    struct MockTransport {
        messages: Vec<(Address, Vec<u8>)>,
        fail_with: Option<BusError>,
    }

    impl Transport for MockTransport {
        fn transact(
            &mut self,
            address: Address,
            transaction: Transaction<'_>,
        ) -> Result<(), BusError> {
            if let Some(err) = self.fail_with {
                return Err(err);
            }
            match transaction {
                Transaction::Write { header, payload } => {
                    let mut message = header.to_vec();
                    message.extend_from_slice(payload);
                    self.messages.push((address, message));
                    Ok(())
                }
                // The display never reads
                Transaction::Read { buffer } | Transaction::WriteRead { read: buffer, .. } => {
                    Err(BusError::ShortTransfer {
                        requested: buffer.len(),
                        transferred: 0,
                    })
                }
            }
        }
    }

    fn test_display() -> Display<MockTransport> {
        Display::new(MockTransport::default(), Config::default())
    }

    fn last_message(display: &Display<MockTransport>) -> &[u8] {
        &display.transport().messages.last().unwrap().1
    }

    #[test]
    fn test_new_display_is_uninitialized_and_silent() {
        let display = test_display();
        assert_eq!(display.state(), PowerState::Uninitialized);
        assert!(display.transport().messages.is_empty());
    }

    #[test]
    fn test_init_sends_framed_sequence_in_one_write() {
        let mut display = test_display();
        display.init().unwrap();
        assert_eq!(display.state(), PowerState::On);

        let messages = &display.transport().messages;
        assert_eq!(messages.len(), 1);
        let (address, bytes) = &messages[0];
        assert_eq!(*address, Address::SevenBit(0x3C));
        assert_eq!(bytes.as_slice(), framed_init_sequence(0xCF).as_slice());
        assert_eq!(bytes.len(), 48);
        assert_eq!(&bytes[..4], &[0x80, 0xAE, 0x80, 0x40]);
    }

    #[test]
    fn test_init_uses_configured_contrast_and_address() {
        let config = Builder::new()
            .address(Address::SevenBit(0x3D))
            .contrast(0x42)
            .build()
            .unwrap();
        let mut display = Display::new(MockTransport::default(), config);
        display.init().unwrap();
        let (address, bytes) = &display.transport().messages[0];
        assert_eq!(*address, Address::SevenBit(0x3D));
        assert_eq!(&bytes[4..8], &[0x80, 0x81, 0x80, 0x42]);
    }

    #[test]
    fn test_init_then_on_ends_with_display_on() {
        let mut display = test_display();
        display.init().unwrap();
        display.turn_on_off(true).unwrap();
        assert_eq!(last_message(&display), &[0x80, 0xAF]);
        assert_eq!(display.state(), PowerState::On);
    }

    #[test]
    fn test_turn_off_sends_display_off() {
        let mut display = test_display();
        display.init().unwrap();
        display.turn_on_off(false).unwrap();
        assert_eq!(last_message(&display), &[0x80, 0xAE]);
        assert_eq!(display.state(), PowerState::Off);
    }

    #[test]
    fn test_failed_init_keeps_state() {
        let mut display = Display::new(
            MockTransport {
                fail_with: Some(BusError::OpenFailed),
                ..MockTransport::default()
            },
            Config::default(),
        );
        assert_eq!(display.init(), Err(Error::Bus(BusError::OpenFailed)));
        assert_eq!(display.state(), PowerState::Uninitialized);
    }

    #[test]
    fn test_failed_turn_off_keeps_state() {
        let mut display = test_display();
        display.init().unwrap();
        display.transport_mut().fail_with = Some(BusError::CloseFailed);
        assert_eq!(
            display.turn_on_off(false),
            Err(Error::Bus(BusError::CloseFailed))
        );
        assert_eq!(display.state(), PowerState::On);
    }

    #[test]
    fn test_clear_then_redraw_sends_zeroed_buffer() {
        let mut display = test_display();
        let mut buffer = FrameBuffer::new();
        buffer.raw_mut().fill(0x55);
        buffer.clear();
        display.redraw(&buffer).unwrap();

        let bytes = last_message(&display);
        assert_eq!(bytes.len(), 1025);
        assert_eq!(bytes[0], 0x40);
        assert!(bytes[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_redraw_sends_buffer_verbatim() {
        let mut display = test_display();
        let mut buffer = FrameBuffer::new();
        buffer.set_pixel(5, 10).unwrap();
        buffer.set_pixel(127, 63).unwrap();
        display.redraw(&buffer).unwrap();

        let bytes = last_message(&display);
        assert_eq!(&bytes[1..], buffer.as_bytes().as_slice());
        assert_eq!(bytes[1 + 133], 0b0000_0100);
        assert_eq!(bytes[1024], 0b1000_0000);
    }

    #[test]
    fn test_failed_redraw_leaves_buffer_unchanged() {
        let mut display = Display::new(
            MockTransport {
                fail_with: Some(BusError::ShortTransfer {
                    requested: 1025,
                    transferred: 512,
                }),
                ..MockTransport::default()
            },
            Config::default(),
        );
        let mut buffer = FrameBuffer::new();
        buffer.set_pixel(1, 1).unwrap();
        let before = buffer.clone();
        assert!(matches!(
            display.redraw(&buffer),
            Err(Error::Bus(BusError::ShortTransfer { .. }))
        ));
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_drawing_needs_no_io() {
        let display = test_display();
        let mut buffer = FrameBuffer::new();
        buffer.draw_bitmap_at(0, 0, 8, 8, Some(&[0xFF; 8]));
        assert_eq!(&buffer.as_bytes()[..8], &[0xFF; 8]);
        assert!(display.transport().messages.is_empty());
    }

    #[test]
    fn test_release_returns_transport() {
        let mut display = test_display();
        display.turn_on_off(true).unwrap();
        let transport = display.release();
        assert_eq!(transport.messages.len(), 1);
    }
}
