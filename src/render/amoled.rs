//! AMOLED panel over single-line SPI (SH8601 / CO5300 family).
//!
//! Every transaction starts with a 4-byte header `[0x02, 0x00, cmd, 0x00]`
//! followed by the command's parameters. Pixel data is streamed as
//! big-endian RGB565: the first chunk uses RAMWR, later chunks RAMWRC so
//! the panel keeps its write cursor.

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::RawData;
use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

use super::{DisplayBus, Orientation, Rgb565};

const WRITE_OPCODE: u8 = 0x02;

const CMD_SLEEP_IN: u8 = 0x10;
const CMD_SLEEP_OUT: u8 = 0x11;
const CMD_DISPLAY_ON: u8 = 0x29;
const CMD_COLUMN_SET: u8 = 0x2A;
const CMD_ROW_SET: u8 = 0x2B;
const CMD_MEMORY_WRITE: u8 = 0x2C;
const CMD_MEMORY_ACCESS: u8 = 0x36;
const CMD_PIXEL_FORMAT: u8 = 0x3A;
const CMD_MEMORY_WRITE_CONTINUE: u8 = 0x3C;
const CMD_BRIGHTNESS: u8 = 0x51;

const PIXEL_FORMAT_RGB565: u8 = 0x55;

/// Pixels buffered per SPI transaction.
const CHUNK_PIXELS: usize = 128;

pub struct AmoledBus<SPI> {
    spi: SPI,
    errors: u32,
}

impl<SPI: SpiDevice> AmoledBus<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi, errors: 0 }
    }

    /// Wake the controller and configure RGB565 output.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), SPI::Error> {
        info!("Initializing AMOLED display");
        self.command(CMD_SLEEP_OUT, &[])?;
        delay.delay_ms(120);
        self.command(CMD_MEMORY_ACCESS, &[madctl(Orientation::Deg0)])?;
        self.command(CMD_PIXEL_FORMAT, &[PIXEL_FORMAT_RGB565])?;
        self.command(CMD_DISPLAY_ON, &[])?;
        delay.delay_ms(10);
        Ok(())
    }

    pub fn set_brightness(&mut self, level: u8) -> Result<(), SPI::Error> {
        self.command(CMD_BRIGHTNESS, &[level])
    }

    /// Transactions that failed since construction.
    pub fn error_count(&self) -> u32 {
        self.errors
    }

    pub fn release(self) -> SPI {
        self.spi
    }

    fn command(&mut self, cmd: u8, params: &[u8]) -> Result<(), SPI::Error> {
        use embedded_hal::spi::Operation;

        let header = [WRITE_OPCODE, 0x00, cmd, 0x00];
        if params.is_empty() {
            self.spi.write(&header)
        } else {
            self.spi
                .transaction(&mut [Operation::Write(&header), Operation::Write(params)])
        }
    }

    /// Drawing can't fail upward; count and log instead.
    fn record(&mut self, result: Result<(), SPI::Error>) {
        if result.is_err() {
            self.errors = self.errors.saturating_add(1);
            if self.errors == 1 || self.errors % 1000 == 0 {
                warn!("AMOLED SPI write failed ({} total)", self.errors);
            }
        }
    }
}

/// Memory access control value for each transform.
fn madctl(orientation: Orientation) -> u8 {
    match orientation {
        Orientation::Deg0 => 0x00,
        Orientation::Deg90 => 0x60,
        Orientation::Deg180 => 0xC0,
        Orientation::Deg270 => 0xA0,
    }
}

fn span(start: u16, end: u16) -> [u8; 4] {
    let s = start.to_be_bytes();
    let e = end.to_be_bytes();
    [s[0], s[1], e[0], e[1]]
}

impl<SPI: SpiDevice> DisplayBus for AmoledBus<SPI> {
    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) {
        let r = self.command(CMD_COLUMN_SET, &span(x0, x1));
        self.record(r);
        let r = self.command(CMD_ROW_SET, &span(y0, y1));
        self.record(r);
    }

    fn write_pixels<I>(&mut self, pixels: I)
    where
        I: IntoIterator<Item = Rgb565>,
    {
        let mut buf = [0u8; CHUNK_PIXELS * 2];
        let mut len = 0;
        let mut cmd = CMD_MEMORY_WRITE;

        for color in pixels {
            let raw = RawU16::from(color).into_inner().to_be_bytes();
            buf[len] = raw[0];
            buf[len + 1] = raw[1];
            len += 2;
            if len == buf.len() {
                let r = self.command(cmd, &buf[..len]);
                self.record(r);
                cmd = CMD_MEMORY_WRITE_CONTINUE;
                len = 0;
            }
        }
        if len > 0 {
            let r = self.command(cmd, &buf[..len]);
            self.record(r);
        }
    }

    fn set_orientation(&mut self, orientation: Orientation) {
        debug!("Display orientation -> {}", orientation.quarter_turns());
        let r = self.command(CMD_MEMORY_ACCESS, &[madctl(orientation)]);
        self.record(r);
    }

    fn sleep(&mut self) {
        let r = self.command(CMD_SLEEP_IN, &[]);
        self.record(r);
    }

    fn wake(&mut self) {
        let r = self.command(CMD_SLEEP_OUT, &[]);
        self.record(r);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::RgbColor;
    use embedded_hal::spi::{ErrorKind, ErrorType, Operation};
    use std::vec::Vec;

    /// Records each transaction as one flat byte vector.
    #[derive(Default)]
    struct FakeSpi {
        transactions: Vec<Vec<u8>>,
        fail: bool,
    }

    impl ErrorType for FakeSpi {
        type Error = ErrorKind;
    }

    impl SpiDevice for FakeSpi {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), ErrorKind> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            let mut bytes = Vec::new();
            for op in operations.iter() {
                if let Operation::Write(data) = op {
                    bytes.extend_from_slice(data);
                }
            }
            self.transactions.push(bytes);
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn commands(spi: &FakeSpi) -> Vec<u8> {
        spi.transactions.iter().map(|t| t[2]).collect()
    }

    #[test]
    fn init_sequence() {
        let mut bus = AmoledBus::new(FakeSpi::default());
        bus.init(&mut NoDelay).unwrap();
        let spi = bus.release();
        assert_eq!(commands(&spi), vec![0x11, 0x36, 0x3A, 0x29]);
        assert_eq!(spi.transactions[2], vec![0x02, 0x00, 0x3A, 0x00, 0x55]);
    }

    #[test]
    fn window_is_big_endian_spans() {
        let mut bus = AmoledBus::new(FakeSpi::default());
        bus.set_window(1, 2, 300, 465);
        let spi = bus.release();
        assert_eq!(
            spi.transactions,
            vec![
                vec![0x02, 0x00, 0x2A, 0x00, 0x00, 0x01, 0x01, 0x2C],
                vec![0x02, 0x00, 0x2B, 0x00, 0x00, 0x02, 0x01, 0xD1],
            ]
        );
    }

    #[test]
    fn pixels_are_chunked_with_continue_command() {
        let mut bus = AmoledBus::new(FakeSpi::default());
        bus.write_pixels(core::iter::repeat(Rgb565::RED).take(CHUNK_PIXELS + 3));
        let spi = bus.release();

        assert_eq!(commands(&spi), vec![0x2C, 0x3C]);
        assert_eq!(spi.transactions[0].len(), 4 + CHUNK_PIXELS * 2);
        assert_eq!(spi.transactions[1].len(), 4 + 3 * 2);
        // Pure red in RGB565 is 0xF800.
        assert_eq!(&spi.transactions[0][4..6], &[0xF8, 0x00]);
    }

    #[test]
    fn empty_pixel_stream_sends_nothing() {
        let mut bus = AmoledBus::new(FakeSpi::default());
        bus.write_pixels(core::iter::empty());
        assert!(bus.release().transactions.is_empty());
    }

    #[test]
    fn orientation_values() {
        let mut bus = AmoledBus::new(FakeSpi::default());
        for o in [
            Orientation::Deg0,
            Orientation::Deg90,
            Orientation::Deg180,
            Orientation::Deg270,
        ] {
            bus.set_orientation(o);
        }
        let params: Vec<u8> = bus.release().transactions.iter().map(|t| t[4]).collect();
        assert_eq!(params, vec![0x00, 0x60, 0xC0, 0xA0]);
    }

    #[test]
    fn failed_writes_are_counted() {
        let mut bus = AmoledBus::new(FakeSpi {
            fail: true,
            ..FakeSpi::default()
        });
        bus.set_window(0, 0, 1, 1);
        bus.sleep();
        assert_eq!(bus.error_count(), 3);
        assert!(bus.set_brightness(10).is_err());
    }
}
