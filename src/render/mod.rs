//! Drawing on the round panel.
//!
//! The panel is a square pixel array of which only an inscribed circle is
//! visible. [`canvas::Canvas`] does all coordinate math and colour
//! decisions; a [`DisplayBus`] implementation only moves pixels.
//!
//! ## Components
//!
//! - **Canvas**: clipped primitives + `embedded-graphics` draw target
//! - **AMOLED bus**: MIPI DCS framing over SPI
//! - **Frame buffer**: in-memory bus for host tests

pub mod amoled;
pub mod canvas;
pub mod framebuffer;

pub use canvas::Canvas;
pub use framebuffer::FrameBufferBus;
pub use embedded_graphics::pixelcolor::Rgb565;

/// Sink for the ordered "set window, stream pixels" sequence.
///
/// Calls must reach the panel in the order they are made: the panel
/// writes streamed pixels into the most recent window in raster order.
pub trait DisplayBus {
    /// Select the inclusive rectangle `(x0, y0)..=(x1, y1)` for writing.
    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16);

    /// Stream pixels into the current window.
    fn write_pixels<I>(&mut self, pixels: I)
    where
        I: IntoIterator<Item = Rgb565>;

    /// Apply a display transform.
    fn set_orientation(&mut self, orientation: Orientation);

    /// Enter low-power mode (panel keeps its contents).
    fn sleep(&mut self) {}

    /// Leave low-power mode.
    fn wake(&mut self) {}
}

/// Pixel dimensions and visible circle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    pub width: u16,
    pub height: u16,
    pub center_x: i32,
    pub center_y: i32,
    pub radius: i32,
}

impl Geometry {
    /// Circle centred on the panel.
    pub const fn round(width: u16, height: u16, radius: u16) -> Self {
        Self {
            width,
            height,
            center_x: width as i32 / 2,
            center_y: height as i32 / 2,
            radius: radius as i32,
        }
    }

    /// True iff `(x, y)` lies inside or on the visible circle.
    pub fn in_viewport(&self, x: i32, y: i32) -> bool {
        let dx = i64::from(x) - i64::from(self.center_x);
        let dy = i64::from(y) - i64::from(self.center_y);
        let r = i64::from(self.radius);
        dx * dx + dy * dy <= r * r
    }

    /// True iff `(x, y)` addresses a real pixel.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < i32::from(self.width) && y < i32::from(self.height)
    }
}

impl Default for Geometry {
    fn default() -> Self {
        use crate::config::{DISPLAY_HEIGHT, DISPLAY_RADIUS, DISPLAY_WIDTH};
        Self::round(DISPLAY_WIDTH, DISPLAY_HEIGHT, DISPLAY_RADIUS)
    }
}

/// The four display transforms, in quarter turns clockwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Orientation {
    /// Wraps any count into 0..4.
    pub fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Orientation::Deg0,
            1 => Orientation::Deg90,
            2 => Orientation::Deg180,
            _ => Orientation::Deg270,
        }
    }

    /// Nearest quarter turn to a heading: `round(angle / 90) mod 4`.
    pub fn from_angle(angle_deg: f32) -> Self {
        if !angle_deg.is_finite() {
            return Orientation::Deg0;
        }
        let turns = libm::roundf(angle_deg / 90.0) as i32;
        Self::from_quarter_turns(turns.rem_euclid(4) as u8)
    }

    pub fn quarter_turns(&self) -> u8 {
        match self {
            Orientation::Deg0 => 0,
            Orientation::Deg90 => 1,
            Orientation::Deg180 => 2,
            Orientation::Deg270 => 3,
        }
    }
}
