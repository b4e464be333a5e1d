//! In-memory [`DisplayBus`] that behaves like the panel's GRAM.
//!
//! Pixels streamed after `set_window` land in raster order inside the
//! window, wrapping at the window's right edge. Used by host tests and
//! by anything that wants to snapshot a frame without hardware.

use super::{DisplayBus, Orientation, Rgb565};

pub struct FrameBufferBus<'a> {
    pixels: &'a mut [Rgb565],
    width: u16,
    height: u16,
    window: (u16, u16, u16, u16),
    cursor: (u16, u16),
    orientation: Orientation,
    asleep: bool,
    windows_set: u32,
    pixels_written: u32,
}

impl<'a> FrameBufferBus<'a> {
    /// Wrap a `width * height` pixel slice.
    ///
    /// Returns `None` when the slice is too small.
    pub fn new(pixels: &'a mut [Rgb565], width: u16, height: u16) -> Option<Self> {
        if pixels.len() < usize::from(width) * usize::from(height) {
            return None;
        }
        Some(Self {
            pixels,
            width,
            height,
            window: (0, 0, width.saturating_sub(1), height.saturating_sub(1)),
            cursor: (0, 0),
            orientation: Orientation::Deg0,
            asleep: false,
            windows_set: 0,
            pixels_written: 0,
        })
    }

    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgb565> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[usize::from(y) * usize::from(self.width) + usize::from(x)])
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_asleep(&self) -> bool {
        self.asleep
    }

    /// Number of `set_window` calls so far.
    pub fn windows_set(&self) -> u32 {
        self.windows_set
    }

    /// Number of pixels streamed so far (including ones that fell
    /// outside the buffer).
    pub fn pixels_written(&self) -> u32 {
        self.pixels_written
    }

    /// Count pixels currently holding `color`.
    pub fn count(&self, color: Rgb565) -> usize {
        let len = usize::from(self.width) * usize::from(self.height);
        self.pixels[..len].iter().filter(|&&p| p == color).count()
    }
}

impl DisplayBus for FrameBufferBus<'_> {
    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) {
        self.window = (x0, y0, x1.max(x0), y1.max(y0));
        self.cursor = (x0, y0);
        self.windows_set += 1;
    }

    fn write_pixels<I>(&mut self, pixels: I)
    where
        I: IntoIterator<Item = Rgb565>,
    {
        let (x0, y0, x1, y1) = self.window;
        for color in pixels {
            self.pixels_written += 1;
            let (x, y) = self.cursor;
            if x < self.width && y < self.height {
                self.pixels[usize::from(y) * usize::from(self.width) + usize::from(x)] = color;
            }
            self.cursor = if x >= x1 {
                if y >= y1 {
                    (x0, y0)
                } else {
                    (x0, y + 1)
                }
            } else {
                (x + 1, y)
            };
        }
    }

    fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    fn sleep(&mut self) {
        self.asleep = true;
    }

    fn wake(&mut self) {
        self.asleep = false;
    }
}
