//! Clipped drawing primitives for the round panel.
//!
//! Every primitive goes straight to the bus, no frame buffer. Rectangular
//! runs are clipped to the panel first; pixels of the run that fall
//! outside the visible circle are painted with the background colour,
//! because the panel fills the whole window in raster order and
//! skipping a pixel is not an option.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::RgbColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};
use embedded_graphics::primitives::Rectangle;

use super::{DisplayBus, Geometry, Orientation, Rgb565};

/// Circles with a larger radius are not drawn.
pub const MAX_CIRCLE_RADIUS: i32 = 1 << 14;

pub struct Canvas<B> {
    bus: B,
    geometry: Geometry,
    background: Rgb565,
}

impl<B: DisplayBus> Canvas<B> {
    /// Canvas with a black off-circle background.
    pub fn new(bus: B, geometry: Geometry) -> Self {
        Self {
            bus,
            geometry,
            background: Rgb565::BLACK,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }

    /// Colour written for off-circle pixels of a rectangular run.
    pub fn background(&self) -> Rgb565 {
        self.background
    }

    pub fn set_background(&mut self, color: Rgb565) {
        self.background = color;
    }

    pub fn is_in_viewport(&self, x: i32, y: i32) -> bool {
        self.geometry.in_viewport(x, y)
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.bus.set_orientation(orientation);
    }

    pub fn sleep(&mut self) {
        self.bus.sleep();
    }

    pub fn wake(&mut self) {
        self.bus.wake();
    }

    /// Single pixel; silently dropped outside the panel or the circle.
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Rgb565) {
        if !self.geometry.in_bounds(x, y) || !self.geometry.in_viewport(x, y) {
            return;
        }
        self.bus.set_window(x as u16, y as u16, x as u16, y as u16);
        self.bus.write_pixels([color]);
    }

    pub fn draw_hline(&mut self, x: i32, y: i32, w: i32, color: Rgb565) {
        self.fill_rect(x, y, w, 1, color);
    }

    pub fn draw_vline(&mut self, x: i32, y: i32, h: i32, color: Rgb565) {
        self.fill_rect(x, y, 1, h, color);
    }

    pub fn fill_screen(&mut self, color: Rgb565) {
        let (w, h) = (i32::from(self.geometry.width), i32::from(self.geometry.height));
        self.fill_rect(0, 0, w, h, color);
    }

    /// Fill a rectangle, shrunk to the on-panel part.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb565) {
        if w <= 0 || h <= 0 {
            return;
        }
        let x_start = x.max(0);
        let y_start = y.max(0);
        let x_end = x.saturating_add(w).min(i32::from(self.geometry.width));
        let y_end = y.saturating_add(h).min(i32::from(self.geometry.height));
        if x_end <= x_start || y_end <= y_start {
            return;
        }

        self.bus.set_window(
            x_start as u16,
            y_start as u16,
            (x_end - 1) as u16,
            (y_end - 1) as u16,
        );

        let geometry = self.geometry;
        let background = self.background;
        self.bus.write_pixels((y_start..y_end).flat_map(move |py| {
            (x_start..x_end).map(move |px| {
                if geometry.in_viewport(px, py) {
                    color
                } else {
                    background
                }
            })
        }));
    }

    /// Midpoint circle outline (8-way symmetric).
    pub fn draw_circle(&mut self, x0: i32, y0: i32, r: i32, color: Rgb565) {
        if !self.circle_reaches_panel(x0, y0, r) {
            return;
        }
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;

        self.draw_pixel(x0, y0 + r, color);
        self.draw_pixel(x0, y0 - r, color);
        self.draw_pixel(x0 + r, y0, color);
        self.draw_pixel(x0 - r, y0, color);

        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;

            self.draw_pixel(x0 + x, y0 + y, color);
            self.draw_pixel(x0 - x, y0 + y, color);
            self.draw_pixel(x0 + x, y0 - y, color);
            self.draw_pixel(x0 - x, y0 - y, color);
            self.draw_pixel(x0 + y, y0 + x, color);
            self.draw_pixel(x0 - y, y0 + x, color);
            self.draw_pixel(x0 + y, y0 - x, color);
            self.draw_pixel(x0 - y, y0 - x, color);
        }
    }

    /// Filled disc built from vertical spans.
    pub fn fill_circle(&mut self, x0: i32, y0: i32, r: i32, color: Rgb565) {
        if !self.circle_reaches_panel(x0, y0, r) {
            return;
        }
        self.draw_vline(x0, y0 - r, 2 * r + 1, color);

        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;

        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;

            self.draw_vline(x0 + x, y0 - y, 2 * y + 1, color);
            self.draw_vline(x0 - x, y0 - y, 2 * y + 1, color);
            self.draw_vline(x0 + y, y0 - x, 2 * x + 1, color);
            self.draw_vline(x0 - y, y0 - x, 2 * x + 1, color);
        }
    }

    /// Radius in range and bounding box overlapping the panel. Keeps the
    /// span arithmetic of the circle primitives inside `i32`.
    fn circle_reaches_panel(&self, x0: i32, y0: i32, r: i32) -> bool {
        if !(0..=MAX_CIRCLE_RADIUS).contains(&r) {
            return false;
        }
        let (x0, y0, r) = (i64::from(x0), i64::from(y0), i64::from(r));
        let w = i64::from(self.geometry.width);
        let h = i64::from(self.geometry.height);
        x0 + r >= 0 && y0 + r >= 0 && x0 - r < w && y0 - r < h
    }
}

impl<B: DisplayBus> OriginDimensions for Canvas<B> {
    fn size(&self) -> Size {
        Size::new(
            u32::from(self.geometry.width),
            u32::from(self.geometry.height),
        )
    }
}

/// Lets `embedded-graphics` text and shapes draw through the same
/// clipping rules as the native primitives.
impl<B: DisplayBus> DrawTarget for Canvas<B> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.draw_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_rect(
            area.top_left.x,
            area.top_left.y,
            area.size.width as i32,
            area.size.height as i32,
            color,
        );
        Ok(())
    }
}
